use anyhow::{Context, Result};
use ev_load_profile::{config, data, domain, simulation, telemetry};
use config::{Config, DEFAULT_CONFIG_PATH};
use domain::{DailyDemand, OccupancySeries, RunSummary, VehicleProfile};
use serde::Serialize;
use simulation::{run_vehicle, seeded_rng, EvOwnership};
use telemetry::init_tracing;
use tracing::{info, warn};

#[derive(Serialize)]
struct Report<'a> {
    ownership: Option<EvOwnership>,
    vehicle: Option<&'a VehicleProfile>,
    summary: Option<&'a RunSummary>,
    demand: &'a [DailyDemand],
    resample_minutes: usize,
    load_kw: Vec<f64>,
    soc: &'a [f64],
    charging: &'a [bool],
    away_charge: &'a [f64],
}

fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let mut run_cfg = cfg.run_config()?;
    let mut rng = seeded_rng(cfg.simulation.seed);
    if cfg.simulation.seed.is_none() {
        warn!("no seed configured, output is not reproducible");
    }

    let occupancy = match &cfg.occupancy.path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading occupancy from {}", path.display()))?;
            let codes: Vec<u8> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing occupancy codes in {}", path.display()))?;
            OccupancySeries::from_codes(&codes, cfg.occupancy.resolution_minutes)?
        }
        None => {
            warn!("no occupancy series configured, vehicle stays home");
            OccupancySeries::always_home(run_cfg.nb_days)
        }
    };

    let ownership = match cfg.ownership_sampler()? {
        Some(sampler) => match sampler.sample(&mut rng) {
            Some(ev) => {
                run_cfg = run_cfg.with_ownership(&ev);
                Some(ev)
            }
            None => {
                info!("household has no EV, writing empty profile");
                return write_report(
                    &cfg,
                    &Report {
                        ownership: None,
                        vehicle: None,
                        summary: None,
                        demand: &[],
                        resample_minutes: cfg.output.resample_minutes,
                        load_kw: Vec::new(),
                        soc: &[],
                        charging: &[],
                        away_charge: &[],
                    },
                );
            }
        },
        None => None,
    };

    let run = run_vehicle(&run_cfg, &data::BuiltinTables, &occupancy, &mut rng)
        .context("EV simulation failed")?;

    let report = Report {
        ownership,
        vehicle: Some(&run.vehicle),
        summary: Some(&run.summary),
        demand: &run.demand,
        resample_minutes: cfg.output.resample_minutes,
        load_kw: run.profile.resample_load(cfg.output.resample_minutes)?,
        soc: &run.profile.soc,
        charging: &run.profile.charging,
        away_charge: &run.profile.away_charge,
    };
    write_report(&cfg, &report)
}

fn write_report(cfg: &Config, report: &Report<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match &cfg.output.path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
