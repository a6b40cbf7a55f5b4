use super::{DayMobility, NationalMobility, StatisticsProvider, VehicleSpec};
use crate::domain::{CountryCode, DayTypeTable, PowerCurve, VehicleSize};

/// Compiled-in vehicle catalog and mobility survey averages.
///
/// Survey data exists for DE, ES, FR, IT, PL and UK; every other supported
/// country borrows a neighbour's figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTables;

const fn day(daily_distance_km: f64, trip_distance_km: f64, trip_duration_min: f64) -> DayMobility {
    DayMobility {
        daily_distance_km,
        trip_distance_km,
        trip_duration_min,
    }
}

impl StatisticsProvider for BuiltinTables {
    fn vehicle(&self, size: VehicleSize) -> VehicleSpec {
        match size {
            VehicleSize::Small => VehicleSpec {
                battery_capacity_kwh: 37.0,
                power_curve: PowerCurve::new(0.26, -13.0, 546.0),
            },
            VehicleSize::Medium => VehicleSpec {
                battery_capacity_kwh: 60.0,
                power_curve: PowerCurve::new(0.3, -14.0, 600.0),
            },
            VehicleSize::Large => VehicleSpec {
                battery_capacity_kwh: 100.0,
                power_curve: PowerCurve::new(0.35, -15.2, 620.0),
            },
        }
    }

    fn mobility(&self, country: CountryCode) -> Option<NationalMobility> {
        use CountryCode::*;

        // (weekday, saturday, sunday); weekend days share the daily distance
        let [weekday, saturday, sunday] = match country {
            De => [day(41.0, 14.0, 22.0), day(36.0, 16.0, 24.0), day(36.0, 18.0, 26.0)],
            Es => [day(37.0, 12.0, 21.0), day(31.0, 14.0, 22.0), day(31.0, 15.0, 24.0)],
            Fr => [day(43.0, 15.0, 23.0), day(38.0, 17.0, 25.0), day(38.0, 19.0, 27.0)],
            It => [day(42.0, 13.0, 22.0), day(35.0, 15.0, 24.0), day(35.0, 17.0, 26.0)],
            Pl => [day(35.0, 12.0, 21.0), day(30.0, 13.0, 23.0), day(30.0, 15.0, 25.0)],
            Uk => [day(40.0, 13.0, 23.0), day(34.0, 15.0, 24.0), day(34.0, 16.0, 26.0)],
            _ => return None,
        };
        Some(DayTypeTable::new(weekday, saturday, sunday))
    }

    fn equivalent_country(&self, country: CountryCode) -> Option<CountryCode> {
        use CountryCode::*;

        match country {
            At | Ch | Cz | Dk | Fi | Hu | Nl | No | Se | Sk => Some(De),
            Pt => Some(Es),
            Be | Lu => Some(Fr),
            El | Hr | Mt | Si => Some(It),
            Ie => Some(Uk),
            Bg | Cy | Ee | Lt | Lv | Ro => Some(Pl),
            De | Es | Fr | It | Pl | Uk => None,
        }
    }
}
