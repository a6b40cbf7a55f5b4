use serde::{Deserialize, Serialize};

use super::ConfigError;

pub const MINUTES_PER_DAY: usize = 1440;

/// Upstream activity codes counted as "at home" (1 = active, 2 = sleeping)
pub const HOME_CODES: [u8; 2] = [1, 2];

/// Per-minute home (`true`) / away (`false`) flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySeries {
    home: Vec<bool>,
}

impl OccupancySeries {
    pub fn from_home_flags(home: Vec<bool>) -> Self {
        Self { home }
    }

    /// Expand upstream activity codes sampled every `resolution_minutes` to a
    /// 1-minute series.
    ///
    /// The last code is the boundary sample of the upstream series and is not
    /// expanded.
    pub fn from_codes(codes: &[u8], resolution_minutes: usize) -> Result<Self, ConfigError> {
        if resolution_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "occupancy.resolution_minutes",
                reason: "must be positive".to_string(),
            });
        }
        let body = codes.split_last().map(|(_, body)| body).unwrap_or(&[]);
        let home = body
            .iter()
            .flat_map(|code| std::iter::repeat(HOME_CODES.contains(code)).take(resolution_minutes))
            .collect();
        Ok(Self { home })
    }

    /// Every minute at home for `nb_days` days
    pub fn always_home(nb_days: usize) -> Self {
        Self {
            home: vec![true; nb_days * MINUTES_PER_DAY],
        }
    }

    pub fn len(&self) -> usize {
        self.home.len()
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
    }

    pub fn is_home(&self, minute: usize) -> bool {
        self.home.get(minute).copied().unwrap_or(false)
    }

    /// Minutes of day `day`, if the series covers it completely
    pub fn day(&self, day: usize) -> Option<&[bool]> {
        self.home
            .get(day * MINUTES_PER_DAY..(day + 1) * MINUTES_PER_DAY)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.home
    }

    /// Fails unless the series covers `nb_days` full days
    pub fn ensure_covers(&self, nb_days: usize) -> Result<(), ConfigError> {
        let required = nb_days * MINUTES_PER_DAY;
        if self.home.len() < required {
            return Err(ConfigError::OccupancyTooShort {
                required,
                actual: self.home.len(),
            });
        }
        Ok(())
    }

    /// Mark `[start, start + len)` as away. Used to script scenarios.
    pub fn with_away(mut self, start: usize, len: usize) -> Self {
        let end = (start + len).min(self.home.len());
        for flag in &mut self.home[start.min(end)..end] {
            *flag = false;
        }
        self
    }
}
