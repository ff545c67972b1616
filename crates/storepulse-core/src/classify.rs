//! Three-tier health classification of an uptime percentage or health score.

use serde::{Deserialize, Serialize};

/// Discrete health tier. Ordered worst to best, so `Critical < Healthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Critical,
    Degraded,
    Healthy,
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthTier::Critical => write!(f, "critical"),
            HealthTier::Degraded => write!(f, "degraded"),
            HealthTier::Healthy => write!(f, "healthy"),
        }
    }
}

/// The two threshold conventions seen in deployed dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdPreset {
    /// `<= 50` is Critical, `<= 80` is Degraded, anything above is Healthy.
    /// A boundary value belongs to the worse tier.
    #[default]
    Inclusive50To80,
    /// `< 40` is Critical, `< 80` is Degraded, anything else is Healthy.
    /// A boundary value belongs to the better tier.
    Exclusive40To80,
}

impl ThresholdPreset {
    /// Classify `percentage` under this preset.
    ///
    /// Total over `f64`: values below 0 land in Critical, values above 100 in
    /// Healthy, and NaN is Critical.
    #[must_use]
    pub fn classify(self, percentage: f64) -> HealthTier {
        if percentage.is_nan() {
            return HealthTier::Critical;
        }
        match self {
            ThresholdPreset::Inclusive50To80 => {
                if percentage <= 50.0 {
                    HealthTier::Critical
                } else if percentage <= 80.0 {
                    HealthTier::Degraded
                } else {
                    HealthTier::Healthy
                }
            }
            ThresholdPreset::Exclusive40To80 => {
                if percentage < 40.0 {
                    HealthTier::Critical
                } else if percentage < 80.0 {
                    HealthTier::Degraded
                } else {
                    HealthTier::Healthy
                }
            }
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ThresholdPreset::Inclusive50To80 => "inclusive-50-80",
            ThresholdPreset::Exclusive40To80 => "exclusive-40-80",
        }
    }
}

impl std::fmt::Display for ThresholdPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ThresholdPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "inclusive-50-80" => Ok(ThresholdPreset::Inclusive50To80),
            "exclusive-40-80" => Ok(ThresholdPreset::Exclusive40To80),
            other => Err(format!(
                "unknown threshold preset '{other}'; expected 'inclusive-50-80' or 'exclusive-40-80'"
            )),
        }
    }
}

/// Classify `percentage` under `preset`.
#[must_use]
pub fn classify(percentage: f64, preset: ThresholdPreset) -> HealthTier {
    preset.classify(percentage)
}
