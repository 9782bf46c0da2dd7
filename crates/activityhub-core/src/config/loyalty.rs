//! Loyalty point award configuration.

use serde::{Deserialize, Serialize};

/// How many loyalty points a completed booking earns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// Whether completed bookings award points at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Points awarded per spent unit.
    #[serde(default = "default_points_per_unit")]
    pub points_per_unit: i64,
    /// Size of one unit in minor currency units (cents).
    #[serde(default = "default_unit_cents")]
    pub unit_cents: i64,
}

impl LoyaltyConfig {
    /// Points earned for the given amount in cents.
    pub fn points_for(&self, amount_cents: i64) -> i64 {
        if !self.enabled || self.unit_cents <= 0 || amount_cents <= 0 {
            return 0;
        }
        (amount_cents / self.unit_cents) * self.points_per_unit
    }
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            points_per_unit: default_points_per_unit(),
            unit_cents: default_unit_cents(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_points_per_unit() -> i64 {
    1
}

fn default_unit_cents() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_round_down_to_whole_units() {
        let config = LoyaltyConfig::default();
        assert_eq!(config.points_for(4_599), 45);
        assert_eq!(config.points_for(99), 0);
    }

    #[test]
    fn test_disabled_awards_nothing() {
        let config = LoyaltyConfig {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(config.points_for(10_000), 0);
    }
}
