//! Built-in spark styles

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::ColorCurve;
use crate::config::{BranchBudget, BranchChance, BranchPolicy, SparkConfig, Wobble};
use crate::error::SparkError;

/// Named spark style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preset {
    /// Droplets that keep bursting into smaller droplets, up to ten times
    Branching,
    /// Short smooth trails, point heads jittered by the renderer
    Wobble,
    /// Long meteor tails that rarely split
    Meteor,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Branching, Preset::Wobble, Preset::Meteor];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Branching => "branching",
            Preset::Wobble => "wobble",
            Preset::Meteor => "meteor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Branching => "Bursting droplets, repeated branching (max 10)",
            Preset::Wobble => "Smooth short trails with jittered heads",
            Preset::Meteor => "Long meteor tails with rare one-shot splits",
        }
    }

    /// Tuning table for this preset
    pub fn config(&self) -> SparkConfig {
        match self {
            Preset::Branching => SparkConfig {
                capacity: 3000,
                gravity: -4.0,
                drag: 0.90,
                trail_length: 10,
                branch: BranchPolicy {
                    chance: BranchChance::PerSecond(9.0),
                    life_window: (0.08, 0.65),
                    child_count: (2, 3),
                    velocity_inheritance: 0.15,
                    child_speed: (0.4, 0.9),
                    life_scale: 0.5,
                    size_scale: 0.7,
                    budget: BranchBudget::Counter { max_branches: 10 },
                },
                point_size_scale: 40.0,
                size_floor: 0.0,
                color: ColorCurve {
                    base_hue: 0.08,
                    hue_drift: 0.05,
                    saturation: 1.0,
                    base_lightness: 0.55,
                    lightness_gain: 0.15,
                },
                trail_tint: [1.0, 0.8, 0.4],
                wobble: None,
            },
            Preset::Wobble => SparkConfig {
                capacity: 3000,
                gravity: -3.8,
                drag: 0.91,
                trail_length: 8,
                branch: BranchPolicy {
                    chance: BranchChance::PerAttempt(0.12),
                    life_window: (0.12, 0.55),
                    child_count: (2, 3),
                    velocity_inheritance: 0.12,
                    child_speed: (0.5, 0.95),
                    life_scale: 0.45,
                    size_scale: 0.65,
                    budget: BranchBudget::OneShot {
                        spawn_chance: 0.45,
                        child_chance: 0.0,
                    },
                },
                point_size_scale: 35.0,
                size_floor: 0.3,
                color: ColorCurve {
                    base_hue: 0.085,
                    hue_drift: 0.055,
                    saturation: 1.0,
                    base_lightness: 0.5,
                    lightness_gain: 0.2,
                },
                trail_tint: [1.0, 0.75, 0.35],
                wobble: Some(Wobble {
                    frequency: 15.0,
                    phase_scale: 50.0,
                    amplitude: 0.02,
                }),
            },
            Preset::Meteor => SparkConfig {
                capacity: 2500,
                gravity: -3.2,
                drag: 0.93,
                trail_length: 14,
                branch: BranchPolicy {
                    chance: BranchChance::PerAttempt(0.08),
                    life_window: (0.15, 0.6),
                    child_count: (2, 4),
                    velocity_inheritance: 0.2,
                    child_speed: (0.4, 0.8),
                    life_scale: 0.5,
                    size_scale: 0.7,
                    budget: BranchBudget::OneShot {
                        spawn_chance: 0.4,
                        child_chance: 0.2,
                    },
                },
                point_size_scale: 45.0,
                size_floor: 0.0,
                color: ColorCurve {
                    base_hue: 0.08,
                    hue_drift: 0.05,
                    saturation: 1.0,
                    base_lightness: 0.6,
                    lightness_gain: 0.0,
                },
                trail_tint: [1.0, 0.7, 0.3],
                wobble: None,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SparkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "branching" | "type1" | "1" => Ok(Preset::Branching),
            "wobble" | "type2" | "2" => Ok(Preset::Wobble),
            "meteor" | "type3" | "3" => Ok(Preset::Meteor),
            _ => Err(SparkError::UnknownPreset(s.to_string())),
        }
    }
}
