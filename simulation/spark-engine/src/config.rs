//! Engine configuration and validation
//!
//! A [`SparkConfig`] fully describes one spark style. The built-in styles
//! live in [`crate::presets`]; custom ones can be built by hand or, with the
//! `serde` feature, loaded from JSON.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::ColorCurve;
use crate::error::{Result, SparkError};

/// Updates per second the drag coefficient is defined against
pub const REFERENCE_TICK_RATE: f32 = 60.0;

/// Upper bound on children produced by a single branch event
pub const MAX_CHILDREN_PER_BRANCH: u32 = 64;

/// How the per-update branch probability is derived
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BranchChance {
    /// Rate in events per second; the draw succeeds with `rate * dt`
    PerSecond(f32),
    /// Fixed probability per eligible update, independent of `dt`
    PerAttempt(f32),
}

impl BranchChance {
    /// Probability for a single update of length `dt`
    #[inline]
    pub fn probability(&self, dt: f32) -> f32 {
        match *self {
            BranchChance::PerSecond(rate) => rate * dt,
            BranchChance::PerAttempt(p) => p,
        }
    }
}

/// How many times a spark may branch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BranchBudget {
    /// Repeated branching up to `max_branches`; children start at the
    /// parent's count plus one, so this also bounds the branch depth
    Counter { max_branches: u32 },
    /// At most one branch event per spark. Whether a spark may branch at all
    /// is drawn at creation: `spawn_chance` for sparks created by the
    /// caller, `child_chance` for sparks produced by branching.
    OneShot { spawn_chance: f32, child_chance: f32 },
}

/// Parameters of the stochastic branching rule
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BranchPolicy {
    pub chance: BranchChance,
    /// Fractions of `max_life`; branching only while strictly inside
    pub life_window: (f32, f32),
    /// Inclusive range of children per branch event
    pub child_count: (u32, u32),
    /// Fraction of the parent velocity handed to each child
    pub velocity_inheritance: f32,
    /// Speed range of the random kick added to each child
    pub child_speed: (f32, f32),
    /// Child life as a fraction of the parent's remaining life
    pub life_scale: f32,
    /// Child size as a fraction of the parent's size
    pub size_scale: f32,
    pub budget: BranchBudget,
}

impl BranchPolicy {
    /// Maximum branch depth, if the budget bounds it
    pub fn max_branch_depth(&self) -> Option<u32> {
        match self.budget {
            BranchBudget::Counter { max_branches } => Some(max_branches),
            BranchBudget::OneShot { .. } => None,
        }
    }
}

/// Renderer-side positional jitter driven by per-spark seeds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wobble {
    /// Angular frequency applied to elapsed time
    pub frequency: f32,
    /// Phase offset per unit of the first seed
    pub phase_scale: f32,
    pub amplitude: f32,
}

impl Wobble {
    /// Displacement the renderer applies to a point at time `elapsed`
    pub fn offset(&self, seed: [f32; 2], elapsed: f32) -> [f32; 3] {
        let w = (elapsed * self.frequency + seed[0] * self.phase_scale).sin() * self.amplitude;
        [w, w * seed[1], w]
    }
}

/// Complete description of one spark style
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparkConfig {
    /// Maximum concurrent sparks; zero makes every creation fail
    pub capacity: usize,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Velocity retained per reference tick, in `[0, 1]`
    pub drag: f32,
    /// Samples kept per trail, at least one
    pub trail_length: usize,
    pub branch: BranchPolicy,
    /// Multiplier from spark size to point size
    pub point_size_scale: f32,
    /// Fraction of the point size kept at zero life
    pub size_floor: f32,
    pub color: ColorCurve,
    /// Per-channel multipliers applied to trail colors
    pub trail_tint: [f32; 3],
    #[cfg_attr(feature = "serde", serde(default))]
    pub wobble: Option<Wobble>,
}

impl SparkConfig {
    /// Line segments one spark contributes
    #[inline]
    pub fn segments_per_spark(&self) -> usize {
        self.trail_length.saturating_sub(1)
    }

    /// Worst-case number of line segments
    #[inline]
    pub fn line_segment_capacity(&self) -> usize {
        self.capacity * self.segments_per_spark()
    }

    /// Point size multiplier for the given life ratio
    #[inline]
    pub fn size_curve(&self, life_ratio: f32) -> f32 {
        self.point_size_scale * (self.size_floor + (1.0 - self.size_floor) * life_ratio)
    }

    /// Check that the engine can run with this configuration
    pub fn validate(&self) -> Result<()> {
        if self.trail_length == 0 {
            return Err(SparkError::invalid("trail_length", "must be at least 1"));
        }
        finite("gravity", self.gravity)?;
        unit("drag", self.drag)?;
        finite("point_size_scale", self.point_size_scale)?;
        non_negative("point_size_scale", self.point_size_scale)?;
        unit("size_floor", self.size_floor)?;
        for value in self.trail_tint {
            finite("trail_tint", value)?;
            non_negative("trail_tint", value)?;
        }

        let color = &self.color;
        finite("color.base_hue", color.base_hue)?;
        finite("color.hue_drift", color.hue_drift)?;
        unit("color.saturation", color.saturation)?;
        finite("color.base_lightness", color.base_lightness)?;
        finite("color.lightness_gain", color.lightness_gain)?;

        if let Some(wobble) = &self.wobble {
            finite("wobble.frequency", wobble.frequency)?;
            finite("wobble.phase_scale", wobble.phase_scale)?;
            finite("wobble.amplitude", wobble.amplitude)?;
        }

        self.validate_branch()
    }

    fn validate_branch(&self) -> Result<()> {
        let branch = &self.branch;
        match branch.chance {
            BranchChance::PerSecond(rate) => {
                finite("branch.chance", rate)?;
                non_negative("branch.chance", rate)?;
            }
            BranchChance::PerAttempt(p) => unit("branch.chance", p)?,
        }

        let (lo, hi) = branch.life_window;
        unit("branch.life_window", lo)?;
        unit("branch.life_window", hi)?;
        if lo > hi {
            return Err(SparkError::invalid(
                "branch.life_window",
                format!("lower bound {lo} exceeds upper bound {hi}"),
            ));
        }

        let (min_children, max_children) = branch.child_count;
        if min_children > max_children {
            return Err(SparkError::invalid(
                "branch.child_count",
                format!("minimum {min_children} exceeds maximum {max_children}"),
            ));
        }
        if max_children > MAX_CHILDREN_PER_BRANCH {
            return Err(SparkError::invalid(
                "branch.child_count",
                format!("maximum {max_children} exceeds limit {MAX_CHILDREN_PER_BRANCH}"),
            ));
        }

        let (min_speed, max_speed) = branch.child_speed;
        finite("branch.child_speed", min_speed)?;
        finite("branch.child_speed", max_speed)?;
        if min_speed > max_speed {
            return Err(SparkError::invalid(
                "branch.child_speed",
                format!("minimum {min_speed} exceeds maximum {max_speed}"),
            ));
        }

        finite("branch.velocity_inheritance", branch.velocity_inheritance)?;
        finite("branch.life_scale", branch.life_scale)?;
        non_negative("branch.life_scale", branch.life_scale)?;
        finite("branch.size_scale", branch.size_scale)?;
        non_negative("branch.size_scale", branch.size_scale)?;

        if let BranchBudget::OneShot {
            spawn_chance,
            child_chance,
        } = branch.budget
        {
            unit("branch.budget.spawn_chance", spawn_chance)?;
            unit("branch.budget.child_chance", child_chance)?;
        }

        Ok(())
    }
}

impl Default for SparkConfig {
    fn default() -> Self {
        crate::presets::Preset::Branching.config()
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SparkError::invalid(field, format!("{value} is not finite")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SparkError::invalid(field, format!("{value} is negative")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SparkError::invalid(field, format!("{value} is outside [0, 1]")))
    }
}
