//! Formatting utilities

use spark_engine::{BranchBudget, BranchChance};

/// Format a closed range of floats
pub fn format_range(range: (f32, f32)) -> String {
    format!("{:.2} .. {:.2}", range.0, range.1)
}

/// Format an RGB triple
pub fn format_rgb(rgb: [f32; 3]) -> String {
    format!("({:.2}, {:.2}, {:.2})", rgb[0], rgb[1], rgb[2])
}

/// Describe how often a spark rolls for a branch
pub fn format_chance(chance: BranchChance) -> String {
    match chance {
        BranchChance::PerSecond(rate) => format!("{rate}/s"),
        BranchChance::PerAttempt(p) => format!("{:.0}% per update", p * 100.0),
    }
}

/// Describe how many times a spark may branch
pub fn format_budget(budget: BranchBudget) -> String {
    match budget {
        BranchBudget::Counter { max_branches } => format!("up to {max_branches} times"),
        BranchBudget::OneShot {
            spawn_chance,
            child_chance,
        } => format!(
            "once ({:.0}% of sparks, {:.0}% of children)",
            spawn_chance * 100.0,
            child_chance * 100.0
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_range() {
        assert_eq!(format_range((0.08, 0.65)), "0.08 .. 0.65");
    }

    #[test]
    fn test_format_chance() {
        assert_eq!(format_chance(BranchChance::PerSecond(9.0)), "9/s");
        assert_eq!(format_chance(BranchChance::PerAttempt(0.12)), "12% per update");
    }

    #[test]
    fn test_format_budget() {
        assert_eq!(
            format_budget(BranchBudget::Counter { max_branches: 10 }),
            "up to 10 times"
        );
        assert_eq!(
            format_budget(BranchBudget::OneShot {
                spawn_chance: 0.4,
                child_chance: 0.2
            }),
            "once (40% of sparks, 20% of children)"
        );
    }
}
