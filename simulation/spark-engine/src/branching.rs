//! Stochastic branching of sparks into children
//!
//! [`BranchingRule::evaluate`] only produces [`ChildSpec`]s; admission into
//! the live set is the pool's decision, made after the update pass.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::config::{BranchBudget, BranchPolicy};
use crate::rng::RandomSource;
use crate::spark::{BranchState, Spark, SparkInit};

/// Fully determined child spark waiting for admission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSpec {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Both `life` and `max_life` of the child
    pub life: f32,
    pub size: f32,
    pub branch: BranchState,
    pub seed: Option<[f32; 2]>,
}

impl ChildSpec {
    /// Materialize the child with its trail collapsed onto the branch point
    pub fn into_spark(self, trail_length: usize) -> Spark {
        let init = SparkInit::new(self.position, self.velocity, self.life, self.size);
        Spark::new(&init, trail_length, self.branch, self.seed)
    }
}

/// Branching decision for one preset
#[derive(Debug, Clone)]
pub struct BranchingRule {
    policy: BranchPolicy,
    with_seeds: bool,
}

impl BranchingRule {
    /// `with_seeds` makes every child carry a renderer jitter seed pair
    pub fn new(policy: BranchPolicy, with_seeds: bool) -> Self {
        Self { policy, with_seeds }
    }

    pub fn policy(&self) -> &BranchPolicy {
        &self.policy
    }

    /// Branch state for a spark created by the caller
    pub fn initial_state<R: RandomSource + ?Sized>(
        &self,
        branch_count: u32,
        rng: &mut R,
    ) -> BranchState {
        match self.policy.budget {
            BranchBudget::Counter { max_branches } => BranchState::Counter {
                count: branch_count,
                max: max_branches,
            },
            BranchBudget::OneShot { spawn_chance, .. } => BranchState::OneShot {
                armed: rng.chance(spawn_chance),
                spent: false,
            },
        }
    }

    /// Seed pair for a new spark, if this preset uses them
    pub fn draw_seed<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<[f32; 2]> {
        self.with_seeds.then(|| [rng.next_f32(), rng.next_f32()])
    }

    /// Whether `spark` may branch this frame, before any random draw
    pub fn is_eligible(&self, spark: &Spark) -> bool {
        if spark.branch.is_exhausted() {
            return false;
        }
        let (lo, hi) = self.policy.life_window;
        let max_life = spark.max_life();
        spark.life > max_life * lo && spark.life < max_life * hi
    }

    /// Decide whether `spark` branches and append its children to `out`
    ///
    /// Returns `true` when a branch event fired. The spark itself is not
    /// touched; callers record the event on its [`BranchState`].
    pub fn evaluate<R: RandomSource + ?Sized>(
        &self,
        spark: &Spark,
        dt: f32,
        rng: &mut R,
        out: &mut Vec<ChildSpec>,
    ) -> bool {
        if !self.is_eligible(spark) {
            return false;
        }
        if !rng.chance(self.policy.chance.probability(dt)) {
            return false;
        }

        let count = self.child_count(rng);
        let child_life = spark.life * self.policy.life_scale;
        let child_size = spark.size * self.policy.size_scale;
        let (min_speed, max_speed) = self.policy.child_speed;

        for _ in 0..count {
            // theta and phi are drawn independently, which clusters children
            // toward the poles; the look depends on it
            let theta = rng.next_f32() * TAU;
            let phi = rng.next_f32() * PI;
            let speed = rng.range(min_speed, max_speed);
            let direction = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());

            let branch = self.child_state(&spark.branch, rng);
            let seed = self.draw_seed(rng);

            out.push(ChildSpec {
                position: spark.position,
                velocity: spark.velocity * self.policy.velocity_inheritance + direction * speed,
                life: child_life,
                size: child_size,
                branch,
                seed,
            });
        }

        true
    }

    /// Allocating variant of [`evaluate`](Self::evaluate)
    pub fn evaluate_to_vec<R: RandomSource + ?Sized>(
        &self,
        spark: &Spark,
        dt: f32,
        rng: &mut R,
    ) -> Vec<ChildSpec> {
        let mut out = Vec::new();
        self.evaluate(spark, dt, rng, &mut out);
        out
    }

    fn child_count<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u32 {
        let (min, max) = self.policy.child_count;
        let span = (max - min).saturating_add(1) as f32;
        (min + (rng.next_f32() * span) as u32).min(max)
    }

    fn child_state<R: RandomSource + ?Sized>(
        &self,
        parent: &BranchState,
        rng: &mut R,
    ) -> BranchState {
        match (self.policy.budget, *parent) {
            (BranchBudget::Counter { max_branches }, BranchState::Counter { count, .. }) => {
                BranchState::Counter {
                    count: count.saturating_add(1),
                    max: max_branches,
                }
            }
            (BranchBudget::Counter { max_branches }, BranchState::OneShot { .. }) => {
                BranchState::Counter {
                    count: 0,
                    max: max_branches,
                }
            }
            (BranchBudget::OneShot { child_chance, .. }, _) => BranchState::OneShot {
                armed: rng.chance(child_chance),
                spent: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BranchChance;
    use crate::presets::Preset;
    use crate::rng::ScriptedRandom;

    fn counter_rule() -> BranchingRule {
        BranchingRule::new(Preset::Branching.config().branch, false)
    }

    fn parent(life: f32, max_life: f32) -> Spark {
        let mut s = Spark::new(
            &SparkInit::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 0.0, 0.0), max_life, 1.0),
            10,
            BranchState::Counter { count: 0, max: 10 },
            None,
        );
        s.life = life;
        s
    }

    #[test]
    fn test_outside_window_never_branches() {
        let rule = counter_rule();
        let mut rng = ScriptedRandom::constant(0.0);

        for life in [10.0, 6.6, 0.5, 0.1] {
            let children = rule.evaluate_to_vec(&parent(life, 10.0), 1.0 / 60.0, &mut rng);
            assert!(children.is_empty(), "life {life} should not branch");
        }
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_inside_window_branches_with_sure_rng() {
        let rule = counter_rule();
        let mut rng = ScriptedRandom::constant(0.0);
        let p = parent(5.0, 10.0);

        let children = rule.evaluate_to_vec(&p, 1.0 / 60.0, &mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.position, p.position);
            assert!((child.life - 2.5).abs() < 1e-6);
            assert!((child.size - 0.7).abs() < 1e-6);
            assert_eq!(child.branch, BranchState::Counter { count: 1, max: 10 });
            // theta = phi = 0 points the kick straight along +z
            let expected = p.velocity * 0.15 + Vec3::new(0.0, 0.0, 0.4);
            assert!((child.velocity - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_failed_draw_produces_nothing() {
        let rule = counter_rule();
        let mut rng = ScriptedRandom::constant(0.99);
        assert!(
            rule.evaluate_to_vec(&parent(5.0, 10.0), 1.0 / 60.0, &mut rng)
                .is_empty()
        );
    }

    #[test]
    fn test_exhausted_parent_never_branches() {
        let rule = counter_rule();
        let mut rng = ScriptedRandom::constant(0.0);
        let mut p = parent(5.0, 10.0);
        p.branch = BranchState::Counter { count: 10, max: 10 };
        assert!(rule.evaluate_to_vec(&p, 1.0 / 60.0, &mut rng).is_empty());
    }

    #[test]
    fn test_child_count_spans_range() {
        let mut policy = Preset::Meteor.config().branch;
        policy.chance = BranchChance::PerAttempt(1.0);
        let rule = BranchingRule::new(policy, false);
        let mut p = parent(5.0, 10.0);
        p.branch = BranchState::OneShot {
            armed: true,
            spent: false,
        };

        // first draw is the probability, second the child count
        let mut out = Vec::new();
        let mut high = ScriptedRandom::new(vec![0.0, 0.999]);
        assert!(rule.evaluate(&p, 0.016, &mut high, &mut out));
        assert_eq!(out.len(), 4);

        out.clear();
        let mut low = ScriptedRandom::new(vec![0.0, 0.0]);
        assert!(rule.evaluate(&p, 0.016, &mut low, &mut out));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_one_shot_children_follow_child_chance() {
        let rule = BranchingRule::new(Preset::Wobble.config().branch, true);
        let mut rng = ScriptedRandom::constant(0.0);
        let mut p = parent(4.0, 10.0);
        p.branch = BranchState::OneShot {
            armed: true,
            spent: false,
        };

        let children = rule.evaluate_to_vec(&p, 1.0 / 60.0, &mut rng);
        assert!(!children.is_empty());
        for child in children {
            // child_chance is 0.0, so even a 0.0 draw fails
            assert_eq!(
                child.branch,
                BranchState::OneShot {
                    armed: false,
                    spent: false
                }
            );
            assert!(child.seed.is_some());
        }
    }

    #[test]
    fn test_initial_state() {
        let rule = counter_rule();
        let mut rng = ScriptedRandom::constant(0.0);
        assert_eq!(
            rule.initial_state(3, &mut rng),
            BranchState::Counter { count: 3, max: 10 }
        );

        let meteor = BranchingRule::new(Preset::Meteor.config().branch, false);
        let armed = meteor.initial_state(0, &mut ScriptedRandom::constant(0.1));
        let disarmed = meteor.initial_state(0, &mut ScriptedRandom::constant(0.9));
        assert!(!armed.is_exhausted());
        assert!(disarmed.is_exhausted());
    }

    #[test]
    fn test_into_spark_collapses_trail() {
        let spec = ChildSpec {
            position: Vec3::new(4.0, 5.0, 6.0),
            velocity: Vec3::ONE,
            life: 1.5,
            size: 0.5,
            branch: BranchState::Counter { count: 1, max: 10 },
            seed: None,
        };
        let spark = spec.into_spark(6);
        assert_eq!(spark.max_life(), 1.5);
        assert_eq!(spark.trail().len(), 6);
        assert!(spark.trail().iter().all(|p| p == Vec3::new(4.0, 5.0, 6.0)));
    }
}
