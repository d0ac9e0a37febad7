//! Property tests for the capacity bound

use glam::Vec3;
use proptest::prelude::*;
use spark_engine::{ParticlePool, Preset, SparkConfig, SparkInit};

fn preset() -> impl Strategy<Value = Preset> {
    prop_oneof![
        Just(Preset::Branching),
        Just(Preset::Wobble),
        Just(Preset::Meteor),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn live_count_never_exceeds_capacity(
        preset in preset(),
        capacity in 0usize..48,
        spawns in 0usize..96,
        frames in 1usize..90,
        dt in 0.001f32..0.05,
        seed in any::<u64>(),
    ) {
        let config = SparkConfig { capacity, ..preset.config() };
        let mut pool = ParticlePool::with_seed(config, seed).unwrap();

        for i in 0..spawns {
            let created = pool.create_spark(SparkInit::new(
                Vec3::ZERO,
                Vec3::new((i as f32).sin(), 2.0, (i as f32).cos()),
                1.0,
                1.0,
            ));
            prop_assert_eq!(created.is_some(), i < capacity);
        }

        for frame in 0..frames {
            let stats = pool.update(dt, frame as f32 * dt);
            prop_assert!(pool.len() <= capacity);
            prop_assert_eq!(stats.live, pool.len());
            prop_assert_eq!(pool.point_buffer().valid_count(), pool.len());
            for spark in pool.sparks() {
                prop_assert!(spark.life_ratio() >= 0.0 && spark.life_ratio() <= 1.0);
                prop_assert!(!spark.is_expired());
            }
        }
    }
}
