//! Integration tests for the spark pool lifecycle

use glam::Vec3;
use pretty_assertions::assert_eq;
use spark_engine::{ParticlePool, Preset, ScriptedRandom, SparkConfig, SparkInit};

fn init(life: f32) -> SparkInit {
    SparkInit::new(Vec3::ZERO, Vec3::new(0.5, 2.0, -0.5), life, 1.0)
}

fn config(capacity: usize) -> SparkConfig {
    SparkConfig {
        capacity,
        ..Preset::Branching.config()
    }
}

#[test]
fn test_expired_sparks_are_removed_in_one_pass() {
    let mut pool = ParticlePool::with_seed(config(16), 1).unwrap();
    for life in [0.01, 1.0, 0.01, 1.0, 0.01] {
        pool.create_spark(init(life));
    }

    let stats = pool.update(0.02, 0.02);

    assert_eq!(stats.expired, 3);
    assert_eq!(pool.len(), 2);
    for spark in pool.sparks() {
        assert!((spark.life - 0.98).abs() < 1e-5);
    }
}

#[test]
fn test_full_pool_drops_children() {
    let mut config = config(1);
    config.branch.life_window = (0.0, 1.0);
    let mut pool = ParticlePool::with_rng(config, ScriptedRandom::constant(0.0)).unwrap();
    pool.create_spark(init(1.0));

    let stats = pool.update(1.0 / 60.0, 1.0 / 60.0);

    assert_eq!(stats.branch_events, 1);
    assert_eq!(stats.spawned, 0);
    assert!(stats.dropped >= 2);
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_children_join_after_the_pass() {
    let mut config = config(64);
    config.branch.life_window = (0.0, 1.0);
    let mut pool = ParticlePool::with_rng(config, ScriptedRandom::constant(0.0)).unwrap();
    pool.create_spark(init(1.0));

    let dt = 1.0 / 60.0;
    let stats = pool.update(dt, dt);
    assert_eq!(stats.spawned, 2);
    assert_eq!(pool.len(), 3);

    let parent_life = 1.0 - dt;
    let children: Vec<_> = pool.sparks().iter().skip(1).collect();
    for child in children {
        // newborn children have not been integrated yet
        assert!((child.life - parent_life * 0.5).abs() < 1e-6);
        assert_eq!(child.life, child.max_life());
        assert_eq!(child.position, pool.sparks()[0].position);
    }
}

#[test]
fn test_zero_capacity_pool_rejects_everything() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut pool = ParticlePool::with_seed(config(0), 3).unwrap();
    assert!(pool.create_spark(init(1.0)).is_none());

    let stats = pool.update(1.0 / 60.0, 1.0 / 60.0);
    assert_eq!(stats, spark_engine::FrameStats::default());
    assert_eq!(pool.point_buffer().capacity(), 0);
    assert_eq!(pool.line_buffer().vertex_capacity(), 0);
}

#[test]
fn test_clear_is_idempotent() {
    let mut pool = ParticlePool::with_seed(config(8), 5).unwrap();
    for _ in 0..4 {
        pool.create_spark(init(2.0));
    }
    pool.update(0.016, 0.016);

    pool.clear();
    pool.clear();

    assert!(pool.is_empty());
    assert_eq!(pool.point_buffer().valid_count(), 0);
    assert_eq!(pool.line_buffer().valid_vertex_count(), 0);
    for i in 0..4 {
        assert!(pool.point_buffer().is_hidden(i));
    }
}

#[test]
fn test_max_life_is_fixed_while_life_drains() {
    let mut pool = ParticlePool::with_seed(config(4), 9).unwrap();
    pool.create_spark(init(2.0));

    for frame in 1..=10 {
        pool.update(0.1, frame as f32 * 0.1);
        let spark = &pool.sparks()[0];
        assert_eq!(spark.max_life(), 2.0);
        assert!(spark.life_ratio() <= 1.0);
    }
    let spark = &pool.sparks()[0];
    assert!((spark.life_ratio() - 0.5).abs() < 1e-4);
}

#[test]
fn test_seeded_pools_are_reproducible() {
    let run = |seed| {
        let mut pool = ParticlePool::with_seed(Preset::Meteor.config(), seed).unwrap();
        for i in 0..50 {
            let angle = i as f32 * 0.3;
            pool.create_spark(SparkInit::new(
                Vec3::ZERO,
                Vec3::new(angle.cos(), 3.0, angle.sin()),
                1.2,
                1.0,
            ));
        }
        for frame in 1..=90 {
            pool.update(1.0 / 60.0, frame as f32 / 60.0);
        }
        pool
    };

    let a = run(1234);
    let b = run(1234);
    assert_eq!(a.sparks(), b.sparks());
    assert_eq!(a.point_buffer().positions(), b.point_buffer().positions());
    assert_eq!(a.line_buffer().colors(), b.line_buffer().colors());
}

#[test]
fn test_every_preset_runs_to_empty() {
    for preset in Preset::ALL {
        let mut pool = ParticlePool::with_seed(preset.config(), 77).unwrap();
        for _ in 0..100 {
            pool.create_spark(init(1.0));
        }
        for frame in 1..=240 {
            let stats = pool.update(1.0 / 60.0, frame as f32 / 60.0);
            assert!(stats.live <= pool.capacity());
        }
        // children never outlive the parent life they inherit
        assert!(pool.is_empty(), "{preset} left {} sparks", pool.len());
    }
}
