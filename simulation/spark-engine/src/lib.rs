//! Branching spark particle engine
//!
//! A fixed-capacity pool of sparks with gravity, frame-rate independent
//! drag and per-spark trail history. Sparks may split into children while
//! they are in the middle of their life, and every update repacks the live
//! set into flat point and line buffers ready for GPU upload.
//!
//! ```
//! use glam::Vec3;
//! use spark_engine::{ParticlePool, Preset, SparkInit};
//!
//! let mut pool = ParticlePool::with_seed(Preset::Branching.config(), 7)?;
//! pool.create_spark(SparkInit::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 1.5, 1.0));
//!
//! let stats = pool.update(1.0 / 60.0, 1.0 / 60.0);
//! assert_eq!(stats.live, pool.len());
//! assert_eq!(pool.point_buffer().valid_count(), pool.len());
//! # Ok::<(), spark_engine::SparkError>(())
//! ```

pub mod branching;
pub mod color;
pub mod config;
pub mod error;
pub mod packer;
pub mod pool;
pub mod presets;
pub mod rng;
pub mod spark;
pub mod trail;

// Re-export common types
pub use branching::{BranchingRule, ChildSpec};
pub use color::{ColorCurve, hsl_to_rgb};
pub use config::{
    BranchBudget, BranchChance, BranchPolicy, MAX_CHILDREN_PER_BRANCH, REFERENCE_TICK_RATE,
    SparkConfig, Wobble,
};
pub use error::{Result, SparkError};
pub use packer::{BufferPacker, HIDDEN_Y, LineBuffer, PointBuffer};
pub use pool::{FrameStats, ParticlePool};
pub use presets::Preset;
pub use rng::{RandomSource, ScriptedRandom};
pub use spark::{BranchState, Spark, SparkInit};
pub use trail::TrailHistory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
