//! Headless simulation command
//!
//! Fires bursts of sparks from the origin and steps the pool at a fixed
//! timestep, reporting the same per-frame numbers a renderer would use to
//! size its draw calls.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use glam::Vec3;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use spark_engine::{FrameStats, ParticlePool, Preset, SparkConfig, SparkInit};
use std::f32::consts::TAU;
use std::fs;
use std::path::PathBuf;

use crate::utils::{add_numeric_row, add_table_row, create_table};

#[derive(Args)]
pub struct SimulateArgs {
    /// Built-in preset to run
    #[arg(short, long, default_value = "branching", conflicts_with = "config")]
    pub preset: String,

    /// JSON configuration file, as printed by `presets show --json`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the pool capacity
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Number of frames to simulate
    #[arg(short = 'n', long, default_value_t = 180)]
    pub frames: usize,

    /// Timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Number of bursts to fire
    #[arg(short, long, default_value_t = 3)]
    pub bursts: usize,

    /// Frames between bursts
    #[arg(long, default_value_t = 30)]
    pub burst_interval: usize,

    /// Sparks created per burst
    #[arg(short = 'm', long, default_value_t = 200)]
    pub sparks_per_burst: usize,

    /// Seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Print every Nth frame in the table
    #[arg(short, long, default_value_t = 10)]
    pub every: usize,

    /// Emit the full per-frame report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: usize,
    time: f32,
    /// Sparks accepted from bursts this frame
    created: usize,
    /// Burst sparks turned away by a full pool
    rejected: usize,
    #[serde(flatten)]
    stats: FrameStats,
    /// Largest renderer jitter displacement, wobble presets only
    #[serde(skip_serializing_if = "Option::is_none")]
    max_jitter: Option<f32>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    peak_live: usize,
    created: usize,
    rejected: usize,
    spawned: usize,
    dropped: usize,
    expired: usize,
    branch_events: usize,
}

impl Summary {
    fn add(&mut self, record: &FrameRecord) {
        self.peak_live = self.peak_live.max(record.stats.live);
        self.created += record.created;
        self.rejected += record.rejected;
        self.spawned += record.stats.spawned;
        self.dropped += record.stats.dropped;
        self.expired += record.stats.expired;
        self.branch_events += record.stats.branch_events;
    }
}

#[derive(Debug, Serialize)]
struct Report {
    source: String,
    capacity: usize,
    dt: f32,
    seed: Option<u64>,
    frames: Vec<FrameRecord>,
    summary: Summary,
}

/// Produces launch kinematics for burst sparks
struct Launcher {
    rng: StdRng,
}

impl Launcher {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            // keep launches independent of the pool's own stream
            Some(seed) => StdRng::seed_from_u64(seed.rotate_left(17) ^ 0x5EED),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    fn launch(&mut self) -> SparkInit {
        let z: f32 = self.rng.random_range(-1.0..1.0);
        let theta = self.rng.random::<f32>() * TAU;
        let radius = (1.0 - z * z).sqrt();
        let direction = Vec3::new(radius * theta.cos(), radius * theta.sin(), z);

        let speed: f32 = self.rng.random_range(1.5..3.0);
        let velocity = direction * speed + Vec3::Y;
        let life: f32 = self.rng.random_range(1.0..1.8);
        let size: f32 = self.rng.random_range(0.8..1.2);

        SparkInit::new(Vec3::ZERO, velocity, life, size)
    }
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let (source, config) = load_config(&args)?;
    let report = run(&args, source, config)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        print_report(&report, args.every.max(1));
    }
    Ok(())
}

fn load_config(args: &SimulateArgs) -> Result<(String, SparkConfig)> {
    let (source, mut config) = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: SparkConfig = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!("Loaded spark configuration from {}", path.display());
            (path.display().to_string(), config)
        }
        None => {
            let preset: Preset = args.preset.parse()?;
            (preset.name().to_string(), preset.config())
        }
    };

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    Ok((source, config))
}

fn run(args: &SimulateArgs, source: String, config: SparkConfig) -> Result<Report> {
    let capacity = config.capacity;
    let mut pool = match args.seed {
        Some(seed) => ParticlePool::with_seed(config, seed),
        None => ParticlePool::new(config),
    }
    .context("Invalid spark configuration")?;
    let mut launcher = Launcher::new(args.seed);

    info!(
        "Simulating {source}: {} frames at dt={}, {} bursts of {} sparks",
        args.frames, args.dt, args.bursts, args.sparks_per_burst
    );

    let interval = args.burst_interval.max(1);
    let mut frames = Vec::with_capacity(args.frames);
    let mut summary = Summary::default();

    for frame in 0..args.frames {
        let mut created = 0;
        let mut rejected = 0;
        if frame % interval == 0 && frame / interval < args.bursts {
            for _ in 0..args.sparks_per_burst {
                if pool.create_spark(launcher.launch()).is_some() {
                    created += 1;
                } else {
                    rejected += 1;
                }
            }
            debug!("Burst at frame {frame}: {created} created, {rejected} rejected");
        }

        let time = (frame + 1) as f32 * args.dt;
        let stats = pool.update(args.dt, time);

        let record = FrameRecord {
            frame,
            time,
            created,
            rejected,
            stats,
            max_jitter: max_jitter(&pool),
        };
        summary.add(&record);
        frames.push(record);
    }

    pool.dispose();

    Ok(Report {
        source,
        capacity,
        dt: args.dt,
        seed: args.seed,
        frames,
        summary,
    })
}

fn max_jitter(pool: &ParticlePool) -> Option<f32> {
    let wobble = pool.wobble()?;
    let elapsed = pool.elapsed_time();
    let max = pool
        .sparks()
        .iter()
        .filter_map(|s| s.seed)
        .map(|seed| Vec3::from(wobble.offset(seed, elapsed)).length())
        .fold(0.0, f32::max);
    Some(max)
}

fn print_report(report: &Report, every: usize) {
    println!(
        "\n{} {} (capacity {})",
        style("Simulation:").bold(),
        style(&report.source).cyan(),
        style(report.capacity).yellow()
    );

    let mut table = create_table(&[
        "Frame", "Created", "Live", "Spawned", "Dropped", "Expired", "Points", "Line verts",
    ]);
    let last = report.frames.len().saturating_sub(1);
    for record in &report.frames {
        if record.frame % every != 0 && record.frame != last {
            continue;
        }
        let stats = &record.stats;
        add_numeric_row(
            &mut table,
            format!("{} ({:.2}s)", record.frame, record.time),
            &[
                record.created,
                stats.live,
                stats.spawned,
                stats.dropped,
                stats.expired,
                stats.point_count,
                stats.line_vertex_count,
            ],
        );
    }
    table.printstd();

    let summary = &report.summary;
    println!("\n{}", style("Summary").bold().underlined());
    let mut totals = create_table(&["Metric", "Value"]);
    let rows = [
        ("Peak live", summary.peak_live),
        ("Created", summary.created),
        ("Rejected at creation", summary.rejected),
        ("Branch events", summary.branch_events),
        ("Children spawned", summary.spawned),
        ("Children dropped", summary.dropped),
        ("Expired", summary.expired),
    ];
    for (metric, value) in rows {
        add_table_row(&mut totals, vec![metric.to_string(), value.to_string()]);
    }
    totals.printstd();
}
