//! Flat vertex buffers for the renderer
//!
//! Both buffers are sized for the worst case once, at construction. Each
//! pack writes from index 0 and reports how many entries are valid; the
//! renderer binds the arrays once and narrows its draw range per frame.
//!
//! Layout:
//! - points: `position.xyz`, `color.rgb`, `size`, `seed.xy` per spark
//! - lines: two vertices per segment, `position.xyz` and `color.rgb` each

use glam::Vec3;

use crate::config::SparkConfig;
use crate::spark::Spark;

/// Vertical coordinate that parks unused entries far below any scene
pub const HIDDEN_Y: f32 = -1000.0;

/// One record per live spark: head position, color, size, jitter seed
#[derive(Debug, Clone)]
pub struct PointBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    seeds: Vec<f32>,
    valid_count: usize,
}

impl PointBuffer {
    fn new(capacity: usize) -> Self {
        let mut buffer = Self {
            positions: vec![0.0; capacity * 3],
            colors: vec![0.0; capacity * 3],
            sizes: vec![0.0; capacity],
            seeds: vec![0.0; capacity * 2],
            valid_count: 0,
        };
        for i in 0..capacity {
            buffer.hide(i);
        }
        buffer
    }

    /// Slots available, fixed at construction
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sizes.len()
    }

    /// Entries at the front the renderer should draw
    #[inline]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// All positions, three floats per slot
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// All colors, three floats per slot
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Jitter seeds, two floats per slot (zero when the preset has none)
    #[inline]
    pub fn seeds(&self) -> &[f32] {
        &self.seeds
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        (index < self.capacity()).then(|| Vec3::from_slice(&self.positions[index * 3..]))
    }

    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        (index < self.capacity()).then(|| {
            let c = &self.colors[index * 3..index * 3 + 3];
            [c[0], c[1], c[2]]
        })
    }

    pub fn size(&self, index: usize) -> Option<f32> {
        self.sizes.get(index).copied()
    }

    pub fn seed(&self, index: usize) -> Option<[f32; 2]> {
        (index < self.capacity()).then(|| [self.seeds[index * 2], self.seeds[index * 2 + 1]])
    }

    /// Whether the slot holds the invisible marker
    pub fn is_hidden(&self, index: usize) -> bool {
        index < self.capacity()
            && self.positions[index * 3 + 1] == HIDDEN_Y
            && self.sizes[index] == 0.0
    }

    #[inline]
    fn write(&mut self, index: usize, position: Vec3, color: [f32; 3], size: f32, seed: [f32; 2]) {
        position.write_to_slice(&mut self.positions[index * 3..index * 3 + 3]);
        self.colors[index * 3..index * 3 + 3].copy_from_slice(&color);
        self.sizes[index] = size;
        self.seeds[index * 2..index * 2 + 2].copy_from_slice(&seed);
    }

    #[inline]
    fn hide(&mut self, index: usize) {
        self.positions[index * 3..index * 3 + 3].copy_from_slice(&[0.0, HIDDEN_Y, 0.0]);
        self.colors[index * 3..index * 3 + 3].fill(0.0);
        self.sizes[index] = 0.0;
        self.seeds[index * 2..index * 2 + 2].fill(0.0);
    }
}

/// Trail segments as vertex pairs
#[derive(Debug, Clone)]
pub struct LineBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    valid_vertex_count: usize,
}

impl LineBuffer {
    fn new(segment_capacity: usize) -> Self {
        let vertices = segment_capacity * 2;
        let mut buffer = Self {
            positions: vec![0.0; vertices * 3],
            colors: vec![0.0; vertices * 3],
            valid_vertex_count: 0,
        };
        for v in 0..vertices {
            buffer.hide_vertex(v);
        }
        buffer
    }

    #[inline]
    pub fn segment_capacity(&self) -> usize {
        self.positions.len() / 6
    }

    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.positions.len() / 3
    }

    /// Vertices at the front the renderer should draw (segments × 2)
    #[inline]
    pub fn valid_vertex_count(&self) -> usize {
        self.valid_vertex_count
    }

    #[inline]
    pub fn valid_segment_count(&self) -> usize {
        self.valid_vertex_count / 2
    }

    /// All vertex positions, three floats per vertex
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// All vertex colors, three floats per vertex
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn vertex_position(&self, vertex: usize) -> Option<Vec3> {
        (vertex < self.vertex_capacity()).then(|| Vec3::from_slice(&self.positions[vertex * 3..]))
    }

    pub fn vertex_color(&self, vertex: usize) -> Option<[f32; 3]> {
        (vertex < self.vertex_capacity()).then(|| {
            let c = &self.colors[vertex * 3..vertex * 3 + 3];
            [c[0], c[1], c[2]]
        })
    }

    /// Whether the vertex holds the invisible marker
    pub fn is_hidden(&self, vertex: usize) -> bool {
        vertex < self.vertex_capacity()
            && self.positions[vertex * 3 + 1] == HIDDEN_Y
            && self.colors[vertex * 3..vertex * 3 + 3].iter().all(|&c| c == 0.0)
    }

    #[inline]
    fn write(&mut self, segment: usize, from: Vec3, to: Vec3, from_color: [f32; 3], to_color: [f32; 3]) {
        let base = segment * 6;
        from.write_to_slice(&mut self.positions[base..base + 3]);
        to.write_to_slice(&mut self.positions[base + 3..base + 6]);
        self.colors[base..base + 3].copy_from_slice(&from_color);
        self.colors[base + 3..base + 6].copy_from_slice(&to_color);
    }

    #[inline]
    fn hide_vertex(&mut self, vertex: usize) {
        self.positions[vertex * 3..vertex * 3 + 3].copy_from_slice(&[0.0, HIDDEN_Y, 0.0]);
        self.colors[vertex * 3..vertex * 3 + 3].fill(0.0);
    }
}

/// Converts the live population into [`PointBuffer`] and [`LineBuffer`]
#[derive(Debug, Clone)]
pub struct BufferPacker {
    points: PointBuffer,
    lines: LineBuffer,
}

impl BufferPacker {
    /// Allocate buffers for `config.capacity` sparks and their trails
    pub fn new(config: &SparkConfig) -> Self {
        Self {
            points: PointBuffer::new(config.capacity),
            lines: LineBuffer::new(config.line_segment_capacity()),
        }
    }

    #[inline]
    pub fn points(&self) -> &PointBuffer {
        &self.points
    }

    #[inline]
    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    /// Rewrite both buffers from `sparks`
    ///
    /// Expired sparks are skipped. Slots that were valid on the previous
    /// pack but are not any more get the invisible marker; slots beyond
    /// that were never written or were already hidden.
    pub fn pack(&mut self, sparks: &[Spark], config: &SparkConfig) {
        let point_capacity = self.points.capacity();
        let segment_capacity = self.lines.segment_capacity();
        let mut count = 0;
        let mut segment = 0;

        for spark in sparks.iter().filter(|s| !s.is_expired()) {
            if count >= point_capacity {
                break;
            }

            let ratio = spark.life_ratio();
            let rgb = config.color.rgb(ratio);

            self.points.write(
                count,
                spark.position,
                scale(rgb, ratio),
                spark.size * config.size_curve(ratio),
                spark.seed.unwrap_or([0.0; 2]),
            );
            count += 1;

            let trail_len = spark.trail().len() as f32;
            for (j, (newer, older)) in spark.trail().segments().enumerate() {
                if segment >= segment_capacity {
                    break;
                }
                let fade = (1.0 - j as f32 / trail_len) * ratio;
                let fade_next = (1.0 - (j + 1) as f32 / trail_len) * ratio;
                self.lines.write(
                    segment,
                    newer,
                    older,
                    tint(rgb, config.trail_tint, fade),
                    tint(rgb, config.trail_tint, fade_next),
                );
                segment += 1;
            }
        }

        for i in count..self.points.valid_count {
            self.points.hide(i);
        }
        for v in segment * 2..self.lines.valid_vertex_count {
            self.lines.hide_vertex(v);
        }

        self.points.valid_count = count;
        self.lines.valid_vertex_count = segment * 2;
    }
}

#[inline]
fn scale(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    [rgb[0] * factor, rgb[1] * factor, rgb[2] * factor]
}

#[inline]
fn tint(rgb: [f32; 3], tint: [f32; 3], fade: f32) -> [f32; 3] {
    [
        rgb[0] * fade * tint[0],
        rgb[1] * fade * tint[1],
        rgb[2] * fade * tint[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spark::{BranchState, SparkInit};

    fn config(capacity: usize, trail_length: usize) -> SparkConfig {
        SparkConfig {
            capacity,
            trail_length,
            ..SparkConfig::default()
        }
    }

    fn spark_at(x: f32, trail_length: usize) -> Spark {
        Spark::new(
            &SparkInit::new(Vec3::new(x, 1.0, 0.0), Vec3::ZERO, 1.0, 1.0),
            trail_length,
            BranchState::Counter { count: 0, max: 10 },
            None,
        )
    }

    #[test]
    fn test_buffers_start_hidden() {
        let packer = BufferPacker::new(&config(4, 5));
        assert_eq!(packer.points().capacity(), 4);
        assert_eq!(packer.lines().segment_capacity(), 16);
        assert_eq!(packer.points().valid_count(), 0);
        assert!((0..4).all(|i| packer.points().is_hidden(i)));
        assert!((0..32).all(|v| packer.lines().is_hidden(v)));
    }

    #[test]
    fn test_pack_counts() {
        let cfg = config(4, 5);
        let mut packer = BufferPacker::new(&cfg);
        let sparks = vec![spark_at(0.0, 5), spark_at(1.0, 5)];
        packer.pack(&sparks, &cfg);

        assert_eq!(packer.points().valid_count(), 2);
        assert_eq!(packer.lines().valid_vertex_count(), 2 * 4 * 2);
        assert_eq!(packer.points().position(1), Some(Vec3::new(1.0, 1.0, 0.0)));
        assert!(packer.points().is_hidden(2));
        assert!(packer.points().is_hidden(3));
    }

    #[test]
    fn test_point_record_at_full_life() {
        let cfg = config(2, 3);
        let mut packer = BufferPacker::new(&cfg);
        packer.pack(&[spark_at(0.0, 3)], &cfg);

        let expected = cfg.color.rgb(1.0);
        assert_eq!(packer.points().color(0), Some(expected));
        assert_eq!(packer.points().size(0), Some(cfg.point_size_scale));
    }

    #[test]
    fn test_trail_fade_gradient() {
        let cfg = config(1, 4);
        let mut packer = BufferPacker::new(&cfg);
        let mut s = spark_at(0.0, 4);
        s.life = 0.5;
        packer.pack(&[s], &cfg);

        let rgb = cfg.color.rgb(0.5);
        let lines = packer.lines();
        // vertex 0 is the newest sample: fade = (1 - 0/4) * 0.5
        let first = lines.vertex_color(0).unwrap();
        assert!((first[0] - rgb[0] * 0.5 * cfg.trail_tint[0]).abs() < 1e-6);
        assert!((first[1] - rgb[1] * 0.5 * cfg.trail_tint[1]).abs() < 1e-6);
        // vertex 5 ends the last segment: fade = (1 - 3/4) * 0.5
        let last = lines.vertex_color(5).unwrap();
        assert!((last[2] - rgb[2] * 0.125 * cfg.trail_tint[2]).abs() < 1e-6);
        // shared endpoints of consecutive segments match
        assert_eq!(lines.vertex_color(1), lines.vertex_color(2));
    }

    #[test]
    fn test_shrinking_population_hides_stale_slots() {
        let cfg = config(3, 3);
        let mut packer = BufferPacker::new(&cfg);
        let sparks: Vec<_> = (0..3).map(|i| spark_at(i as f32, 3)).collect();
        packer.pack(&sparks, &cfg);
        assert_eq!(packer.lines().valid_vertex_count(), 12);

        packer.pack(&sparks[..1], &cfg);
        assert_eq!(packer.points().valid_count(), 1);
        assert!(packer.points().is_hidden(1));
        assert!(packer.points().is_hidden(2));
        assert_eq!(packer.lines().valid_vertex_count(), 4);
        assert!((4..12).all(|v| packer.lines().is_hidden(v)));
    }

    #[test]
    fn test_expired_sparks_are_skipped() {
        let cfg = config(2, 2);
        let mut packer = BufferPacker::new(&cfg);
        let mut dead = spark_at(5.0, 2);
        dead.life = -0.01;
        packer.pack(&[dead, spark_at(1.0, 2)], &cfg);
        assert_eq!(packer.points().valid_count(), 1);
        assert_eq!(packer.points().position(0), Some(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_zero_capacity_packs_nothing() {
        let cfg = config(0, 4);
        let mut packer = BufferPacker::new(&cfg);
        packer.pack(&[spark_at(0.0, 4)], &cfg);
        assert_eq!(packer.points().valid_count(), 0);
        assert_eq!(packer.lines().valid_vertex_count(), 0);
    }

    #[test]
    fn test_single_sample_trail_emits_no_segments() {
        let cfg = config(2, 1);
        let mut packer = BufferPacker::new(&cfg);
        packer.pack(&[spark_at(0.0, 1)], &cfg);
        assert_eq!(packer.points().valid_count(), 1);
        assert_eq!(packer.lines().vertex_capacity(), 0);
        assert_eq!(packer.lines().valid_vertex_count(), 0);
    }
}
