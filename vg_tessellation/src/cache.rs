//! Partition-verification cache (§4.7): lets an animated vertex set
//! reuse a prior triangulation across frames as long as every convex
//! piece of that triangulation is still convex under the new
//! positions.

use crate::triangulate;
use vg_geom::Point;

/// A single cached triangulation: the convex partition that was
/// verified against some past vertex set, the triangle indices it
/// produced, and LRU/pinning bookkeeping.
#[derive(Clone, Debug)]
pub struct Triangulation {
    pub partition: Vec<Vec<u32>>,
    pub triangles: Vec<[u32; 3]>,
    pub use_count: u32,
    pub is_keyframe: bool,
}

pub const DEFAULT_CAPACITY: usize = 8;

/// Convexity tolerance for the cache's re-verification pass, matching
/// §4.7's "ε ≈ 1e-2 in vertex units".
const CONVEXITY_EPS: f32 = 1e-2;

/// Bounded LRU of `Triangulation`s, ordered most-recently-used first.
/// `is_keyframe` entries are pinned against eviction.
pub struct TriangulationCache {
    entries: Vec<Triangulation>,
    capacity: usize,
}

impl Default for TriangulationCache {
    fn default() -> Self {
        TriangulationCache::new(DEFAULT_CAPACITY)
    }
}

impl TriangulationCache {
    pub fn new(capacity: usize) -> Self {
        TriangulationCache { entries: Vec::new(), capacity }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks for a cached triangulation whose every partition piece is
    /// still convex under `points`'s current positions. On a hit,
    /// bumps `use_count`, moves the entry to the front, and returns its
    /// triangles; the caller's "triangles changed" signal is `false`.
    pub fn find_and_touch(&mut self, points: &[Point]) -> Option<Vec<[u32; 3]>> {
        let hit = self
            .entries
            .iter()
            .position(|e| e.partition.iter().all(|piece| triangulate::is_convex(piece, points, CONVEXITY_EPS)))?;
        self.entries[hit].use_count += 1;
        let entry = self.entries.remove(hit);
        let triangles = entry.triangles.clone();
        self.entries.insert(0, entry);
        Some(triangles)
    }

    /// Inserts a freshly computed triangulation, evicting the
    /// least-recently-used non-keyframe entry first if at capacity.
    /// If every entry is pinned, the cache is allowed to grow past
    /// capacity rather than evict a keyframe.
    pub fn insert(&mut self, partition: Vec<Vec<u32>>, triangles: Vec<[u32; 3]>, is_keyframe: bool) {
        if self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.entries.insert(0, Triangulation { partition, triangles, use_count: 1, is_keyframe });
    }

    fn evict_one(&mut self) {
        // Entries are ordered MRU-first, so position is the recency
        // signal; among non-keyframe entries, evict the one furthest
        // from the front, with ties (equal distance doesn't occur
        // here, so in practice this only matters when use_count is
        // compared among entries the caller inserted at the same
        // time) broken by smallest use_count.
        let victim = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_keyframe)
            .max_by_key(|(i, e)| (*i, std::cmp::Reverse(e.use_count)))
            .map(|(i, _)| i);
        if let Some(idx) = victim {
            self.entries.remove(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            vg_geom::point(0.0, 0.0),
            vg_geom::point(10.0, 0.0),
            vg_geom::point(10.0, 10.0),
            vg_geom::point(0.0, 10.0),
        ]
    }

    #[test]
    fn cache_hit_after_small_jiggle() {
        let pts = square();
        let indices: Vec<u32> = (0..4).collect();
        let (partition, triangles) = triangulate::triangulate_polygon(&indices, &pts).unwrap();

        let mut cache = TriangulationCache::default();
        cache.insert(partition, triangles, false);

        let jiggled = vec![
            vg_geom::point(0.01, -0.01),
            vg_geom::point(9.99, 0.02),
            vg_geom::point(10.02, 9.98),
            vg_geom::point(-0.01, 10.01),
        ];
        let hit = cache.find_and_touch(&jiggled);
        assert!(hit.is_some());
        assert_eq!(cache.entries[0].use_count, 2);
    }

    #[test]
    fn keyframe_entries_are_never_evicted() {
        let pts = square();
        let indices: Vec<u32> = (0..4).collect();
        let (partition, triangles) = triangulate::triangulate_polygon(&indices, &pts).unwrap();
        let mut cache = TriangulationCache::new(1);
        cache.insert(partition.clone(), triangles.clone(), true);
        cache.insert(partition, triangles, false);
        assert!(cache.entries.iter().any(|e| e.is_keyframe));
    }
}
