//! R-tree index over planar vertex positions.
//!
//! Used where a query needs the k nearest survey points regardless of which
//! polyline (or which end of it) they came from, e.g. re-deriving elevation
//! for synthesized bridge vertices.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::Vertex;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its position in the
/// caller's vertex list.
#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2],
    slot:  usize,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── VertexIndex ───────────────────────────────────────────────────────────────

/// Bulk-loaded spatial index over a fixed vertex list.
pub struct VertexIndex {
    tree: RTree<VertexEntry>,
}

impl VertexIndex {
    /// Index `vertices`; query results are positions in this slice.
    pub fn build(vertices: &[Vertex]) -> Self {
        let entries: Vec<VertexEntry> = vertices
            .iter()
            .enumerate()
            .map(|(slot, v)| VertexEntry { point: v.xy(), slot })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slot of the vertex nearest to `(x, y)`; `None` only for an empty index.
    pub fn nearest(&self, x: f64, y: f64) -> Option<usize> {
        self.tree.nearest_neighbor(&[x, y]).map(|e| e.slot)
    }

    /// Up to `k` nearest slots to `(x, y)`, sorted by ascending distance.
    pub fn k_nearest(&self, x: f64, y: f64, k: usize) -> Vec<usize> {
        self.tree
            .nearest_neighbor_iter(&[x, y])
            .take(k)
            .map(|e| e.slot)
            .collect()
    }
}
