use crate::core::geo::Point;
use crate::data::formats::StopId;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A drawn stop marker position, indexed for hover hit-testing
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedStop {
    pub id: StopId,
    pub position: Point,
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for IndexedStop {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.x, self.position.y])
    }
}

impl PointDistance for IndexedStop {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position.x - point[0];
        let dy = self.position.y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree of stop marker centres in pixel coordinates
#[derive(Default)]
pub struct StopIndex {
    rtree: RTree<IndexedStop>,
}

impl StopIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: StopId, position: Point) {
        self.rtree.insert(IndexedStop { id, position });
    }

    /// Nearest stop whose centre lies within `radius` pixels of `position`
    pub fn nearest_within(&self, position: Point, radius: f64) -> Option<&IndexedStop> {
        let query = [position.x, position.y];
        self.rtree
            .nearest_neighbor(&query)
            .filter(|stop| stop.distance_2(&query) <= radius * radius)
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
