use glam::Vec3;

use crate::{BoundingBox, Triangle};

/// Bounding box of a single primitive, precomputed before the build so that
/// the builder never has to look at the geometry itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveBounds {
    pub bounds: BoundingBox,

    /// Center of `bounds`; the k-d tree builder itself doesn't read it, it's
    /// here for callers of [`crate::KdTree::build_from_bounds()`] that order
    /// or bin primitives by their centroids.
    pub center: Vec3,
}

impl PrimitiveBounds {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            center: bounds.center(),
        }
    }

    /// Computes bounds of all triangles, returning them together with the
    /// bounds of the entire scene.
    pub fn compute(triangles: &[Triangle]) -> (Vec<Self>, BoundingBox) {
        let primitives: Vec<_> = triangles
            .iter()
            .map(|triangle| Self::new(triangle.bounds()))
            .collect();

        let bounds = primitives.iter().map(|prim| prim.bounds).collect();

        (primitives, bounds)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn compute() {
        let triangles = [
            Triangle::new([
                vec3(0.0, 0.0, 0.0),
                vec3(2.0, 0.0, 0.0),
                vec3(0.0, 2.0, 0.0),
            ]),
            Triangle::new([
                vec3(-1.0, 5.0, 1.0),
                vec3(-1.0, 6.0, 3.0),
                vec3(-2.0, 5.0, 1.0),
            ]),
        ];

        let (primitives, bounds) = PrimitiveBounds::compute(&triangles);

        assert_eq!(2, primitives.len());
        assert_eq!(vec3(1.0, 1.0, 0.0), primitives[0].center);
        assert_eq!(vec3(-1.5, 5.5, 2.0), primitives[1].center);
        assert_eq!(vec3(-2.0, 0.0, 0.0), bounds.min());
        assert_eq!(vec3(2.0, 6.0, 3.0), bounds.max());
    }

    #[test]
    fn compute_empty() {
        let (primitives, bounds) = PrimitiveBounds::compute(&[]);

        assert!(primitives.is_empty());
        assert!(!bounds.is_set());
    }
}
