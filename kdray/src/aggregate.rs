use crate::{gpu, measure, KdTree, KdTreeConfig, Triangle};

/// Everything the GPU needs to trace rays through a scene: the k-d tree, the
/// triangles it references (in the Woop form) and the scene's bounds.
///
/// Triangle ids stored in the tree's leaves index `woop_triangles()`
/// directly.
#[derive(Clone, Debug)]
pub struct Aggregate {
    tree: KdTree,
    woop_triangles: Vec<gpu::WoopTriangle>,
}

impl Aggregate {
    pub fn new(triangles: &[Triangle], config: KdTreeConfig) -> Self {
        let tree = KdTree::build(triangles, config);

        let woop_triangles = measure("Serializing triangles", || {
            triangles.iter().map(Triangle::serialize).collect()
        });

        Self {
            tree,
            woop_triangles,
        }
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    pub fn woop_triangles(&self) -> &[gpu::WoopTriangle] {
        &self.woop_triangles
    }

    pub fn bounds(&self) -> gpu::BoundingBox {
        self.tree.bounds().serialize()
    }

    pub fn nodes_as_bytes(&self) -> &[u8] {
        self.tree.nodes_as_bytes()
    }

    pub fn indices_as_bytes(&self) -> &[u8] {
        self.tree.indices_as_bytes()
    }

    pub fn woop_triangles_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.woop_triangles)
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, vec4};

    use super::*;

    #[test]
    fn smoke() {
        let triangles = [
            Triangle::new([
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ]),
            Triangle::new([
                vec3(5.0, 0.0, 0.0),
                vec3(6.0, 0.0, 0.0),
                vec3(5.0, 1.0, 2.0),
            ]),
            // Degenerate, but still has to occupy its slot
            Triangle::new([
                vec3(1.0, 1.0, 1.0),
                vec3(1.0, 1.0, 1.0),
                vec3(1.0, 1.0, 1.0),
            ]),
        ];

        let target = Aggregate::new(&triangles, KdTreeConfig::default());

        assert_eq!(3, target.woop_triangles().len());
        assert_eq!(gpu::WoopTriangle::default(), target.woop_triangles()[2]);
        assert_eq!(3 * 48, target.woop_triangles_as_bytes().len());

        assert_eq!(vec4(0.0, 0.0, 0.0, 0.0), target.bounds().min);
        assert_eq!(vec4(6.0, 1.0, 2.0, 0.0), target.bounds().max);

        assert_eq!(
            8 * target.tree().node_count(),
            target.nodes_as_bytes().len()
        );

        assert_eq!(
            4 * target.tree().index_count(),
            target.indices_as_bytes().len()
        );

        assert_eq!(triangles[0].serialize(), target.woop_triangles()[0]);
    }
}
