mod builder;
mod config;
mod indices;
mod node;
mod nodes;
mod primitive_bounds;
mod split_events;
mod stats;

use std::fmt;
use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

pub use self::config::*;
use self::indices::*;
pub use self::node::*;
use self::nodes::*;
pub use self::primitive_bounds::*;
use self::split_events::{find_split, partition, SplitCandidate, SplitEvents};
pub use self::split_events::{SplitEvent, SplitEventKind};
pub use self::stats::*;
use crate::{gpu, measure, BoundingBox, Triangle};

/// K-d tree built over a triangle soup, stored in its GPU-ready form.
///
/// Nodes are laid out depth-first: the root is `#0`, an interior node's
/// below-child directly follows it and its above-child is referenced
/// explicitly. Leaves point into `indices`, which hold ids of triangles in
/// the order they were given to [`KdTree::build()`].
#[derive(Clone, Debug)]
pub struct KdTree {
    config: KdTreeConfig,
    max_depth: u32,
    bounds: BoundingBox,
    nodes: Vec<gpu::KdNode>,
    indices: Vec<u32>,
}

impl KdTree {
    pub fn build(triangles: &[Triangle], config: KdTreeConfig) -> Self {
        log::info!("Building k-d tree; triangles = {}", triangles.len());

        let (primitives, bounds) = PrimitiveBounds::compute(triangles);

        Self::build_ex(&primitives, bounds, config)
    }

    /// Builds tree over already-computed primitive bounds; useful for
    /// primitives other than triangles.
    pub fn build_from_bounds(
        primitives: &[PrimitiveBounds],
        config: KdTreeConfig,
    ) -> Self {
        log::info!("Building k-d tree; primitives = {}", primitives.len());

        let bounds = primitives.iter().map(|prim| prim.bounds).collect();

        Self::build_ex(primitives, bounds, config)
    }

    fn build_ex(
        primitives: &[PrimitiveBounds],
        bounds: BoundingBox,
        config: KdTreeConfig,
    ) -> Self {
        let max_depth = config.max_depth_for(primitives.len());

        log::debug!(
            "Using max-depth = {}, max-prims-in-node = {}",
            max_depth,
            config.max_prims_in_node,
        );

        let (nodes, indices) = measure("Building k-d tree", || {
            builder::run(&config, max_depth, primitives, bounds)
        });

        let this = Self {
            config,
            max_depth,
            bounds,
            nodes: nodes.into_vec(),
            indices: indices.into_vec(),
        };

        log::info!(
            "K-d tree ready; total number of nodes = {}, total number of \
             indices = {}",
            this.node_count(),
            this.index_count(),
        );

        log::debug!("K-d tree statistics: {}", this.stats());

        this
    }

    /// Returns bounds of the entire scene, i.e. of the root node.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn nodes(&self) -> &[gpu::KdNode] {
        &self.nodes
    }

    /// Returns decoded node.
    ///
    /// Panics if `id` is out of bounds.
    pub fn node(&self, id: KdNodeId) -> KdNode {
        KdNode::deserialize(self.nodes[id.get() as usize])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns ids of primitives referenced by given node; empty for interior
    /// nodes.
    pub fn primitives_of(&self, node: KdNode) -> &[u32] {
        match node {
            KdNode::Leaf { offset, count } if count > 0 => {
                &self.indices[offset as usize..(offset + count) as usize]
            }
            _ => &[],
        }
    }

    /// Returns the maximum depth this tree was built with, i.e. either the
    /// configured one or the one derived from the number of primitives.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn config(&self) -> &KdTreeConfig {
        &self.config
    }

    pub fn nodes_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    pub fn indices_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Returns a digest of nodes and indices; two trees built from the same
    /// input with the same config always have the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();

        self.nodes.hash(&mut hasher);
        self.indices.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns an iterator over all nodes, in the order they are stored.
    pub fn iter(&self) -> KdTreeIter<'_> {
        KdTreeIter {
            tree: self,
            stack: vec![(KdNodeId::root(), self.bounds, 0)],
        }
    }

    /// Visits all nodes, in the order they are stored.
    pub fn walk(&self, mut visit: impl FnMut(KdNodeVisit)) {
        for node in self.iter() {
            visit(node);
        }
    }

    pub fn stats(&self) -> KdTreeStats {
        let mut stats = KdTreeStats {
            nodes: self.node_count(),
            indices: self.index_count(),
            ..Default::default()
        };

        for visit in self.iter() {
            stats.max_depth = stats.max_depth.max(visit.depth);

            match visit.node {
                KdNode::Interior { .. } => {
                    stats.interiors += 1;
                }

                KdNode::Leaf { count, .. } => {
                    stats.leaves += 1;
                    stats.max_leaf_size =
                        stats.max_leaf_size.max(count as usize);

                    if count == 0 {
                        stats.empty_leaves += 1;
                    }
                }
            }
        }

        stats
    }
}

impl fmt::Display for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_LISTED_PRIMITIVES: usize = 8;

        for visit in self.iter() {
            write!(
                f,
                "{}#{}: {}",
                "| ".repeat(visit.depth as usize),
                visit.id,
                visit.node,
            )?;

            let primitives = self.primitives_of(visit.node);

            if !primitives.is_empty() {
                write!(f, ":")?;

                for id in primitives.iter().take(MAX_LISTED_PRIMITIVES) {
                    write!(f, " {}", id)?;
                }

                if primitives.len() > MAX_LISTED_PRIMITIVES {
                    write!(
                        f,
                        " (+{} more)",
                        primitives.len() - MAX_LISTED_PRIMITIVES
                    )?;
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// Node visited by [`KdTree::iter()`], together with the information that's
/// not stored in the node itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KdNodeVisit {
    pub id: KdNodeId,
    pub node: KdNode,

    /// Bounds of the node, i.e. the scene's bounds clipped by all the split
    /// planes on the way from root to this node.
    pub bounds: BoundingBox,

    /// Distance from root; root's depth is zero.
    pub depth: u32,
}

#[derive(Clone, Debug)]
pub struct KdTreeIter<'a> {
    tree: &'a KdTree,
    stack: Vec<(KdNodeId, BoundingBox, u32)>,
}

impl Iterator for KdTreeIter<'_> {
    type Item = KdNodeVisit;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, bounds, depth) = self.stack.pop()?;
        let node = self.tree.node(id);

        if let KdNode::Interior {
            axis,
            split_at,
            above_id,
        } = node
        {
            // Below-child goes on top, so that nodes come out in pre-order,
            // which is the order they are stored in
            self.stack.push((
                above_id,
                bounds.with_min_at(axis, split_at),
                depth + 1,
            ));

            self.stack.push((
                id.below(),
                bounds.with_max_at(axis, split_at),
                depth + 1,
            ));
        }

        Some(KdNodeVisit {
            id,
            node,
            bounds,
            depth,
        })
    }
}
