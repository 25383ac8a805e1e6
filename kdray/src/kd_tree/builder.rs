use super::{
    find_split, partition, KdIndices, KdNode, KdNodeId, KdNodes, KdTreeConfig,
    PrimitiveBounds, SplitCandidate, SplitEvents,
};
use crate::BoundingBox;

/// Builds k-d tree using the surface area heuristic, returning its nodes and
/// the primitive ids referenced by its leaves.
///
/// Nodes are emitted depth-first, below-child before above-child, which is
/// what makes the below-child's id implicit: it's always `parent + 1`.
///
/// Thanks to:
/// - Pharr, Jakob & Humphreys, "Physically Based Rendering", 4.4,
/// - Wald & Havran, "On building fast kd-Trees for Ray Tracing, and on doing
///   that in O(N log N)".
pub fn run(
    config: &KdTreeConfig,
    max_depth: u32,
    primitives: &[PrimitiveBounds],
    bounds: BoundingBox,
) -> (KdNodes, KdIndices) {
    let mut builder = Builder {
        config,
        max_depth,
        primitives,
        events: SplitEvents::new(primitives.len()),
        nodes: KdNodes::default(),
        indices: KdIndices::default(),
    };

    let primitive_ids: Vec<u32> = (0..primitives.len() as u32).collect();

    builder.build(KdNodeId::root(), &primitive_ids, bounds, 0, 0);

    (builder.nodes, builder.indices)
}

struct Builder<'a> {
    config: &'a KdTreeConfig,
    max_depth: u32,
    primitives: &'a [PrimitiveBounds],
    events: SplitEvents,
    nodes: KdNodes,
    indices: KdIndices,
}

impl Builder<'_> {
    fn build(
        &mut self,
        id: KdNodeId,
        primitive_ids: &[u32],
        bounds: BoundingBox,
        mut bad_refines: u32,
        depth: u32,
    ) {
        self.nodes.allocate(id);

        let count = primitive_ids.len() as u32;

        if count <= self.config.max_prims_in_node || depth > self.max_depth {
            self.add_leaf(id, primitive_ids);
            return;
        }

        let Some(split) = self.find_split(primitive_ids, bounds) else {
            log::trace!(
                "#{}: no split for {} primitives; creating leaf",
                id,
                count,
            );

            self.add_leaf(id, primitive_ids);
            return;
        };

        let leaf_cost = self.config.intersect_cost * (count as f32);

        if split.cost > leaf_cost {
            bad_refines += 1;
        }

        let is_split_too_expensive = split.cost
            > self.config.bad_cost_ratio * leaf_cost
            && count < self.config.max_prims_in_node;

        if is_split_too_expensive
            || bad_refines >= self.config.bad_refine_limit
        {
            log::trace!(
                "#{}: split cost {} vs leaf cost {} (bad refines: {}); \
                 creating leaf",
                id,
                split.cost,
                leaf_cost,
                bad_refines,
            );

            self.add_leaf(id, primitive_ids);
            return;
        }

        // ---

        let (below_ids, above_ids) =
            partition(self.events.get(split.axis), split.offset);

        log::trace!(
            "#{}: splitting {} primitives by {} at {} into {} + {}",
            id,
            count,
            split.axis,
            split.position,
            below_ids.len(),
            above_ids.len(),
        );

        self.build(
            id.below(),
            &below_ids,
            bounds.with_max_at(split.axis, split.position),
            bad_refines,
            depth + 1,
        );

        let above_id = self.nodes.next_id();

        self.nodes.set(
            id,
            KdNode::Interior {
                axis: split.axis,
                split_at: split.position,
                above_id,
            },
        );

        self.build(
            above_id,
            &above_ids,
            bounds.with_min_at(split.axis, split.position),
            bad_refines,
            depth + 1,
        );
    }

    /// Looks for the best split, starting on the longest axis and moving onto
    /// the next ones only if the current axis has no split candidates at all.
    fn find_split(
        &mut self,
        primitive_ids: &[u32],
        bounds: BoundingBox,
    ) -> Option<SplitCandidate> {
        let mut axis = bounds.longest_axis();

        for _ in 0..3 {
            let events = self.events.fill(axis, primitive_ids, self.primitives);

            if let Some(split) = find_split(self.config, events, bounds, axis) {
                return Some(split);
            }

            axis = axis.next();
        }

        None
    }

    fn add_leaf(&mut self, id: KdNodeId, primitive_ids: &[u32]) {
        let offset = self.indices.add(primitive_ids);

        self.nodes.set(
            id,
            KdNode::Leaf {
                offset,
                count: primitive_ids.len() as u32,
            },
        );
    }
}
