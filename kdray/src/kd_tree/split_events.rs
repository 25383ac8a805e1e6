use std::cmp::Ordering;

use super::{KdTreeConfig, PrimitiveBounds};
use crate::{Axis, BoundingBox};

/// Place where a primitive's bounding box starts or ends along an axis - a
/// candidate for a splitting plane.
#[derive(Clone, Copy, Debug)]
pub struct SplitEvent {
    position: f32,
    primitive_id: u32,
    kind: SplitEventKind,
}

impl SplitEvent {
    fn new(position: f32, primitive_id: u32, kind: SplitEventKind) -> Self {
        // Events must be totally ordered, which NaN would break
        assert!(
            !position.is_nan(),
            "primitive {} has a NaN bound",
            primitive_id,
        );

        Self {
            position,
            primitive_id,
            kind,
        }
    }

    pub fn start(position: f32, primitive_id: u32) -> Self {
        Self::new(position, primitive_id, SplitEventKind::Start)
    }

    pub fn end(position: f32, primitive_id: u32) -> Self {
        Self::new(position, primitive_id, SplitEventKind::End)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn primitive_id(&self) -> u32 {
        self.primitive_id
    }

    pub fn kind(&self) -> SplitEventKind {
        self.kind
    }
}

impl PartialEq for SplitEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitEvent {}

impl PartialOrd for SplitEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitEvent {
    /// Orders events by their position; at the same position, ends go before
    /// starts so that primitives which merely touch aren't counted as
    /// overlapping the plane.
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .partial_cmp(&other.position)
            .unwrap_or(Ordering::Equal)
            .then(self.kind.cmp(&other.kind))
            .then(self.primitive_id.cmp(&other.primitive_id))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SplitEventKind {
    End,
    Start,
}

/// Best splitting plane found by sweeping through events of a single axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate {
    pub axis: Axis,
    pub offset: usize,
    pub position: f32,
    pub cost: f32,
}

/// Scratch buffers of events, one per axis, shared by all nodes of the tree
/// being built.
#[derive(Debug, Default)]
pub struct SplitEvents {
    events: [Vec<SplitEvent>; 3],
}

impl SplitEvents {
    pub fn new(primitive_count: usize) -> Self {
        Self {
            events: Axis::all()
                .map(|_| Vec::with_capacity(2 * primitive_count)),
        }
    }

    /// Fills events of given axis with the starts and ends of given
    /// primitives, sorted.
    pub fn fill(
        &mut self,
        axis: Axis,
        primitive_ids: &[u32],
        primitives: &[PrimitiveBounds],
    ) -> &[SplitEvent] {
        let events = &mut self.events[axis as usize];

        events.clear();

        for &primitive_id in primitive_ids {
            let bounds = primitives[primitive_id as usize].bounds;

            events.push(SplitEvent::start(bounds.min()[axis], primitive_id));
            events.push(SplitEvent::end(bounds.max()[axis], primitive_id));
        }

        events.sort_unstable();
        events
    }

    pub fn get(&self, axis: Axis) -> &[SplitEvent] {
        &self.events[axis as usize]
    }
}

/// Sweeps through sorted events of given axis and returns the cheapest split
/// according to the surface area heuristic, or `None` if no event lies
/// strictly inside `bounds`.
///
/// Thanks to:
/// - Pharr, Jakob & Humphreys, "Physically Based Rendering", 4.4.
pub fn find_split(
    config: &KdTreeConfig,
    events: &[SplitEvent],
    bounds: BoundingBox,
    axis: Axis,
) -> Option<SplitCandidate> {
    let extent = bounds.extent();
    let total_area = bounds.area();
    let inv_total_area = 1.0 / total_area;

    let [other0, other1] = axis.others();
    let cap_area = extent[other0] * extent[other1];
    let cap_perimeter = extent[other0] + extent[other1];

    let min = bounds.min()[axis];
    let max = bounds.max()[axis];

    let mut best: Option<SplitCandidate> = None;
    let mut best_cost = 1e30;
    let mut below = 0;
    let mut above = events.len() / 2;

    for (offset, event) in events.iter().enumerate() {
        if event.kind == SplitEventKind::End {
            above -= 1;
        }

        let position = event.position;

        if position > min && position < max {
            let below_area =
                2.0 * (cap_area + (position - min) * cap_perimeter);

            let above_area =
                2.0 * (cap_area + (max - position) * cap_perimeter);

            let below_prob = below_area * inv_total_area;
            let above_prob = above_area * inv_total_area;

            let empty_bonus = if below == 0 || above == 0 {
                config.empty_bonus
            } else {
                0.0
            };

            let cost = config.traversal_cost
                + config.intersect_cost
                    * (1.0 - empty_bonus)
                    * (below_prob * (below as f32)
                        + above_prob * (above as f32));

            if cost < best_cost {
                best_cost = cost;

                best = Some(SplitCandidate {
                    axis,
                    offset,
                    position,
                    cost,
                });
            }
        }

        if event.kind == SplitEventKind::Start {
            below += 1;
        }
    }

    best
}

/// Distributes primitives around the split at `offset`: primitives starting
/// before it go below, primitives ending after it go above (primitives
/// straddling the split go to both sides).
///
/// Primitives lying flat in the splitting plane go below.
pub fn partition(events: &[SplitEvent], offset: usize) -> (Vec<u32>, Vec<u32>) {
    let position = events[offset].position;

    let mut below: Vec<u32> = events[..offset]
        .iter()
        .filter(|event| event.kind == SplitEventKind::Start)
        .map(|event| event.primitive_id)
        .collect();

    let above = events[offset + 1..]
        .iter()
        .filter(|event| event.kind == SplitEventKind::End)
        .map(|event| event.primitive_id)
        .collect();

    // A flat primitive has both of its events at `position`, end first; when
    // `offset` lands on or between them, it's neither started before the
    // split nor ended after it, so it must be picked up separately
    let mut ended: Vec<u32> = events[..=offset]
        .iter()
        .rev()
        .take_while(|event| event.position == position)
        .filter(|event| event.kind == SplitEventKind::End)
        .map(|event| event.primitive_id)
        .collect();

    ended.sort_unstable();

    below.extend(
        events[offset..]
            .iter()
            .take_while(|event| event.position == position)
            .filter(|event| {
                event.kind == SplitEventKind::Start
                    && ended.binary_search(&event.primitive_id).is_ok()
            })
            .map(|event| event.primitive_id),
    );

    (below, above)
}
