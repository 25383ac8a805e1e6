use std::fmt;

use crate::{gpu, Axis};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KdNode {
    /// Node split by a plane perpendicular to `axis`; its below-child is the
    /// node that directly follows it, its above-child is `above_id`.
    Interior {
        axis: Axis,
        split_at: f32,
        above_id: KdNodeId,
    },

    /// Node referencing `indices[offset..offset + count]`.
    Leaf { offset: u32, count: u32 },
}

impl KdNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub fn serialize(&self) -> gpu::KdNode {
        match *self {
            KdNode::Interior {
                axis,
                split_at,
                above_id,
            } => gpu::KdNode::interior(axis.id(), above_id.get(), split_at),

            KdNode::Leaf { offset, count } => gpu::KdNode::leaf(offset, count),
        }
    }

    pub fn deserialize(node: gpu::KdNode) -> Self {
        if let Some(axis) = Axis::from_id(node.split_axis()) {
            KdNode::Interior {
                axis,
                split_at: node.split_position(),
                above_id: KdNodeId::new(node.above_child()),
            }
        } else {
            KdNode::Leaf {
                offset: node.primitive_offset(),
                count: node.primitive_count(),
            }
        }
    }
}

impl fmt::Display for KdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdNode::Interior {
                axis,
                split_at,
                above_id,
            } => write!(
                f,
                "split {} at {}, above: #{}",
                axis, split_at, above_id
            ),

            KdNode::Leaf { offset, count } => {
                write!(f, "leaf {}..{}", offset, offset + count)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KdNodeId(u32);

impl KdNodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn root() -> Self {
        Self::new(0)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns id of this node's below-child, assuming this node is interior.
    pub fn below(&self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl fmt::Display for KdNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let nodes = [
            KdNode::Leaf {
                offset: 10,
                count: 3,
            },
            KdNode::Leaf {
                offset: 0,
                count: 0,
            },
            KdNode::Interior {
                axis: Axis::X,
                split_at: 1.25,
                above_id: KdNodeId::new(7),
            },
            KdNode::Interior {
                axis: Axis::Z,
                split_at: -3.5,
                above_id: KdNodeId::new(123_456),
            },
        ];

        for node in nodes {
            assert_eq!(node, KdNode::deserialize(node.serialize()));
        }
    }

    #[test]
    fn serialization_layout() {
        let node = KdNode::Interior {
            axis: Axis::Y,
            split_at: 2.0,
            above_id: KdNodeId::new(5),
        };

        let node = node.serialize();

        assert_eq!(2.0f32.to_bits(), node.d0);
        assert_eq!(1 | (5 << 2), node.d1);

        let node = KdNode::Leaf {
            offset: 42,
            count: 0,
        };

        // Empty leaves don't point anywhere
        assert_eq!(gpu::KdNode { d0: 0, d1: 3 }, node.serialize());
    }
}
