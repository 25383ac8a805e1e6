use bytemuck::{Pod, Zeroable};

/// K-d tree node, as seen by the traversal kernel.
///
/// Every node takes exactly two words:
///
/// - `d0` holds the split position's bits for interior nodes, or the offset
///   of the node's first primitive (within the index buffer) for leaves,
///
/// - `d1` holds a two-bit tag in its lowest bits (0, 1 or 2 for interior
///   nodes, selecting the split axis; [`Self::LEAF_TAG`] for leaves), and the
///   payload above it: the above-child's id for interior nodes or the number
///   of primitives for leaves.
///
/// The below-child of an interior node is never stored - it's always the node
/// that immediately follows its parent.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq, Eq, Hash))]
pub struct KdNode {
    pub d0: u32,
    pub d1: u32,
}

impl KdNode {
    pub const LEAF_TAG: u32 = 3;
    pub const TAG_BITS: u32 = 2;
    pub const TAG_MASK: u32 = (1 << Self::TAG_BITS) - 1;
    pub const MAX_PAYLOAD: u32 = u32::MAX >> Self::TAG_BITS;

    pub fn leaf(primitive_offset: u32, primitive_count: u32) -> Self {
        assert!(
            primitive_count <= Self::MAX_PAYLOAD,
            "leaf holds too many primitives to be packed: {}",
            primitive_count,
        );

        let primitive_offset = if primitive_count == 0 {
            0
        } else {
            primitive_offset
        };

        Self {
            d0: primitive_offset,
            d1: Self::LEAF_TAG | (primitive_count << Self::TAG_BITS),
        }
    }

    pub fn interior(axis: u32, above_child: u32, split_position: f32) -> Self {
        assert!(axis < Self::LEAF_TAG, "invalid split axis: {}", axis);

        assert!(
            above_child <= Self::MAX_PAYLOAD,
            "above-child id is too large to be packed: {}",
            above_child,
        );

        Self {
            d0: split_position.to_bits(),
            d1: axis | (above_child << Self::TAG_BITS),
        }
    }

    pub fn tag(self) -> u32 {
        self.d1 & Self::TAG_MASK
    }

    pub fn is_leaf(self) -> bool {
        self.tag() == Self::LEAF_TAG
    }

    pub fn payload(self) -> u32 {
        self.d1 >> Self::TAG_BITS
    }

    /// Returns the split axis; meaningful only for interior nodes.
    pub fn split_axis(self) -> u32 {
        self.tag()
    }

    /// Returns the split position; meaningful only for interior nodes.
    pub fn split_position(self) -> f32 {
        f32::from_bits(self.d0)
    }

    /// Returns the above-child's id; meaningful only for interior nodes.
    pub fn above_child(self) -> u32 {
        self.payload()
    }

    pub fn primitive_offset(self) -> u32 {
        self.d0
    }

    pub fn primitive_count(self) -> u32 {
        self.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf() {
        let target = KdNode::leaf(1234, 56);

        assert!(target.is_leaf());
        assert_eq!(3, target.tag());
        assert_eq!(1234, target.primitive_offset());
        assert_eq!(56, target.primitive_count());
        assert_eq!(3 | (56 << 2), target.d1);
    }

    #[test]
    fn empty_leaf() {
        let target = KdNode::leaf(1234, 0);

        assert!(target.is_leaf());
        assert_eq!(0, target.primitive_offset());
        assert_eq!(0, target.primitive_count());
    }

    #[test]
    fn interior() {
        for axis in 0..3 {
            let target = KdNode::interior(axis, 0x0fff_ffff, -12.5);

            assert!(!target.is_leaf());
            assert_eq!(axis, target.split_axis());
            assert_eq!(0x0fff_ffff, target.above_child());
            assert_eq!(-12.5, target.split_position());
        }
    }

    #[test]
    fn size() {
        assert_eq!(8, core::mem::size_of::<KdNode>());
    }

    #[test]
    #[should_panic(expected = "invalid split axis")]
    fn interior_with_leaf_tag() {
        KdNode::interior(KdNode::LEAF_TAG, 1, 0.0);
    }

    #[test]
    #[should_panic(expected = "too large to be packed")]
    fn interior_with_overflowing_child() {
        KdNode::interior(0, KdNode::MAX_PAYLOAD + 1, 0.0);
    }
}
