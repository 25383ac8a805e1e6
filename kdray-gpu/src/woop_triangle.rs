use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Triangle stored as the rows of the affine transformation that maps it
/// onto the unit triangle `(1, 0, 0), (0, 1, 0), (0, 0, 0)`.
///
/// Thanks to:
/// - Sven Woop, "A Ray Tracing Hardware Architecture for Dynamic Scenes".
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct WoopTriangle {
    /// Third row of the transformation, with its translation negated.
    pub d0: Vec4,

    /// First row of the transformation.
    pub d1: Vec4,

    /// Second row of the transformation.
    pub d2: Vec4,
}
