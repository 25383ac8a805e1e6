use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

/// Axis-aligned bounding box, padded to two `Vec4`s so that it can be put
/// into uniform buffers as-is.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct BoundingBox {
    pub min: Vec4,
    pub max: Vec4,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.extend(0.0),
            max: max.extend(0.0),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.min.xyz()
    }

    pub fn max(&self) -> Vec3 {
        self.max.xyz()
    }
}
