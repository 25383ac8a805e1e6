//! Records shared between the k-d tree builder and the GPU traversal kernel.

#![cfg_attr(target_arch = "spirv", no_std)]

mod bounding_box;
mod kd_node;
mod woop_triangle;

pub use self::bounding_box::*;
pub use self::kd_node::*;
pub use self::woop_triangle::*;
