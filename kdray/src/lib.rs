//! SAH k-d tree builder for GPU ray tracing.
//!
//! Given a triangle soup, [`KdTree::build()`] produces a compact tree of
//! [`gpu::KdNode`]s together with the array of triangle ids referenced by its
//! leaves; [`Aggregate`] additionally converts the triangles into the
//! [`gpu::WoopTriangle`] form expected by the traversal shaders.
//!
//! ```no_run
//! use kdray::{Aggregate, Config, KdTreeConfig};
//!
//! let config = Config::load("kdray.cfg").unwrap();
//! let config = KdTreeConfig::from_config(&config);
//! let vertices: Vec<f32> = /* ... */ Vec::new();
//! let triangles = kdray::triangles_from_vertices(&vertices);
//! let aggregate = Aggregate::new(&triangles, config);
//!
//! // upload `aggregate.nodes_as_bytes()` etc.
//! ```

mod aggregate;
mod config;
mod kd_tree;
mod triangle;
mod utils;

pub use kdray_gpu as gpu;

pub use self::aggregate::*;
pub use self::config::*;
pub use self::kd_tree::*;
pub use self::triangle::*;
pub use self::utils::*;
