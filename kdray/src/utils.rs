mod axis;
mod bounding_box;
mod growable_vec;
mod metrics;

pub use self::axis::*;
pub use self::bounding_box::*;
pub use self::growable_vec::*;
pub use self::metrics::*;
