pub mod wrapper;

pub use wrapper::{PrimitiveSet, PrimitiveSetEntry, PrimitiveWrapper};
