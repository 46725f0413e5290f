pub mod primitive;

pub use primitive::PrimitiveTypeId;
