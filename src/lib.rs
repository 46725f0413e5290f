pub mod catalogue;
pub mod error;
pub mod key_data;
pub mod key_manager;
pub mod primitive;
pub mod registry;
pub mod wrapper;

pub use catalogue::Catalogue;
pub use error::{RegistryError, RegistryErrorKind, Result};
pub use key_data::{KeyData, KeyMaterialType, KeyTemplate, OutputPrefixType};
pub use key_manager::{ErasedPrimitiveBinding, KeyManager, KeyManagerCore, KeyTypeManager, PrimitiveBinding};
pub use primitive::PrimitiveTypeId;
pub use registry::Registry;
pub use wrapper::{PrimitiveSet, PrimitiveSetEntry, PrimitiveWrapper};
