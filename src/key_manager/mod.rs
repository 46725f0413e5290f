pub mod key_manager;
pub mod key_type_manager;

pub use key_manager::{KeyManager, KeyManagerCore};
pub use key_type_manager::{ErasedPrimitiveBinding, KeyTypeManager, PrimitiveBinding};
