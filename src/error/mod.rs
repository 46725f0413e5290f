pub mod error;

pub use error::{RegistryError, RegistryErrorKind, Result};
