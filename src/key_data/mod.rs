pub mod key_data;

pub use key_data::{KeyData, KeyMaterialType, KeyTemplate, OutputPrefixType};
