// ============================================================================
// Key material wire types
//
// The registry never interprets `value`; it is an opaque byte string that
// only the key manager named by `type_url` knows how to parse. Real key
// schemas are serialized protobufs in production; here they are plain
// serde-derived structs since protobuf codegen is an external collaborator
// out of scope for the registry core.
// ============================================================================

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMaterialType {
    Symmetric,
    AsymmetricPrivate,
    AsymmetricPublic,
    Remote,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputPrefixType {
    Tink,
    Legacy,
    Raw,
    Crunchy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    pub type_url: String,
    pub value: Vec<u8>,
    pub key_material_type: KeyMaterialType,
}

impl KeyData {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>, key_material_type: KeyMaterialType) -> Self {
        KeyData { type_url: type_url.into(), value, key_material_type }
    }
}

/// Scrubs secret key bytes on drop, the same way the reference crate's
/// `KeyPair` zeroizes its `SecretKey` when it goes out of scope. Public and
/// remote material carries nothing worth scrubbing.
impl Drop for KeyData {
    fn drop(&mut self) {
        if matches!(self.key_material_type, KeyMaterialType::Symmetric | KeyMaterialType::AsymmetricPrivate) {
            self.value.zeroize();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTemplate {
    pub type_url: String,
    pub value: Vec<u8>,
    pub output_prefix_type: OutputPrefixType,
}

impl KeyTemplate {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>, output_prefix_type: OutputPrefixType) -> Self {
        KeyTemplate { type_url: type_url.into(), value, output_prefix_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_data_round_trips_through_json() {
        let kd = KeyData::new("some_key_type", b"payload".to_vec(), KeyMaterialType::Symmetric);
        let json = serde_json::to_string(&kd).unwrap();
        let back: KeyData = serde_json::from_str(&json).unwrap();
        assert_eq!(kd, back);
    }

    #[test]
    fn key_template_round_trips_through_json() {
        let kt = KeyTemplate::new("some_key_type", b"format".to_vec(), OutputPrefixType::Tink);
        let json = serde_json::to_string(&kt).unwrap();
        let back: KeyTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(kt, back);
    }
}
