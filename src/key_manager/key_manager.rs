// ============================================================================
// KeyManager<P> — the per-key-type, per-primitive collaborator the registry
// delegates to.
//
// Split into two traits because not every registry operation is generic over
// a primitive: `new_key_data`/`get_public_key_data` act on the key-type URL
// alone, while `primitive` is the one operation that produces a concrete `P`.
// A single concrete manager ordinarily implements both, exactly like the
// distilled original's `TestAeadKeyManager`, which is simultaneously a
// `KeyManager<Aead>` and the thing `NewKeyData` delegates to.
// ============================================================================

use crate::error::{RegistryError, Result};
use crate::key_data::KeyMaterialType;

/// URL-keyed operations that do not depend on which primitive is requested.
pub trait KeyManagerCore: Send + Sync {
    fn key_type(&self) -> &str;

    fn key_material_type(&self) -> KeyMaterialType;

    /// Parses `serialized_key_format`, validates it, generates a fresh key and
    /// returns its serialized bytes. Legacy managers implement this directly;
    /// list-style managers get it for free from the `KeyTypeManagerAdaptor`.
    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<Vec<u8>>;

    /// Only private-key managers override this. The default rejects every
    /// caller with a message naming the missing capability, matching the
    /// distilled original's "PrivateKeyFactory" phrasing.
    fn get_public_key_data(&self, _serialized_private_key: &[u8]) -> Result<Vec<u8>> {
        Err(RegistryError::invalid_argument(format!(
            "manager for key type '{}' does not implement a PrivateKeyFactory",
            self.key_type()
        )))
    }
}

/// Produces primitive `P` from a serialized key of this manager's key type.
pub trait KeyManager<P>: KeyManagerCore {
    fn primitive(&self, serialized_key: &[u8]) -> Result<P>;
}
