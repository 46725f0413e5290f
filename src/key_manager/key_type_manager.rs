// ============================================================================
// KeyTypeManager — the "list-style" registration path (RegisterInternalKeyManager)
//
// A list-style manager declares its key/key-format types once and a set of
// primitive bindings (PrimitiveTypeId -> Create(key) -> primitive), instead
// of hard-wiring itself to a single `KeyManager<P>` impl. The registry lifts
// each binding into an adaptor that answers the legacy `KeyManager<P>`
// interface, so both registration styles look identical to `get_key_manager`.
// ============================================================================

use std::any::Any;
use std::sync::Arc;

use crate::error::{RegistryError, Result};
use crate::key_data::KeyMaterialType;
use crate::key_manager::key_manager::{KeyManager, KeyManagerCore};
use crate::primitive::PrimitiveTypeId;

pub trait KeyTypeManager: Send + Sync + 'static {
    type Key: Send + Sync + 'static;
    type KeyFormat: Send + Sync + 'static;

    fn key_type(&self) -> &str;
    fn key_material_type(&self) -> KeyMaterialType;

    fn parse_key(&self, serialized: &[u8]) -> Result<Self::Key>;
    fn serialize_key(&self, key: &Self::Key) -> Result<Vec<u8>>;
    fn validate_key(&self, key: &Self::Key) -> Result<()>;

    fn parse_key_format(&self, serialized: &[u8]) -> Result<Self::KeyFormat>;
    fn validate_key_format(&self, format: &Self::KeyFormat) -> Result<()>;
    fn create_key(&self, format: &Self::KeyFormat) -> Result<Self::Key>;

    /// One binding per primitive this manager supports (I7: exactly these,
    /// no others, are reachable through `get_key_manager`).
    fn primitives(&self) -> Vec<Box<dyn ErasedPrimitiveBinding<Self>>>
    where
        Self: Sized;

    /// Overridden only by managers whose `key_material_type` is
    /// `AsymmetricPrivate`.
    fn get_public_key_data(&self, _serialized_private_key: &[u8]) -> Result<Vec<u8>> {
        Err(RegistryError::invalid_argument(format!(
            "manager for key type '{}' does not implement a PrivateKeyFactory",
            self.key_type()
        )))
    }
}

/// Every `KeyTypeManager` gets `KeyManagerCore` for free: `new_key_data` is
/// just parse-format, validate-format, create, validate-key, serialize.
impl<M: KeyTypeManager> KeyManagerCore for M {
    fn key_type(&self) -> &str {
        KeyTypeManager::key_type(self)
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyTypeManager::key_material_type(self)
    }

    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<Vec<u8>> {
        let format = self.parse_key_format(serialized_key_format)?;
        self.validate_key_format(&format)?;
        let key = self.create_key(&format)?;
        self.validate_key(&key)?;
        self.serialize_key(&key)
    }

    fn get_public_key_data(&self, serialized_private_key: &[u8]) -> Result<Vec<u8>> {
        KeyTypeManager::get_public_key_data(self, serialized_private_key)
    }
}

/// Type-erased handle to one `PrimitiveBinding<M, P>`, so a manager can
/// return a heterogeneous `Vec` of bindings to different primitive types.
pub trait ErasedPrimitiveBinding<M: KeyTypeManager>: Send + Sync {
    fn primitive_type_id(&self) -> PrimitiveTypeId;

    /// Builds the `Arc<dyn KeyManager<P>>` adaptor for this binding's `P`,
    /// boxed as `Any` so the registry can store it alongside bindings to
    /// other primitive types and downcast back to `Arc<dyn KeyManager<P>>`
    /// at lookup time.
    fn build(&self, manager: Arc<M>) -> Box<dyn Any + Send + Sync>;
}

pub struct PrimitiveBinding<M: KeyTypeManager, P> {
    type_id: PrimitiveTypeId,
    create: Arc<dyn Fn(&M::Key) -> Result<P> + Send + Sync>,
}

impl<M, P> PrimitiveBinding<M, P>
where
    M: KeyTypeManager,
    P: 'static + Send + Sync,
{
    pub fn new(create: impl Fn(&M::Key) -> Result<P> + Send + Sync + 'static) -> Self {
        PrimitiveBinding { type_id: PrimitiveTypeId::of::<P>(), create: Arc::new(create) }
    }
}

impl<M, P> ErasedPrimitiveBinding<M> for PrimitiveBinding<M, P>
where
    M: KeyTypeManager,
    P: 'static + Send + Sync,
{
    fn primitive_type_id(&self) -> PrimitiveTypeId {
        self.type_id
    }

    fn build(&self, manager: Arc<M>) -> Box<dyn Any + Send + Sync> {
        let adaptor: Arc<dyn KeyManager<P>> =
            Arc::new(KeyTypeManagerAdaptor { manager, create: self.create.clone() });
        Box::new(adaptor)
    }
}

struct KeyTypeManagerAdaptor<M: KeyTypeManager, P> {
    manager: Arc<M>,
    create: Arc<dyn Fn(&M::Key) -> Result<P> + Send + Sync>,
}

impl<M: KeyTypeManager, P: Send + Sync> KeyManagerCore for KeyTypeManagerAdaptor<M, P> {
    fn key_type(&self) -> &str {
        self.manager.key_type()
    }

    fn key_material_type(&self) -> KeyMaterialType {
        self.manager.key_material_type()
    }

    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<Vec<u8>> {
        self.manager.new_key_data(serialized_key_format)
    }

    fn get_public_key_data(&self, serialized_private_key: &[u8]) -> Result<Vec<u8>> {
        self.manager.get_public_key_data(serialized_private_key)
    }
}

impl<M: KeyTypeManager, P: 'static + Send + Sync> KeyManager<P> for KeyTypeManagerAdaptor<M, P> {
    fn primitive(&self, serialized_key: &[u8]) -> Result<P> {
        let key = self.manager.parse_key(serialized_key)?;
        self.manager.validate_key(&key)?;
        (self.create)(&key)
    }
}
