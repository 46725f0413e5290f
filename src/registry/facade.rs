// ============================================================================
// Registry — the public API.
//
// A single `Lazy<RwLock<RegistryState>>` backs every operation, the same
// "one RwLock guards the interesting state, readers never block readers"
// shape as the reference crate's `KeyRegistry` (key_registry.rs), widened
// from one Option slot per key kind to one map per table. `Registry` itself
// is a zero-sized marker type; every method is an associated function so the
// global, process-wide nature of the registry is visible at every call site
// instead of hiding behind a value someone could (mistakenly) construct two
// of.
// ============================================================================

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::catalogue::Catalogue;
use crate::error::{RegistryError, Result};
use crate::key_data::{KeyData, KeyMaterialType, KeyTemplate};
use crate::key_manager::{KeyManager, KeyManagerCore, KeyTypeManager};
use crate::primitive::PrimitiveTypeId;
use crate::wrapper::{PrimitiveSet, PrimitiveWrapper};

use super::tables::{CatalogueEntry, KeyManagerEntry, RegistryState, StoredPrimitive, WrapperEntry};

static REGISTRY: Lazy<RwLock<RegistryState>> = Lazy::new(|| RwLock::new(RegistryState::default()));

fn read_state() -> Result<RwLockReadGuard<'static, RegistryState>> {
    REGISTRY.read().map_err(|_| RegistryError::unknown("registry lock poisoned by a panicking thread"))
}

fn write_state() -> Result<RwLockWriteGuard<'static, RegistryState>> {
    REGISTRY.write().map_err(|_| RegistryError::unknown("registry lock poisoned by a panicking thread"))
}

/// Checks I3 (monotone tightening) + I4 (owner-type stability) for a
/// re-registration, returning the merged `new_key_allowed` flag on success.
fn check_retightening(
    key_type: &str,
    existing_fingerprint: TypeId,
    existing_new_key_allowed: bool,
    incoming_fingerprint: TypeId,
    incoming_new_key_allowed: bool,
) -> Result<bool> {
    if existing_fingerprint != incoming_fingerprint {
        return Err(RegistryError::already_exists(format!(
            "a manager for key type '{key_type}' is already registered with a different implementation"
        )));
    }
    if incoming_new_key_allowed && !existing_new_key_allowed {
        return Err(RegistryError::already_exists(format!(
            "registering key type '{key_type}' with new_key_allowed=true is a forbidden new key operation: \
             it was already restricted to new_key_allowed=false"
        )));
    }
    Ok(existing_new_key_allowed && incoming_new_key_allowed)
}

pub struct Registry;

impl Registry {
    /// Drops every entry in every table. Test isolation only; tolerates a
    /// poisoned lock so one panicking test cannot wedge the rest of a suite.
    pub fn reset() {
        let mut state = REGISTRY.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = RegistryState::default();
    }

    /// Legacy single-primitive registration path.
    pub fn register_key_manager<M, P>(manager: Arc<M>, new_key_allowed: bool) -> Result<()>
    where
        M: KeyManager<P> + 'static,
        P: 'static,
    {
        if manager.key_type().is_empty() {
            return Err(RegistryError::invalid_argument("key manager must declare a non-empty key type"));
        }
        let key_type = manager.key_type().to_string();
        let owner_fingerprint = TypeId::of::<M>();
        let primitive_type_id = PrimitiveTypeId::of::<P>();

        let mut state = write_state()?;
        match state.key_managers.entries.entry(key_type.clone()) {
            Entry::Vacant(slot) => {
                let core: Arc<dyn KeyManagerCore> = manager.clone();
                let handle: Arc<dyn KeyManager<P>> = manager;
                slot.insert(KeyManagerEntry {
                    core,
                    primitives: vec![StoredPrimitive { type_id: primitive_type_id, handle: Box::new(handle) }],
                    new_key_allowed,
                    owner_fingerprint,
                    is_asymmetric: false,
                    paired_url: None,
                });
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if entry.is_asymmetric {
                    return Err(RegistryError::already_exists(format!(
                        "key type '{key_type}' is already registered as part of an asymmetric pair \
                         and cannot be overlaid by a legacy key manager registration"
                    )));
                }
                let merged = check_retightening(
                    &key_type,
                    entry.owner_fingerprint,
                    entry.new_key_allowed,
                    owner_fingerprint,
                    new_key_allowed,
                )?;
                entry.new_key_allowed = merged;
                Ok(())
            }
        }
    }

    /// List-style registration path: builds one adaptor per primitive the
    /// manager declares via `KeyTypeManager::primitives`.
    pub fn register_internal_key_manager<M: KeyTypeManager>(manager: Arc<M>, new_key_allowed: bool) -> Result<()> {
        if manager.key_type().is_empty() {
            return Err(RegistryError::invalid_argument("key manager must declare a non-empty key type"));
        }
        let key_type = manager.key_type().to_string();
        let owner_fingerprint = TypeId::of::<M>();

        let mut state = write_state()?;
        match state.key_managers.entries.entry(key_type.clone()) {
            Entry::Vacant(slot) => {
                let core: Arc<dyn KeyManagerCore> = manager.clone();
                let primitives = manager
                    .primitives()
                    .iter()
                    .map(|binding| StoredPrimitive {
                        type_id: binding.primitive_type_id(),
                        handle: binding.build(manager.clone()),
                    })
                    .collect();
                slot.insert(KeyManagerEntry {
                    core,
                    primitives,
                    new_key_allowed,
                    owner_fingerprint,
                    is_asymmetric: false,
                    paired_url: None,
                });
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                let merged = check_retightening(
                    &key_type,
                    entry.owner_fingerprint,
                    entry.new_key_allowed,
                    owner_fingerprint,
                    new_key_allowed,
                )?;
                entry.new_key_allowed = merged;
                Ok(())
            }
        }
    }

    /// Registers a private/public key-type-manager pair atomically, cross
    /// checking that both halves agree on who they're paired with (I5).
    pub fn register_asymmetric_key_managers<Priv, Pub>(
        private_manager: Arc<Priv>,
        public_manager: Arc<Pub>,
        new_key_allowed: bool,
    ) -> Result<()>
    where
        Priv: KeyTypeManager,
        Pub: KeyTypeManager,
    {
        if private_manager.key_material_type() != KeyMaterialType::AsymmetricPrivate {
            return Err(RegistryError::invalid_argument(format!(
                "private key manager for key type '{}' must declare key_material_type AsymmetricPrivate",
                private_manager.key_type()
            )));
        }
        if public_manager.key_material_type() != KeyMaterialType::AsymmetricPublic {
            return Err(RegistryError::invalid_argument(format!(
                "public key manager for key type '{}' must declare key_material_type AsymmetricPublic",
                public_manager.key_type()
            )));
        }

        let priv_url = private_manager.key_type().to_string();
        let pub_url = public_manager.key_type().to_string();
        let priv_fingerprint = TypeId::of::<Priv>();
        let pub_fingerprint = TypeId::of::<Pub>();

        let mut state = write_state()?;

        let mut merged_new_key_allowed = new_key_allowed;
        if let Some(existing) = state.key_managers.entries.get(&priv_url) {
            if existing.is_asymmetric && existing.paired_url.as_deref() != Some(pub_url.as_str()) {
                return Err(RegistryError::invalid_argument(format!(
                    "key type '{priv_url}' cannot be re-registered with a different paired public key type"
                )));
            }
            merged_new_key_allowed = check_retightening(
                &priv_url,
                existing.owner_fingerprint,
                existing.new_key_allowed,
                priv_fingerprint,
                merged_new_key_allowed,
            )?;
        }
        if let Some(existing) = state.key_managers.entries.get(&pub_url) {
            if existing.is_asymmetric && existing.paired_url.as_deref() != Some(priv_url.as_str()) {
                return Err(RegistryError::invalid_argument(format!(
                    "key type '{pub_url}' cannot be re-registered with a different paired private key type"
                )));
            }
            merged_new_key_allowed = check_retightening(
                &pub_url,
                existing.owner_fingerprint,
                existing.new_key_allowed,
                pub_fingerprint,
                merged_new_key_allowed,
            )?;
        }

        let priv_core: Arc<dyn KeyManagerCore> = private_manager.clone();
        let priv_primitives = private_manager
            .primitives()
            .iter()
            .map(|binding| StoredPrimitive {
                type_id: binding.primitive_type_id(),
                handle: binding.build(private_manager.clone()),
            })
            .collect();
        state.key_managers.entries.insert(
            priv_url.clone(),
            KeyManagerEntry {
                core: priv_core,
                primitives: priv_primitives,
                new_key_allowed: merged_new_key_allowed,
                owner_fingerprint: priv_fingerprint,
                is_asymmetric: true,
                paired_url: Some(pub_url.clone()),
            },
        );

        let pub_core: Arc<dyn KeyManagerCore> = public_manager.clone();
        let pub_primitives = public_manager
            .primitives()
            .iter()
            .map(|binding| StoredPrimitive {
                type_id: binding.primitive_type_id(),
                handle: binding.build(public_manager.clone()),
            })
            .collect();
        state.key_managers.entries.insert(
            pub_url,
            KeyManagerEntry {
                core: pub_core,
                primitives: pub_primitives,
                new_key_allowed: merged_new_key_allowed,
                owner_fingerprint: pub_fingerprint,
                is_asymmetric: true,
                paired_url: Some(priv_url),
            },
        );

        Ok(())
    }

    pub fn register_primitive_wrapper<W, P>(wrapper: Arc<W>) -> Result<()>
    where
        W: PrimitiveWrapper<P> + 'static,
        P: 'static,
    {
        let primitive_type_id = PrimitiveTypeId::of::<P>();
        let owner_fingerprint = TypeId::of::<W>();

        let mut state = write_state()?;
        match state.wrappers.entries.entry(primitive_type_id) {
            Entry::Vacant(slot) => {
                let handle: Arc<dyn PrimitiveWrapper<P>> = wrapper;
                slot.insert(WrapperEntry { handle: Box::new(handle), owner_fingerprint });
                Ok(())
            }
            Entry::Occupied(slot) => {
                if slot.get().owner_fingerprint == owner_fingerprint {
                    Ok(())
                } else {
                    Err(RegistryError::already_exists(format!(
                        "a wrapper for primitive '{}' is already registered",
                        primitive_type_id.name()
                    )))
                }
            }
        }
    }

    pub fn add_catalogue<C, P>(name: &str, catalogue: Arc<C>) -> Result<()>
    where
        C: Catalogue<P> + 'static,
        P: 'static,
    {
        if name.is_empty() {
            return Err(RegistryError::invalid_argument("catalogue name must not be empty"));
        }
        let owner_fingerprint = TypeId::of::<C>();
        let primitive_type_id = PrimitiveTypeId::of::<P>();

        let mut state = write_state()?;
        match state.catalogues.entries.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                let handle: Arc<dyn Catalogue<P>> = catalogue;
                slot.insert(CatalogueEntry { handle: Box::new(handle), primitive_type_id, owner_fingerprint });
                Ok(())
            }
            Entry::Occupied(slot) => {
                if slot.get().owner_fingerprint == owner_fingerprint {
                    Ok(())
                } else {
                    Err(RegistryError::already_exists(format!("a catalogue named '{name}' is already registered")))
                }
            }
        }
    }

    pub fn get_key_manager<P: 'static>(type_url: &str) -> Result<Arc<dyn KeyManager<P>>> {
        let state = read_state()?;
        let entry = state
            .key_managers
            .entries
            .get(type_url)
            .ok_or_else(|| RegistryError::not_found(format!("no key manager registered for key type '{type_url}'")))?;
        match entry.find_primitive::<P>() {
            Some(stored) => Ok(stored
                .handle
                .downcast_ref::<Arc<dyn KeyManager<P>>>()
                .ok_or_else(|| {
                    RegistryError::unknown("primitive type id matched but downcast to the wrong concrete type")
                })?
                .clone()),
            None => Err(RegistryError::invalid_argument(format!(
                "requested primitive '{}' is not among supported primitives {:?} for key type '{}'",
                PrimitiveTypeId::of::<P>().name(),
                entry.supported_primitive_names(),
                type_url
            ))),
        }
    }

    pub fn get_catalogue<P: 'static>(name: &str) -> Result<Arc<dyn Catalogue<P>>> {
        let state = read_state()?;
        let entry = state
            .catalogues
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::not_found(format!("no catalogue named '{name}'")))?;
        let target = PrimitiveTypeId::of::<P>();
        if entry.primitive_type_id != target {
            return Err(RegistryError::invalid_argument(format!(
                "catalogue '{}' holds primitive '{}', not '{}'",
                name,
                entry.primitive_type_id.name(),
                target.name()
            )));
        }
        Ok(entry
            .handle
            .downcast_ref::<Arc<dyn Catalogue<P>>>()
            .ok_or_else(|| RegistryError::unknown("primitive type id matched but downcast to the wrong concrete type"))?
            .clone())
    }

    pub fn new_key_data(template: &KeyTemplate) -> Result<KeyData> {
        let state = read_state()?;
        let entry = state.key_managers.entries.get(&template.type_url).ok_or_else(|| {
            RegistryError::not_found(format!("no key manager registered for key type '{}'", template.type_url))
        })?;
        if !entry.new_key_allowed {
            return Err(RegistryError::invalid_argument(format!(
                "key manager for key type '{}' does not allow creating new keys",
                template.type_url
            )));
        }
        let value = entry.core.new_key_data(&template.value)?;
        Ok(KeyData::new(template.type_url.clone(), value, entry.core.key_material_type()))
    }

    pub fn get_primitive<P: 'static>(key_data: &KeyData) -> Result<P> {
        let manager = Self::get_key_manager::<P>(&key_data.type_url)?;
        manager.primitive(&key_data.value)
    }

    pub fn get_public_key_data(type_url: &str, serialized_private_key: &[u8]) -> Result<KeyData> {
        let state = read_state()?;
        let entry = state
            .key_managers
            .entries
            .get(type_url)
            .ok_or_else(|| RegistryError::not_found(format!("no key manager registered for key type '{type_url}'")))?;
        let value = entry.core.get_public_key_data(serialized_private_key)?;
        let paired_url = entry.paired_url.clone().ok_or_else(|| {
            RegistryError::invalid_argument(format!(
                "manager for key type '{type_url}' does not implement a PrivateKeyFactory"
            ))
        })?;
        Ok(KeyData::new(paired_url, value, KeyMaterialType::AsymmetricPublic))
    }

    pub fn wrap<P: 'static>(primitive_set: PrimitiveSet<P>) -> Result<P> {
        let state = read_state()?;
        let type_id = PrimitiveTypeId::of::<P>();
        let entry = state.wrappers.entries.get(&type_id).ok_or_else(|| {
            RegistryError::invalid_argument(format!("No wrapper registered for primitive '{}'", type_id.name()))
        })?;
        let wrapper = entry
            .handle
            .downcast_ref::<Arc<dyn PrimitiveWrapper<P>>>()
            .ok_or_else(|| RegistryError::unknown("primitive type id matched but downcast to the wrong concrete type"))?
            .clone();
        wrapper.wrap(primitive_set)
    }
}
