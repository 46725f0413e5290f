// ============================================================================
// The three tables the registry facade consults and mutates under its one
// lock. Kept as plain data + a handful of lookup helpers; all the policy
// (I1..I7, error wording) lives in facade.rs so the tables stay dumb maps.
// ============================================================================

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::key_manager::KeyManagerCore;
use crate::primitive::PrimitiveTypeId;

/// An `Arc<dyn KeyManager<P>>` for one specific `P`, type-erased so it can
/// sit in the same `Vec` as adaptors for other primitives (design note
/// "type-erased heterogeneous map").
pub(crate) struct StoredPrimitive {
    pub(crate) type_id: PrimitiveTypeId,
    pub(crate) handle: Box<dyn Any + Send + Sync>,
}

pub(crate) struct KeyManagerEntry {
    pub(crate) core: Arc<dyn KeyManagerCore>,
    pub(crate) primitives: Vec<StoredPrimitive>,
    pub(crate) new_key_allowed: bool,
    pub(crate) owner_fingerprint: TypeId,
    pub(crate) is_asymmetric: bool,
    pub(crate) paired_url: Option<String>,
}

impl KeyManagerEntry {
    pub(crate) fn find_primitive<P: 'static>(&self) -> Option<&StoredPrimitive> {
        let target = PrimitiveTypeId::of::<P>();
        self.primitives.iter().find(|stored| stored.type_id == target)
    }

    pub(crate) fn supported_primitive_names(&self) -> Vec<&'static str> {
        self.primitives.iter().map(|stored| stored.type_id.name()).collect()
    }
}

#[derive(Default)]
pub(crate) struct KeyManagerTable {
    pub(crate) entries: HashMap<String, KeyManagerEntry>,
}

pub(crate) struct WrapperEntry {
    pub(crate) handle: Box<dyn Any + Send + Sync>,
    pub(crate) owner_fingerprint: TypeId,
}

#[derive(Default)]
pub(crate) struct WrapperTable {
    pub(crate) entries: HashMap<PrimitiveTypeId, WrapperEntry>,
}

pub(crate) struct CatalogueEntry {
    pub(crate) handle: Box<dyn Any + Send + Sync>,
    pub(crate) primitive_type_id: PrimitiveTypeId,
    pub(crate) owner_fingerprint: TypeId,
}

#[derive(Default)]
pub(crate) struct CatalogueTable {
    pub(crate) entries: HashMap<String, CatalogueEntry>,
}

#[derive(Default)]
pub(crate) struct RegistryState {
    pub(crate) key_managers: KeyManagerTable,
    pub(crate) wrappers: WrapperTable,
    pub(crate) catalogues: CatalogueTable,
}
