// ============================================================================
// Catalogue<P> — legacy named directory of key managers, keyed by primitive
// type. Semantically a thin second map: AddCatalogue/get_catalogue mirror
// RegisterKeyManager/get_key_manager's idempotence and conflict rules, but a
// catalogue is opaque to the registry beyond its primitive-type identity —
// the registry never calls `get_key_manager` on one itself.
// ============================================================================

use std::sync::Arc;

use crate::error::Result;
use crate::key_manager::KeyManager;

pub trait Catalogue<P>: Send + Sync {
    fn get_key_manager(
        &self,
        type_url: &str,
        primitive_name: &str,
        min_version: u32,
    ) -> Result<Arc<dyn KeyManager<P>>>;
}
