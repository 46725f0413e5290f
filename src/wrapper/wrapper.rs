// ============================================================================
// PrimitiveWrapper<P> — collapses a PrimitiveSet<P> (one primitive per key in
// a keyset, keyed by key id and output-prefix convention) into a single `P`
// that picks the right underlying primitive by inspecting a ciphertext's
// prefix. The registry only needs to route `Wrap<P>` calls to the one
// registered wrapper for `P`; it never constructs or inspects a PrimitiveSet.
// ============================================================================

use std::sync::Arc;

use crate::error::Result;
use crate::key_data::OutputPrefixType;

#[derive(Clone)]
pub struct PrimitiveSetEntry<P> {
    pub key_id: u32,
    pub prefix: Vec<u8>,
    pub output_prefix_type: OutputPrefixType,
    pub primitive: Arc<P>,
}

pub struct PrimitiveSet<P> {
    entries: Vec<PrimitiveSetEntry<P>>,
    primary: Option<usize>,
}

impl<P> PrimitiveSet<P> {
    pub fn new() -> Self {
        PrimitiveSet { entries: Vec::new(), primary: None }
    }

    pub fn add(&mut self, entry: PrimitiveSetEntry<P>, is_primary: bool) {
        if is_primary {
            self.primary = Some(self.entries.len());
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PrimitiveSetEntry<P>] {
        &self.entries
    }

    pub fn primary(&self) -> Option<&PrimitiveSetEntry<P>> {
        self.primary.and_then(|i| self.entries.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P> Default for PrimitiveSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait PrimitiveWrapper<P>: Send + Sync {
    fn wrap(&self, primitive_set: PrimitiveSet<P>) -> Result<P>;
}
