//! # Schema Cache
//!
//! Compilation is a pure function of the descriptor list, so a compiled
//! schema can be reused for every list with the same content. The cache key
//! is a SHA-256 digest of the list's RFC 8785 canonical JSON form. Key order
//! and whitespace in the authored file therefore never produce distinct
//! entries.
//!
//! Caching is an optimization only. A cached schema and a freshly compiled
//! one validate identically.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::descriptor::FieldDescriptor;
use crate::error::CompileError;
use crate::schema::{compile, CompiledSchema};

/// Lowercase hex SHA-256 of the canonical JSON form of `descriptors`.
///
/// # Errors
///
/// Fails only if the descriptors cannot be serialized to JSON, e.g. a rule
/// value holding a non-finite float.
pub fn fingerprint(descriptors: &[FieldDescriptor]) -> Result<String, serde_json::Error> {
    let canonical = serde_jcs::to_vec(&descriptors)?;
    let digest = Sha256::digest(&canonical);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Thread-safe map from descriptor fingerprint to compiled schema.
///
/// Compile errors are never cached; a malformed list fails on every call.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<String, Arc<CompiledSchema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schema for `descriptors`, compiling it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the [`CompileError`] from [`compile`].
    pub fn get_or_compile(
        &self,
        descriptors: &[FieldDescriptor],
    ) -> Result<Arc<CompiledSchema>, CompileError> {
        let key = match fingerprint(descriptors) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "cannot fingerprint descriptors; compiling uncached");
                return compile(descriptors).map(Arc::new);
            }
        };

        if let Some(hit) = self.entries.read().get(&key) {
            tracing::trace!(key = %key, "schema cache hit");
            return Ok(Arc::clone(hit));
        }

        let schema = Arc::new(compile(descriptors)?);
        let mut entries = self.entries.write();
        // A concurrent caller may have compiled the same list meanwhile.
        Ok(Arc::clone(entries.entry(key).or_insert(schema)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
