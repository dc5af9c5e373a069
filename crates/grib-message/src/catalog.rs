//! Key names enumerated once per message.

use std::collections::HashSet;

use tracing::debug;

use crate::decoder::{Decoder, KeyFilter};
use crate::error::{ForKey, GribError, Result};

/// Key names of one message plus the read-only subset.
///
/// Enumerated when the message is opened and never refreshed: writes change
/// values, not which keys exist.
#[derive(Debug, Clone, Default)]
pub struct KeyCatalog {
    names: Vec<String>,
    present: HashSet<String>,
    read_only: HashSet<String>,
}

impl KeyCatalog {
    pub fn load<D: Decoder + ?Sized>(decoder: &D) -> Result<Self> {
        let names = decoder.keys(KeyFilter::All).for_key("*")?;
        let read_only: HashSet<String> = decoder
            .keys(KeyFilter::ReadOnly)
            .for_key("*")?
            .into_iter()
            .collect();
        let present = names.iter().cloned().collect();

        debug!(
            keys = names.len(),
            read_only = read_only.len(),
            "Cached key catalog"
        );

        Ok(Self {
            names,
            present,
            read_only,
        })
    }

    /// Key names in decoder order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.present.contains(key)
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        self.read_only.contains(key)
    }

    /// Fails with an access error unless `key` may be written.
    pub fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.contains(key) {
            return Err(GribError::ReadOnly(key.to_string()));
        }
        if !self.present.contains(key) {
            return Err(GribError::KeyNotFound(key.to_string()));
        }
        Ok(())
    }
}
