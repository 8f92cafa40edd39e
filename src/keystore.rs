//! Named storage for key material.
//!
//! The store is role-agnostic beyond tag filtering: bodies are opaque blobs
//! whose internal structure belongs to the scheme that created them.

use std::collections::HashMap;

use crate::bytestring::ByteString;
use crate::error::{Error, Result};

/// What a stored key is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Public,
    Secret,
    Params,
}

/// A role-tagged key blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    pub role: KeyRole,
    pub body: ByteString,
}

/// A mapping `name → (role, body)`.
///
/// Inserting under an existing name is an error; the caller decides whether
/// to [`KeyStore::delete`] first.
#[derive(Debug, Default, Clone)]
pub struct KeyStore {
    keys: HashMap<String, StoredKey>,
}

impl KeyStore {
    pub fn new() -> Self {
        KeyStore {
            keys: HashMap::new(),
        }
    }

    pub fn add(&mut self, name: &str, role: KeyRole, body: ByteString) -> Result<()> {
        if self.keys.contains_key(name) {
            return Err(Error::InvalidInput);
        }
        self.keys.insert(name.to_owned(), StoredKey { role, body });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StoredKey> {
        self.keys.get(name)
    }

    /// Like [`KeyStore::get`], but fails when the stored role differs.
    pub fn get_by_role(&self, name: &str, role: KeyRole) -> Result<&StoredKey> {
        let key = self.keys.get(name).ok_or(Error::InvalidInput)?;
        if key.role != role {
            return Err(Error::InvalidInput);
        }
        Ok(key)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.keys
            .remove(name)
            .map(|_| ())
            .ok_or(Error::InvalidInput)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
