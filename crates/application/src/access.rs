//! Access declaration table (request type → allowed roles or anonymous).
//!
//! Built once at startup and read-only afterwards.

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use courselib_auth::Access;

use crate::{RegistryError, Request, RequestKind};

/// One declared request type, for startup logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEntry {
    pub request: &'static str,
    pub kind: RequestKind,
    pub access: Access,
}

#[derive(Debug, Default)]
pub struct AccessTable {
    entries: HashMap<TypeId, AccessEntry>,
}

impl AccessTable {
    pub fn builder() -> AccessTableBuilder {
        AccessTableBuilder::default()
    }

    pub fn lookup<R: Request>(&self) -> Option<&Access> {
        self.entries.get(&TypeId::of::<R>()).map(|e| &e.access)
    }

    pub fn is_declared(&self, request: TypeId) -> bool {
        self.entries.contains_key(&request)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations sorted by request name.
    pub fn entries(&self) -> Vec<&AccessEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| e.request);
        entries
    }

    pub(crate) fn type_ids(&self) -> impl Iterator<Item = (TypeId, &'static str)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, e.request))
    }
}

#[derive(Debug, Default)]
pub struct AccessTableBuilder {
    entries: HashMap<TypeId, AccessEntry>,
}

impl AccessTableBuilder {
    /// Declare who may issue `R`.
    ///
    /// Declaring the same type twice, or an empty role set, is rejected.
    pub fn declare<R: Request>(mut self, access: Access) -> Result<Self, RegistryError> {
        if let Access::Roles(roles) = &access {
            if roles.is_empty() {
                return Err(RegistryError::EmptyRoleSet { request: R::NAME });
            }
        }

        match self.entries.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateDeclaration { request: R::NAME }),
            Entry::Vacant(slot) => {
                slot.insert(AccessEntry {
                    request: R::NAME,
                    kind: R::KIND,
                    access,
                });
                Ok(self)
            }
        }
    }

    pub fn build(self) -> AccessTable {
        AccessTable {
            entries: self.entries,
        }
    }
}
