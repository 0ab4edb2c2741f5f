//! Handler registry: request type → exactly one handler.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::{Handler, RegistryError, Request};

struct Registration {
    request: &'static str,
    /// Always an `Arc<dyn Handler<R>>` for the `R` this entry is keyed by.
    handler: Box<dyn Any + Send + Sync>,
}

/// Read-only after construction; resolution needs no locking.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, Registration>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    pub fn resolve<R: Request>(&self) -> Option<Arc<dyn Handler<R>>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|r| r.handler.downcast_ref::<Arc<dyn Handler<R>>>())
            .cloned()
    }

    pub fn contains(&self, request: TypeId) -> bool {
        self.handlers.contains_key(&request)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn type_ids(&self) -> impl Iterator<Item = (TypeId, &'static str)> + '_ {
        self.handlers.iter().map(|(id, r)| (*id, r.request))
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: Vec<_> = self.handlers.values().map(|r| r.request).collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry").field("requests", &names).finish()
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<TypeId, Registration>,
}

impl core::fmt::Debug for HandlerRegistryBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistryBuilder")
            .field("registered", &self.handlers.len())
            .finish()
    }
}

impl HandlerRegistryBuilder {
    /// Bind `handler` to request type `R`. A second handler for `R` is rejected.
    pub fn register<R, H>(mut self, handler: H) -> Result<Self, RegistryError>
    where
        R: Request,
        H: Handler<R> + 'static,
    {
        match self.handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateHandler { request: R::NAME }),
            Entry::Vacant(slot) => {
                let handler: Arc<dyn Handler<R>> = Arc::new(handler);
                slot.insert(Registration {
                    request: R::NAME,
                    handler: Box::new(handler),
                });
                Ok(self)
            }
        }
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}
