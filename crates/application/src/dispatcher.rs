//! Mediator: authorize the caller, resolve the handler, invoke it.
//!
//! ```text
//! request + identity
//!   ↓
//! 1. Look up the declared access for the request type
//!   ↓
//! 2. Anonymous not allowed and no identity  → Unauthenticated
//!   ↓
//! 3. Declared roles ∩ caller roles = ∅       → Forbidden
//!   ↓
//! 4. Resolve the handler                    → HandlerNotFound
//!   ↓
//! 5. Invoke the handler, return its outcome unchanged
//! ```
//!
//! The dispatcher holds only the read-only tables built at startup, so one
//! instance is shared by every concurrent caller. There is no retry and no
//! timeout here; each call has exactly one terminal outcome.

use std::any::TypeId;
use std::sync::Arc;

use tracing::Instrument;

use courselib_auth::{Access, Identity, authorize};

use crate::error::authz_to_dispatch;
use crate::{AccessTable, Command, DispatchError, HandlerRegistry, Query, RegistryError, Request};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    access: Arc<AccessTable>,
    handlers: Arc<HandlerRegistry>,
}

impl Dispatcher {
    /// Pair an access table with a handler registry.
    ///
    /// Every declared request type must have a handler and every handler a
    /// declaration; otherwise construction fails.
    pub fn new(access: AccessTable, handlers: HandlerRegistry) -> Result<Self, RegistryError> {
        let mut missing_handler: Vec<_> = access
            .type_ids()
            .filter(|(id, _)| !handlers.contains(*id))
            .map(|(_, name)| name)
            .collect();
        missing_handler.sort_unstable();
        if let Some(request) = missing_handler.first().copied() {
            return Err(RegistryError::MissingHandler { request });
        }

        let mut missing_access: Vec<_> = handlers
            .type_ids()
            .filter(|(id, _)| !access.is_declared(*id))
            .map(|(_, name)| name)
            .collect();
        missing_access.sort_unstable();
        if let Some(request) = missing_access.first().copied() {
            return Err(RegistryError::MissingAccess { request });
        }

        for entry in access.entries() {
            tracing::debug!(request = entry.request, kind = %entry.kind, access = ?entry.access, "request registered");
        }

        Ok(Self {
            access: Arc::new(access),
            handlers: Arc::new(handlers),
        })
    }

    pub fn access(&self) -> &AccessTable {
        &self.access
    }

    /// Route `request` for `identity` (`None` = anonymous caller).
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        identity: Option<&Identity>,
    ) -> Result<R::Output, DispatchError> {
        let span = tracing::info_span!(
            "dispatch",
            request = R::NAME,
            kind = R::KIND.as_str(),
            user_id = tracing::field::Empty,
        );
        if let Some(identity) = identity {
            span.record("user_id", tracing::field::display(identity.user_id()));
        }

        async move {
            let Some(access) = self.access.lookup::<R>() else {
                tracing::error!("request type was never registered");
                return Err(DispatchError::HandlerNotFound { request: R::NAME });
            };

            // Anonymous requests never look at the identity.
            if !access.is_anonymous() {
                if let Err(e) = authorize(access, identity) {
                    tracing::warn!(reason = %e, "request denied");
                    return Err(authz_to_dispatch(R::NAME, e));
                }
            }

            let Some(handler) = self.handlers.resolve::<R>() else {
                tracing::error!(type_id = ?TypeId::of::<R>(), "no handler resolved");
                return Err(DispatchError::HandlerNotFound { request: R::NAME });
            };

            let outcome = handler.handle(request).await;
            if let Err(e) = &outcome {
                tracing::debug!(error = %e, "handler failed");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    pub async fn send<C: Command>(
        &self,
        command: C,
        identity: Option<&Identity>,
    ) -> Result<C::Output, DispatchError> {
        self.dispatch(command, identity).await
    }

    pub async fn query<Q: Query>(
        &self,
        query: Q,
        identity: Option<&Identity>,
    ) -> Result<Q::Output, DispatchError> {
        self.dispatch(query, identity).await
    }

    /// Declared access for `R`, if registered.
    pub fn declared_access<R: Request>(&self) -> Option<&Access> {
        self.access.lookup::<R>()
    }
}
