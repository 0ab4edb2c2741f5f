//! Request abstractions (commands and queries).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Command,
    Query,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Command => "command",
            RequestKind::Query => "query",
        }
    }
}

impl core::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed request routed through the dispatcher.
///
/// Requests are immutable, owned data built per call by the transport. The
/// concrete type is the routing key: access declarations and handlers are
/// looked up by it.
pub trait Request: core::fmt::Debug + Send + Sync + 'static {
    /// What a successful handler returns for this request.
    type Output: Send + 'static;

    /// Stable name used in logs and configuration errors.
    const NAME: &'static str;

    const KIND: RequestKind;
}

/// A request that mutates state (returns `()` or a generated identifier).
pub trait Command: Request {}

/// A read-only request returning a typed payload.
pub trait Query: Request {}

macro_rules! impl_command {
    ($t:ty => $out:ty, $name:literal) => {
        impl $crate::request::Request for $t {
            type Output = $out;
            const NAME: &'static str = $name;
            const KIND: $crate::request::RequestKind = $crate::request::RequestKind::Command;
        }

        impl $crate::request::Command for $t {}
    };
}

macro_rules! impl_query {
    ($t:ty => $out:ty, $name:literal) => {
        impl $crate::request::Request for $t {
            type Output = $out;
            const NAME: &'static str = $name;
            const KIND: $crate::request::RequestKind = $crate::request::RequestKind::Query;
        }

        impl $crate::request::Query for $t {}
    };
}

pub(crate) use impl_command;
pub(crate) use impl_query;
