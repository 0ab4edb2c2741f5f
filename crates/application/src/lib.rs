//! `courselib-application` — request dispatch and authorization core.
//!
//! Commands and queries are plain data types. Each one is declared once in an
//! [`AccessTable`] (who may issue it) and bound to exactly one handler in a
//! [`HandlerRegistry`]. The [`Dispatcher`] authorizes the caller before
//! resolving and invoking the handler.

pub mod access;
pub mod bootstrap;
pub mod commands;
pub mod dispatcher;
pub mod dto;
pub mod error;
pub mod handler;
pub mod queries;
pub mod registry;
pub mod request;
pub mod services;

pub use access::{AccessTable, AccessTableBuilder};
pub use bootstrap::{Collaborators, build_dispatcher};
pub use dispatcher::Dispatcher;
pub use dto::{CourseDto, UserDto};
pub use error::{DispatchError, RegistryError};
pub use handler::Handler;
pub use registry::{HandlerRegistry, HandlerRegistryBuilder};
pub use request::{Command, Query, Request, RequestKind};
pub use services::AccountService;
