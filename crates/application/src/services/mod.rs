//! Collaborators invoked directly by the transport, beside the dispatcher.

pub mod accounts;

pub use accounts::{AccountService, Credentials};
