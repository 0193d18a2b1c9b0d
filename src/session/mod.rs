//! Session controller
//!
//! - `Session` - one open menu for one viewer, owning its layout state
//! - `SessionRegistry` - the arena of open sessions keyed by viewer

pub mod controller;
pub mod registry;

pub use controller::Session;
pub use registry::SessionRegistry;
