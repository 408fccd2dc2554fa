//! HTTP API module.
//!
//! The browser preview server, its response types, and the log broadcaster
//! every pipeline step reports through.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::start_server;
pub use types::*;
