//! Mode routing
//!
//! Only the HTTP server mode exists; `config generate` is handled directly
//! by the binary.

pub mod server;

pub use server::run_server;
