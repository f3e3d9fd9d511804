pub mod config;
pub mod errors;
pub mod scope;
pub mod server;

pub use server::SapServer;
