pub mod client;
pub mod config;
pub mod errors;
pub mod resource;
pub mod server;
#[cfg(test)]
mod test;

pub use client::DescribeClient;
pub use server::RtspDescribeServer;
