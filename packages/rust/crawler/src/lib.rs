//! HTTP transport and the concurrent fetch scheduler.
//!
//! This crate provides:
//! - [`transport`]: single GET with bounded redirect following, no retries
//! - [`scheduler`]: order-preserving map with a bounded number of workers

pub mod scheduler;
pub mod transport;

pub use scheduler::map_with_concurrency;
pub use transport::{GITHUB_ACCEPT, RawResponse, Transport, TransportOptions};
