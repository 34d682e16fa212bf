// frontdesk-api: Async Rust client for the hotel content API

pub mod auth;
pub mod client;
pub mod collections;
pub mod envelope;
pub mod error;
pub mod transport;

pub use auth::{AuthUser, LoginResponse};
pub use client::CmsClient;
pub use collections::ListOptions;
pub use envelope::{Page, Pagination, flatten_record};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
