//! Front-desk domain layer between `frontdesk-api` and UI consumers (CLI).
//!
//! - **[`FrontDesk`]**: Facade wiring one API client, the session provider
//!   and both stores together from a [`FrontDeskConfig`]. No globals: every
//!   store receives its HTTP client and session source explicitly.
//!
//! - **[`SessionProvider`]**: Exchanges username/password for a bearer token
//!   at the content API, keeps the current [`Session`], and signs it into a
//!   portable [`SessionToken`] that can be restored later.
//!
//! - **[`GuestStore`] / [`RoomStore`]**: Ordered, reactive caches of the
//!   remote collections. Reads are snapshots (`Arc<Vec<Arc<T>>>`); writes go
//!   to the API first and are reflected locally according to the configured
//!   [`WritePolicy`].
//!
//! - **[`RouteGuard`]**: Pure predicate deciding whether a path needs an
//!   authenticated session.
//!
//! - **[`GuestSeeder`]**: Generates and posts fake guests for test backends.

pub mod config;
pub mod error;
pub mod frontdesk;
pub mod guard;
pub mod model;
pub mod seed;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{FrontDeskConfig, TlsVerification, WritePolicy};
pub use error::CoreError;
pub use frontdesk::FrontDesk;
pub use guard::{GuardDecision, RouteGuard};
pub use model::{Guest, GuestPatch, GuestStatus, RecordId, Room, RoomPatch};
pub use seed::{GuestSeeder, SeedMode, SeedOptions, SeedReport};
pub use session::{AuthStatus, Session, SessionProvider, SessionSource, SessionToken, SessionUser};
pub use store::{GuestStore, RoomStore};
pub use stream::EntityStream;
