// ── Entity stores ──
//
// Each store mirrors one content-API collection. Writes hit the API
// first; the cache follows the server's answer, or the configured
// `WritePolicy` when the API refuses.

mod auth_header;
mod collection;
mod guests;
mod repository;
mod rooms;

pub use guests::GuestStore;
pub use rooms::RoomStore;
