// ── Domain model ──
//
// Canonical record types as the stores hold them. Wire names follow the
// content API (camelCase); snake_case aliases written by older tooling are
// accepted on input.

mod guest;
mod record_id;
mod room;
pub(crate) mod timestamp;

pub use guest::{Guest, GuestPatch, GuestStatus};
pub use record_id::RecordId;
pub use room::{Room, RoomPatch};

/// A record held in a store: anything with a server-assigned id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> RecordId;
}

/// A partial record that can be sent to the API and, when a write
/// policy asks for it, applied to the cached copy.
pub trait Patch<T>: serde::Serialize + Send + Sync {
    fn apply_to(&self, record: &mut T);
}
