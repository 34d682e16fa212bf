// ── Room domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::guest::Guest;
use super::record_id::RecordId;
use super::timestamp;
use super::{Patch, Record};

/// Room type that is priced at the premium rate when no price is stored.
pub const VIP_ROOM_TYPE: &str = "vip";

const VIP_DEFAULT_PRICE: f64 = 200.0;
const STANDARD_DEFAULT_PRICE: f64 = 100.0;

/// The canonical Room type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RecordId,
    #[serde(default, alias = "document_id", skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(rename = "type", default)]
    pub room_type: String,
    /// `None` means the API did not say; such rooms count as available.
    #[serde(default)]
    pub occupied: Option<bool>,
    #[serde(alias = "room_no")]
    pub room_no: i64,
    #[serde(default)]
    pub beds: Option<u32>,

    // Lifecycle
    #[serde(default, alias = "created_at", deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at", deserialize_with = "timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "published_at", deserialize_with = "timestamp::deserialize")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_guest_relation")]
    pub guest: Option<Box<Guest>>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Room {
    pub fn is_available(&self) -> bool {
        self.occupied != Some(true)
    }

    pub fn is_vip(&self) -> bool {
        self.room_type.eq_ignore_ascii_case(VIP_ROOM_TYPE)
    }

    /// Fill in the price from the room type if the API left it out.
    pub fn with_default_price(mut self) -> Self {
        if self.price.is_none() {
            self.price = Some(if self.is_vip() {
                VIP_DEFAULT_PRICE
            } else {
                STANDARD_DEFAULT_PRICE
            });
        }
        self
    }

    /// Placeholder room number 2, shown when the room list cannot be loaded.
    pub fn backup(now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(999),
            document_id: Some("backup-room-2".into()),
            room_type: "standard".into(),
            occupied: Some(false),
            room_no: 2,
            beds: Some(1),
            created_at: Some(now),
            updated_at: Some(now),
            published_at: Some(now),
            guest: None,
            price: Some(STANDARD_DEFAULT_PRICE),
        }
    }
}

impl Record for Room {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Populated relations arrive either flat, wrapped as `{data: ...}`, or in
/// the legacy `attributes` shape. An unpopulated relation (bare id) or
/// anything else that is not a guest object reads as no guest.
fn deserialize_guest_relation<'de, D>(deserializer: D) -> Result<Option<Box<Guest>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let value = match raw {
        Some(Value::Object(mut map)) if map.contains_key("data") && !map.contains_key("id") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        Some(other) => other,
        None => return Ok(None),
    };
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(frontdesk_api::flatten_record(value))
        .ok()
        .map(Box::new))
}

/// Fields to send when updating a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Outer `None` leaves the relation alone, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_relation")]
    pub guest: Option<Option<RecordId>>,
}

fn serialize_relation<S>(guest: &Option<Option<RecordId>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match guest {
        Some(Some(id)) => id.serialize(serializer),
        _ => serializer.serialize_none(),
    }
}

impl RoomPatch {
    /// Mark occupied and link the guest, in one request.
    pub fn occupy(guest: RecordId) -> Self {
        Self {
            occupied: Some(true),
            guest: Some(Some(guest)),
            ..Self::default()
        }
    }

    /// Mark free and unlink any guest.
    pub fn vacate() -> Self {
        Self {
            occupied: Some(false),
            guest: Some(None),
            ..Self::default()
        }
    }
}

impl Patch<Room> for RoomPatch {
    fn apply_to(&self, room: &mut Room) {
        if let Some(room_type) = &self.room_type {
            room.room_type.clone_from(room_type);
        }
        if let Some(occupied) = self.occupied {
            room.occupied = Some(occupied);
        }
        if let Some(beds) = self.beds {
            room.beds = Some(beds);
        }
        if let Some(price) = self.price {
            room.price = Some(price);
        }
        match self.guest {
            Some(None) => room.guest = None,
            // Only the id is known locally; a cached guest with another id is stale.
            Some(Some(id)) => {
                if room.guest.as_ref().is_some_and(|g| g.id != id) {
                    room.guest = None;
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn room(value: Value) -> Room {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn null_occupancy_is_available() {
        let r = room(json!({ "id": 1, "type": "standard", "occupied": null, "roomNo": 3 }));
        assert_eq!(r.occupied, None);
        assert!(r.is_available());
    }

    #[test]
    fn default_price_follows_room_type() {
        let vip = room(json!({ "id": 1, "type": "vip", "roomNo": 1 })).with_default_price();
        let standard = room(json!({ "id": 2, "type": "standard", "roomNo": 2 })).with_default_price();
        let priced = room(json!({ "id": 3, "type": "vip", "roomNo": 3, "price": 350 }))
            .with_default_price();

        assert_eq!(vip.price, Some(200.0));
        assert_eq!(standard.price, Some(100.0));
        assert_eq!(priced.price, Some(350.0));
    }

    #[test]
    fn embedded_guest_in_every_shape() {
        let flat = room(json!({
            "id": 1, "roomNo": 1,
            "guest": { "id": 5, "fullname": "Anne Roux" }
        }));
        let wrapped = room(json!({
            "id": 1, "roomNo": 1,
            "guest": { "data": { "id": 5, "attributes": { "fullname": "Anne Roux" } } }
        }));
        let bare = room(json!({ "id": 1, "roomNo": 1, "guest": 5 }));

        assert_eq!(flat.guest.as_ref().unwrap().fullname, "Anne Roux");
        assert_eq!(wrapped.guest.as_ref().unwrap().id, RecordId::new(5));
        assert!(bare.guest.is_none());
    }

    #[test]
    fn occupy_and_vacate_bodies() {
        assert_eq!(
            serde_json::to_value(RoomPatch::occupy(RecordId::new(9))).unwrap(),
            json!({ "occupied": true, "guest": 9 })
        );
        assert_eq!(
            serde_json::to_value(RoomPatch::vacate()).unwrap(),
            json!({ "occupied": false, "guest": null })
        );
    }

    #[test]
    fn backup_room_is_room_two() {
        let r = Room::backup(Utc::now());
        assert_eq!(r.id, RecordId::new(999));
        assert_eq!(r.room_no, 2);
        assert_eq!(r.document_id.as_deref(), Some("backup-room-2"));
        assert!(r.is_available());
    }
}
