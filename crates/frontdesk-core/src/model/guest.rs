// ── Guest domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_id::RecordId;
use super::timestamp;
use super::{Patch, Record};

/// Stay status of a guest.
///
/// `Active` is the value older records were written with; anything the
/// client does not recognise decodes to `Unknown`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GuestStatus {
    Confirmed,
    CheckedOut,
    Active,
    #[default]
    #[serde(other)]
    Unknown,
}

/// The canonical Guest type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: RecordId,
    #[serde(default, alias = "document_id", skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub fullname: String,

    // Stay
    #[serde(default, alias = "check_in", deserialize_with = "timestamp::deserialize")]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default, alias = "leave_date", deserialize_with = "timestamp::deserialize")]
    pub leave_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "room_no")]
    pub room_no: Option<i64>,

    #[serde(default, rename = "statusfield", alias = "status")]
    pub status: GuestStatus,
    #[serde(default)]
    pub paid: bool,

    /// Fields the client has no typed slot for, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Guest {
    pub fn is_checked_out(&self) -> bool {
        self.status == GuestStatus::CheckedOut
    }
}

impl Record for Guest {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Fields to send when creating or updating a guest. `None` fields are
/// left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_no: Option<i64>,
    #[serde(default, rename = "statusfield", skip_serializing_if = "Option::is_none")]
    pub status: Option<GuestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

impl GuestPatch {
    /// Patch that marks a guest as checked out and touches nothing else.
    pub fn check_out() -> Self {
        Self {
            status: Some(GuestStatus::CheckedOut),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Patch<Guest> for GuestPatch {
    fn apply_to(&self, guest: &mut Guest) {
        if let Some(document_id) = &self.document_id {
            guest.document_id = Some(document_id.clone());
        }
        if let Some(fullname) = &self.fullname {
            guest.fullname.clone_from(fullname);
        }
        if let Some(check_in) = self.check_in {
            guest.check_in = Some(check_in);
        }
        if let Some(leave_date) = self.leave_date {
            guest.leave_date = Some(leave_date);
        }
        if let Some(room_no) = self.room_no {
            guest.room_no = Some(room_no);
        }
        if let Some(status) = self.status {
            guest.status = status;
        }
        if let Some(paid) = self.paid {
            guest.paid = paid;
        }
    }
}
