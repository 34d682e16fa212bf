//! Guest command handlers.

use std::sync::Arc;

use tabled::Tabled;
use tracing::warn;

use frontdesk_core::{FrontDesk, Guest, GuestPatch, RecordId};

use crate::cli::{GlobalOpts, GuestFields, GuestUpdateFields, GuestsArgs, GuestsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Leaves")]
    leave_date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

impl From<&Arc<Guest>> for GuestRow {
    fn from(g: &Arc<Guest>) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.fullname.clone(),
            room: g.room_no.map(|n| n.to_string()).unwrap_or_default(),
            check_in: util::fmt_date(g.check_in),
            leave_date: util::fmt_date(g.leave_date),
            status: g.status.to_string(),
            paid: if g.paid { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(g: &Arc<Guest>) -> String {
    let mut lines = vec![
        format!("ID:        {}", g.id),
        format!("Name:      {}", g.fullname),
        format!(
            "Room:      {}",
            g.room_no.map_or_else(|| "-".into(), |n| n.to_string())
        ),
        format!("Check-in:  {}", util::fmt_date(g.check_in)),
        format!("Leaves:    {}", util::fmt_date(g.leave_date)),
        format!("Status:    {}", g.status),
        format!("Paid:      {}", g.paid),
    ];
    if let Some(ref doc) = g.document_id {
        lines.push(format!("Document:  {doc}"));
    }
    lines.join("\n")
}

fn print_guest(guest: &Arc<Guest>, global: &GlobalOpts) {
    let out = output::render_single(global.format(), guest, detail, |g| g.id.to_string());
    output::print_output(&out, global.quiet);
}

// ── Patch building ──────────────────────────────────────────────────

fn new_guest(fields: GuestFields) -> GuestPatch {
    GuestPatch {
        fullname: Some(fields.name),
        room_no: fields.room,
        check_in: fields.check_in.map(util::start_of_day),
        leave_date: fields.leave_date.map(util::start_of_day),
        status: Some(fields.status.into()),
        paid: Some(fields.paid),
        ..GuestPatch::default()
    }
}

fn guest_changes(fields: GuestUpdateFields) -> GuestPatch {
    GuestPatch {
        fullname: fields.name,
        room_no: fields.room,
        check_in: fields.check_in.map(util::start_of_day),
        leave_date: fields.leave_date.map(util::start_of_day),
        status: fields.status.map(Into::into),
        paid: fields.paid,
        ..GuestPatch::default()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &FrontDesk, args: GuestsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let guests = desk.guests();
    match args.command {
        GuestsCommand::List { room } => {
            let snap = guests.list().await;
            let shown = match room {
                Some(n) => guests.in_room(n),
                None => snap.as_ref().clone(),
            };
            let out = output::render_list(
                global.format(),
                &shown,
                |g| GuestRow::from(g),
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Add(fields) => {
            let created = guests.create(&new_guest(fields)).await?;
            if !global.quiet {
                eprintln!("Guest {} registered", created.id);
            }
            print_guest(&created, global);
            Ok(())
        }

        GuestsCommand::Update { id, fields } => {
            let patch = guest_changes(fields);
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "fields".into(),
                    reason: "nothing to update; pass at least one field flag".into(),
                });
            }
            // Optimistic writes need the cached record to patch.
            guests.list().await;
            let updated = guests.update(RecordId::new(id), &patch).await?;
            print_guest(&updated, global);
            Ok(())
        }

        GuestsCommand::CheckOut { id, vacate } => {
            guests.list().await;
            let guest = guests.get(RecordId::new(id)).ok_or_else(|| CliError::NotFound {
                resource_type: "guest".into(),
                identifier: id.to_string(),
                list_command: "guests list".into(),
            })?;
            if guest.is_checked_out() {
                warn!(id, "guest is already checked out");
            }
            let updated = guests.check_out(&guest).await?;

            if vacate {
                match guest.room_no {
                    Some(room_no) => {
                        desk.rooms().list().await;
                        if desk.rooms().vacate(room_no).await?.is_none() {
                            warn!(room_no, "guest's room does not exist, nothing to vacate");
                        }
                    }
                    None => warn!(id, "guest has no room, nothing to vacate"),
                }
            }

            if !global.quiet {
                eprintln!("Guest {} checked out", updated.id);
            }
            print_guest(&updated, global);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use frontdesk_core::GuestStatus;

    use super::*;
    use crate::cli::StatusArg;

    #[test]
    fn update_only_carries_given_fields() {
        let patch = guest_changes(GuestUpdateFields {
            name: None,
            room: Some(12),
            check_in: None,
            leave_date: None,
            status: Some(StatusArg::CheckedOut),
            paid: None,
        });
        assert_eq!(patch.room_no, Some(12));
        assert_eq!(patch.status, Some(GuestStatus::CheckedOut));
        assert!(patch.fullname.is_none());
        assert!(patch.paid.is_none());
    }

    #[test]
    fn new_guest_dates_start_at_midnight() {
        let patch = new_guest(GuestFields {
            name: "Léa Martin".into(),
            room: Some(3),
            check_in: NaiveDate::from_ymd_opt(2024, 5, 1),
            leave_date: None,
            status: StatusArg::Confirmed,
            paid: false,
        });
        assert_eq!(
            patch.check_in.unwrap().to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
        assert_eq!(patch.paid, Some(false));
        assert_eq!(patch.status, Some(GuestStatus::Confirmed));
    }
}
