//! Room command handlers.

use std::sync::Arc;

use tabled::Tabled;

use frontdesk_core::{FrontDesk, RecordId, Room};

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "No")]
    room_no: String,
    #[tabled(rename = "Type")]
    room_type: String,
    #[tabled(rename = "Beds")]
    beds: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Arc<Room>> for RoomRow {
    fn from(r: &Arc<Room>) -> Self {
        Self {
            room_no: r.room_no.to_string(),
            room_type: r.room_type.clone(),
            beds: r.beds.map(|b| b.to_string()).unwrap_or_default(),
            price: r.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
            state: state(r).into(),
            guest: r
                .guest
                .as_ref()
                .map(|g| g.fullname.clone())
                .unwrap_or_default(),
            id: r.id.to_string(),
        }
    }
}

fn state(r: &Room) -> &'static str {
    match r.occupied {
        Some(true) => "occupied",
        Some(false) => "free",
        None => "free (unset)",
    }
}

fn detail(r: &Arc<Room>) -> String {
    let mut lines = vec![
        format!("Room:     {}", r.room_no),
        format!("ID:       {}", r.id),
        format!("Type:     {}", r.room_type),
        format!("State:    {}", state(r)),
    ];
    if let Some(beds) = r.beds {
        lines.push(format!("Beds:     {beds}"));
    }
    if let Some(price) = r.price {
        lines.push(format!("Price:    {price:.2}"));
    }
    if let Some(ref g) = r.guest {
        lines.push(format!("Guest:    {} ({})", g.fullname, g.id));
    }
    lines.join("\n")
}

fn print_room(room: &Arc<Room>, global: &GlobalOpts) {
    let out = output::render_single(global.format(), room, detail, |r| r.room_no.to_string());
    output::print_output(&out, global.quiet);
}

fn print_rooms(rooms: &[Arc<Room>], global: &GlobalOpts) {
    let out = output::render_list(
        global.format(),
        rooms,
        |r| RoomRow::from(r),
        |r| r.room_no.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &FrontDesk, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let rooms = desk.rooms();
    match args.command {
        RoomsCommand::List => {
            let snap = rooms.list().await;
            print_rooms(&snap, global);
            Ok(())
        }

        RoomsCommand::Available => {
            rooms.list().await;
            print_rooms(&rooms.available_rooms(), global);
            Ok(())
        }

        RoomsCommand::Occupy { room_no, guest } => {
            desk.guests().list().await;
            let guest = desk
                .guests()
                .get(RecordId::new(guest))
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "guest".into(),
                    identifier: guest.to_string(),
                    list_command: "guests list".into(),
                })?;

            rooms.list().await;
            let room = rooms.occupy(room_no, &guest).await?;
            if !global.quiet {
                eprintln!("Room {} assigned to {}", room.room_no, guest.fullname);
            }
            print_room(&room, global);
            Ok(())
        }

        RoomsCommand::Vacate { room_no } => {
            rooms.list().await;
            let room = rooms
                .vacate(room_no)
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "room".into(),
                    identifier: room_no.to_string(),
                    list_command: "rooms list".into(),
                })?;
            if !global.quiet {
                eprintln!("Room {} is free", room.room_no);
            }
            print_room(&room, global);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn unset_occupancy_reads_as_free() {
        let mut room = Room::backup(Utc::now());
        room.occupied = None;
        let row = RoomRow::from(&Arc::new(room));
        assert_eq!(row.state, "free (unset)");
        assert_eq!(row.price, "100.00");
        assert_eq!(row.room_no, "2");
    }
}
