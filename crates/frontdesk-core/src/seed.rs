// ── Guest seeder ──
//
// Fills a development backend with plausible guests. Always runs with the
// service token, posts one record at a time and keeps going past failures.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use frontdesk_api::CmsClient;
use rand::Rng;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::model::{Guest, GuestPatch, GuestStatus, Room};

const FIRST_NAMES: &[&str] = &[
    "Camille", "Léa", "Manon", "Chloé", "Inès", "Sarah", "Julie", "Emma", "Louise", "Alice",
    "Lucas", "Hugo", "Louis", "Nathan", "Gabriel", "Arthur", "Jules", "Théo", "Antoine", "Paul",
];

const LAST_NAMES: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefebvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    "Vincent", "Fournier",
];

const CHECK_IN_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;
const DAY_SECS: i64 = 24 * 60 * 60;
const MAX_STAY_SECS: i64 = 14 * DAY_SECS;
const PAID_PROBABILITY: f64 = 0.7;

/// How seeded guests get their room number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Cycle through the room numbers that exist on the server.
    #[default]
    RoomAware,
    /// Random room number between 100 and 999; rooms are not consulted.
    Simple,
}

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub count: usize,
    pub mode: SeedMode,
    /// Pause between two posts.
    pub delay: Duration,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            count: 10,
            mode: SeedMode::RoomAware,
            delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

/// Posts randomly generated guests with the service token.
pub struct GuestSeeder {
    client: CmsClient,
    token: SecretString,
}

impl GuestSeeder {
    pub fn new(client: CmsClient, token: SecretString) -> Self {
        Self { client, token }
    }

    /// Generate and post `options.count` guests.
    ///
    /// In room-aware mode the room list must load and be non-empty,
    /// otherwise nothing is posted and the error is returned. Individual
    /// post failures are logged and counted in the report.
    pub async fn run<R>(&self, options: &SeedOptions, rng: &mut R) -> Result<SeedReport, CoreError>
    where
        R: Rng + Send,
    {
        let room_numbers = match options.mode {
            SeedMode::RoomAware => self.room_numbers().await?,
            SeedMode::Simple => Vec::new(),
        };
        info!(count = options.count, mode = ?options.mode, "seeding guests");

        let mut report = SeedReport::default();
        for i in 0..options.count {
            let room_no = match room_numbers.get(i % room_numbers.len().max(1)) {
                Some(&n) => n,
                None => rng.random_range(100..=999),
            };
            let guest = generate_guest(rng, room_no, Utc::now());

            match self.client.create::<Guest, _>("guests", &guest, &self.token).await {
                Ok(created) => {
                    report.created += 1;
                    info!(
                        n = i + 1,
                        id = %created.id,
                        fullname = %created.fullname,
                        room_no,
                        "seeded guest"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(n = i + 1, error = %e, "cannot seed guest");
                }
            }

            if i + 1 < options.count && !options.delay.is_zero() {
                tokio::time::sleep(options.delay).await;
            }
        }

        info!(created = report.created, failed = report.failed, "seeding finished");
        Ok(report)
    }

    async fn room_numbers(&self) -> Result<Vec<i64>, CoreError> {
        let page = self.client.list::<Room>("rooms", &self.token).await?;
        if page.data.is_empty() {
            warn!("no rooms on the server, nothing to seed");
            return Err(CoreError::UnexpectedResponse {
                message: "no rooms found; cannot assign seeded guests".into(),
            });
        }
        info!(rooms = page.data.len(), "rooms found");
        Ok(page.data.iter().map(|r| r.room_no).collect())
    }
}

/// One random guest for `room_no`, relative to `now`.
///
/// Check-in falls within the last 30 days and the stay lasts 1 to 14 days.
/// Guests whose leave date has passed are already checked out.
pub fn generate_guest<R: Rng>(rng: &mut R, room_no: i64, now: DateTime<Utc>) -> GuestPatch {
    let check_in = now - TimeDelta::seconds(rng.random_range(0..=CHECK_IN_WINDOW_SECS));
    let leave_date = check_in + TimeDelta::seconds(rng.random_range(DAY_SECS..=MAX_STAY_SECS));
    let status = if leave_date < now {
        GuestStatus::CheckedOut
    } else {
        GuestStatus::Confirmed
    };

    GuestPatch {
        document_id: Some(document_id(rng)),
        fullname: Some(full_name(rng)),
        check_in: Some(check_in),
        leave_date: Some(leave_date),
        room_no: Some(room_no),
        status: Some(status),
        paid: Some(rng.random_bool(PAID_PROBABILITY)),
    }
}

fn full_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

/// 12 random bytes, hex encoded.
fn document_id<R: Rng>(rng: &mut R) -> String {
    let bytes: [u8; 12] = rng.random();
    bytes.iter().fold(String::with_capacity(24), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn generated_guest_is_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        for _ in 0..200 {
            let g = generate_guest(&mut rng, 7, now);
            let check_in = g.check_in.unwrap();
            let leave = g.leave_date.unwrap();

            assert!(check_in <= now);
            assert!(now - check_in <= TimeDelta::days(30));
            assert!(leave - check_in >= TimeDelta::days(1));
            assert!(leave - check_in <= TimeDelta::days(14));
            assert_eq!(g.room_no, Some(7));
            let expected = if leave < now {
                GuestStatus::CheckedOut
            } else {
                GuestStatus::Confirmed
            };
            assert_eq!(g.status, Some(expected));
        }
    }

    #[test]
    fn document_id_is_24_hex_chars() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = document_id(&mut rng);
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_seed_same_guest() {
        let now = Utc::now();
        let a = generate_guest(&mut StdRng::seed_from_u64(9), 1, now);
        let b = generate_guest(&mut StdRng::seed_from_u64(9), 1, now);
        assert_eq!(a, b);
    }

    #[test]
    fn paid_ratio_is_roughly_seventy_percent() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc::now();
        let paid = (0..1000)
            .filter(|_| generate_guest(&mut rng, 1, now).paid == Some(true))
            .count();
        assert!((600..=800).contains(&paid), "paid = {paid}");
    }
}
