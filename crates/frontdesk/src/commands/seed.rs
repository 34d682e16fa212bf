//! Seed command handler.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use frontdesk_core::{FrontDesk, SeedMode, SeedOptions, SeedReport};

use crate::cli::{GlobalOpts, SeedArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(desk: &FrontDesk, args: SeedArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = desk.config().api_url.to_string();
    if !util::confirm(
        "seed",
        &format!("Create {} generated guests at {target}?", args.count),
        global.yes,
    )? {
        return Ok(());
    }

    let options = SeedOptions {
        count: args.count,
        mode: if args.simple {
            SeedMode::Simple
        } else {
            SeedMode::RoomAware
        },
        delay: Duration::from_millis(args.delay_ms),
    };
    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let report = desk.seeder().run(&options, &mut rng).await?;
    if report.created == 0 && report.failed > 0 {
        return Err(CliError::ApiError {
            message: format!("none of the {} guests could be created", report.failed),
            status: None,
        });
    }

    let out = output::render_single(
        global.format(),
        &report,
        |r: &SeedReport| format!("Created:  {}\nFailed:   {}", r.created, r.failed),
        |r| r.created.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
