//! Command dispatch: bridges CLI args -> `FrontDesk` calls -> output formatting.

pub mod config_cmd;
pub mod guests;
pub mod rooms;
pub mod route;
pub mod seed;
pub mod session;
pub mod util;

use frontdesk_core::FrontDesk;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs the facade to the appropriate handler.
pub async fn dispatch(cmd: Command, desk: &FrontDesk, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(desk, args, global).await,
        Command::Session => {
            session::show(desk, global);
            Ok(())
        }
        Command::Guests(args) => guests::handle(desk, args, global).await,
        Command::Rooms(args) => rooms::handle(desk, args, global).await,
        Command::Seed(args) => seed::handle(desk, args, global).await,
        Command::Route(args) => {
            route::handle(desk, args, global);
            Ok(())
        }
        // Handled before the facade is built
        Command::Logout | Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command dispatched without a handler".into(),
        )),
    }
}
