//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod book;
pub mod bookings;
pub mod config_cmd;
pub mod services;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Book(args) => book::handle(&args, global).await,
        Command::Bookings(args) => {
            let desk = util::connect(global)?;
            let result = bookings::handle(&desk, args, global).await;
            desk.shutdown().await;
            result
        }
        Command::Services(args) => services::handle(&args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are generated in main before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
