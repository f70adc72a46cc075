//! Command dispatch: bridges CLI args -> core client calls -> output formatting.

pub mod config_cmd;
pub mod resources;
pub mod search;
pub mod tickets;
pub mod users;
pub mod util;

use helpdesk_core::HelpdeskClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an account-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, client: &HelpdeskClient, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tickets(args) => tickets::handle(client, args, global),
        Command::Users(args) => users::handle(client, args, global),
        Command::Organizations(args) => {
            resources::handle(&client.organizations(), args, global, "organization", "organizations")
        }
        Command::Groups(args) => resources::handle(&client.groups(), args, global, "group", "groups"),
        Command::Brands(args) => resources::handle(&client.brands(), args, global, "brand", "brands"),
        Command::Topics(args) => resources::handle(&client.topics(), args, global, "topic", "topics"),
        Command::JobStatus { id } => resources::job_status(&client.job_statuses(), &id, global),
        Command::Search(args) => search::handle(client, args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
