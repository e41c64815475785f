// tell the rust compiler which modules we have in extra files
pub mod cli_parser;
pub mod configuration;
pub mod error;
pub mod mail_configuration;
pub mod mail_smtp_relay;
pub mod unsecure_string;

use crate::cli_parser::raw_config_from_matches;
use crate::configuration::resolve_configuration;
use crate::error::RemindrError;
use crate::mail_configuration::{OutboundRequest, SendReminder};
use log::info;

pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROGRAM_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const PROGRAM_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Resolve the configuration from the parsed command line,
/// validate it and send the reminder exactly once.
pub fn run(matches: &clap::ArgMatches, transport: &impl SendReminder) -> Result<(), RemindrError> {
    let effective_config = resolve_configuration(raw_config_from_matches(matches))?;
    let request = OutboundRequest::try_from(effective_config)?;
    transport.send_request(&request)?;
    info!("email sent...");
    Ok(())
}
