use crate::configuration::RawConfig;
use crate::PROGRAM_AUTHORS;
use crate::PROGRAM_DESCRIPTION;
use crate::PROGRAM_NAME;
use crate::PROGRAM_VERSION;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

pub const ARG_CONFIG_FILE: &str = "config";
pub const ARG_USER: &str = "user";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_FROM_ADDRESS: &str = "from.address";
pub const ARG_TO_ADDRESSES: &str = "to.addresses";
pub const ARG_SMTP_HOST: &str = "smtp.host";
pub const ARG_SMTP_PORT: &str = "smtp.port";
pub const ARG_MESSAGE_SUBJECT: &str = "message.subject";
pub const ARG_MESSAGE_BODY: &str = "message.body";

/// Kind of value a flag accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlagValue {
    Text,
    List,
    Port,
}

/// Maps the canonical name of a configuration field to
/// every name it is accepted under on the command line.
#[derive(Debug)]
pub struct FlagSpec {
    pub name: &'static str,
    pub short: Option<char>,
    pub aliases: &'static [&'static str],
    pub value: FlagValue,
    pub value_name: &'static str,
    pub help: &'static str,
}

pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        name: ARG_CONFIG_FILE,
        short: Some('c'),
        aliases: &["cfg", "confg"],
        value: FlagValue::Text,
        value_name: "configuration file",
        help: "optional path to config file (yaml, json if the name ends in .json)",
    },
    FlagSpec {
        name: ARG_USER,
        short: Some('u'),
        aliases: &[],
        value: FlagValue::Text,
        value_name: "user",
        help: "auth username for the email server (will use from address if no user provided)",
    },
    FlagSpec {
        name: ARG_PASSWORD,
        short: Some('p'),
        aliases: &["passwd"],
        value: FlagValue::Text,
        value_name: "password",
        help: "auth password for the email server",
    },
    FlagSpec {
        name: ARG_FROM_ADDRESS,
        short: None,
        aliases: &["from-addr", "fa"],
        value: FlagValue::Text,
        value_name: "address",
        help: "email address the reminder is sent by",
    },
    FlagSpec {
        name: ARG_TO_ADDRESSES,
        short: None,
        aliases: &["to-addrs", "ta"],
        value: FlagValue::List,
        value_name: "address,...",
        help: "list of email addresses to send the reminder to",
    },
    FlagSpec {
        name: ARG_SMTP_HOST,
        short: None,
        aliases: &["sh", "host"],
        value: FlagValue::Text,
        value_name: "host",
        help: "host of the email server",
    },
    FlagSpec {
        name: ARG_SMTP_PORT,
        short: None,
        aliases: &["sp", "port"],
        value: FlagValue::Port,
        value_name: "port",
        help: "port of the email server [default: 25]",
    },
    FlagSpec {
        name: ARG_MESSAGE_SUBJECT,
        short: Some('s'),
        aliases: &[],
        value: FlagValue::Text,
        value_name: "subject",
        help: "subject of the reminder [default: REMINDER]",
    },
    FlagSpec {
        name: ARG_MESSAGE_BODY,
        short: Some('m'),
        aliases: &[],
        value: FlagValue::Text,
        value_name: "text",
        help: "reminder message to be sent",
    },
];

impl FlagSpec {
    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name)
            .long(self.name)
            .visible_aliases(self.aliases.iter().copied())
            .value_name(self.value_name)
            .help(self.help);
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        match self.value {
            FlagValue::Text => arg.num_args(1).action(ArgAction::Set),
            // repeatable, every occurrence may hold a comma separated list
            FlagValue::List => arg
                .num_args(1)
                .value_delimiter(',')
                .action(ArgAction::Append),
            FlagValue::Port => arg
                .num_args(1)
                .value_parser(clap::value_parser!(u16))
                .action(ArgAction::Set),
        }
    }
}

/// Build the command line interface with help of clap.
pub fn build_cli() -> Command {
    FLAGS.iter().fold(
        Command::new(PROGRAM_NAME)
            .version(PROGRAM_VERSION)
            .author(PROGRAM_AUTHORS)
            .about(PROGRAM_DESCRIPTION),
        |command, flag| command.arg(flag.to_arg()),
    )
}

/// Parse the given command line parameters.
///
/// Help and version requests as well as malformed parameters
/// are returned as `clap::Error`, the caller decides how to exit.
pub fn parse_cli_parameters_from<I, T>(args: I) -> Result<ArgMatches, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    build_cli().try_get_matches_from(args)
}

/// Collect the values the invoker actually supplied.
///
/// No defaults are registered with clap, so every value
/// found in the matches came from the command line.
pub fn raw_config_from_matches(matches: &ArgMatches) -> RawConfig {
    let text = |name: &str| matches.get_one::<String>(name).cloned();
    RawConfig {
        config_file: matches.get_one::<String>(ARG_CONFIG_FILE).map(PathBuf::from),
        user: text(ARG_USER),
        password: text(ARG_PASSWORD),
        from_address: text(ARG_FROM_ADDRESS),
        to_addresses: matches
            .get_many::<String>(ARG_TO_ADDRESSES)
            .map(|values| values.cloned().collect()),
        smtp_host: text(ARG_SMTP_HOST),
        smtp_port: matches.get_one::<u16>(ARG_SMTP_PORT).copied(),
        message_subject: text(ARG_MESSAGE_SUBJECT),
        message_body: text(ARG_MESSAGE_BODY),
    }
}
