use crate::error::RemindrError;
use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Port of the email server if none has been configured.
pub const DEFAULT_SMTP_PORT: u16 = 25;
/// Subject of the reminder if none has been configured.
pub const DEFAULT_SUBJECT: &str = "REMINDER";

/// Holds the values of one configuration source,
/// either the command line or the configuration file.
/// Every field is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawConfig {
    pub config_file: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
    pub to_addresses: Option<Vec<String>>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub message_subject: Option<String>,
    pub message_body: Option<String>,
}

impl RawConfig {
    /// Values of `self` win, fields missing in `self`
    /// are taken from `base`.
    pub fn merge_over(self, base: RawConfig) -> RawConfig {
        RawConfig {
            config_file: self.config_file.or(base.config_file),
            user: self.user.or(base.user),
            password: self.password.or(base.password),
            from_address: self.from_address.or(base.from_address),
            to_addresses: self.to_addresses.or(base.to_addresses),
            smtp_host: self.smtp_host.or(base.smtp_host),
            smtp_port: self.smtp_port.or(base.smtp_port),
            message_subject: self.message_subject.or(base.message_subject),
            message_body: self.message_body.or(base.message_body),
        }
    }
}

/// Holds the deserialized entries of the configuration
/// file that is passed to the program. The keys are named
/// like the command line flags.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct ConfigurationFile {
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "from.address")]
    pub from_address: Option<String>,
    #[serde(rename = "to.addresses", default, deserialize_with = "one_or_many")]
    pub to_addresses: Option<Vec<String>>,
    #[serde(rename = "smtp.host")]
    pub smtp_host: Option<String>,
    #[serde(rename = "smtp.port")]
    pub smtp_port: Option<u16>,
    #[serde(rename = "message.subject")]
    pub message_subject: Option<String>,
    #[serde(rename = "message.body")]
    pub message_body: Option<String>,
}

/// Accepts a single address as well as a list of addresses.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
            OneOrMany::One(address) => vec![address],
            OneOrMany::Many(addresses) => addresses,
        }),
    )
}

/// Format of a configuration file, chosen by its extension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigurationFormat {
    Json,
    Yaml,
}

impl ConfigurationFormat {
    /// `.json` files are read as json, everything else as yaml.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("json") => ConfigurationFormat::Json,
            _ => ConfigurationFormat::Yaml,
        }
    }
}

/// Flatten nested maps into dotted keys, `smtp: {host: x}` becomes
/// `smtp.host: x`. A dotted key wins over the same key given nested.
fn flatten_keys(prefix: &str, map: Map<String, Value>, flat: &mut Map<String, Value>) {
    let (nested, plain): (Vec<_>, Vec<_>) = map.into_iter().partition(|(_, v)| v.is_object());
    for (key, value) in plain.into_iter().chain(nested) {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_keys(&key, inner, flat),
            value => {
                flat.entry(key).or_insert(value);
            }
        }
    }
}

impl ConfigurationFile {
    /// Read the configuration from a yaml or json file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RemindrError> {
        let path = path.as_ref();
        let config_parse_error = |reason: String| RemindrError::ConfigParse {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| config_parse_error(e.to_string()))?;
        let reader = BufReader::new(file);
        let document: Value = match ConfigurationFormat::from_path(path) {
            ConfigurationFormat::Json => {
                serde_json::from_reader(reader).map_err(|e| config_parse_error(e.to_string()))?
            }
            ConfigurationFormat::Yaml => {
                serde_yaml::from_reader(reader).map_err(|e| config_parse_error(e.to_string()))?
            }
        };
        let settings = match document {
            Value::Object(settings) => settings,
            // empty document
            Value::Null => Map::new(),
            other => {
                return Err(config_parse_error(format!(
                    "expected a map of settings, found {}",
                    other
                )))
            }
        };
        let mut flat = Map::new();
        flatten_keys("", settings, &mut flat);
        serde_json::from_value(Value::Object(flat)).map_err(|e| config_parse_error(e.to_string()))
    }
}

impl From<ConfigurationFile> for RawConfig {
    fn from(file: ConfigurationFile) -> Self {
        RawConfig {
            // a config file cannot point to another config file
            config_file: None,
            user: file.user,
            password: file.password,
            from_address: file.from_address,
            to_addresses: file.to_addresses,
            smtp_host: file.smtp_host,
            smtp_port: file.smtp_port,
            message_subject: file.message_subject,
            message_body: file.message_body,
        }
    }
}

/// The merged and defaulted configuration that is
/// used to build the outbound reminder.
///
/// `user` stays `None` if it has not been configured,
/// it falls back to the from address when the request
/// is built.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
    pub to_addresses: Vec<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub message_subject: String,
    pub message_body: Option<String>,
}

/// Empty strings count as not configured.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawConfig> for EffectiveConfig {
    fn from(raw: RawConfig) -> Self {
        EffectiveConfig {
            user: non_empty(raw.user),
            password: non_empty(raw.password),
            from_address: non_empty(raw.from_address),
            to_addresses: raw
                .to_addresses
                .unwrap_or_default()
                .into_iter()
                .filter(|address| !address.is_empty())
                .collect(),
            smtp_host: non_empty(raw.smtp_host),
            smtp_port: raw.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            message_subject: non_empty(raw.message_subject)
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            message_body: non_empty(raw.message_body),
        }
    }
}

/// Resolve the effective configuration.
///
/// If the command line names a config file, that file is read
/// first and every value supplied on the command line overrides
/// the value from the file. Defaults are applied afterwards.
///
/// # Arguments
///
/// - `command_line`: values supplied on the command line
///
/// # Returns
///
/// - `EffectiveConfig` or `RemindrError::ConfigParse` if the
///   config file cannot be read
pub fn resolve_configuration(command_line: RawConfig) -> Result<EffectiveConfig, RemindrError> {
    let base = match &command_line.config_file {
        Some(path) => {
            debug!("reading config file {}", path.display());
            RawConfig::from(ConfigurationFile::read_from_file(path)?)
        }
        None => RawConfig::default(),
    };
    let effective_config = EffectiveConfig::from(command_line.merge_over(base));
    debug!(
        "resolved configuration: from = {:?}, to = {:?}, server = {:?}:{}, subject = {:?}",
        effective_config.from_address,
        effective_config.to_addresses,
        effective_config.smtp_host,
        effective_config.smtp_port,
        effective_config.message_subject
    );
    Ok(effective_config)
}
