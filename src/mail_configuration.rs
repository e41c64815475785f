use crate::configuration::EffectiveConfig;
use crate::error::RemindrError;
use secstr::SecStr;

/// Body of the reminder if none has been configured.
pub const DEFAULT_MESSAGE_BODY: &str = "This is an automated reminder notification";

/// Holds the credentials to authenticate at the
/// email server. They are bound to the host the
/// mail is sent to.
#[derive(Clone, Debug, PartialEq)]
pub struct Credential {
    pub user: String,
    pub password: SecStr,
    pub host: String,
}

/// Holds everything needed to hand one reminder
/// over to the email server.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    /// `<host>:<port>` of the email server
    pub server_address: String,
    pub credential: Option<Credential>,
    pub mail_from: String,
    pub mail_to: Vec<String>,
    pub raw_message: Vec<u8>,
}

/// Assemble the raw message: the subject header,
/// an empty line and the body.
pub fn build_raw_message(subject: &str, body: &str) -> Vec<u8> {
    format!("Subject: {}\r\n\r\n{}", subject, body).into_bytes()
}

impl TryFrom<EffectiveConfig> for OutboundRequest {
    type Error = RemindrError;

    /// Validate the effective configuration and build the request.
    ///
    /// The first violated rule is returned, no partial request
    /// is ever built.
    fn try_from(config: EffectiveConfig) -> Result<Self, Self::Error> {
        let mail_from = config
            .from_address
            .ok_or(RemindrError::MissingFromAddress)?;
        let user = config.user.unwrap_or_else(|| mail_from.clone());
        if config.to_addresses.is_empty() {
            return Err(RemindrError::MissingRecipients);
        }
        let smtp_host = config.smtp_host.ok_or(RemindrError::MissingHost)?;
        let credential = config.password.map(|password| Credential {
            user,
            password: SecStr::from(password),
            host: smtp_host.clone(),
        });
        let body = config
            .message_body
            .as_deref()
            .unwrap_or(DEFAULT_MESSAGE_BODY);
        Ok(OutboundRequest {
            server_address: format!("{}:{}", smtp_host, config.smtp_port),
            credential,
            mail_from,
            mail_to: config.to_addresses,
            raw_message: build_raw_message(&config.message_subject, body),
        })
    }
}

/// Used to add details to email address parsing errors
#[derive(Debug)]
pub enum ParseMailAddressErrorContext {
    FromAddress,
    ToAddress,
}

/// This trait adds functionality to the lettre crate
pub trait ParseAddressWithContext: Sized {
    /// parse an email address into the lettre `Address` format and
    /// add a context to the error message if that fails.
    ///
    /// # Arguments
    ///
    /// - `address`:         email address that should be parsed into an `Address`
    /// - `error_context`:   context that shows what the email address should be used for
    fn parse_with_context_on_error(
        address: &str,
        error_context: ParseMailAddressErrorContext,
    ) -> Result<Self, RemindrError>;
}

impl ParseAddressWithContext for lettre::Address {
    #[inline(always)]
    fn parse_with_context_on_error(
        address: &str,
        error_context: ParseMailAddressErrorContext,
    ) -> Result<lettre::Address, RemindrError> {
        match address.parse::<lettre::Address>() {
            Ok(p) => Ok(p),
            Err(e) => Err(RemindrError::Transport(format!(
                "{} ({}), {:?}",
                e, address, error_context
            ))),
        }
    }
}

/// This trait is a contract for the component that
/// talks SMTP. The binary uses `SmtpRelay`.
pub trait SendReminder {
    /// sends the raw message once
    ///
    /// # Arguments
    ///
    /// - `server_address`:   `<host>:<port>` of the email server
    /// - `credential`:       optional credentials, no authentication if `None`
    /// - `mail_from`:        envelope sender
    /// - `mail_to`:          envelope recipients
    /// - `raw_message`:      message as it is put on the wire
    fn send_mail(
        &self,
        server_address: &str,
        credential: Option<&Credential>,
        mail_from: &str,
        mail_to: &[String],
        raw_message: &[u8],
    ) -> Result<(), RemindrError>;

    /// Convenience wrapper that sends an `OutboundRequest`.
    fn send_request(&self, request: &OutboundRequest) -> Result<(), RemindrError> {
        self.send_mail(
            &request.server_address,
            request.credential.as_ref(),
            &request.mail_from,
            &request.mail_to,
            &request.raw_message,
        )
    }
}
