pub use crate::mail_configuration::{
    Credential, ParseAddressWithContext, ParseMailAddressErrorContext, SendReminder,
};
use crate::error::RemindrError;
use crate::unsecure_string::SecureStringToUnsecureString;
use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, SmtpTransport, Transport};
use log::debug;

/// Sends reminders through an SMTP relay. The connection
/// is upgraded with STARTTLS if the server offers it,
/// credentials are only sent over TLS unless the relay
/// runs on localhost.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmtpRelay;

/// Hosts credentials may be sent to without TLS.
pub fn is_localhost(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host == "::1"
}

/// Split `<host>:<port>` into its parts, IPv6 hosts
/// may be enclosed in brackets.
pub fn split_server_address(server_address: &str) -> Result<(&str, u16), RemindrError> {
    let (host, port) = server_address.rsplit_once(':').ok_or_else(|| {
        RemindrError::Transport(format!("missing port in address {}", server_address))
    })?;
    let port = port.parse::<u16>().map_err(|e| {
        RemindrError::Transport(format!("invalid port in address {}: {}", server_address, e))
    })?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(RemindrError::Transport(format!(
            "missing host in address {}",
            server_address
        )));
    }
    Ok((host, port))
}

impl SendReminder for SmtpRelay {
    fn send_mail(
        &self,
        server_address: &str,
        credential: Option<&Credential>,
        mail_from: &str,
        mail_to: &[String],
        raw_message: &[u8],
    ) -> Result<(), RemindrError> {
        let (host, port) = split_server_address(server_address)?;
        if let Some(c) = credential.filter(|c| c.host != host) {
            return Err(RemindrError::Transport(format!(
                "credentials are bound to {}, not to {}",
                c.host, host
            )));
        }
        let parsed_mail_from =
            Address::parse_with_context_on_error(mail_from, ParseMailAddressErrorContext::FromAddress)?;
        let parsed_mail_to = mail_to
            .iter()
            .map(|to| Address::parse_with_context_on_error(to, ParseMailAddressErrorContext::ToAddress))
            .collect::<Result<Vec<Address>, RemindrError>>()?;
        let envelope = Envelope::new(Some(parsed_mail_from), parsed_mail_to)?;

        let tls_parameters = TlsParameters::new(host.to_string())?;
        let tls = if credential.is_some() && !is_localhost(host) {
            Tls::Required(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };
        let mut tp = SmtpTransport::builder_dangerous(host).port(port).tls(tls);
        if let Some(c) = credential {
            tp = tp
                .credentials(Credentials::new(
                    c.user.clone(),
                    c.password.to_unsecure_string(),
                ))
                .authentication(vec![Mechanism::Plain]);
        }
        let smtp_transport = tp.build();
        debug!(
            "sending {} bytes to {} recipient(s) via {}",
            raw_message.len(),
            mail_to.len(),
            server_address
        );
        smtp_transport.send_raw(&envelope, raw_message)?;
        Ok(())
    }
}
