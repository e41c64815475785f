use remindr::configuration::{EffectiveConfig, DEFAULT_SMTP_PORT, DEFAULT_SUBJECT};
use remindr::error::RemindrError;
use remindr::mail_configuration::{build_raw_message, OutboundRequest, DEFAULT_MESSAGE_BODY};
use remindr::unsecure_string::SecureStringToUnsecureString;

fn valid_config() -> EffectiveConfig {
    EffectiveConfig {
        user: None,
        password: None,
        from_address: Some("ops@example.com".to_string()),
        to_addresses: vec!["alice@example.com".to_string()],
        smtp_host: Some("mail.example.com".to_string()),
        smtp_port: DEFAULT_SMTP_PORT,
        message_subject: DEFAULT_SUBJECT.to_string(),
        message_body: None,
    }
}

#[test]
fn raw_message_layout() {
    assert_eq!(
        build_raw_message("Hello", "World"),
        b"Subject: Hello\r\n\r\nWorld".to_vec(),
        "no trailing terminator expected"
    );
}

#[test]
fn default_body() {
    let request = OutboundRequest::try_from(valid_config()).expect("config is valid");
    assert_eq!(
        request.raw_message,
        b"Subject: REMINDER\r\n\r\nThis is an automated reminder notification".to_vec()
    );
    assert_eq!(request.server_address, "mail.example.com:25");
    assert_eq!(request.mail_from, "ops@example.com");
    assert_eq!(request.mail_to, vec!["alice@example.com".to_string()]);
    assert!(request.credential.is_none(), "no password, no credential");
}

#[test]
fn body_is_used_verbatim() {
    let body = "  line one\r\nline two\n";
    let request = OutboundRequest::try_from(EffectiveConfig {
        message_body: Some(body.to_string()),
        message_subject: "Timesheets".to_string(),
        smtp_port: 587,
        ..valid_config()
    })
    .expect("config is valid");
    assert_eq!(
        request.raw_message,
        format!("Subject: Timesheets\r\n\r\n{}", body).into_bytes()
    );
    assert_eq!(request.server_address, "mail.example.com:587");
    assert_ne!(body, DEFAULT_MESSAGE_BODY);
}

#[test]
fn user_defaults_to_from_address() {
    let request = OutboundRequest::try_from(EffectiveConfig {
        password: Some("secret".to_string()),
        ..valid_config()
    })
    .expect("config is valid");
    let credential = request.credential.expect("password has been set");
    assert_eq!(credential.user, "ops@example.com");
    assert_eq!(credential.password.to_unsecure_string(), "secret");
    assert_eq!(credential.host, "mail.example.com");
}

#[test]
fn configured_user_is_kept() {
    let request = OutboundRequest::try_from(EffectiveConfig {
        user: Some("timesheet-bot".to_string()),
        password: Some("secret".to_string()),
        ..valid_config()
    })
    .expect("config is valid");
    assert_eq!(
        request.credential.map(|c| c.user),
        Some("timesheet-bot".to_string())
    );
}

#[test]
fn password_is_not_logged() {
    let request = OutboundRequest::try_from(EffectiveConfig {
        password: Some("top-secret-password".to_string()),
        ..valid_config()
    })
    .expect("config is valid");
    assert!(
        !format!("{:?}", request).contains("top-secret-password"),
        "debug output must not contain the password"
    );
}

#[test]
fn missing_from_address_wins_over_everything() {
    let configs = [
        EffectiveConfig {
            from_address: None,
            ..valid_config()
        },
        EffectiveConfig {
            from_address: None,
            to_addresses: Vec::new(),
            smtp_host: None,
            ..valid_config()
        },
        EffectiveConfig {
            from_address: None,
            password: Some("secret".to_string()),
            ..valid_config()
        },
    ];
    for config in configs {
        assert!(
            matches!(
                OutboundRequest::try_from(config),
                Err(RemindrError::MissingFromAddress)
            ),
            "expected MissingFromAddress"
        );
    }
}

#[test]
fn missing_recipients() {
    let result = OutboundRequest::try_from(EffectiveConfig {
        to_addresses: Vec::new(),
        smtp_host: None,
        ..valid_config()
    });
    assert!(
        matches!(result, Err(RemindrError::MissingRecipients)),
        "recipients are checked before the host"
    );
}

#[test]
fn missing_host() {
    let result = OutboundRequest::try_from(EffectiveConfig {
        smtp_host: None,
        ..valid_config()
    });
    assert!(matches!(result, Err(RemindrError::MissingHost)));
}

#[test]
fn same_input_same_request() {
    let config = EffectiveConfig {
        password: Some("secret".to_string()),
        message_body: Some("Please submit your timesheet.".to_string()),
        ..valid_config()
    };
    let first = OutboundRequest::try_from(config.clone()).expect("config is valid");
    let second = OutboundRequest::try_from(config).expect("config is valid");
    assert_eq!(first, second, "requests must be identical");
    assert_eq!(first.raw_message, second.raw_message);
}

#[test]
fn error_messages_name_the_rule() {
    assert_eq!(
        RemindrError::MissingFromAddress.to_string(),
        "a valid from address must be provided"
    );
    assert_eq!(
        RemindrError::MissingRecipients.to_string(),
        "at least 1 to address must be provided"
    );
    assert_eq!(
        RemindrError::MissingHost.to_string(),
        "a valid SMTP host must be provided"
    );
}

#[test]
fn envelope_errors_are_transport_errors() {
    let e = RemindrError::from(lettre::error::Error::MissingTo);
    assert!(
        matches!(e, RemindrError::Transport(_)),
        "envelope errors end the run as transport errors"
    );
}
