use std::env;

use smtp_mail_client::{config, ConfigField, MailClientConfig};

// Environment variables are process-wide, so every env-based check
// lives in this single test.
#[test]
fn test_config_from_env() {
    for key in [
        config::ENV_HOST,
        config::ENV_PORT,
        config::ENV_USER,
        config::ENV_PASSWORD,
        config::ENV_SSL,
        config::ENV_STARTTLS,
        config::ENV_INSECURE,
    ] {
        env::remove_var(key);
    }

    let smtp_config = MailClientConfig::from_env().unwrap();
    assert_eq!(MailClientConfig::default(), smtp_config);
    assert_eq!(Some(ConfigField::Host), smtp_config.missing_field());

    env::set_var(config::ENV_HOST, "smtp.gmail.com");
    env::set_var(config::ENV_PORT, "587");
    env::set_var(config::ENV_USER, "username");
    env::set_var(config::ENV_PASSWORD, "password");
    env::set_var(config::ENV_INSECURE, "true");

    let smtp_config = MailClientConfig::from_env().unwrap();
    assert_eq!(
        MailClientConfig {
            insecure: Some(true),
            ..MailClientConfig::new("smtp.gmail.com", 587, "username", "password")
        },
        smtp_config
    );
    assert_eq!(None, smtp_config.missing_field());

    env::set_var(config::ENV_PORT, "not-a-port");
    assert!(matches!(
        MailClientConfig::from_env(),
        Err(config::Error::ParsePortEnvError(_, config::ENV_PORT, _))
    ));

    // Blank values count as unset
    env::set_var(config::ENV_PORT, "  ");
    env::set_var(config::ENV_SSL, "");
    let smtp_config = MailClientConfig::from_env().unwrap();
    assert_eq!(0, smtp_config.port);
    assert_eq!(None, smtp_config.ssl);
    assert_eq!(Some(ConfigField::Port), smtp_config.missing_field());

    #[cfg(unix)]
    {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        env::set_var(config::ENV_HOST, OsStr::from_bytes(b"smtp.\xff.com"));
        assert!(matches!(
            MailClientConfig::from_env(),
            Err(config::Error::ReadUnicodeEnvError(config::ENV_HOST))
        ));
        env::set_var(config::ENV_HOST, "smtp.gmail.com");
    }

    env::set_var(config::ENV_PORT, "587");
    env::set_var(config::ENV_SSL, "maybe");
    assert!(matches!(
        MailClientConfig::from_env(),
        Err(config::Error::ParseBoolEnvError(config::ENV_SSL, _))
    ));
}
