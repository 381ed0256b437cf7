// smtp-mail-client, a Rust library for sending templated emails.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Mail client config module.
//!
//! This module contains the representation of the SMTP connection
//! configuration used by the mail client.

use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use serde::Deserialize;
use std::{
    env::{self, VarError},
    fmt, result,
};
use thiserror::Error;

pub const DEFAULT_SSL_PORT: u16 = 465;

pub const ENV_HOST: &str = "SMTP_HOST";
pub const ENV_PORT: &str = "SMTP_PORT";
pub const ENV_USER: &str = "SMTP_USER";
pub const ENV_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_SSL: &str = "SMTP_SSL";
pub const ENV_STARTTLS: &str = "SMTP_STARTTLS";
pub const ENV_INSECURE: &str = "SMTP_INSECURE";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse environment variable {1}: {2:?}")]
    ParsePortEnvError(#[source] std::num::ParseIntError, &'static str, String),
    #[error("cannot parse environment variable {0}: {1:?} is not a boolean")]
    ParseBoolEnvError(&'static str, String),
    #[error("cannot read environment variable {0}: value is not valid unicode")]
    ReadUnicodeEnvError(&'static str),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the required connection fields, in the order they get
/// validated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfigField {
    Host,
    Port,
    User,
    Password,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Port => write!(f, "port"),
            Self::User => write!(f, "user"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// Represents the SMTP connection config of the mail client.
#[derive(Default, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MailClientConfig {
    /// Represents the SMTP server host.
    #[serde(default)]
    pub host: String,
    /// Represents the SMTP server port.
    #[serde(default)]
    pub port: u16,
    /// Represents the SMTP server login.
    #[serde(default)]
    pub user: String,
    /// Represents the SMTP server password.
    #[serde(default)]
    pub password: String,
    /// Enables TLS.
    pub ssl: Option<bool>,
    /// Enables StartTLS.
    pub starttls: Option<bool>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
}

impl fmt::Debug for MailClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("MailClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &password)
            .field("ssl", &self.ssl)
            .field("starttls", &self.starttls)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl MailClientConfig {
    pub fn new<H, U, P>(host: H, port: u16, user: U, password: P) -> Self
    where
        H: ToString,
        U: ToString,
        P: ToString,
    {
        Self {
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Reads the config from the `SMTP_*` environment variables.
    /// Unset or blank variables keep their default value, so the
    /// result still needs to go through
    /// [`MailClientConfig::missing_field`].
    pub fn from_env() -> Result<Self> {
        let port = string_from_env(ENV_PORT)?;
        let port = if port.trim().is_empty() {
            0
        } else {
            port.trim()
                .parse()
                .map_err(|err| Error::ParsePortEnvError(err, ENV_PORT, port.clone()))?
        };

        Ok(Self {
            host: string_from_env(ENV_HOST)?,
            port,
            user: string_from_env(ENV_USER)?,
            password: string_from_env(ENV_PASSWORD)?,
            ssl: bool_from_env(ENV_SSL)?,
            starttls: bool_from_env(ENV_STARTTLS)?,
            insecure: bool_from_env(ENV_INSECURE)?,
        })
    }

    /// Returns the first required field that is not set, checking
    /// host, port, user then password. Blank strings count as not
    /// set.
    pub fn missing_field(&self) -> Option<ConfigField> {
        if self.host.trim().is_empty() {
            Some(ConfigField::Host)
        } else if self.port == 0 {
            Some(ConfigField::Port)
        } else if self.user.trim().is_empty() {
            Some(ConfigField::User)
        } else if self.password.trim().is_empty() {
            Some(ConfigField::Password)
        } else {
            None
        }
    }

    /// Builds the SMTP credentials.
    pub fn credentials(&self) -> SmtpCredentials {
        SmtpCredentials::new(self.user.to_owned(), self.password.to_owned())
    }

    pub fn ssl(&self) -> bool {
        self.ssl.unwrap_or(true)
    }

    /// StartTLS is used by default, except on the implicit TLS port.
    pub fn starttls(&self) -> bool {
        self.starttls.unwrap_or(self.port != DEFAULT_SSL_PORT)
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }
}

fn string_from_env(key: &'static str) -> Result<String> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(VarError::NotPresent) => Ok(String::new()),
        Err(VarError::NotUnicode(_)) => Err(Error::ReadUnicodeEnvError(key)),
    }
}

fn bool_from_env(key: &'static str) -> Result<Option<bool>> {
    match env::var(key) {
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::ReadUnicodeEnvError(key)),
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::ParseBoolEnvError(key, val)),
        },
    }
}
