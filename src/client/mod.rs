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

//! Mail client module.
//!
//! This module contains the SMTP mail client, its config and the
//! transport it sends emails through.

use std::result;
use thiserror::Error;

use crate::email;

pub mod config;
pub use config::{ConfigField, MailClientConfig};

pub mod transport;
pub use transport::{build_smtp_transport, MailTransport, SmtpTransport};

pub mod client;
pub use client::MailClient;

/// Represents the errors related to the state of the SMTP connection.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ConnectionError {
    #[error("SMTP, {0} must be set before initialization")]
    MissingField(ConfigField),
    #[error("mail client not initialized")]
    NotInitialized,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ConnectionError(#[from] ConnectionError),

    #[error("cannot build smtp transport relay")]
    BuildTransportRelayError(#[source] lettre::transport::smtp::Error),
    #[error("cannot build smtp tls parameters")]
    BuildTlsParamsError(#[source] lettre::transport::smtp::Error),
    #[error("cannot send email")]
    SendError(#[source] lettre::transport::smtp::Error),

    #[error(transparent)]
    ConfigError(#[from] config::Error),
    #[error(transparent)]
    EmailError(#[from] email::Error),
}

impl Error {
    /// Returns the connection error, if any.
    pub fn connection_error(&self) -> Option<ConnectionError> {
        match self {
            Self::ConnectionError(err) => Some(*err),
            _ => None,
        }
    }

    /// Returns the underlying I/O error, if the error comes from the
    /// filesystem.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::EmailError(err) => err.io_error(),
            _ => None,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
