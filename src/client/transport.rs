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

//! Mail transport module.
//!
//! This module contains the interface the mail client dispatches
//! emails through, and its SMTP implementation.

use async_trait::async_trait;
use lettre::{
    transport::smtp::client::{Tls, TlsParameters},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::debug;

use super::{Error, MailClientConfig, Result};

/// Represents something able to deliver a built email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: Message) -> Result<()>;
}

pub type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, email: Message) -> Result<()> {
        AsyncTransport::send(self, email)
            .await
            .map_err(Error::SendError)?;
        Ok(())
    }
}

/// Builds the SMTP transport matching the given config. The
/// connection itself is opened lazily by lettre on first send.
pub fn build_smtp_transport(config: &MailClientConfig) -> Result<SmtpTransport> {
    let builder = if config.ssl() {
        let tls = TlsParameters::builder(config.host.to_owned())
            .dangerous_accept_invalid_hostnames(config.insecure())
            .dangerous_accept_invalid_certs(config.insecure())
            .build()
            .map_err(Error::BuildTlsParamsError)?;

        if config.starttls() {
            debug!("building smtp transport for {} using starttls", config.host);
            SmtpTransport::starttls_relay(&config.host)
                .map_err(Error::BuildTransportRelayError)?
                .tls(Tls::Required(tls))
        } else {
            debug!("building smtp transport for {} using tls", config.host);
            SmtpTransport::relay(&config.host)
                .map_err(Error::BuildTransportRelayError)?
                .tls(Tls::Wrapper(tls))
        }
    } else {
        debug!("building smtp transport for {} without tls", config.host);
        SmtpTransport::builder_dangerous(&config.host).tls(Tls::None)
    };

    Ok(builder
        .port(config.port)
        .credentials(config.credentials())
        .build())
}
