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
//! This module contains the representation of the SMTP mail client:
//! a config, a one-way initialization state and the transport built
//! out of them.

use log::{debug, info};
use std::{fmt, path::Path};

use crate::{email, MailMessage, TemplateType};

use super::{
    build_smtp_transport, ConnectionError, MailClientConfig, MailTransport, Result,
};

/// Represents the SMTP mail client.
///
/// The client starts uninitialized. [`MailClient::init`] validates
/// the config then builds the transport, after which emails can be
/// sent. There is no way back to the uninitialized state.
#[derive(Default)]
pub struct MailClient {
    config: MailClientConfig,
    transport: Option<Box<dyn MailTransport>>,
}

impl fmt::Debug for MailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailClient")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("user", &self.config.user)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl MailClient {
    pub fn new(config: MailClientConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    pub fn config(&self) -> &MailClientConfig {
        &self.config
    }

    /// Gets a mutable reference to the config. Returns `None` once
    /// the client is initialized, since the transport has already
    /// been built out of it.
    pub fn config_mut(&mut self) -> Option<&mut MailClientConfig> {
        if self.is_initialized() {
            None
        } else {
            Some(&mut self.config)
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.transport.is_some()
    }

    fn validate(&self) -> Result<()> {
        match self.config.missing_field() {
            Some(field) => Err(ConnectionError::MissingField(field).into()),
            None => Ok(()),
        }
    }

    /// Validates the config and builds the SMTP transport.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            debug!("mail client already initialized, skipping");
            return Ok(());
        }

        self.validate()?;
        let transport = build_smtp_transport(&self.config)?;
        self.transport = Some(Box::new(transport));

        debug!(
            "mail client initialized for {}:{}",
            self.config.host, self.config.port
        );
        Ok(())
    }

    /// Validates the config and installs the given transport instead
    /// of the SMTP one.
    pub fn init_with_transport<T: MailTransport + 'static>(&mut self, transport: T) -> Result<()> {
        self.validate()?;
        self.transport = Some(Box::new(transport));
        debug!("mail client initialized with custom transport");
        Ok(())
    }

    /// Builds the email out of the message and the rendered html
    /// body, subject and plain text body, then sends it.
    pub async fn send_mail(
        &self,
        msg: &MailMessage,
        html: &str,
        subject: &str,
        text: &str,
    ) -> Result<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(ConnectionError::NotInitialized)?;

        let email = msg.to_sendable_email(html, subject, text).await?;
        transport.send(email).await?;

        info!("email {:?} sent to {}", subject, msg.get_to());
        Ok(())
    }

    /// Reads the template of the given type from the template
    /// folder. The folder path supports `~` and environment
    /// variables.
    pub async fn get_template_string<P: AsRef<Path>>(
        &self,
        folder_path: P,
        tpl: TemplateType,
    ) -> Result<String> {
        let folder = email::expand_path(folder_path.as_ref());
        Ok(email::template::read_template(&folder, tpl).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_mut_until_initialized() {
        let mut client = MailClient::default();
        assert!(!client.is_initialized());

        {
            let config = client.config_mut().unwrap();
            config.host = "smtp.localhost".into();
            config.port = 587;
            config.user = "alice".into();
            config.password = "secret".into();
        }

        client.init().unwrap();
        assert!(client.is_initialized());
        assert!(client.config_mut().is_none());
        assert_eq!("smtp.localhost", client.config().host);

        // Initializing twice is a no-op
        client.init().unwrap();
        assert!(client.is_initialized());
    }

    #[test]
    fn failed_init_keeps_client_uninitialized() {
        let mut client = MailClient::new(MailClientConfig {
            host: "smtp.localhost".into(),
            ..MailClientConfig::default()
        });

        assert!(client.init().is_err());
        assert!(!client.is_initialized());
        assert!(client.config_mut().is_some());
    }

    #[test]
    fn debug_hides_password() {
        let client = MailClient::new(MailClientConfig::new(
            "smtp.localhost",
            587,
            "alice",
            "secret",
        ));
        let debug = format!("{:?}", client);
        assert!(debug.contains("smtp.localhost"));
        assert!(!debug.contains("secret"));

        let debug = format!("{:?}", client.config());
        assert!(debug.contains("smtp.localhost"));
        assert!(!debug.contains("secret"));
    }
}
