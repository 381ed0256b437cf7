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

//! Mail message module.
//!
//! This module contains the representation of the message envelope
//! the caller hands to the mail client, and its conversion into a
//! sendable [`lettre::Message`].

use lettre::message::{header::ContentType, Attachment, MultiPart, SinglePart};
use log::trace;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{expand_path, from_str_to_mboxes, Error, Result};

/// Represents the addressing part of an email, plus its optional
/// attachments. Bodies and subject are rendered separately from
/// templates.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MailMessage {
    from: String,
    to: String,
    cc: Option<String>,
    bcc: Option<String>,
    attachments: Vec<PathBuf>,
}

impl MailMessage {
    pub fn new<F: ToString, T: ToString>(from: F, to: T) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            ..Self::default()
        }
    }

    pub fn cc<S: ToString>(mut self, cc: S) -> Self {
        self.cc = Some(cc.to_string());
        self
    }

    pub fn bcc<S: ToString>(mut self, bcc: S) -> Self {
        self.bcc = Some(bcc.to_string());
        self
    }

    /// Adds a file to attach. The path is expanded and read when
    /// the email is built.
    pub fn attachment<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.attachments.push(path.into());
        self
    }

    pub fn get_from(&self) -> &str {
        &self.from
    }

    pub fn get_to(&self) -> &str {
        &self.to
    }

    pub fn get_cc(&self) -> Option<&str> {
        self.cc.as_deref()
    }

    pub fn get_bcc(&self) -> Option<&str> {
        self.bcc.as_deref()
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    /// Builds the sendable email out of the message and the rendered
    /// html body, subject and plain text body.
    pub async fn to_sendable_email(
        &self,
        html: &str,
        subject: &str,
        text: &str,
    ) -> Result<lettre::Message> {
        let mut senders = from_str_to_mboxes(&self.from)?.into_iter();
        let from = senders
            .next()
            .ok_or_else(|| Error::FindSenderError(self.from.to_owned()))?;
        if senders.next().is_some() {
            return Err(Error::TooManySendersError(self.from.to_owned()));
        }

        let mut builder = lettre::Message::builder().from(from).subject(subject);

        for mbox in from_str_to_mboxes(&self.to)? {
            builder = builder.to(mbox);
        }

        if let Some(cc) = self.cc.as_ref() {
            for mbox in from_str_to_mboxes(cc)? {
                builder = builder.cc(mbox);
            }
        }

        if let Some(bcc) = self.bcc.as_ref() {
            for mbox in from_str_to_mboxes(bcc)? {
                builder = builder.bcc(mbox);
            }
        }

        let body = MultiPart::alternative_plain_html(text.to_owned(), html.to_owned());

        let email = if self.attachments.is_empty() {
            builder.multipart(body)
        } else {
            let mut multipart = MultiPart::mixed().multipart(body);
            for path in self.attachments.iter() {
                multipart = multipart.singlepart(read_attachment(path).await?);
            }
            builder.multipart(multipart)
        }
        .map_err(Error::BuildSendableEmailError)?;

        trace!("sendable email: {:?}", String::from_utf8_lossy(&email.formatted()));
        Ok(email)
    }
}

async fn read_attachment(path: &Path) -> Result<SinglePart> {
    let path = expand_path(path);

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::GetAttachmentFilenameError(path.clone()))?
        .to_owned();

    let content = fs::read(&path)
        .await
        .map_err(|err| Error::ReadAttachmentError(err, path.clone()))?;

    let mime = tree_magic::from_u8(&content);
    let content_type = ContentType::parse(&mime)
        .map_err(|err| Error::ParseAttachmentContentTypeError(err, filename.clone()))?;

    Ok(Attachment::new(filename).body(content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sendable_email_envelope() {
        let msg = MailMessage::new("Alice <alice@localhost>", "bob@localhost, carol@localhost")
            .cc("dave@localhost")
            .bcc("eve@localhost");

        let email = msg
            .to_sendable_email("<p>Hello</p>", "Hello", "Hello")
            .await
            .unwrap();

        let envelope = email.envelope();
        assert_eq!(Some("alice@localhost".to_owned()), envelope.from().map(|a| a.to_string()));

        let mut rcpts: Vec<String> = envelope.to().iter().map(|a| a.to_string()).collect();
        rcpts.sort();
        assert_eq!(
            vec![
                "bob@localhost",
                "carol@localhost",
                "dave@localhost",
                "eve@localhost"
            ],
            rcpts
        );

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Hello"));
        assert!(raw.contains("multipart/alternative"));
        assert!(!raw.contains("multipart/mixed"));
    }

    #[tokio::test]
    async fn sendable_email_with_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "some notes").unwrap();

        let email = MailMessage::new("alice@localhost", "bob@localhost")
            .attachment(&path)
            .to_sendable_email("<p>Hi</p>", "Hi", "Hi")
            .await
            .unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("filename=\"notes.txt\""));
    }

    #[tokio::test]
    async fn missing_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let err = MailMessage::new("alice@localhost", "bob@localhost")
            .attachment(dir.path().join("missing.pdf"))
            .to_sendable_email("", "", "")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ReadAttachmentError(_, _)));
        assert!(err.io_error().is_some());
    }

    #[tokio::test]
    async fn several_senders() {
        let err = MailMessage::new("alice@localhost, carol@localhost", "bob@localhost")
            .to_sendable_email("", "", "")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TooManySendersError(_)));
    }

    #[tokio::test]
    async fn invalid_sender() {
        let err = MailMessage::new("", "bob@localhost")
            .to_sendable_email("", "", "")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::ParseAddrsEmptyError(_) | Error::ParseAddrsError(_, _)
        ));
    }
}
