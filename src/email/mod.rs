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

//! Email module.
//!
//! This module contains everything related to the emails handed to
//! the mail client: messages, addresses and templates.

use log::trace;
use std::{
    io,
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

mod addr;
pub use addr::*;

pub mod message;
pub use message::MailMessage;

pub mod template;
pub use template::TemplateType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse address list {1:?}")]
    ParseAddrsError(#[source] mailparse::MailParseError, String),
    #[error("cannot parse address list {0:?}: no address found")]
    ParseAddrsEmptyError(String),
    #[error("cannot parse email address")]
    ParseAddressError(#[from] lettre::address::AddressError),
    #[error("cannot find sender in {0:?}")]
    FindSenderError(String),
    #[error("cannot use {0:?} as sender: only one sender is allowed")]
    TooManySendersError(String),
    #[error("cannot build sendable email")]
    BuildSendableEmailError(#[source] lettre::error::Error),

    #[error("cannot read attachment at {1}")]
    ReadAttachmentError(#[source] io::Error, PathBuf),
    #[error("cannot get file name of attachment {0}")]
    GetAttachmentFilenameError(PathBuf),
    #[error("cannot parse content type of attachment {1}")]
    ParseAttachmentContentTypeError(#[source] lettre::message::header::ContentTypeErr, String),

    #[error("cannot read template folder {1}")]
    ReadTemplateDirError(#[source] io::Error, PathBuf),
    #[error("cannot find {1} template in folder {2}")]
    FindTemplateError(#[source] io::Error, TemplateType, PathBuf),
    #[error("cannot read template at {1}")]
    ReadTemplateError(#[source] io::Error, PathBuf),
}

impl Error {
    /// Returns the underlying I/O error, if the error comes from the
    /// filesystem.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::ReadAttachmentError(err, _)
            | Self::ReadTemplateDirError(err, _)
            | Self::FindTemplateError(err, _, _)
            | Self::ReadTemplateError(err, _) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Expands `~` and environment variables of the given path. Paths
/// that cannot be expanded, like a folder literally named `price$5`
/// with no `5` variable set, are kept as they are.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    let raw = match path.to_str() {
        Some(raw) => raw,
        None => return path.to_owned(),
    };

    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(err) => {
            trace!("cannot expand path {:?}, keeping it as is: {}", raw, err);
            path.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn expand_path_with_env_var() {
        env::set_var("SMTP_MAIL_CLIENT_EXPAND_DIR", "/var/templates");
        assert_eq!(
            PathBuf::from("/var/templates/welcome"),
            expand_path(Path::new("$SMTP_MAIL_CLIENT_EXPAND_DIR/welcome"))
        );
    }

    #[test]
    fn expand_path_with_tilde() {
        let home = PathBuf::from(shellexpand::tilde("~").as_ref());
        assert_eq!(home.join("templates"), expand_path(Path::new("~/templates")));
    }

    #[test]
    fn expand_path_keeps_unknown_vars() {
        assert_eq!(
            PathBuf::from("/tmp/price$5"),
            expand_path(Path::new("/tmp/price$5"))
        );
        assert_eq!(
            PathBuf::from("/tmp/$SMTP_MAIL_CLIENT_UNSET_VAR/x"),
            expand_path(Path::new("/tmp/$SMTP_MAIL_CLIENT_UNSET_VAR/x"))
        );
    }
}
