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

//! Rust library for sending templated emails over SMTP.
//!
//! The [`MailClient`] validates its connection config, builds an
//! SMTP transport on [`MailClient::init`], reads html, subject and
//! text templates from template folders and sends
//! [`MailMessage`]s.

pub mod client;
pub use client::*;

pub mod email;
pub use email::{MailMessage, TemplateType};
