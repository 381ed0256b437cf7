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

//! Module related to email addresses.
//!
//! This module converts the raw address strings of a mail message
//! into sendable mailboxes.

use lettre::message::Mailbox;
use mailparse::{GroupInfo, MailAddr, SingleInfo};

use super::{Error, Result};

/// Defines a list of email addresses.
pub type Addrs = mailparse::MailAddrList;

/// Parses a single address or a comma-separated list of addresses.
pub fn from_str_to_addrs<S: AsRef<str>>(addrs: S) -> Result<Addrs> {
    let raw = addrs.as_ref();
    let addrs =
        mailparse::addrparse(raw).map_err(|err| Error::ParseAddrsError(err, raw.to_owned()))?;

    if addrs.is_empty() {
        Err(Error::ParseAddrsEmptyError(raw.to_owned()))
    } else {
        Ok(addrs)
    }
}

/// Converts a list of addresses into a list of [`lettre::message::Mailbox`].
/// Group members inherit the group name when they have no display
/// name of their own.
pub fn from_addrs_to_mboxes(addrs: &Addrs) -> Result<Vec<Mailbox>> {
    let mut mboxes = vec![];
    for addr in addrs.iter() {
        match addr {
            MailAddr::Single(SingleInfo { display_name, addr }) => {
                mboxes.push(Mailbox::new(display_name.clone(), addr.parse()?))
            }
            MailAddr::Group(GroupInfo { group_name, addrs }) => {
                for addr in addrs {
                    mboxes.push(Mailbox::new(
                        addr.display_name.clone().or(Some(group_name.clone())),
                        addr.addr.parse()?,
                    ))
                }
            }
        }
    }
    Ok(mboxes)
}

/// Parses a raw address string straight into mailboxes.
pub fn from_str_to_mboxes<S: AsRef<str>>(addrs: S) -> Result<Vec<Mailbox>> {
    from_addrs_to_mboxes(&from_str_to_addrs(addrs)?)
}
