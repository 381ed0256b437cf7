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

//! Template module.
//!
//! A template folder holds one file per [`TemplateType`], named after
//! the type (`html.hbs`, `subject.txt`, `text` etc). Contents are
//! returned verbatim: placeholders are left to the caller.

use log::{debug, trace};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};
use tokio::fs;

use super::{Error, Result};

/// Represents which file of a template folder to load.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TemplateType {
    Html,
    Subject,
    Text,
}

impl TemplateType {
    /// Gets the file stem of the template type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Subject => "subject",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finds the file of the given type inside the template folder.
///
/// Files are matched on their stem, so `html`, `html.hbs` and
/// `html.html` all match [`TemplateType::Html`]. When several files
/// match, the first one in lexicographic order wins.
pub async fn find_template_path(folder: &Path, tpl: TemplateType) -> Result<PathBuf> {
    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|err| Error::ReadTemplateDirError(err, folder.to_owned()))?;

    let mut candidates = vec![];
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| Error::ReadTemplateDirError(err, folder.to_owned()))?
    {
        let path = entry.path();
        let stem_matches = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem == tpl.as_str())
            .unwrap_or_default();

        if stem_matches && is_file(&entry).await {
            trace!("found {} template candidate {:?}", tpl, path);
            candidates.push(path);
        }
    }

    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        let err = io::Error::new(
            io::ErrorKind::NotFound,
            format!("no {} template file", tpl),
        );
        Error::FindTemplateError(err, tpl, folder.to_owned())
    })
}

/// Tells if the entry is a file, following symlinks.
async fn is_file(entry: &fs::DirEntry) -> bool {
    match entry.file_type().await {
        Ok(ft) if ft.is_symlink() => fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_file())
            .unwrap_or_default(),
        Ok(ft) => ft.is_file(),
        Err(_) => false,
    }
}

/// Reads the template of the given type from the template folder.
pub async fn read_template(folder: &Path, tpl: TemplateType) -> Result<String> {
    let path = find_template_path(folder, tpl).await?;
    debug!("reading {} template at {:?}", tpl, path);

    fs::read_to_string(&path)
        .await
        .map_err(|err| Error::ReadTemplateError(err, path))
}
