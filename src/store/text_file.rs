// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{BufferError, BufferRead, TextBuffer, WriteDurability};

/// A document on disk.
///
/// The revision advances on every committed write and whenever a read observes text that
/// differs from what this handle last saw. A commit whose base text changed on disk in the
/// meantime is rejected as a conflict.
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
    durability: WriteDurability,
    rev: u64,
    seen: Option<String>,
}

impl TextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
            rev: 0,
            seen: None,
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn load(&self) -> Result<String, BufferError> {
        fs::read_to_string(&self.path).map_err(|source| BufferError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn observe(&mut self, disk: String) {
        if self.seen.as_deref().is_some_and(|seen| seen != disk) {
            self.rev = self.rev.saturating_add(1);
        }
        self.seen = Some(disk);
    }
}

impl TextBuffer for TextFile {
    fn read(&mut self) -> Result<BufferRead, BufferError> {
        let disk = self.load()?;
        self.observe(disk.clone());
        Ok(BufferRead {
            rev: self.rev,
            text: disk,
        })
    }

    fn transact(&mut self, base_rev: u64, text: &str) -> Result<u64, BufferError> {
        if base_rev != self.rev {
            return Err(BufferError::Conflict {
                base_rev,
                current_rev: self.rev,
            });
        }

        let disk = self.load()?;
        self.observe(disk);
        if base_rev != self.rev {
            return Err(BufferError::Conflict {
                base_rev,
                current_rev: self.rev,
            });
        }

        write_atomic(&self.path, text.as_bytes(), self.durability)?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "wrote document");
        self.seen = Some(text.to_owned());
        self.rev = self.rev.saturating_add(1);
        Ok(self.rev)
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> BufferError {
    let path = path.to_path_buf();
    move |source| BufferError::Io { path, source }
}

/// Writes `contents` next to `path` and renames it into place.
fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), BufferError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(BufferError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(io_err(path)(source)),
    }

    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(io_err(path)(io::Error::other("path has no parent"))),
    };
    let Some(file_name) = path.file_name() else {
        return Err(io_err(path)(io::Error::other("path has no file name")));
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".nexusmap.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    file.write_all(contents).map_err(io_err(&tmp_path))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_err(&tmp_path))?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(path)(source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_err(parent))?;
            dir.sync_all().map_err(io_err(parent))?;
        }
    }

    Ok(())
}
