// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{BufferError, BufferRead, TextBuffer};

/// In-process buffer with a plain revision counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    text: String,
    rev: u64,
}

impl MemoryBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rev: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Replaces the text outside of a transaction, as a remote peer would.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.rev = self.rev.saturating_add(1);
    }
}

impl TextBuffer for MemoryBuffer {
    fn read(&mut self) -> Result<BufferRead, BufferError> {
        Ok(BufferRead {
            rev: self.rev,
            text: self.text.clone(),
        })
    }

    fn transact(&mut self, base_rev: u64, text: &str) -> Result<u64, BufferError> {
        if base_rev != self.rev {
            return Err(BufferError::Conflict {
                base_rev,
                current_rev: self.rev,
            });
        }
        self.text.clear();
        self.text.push_str(text);
        self.rev = self.rev.saturating_add(1);
        Ok(self.rev)
    }
}
