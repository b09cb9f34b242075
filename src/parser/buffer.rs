/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::error::Reason;

/// Growable byte buffer which reports allocation failures instead of aborting.
pub(super) struct Buffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl Buffer {
    pub(super) fn new(capacity: usize, limit: usize) -> Buffer {
        Buffer {
            bytes: Vec::with_capacity(capacity.min(limit)),
            limit,
        }
    }

    fn check(&mut self, need: usize) -> Result<(), Reason> {
        let wanted = self.bytes.len().checked_add(need).ok_or(Reason::NoMemory)?;
        if wanted > self.limit {
            return Err(Reason::BufferLimit);
        }
        if wanted > self.bytes.capacity() {
            // Grow geometrically but never past the limit
            let grown = std::cmp::max(wanted, self.bytes.capacity().saturating_mul(2));
            let target = std::cmp::min(grown, self.limit);
            if self
                .bytes
                .try_reserve_exact(target - self.bytes.len())
                .is_err()
            {
                return Err(Reason::NoMemory);
            }
        }
        Ok(())
    }

    pub(super) fn extend(&mut self, bytes: &[u8]) -> Result<(), Reason> {
        self.check(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    pub(super) fn push(&mut self, c: u8) -> Result<(), Reason> {
        self.check(1)?;
        self.bytes.push(c);
        Ok(())
    }

    /// Resizes the buffer to exactly `len` bytes. Previous content is not preserved.
    pub(super) fn resize(&mut self, len: usize) -> Result<(), Reason> {
        self.bytes.clear();
        self.check(len)?;
        self.bytes.resize(len, 0);
        Ok(())
    }

    pub(super) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    pub(super) fn clear(&mut self) {
        self.bytes.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(super) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(super) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
