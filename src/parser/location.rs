/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

/// A position in the parser input byte stream.
///
/// This struct is returned from the
/// [location()](crate::Parser::location) method and counts every byte
/// consumed since the parser was created, across all parse calls.
/// After an error it points at the offending byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Byte position in the input stream.
    pub bytes: u64,
    /// How many lines have been parsed. Lines are separated by the newline character.
    pub lines: usize,
    /// How many bytes after the last newline character.
    pub column: usize,
}

impl Location {
    /// Creates a new location at the beginning of the input stream.
    pub fn new() -> Self {
        Location {
            bytes: 0,
            lines: 0,
            column: 0,
        }
    }

    pub(super) fn advance(&mut self, consumed: &[u8]) {
        self.bytes += consumed.len() as u64;
        match memchr::memrchr(b'\n', consumed) {
            Some(last) => {
                self.lines += memchr::memchr_iter(b'\n', consumed).count();
                self.column = consumed.len() - last - 1;
            }
            None => self.column += consumed.len(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "byte: {}, line: {}, column: {}",
            self.bytes, self.lines, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance() {
        let mut location = Location::new();
        location.advance(b"<a>");
        assert_eq!(location, Location { bytes: 3, lines: 0, column: 3 });
        location.advance(b"\n\n  ");
        assert_eq!(location, Location { bytes: 7, lines: 2, column: 2 });
        location.advance(b"</a>\n");
        assert_eq!(location, Location { bytes: 12, lines: 3, column: 0 });
        location.advance(b"");
        assert_eq!(location.to_string(), "byte: 12, line: 3, column: 0");
    }
}
