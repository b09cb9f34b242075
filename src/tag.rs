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

/// Name of an element as it appears in the document.
///
/// Tags are handed to the element handlers and borrow from the parser
/// buffers, so they are only valid during the handler call. Use
/// [name()](Tag::name) and copy the text if you need to keep it.
///
/// Element names which look like DICOM data element tags can be
/// decoded into their group and element numbers with
/// [group_element()](Tag::group_element).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag<'a> {
    name: &'a str,
}

impl<'a> Tag<'a> {
    /// Wraps an element name.
    pub fn new(name: &'a str) -> Self {
        Tag { name }
    }

    /// Returns the element name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the element name as bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.name.as_bytes()
    }

    /// Decodes a DICOM style tag name into its group and element numbers.
    ///
    /// Accepted forms are `ggggeeee`, `gggg,eeee` and `(gggg,eeee)` where
    /// each letter is a hexadecimal digit in either case. Returns `None`
    /// for any other name.
    ///
    /// ```
    /// use dicom_sax::Tag;
    ///
    /// assert_eq!(Tag::new("(0010,0020)").group_element(), Some((0x0010, 0x0020)));
    /// assert_eq!(Tag::new("7FE00010").group_element(), Some((0x7fe0, 0x0010)));
    /// assert_eq!(Tag::new("PatientID").group_element(), None);
    /// ```
    pub fn group_element(&self) -> Option<(u16, u16)> {
        let (inner, parenthesized) = match self.name.as_bytes() {
            [b'(', inner @ .., b')'] => (inner, true),
            bytes => (bytes, false),
        };
        let (group, element) = match inner.len() {
            8 if !parenthesized => (&inner[0..4], &inner[4..8]),
            9 if inner[4] == b',' => (&inner[0..4], &inner[5..9]),
            _ => return None,
        };
        Some((hex_u16(group)?, hex_u16(element)?))
    }
}

fn hex_u16(digits: &[u8]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, &c| {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => return None,
        };
        Some((acc << 4) | u16::from(digit))
    })
}

impl Display for Tag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq<str> for Tag<'_> {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for Tag<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}
