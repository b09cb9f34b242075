/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::ops::Range;

/// Position of one attribute inside the tag buffer.
#[derive(Clone, Debug)]
pub(super) struct AttributeSpan {
    pub(super) name: Range<usize>,
    pub(super) value: Range<usize>,
}

/// Attributes of a start tag, in document order.
///
/// Names are unique within one tag, the parser rejects the
/// document otherwise. References in the values are already
/// replaced with the characters they stand for.
#[derive(Clone, Copy)]
pub struct Attributes<'a> {
    text: &'a str,
    spans: &'a [AttributeSpan],
}

impl<'a> Attributes<'a> {
    pub(super) fn new(text: &'a str, spans: &'a [AttributeSpan]) -> Self {
        Attributes { text, spans }
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if the tag has no attributes.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the value of the named attribute.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Iterates over the (name, value) pairs in document order.
    pub fn iter(&self) -> AttributesIter<'a> {
        AttributesIter {
            text: self.text,
            spans: self.spans.iter(),
        }
    }
}

impl std::fmt::Debug for Attributes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for Attributes<'a> {
    type Item = (&'a str, &'a str);
    type IntoIter = AttributesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the (name, value) pairs of [Attributes].
pub struct AttributesIter<'a> {
    text: &'a str,
    spans: std::slice::Iter<'a, AttributeSpan>,
}

impl<'a> Iterator for AttributesIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.spans.next()?;
        Some((
            &self.text[span.name.clone()],
            &self.text[span.value.clone()],
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for AttributesIter<'_> {}
