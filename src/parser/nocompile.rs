/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Tags cannot outlive the handler call:
/// ```compile_fail
/// use dicom_sax::Parser;
/// use dicom_sax::Tag;
/// let mut parser: Parser<Vec<Tag<'static>>> = Parser::new();
/// parser.set_start_handler(|tags, tag, _attributes| tags.push(tag));
/// ```
///
/// Attribute values cannot outlive the handler call:
/// ```compile_fail
/// use dicom_sax::Parser;
/// let mut parser: Parser<Vec<&'static str>> = Parser::new();
/// parser.set_start_handler(|values, _tag, attributes| {
///     for (_name, value) in attributes {
///         values.push(value);
///     }
/// });
/// ```
///
/// Handlers cannot feed the parser which is calling them:
/// ```compile_fail
/// use dicom_sax::Parser;
/// let mut parser: Parser<()> = Parser::new();
/// let inner = &mut parser;
/// parser.set_end_handler(move |_, _tag| {
///     let _ = inner.parse(b"<more/>", false);
/// });
/// ```
///
/// Buffer from get_buffer cannot be used after parse_buffer:
/// ```compile_fail
/// use dicom_sax::Parser;
/// let mut parser: Parser<()> = Parser::new();
/// let buffer = parser.get_buffer(4).unwrap();
/// buffer.copy_from_slice(b"<a/>");
/// parser.parse_buffer(4, true).unwrap();
/// buffer[0] = b'x';
/// ```
///
#[cfg(doctest)]
struct MustNotCompileTests;
