/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Incremental SAX-style parser for tag-structured documents.
//!
//! Feed the document bytes to a [Parser] in chunks of any size and get
//! the start and end of every element reported to your handlers as soon
//! as the tags are complete. See [Parser] for examples.

mod parser;
mod tag;

pub use parser::Attributes;
pub use parser::AttributesIter;
pub use parser::Config;
pub use parser::EndElementHandler;
pub use parser::ErrorType;
pub use parser::Location;
pub use parser::Parser;
pub use parser::ParserState;
pub use parser::StartElementHandler;

pub use tag::Tag;
