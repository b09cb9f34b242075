/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod attributes;
mod buffer;
mod config;
mod error;
mod location;
mod nocompile;

pub use attributes::Attributes;
pub use attributes::AttributesIter;
pub use config::Config;
pub use error::ErrorType;
pub use location::Location;

use attributes::AttributeSpan;
use buffer::Buffer;
use error::Reason;
use log::{debug, trace};

use crate::Tag;

/// Handler called for every start tag and empty element tag.
pub type StartElementHandler<U> = Box<dyn FnMut(&mut U, Tag<'_>, Attributes<'_>)>;

/// Handler called for every end tag and right after the start handler of an empty element tag.
pub type EndElementHandler<U> = Box<dyn FnMut(&mut U, Tag<'_>)>;

/// Lifecycle of a [Parser].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParserState {
    /// Nothing is parsed yet.
    Idle,
    /// Some input is parsed and more is expected.
    Parsing,
    /// The final input is parsed and the document is complete.
    Finished,
    /// An error is latched, see [error_code()](Parser::error_code).
    Failed,
}

/// SAX (Simple API for XML) style parser for tag-structured documents.
///
/// This struct implements an incremental parser which processes the
/// incoming bytes and invokes the start and end element handlers as
/// soon as each tag is complete. The input can be given in chunks of
/// any size; tags, attributes and references split between the chunks
/// are reassembled internally.
///
/// The user data of type `U` is passed to the handlers on every call.
/// Handlers cannot access the parser itself, so they cannot feed it
/// more input while it is dispatching.
///
/// # Examples
///
/// Typical usage:
/// ```
/// use dicom_sax::{ErrorType, Parser};
///
/// let mut parser: Parser<Vec<String>> = Parser::new();
/// parser.set_element_handler(
///     |names, tag, attributes| {
///         names.push(format!("{} {:?}", tag, attributes));
///     },
///     |names, tag| names.push(format!("/{}", tag)),
/// );
///
/// match parser.parse(b"<doc id='1'><item/></doc>", true) {
///     Ok(()) => (),
///     Err(ErrorType::NoMemory) => {
///         println!("no memory");
///         return;
///     }
///     Err(code) => {
///         println!("{} at {}: {:?}",
///             code,
///             parser.location(),
///             parser.error_description(),
///         );
///         return;
///     }
/// }
/// assert_eq!(
///     parser.user_data(),
///     &["doc [(\"id\", \"1\")]", "item []", "/item", "/doc"],
/// );
/// ```
///
/// Alternatively you can pass the input in multiple blocks:
/// ```
/// # use dicom_sax::{ErrorType, Parser};
/// # fn main() -> Result<(), ErrorType> {
/// # use std::io::Read;
/// # let binding = b"<(0010,0010) vr='PN'/>".to_vec();
/// # let mut dicom_file = binding.as_slice();
/// let mut parser: Parser<usize> = Parser::new();
/// parser.set_start_handler(|count, _tag, _attributes| *count += 1);
///
/// let mut buffer = [0u8; 4];
/// loop {
///     let len = dicom_file.read(&mut buffer).expect("io error");
///     if len == 0 {
///         break;
///     }
///     parser.parse(&buffer[0..len], false)?;
/// }
/// // This is to check if there is any incomplete construct at the end
/// parser.parse(b"", true)?;
/// assert_eq!(*parser.user_data(), 1);
/// # Ok(())
/// # }
/// ```
///
/// Or let the reader write directly into the parser buffer:
/// ```
/// # use dicom_sax::{ErrorType, Parser};
/// # fn main() -> Result<(), ErrorType> {
/// # use std::io::Read;
/// # let binding = b"<a><b/></a>".to_vec();
/// # let mut dicom_file = binding.as_slice();
/// let mut parser: Parser<usize> = Parser::new();
/// parser.set_end_handler(|count, _tag| *count += 1);
/// loop {
///     let buffer = parser.get_buffer(4096)?;
///     let len = dicom_file.read(buffer).expect("io error");
///     parser.parse_buffer(len, len == 0)?;
///     if len == 0 {
///         break;
///     }
/// }
/// assert_eq!(*parser.user_data(), 2);
/// # Ok(())
/// # }
/// ```
pub struct Parser<U = ()> {
    state: State,
    status: ParserState,
    reason: Option<Reason>,
    uni_len: u32,
    uni_left: u32,
    uni_char: u32,
    quote: u8,
    root_seen: bool,
    doctype_seen: bool,
    is_value_ref: bool,
    tag: Buffer,
    name_end: usize,
    attribute_start: usize,
    attribute_name_end: usize,
    value_start: usize,
    attributes: Vec<AttributeSpan>,
    open_tags: Buffer,
    open_starts: Vec<usize>,
    end_matched: usize,
    entity: [u8; MAX_ENTITY_NAME],
    entity_len: usize,
    char_ref_value: u32,
    char_ref_digits: usize,
    input: Buffer,
    reserved: Option<usize>,
    max_buffer_size: usize,
    location: Location,
    user_data: U,
    start_handler: Option<StartElementHandler<U>>,
    end_handler: Option<EndElementHandler<U>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Keyword {
    Comment,
    CDataSection,
    Doctype,
}

impl Keyword {
    fn text(&self) -> &'static [u8] {
        match self {
            Keyword::Comment => b"--",
            Keyword::CDataSection => b"[CDATA[",
            Keyword::Doctype => b"DOCTYPE",
        }
    }

    fn mismatch(&self) -> Reason {
        match self {
            Keyword::Comment => Reason::CommentMissingDash,
            Keyword::CDataSection => Reason::MarkupCdataSectionBadStart,
            Keyword::Doctype => Reason::MarkupDoctypeBadStart,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Prolog,
    TagStart,
    Markup,
    Keyword(Keyword, usize),
    CommentBody,
    CommentDash,
    CommentEnd,
    PI,
    PIEnd,
    CDataSectionBody,
    CDataSectionMaybeEnd,
    CDataSectionMaybeEnd2,
    DoctypeWhitespace,
    DoctypeSkip,
    DoctypeLiteral,
    DoctypeSubset,
    DoctypeDecl(usize),
    DoctypeMarkupDecl,
    DoctypeDeclLiteral,
    DoctypeComment(usize),
    TagName,
    EndTagName,
    EndTagWhitespace,
    EmptyTagEnd,
    AttributeWhitespace,
    AttributeName,
    AttributeEq,
    AttributeValueStart,
    AttributeValue,
    AttributeValueEnd,
    Content,
    Reference,
    Entity,
    CharReference,
    DecCharReference,
    HexCharReference,
    Epilog,
}

const MAX_ENTITY_NAME: usize = 8;

const COMMENT_START: &[u8] = b"!--";

const MAX_CHAR: u32 = 0x10ffff;

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n'
    };
}

// Bytes which can never be a part of a tag or attribute name
macro_rules! name_breaker {
    () => {
        b'<' | b'=' | b'"' | b'\'' | b'&'
    };
}

macro_rules! fail {
    ($a:ident) => {
        return Err(Reason::$a)
    };
}

fn is_valid_char(c: u32) -> bool {
    matches!(
        c,
        0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=MAX_CHAR
    )
}

fn predefined_entity(name: &[u8]) -> Option<u8> {
    match name {
        b"lt" => Some(b'<'),
        b"gt" => Some(b'>'),
        b"amp" => Some(b'&'),
        b"quot" => Some(b'"'),
        b"apos" => Some(b'\''),
        _ => None,
    }
}

impl<U: Default> Parser<U> {
    /// Creates a new parser with default user data and configuration.
    pub fn new() -> Self {
        Parser::with_config(Config::default(), U::default())
    }
}

impl<U> Parser<U> {
    /// Creates a new parser with the given user data.
    pub fn with_user_data(user_data: U) -> Self {
        Parser::with_config(Config::default(), user_data)
    }

    /// Creates a new parser with the given buffer configuration and user data.
    pub fn with_config(config: Config, user_data: U) -> Self {
        let capacity = config.initial_buffer_capacity;
        let limit = config.max_buffer_size;
        Parser {
            state: State::Prolog,
            status: ParserState::Idle,
            reason: None,
            uni_len: 0,
            uni_left: 0,
            uni_char: 0,
            quote: b'"',
            root_seen: false,
            doctype_seen: false,
            is_value_ref: false,
            tag: Buffer::new(capacity, limit),
            name_end: 0,
            attribute_start: 0,
            attribute_name_end: 0,
            value_start: 0,
            attributes: Vec::new(),
            open_tags: Buffer::new(capacity, limit),
            open_starts: Vec::new(),
            end_matched: 0,
            entity: [0; MAX_ENTITY_NAME],
            entity_len: 0,
            char_ref_value: 0,
            char_ref_digits: 0,
            input: Buffer::new(0, limit),
            reserved: None,
            max_buffer_size: limit,
            location: Location::new(),
            user_data,
            start_handler: None,
            end_handler: None,
        }
    }

    /// Sets both element handlers.
    ///
    /// Handlers can be changed between parse calls, the new ones get the
    /// elements completed after the change.
    pub fn set_element_handler<S, E>(&mut self, start: S, end: E)
    where
        S: FnMut(&mut U, Tag<'_>, Attributes<'_>) + 'static,
        E: FnMut(&mut U, Tag<'_>) + 'static,
    {
        self.set_start_handler(start);
        self.set_end_handler(end);
    }

    /// Sets the handler for start tags and empty element tags.
    pub fn set_start_handler<S>(&mut self, start: S)
    where
        S: FnMut(&mut U, Tag<'_>, Attributes<'_>) + 'static,
    {
        self.start_handler = Some(Box::new(start));
    }

    /// Sets the handler for end tags and empty element tags.
    pub fn set_end_handler<E>(&mut self, end: E)
    where
        E: FnMut(&mut U, Tag<'_>) + 'static,
    {
        self.end_handler = Some(Box::new(end));
    }

    /// Removes both handlers. Elements are still parsed and checked but not reported.
    pub fn clear_handlers(&mut self) {
        self.start_handler = None;
        self.end_handler = None;
    }

    /// Replaces the user data passed to the handlers and returns the old one.
    pub fn set_user_data(&mut self, user_data: U) -> U {
        std::mem::replace(&mut self.user_data, user_data)
    }

    /// Returns the user data passed to the handlers.
    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    /// Returns the user data for modification.
    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.user_data
    }

    /// Consumes the parser and returns the user data.
    pub fn into_user_data(self) -> U {
        self.user_data
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ParserState {
        self.status
    }

    /// Returns the latched error, or [ErrorType::NoError].
    pub fn error_code(&self) -> ErrorType {
        self.reason.map_or(ErrorType::NoError, |reason| reason.code())
    }

    /// Returns a detailed description of the latched error.
    pub fn error_description(&self) -> Option<&'static str> {
        self.reason.map(|reason| reason.description())
    }

    /// Number of bytes consumed since the parser was created.
    ///
    /// If the parsing failed, this is the offset of the offending byte.
    pub fn current_byte_index(&self) -> u64 {
        self.location.bytes
    }

    /// Returns the byte, line and column position in the input stream.
    pub fn location(&self) -> Location {
        self.location
    }

    fn is_done(&self) -> bool {
        matches!(self.status, ParserState::Finished | ParserState::Failed)
    }

    fn latch(&mut self, reason: Reason) -> ErrorType {
        debug!("parsing failed at {}: {}", self.location, reason.description());
        self.reason = Some(reason);
        self.status = ParserState::Failed;
        reason.code()
    }

    /// Parses the next part of the document.
    ///
    /// Set `is_final` on the last part, which can be empty, to check that
    /// the document is complete. Handlers are called before this returns.
    ///
    /// The first error is latched and stops the parsing for good. Calls
    /// after the document is finished or failed return
    /// [ErrorType::UnexpectedState] without changing anything.
    pub fn parse(&mut self, bytes: &[u8], is_final: bool) -> Result<(), ErrorType> {
        if self.is_done() {
            return Err(ErrorType::UnexpectedState);
        }
        self.status = ParserState::Parsing;

        let mut pos: usize = 0;
        let result = self.scan(bytes, &mut pos);
        self.location.advance(&bytes[..pos]);
        let result = match result {
            Ok(()) if is_final => self.check_complete(),
            result => result,
        };
        if let Err(reason) = result {
            return Err(self.latch(reason));
        }
        if is_final {
            debug!("document finished at {}", self.location);
            self.status = ParserState::Finished;
        }
        Ok(())
    }

    /// Returns a buffer of `len` bytes for the next part of the document.
    ///
    /// Fill the buffer and call [parse_buffer()](Parser::parse_buffer) to
    /// parse it without copying. Previous buffer content is lost.
    pub fn get_buffer(&mut self, len: usize) -> Result<&mut [u8], ErrorType> {
        if self.is_done() {
            return Err(ErrorType::UnexpectedState);
        }
        trace!("reserving {} bytes of input buffer", len);
        self.reserved = None;
        if let Err(reason) = self.input.resize(len) {
            return Err(self.latch(reason));
        }
        self.reserved = Some(len);
        Ok(self.input.as_mut_bytes())
    }

    /// Parses the first `len` bytes written into the buffer from the
    /// last [get_buffer()](Parser::get_buffer) call.
    ///
    /// Calling this without a buffer, or with a length larger than the
    /// buffer, fails with [ErrorType::UnexpectedState].
    pub fn parse_buffer(&mut self, len: usize, is_final: bool) -> Result<(), ErrorType> {
        if self.is_done() {
            return Err(ErrorType::UnexpectedState);
        }
        match self.reserved.take() {
            None => return Err(self.latch(Reason::BufferNotReserved)),
            Some(size) if len > size => return Err(self.latch(Reason::BufferOverrun)),
            Some(_) => (),
        }
        let input = std::mem::replace(&mut self.input, Buffer::new(0, self.max_buffer_size));
        let result = self.parse(&input.as_bytes()[..len], is_final);
        self.input = input;
        result
    }

    fn check_complete(&self) -> Result<(), Reason> {
        if !self.root_seen {
            fail!(DocNoElements);
        }
        if !self.open_starts.is_empty() {
            fail!(DocOpenTags);
        }
        if self.state != State::Epilog {
            fail!(DocOpenMarkup);
        }
        Ok(())
    }

    fn after_markup(&mut self) {
        self.state = if !self.open_starts.is_empty() {
            State::Content
        } else if self.root_seen {
            State::Epilog
        } else {
            State::Prolog
        };
    }

    fn open_name(&self) -> &[u8] {
        match self.open_starts.last() {
            Some(&start) => &self.open_tags.as_bytes()[start..],
            None => &[],
        }
    }

    fn check_name_end(&self) -> Result<(), Reason> {
        if self.end_matched != self.open_name().len() {
            fail!(TagMismatch);
        }
        Ok(())
    }

    fn finish_attribute_name(&mut self) -> Result<(), Reason> {
        let bytes = self.tag.as_bytes();
        let name = &bytes[self.attribute_start..];
        if self.attributes.iter().any(|span| &bytes[span.name.clone()] == name) {
            fail!(TagAttributeDuplicate);
        }
        self.attribute_name_end = self.tag.len();
        Ok(())
    }

    fn finish_attribute_value(&mut self) -> Result<(), Reason> {
        if self.attributes.try_reserve(1).is_err() {
            fail!(NoMemory);
        }
        self.attributes.push(AttributeSpan {
            name: self.attribute_start..self.attribute_name_end,
            value: self.value_start..self.tag.len(),
        });
        Ok(())
    }

    fn start_tag_end(&mut self, is_empty: bool) -> Result<(), Reason> {
        if !is_empty {
            if self.open_starts.try_reserve(1).is_err() {
                fail!(NoMemory);
            }
            self.open_starts.push(self.open_tags.len());
            self.open_tags.extend(&self.tag.as_bytes()[..self.name_end])?;
        }

        let text = std::str::from_utf8(self.tag.as_bytes()).map_err(|_| Reason::CharInvalid)?;
        let tag = Tag::new(&text[..self.name_end]);
        if let Some(handler) = self.start_handler.as_mut() {
            handler(&mut self.user_data, tag, Attributes::new(text, &self.attributes));
        }
        if is_empty {
            if let Some(handler) = self.end_handler.as_mut() {
                handler(&mut self.user_data, tag);
            }
        }
        self.root_seen = true;
        self.tag.clear();
        self.attributes.clear();

        if self.open_starts.is_empty() {
            self.state = State::Epilog;
        } else {
            self.state = State::Content;
        }
        Ok(())
    }

    fn end_tag_end(&mut self) -> Result<(), Reason> {
        let Some(&start) = self.open_starts.last() else {
            fail!(TagCloseWithoutOpen);
        };
        let name = std::str::from_utf8(&self.open_tags.as_bytes()[start..])
            .map_err(|_| Reason::CharInvalid)?;
        if let Some(handler) = self.end_handler.as_mut() {
            handler(&mut self.user_data, Tag::new(name));
        }
        self.open_tags.truncate(start);
        self.open_starts.pop();

        if self.open_starts.is_empty() {
            self.state = State::Epilog;
        } else {
            self.state = State::Content;
        }
        Ok(())
    }

    fn push_char_ref(&mut self) -> Result<(), Reason> {
        if !is_valid_char(self.char_ref_value) {
            fail!(CharInvalid);
        }
        if self.is_value_ref {
            let c = char::from_u32(self.char_ref_value).ok_or(Reason::CharInvalid)?;
            let mut buf = [0u8; 4];
            self.tag.extend(c.encode_utf8(&mut buf).as_bytes())?;
            self.state = State::AttributeValue;
        } else {
            self.state = State::Content;
        }
        Ok(())
    }

    fn check_utf8(&mut self, c: u8) -> Result<(), Reason> {
        if self.uni_left > 0 {
            if c & 0xc0 != 0x80 {
                fail!(Utf8InvalidContByte);
            }
            self.uni_char <<= 6;
            self.uni_char += c as u32 & 0x3f;
            self.uni_left -= 1;
            if self.uni_left == 0 {
                // Sequences longer than the actual character codepoint
                // size are security hazards.
                if (self.uni_len == 2 && self.uni_char <= 0x7f)
                    || (self.uni_len == 3 && self.uni_char <= 0x7ff)
                    || (self.uni_len == 4 && self.uni_char <= 0xffff)
                {
                    fail!(Utf8OverlongSequence);
                }
                if !is_valid_char(self.uni_char) {
                    fail!(CharInvalid);
                }
            }
        } else if c & 0x80 == 0x80 {
            if c & 0x60 == 0x40 {
                self.uni_len = 2;
                self.uni_left = 1;
                self.uni_char = c as u32 & 0x1f;
            } else if c & 0x70 == 0x60 {
                self.uni_len = 3;
                self.uni_left = 2;
                self.uni_char = c as u32 & 0x0f;
            } else if c & 0x78 == 0x70 {
                self.uni_len = 4;
                self.uni_left = 3;
                self.uni_char = c as u32 & 0x07;
            } else {
                fail!(Utf8InvalidPrefixByte);
            }
        } else if c < 0x20 && !matches!(c, whitespace!()) {
            fail!(CharInvalid);
        }
        Ok(())
    }

    fn scan(&mut self, bytes: &[u8], pos: &mut usize) -> Result<(), Reason> {
        // Start of the name or value bytes which are not copied to the tag buffer yet
        let mut back: usize = 0;

        while *pos < bytes.len() {
            let c = bytes[*pos];
            self.check_utf8(c)?;

            match self.state {
                State::Prolog => match c {
                    b'<' => self.state = State::TagStart,
                    whitespace!() => (),
                    _ => fail!(DocTextBeforeRoot),
                },

                State::Epilog => match c {
                    b'<' => self.state = State::TagStart,
                    whitespace!() => (),
                    _ => fail!(DocJunkAfterRoot),
                },

                State::TagStart => match c {
                    b'!' => self.state = State::Markup,
                    b'?' => self.state = State::PI,
                    b'/' => {
                        if self.open_starts.is_empty() {
                            if self.root_seen {
                                fail!(DocTagAfterRoot);
                            }
                            fail!(TagCloseWithoutOpen);
                        }
                        self.end_matched = 0;
                        self.state = State::EndTagName;
                    }
                    whitespace!() => fail!(TagWhitespaceStart),
                    b'>' => fail!(TagEmptyName),
                    name_breaker!() => fail!(TagBadNameChar),
                    _ => {
                        if self.open_starts.is_empty() && self.root_seen {
                            fail!(DocTagAfterRoot);
                        }
                        self.tag.clear();
                        self.attributes.clear();
                        back = *pos;
                        self.state = State::TagName;
                    }
                },

                State::Markup => match c {
                    b'-' => self.state = State::Keyword(Keyword::Comment, 1),
                    b'[' => {
                        if self.open_starts.is_empty() {
                            fail!(MarkupCdataSectionOutsideRoot);
                        }
                        self.state = State::Keyword(Keyword::CDataSection, 1);
                    }
                    b'D' => {
                        if self.root_seen || self.doctype_seen || !self.open_starts.is_empty() {
                            fail!(MarkupDoctypeMisplaced);
                        }
                        self.doctype_seen = true;
                        self.state = State::Keyword(Keyword::Doctype, 1);
                    }
                    _ => fail!(MarkupUnrecognized),
                },

                State::Keyword(keyword, matched) => {
                    let text = keyword.text();
                    if c != text[matched] {
                        return Err(keyword.mismatch());
                    }
                    if matched + 1 < text.len() {
                        self.state = State::Keyword(keyword, matched + 1);
                    } else {
                        self.state = match keyword {
                            Keyword::Comment => State::CommentBody,
                            Keyword::CDataSection => State::CDataSectionBody,
                            Keyword::Doctype => State::DoctypeWhitespace,
                        };
                    }
                }

                State::CommentBody => {
                    if c == b'-' {
                        self.state = State::CommentDash;
                    }
                }

                State::CommentDash => match c {
                    b'-' => self.state = State::CommentEnd,
                    _ => self.state = State::CommentBody,
                },

                State::CommentEnd => {
                    if c != b'>' {
                        fail!(CommentMissingEnd);
                    }
                    self.after_markup();
                }

                State::PI => {
                    if c == b'?' {
                        self.state = State::PIEnd;
                    }
                }

                State::PIEnd => match c {
                    b'>' => self.after_markup(),
                    b'?' => (),
                    _ => self.state = State::PI,
                },

                State::CDataSectionBody => {
                    if c == b']' {
                        self.state = State::CDataSectionMaybeEnd;
                    }
                }

                State::CDataSectionMaybeEnd => match c {
                    b']' => self.state = State::CDataSectionMaybeEnd2,
                    _ => self.state = State::CDataSectionBody,
                },

                State::CDataSectionMaybeEnd2 => match c {
                    b'>' => self.state = State::Content,
                    b']' => (),
                    _ => self.state = State::CDataSectionBody,
                },

                State::DoctypeWhitespace => match c {
                    whitespace!() => self.state = State::DoctypeSkip,
                    _ => fail!(MarkupDoctypeBadStart),
                },

                State::DoctypeSkip => match c {
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.state = State::DoctypeLiteral;
                    }
                    b'[' => self.state = State::DoctypeSubset,
                    b'>' => self.state = State::Prolog,
                    _ => (),
                },

                State::DoctypeLiteral => {
                    if c == self.quote {
                        self.state = State::DoctypeSkip;
                    }
                }

                State::DoctypeSubset => match c {
                    b'<' => self.state = State::DoctypeDecl(0),
                    b']' => self.state = State::DoctypeSkip,
                    _ => (),
                },

                // Declarations in the internal subset are skipped as a unit
                State::DoctypeDecl(matched) if c == COMMENT_START[matched] => {
                    if matched + 1 < COMMENT_START.len() {
                        self.state = State::DoctypeDecl(matched + 1);
                    } else {
                        self.state = State::DoctypeComment(0);
                    }
                }

                State::DoctypeDecl(_) | State::DoctypeMarkupDecl => match c {
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.state = State::DoctypeDeclLiteral;
                    }
                    b'>' => self.state = State::DoctypeSubset,
                    _ => self.state = State::DoctypeMarkupDecl,
                },

                State::DoctypeDeclLiteral => {
                    if c == self.quote {
                        self.state = State::DoctypeMarkupDecl;
                    }
                }

                State::DoctypeComment(dashes) => match c {
                    b'-' => self.state = State::DoctypeComment((dashes + 1).min(2)),
                    b'>' if dashes == 2 => self.state = State::DoctypeSubset,
                    _ => self.state = State::DoctypeComment(0),
                },

                State::TagName => match c {
                    b'/' | b'>' | whitespace!() => {
                        if back < *pos {
                            self.tag.extend(&bytes[back..*pos])?;
                        }
                        self.name_end = self.tag.len();
                        match c {
                            b'/' => self.state = State::EmptyTagEnd,
                            b'>' => self.start_tag_end(false)?,
                            _ => self.state = State::AttributeWhitespace,
                        }
                    }
                    name_breaker!() => fail!(TagBadNameChar),
                    _ => (),
                },

                State::EndTagName => match c {
                    b'>' | whitespace!() => {
                        if self.end_matched == 0 {
                            if c == b'>' {
                                fail!(TagEmptyName);
                            }
                            fail!(TagWhitespaceStart);
                        }
                        self.check_name_end()?;
                        if c == b'>' {
                            self.end_tag_end()?;
                        } else {
                            self.state = State::EndTagWhitespace;
                        }
                    }
                    b'/' => fail!(TagDoubleEnd),
                    name_breaker!() => fail!(TagBadNameChar),
                    _ => {
                        let expected = self.open_name().get(self.end_matched).copied();
                        if expected != Some(c) {
                            fail!(TagMismatch);
                        }
                        self.end_matched += 1;
                    }
                },

                State::EndTagWhitespace => match c {
                    b'>' => self.end_tag_end()?,
                    whitespace!() => (),
                    b'/' => fail!(TagDoubleEnd),
                    _ => fail!(TagEndTagAttributes),
                },

                State::EmptyTagEnd => match c {
                    b'>' => self.start_tag_end(true)?,
                    _ => fail!(TagEmptyTagMissingEnd),
                },

                State::AttributeWhitespace => match c {
                    whitespace!() => (),
                    b'/' => self.state = State::EmptyTagEnd,
                    b'>' => self.start_tag_end(false)?,
                    name_breaker!() => fail!(TagAttributeBadName),
                    _ => {
                        self.attribute_start = self.tag.len();
                        back = *pos;
                        self.state = State::AttributeName;
                    }
                },

                State::AttributeName => match c {
                    b'=' | whitespace!() => {
                        if back < *pos {
                            self.tag.extend(&bytes[back..*pos])?;
                        }
                        self.finish_attribute_name()?;
                        if c == b'=' {
                            self.state = State::AttributeValueStart;
                        } else {
                            self.state = State::AttributeEq;
                        }
                    }
                    b'/' | b'>' | b'<' | b'"' | b'\'' | b'&' => fail!(TagAttributeBadName),
                    _ => (),
                },

                State::AttributeEq => match c {
                    b'=' => self.state = State::AttributeValueStart,
                    whitespace!() => (),
                    _ => fail!(TagAttributeWithoutEqual),
                },

                State::AttributeValueStart => match c {
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.value_start = self.tag.len();
                        back = *pos + 1;
                        self.state = State::AttributeValue;
                    }
                    whitespace!() => (),
                    _ => fail!(TagAttributeWithoutQuote),
                },

                State::AttributeValue => match c {
                    b'<' => fail!(TagAttributeBadValue),
                    b'&' => {
                        if back < *pos {
                            self.tag.extend(&bytes[back..*pos])?;
                        }
                        self.is_value_ref = true;
                        self.state = State::Reference;
                    }
                    _ => {
                        if c == self.quote {
                            if back < *pos {
                                self.tag.extend(&bytes[back..*pos])?;
                            }
                            self.finish_attribute_value()?;
                            self.state = State::AttributeValueEnd;
                        }
                    }
                },

                State::AttributeValueEnd => match c {
                    whitespace!() => self.state = State::AttributeWhitespace,
                    b'/' => self.state = State::EmptyTagEnd,
                    b'>' => self.start_tag_end(false)?,
                    _ => fail!(TagAttributeWithoutSpace),
                },

                State::Content => match c {
                    b'<' => self.state = State::TagStart,
                    b'&' => {
                        self.is_value_ref = false;
                        self.state = State::Reference;
                    }
                    _ => (),
                },

                State::Reference => match c {
                    b'#' => {
                        self.char_ref_value = 0;
                        self.char_ref_digits = 0;
                        self.state = State::CharReference;
                    }
                    b';' => fail!(ReferenceEmpty),
                    b'<' | b'&' | whitespace!() => fail!(ReferenceBadName),
                    _ => {
                        self.entity[0] = c;
                        self.entity_len = 1;
                        self.state = State::Entity;
                    }
                },

                State::Entity => match c {
                    b';' => {
                        let Some(ent) = predefined_entity(&self.entity[..self.entity_len]) else {
                            fail!(ReferenceUndefinedEntity);
                        };
                        if self.is_value_ref {
                            self.tag.push(ent)?;
                            back = *pos + 1;
                            self.state = State::AttributeValue;
                        } else {
                            self.state = State::Content;
                        }
                    }
                    b'<' | b'&' | whitespace!() => fail!(ReferenceBadName),
                    _ => {
                        if self.entity_len >= MAX_ENTITY_NAME {
                            fail!(ReferenceUndefinedEntity);
                        }
                        self.entity[self.entity_len] = c;
                        self.entity_len += 1;
                    }
                },

                State::CharReference => match c {
                    b'x' => self.state = State::HexCharReference,
                    b'0'..=b'9' => {
                        self.char_ref_value = (c - b'0').into();
                        self.char_ref_digits = 1;
                        self.state = State::DecCharReference;
                    }
                    _ => fail!(ReferenceInvalidDecimal),
                },

                State::DecCharReference | State::HexCharReference => {
                    let (radix, invalid) = match self.state {
                        State::DecCharReference => (10, Reason::ReferenceInvalidDecimal),
                        _ => (16, Reason::ReferenceInvalidHex),
                    };
                    if c == b';' {
                        if self.char_ref_digits == 0 {
                            return Err(invalid);
                        }
                        self.push_char_ref()?;
                        back = *pos + 1;
                    } else {
                        let digit = char::from(c).to_digit(radix).ok_or(invalid)?;
                        self.char_ref_value = self.char_ref_value * radix + digit;
                        self.char_ref_digits += 1;
                        if self.char_ref_value > MAX_CHAR {
                            return Err(invalid);
                        }
                    }
                }
            }

            *pos += 1;
        }

        if back < *pos {
            match self.state {
                State::TagName | State::AttributeName | State::AttributeValue => {
                    self.tag.extend(&bytes[back..*pos])?;
                }
                _ => (),
            }
        }

        Ok(())
    }
}

impl<U: Default> Default for Parser<U> {
    fn default() -> Self {
        Self::new()
    }
}
