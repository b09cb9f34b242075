/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// Type of the error which stopped the parsing.
///
/// The first error is latched by the [Parser](super::Parser) and is
/// returned from [error_code()](super::Parser::error_code) for the rest
/// of its lifetime. A more detailed description of syntax problems is
/// available via [error_description()](super::Parser::error_description),
/// and the position of the offending byte via
/// [current_byte_index()](super::Parser::current_byte_index).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorType {
    /// No error happened.
    NoError,

    /// An internal buffer could not grow to the needed size.
    ///
    /// Either the allocator refused the request or the buffer would exceed
    /// the [max_buffer_size](super::Config::max_buffer_size) limit.
    NoMemory,

    /// Malformed tag, attribute, reference, or character in the input.
    Syntax,

    /// The document was finished without a single element.
    NoElements,

    /// An end tag does not match the innermost open start tag.
    TagMismatch,

    /// A start tag has two attributes with the same name.
    DuplicateAttribute,

    /// Something other than whitespace, comments or processing instructions
    /// follows the root element.
    JunkAfterDocElement,

    /// A reference names an entity which is not predefined.
    UndefinedEntity,

    /// The parser was used in a state which does not allow the operation.
    ///
    /// Examples are parsing again after the document is finished or failed,
    /// and calling [parse_buffer()](super::Parser::parse_buffer) without a
    /// matching [get_buffer()](super::Parser::get_buffer).
    UnexpectedState,
}

impl ErrorType {
    /// Every error type, in declaration order.
    pub const ALL: [ErrorType; 9] = [
        ErrorType::NoError,
        ErrorType::NoMemory,
        ErrorType::Syntax,
        ErrorType::NoElements,
        ErrorType::TagMismatch,
        ErrorType::DuplicateAttribute,
        ErrorType::JunkAfterDocElement,
        ErrorType::UndefinedEntity,
        ErrorType::UnexpectedState,
    ];

    /// Returns a fixed human readable description of the error type.
    ///
    /// This does not depend on any parser state and can be used to render
    /// stored error codes.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorType::NoError => "no error",
            ErrorType::NoMemory => "out of memory",
            ErrorType::Syntax => "syntax error",
            ErrorType::NoElements => "no element found",
            ErrorType::TagMismatch => "mismatched tag",
            ErrorType::DuplicateAttribute => "duplicate attribute",
            ErrorType::JunkAfterDocElement => "junk after document element",
            ErrorType::UndefinedEntity => "undefined entity",
            ErrorType::UnexpectedState => "unexpected parser state",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for ErrorType {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Reason {
    NoMemory,
    BufferLimit,
    BufferNotReserved,
    BufferOverrun,
    Utf8InvalidContByte,
    Utf8OverlongSequence,
    Utf8InvalidPrefixByte,
    CharInvalid,
    DocNoElements,
    DocOpenTags,
    DocOpenMarkup,
    DocTextBeforeRoot,
    DocJunkAfterRoot,
    DocTagAfterRoot,
    TagCloseWithoutOpen,
    TagWhitespaceStart,
    TagEmptyName,
    TagBadNameChar,
    TagMismatch,
    TagDoubleEnd,
    TagEndTagAttributes,
    TagEmptyTagMissingEnd,
    TagAttributeWithoutEqual,
    TagAttributeWithoutQuote,
    TagAttributeWithoutSpace,
    TagAttributeBadName,
    TagAttributeBadValue,
    TagAttributeDuplicate,
    ReferenceEmpty,
    ReferenceBadName,
    ReferenceInvalidDecimal,
    ReferenceInvalidHex,
    ReferenceUndefinedEntity,
    CommentMissingDash,
    CommentMissingEnd,
    MarkupCdataSectionBadStart,
    MarkupCdataSectionOutsideRoot,
    MarkupDoctypeBadStart,
    MarkupDoctypeMisplaced,
    MarkupUnrecognized,
}

impl Reason {
    pub(super) fn code(&self) -> ErrorType {
        match self {
            Reason::NoMemory | Reason::BufferLimit => ErrorType::NoMemory,
            Reason::BufferNotReserved | Reason::BufferOverrun => ErrorType::UnexpectedState,
            Reason::DocNoElements => ErrorType::NoElements,
            Reason::DocJunkAfterRoot | Reason::DocTagAfterRoot => ErrorType::JunkAfterDocElement,
            Reason::TagMismatch => ErrorType::TagMismatch,
            Reason::TagAttributeDuplicate => ErrorType::DuplicateAttribute,
            Reason::ReferenceUndefinedEntity => ErrorType::UndefinedEntity,
            _ => ErrorType::Syntax,
        }
    }

    pub(super) fn description(&self) -> &'static str {
        match self {
            Reason::NoMemory => "Cannot allocate memory for the parser buffer",
            Reason::BufferLimit => "Parser buffer would exceed the configured size limit",
            Reason::BufferNotReserved => "No buffer was requested before parsing it",
            Reason::BufferOverrun => "Parsed length is larger than the requested buffer",
            Reason::Utf8InvalidContByte => "Invalid UTF8 continuation byte",
            Reason::Utf8OverlongSequence => "Overlong UTF8 sequence",
            Reason::Utf8InvalidPrefixByte => "Invalid UTF8 prefix byte",
            Reason::CharInvalid => "Invalid document character",
            Reason::DocNoElements => "Document has no root element",
            Reason::DocOpenTags => "Document has unclosed tags",
            Reason::DocOpenMarkup => "Document ends inside a tag, comment or other markup",
            Reason::DocTextBeforeRoot => "Character data not allowed before the root element",
            Reason::DocJunkAfterRoot => "Character data not allowed after the root element",
            Reason::DocTagAfterRoot => "Tags cannot be outside of the root element",
            Reason::TagCloseWithoutOpen => "Close tag without open",
            Reason::TagWhitespaceStart => "Tag cannot start with whitespace",
            Reason::TagEmptyName => "Tag has no name",
            Reason::TagBadNameChar => "Tag names cannot have '<', '=', '&' or quote characters",
            Reason::TagMismatch => "End tag does not match the open tag",
            Reason::TagDoubleEnd => "End tag has standalone ending too",
            Reason::TagEndTagAttributes => "End tag cannot have attributes",
            Reason::TagEmptyTagMissingEnd => "Empty element tags must end after the '/'",
            Reason::TagAttributeWithoutEqual => "Tag attributes must have '=' before the value",
            Reason::TagAttributeWithoutQuote => "Tag attribute value must be double or single quoted",
            Reason::TagAttributeWithoutSpace => "Tag attributes must be separated by whitespace",
            Reason::TagAttributeBadName => "Tag attribute names cannot have '/', '<', '>', '&' or quotes",
            Reason::TagAttributeBadValue => {
                "Tag attribute value cannot have '<' character without a reference"
            }
            Reason::TagAttributeDuplicate => "Tag has the same attribute twice",
            Reason::ReferenceEmpty => "Reference has no name",
            Reason::ReferenceBadName => "Reference names cannot have whitespace, '<' or '&'",
            Reason::ReferenceInvalidDecimal => "Invalid decimal character reference",
            Reason::ReferenceInvalidHex => "Invalid hexadecimal character reference",
            Reason::ReferenceUndefinedEntity => "Only predefined entities can be referenced",
            Reason::CommentMissingDash => "Comment should start with double dash",
            Reason::CommentMissingEnd => "Comment should end after double dash",
            Reason::MarkupCdataSectionBadStart => "Character data sections must start with '[CDATA['",
            Reason::MarkupCdataSectionOutsideRoot => {
                "Character data sections cannot be outside of the root element"
            }
            Reason::MarkupDoctypeBadStart => "Doctype must start with 'DOCTYPE '",
            Reason::MarkupDoctypeMisplaced => "Doctype must come once, before the root element",
            Reason::MarkupUnrecognized => {
                "Markup is not a comment, character data section, or document type declaration"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn descriptions_are_distinct() {
        let descriptions: HashSet<&str> = ErrorType::ALL.iter().map(|e| e.description()).collect();
        assert_eq!(descriptions.len(), ErrorType::ALL.len());
        assert!(descriptions.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn display_matches_description() {
        for code in ErrorType::ALL {
            assert_eq!(code.to_string(), code.description());
        }
    }

    #[test]
    fn reason_codes() {
        assert_eq!(Reason::BufferLimit.code(), ErrorType::NoMemory);
        assert_eq!(Reason::BufferOverrun.code(), ErrorType::UnexpectedState);
        assert_eq!(Reason::DocTagAfterRoot.code(), ErrorType::JunkAfterDocElement);
        assert_eq!(Reason::TagAttributeDuplicate.code(), ErrorType::DuplicateAttribute);
        assert_eq!(Reason::ReferenceUndefinedEntity.code(), ErrorType::UndefinedEntity);
        assert_eq!(Reason::TagWhitespaceStart.code(), ErrorType::Syntax);
    }
}
