/*
** This file is a part of dicom-sax (SAX parser for tag-structured documents)
** Copyright (C) 2025 The dicom-sax developers
**
** dicom-sax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

const INITIAL_BUFFER_CAPACITY: usize = 128;

/// Tunables for the [Parser](crate::Parser) buffers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Capacity reserved for the tag buffers when the parser is created.
    pub initial_buffer_capacity: usize,

    /// Largest size any single internal buffer may grow to.
    ///
    /// This bounds the pending tag and attribute bytes, the names of the
    /// open elements, and the region returned by
    /// [get_buffer()](crate::Parser::get_buffer). Going over the limit fails
    /// with [NoMemory](crate::ErrorType::NoMemory) just like an allocation
    /// failure would.
    pub max_buffer_size: usize,
}

impl Config {
    /// Creates a configuration with the default values.
    pub fn new() -> Self {
        Config {
            initial_buffer_capacity: INITIAL_BUFFER_CAPACITY,
            max_buffer_size: usize::MAX,
        }
    }

    /// Sets the largest size of any internal buffer.
    pub fn max_buffer_size(mut self, limit: usize) -> Self {
        self.max_buffer_size = limit;
        self
    }

    /// Sets the capacity reserved for the tag buffers up front.
    pub fn initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
