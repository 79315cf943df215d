// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    JsonDeserialization,
    CircularDependency,
    DuplicateDimension,
    UnknownDimension,
    DimensionParentCycle,
    MissingParent,
    UnexpectedParent,
    DuplicateFunction,
    UnknownFunction,
    MismatchedDimensions,
    BadSubDomain,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            JsonDeserialization => "json_deserialization",
            CircularDependency => "circular_dependency",
            DuplicateDimension => "duplicate_dimension",
            UnknownDimension => "unknown_dimension",
            DimensionParentCycle => "dimension_parent_cycle",
            MissingParent => "missing_parent",
            UnexpectedParent => "unexpected_parent",
            DuplicateFunction => "duplicate_function",
            UnknownFunction => "unknown_function",
            MismatchedDimensions => "mismatched_dimensions",
            BadSubDomain => "bad_subdomain",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Ordering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Config => "ConfigError",
            ErrorKind::Ordering => "OrderingError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Ordering,
        ErrorCode::CircularDependency,
        Some("x, y".to_owned()),
    );
    assert_eq!("OrderingError{circular_dependency: x, y}", format!("{err}"));

    let err = Error::new(ErrorKind::Config, ErrorCode::UnknownDimension, None);
    assert_eq!("ConfigError{unknown_dimension}", format!("{err}"));
    assert_eq!(None, err.get_details());
}
