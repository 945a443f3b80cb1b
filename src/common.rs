// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    DoesNotExist,
    InvalidSelection,
    BadGameData,
    BadFraction,
    DivideByZero,
    DuplicateNode,
    DanglingEdge,
    PortMismatch,
    CircularDependency,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            InvalidSelection => "invalid_selection",
            BadGameData => "bad_game_data",
            BadFraction => "bad_fraction",
            DivideByZero => "divide_by_zero",
            DuplicateNode => "duplicate_node",
            DanglingEdge => "dangling_edge",
            PortMismatch => "port_mismatch",
            CircularDependency => "circular_dependency",
            Generic => "generic",
        };
        write!(f, "{name}")
    }
}

/// Which stage of the pipeline an error originated in.  Init errors are
/// fatal to the application; Query errors surface as empty result sets;
/// Layout errors suppress rendering for the current selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Init,
    Query,
    Layout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::Init => "init",
            ErrorKind::Query => "query",
            ErrorKind::Layout => "layout",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
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
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}:{} -- {}", self.kind, self.code, details),
            None => write!(f, "{}:{}", self.kind, self.code),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! init_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Init, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Init, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! query_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Query, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Query, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! layout_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, None))
    }};
}
