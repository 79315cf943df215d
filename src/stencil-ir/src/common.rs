// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

// Re-export all common types from stencil-core
pub use stencil_core::common::*;

#[macro_export]
macro_rules! config_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Config, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Config, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! ordering_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Ordering, ErrorCode::$code, Some($str)))
    }};
}

#[test]
fn test_err_macros() {
    fn config() -> Result<()> {
        config_err!(UnknownDimension, "q".to_owned())
    }
    fn ordering() -> Result<()> {
        ordering_err!(CircularDependency, "x, y".to_owned())
    }

    let err = config().unwrap_err();
    assert_eq!(ErrorKind::Config, err.kind);
    assert_eq!(ErrorCode::UnknownDimension, err.code);

    let err = ordering().unwrap_err();
    assert_eq!(ErrorKind::Ordering, err.kind);
    assert_eq!(Some("x, y".to_owned()), err.details);
}
