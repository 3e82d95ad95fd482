// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for streamsketch operations

use std::fmt;
use std::path::Path;

/// ErrorKind is all kinds of Error of streamsketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A size, width, depth, or rounds argument was zero.
    InvalidDimension,
    /// A rate, epsilon, or delta argument fell outside its required open interval.
    InvalidErrorBound,
    /// Two sketches with differing dimensions were merged.
    IncompatibleDimensions,
    /// An operation addressed a sketch that was never constructed.
    MissingOperand,
    /// Opening or reading an input failed.
    Io,
    /// An input record could not be decoded.
    MalformedRecord,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidDimension => "InvalidDimension",
            ErrorKind::InvalidErrorBound => "InvalidErrorBound",
            ErrorKind::IncompatibleDimensions => "IncompatibleDimensions",
            ErrorKind::MissingOperand => "MissingOperand",
            ErrorKind::Io => "Io",
            ErrorKind::MalformedRecord => "MalformedRecord",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all streamsketch functions.
///
/// # Examples
///
/// ```
/// # use streamsketch::error::Error;
/// # use streamsketch::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidDimension, "width must be greater than zero");
/// assert_eq!(err.kind(), ErrorKind::InvalidDimension);
/// assert_eq!(err.message(), "width must be greater than zero");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use streamsketch::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::Io, "failed to read input");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::other("disk gone"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within the streamsketch crate.
impl Error {
    pub(crate) fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDimension, msg)
    }

    pub(crate) fn invalid_error_bound(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidErrorBound, msg)
    }

    pub(crate) fn incompatible_dimensions(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompatibleDimensions, msg)
    }

    pub(crate) fn missing_operand(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingOperand, msg)
    }

    pub(crate) fn io(op: &'static str, path: &Path, src: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("failed to {op} input"))
            .with_context("path", path.display())
            .set_source(src)
    }

    pub(crate) fn malformed_record(path: &Path, src: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorKind::MalformedRecord, "failed to decode record")
            .with_context("path", path.display())
            .set_source(src)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}
