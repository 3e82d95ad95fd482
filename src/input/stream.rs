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

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Error;
use crate::input::parser::CsvParser;
use crate::input::parser::LineParser;
use crate::input::parser::RecordParser;

/// A source a record stream can open and read.
///
/// Abstracts how bytes are obtained so parsing, and tests, need no real
/// files. The path only labels the source in error reports.
pub trait InputFile {
    /// Returns the path naming this source.
    fn path(&self) -> &Path;

    /// Opens the source for reading.
    fn open(&self) -> io::Result<Box<dyn Read>>;
}

/// An [`InputFile`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Creates a reference to a local file. Nothing is opened until the
    /// stream reaches it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalFile { path: path.into() }
    }
}

impl InputFile for LocalFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

/// A lazy stream of decoded records spanning multiple input files.
///
/// Iterates every record of every file in order. Files are opened one at a
/// time, when the stream reaches them. The first open, read, or decode
/// failure stops the stream; the failure itself is reported separately,
/// through [`error()`](Self::error) after the drain, so the stream can feed
/// any record consumer as a plain `Iterator`.
///
/// # Examples
///
/// ```no_run
/// use streamsketch::collect::CountMinCollector;
/// use streamsketch::input::RecordStream;
///
/// let mut stream = RecordStream::lines(["a.log", "b.log"]);
/// let sketch = CountMinCollector::new(|line: String| line)
///     .error_bounds(0.01, 0.01)
///     .collect(&mut stream)
///     .unwrap();
///
/// if let Some(err) = stream.error() {
///     eprintln!("input truncated: {err}");
/// }
/// println!("records: {}", sketch.total_count());
/// ```
pub struct RecordStream<P: RecordParser> {
    parser: P,
    files: std::vec::IntoIter<Box<dyn InputFile>>,
    current: Option<Box<dyn Iterator<Item = Result<P::Record, Error>>>>,
    error: Option<Error>,
    done: bool,
}

impl<P: RecordParser> RecordStream<P> {
    /// Creates a stream over the given sources, in order.
    pub fn new(parser: P, files: Vec<Box<dyn InputFile>>) -> Self {
        RecordStream {
            parser,
            files: files.into_iter(),
            current: None,
            error: None,
            done: false,
        }
    }

    /// Creates a stream over local files at the given paths, in order.
    pub fn from_paths<I, S>(parser: P, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let files = paths
            .into_iter()
            .map(|path| Box::new(LocalFile::new(path)) as Box<dyn InputFile>)
            .collect();
        Self::new(parser, files)
    }

    /// Returns the failure that stopped the stream, if any.
    ///
    /// Meaningful once iteration has returned `None`; a drained stream with
    /// no error produced every record of every file.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Consumes the stream, returning the failure that stopped it, if any.
    pub fn into_error(self) -> Option<Error> {
        self.error
    }

    fn fail(&mut self, err: Error) {
        self.error = Some(err);
        self.current = None;
        self.done = true;
    }
}

impl RecordStream<LineParser> {
    /// Creates a line-record stream over local files, one `String` per line.
    pub fn lines<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        Self::from_paths(LineParser, paths)
    }
}

impl RecordStream<CsvParser> {
    /// Creates a comma-separated-record stream over local files with the
    /// default [`CsvParser`] configuration.
    pub fn csv<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        Self::from_paths(CsvParser::new(), paths)
    }
}

impl<P: RecordParser> Iterator for RecordStream<P> {
    type Item = P::Record;

    fn next(&mut self) -> Option<P::Record> {
        if self.done {
            return None;
        }

        loop {
            if let Some(records) = self.current.as_mut() {
                match records.next() {
                    Some(Ok(record)) => return Some(record),
                    Some(Err(err)) => {
                        self.fail(err);
                        return None;
                    }
                    None => self.current = None,
                }
            }

            match self.files.next() {
                Some(file) => match file.open() {
                    Ok(input) => {
                        self.current = Some(self.parser.records(file.path(), input));
                    }
                    Err(err) => {
                        self.fail(Error::io("open", file.path(), err));
                        return None;
                    }
                },
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
