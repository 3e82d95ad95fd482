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

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Error;

/// Decodes one input format into records.
///
/// Implementations define [`records()`](Self::records), a lazy pull over the
/// raw input; the push-style [`parse()`](Self::parse) is provided on top of
/// it. The returned iterator owns the input and yields each record or the
/// first decode failure, after which it yields nothing.
pub trait RecordParser {
    /// The decoded record type. Records are owned data, decoupled from the
    /// input they were read from.
    type Record: 'static;

    /// Returns a lazy iterator over the decoded records of `input`.
    ///
    /// `path` is where `input` came from; it only labels errors.
    fn records(
        &self,
        path: &Path,
        input: Box<dyn Read>,
    ) -> Box<dyn Iterator<Item = Result<Self::Record, Error>>>;

    /// Decodes `input`, handing each record to `emit` until the input is
    /// exhausted or `emit` returns `false`.
    ///
    /// # Errors
    ///
    /// Returns the first decode failure. Records emitted before the failure
    /// have already been handed to `emit`.
    fn parse(
        &self,
        path: &Path,
        input: Box<dyn Read>,
        emit: &mut dyn FnMut(Self::Record) -> bool,
    ) -> Result<(), Error> {
        for record in self.records(path, input) {
            if !emit(record?) {
                return Ok(());
            }
        }
        Ok(())
    }
}

// ============================================================================
// Line-oriented input
// ============================================================================

/// Parses text input into one record per line.
///
/// A line ends at `\n`; one trailing `\n` and then one trailing `\r` are
/// stripped, so CRLF input decodes cleanly. A final line without a newline
/// is still yielded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl RecordParser for LineParser {
    type Record = String;

    fn records(
        &self,
        path: &Path,
        input: Box<dyn Read>,
    ) -> Box<dyn Iterator<Item = Result<String, Error>>> {
        Box::new(LineRecords {
            path: path.to_path_buf(),
            reader: BufReader::new(input),
            failed: false,
        })
    }
}

struct LineRecords {
    path: PathBuf,
    reader: BufReader<Box<dyn Read>>,
    failed: bool,
}

impl Iterator for LineRecords {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(trim_line_ending(line))),
            Err(err) => {
                self.failed = true;
                Some(Err(Error::io("read", &self.path, err)))
            }
        }
    }
}

fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
    }
    if line.ends_with('\r') {
        line.pop();
    }
    line
}

// ============================================================================
// Delimited-record input
// ============================================================================

/// Parses delimited text input, yielding each record's fields.
///
/// There is no header row: every record is data. With the default
/// configuration records are comma separated and must all have as many
/// fields as the first record.
///
/// # Examples
///
/// ```
/// use streamsketch::input::CsvParser;
///
/// let _parser = CsvParser::new()
///     .delimiter(b'|')
///     .comment(b'#')
///     .trim(true);
/// ```
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    comment: Option<u8>,
    trim: bool,
    flexible: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        CsvParser {
            delimiter: b',',
            comment: None,
            trim: false,
            flexible: false,
        }
    }
}

impl CsvParser {
    /// Creates a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter (default `,`).
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets a comment byte; lines starting with it are skipped.
    pub fn comment(mut self, comment: u8) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Strips leading and trailing whitespace from every field.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Allows records with varying field counts.
    pub fn flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }
}

impl RecordParser for CsvParser {
    type Record = Vec<String>;

    fn records(
        &self,
        path: &Path,
        input: Box<dyn Read>,
    ) -> Box<dyn Iterator<Item = Result<Vec<String>, Error>>> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .comment(self.comment)
            .flexible(self.flexible);
        if self.trim {
            builder.trim(csv::Trim::All);
        }

        Box::new(CsvRecords {
            path: path.to_path_buf(),
            records: builder.from_reader(input).into_records(),
            failed: false,
        })
    }
}

struct CsvRecords {
    path: PathBuf,
    records: csv::StringRecordsIntoIter<Box<dyn Read>>,
    failed: bool,
}

impl Iterator for CsvRecords {
    type Item = Result<Vec<String>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.records.next()? {
            Ok(record) => Some(Ok(record.iter().map(str::to_string).collect())),
            Err(err) => {
                self.failed = true;
                Some(Err(Error::malformed_record(&self.path, err)))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::error::ErrorKind;

    use super::*;

    fn input(data: &str) -> Box<dyn Read> {
        Box::new(Cursor::new(data.to_string()))
    }

    fn collect_lines(data: &str) -> Vec<String> {
        LineParser
            .records(Path::new("test.txt"), input(data))
            .map(|record| record.unwrap())
            .collect()
    }

    #[test]
    fn test_line_parser_splits_lines() {
        assert_eq!(collect_lines("a\nb\nc\n"), ["a", "b", "c"]);
    }

    #[test]
    fn test_line_parser_yields_final_line_without_newline() {
        assert_eq!(collect_lines("a\nb"), ["a", "b"]);
    }

    #[test]
    fn test_line_parser_strips_crlf() {
        assert_eq!(collect_lines("a\r\nb\r\n"), ["a", "b"]);
        // A bare trailing carriage return is stripped as well.
        assert_eq!(collect_lines("a\r"), ["a"]);
    }

    #[test]
    fn test_line_parser_keeps_blank_lines() {
        assert_eq!(collect_lines("\n\nx\n"), ["", "", "x"]);
    }

    #[test]
    fn test_line_parser_empty_input() {
        assert!(collect_lines("").is_empty());
    }

    #[test]
    fn test_csv_parser_splits_fields() {
        let records: Vec<Vec<String>> = CsvParser::new()
            .records(Path::new("test.csv"), input("a,b\nc,d\n"))
            .map(|record| record.unwrap())
            .collect();
        assert_eq!(records, [["a", "b"], ["c", "d"]]);
    }

    #[test]
    fn test_csv_parser_custom_delimiter_and_comment() {
        let records: Vec<Vec<String>> = CsvParser::new()
            .delimiter(b'|')
            .comment(b'#')
            .records(Path::new("test.csv"), input("# header\na|b\n"))
            .map(|record| record.unwrap())
            .collect();
        assert_eq!(records, [["a", "b"]]);
    }

    #[test]
    fn test_csv_parser_trims_fields() {
        let records: Vec<Vec<String>> = CsvParser::new()
            .trim(true)
            .records(Path::new("test.csv"), input(" a , b \n"))
            .map(|record| record.unwrap())
            .collect();
        assert_eq!(records, [["a", "b"]]);
    }

    #[test]
    fn test_csv_parser_rejects_uneven_field_counts() {
        let mut records = CsvParser::new().records(Path::new("test.csv"), input("a,b\nc,d,e\n"));

        assert_eq!(records.next().unwrap().unwrap(), ["a", "b"]);
        let err = records.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(records.next().is_none());
    }

    #[test]
    fn test_csv_parser_flexible_field_counts() {
        let records: Vec<Vec<String>> = CsvParser::new()
            .flexible(true)
            .records(Path::new("test.csv"), input("a,b\nc,d,e\n"))
            .map(|record| record.unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], ["c", "d", "e"]);
    }

    #[test]
    fn test_parse_hands_every_record_to_callback() {
        let mut seen = Vec::new();
        LineParser
            .parse(Path::new("test.txt"), input("a\nb\n"), &mut |line| {
                seen.push(line);
                true
            })
            .unwrap();
        assert_eq!(seen, ["a", "b"]);
    }

    #[test]
    fn test_parse_stops_when_callback_declines() {
        let mut seen = Vec::new();
        LineParser
            .parse(Path::new("test.txt"), input("a\nb\nc\n"), &mut |line| {
                seen.push(line);
                false
            })
            .unwrap();
        assert_eq!(seen, ["a"]);
    }

    #[test]
    fn test_parse_reports_decode_failure() {
        let err = CsvParser::new()
            .parse(Path::new("test.csv"), input("a,b\nc\n"), &mut |_| true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }
}
