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

use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use streamsketch::collect::CountMinCollector;
use streamsketch::error::Error;
use streamsketch::error::ErrorKind;
use streamsketch::input::LineParser;
use streamsketch::input::RecordParser;
use streamsketch::input::RecordStream;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_lines_span_files_in_path_order() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "first.txt", "1\n2\n");
    let second = write_file(&dir, "second.txt", "3\n4\n");

    let mut stream = RecordStream::lines([first, second]);
    let records: Vec<String> = (&mut stream).collect();

    assert_eq!(records, ["1", "2", "3", "4"]);
    assert!(stream.error().is_none());
}

#[test]
fn test_final_line_without_newline_is_yielded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "events.txt", "alpha\nbeta");

    let records: Vec<String> = RecordStream::lines([path]).collect();
    assert_eq!(records, ["alpha", "beta"]);
}

#[test]
fn test_missing_file_defers_error_until_after_earlier_records() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "first.txt", "1\n2\n");
    let missing = dir.path().join("missing.txt");
    let last = write_file(&dir, "last.txt", "3\n");

    let mut stream = RecordStream::lines([first, missing, last]);
    let records: Vec<String> = (&mut stream).collect();

    // Records before the failure are still produced; the failing file and
    // everything after it are not.
    assert_eq!(records, ["1", "2"]);

    let err = stream.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_that!(err.to_string(), contains_substring("missing.txt"));
}

#[test]
fn test_csv_records_and_malformed_record_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "events.csv", "alice,login\nbob\ncarol,logout\n");

    let mut stream = RecordStream::csv([path]);
    let records: Vec<Vec<String>> = (&mut stream).collect();

    assert_eq!(records, [["alice", "login"]]);

    let err = stream.into_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    assert_that!(err.to_string(), contains_substring("events.csv"));
}

#[test]
fn test_custom_parser_through_the_trait() {
    /// Splits each line into pipe-delimited fields.
    struct PipeParser;

    impl RecordParser for PipeParser {
        type Record = Vec<String>;

        fn records(
            &self,
            path: &Path,
            input: Box<dyn Read>,
        ) -> Box<dyn Iterator<Item = Result<Vec<String>, Error>>> {
            let lines = LineParser.records(path, input);
            Box::new(lines.map(|line| {
                line.map(|line| line.split('|').map(str::to_string).collect())
            }))
        }
    }

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "events.psv", "alice|login\nbob|logout\n");

    let records: Vec<Vec<String>> = RecordStream::new(
        PipeParser,
        vec![Box::new(streamsketch::input::LocalFile::new(path))],
    )
    .collect();

    assert_eq!(records, [["alice", "login"], ["bob", "logout"]]);
}

#[test]
fn test_stream_feeds_collector_and_reports_failure_after_drain() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "first.txt", "apple\nbanana\napple\n");
    let missing = dir.path().join("missing.txt");

    let mut stream = RecordStream::lines([first, missing]);
    let sketch = CountMinCollector::new(|line: String| line)
        .dimensions(256, 5)
        .collect(&mut stream)
        .unwrap();

    // The drain kept every record produced before the failure.
    assert_eq!(sketch.total_count(), 3);
    assert!(sketch.estimate("apple") >= 2);

    let err = stream.into_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_complete_stream_leaves_no_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "words.txt", "one\ntwo\nthree\n");

    let mut stream = RecordStream::lines([path]);
    let count = (&mut stream).count();

    assert_eq!(count, 3);
    assert!(stream.into_error().is_none());
}
