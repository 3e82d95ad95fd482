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

//! File and record input for feeding sketches.
//!
//! Three pieces compose into a record pipeline:
//!
//! - [`InputFile`] abstracts how a source is opened ([`LocalFile`] reads
//!   from the filesystem; tests substitute in-memory sources)
//! - [`RecordParser`] decodes one format into records ([`LineParser`],
//!   [`CsvParser`], or any user implementation)
//! - [`RecordStream`] chains every record of every file into one lazy
//!   `Iterator`
//!
//! The stream yields plain records, not `Result`s, so it plugs directly
//! into iterator combinators and the [`collect`](crate::collect)
//! collectors. A failure stops the stream instead; check
//! [`RecordStream::error`] after draining.
//!
//! # Usage
//!
//! ```no_run
//! use streamsketch::input::RecordStream;
//!
//! let mut stream = RecordStream::csv(["events.csv"]);
//! let users: Vec<String> = (&mut stream)
//!     .filter_map(|record| record.first().cloned())
//!     .collect();
//!
//! if let Some(err) = stream.error() {
//!     eprintln!("stopped early: {err}");
//! }
//! ```

mod parser;
mod stream;

pub use self::parser::CsvParser;
pub use self::parser::LineParser;
pub use self::parser::RecordParser;
pub use self::stream::InputFile;
pub use self::stream::LocalFile;
pub use self::stream::RecordStream;
