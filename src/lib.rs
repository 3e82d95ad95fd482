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

//! # streamsketch
//!
//! Approximate, memory-bounded structures for set-membership testing and
//! frequency estimation over streams of keys, together with collectors that
//! build a structure by draining any element sequence in a single pass.
//!
//! The [`bloom`] module provides a Bloom filter (membership, no false
//! negatives), the [`countmin`] module a count-min sketch (frequency, never
//! underestimates). Both derive positions from one shared round-salted hash
//! family, so equal dimensions always mean mergeable structures. The
//! [`collect`] module ties either structure to an upstream `Iterator`, and
//! the [`input`] module turns files into such iterators.
//!
//! ```rust
//! use streamsketch::collect::CountMinCollector;
//!
//! let words = ["to", "be", "or", "not", "to", "be"];
//! let sketch = CountMinCollector::new(|word: &&'static str| word.as_bytes())
//!     .error_bounds(0.01, 0.01)
//!     .collect(words.iter())
//!     .unwrap();
//!
//! assert!(sketch.estimate("to") >= 2);
//! assert_eq!(sketch.total_count(), 6);
//! ```

#![deny(missing_docs)]

pub mod bloom;
pub mod collect;
pub mod countmin;
pub mod error;
mod hash;
pub mod input;
