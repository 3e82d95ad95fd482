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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! a key is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not
//! in set".
//!
//! # Properties
//!
//! - **No false negatives**: If a key was inserted, [`contains()`](BloomFilter::contains)
//!   will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for keys never inserted
//! - **Fixed size**: Dimensions are set at construction and never change
//! - **Mergeable**: Filters with identical dimensions combine by bitwise OR
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::bloom::BloomFilter;
//!
//! // Sized for 1000 keys with a 1% false positive rate
//! let mut filter = BloomFilter::with_capacity(1000, 0.01).unwrap();
//!
//! filter.insert("apple");
//! filter.insert("banana");
//!
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! println!("Bits: {}", filter.num_bits());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Creating Filters
//!
//! There are two ways to create a Bloom filter:
//!
//! ## By Target Accuracy (Recommended)
//!
//! Derives the optimal bit count and hash rounds:
//!
//! ```rust
//! # use streamsketch::bloom::BloomFilter;
//! let filter = BloomFilter::with_capacity(
//!     10_000, // Expected number of distinct keys
//!     0.01,   // Target false positive probability (1%)
//! )
//! .unwrap();
//! ```
//!
//! ## By Exact Dimensions (Manual)
//!
//! Specify the bit count and hash rounds directly:
//!
//! ```rust
//! # use streamsketch::bloom::BloomFilter;
//! let filter = BloomFilter::new(
//!     95_851, // Number of bits
//!     7,      // Number of hash rounds
//! )
//! .unwrap();
//! ```
//!
//! # Merging
//!
//! Filters built with identical dimensions can be combined:
//!
//! ```rust
//! # use streamsketch::bloom::BloomFilter;
//! let mut filter1 = BloomFilter::new(8192, 6).unwrap();
//! let mut filter2 = BloomFilter::new(8192, 6).unwrap();
//!
//! filter1.insert("a");
//! filter2.insert("b");
//!
//! // Union: recognizes keys from either filter
//! filter1.merge(&filter2).unwrap();
//! assert!(filter1.contains("a"));
//! assert!(filter1.contains("b"));
//! ```
//!
//! # Implementation Details
//!
//! - One MurmurHash3 x64-128 computation per hash round, salted by a
//!   little-endian round prefix on the hashed message
//! - Bits packed efficiently in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod sketch;

pub use self::sketch::BloomFilter;
