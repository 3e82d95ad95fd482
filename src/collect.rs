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

//! Collectors that build a sketch by draining an element sequence.
//!
//! A collector pairs a key extraction function with sketch parameters. Its
//! terminal [`collect`](BloomCollector::collect) constructs the sketch, then
//! consumes the sequence in one forward pass, feeding every element's key
//! into it. Elements are visited exactly once and never buffered, so any
//! `Iterator` works upstream, including ones too large to materialize.
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::collect::BloomCollector;
//! use streamsketch::collect::CountMinCollector;
//!
//! let words = ["apple", "banana", "apple", "cherry"];
//!
//! let filter = BloomCollector::new(|word: &&str| word.to_string())
//!     .capacity(1000, 0.01)
//!     .collect(words.iter())
//!     .unwrap();
//! assert!(filter.contains("banana"));
//!
//! let counts = CountMinCollector::new(|word: &&str| word.to_string())
//!     .dimensions(256, 5)
//!     .collect(words.iter().filter(|word| word.len() > 5))
//!     .unwrap();
//! assert!(counts.estimate("banana") >= 1);
//! assert_eq!(counts.total_count(), 2);
//! ```

use crate::bloom::BloomFilter;
use crate::countmin::CountMinSketch;
use crate::error::Error;

/// Builds a [`BloomFilter`] from an element sequence.
///
/// Configure with [`dimensions()`](Self::dimensions) or
/// [`capacity()`](Self::capacity), then call
/// [`collect()`](Self::collect).
pub struct BloomCollector<F> {
    params: Option<BloomParams>,
    key_fn: F,
}

#[derive(Debug, Clone, Copy)]
enum BloomParams {
    Dimensions { num_bits: u64, num_hashes: u16 },
    Capacity { expected_items: u64, fpp: f64 },
}

impl<F> BloomCollector<F> {
    /// Creates an unconfigured collector around a key extraction function.
    ///
    /// The function maps each sequence element to the key bytes inserted
    /// into the filter.
    pub fn new(key_fn: F) -> Self {
        Self {
            params: None,
            key_fn,
        }
    }

    /// Configures exact filter dimensions, as in [`BloomFilter::new`].
    pub fn dimensions(mut self, num_bits: u64, num_hashes: u16) -> Self {
        self.params = Some(BloomParams::Dimensions {
            num_bits,
            num_hashes,
        });
        self
    }

    /// Configures a target accuracy, as in [`BloomFilter::with_capacity`].
    pub fn capacity(mut self, expected_items: u64, fpp: f64) -> Self {
        self.params = Some(BloomParams::Capacity {
            expected_items,
            fpp,
        });
        self
    }

    /// Constructs the filter, then drains the sequence into it.
    ///
    /// The filter is built from the configured parameters before the first
    /// element is pulled; on a construction error the sequence is never
    /// advanced. Each element is consumed exactly once, in production
    /// order, and its key inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingOperand`](crate::error::ErrorKind::MissingOperand)
    /// if neither `dimensions()` nor `capacity()` was called, or the
    /// construction error of the configured parameters.
    pub fn collect<I, K>(self, items: I) -> Result<BloomFilter, Error>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> K,
        K: AsRef<[u8]>,
    {
        let Self { params, mut key_fn } = self;
        let mut filter = match params {
            Some(BloomParams::Dimensions {
                num_bits,
                num_hashes,
            }) => BloomFilter::new(num_bits, num_hashes)?,
            Some(BloomParams::Capacity {
                expected_items,
                fpp,
            }) => BloomFilter::with_capacity(expected_items, fpp)?,
            None => {
                return Err(Error::missing_operand(
                    "must call dimensions() or capacity() before collect()",
                ));
            }
        };

        for item in items {
            filter.insert(key_fn(item));
        }
        Ok(filter)
    }
}

/// Builds a [`CountMinSketch`] from an element sequence.
///
/// Configure with [`dimensions()`](Self::dimensions) or
/// [`error_bounds()`](Self::error_bounds), then call
/// [`collect()`](Self::collect). Every element contributes a count of one
/// to its key.
pub struct CountMinCollector<F> {
    params: Option<CountMinParams>,
    key_fn: F,
}

#[derive(Debug, Clone, Copy)]
enum CountMinParams {
    Dimensions { width: u32, depth: u16 },
    ErrorBounds { epsilon: f64, delta: f64 },
}

impl<F> CountMinCollector<F> {
    /// Creates an unconfigured collector around a key extraction function.
    pub fn new(key_fn: F) -> Self {
        Self {
            params: None,
            key_fn,
        }
    }

    /// Configures exact table dimensions, as in [`CountMinSketch::new`].
    pub fn dimensions(mut self, width: u32, depth: u16) -> Self {
        self.params = Some(CountMinParams::Dimensions { width, depth });
        self
    }

    /// Configures target error bounds, as in
    /// [`CountMinSketch::with_error_bounds`].
    pub fn error_bounds(mut self, epsilon: f64, delta: f64) -> Self {
        self.params = Some(CountMinParams::ErrorBounds { epsilon, delta });
        self
    }

    /// Constructs the sketch, then drains the sequence into it.
    ///
    /// The sketch is built before the first element is pulled; on a
    /// construction error the sequence is never advanced. Each element
    /// is consumed exactly once, in production order, and adds one
    /// occurrence of its key.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingOperand`](crate::error::ErrorKind::MissingOperand)
    /// if neither `dimensions()` nor `error_bounds()` was called, or the
    /// construction error of the configured parameters.
    pub fn collect<I, K>(self, items: I) -> Result<CountMinSketch, Error>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> K,
        K: AsRef<[u8]>,
    {
        let Self { params, mut key_fn } = self;
        let mut sketch = match params {
            Some(CountMinParams::Dimensions { width, depth }) => {
                CountMinSketch::new(width, depth)?
            }
            Some(CountMinParams::ErrorBounds { epsilon, delta }) => {
                CountMinSketch::with_error_bounds(epsilon, delta)?
            }
            None => {
                return Err(Error::missing_operand(
                    "must call dimensions() or error_bounds() before collect()",
                ));
            }
        };

        for item in items {
            sketch.update(key_fn(item));
        }
        Ok(sketch)
    }
}

// ============================================================================
// Tests
// ============================================================================
