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

use crate::error::Error;
use crate::hash::hash64;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted keys always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Construct with [`new()`](Self::new) for exact dimensions or
/// [`with_capacity()`](Self::with_capacity) for a target accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Total number of bits in the filter (m)
    num_bits: u64,
    /// Number of hash rounds per key (k)
    num_hashes: u16,
    /// Count of bits set to 1 (for statistics)
    num_bits_set: u64,
    /// Count of insert operations, not distinct keys
    num_inserts: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(num_bits / 64)
    words: Box<[u64]>,
}

impl BloomFilter {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a filter with exact dimensions.
    ///
    /// Use this when you want precise control over the filter size, or when
    /// working with pre-calculated parameters. Filters must share dimensions
    /// to be mergeable.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidDimension`](crate::error::ErrorKind::InvalidDimension)
    /// if `num_bits` or `num_hashes` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// let filter = BloomFilter::new(8192, 6).unwrap();
    /// assert_eq!(filter.num_bits(), 8192);
    /// assert_eq!(filter.num_hashes(), 6);
    /// ```
    pub fn new(num_bits: u64, num_hashes: u16) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::invalid_dimension("num_bits must be greater than zero"));
        }
        if num_hashes == 0 {
            return Err(Error::invalid_dimension("num_hashes must be greater than zero"));
        }

        let num_words = num_bits.div_ceil(64) as usize;
        Ok(BloomFilter {
            num_bits,
            num_hashes,
            num_bits_set: 0,
            num_inserts: 0,
            words: vec![0u64; num_words].into_boxed_slice(),
        })
    }

    /// Creates a filter sized for a target accuracy.
    ///
    /// Derives the optimal number of bits `m = ceil(-n * ln(p) / ln(2)^2)`
    /// and hash rounds `k = ceil((m/n) * ln(2))` for `expected_items`
    /// distinct keys at false positive probability `fpp`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidDimension`](crate::error::ErrorKind::InvalidDimension)
    /// if `expected_items` is zero, or
    /// [`ErrorKind::InvalidErrorBound`](crate::error::ErrorKind::InvalidErrorBound)
    /// if `fpp` is not in the open interval (0, 1).
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// // Optimal for 1000 keys with 1% FPP
    /// let filter = BloomFilter::with_capacity(1000, 0.01).unwrap();
    /// assert!(filter.num_bits() > 9000 && filter.num_bits() < 10000); // ~9586 bits
    /// assert_eq!(filter.num_hashes(), 7); // Optimal k ~ 6.64
    /// ```
    pub fn with_capacity(expected_items: u64, fpp: f64) -> Result<Self, Error> {
        if expected_items == 0 {
            return Err(Error::invalid_dimension(
                "expected_items must be greater than zero",
            ));
        }
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(Error::invalid_error_bound(
                "fpp must lie in the open interval (0, 1)",
            )
            .with_context("fpp", fpp));
        }

        let n = expected_items as f64;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        let num_bits = (-n * fpp.ln() / ln2_squared).ceil() as u64;

        let k = (num_bits as f64 / n * std::f64::consts::LN_2).ceil().max(1.0);
        let num_hashes = k as u16;

        Self::new(num_bits, num_hashes)
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Key was **possibly** inserted (or false positive)
    /// - `false`: Key was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100, 0.01).unwrap();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted (probably)
    /// ```
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        if self.is_empty() {
            return false;
        }

        let key = key.as_ref();
        for round in 0..self.num_hashes {
            let bit_index = self.bit_index(key, round);
            if !self.get_bit(bit_index) {
                return false;
            }
        }
        true
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts a key into the filter.
    ///
    /// After insertion, `contains(key)` will always return `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100, 0.01).unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(String::from("banana"));
    /// filter.insert(&[1u8, 2, 3][..]);
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn insert(&mut self, key: impl AsRef<[u8]>) {
        let key = key.as_ref();
        for round in 0..self.num_hashes {
            let bit_index = self.bit_index(key, round);
            self.set_bit(bit_index);
        }
        self.num_inserts += 1;
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits while preserving dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_capacity(100, 0.01).unwrap();
    /// filter.insert("apple");
    /// assert!(!filter.is_empty());
    ///
    /// filter.reset();
    /// assert!(filter.is_empty());
    /// assert!(!filter.contains("apple"));
    /// ```
    pub fn reset(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
        self.num_bits_set = 0;
        self.num_inserts = 0;
    }

    // ========================================================================
    // Merge Operations
    // ========================================================================

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter will recognize keys from either filter
    /// (plus any false positives from either).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleDimensions`](crate::error::ErrorKind::IncompatibleDimensions)
    /// if the filters differ in bit count or hash rounds. The receiver is
    /// unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(8192, 6).unwrap();
    /// let mut f2 = BloomFilter::new(8192, 6).unwrap();
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.merge(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// ```
    pub fn merge(&mut self, other: &BloomFilter) -> Result<(), Error> {
        if self.num_bits != other.num_bits || self.num_hashes != other.num_hashes {
            return Err(Error::incompatible_dimensions("filter dimensions differ")
                .with_context("expected", format!("{}x{}", self.num_bits, self.num_hashes))
                .with_context("found", format!("{}x{}", other.num_bits, other.num_hashes)));
        }

        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other_word;
        }
        self.num_inserts += other.num_inserts;

        self.recount_bits_set();
        Ok(())
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no keys inserted).
    pub fn is_empty(&self) -> bool {
        self.num_inserts == 0
    }

    /// Returns the total number of bits in the filter.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash rounds per key.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the number of insert operations performed.
    ///
    /// Re-inserting a key counts again; this is an operation count, not a
    /// distinct-key count.
    pub fn num_inserts(&self) -> u64 {
        self.num_inserts
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching saturation.
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// Based on the formula: `(1 - e^(-k*n/m))^k`
    /// where:
    /// - k = num_hashes
    /// - n = num_inserts
    /// - m = num_bits
    ///
    /// This is approximate and assumes uniform bit distribution.
    pub fn estimated_fpp(&self) -> f64 {
        let k = self.num_hashes as f64;
        let n = self.num_inserts as f64;
        let m = self.num_bits as f64;

        (1.0 - (-k * n / m).exp()).powf(k)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Derives the bit position for a key in the given hash round.
    fn bit_index(&self, key: &[u8], round: u16) -> u64 {
        hash64(key, u64::from(round)) % self.num_bits
    }

    /// Gets the value of a single bit.
    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index / 64) as usize;
        let bit_offset = bit_index % 64;
        let mask = 1u64 << bit_offset;
        (self.words[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index / 64) as usize;
        let bit_offset = bit_index % 64;
        let mask = 1u64 << bit_offset;

        if (self.words[word_index] & mask) == 0 {
            self.words[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }

    /// Recounts all set bits (used after merging).
    fn recount_bits_set(&mut self) {
        self.num_bits_set = self.words.iter().map(|word| word.count_ones() as u64).sum();
    }
}

// ============================================================================
// Tests
// ============================================================================
