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

/// Count-min sketch for estimating key frequencies.
///
/// Counters are unsigned and saturate at `u64::MAX`, so estimates stay
/// monotonically non-decreasing under any update sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMinSketch {
    /// Counters per row
    width: u32,
    /// Number of rows, one hash round each
    depth: u16,
    /// Sum of all added counts
    total_count: u64,
    /// Row-major depth x width counter table
    counters: Box<[u64]>,
}

impl CountMinSketch {
    /// Creates a sketch with exact table dimensions.
    ///
    /// Sketches must share dimensions to be mergeable.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidDimension`](crate::error::ErrorKind::InvalidDimension)
    /// if `width` or `depth` is zero.
    pub fn new(width: u32, depth: u16) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::invalid_dimension("width must be greater than zero"));
        }
        if depth == 0 {
            return Err(Error::invalid_dimension("depth must be greater than zero"));
        }

        let entries = (u64::from(width) * u64::from(depth)) as usize;
        Ok(CountMinSketch {
            width,
            depth,
            total_count: 0,
            counters: vec![0u64; entries].into_boxed_slice(),
        })
    }

    /// Creates a sketch sized for the given error bounds.
    ///
    /// With width `ceil(e / epsilon)` and depth `ceil(ln(1 / delta))`, an
    /// estimate exceeds the true count by more than `epsilon * total_count`
    /// with probability at most `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidErrorBound`](crate::error::ErrorKind::InvalidErrorBound)
    /// if `epsilon` is not a positive finite number or `delta` is not in the
    /// open interval (0, 1).
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::countmin::CountMinSketch;
    /// let sketch = CountMinSketch::with_error_bounds(0.01, 0.01).unwrap();
    /// assert_eq!(sketch.width(), 272);
    /// assert_eq!(sketch.depth(), 5);
    /// ```
    pub fn with_error_bounds(epsilon: f64, delta: f64) -> Result<Self, Error> {
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(Error::invalid_error_bound("epsilon must be a positive finite number")
                .with_context("epsilon", epsilon));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::invalid_error_bound(
                "delta must lie in the open interval (0, 1)",
            )
            .with_context("delta", delta));
        }

        let width = (std::f64::consts::E / epsilon).ceil() as u32;
        let depth = (1.0 / delta).ln().ceil() as u16;
        Self::new(width, depth)
    }

    /// Adds `count` occurrences of the key.
    ///
    /// A zero count leaves the sketch untouched. Counters saturate rather
    /// than wrap at `u64::MAX`.
    pub fn add(&mut self, key: impl AsRef<[u8]>, count: u64) {
        if count == 0 {
            return;
        }
        let key = key.as_ref();
        self.total_count = self.total_count.saturating_add(count);
        for row in 0..self.depth {
            let index = self.counter_index(key, row);
            self.counters[index] = self.counters[index].saturating_add(count);
        }
    }

    /// Adds a single occurrence of the key.
    pub fn update(&mut self, key: impl AsRef<[u8]>) {
        self.add(key, 1);
    }

    /// Returns the estimated cumulative count of the key.
    ///
    /// The estimate is never below the true count added for the key; see
    /// [`with_error_bounds()`](Self::with_error_bounds) for the overestimate
    /// bound.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamsketch::countmin::CountMinSketch;
    /// let mut sketch = CountMinSketch::new(512, 6).unwrap();
    /// sketch.add("apple", 5);
    /// assert!(sketch.estimate("apple") >= 5);
    /// assert_eq!(sketch.estimate("grape"), 0);
    /// ```
    pub fn estimate(&self, key: impl AsRef<[u8]>) -> u64 {
        let key = key.as_ref();
        let mut min = u64::MAX;
        for row in 0..self.depth {
            let value = self.counters[self.counter_index(key, row)];
            if value < min {
                min = value;
            }
        }
        min
    }

    /// Merges another sketch into this one by summing counter tables.
    ///
    /// Afterwards every estimate reflects the counts added to either sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleDimensions`](crate::error::ErrorKind::IncompatibleDimensions)
    /// if the sketches differ in width or depth. The receiver is unchanged
    /// on error.
    pub fn merge(&mut self, other: &CountMinSketch) -> Result<(), Error> {
        if self.width != other.width || self.depth != other.depth {
            return Err(Error::incompatible_dimensions("counter table dimensions differ")
                .with_context("expected", format!("{}x{}", self.width, self.depth))
                .with_context("found", format!("{}x{}", other.width, other.depth)));
        }

        for (dst, src) in self.counters.iter_mut().zip(other.counters.iter()) {
            *dst = dst.saturating_add(*src);
        }
        self.total_count = self.total_count.saturating_add(other.total_count);
        Ok(())
    }

    /// Resets the sketch to its initial empty state, keeping dimensions.
    pub fn reset(&mut self) {
        for counter in &mut self.counters {
            *counter = 0;
        }
        self.total_count = 0;
    }

    /// Returns true if the sketch has not seen any counts.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns the number of counters per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Returns the sum of all added counts.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the relative error (epsilon) implied by the width.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    /// Returns the current absolute overestimate bound, rounded up.
    ///
    /// An estimate exceeds the true count by more than this with probability
    /// at most the `delta` the sketch was sized for.
    pub fn error_bound(&self) -> u64 {
        (self.relative_error() * self.total_count as f64).ceil() as u64
    }

    /// Derives the flat counter index for a key in the given row.
    fn counter_index(&self, key: &[u8], row: u16) -> usize {
        let column = hash64(key, u64::from(row)) % u64::from(self.width);
        row as usize * self.width as usize + column as usize
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn test_new() {
        let sketch = CountMinSketch::new(256, 5).unwrap();
        assert_eq!(sketch.width(), 256);
        assert_eq!(sketch.depth(), 5);
        assert!(sketch.is_empty());
        assert_eq!(sketch.total_count(), 0);
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let err = CountMinSketch::new(0, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);

        let err = CountMinSketch::new(256, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn test_with_error_bounds() {
        let sketch = CountMinSketch::with_error_bounds(0.001, 0.01).unwrap();
        assert_eq!(sketch.width(), 2719);
        assert_eq!(sketch.depth(), 5);
        assert!(sketch.relative_error() <= 0.001);
    }

    #[test]
    fn test_with_error_bounds_rejects_invalid_arguments() {
        for epsilon in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = CountMinSketch::with_error_bounds(epsilon, 0.01).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidErrorBound);
        }
        for delta in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = CountMinSketch::with_error_bounds(0.01, delta).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidErrorBound);
        }
    }

    #[test]
    fn test_add_and_estimate() {
        let mut sketch = CountMinSketch::new(256, 5).unwrap();

        sketch.add("apple", 5);
        sketch.add("banana", 3);
        sketch.update("banana");

        assert!(sketch.estimate("apple") >= 5);
        assert!(sketch.estimate("banana") >= 4);
        assert_eq!(sketch.total_count(), 9);
    }

    #[test]
    fn test_add_zero_count_is_noop() {
        let mut sketch = CountMinSketch::new(256, 5).unwrap();
        sketch.add("apple", 0);
        assert!(sketch.is_empty());
        assert_eq!(sketch, CountMinSketch::new(256, 5).unwrap());
    }

    #[test]
    fn test_unseen_key_estimates_zero_when_empty() {
        let sketch = CountMinSketch::new(256, 5).unwrap();
        assert_eq!(sketch.estimate("apple"), 0);
    }

    #[test]
    fn test_counters_saturate() {
        let mut sketch = CountMinSketch::new(8, 2).unwrap();
        sketch.add("apple", u64::MAX);
        sketch.add("apple", u64::MAX);
        assert_eq!(sketch.estimate("apple"), u64::MAX);
        assert_eq!(sketch.total_count(), u64::MAX);
    }

    #[test]
    fn test_merge() {
        let mut left = CountMinSketch::new(256, 5).unwrap();
        let mut right = CountMinSketch::new(256, 5).unwrap();

        left.add("apple", 2);
        left.add("banana", 4);
        right.add("apple", 3);
        right.add("orange", 5);

        left.merge(&right).unwrap();
        assert_eq!(left.total_count(), 14);
        assert!(left.estimate("apple") >= 5);
        assert!(left.estimate("banana") >= 4);
        assert!(left.estimate("orange") >= 5);
    }

    #[test]
    fn test_merge_incompatible_leaves_receiver_unchanged() {
        let mut sketch = CountMinSketch::new(256, 5).unwrap();
        sketch.add("apple", 2);
        let before = sketch.clone();

        let wider = CountMinSketch::new(512, 5).unwrap();
        let err = sketch.merge(&wider).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleDimensions);
        assert_eq!(sketch, before);

        let deeper = CountMinSketch::new(256, 6).unwrap();
        let err = sketch.merge(&deeper).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleDimensions);
        assert_eq!(sketch, before);
    }

    #[test]
    fn test_reset() {
        let mut sketch = CountMinSketch::new(256, 5).unwrap();
        sketch.add("apple", 7);

        sketch.reset();
        assert!(sketch.is_empty());
        assert_eq!(sketch.estimate("apple"), 0);
        assert_eq!(sketch, CountMinSketch::new(256, 5).unwrap());
    }

    #[test]
    fn test_error_bound_tracks_total_count() {
        let mut sketch = CountMinSketch::with_error_bounds(0.01, 0.01).unwrap();
        assert_eq!(sketch.error_bound(), 0);

        sketch.add("apple", 1000);
        let bound = sketch.error_bound();
        assert!(bound >= 1);
        assert!(bound as f64 >= sketch.relative_error() * 1000.0);
    }
}
