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

//! Count-min sketch implementation for frequency estimation.
//!
//! The count-min sketch provides approximate frequency counts for streaming
//! data with configurable relative error and confidence bounds. Estimates
//! never undercount: the reported frequency is at least the true cumulative
//! count, and with high probability overcounts by no more than a fraction of
//! the total stream weight.
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(256, 5).unwrap();
//!
//! sketch.update("apple");
//! sketch.add("banana", 3);
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//! assert_eq!(sketch.total_count(), 4);
//! ```
//!
//! # Sizing From Error Bounds
//!
//! The table dimensions follow from a target additive error `epsilon` (as a
//! fraction of total count) and failure probability `delta`:
//!
//! ```rust
//! use streamsketch::countmin::CountMinSketch;
//!
//! // Overestimate below 1% of the total count with 99% confidence
//! let sketch = CountMinSketch::with_error_bounds(0.01, 0.01).unwrap();
//! assert_eq!(sketch.width(), 272); // ceil(e / 0.01)
//! assert_eq!(sketch.depth(), 5);   // ceil(ln(1 / 0.01))
//! ```

mod sketch;
pub use self::sketch::CountMinSketch;
