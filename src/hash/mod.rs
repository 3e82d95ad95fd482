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

//! Round-salted 64-bit hashing shared by the membership and frequency
//! sketches.
//!
//! Both sketches need a family of hash functions indexed by a round
//! number. Rather than keeping per-round seeds, the round is folded into
//! the hashed message itself: round `r` hashes the 8-byte little-endian
//! encoding of `r` followed by the raw key bytes, in one murmur3 x64_128
//! computation. Equal keys collide within a round and decorrelate across
//! rounds.

use std::hash::Hasher;

use byteorder::ByteOrder;
use byteorder::LE;

const HASH_SEED: u32 = 0;

/// Hash `key` for the given round, returning the low 64 bits of the
/// murmur3 x64_128 digest of the round prefix followed by the key.
pub(crate) fn hash64(key: &[u8], round: u64) -> u64 {
    let mut prefix = [0u8; 8];
    LE::write_u64(&mut prefix, round);

    let mut hasher = mur3::Hasher128::with_seed(HASH_SEED);
    hasher.write(&prefix);
    hasher.write(key);
    let (lo, _) = hasher.finish128();
    lo
}
