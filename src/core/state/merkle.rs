// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! State commitment: a binary Merkle root over the sorted incentive key space.
//!
//! leaf = H( "Amunchain-Incentive-Leaf-v1" || H(key) || H(value) )
//! node = H( "Amunchain-Incentive-Node-v1" || left || right )
//!
//! An odd node at the end of a level is paired with itself.

use ring::digest;

/// Hash32 type.
pub type Hash32 = [u8; 32];

const LEAF_DOMAIN: &[u8] = b"Amunchain-Incentive-Leaf-v1";
const NODE_DOMAIN: &[u8] = b"Amunchain-Incentive-Node-v1";

fn sha256(parts: &[&[u8]]) -> Hash32 {
    let mut ctx = digest::Context::new(&digest::SHA256);
    for p in parts {
        ctx.update(p);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

fn leaf(key: &[u8], value: &[u8]) -> Hash32 {
    sha256(&[LEAF_DOMAIN, &sha256(&[key]), &sha256(&[value])])
}

fn node(left: &Hash32, right: &Hash32) -> Hash32 {
    sha256(&[NODE_DOMAIN, left, right])
}

/// Merkle root of (key, value) pairs that are already sorted by key.
/// The empty set commits to the zero hash.
pub fn merkle_root_sorted(pairs: &[(Vec<u8>, Vec<u8>)]) -> Hash32 {
    let mut level: Vec<Hash32> = pairs.iter().map(|(k, v)| leaf(k, v)).collect();
    if level.is_empty() {
        return [0u8; 32];
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [l, r] => node(l, r),
                [single] => node(single, single),
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }
    level[0]
}

/// Lowercase hex form of a root, as served by the query API.
pub fn root_hex(root: &Hash32) -> String {
    hex::encode(root)
}
