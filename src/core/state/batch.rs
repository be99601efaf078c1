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

//! Write overlay over committed state.
//!
//! Every message and block tick runs against a [`StateBatch`]; the batch is
//! turned into one atomic [`KvOp`] list on success and simply dropped on
//! failure, so a failed operation never leaves partial writes.

use crate::core::state::persistent_state::{KvOp, StateError};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Read access to a sorted byte-keyed store.
pub trait KvRead {
    /// Get value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
    /// All pairs under `prefix`, ascending by key.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError>;
}

/// Read/write access to a sorted byte-keyed store.
pub trait KvStore: KvRead {
    /// Put value.
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>);
    /// Delete key (no-op if absent).
    fn delete(&mut self, key: &[u8]);
}

/// Buffered writes on top of a read-only base.
pub struct StateBatch<'a, B: KvRead + ?Sized> {
    base: &'a B,
    // None = tombstone
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, B: KvRead + ?Sized> StateBatch<'a, B> {
    /// Start an empty batch.
    pub fn new(base: &'a B) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Number of buffered writes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Buffered writes as an atomic op list, ascending by key.
    pub fn into_ops(self) -> Vec<KvOp> {
        self.pending
            .into_iter()
            .map(|(key, v)| match v {
                Some(value) => KvOp::Put { key, value },
                None => KvOp::Del { key },
            })
            .collect()
    }
}

impl<B: KvRead + ?Sized> KvRead for StateBatch<'_, B> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.pending.get(key) {
            Some(v) => Ok(v.clone()),
            None => self.base.get(key),
        }
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.scan_prefix(prefix)?.into_iter().collect();
        let range = self
            .pending
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix));
        for (k, v) in range {
            match v {
                Some(value) => {
                    merged.insert(k.clone(), value.clone());
                }
                None => {
                    merged.remove(k);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

impl<B: KvRead + ?Sized> KvStore for StateBatch<'_, B> {
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.pending.insert(key, Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }
}

/// Plain in-memory store, used where no sled handle is wanted (genesis checks, fuzzing).
#[derive(Clone, Debug, Default)]
pub struct MemoryKv(BTreeMap<Vec<u8>, Vec<u8>>);

impl MemoryKv {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an op list.
    pub fn apply(&mut self, ops: Vec<KvOp>) {
        for op in ops {
            match op {
                KvOp::Put { key, value } => {
                    self.0.insert(key, value);
                }
                KvOp::Del { key } => {
                    self.0.remove(&key);
                }
            }
        }
    }

    /// All pairs, ascending by key.
    pub fn pairs(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl KvRead for MemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.0.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        Ok(self
            .0
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl KvStore for MemoryKv {
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.0.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.0.remove(key);
    }
}
