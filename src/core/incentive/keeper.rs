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

//! Write handle of the incentive engine.
//!
//! A [`Keeper`] borrows one store (normally a [`StateBatch`] over committed
//! state) and the two collaborators it mutates. Its operations are split
//! across `bond`, `program`, `reward`, `handler` and `abci`.
//!
//! [`StateBatch`]: crate::core::state::batch::StateBatch

use crate::core::incentive::keepers::{AssetKeeper, CollateralKeeper};
use crate::core::state::batch::KvStore;

/// Mutable engine handle for one message or one block tick.
pub struct Keeper<'a, S: KvStore + ?Sized> {
    pub(crate) store: &'a mut S,
    pub(crate) assets: &'a mut dyn AssetKeeper,
    pub(crate) collateral: &'a mut dyn CollateralKeeper,
}

impl<'a, S: KvStore + ?Sized> Keeper<'a, S> {
    /// Borrow a store and collaborators.
    pub fn new(
        store: &'a mut S,
        assets: &'a mut dyn AssetKeeper,
        collateral: &'a mut dyn CollateralKeeper,
    ) -> Self {
        Self {
            store,
            assets,
            collateral,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &*self.store
    }
}
