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

#![no_main]
#![forbid(unsafe_code)]

use amunchain_incentive::core::incentive::genesis::export_genesis;
use amunchain_incentive::core::incentive::{query::Querier, store};
use amunchain_incentive::core::incentive::keepers::{MemoryCollateral, StaticOracle};
use amunchain_incentive::core::state::batch::MemoryKv;
use amunchain_incentive::core::state::persistent_state::KvOp;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
    denom: String,
}

fuzz_target!(|inp: Input| {
    let mut kv = MemoryKv::new();
    kv.apply(
        inp.pairs
            .into_iter()
            .map(|(key, value)| KvOp::Put { key, value })
            .collect(),
    );

    // corrupted state must surface as errors, never panics
    let _ = export_genesis(&kv);
    let _ = store::get_all_trackers(&kv);
    let _ = store::get_all_unbondings(&kv);
    let collateral = MemoryCollateral::new();
    let oracle = StaticOracle::new();
    let q = Querier::new(&kv, &collateral, &oracle);
    let _ = q.current_rates(&inp.denom);
    let _ = q.total_bonded(None);
});
