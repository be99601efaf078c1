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

use amunchain_incentive::core::incentive::genesis::{export_genesis, init_genesis, GenesisState};
use amunchain_incentive::core::state::batch::MemoryKv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(g) = serde_json::from_slice::<GenesisState>(data) else {
        return;
    };
    if g.validate().is_err() {
        return;
    }
    let mut kv = MemoryKv::new();
    if init_genesis(&mut kv, &g).is_ok() {
        let out = export_genesis(&kv).expect("export of imported genesis");
        assert!(out.validate().is_ok());
    }
});
