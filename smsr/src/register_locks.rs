/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

type RegisterSlot = Arc<Mutex<()>>;

/// Exclusive locks keyed by (logical core, register address). A slot is
/// created the first time a register is written on a core and lives as long
/// as the engine does, the number of slots is bounded by cores times
/// whitelisted registers.
#[derive(Debug, Default)]
pub struct RegisterLocks {
    slots: Mutex<HashMap<(LogicalCoreId, RegisterId), RegisterSlot>>,
}

impl RegisterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `register_id` on `core_id`; the caller holds
    /// it for the whole read-modify-write sequence.
    pub fn slot(&self, core_id: LogicalCoreId, register_id: RegisterId) -> RegisterSlot {
        let mut slots = self.slots.lock();
        slots.entry((core_id, register_id)).or_default().clone()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
