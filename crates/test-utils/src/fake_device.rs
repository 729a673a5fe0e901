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
use std::collections::HashSet;
use std::time::Duration;

use nix::errno::Errno;
use parking_lot::Mutex;

use smsr_msr::MSRError;
use smsr_msr::MSRResult;
use smsr_msr::MsrDevice;
use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WriteRecord {
    pub core_id: LogicalCoreId,
    pub register_id: RegisterId,
    pub value: u64,
}

/// In-memory register file. Registers that were never set read as zero.
#[derive(Debug, Default)]
pub struct FakeMsrDevice {
    registers: Mutex<HashMap<(LogicalCoreId, RegisterId), u64>>,
    failing_reads: Mutex<HashSet<RegisterId>>,
    failing_writes: Mutex<HashSet<RegisterId>>,
    writes: Mutex<Vec<WriteRecord>>,
    read_delay: Option<Duration>,
}

impl FakeMsrDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read sleeps for `delay`, which widens the window between the
    /// read and the write of a read-modify-write sequence.
    pub fn with_read_delay(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set(&self, core_id: LogicalCoreId, register_id: RegisterId, value: u64) {
        self.registers.lock().insert((core_id, register_id), value);
    }

    pub fn get(&self, core_id: LogicalCoreId, register_id: RegisterId) -> u64 {
        self.registers
            .lock()
            .get(&(core_id, register_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn fail_reads_of(&self, register_id: RegisterId) {
        self.failing_reads.lock().insert(register_id);
    }

    pub fn fail_writes_of(&self, register_id: RegisterId) {
        self.failing_writes.lock().insert(register_id);
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl MsrDevice for FakeMsrDevice {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        if self.failing_reads.lock().contains(&register_id) {
            return Err(MSRError::read_w_no_err(register_id, core_id, Errno::EIO));
        }

        let value = self.get(core_id, register_id);
        if let Some(delay) = self.read_delay {
            std::thread::sleep(delay);
        }

        Ok(value)
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        if self.failing_writes.lock().contains(&register_id) {
            return Err(MSRError::write_w_no_err(
                value,
                register_id,
                core_id,
                Errno::EIO,
            ));
        }

        self.set(core_id, register_id, value);
        self.writes.lock().push(WriteRecord {
            core_id,
            register_id,
            value,
        });

        Ok(())
    }
}
