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

//! This module is an implementation that refuses MSR access to allow the code to compile on other platforms.

use std::path::Path;
use std::path::PathBuf;

use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

use crate::CpuSignature;
use crate::MSRError;
use crate::MSRResult;
use crate::MsrDevice;

pub(crate) fn detect_cpu_signature() -> Option<CpuSignature> {
    None
}

#[derive(Clone, Debug)]
pub struct DevCpuMsr {
    msr_root: PathBuf,
}

impl DevCpuMsr {
    pub const DEFAULT_MSR_ROOT: &'static str = "/dev/cpu";

    pub fn new(msr_root: impl Into<PathBuf>) -> Self {
        Self {
            msr_root: msr_root.into(),
        }
    }

    pub fn msr_root(&self) -> &Path {
        &self.msr_root
    }
}

impl Default for DevCpuMsr {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MSR_ROOT)
    }
}

impl MsrDevice for DevCpuMsr {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        Err(MSRError::unsupported(register_id, core_id))
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        _value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        Err(MSRError::unsupported(register_id, core_id))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn every_access_is_refused() {
        let device = DevCpuMsr::default();
        let core_id = LogicalCoreId::new(0);

        assert_eq!(device.msr_root(), Path::new(DevCpuMsr::DEFAULT_MSR_ROOT));
        assert!(matches!(
            device.read_msr(0x10, core_id),
            Err(MSRError::Unsupported { .. })
        ));
        assert!(matches!(
            device.write_msr(0x10, 0, core_id),
            Err(MSRError::Unsupported { .. })
        ));
        assert_eq!(detect_cpu_signature(), None);
    }
}
