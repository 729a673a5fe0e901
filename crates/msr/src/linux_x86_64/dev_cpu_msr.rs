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

use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

use crate::MSRError;
use crate::MSRResult;
use crate::MsrDevice;

const MSR_VALUE_SIZE: usize = std::mem::size_of::<u64>();

enum MSRFileOpMode {
    MSRRead,
    MSRWrite,
}

/// Accesses registers through the Linux msr driver: the register index is
/// the offset into `<msr_root>/<core>/msr`.
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

    fn msr_path(&self, core_id: LogicalCoreId) -> PathBuf {
        self.msr_root.join(core_id.to_string()).join("msr")
    }

    fn open_msr(&self, core_id: LogicalCoreId, mode: MSRFileOpMode) -> io::Result<File> {
        use std::fs::OpenOptions;

        let path = self.msr_path(core_id);
        match mode {
            MSRFileOpMode::MSRRead => OpenOptions::new().read(true).open(path),
            MSRFileOpMode::MSRWrite => OpenOptions::new().write(true).open(path),
        }
    }
}

impl Default for DevCpuMsr {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MSR_ROOT)
    }
}

impl MsrDevice for DevCpuMsr {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        use nix::sys::uio::pread;

        let file = self
            .open_msr(core_id, MSRFileOpMode::MSRRead)
            .map_err(|error| MSRError::open_for_read(self.msr_path(core_id), core_id, error))?;

        let mut value = [0u8; MSR_VALUE_SIZE];
        let transferred = pread(&file, &mut value, i64::from(register_id))
            .map_err(|errno| MSRError::read_w_no_err(register_id, core_id, errno))?;
        if transferred != MSR_VALUE_SIZE {
            return Err(MSRError::short_transfer(register_id, core_id, transferred));
        }
        let result = u64::from_le_bytes(value);

        tracing::debug!("Read MSR register_id {register_id:#X} value {result:#X} at core id {core_id}");

        Ok(result)
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        use nix::sys::uio::pwrite;

        let file = self
            .open_msr(core_id, MSRFileOpMode::MSRWrite)
            .map_err(|error| MSRError::open_for_write(self.msr_path(core_id), core_id, error))?;

        let value_as_bytes = value.to_le_bytes();
        let transferred = pwrite(&file, &value_as_bytes, i64::from(register_id))
            .map_err(|errno| MSRError::write_w_no_err(value, register_id, core_id, errno))?;
        if transferred != MSR_VALUE_SIZE {
            return Err(MSRError::short_transfer(register_id, core_id, transferred));
        }

        tracing::debug!(
            "Write MSR register_id {register_id:#X} value {value:#X} at core id {core_id}"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use test_log::test;

    use super::*;

    fn msr_tree(cores: u32) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for core in 0..cores {
            let core_dir = root.path().join(core.to_string());
            fs::create_dir(&core_dir).unwrap();
            fs::write(core_dir.join("msr"), []).unwrap();
        }
        root
    }

    #[test]
    fn msr_files_live_under_the_root() {
        assert_eq!(DevCpuMsr::default().msr_root(), Path::new("/dev/cpu"));

        let root = msr_tree(1);
        let device = DevCpuMsr::new(root.path());
        assert_eq!(device.msr_root(), root.path());
        assert_eq!(
            device.msr_path(LogicalCoreId::new(3)),
            root.path().join("3").join("msr")
        );
    }

    #[test]
    fn value_is_written_at_register_offset() {
        let root = msr_tree(1);
        let device = DevCpuMsr::new(root.path());
        let core_id = LogicalCoreId::new(0);

        device.write_msr(0x1A0, 0x0000_0040_0001_0000, core_id).unwrap();

        let raw = fs::read(root.path().join("0").join("msr")).unwrap();
        assert_eq!(raw.len(), 0x1A0 + 8);
        assert_eq!(&raw[0x1A0..], &0x0000_0040_0001_0000u64.to_le_bytes());
        assert_eq!(device.read_msr(0x1A0, core_id).unwrap(), 0x0000_0040_0001_0000);
    }

    #[test]
    fn cores_are_separate_files() {
        let root = msr_tree(2);
        let device = DevCpuMsr::new(root.path());

        device.write_msr(0x10, 1, LogicalCoreId::new(0)).unwrap();
        device.write_msr(0x10, 2, LogicalCoreId::new(1)).unwrap();

        assert_eq!(device.read_msr(0x10, LogicalCoreId::new(0)).unwrap(), 1);
        assert_eq!(device.read_msr(0x10, LogicalCoreId::new(1)).unwrap(), 2);
    }

    #[test]
    fn missing_core_fails_to_open() {
        let root = msr_tree(1);
        let device = DevCpuMsr::new(root.path());

        let result = device.read_msr(0x10, LogicalCoreId::new(7));
        assert!(matches!(result, Err(MSRError::OpenForRead { .. })));

        let result = device.write_msr(0x10, 0, LogicalCoreId::new(7));
        assert!(matches!(result, Err(MSRError::OpenForWrite { .. })));
    }

    #[test]
    fn reading_past_the_end_is_a_short_transfer() {
        let root = msr_tree(1);
        let device = DevCpuMsr::new(root.path());

        let result = device.read_msr(0x610, LogicalCoreId::new(0));
        assert!(matches!(
            result,
            Err(MSRError::ShortTransfer { transferred: 0, .. })
        ));
    }
}
