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

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error as ThisError;

use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

#[derive(ThisError, Debug)]
pub enum MSRError {
    #[error("opening MSR file {path:?} for read there is an error: {io_error:?}")]
    OpenForRead {
        path: PathBuf,
        core_id: LogicalCoreId,
        io_error: std::io::Error,
    },

    #[error("opening MSR file {path:?} for write there is an error: {io_error:?}")]
    OpenForWrite {
        path: PathBuf,
        core_id: LogicalCoreId,
        io_error: std::io::Error,
    },

    #[error(
        "reading from register_id {register_id:#X} at logical core {core_id} there is an error: {errno:?}"
    )]
    ReadWNoErr {
        register_id: RegisterId,
        core_id: LogicalCoreId,
        errno: Errno,
    },

    #[error(
        "writing value {value:#X} for register_id {register_id:#X} at logical core {core_id} there is an error: {errno:?}"
    )]
    WriteWNoErr {
        value: u64,
        register_id: RegisterId,
        core_id: LogicalCoreId,
        errno: Errno,
    },

    #[error(
        "only {transferred} of 8 bytes were transferred for register_id {register_id:#X} at logical core {core_id}"
    )]
    ShortTransfer {
        register_id: RegisterId,
        core_id: LogicalCoreId,
        transferred: usize,
    },

    #[error("MSR access to register_id {register_id:#X} at logical core {core_id} is not supported on this platform")]
    Unsupported {
        register_id: RegisterId,
        core_id: LogicalCoreId,
    },
}

impl MSRError {
    pub fn open_for_read(path: PathBuf, core_id: LogicalCoreId, io_error: std::io::Error) -> Self {
        Self::OpenForRead {
            path,
            core_id,
            io_error,
        }
    }

    pub fn open_for_write(path: PathBuf, core_id: LogicalCoreId, io_error: std::io::Error) -> Self {
        Self::OpenForWrite {
            path,
            core_id,
            io_error,
        }
    }

    pub fn read_w_no_err(register_id: RegisterId, core_id: LogicalCoreId, errno: Errno) -> Self {
        Self::ReadWNoErr {
            register_id,
            core_id,
            errno,
        }
    }

    pub fn write_w_no_err(
        value: u64,
        register_id: RegisterId,
        core_id: LogicalCoreId,
        errno: Errno,
    ) -> Self {
        Self::WriteWNoErr {
            value,
            register_id,
            core_id,
            errno,
        }
    }

    pub fn short_transfer(register_id: RegisterId, core_id: LogicalCoreId, transferred: usize) -> Self {
        Self::ShortTransfer {
            register_id,
            core_id,
            transferred,
        }
    }

    pub fn unsupported(register_id: RegisterId, core_id: LogicalCoreId) -> Self {
        Self::Unsupported {
            register_id,
            core_id,
        }
    }
}
