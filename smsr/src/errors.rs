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

use std::fmt;

use thiserror::Error as ThisError;

use smsr_msr::CpuSignature;
use smsr_msr::MSRError;
use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

use crate::RegisterDescriptor;
use crate::RegisterRef;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    /// The read that opens a read-modify-write sequence.
    ReadForWrite,
    Write,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SentinelPosition {
    First,
    Last,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaskHalf {
    Low,
    High,
}

/// A whitelist is malformed, no table is built from it.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("whitelist '{table}' has {count} entries, at least the two sentinels are required")]
    TooFewEntries { table: String, count: usize },

    #[error(
        "whitelist '{table}': {position} sentinel '{name}' must have a zero address and zero masks"
    )]
    MalformedSentinel {
        table: String,
        name: String,
        position: SentinelPosition,
    },

    #[error("whitelist '{table}': {half} write mask {mask:#X} of '{name}' doesn't fit into 32 bits")]
    MaskOutOfRange {
        table: String,
        name: String,
        half: MaskHalf,
        mask: u64,
    },

    #[error("whitelist '{table}': register name '{name}' is used more than once")]
    DuplicateName { table: String, name: String },

    #[error(
        "whitelist '{table}': registers '{first}' and '{second}' share address {address:#X}, which is not a documented duplicate"
    )]
    DuplicateAddress {
        table: String,
        address: RegisterId,
        first: String,
        second: String,
    },
}

#[derive(ThisError, Debug)]
pub enum AccessError {
    #[error("register {register} is not in the '{table}' whitelist")]
    UnsupportedRegister { register: RegisterRef, table: String },

    #[error(
        "{operation} of register {name} ({address:#X}) at logical core {core_id} failed: {source}"
    )]
    HardwareAccess {
        operation: Operation,
        name: String,
        address: RegisterId,
        core_id: LogicalCoreId,
        source: MSRError,
    },
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("CPU signature can't be detected on this platform")]
    SignatureUnknown,

    #[error("there is no built-in MSR whitelist for CPU {signature}")]
    UnsupportedCpu { signature: CpuSignature },
}

impl TableError {
    pub(crate) fn too_few_entries(table: &str, count: usize) -> Self {
        Self::TooFewEntries {
            table: table.to_string(),
            count,
        }
    }

    pub(crate) fn malformed_sentinel(table: &str, name: &str, position: SentinelPosition) -> Self {
        Self::MalformedSentinel {
            table: table.to_string(),
            name: name.to_string(),
            position,
        }
    }

    pub(crate) fn mask_out_of_range(table: &str, name: &str, half: MaskHalf, mask: u64) -> Self {
        Self::MaskOutOfRange {
            table: table.to_string(),
            name: name.to_string(),
            half,
            mask,
        }
    }

    pub(crate) fn duplicate_name(table: &str, name: &str) -> Self {
        Self::DuplicateName {
            table: table.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn duplicate_address(
        table: &str,
        address: RegisterId,
        first: &str,
        second: &str,
    ) -> Self {
        Self::DuplicateAddress {
            table: table.to_string(),
            address,
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl AccessError {
    pub(crate) fn unsupported_register(register: RegisterRef, table: &str) -> Self {
        Self::UnsupportedRegister {
            register,
            table: table.to_string(),
        }
    }

    pub(crate) fn hardware_access(
        operation: Operation,
        descriptor: &RegisterDescriptor,
        core_id: LogicalCoreId,
        source: MSRError,
    ) -> Self {
        Self::HardwareAccess {
            operation,
            name: descriptor.name().to_string(),
            address: descriptor.address(),
            core_id,
            source,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::ReadForWrite => write!(f, "read before write"),
            Operation::Write => write!(f, "write"),
        }
    }
}

impl fmt::Display for SentinelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentinelPosition::First => write!(f, "first"),
            SentinelPosition::Last => write!(f, "last"),
        }
    }
}

impl fmt::Display for MaskHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskHalf::Low => write!(f, "low"),
            MaskHalf::High => write!(f, "high"),
        }
    }
}
