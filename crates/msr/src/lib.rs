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

//! This crate is the raw MSR access layer: it reads and writes whole registers
//! without any policy. On Linux x86_64 it goes through the msr driver device
//! files, everything else gets an implementation that refuses every access.

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

#[cfg(all(target_arch = "x86_64", target_os = "linux"))]
#[path = "linux_x86_64/mod.rs"]
mod msr_impl;
#[cfg(not(all(target_arch = "x86_64", target_os = "linux")))]
#[path = "other/mod.rs"]
mod msr_impl;

mod cpu_signature;
mod errors;

use std::sync::Arc;

use smsr_shared::types::LogicalCoreId;
use smsr_shared::types::RegisterId;

pub use cpu_signature::CpuSignature;
pub use cpu_signature::CpuSignatureParseError;
pub use cpu_signature::CpuVendor;
pub use errors::MSRError;
pub use msr_impl::DevCpuMsr;

pub type MSRResult<T> = Result<T, MSRError>;

/// The raw register primitive. Implementations don't know anything about
/// write masks, they transfer the whole 64-bit value as is.
pub trait MsrDevice: Send + Sync {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64>;

    fn write_msr(&self, register_id: RegisterId, value: u64, core_id: LogicalCoreId)
        -> MSRResult<()>;
}

impl<T: MsrDevice + ?Sized> MsrDevice for &T {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        (**self).read_msr(register_id, core_id)
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        (**self).write_msr(register_id, value, core_id)
    }
}

impl<T: MsrDevice + ?Sized> MsrDevice for Arc<T> {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        (**self).read_msr(register_id, core_id)
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        (**self).write_msr(register_id, value, core_id)
    }
}

impl<T: MsrDevice + ?Sized> MsrDevice for Box<T> {
    fn read_msr(&self, register_id: RegisterId, core_id: LogicalCoreId) -> MSRResult<u64> {
        (**self).read_msr(register_id, core_id)
    }

    fn write_msr(
        &self,
        register_id: RegisterId,
        value: u64,
        core_id: LogicalCoreId,
    ) -> MSRResult<()> {
        (**self).write_msr(register_id, value, core_id)
    }
}
