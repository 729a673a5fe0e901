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


use std::sync::Arc;

use smsr_msr::MsrDevice;
use smsr_shared::types::LogicalCoreId;

use crate::mask;
use crate::AccessError;
use crate::Operation;
use crate::RegisterDescriptor;
use crate::RegisterLocks;
use crate::RegisterRef;
use crate::RegisterTable;
use crate::TableError;
use crate::TableSpec;

pub type AccessResult<T> = Result<T, AccessError>;

/// Enforces a whitelist on top of a raw MSR device.
///
/// Reads are never masked. Writes are read-modify-write sequences that keep
/// every bit outside of the write mask at the value read from the hardware;
/// protected bits of a request are silently clamped, never rejected.
/// Conflicting writes to one register on one logical core are serialized.
#[derive(Debug)]
pub struct PolicyEngine<D> {
    table: Arc<RegisterTable>,
    device: D,
    locks: RegisterLocks,
}

impl<D: MsrDevice> PolicyEngine<D> {
    /// Builds the table from `spec` and an engine on top of it.
    pub fn initialize(spec: &TableSpec, device: D) -> Result<Self, TableError> {
        let table = RegisterTable::new(spec)?;
        tracing::info!(
            "MSR whitelist '{}' is loaded with {} registers",
            table.name(),
            table.len()
        );

        Ok(Self::new(Arc::new(table), device))
    }

    pub fn new(table: Arc<RegisterTable>, device: D) -> Self {
        Self {
            table,
            device,
            locks: RegisterLocks::new(),
        }
    }

    pub fn table(&self) -> &Arc<RegisterTable> {
        &self.table
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the raw value of a whitelisted register.
    pub fn read(
        &self,
        core_id: LogicalCoreId,
        register: impl Into<RegisterRef>,
    ) -> AccessResult<u64> {
        let descriptor = self.resolve(register.into())?;
        self.read_descriptor(core_id, descriptor)
    }

    /// Writes the bits of `value` allowed by the register write mask and
    /// returns the value committed to the register.
    pub fn write(
        &self,
        core_id: LogicalCoreId,
        register: impl Into<RegisterRef>,
        value: u64,
    ) -> AccessResult<u64> {
        let descriptor = self.resolve(register.into())?;
        self.masked_write(
            core_id,
            descriptor,
            value,
            descriptor.write_mask_low(),
            descriptor.write_mask_high(),
        )
    }

    /// Like [`Self::write`], but only the bits set in `bits` are taken from
    /// `value`, so callers owning different fields of one register don't
    /// overwrite each other.
    pub fn update(
        &self,
        core_id: LogicalCoreId,
        register: impl Into<RegisterRef>,
        value: u64,
        bits: u64,
    ) -> AccessResult<u64> {
        let descriptor = self.resolve(register.into())?;
        let (bits_low, bits_high) = mask::split_halves(bits);
        self.masked_write(
            core_id,
            descriptor,
            value,
            descriptor.write_mask_low() & bits_low,
            descriptor.write_mask_high() & bits_high,
        )
    }

    /// Reads every whitelisted register on one logical core. A failing
    /// register doesn't stop the others from being read.
    pub fn snapshot(
        &self,
        core_id: LogicalCoreId,
    ) -> Vec<(&RegisterDescriptor, AccessResult<u64>)> {
        self.table
            .registers()
            .map(|descriptor| (descriptor, self.read_descriptor(core_id, descriptor)))
            .collect()
    }

    fn resolve(&self, register: RegisterRef) -> AccessResult<&RegisterDescriptor> {
        match self.table.resolve(&register) {
            Some(descriptor) => Ok(descriptor),
            None => {
                tracing::debug!("Rejected access to register {register} outside of the whitelist");
                Err(AccessError::unsupported_register(register, self.table.name()))
            }
        }
    }

    fn read_descriptor(
        &self,
        core_id: LogicalCoreId,
        descriptor: &RegisterDescriptor,
    ) -> AccessResult<u64> {
        self.device
            .read_msr(descriptor.address(), core_id)
            .map_err(|error| {
                AccessError::hardware_access(Operation::Read, descriptor, core_id, error)
            })
    }

    fn masked_write(
        &self,
        core_id: LogicalCoreId,
        descriptor: &RegisterDescriptor,
        requested: u64,
        mask_low: u32,
        mask_high: u32,
    ) -> AccessResult<u64> {
        let address = descriptor.address();
        let slot = self.locks.slot(core_id, address);
        let _guard = slot.lock();

        let current = self.device.read_msr(address, core_id).map_err(|error| {
            AccessError::hardware_access(Operation::ReadForWrite, descriptor, core_id, error)
        })?;

        if mask_low == mask::NO_WRITE && mask_high == mask::NO_WRITE {
            tracing::debug!(
                "MSR {} has no writable bits, write of {requested:#X} at logical core {core_id} leaves {current:#X} untouched",
                descriptor.name()
            );
            return Ok(current);
        }

        let value_to_write = mask::masked_value(current, requested, mask_low, mask_high);
        tracing::debug!(
            "Write MSR {} ({address:#X}) requested {requested:#X} current {current:#X} committed {value_to_write:#X} at logical core {core_id}",
            descriptor.name()
        );

        self.device
            .write_msr(address, value_to_write, core_id)
            .map_err(|error| {
                AccessError::hardware_access(Operation::Write, descriptor, core_id, error)
            })?;

        Ok(value_to_write)
    }
}
