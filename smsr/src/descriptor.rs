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

use smsr_shared::types::RegisterId;

use crate::mask;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// The first table entry, stands for "no such register".
    NotFoundSentinel,
    /// A real, addressable register.
    Register,
    /// The last table entry, marks the end of the table.
    EndSentinel,
}

/// A validated table entry. Once built it never changes, there are no setters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterDescriptor {
    name: String,
    address: RegisterId,
    write_mask_low: u32,
    write_mask_high: u32,
    kind: DescriptorKind,
}

impl RegisterDescriptor {
    pub(crate) fn new(
        name: String,
        address: RegisterId,
        write_mask_low: u32,
        write_mask_high: u32,
        kind: DescriptorKind,
    ) -> Self {
        Self {
            name,
            address,
            write_mask_low,
            write_mask_high,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> RegisterId {
        self.address
    }

    pub fn write_mask_low(&self) -> u32 {
        self.write_mask_low
    }

    pub fn write_mask_high(&self) -> u32 {
        self.write_mask_high
    }

    pub fn write_mask(&self) -> u64 {
        mask::join_halves(self.write_mask_low, self.write_mask_high)
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind != DescriptorKind::Register
    }

    pub fn is_read_only(&self) -> bool {
        self.write_mask_low == mask::NO_WRITE && self.write_mask_high == mask::NO_WRITE
    }

    pub fn is_fully_writable(&self) -> bool {
        self.write_mask_low == mask::WRITE_ALL && self.write_mask_high == mask::WRITE_ALL
    }
}
