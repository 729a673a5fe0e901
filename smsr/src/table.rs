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

mod consistency;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use smsr_shared::types::RegisterId;

use crate::RegisterDescriptor;
use crate::RegisterRef;
use crate::TableError;
use crate::TableSpec;

/// Several whitelisted names share one address. The table keeps all of them
/// but lookups by address resolve to the first one in table order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlaggedDuplicate {
    pub address: RegisterId,
    pub names: Vec<String>,
}

/// The whitelist the engine works with. It is built once from a [`TableSpec`]
/// and never changes afterwards, so it can be shared between any number of
/// readers without synchronization.
#[derive(Clone, Debug)]
pub struct RegisterTable {
    name: String,
    descriptors: Vec<RegisterDescriptor>,
    by_name: HashMap<String, usize>,
    by_address: HashMap<RegisterId, usize>,
    flagged_duplicates: Vec<FlaggedDuplicate>,
}

impl RegisterTable {
    pub fn new(spec: &TableSpec) -> Result<Self, TableError> {
        let checked = consistency::check(spec)?;

        for duplicate in &checked.flagged_duplicates {
            tracing::warn!(
                "MSR whitelist '{}': registers {:?} share address {:#X}, lookups by address resolve to {}",
                spec.name,
                duplicate.names,
                duplicate.address,
                duplicate.names[0],
            );
        }

        let mut by_name = HashMap::new();
        let mut by_address = HashMap::new();
        for (position, descriptor) in checked.descriptors.iter().enumerate() {
            if descriptor.is_sentinel() {
                continue;
            }
            by_name.insert(descriptor.name().to_string(), position);
            by_address.entry(descriptor.address()).or_insert(position);
        }

        Ok(Self {
            name: spec.name.clone(),
            descriptors: checked.descriptors,
            by_name,
            by_address,
            flagged_duplicates: checked.flagged_duplicates,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn by_name(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.by_name
            .get(name)
            .map(|&position| &self.descriptors[position])
    }

    pub fn by_address(&self, address: RegisterId) -> Option<&RegisterDescriptor> {
        self.by_address
            .get(&address)
            .map(|&position| &self.descriptors[position])
    }

    pub fn resolve(&self, register: &RegisterRef) -> Option<&RegisterDescriptor> {
        match register {
            RegisterRef::Name(name) => self.by_name(name),
            RegisterRef::Address(address) => self.by_address(*address),
        }
    }

    /// Every entry in table order, sentinels included.
    pub fn descriptors(&self) -> &[RegisterDescriptor] {
        &self.descriptors
    }

    /// Addressable registers in table order.
    pub fn registers(&self) -> impl Iterator<Item = &RegisterDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| !descriptor.is_sentinel())
    }

    /// The "no such register" entry.
    pub fn not_found_sentinel(&self) -> &RegisterDescriptor {
        &self.descriptors[0]
    }

    /// The end of table entry.
    pub fn end_sentinel(&self) -> &RegisterDescriptor {
        &self.descriptors[self.descriptors.len() - 1]
    }

    /// Count of addressable registers.
    pub fn len(&self) -> usize {
        self.descriptors.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flagged_duplicates(&self) -> &[FlaggedDuplicate] {
        &self.flagged_duplicates
    }
}
