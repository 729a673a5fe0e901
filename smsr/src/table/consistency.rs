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

use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use smsr_shared::types::RegisterId;

use super::FlaggedDuplicate;
use crate::DescriptorKind;
use crate::DescriptorSpec;
use crate::MaskHalf;
use crate::RegisterDescriptor;
use crate::SentinelPosition;
use crate::TableError;
use crate::TableSpec;

pub(super) struct CheckedTable {
    pub(super) descriptors: Vec<RegisterDescriptor>,
    pub(super) flagged_duplicates: Vec<FlaggedDuplicate>,
}

/// Validates a whitelist and turns its entries into descriptors. It runs once
/// per table, never on the access path.
pub(super) fn check(spec: &TableSpec) -> Result<CheckedTable, TableError> {
    let table = spec.name.as_str();
    let entries = &spec.entries;
    if entries.len() < 2 {
        return Err(TableError::too_few_entries(table, entries.len()));
    }

    let last = entries.len() - 1;
    let mut descriptors = Vec::with_capacity(entries.len());
    let mut names = HashSet::with_capacity(entries.len());
    let mut addresses: HashMap<RegisterId, usize> = HashMap::new();
    let mut duplicates: BTreeMap<RegisterId, Vec<String>> = BTreeMap::new();

    for (position, entry) in entries.iter().enumerate() {
        let kind = match position {
            0 => DescriptorKind::NotFoundSentinel,
            position if position == last => DescriptorKind::EndSentinel,
            _ => DescriptorKind::Register,
        };

        let descriptor = check_entry(table, entry, kind)?;

        if !names.insert(entry.name.as_str()) {
            return Err(TableError::duplicate_name(table, &entry.name));
        }

        if kind == DescriptorKind::Register {
            match addresses.entry(entry.address) {
                Entry::Vacant(vacant) => {
                    vacant.insert(position);
                }
                Entry::Occupied(occupied) => {
                    let first = &entries[*occupied.get()].name;
                    if !spec.documented_duplicates.contains(&entry.address) {
                        return Err(TableError::duplicate_address(
                            table,
                            entry.address,
                            first,
                            &entry.name,
                        ));
                    }

                    duplicates
                        .entry(entry.address)
                        .or_insert_with(|| vec![first.clone()])
                        .push(entry.name.clone());
                }
            }
        }

        descriptors.push(descriptor);
    }

    for address in &spec.documented_duplicates {
        if !duplicates.contains_key(address) {
            tracing::warn!(
                "MSR whitelist '{table}': address {address:#X} is documented as shared, but only one register uses it"
            );
        }
    }

    let flagged_duplicates = duplicates
        .into_iter()
        .map(|(address, names)| FlaggedDuplicate { address, names })
        .collect();

    Ok(CheckedTable {
        descriptors,
        flagged_duplicates,
    })
}

fn check_entry(
    table: &str,
    entry: &DescriptorSpec,
    kind: DescriptorKind,
) -> Result<RegisterDescriptor, TableError> {
    let write_mask_low = u32::try_from(entry.write_mask_low).map_err(|_| {
        TableError::mask_out_of_range(table, &entry.name, MaskHalf::Low, entry.write_mask_low)
    })?;
    let write_mask_high = u32::try_from(entry.write_mask_high).map_err(|_| {
        TableError::mask_out_of_range(table, &entry.name, MaskHalf::High, entry.write_mask_high)
    })?;

    let sentinel_position = match kind {
        DescriptorKind::NotFoundSentinel => Some(SentinelPosition::First),
        DescriptorKind::EndSentinel => Some(SentinelPosition::Last),
        DescriptorKind::Register => None,
    };
    if let Some(position) = sentinel_position {
        if entry.address != 0 || write_mask_low != 0 || write_mask_high != 0 {
            return Err(TableError::malformed_sentinel(table, &entry.name, position));
        }
    }

    Ok(RegisterDescriptor::new(
        entry.name.clone(),
        entry.address,
        write_mask_low,
        write_mask_high,
        kind,
    ))
}
