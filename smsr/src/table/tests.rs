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

use maplit::hashmap;
use test_log::test;

use crate::tables::sandy_bridge_ep;
use crate::tables::SandyBridgeEp;
use crate::DescriptorKind;
use crate::DescriptorSpec;
use crate::FlaggedDuplicate;
use crate::MaskHalf;
use crate::RegisterRef;
use crate::RegisterTable;
use crate::SentinelPosition;
use crate::TableError;
use crate::TableSpec;

fn spec_with(entries: Vec<DescriptorSpec>, documented_duplicates: Vec<u32>) -> TableSpec {
    let mut all_entries = vec![DescriptorSpec::new("NO_SUCH_REGISTER", 0, 0, 0)];
    all_entries.extend(entries);
    all_entries.push(DescriptorSpec::new("LAST_ENTRY", 0, 0, 0));

    TableSpec {
        name: "test".to_string(),
        signatures: vec![],
        entries: all_entries,
        documented_duplicates,
    }
}

#[test]
fn builtin_table_is_consistent() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    assert_eq!(table.name(), "sandy-bridge-ep");
    assert_eq!(table.len(), 52);
    assert_eq!(table.descriptors().len(), 54);
}

#[test]
fn only_the_documented_address_is_shared() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    let mut names_by_address: HashMap<u32, Vec<&str>> = HashMap::new();
    for descriptor in table.registers() {
        names_by_address
            .entry(descriptor.address())
            .or_default()
            .push(descriptor.name());
    }
    names_by_address.retain(|_, names| names.len() > 1);

    assert_eq!(
        names_by_address,
        hashmap! { 0x30A => vec!["FIXED_CTR1", "FIXED_CTR2"] }
    );

    let expected = vec![FlaggedDuplicate {
        address: 0x30A,
        names: vec!["FIXED_CTR1".to_string(), "FIXED_CTR2".to_string()],
    }];
    assert_eq!(table.flagged_duplicates(), expected.as_slice());
}

#[test]
fn sentinels_are_in_the_table_but_not_reachable() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    let first = table.not_found_sentinel();
    assert_eq!(first.name(), "NO_SUCH_REGISTER");
    assert_eq!(first.kind(), DescriptorKind::NotFoundSentinel);
    assert!(first.is_sentinel());

    let last = table.end_sentinel();
    assert_eq!(last.name(), "LAST_ENTRY");
    assert_eq!(last.kind(), DescriptorKind::EndSentinel);
    assert!(last.is_sentinel());

    assert_eq!(table.by_name("NO_SUCH_REGISTER"), None);
    assert_eq!(table.by_name("LAST_ENTRY"), None);
    assert_eq!(table.by_address(0), None);
    assert!(table.registers().all(|descriptor| !descriptor.is_sentinel()));
}

#[test]
fn registers_are_found_by_name_and_address() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    let misc_enable = table.by_name("MISC_ENABLE").unwrap();
    assert_eq!(misc_enable.address(), 0x1A0);
    assert_eq!(misc_enable.write_mask_low(), 0x0001_0000);
    assert_eq!(misc_enable.write_mask_high(), 0x0000_0040);
    assert_eq!(misc_enable.write_mask(), 0x0000_0040_0001_0000);

    assert_eq!(table.by_address(0x199).unwrap().name(), "PERF_CTL");
    assert_eq!(
        table.resolve(&RegisterRef::address(0x610)).unwrap().name(),
        "PKG_POWER_LIMIT"
    );
    assert_eq!(
        table.resolve(&SandyBridgeEp::PEBS_LD_LAT.into()).unwrap().address(),
        0x3F6
    );

    // the shared address resolves to the first entry in table order
    assert_eq!(table.by_address(0x30A).unwrap().name(), "FIXED_CTR1");
    assert_eq!(table.by_name("FIXED_CTR2").unwrap().address(), 0x30A);

    assert_eq!(table.by_name("IA32_APIC_BASE"), None);
    assert_eq!(table.by_name("misc_enable"), None);
    assert_eq!(table.by_address(0x1B), None);
}

#[test]
fn register_enum_follows_table_order() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    assert_eq!(SandyBridgeEp::ALL.len(), table.descriptors().len());
    for (register, descriptor) in SandyBridgeEp::ALL.iter().zip(table.descriptors()) {
        assert_eq!(register.name(), descriptor.name());
        assert_eq!(register.address(), descriptor.address());
        assert_eq!(
            &table.descriptors()[register.index()],
            descriptor,
            "{register:?}"
        );
    }
}

#[test]
fn read_only_alias_marks_power_reporting_registers() {
    let table = RegisterTable::new(&sandy_bridge_ep()).unwrap();

    for name in ["RAPL_POWER_UNIT", "PKG_ENERGY_STATUS", "DRAM_POWER_INFO"] {
        assert!(table.by_name(name).unwrap().is_read_only(), "{name}");
    }
    for name in ["PKG_POWER_LIMIT", "PP0_POWER_LIMIT", "DRAM_POWER_LIMIT"] {
        assert!(table.by_name(name).unwrap().is_fully_writable(), "{name}");
    }
}

#[test]
fn undocumented_shared_address_is_rejected() {
    let spec = spec_with(
        vec![
            DescriptorSpec::new("PMC0", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
            DescriptorSpec::new("PMC1", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
        ],
        vec![],
    );

    assert_eq!(
        RegisterTable::new(&spec).unwrap_err(),
        TableError::DuplicateAddress {
            table: "test".to_string(),
            address: 0xC1,
            first: "PMC0".to_string(),
            second: "PMC1".to_string(),
        }
    );
}

#[test]
fn documented_shared_address_is_flagged() {
    let spec = spec_with(
        vec![
            DescriptorSpec::new("PMC0", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
            DescriptorSpec::new("PMC1", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
            DescriptorSpec::new("PMC2", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
        ],
        vec![0xC1],
    );

    let table = RegisterTable::new(&spec).unwrap();
    assert_eq!(
        table.flagged_duplicates(),
        &[FlaggedDuplicate {
            address: 0xC1,
            names: vec!["PMC0".to_string(), "PMC1".to_string(), "PMC2".to_string()],
        }]
    );
}

#[test]
fn masks_wider_than_32_bits_are_rejected() {
    let spec = spec_with(
        vec![DescriptorSpec::new("PERF_CTL", 0x199, 0x1_0000_0000, 0x1)],
        vec![],
    );
    assert_eq!(
        RegisterTable::new(&spec).unwrap_err(),
        TableError::MaskOutOfRange {
            table: "test".to_string(),
            name: "PERF_CTL".to_string(),
            half: MaskHalf::Low,
            mask: 0x1_0000_0000,
        }
    );

    let spec = spec_with(
        vec![DescriptorSpec::new("PERF_CTL", 0x199, 0x0, u64::MAX)],
        vec![],
    );
    assert!(matches!(
        RegisterTable::new(&spec),
        Err(TableError::MaskOutOfRange {
            half: MaskHalf::High,
            ..
        })
    ));
}

#[test]
fn names_must_be_unique() {
    let spec = spec_with(
        vec![
            DescriptorSpec::new("PMC0", 0xC1, 0xFFFF_FFFF, 0xFFFF_FFFF),
            DescriptorSpec::new("PMC0", 0xC2, 0xFFFF_FFFF, 0xFFFF_FFFF),
        ],
        vec![],
    );
    assert_eq!(
        RegisterTable::new(&spec).unwrap_err(),
        TableError::DuplicateName {
            table: "test".to_string(),
            name: "PMC0".to_string(),
        }
    );

    // a register can't take the name of a sentinel either
    let spec = spec_with(vec![DescriptorSpec::new("LAST_ENTRY", 0xC1, 0, 0)], vec![]);
    assert!(matches!(
        RegisterTable::new(&spec),
        Err(TableError::DuplicateName { .. })
    ));
}

#[test]
fn sentinels_must_be_empty() {
    let mut spec = spec_with(vec![DescriptorSpec::new("PMC0", 0xC1, 0, 0)], vec![]);
    spec.entries[0].address = 0x10;
    assert_eq!(
        RegisterTable::new(&spec).unwrap_err(),
        TableError::MalformedSentinel {
            table: "test".to_string(),
            name: "NO_SUCH_REGISTER".to_string(),
            position: SentinelPosition::First,
        }
    );

    let mut spec = spec_with(vec![DescriptorSpec::new("PMC0", 0xC1, 0, 0)], vec![]);
    spec.entries[2].write_mask_high = 0x1;
    assert!(matches!(
        RegisterTable::new(&spec),
        Err(TableError::MalformedSentinel {
            position: SentinelPosition::Last,
            ..
        })
    ));
}

#[test]
fn sentinels_are_required() {
    let spec = TableSpec {
        name: "test".to_string(),
        signatures: vec![],
        entries: vec![DescriptorSpec::new("NO_SUCH_REGISTER", 0, 0, 0)],
        documented_duplicates: vec![],
    };

    assert_eq!(
        RegisterTable::new(&spec).unwrap_err(),
        TableError::TooFewEntries {
            table: "test".to_string(),
            count: 1,
        }
    );
}

#[test]
fn table_with_only_sentinels_is_empty() {
    let table = RegisterTable::new(&spec_with(vec![], vec![])).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.registers().count(), 0);
}
