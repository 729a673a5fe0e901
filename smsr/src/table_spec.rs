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

use serde::Deserialize;
use serde::Serialize;

use smsr_msr::CpuSignature;
use smsr_shared::types::RegisterId;

/// One line of a whitelist as it is authored. Masks are kept wider than
/// 32 bits here so that an out of range constant is caught by the
/// consistency check instead of being truncated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptorSpec {
    pub name: String,
    pub address: RegisterId,
    pub write_mask_low: u64,
    pub write_mask_high: u64,
}

/// Declarative whitelist: an ordered list of entries that starts with the
/// "not found" sentinel and ends with the "end of table" sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    /// Processors this whitelist was written for.
    pub signatures: Vec<CpuSignature>,
    pub entries: Vec<DescriptorSpec>,
    /// Addresses known to be shared by several entries, they are accepted
    /// but reported by the consistency check.
    pub documented_duplicates: Vec<RegisterId>,
}

impl DescriptorSpec {
    pub fn new(
        name: impl Into<String>,
        address: RegisterId,
        write_mask_low: u64,
        write_mask_high: u64,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            write_mask_low,
            write_mask_high,
        }
    }
}

impl TableSpec {
    pub fn supports(&self, signature: &CpuSignature) -> bool {
        self.signatures.contains(signature)
    }
}

/// Generates a register enum and a function building its [`TableSpec`] from
/// a single ordered list, so the identifiers, the table and the indexes
/// built from it can't disagree.
macro_rules! whitelist_table {
    (
        $(#[$register_meta:meta])*
        pub enum $register:ident;

        $(#[$spec_meta:meta])*
        pub fn $spec:ident {
            name: $table_name:literal,
            signatures: [$($signature:expr),* $(,)?],
            documented_duplicates: [$($duplicate:expr),* $(,)?],
        }

        entries {
            $( $variant:ident => ($address:expr, $low:expr, $high:expr), )+
        }
    ) => {
        $(#[$register_meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        pub enum $register {
            $( $variant, )+
        }

        impl $register {
            /// Every entry in table order, sentinels included.
            pub const ALL: &'static [$register] = &[ $( $register::$variant, )+ ];

            /// Position of the entry in the table, sentinels included.
            pub const fn index(self) -> usize {
                self as usize
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $( $register::$variant => stringify!($variant), )+
                }
            }

            pub const fn address(self) -> $crate::RegisterId {
                match self {
                    $( $register::$variant => $address, )+
                }
            }

            /// Low and high write masks as authored.
            pub const fn write_masks(self) -> (u64, u64) {
                match self {
                    $( $register::$variant => ($low as u64, $high as u64), )+
                }
            }

            pub fn to_spec(self) -> $crate::DescriptorSpec {
                let (low, high) = self.write_masks();
                $crate::DescriptorSpec::new(self.name(), self.address(), low, high)
            }
        }

        impl From<$register> for $crate::RegisterRef {
            fn from(register: $register) -> Self {
                $crate::RegisterRef::Name(std::borrow::Cow::Borrowed(register.name()))
            }
        }

        $(#[$spec_meta])*
        pub fn $spec() -> $crate::TableSpec {
            $crate::TableSpec {
                name: $table_name.to_string(),
                signatures: vec![$($signature),*],
                entries: $register::ALL.iter().map(|register| register.to_spec()).collect(),
                documented_duplicates: vec![$($duplicate),*],
            }
        }
    };
}

pub(crate) use whitelist_table;
