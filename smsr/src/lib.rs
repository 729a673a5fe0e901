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

//! Mediates access to a whitelisted set of model specific registers.
//!
//! Every register the caller can reach is described by a [`RegisterDescriptor`]
//! carrying its address and the bits a caller is allowed to change. Reads return
//! the whole register, writes go through a read-modify-write sequence that
//! reloads every protected bit with the value just read from the hardware.

mod descriptor;
mod engine;
mod errors;
pub mod mask;
mod register_locks;
mod register_ref;
mod table;
mod table_spec;
pub mod tables;

pub use descriptor::DescriptorKind;
pub use descriptor::RegisterDescriptor;
pub use engine::AccessResult;
pub use engine::PolicyEngine;
pub use errors::AccessError;
pub use errors::MaskHalf;
pub use errors::Operation;
pub use errors::SelectionError;
pub use errors::SentinelPosition;
pub use errors::TableError;
pub use register_locks::RegisterLocks;
pub use register_ref::RegisterRef;
pub use table::FlaggedDuplicate;
pub use table::RegisterTable;
pub use table_spec::DescriptorSpec;
pub use table_spec::TableSpec;

pub use smsr_msr::CpuSignature;
pub use smsr_msr::MSRError;
pub use smsr_msr::MsrDevice;
pub use smsr_shared::types::LogicalCoreId;
pub use smsr_shared::types::RegisterId;
