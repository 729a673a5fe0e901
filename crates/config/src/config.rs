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

use eyre::WrapErr as _;

use safe_msr::tables;
use safe_msr::CpuSignature;
use safe_msr::TableSpec;

use crate::defaults::default_log_level;
use crate::defaults::default_msr_root;
use crate::table_loader::load_table_spec;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SMSRConfig {
    pub device: Device,
    pub whitelist: Whitelist,
    pub logs: Logs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    /// Directory holding one `<core>/msr` device file per logical core.
    pub msr_root: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    /// Overrides the detected CPU signature when a built-in whitelist is chosen.
    pub cpu_signature: Option<CpuSignature>,
    /// A whitelist file used instead of the built-in ones.
    pub table_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Logs {
    pub log_level: tracing_subscriber::filter::LevelFilter,
}

impl Whitelist {
    /// Returns the whitelist to enforce: the configured file if there is one,
    /// otherwise the built-in table for the configured or detected CPU.
    pub fn table_spec(&self) -> eyre::Result<TableSpec> {
        if let Some(table_path) = &self.table_path {
            return load_table_spec(table_path);
        }

        let spec = match self.cpu_signature {
            Some(signature) => tables::select(&signature),
            None => tables::select_detected(),
        };
        spec.wrap_err("selecting a built-in MSR whitelist failed")
    }
}

impl Default for Device {
    fn default() -> Self {
        Self {
            msr_root: default_msr_root(),
        }
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_tracing_filter(),
        }
    }
}
