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

use std::path::Path;

use config::Config;
use config::File;
use config::FileFormat;
use eyre::Context;
use serde::Deserialize;
use serde::Serialize;

use safe_msr::CpuSignature;
use safe_msr::DescriptorSpec;
use safe_msr::RegisterId;
use safe_msr::TableSpec;

/// A whitelist as it is written in a TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedTableSpec {
    pub name: String,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub documented_duplicates: Vec<RegisterId>,
    pub entries: Vec<DescriptorSpec>,
}

/// Loads a custom whitelist. The result still has to pass the consistency
/// check done when an engine is built over it.
pub fn load_table_spec(path: impl AsRef<Path>) -> eyre::Result<TableSpec> {
    let path = path.as_ref();
    let table_source = File::from(path).required(true).format(FileFormat::Toml);
    let table = Config::builder()
        .add_source(table_source)
        .build()
        .with_context(|| format!("Failed to load MSR whitelist from {}", path.display()))?;

    let table: UnresolvedTableSpec = table
        .try_deserialize()
        .with_context(|| format!("Failed to parse MSR whitelist at {}", path.display()))?;
    table.resolve()
}

impl UnresolvedTableSpec {
    pub fn resolve(self) -> eyre::Result<TableSpec> {
        let signatures = self
            .signatures
            .iter()
            .map(|signature| {
                signature.parse::<CpuSignature>().wrap_err_with(|| {
                    format!("whitelist '{}' has a malformed signature", self.name)
                })
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        tracing::debug!(
            "MSR whitelist '{}' loaded with {} entries",
            self.name,
            self.entries.len()
        );

        Ok(TableSpec {
            name: self.name,
            signatures,
            entries: self.entries,
            documented_duplicates: self.documented_duplicates,
        })
    }
}
