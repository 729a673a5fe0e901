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

use eyre::eyre;
use eyre::WrapErr as _;
use serde::Deserialize;
use serde::Serialize;

use safe_msr::CpuSignature;

use super::defaults::default_log_level;
use super::defaults::default_msr_root;
use crate::*;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedSMSRConfig {
    #[serde(default)]
    pub device: UnresolvedDevice,
    #[serde(default)]
    pub whitelist: UnresolvedWhitelist,
    #[serde(default)]
    pub logs: UnresolvedLogs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedDevice {
    #[serde(default = "default_msr_root")]
    pub msr_root: std::path::PathBuf,
}

impl Default for UnresolvedDevice {
    fn default() -> Self {
        Self {
            msr_root: default_msr_root(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedWhitelist {
    pub cpu_signature: Option<String>,
    pub table_path: Option<std::path::PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedLogs {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for UnresolvedLogs {
    fn default() -> Self {
        UnresolvedLogs {
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl UnresolvedSMSRConfig {
    pub fn resolve(self, config_path: impl AsRef<Path>) -> eyre::Result<SMSRConfig> {
        let config_dir = config_path.as_ref().parent().ok_or_else(|| {
            eyre!(
                "config resolver was provided with invalid config path: {}",
                config_path.as_ref().display()
            )
        })?;

        self.resolve_in(config_dir)
    }

    /// Resolves relative paths against `config_dir`.
    pub fn resolve_in(self, config_dir: &Path) -> eyre::Result<SMSRConfig> {
        let config = SMSRConfig {
            device: self.device.resolve(),
            whitelist: self.whitelist.resolve(config_dir)?,
            logs: self.logs.resolve(),
        };
        Ok(config)
    }
}

impl UnresolvedDevice {
    pub fn resolve(self) -> Device {
        Device {
            msr_root: self.msr_root,
        }
    }
}

impl UnresolvedWhitelist {
    pub fn resolve(self, config_dir: &Path) -> eyre::Result<Whitelist> {
        let cpu_signature = self
            .cpu_signature
            .map(|signature| {
                signature
                    .parse::<CpuSignature>()
                    .wrap_err("whitelist.cpu-signature is malformed")
            })
            .transpose()?;
        let table_path = self.table_path.map(|path| config_dir.join(path));

        Ok(Whitelist {
            cpu_signature,
            table_path,
        })
    }
}

impl LogLevel {
    pub fn to_tracing_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;

        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl UnresolvedLogs {
    pub fn resolve(self) -> Logs {
        Logs {
            log_level: self.log_level.to_tracing_filter(),
        }
    }
}
