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

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::Environment;
use config::File;
use config::FileFormat;
use config::Source;
use eyre::WrapErr as _;

use crate::unresolved_config::UnresolvedSMSRConfig;
use crate::SMSRConfig;

/// Loads the config file at `path` with `SMSR_` environment overrides on top.
pub fn load_config(path: &str) -> eyre::Result<SMSRConfig> {
    load_config_from(Some(path), &smsr_environment())
}

/// Built-in defaults with `SMSR_` environment overrides, for runs without a
/// config file. A relative `table-path` is taken from the working directory.
pub fn load_env_config() -> eyre::Result<SMSRConfig> {
    load_config_from(None, &smsr_environment())
}

/// Sections are separated by `__` and the remaining `_` stand for `-`, so
/// `device.msr-root` is set by `SMSR_DEVICE__MSR_ROOT`.
pub(crate) fn smsr_environment() -> Environment {
    Environment::with_prefix("SMSR")
        .prefix_separator("_")
        .separator("__")
}

pub(crate) fn load_config_from(
    path: Option<&str>,
    environment: &Environment,
) -> eyre::Result<SMSRConfig> {
    let origin = path.unwrap_or("SMSR_ environment");

    let mut builder = Config::builder();
    if let Some(path) = path {
        let config_source = File::with_name(path)
            .required(true)
            .format(FileFormat::Toml);
        builder = builder.add_source(config_source);
    }
    let config = with_env_overrides(builder, environment)?
        .build()
        .wrap_err_with(|| format!("Failed to load config from {origin}"))?;

    let config: UnresolvedSMSRConfig = config
        .try_deserialize()
        .wrap_err_with(|| format!("Failed to parse config from {origin}"))?;

    match path {
        Some(path) => config.resolve(path),
        None => config.resolve_in(Path::new(".")),
    }
}

fn with_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    environment: &Environment,
) -> eyre::Result<ConfigBuilder<DefaultState>> {
    let overrides = environment
        .collect()
        .wrap_err("Failed to read SMSR_ environment variables")?;

    for (key, value) in overrides {
        let key = key.to_lowercase().replace('_', "-");
        tracing::debug!("config key {key} is set from the environment");
        builder = builder
            .set_override(key.as_str(), value)
            .wrap_err_with(|| format!("Failed to apply environment override for {key}"))?;
    }

    Ok(builder)
}
