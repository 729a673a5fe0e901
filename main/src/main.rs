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

mod args;

use clap::Parser;
use eyre::WrapErr as _;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use safe_msr::LogicalCoreId;
use safe_msr::PolicyEngine;
use safe_msr::RegisterTable;
use smsr_config::load_config;
use smsr_config::load_env_config;
use smsr_msr::DevCpuMsr;

use crate::args::Args;
use crate::args::Command;

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = match &args.config_path {
        Some(config_path) => load_config(config_path.as_str())?,
        None => load_env_config()?,
    };

    let filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .with_default_directive(Directive::from(config.logs.log_level))
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("setting global tracing subscriber failed")?;
    tracing_log::LogTracer::init()?;

    let spec = config.whitelist.table_spec()?;
    if let Command::Check = args.command {
        let table = RegisterTable::new(&spec)
            .wrap_err_with(|| format!("MSR whitelist '{}' is inconsistent", spec.name))?;
        print_check(&table);
        return Ok(());
    }

    let device = DevCpuMsr::new(config.device.msr_root);
    tracing::info!("using MSR devices under {:?}", device.msr_root());
    let engine = PolicyEngine::initialize(&spec, device)
        .wrap_err_with(|| format!("MSR whitelist '{}' is inconsistent", spec.name))?;

    match args.command {
        Command::List => print_list(engine.table()),
        Command::Check => {}
        Command::Read { register, core } => {
            let value = engine.read(LogicalCoreId::new(core), register)?;
            println!("{value:#018X}");
        }
        Command::Write {
            register,
            value,
            core,
        } => {
            let committed = engine.write(LogicalCoreId::new(core), register, value)?;
            println!("{committed:#018X}");
        }
        Command::Update {
            register,
            value,
            bits,
            core,
        } => {
            let committed = engine.update(LogicalCoreId::new(core), register, value, bits)?;
            println!("{committed:#018X}");
        }
    }

    Ok(())
}

fn print_list(table: &RegisterTable) {
    println!("# {}", table.name());
    for descriptor in table.registers() {
        println!(
            "{:<32} {:#06X} {:#010X} {:#010X}",
            descriptor.name(),
            descriptor.address(),
            descriptor.write_mask_high(),
            descriptor.write_mask_low()
        );
    }
}

fn print_check(table: &RegisterTable) {
    println!(
        "MSR whitelist '{}' is consistent: {} registers",
        table.name(),
        table.len()
    );
    for duplicate in table.flagged_duplicates() {
        println!(
            "address {:#X} is shared by {}",
            duplicate.address,
            duplicate.names.join(", ")
        );
    }
}
