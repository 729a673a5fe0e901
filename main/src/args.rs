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

use std::num::ParseIntError;

use clap::Parser;
use clap::Subcommand;

use safe_msr::RegisterRef;

#[derive(Parser, Debug)]
#[command(name = "smsr", about = "Whitelisted, write-masked MSR access")]
pub(crate) struct Args {
    /// TOML config; built-in defaults with `SMSR_` environment overrides are
    /// used when it is omitted.
    #[arg(short, long)]
    pub(crate) config_path: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the whitelist in force with the write mask of every register.
    List,
    /// Build the whitelist and report its consistency check.
    Check,
    /// Read a whitelisted register.
    Read {
        #[arg(value_parser = parse_register)]
        register: RegisterRef,
        #[arg(long, default_value_t = 0)]
        core: u32,
    },
    /// Write a whitelisted register, protected bits are kept.
    Write {
        #[arg(value_parser = parse_register)]
        register: RegisterRef,
        #[arg(value_parser = parse_value)]
        value: u64,
        #[arg(long, default_value_t = 0)]
        core: u32,
    },
    /// Write only the selected bits of a whitelisted register.
    Update {
        #[arg(value_parser = parse_register)]
        register: RegisterRef,
        #[arg(value_parser = parse_value)]
        value: u64,
        #[arg(value_parser = parse_value)]
        bits: u64,
        #[arg(long, default_value_t = 0)]
        core: u32,
    },
}

/// Register names are matched upper-cased, addresses are taken as is.
pub(crate) fn parse_register(register: &str) -> Result<RegisterRef, String> {
    match register.parse::<RegisterRef>() {
        Ok(RegisterRef::Name(name)) if name.is_empty() => Err("empty register name".to_string()),
        Ok(RegisterRef::Name(name)) => Ok(RegisterRef::name(name.to_ascii_uppercase())),
        Ok(address) => Ok(address),
        Err(never) => match never {},
    }
}

pub(crate) fn parse_value(value: &str) -> Result<u64, ParseIntError> {
    let value = value.trim().replace('_', "");
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use test_log::test;

    use super::*;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn values_accept_hex_and_decimal() {
        assert_eq!(parse_value("0x0000_0040_0000_0000"), Ok(0x40_0000_0000));
        assert_eq!(parse_value("0XFF"), Ok(0xFF));
        assert_eq!(parse_value("416"), Ok(416));
        assert!(parse_value("0x1_0000_0000_0000_0000").is_err());
        assert!(parse_value("turbo").is_err());
    }

    #[test]
    fn register_names_are_upper_cased() {
        assert_eq!(
            parse_register("ia32_misc_enable"),
            Ok(RegisterRef::name("IA32_MISC_ENABLE"))
        );
        assert_eq!(parse_register("0x1a0"), Ok(RegisterRef::address(0x1A0)));
        assert!(parse_register("  ").is_err());
    }

    #[test]
    fn update_takes_value_bits_and_core() {
        let args = Args::parse_from([
            "smsr",
            "update",
            "PERF_GLOBAL_CTRL",
            "0x1",
            "0xF",
            "--core",
            "3",
        ]);

        match args.command {
            Command::Update {
                register,
                value,
                bits,
                core,
            } => {
                assert_eq!(register, RegisterRef::name("PERF_GLOBAL_CTRL"));
                assert_eq!((value, bits, core), (0x1, 0xF, 3));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(args.config_path.is_none());
    }
}
