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

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use smsr_shared::types::RegisterId;

/// How a caller names a register: by its symbolic name or by its raw address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegisterRef {
    Name(Cow<'static, str>),
    Address(RegisterId),
}

impl RegisterRef {
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }

    pub fn address(address: RegisterId) -> Self {
        Self::Address(address)
    }
}

impl fmt::Display for RegisterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterRef::Name(name) => write!(f, "{name}"),
            RegisterRef::Address(address) => write!(f, "{address:#X}"),
        }
    }
}

impl From<RegisterId> for RegisterRef {
    fn from(address: RegisterId) -> Self {
        Self::Address(address)
    }
}

impl From<&'static str> for RegisterRef {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for RegisterRef {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

/// `0x`-prefixed hex or plain decimal text is an address, anything else is a name.
impl FromStr for RegisterRef {
    type Err = Infallible;

    fn from_str(register: &str) -> Result<Self, Self::Err> {
        let register = register.trim();
        let address = match register
            .strip_prefix("0x")
            .or_else(|| register.strip_prefix("0X"))
        {
            Some(hex) => RegisterId::from_str_radix(hex, 16).ok(),
            None => register.parse::<RegisterId>().ok(),
        };

        Ok(match address {
            Some(address) => Self::Address(address),
            None => Self::Name(Cow::Owned(register.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_as_addresses() {
        assert_eq!("0x1A0".parse::<RegisterRef>(), Ok(RegisterRef::Address(0x1A0)));
        assert_eq!("0X610".parse::<RegisterRef>(), Ok(RegisterRef::Address(0x610)));
        assert_eq!("408".parse::<RegisterRef>(), Ok(RegisterRef::Address(408)));
    }

    #[test]
    fn everything_else_is_a_name() {
        assert_eq!("PMC0".parse::<RegisterRef>(), Ok(RegisterRef::name("PMC0")));
        assert_eq!(" MISC_ENABLE ".parse::<RegisterRef>(), Ok(RegisterRef::name("MISC_ENABLE")));
        assert_eq!("0xZZ".parse::<RegisterRef>(), Ok(RegisterRef::name("0xZZ")));
    }

    #[test]
    fn display_uses_hex_for_addresses() {
        assert_eq!(RegisterRef::Address(0x30A).to_string(), "0x30A");
        assert_eq!(RegisterRef::name("PERF_CTL").to_string(), "PERF_CTL");
    }
}
