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

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use thiserror::Error as ThisError;

/// Signature of the running CPU is detected only once.
static DETECTED_CPU_SIGNATURE: Lazy<Option<CpuSignature>> =
    Lazy::new(crate::msr_impl::detect_cpu_signature);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CpuVendor {
    Intel,
    Amd,
    Other,
}

/// Display family and model of a processor, e.g. 06_2D for Sandy Bridge EP.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CpuSignature {
    vendor: CpuVendor,
    family: u8,
    model: u8,
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum CpuSignatureParseError {
    #[error("CPU signature '{0}' should look like 06_2D or 'AuthenticAMD 19_61'")]
    InvalidFormat(String),

    #[error("CPU signature '{signature}' contains an invalid hex number: {part}")]
    InvalidNumber { signature: String, part: String },
}

impl CpuVendor {
    pub fn from_vendor_string(vendor: &str) -> Self {
        match vendor {
            "GenuineIntel" => CpuVendor::Intel,
            "AuthenticAMD" => CpuVendor::Amd,
            _ => CpuVendor::Other,
        }
    }

    pub fn as_vendor_string(&self) -> &'static str {
        match self {
            CpuVendor::Intel => "GenuineIntel",
            CpuVendor::Amd => "AuthenticAMD",
            CpuVendor::Other => "Unknown",
        }
    }
}

impl CpuSignature {
    pub const fn new(vendor: CpuVendor, family: u8, model: u8) -> Self {
        Self {
            vendor,
            family,
            model,
        }
    }

    pub const fn intel(family: u8, model: u8) -> Self {
        Self::new(CpuVendor::Intel, family, model)
    }

    /// Returns the signature of the CPU the process is running on,
    /// None if it can't be obtained on this platform.
    pub fn detect() -> Option<Self> {
        *DETECTED_CPU_SIGNATURE
    }

    pub fn vendor(&self) -> CpuVendor {
        self.vendor
    }

    pub fn family(&self) -> u8 {
        self.family
    }

    pub fn model(&self) -> u8 {
        self.model
    }
}

impl fmt::Display for CpuSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vendor {
            CpuVendor::Intel => write!(f, "{:02X}_{:02X}", self.family, self.model),
            vendor => write!(
                f,
                "{} {:02X}_{:02X}",
                vendor.as_vendor_string(),
                self.family,
                self.model
            ),
        }
    }
}

impl FromStr for CpuSignature {
    type Err = CpuSignatureParseError;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        let invalid_format = || CpuSignatureParseError::InvalidFormat(signature.to_string());

        let mut parts = signature.split_whitespace();
        let (vendor, family_model) = match (parts.next(), parts.next(), parts.next()) {
            (Some(family_model), None, None) => (CpuVendor::Intel, family_model),
            (Some(vendor), Some(family_model), None) => {
                (CpuVendor::from_vendor_string(vendor), family_model)
            }
            _ => return Err(invalid_format()),
        };

        let (family, model) = family_model.split_once('_').ok_or_else(invalid_format)?;
        let parse_part = |part: &str| {
            u8::from_str_radix(part, 16).map_err(|_| CpuSignatureParseError::InvalidNumber {
                signature: signature.to_string(),
                part: part.to_string(),
            })
        };

        Ok(Self::new(vendor, parse_part(family)?, parse_part(model)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intel_signature_round_trips_through_text() {
        let signature: CpuSignature = "06_2D".parse().unwrap();

        assert_eq!(signature, CpuSignature::intel(0x06, 0x2D));
        assert_eq!(signature.to_string(), "06_2D");
    }

    #[test]
    fn vendor_prefix_is_honoured() {
        let signature: CpuSignature = "AuthenticAMD 19_61".parse().unwrap();

        assert_eq!(signature.vendor(), CpuVendor::Amd);
        assert_eq!(signature.family(), 0x19);
        assert_eq!(signature.model(), 0x61);
        assert_eq!(signature.to_string(), "AuthenticAMD 19_61");
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        assert_eq!(
            "062D".parse::<CpuSignature>(),
            Err(CpuSignatureParseError::InvalidFormat("062D".to_string()))
        );
        assert!(matches!(
            "06_XZ".parse::<CpuSignature>(),
            Err(CpuSignatureParseError::InvalidNumber { .. })
        ));
        assert!("GenuineIntel 06_2D extra".parse::<CpuSignature>().is_err());
    }
}
