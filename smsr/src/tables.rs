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

//! Built-in whitelists and the selection of the one matching the running processor.

mod sandy_bridge_ep;

pub use sandy_bridge_ep::sandy_bridge_ep;
pub use sandy_bridge_ep::SandyBridgeEp;

use smsr_msr::CpuSignature;

use crate::SelectionError;
use crate::TableSpec;

pub fn builtin_tables() -> Vec<TableSpec> {
    vec![sandy_bridge_ep()]
}

/// Picks the built-in whitelist written for `signature`.
pub fn select(signature: &CpuSignature) -> Result<TableSpec, SelectionError> {
    let spec = builtin_tables()
        .into_iter()
        .find(|spec| spec.supports(signature))
        .ok_or(SelectionError::UnsupportedCpu {
            signature: *signature,
        })?;

    tracing::debug!("MSR whitelist '{}' selected for CPU {signature}", spec.name);
    Ok(spec)
}

/// Picks the built-in whitelist for the processor the process runs on.
pub fn select_detected() -> Result<TableSpec, SelectionError> {
    let signature = CpuSignature::detect().ok_or(SelectionError::SignatureUnknown)?;
    select(&signature)
}

#[cfg(test)]
mod tests {
    use smsr_msr::CpuVendor;

    use super::*;

    #[test]
    fn sandy_bridge_ep_is_selected_by_its_signature() {
        let spec = select(&CpuSignature::intel(0x06, 0x2D)).unwrap();
        assert_eq!(spec, sandy_bridge_ep());
    }

    #[test]
    fn unknown_processors_have_no_whitelist() {
        let signature = CpuSignature::intel(0x06, 0x55);
        assert_eq!(
            select(&signature),
            Err(SelectionError::UnsupportedCpu { signature })
        );

        let signature = CpuSignature::new(CpuVendor::Amd, 0x06, 0x2D);
        assert!(select(&signature).is_err());
    }
}
