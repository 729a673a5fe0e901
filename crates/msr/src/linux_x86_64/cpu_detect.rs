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

use raw_cpuid::CpuId;

use crate::CpuSignature;
use crate::CpuVendor;

pub(crate) fn detect_cpu_signature() -> Option<CpuSignature> {
    let cpuid = CpuId::new();

    let vendor = match cpuid.get_vendor_info() {
        Some(vendor_info) => CpuVendor::from_vendor_string(vendor_info.as_str()),
        None => return None,
    };

    let (family_id, model_id) = if let Some(cpu_info) = cpuid.get_feature_info() {
        (cpu_info.family_id(), cpu_info.model_id())
    } else {
        return None;
    };

    let signature = CpuSignature::new(vendor, family_id, model_id);
    tracing::debug!("Detected CPU signature {signature}.");

    Some(signature)
}
