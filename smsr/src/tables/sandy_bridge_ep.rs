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

//! Whitelist for the Intel Xeon E5 family based on the Sandy Bridge
//! microarchitecture, family 06 model 2D.
//!
//! No register on this list is assumed to expose sensitive data, so reads
//! return the whole register. Mask bits are cleared for reserved, read-only,
//! read/write-but-read-only-by-policy and clear-only-but-read-only-by-policy
//! bits; they are set for read/write and clear-only bits.
//!
//! Notes per register (Intel SDM, September 2013, tables 35-2, 35-12, 35-14):
//! - TIME_STAMP_COUNTER, MPERF, APERF: writable by hardware, read-only by policy.
//! - PLATFORM_ID: bits 52:50 are the interesting ones.
//! - PMC0-7, FIXED_CTR0-2: no restricted bits. PMC4-7 are per core.
//! - PERFEVTSEL0-7: bits 63:32 reserved. Bit 17 enables ring 0 counting.
//! - PERF_STATUS: listed twice by the SDM, bits 15:0 are the current
//!   performance value and 47:32 the core voltage.
//! - PERF_CTL: only bit 32, turbo disengage, is writable.
//! - CLOCK_MODULATION: bits 4:0 are used, the extension bits stay untouched.
//! - THERM_INTERRUPT: bits 4:0 and 24:8.
//! - THERM_STATUS: the odd log bits 1-11 are clear-only, everything else is
//!   read-only or reserved.
//! - MISC_ENABLE: only Enhanced SpeedStep (bit 16) and Turbo Mode Disable (bit 38).
//! - OFFCORE_RSP_0/1: bits 37:15 and 11:0.
//! - ENERGY_PERF_BIAS: bits 3:0.
//! - PACKAGE_THERM_STATUS: log bits 1, 3, 5, 7, 9, 11.
//! - PACKAGE_THERM_INTERRUPT: bits 2:0 and 24:8, bit 4 (critical temperature
//!   interrupt) is left out.
//! - FIXED_CTR_CTRL: bits 1:0, 5:3, 9:7 and 11.
//! - PERF_GLOBAL_STATUS / OVF_CTRL: bits 1:0, 34:32 and 63:62.
//! - PERF_GLOBAL_CTRL: bits 1:0 and 34:32.
//! - PEBS_ENABLE: bits 3:0 and 35:32. PEBS_LD_LAT: bits 15:0.
//! - RAPL power limits are fully writable, energy/status/info are read-only.
//!
//! FIXED_CTR1 and FIXED_CTR2 are both listed at 0x30A. The architectural
//! address of FIXED_CTR2 is 0x30B, but the list is kept as written and the
//! shared address is reported by the consistency check.

use crate::mask::NO_WRITE;
use crate::mask::READ_ONLY;
use crate::mask::WRITE_ALL;
use crate::table_spec::whitelist_table;
use smsr_msr::CpuSignature;

whitelist_table! {
    /// Registers of the Sandy Bridge EP whitelist in table order.
    pub enum SandyBridgeEp;

    pub fn sandy_bridge_ep {
        name: "sandy-bridge-ep",
        signatures: [CpuSignature::intel(0x06, 0x2D)],
        documented_duplicates: [0x30A],
    }

    entries {
        NO_SUCH_REGISTER        => (0x000, NO_WRITE,    NO_WRITE),
        TIME_STAMP_COUNTER      => (0x010, NO_WRITE,    NO_WRITE),
        PLATFORM_ID             => (0x017, NO_WRITE,    NO_WRITE),
        PMC0                    => (0x0C1, WRITE_ALL,   WRITE_ALL),
        PMC1                    => (0x0C2, WRITE_ALL,   WRITE_ALL),
        PMC2                    => (0x0C3, WRITE_ALL,   WRITE_ALL),
        PMC3                    => (0x0C4, WRITE_ALL,   WRITE_ALL),
        PMC4                    => (0x0C5, WRITE_ALL,   WRITE_ALL),
        PMC5                    => (0x0C6, WRITE_ALL,   WRITE_ALL),
        PMC6                    => (0x0C7, WRITE_ALL,   WRITE_ALL),
        PMC7                    => (0x0C8, WRITE_ALL,   WRITE_ALL),
        MPERF                   => (0x0E7, NO_WRITE,    NO_WRITE),
        APERF                   => (0x0E8, NO_WRITE,    NO_WRITE),
        PERFEVTSEL0             => (0x186, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL1             => (0x187, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL2             => (0x188, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL3             => (0x189, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL4             => (0x18A, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL5             => (0x18B, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL6             => (0x18C, WRITE_ALL,   NO_WRITE),
        PERFEVTSEL7             => (0x18D, WRITE_ALL,   NO_WRITE),
        PERF_STATUS             => (0x198, NO_WRITE,    NO_WRITE),
        PERF_CTL                => (0x199, NO_WRITE,    0x0000_0001),
        CLOCK_MODULATION        => (0x19A, 0x0000_0007, NO_WRITE),
        THERM_INTERRUPT         => (0x19B, 0x01FF_FF0F, NO_WRITE),
        THERM_STATUS            => (0x19C, 0x0000_0AAA, NO_WRITE),
        MISC_ENABLE             => (0x1A0, 0x0001_0000, 0x0000_0040),
        OFFCORE_RSP_0           => (0x1A6, 0xFFFF_8FFF, 0x0000_003F),
        OFFCORE_RSP_1           => (0x1A7, 0xFFFF_8FFF, 0x0000_003F),
        ENERGY_PERF_BIAS        => (0x1B0, 0x0000_000F, NO_WRITE),
        PACKAGE_THERM_STATUS    => (0x1B1, 0x0000_0555, NO_WRITE),
        PACKAGE_THERM_INTERRUPT => (0x1B2, 0x01FF_FF07, NO_WRITE),
        FIXED_CTR0              => (0x309, WRITE_ALL,   WRITE_ALL),
        FIXED_CTR1              => (0x30A, WRITE_ALL,   WRITE_ALL),
        FIXED_CTR2              => (0x30A, WRITE_ALL,   WRITE_ALL),
        PERF_CAPABILITIES       => (0x345, NO_WRITE,    NO_WRITE),
        FIXED_CTR_CTRL          => (0x38D, 0x0000_0BBB, NO_WRITE),
        PERF_GLOBAL_STATUS      => (0x38E, 0x0000_0003, 0xC000_0007),
        PERF_GLOBAL_CTRL        => (0x38F, 0x0000_0003, 0x0000_0007),
        PERF_GLOBAL_OVF_CTRL    => (0x390, 0x0000_0003, 0xC000_0007),
        PEBS_ENABLE             => (0x3F1, 0x0000_000F, 0x0000_000F),
        PEBS_LD_LAT             => (0x3F6, 0x0000_FFFF, NO_WRITE),
        RAPL_POWER_UNIT         => (0x606, READ_ONLY,   READ_ONLY),
        PKG_POWER_LIMIT         => (0x610, WRITE_ALL,   WRITE_ALL),
        PKG_ENERGY_STATUS       => (0x611, READ_ONLY,   READ_ONLY),
        PKG_POWER_INFO          => (0x612, READ_ONLY,   READ_ONLY),
        PP0_POWER_LIMIT         => (0x638, WRITE_ALL,   WRITE_ALL),
        PP0_ENERGY_STATUS       => (0x639, READ_ONLY,   READ_ONLY),
        PKG_PERF_STATUS         => (0x613, READ_ONLY,   READ_ONLY),
        DRAM_POWER_LIMIT        => (0x618, WRITE_ALL,   WRITE_ALL),
        DRAM_ENERGY_STATUS      => (0x619, READ_ONLY,   READ_ONLY),
        DRAM_PERF_STATUS        => (0x61B, READ_ONLY,   READ_ONLY),
        DRAM_POWER_INFO         => (0x61C, READ_ONLY,   READ_ONLY),
        LAST_ENTRY              => (0x000, NO_WRITE,    NO_WRITE),
    }
}
