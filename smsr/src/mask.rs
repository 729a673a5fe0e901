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

//! Write mask arithmetic. Masks are authored and documented as two 32-bit
//! halves, a set bit means the caller may change the corresponding register bit.

/// Every bit of the half is writable.
pub const WRITE_ALL: u32 = 0xFFFF_FFFF;

/// No bit of the half is writable.
pub const NO_WRITE: u32 = 0x0;

/// Marks the power and energy reporting registers, an alias of [`NO_WRITE`].
pub const READ_ONLY: u32 = NO_WRITE;

pub fn split_halves(value: u64) -> (u32, u32) {
    (value as u32, (value >> 32) as u32)
}

pub fn join_halves(low: u32, high: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

/// Bits outside of the mask are taken from `current`, bits inside from `requested`.
pub fn masked_half(current: u32, requested: u32, mask: u32) -> u32 {
    (current & !mask) | (requested & mask)
}

/// Combines a requested value with the current register value so that only
/// the bits allowed by the masks change.
pub fn masked_value(current: u64, requested: u64, mask_low: u32, mask_high: u32) -> u64 {
    let (current_low, current_high) = split_halves(current);
    let (requested_low, requested_high) = split_halves(requested);

    join_halves(
        masked_half(current_low, requested_low, mask_low),
        masked_half(current_high, requested_high, mask_high),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_are_split_at_bit_32() {
        assert_eq!(split_halves(0x0000_0040_0001_0000), (0x0001_0000, 0x40));
        assert_eq!(join_halves(0x0001_0000, 0x40), 0x0000_0040_0001_0000);
    }

    #[test]
    fn protected_bits_are_clamped_to_current_value() {
        // turbo disable style control: full low word and bit 38
        let result = masked_value(0x0000_0001_0001_0000, u64::MAX, WRITE_ALL, 0x40);
        assert_eq!(result, 0x0000_0041_FFFF_FFFF);
    }

    #[test]
    fn cleared_requested_bits_clear_writable_bits_only() {
        let result = masked_value(0xFFFF_FFFF_FFFF_FFFF, 0, 0x0000_0AAA, NO_WRITE);
        assert_eq!(result, 0xFFFF_FFFF_FFFF_F555);
    }

    #[test]
    fn empty_masks_keep_current_value() {
        let result = masked_value(0x1234_5678_9ABC_DEF0, 0, READ_ONLY, READ_ONLY);
        assert_eq!(result, 0x1234_5678_9ABC_DEF0);
    }
}
