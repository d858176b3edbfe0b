// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transfer-size specifier parsing.
//!
//! `<integer>[k|K|m|M|g|G]` where the suffix multiplies by 1024, 1024^2, or
//! 1024^3. Anything after the suffix is rejected outright - an argument
//! error must leave no partial work behind.

use crate::error::SizeSpecError;

pub const KB: u64 = 1024;
pub const MB: u64 = KB * KB;
pub const GB: u64 = MB * KB;

/// Parse a size specifier into a byte count.
pub fn parse_size(input: &str) -> Result<u64, SizeSpecError> {
    if input.is_empty() {
        return Err(SizeSpecError::Empty);
    }

    let digits_end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if digits_end == 0 {
        return Err(SizeSpecError::MissingDigits {
            input: input.to_string(),
        });
    }

    let value: u64 = input[..digits_end]
        .parse()
        .map_err(|_| SizeSpecError::Overflow {
            input: input.to_string(),
        })?;

    let multiplier = match &input[digits_end..] {
        "" => 1,
        "k" | "K" => KB,
        "m" | "M" => MB,
        "g" | "G" => GB,
        suffix => {
            return Err(SizeSpecError::UnknownSuffix {
                suffix: suffix.to_string(),
            })
        }
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| SizeSpecError::Overflow {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer() {
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_kilo_suffix() {
        assert_eq!(parse_size("2k").unwrap(), 2048);
        assert_eq!(parse_size("2K").unwrap(), 2048);
    }

    #[test]
    fn test_mega_suffix() {
        assert_eq!(parse_size("5M").unwrap(), 5 * 1024 * 1024);
        assert_eq!(parse_size("5m").unwrap(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_giga_suffix() {
        assert_eq!(parse_size("1g").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("3G").unwrap(), 3 * GB);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(parse_size(""), Err(SizeSpecError::Empty)));
    }

    #[test]
    fn test_non_numeric_prefix_rejected() {
        assert!(matches!(
            parse_size("k4"),
            Err(SizeSpecError::MissingDigits { .. })
        ));
        assert!(matches!(
            parse_size("abc"),
            Err(SizeSpecError::MissingDigits { .. })
        ));
    }

    #[test]
    fn test_unknown_suffix_rejected() {
        assert!(matches!(
            parse_size("4x"),
            Err(SizeSpecError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        // Stricter than the usual strtoll treatment: nothing may follow
        // the suffix.
        assert!(matches!(
            parse_size("4kb"),
            Err(SizeSpecError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            parse_size("4k4"),
            Err(SizeSpecError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            parse_size("99999999999999999999"),
            Err(SizeSpecError::Overflow { .. })
        ));
        assert!(matches!(
            parse_size("18446744073709551615g"),
            Err(SizeSpecError::Overflow { .. })
        ));
    }
}
