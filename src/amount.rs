use crate::error::SpinError;

/// The chip token carries six decimals; every on-ledger amount is an
/// integer count of minor units.
pub const CHIP_DECIMALS: u32 = 6;

pub const MINOR_PER_CHIP: u64 = 10u64.pow(CHIP_DECIMALS);

/// Parses a user-entered decimal string into minor units, truncating
/// (never rounding up) fractional digits beyond [`CHIP_DECIMALS`].
/// The text never round-trips through floating point.
pub fn parse_chips(text: &str) -> Result<u64, SpinError> {
    let trimmed = text.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(SpinError::InvalidAmount(format!("'{text}' is empty")));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(SpinError::InvalidAmount(format!(
            "'{text}' is not a decimal number"
        )));
    }
    // Truncation: drop everything past the supported precision.
    let kept = &frac[..frac.len().min(CHIP_DECIMALS as usize)];
    let whole_units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| {
            SpinError::InvalidAmount(format!("'{text}' is out of range"))
        })?
    };
    let frac_units: u64 = if kept.is_empty() {
        0
    } else {
        let bare: u64 = kept
            .parse()
            .expect("at most six ascii digits always fit in u64");
        bare * 10u64.pow(CHIP_DECIMALS - kept.len() as u32)
    };
    let minor = whole_units
        .checked_mul(MINOR_PER_CHIP)
        .and_then(|units| units.checked_add(frac_units))
        .ok_or_else(|| {
            SpinError::InvalidAmount(format!("'{text}' is out of range"))
        })?;
    if minor == 0 {
        return Err(SpinError::InvalidAmount(String::from(
            "bet amount must be positive",
        )));
    }
    Ok(minor)
}

/// Renders minor units back as a decimal chip amount, integer math only.
pub fn format_chips(minor: u128) -> String {
    let whole = minor / MINOR_PER_CHIP as u128;
    let frac = minor % MINOR_PER_CHIP as u128;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:06}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_chips__whole_amount() {
        assert_eq!(parse_chips("1"), Ok(1_000_000));
        assert_eq!(parse_chips("25"), Ok(25_000_000));
    }

    #[test]
    fn parse_chips__fractional_amount() {
        assert_eq!(parse_chips("0.5"), Ok(500_000));
        assert_eq!(parse_chips(".5"), Ok(500_000));
        assert_eq!(parse_chips("1.000001"), Ok(1_000_001));
    }

    #[test]
    fn parse_chips__truncates_excess_digits_downward() {
        // 1.2345678 chips is 1234567.8 minor units; floor, never round up.
        assert_eq!(parse_chips("1.2345678"), Ok(1_234_567));
        assert_eq!(parse_chips("0.0000009"), Err(SpinError::InvalidAmount(
            String::from("bet amount must be positive"),
        )));
    }

    #[test]
    fn parse_chips__rejects_junk() {
        for bad in ["", ".", "1..2", "-1", "+1", "1e6", "one", "1.2.3"] {
            assert!(parse_chips(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn format_chips__trims_trailing_zeros() {
        assert_eq!(format_chips(1_000_000), "1");
        assert_eq!(format_chips(1_500_000), "1.5");
        assert_eq!(format_chips(123), "0.000123");
        assert_eq!(format_chips(36_000_000), "36");
    }

    proptest! {
        #[test]
        fn parse_chips__never_exceeds_the_displayed_amount(
            whole in 0u64..10_000_000,
            frac in "[0-9]{0,12}",
        ) {
            let text = format!("{whole}.{frac}");
            let exact_kept = &frac[..frac.len().min(6)];
            let expected_frac = if exact_kept.is_empty() {
                0
            } else {
                exact_kept.parse::<u64>().unwrap()
                    * 10u64.pow(6 - exact_kept.len() as u32)
            };
            let expected = whole * MINOR_PER_CHIP + expected_frac;
            match parse_chips(&text) {
                Ok(minor) => prop_assert_eq!(minor, expected),
                Err(_) => prop_assert_eq!(expected, 0),
            }
        }

        #[test]
        fn format_chips__round_trips_through_parse(minor in 1u64..u64::MAX / 2) {
            let text = format_chips(minor as u128);
            prop_assert_eq!(parse_chips(&text), Ok(minor));
        }
    }
}
