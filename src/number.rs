//! Number coercion in both directions, following the rules of the
//! ECMAScript `Number(string)` conversion and `Number.prototype.toString`.
//!
//! Stored values are compared against these rules when decoding, so
//! `"0x1F"`, `" 12 "` and `"1e3"` are all read back as numbers while
//! `"inf"` or `"NaN"` are not.

/// Formats `value` the way a JS engine coerces a number to a string.
///
/// Integral values below `1e21` are written without a fraction or exponent
/// (`123`, not `123.0`). Other finite values use the shortest representation
/// that reads back to the same `f64`, with the exponent written as `e+N` or
/// `e-N`.
pub fn format(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        // covers -0
        return "0".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i128).to_owned();
    }

    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted.to_owned(),
    }
}

/// Converts a string to a number the way `Number(string)` does.
///
/// Returns `None` where the JS conversion would produce `NaN`.
pub fn parse(input: &str) -> Option<f64> {
    let trimmed = input.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return Some(0.0);
    }

    // radix literals do not accept a sign
    if let Some((radix, digits)) = radix_prefix(trimmed) {
        return parse_radix(digits, radix);
    }

    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'+' => (1.0, &trimmed[1..]),
        b'-' => (-1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    if !is_decimal_literal(unsigned) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// JS `WhiteSpace` and `LineTerminator`: Unicode white space without NEL,
/// plus the byte order mark.
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some((radix, &s[2..]))
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// `Digits? ('.' Digits?)? ([eE] [+-]? Digits)?` with at least one digit
/// in the integer or fraction part.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits_from(0);
    let mut index = int_digits;
    let mut frac_digits = 0;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        frac_digits = digits_from(index);
        index += frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exp_digits = digits_from(index);
        if exp_digits == 0 {
            return false;
        }
        index += exp_digits;
    }

    index == bytes.len()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_matches_js() {
        assert_eq!(format(123.0), "123");
        assert_eq!(format(-42.0), "-42");
        assert_eq!(format(1.5), "1.5");
        assert_eq!(format(0.1), "0.1");
        assert_eq!(format(-0.0), "0");
        assert_eq!(format(1e21), "1e+21");
        assert_eq!(format(1.5e300), "1.5e+300");
        assert_eq!(format(1e-7), "1e-7");
        assert_eq!(format(f64::NAN), "NaN");
        assert_eq!(format(f64::INFINITY), "Infinity");
        assert_eq!(format(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn parse_matches_js() {
        assert_eq!(parse("0"), Some(0.0));
        assert_eq!(parse("123"), Some(123.0));
        assert_eq!(parse(" 12 "), Some(12.0));
        assert_eq!(parse("   "), Some(0.0));
        assert_eq!(parse("-1.5"), Some(-1.5));
        assert_eq!(parse("+.5"), Some(0.5));
        assert_eq!(parse("5."), Some(5.0));
        assert_eq!(parse("1e3"), Some(1000.0));
        assert_eq!(parse("1E-2"), Some(0.01));
        assert_eq!(parse("0x1F"), Some(31.0));
        assert_eq!(parse("0b101"), Some(5.0));
        assert_eq!(parse("0o17"), Some(15.0));
        assert_eq!(parse("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn parse_rejects_non_numbers() {
        for input in [
            "abc", "1a", ".", "e5", "1e", "1e+", "-0x10", "0x", "0xZZ", "inf", "nan", "NaN",
            "infinity", "1_000", "true", "{}", "[]",
        ] {
            assert_eq!(parse(input), None, "{input:?} should not be a number");
        }
    }

    #[test]
    fn parse_trims_js_whitespace_only() {
        assert_eq!(parse("\t\n\u{a0}7\u{2028}\u{3000}"), Some(7.0));
        assert_eq!(parse("\u{feff}8"), Some(8.0));
        // NEL is Unicode white space but not JS white space
        assert_eq!(parse("\u{85}1"), None);
        assert_eq!(parse("1\u{85}"), None);
    }

    #[test]
    fn format_then_parse_is_stable() {
        for value in [0.0, 1.0, -7.25, 1e21, 3.0e-10, 123456.789, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(parse(&format(value)), Some(value));
        }
    }
}
