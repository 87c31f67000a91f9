// Numeric literals in C notation: decimal, 0x-prefixed hex, 0-prefixed octal

/// Parses an unsigned integer literal the way `strtol(s, &end, 0)` reads it,
/// except that the whole string must be consumed and an empty string is
/// rejected.
pub fn parse_c_integer(text: &str) -> Option<u64> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    u64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_hex_octal() {
        assert_eq!(parse_c_integer("9600"), Some(9600));
        assert_eq!(parse_c_integer("0"), Some(0));
        assert_eq!(parse_c_integer("0x01"), Some(1));
        assert_eq!(parse_c_integer("0X1F90"), Some(8080));
        assert_eq!(parse_c_integer("001"), Some(1));
        assert_eq!(parse_c_integer("017"), Some(15));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_c_integer(""), None);
        assert_eq!(parse_c_integer("0x"), None);
        assert_eq!(parse_c_integer("08"), None);
        assert_eq!(parse_c_integer("12ab"), None);
        assert_eq!(parse_c_integer("-1"), None);
        assert_eq!(parse_c_integer("ctrl-a"), None);
    }
}
