//! Numeric and character literal parsing shared by the memory layout pass and
//! the instruction encoder. Mirrors the three numeric bases and the char-literal
//! shorthand accepted anywhere a value token appears in source.

use crate::errors::AssemblyError;

/// Parses a bare value token (as it appears in DATA entries or instruction
/// operands) into an integer. Accepts `'X'` char literals, and decimal/hex/binary
/// numbers per their suffix (`d`/`h`/`b`; no suffix defaults to decimal).
pub fn parse_value(token: &str, line: usize) -> Result<i64, AssemblyError> {
    if is_char_literal(token) {
        return parse_char_literal(token, line);
    }
    parse_numeric(token, line)
}

pub fn is_char_literal(token: &str) -> bool {
    token.len() == 3 && token.starts_with('\'') && token.ends_with('\'')
}

fn parse_char_literal(token: &str, line: usize) -> Result<i64, AssemblyError> {
    let c = token.chars().nth(1).ok_or_else(|| AssemblyError::InvalidOperand {
        line,
        reason: format!("malformed character literal '{token}'"),
    })?;
    if !c.is_ascii() {
        return Err(AssemblyError::InvalidOperand {
            line,
            reason: format!("character literal '{token}' is not ASCII"),
        });
    }
    Ok(c as i64)
}

/// Parses a numeric literal in one of the three accepted bases:
/// - `…h` → hexadecimal
/// - `…b` → binary (body restricted to `0`/`1`)
/// - `…d` or bare digits → decimal
pub fn parse_numeric(token: &str, line: usize) -> Result<i64, AssemblyError> {
    let invalid = |reason: String| AssemblyError::InvalidOperand { line, reason };

    if let Some(body) = token.strip_suffix('h') {
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(format!("invalid hexadecimal literal '{token}'")));
        }
        return i64::from_str_radix(body, 16)
            .map_err(|_| invalid(format!("invalid hexadecimal literal '{token}'")));
    }

    if let Some(body) = token.strip_suffix('b') {
        if !body.is_empty() && body.chars().all(|c| c == '0' || c == '1') {
            return i64::from_str_radix(body, 2)
                .map_err(|_| invalid(format!("invalid binary literal '{token}'")));
        }
        return Err(invalid(format!("invalid binary literal '{token}'")));
    }

    if let Some(body) = token.strip_suffix('d') {
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(format!("invalid decimal literal '{token}'")));
        }
        return body
            .parse::<i64>()
            .map_err(|_| invalid(format!("invalid decimal literal '{token}'")));
    }

    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse::<i64>()
            .map_err(|_| invalid(format!("invalid decimal literal '{token}'")));
    }

    Err(invalid(format!("'{token}' is not a recognized numeric literal")))
}

/// Formats `value` as an unsigned binary string of exactly `width` bits.
/// Returns an error if `value` does not fit (negative, or `>= 2^width`).
pub fn format_bits(value: i64, width: usize, line: usize) -> Result<String, AssemblyError> {
    if value < 0 || (width < 64 && value >= (1i64 << width)) {
        return Err(AssemblyError::InvalidOperand {
            line,
            reason: format!("value {value} does not fit in {width} bits"),
        });
    }
    Ok(format!("{value:0width$b}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_default_and_suffixed() {
        assert_eq!(parse_numeric("10", 1).unwrap(), 10);
        assert_eq!(parse_numeric("10d", 1).unwrap(), 10);
    }

    #[test]
    fn parses_hex() {
        assert_eq!(parse_numeric("10h", 1).unwrap(), 16);
        assert_eq!(parse_numeric("ffh", 1).unwrap(), 255);
    }

    #[test]
    fn parses_binary() {
        assert_eq!(parse_numeric("10b", 1).unwrap(), 2);
        assert_eq!(parse_numeric("1111b", 1).unwrap(), 15);
    }

    #[test]
    fn parses_char_literal() {
        assert_eq!(parse_value("'A'", 1).unwrap(), 65);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_numeric("xyz", 1).is_err());
        assert!(parse_numeric("12g", 1).is_err());
    }

    #[test]
    fn format_bits_rejects_overflow() {
        assert!(format_bits(16, 4, 1).is_err());
        assert_eq!(format_bits(5, 4, 1).unwrap(), "0101");
    }
}
