//! Numeric field parsing
//!
//! Values are read from the text right after a field letter. Only the
//! longest numeric prefix counts; anything that is not a number reads as
//! zero, matching how controllers traditionally treat `X` or `Xabc`.

/// Parse a decimal float prefix (`-12.5`, `.5`, `3e2`, ` 7`)
pub fn parse_float(text: &[u8]) -> f32 {
    let start = skip_whitespace(text, 0);
    let mut end = start;

    if matches!(text.get(end), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = count_digits(text, end);
    end += int_digits;

    let mut frac_digits = 0;
    if text.get(end) == Some(&b'.') {
        frac_digits = count_digits(text, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(text.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(text.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(text, exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    core::str::from_utf8(&text[start..end])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Parse an integer prefix: decimal, or hexadecimal with a `0x` prefix
///
/// Out-of-range values saturate.
pub fn parse_int(text: &[u8]) -> i32 {
    let mut pos = skip_whitespace(text, 0);

    let negative = match text.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut radix = 10;
    if text.get(pos) == Some(&b'0')
        && matches!(text.get(pos + 1), Some(b'x' | b'X'))
        && text.get(pos + 2).is_some_and(|b| b.is_ascii_hexdigit())
    {
        radix = 16;
        pos += 2;
    }

    let mut value: i64 = 0;
    for digit in text[pos.min(text.len())..]
        .iter()
        .map_while(|b| (*b as char).to_digit(radix))
    {
        value = (value * radix as i64 + digit as i64).min(i32::MAX as i64 + 1);
    }

    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn skip_whitespace(text: &[u8], mut pos: usize) -> usize {
    while text.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn count_digits(text: &[u8], pos: usize) -> usize {
    text.get(pos..)
        .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
        .unwrap_or(0)
}
