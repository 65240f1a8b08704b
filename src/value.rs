//! Typed values: decoding raw property bytes and encoding values for storage.
//!
//! The document only ever stores bytes. Conversion happens on demand through
//! [`FromIniValue`] and [`ToIniValue`], which are locale-independent: digits
//! are ASCII, booleans use a fixed English vocabulary, and floats use Rust's
//! own grammar.

use std::borrow::Cow;

use crate::chars;
use crate::error::IniError;

/// Decode a typed value from the logical bytes of a property.
pub trait FromIniValue: Sized {
    fn from_ini_value(raw: &[u8]) -> Result<Self, IniError>;
}

/// Encode a value into the logical bytes of a property.
///
/// Quoting is not the encoder's concern; the document quotes on write.
pub trait ToIniValue {
    fn to_ini_value(&self) -> Cow<'_, [u8]>;
}

fn bad_value(raw: &[u8], expected: &'static str) -> IniError {
    IniError::BadValue {
        value: String::from_utf8_lossy(raw).into_owned(),
        expected,
    }
}

impl FromIniValue for bool {
    fn from_ini_value(raw: &[u8]) -> Result<Self, IniError> {
        const TRUE: [&[u8]; 4] = [b"1", b"true", b"yes", b"on"];
        const FALSE: [&[u8]; 4] = [b"0", b"false", b"no", b"off"];
        let text = chars::trim(raw);
        if TRUE.iter().any(|t| text.eq_ignore_ascii_case(t)) {
            Ok(true)
        } else if FALSE.iter().any(|f| text.eq_ignore_ascii_case(f)) {
            Ok(false)
        } else {
            Err(bad_value(raw, "a boolean"))
        }
    }
}

impl ToIniValue for bool {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(if *self { b"1".as_slice() } else { b"0".as_slice() })
    }
}

/// Validate `[+-]?[0-9]+` (sign only when `signed`) and hand back the text.
fn integer_text(raw: &[u8], signed: bool) -> Option<&str> {
    let text = chars::trim(raw);
    let digits = match text.first() {
        Some(b'+' | b'-') if signed => &text[1..],
        _ => text,
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(text).ok()
}

macro_rules! integer_value {
    ($($ty:ty => $signed:expr, $expected:literal;)*) => {$(
        impl FromIniValue for $ty {
            fn from_ini_value(raw: &[u8]) -> Result<Self, IniError> {
                integer_text(raw, $signed)
                    .and_then(|text| text.parse::<$ty>().ok())
                    .ok_or_else(|| bad_value(raw, $expected))
            }
        }

        impl ToIniValue for $ty {
            fn to_ini_value(&self) -> Cow<'_, [u8]> {
                Cow::Owned(self.to_string().into_bytes())
            }
        }
    )*};
}

integer_value! {
    u32 => false, "an unsigned 32-bit integer";
    u64 => false, "an unsigned 64-bit integer";
    i32 => true, "a signed 32-bit integer";
    i64 => true, "a signed 64-bit integer";
}

macro_rules! float_value {
    ($($ty:ty => $expected:literal;)*) => {$(
        impl FromIniValue for $ty {
            fn from_ini_value(raw: &[u8]) -> Result<Self, IniError> {
                std::str::from_utf8(chars::trim(raw))
                    .ok()
                    .and_then(|text| text.parse::<$ty>().ok())
                    .ok_or_else(|| bad_value(raw, $expected))
            }
        }

        impl ToIniValue for $ty {
            // Debug formatting is the shortest text that parses back exactly.
            fn to_ini_value(&self) -> Cow<'_, [u8]> {
                Cow::Owned(format!("{self:?}").into_bytes())
            }
        }
    )*};
}

float_value! {
    f32 => "a 32-bit floating point number";
    f64 => "a 64-bit floating point number";
}

impl FromIniValue for String {
    fn from_ini_value(raw: &[u8]) -> Result<Self, IniError> {
        String::from_utf8(raw.to_vec()).map_err(|_| bad_value(raw, "UTF-8 text"))
    }
}

impl FromIniValue for Vec<u8> {
    fn from_ini_value(raw: &[u8]) -> Result<Self, IniError> {
        Ok(raw.to_vec())
    }
}

impl ToIniValue for str {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl ToIniValue for String {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl ToIniValue for [u8] {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl ToIniValue for Vec<u8> {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<T: ToIniValue + ?Sized> ToIniValue for &T {
    fn to_ini_value(&self) -> Cow<'_, [u8]> {
        (**self).to_ini_value()
    }
}

/// Whether a value must be written in quotes to read back unchanged.
///
/// Empty values and values with whitespace or INI metacharacters anywhere
/// are quoted.
pub fn needs_quotes(value: &[u8]) -> bool {
    value.is_empty() || value.iter().copied().any(chars::needs_quoting)
}

/// Wrap `value` in quotes, doubling interior quotes.
pub fn quote(value: &[u8]) -> Result<Vec<u8>, IniError> {
    let extra = value.iter().filter(|&&b| chars::is_quote(b)).count();
    let mut out = Vec::new();
    out.try_reserve_exact(value.len() + extra + 2)?;
    out.push(chars::QUOTE);
    for &b in value {
        if chars::is_quote(b) {
            out.push(chars::QUOTE);
        }
        out.push(b);
    }
    out.push(chars::QUOTE);
    Ok(out)
}

/// Collapse doubled quotes inside a quoted token.
pub fn unescape(inner: &[u8]) -> Cow<'_, [u8]> {
    if !inner.windows(2).any(|w| w == [chars::QUOTE, chars::QUOTE]) {
        return Cow::Borrowed(inner);
    }
    let mut out = Vec::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        out.push(inner[i]);
        if chars::is_quote(inner[i]) && inner.get(i + 1).copied().is_some_and(chars::is_quote) {
            i += 1;
        }
        i += 1;
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_accept_every_spelling() {
        for t in ["1", "true", "TRUE", "Yes", "on", "ON"] {
            assert!(bool::from_ini_value(t.as_bytes()).unwrap(), "{t}");
        }
        for f in ["0", "false", "False", "NO", "off", "Off"] {
            assert!(!bool::from_ini_value(f.as_bytes()).unwrap(), "{f}");
        }
        assert!(bool::from_ini_value(b"maybe").is_err());
        assert!(bool::from_ini_value(b"").is_err());
        assert!(bool::from_ini_value(b"2").is_err());
    }

    #[test]
    fn booleans_encode_numerically() {
        assert_eq!(true.to_ini_value().as_ref(), b"1");
        assert_eq!(false.to_ini_value().as_ref(), b"0");
    }

    #[test]
    fn unsigned_rejects_signs() {
        assert_eq!(u32::from_ini_value(b"42").unwrap(), 42);
        assert!(u32::from_ini_value(b"+42").is_err());
        assert!(u32::from_ini_value(b"-42").is_err());
        assert!(u64::from_ini_value(b"").is_err());
        assert!(u64::from_ini_value(b"12a").is_err());
    }

    #[test]
    fn unsigned_range_is_checked() {
        assert_eq!(u32::from_ini_value(b"4294967295").unwrap(), u32::MAX);
        assert!(u32::from_ini_value(b"4294967296").is_err());
        assert_eq!(
            u64::from_ini_value(b"1152921504606846976").unwrap(),
            1_152_921_504_606_846_976
        );
    }

    #[test]
    fn signed_accepts_optional_sign() {
        assert_eq!(i32::from_ini_value(b"-17").unwrap(), -17);
        assert_eq!(i32::from_ini_value(b"+17").unwrap(), 17);
        assert_eq!(i32::from_ini_value(b"17").unwrap(), 17);
        assert!(i32::from_ini_value(b"-").is_err());
        assert!(i32::from_ini_value(b"--1").is_err());
        assert!(i32::from_ini_value(b"2147483648").is_err());
        assert_eq!(
            i64::from_ini_value(b"-1152921504606846976").unwrap(),
            -1_152_921_504_606_846_976
        );
    }

    #[test]
    fn integers_encode_as_shortest_decimal() {
        assert_eq!(0u32.to_ini_value().as_ref(), b"0");
        assert_eq!((-5i64).to_ini_value().as_ref(), b"-5");
        assert_eq!(u64::MAX.to_ini_value().as_ref(), b"18446744073709551615");
    }

    #[test]
    fn floats_round_trip() {
        for v in [0.1f64, -2.5, 1e300, 3.0] {
            let encoded = v.to_ini_value();
            assert_eq!(f64::from_ini_value(&encoded).unwrap(), v);
        }
        assert_eq!(f32::from_ini_value(b"0.5").unwrap(), 0.5);
        assert!(f64::from_ini_value(b"one").is_err());
    }

    #[test]
    fn strings_require_utf8() {
        assert_eq!(String::from_ini_value(b"Hello").unwrap(), "Hello");
        assert!(String::from_ini_value(&[0xff, 0xfe]).is_err());
        assert_eq!(Vec::<u8>::from_ini_value(&[0xff]).unwrap(), vec![0xff]);
    }

    #[test]
    fn quoting_policy() {
        assert!(!needs_quotes(b"plain"));
        assert!(!needs_quotes("grüße".as_bytes()));
        assert!(needs_quotes(b""));
        for v in ["two words", "a;b", "a#b", "a=b", "a\"b", "[a]", " lead", "trail\t"] {
            assert!(needs_quotes(v.as_bytes()), "{v}");
        }
    }

    #[test]
    fn quote_and_unescape_are_inverse() {
        let quoted = quote(b"say \"hi\"").unwrap();
        assert_eq!(quoted, b"\"say \"\"hi\"\"\"");
        let inner = &quoted[1..quoted.len() - 1];
        assert_eq!(unescape(inner).as_ref(), b"say \"hi\"");
    }

    #[test]
    fn unescape_borrows_when_nothing_to_do() {
        assert!(matches!(unescape(b"plain text"), Cow::Borrowed(_)));
    }
}
