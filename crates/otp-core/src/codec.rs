//! Scalar value codecs
//!
//! Values written as short strings in plan documents (`"30:00"`, `"5 km"`,
//! `"8%"`, `"0.65vo2max"`) implement [`ScalarCodec`]. Decoding accepts only
//! well-formed input and never coerces; encoding always produces the canonical
//! form, which decodes back to the same value.

use once_cell::sync::Lazy;
use otp_remote::DecodeError;
use regex::Regex;

/// Unsigned decimal: digits with an optional fraction, or a bare fraction
const DECIMAL: &str = r"[0-9]+\.?[0-9]*|\.[0-9]+";

static DECIMAL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(&format!("^(?:{DECIMAL})$")).ok());

static SUFFIXED_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(&format!("^({DECIMAL}) ?([A-Za-z].*)$")).ok());

/// A value with a canonical textual form
pub trait ScalarCodec: Sized {
    /// Value kind used in error messages
    const KIND: &'static str;

    /// Decode from text
    ///
    /// # Errors
    /// [`DecodeError::InvalidFormat`] if `raw` matches no accepted form.
    fn decode(raw: &str) -> Result<Self, DecodeError>;

    /// Encode to canonical text
    fn encode(&self) -> String;

    /// Error for input that matched no accepted form
    fn invalid(raw: &str) -> DecodeError {
        DecodeError::invalid_format(Self::KIND, raw)
    }
}

/// Implement `FromStr`, `Display` and string-based serde for a [`ScalarCodec`]
macro_rules! scalar_serde {
    ($ty:ty) => {
        impl ::std::str::FromStr for $ty {
            type Err = ::otp_remote::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as $crate::codec::ScalarCodec>::decode(s)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&$crate::codec::ScalarCodec::encode(self))
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&$crate::codec::ScalarCodec::encode(self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::codec::ScalarCodec>::decode(&raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use scalar_serde;

/// Parse an unsigned decimal made of ASCII digits and at most one `.`
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    if !DECIMAL_RE.as_ref()?.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split `"<number><optional space><suffix>"` at the first letter
pub(crate) fn split_suffix(text: &str) -> Option<(f64, &str)> {
    let captures = SUFFIXED_RE.as_ref()?.captures(text)?;
    let value = parse_decimal(captures.get(1)?.as_str())?;
    Some((value, captures.get(2)?.as_str()))
}

/// Format with at most `precision` fractional digits, trailing zeros trimmed
pub(crate) fn format_trimmed(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
