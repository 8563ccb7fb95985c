//! The canonical encoded hash string.
//!
//! Grammar (salt and tag are standard-alphabet base64 with padding
//! stripped):
//!
//! ```text
//! $<type>$v=19$m=<kib>,t=<passes>,p=<lanes>$<salt>$<tag>
//! ```
//!
//! The parser is strict: every deviation maps to one of the three encoding
//! error kinds, and nothing beyond the grammar is accepted. No reordered
//! performance fields, no padding, no trailing garbage.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;

use crate::error::{Error, Result};
use crate::params::{Variant, VERSION};

/// Everything an encoded string carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Algorithm flavor named by the string.
    pub variant: Variant,
    /// Requested memory in KiB.
    pub memory_kib: u32,
    /// Passes over memory.
    pub passes: u32,
    /// Degree of parallelism.
    pub lanes: u32,
    /// Decoded salt bytes.
    pub salt: Vec<u8>,
    /// Decoded tag bytes.
    pub tag: Vec<u8>,
}

/// Format an encoded hash string from its components.
pub(crate) fn encode_string(
    variant: Variant,
    memory_kib: u32,
    passes: u32,
    lanes: u32,
    salt: &[u8],
    tag: &[u8],
) -> String {
    format!(
        "${}$v={}$m={},t={},p={}${}${}",
        variant.as_name(),
        VERSION,
        memory_kib,
        passes,
        lanes,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(tag),
    )
}

/// Parse an encoded hash string.
///
/// Unknown type names yield [`Error::UnsupportedType`], versions other than
/// 19 yield [`Error::UnsupportedVersion`], and every other deviation yields
/// [`Error::InvalidEncoding`].
pub fn decode_string(encoded: &str) -> Result<Decoded> {
    let rest = encoded
        .strip_prefix('$')
        .ok_or(Error::InvalidEncoding("missing leading '$'"))?;
    let mut fields = rest.split('$');

    let type_name = fields
        .next()
        .ok_or(Error::InvalidEncoding("missing type field"))?;
    let variant =
        Variant::from_name(type_name).ok_or_else(|| Error::UnsupportedType(type_name.into()))?;

    let version_field = fields
        .next()
        .ok_or(Error::InvalidEncoding("missing version field"))?;
    let version = version_field
        .strip_prefix("v=")
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or(Error::InvalidEncoding("malformed version field"))?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let perf_field = fields
        .next()
        .ok_or(Error::InvalidEncoding("missing performance field"))?;
    let (memory_kib, passes, lanes) = parse_performance(perf_field)?;

    let salt_field = fields
        .next()
        .ok_or(Error::InvalidEncoding("missing salt field"))?;
    let salt = decode_base64(salt_field, "salt is not unpadded base64")?;

    let tag_field = fields
        .next()
        .ok_or(Error::InvalidEncoding("missing hash field"))?;
    let tag = decode_base64(tag_field, "hash is not unpadded base64")?;

    if fields.next().is_some() {
        return Err(Error::InvalidEncoding("trailing fields"));
    }

    Ok(Decoded { variant, memory_kib, passes, lanes, salt, tag })
}

/// Parse `m=<kib>,t=<passes>,p=<lanes>`, in exactly that order.
fn parse_performance(field: &str) -> Result<(u32, u32, u32)> {
    let mut parts = field.split(',');
    let memory = parse_prefixed(parts.next(), "m=")?;
    let passes = parse_prefixed(parts.next(), "t=")?;
    let lanes = parse_prefixed(parts.next(), "p=")?;
    if parts.next().is_some() {
        return Err(Error::InvalidEncoding("trailing performance parameters"));
    }
    Ok((memory, passes, lanes))
}

fn parse_prefixed(part: Option<&str>, prefix: &'static str) -> Result<u32> {
    part.and_then(|p| p.strip_prefix(prefix))
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or(Error::InvalidEncoding("malformed performance field"))
}

fn decode_base64(field: &str, context: &'static str) -> Result<Vec<u8>> {
    if field.is_empty() {
        return Err(Error::InvalidEncoding(context));
    }
    STANDARD_NO_PAD
        .decode(field)
        .map_err(|_| Error::InvalidEncoding(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8gd29ybGQ";

    #[test]
    fn round_trip() {
        let decoded = decode_string(SAMPLE).unwrap();
        assert_eq!(decoded.variant, Variant::Argon2i);
        assert_eq!(decoded.memory_kib, 4096);
        assert_eq!(decoded.passes, 3);
        assert_eq!(decoded.lanes, 1);
        assert_eq!(decoded.salt, b"somesalt");
        assert_eq!(decoded.tag, b"hello world");

        let rebuilt = encode_string(
            decoded.variant,
            decoded.memory_kib,
            decoded.passes,
            decoded.lanes,
            &decoded.salt,
            &decoded.tag,
        );
        assert_eq!(rebuilt, SAMPLE);
    }

    #[test]
    fn unknown_type_is_its_own_error() {
        let err = decode_string("$argon2x$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8").unwrap_err();
        assert_eq!(err, Error::UnsupportedType("argon2x".into()));
    }

    #[test]
    fn wrong_version_is_its_own_error() {
        let err = decode_string("$argon2i$v=16$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8").unwrap_err();
        assert_eq!(err, Error::UnsupportedVersion(16));
    }

    #[test]
    fn non_numeric_version_is_invalid_encoding() {
        let err = decode_string("$argon2i$v=abc$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8").unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[test]
    fn grammar_deviations_are_invalid_encoding() {
        let cases = [
            "",
            "argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8",
            "$argon2i$v=19$m=4096,p=1,t=3$c29tZXNhbHQ$aGVsbG8",
            "$argon2i$v=19$m=4096,t=3$c29tZXNhbHQ$aGVsbG8",
            "$argon2i$v=19$m=4096,t=3,p=1,x=9$c29tZXNhbHQ$aGVsbG8",
            "$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ",
            "$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8$extra",
            "$argon2i$v=19$m=4096,t=3,p=1$$aGVsbG8",
            "$argon2i$v=19$m=4096,t=3,p=1$not*base64$aGVsbG8",
        ];
        for case in cases {
            let err = decode_string(case).unwrap_err();
            assert!(
                matches!(err, Error::InvalidEncoding(_)),
                "case {:?} gave {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn padded_base64_is_rejected() {
        let err = decode_string("$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHQ=$aGVsbG8").unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[test]
    fn empty_type_is_unsupported_type() {
        let err = decode_string("$$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$aGVsbG8").unwrap_err();
        assert_eq!(err, Error::UnsupportedType(String::new()));
    }
}
