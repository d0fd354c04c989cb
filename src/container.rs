//! The armoured container format: header emission and parsing.
//!
//! ```text
//! $ANSIBLE_VAULT;<container_version>;<cipher_name>[;<cipher_version>]\n
//! <base64-or-hex body, wrapped at 80 columns>
//! ```
//!
//! Container version `1.2` and above carries an explicit cipher-version
//! field (four `;`-separated header fields); earlier versions omit it and
//! the container version doubles as the cipher version (three fields).

use crate::crypto::CipherName;
use crate::error::Error;

const MAGIC: &str = "$ANSIBLE_VAULT";
const CURRENT_CONTAINER_VERSION: &str = "1.2";

/// A parsed container header plus the (still-armoured) body bytes.
#[derive(Debug, Clone)]
pub struct ParsedHeader<'a> {
    /// The container (envelope) version, e.g. `"1.2"`.
    pub container_version: String,
    /// The cipher-name tag, e.g. `"AES256"`.
    pub cipher_name: String,
    /// The cipher-version tag; equal to `container_version` for containers
    /// below `1.2`.
    pub cipher_version: String,
    /// Everything after the header line's terminating `\n`.
    pub body: &'a [u8],
}

/// Returns `true` if `data` begins with the vault magic header.
pub fn is_vault(data: &[u8]) -> bool {
    data.starts_with(MAGIC.as_bytes())
}

/// Emits a container header followed by `body`.
///
/// Always writes the current container version (`1.2`) with an explicit
/// cipher-version field.
pub fn emit(cipher_name: CipherName, cipher_version: &str, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAGIC.len() + 32 + body.len());
    out.extend_from_slice(MAGIC.as_bytes());
    out.push(b';');
    out.extend_from_slice(CURRENT_CONTAINER_VERSION.as_bytes());
    out.push(b';');
    out.extend_from_slice(cipher_name.as_str().as_bytes());
    out.push(b';');
    out.extend_from_slice(cipher_version.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(body);
    out
}

/// Parses a container header and returns it alongside the remaining body
/// bytes.
///
/// # Errors
///
/// Returns [`Error::NotVault`] if the magic header is absent, and
/// [`Error::MalformedHeader`] if the header's field count does not match
/// its version shape.
pub fn parse(data: &[u8]) -> Result<ParsedHeader<'_>, Error> {
    let split_at = data.iter().position(|&b| b == b'\n').unwrap_or(data.len());
    let (header_line, rest) = data.split_at(split_at);
    let body = if rest.is_empty() { rest } else { &rest[1..] };

    let header_line = std::str::from_utf8(header_line).map_err(|_| Error::NotVault)?;
    let fields: Vec<&str> = header_line.trim().split(';').collect();

    if fields.is_empty() || fields[0] != MAGIC {
        return Err(Error::NotVault);
    }
    if fields.len() < 2 {
        return Err(Error::MalformedHeader(
            "missing container version field".into(),
        ));
    }

    let container_version = fields[1].trim().to_string();
    let cipher_name;
    let cipher_version;

    if version_at_least(&container_version, "1.2") {
        if fields.len() != 4 {
            return Err(Error::MalformedHeader(format!(
                "expected 4 fields for vault {container_version}, found {}",
                fields.len()
            )));
        }
        cipher_name = fields[2].trim().to_string();
        cipher_version = fields[3].trim().to_string();
    } else {
        if fields.len() != 3 {
            return Err(Error::MalformedHeader(format!(
                "expected 3 fields for vault {container_version} and below, found {}",
                fields.len()
            )));
        }
        cipher_name = fields[2].trim().to_string();
        cipher_version = container_version.clone();
    }

    Ok(ParsedHeader {
        container_version,
        cipher_name,
        cipher_version,
        body,
    })
}

/// Compares two dotted-pair version strings (e.g. `"1.10"`) as integer
/// components, left to right, returning `true` if `version >= floor`.
///
/// A naive byte/lexicographic comparison would rank `"1.10"` below `"1.2"`;
/// this compares `10 > 2` as integers instead.
fn version_at_least(version: &str, floor: &str) -> bool {
    let parse = |s: &str| -> Vec<u64> {
        s.split('.').map(|part| part.parse().unwrap_or(0)).collect()
    };
    let version_parts = parse(version);
    let floor_parts = parse(floor);

    for i in 0..version_parts.len().max(floor_parts.len()) {
        let v = version_parts.get(i).copied().unwrap_or(0);
        let f = floor_parts.get(i).copied().unwrap_or(0);
        if v != f {
            return v > f;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_vault_detects_header() {
        assert!(is_vault(b"$ANSIBLE_VAULT;1.2;AES256;1.2\nbody"));
        assert!(!is_vault(b"plain text"));
    }

    #[test]
    fn emit_produces_four_field_header() {
        let out = emit(CipherName::Aes256, "1.2", b"body\n");
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header.split(';').count(), 4);
        assert_eq!(header, "$ANSIBLE_VAULT;1.2;AES256;1.2");
    }

    #[test]
    fn parse_modern_header() {
        let data = b"$ANSIBLE_VAULT;1.2;AES256;1.2\nYmFzZTY0\n";
        let parsed = parse(data).unwrap();
        assert_eq!(parsed.container_version, "1.2");
        assert_eq!(parsed.cipher_name, "AES256");
        assert_eq!(parsed.cipher_version, "1.2");
        assert_eq!(parsed.body, b"YmFzZTY0\n");
    }

    #[test]
    fn parse_legacy_three_field_header() {
        let data = b"$ANSIBLE_VAULT;1.1;AES256\nhexbody\n";
        let parsed = parse(data).unwrap();
        assert_eq!(parsed.container_version, "1.1");
        assert_eq!(parsed.cipher_name, "AES256");
        assert_eq!(parsed.cipher_version, "1.1");
    }

    #[test]
    fn parse_rejects_missing_magic() {
        let err = parse(b"not a vault file\n").unwrap_err();
        assert!(matches!(err, Error::NotVault));
    }

    #[test]
    fn parse_rejects_wrong_field_count_for_1_2() {
        let err = parse(b"$ANSIBLE_VAULT;1.2;AES256\nbody\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn parse_rejects_wrong_field_count_for_legacy() {
        let err = parse(b"$ANSIBLE_VAULT;1.1;AES256;1.1\nbody\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn version_comparison_is_integer_not_lexicographic() {
        assert!(version_at_least("1.10", "1.2"));
        assert!(!version_at_least("1.1", "1.2"));
        assert!(version_at_least("1.2", "1.2"));
    }

    #[test]
    fn parse_handles_empty_body() {
        let parsed = parse(b"$ANSIBLE_VAULT;1.2;AES256;1.2\n").unwrap();
        assert!(parsed.body.is_empty());
    }
}
