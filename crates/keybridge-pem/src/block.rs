use base64::{engine::general_purpose::STANDARD, Engine};
use zeroize::Zeroizing;

use crate::{error::PemError, header::EncryptionHeader};

const MARKER_FENCE: &str = "-----";

/// A single decoded PEM container.
///
/// Holds the label, the encapsulated headers, the decoded payload and the
/// number of input characters consumed up to the end of the container, so
/// callers can walk concatenated containers (certificate chains).
pub struct Block {
    label: String,
    headers: Vec<(String, String)>,
    der: Zeroizing<Vec<u8>>,
    consumed: usize,
}

// Manually implemented so we don't print the decoded payload, which may hold
// sensitive key material.
impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("label", &self.label)
            .field("headers", &self.headers)
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

impl Block {
    /// The label from the `BEGIN`/`END` lines.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The decoded payload.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Consume the block, keeping only the payload.
    pub fn into_der(self) -> Zeroizing<Vec<u8>> {
        self.der
    }

    /// Number of input characters consumed through the end of this container.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Look up an encapsulated header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the legacy encryption headers, if this block carries them.
    ///
    /// `Ok(None)` means the block is not marked encrypted. A `Proc-Type`
    /// encryption marker without a usable `DEK-Info` is an error.
    pub fn encryption_header(&self) -> Result<Option<EncryptionHeader>, PemError> {
        let Some(proc_type) = self.header("Proc-Type") else {
            return Ok(None);
        };
        // Proc-Type: 4,ENCRYPTED
        let encrypted = proc_type.split(',').nth(1).map(str::trim) == Some("ENCRYPTED");
        if !encrypted {
            return Ok(None);
        }
        let dek_info = self.header("DEK-Info").ok_or(PemError::MalformedHeader)?;
        EncryptionHeader::parse(dek_info).map(Some)
    }
}

/// Decode the first PEM container labeled `label` out of `input`.
///
/// Returns [`PemError::LabelNotFound`] when the input has no complete
/// `BEGIN`/`END` marker pair for the label.
pub fn decode(input: &str, label: &str) -> Result<Block, PemError> {
    let begin = format!("{MARKER_FENCE}BEGIN {label}{MARKER_FENCE}");
    let end = format!("{MARKER_FENCE}END {label}{MARKER_FENCE}");

    let begin_at = input.find(&begin).ok_or(PemError::LabelNotFound)?;
    let body_at = begin_at + begin.len();
    let body = input.get(body_at..).ok_or(PemError::LabelNotFound)?;
    let end_at = body.find(&end).ok_or(PemError::LabelNotFound)?;

    // Consume through the end of the END marker line.
    let after_end = body_at + end_at + end.len();
    let consumed = match input.get(after_end..).and_then(|rest| rest.find('\n')) {
        Some(nl) => after_end + nl + 1,
        None => input.len(),
    };

    let body = body.get(..end_at).ok_or(PemError::MalformedArmor)?;
    let mut headers = Vec::new();
    let mut base64_body = String::with_capacity(body.len());
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Base64 never contains ':', so any such line is an
        // RFC 1421 encapsulated header.
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_owned(), value.trim().to_owned()));
        } else {
            base64_body.push_str(line);
        }
    }

    let der = STANDARD
        .decode(base64_body.as_bytes())
        .map_err(|_| PemError::MalformedArmor)?;

    Ok(Block {
        label: label.to_owned(),
        headers,
        der: Zeroizing::new(der),
        consumed,
    })
}

/// Armor `der` under `label`, wrapping the base64 body at 64 columns.
pub fn encode(label: &str, der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / 64 + 2 * (label.len() + 16));
    out.push_str(MARKER_FENCE);
    out.push_str("BEGIN ");
    out.push_str(label);
    out.push_str(MARKER_FENCE);
    out.push('\n');
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(64));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(MARKER_FENCE);
    out.push_str("END ");
    out.push_str(label);
    out.push_str(MARKER_FENCE);
    out.push('\n');
    out
}

/// Iterator over concatenated containers with the same label.
pub struct Blocks<'a> {
    input: &'a str,
    label: &'a str,
    offset: usize,
}

impl Block {
    /// Iterate every container labeled `label` in `input`, in order.
    pub fn iter<'a>(input: &'a str, label: &'a str) -> Blocks<'a> {
        Blocks {
            input,
            label,
            offset: 0,
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block, PemError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.input.get(self.offset..)?;
        match decode(rest, self.label) {
            Ok(block) => {
                self.offset += block.consumed;
                Some(Ok(block))
            }
            Err(PemError::LabelNotFound) => None,
            Err(e) => {
                self.offset = self.input.len();
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_KEY: &str = include_str!("../resources/rsa512_pkcs1.pem");
    const ENCRYPTED_KEY: &str = include_str!("../resources/rsa512_legacy_encrypted.pem");
    const CERT_CHAIN: &str = include_str!("../resources/cert_chain.pem");

    #[test]
    fn decode_plain_block() {
        let block = decode(RSA_KEY, "RSA PRIVATE KEY").unwrap();
        assert_eq!(block.label(), "RSA PRIVATE KEY");
        assert!(block.headers.is_empty());
        // DER always starts with a SEQUENCE tag here
        assert_eq!(block.der()[0], 0x30);
        assert_eq!(block.consumed(), RSA_KEY.len());
    }

    #[test]
    fn decode_wrong_label() {
        assert_eq!(
            decode(RSA_KEY, "EC PRIVATE KEY").unwrap_err(),
            PemError::LabelNotFound
        );
    }

    #[test]
    fn decode_missing_end_marker() {
        let truncated = RSA_KEY.lines().take(3).collect::<Vec<_>>().join("\n");
        assert_eq!(
            decode(&truncated, "RSA PRIVATE KEY").unwrap_err(),
            PemError::LabelNotFound
        );
    }

    #[test]
    fn decode_corrupt_base64() {
        let corrupt = RSA_KEY.replacen('M', "*", 1);
        assert_eq!(
            decode(&corrupt, "RSA PRIVATE KEY").unwrap_err(),
            PemError::MalformedArmor
        );
    }

    #[test]
    fn encryption_headers_parsed() {
        let block = decode(ENCRYPTED_KEY, "RSA PRIVATE KEY").unwrap();
        assert_eq!(block.header("Proc-Type"), Some("4,ENCRYPTED"));
        let header = block.encryption_header().unwrap().expect("marked encrypted");
        assert_eq!(header.cipher, crate::PemCipher::Aes128Cbc);
        assert_eq!(header.iv.len(), 16);
    }

    #[test]
    fn plain_block_has_no_encryption_header() {
        let block = decode(RSA_KEY, "RSA PRIVATE KEY").unwrap();
        assert!(block.encryption_header().unwrap().is_none());
    }

    #[test]
    fn encryption_marker_without_dek_info() {
        let mangled = ENCRYPTED_KEY.replace("DEK-Info", "X-DEK-Info-Gone");
        let block = decode(&mangled, "RSA PRIVATE KEY").unwrap();
        assert_eq!(
            block.encryption_header().unwrap_err(),
            PemError::MalformedHeader
        );
    }

    #[test]
    fn encode_round_trips() {
        let block = decode(RSA_KEY, "RSA PRIVATE KEY").unwrap();
        let armored = encode("RSA PRIVATE KEY", block.der());
        let again = decode(&armored, "RSA PRIVATE KEY").unwrap();
        assert_eq!(again.der(), block.der());
    }

    #[test]
    fn iterate_certificate_chain() {
        let blocks: Vec<_> = Block::iter(CERT_CHAIN, "CERTIFICATE")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].der(), blocks[1].der());
    }
}
