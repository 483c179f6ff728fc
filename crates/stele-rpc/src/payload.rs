//! Client-boundary tagged payload codec.
//!
//! RPC clients spread application-level intent through the opaque `input`
//! bytes of a transaction by prefixing them with a short ASCII tag and a
//! colon, e.g. `batch-register:{...}`. Decoding happens only in clients
//! reading each other's payloads back out of the chain; the ledger core
//! stores and returns the bytes untouched and never interprets them.

/// Longest tag the codec will recognize.
const MAX_TAG_LEN: usize = 32;

/// A decoded client payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedPayload {
    /// A recognized `tag:body` payload
    Tagged {
        /// The application-level intent marker
        tag: String,
        /// The bytes following the separator
        body: Vec<u8>,
    },
    /// Anything else: bytes round-trip untouched
    Raw(Vec<u8>),
}

impl TaggedPayload {
    /// Prefix a body with a tag.
    ///
    /// Returns `None` when the tag would not survive a decode round-trip
    /// (empty, too long, or containing non-tag characters).
    pub fn encode(tag: &str, body: &[u8]) -> Option<Vec<u8>> {
        if !is_valid_tag(tag.as_bytes()) {
            return None;
        }
        let mut out = Vec::with_capacity(tag.len() + 1 + body.len());
        out.extend_from_slice(tag.as_bytes());
        out.push(b':');
        out.extend_from_slice(body);
        Some(out)
    }

    /// Decode payload bytes, falling back to [`TaggedPayload::Raw`] when
    /// no well-formed tag prefix is present.
    pub fn decode(input: &[u8]) -> Self {
        let Some(separator) = input.iter().position(|byte| *byte == b':') else {
            return Self::Raw(input.to_vec());
        };
        let (prefix, rest) = input.split_at(separator);
        if !is_valid_tag(prefix) {
            return Self::Raw(input.to_vec());
        }
        match std::str::from_utf8(prefix) {
            Ok(tag) => Self::Tagged {
                tag: tag.to_string(),
                body: rest[1..].to_vec(),
            },
            Err(_) => Self::Raw(input.to_vec()),
        }
    }

    /// The tag, when one was recognized.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tagged { tag, .. } => Some(tag),
            Self::Raw(_) => None,
        }
    }
}

fn is_valid_tag(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes.len() <= MAX_TAG_LEN
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-' || *b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_round_trip() {
        let encoded = TaggedPayload::encode("batch-register", b"{\"lot\":7}").unwrap();
        match TaggedPayload::decode(&encoded) {
            TaggedPayload::Tagged { tag, body } => {
                assert_eq!(tag, "batch-register");
                assert_eq!(body, b"{\"lot\":7}");
            }
            TaggedPayload::Raw(_) => panic!("expected tagged payload"),
        }
    }

    #[test]
    fn untagged_bytes_round_trip_raw() {
        let blob = vec![0x60, 0x60, 0x3a, 0x00];
        match TaggedPayload::decode(&blob) {
            TaggedPayload::Raw(bytes) => assert_eq!(bytes, blob),
            TaggedPayload::Tagged { .. } => panic!("binary blob must stay raw"),
        }
    }

    #[test]
    fn empty_body_is_still_tagged() {
        let encoded = TaggedPayload::encode("ping", b"").unwrap();
        assert_eq!(TaggedPayload::decode(&encoded).tag(), Some("ping"));
    }

    #[test]
    fn invalid_tags_refuse_to_encode() {
        assert!(TaggedPayload::encode("", b"x").is_none());
        assert!(TaggedPayload::encode("Upper", b"x").is_none());
        assert!(TaggedPayload::encode(&"t".repeat(64), b"x").is_none());
    }
}
