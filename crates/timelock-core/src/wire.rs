//! Named-field representation of a puzzle.
//!
//! A puzzle travels as exactly five fields: `n`, `t`, `a` and `ck` as
//! `0x`-prefixed big-endian hex, `cm` as standard base64. The document type
//! is plain serde, so any serde format can carry it; JSON helpers are
//! provided for convenience.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelockError};
use crate::puzzle::TimelockPuzzle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleDocument {
    pub n: String,
    pub t: String,
    pub a: String,
    pub ck: String,
    pub cm: String,
}

impl From<TimelockPuzzle> for PuzzleDocument {
    fn from(puzzle: TimelockPuzzle) -> Self {
        PuzzleDocument {
            n: encode_hex(puzzle.modulus()),
            t: format!("0x{:x}", puzzle.iterations()),
            a: encode_hex(puzzle.base()),
            ck: encode_hex(puzzle.blinded_key()),
            cm: STANDARD.encode(puzzle.ciphertext()),
        }
    }
}

impl TryFrom<PuzzleDocument> for TimelockPuzzle {
    type Error = TimelockError;

    fn try_from(doc: PuzzleDocument) -> Result<Self> {
        let modulus = decode_hex("n", &doc.n)?;
        let iterations = decode_hex("t", &doc.t)?.to_u64().ok_or_else(|| {
            TimelockError::InvalidPuzzle(format!("field t does not fit in 64 bits: {}", doc.t))
        })?;
        let base = decode_hex("a", &doc.a)?;
        let blinded_key = decode_hex("ck", &doc.ck)?;
        let ciphertext = decode_base64("cm", &doc.cm)?;

        TimelockPuzzle::new(modulus, iterations, base, blinded_key, ciphertext)
    }
}

impl TimelockPuzzle {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TimelockError::InvalidPuzzle(format!("JSON encoding failed: {}", e)))
    }

    /// Parses and validates a JSON puzzle. Nothing is computed on failure.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TimelockError::InvalidPuzzle(e.to_string()))
    }
}

fn encode_hex(value: &Integer) -> String {
    format!("0x{:x}", value)
}

/// Accepts an optional `0x`/`0X` prefix followed by at least one hex digit.
fn decode_hex(field: &str, text: &str) -> Result<Integer> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TimelockError::InvalidPuzzle(format!(
            "field {} is not a hex integer: {:?}",
            field, text
        )));
    }

    Integer::from_str_radix(digits, 16)
        .map_err(|e| TimelockError::InvalidPuzzle(format!("field {}: {}", field, e)))
}

// Line-wrapping base64 encoders insert newlines, which are skipped here.
fn decode_base64(field: &str, text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| TimelockError::InvalidPuzzle(format!("field {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimelockPuzzle {
        TimelockPuzzle::new(
            Integer::from(3233),
            20,
            Integer::from(42),
            Integer::from(255),
            b"ciphertext".to_vec(),
        )
        .unwrap()
    }

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "n": "0xca1",
            "t": "0x14",
            "a": "0x2a",
            "ck": "0xff",
            "cm": "Y2lwaGVydGV4dA==",
        })
    }

    #[test]
    fn test_document_field_encoding() {
        let doc = PuzzleDocument::from(sample());
        assert_eq!(doc.n, "0xca1");
        assert_eq!(doc.t, "0x14");
        assert_eq!(doc.a, "0x2a");
        assert_eq!(doc.ck, "0xff");
        assert_eq!(doc.cm, "Y2lwaGVydGV4dA==");
    }

    #[test]
    fn test_json_has_exactly_five_fields() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(value, sample_json());
    }

    #[test]
    fn test_from_json_parses_document() {
        let puzzle = TimelockPuzzle::from_json(&sample_json().to_string()).unwrap();
        assert_eq!(puzzle, sample());
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("ck");

        let err = TimelockPuzzle::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, TimelockError::InvalidPuzzle(ref msg) if msg.contains("ck")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut value = sample_json();
        value["iv"] = serde_json::json!("0x00");
        assert!(TimelockPuzzle::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_non_hex_modulus_rejected() {
        for bad in ["0xzz", "0x", "", "-0x10", "0x-10", "12g4"] {
            let mut value = sample_json();
            value["n"] = serde_json::json!(bad);
            assert!(
                matches!(
                    TimelockPuzzle::from_json(&value.to_string()),
                    Err(TimelockError::InvalidPuzzle(_))
                ),
                "accepted n={:?}",
                bad
            );
        }
    }

    #[test]
    fn test_hex_without_prefix_accepted() {
        let mut value = sample_json();
        value["n"] = serde_json::json!("CA1");
        value["t"] = serde_json::json!("0X14");
        assert_eq!(TimelockPuzzle::from_json(&value.to_string()).unwrap(), sample());
    }

    #[test]
    fn test_zero_and_oversized_t_rejected() {
        let mut value = sample_json();
        value["t"] = serde_json::json!("0x0");
        assert!(TimelockPuzzle::from_json(&value.to_string()).is_err());

        value["t"] = serde_json::json!("0x10000000000000000");
        assert!(TimelockPuzzle::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_wrapped_base64_accepted() {
        let mut value = sample_json();
        value["cm"] = serde_json::json!("Y2lwaGVy\ndGV4dA==\n");
        assert_eq!(TimelockPuzzle::from_json(&value.to_string()).unwrap(), sample());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let mut value = sample_json();
        value["cm"] = serde_json::json!("not*base64");
        assert!(matches!(
            TimelockPuzzle::from_json(&value.to_string()),
            Err(TimelockError::InvalidPuzzle(_))
        ));
    }
}
