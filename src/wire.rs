//! JSON wire contract for generate/verify
//!
//! Stable request/response shapes for callers outside Rust. Digests travel
//! as lowercase hex sized by their algorithm, and success is an explicit
//! flag: a failed search carries no nonce and no digests.
//!
//! ```text
//! {"message": "hello world", "algorithms": ["MD5"], "difficulty": 12, "nonce_max": 100000000}
//! {"success": true, "outcome": "found", "nonce": 4913, "algorithms": ["MD5"], "digests": ["000f..."], ...}
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::{
    resolve_algorithms, verify_with, Algorithm, Challenge, CostRanking, Digest,
    OrderingStrategy, PowError, PowResult, Result, DEFAULT_NONCE_START,
};

/// Message payload, as UTF-8 text (`message`) or as hex for arbitrary
/// bytes (`message_hex`).
///
/// Exactly one of the two keys must be present; a request carrying both is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageFields", into = "MessageFields")]
pub enum Message {
    Text(String),
    Hex(String),
}

/// Both message keys as they appear on the wire
#[derive(Serialize, Deserialize)]
struct MessageFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_hex: Option<String>,
}

impl TryFrom<MessageFields> for Message {
    type Error = &'static str;

    fn try_from(fields: MessageFields) -> std::result::Result<Self, Self::Error> {
        match (fields.message, fields.message_hex) {
            (Some(text), None) => Ok(Message::Text(text)),
            (None, Some(encoded)) => Ok(Message::Hex(encoded)),
            (Some(_), Some(_)) => Err("`message` and `message_hex` are mutually exclusive"),
            (None, None) => Err("one of `message` or `message_hex` is required"),
        }
    }
}

impl From<Message> for MessageFields {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Self {
                message: Some(text),
                message_hex: None,
            },
            Message::Hex(encoded) => Self {
                message: None,
                message_hex: Some(encoded),
            },
        }
    }
}

impl Message {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Message::Text(text) => Ok(text.as_bytes().to_vec()),
            Message::Hex(encoded) => Ok(hex::decode(encoded)?),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

fn default_nonce_start() -> u64 {
    DEFAULT_NONCE_START
}

/// Generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub message: Message,
    pub algorithms: Vec<String>,
    /// Required leading zero bits
    pub difficulty: u32,
    #[serde(default = "default_nonce_start")]
    pub nonce_start: u64,
    /// Last nonce searched (inclusive); unbounded search is not offered
    pub nonce_max: u64,
}

impl GenerateRequest {
    /// Validate into a challenge; fails before any hashing
    pub fn challenge(&self) -> Result<Challenge> {
        Challenge::from_names(
            self.message.to_bytes()?,
            &self.algorithms,
            self.difficulty,
            self.nonce_start,
            self.nonce_max,
        )
    }
}

/// Generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// `found`, `exhausted` or `cancelled`
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Caller order
    pub algorithms: Vec<String>,
    /// Lowercase hex, same order as `algorithms`; empty unless `success`
    #[serde(default)]
    pub digests: Vec<String>,
    pub difficulty: u32,
    pub attempts: u64,
    pub elapsed_ms: u64,
    /// Whether `nonce` is guaranteed to be the smallest in range
    pub minimal: bool,
}

impl GenerateResponse {
    /// Nonce in the signed form older callers expect: `-1` when nothing was
    /// found (or when the nonce does not fit an `i64`).
    pub fn legacy_nonce(&self) -> i64 {
        match self.nonce {
            Some(nonce) if self.success => i64::try_from(nonce).unwrap_or(-1),
            _ => -1,
        }
    }

    /// Decode digests back into typed values, checking each length against
    /// the algorithm that produced it.
    pub fn decode_digests(&self) -> Result<Vec<(Algorithm, Digest)>> {
        let algorithms = resolve_algorithms(&self.algorithms)?;
        if !self.success {
            return Ok(Vec::new());
        }
        if self.digests.len() != algorithms.len() {
            return Err(PowError::DigestCount {
                expected: algorithms.len(),
                actual: self.digests.len(),
            });
        }

        algorithms
            .into_iter()
            .zip(&self.digests)
            .map(|(algorithm, encoded)| -> Result<(Algorithm, Digest)> {
                let bytes = hex::decode(encoded)?;
                if bytes.len() != algorithm.digest_len() {
                    return Err(PowError::DigestLength {
                        algorithm,
                        expected: algorithm.digest_len(),
                        actual: bytes.len(),
                    });
                }
                let digest = Digest::from_slice(&bytes).ok_or(PowError::DigestLength {
                    algorithm,
                    expected: algorithm.digest_len(),
                    actual: bytes.len(),
                })?;
                Ok((algorithm, digest))
            })
            .collect()
    }
}

impl From<&PowResult> for GenerateResponse {
    fn from(result: &PowResult) -> Self {
        Self {
            success: result.found(),
            outcome: result.outcome.to_string(),
            nonce: result.nonce,
            algorithms: result.algorithms.iter().map(|a| a.name().to_string()).collect(),
            digests: result.digests.iter().map(Digest::to_hex).collect(),
            difficulty: result.difficulty.bits(),
            attempts: result.attempts,
            elapsed_ms: result.elapsed.as_millis() as u64,
            minimal: result.minimal,
        }
    }
}

/// Verification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(flatten)]
    pub message: Message,
    pub nonce: u64,
    pub algorithms: Vec<String>,
    pub difficulty: u32,
}

impl VerifyRequest {
    /// Run the check with the default cost ordering; only malformed
    /// requests are errors
    pub fn evaluate(&self) -> Result<VerifyResponse> {
        self.evaluate_with(&CostRanking)
    }

    /// Run the check with the same ordering the search engine uses
    pub fn evaluate_with(&self, strategy: &dyn OrderingStrategy) -> Result<VerifyResponse> {
        let message = self.message.to_bytes()?;
        let algorithms = resolve_algorithms(&self.algorithms)?;
        Ok(VerifyResponse {
            valid: verify_with(strategy, &message, self.nonce, &algorithms, self.difficulty),
        })
    }
}

/// Verification response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}
