//! Nonce encoding
//!
//! ```text
//! preimage = message || decimal(nonce)
//!            ^^^^^^^    ^^^^^^^^^^^^^^
//!            any len    ASCII digits, no sign, no padding, no separator
//! ```
//!
//! Generator and verifier both go through [`encode_nonce`], so the bytes
//! hashed for a given `(message, nonce)` pair are identical on both sides.

use crate::params::MAX_NONCE_DIGITS;

/// Write the decimal digits of `nonce` into `buf`, returning the digit count.
///
/// Digits are right-aligned in the buffer; the encoding is
/// `buf[MAX_NONCE_DIGITS - len..]`.
#[inline(always)]
pub fn encode_nonce(mut nonce: u64, buf: &mut [u8; MAX_NONCE_DIGITS]) -> usize {
    let mut pos = MAX_NONCE_DIGITS;
    loop {
        pos -= 1;
        buf[pos] = b'0' + (nonce % 10) as u8;
        nonce /= 10;
        if nonce == 0 {
            break;
        }
    }
    MAX_NONCE_DIGITS - pos
}

/// Build a one-off preimage
pub fn preimage(message: &[u8], nonce: u64) -> Vec<u8> {
    let mut buffer = Preimage::new(message);
    buffer.with_nonce(nonce).to_vec()
}

/// Reusable preimage buffer.
///
/// Holds the message once and rewrites only the nonce suffix per candidate,
/// so the search loop never reallocates.
#[derive(Clone)]
pub struct Preimage {
    buf: Vec<u8>,
    message_len: usize,
}

impl Preimage {
    pub fn new(message: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(message.len() + MAX_NONCE_DIGITS);
        buf.extend_from_slice(message);
        Self {
            buf,
            message_len: message.len(),
        }
    }

    /// Preimage bytes for `nonce`
    #[inline(always)]
    pub fn with_nonce(&mut self, nonce: u64) -> &[u8] {
        let mut digits = [0u8; MAX_NONCE_DIGITS];
        let len = encode_nonce(nonce, &mut digits);
        self.buf.truncate(self.message_len);
        self.buf.extend_from_slice(&digits[MAX_NONCE_DIGITS - len..]);
        &self.buf
    }
}
