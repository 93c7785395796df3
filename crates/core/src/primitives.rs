//! Hand-written digest primitives
//!
//! SHA-0 and HAS-160 have no RustCrypto crate, so their compression
//! functions live here. Both are 64-byte-block Merkle-Damgård hashes with a
//! 160-bit state; they differ only in byte order and step function. NT hash
//! is MD4 over a UTF-16LE widening of the input.

use digest::Digest as _;

const BLOCK_SIZE: usize = 64;

/// Length field byte order used by the final padding block
#[derive(Clone, Copy)]
enum LengthOrder {
    BigEndian,
    LittleEndian,
}

/// Feed `data` through `compress` with standard MD padding.
#[inline(always)]
fn md_digest(data: &[u8], order: LengthOrder, mut compress: impl FnMut(&[u8; BLOCK_SIZE])) {
    let (blocks, tail) = data.as_chunks::<BLOCK_SIZE>();
    for block in blocks {
        compress(block);
    }

    let bit_len = (data.len() as u64).wrapping_mul(8);
    let length = match order {
        LengthOrder::BigEndian => bit_len.to_be_bytes(),
        LengthOrder::LittleEndian => bit_len.to_le_bytes(),
    };

    let mut pad = [0u8; BLOCK_SIZE * 2];
    pad[..tail.len()].copy_from_slice(tail);
    pad[tail.len()] = 0x80;
    let total = if tail.len() < 56 { BLOCK_SIZE } else { BLOCK_SIZE * 2 };
    pad[total - 8..total].copy_from_slice(&length);

    let (padding, _) = pad[..total].as_chunks::<BLOCK_SIZE>();
    for block in padding {
        compress(block);
    }
}

const SHA0_INIT: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// SHA-0 (FIPS 180): SHA-1 without the one-bit rotation in the schedule
pub fn sha0(data: &[u8]) -> [u8; 20] {
    let mut state = SHA0_INIT;
    md_digest(data, LengthOrder::BigEndian, |block| {
        sha0_compress(&mut state, block)
    });

    let mut out = [0u8; 20];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

#[inline(always)]
fn sha0_compress(state: &mut [u32; 5], block: &[u8; BLOCK_SIZE]) {
    const K: [u32; 4] = [0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC, 0xCA62C1D6];

    let mut w = [0u32; 80];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for t in 16..80 {
        w[t] = w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16];
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (t, &wt) in w.iter().enumerate() {
        let (f, k) = match t / 20 {
            0 => ((b & c) | (!b & d), K[0]),
            1 => (b ^ c ^ d, K[1]),
            2 => ((b & c) | (b & d) | (c & d), K[2]),
            _ => (b ^ c ^ d, K[3]),
        };
        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(wt);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
}

/// HAS-160 message word order, one row per round
const HAS160_INDEX: [[usize; 20]; 4] = [
    [18, 0, 1, 2, 3, 19, 4, 5, 6, 7, 16, 8, 9, 10, 11, 17, 12, 13, 14, 15],
    [22, 3, 6, 9, 12, 23, 15, 2, 5, 8, 20, 11, 14, 1, 4, 21, 7, 10, 13, 0],
    [26, 12, 5, 14, 7, 27, 0, 9, 2, 11, 24, 4, 13, 6, 15, 25, 8, 1, 10, 3],
    [30, 7, 2, 13, 8, 31, 3, 14, 9, 4, 28, 15, 10, 5, 0, 29, 11, 6, 1, 12],
];

/// Left rotation of A per step (same in every round)
const HAS160_SHIFT: [u32; 20] = [5, 11, 7, 15, 6, 13, 8, 14, 7, 12, 9, 11, 8, 15, 6, 12, 9, 14, 5, 13];

/// Left rotation of B per round
const HAS160_B_SHIFT: [u32; 4] = [10, 17, 25, 30];

const HAS160_K: [u32; 4] = [0x00000000, 0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC];

/// HAS-160 (TTAS.KO-12.0011/R1), the Korean KCDSA hash
pub fn has160(data: &[u8]) -> [u8; 20] {
    let mut state = SHA0_INIT;
    md_digest(data, LengthOrder::LittleEndian, |block| {
        has160_compress(&mut state, block)
    });

    let mut out = [0u8; 20];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[inline(always)]
fn has160_compress(state: &mut [u32; 5], block: &[u8; BLOCK_SIZE]) {
    let mut x = [0u32; 32];
    for (i, word) in block.chunks_exact(4).enumerate() {
        x[i] = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
    }

    // Message expansion: four extra words per round
    x[16] = x[0] ^ x[1] ^ x[2] ^ x[3];
    x[17] = x[4] ^ x[5] ^ x[6] ^ x[7];
    x[18] = x[8] ^ x[9] ^ x[10] ^ x[11];
    x[19] = x[12] ^ x[13] ^ x[14] ^ x[15];
    x[20] = x[3] ^ x[6] ^ x[9] ^ x[12];
    x[21] = x[2] ^ x[5] ^ x[8] ^ x[15];
    x[22] = x[1] ^ x[4] ^ x[11] ^ x[14];
    x[23] = x[0] ^ x[7] ^ x[10] ^ x[13];
    x[24] = x[5] ^ x[7] ^ x[12] ^ x[14];
    x[25] = x[0] ^ x[2] ^ x[9] ^ x[11];
    x[26] = x[4] ^ x[6] ^ x[13] ^ x[15];
    x[27] = x[1] ^ x[3] ^ x[8] ^ x[10];
    x[28] = x[2] ^ x[7] ^ x[8] ^ x[13];
    x[29] = x[3] ^ x[4] ^ x[9] ^ x[14];
    x[30] = x[0] ^ x[5] ^ x[10] ^ x[15];
    x[31] = x[1] ^ x[6] ^ x[11] ^ x[12];

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for round in 0..4 {
        for step in 0..20 {
            let f = match round {
                0 => d ^ (b & (c ^ d)),
                2 => c ^ (b | !d),
                _ => b ^ c ^ d,
            };
            e = e
                .wrapping_add(a.rotate_left(HAS160_SHIFT[step]))
                .wrapping_add(f)
                .wrapping_add(x[HAS160_INDEX[round][step]])
                .wrapping_add(HAS160_K[round]);
            b = b.rotate_left(HAS160_B_SHIFT[round]);

            // Registers shift right by one position each step
            (a, b, c, d, e) = (e, a, b, c, d);
        }
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
}

/// NT (NTLM) hash: MD4 over the input widened to UTF-16LE.
///
/// Each byte becomes one code unit (`byte, 0x00`); this is exact for ASCII
/// input and is applied verbatim to arbitrary bytes.
pub fn nt(data: &[u8]) -> [u8; 16] {
    let mut hasher = md4::Md4::new();
    let mut wide = [0u8; BLOCK_SIZE * 2];
    for chunk in data.chunks(BLOCK_SIZE) {
        for (i, &byte) in chunk.iter().enumerate() {
            wide[i * 2] = byte;
            wide[i * 2 + 1] = 0;
        }
        hasher.update(&wide[..chunk.len() * 2]);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha0_vectors() {
        assert_eq!(
            hex::encode(sha0(b"abc")),
            "0164b8a914cd2a5e74c4f7ff082c4d97f1edf880"
        );
        assert_eq!(
            hex::encode(sha0(b"")),
            "f96cea198ad1dd5617ac084a3d92c6107708c0ef"
        );
    }

    #[test]
    fn test_has160_vectors() {
        assert_eq!(
            hex::encode(has160(b"")),
            "307964ef34151d37c8047adec7ab50f4ff89762d"
        );
        assert_eq!(
            hex::encode(has160(b"abc")),
            "975e810488cf2a3d49838478124afce4b1c78804"
        );
    }

    #[test]
    fn test_nt_vectors() {
        assert_eq!(
            hex::encode(nt(b"password")),
            "8846f7eaee8fb117ad06bdd830b7586c"
        );
        // Empty input degenerates to MD4("")
        assert_eq!(hex::encode(nt(b"")), "31d6cfe0d16ae931b73c59d7e0c089c0");
    }

    #[test]
    fn test_padding_boundaries() {
        // 55, 56 and 64 byte inputs exercise the one- and two-block tails
        for len in [55usize, 56, 63, 64, 65, 119, 120, 128] {
            let data = vec![0x61u8; len];
            assert_eq!(sha0(&data), sha0(&data));
            assert_ne!(sha0(&data), sha0(&data[..len - 1]), "len {len}");
            assert_ne!(has160(&data), has160(&data[..len - 1]), "len {len}");
        }
    }

    #[test]
    fn test_md_padding_feeds_input_blocks() {
        for len in [0usize, 1, 55, 56, 64, 100, 128, 200] {
            let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8 + 1).collect();
            let mut fed = Vec::new();
            md_digest(&data, LengthOrder::BigEndian, |block| fed.extend_from_slice(block));

            assert_eq!(fed.len() % BLOCK_SIZE, 0, "len {len}");
            assert_eq!(&fed[..len], &data[..], "len {len}");
            assert_eq!(fed[len], 0x80, "len {len}");
            assert!(fed[len + 1..fed.len() - 8].iter().all(|&b| b == 0), "len {len}");
            assert_eq!(&fed[fed.len() - 8..], &((len as u64) * 8).to_be_bytes(), "len {len}");
        }
    }

    #[test]
    fn test_nt_long_input_spans_chunks() {
        let long = vec![b'x'; 300];
        let mut wide = Vec::with_capacity(600);
        for &b in &long {
            wide.push(b);
            wide.push(0);
        }
        let expected: [u8; 16] = md4::Md4::digest(&wide).into();
        assert_eq!(nt(&long), expected);
    }
}
