//! Hash registry
//!
//! One entry per [`Algorithm`], indexed by discriminant. The table is
//! immutable and shared across every search; the name index is built on
//! first lookup and never changes afterwards.

use std::collections::HashMap;

use blake2::digest::consts::{U16, U20, U32, U48};
use digest::{ExtendableOutput, Update, XofReader};
use once_cell::sync::Lazy;

use crate::algorithm::{Algorithm, Family};
use crate::digest::Digest;
use crate::params::ALGORITHM_COUNT;
use crate::preimage::preimage;
use crate::primitives;

/// Pure digest function over a complete preimage
pub type HashFn = fn(&[u8]) -> Digest;

/// Registry entry
#[derive(Debug)]
pub struct AlgorithmSpec {
    pub algorithm: Algorithm,
    /// Canonical, case-sensitive identifier
    pub name: &'static str,
    /// Extra identifiers accepted on input
    pub aliases: &'static [&'static str],
    pub family: Family,
    /// Output length in bytes
    pub digest_len: usize,
    pub compute: HashFn,
}

impl AlgorithmSpec {
    pub fn digest_bits(&self) -> u32 {
        self.digest_len as u32 * 8
    }
}

#[inline(always)]
fn rust_crypto<D: digest::Digest>(input: &[u8]) -> Digest {
    Digest::copy_from(&D::digest(input))
}

#[inline(always)]
fn shake<X: Default + Update + ExtendableOutput, const N: usize>(input: &[u8]) -> Digest {
    let mut hasher = X::default();
    hasher.update(input);
    let mut reader = hasher.finalize_xof();
    Digest::with_len(N, |out| reader.read(out))
}

fn blake3(input: &[u8]) -> Digest {
    Digest::copy_from(blake3::hash(input).as_bytes())
}

fn sha0(input: &[u8]) -> Digest {
    Digest::copy_from(&primitives::sha0(input))
}

fn has160(input: &[u8]) -> Digest {
    Digest::copy_from(&primitives::has160(input))
}

fn nt(input: &[u8]) -> Digest {
    Digest::copy_from(&primitives::nt(input))
}

macro_rules! entry {
    ($algorithm:ident, $name:literal, [$($alias:literal),*], $family:ident, $len:literal, $compute:expr) => {
        AlgorithmSpec {
            algorithm: Algorithm::$algorithm,
            name: $name,
            aliases: &[$($alias),*],
            family: Family::$family,
            digest_len: $len,
            compute: $compute,
        }
    };
}

static ENTRIES: [AlgorithmSpec; ALGORITHM_COUNT] = [
    entry!(Md4, "MD4", [], Md, 16, rust_crypto::<md4::Md4>),
    entry!(Nt, "NT", ["NT Hash"], Md, 16, nt),
    entry!(Md5, "MD5", [], Md, 16, rust_crypto::<md5::Md5>),
    entry!(Blake3, "BLAKE3", [], Blake3, 32, blake3),
    entry!(Has160, "HAS-160", [], Has, 20, has160),
    entry!(Ripemd256, "RIPEMD-256", [], Ripemd, 32, rust_crypto::<ripemd::Ripemd256>),
    entry!(Ripemd128, "RIPEMD-128", [], Ripemd, 16, rust_crypto::<ripemd::Ripemd128>),
    entry!(Blake2s128, "BLAKE2s-128", [], Blake2s, 16, rust_crypto::<blake2::Blake2s<U16>>),
    entry!(Blake2s160, "BLAKE2s-160", [], Blake2s, 20, rust_crypto::<blake2::Blake2s<U20>>),
    entry!(Blake2s256, "BLAKE2s-256", [], Blake2s, 32, rust_crypto::<blake2::Blake2s<U32>>),
    entry!(Blake2b512, "BLAKE2b-512", [], Blake2b, 64, rust_crypto::<blake2::Blake2b512>),
    entry!(Ripemd320, "RIPEMD-320", [], Ripemd, 40, rust_crypto::<ripemd::Ripemd320>),
    entry!(Blake2b128, "BLAKE2b-128", [], Blake2b, 16, rust_crypto::<blake2::Blake2b<U16>>),
    entry!(Blake2b384, "BLAKE2b-384", [], Blake2b, 48, rust_crypto::<blake2::Blake2b<U48>>),
    entry!(Ripemd160, "RIPEMD-160", [], Ripemd, 20, rust_crypto::<ripemd::Ripemd160>),
    entry!(Blake2b160, "BLAKE2b-160", [], Blake2b, 20, rust_crypto::<blake2::Blake2b<U20>>),
    entry!(Blake2b256, "BLAKE2b-256", [], Blake2b, 32, rust_crypto::<blake2::Blake2b<U32>>),
    entry!(Sha2_256, "SHA2-256", ["SHA256"], Sha2, 32, rust_crypto::<sha2::Sha256>),
    entry!(Sha0, "SHA-0", [], Sha1, 20, sha0),
    entry!(Sha1, "SHA-1", ["SHA1"], Sha1, 20, rust_crypto::<sha1::Sha1>),
    entry!(Sha2_224, "SHA2-224", [], Sha2, 28, rust_crypto::<sha2::Sha224>),
    entry!(Sha2_512, "SHA2-512", [], Sha2, 64, rust_crypto::<sha2::Sha512>),
    entry!(Sha2_384, "SHA2-384", [], Sha2, 48, rust_crypto::<sha2::Sha384>),
    entry!(Whirlpool, "Whirlpool", [], Whirlpool, 64, rust_crypto::<whirlpool::Whirlpool>),
    entry!(Sha3_224, "SHA3-224", [], Sha3, 28, rust_crypto::<sha3::Sha3_224>),
    entry!(Shake256, "SHAKE-256", [], Shake, 64, shake::<sha3::Shake256, 64>),
    entry!(Sha3_384, "SHA3-384", [], Sha3, 48, rust_crypto::<sha3::Sha3_384>),
    entry!(Shake128, "SHAKE-128", [], Shake, 32, shake::<sha3::Shake128, 32>),
    entry!(Keccak384, "Keccak-384", [], Keccak, 48, rust_crypto::<sha3::Keccak384>),
    entry!(Keccak256, "Keccak-256", [], Keccak, 32, rust_crypto::<sha3::Keccak256>),
    entry!(Sha3_256, "SHA3-256", [], Sha3, 32, rust_crypto::<sha3::Sha3_256>),
    entry!(Sha3_512, "SHA3-512", [], Sha3, 64, rust_crypto::<sha3::Sha3_512>),
    entry!(Keccak512, "Keccak-512", [], Keccak, 64, rust_crypto::<sha3::Keccak512>),
    entry!(Keccak224, "Keccak-224", [], Keccak, 28, rust_crypto::<sha3::Keccak224>),
    entry!(Md2, "MD2", [], Md, 16, rust_crypto::<md2::Md2>),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static AlgorithmSpec>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(ALGORITHM_COUNT * 2);
    for spec in ENTRIES.iter() {
        index.insert(spec.name, spec);
        for alias in spec.aliases {
            index.insert(*alias, spec);
        }
    }
    tracing::trace!(names = index.len(), "algorithm name index built");
    index
});

/// Registry entry for an algorithm
#[inline(always)]
pub fn spec(algorithm: Algorithm) -> &'static AlgorithmSpec {
    &ENTRIES[algorithm as usize]
}

/// Case-sensitive lookup by canonical identifier or alias
pub fn lookup(name: &str) -> Option<&'static AlgorithmSpec> {
    BY_NAME.get(name).copied()
}

/// All registry entries, cheapest first
pub fn entries() -> &'static [AlgorithmSpec] {
    &ENTRIES
}

/// Digest of `message || decimal(nonce)` under `algorithm`
pub fn compute(algorithm: Algorithm, message: &[u8], nonce: u64) -> Digest {
    algorithm.compute(&preimage(message, nonce))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(algorithm: Algorithm, input: &[u8]) -> String {
        algorithm.compute(input).to_hex()
    }

    #[test]
    fn test_table_matches_enum() {
        for (i, spec) in entries().iter().enumerate() {
            assert_eq!(spec.algorithm as usize, i, "{}", spec.name);
        }
        assert_eq!(entries().len(), Algorithm::ALL.len());
    }

    #[test]
    fn test_published_lengths_match_output() {
        for algorithm in Algorithm::ALL {
            let digest = algorithm.compute(b"length check");
            assert_eq!(digest.len(), algorithm.digest_len(), "{algorithm}");
        }
    }

    #[test]
    fn test_md_family_vectors() {
        assert_eq!(hex_of(Algorithm::Md2, b""), "8350e5a3e24c153df2275c9f80692773");
        assert_eq!(hex_of(Algorithm::Md4, b""), "31d6cfe0d16ae931b73c59d7e0c089c0");
        assert_eq!(hex_of(Algorithm::Md5, b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hex_of(Algorithm::Nt, b"password"), "8846f7eaee8fb117ad06bdd830b7586c");
    }

    #[test]
    fn test_sha_family_vectors() {
        assert_eq!(
            hex_of(Algorithm::Sha0, b"abc"),
            "0164b8a914cd2a5e74c4f7ff082c4d97f1edf880"
        );
        assert_eq!(
            hex_of(Algorithm::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex_of(Algorithm::Sha2_224, b"abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
        assert_eq!(
            hex_of(Algorithm::Sha2_256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex_of(Algorithm::Sha2_384, b"abc"),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            hex_of(Algorithm::Sha2_512, b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_keccak_family_vectors() {
        assert_eq!(
            hex_of(Algorithm::Sha3_224, b""),
            "6b4e03423667dbb73b6e15454f0eb1abd4597f9a1b078e3f5b5a6bc7"
        );
        assert_eq!(
            hex_of(Algorithm::Sha3_256, b""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            hex_of(Algorithm::Sha3_512, b""),
            "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
             15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
        );
        assert_eq!(
            hex_of(Algorithm::Keccak256, b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex_of(Algorithm::Shake128, b""),
            "7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26"
        );
        assert_eq!(
            hex_of(Algorithm::Shake256, b""),
            "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f\
             d75dc4ddd8c0f200cb05019d67b592f6fc821c49479ab48640292eacb3b7c4be"
        );
    }

    #[test]
    fn test_ripemd_family_vectors() {
        assert_eq!(
            hex_of(Algorithm::Ripemd128, b""),
            "cdf26213a150dc3ecb610f18f6b38b46"
        );
        assert_eq!(
            hex_of(Algorithm::Ripemd160, b""),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
        assert_eq!(
            hex_of(Algorithm::Ripemd256, b""),
            "02ba4c4e5f8ecd1877fc52d64d30e37a2d9774fb1e5d026380ae0168e3c5522d"
        );
        assert_eq!(
            hex_of(Algorithm::Ripemd320, b""),
            "22d65d5661536cdc75c1fdf5c6de7b41b9f27325ebc61e8557177d705a0ec880\
             151c3a32a00899b8"
        );
    }

    #[test]
    fn test_blake_and_whirlpool_vectors() {
        assert_eq!(
            hex_of(Algorithm::Blake2b512, b""),
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
             d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce"
        );
        assert_eq!(
            hex_of(Algorithm::Blake2s256, b""),
            "69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9"
        );
        assert_eq!(
            hex_of(Algorithm::Blake3, b""),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(
            hex_of(Algorithm::Whirlpool, b""),
            "19fa61d75522a4669b44e39c1d2e1726c530232130d407f89afee0964997f7a7\
             3e83be698b288febcf88e3e03c4f0757ea8964e59b63d93708b138cc42a66eb3"
        );
    }

    #[test]
    fn test_truncated_blake2_vectors() {
        assert_eq!(hex_of(Algorithm::Blake2b128, b"abc"), "cf4ab791c62b8d2b2109c90275287816");
        assert_eq!(
            hex_of(Algorithm::Blake2b160, b"abc"),
            "384264f676f39536840523f284921cdc68b6846b"
        );
        assert_eq!(
            hex_of(Algorithm::Blake2b256, b"abc"),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
        assert_eq!(
            hex_of(Algorithm::Blake2b384, b"abc"),
            "6f56a82c8e7ef526dfe182eb5212f7db9df1317e57815dbda46083fc30f54ee6\
             c66ba83be64b302d7cba6ce15bb556f4"
        );
        assert_eq!(hex_of(Algorithm::Blake2s128, b"abc"), "aa4938119b1dc7b87cbad0ffd200d0ae");
        assert_eq!(
            hex_of(Algorithm::Blake2s160, b"abc"),
            "5ae3b99be29b01834c3b508521ede60438f8de17"
        );
    }

    #[test]
    fn test_keccak_and_sha3_384_vectors() {
        assert_eq!(
            hex_of(Algorithm::Keccak224, b"abc"),
            "c30411768506ebe1c2871b1ee2e87d38df342317300a9b97a95ec6a8"
        );
        assert_eq!(
            hex_of(Algorithm::Keccak384, b"abc"),
            "f7df1165f033337be098e7d288ad6a2f74409d7a60b49c36642218de161b1f99\
             f8c681e4afaf31a34db29fb763e3c28e"
        );
        assert_eq!(
            hex_of(Algorithm::Keccak512, b"abc"),
            "18587dc2ea106b9a1563e32b3312421ca164c7f1f07bc922a9c83d77cea3a1e5\
             d0c69910739025372dc14ac9642629379540c17e2a65b19d77aa511a9d00bb96"
        );
        assert_eq!(
            hex_of(Algorithm::Sha3_384, b"abc"),
            "ec01498288516fc926459f58e2c6ad8df9b473cb0fc08c2596da7cf0e49be4b2\
             98d88cea927ac7f539f1edf228376d25"
        );
    }

    #[test]
    fn test_truncated_blake2_is_parameterized_not_sliced() {
        // The output length is part of the BLAKE2 parameter block
        let full = Algorithm::Blake2b512.compute(b"abc");
        let short = Algorithm::Blake2b256.compute(b"abc");
        assert_ne!(&full.as_bytes()[..32], short.as_bytes());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("Whirlpool").map(|s| s.algorithm), Some(Algorithm::Whirlpool));
        assert_eq!(lookup("NT Hash").map(|s| s.algorithm), Some(Algorithm::Nt));
        assert!(lookup("whirlpool").is_none());
    }
}
