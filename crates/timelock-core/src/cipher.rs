//! AES-128-CFB payload encryption under a fixed-width key.
//!
//! There is no authentication tag: decrypting with the wrong key, or a
//! tampered ciphertext, yields garbage rather than an error.

use aes::Aes128;
use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::Order;
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes128CfbEnc = cfb_mode::Encryptor<Aes128>;
type Aes128CfbDec = cfb_mode::Decryptor<Aes128>;

/// Key length of the payload cipher in bytes.
pub const KEY_LEN: usize = 16;

const BLOCK_LEN: usize = 16;

// Every key encrypts exactly one payload, so the IV is fixed.
const ZERO_IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        SymmetricKey(bytes)
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        SymmetricKey(bytes)
    }

    /// Canonical key encoding of a non-negative integer.
    ///
    /// The value is written big-endian and left-padded with zero bytes to
    /// `KEY_LEN`; a value wider than `KEY_LEN` bytes keeps only its
    /// `KEY_LEN` least significant bytes.
    pub fn from_integer(value: &Integer) -> Self {
        let mut digits = value.to_digits::<u8>(Order::MsfBe);
        let mut bytes = [0u8; KEY_LEN];
        if digits.len() >= KEY_LEN {
            bytes.copy_from_slice(&digits[digits.len() - KEY_LEN..]);
        } else {
            bytes[KEY_LEN - digits.len()..].copy_from_slice(&digits);
        }
        digits.zeroize();
        SymmetricKey(bytes)
    }

    pub fn to_integer(&self) -> Integer {
        Integer::from_digits(&self.0, Order::MsfBe)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut buf = plaintext.to_vec();
        Aes128CfbEnc::new(&self.0.into(), &ZERO_IV.into()).encrypt(&mut buf);
        buf
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = ciphertext.to_vec();
        Aes128CfbDec::new(&self.0.into(), &ZERO_IV.into()).decrypt(&mut buf);
        buf
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hex_bytes(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_cfb128_known_answer() {
        // NIST SP 800-38A, F.3.13 CFB128-AES128.Encrypt, first segment
        let key: [u8; 16] = hex_bytes("2b7e151628aed2a6abf7158809cf4f3c")
            .try_into()
            .unwrap();
        let iv: [u8; 16] = hex_bytes("000102030405060708090a0b0c0d0e0f")
            .try_into()
            .unwrap();
        let mut buf = hex_bytes("6bc1bee22e409f96e93d7e117393172a");

        Aes128CfbEnc::new(&key.into(), &iv.into()).encrypt(&mut buf);
        assert_eq!(buf, hex_bytes("3b3fd92eb72dad20333449f8e83cfb4a"));
    }

    #[test]
    fn test_encrypt_decrypt_arbitrary_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let key = SymmetricKey::generate(&mut rng);

        for len in [0usize, 1, 15, 16, 17, 100] {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let ciphertext = key.encrypt(&plaintext);
            assert_eq!(ciphertext.len(), plaintext.len(), "CFB must not pad");
            assert_eq!(key.decrypt(&ciphertext), plaintext);
        }
    }

    #[test]
    fn test_wrong_key_yields_garbage() {
        let key = SymmetricKey::from_bytes([1u8; KEY_LEN]);
        let other = SymmetricKey::from_bytes([2u8; KEY_LEN]);
        let plaintext = b"attack at dawn";

        let garbage = other.decrypt(&key.encrypt(plaintext));
        assert_eq!(garbage.len(), plaintext.len());
        assert_ne!(garbage.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn test_from_integer_pads_leading_zeros() {
        let key = SymmetricKey::from_integer(&Integer::from(0x0102u32));
        let mut expected = [0u8; KEY_LEN];
        expected[KEY_LEN - 2] = 0x01;
        expected[KEY_LEN - 1] = 0x02;
        assert_eq!(key.as_bytes(), &expected);

        assert_eq!(SymmetricKey::from_integer(&Integer::new()).as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn test_from_integer_keeps_low_bytes_of_wide_values() {
        let wide = (Integer::from(0xABu32) << 128u32) + 0x0Fu32;
        let key = SymmetricKey::from_integer(&wide);
        let mut expected = [0u8; KEY_LEN];
        expected[KEY_LEN - 1] = 0x0F;
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_integer_round_trip_with_zero_top_byte() {
        let mut bytes = [0x5Au8; KEY_LEN];
        bytes[0] = 0;
        bytes[1] = 0;
        let key = SymmetricKey::from_bytes(bytes);
        assert_eq!(SymmetricKey::from_integer(&key.to_integer()), key);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SymmetricKey::from_bytes([0xEEu8; KEY_LEN]);
        assert_eq!(format!("{:?}", key), "SymmetricKey(..)");
    }
}
