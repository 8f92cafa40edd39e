//! Fujisaki-Okamoto style CCA transform over any [`AbeKem`].
//!
//! Encryption draws a random 32-byte seed, derives the KEM's coins as
//! `SHA-256(seed ‖ input)` and replays them through a seeded RNG, so the
//! group-element part of the ciphertext is a deterministic function of
//! `(seed, input)`. The seed travels masked by a KDF of the envelope; a
//! decryptor recovers it, re-encrypts deterministically and compares the
//! bytes in constant time. Any tampering with the KEM part flips the
//! comparison and yields [`Error::VerificationFailed`] without releasing a
//! payload.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::{kdf, open_payload, seal_payload, unpack_str, AbeKem, SYM_KEY_BYTES};
use crate::bytestring::ByteString;
use crate::error::{Error, Result};
use crate::serial;
use crate::zml::{Gt, PairingCurve};

const SEED_BYTES: usize = 32;

fn coins(seed: &[u8; SEED_BYTES], input: &str) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(seed);
    h.update(input.as_bytes());
    h.finalize().into()
}

fn seed_mask<E: PairingCurve>(envelope: &Gt<E>) -> Result<Vec<u8>> {
    let bytes = serial::serialize_gt(envelope, true, true)?;
    Ok(kdf(bytes.as_slice(), SEED_BYTES, b"fo-seed-mask"))
}

fn payload_key<E: PairingCurve>(
    envelope: &Gt<E>,
    seed: &[u8; SEED_BYTES],
) -> Result<[u8; SYM_KEY_BYTES]> {
    let mut z = serial::serialize_gt(envelope, true, true)?.into_vec();
    z.extend_from_slice(seed);
    let key = kdf(&z, SYM_KEY_BYTES, b"fo-payload-key");
    Ok(key.try_into().expect("kdf returned requested length"))
}

/// CCA-mode body:
/// `pack(input) ‖ pack(kem) ‖ pack(masked seed) ‖ pack(nonce) ‖ pack(payload)`.
pub(crate) fn seal<E: PairingCurve, S: AbeKem<E>, R: RngCore + CryptoRng>(
    ek: &S::EncKey,
    input: &str,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<ByteString> {
    let mut seed = [0u8; SEED_BYTES];
    rng.try_fill_bytes(&mut seed)
        .map_err(|_| Error::RandInsufficient)?;

    let mut det = StdRng::from_seed(coins(&seed, input));
    let (kem, envelope) = S::encaps(ek, input, &mut det)?;

    let mask = seed_mask(&envelope)?;
    let masked: Vec<u8> = seed.iter().zip(mask.iter()).map(|(s, m)| s ^ m).collect();
    let key = payload_key(&envelope, &seed)?;

    let mut body = ByteString::new();
    body.pack_slice(input.as_bytes());
    body.smart_pack(&kem);
    body.pack_slice(&masked);
    seal_payload(&mut body, &key, plaintext, rng)?;
    Ok(body)
}

/// Inverse of [`seal`], running the deterministic re-encryption check.
pub(crate) fn open<E: PairingCurve, S: AbeKem<E>>(
    ek: &S::EncKey,
    dk: &S::DecKey,
    body: &ByteString,
) -> Result<Vec<u8>> {
    let mut index = 0;
    let input = unpack_str(body, &mut index)?;
    let kem = body.smart_unpack(&mut index)?;
    let masked = body.smart_unpack(&mut index)?;
    if masked.len() != SEED_BYTES {
        return Err(Error::InvalidCiphertextBody);
    }

    let envelope = S::decaps(dk, &input, &kem)?;
    let mask = seed_mask(&envelope)?;
    let mut seed = [0u8; SEED_BYTES];
    for (i, (c, m)) in masked.as_slice().iter().zip(mask.iter()).enumerate() {
        seed[i] = c ^ m;
    }

    // Replay the encryption with the recovered seed.
    let mut det = StdRng::from_seed(coins(&seed, &input));
    let (kem2, _) = S::encaps(ek, &input, &mut det)?;
    if !bool::from(kem2.as_slice().ct_eq(kem.as_slice())) {
        return Err(Error::VerificationFailed);
    }

    let key = payload_key(&envelope, &seed)?;
    let plaintext = open_payload(body, &mut index, &key)?;
    if index != body.len() {
        return Err(Error::InvalidCiphertextBody);
    }
    Ok(plaintext)
}
