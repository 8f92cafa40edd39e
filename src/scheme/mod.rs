//! ABE scheme drivers and the shared KEM/DEM plumbing.
//!
//! Schemes produce a GT *envelope* through their KEM half; a concatenation
//! KDF (SP 800-56A style, over SHA-256) turns the envelope into an AES-256-GCM
//! key that wraps the actual payload. The CCA variants additionally run the
//! deterministic re-encryption check in [`cca`].

pub mod cca;
pub mod cpabe;
pub mod kpabe;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::bytestring::ByteString;
use crate::error::{Error, Result};
use crate::serial;
use crate::zml::{Gt, PairingCurve};

/// Symmetric key strength in bytes (AES-256).
pub const SYM_KEY_BYTES: usize = 32;
/// AES-GCM nonce length.
pub const NONCE_BYTES: usize = 12;

/// Single-byte scheme identifiers carried in ciphertext containers.
///
/// The container stores the byte uninterpreted; values are stable wire
/// constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchemeId {
    None = 0,
    /// One-pass Diffie-Hellman public-key encryption (external driver).
    PkOpdh = 100,
    CpWaters = 101,
    KpGpsw = 102,
    CpWatersCca = 103,
    KpGpswCca = 104,
    /// ECDSA signatures (external driver).
    PkSig = 105,
}

impl SchemeId {
    pub fn from_byte(b: u8) -> Result<Self> {
        use SchemeId::*;
        Ok(match b {
            0 => None,
            100 => PkOpdh,
            101 => CpWaters,
            102 => KpGpsw,
            103 => CpWatersCca,
            104 => KpGpswCca,
            105 => PkSig,
            _ => return Err(Error::InvalidInput),
        })
    }
}

/// SP 800-56A single-step concatenation KDF over SHA-256:
/// `DKM = H(1 ‖ Z ‖ info) ‖ H(2 ‖ Z ‖ info) ‖ …`, truncated to `key_len`.
pub fn kdf(z: &[u8], key_len: usize, info: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key_len);
    let mut counter: u32 = 1;
    while out.len() < key_len {
        let mut h = Sha256::new();
        h.update(counter.to_be_bytes());
        h.update(z);
        h.update(info);
        out.extend_from_slice(&h.finalize());
        counter += 1;
    }
    out.truncate(key_len);
    out
}

/// Derives the symmetric wrapping key from a GT envelope.
pub(crate) fn envelope_key<E: PairingCurve>(envelope: &Gt<E>) -> Result<[u8; SYM_KEY_BYTES]> {
    let bytes = serial::serialize_gt(envelope, true, true)?;
    let key = kdf(bytes.as_slice(), SYM_KEY_BYTES, b"abe-envelope");
    Ok(key.try_into().expect("kdf returned requested length"))
}

/// AEAD-seals `plaintext`, appending `pack(nonce) ‖ pack(ciphertext)` to
/// `out`.
pub(crate) fn seal_payload<R: RngCore + CryptoRng>(
    out: &mut ByteString,
    key: &[u8; SYM_KEY_BYTES],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<()> {
    let mut nonce = [0u8; NONCE_BYTES];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|_| Error::RandInsufficient)?;
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::InvalidLength)?;
    let ct = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| Error::SerializationFailed)?;
    out.pack_slice(&nonce);
    out.pack_slice(&ct);
    Ok(())
}

/// Inverse of [`seal_payload`], reading from `input` at `index`.
pub(crate) fn open_payload(
    input: &ByteString,
    index: &mut usize,
    key: &[u8; SYM_KEY_BYTES],
) -> Result<Vec<u8>> {
    let nonce = input.smart_unpack(index)?;
    if nonce.len() != NONCE_BYTES {
        return Err(Error::InvalidCiphertextBody);
    }
    let ct = input.smart_unpack(index)?;
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::InvalidLength)?;
    cipher
        .decrypt(Nonce::from_slice(nonce.as_slice()), ct.as_slice())
        .map_err(|_| Error::DecryptionFailed)
}

/// The KEM half of an ABE scheme, in terms of a textual encryption input (an
/// access policy for CP-ABE, an attribute list for KP-ABE) and a
/// deterministic byte encoding of the group-element part.
///
/// The byte encoding must be a pure function of the encryption key, the
/// input, and the bytes drawn from the RNG; the Fujisaki-Okamoto style
/// re-encryption check in [`cca`] compares these bytes verbatim.
pub(crate) trait AbeKem<E: PairingCurve> {
    const SCHEME_CPA: SchemeId;
    const SCHEME_CCA: SchemeId;

    /// Master public key.
    type EncKey;
    /// User decryption key.
    type DecKey;

    fn encaps<R: RngCore + CryptoRng>(
        ek: &Self::EncKey,
        input: &str,
        rng: &mut R,
    ) -> Result<(ByteString, Gt<E>)>;

    fn decaps(dk: &Self::DecKey, input: &str, kem: &ByteString) -> Result<Gt<E>>;
}

/// CPA-mode body: `pack(input) ‖ pack(kem) ‖ pack(nonce) ‖ pack(payload)`.
pub(crate) fn seal_cpa<E: PairingCurve, S: AbeKem<E>, R: RngCore + CryptoRng>(
    ek: &S::EncKey,
    input: &str,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<ByteString> {
    let (kem, envelope) = S::encaps(ek, input, rng)?;
    let key = envelope_key(&envelope)?;
    let mut body = ByteString::new();
    body.pack_slice(input.as_bytes());
    body.smart_pack(&kem);
    seal_payload(&mut body, &key, plaintext, rng)?;
    Ok(body)
}

pub(crate) fn open_cpa<E: PairingCurve, S: AbeKem<E>>(
    dk: &S::DecKey,
    body: &ByteString,
) -> Result<Vec<u8>> {
    let mut index = 0;
    let input = unpack_str(body, &mut index)?;
    let kem = body.smart_unpack(&mut index)?;
    let envelope = S::decaps(dk, &input, &kem)?;
    let key = envelope_key(&envelope)?;
    let plaintext = open_payload(body, &mut index, &key)?;
    if index != body.len() {
        return Err(Error::InvalidCiphertextBody);
    }
    Ok(plaintext)
}

// Length-prefixed element framing shared by key and ciphertext bodies. All
// group elements travel in their standard self-describing encoding.

pub(crate) fn pack_str(out: &mut ByteString, s: &str) {
    out.pack_slice(s.as_bytes());
}

pub(crate) fn unpack_str(input: &ByteString, index: &mut usize) -> Result<String> {
    let raw = input.smart_unpack(index)?;
    String::from_utf8(raw.into_vec()).map_err(|_| Error::InvalidCiphertextBody)
}

pub(crate) fn pack_g1<E: PairingCurve>(out: &mut ByteString, p: &crate::zml::G1<E>) -> Result<()> {
    out.smart_pack(&serial::serialize_g1(p, serial::Format::Auto, true)?);
    Ok(())
}

pub(crate) fn unpack_g1<E: PairingCurve>(
    input: &ByteString,
    index: &mut usize,
) -> Result<crate::zml::G1<E>> {
    let raw = input.smart_unpack(index)?;
    serial::deserialize_g1(raw.as_slice(), true)
}

pub(crate) fn pack_g2<E: PairingCurve>(out: &mut ByteString, p: &crate::zml::G2<E>) -> Result<()> {
    out.smart_pack(&serial::serialize_g2(p, serial::Format::Auto, true)?);
    Ok(())
}

pub(crate) fn unpack_g2<E: PairingCurve>(
    input: &ByteString,
    index: &mut usize,
) -> Result<crate::zml::G2<E>> {
    let raw = input.smart_unpack(index)?;
    serial::deserialize_g2(raw.as_slice(), true)
}

pub(crate) fn pack_gt<E: PairingCurve>(out: &mut ByteString, v: &Gt<E>) -> Result<()> {
    out.smart_pack(&serial::serialize_gt(v, true, true)?);
    Ok(())
}

pub(crate) fn unpack_gt<E: PairingCurve>(input: &ByteString, index: &mut usize) -> Result<Gt<E>> {
    let raw = input.smart_unpack(index)?;
    serial::deserialize_gt(raw.as_slice(), true)
}

pub(crate) fn pack_zp<E: PairingCurve>(out: &mut ByteString, v: &crate::zml::Zp<E>) {
    out.smart_pack(&v.to_bytes());
}

pub(crate) fn unpack_zp<E: PairingCurve>(
    input: &ByteString,
    index: &mut usize,
) -> Result<crate::zml::Zp<E>> {
    let raw = input.smart_unpack(index)?;
    crate::zml::Zp::deserialize(raw.as_slice())
}
