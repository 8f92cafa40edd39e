//! Backend-agnostic scalar and group arithmetic over pairing-friendly curves.
//!
//! Everything above this layer speaks [`Zp`], [`G1`], [`G2`] and [`Gt`]; which
//! arkworks backend provides the arithmetic is decided by the [`PairingCurve`]
//! type parameter and never leaks through public signatures. Mixing elements
//! of different curves is a compile error.
//!
//! Random sampling is a deterministic function of the bytes drawn from the
//! *caller-supplied* RNG: [`Zp::random`] reads `ceil(bits(r)/8)` bytes and
//! reduces the big-endian integer mod r, and [`G1::random`]/[`G2::random`]
//! multiply the standard generator by such a scalar. Seeded RNGs therefore
//! reproduce byte-identical elements on every backend, which the CCA
//! transform's re-encryption check relies on.

use std::cmp::Ordering;
use std::fmt;

use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, Group};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::bytestring::ByteString;
use crate::curve::CurveId;
use crate::error::{Error, Result};

mod backend;
pub mod bls12_381;
pub mod bn254;
mod context;

pub use context::{BpGroup, PairingContext};

/// Wire tag for a serialized scalar.
pub(crate) const ELEMENT_ZP: u8 = 0xB1;

/// One pairing backend: an arkworks engine plus the coordinate, tower and
/// hashing access the serializer and hash-to-curve need.
///
/// Implementations live in [`bls12_381`] and [`bn254`]; higher layers are
/// generic over this trait only.
pub trait PairingCurve: Pairing {
    /// Registry wire identifier of this curve.
    const ID: CurveId;
    /// Bytes per base-field element in the standard encodings.
    const FIELD_SIZE: usize;

    /// The quadratic extension the G2 coordinates live in.
    type Fp2: Field + Ord + Copy;

    /// Affine coordinates of a G1 point, `None` for the identity.
    fn g1_xy(p: &Self::G1Affine) -> Option<(Self::BaseField, Self::BaseField)>;
    /// Builds a G1 point from affine coordinates, rejecting points off the
    /// curve or outside the prime-order subgroup.
    fn g1_from_xy(x: Self::BaseField, y: Self::BaseField) -> Result<Self::G1Affine>;
    /// Decompresses a G1 point from its x coordinate; `greatest` selects the
    /// lexicographically larger square root.
    fn g1_from_x(x: Self::BaseField, greatest: bool) -> Result<Self::G1Affine>;

    /// Affine coordinates of a G2 point, `None` for the identity.
    fn g2_xy(p: &Self::G2Affine) -> Option<(Self::Fp2, Self::Fp2)>;
    fn g2_from_xy(x: Self::Fp2, y: Self::Fp2) -> Result<Self::G2Affine>;
    fn g2_from_x(x: Self::Fp2, greatest: bool) -> Result<Self::G2Affine>;

    /// Splits an Fp2 element into `(c0, c1)` with `v = c0 + c1·u`.
    fn fp2_parts(v: &Self::Fp2) -> (Self::BaseField, Self::BaseField);
    fn fp2_from_parts(c0: Self::BaseField, c1: Self::BaseField) -> Self::Fp2;
    /// The non-residue ξ with `Fp6 = Fp2[v]/(v³ − ξ)`.
    fn fp6_nonresidue() -> Self::Fp2;

    /// Coefficients `g0..g5` of a target-field element in the sextic basis
    /// `Fp12 = Fp2[w]/(w⁶ − ξ)`.
    fn gt_coeffs(v: &Self::TargetField) -> [Self::Fp2; 6];
    fn gt_from_coeffs(c: [Self::Fp2; 6]) -> Self::TargetField;

    /// Deterministic map of a 32-byte digest onto the prime-order subgroup of
    /// G1 (hash-and-check with an embedded retry counter).
    fn map_to_g1(digest: &[u8; 32]) -> Self::G1Affine;
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// An element of the scalar field of order r.
///
/// Every observable value is canonical in `[0, r)`; all arithmetic is modular.
/// The ordering is numeric, never lexicographic on any textual form.
pub struct Zp<E: PairingCurve> {
    pub(crate) v: E::ScalarField,
}

impl<E: PairingCurve> Zp<E> {
    pub fn zero() -> Self {
        Zp {
            v: E::ScalarField::zero(),
        }
    }

    pub fn one() -> Self {
        Zp {
            v: E::ScalarField::one(),
        }
    }

    pub fn from_u32(v: u32) -> Self {
        Zp {
            v: E::ScalarField::from(u64::from(v)),
        }
    }

    pub fn from_u64(v: u64) -> Self {
        Zp {
            v: E::ScalarField::from(v),
        }
    }

    /// Interprets big-endian bytes as an integer reduced mod r.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Zp {
            v: E::ScalarField::from_be_bytes_mod_order(bytes),
        }
    }

    /// Parses a (optionally `0x`-prefixed) hex string, reduced mod r.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let padded;
        let s = if s.len() % 2 == 1 {
            padded = format!("0{s}");
            &padded
        } else {
            s
        };
        let bytes = hex::decode(s).map_err(|_| Error::InvalidInput)?;
        Ok(Self::from_bytes_be(&bytes))
    }

    /// Samples a scalar from the supplied RNG and nothing else.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let len = (E::ScalarField::MODULUS_BIT_SIZE as usize + 7) / 8;
        let mut buf = vec![0u8; len];
        rng.try_fill_bytes(&mut buf)
            .map_err(|_| Error::RandInsufficient)?;
        Ok(Self::from_bytes_be(&buf))
    }

    pub fn is_zero(&self) -> bool {
        self.v.is_zero()
    }

    /// The representative is canonical in `[0, r)` by construction.
    pub fn is_member(&self) -> bool {
        true
    }

    /// Modular inverse; zero has none.
    pub fn inverse(&self) -> Result<Self> {
        self.v
            .inverse()
            .map(|v| Zp { v })
            .ok_or(Error::DivideByZero)
    }

    /// `self / rhs`, failing on a zero divisor.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        Ok(Zp {
            v: self.v * rhs.inverse()?.v,
        })
    }

    /// `self^e` with the exponent read as an integer in `[0, r)`.
    pub fn pow(&self, e: &Self) -> Self {
        Zp {
            v: self.v.pow(e.v.into_bigint()),
        }
    }

    /// Left shift by `k` bits (multiplication by 2^k mod r).
    pub fn shl(&self, k: u32) -> Self {
        Zp {
            v: self.v * E::ScalarField::from(2u64).pow([u64::from(k)]),
        }
    }

    /// Right shift by `k` bits (floor division of the representative by 2^k).
    pub fn shr(&self, k: u32) -> Self {
        let mut bytes = self.v.into_bigint().to_bytes_be();
        shr_be_bytes(&mut bytes, k);
        Self::from_bytes_be(&bytes)
    }

    /// Minimal big-endian bytes: no leading zeros, and a single zero byte for
    /// the value 0.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let bytes = self.v.into_bigint().to_bytes_be();
        let first = bytes.iter().position(|&b| b != 0);
        match first {
            Some(i) => bytes[i..].to_vec(),
            None => vec![0],
        }
    }

    /// Self-describing form: `[tag | len_be16]` then minimal big-endian bytes.
    pub fn serialize(&self, out: &mut ByteString) {
        let bytes = self.to_bytes_be();
        out.push(ELEMENT_ZP);
        out.pack16(bytes.len() as u16);
        out.append(&bytes);
    }

    pub fn to_bytes(&self) -> ByteString {
        let mut out = ByteString::new();
        self.serialize(&mut out);
        out
    }

    /// Inverse of [`Zp::serialize`]; values at or above r are reduced.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        if input.len() < 4 || input[0] != ELEMENT_ZP {
            return Err(Error::DeserializationFailed);
        }
        let len = u16::from_be_bytes([input[1], input[2]]) as usize;
        if input.len() != 3 + len {
            return Err(Error::SerializationFailed);
        }
        Ok(Self::from_bytes_be(&input[3..]))
    }
}

/// Byte-level right shift of a big-endian integer.
fn shr_be_bytes(bytes: &mut [u8], k: u32) {
    let byte_shift = (k / 8) as usize;
    let bit_shift = k % 8;
    if byte_shift >= bytes.len() {
        bytes.fill(0);
        return;
    }
    if byte_shift > 0 {
        for i in (byte_shift..bytes.len()).rev() {
            bytes[i] = bytes[i - byte_shift];
        }
        bytes[..byte_shift].fill(0);
    }
    if bit_shift > 0 {
        let mut carry = 0u8;
        for b in bytes.iter_mut() {
            let next_carry = *b << (8 - bit_shift);
            *b = (*b >> bit_shift) | carry;
            carry = next_carry;
        }
    }
}

impl<E: PairingCurve> Clone for Zp<E> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<E: PairingCurve> Copy for Zp<E> {}

impl<E: PairingCurve> PartialEq for Zp<E> {
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v
    }
}
impl<E: PairingCurve> Eq for Zp<E> {}

impl<E: PairingCurve> PartialOrd for Zp<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: PairingCurve> Ord for Zp<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.v.into_bigint().cmp(&other.v.into_bigint())
    }
}

impl<E: PairingCurve> fmt::Debug for Zp<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zp(0x{})", hex::encode(self.to_bytes_be()))
    }
}

impl<E: PairingCurve> std::ops::Add for Zp<E> {
    type Output = Zp<E>;
    fn add(self, rhs: Self) -> Self {
        Zp { v: self.v + rhs.v }
    }
}

impl<E: PairingCurve> std::ops::Sub for Zp<E> {
    type Output = Zp<E>;
    fn sub(self, rhs: Self) -> Self {
        Zp { v: self.v - rhs.v }
    }
}

impl<E: PairingCurve> std::ops::Mul for Zp<E> {
    type Output = Zp<E>;
    fn mul(self, rhs: Self) -> Self {
        Zp { v: self.v * rhs.v }
    }
}

impl<E: PairingCurve> std::ops::Neg for Zp<E> {
    type Output = Zp<E>;
    fn neg(self) -> Self {
        Zp { v: -self.v }
    }
}

// ---------------------------------------------------------------------------
// Source and twist groups
// ---------------------------------------------------------------------------

macro_rules! group_wrapper {
    ($name:ident, $proj:ident, $affine:ident, $doc:literal) => {
        #[doc = $doc]
        pub struct $name<E: PairingCurve>(pub(crate) E::$proj);

        impl<E: PairingCurve> $name<E> {
            pub fn identity() -> Self {
                $name(E::$proj::zero())
            }

            pub fn generator() -> Self {
                $name(E::$proj::generator())
            }

            /// Samples the generator raised to a scalar drawn from `rng`.
            pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
                let s = Zp::<E>::random(rng)?;
                Ok(Self::generator().mul(&s))
            }

            /// Scalar multiplication.
            pub fn mul(&self, s: &Zp<E>) -> Self {
                $name(self.0.mul_bigint(s.v.into_bigint()))
            }

            pub fn is_identity(&self) -> bool {
                self.0.is_zero()
            }

            /// Multiplies by the group order and compares against the
            /// identity.
            pub fn is_member(&self) -> bool {
                self.0
                    .mul_bigint(<E::ScalarField as PrimeField>::MODULUS)
                    .is_zero()
            }

            pub(crate) fn to_affine(&self) -> E::$affine {
                self.0.into_affine()
            }

            pub(crate) fn from_affine(p: E::$affine) -> Self {
                $name(p.into())
            }

            /// The backend's native (compressed) encoding, used as the legacy
            /// serialization payload.
            pub fn to_native_bytes(&self) -> Result<Vec<u8>> {
                let mut out = Vec::new();
                self.0
                    .serialize_compressed(&mut out)
                    .map_err(|_| Error::SerializationFailed)?;
                Ok(out)
            }

            /// Inverse of [`Self::to_native_bytes`]; validates curve and
            /// subgroup membership.
            pub fn from_native_bytes(bytes: &[u8]) -> Result<Self> {
                E::$proj::deserialize_compressed(bytes)
                    .map($name)
                    .map_err(|_| Error::DeserializationFailed)
            }
        }

        impl<E: PairingCurve> Clone for $name<E> {
            fn clone(&self) -> Self {
                *self
            }
        }
        impl<E: PairingCurve> Copy for $name<E> {}

        impl<E: PairingCurve> PartialEq for $name<E> {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl<E: PairingCurve> Eq for $name<E> {}

        impl<E: PairingCurve> fmt::Debug for $name<E> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "<{}>(..)"), E::ID)
            }
        }

        impl<E: PairingCurve> std::ops::Add for $name<E> {
            type Output = $name<E>;
            fn add(self, rhs: Self) -> Self {
                $name(self.0 + rhs.0)
            }
        }

        impl<E: PairingCurve> std::ops::Sub for $name<E> {
            type Output = $name<E>;
            fn sub(self, rhs: Self) -> Self {
                $name(self.0 - rhs.0)
            }
        }

        impl<E: PairingCurve> std::ops::Neg for $name<E> {
            type Output = $name<E>;
            fn neg(self) -> Self {
                $name(-self.0)
            }
        }
    };
}

group_wrapper!(
    G1,
    G1,
    G1Affine,
    "A point of the prime-order subgroup of the source group."
);
group_wrapper!(
    G2,
    G2,
    G2Affine,
    "A point of the prime-order subgroup of the twist group."
);

// ---------------------------------------------------------------------------
// Target group
// ---------------------------------------------------------------------------

/// An element of the multiplicative target group GT ⊂ Fp12.
pub struct Gt<E: PairingCurve> {
    pub(crate) v: E::TargetField,
}

impl<E: PairingCurve> Gt<E> {
    pub fn identity() -> Self {
        Gt {
            v: E::TargetField::one(),
        }
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Gt { v: self.v * rhs.v }
    }

    /// `self / rhs`; the zero field representative has no inverse.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        Ok(Gt {
            v: self.v * rhs.inv()?.v,
        })
    }

    pub fn inv(&self) -> Result<Self> {
        self.v
            .inverse()
            .map(|v| Gt { v })
            .ok_or(Error::DivideByZero)
    }

    /// `self^e` with the exponent read as an integer in `[0, r)`.
    pub fn pow(&self, e: &Zp<E>) -> Self {
        Gt {
            v: self.v.pow(e.v.into_bigint()),
        }
    }

    pub fn set_identity(&mut self) {
        self.v = E::TargetField::one();
    }

    pub fn is_identity(&self) -> bool {
        self.v.is_one()
    }

    /// Checks `self^r == 1` (and rejects the zero representative).
    pub fn is_member(&self) -> bool {
        !self.v.is_zero()
            && self
                .v
                .pow(<E::ScalarField as PrimeField>::MODULUS)
                .is_one()
    }

    /// The backend's native field encoding, used as the legacy payload.
    pub fn to_native_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.v
            .serialize_compressed(&mut out)
            .map_err(|_| Error::SerializationFailed)?;
        Ok(out)
    }

    /// Inverse of [`Gt::to_native_bytes`]; the caller is responsible for the
    /// subgroup membership check.
    pub fn from_native_bytes(bytes: &[u8]) -> Result<Self> {
        E::TargetField::deserialize_compressed(bytes)
            .map(|v| Gt { v })
            .map_err(|_| Error::DeserializationFailed)
    }
}

impl<E: PairingCurve> Clone for Gt<E> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<E: PairingCurve> Copy for Gt<E> {}

impl<E: PairingCurve> PartialEq for Gt<E> {
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v
    }
}
impl<E: PairingCurve> Eq for Gt<E> {}

impl<E: PairingCurve> fmt::Debug for Gt<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gt<{}>(..)", E::ID)
    }
}

// ---------------------------------------------------------------------------
// Pairings and hashing
// ---------------------------------------------------------------------------

/// The bilinear map `e: G1 × G2 → GT`.
pub fn pairing<E: PairingCurve>(p: &G1<E>, q: &G2<E>) -> Gt<E> {
    Gt {
        v: E::pairing(p.0, q.0).0,
    }
}

/// `∏ e(ps[i], qs[i])`, sharing the Miller loop across slots.
///
/// Numerically identical to the product of individual pairings. Fails with
/// [`Error::InvalidLength`] on mismatched vectors; the empty product is the
/// GT identity.
pub fn multi_pairing<E: PairingCurve>(ps: &[G1<E>], qs: &[G2<E>]) -> Result<Gt<E>> {
    if ps.len() != qs.len() {
        return Err(Error::InvalidLength);
    }
    if ps.is_empty() {
        return Ok(Gt::identity());
    }
    let out = E::multi_pairing(ps.iter().map(|p| p.0), qs.iter().map(|q| q.0));
    Ok(Gt { v: out.0 })
}

/// Hashes `key_prefix || msg` with SHA-256 and maps the digest onto G1.
///
/// The same inputs yield the same point across runs and backends.
pub fn hash_to_g1<E: PairingCurve>(key_prefix: &[u8], msg: &str) -> G1<E> {
    let mut hasher = Sha256::new();
    hasher.update(key_prefix);
    hasher.update(msg.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    G1::from_affine(E::map_to_g1(&digest))
}
