//! Ciphertext-policy ABE in the style of Waters' LSSS construction.
//!
//! The ciphertext encodes an access policy; keys carry attributes. A key
//! decrypts iff its attribute set satisfies the policy, and colluding holders
//! of unauthorized keys learn nothing: every key binds its components to a
//! fresh scalar t.
//!
//! Setup samples `g1, g2, α, a` and publishes `(g1, g2, g1^a, e(g1,g2)^α)`.
//! A key for attribute set S is `K = g2^(α+at)`, `L = g2^t`,
//! `K_x = H(x)^t` for `x ∈ S`. Encapsulation shares s over the policy tree
//! and emits `C0 = g1^s` plus per-row `C_i = (g1^a)^{λ_i}·H(ρ(i))^{−r_i}`,
//! `D_i = g2^{r_i}`; the envelope is `e(g1,g2)^{αs}`.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};

use super::{
    cca, open_cpa, pack_g1, pack_g2, pack_gt, pack_str, pack_zp, seal_cpa, unpack_g1, unpack_g2,
    unpack_gt, unpack_str, unpack_zp, AbeKem, SchemeId,
};
use crate::bytestring::ByteString;
use crate::container::Ciphertext;
use crate::error::{Error, Result};
use crate::keystore::{KeyRole, KeyStore};
use crate::policy::{lsss, AttributeList, Policy};
use crate::zml::{hash_to_g1, multi_pairing, pairing, PairingContext, PairingCurve, G1, G2, Gt, Zp};

/// Domain prefix for hashing attribute names into G1.
const ATTR_HASH_PREFIX: &[u8] = b"cp-abe-attribute";

/// Master public key.
pub struct PublicKey<E: PairingCurve> {
    g1: G1<E>,
    g2: G2<E>,
    /// `g1^a`.
    a: G1<E>,
    /// `e(g1, g2)^α`.
    e_alpha: Gt<E>,
}

/// Master secret key.
pub struct MasterKey<E: PairingCurve> {
    alpha: Zp<E>,
    a: Zp<E>,
}

/// A user decryption key bound to an attribute set.
pub struct UserKey<E: PairingCurve> {
    attrs: AttributeList,
    k: G2<E>,
    l: G2<E>,
    kx: BTreeMap<String, G1<E>>,
}

impl<E: PairingCurve> PublicKey<E> {
    pub fn to_bytes(&self) -> Result<ByteString> {
        let mut out = ByteString::new();
        pack_g1(&mut out, &self.g1)?;
        pack_g2(&mut out, &self.g2)?;
        pack_g1(&mut out, &self.a)?;
        pack_gt(&mut out, &self.e_alpha)?;
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let pk = PublicKey {
            g1: unpack_g1(input, &mut index)?,
            g2: unpack_g2(input, &mut index)?,
            a: unpack_g1(input, &mut index)?,
            e_alpha: unpack_gt(input, &mut index)?,
        };
        if index != input.len() {
            return Err(Error::DeserializationFailed);
        }
        Ok(pk)
    }
}

impl<E: PairingCurve> MasterKey<E> {
    pub fn to_bytes(&self) -> Result<ByteString> {
        let mut out = ByteString::new();
        pack_zp(&mut out, &self.alpha);
        pack_zp(&mut out, &self.a);
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let msk = MasterKey {
            alpha: unpack_zp(input, &mut index)?,
            a: unpack_zp(input, &mut index)?,
        };
        if index != input.len() {
            return Err(Error::DeserializationFailed);
        }
        Ok(msk)
    }
}

impl<E: PairingCurve> UserKey<E> {
    pub fn attributes(&self) -> &AttributeList {
        &self.attrs
    }

    pub fn to_bytes(&self) -> Result<ByteString> {
        let mut out = ByteString::new();
        pack_str(&mut out, &self.attrs.to_string());
        pack_g2(&mut out, &self.k)?;
        pack_g2(&mut out, &self.l)?;
        out.pack16(self.kx.len() as u16);
        for (attr, kx) in &self.kx {
            pack_str(&mut out, attr);
            pack_g1(&mut out, kx)?;
        }
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let attrs: AttributeList = unpack_str(input, &mut index)?
            .parse()
            .map_err(|_| Error::DeserializationFailed)?;
        let k = unpack_g2(input, &mut index)?;
        let l = unpack_g2(input, &mut index)?;
        let count = unpack_u16(input, &mut index)?;
        let mut kx = BTreeMap::new();
        for _ in 0..count {
            let attr = unpack_str(input, &mut index)?;
            let elem = unpack_g1(input, &mut index)?;
            kx.insert(attr, elem);
        }
        if index != input.len() {
            return Err(Error::DeserializationFailed);
        }
        Ok(UserKey { attrs, k, l, kx })
    }
}

pub(crate) fn unpack_u16(input: &ByteString, index: &mut usize) -> Result<u16> {
    let bytes = input
        .as_slice()
        .get(*index..*index + 2)
        .ok_or(Error::DeserializationFailed)?;
    *index += 2;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// The Waters CP-ABE primitive.
pub struct CpAbe<E: PairingCurve>(PhantomData<E>);

impl<E: PairingCurve> CpAbe<E> {
    /// Creates a master key pair.
    pub fn setup<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(PublicKey<E>, MasterKey<E>)> {
        let g1 = G1::random(rng)?;
        let g2 = G2::random(rng)?;
        let alpha = Zp::random(rng)?;
        let a = Zp::random(rng)?;
        let pk = PublicKey {
            e_alpha: pairing(&g1, &g2).pow(&alpha),
            a: g1.mul(&a),
            g1,
            g2,
        };
        Ok((pk, MasterKey { alpha, a }))
    }

    /// Derives a user key for an attribute set.
    pub fn keygen<R: RngCore + CryptoRng>(
        pk: &PublicKey<E>,
        msk: &MasterKey<E>,
        attrs: &AttributeList,
        rng: &mut R,
    ) -> Result<UserKey<E>> {
        let t = Zp::random(rng)?;
        let k = pk.g2.mul(&(msk.alpha + msk.a * t));
        let l = pk.g2.mul(&t);
        let mut kx = BTreeMap::new();
        for attr in attrs.full_names() {
            let h = hash_to_g1::<E>(ATTR_HASH_PREFIX, &attr);
            kx.insert(attr, h.mul(&t));
        }
        Ok(UserKey {
            attrs: attrs.clone(),
            k,
            l,
            kx,
        })
    }
}

impl<E: PairingCurve> AbeKem<E> for CpAbe<E> {
    const SCHEME_CPA: SchemeId = SchemeId::CpWaters;
    const SCHEME_CCA: SchemeId = SchemeId::CpWatersCca;

    type EncKey = PublicKey<E>;
    type DecKey = UserKey<E>;

    fn encaps<R: RngCore + CryptoRng>(
        pk: &PublicKey<E>,
        input: &str,
        rng: &mut R,
    ) -> Result<(ByteString, Gt<E>)> {
        let policy: Policy = input.parse()?;
        let s = Zp::random(rng)?;
        let shares = lsss::gen_shares(&s, policy.root(), rng)?;

        let c0 = pk.g1.mul(&s);
        let mut kem = ByteString::new();
        pack_g1(&mut kem, &c0)?;
        kem.pack16(shares.len() as u16);
        for share in &shares {
            let r = Zp::random(rng)?;
            let h = hash_to_g1::<E>(ATTR_HASH_PREFIX, &share.attr);
            let c = pk.a.mul(&share.value) - h.mul(&r);
            let d = pk.g2.mul(&r);
            pack_str(&mut kem, &share.id);
            pack_g1(&mut kem, &c)?;
            pack_g2(&mut kem, &d)?;
        }

        Ok((kem, pk.e_alpha.pow(&s)))
    }

    fn decaps(uk: &UserKey<E>, input: &str, kem: &ByteString) -> Result<Gt<E>> {
        let policy: Policy = input.parse()?;

        let mut index = 0;
        let c0: G1<E> = unpack_g1(kem, &mut index)?;
        let count = unpack_u16(kem, &mut index)?;
        let mut rows: BTreeMap<String, (G1<E>, G2<E>)> = BTreeMap::new();
        for _ in 0..count {
            let id = unpack_str(kem, &mut index)?;
            let c = unpack_g1(kem, &mut index)?;
            let d = unpack_g2(kem, &mut index)?;
            rows.insert(id, (c, d));
        }
        if index != kem.len() {
            return Err(Error::InvalidCiphertextBody);
        }

        let coeffs = lsss::recovery_coefficients::<E>(policy.root(), &uk.attrs.full_names())?;

        // e(C0, K) · ∏_i [ e(C_i, L) · e(K_ρ(i), D_i) ]^(−ω_i)  =  e(g1,g2)^(αs)
        let mut lhs = Vec::with_capacity(1 + 2 * coeffs.len());
        let mut rhs = Vec::with_capacity(lhs.capacity());
        lhs.push(c0);
        rhs.push(uk.k);
        for (id, w) in &coeffs {
            let attr = id.rsplit_once('#').map(|(a, _)| a).unwrap_or(id);
            let (c, d) = rows.get(id).ok_or(Error::DecryptionFailed)?;
            let kx = uk.kx.get(attr).ok_or(Error::DecryptionFailed)?;
            lhs.push(-c.mul(w));
            rhs.push(uk.l);
            lhs.push(-kx.mul(w));
            rhs.push(*d);
        }
        multi_pairing(&lhs, &rhs)
    }
}

/// Names under which the driver stores master keys.
pub const MPK_ID: &str = "MPK";
pub const MSK_ID: &str = "MSK";

/// CP-ABE orchestration over a pairing context, a key store and the
/// ciphertext container.
pub struct CpAbeContext<E: PairingCurve> {
    ctx: PairingContext<E>,
    store: KeyStore,
    cca: bool,
}

impl<E: PairingCurve> CpAbeContext<E> {
    /// A CPA-secure context.
    pub fn new() -> Self {
        CpAbeContext {
            ctx: PairingContext::new(),
            store: KeyStore::new(),
            cca: false,
        }
    }

    /// A CCA-secure context (deterministic re-encryption check on decrypt).
    pub fn new_cca() -> Self {
        CpAbeContext {
            cca: true,
            ..Self::new()
        }
    }

    /// Builds a context from a curve parameter string (e.g. `"BLS12_381"`).
    pub fn from_params(params: &str) -> Result<Self> {
        Ok(CpAbeContext {
            ctx: PairingContext::from_params(params)?,
            store: KeyStore::new(),
            cca: false,
        })
    }

    pub fn context(&self) -> &PairingContext<E> {
        &self.ctx
    }

    pub fn keystore(&self) -> &KeyStore {
        &self.store
    }

    fn scheme_id(&self) -> SchemeId {
        if self.cca {
            <CpAbe<E> as AbeKem<E>>::SCHEME_CCA
        } else {
            <CpAbe<E> as AbeKem<E>>::SCHEME_CPA
        }
    }

    /// Samples system parameters and stores MPK/MSK in the key store.
    pub fn setup<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<()> {
        let (pk, msk) = CpAbe::<E>::setup(rng)?;
        self.store.add(MPK_ID, KeyRole::Public, pk.to_bytes()?)?;
        self.store.add(MSK_ID, KeyRole::Secret, msk.to_bytes()?)?;
        Ok(())
    }

    fn public_key(&self) -> Result<PublicKey<E>> {
        let stored = self.store.get_by_role(MPK_ID, KeyRole::Public)?;
        PublicKey::from_bytes(&stored.body)
    }

    /// Derives a key for `attrs` (pipe-separated) and stores it under
    /// `key_id`.
    pub fn keygen<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        attrs: &str,
        key_id: &str,
    ) -> Result<()> {
        let attrs: AttributeList = attrs.parse()?;
        let pk = self.public_key()?;
        let stored = self.store.get_by_role(MSK_ID, KeyRole::Secret)?;
        let msk = MasterKey::from_bytes(&stored.body)?;
        let uk = CpAbe::keygen(&pk, &msk, &attrs, rng)?;
        self.store.add(key_id, KeyRole::Secret, uk.to_bytes()?)?;
        Ok(())
    }

    /// Encrypts `plaintext` under a boolean `policy` over attributes.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        policy: &str,
        plaintext: &[u8],
    ) -> Result<Ciphertext> {
        let pk = self.public_key()?;
        let input = policy.parse::<Policy>()?.to_canonical_string();
        let body = if self.cca {
            cca::seal::<E, CpAbe<E>, R>(&pk, &input, plaintext, rng)?
        } else {
            seal_cpa::<E, CpAbe<E>, R>(&pk, &input, plaintext, rng)?
        };
        let mut ct = Ciphertext::new();
        ct.set_header(self.ctx.group().curve_id(), self.scheme_id(), rng)?;
        ct.set_body(body);
        Ok(ct)
    }

    /// Decrypts with the stored key `key_id`.
    ///
    /// Fails with [`Error::DecryptionFailed`] when the key's attributes do
    /// not satisfy the ciphertext policy, and [`Error::VerificationFailed`]
    /// when the CCA re-encryption check rejects. Callers surfacing errors to
    /// users should present both as a single "cannot decrypt" outcome.
    pub fn decrypt(&self, key_id: &str, ct: &Ciphertext) -> Result<Vec<u8>> {
        if ct.curve_id() != self.ctx.group().curve_id() {
            return Err(Error::WrongGroup);
        }
        if ct.scheme_id() != self.scheme_id() {
            return Err(Error::InvalidInput);
        }
        let stored = self.store.get_by_role(key_id, KeyRole::Secret)?;
        let uk = UserKey::from_bytes(&stored.body)?;
        if self.cca {
            let pk = self.public_key()?;
            cca::open::<E, CpAbe<E>>(&pk, &uk, ct.body())
        } else {
            open_cpa::<E, CpAbe<E>>(&uk, ct.body())
        }
    }
}

impl<E: PairingCurve> Default for CpAbeContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_bn254::Bn254;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xcab)
    }

    fn authorized_context<E: PairingCurve>() -> (CpAbeContext<E>, Ciphertext) {
        let mut rng = rng();
        let mut ctx = CpAbeContext::<E>::new();
        ctx.setup(&mut rng).unwrap();
        ctx.keygen(&mut rng, "student|engineer", "alice").unwrap();
        let ct = ctx
            .encrypt(&mut rng, "student and engineer", b"top secret")
            .unwrap();
        (ctx, ct)
    }

    #[test]
    fn happy_path_bls12_381() {
        let (ctx, ct) = authorized_context::<Bls12_381>();
        assert_eq!(ct.curve_id(), crate::curve::CurveId::Bls12P381);
        assert_eq!(ct.scheme_id(), SchemeId::CpWaters);
        let pt = ctx.decrypt("alice", &ct).unwrap();
        assert_eq!(pt, b"top secret");
    }

    #[test]
    fn happy_path_bn254() {
        let (ctx, ct) = authorized_context::<Bn254>();
        assert_eq!(ctx.decrypt("alice", &ct).unwrap(), b"top secret");
    }

    #[test]
    fn access_denied_without_matching_attributes() {
        let mut r = rng();
        let (mut ctx, ct) = authorized_context::<Bls12_381>();
        ctx.keygen(&mut r, "student|manager", "bob").unwrap();
        assert_eq!(
            ctx.decrypt("bob", &ct).unwrap_err(),
            Error::DecryptionFailed
        );
    }

    #[test]
    fn colluding_partial_keys_fail() {
        // Two keys that together cover the policy but individually do not.
        let mut r = rng();
        let mut ctx = CpAbeContext::<Bls12_381>::new();
        ctx.setup(&mut r).unwrap();
        ctx.keygen(&mut r, "student", "carol").unwrap();
        ctx.keygen(&mut r, "engineer", "dave").unwrap();
        let ct = ctx
            .encrypt(&mut r, "student and engineer", b"secret")
            .unwrap();
        assert!(ctx.decrypt("carol", &ct).is_err());
        assert!(ctx.decrypt("dave", &ct).is_err());
    }

    #[test]
    fn policy_with_threshold_and_or() {
        let mut r = rng();
        let mut ctx = CpAbeContext::<Bls12_381>::new();
        ctx.setup(&mut r).unwrap();
        ctx.keygen(&mut r, "a|c", "two-of-three").unwrap();
        ctx.keygen(&mut r, "z", "outsider").unwrap();

        let ct = ctx
            .encrypt(&mut r, "2 of (a, b, c) or admin", b"m")
            .unwrap();
        assert_eq!(ctx.decrypt("two-of-three", &ct).unwrap(), b"m");
        assert!(ctx.decrypt("outsider", &ct).is_err());

        let ct2 = ctx.encrypt(&mut r, "admin or (a and c)", b"m2").unwrap();
        assert_eq!(ctx.decrypt("two-of-three", &ct2).unwrap(), b"m2");
    }

    #[test]
    fn duplicate_attribute_policy_decrypts() {
        let mut r = rng();
        let mut ctx = CpAbeContext::<Bls12_381>::new();
        ctx.setup(&mut r).unwrap();
        ctx.keygen(&mut r, "a|c", "alice").unwrap();
        let ct = ctx.encrypt(&mut r, "(a and b) or (a and c)", b"x").unwrap();
        assert_eq!(ctx.decrypt("alice", &ct).unwrap(), b"x");
    }

    #[test]
    fn container_roundtrip_preserves_decryptability() {
        let (ctx, ct) = authorized_context::<Bls12_381>();
        let mut wire = ByteString::new();
        ct.export_with_header(&mut wire);
        let loaded = Ciphertext::load_with_header(&wire).unwrap();
        assert_eq!(loaded, ct);
        assert_eq!(ctx.decrypt("alice", &loaded).unwrap(), b"top secret");
    }

    #[test]
    fn key_serialization_roundtrip() {
        let mut r = rng();
        let (pk, msk) = CpAbe::<Bls12_381>::setup(&mut r).unwrap();
        let attrs: AttributeList = "student|engineer".parse().unwrap();
        let uk = CpAbe::keygen(&pk, &msk, &attrs, &mut r).unwrap();

        let pk2 = PublicKey::<Bls12_381>::from_bytes(&pk.to_bytes().unwrap()).unwrap();
        assert_eq!(pk2.to_bytes().unwrap(), pk.to_bytes().unwrap());

        let msk2 = MasterKey::<Bls12_381>::from_bytes(&msk.to_bytes().unwrap()).unwrap();
        assert_eq!(msk2.to_bytes().unwrap(), msk.to_bytes().unwrap());

        let uk2 = UserKey::<Bls12_381>::from_bytes(&uk.to_bytes().unwrap()).unwrap();
        assert_eq!(uk2.to_bytes().unwrap(), uk.to_bytes().unwrap());
        assert_eq!(uk2.attributes(), &attrs);
    }

    #[test]
    fn wrong_scheme_or_curve_is_rejected() {
        let (_ctx, ct) = authorized_context::<Bls12_381>();

        let cca_ctx = {
            let mut c = CpAbeContext::<Bls12_381>::new_cca();
            let mut r = rng();
            c.setup(&mut r).unwrap();
            c
        };
        assert_eq!(cca_ctx.decrypt("alice", &ct).unwrap_err(), Error::InvalidInput);

        let bn_ctx = CpAbeContext::<Bn254>::new();
        assert_eq!(bn_ctx.decrypt("alice", &ct).unwrap_err(), Error::WrongGroup);
    }

    #[test]
    fn missing_key_fails() {
        let (ctx, ct) = authorized_context::<Bls12_381>();
        assert!(ctx.decrypt("nobody", &ct).is_err());
    }
}
