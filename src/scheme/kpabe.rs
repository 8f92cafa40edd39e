//! Key-policy ABE in the style of Goyal-Pandey-Sahai-Waters, the dual of
//! [`cpabe`](super::cpabe): keys encode the access policy, ciphertexts carry
//! an attribute set.
//!
//! Setup publishes `(g1, g2, e(g1,g2)^α)`. A key for a policy shares α over
//! the tree and emits per-leaf `D_i = g1^{λ_i}·H(x_i)^{r_i}`,
//! `R_i = g2^{r_i}`. Encapsulation under an attribute set S samples s and
//! emits `C0 = g2^s` and `C_x = H(x)^s` for `x ∈ S`; the envelope is
//! `e(g1,g2)^{αs}` since `e(D_i, C0)·e(C_{x_i}, R_i)^{−1} =
//! e(g1,g2)^{λ_i s}`.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};

use super::cpabe::unpack_u16;
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
const ATTR_HASH_PREFIX: &[u8] = b"kp-abe-attribute";

/// Master public key.
pub struct PublicKey<E: PairingCurve> {
    g1: G1<E>,
    g2: G2<E>,
    /// `e(g1, g2)^α`.
    e_alpha: Gt<E>,
}

/// Master secret key.
pub struct MasterKey<E: PairingCurve> {
    alpha: Zp<E>,
}

/// A user decryption key bound to an access policy.
pub struct UserKey<E: PairingCurve> {
    policy: String,
    /// Per-leaf components, keyed by share identifier.
    rows: BTreeMap<String, (G1<E>, G2<E>)>,
}

impl<E: PairingCurve> PublicKey<E> {
    pub fn to_bytes(&self) -> Result<ByteString> {
        let mut out = ByteString::new();
        pack_g1(&mut out, &self.g1)?;
        pack_g2(&mut out, &self.g2)?;
        pack_gt(&mut out, &self.e_alpha)?;
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let pk = PublicKey {
            g1: unpack_g1(input, &mut index)?,
            g2: unpack_g2(input, &mut index)?,
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
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let msk = MasterKey {
            alpha: unpack_zp(input, &mut index)?,
        };
        if index != input.len() {
            return Err(Error::DeserializationFailed);
        }
        Ok(msk)
    }
}

impl<E: PairingCurve> UserKey<E> {
    pub fn policy(&self) -> &str {
        &self.policy
    }

    pub fn to_bytes(&self) -> Result<ByteString> {
        let mut out = ByteString::new();
        pack_str(&mut out, &self.policy);
        out.pack16(self.rows.len() as u16);
        for (id, (d, r)) in &self.rows {
            pack_str(&mut out, id);
            pack_g1(&mut out, d)?;
            pack_g2(&mut out, r)?;
        }
        Ok(out)
    }

    pub fn from_bytes(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let policy = unpack_str(input, &mut index)?;
        let count = unpack_u16(input, &mut index)?;
        let mut rows = BTreeMap::new();
        for _ in 0..count {
            let id = unpack_str(input, &mut index)?;
            let d = unpack_g1(input, &mut index)?;
            let r = unpack_g2(input, &mut index)?;
            rows.insert(id, (d, r));
        }
        if index != input.len() {
            return Err(Error::DeserializationFailed);
        }
        Ok(UserKey { policy, rows })
    }
}

/// The GPSW KP-ABE primitive.
pub struct KpAbe<E: PairingCurve>(PhantomData<E>);

impl<E: PairingCurve> KpAbe<E> {
    pub fn setup<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(PublicKey<E>, MasterKey<E>)> {
        let g1 = G1::random(rng)?;
        let g2 = G2::random(rng)?;
        let alpha = Zp::random(rng)?;
        let pk = PublicKey {
            e_alpha: pairing(&g1, &g2).pow(&alpha),
            g1,
            g2,
        };
        Ok((pk, MasterKey { alpha }))
    }

    /// Derives a key whose access policy is shared over α.
    pub fn keygen<R: RngCore + CryptoRng>(
        pk: &PublicKey<E>,
        msk: &MasterKey<E>,
        policy: &Policy,
        rng: &mut R,
    ) -> Result<UserKey<E>> {
        let shares = lsss::gen_shares(&msk.alpha, policy.root(), rng)?;
        let mut rows = BTreeMap::new();
        for share in shares {
            let r = Zp::random(rng)?;
            let h = hash_to_g1::<E>(ATTR_HASH_PREFIX, &share.attr);
            let d = pk.g1.mul(&share.value) + h.mul(&r);
            let rr = pk.g2.mul(&r);
            rows.insert(share.id, (d, rr));
        }
        Ok(UserKey {
            policy: policy.to_canonical_string(),
            rows,
        })
    }
}

impl<E: PairingCurve> AbeKem<E> for KpAbe<E> {
    const SCHEME_CPA: SchemeId = SchemeId::KpGpsw;
    const SCHEME_CCA: SchemeId = SchemeId::KpGpswCca;

    type EncKey = PublicKey<E>;
    type DecKey = UserKey<E>;

    fn encaps<R: RngCore + CryptoRng>(
        pk: &PublicKey<E>,
        input: &str,
        rng: &mut R,
    ) -> Result<(ByteString, Gt<E>)> {
        let attrs: AttributeList = input.parse()?;
        let s = Zp::random(rng)?;

        let c0 = pk.g2.mul(&s);
        let mut kem = ByteString::new();
        pack_g2(&mut kem, &c0)?;
        let names = attrs.full_names();
        kem.pack16(names.len() as u16);
        for attr in names {
            let c = hash_to_g1::<E>(ATTR_HASH_PREFIX, &attr).mul(&s);
            pack_str(&mut kem, &attr);
            pack_g1(&mut kem, &c)?;
        }

        Ok((kem, pk.e_alpha.pow(&s)))
    }

    fn decaps(uk: &UserKey<E>, input: &str, kem: &ByteString) -> Result<Gt<E>> {
        let attrs: AttributeList = input.parse()?;
        let policy: Policy = uk.policy.parse()?;

        let mut index = 0;
        let c0: G2<E> = unpack_g2(kem, &mut index)?;
        let count = unpack_u16(kem, &mut index)?;
        let mut cts: BTreeMap<String, G1<E>> = BTreeMap::new();
        for _ in 0..count {
            let attr = unpack_str(kem, &mut index)?;
            let c = unpack_g1(kem, &mut index)?;
            cts.insert(attr, c);
        }
        if index != kem.len() {
            return Err(Error::InvalidCiphertextBody);
        }

        let coeffs = lsss::recovery_coefficients::<E>(policy.root(), &attrs.full_names())?;

        // ∏_i e(D_i, C0)^{ω_i} · e(C_{x_i}, R_i)^{−ω_i}  =  e(g1,g2)^(αs)
        let mut lhs = Vec::with_capacity(2 * coeffs.len());
        let mut rhs = Vec::with_capacity(2 * coeffs.len());
        for (id, w) in &coeffs {
            let attr = id.rsplit_once('#').map(|(a, _)| a).unwrap_or(id);
            let (d, r) = uk.rows.get(id).ok_or(Error::DecryptionFailed)?;
            let c = cts.get(attr).ok_or(Error::DecryptionFailed)?;
            lhs.push(d.mul(w));
            rhs.push(c0);
            lhs.push(-c.mul(w));
            rhs.push(*r);
        }
        multi_pairing(&lhs, &rhs)
    }
}

/// Names under which the driver stores master keys.
pub const MPK_ID: &str = "MPK";
pub const MSK_ID: &str = "MSK";

/// KP-ABE orchestration over a pairing context, a key store and the
/// ciphertext container.
pub struct KpAbeContext<E: PairingCurve> {
    ctx: PairingContext<E>,
    store: KeyStore,
    cca: bool,
}

impl<E: PairingCurve> KpAbeContext<E> {
    pub fn new() -> Self {
        KpAbeContext {
            ctx: PairingContext::new(),
            store: KeyStore::new(),
            cca: false,
        }
    }

    pub fn new_cca() -> Self {
        KpAbeContext {
            cca: true,
            ..Self::new()
        }
    }

    pub fn from_params(params: &str) -> Result<Self> {
        Ok(KpAbeContext {
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
            <KpAbe<E> as AbeKem<E>>::SCHEME_CCA
        } else {
            <KpAbe<E> as AbeKem<E>>::SCHEME_CPA
        }
    }

    pub fn setup<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<()> {
        let (pk, msk) = KpAbe::<E>::setup(rng)?;
        self.store.add(MPK_ID, KeyRole::Public, pk.to_bytes()?)?;
        self.store.add(MSK_ID, KeyRole::Secret, msk.to_bytes()?)?;
        Ok(())
    }

    fn public_key(&self) -> Result<PublicKey<E>> {
        let stored = self.store.get_by_role(MPK_ID, KeyRole::Public)?;
        PublicKey::from_bytes(&stored.body)
    }

    /// Derives a key for the boolean `policy` and stores it under `key_id`.
    pub fn keygen<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        policy: &str,
        key_id: &str,
    ) -> Result<()> {
        let policy: Policy = policy.parse()?;
        let pk = self.public_key()?;
        let stored = self.store.get_by_role(MSK_ID, KeyRole::Secret)?;
        let msk = MasterKey::from_bytes(&stored.body)?;
        let uk = KpAbe::keygen(&pk, &msk, &policy, rng)?;
        self.store.add(key_id, KeyRole::Secret, uk.to_bytes()?)?;
        Ok(())
    }

    /// Encrypts `plaintext` under a pipe-separated attribute list.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        attrs: &str,
        plaintext: &[u8],
    ) -> Result<Ciphertext> {
        let pk = self.public_key()?;
        let input = attrs.parse::<AttributeList>()?.to_string();
        let body = if self.cca {
            cca::seal::<E, KpAbe<E>, R>(&pk, &input, plaintext, rng)?
        } else {
            seal_cpa::<E, KpAbe<E>, R>(&pk, &input, plaintext, rng)?
        };
        let mut ct = Ciphertext::new();
        ct.set_header(self.ctx.group().curve_id(), self.scheme_id(), rng)?;
        ct.set_body(body);
        Ok(ct)
    }

    /// Decrypts with the stored key `key_id`; the key's policy must be
    /// satisfied by the ciphertext's attribute set.
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
            cca::open::<E, KpAbe<E>>(&pk, &uk, ct.body())
        } else {
            open_cpa::<E, KpAbe<E>>(&uk, ct.body())
        }
    }
}

impl<E: PairingCurve> Default for KpAbeContext<E> {
    fn default() -> Self {
        Self::new()
    }
}
