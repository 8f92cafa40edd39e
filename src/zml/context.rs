//! Curve-scoped factory for scalars, group elements and pairings.

use std::marker::PhantomData;

use ark_ff::{BigInteger, PrimeField};
use rand_core::{CryptoRng, RngCore};

use super::{hash_to_g1, multi_pairing, pairing, PairingCurve, G1, G2, Gt, Zp};
use crate::curve::{lookup_by_id, lookup_by_name, CurveId, CurveInfo};
use crate::error::{Error, Result};

/// A configured pairing-friendly curve.
///
/// Elements are tied to their curve through the type parameter, so the handle
/// itself carries no runtime state; it exists to expose the group order and
/// registry metadata the way elements conceptually share their group.
#[derive(Debug)]
pub struct BpGroup<E: PairingCurve>(PhantomData<E>);

impl<E: PairingCurve> BpGroup<E> {
    pub fn new() -> Self {
        BpGroup(PhantomData)
    }

    pub fn curve_id(&self) -> CurveId {
        E::ID
    }

    pub fn info(&self) -> &'static CurveInfo {
        // Every backend curve is present in the registry.
        lookup_by_id(E::ID).expect("backend curve missing from registry")
    }

    /// Big-endian bytes of the group order r.
    pub fn order_be_bytes(&self) -> Vec<u8> {
        <E::ScalarField as PrimeField>::MODULUS.to_bytes_be()
    }

    pub fn order_bits(&self) -> u32 {
        E::ScalarField::MODULUS_BIT_SIZE
    }
}

impl<E: PairingCurve> Default for BpGroup<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PairingCurve> Clone for BpGroup<E> {
    fn clone(&self) -> Self {
        BpGroup(PhantomData)
    }
}

/// Entry point for all curve-scoped operations of one pairing backend.
#[derive(Debug)]
pub struct PairingContext<E: PairingCurve> {
    group: BpGroup<E>,
}

impl<E: PairingCurve> PairingContext<E> {
    pub fn new() -> Self {
        PairingContext {
            group: BpGroup::new(),
        }
    }

    /// Builds a context from a curve parameter string (e.g. `"BLS12_381"`),
    /// rejecting parameters that do not name this backend's curve.
    pub fn from_params(params: &str) -> Result<Self> {
        let info = lookup_by_name(params).ok_or(Error::InvalidGroupParams)?;
        if info.id != E::ID {
            return Err(Error::InvalidGroupParams);
        }
        Ok(Self::new())
    }

    pub fn group(&self) -> &BpGroup<E> {
        &self.group
    }

    pub fn curve_id(&self) -> CurveId {
        E::ID
    }

    pub fn init_zp(&self, v: u32) -> Zp<E> {
        Zp::from_u32(v)
    }

    pub fn init_g1(&self) -> G1<E> {
        G1::identity()
    }

    pub fn init_g2(&self) -> G2<E> {
        G2::identity()
    }

    pub fn init_gt(&self) -> Gt<E> {
        Gt::identity()
    }

    pub fn random_zp<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Zp<E>> {
        Zp::random(rng)
    }

    pub fn random_g1<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<G1<E>> {
        G1::random(rng)
    }

    pub fn random_g2<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<G2<E>> {
        G2::random(rng)
    }

    pub fn hash_to_g1(&self, key_prefix: &[u8], msg: &str) -> G1<E> {
        hash_to_g1::<E>(key_prefix, msg)
    }

    pub fn pairing(&self, p: &G1<E>, q: &G2<E>) -> Gt<E> {
        pairing(p, q)
    }

    pub fn multi_pairing(&self, ps: &[G1<E>], qs: &[G2<E>]) -> Result<Gt<E>> {
        multi_pairing(ps, qs)
    }
}

impl<E: PairingCurve> Default for PairingContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PairingCurve> Clone for PairingContext<E> {
    fn clone(&self) -> Self {
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

    #[test]
    fn from_params_resolves_names() {
        assert!(PairingContext::<Bls12_381>::from_params("BLS12_381").is_ok());
        assert!(PairingContext::<Bls12_381>::from_params("BLS12-381").is_ok());
        assert_eq!(
            PairingContext::<Bls12_381>::from_params("BN_P254").unwrap_err(),
            Error::InvalidGroupParams
        );
        assert_eq!(
            PairingContext::<Bn254>::from_params("no-such-curve").unwrap_err(),
            Error::InvalidGroupParams
        );
    }

    #[test]
    fn factory_elements_are_identities() {
        let ctx = PairingContext::<Bls12_381>::new();
        assert!(ctx.init_g1().is_identity());
        assert!(ctx.init_g2().is_identity());
        assert!(ctx.init_gt().is_identity());
        assert_eq!(ctx.init_zp(7), Zp::from_u32(7));
        assert_eq!(ctx.curve_id(), CurveId::Bls12P381);
    }

    #[test]
    fn order_metadata() {
        let g = BpGroup::<Bn254>::new();
        assert_eq!(g.order_bits(), 254);
        assert_eq!(g.info().name, "BN_P254");
        // r < 2^254 for BN254; the top byte of the 32-byte order reflects it.
        let order = g.order_be_bytes();
        assert_eq!(order.len(), 32);
        assert!(order[0] < 0x40);
    }

    #[test]
    fn seeded_context_sampling_is_deterministic() {
        let ctx = PairingContext::<Bls12_381>::new();
        let a = ctx.random_g1(&mut StdRng::seed_from_u64(9)).unwrap();
        let b = ctx.random_g1(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
