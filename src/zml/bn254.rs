//! BN254 backend (legacy curve, kept for Ethereum-format interoperability).

use ark_bn254::{Fq12, Fq2, Fq6, Fq6Config, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::fields::fp6_3over2::Fp6Config;
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

use super::backend::impl_pairing_backend;
use super::PairingCurve;
use crate::curve::CurveId;
use crate::error::{Error, Result};

pub use ark_bn254::Bn254;

impl_pairing_backend! {
    engine: Bn254,
    fq2: Fq2,
    fq6: Fq6,
    fq12: Fq12,
    fq6_config: Fq6Config,
    g1: G1Affine,
    g2: G2Affine,
    id: CurveId::BnP254,
    field_size: 32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zml::{pairing, G1, G2};

    #[test]
    fn gt_coeff_roundtrip() {
        let g = pairing(&G1::<Bn254>::generator(), &G2::<Bn254>::generator());
        let coeffs = Bn254::gt_coeffs(&g.v);
        assert_eq!(Bn254::gt_from_coeffs(coeffs), g.v);
    }

    #[test]
    fn g1_coordinate_roundtrip() {
        let p = G1::<Bn254>::generator().to_affine();
        let (x, y) = Bn254::g1_xy(&p).unwrap();
        assert_eq!(Bn254::g1_from_xy(x, y).unwrap(), p);
    }

    #[test]
    fn map_to_g1_spreads_inputs() {
        let a = Bn254::map_to_g1(&[1u8; 32]);
        let b = Bn254::map_to_g1(&[2u8; 32]);
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }
}
