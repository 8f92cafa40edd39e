//! BLS12-381 backend (the default, recommended curve).

use ark_bls12_381::{Fq12, Fq2, Fq6, Fq6Config, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::fields::fp6_3over2::Fp6Config;
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

use super::backend::impl_pairing_backend;
use super::PairingCurve;
use crate::curve::CurveId;
use crate::error::{Error, Result};

pub use ark_bls12_381::Bls12_381;

impl_pairing_backend! {
    engine: Bls12_381,
    fq2: Fq2,
    fq6: Fq6,
    fq12: Fq12,
    fq6_config: Fq6Config,
    g1: G1Affine,
    g2: G2Affine,
    id: CurveId::Bls12P381,
    field_size: 48,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zml::{pairing, G1, G2};
    use ark_ff::Field;

    #[test]
    fn gt_coeff_roundtrip() {
        let g = pairing(&G1::<Bls12_381>::generator(), &G2::<Bls12_381>::generator());
        let coeffs = Bls12_381::gt_coeffs(&g.v);
        assert_eq!(Bls12_381::gt_from_coeffs(coeffs), g.v);
    }

    #[test]
    fn nonresidue_defines_the_tower() {
        // w⁶ = ξ in Fp12 = Fp2[w]/(w⁶ − ξ): the element w has coefficient
        // vector (0, 1, 0, 0, 0, 0).
        let one = Fq2::new(ark_bls12_381::Fq::from(1u64), ark_bls12_381::Fq::from(0u64));
        let zero = Fq2::new(ark_bls12_381::Fq::from(0u64), ark_bls12_381::Fq::from(0u64));
        let w = Bls12_381::gt_from_coeffs([zero, one, zero, zero, zero, zero]);
        let w6 = w.pow([6u64]);
        let expected =
            Bls12_381::gt_from_coeffs([Bls12_381::fp6_nonresidue(), zero, zero, zero, zero, zero]);
        assert_eq!(w6, expected);
    }

    #[test]
    fn g1_coordinate_roundtrip() {
        let p = G1::<Bls12_381>::generator().to_affine();
        let (x, y) = Bls12_381::g1_xy(&p).unwrap();
        assert_eq!(Bls12_381::g1_from_xy(x, y).unwrap(), p);
        // y from the wrong curve point is rejected.
        assert!(Bls12_381::g1_from_xy(x, x).is_err());
    }

    #[test]
    fn g2_coordinate_roundtrip() {
        let p = G2::<Bls12_381>::generator().to_affine();
        let (x, y) = Bls12_381::g2_xy(&p).unwrap();
        assert_eq!(Bls12_381::g2_from_xy(x, y).unwrap(), p);
    }

    #[test]
    fn identity_has_no_coordinates() {
        assert!(Bls12_381::g1_xy(&G1::<Bls12_381>::identity().to_affine()).is_none());
        assert!(Bls12_381::g2_xy(&G2::<Bls12_381>::identity().to_affine()).is_none());
    }
}
