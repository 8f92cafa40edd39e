//! Shared implementation body for the concrete pairing backends.
//!
//! The invoking module must import `AffineRepr`, `Fp6Config`, `PrimeField`,
//! `Sha256`/`Digest`, `CurveId`, `Error`, `Result` and `PairingCurve`.

macro_rules! impl_pairing_backend {
    (
        engine: $engine:ty,
        fq2: $fq2:ty,
        fq6: $fq6:ty,
        fq12: $fq12:ty,
        fq6_config: $fq6cfg:ty,
        g1: $g1affine:ty,
        g2: $g2affine:ty,
        id: $id:expr,
        field_size: $fsize:expr,
    ) => {
        impl PairingCurve for $engine {
            const ID: CurveId = $id;
            const FIELD_SIZE: usize = $fsize;

            type Fp2 = $fq2;

            fn g1_xy(p: &Self::G1Affine) -> Option<(Self::BaseField, Self::BaseField)> {
                p.xy().map(|(x, y)| (*x, *y))
            }

            fn g1_from_xy(x: Self::BaseField, y: Self::BaseField) -> Result<Self::G1Affine> {
                let p = <$g1affine>::new_unchecked(x, y);
                if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
                    return Err(Error::DeserializationFailed);
                }
                Ok(p)
            }

            fn g1_from_x(x: Self::BaseField, greatest: bool) -> Result<Self::G1Affine> {
                let p = <$g1affine>::get_point_from_x_unchecked(x, greatest)
                    .ok_or(Error::SerializationFailed)?;
                if !p.is_in_correct_subgroup_assuming_on_curve() {
                    return Err(Error::DeserializationFailed);
                }
                Ok(p)
            }

            fn g2_xy(p: &Self::G2Affine) -> Option<(Self::Fp2, Self::Fp2)> {
                p.xy().map(|(x, y)| (*x, *y))
            }

            fn g2_from_xy(x: Self::Fp2, y: Self::Fp2) -> Result<Self::G2Affine> {
                let p = <$g2affine>::new_unchecked(x, y);
                if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
                    return Err(Error::DeserializationFailed);
                }
                Ok(p)
            }

            fn g2_from_x(x: Self::Fp2, greatest: bool) -> Result<Self::G2Affine> {
                let p = <$g2affine>::get_point_from_x_unchecked(x, greatest)
                    .ok_or(Error::SerializationFailed)?;
                if !p.is_in_correct_subgroup_assuming_on_curve() {
                    return Err(Error::DeserializationFailed);
                }
                Ok(p)
            }

            fn fp2_parts(v: &Self::Fp2) -> (Self::BaseField, Self::BaseField) {
                (v.c0, v.c1)
            }

            fn fp2_from_parts(c0: Self::BaseField, c1: Self::BaseField) -> Self::Fp2 {
                <$fq2>::new(c0, c1)
            }

            fn fp6_nonresidue() -> Self::Fp2 {
                <$fq6cfg as Fp6Config>::NONRESIDUE
            }

            fn gt_coeffs(v: &Self::TargetField) -> [Self::Fp2; 6] {
                // w-power basis over Fp2: with Fp12 = Fp6[w]/(w² − v) and
                // Fp6 = Fp2[v]/(v³ − ξ), the coefficient of w^(2j+i) is
                // (c_i).(c_j) of the tower representation.
                [v.c0.c0, v.c1.c0, v.c0.c1, v.c1.c1, v.c0.c2, v.c1.c2]
            }

            fn gt_from_coeffs(c: [Self::Fp2; 6]) -> Self::TargetField {
                <$fq12>::new(
                    <$fq6>::new(c[0], c[2], c[4]),
                    <$fq6>::new(c[1], c[3], c[5]),
                )
            }

            fn map_to_g1(digest: &[u8; 32]) -> Self::G1Affine {
                let mut ctr: u32 = 0;
                loop {
                    let mut h = Sha256::new();
                    h.update(ctr.to_be_bytes());
                    h.update(digest);
                    let cand = h.finalize();
                    let x = <Self::BaseField as PrimeField>::from_be_bytes_mod_order(&cand);
                    let greatest = cand[0] & 1 == 1;
                    if let Some(p) = <$g1affine>::get_point_from_x_unchecked(x, greatest) {
                        let p = p.mul_by_cofactor();
                        if !p.is_zero() {
                            return p;
                        }
                    }
                    ctr = ctr.wrapping_add(1);
                }
            }
        }
    };
}

pub(crate) use impl_pairing_backend;
