//! Linear secret sharing over a canonical policy tree.
//!
//! Every gate with threshold k over n children shares its value with a random
//! degree-(k−1) polynomial: child i receives q(i) for i = 1..=n, and any k
//! children recover q(0) by Lagrange interpolation. Leaves collect the shares;
//! duplicate attributes get distinct share identifiers (`attr#0`, `attr#1`,
//! …) assigned in pre-order, so the ciphertext and key sides derive the same
//! identifiers from the same canonical tree.

use std::collections::{BTreeSet, HashMap};

use rand_core::{CryptoRng, RngCore};

use super::TreeNode;
use crate::error::{Error, Result};
use crate::zml::{PairingCurve, Zp};

/// One leaf's share of the root secret.
#[derive(Debug, Clone)]
pub struct Share<E: PairingCurve> {
    /// Unique identifier of this leaf (`attr#occurrence`).
    pub id: String,
    /// Full attribute name the share is bound to.
    pub attr: String,
    pub value: Zp<E>,
}

/// Splits `secret` over the tree, one share per leaf.
pub fn gen_shares<E: PairingCurve, R: RngCore + CryptoRng>(
    secret: &Zp<E>,
    root: &TreeNode,
    rng: &mut R,
) -> Result<Vec<Share<E>>> {
    let mut shares = Vec::new();
    let mut counter = HashMap::new();
    share_node(secret, root, rng, &mut counter, &mut shares)?;
    Ok(shares)
}

fn share_node<E: PairingCurve, R: RngCore + CryptoRng>(
    value: &Zp<E>,
    node: &TreeNode,
    rng: &mut R,
    counter: &mut HashMap<String, u32>,
    out: &mut Vec<Share<E>>,
) -> Result<()> {
    match node {
        TreeNode::Leaf { .. } => {
            let attr = node.full_name().unwrap();
            let ordinal = counter.entry(attr.clone()).or_insert(0);
            let id = format!("{attr}#{ordinal}");
            *ordinal += 1;
            out.push(Share {
                id,
                attr,
                value: *value,
            });
            Ok(())
        }
        TreeNode::Gate { children, .. } => {
            let k = node.threshold() as usize;
            if k == 0 || k > children.len() {
                return Err(Error::InvalidInput);
            }
            // q(0) = value, higher coefficients random.
            let mut coeffs = Vec::with_capacity(k);
            coeffs.push(*value);
            for _ in 1..k {
                coeffs.push(Zp::random(rng)?);
            }
            for (i, child) in children.iter().enumerate() {
                let x = Zp::<E>::from_u64(i as u64 + 1);
                let share = eval_poly(&coeffs, &x);
                share_node(&share, child, rng, counter, out)?;
            }
            Ok(())
        }
    }
}

fn eval_poly<E: PairingCurve>(coeffs: &[Zp<E>], x: &Zp<E>) -> Zp<E> {
    let mut acc = Zp::zero();
    for c in coeffs.iter().rev() {
        acc = acc * *x + *c;
    }
    acc
}

/// A pruned witness: for each satisfied gate, the k children used for
/// reconstruction together with their 1-based polynomial indices.
enum SatNode {
    Leaf(String),
    Gate(Vec<(u64, SatNode)>),
}

/// Determines whether `attrs` satisfies the tree and, if so, returns the
/// Lagrange recovery coefficient for each used share identifier.
///
/// Fails with [`Error::DecryptionFailed`] when the attribute set does not
/// satisfy the policy.
pub fn recovery_coefficients<E: PairingCurve>(
    root: &TreeNode,
    attrs: &BTreeSet<String>,
) -> Result<Vec<(String, Zp<E>)>> {
    let mut counter = HashMap::new();
    let pruned = prune(root, attrs, &mut counter).ok_or(Error::DecryptionFailed)?;
    let mut coeffs = Vec::new();
    collect_coefficients(&pruned, &Zp::one(), &mut coeffs)?;
    Ok(coeffs)
}

fn prune(
    node: &TreeNode,
    attrs: &BTreeSet<String>,
    counter: &mut HashMap<String, u32>,
) -> Option<SatNode> {
    match node {
        TreeNode::Leaf { .. } => {
            let attr = node.full_name().unwrap();
            let ordinal = counter.entry(attr.clone()).or_insert(0);
            let id = format!("{attr}#{ordinal}");
            *ordinal += 1;
            attrs.contains(&attr).then_some(SatNode::Leaf(id))
        }
        TreeNode::Gate { children, .. } => {
            let k = node.threshold() as usize;
            // Every child is visited so leaf ordinals stay aligned with
            // share generation.
            let mut satisfied = Vec::new();
            for (i, child) in children.iter().enumerate() {
                if let Some(sat) = prune(child, attrs, counter) {
                    satisfied.push((i as u64 + 1, sat));
                }
            }
            if satisfied.len() < k {
                return None;
            }
            satisfied.truncate(k);
            Some(SatNode::Gate(satisfied))
        }
    }
}

fn collect_coefficients<E: PairingCurve>(
    node: &SatNode,
    multiplier: &Zp<E>,
    out: &mut Vec<(String, Zp<E>)>,
) -> Result<()> {
    match node {
        SatNode::Leaf(id) => {
            out.push((id.clone(), *multiplier));
            Ok(())
        }
        SatNode::Gate(chosen) => {
            let indices: Vec<u64> = chosen.iter().map(|(i, _)| *i).collect();
            for (i, child) in chosen {
                let lambda = lagrange_at_zero::<E>(*i, &indices)?;
                collect_coefficients(child, &(*multiplier * lambda), out)?;
            }
            Ok(())
        }
    }
}

/// `ℓ_j(0) = ∏_{m ≠ j} m / (m − j)` over the chosen index set.
fn lagrange_at_zero<E: PairingCurve>(j: u64, indices: &[u64]) -> Result<Zp<E>> {
    let mut acc = Zp::<E>::one();
    let xj = Zp::<E>::from_u64(j);
    for &m in indices {
        if m == j {
            continue;
        }
        let xm = Zp::<E>::from_u64(m);
        acc = acc * xm.div(&(xm - xj))?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use ark_bls12_381::Bls12_381;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Fr = Zp<Bls12_381>;

    fn reconstruct(policy: &str, attrs: &[&str]) -> Result<Fr> {
        let mut rng = StdRng::seed_from_u64(0x15_55);
        let policy: Policy = policy.parse().unwrap();
        let secret = Fr::random(&mut rng).unwrap();
        let shares = gen_shares(&secret, policy.root(), &mut rng).unwrap();

        let attr_set: BTreeSet<String> = attrs.iter().map(|s| s.to_string()).collect();
        let coeffs = recovery_coefficients::<Bls12_381>(policy.root(), &attr_set)?;

        let mut acc = Fr::zero();
        for (id, lambda) in &coeffs {
            let share = shares.iter().find(|s| &s.id == id).expect("unknown id");
            acc = acc + *lambda * share.value;
        }
        // Sanity: reconstruction must only use issued share ids.
        assert!(coeffs.len() <= shares.len());
        if acc != secret {
            return Err(Error::DecryptionFailed);
        }
        Ok(acc)
    }

    #[test]
    fn and_gate_needs_all() {
        assert!(reconstruct("a and b", &["a", "b"]).is_ok());
        assert_eq!(
            reconstruct("a and b", &["a"]).unwrap_err(),
            Error::DecryptionFailed
        );
    }

    #[test]
    fn or_gate_needs_one() {
        assert!(reconstruct("a or b", &["b"]).is_ok());
        assert!(reconstruct("a or b", &["a", "b"]).is_ok());
        assert!(reconstruct("a or b", &["c"]).is_err());
    }

    #[test]
    fn threshold_gate() {
        assert!(reconstruct("2 of (a, b, c)", &["a", "c"]).is_ok());
        assert!(reconstruct("2 of (a, b, c)", &["b", "c"]).is_ok());
        assert!(reconstruct("2 of (a, b, c)", &["b"]).is_err());
    }

    #[test]
    fn nested_policies() {
        let policy = "(a and b) or 2 of (c, d, e)";
        assert!(reconstruct(policy, &["a", "b"]).is_ok());
        assert!(reconstruct(policy, &["c", "e"]).is_ok());
        assert!(reconstruct(policy, &["a", "c"]).is_err());
    }

    #[test]
    fn duplicate_attributes_get_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy: Policy = "(a and b) or (a and c)".parse().unwrap();
        let secret = Fr::from_u32(99);
        let shares = gen_shares(&secret, policy.root(), &mut rng).unwrap();

        let a_ids: Vec<&str> = shares
            .iter()
            .filter(|s| s.attr == "a")
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(a_ids.len(), 2);
        assert_ne!(a_ids[0], a_ids[1]);

        assert!(reconstruct("(a and b) or (a and c)", &["a", "c"]).is_ok());
    }

    #[test]
    fn share_count_matches_leaves() {
        let mut rng = StdRng::seed_from_u64(1);
        let policy: Policy = "2 of (a, b and c, d or e)".parse().unwrap();
        let shares = gen_shares(&Fr::from_u32(5), policy.root(), &mut rng).unwrap();
        assert_eq!(shares.len(), 5);
    }

    #[test]
    fn single_leaf_policy() {
        assert!(reconstruct("a", &["a"]).is_ok());
        assert!(reconstruct("a", &["b"]).is_err());
    }
}
