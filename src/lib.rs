//! Attribute-based encryption (ABE) over pairing-friendly elliptic curves.
//!
//! This crate lets a data owner encrypt under a boolean **access policy**
//! over attributes (ciphertext-policy ABE, [`scheme::cpabe`]) or, dually,
//! under an attribute set with keys bound to a policy (key-policy ABE,
//! [`scheme::kpabe`]). Holders of a key whose attributes satisfy the policy
//! decrypt; others cannot, even colluding.
//!
//! The crate is layered bottom-up:
//!
//! * [`zml`] — backend-agnostic group arithmetic: the scalar field `Zp`,
//!   source and twist groups `G1`/`G2`, target group `Gt`, hash-to-G1,
//!   pairing and multi-pairing. Concrete backends cover BLS12-381 (default)
//!   and BN254; which curve is in play is a type parameter, so elements of
//!   different curves cannot be mixed.
//! * [`bytestring`] — the length-prefixed byte framing every serializer
//!   composes.
//! * [`policy`] — boolean access trees with deterministic canonicalization,
//!   the infix policy parser, and linear secret sharing over the tree.
//! * [`serial`] — bit-exact multi-format group-element serialization (SEC1,
//!   ZCash, Ethereum, IETF cyclotomic, legacy) under a self-describing
//!   header.
//! * [`keystore`] / [`container`] — named role-tagged key storage and the
//!   versioned ciphertext container.
//! * [`scheme`] — the Waters CP-ABE and GPSW KP-ABE drivers, hybrid AES-GCM
//!   packaging, and the Fujisaki-Okamoto style CCA transform.
//!
//! # Example
//!
//! ```
//! use abe::scheme::cpabe::CpAbeContext;
//! use abe::Bls12_381;
//!
//! let mut rng = rand::thread_rng();
//! let mut ctx = CpAbeContext::<Bls12_381>::new();
//! ctx.setup(&mut rng).unwrap();
//! ctx.keygen(&mut rng, "student|engineer", "alice").unwrap();
//!
//! let ct = ctx
//!     .encrypt(&mut rng, "student and engineer", b"top secret")
//!     .unwrap();
//! assert_eq!(ctx.decrypt("alice", &ct).unwrap(), b"top secret");
//! ```
//!
//! Random sampling always draws from the RNG the caller supplies — never an
//! internal one — so seeded RNGs reproduce identical elements on every
//! backend. The CCA transform's deterministic re-encryption check depends on
//! this.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod bytestring;
pub mod container;
pub mod curve;
pub mod error;
pub mod keystore;
pub mod policy;
pub mod scheme;
pub mod serial;
pub mod zml;

pub use bytestring::ByteString;
pub use container::Ciphertext;
pub use curve::{lookup_by_id, lookup_by_name, CurveId};
pub use error::{Error, Result};
pub use zml::bls12_381::Bls12_381;
pub use zml::bn254::Bn254;
pub use zml::{PairingContext, PairingCurve};
