//! Static registry of pairing-friendly (and NIST) curve metadata.
//!
//! The single-byte wire identifiers below appear verbatim in ciphertext
//! container headers and standard serialization headers; they must never be
//! renumbered.

use std::fmt;

use crate::error::{Error, Result};

/// Single-byte curve identifiers used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CurveId {
    None = 0x00,
    NistP256 = 0x32,
    NistP384 = 0x5A,
    NistP521 = 0xB7,
    BnP158 = 0x61,
    BnP254 = 0x6F,
    BnP256 = 0x73,
    Kss508 = 0x3C,
    BnP382 = 0xE4,
    BnP446 = 0xE5,
    BnP638 = 0x8D,
    Bls12P377 = 0xA1,
    Bls12P381 = 0xA2,
    Bls12P446 = 0xA3,
    Bls12P455 = 0xA4,
    Bls12P638 = 0xA5,
    Bls24P315 = 0xB1,
    Bls24P317 = 0xB2,
    Bls24P509 = 0xB3,
    Bls48P575 = 0xC1,
    Kss16P339 = 0xD1,
}

impl CurveId {
    pub fn from_byte(b: u8) -> Result<CurveId> {
        use CurveId::*;
        Ok(match b {
            0x00 => None,
            0x32 => NistP256,
            0x5A => NistP384,
            0xB7 => NistP521,
            0x61 => BnP158,
            0x6F => BnP254,
            0x73 => BnP256,
            0x3C => Kss508,
            0xE4 => BnP382,
            0xE5 => BnP446,
            0x8D => BnP638,
            0xA1 => Bls12P377,
            0xA2 => Bls12P381,
            0xA3 => Bls12P446,
            0xA4 => Bls12P455,
            0xA5 => Bls12P638,
            0xB1 => Bls24P315,
            0xB2 => Bls24P317,
            0xB3 => Bls24P509,
            0xC1 => Bls48P575,
            0xD1 => Kss16P339,
            _ => return Err(Error::InvalidGroupParams),
        })
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup_by_id(*self) {
            Some(info) => f.write_str(info.name),
            None => write!(f, "curve(0x{:02X})", *self as u8),
        }
    }
}

/// Curve family a wire identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFamily {
    Bn,
    Bls12,
    Bls24,
    Bls48,
    Kss,
    Nist,
}

/// Deployment guidance for a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStatus {
    Recommended,
    Good,
    Legacy,
    Weak,
}

/// Metadata for one registry entry.
#[derive(Debug, Clone, Copy)]
pub struct CurveInfo {
    pub id: CurveId,
    /// Parameter-string name, e.g. `"BLS12_381"`.
    pub name: &'static str,
    /// Human-facing name, e.g. `"BLS12-381"`.
    pub display_name: &'static str,
    pub family: CurveFamily,
    pub field_bits: u32,
    pub embedding_degree: u32,
    /// Estimated security level in bits.
    pub security_bits: u32,
    pub status: CurveStatus,
}

static CURVE_DATABASE: &[CurveInfo] = &[
    CurveInfo {
        id: CurveId::BnP158,
        name: "BN_P158",
        display_name: "BN-158",
        family: CurveFamily::Bn,
        field_bits: 158,
        embedding_degree: 12,
        security_bits: 64,
        status: CurveStatus::Weak,
    },
    CurveInfo {
        id: CurveId::BnP254,
        name: "BN_P254",
        display_name: "BN-254",
        family: CurveFamily::Bn,
        field_bits: 254,
        embedding_degree: 12,
        security_bits: 100,
        status: CurveStatus::Legacy,
    },
    CurveInfo {
        id: CurveId::BnP256,
        name: "BN_P256",
        display_name: "BN-256",
        family: CurveFamily::Bn,
        field_bits: 256,
        embedding_degree: 12,
        security_bits: 100,
        status: CurveStatus::Legacy,
    },
    CurveInfo {
        id: CurveId::BnP382,
        name: "BN_P382",
        display_name: "BN-382",
        family: CurveFamily::Bn,
        field_bits: 382,
        embedding_degree: 12,
        security_bits: 128,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::BnP446,
        name: "BN_P446",
        display_name: "BN-446",
        family: CurveFamily::Bn,
        field_bits: 446,
        embedding_degree: 12,
        security_bits: 192,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::BnP638,
        name: "BN_P638",
        display_name: "BN-638",
        family: CurveFamily::Bn,
        field_bits: 638,
        embedding_degree: 12,
        security_bits: 256,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Bls12P377,
        name: "BLS12_377",
        display_name: "BLS12-377",
        family: CurveFamily::Bls12,
        field_bits: 377,
        embedding_degree: 12,
        security_bits: 128,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::Bls12P381,
        name: "BLS12_381",
        display_name: "BLS12-381",
        family: CurveFamily::Bls12,
        field_bits: 381,
        embedding_degree: 12,
        security_bits: 128,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::Bls12P446,
        name: "BLS12_446",
        display_name: "BLS12-446",
        family: CurveFamily::Bls12,
        field_bits: 446,
        embedding_degree: 12,
        security_bits: 192,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::Bls12P455,
        name: "BLS12_455",
        display_name: "BLS12-455",
        family: CurveFamily::Bls12,
        field_bits: 455,
        embedding_degree: 12,
        security_bits: 192,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::Bls12P638,
        name: "BLS12_638",
        display_name: "BLS12-638",
        family: CurveFamily::Bls12,
        field_bits: 638,
        embedding_degree: 12,
        security_bits: 256,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::Bls24P315,
        name: "BLS24_315",
        display_name: "BLS24-315",
        family: CurveFamily::Bls24,
        field_bits: 315,
        embedding_degree: 24,
        security_bits: 128,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Bls24P317,
        name: "BLS24_317",
        display_name: "BLS24-317",
        family: CurveFamily::Bls24,
        field_bits: 317,
        embedding_degree: 24,
        security_bits: 128,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Bls24P509,
        name: "BLS24_509",
        display_name: "BLS24-509",
        family: CurveFamily::Bls24,
        field_bits: 509,
        embedding_degree: 24,
        security_bits: 192,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Bls48P575,
        name: "BLS48_575",
        display_name: "BLS48-575",
        family: CurveFamily::Bls48,
        field_bits: 575,
        embedding_degree: 48,
        security_bits: 256,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Kss16P339,
        name: "KSS16_339",
        display_name: "KSS16-339",
        family: CurveFamily::Kss,
        field_bits: 339,
        embedding_degree: 16,
        security_bits: 128,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::Kss508,
        name: "KSS_508",
        display_name: "KSS-508",
        family: CurveFamily::Kss,
        field_bits: 508,
        embedding_degree: 18,
        security_bits: 192,
        status: CurveStatus::Good,
    },
    CurveInfo {
        id: CurveId::NistP256,
        name: "NIST_P256",
        display_name: "NIST P-256",
        family: CurveFamily::Nist,
        field_bits: 256,
        embedding_degree: 1,
        security_bits: 128,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::NistP384,
        name: "NIST_P384",
        display_name: "NIST P-384",
        family: CurveFamily::Nist,
        field_bits: 384,
        embedding_degree: 1,
        security_bits: 192,
        status: CurveStatus::Recommended,
    },
    CurveInfo {
        id: CurveId::NistP521,
        name: "NIST_P521",
        display_name: "NIST P-521",
        family: CurveFamily::Nist,
        field_bits: 521,
        embedding_degree: 1,
        security_bits: 256,
        status: CurveStatus::Recommended,
    },
];

/// Looks up registry metadata by wire identifier.
pub fn lookup_by_id(id: CurveId) -> Option<&'static CurveInfo> {
    CURVE_DATABASE.iter().find(|info| info.id == id)
}

/// Looks up registry metadata by parameter-string or display name.
pub fn lookup_by_name(name: &str) -> Option<&'static CurveInfo> {
    CURVE_DATABASE
        .iter()
        .find(|info| info.name == name || info.display_name == name)
}

/// Bytes per base-field element, as used by the standard serializer.
pub fn field_size(id: CurveId) -> usize {
    match id {
        CurveId::BnP254 | CurveId::BnP256 | CurveId::NistP256 => 32,
        CurveId::BnP382 | CurveId::Bls12P381 | CurveId::NistP384 => 48,
        CurveId::BnP638 => 80,
        CurveId::NistP521 => 66,
        _ => 32,
    }
}
