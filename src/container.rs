//! Self-describing ciphertext container.
//!
//! On the wire a ciphertext is two length-prefixed sections:
//!
//! ```text
//! smart_pack( libVersion(1) | curveId(1) | schemeId(1) | uid(16) )
//! smart_pack( body )
//! ```
//!
//! The UID is drawn from the caller's RNG when the header is set unless an
//! external UID of at least 16 bytes was supplied, in which case it is
//! honored verbatim.

use rand_core::{CryptoRng, RngCore};

use crate::bytestring::ByteString;
use crate::curve::CurveId;
use crate::error::{Error, Result};
use crate::scheme::SchemeId;

/// Container header byte for the library version ("1.7").
pub const LIBRARY_VERSION: u8 = 170;
/// Ciphertext identifier length.
pub const UID_LEN: usize = 16;

const HEADER_LEN: usize = 3 + UID_LEN;

/// A versioned ciphertext: header metadata plus an opaque scheme body.
#[derive(Debug, Clone)]
pub struct Ciphertext {
    lib_version: u8,
    curve_id: CurveId,
    scheme_id: SchemeId,
    uid: ByteString,
    uid_set_extern: bool,
    body: ByteString,
}

impl PartialEq for Ciphertext {
    /// Wire equality: everything that is exported is compared; whether the
    /// UID was supplied externally is not observable on the wire.
    fn eq(&self, other: &Self) -> bool {
        self.lib_version == other.lib_version
            && self.curve_id == other.curve_id
            && self.scheme_id == other.scheme_id
            && self.uid == other.uid
            && self.body == other.body
    }
}

impl Eq for Ciphertext {}

impl Ciphertext {
    pub fn new() -> Self {
        Ciphertext {
            lib_version: LIBRARY_VERSION,
            curve_id: CurveId::None,
            scheme_id: SchemeId::None,
            uid: ByteString::from(vec![0u8; UID_LEN]),
            uid_set_extern: false,
            body: ByteString::new(),
        }
    }

    /// Like [`Ciphertext::new`], with an externally chosen UID. UIDs shorter
    /// than 16 bytes are ignored and a random one is generated later.
    pub fn with_uid(uid: &[u8]) -> Self {
        let mut ct = Self::new();
        if uid.len() >= UID_LEN {
            ct.uid = ByteString::from(uid);
            ct.uid_set_extern = true;
        }
        ct
    }

    /// Stamps the header, sampling a fresh UID unless one was supplied
    /// externally.
    pub fn set_header<R: RngCore + CryptoRng>(
        &mut self,
        curve_id: CurveId,
        scheme_id: SchemeId,
        rng: &mut R,
    ) -> Result<()> {
        self.curve_id = curve_id;
        self.scheme_id = scheme_id;
        self.lib_version = LIBRARY_VERSION;
        if !self.uid_set_extern {
            let mut uid = vec![0u8; UID_LEN];
            rng.try_fill_bytes(&mut uid)
                .map_err(|_| Error::RandInsufficient)?;
            self.uid = ByteString::from(uid);
        }
        Ok(())
    }

    pub fn set_body(&mut self, body: ByteString) {
        self.body = body;
    }

    pub fn body(&self) -> &ByteString {
        &self.body
    }

    pub fn lib_version(&self) -> u8 {
        self.lib_version
    }

    pub fn curve_id(&self) -> CurveId {
        self.curve_id
    }

    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    pub fn uid(&self) -> &ByteString {
        &self.uid
    }

    /// Serializes header and body.
    pub fn export_with_header(&self, output: &mut ByteString) {
        let mut header = ByteString::with_capacity(HEADER_LEN);
        header.push(self.lib_version);
        header.push(self.curve_id as u8);
        header.push(self.scheme_id as u8);
        header.append(&self.uid.as_slice()[..UID_LEN]);

        output.clear();
        output.smart_pack(&header);
        output.smart_pack(&self.body);
    }

    /// Inverse of [`Ciphertext::export_with_header`].
    ///
    /// Verifies that the producing library is not newer than this one, that
    /// both sections parse, and that the body is non-empty. The curve is
    /// resolved from the header's curve identifier.
    pub fn load_with_header(input: &ByteString) -> Result<Self> {
        let mut index = 0;
        let header = input.smart_unpack(&mut index)?;
        if header.len() != HEADER_LEN {
            return Err(Error::SerializationFailed);
        }
        let hdr = header.as_slice();
        if hdr[0] > LIBRARY_VERSION {
            return Err(Error::InvalidLibVersion);
        }
        let body = input
            .smart_unpack(&mut index)
            .map_err(|_| Error::InvalidCiphertextBody)?;
        if body.is_empty() {
            return Err(Error::InvalidCiphertextBody);
        }

        Ok(Ciphertext {
            lib_version: hdr[0],
            curve_id: CurveId::from_byte(hdr[1]).map_err(|_| Error::SerializationFailed)?,
            scheme_id: SchemeId::from_byte(hdr[2]).map_err(|_| Error::SerializationFailed)?,
            uid: ByteString::from(&hdr[3..]),
            uid_set_extern: true,
            body,
        })
    }

    /// Serializes only the body; the header travels out-of-band.
    pub fn export_without_header(&self, output: &mut ByteString) {
        output.clear();
        output.smart_pack(&self.body);
    }

    /// Inverse of [`Ciphertext::export_without_header`].
    pub fn load_without_header(&mut self, input: &ByteString) -> Result<()> {
        let mut index = 0;
        let body = input
            .smart_unpack(&mut index)
            .map_err(|_| Error::InvalidCiphertextBody)?;
        if body.is_empty() {
            return Err(Error::InvalidCiphertextBody);
        }
        self.body = body;
        Ok(())
    }
}

impl Default for Ciphertext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Ciphertext {
        let mut rng = StdRng::seed_from_u64(0xc7);
        let mut ct = Ciphertext::new();
        ct.set_header(CurveId::Bls12P381, SchemeId::CpWaters, &mut rng)
            .unwrap();
        ct.set_body(ByteString::from(b"body-bytes".as_slice()));
        ct
    }

    #[test]
    fn header_roundtrip() {
        let ct = sample();
        let mut out = ByteString::new();
        ct.export_with_header(&mut out);

        let loaded = Ciphertext::load_with_header(&out).unwrap();
        assert_eq!(loaded, ct);
        assert_eq!(loaded.curve_id(), CurveId::Bls12P381);
        assert_eq!(loaded.scheme_id(), SchemeId::CpWaters);
        assert_eq!(loaded.uid().len(), UID_LEN);
        assert_eq!(loaded.body().as_slice(), b"body-bytes");
    }

    #[test]
    fn wire_layout() {
        let ct = sample();
        let mut out = ByteString::new();
        ct.export_with_header(&mut out);
        let bytes = out.as_slice();
        // 4-byte length, then the 19-byte header.
        assert_eq!(&bytes[..4], &[0, 0, 0, 19]);
        assert_eq!(bytes[4], LIBRARY_VERSION);
        assert_eq!(bytes[5], CurveId::Bls12P381 as u8);
        assert_eq!(bytes[6], SchemeId::CpWaters as u8);
    }

    #[test]
    fn future_version_is_rejected() {
        let ct = sample();
        let mut out = ByteString::new();
        ct.export_with_header(&mut out);
        let mut bytes = out.into_vec();
        bytes[4] = LIBRARY_VERSION + 1;
        assert_eq!(
            Ciphertext::load_with_header(&ByteString::from(bytes)).unwrap_err(),
            Error::InvalidLibVersion
        );
    }

    #[test]
    fn empty_body_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ct = Ciphertext::new();
        ct.set_header(CurveId::BnP254, SchemeId::KpGpsw, &mut rng)
            .unwrap();
        let mut out = ByteString::new();
        ct.export_with_header(&mut out);
        assert_eq!(
            Ciphertext::load_with_header(&out).unwrap_err(),
            Error::InvalidCiphertextBody
        );
    }

    #[test]
    fn truncated_input_is_rejected() {
        let ct = sample();
        let mut out = ByteString::new();
        ct.export_with_header(&mut out);
        let bytes = out.as_slice();
        for cut in [0, 3, 10, bytes.len() - 1] {
            let partial = ByteString::from(&bytes[..cut]);
            assert!(Ciphertext::load_with_header(&partial).is_err());
        }
    }

    #[test]
    fn external_uid_is_honored() {
        let mut rng = StdRng::seed_from_u64(2);
        let uid = [7u8; 16];
        let mut ct = Ciphertext::with_uid(&uid);
        ct.set_header(CurveId::Bls12P381, SchemeId::CpWaters, &mut rng)
            .unwrap();
        assert_eq!(ct.uid().as_slice(), &uid);

        // Too-short external UIDs fall back to random.
        let mut ct = Ciphertext::with_uid(&[1, 2, 3]);
        ct.set_header(CurveId::Bls12P381, SchemeId::CpWaters, &mut rng)
            .unwrap();
        assert_ne!(ct.uid().as_slice(), &[1, 2, 3]);
        assert_eq!(ct.uid().len(), UID_LEN);
    }

    #[test]
    fn bodies_without_header_roundtrip() {
        let ct = sample();
        let mut out = ByteString::new();
        ct.export_without_header(&mut out);

        let mut other = Ciphertext::new();
        other.load_without_header(&out).unwrap();
        assert_eq!(other.body(), ct.body());
    }

    #[test]
    fn uids_differ_between_ciphertexts() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut a = Ciphertext::new();
        a.set_header(CurveId::Bls12P381, SchemeId::CpWaters, &mut rng)
            .unwrap();
        let mut b = Ciphertext::new();
        b.set_header(CurveId::Bls12P381, SchemeId::CpWaters, &mut rng)
            .unwrap();
        assert_ne!(a.uid(), b.uid());
    }
}
