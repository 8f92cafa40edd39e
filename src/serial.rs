//! Bit-exact multi-format serialization for group elements.
//!
//! Every standard encoding is preceded (when requested) by a self-describing
//! 9-byte header: `"OABE" | version | element type | curve id | format |
//! flags`. Buffers that do not start with the magic are legacy encodings and
//! fall through to the backend's native serializer.
//!
//! Supported point formats:
//! * SEC1 v2 (`0x00` infinity, `0x02`/`0x03` compressed, `0x04` uncompressed),
//! * ZCash BLS12-381 style (flag bits in the top three bits of the x
//!   coordinate, compressed elements exactly one field element wide),
//! * Ethereum BN254 style (raw `x‖y` zero-padded, all-zero = infinity),
//! * IETF pairing-friendly style for GT (full Fp12 tower, or cyclotomic
//!   compression storing 8 of the 12 Fp slots).
//!
//! Decompression recovers y via a field square root and picks the root whose
//! parity (SEC1) or lexicographic order (ZCash) matches the encoded sign.

use ark_ff::{BigInteger, Field, One, PrimeField, Zero};

use crate::bytestring::ByteString;
use crate::curve::{lookup_by_id, CurveFamily, CurveId};
use crate::error::{Error, Result};
use crate::zml::{PairingCurve, G1, G2, Gt};

/// Magic bytes opening every standard-format buffer.
pub const MAGIC: [u8; 4] = *b"OABE";
/// Current standard serialization version.
pub const VERSION: u8 = 0x02;
/// Header length in bytes.
pub const HEADER_LEN: usize = 9;

/// Flag bits carried in the header (and, for ZCash encodings, in the leading
/// payload byte).
pub mod flags {
    pub const COMPRESSED: u8 = 0x80;
    pub const INFINITY: u8 = 0x40;
    pub const Y_SIGN: u8 = 0x20;
    pub const CYCLOTOMIC: u8 = 0x10;
}

/// Wire tags for serialized element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    None = 0x00,
    Int = 0xA1,
    Zp = 0xB1,
    G1 = 0xB2,
    G2 = 0xB3,
    Gt = 0xB4,
    Policy = 0x7A,
    Attributes = 0x7C,
    ByteString = 0x1D,
}

impl ElementType {
    pub fn from_byte(b: u8) -> Result<Self> {
        use ElementType::*;
        Ok(match b {
            0x00 => None,
            0xA1 => Int,
            0xB1 => Zp,
            0xB2 => G1,
            0xB3 => G2,
            0xB4 => Gt,
            0x7A => Policy,
            0x7C => Attributes,
            0x1D => ByteString,
            _ => return Err(Error::DeserializationFailed),
        })
    }
}

/// Serialization format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Format {
    /// Backend-native encoding, for backward compatibility.
    Legacy = 0x00,
    Sec1 = 0x01,
    Zcash = 0x02,
    Ethereum = 0x03,
    Ietf = 0x04,
    /// Resolved per curve before anything hits the wire.
    Auto = 0xFF,
}

impl Format {
    pub fn from_byte(b: u8) -> Result<Self> {
        Ok(match b {
            0x00 => Format::Legacy,
            0x01 => Format::Sec1,
            0x02 => Format::Zcash,
            0x03 => Format::Ethereum,
            0x04 => Format::Ietf,
            0xFF => Format::Auto,
            _ => return Err(Error::DeserializationFailed),
        })
    }
}

/// Picks the conventional format for a curve family.
pub fn select_format(curve: CurveId) -> Format {
    match lookup_by_id(curve).map(|info| info.family) {
        Some(CurveFamily::Bls12) => Format::Zcash,
        Some(CurveFamily::Bn) if matches!(curve, CurveId::BnP254 | CurveId::BnP256) => {
            Format::Ethereum
        }
        Some(CurveFamily::Nist) => Format::Sec1,
        _ => Format::Legacy,
    }
}

/// Whether GT elements of this curve admit cyclotomic compression.
pub fn supports_cyclotomic_compression(curve: CurveId) -> bool {
    matches!(
        lookup_by_id(curve).map(|info| info.family),
        Some(CurveFamily::Bn) | Some(CurveFamily::Bls12)
    )
}

/// A buffer is legacy iff it does not open with the `"OABE"` magic.
pub fn is_legacy_format(input: &[u8]) -> bool {
    input.len() < 4 || input[..4] != MAGIC
}

/// The self-describing standard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub element_type: ElementType,
    pub curve_id: CurveId,
    pub format: Format,
    pub flags: u8,
}

impl Header {
    pub fn new(element_type: ElementType, curve_id: CurveId, format: Format, flags: u8) -> Self {
        Header {
            version: VERSION,
            element_type,
            curve_id,
            format,
            flags,
        }
    }

    pub fn serialize(&self, out: &mut ByteString) {
        out.append(&MAGIC);
        out.push(self.version);
        out.push(self.element_type as u8);
        out.push(self.curve_id as u8);
        out.push(self.format as u8);
        out.push(self.flags);
    }

    /// Parses a header at `index`, advancing past it on success.
    pub fn deserialize(input: &[u8], index: &mut usize) -> Result<Header> {
        let buf = input.get(*index..).ok_or(Error::DeserializationFailed)?;
        if buf.len() < HEADER_LEN {
            return Err(Error::DeserializationFailed);
        }
        if buf[..4] != MAGIC {
            return Err(Error::DeserializationFailed);
        }
        let header = Header {
            version: buf[4],
            element_type: ElementType::from_byte(buf[5])?,
            curve_id: CurveId::from_byte(buf[6]).map_err(|_| Error::DeserializationFailed)?,
            format: Format::from_byte(buf[7])?,
            flags: buf[8],
        };
        if header.version > VERSION {
            return Err(Error::DeserializationFailed);
        }
        *index += HEADER_LEN;
        Ok(header)
    }
}

// ---------------------------------------------------------------------------
// Field-element conversion helpers
// ---------------------------------------------------------------------------

/// Encodes a base-field element into exactly `size` bytes, zero-padding on
/// the high end (big-endian) or the low end (little-endian).
pub fn fp_to_bytes<F: PrimeField>(elem: &F, size: usize, big_endian: bool) -> Result<Vec<u8>> {
    let raw = elem.into_bigint().to_bytes_be();
    let first = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
    let minimal = &raw[first..];
    if minimal.len() > size {
        return Err(Error::SerializationFailed);
    }
    let mut out = vec![0u8; size];
    if big_endian {
        out[size - minimal.len()..].copy_from_slice(minimal);
    } else {
        for (i, b) in minimal.iter().rev().enumerate() {
            out[i] = *b;
        }
    }
    Ok(out)
}

/// Inverse of [`fp_to_bytes`]; rejects non-canonical (≥ p) encodings.
pub fn fp_from_bytes<F: PrimeField>(bytes: &[u8], big_endian: bool) -> Result<F> {
    let be;
    let bytes = if big_endian {
        bytes
    } else {
        be = bytes.iter().rev().copied().collect::<Vec<u8>>();
        &be
    };
    let elem = F::from_be_bytes_mod_order(bytes);
    // A value at or above p changes under reduction; round-trip to detect it.
    let canon = elem.into_bigint().to_bytes_be();
    if strip_zeros(&canon) != strip_zeros(bytes) {
        return Err(Error::DeserializationFailed);
    }
    Ok(elem)
}

fn strip_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

fn fp_is_odd<F: PrimeField>(v: &F) -> bool {
    v.into_bigint().is_odd()
}

/// Whether y is the lexicographically larger of the two square roots.
fn fp_is_lex_largest<F: PrimeField>(y: &F) -> bool {
    let neg = -*y;
    y.into_bigint() > neg.into_bigint()
}

fn fp2_is_lex_largest<E: PairingCurve>(y: &E::Fp2) -> bool {
    *y > -*y
}

fn take<'a>(input: &'a [u8], at: &mut usize, n: usize) -> Result<&'a [u8]> {
    let out = input
        .get(*at..*at + n)
        .ok_or(Error::DeserializationFailed)?;
    *at += n;
    Ok(out)
}

fn read_fp2<E: PairingCurve>(input: &[u8], at: &mut usize) -> Result<E::Fp2> {
    // Wire order is x1 first, then x0.
    let c1 = fp_from_bytes::<E::BaseField>(take(input, at, E::FIELD_SIZE)?, true)?;
    let c0 = fp_from_bytes::<E::BaseField>(take(input, at, E::FIELD_SIZE)?, true)?;
    Ok(E::fp2_from_parts(c0, c1))
}

fn write_fp2<E: PairingCurve>(out: &mut ByteString, v: &E::Fp2) -> Result<()> {
    let (c0, c1) = E::fp2_parts(v);
    out.append(&fp_to_bytes(&c1, E::FIELD_SIZE, true)?);
    out.append(&fp_to_bytes(&c0, E::FIELD_SIZE, true)?);
    Ok(())
}

/// Spare high bits in the leading byte of a field element; ZCash-style flag
/// packing needs at least three.
fn spare_top_bits(curve: CurveId) -> u32 {
    match lookup_by_id(curve) {
        Some(info) => {
            let total = crate::curve::field_size(curve) as u32 * 8;
            total.saturating_sub(info.field_bits)
        }
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// G1
// ---------------------------------------------------------------------------

/// Serializes a G1 point under `format` (AUTO resolves per curve), using
/// point compression where the format supports it.
pub fn serialize_g1<E: PairingCurve>(
    point: &G1<E>,
    format: Format,
    with_header: bool,
) -> Result<ByteString> {
    serialize_g1_with(point, format, with_header, true)
}

/// Like [`serialize_g1`], with an explicit compression choice (honored by
/// SEC1 and ZCash; Ethereum and legacy have a single representation).
pub fn serialize_g1_with<E: PairingCurve>(
    point: &G1<E>,
    format: Format,
    with_header: bool,
    compressed: bool,
) -> Result<ByteString> {
    let format = match format {
        Format::Auto => select_format(E::ID),
        f => f,
    };
    let mut out = ByteString::new();
    if with_header {
        Header::new(ElementType::G1, E::ID, format, 0).serialize(&mut out);
    }
    match format {
        Format::Zcash => g1_to_zcash(&mut out, point, compressed)?,
        Format::Ethereum => g1_to_ethereum(&mut out, point)?,
        Format::Sec1 => g1_to_sec1(&mut out, point, compressed)?,
        Format::Legacy => legacy_payload(&mut out, ElementType::G1, &point.to_native_bytes()?),
        Format::Ietf | Format::Auto => return Err(Error::NotImplemented),
    }
    Ok(out)
}

/// Deserializes a G1 point; headerless buffers without the magic fall back to
/// the legacy decoder.
pub fn deserialize_g1<E: PairingCurve>(input: &[u8], has_header: bool) -> Result<G1<E>> {
    let mut index = 0;
    let format = resolve_format::<E>(input, has_header, ElementType::G1, &mut index)?;
    let data = &input[index..];
    match format {
        Format::Zcash => g1_from_zcash(data),
        Format::Ethereum => g1_from_ethereum(data),
        Format::Sec1 => g1_from_sec1(data),
        Format::Legacy => {
            let native = legacy_unwrap(data, ElementType::G1)?;
            G1::from_native_bytes(native)
        }
        Format::Ietf | Format::Auto => Err(Error::NotImplemented),
    }
}

fn resolve_format<E: PairingCurve>(
    input: &[u8],
    has_header: bool,
    expect: ElementType,
    index: &mut usize,
) -> Result<Format> {
    if has_header && !is_legacy_format(input) {
        let header = Header::deserialize(input, index)?;
        if header.element_type != expect {
            return Err(Error::DeserializationFailed);
        }
        if header.curve_id != E::ID {
            return Err(Error::WrongGroup);
        }
        Ok(header.format)
    } else {
        Ok(Format::Legacy)
    }
}

fn g1_to_sec1<E: PairingCurve>(out: &mut ByteString, point: &G1<E>, compressed: bool) -> Result<()> {
    let affine = point.to_affine();
    let Some((x, y)) = E::g1_xy(&affine) else {
        out.push(0x00);
        return Ok(());
    };
    if compressed {
        out.push(if fp_is_odd(&y) { 0x03 } else { 0x02 });
        out.append(&fp_to_bytes(&x, E::FIELD_SIZE, true)?);
    } else {
        out.push(0x04);
        out.append(&fp_to_bytes(&x, E::FIELD_SIZE, true)?);
        out.append(&fp_to_bytes(&y, E::FIELD_SIZE, true)?);
    }
    Ok(())
}

fn g1_from_sec1<E: PairingCurve>(input: &[u8]) -> Result<G1<E>> {
    let prefix = *input.first().ok_or(Error::DeserializationFailed)?;
    match prefix {
        0x00 => {
            if input.len() != 1 {
                return Err(Error::SerializationFailed);
            }
            Ok(G1::identity())
        }
        0x02 | 0x03 => {
            if input.len() != 1 + E::FIELD_SIZE {
                return Err(Error::SerializationFailed);
            }
            let x = fp_from_bytes::<E::BaseField>(&input[1..], true)?;
            let want_odd = prefix == 0x03;
            let p = E::g1_from_x(x, true)?;
            let (_, y) = E::g1_xy(&p).ok_or(Error::SerializationFailed)?;
            let p = if fp_is_odd(&y) == want_odd {
                p
            } else {
                E::g1_from_x(x, false)?
            };
            Ok(G1::from_affine(p))
        }
        0x04 => {
            if input.len() != 1 + 2 * E::FIELD_SIZE {
                return Err(Error::SerializationFailed);
            }
            let x = fp_from_bytes::<E::BaseField>(&input[1..1 + E::FIELD_SIZE], true)?;
            let y = fp_from_bytes::<E::BaseField>(&input[1 + E::FIELD_SIZE..], true)?;
            Ok(G1::from_affine(E::g1_from_xy(x, y)?))
        }
        _ => Err(Error::SerializationFailed),
    }
}

fn g1_to_zcash<E: PairingCurve>(out: &mut ByteString, point: &G1<E>, compressed: bool) -> Result<()> {
    if spare_top_bits(E::ID) < 3 {
        return Err(Error::NotImplemented);
    }
    let affine = point.to_affine();
    let Some((x, y)) = E::g1_xy(&affine) else {
        let width = if compressed {
            E::FIELD_SIZE
        } else {
            2 * E::FIELD_SIZE
        };
        let mut buf = vec![0u8; width];
        buf[0] = if compressed {
            flags::COMPRESSED | flags::INFINITY
        } else {
            flags::INFINITY
        };
        out.append(&buf);
        return Ok(());
    };
    if compressed {
        let mut buf = fp_to_bytes(&x, E::FIELD_SIZE, true)?;
        buf[0] |= flags::COMPRESSED;
        if fp_is_lex_largest(&y) {
            buf[0] |= flags::Y_SIGN;
        }
        out.append(&buf);
    } else {
        out.append(&fp_to_bytes(&x, E::FIELD_SIZE, true)?);
        out.append(&fp_to_bytes(&y, E::FIELD_SIZE, true)?);
    }
    Ok(())
}

fn g1_from_zcash<E: PairingCurve>(input: &[u8]) -> Result<G1<E>> {
    if spare_top_bits(E::ID) < 3 {
        return Err(Error::NotImplemented);
    }
    let first = *input.first().ok_or(Error::DeserializationFailed)?;
    let compressed = first & flags::COMPRESSED != 0;
    let infinity = first & flags::INFINITY != 0;
    let width = if compressed {
        E::FIELD_SIZE
    } else {
        2 * E::FIELD_SIZE
    };
    if input.len() != width {
        return Err(Error::SerializationFailed);
    }
    if infinity {
        if input[0] & 0x3F != 0 || input[1..].iter().any(|&b| b != 0) {
            return Err(Error::SerializationFailed);
        }
        return Ok(G1::identity());
    }
    if compressed {
        let mut x_bytes = input.to_vec();
        x_bytes[0] &= 0x1F;
        let x = fp_from_bytes::<E::BaseField>(&x_bytes, true)?;
        let greatest = first & flags::Y_SIGN != 0;
        Ok(G1::from_affine(E::g1_from_x(x, greatest)?))
    } else {
        let x = fp_from_bytes::<E::BaseField>(&input[..E::FIELD_SIZE], true)?;
        let y = fp_from_bytes::<E::BaseField>(&input[E::FIELD_SIZE..], true)?;
        Ok(G1::from_affine(E::g1_from_xy(x, y)?))
    }
}

fn g1_to_ethereum<E: PairingCurve>(out: &mut ByteString, point: &G1<E>) -> Result<()> {
    if E::FIELD_SIZE != 32 {
        return Err(Error::NotImplemented);
    }
    let affine = point.to_affine();
    match E::g1_xy(&affine) {
        None => out.append(&[0u8; 64]),
        Some((x, y)) => {
            out.append(&fp_to_bytes(&x, 32, true)?);
            out.append(&fp_to_bytes(&y, 32, true)?);
        }
    }
    Ok(())
}

fn g1_from_ethereum<E: PairingCurve>(input: &[u8]) -> Result<G1<E>> {
    if E::FIELD_SIZE != 32 {
        return Err(Error::NotImplemented);
    }
    if input.len() != 64 {
        return Err(Error::SerializationFailed);
    }
    if input.iter().all(|&b| b == 0) {
        return Ok(G1::identity());
    }
    let x = fp_from_bytes::<E::BaseField>(&input[..32], true)?;
    let y = fp_from_bytes::<E::BaseField>(&input[32..], true)?;
    Ok(G1::from_affine(E::g1_from_xy(x, y)?))
}

// ---------------------------------------------------------------------------
// G2
// ---------------------------------------------------------------------------

/// Serializes a G2 point under `format` (AUTO resolves per curve), using
/// point compression where the format supports it.
pub fn serialize_g2<E: PairingCurve>(
    point: &G2<E>,
    format: Format,
    with_header: bool,
) -> Result<ByteString> {
    serialize_g2_with(point, format, with_header, true)
}

/// Like [`serialize_g2`], with an explicit compression choice (ZCash only;
/// the SEC1 G2 layout is always uncompressed).
pub fn serialize_g2_with<E: PairingCurve>(
    point: &G2<E>,
    format: Format,
    with_header: bool,
    compressed: bool,
) -> Result<ByteString> {
    let format = match format {
        Format::Auto => select_format(E::ID),
        f => f,
    };
    let mut out = ByteString::new();
    if with_header {
        Header::new(ElementType::G2, E::ID, format, 0).serialize(&mut out);
    }
    match format {
        Format::Zcash => g2_to_zcash(&mut out, point, compressed)?,
        Format::Ethereum => g2_to_ethereum(&mut out, point)?,
        Format::Sec1 => g2_to_sec1(&mut out, point)?,
        Format::Legacy => legacy_payload(&mut out, ElementType::G2, &point.to_native_bytes()?),
        Format::Ietf | Format::Auto => return Err(Error::NotImplemented),
    }
    Ok(out)
}

pub fn deserialize_g2<E: PairingCurve>(input: &[u8], has_header: bool) -> Result<G2<E>> {
    let mut index = 0;
    let format = resolve_format::<E>(input, has_header, ElementType::G2, &mut index)?;
    let data = &input[index..];
    match format {
        Format::Zcash => g2_from_zcash(data),
        Format::Ethereum => g2_from_ethereum(data),
        Format::Sec1 => g2_from_sec1(data),
        Format::Legacy => {
            let native = legacy_unwrap(data, ElementType::G2)?;
            G2::from_native_bytes(native)
        }
        Format::Ietf | Format::Auto => Err(Error::NotImplemented),
    }
}

// SEC1 has no canonical Fp2 story; the uncompressed `x1‖x0‖y1‖y0` layout is
// used for interoperability and compressed prefixes are rejected.
fn g2_to_sec1<E: PairingCurve>(out: &mut ByteString, point: &G2<E>) -> Result<()> {
    let affine = point.to_affine();
    let Some((x, y)) = E::g2_xy(&affine) else {
        out.push(0x00);
        return Ok(());
    };
    out.push(0x04);
    write_fp2::<E>(out, &x)?;
    write_fp2::<E>(out, &y)?;
    Ok(())
}

fn g2_from_sec1<E: PairingCurve>(input: &[u8]) -> Result<G2<E>> {
    let prefix = *input.first().ok_or(Error::DeserializationFailed)?;
    match prefix {
        0x00 => {
            if input.len() != 1 {
                return Err(Error::SerializationFailed);
            }
            Ok(G2::identity())
        }
        0x04 => {
            if input.len() != 1 + 4 * E::FIELD_SIZE {
                return Err(Error::SerializationFailed);
            }
            let mut at = 1;
            let x = read_fp2::<E>(input, &mut at)?;
            let y = read_fp2::<E>(input, &mut at)?;
            Ok(G2::from_affine(E::g2_from_xy(x, y)?))
        }
        0x02 | 0x03 => Err(Error::NotImplemented),
        _ => Err(Error::SerializationFailed),
    }
}

fn g2_to_zcash<E: PairingCurve>(out: &mut ByteString, point: &G2<E>, compressed: bool) -> Result<()> {
    if spare_top_bits(E::ID) < 3 {
        return Err(Error::NotImplemented);
    }
    let affine = point.to_affine();
    let Some((x, y)) = E::g2_xy(&affine) else {
        let width = if compressed {
            2 * E::FIELD_SIZE
        } else {
            4 * E::FIELD_SIZE
        };
        let mut buf = vec![0u8; width];
        buf[0] = if compressed {
            flags::COMPRESSED | flags::INFINITY
        } else {
            flags::INFINITY
        };
        out.append(&buf);
        return Ok(());
    };
    if compressed {
        let mut buf = ByteString::new();
        write_fp2::<E>(&mut buf, &x)?;
        let mut bytes = buf.into_vec();
        bytes[0] |= flags::COMPRESSED;
        if fp2_is_lex_largest::<E>(&y) {
            bytes[0] |= flags::Y_SIGN;
        }
        out.append(&bytes);
    } else {
        write_fp2::<E>(out, &x)?;
        write_fp2::<E>(out, &y)?;
    }
    Ok(())
}

fn g2_from_zcash<E: PairingCurve>(input: &[u8]) -> Result<G2<E>> {
    if spare_top_bits(E::ID) < 3 {
        return Err(Error::NotImplemented);
    }
    let first = *input.first().ok_or(Error::DeserializationFailed)?;
    let compressed = first & flags::COMPRESSED != 0;
    let infinity = first & flags::INFINITY != 0;
    let width = if compressed {
        2 * E::FIELD_SIZE
    } else {
        4 * E::FIELD_SIZE
    };
    if input.len() != width {
        return Err(Error::SerializationFailed);
    }
    if infinity {
        if input[0] & 0x3F != 0 || input[1..].iter().any(|&b| b != 0) {
            return Err(Error::SerializationFailed);
        }
        return Ok(G2::identity());
    }
    if compressed {
        let mut bytes = input.to_vec();
        bytes[0] &= 0x1F;
        let mut at = 0;
        let x = read_fp2::<E>(&bytes, &mut at)?;
        let greatest = first & flags::Y_SIGN != 0;
        Ok(G2::from_affine(E::g2_from_x(x, greatest)?))
    } else {
        let mut at = 0;
        let x = read_fp2::<E>(input, &mut at)?;
        let y = read_fp2::<E>(input, &mut at)?;
        Ok(G2::from_affine(E::g2_from_xy(x, y)?))
    }
}

fn g2_to_ethereum<E: PairingCurve>(out: &mut ByteString, point: &G2<E>) -> Result<()> {
    if E::FIELD_SIZE != 32 {
        return Err(Error::NotImplemented);
    }
    let affine = point.to_affine();
    match E::g2_xy(&affine) {
        None => out.append(&[0u8; 128]),
        Some((x, y)) => {
            write_fp2::<E>(out, &x)?;
            write_fp2::<E>(out, &y)?;
        }
    }
    Ok(())
}

fn g2_from_ethereum<E: PairingCurve>(input: &[u8]) -> Result<G2<E>> {
    if E::FIELD_SIZE != 32 {
        return Err(Error::NotImplemented);
    }
    if input.len() != 128 {
        return Err(Error::SerializationFailed);
    }
    if input.iter().all(|&b| b == 0) {
        return Ok(G2::identity());
    }
    let mut at = 0;
    let x = read_fp2::<E>(input, &mut at)?;
    let y = read_fp2::<E>(input, &mut at)?;
    Ok(G2::from_affine(E::g2_from_xy(x, y)?))
}

// ---------------------------------------------------------------------------
// GT
// ---------------------------------------------------------------------------

/// Serializes a GT element, cyclotomically compressed when `compressed` is
/// set and the curve supports it.
pub fn serialize_gt<E: PairingCurve>(
    gt: &Gt<E>,
    compressed: bool,
    with_header: bool,
) -> Result<ByteString> {
    let compressed = compressed && supports_cyclotomic_compression(E::ID);
    let mut out = ByteString::new();
    if with_header {
        let f = if compressed { flags::CYCLOTOMIC } else { 0 };
        Header::new(ElementType::Gt, E::ID, Format::Ietf, f).serialize(&mut out);
    }
    if compressed {
        gt_to_cyclotomic(&mut out, gt)?;
    } else {
        gt_to_full(&mut out, gt)?;
    }
    Ok(out)
}

pub fn deserialize_gt<E: PairingCurve>(input: &[u8], has_header: bool) -> Result<Gt<E>> {
    let mut index = 0;
    let mut cyclotomic = false;
    if has_header && !is_legacy_format(input) {
        let header = Header::deserialize(input, &mut index)?;
        if header.element_type != ElementType::Gt {
            return Err(Error::DeserializationFailed);
        }
        if header.curve_id != E::ID {
            return Err(Error::WrongGroup);
        }
        cyclotomic = header.flags & flags::CYCLOTOMIC != 0;
    } else if has_header {
        // Legacy fallback.
        let native = legacy_unwrap(input, ElementType::Gt)?;
        return gt_from_native::<E>(native);
    }
    let data = &input[index..];
    let gt = if cyclotomic {
        gt_from_cyclotomic(data)?
    } else {
        gt_from_full(data)?
    };
    if !gt.is_member() {
        return Err(Error::DeserializationFailed);
    }
    Ok(gt)
}

/// The 12 Fp slots of the tower representation, indexed `6i + 2j + k`.
fn gt_tower<E: PairingCurve>(gt: &Gt<E>) -> [E::BaseField; 12] {
    let g = E::gt_coeffs(&gt.v);
    // Fp6 coefficient order: c0 = (g0, g2, g4), c1 = (g1, g3, g5).
    let order = [g[0], g[2], g[4], g[1], g[3], g[5]];
    let mut slots = [E::BaseField::zero(); 12];
    for (j, fp2) in order.iter().enumerate() {
        let (c0, c1) = E::fp2_parts(fp2);
        slots[2 * j] = c0;
        slots[2 * j + 1] = c1;
    }
    slots
}

fn gt_from_tower<E: PairingCurve>(slots: &[E::BaseField; 12]) -> Gt<E> {
    let fp2 = |j: usize| E::fp2_from_parts(slots[2 * j], slots[2 * j + 1]);
    let coeffs = [fp2(0), fp2(3), fp2(1), fp2(4), fp2(2), fp2(5)];
    Gt {
        v: E::gt_from_coeffs(coeffs),
    }
}

fn gt_to_full<E: PairingCurve>(out: &mut ByteString, gt: &Gt<E>) -> Result<()> {
    if gt.is_identity() {
        let mut buf = vec![0u8; 12 * E::FIELD_SIZE];
        buf[0] = flags::INFINITY;
        out.append(&buf);
        return Ok(());
    }
    for slot in gt_tower(gt) {
        out.append(&fp_to_bytes(&slot, E::FIELD_SIZE, true)?);
    }
    Ok(())
}

fn gt_from_full<E: PairingCurve>(input: &[u8]) -> Result<Gt<E>> {
    if input.len() != 12 * E::FIELD_SIZE {
        return Err(Error::SerializationFailed);
    }
    if input[0] & flags::INFINITY != 0 {
        if input[1..].iter().any(|&b| b != 0) {
            return Err(Error::SerializationFailed);
        }
        return Ok(Gt::identity());
    }
    let mut slots = [E::BaseField::zero(); 12];
    let mut at = 0;
    for slot in slots.iter_mut() {
        *slot = fp_from_bytes(take(input, &mut at, E::FIELD_SIZE)?, true)?;
    }
    Ok(gt_from_tower(&slots))
}

/// Cyclotomic compression in the Granger–Scott/Karabina form.
///
/// With `Fp12 = Fp4[z]/(z³ − s)`, `Fp4 = Fp2[s]/(s² − ξ)` and `z = w`,
/// `s = w³`, an element is `(g0 + g1·s) + (g2 + g3·s)·z + (g4 + g5·s)·z²`;
/// the compressed form keeps `[g2, g3, g4, g5]` — the coefficients of
/// `w¹, w⁴, w², w⁵` — and the decoder rebuilds `g0` (w⁰) and `g1` (w³).
fn gt_to_cyclotomic<E: PairingCurve>(out: &mut ByteString, gt: &Gt<E>) -> Result<()> {
    if gt.is_identity() {
        let mut buf = vec![0u8; 8 * E::FIELD_SIZE];
        buf[0] = flags::INFINITY;
        out.append(&buf);
        return Ok(());
    }
    let c = E::gt_coeffs(&gt.v);
    for coeff in [c[1], c[4], c[2], c[5]] {
        let (c0, c1) = E::fp2_parts(&coeff);
        out.append(&fp_to_bytes(&c0, E::FIELD_SIZE, true)?);
        out.append(&fp_to_bytes(&c1, E::FIELD_SIZE, true)?);
    }
    Ok(())
}

/// Granger–Scott reconstruction of `g1` and `g0` from `g2..g5`, valid for
/// elements of the cyclotomic subgroup:
///
/// * `g2 ≠ 0`: `g1 = (ξ·g5² + 3·g4² − 2·g3) / (4·g2)`
/// * `g2 = 0`: `g1 = (2·g4·g5) / g3`
/// * then `g0 = (2·g1² + g2·g5 − 3·g3·g4)·ξ + 1`.
fn gt_from_cyclotomic<E: PairingCurve>(input: &[u8]) -> Result<Gt<E>> {
    if input.len() != 8 * E::FIELD_SIZE {
        return Err(Error::SerializationFailed);
    }
    if input[0] & flags::INFINITY != 0 {
        if input[1..].iter().any(|&b| b != 0) {
            return Err(Error::SerializationFailed);
        }
        return Ok(Gt::identity());
    }

    let mut at = 0;
    let mut read_coeff = || -> Result<E::Fp2> {
        let c0 = fp_from_bytes::<E::BaseField>(take(input, &mut at, E::FIELD_SIZE)?, true)?;
        let c1 = fp_from_bytes::<E::BaseField>(take(input, &mut at, E::FIELD_SIZE)?, true)?;
        Ok(E::fp2_from_parts(c0, c1))
    };
    let g2 = read_coeff()?;
    let g3 = read_coeff()?;
    let g4 = read_coeff()?;
    let g5 = read_coeff()?;

    let xi = E::fp6_nonresidue();
    let three = E::Fp2::one() + E::Fp2::one() + E::Fp2::one();
    let four = three + E::Fp2::one();

    let g1 = if !g2.is_zero() {
        let num = g5.square() * xi + g4.square() * three - g3.double();
        let den = g2 * four;
        num * den.inverse().ok_or(Error::SerializationFailed)?
    } else if !g3.is_zero() {
        let num = (g4 * g5).double();
        num * g3.inverse().ok_or(Error::SerializationFailed)?
    } else {
        return Err(Error::SerializationFailed);
    };
    let g0 = (g1.square().double() + g2 * g5 - g3 * g4 * three) * xi + E::Fp2::one();

    // Back to w-power coefficients: w⁰..w⁵ = g0, g2, g4, g1, g3, g5.
    let gt = Gt {
        v: E::gt_from_coeffs([g0, g2, g4, g1, g3, g5]),
    };
    Ok(gt)
}

fn gt_from_native<E: PairingCurve>(native: &[u8]) -> Result<Gt<E>> {
    let gt = Gt::from_native_bytes(native)?;
    if !gt.is_member() {
        return Err(Error::DeserializationFailed);
    }
    Ok(gt)
}

/// Headerless legacy GT encoding (tag, length, native field bytes).
pub fn serialize_gt_legacy<E: PairingCurve>(gt: &Gt<E>) -> Result<ByteString> {
    let mut out = ByteString::new();
    legacy_payload(&mut out, ElementType::Gt, &gt.to_native_bytes()?);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Legacy payload framing and conversion
// ---------------------------------------------------------------------------

fn legacy_payload(out: &mut ByteString, tag: ElementType, native: &[u8]) {
    out.push(tag as u8);
    out.pack16(native.len() as u16);
    out.append(native);
}

fn legacy_unwrap(input: &[u8], tag: ElementType) -> Result<&[u8]> {
    if input.len() < 3 || input[0] != tag as u8 {
        return Err(Error::DeserializationFailed);
    }
    let len = u16::from_be_bytes([input[1], input[2]]) as usize;
    if input.len() != 3 + len {
        return Err(Error::SerializationFailed);
    }
    Ok(&input[3..])
}

/// Re-encodes a legacy (headerless) G1/G2 buffer under a standard header
/// with the curve's conventional format.
pub fn convert_legacy_to_standard<E: PairingCurve>(
    input: &[u8],
    element_type: ElementType,
) -> Result<ByteString> {
    if !is_legacy_format(input) {
        return Err(Error::InvalidInput);
    }
    match element_type {
        ElementType::G1 => {
            let point = deserialize_g1::<E>(input, false)?;
            serialize_g1(&point, Format::Auto, true)
        }
        ElementType::G2 => {
            let point = deserialize_g2::<E>(input, false)?;
            serialize_g2(&point, Format::Auto, true)
        }
        ElementType::Gt => {
            let native = legacy_unwrap(input, ElementType::Gt)?;
            let gt = gt_from_native::<E>(native)?;
            serialize_gt(&gt, true, true)
        }
        _ => Err(Error::NotImplemented),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zml::{pairing, Zp};
    use ark_bls12_381::Bls12_381;
    use ark_bn254::Bn254;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5e71a1)
    }

    #[test]
    fn header_roundtrip() {
        let h = Header::new(
            ElementType::G1,
            CurveId::Bls12P381,
            Format::Zcash,
            flags::COMPRESSED,
        );
        let mut out = ByteString::new();
        h.serialize(&mut out);
        assert_eq!(out.len(), HEADER_LEN);
        assert_eq!(&out.as_slice()[..4], b"OABE");

        let mut index = 0;
        let parsed = Header::deserialize(out.as_slice(), &mut index).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(index, HEADER_LEN);
    }

    #[test]
    fn header_rejects_future_version() {
        let mut out = ByteString::new();
        Header::new(ElementType::G1, CurveId::Bls12P381, Format::Zcash, 0).serialize(&mut out);
        let mut bytes = out.into_vec();
        bytes[4] = VERSION + 1;
        let mut index = 0;
        assert!(Header::deserialize(&bytes, &mut index).is_err());
    }

    #[test]
    fn auto_format_by_family() {
        assert_eq!(select_format(CurveId::Bls12P381), Format::Zcash);
        assert_eq!(select_format(CurveId::Bls12P377), Format::Zcash);
        assert_eq!(select_format(CurveId::BnP254), Format::Ethereum);
        assert_eq!(select_format(CurveId::BnP256), Format::Ethereum);
        assert_eq!(select_format(CurveId::NistP256), Format::Sec1);
        assert_eq!(select_format(CurveId::BnP638), Format::Legacy);
    }

    #[test]
    fn fp_bytes_pad_both_ends() {
        let v = ark_bls12_381::Fq::from(0x0a0bu64);
        let be = fp_to_bytes(&v, 4, true).unwrap();
        assert_eq!(be, vec![0x00, 0x00, 0x0a, 0x0b]);
        let le = fp_to_bytes(&v, 4, false).unwrap();
        assert_eq!(le, vec![0x0b, 0x0a, 0x00, 0x00]);
        assert_eq!(fp_from_bytes::<ark_bls12_381::Fq>(&be, true).unwrap(), v);
        assert_eq!(fp_from_bytes::<ark_bls12_381::Fq>(&le, false).unwrap(), v);
    }

    #[test]
    fn fp_from_bytes_rejects_noncanonical() {
        // p itself is not a canonical residue.
        let p_bytes =
            <ark_bls12_381::Fq as PrimeField>::MODULUS.to_bytes_be();
        assert!(fp_from_bytes::<ark_bls12_381::Fq>(&p_bytes, true).is_err());
    }

    #[test]
    fn bn254_ethereum_g1_lengths_and_roundtrip() {
        let p = G1::<Bn254>::random(&mut rng()).unwrap();

        let plain = serialize_g1(&p, Format::Ethereum, false).unwrap();
        assert_eq!(plain.len(), 64);
        let with_header = serialize_g1(&p, Format::Ethereum, true).unwrap();
        assert_eq!(with_header.len(), 73);

        let q = deserialize_g1::<Bn254>(with_header.as_slice(), true).unwrap();
        assert_eq!(p, q);
        // Re-encoding the decoded point reproduces the bytes.
        assert_eq!(serialize_g1(&q, Format::Ethereum, true).unwrap(), with_header);
    }

    #[test]
    fn bn254_ethereum_g2_roundtrip() {
        let p = G2::<Bn254>::random(&mut rng()).unwrap();
        let bytes = serialize_g2(&p, Format::Ethereum, false).unwrap();
        assert_eq!(bytes.len(), 128);

        let with_header = serialize_g2(&p, Format::Ethereum, true).unwrap();
        assert_eq!(with_header.len(), 128 + HEADER_LEN);
        assert_eq!(deserialize_g2::<Bn254>(with_header.as_slice(), true).unwrap(), p);
    }

    #[test]
    fn ethereum_infinity_is_all_zero() {
        let id = G1::<Bn254>::identity();
        let bytes = serialize_g1(&id, Format::Ethereum, false).unwrap();
        assert!(bytes.as_slice().iter().all(|&b| b == 0));
        let with_header = serialize_g1(&id, Format::Ethereum, true).unwrap();
        assert!(deserialize_g1::<Bn254>(with_header.as_slice(), true)
            .unwrap()
            .is_identity());
    }

    #[test]
    fn zcash_g1_compressed_roundtrip() {
        let p = G1::<Bls12_381>::random(&mut rng()).unwrap();
        let bytes = serialize_g1(&p, Format::Zcash, true).unwrap();
        assert_eq!(bytes.len(), 48 + HEADER_LEN);
        let q = deserialize_g1::<Bls12_381>(bytes.as_slice(), true).unwrap();
        assert_eq!(p, q);
        assert_eq!(serialize_g1(&q, Format::Zcash, true).unwrap(), bytes);
    }

    #[test]
    fn zcash_g1_compressed_infinity() {
        let bytes = serialize_g1(&G1::<Bls12_381>::identity(), Format::Zcash, false).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(bytes.as_slice()[0], 0xC0);
        assert!(bytes.as_slice()[1..].iter().all(|&b| b == 0));

        let with_header =
            serialize_g1(&G1::<Bls12_381>::identity(), Format::Zcash, true).unwrap();
        assert!(deserialize_g1::<Bls12_381>(with_header.as_slice(), true)
            .unwrap()
            .is_identity());
    }

    #[test]
    fn zcash_uncompressed_roundtrip() {
        let mut r = rng();
        let p = G1::<Bls12_381>::random(&mut r).unwrap();
        let bytes = serialize_g1_with(&p, Format::Zcash, true, false).unwrap();
        assert_eq!(bytes.len(), 2 * 48 + HEADER_LEN);
        assert_eq!(deserialize_g1::<Bls12_381>(bytes.as_slice(), true).unwrap(), p);

        let q = G2::<Bls12_381>::random(&mut r).unwrap();
        let bytes = serialize_g2_with(&q, Format::Zcash, true, false).unwrap();
        assert_eq!(bytes.len(), 4 * 48 + HEADER_LEN);
        assert_eq!(deserialize_g2::<Bls12_381>(bytes.as_slice(), true).unwrap(), q);

        // Uncompressed infinity carries the bare infinity flag.
        let inf = serialize_g1_with(&G1::<Bls12_381>::identity(), Format::Zcash, false, false)
            .unwrap();
        assert_eq!(inf.len(), 96);
        assert_eq!(inf.as_slice()[0], 0x40);
    }

    #[test]
    fn sec1_uncompressed_roundtrip() {
        let mut r = rng();
        let p = G1::<Bls12_381>::random(&mut r).unwrap();
        let bytes = serialize_g1_with(&p, Format::Sec1, true, false).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 1 + 2 * 48);
        assert_eq!(bytes.as_slice()[HEADER_LEN], 0x04);
        assert_eq!(deserialize_g1::<Bls12_381>(bytes.as_slice(), true).unwrap(), p);
    }

    #[test]
    fn zcash_g2_compressed_roundtrip() {
        let p = G2::<Bls12_381>::random(&mut rng()).unwrap();
        let bytes = serialize_g2(&p, Format::Zcash, true).unwrap();
        assert_eq!(bytes.len(), 96 + HEADER_LEN);
        let q = deserialize_g2::<Bls12_381>(bytes.as_slice(), true).unwrap();
        assert_eq!(p, q);
        assert_eq!(serialize_g2(&q, Format::Zcash, true).unwrap(), bytes);
    }

    #[test]
    fn zcash_rejects_bn254() {
        // BN254 leaves only two spare bits; flag packing would corrupt x.
        let p = G1::<Bn254>::random(&mut rng()).unwrap();
        assert_eq!(
            serialize_g1(&p, Format::Zcash, false).unwrap_err(),
            Error::NotImplemented
        );
    }

    #[test]
    fn sec1_g1_compressed_roundtrip() {
        let mut r = rng();
        for _ in 0..8 {
            let p = G1::<Bls12_381>::random(&mut r).unwrap();
            let bytes = serialize_g1(&p, Format::Sec1, true).unwrap();
            let prefix = bytes.as_slice()[HEADER_LEN];
            assert!(prefix == 0x02 || prefix == 0x03);
            assert_eq!(bytes.len(), HEADER_LEN + 1 + 48);
            assert_eq!(deserialize_g1::<Bls12_381>(bytes.as_slice(), true).unwrap(), p);
        }
        // A negated point flips parity, so both prefixes are exercised.
        let p = G1::<Bls12_381>::random(&mut r).unwrap();
        let a = serialize_g1(&p, Format::Sec1, false).unwrap();
        let b = serialize_g1(&(-p), Format::Sec1, false).unwrap();
        assert_ne!(a.as_slice()[0], b.as_slice()[0]);
    }

    #[test]
    fn sec1_infinity_is_single_byte() {
        let bytes = serialize_g1(&G1::<Bls12_381>::identity(), Format::Sec1, false).unwrap();
        assert_eq!(bytes.as_slice(), &[0x00]);
    }

    #[test]
    fn sec1_g2_uncompressed_roundtrip() {
        let p = G2::<Bls12_381>::random(&mut rng()).unwrap();
        let bytes = serialize_g2(&p, Format::Sec1, true).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 1 + 4 * 48);
        assert_eq!(deserialize_g2::<Bls12_381>(bytes.as_slice(), true).unwrap(), p);
    }

    #[test]
    fn gt_full_roundtrip() {
        let mut r = rng();
        let p = G1::<Bls12_381>::random(&mut r).unwrap();
        let q = G2::<Bls12_381>::random(&mut r).unwrap();
        let gt = pairing(&p, &q);

        let bytes = serialize_gt(&gt, false, true).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 12 * 48);
        assert_eq!(deserialize_gt::<Bls12_381>(bytes.as_slice(), true).unwrap(), gt);
    }

    #[test]
    fn gt_cyclotomic_roundtrip() {
        let mut r = rng();
        for _ in 0..4 {
            let p = G1::<Bls12_381>::random(&mut r).unwrap();
            let q = G2::<Bls12_381>::random(&mut r).unwrap();
            let gt = pairing(&p, &q);

            let bytes = serialize_gt(&gt, true, true).unwrap();
            assert_eq!(bytes.len(), HEADER_LEN + 8 * 48);
            assert_eq!(deserialize_gt::<Bls12_381>(bytes.as_slice(), true).unwrap(), gt);
        }
    }

    #[test]
    fn gt_cyclotomic_roundtrip_bn254() {
        let mut r = rng();
        let gt = pairing(
            &G1::<Bn254>::random(&mut r).unwrap(),
            &G2::<Bn254>::random(&mut r).unwrap(),
        );
        let bytes = serialize_gt(&gt, true, true).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 8 * 32);
        assert_eq!(deserialize_gt::<Bn254>(bytes.as_slice(), true).unwrap(), gt);
    }

    #[test]
    fn gt_exponent_survives_cyclotomic() {
        // Compression must hold for arbitrary subgroup elements, not just
        // pairing outputs.
        let g = pairing(
            &G1::<Bls12_381>::generator(),
            &G2::<Bls12_381>::generator(),
        );
        let x = g.pow(&Zp::from_u32(123456789));
        let bytes = serialize_gt(&x, true, true).unwrap();
        assert_eq!(deserialize_gt::<Bls12_381>(bytes.as_slice(), true).unwrap(), x);
    }

    #[test]
    fn gt_identity_roundtrips_both_modes() {
        for compressed in [false, true] {
            let bytes = serialize_gt(&Gt::<Bls12_381>::identity(), compressed, true).unwrap();
            assert!(deserialize_gt::<Bls12_381>(bytes.as_slice(), true)
                .unwrap()
                .is_identity());
        }
    }

    #[test]
    fn gt_decode_rejects_non_subgroup_tower() {
        // A full tower of small integers is not in the r-order subgroup.
        let mut bytes = ByteString::new();
        Header::new(ElementType::Gt, CurveId::Bls12P381, Format::Ietf, 0).serialize(&mut bytes);
        for i in 0..12u8 {
            let mut slot = vec![0u8; 48];
            slot[47] = i + 2;
            bytes.append(&slot);
        }
        assert!(deserialize_gt::<Bls12_381>(bytes.as_slice(), true).is_err());
    }

    #[test]
    fn legacy_roundtrip_and_conversion() {
        let p = G1::<Bls12_381>::random(&mut rng()).unwrap();
        let legacy = serialize_g1(&p, Format::Legacy, false).unwrap();
        assert!(is_legacy_format(legacy.as_slice()));
        assert_eq!(deserialize_g1::<Bls12_381>(legacy.as_slice(), false).unwrap(), p);
        // A headered read of a legacy buffer also falls back.
        assert_eq!(deserialize_g1::<Bls12_381>(legacy.as_slice(), true).unwrap(), p);

        let standard = convert_legacy_to_standard::<Bls12_381>(
            legacy.as_slice(),
            ElementType::G1,
        )
        .unwrap();
        assert!(!is_legacy_format(standard.as_slice()));
        assert_eq!(deserialize_g1::<Bls12_381>(standard.as_slice(), true).unwrap(), p);
        assert_eq!(
            convert_legacy_to_standard::<Bls12_381>(standard.as_slice(), ElementType::G1)
                .unwrap_err(),
            Error::InvalidInput
        );
    }

    #[test]
    fn legacy_gt_converts_to_standard() {
        let mut r = rng();
        let gt = pairing(
            &G1::<Bls12_381>::random(&mut r).unwrap(),
            &G2::<Bls12_381>::random(&mut r).unwrap(),
        );
        let legacy = serialize_gt_legacy(&gt).unwrap();
        assert!(is_legacy_format(legacy.as_slice()));

        let standard =
            convert_legacy_to_standard::<Bls12_381>(legacy.as_slice(), ElementType::Gt).unwrap();
        assert_eq!(
            deserialize_gt::<Bls12_381>(standard.as_slice(), true).unwrap(),
            gt
        );
    }

    #[test]
    fn wrong_curve_header_is_detected() {
        let p = G1::<Bls12_381>::random(&mut rng()).unwrap();
        let bytes = serialize_g1(&p, Format::Zcash, true).unwrap();
        assert_eq!(
            deserialize_g1::<Bn254>(bytes.as_slice(), true).unwrap_err(),
            Error::WrongGroup
        );
    }

    #[test]
    fn truncated_buffers_fail_typed() {
        let p = G1::<Bls12_381>::random(&mut rng()).unwrap();
        let bytes = serialize_g1(&p, Format::Zcash, true).unwrap();
        for cut in [0, 3, HEADER_LEN, bytes.len() - 1] {
            assert!(deserialize_g1::<Bls12_381>(&bytes.as_slice()[..cut], true).is_err());
        }
    }

    #[test]
    fn sec1_decode_rejects_bad_prefix() {
        let mut buf = vec![0x07u8];
        buf.extend_from_slice(&[0u8; 48]);
        assert!(g1_from_sec1::<Bls12_381>(&buf).is_err());
    }
}
