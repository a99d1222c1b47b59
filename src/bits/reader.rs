/*
# Bits Reader Module

 Provides utilities for reading EBML primitives from byte slices.
 EBML encodes element ids and element sizes as variable-length integers (VINTs)
 whose length is given by the number of leading zero bits of the first byte,
 and stores integer and float payloads as big endian values of variable width.

 Key components:
 - VINT readers: `vint_length()`, `read_vint()`, `read_element_id()`
 - Payload readers: `read_unsigned()`, `read_signed()`, `read_float()`
 - Slice readers with position tracking: `read_i16()`
*/

/// Longest element id accepted (bytes, marker included).
pub const MAX_ID_LENGTH: usize = 4;

/// Longest size field accepted.
pub const MAX_VINT_LENGTH: usize = 8;

/// Mask for the `n` least significant bits.
pub fn mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Total length in bytes of a VINT starting with `first`, `None` for a zero byte.
pub fn vint_length(first: u8) -> Option<usize> {
    if first == 0 {
        None
    } else {
        Some(first.leading_zeros() as usize + 1)
    }
}

/// Result of decoding a VINT size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vint {
    /// Decoded value, `None` when every data bit is set (unknown size).
    pub value: Option<u64>,
    pub length: usize,
}

/// Read a VINT size field from a byte slice advancing the position.
///
/// Returns `None` when the slice does not hold the whole field yet or the
/// first byte is not a valid length descriptor; callers distinguish the two
/// with `vint_length`.
pub fn read_vint(data: &[u8], pos: &mut usize) -> Option<Vint> {
    let first = *data.get(*pos)?;
    let length = vint_length(first)?;
    if *pos + length > data.len() {
        return None;
    }

    let mut value = u64::from(first) & mask(8 - length as u32);
    for byte in &data[*pos + 1..*pos + length] {
        value = (value << 8) | u64::from(*byte);
    }
    *pos += length;

    let unknown = value == mask(7 * length as u32);
    Some(Vint {
        value: (!unknown).then_some(value),
        length,
    })
}

/// Read an element id from a byte slice advancing the position.
///
/// Element ids keep their length marker bits, so `0x1F43B675` is read as-is.
pub fn read_element_id(data: &[u8], pos: &mut usize) -> Option<(u32, usize)> {
    let first = *data.get(*pos)?;
    let length = vint_length(first)?;
    if length > MAX_ID_LENGTH || *pos + length > data.len() {
        return None;
    }

    let id = data[*pos..*pos + length]
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
    *pos += length;
    Some((id, length))
}

/// Read a big endian unsigned integer of up to 8 bytes.
pub fn read_unsigned(data: &[u8]) -> Option<u64> {
    if data.len() > 8 {
        return None;
    }
    Some(data.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Read a big endian two's complement integer of up to 8 bytes.
pub fn read_signed(data: &[u8]) -> Option<i64> {
    let raw = read_unsigned(data)?;
    if data.is_empty() || data.len() == 8 {
        return Some(raw as i64);
    }
    let bits = data.len() as u32 * 8;
    let shift = 64 - bits;
    Some(((raw << shift) as i64) >> shift)
}

/// Read a 0, 4 or 8 byte big endian float.
pub fn read_float(data: &[u8]) -> Option<f64> {
    match data.len() {
        0 => Some(0.0),
        4 => Some(f64::from(f32::from_be_bytes([
            data[0], data[1], data[2], data[3],
        ]))),
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(data);
            Some(f64::from_be_bytes(buf))
        }
        _ => None,
    }
}

/// Read a 16-bit big endian signed value from a byte slice advancing the position.
pub fn read_i16(data: &[u8], pos: &mut usize) -> Option<i16> {
    if *pos + 2 > data.len() {
        return None;
    }
    let v = i16::from_be_bytes([data[*pos], data[*pos + 1]]);
    *pos += 2;
    Some(v)
}
