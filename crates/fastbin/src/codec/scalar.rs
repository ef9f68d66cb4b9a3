// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width scalar codec.
//!
//! Every scalar occupies an 8-byte stride inside a composite object; only the
//! first [`ScalarKind::width`] bytes carry the little-endian value, the rest is
//! zero padding. Inside vectors and variant payloads scalars are packed at
//! their native width.

use crate::codec::cursor;
use crate::error::{FastbinError, Result};
use std::fmt;
use std::marker::PhantomData;

/// Primitive kinds supported by the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Native width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Schema type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    /// Resolve a schema type name. `byte` maps to `uint8`, `char` to `int8`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "int8" | "char" => Self::I8,
            "int16" => Self::I16,
            "int32" => Self::I32,
            "int64" => Self::I64,
            "uint8" | "byte" => Self::U8,
            "uint16" => Self::U16,
            "uint32" => Self::U32,
            "uint64" => Self::U64,
            "float32" => Self::F32,
            "float64" => Self::F64,
            _ => return None,
        };
        Some(kind)
    }

    /// Inclusive value range of an integer kind, `None` otherwise.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        let range = match self {
            Self::I8 => (i8::MIN as i128, i8::MAX as i128),
            Self::I16 => (i16::MIN as i128, i16::MAX as i128),
            Self::I32 => (i32::MIN as i128, i32::MAX as i128),
            Self::I64 => (i64::MIN as i128, i64::MAX as i128),
            Self::U8 => (0, u8::MAX as i128),
            Self::U16 => (0, u16::MAX as i128),
            Self::U32 => (0, u32::MAX as i128),
            Self::U64 => (0, u64::MAX as i128),
            Self::Bool | Self::F32 | Self::F64 => return None,
        };
        Some(range)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value that can be stored in a fixed field.
///
/// Values travel through a zero-extended `u64` holding their little-endian
/// bit pattern; the codec writes the low [`Scalar::WIDTH`] bytes of it.
pub trait Scalar: Copy + fmt::Debug + 'static {
    const KIND: ScalarKind;
    const WIDTH: usize = Self::KIND.width();

    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

/// Generate `Scalar` impls for integer types (eliminates code duplication)
macro_rules! impl_scalar_int {
    ($type:ty, $unsigned:ty, $kind:ident) => {
        impl Scalar for $type {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $type
            }
        }
    };
}

impl_scalar_int!(i8, u8, I8);
impl_scalar_int!(i16, u16, I16);
impl_scalar_int!(i32, u32, I32);
impl_scalar_int!(i64, u64, I64);
impl_scalar_int!(u8, u8, U8);
impl_scalar_int!(u16, u16, U16);
impl_scalar_int!(u32, u32, U32);
impl_scalar_int!(u64, u64, U64);

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    #[inline]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits & 0xFF != 0
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    #[inline]
    fn to_bits(self) -> u64 {
        u64::from(f32::to_bits(self))
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// Read `width` bytes at `offset` as a zero-extended little-endian word.
pub fn load_bits(buf: &[u8], offset: usize, width: usize) -> Result<u64> {
    let src = cursor::bytes(buf, offset, width)?;
    let mut raw = [0u8; 8];
    raw[..width].copy_from_slice(src);
    Ok(u64::from_le_bytes(raw))
}

/// Write the low `width` bytes of `bits` at `offset`.
pub fn store_bits(buf: &mut [u8], offset: usize, width: usize, bits: u64) -> Result<()> {
    cursor::store_bytes(buf, offset, &bits.to_le_bytes()[..width])
}

/// Read a scalar packed at its native width.
#[inline]
pub fn load<T: Scalar>(buf: &[u8], offset: usize) -> Result<T> {
    load_bits(buf, offset, T::WIDTH).map(T::from_bits)
}

/// Write a scalar packed at its native width.
#[inline]
pub fn store<T: Scalar>(buf: &mut [u8], offset: usize, value: T) -> Result<()> {
    store_bits(buf, offset, T::WIDTH, value.to_bits())
}

/// Write a scalar into a full 8-byte field stride, zeroing the padding.
pub fn store_field<T: Scalar>(buf: &mut [u8], offset: usize, value: T) -> Result<()> {
    cursor::store_u64(buf, offset, value.to_bits() & width_mask(T::WIDTH))
}

fn width_mask(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// A decoded scalar of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl ScalarValue {
    /// Decode the zero-extended bit pattern of a `kind` value.
    pub fn from_bits(kind: ScalarKind, bits: u64) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(bool::from_bits(bits)),
            ScalarKind::I8 => Self::I8(i8::from_bits(bits)),
            ScalarKind::I16 => Self::I16(i16::from_bits(bits)),
            ScalarKind::I32 => Self::I32(i32::from_bits(bits)),
            ScalarKind::I64 => Self::I64(i64::from_bits(bits)),
            ScalarKind::U8 => Self::U8(u8::from_bits(bits)),
            ScalarKind::U16 => Self::U16(u16::from_bits(bits)),
            ScalarKind::U32 => Self::U32(u32::from_bits(bits)),
            ScalarKind::U64 => Self::U64(u64::from_bits(bits)),
            ScalarKind::F32 => Self::F32(<f32 as Scalar>::from_bits(bits)),
            ScalarKind::F64 => Self::F64(<f64 as Scalar>::from_bits(bits)),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }

    /// Integer value widened to `i64`. `None` for bool, floats and `u64`
    /// values above `i64::MAX`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::I32(v) => Some(i64::from(v)),
            Self::I64(v) => Some(v),
            Self::U8(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            Self::U64(v) => i64::try_from(v).ok(),
            Self::Bool(_) | Self::F32(_) | Self::F64(_) => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
        }
    }
}

/// Zero-copy view of a packed primitive vector.
///
/// Elements are decoded on access; the bytes stay in the buffer.
#[derive(Clone, Copy)]
pub struct ScalarSlice<'a, T: Scalar> {
    bytes: &'a [u8],
    _marker: PhantomData<T>,
}

impl<'a, T: Scalar> ScalarSlice<'a, T> {
    /// Wrap packed bytes. Fails if the length is not a multiple of `T::WIDTH`.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % T::WIDTH != 0 {
            return Err(FastbinError::mismatch(
                format!("multiple of {} bytes for {}", T::WIDTH, T::KIND),
                format!("{} bytes", bytes.len()),
            ));
        }
        Ok(Self {
            bytes,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / T::WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        load::<T>(self.bytes, index * T::WIDTH).ok()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + 'a {
        self.bytes.chunks_exact(T::WIDTH).map(|chunk| {
            let mut raw = [0u8; 8];
            raw[..chunk.len()].copy_from_slice(chunk);
            T::from_bits(u64::from_le_bytes(raw))
        })
    }

    /// Raw packed bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Scalar> fmt::Debug for ScalarSlice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Scalar + PartialEq> PartialEq<[T]> for ScalarSlice<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == *b)
    }
}

/// Packed vector whose element kind is only known at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorRef<'a> {
    kind: ScalarKind,
    bytes: &'a [u8],
}

impl<'a> VectorRef<'a> {
    pub fn new(kind: ScalarKind, bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % kind.width() != 0 {
            return Err(FastbinError::mismatch(
                format!("multiple of {} bytes for {}", kind.width(), kind),
                format!("{} bytes", bytes.len()),
            ));
        }
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / self.kind.width()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        let width = self.kind.width();
        load_bits(self.bytes, index.checked_mul(width)?, width)
            .ok()
            .map(|bits| ScalarValue::from_bits(self.kind, bits))
    }

    /// Typed view; `T` must match the element kind.
    pub fn typed<T: Scalar>(&self) -> Result<ScalarSlice<'a, T>> {
        if T::KIND != self.kind {
            return Err(FastbinError::mismatch(
                format!("vector<{}>", self.kind),
                format!("vector<{}>", T::KIND),
            ));
        }
        ScalarSlice::new(self.bytes)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Encode `values` packed at native width into `out` (exactly `len * WIDTH` bytes).
pub fn pack_into<T: Scalar>(values: &[T], out: &mut [u8]) -> Result<()> {
    cursor::check(out.len(), 0, values.len() * T::WIDTH)?;
    for (chunk, value) in out.chunks_exact_mut(T::WIDTH).zip(values) {
        chunk.copy_from_slice(&value.to_bits().to_le_bytes()[..T::WIDTH]);
    }
    Ok(())
}
