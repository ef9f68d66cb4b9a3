// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged variant: one active kind out of a closed list.
//!
//! ```text
//! [u64: size << 8 | tag][payload]
//! ```
//!
//! `size` counts the header and the payload. The tag is the position of the
//! active kind in the [`VariantDef`]. A freshly created variant has size 8 and
//! no payload; that is the empty state, distinct from holding kind 0.
//!
//! Payloads are packed: scalars at their native width, strings and vectors
//! as raw bytes, nested objects, arrays and variants as their own finalized
//! bytes.

use crate::array::StructArray;
use crate::buffer::{self, Encoded, OwnedBuf};
use crate::codec::{cursor, scalar, FastbinEnum, Scalar, ScalarSlice, ScalarValue, VectorRef};
use crate::config::{VARIANT_HEADER_SIZE, VARIANT_TAG_BITS, VARIANT_TAG_MASK};
use crate::error::{FastbinError, Result};
use crate::layout::{FieldKind, VariantDef};
use crate::object::{expect_schema, Object};
use std::fmt;

/// View of a tagged variant.
pub struct Variant<'s, B> {
    def: &'s VariantDef,
    buf: B,
}

/// Decoded active value of a variant.
#[derive(Debug)]
pub enum VariantValue<'a, 's> {
    Scalar(ScalarValue),
    Enum { raw: i64, name: &'s str },
    Str(&'a str),
    Vector(VectorRef<'a>),
    Object(Object<'s, &'a [u8]>),
    Array(StructArray<'s, &'a [u8]>),
    Variant(Variant<'s, &'a [u8]>),
}

impl<'s, B: AsRef<[u8]>> Variant<'s, B> {
    /// Wrap existing bytes, validating the header.
    pub fn open(def: &'s VariantDef, buf: B) -> Result<Self> {
        let variant = Self { def, buf };
        variant.validate()?;
        Ok(variant)
    }

    fn validate(&self) -> Result<()> {
        let word = cursor::load_u64(self.buf.as_ref(), 0)?;
        let size = word >> VARIANT_TAG_BITS;
        let tag = (word & VARIANT_TAG_MASK) as usize;
        let valid = size >= VARIANT_HEADER_SIZE as u64
            && size <= self.capacity() as u64
            && (size == VARIANT_HEADER_SIZE as u64 || tag < self.def.types_count());
        if !valid {
            return Err(FastbinError::InvalidHeader { offset: 0, word });
        }
        Ok(())
    }

    pub fn def(&self) -> &'s VariantDef {
        self.def
    }

    pub fn types_count(&self) -> usize {
        self.def.types_count()
    }

    pub fn capacity(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    pub fn as_view(&self) -> Variant<'s, &[u8]> {
        Variant {
            def: self.def,
            buf: self.buf.as_ref(),
        }
    }

    fn header(&self) -> u64 {
        let mut raw = [0u8; VARIANT_HEADER_SIZE];
        raw.copy_from_slice(&self.buf.as_ref()[..VARIANT_HEADER_SIZE]);
        u64::from_le_bytes(raw)
    }

    /// Header plus payload.
    pub fn binary_size(&self) -> usize {
        (self.header() >> VARIANT_TAG_BITS) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.binary_size() == VARIANT_HEADER_SIZE
    }

    /// Tag of the active kind, `None` when empty.
    pub fn index(&self) -> Option<u8> {
        (!self.is_empty()).then(|| (self.header() & VARIANT_TAG_MASK) as u8)
    }

    pub fn holds_alternative(&self, tag: u8) -> bool {
        self.index() == Some(tag)
    }

    /// Declared kind of the active value.
    pub fn active_kind(&self) -> Option<&'s FieldKind> {
        self.index().and_then(|tag| self.def.kind(tag).ok())
    }

    pub fn payload(&self) -> &[u8] {
        &self.buf.as_ref()[VARIANT_HEADER_SIZE..self.binary_size()]
    }

    /// Header plus payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[..self.binary_size()]
    }

    fn active(&self) -> Result<(&'s FieldKind, &[u8])> {
        let tag = self.index().ok_or(FastbinError::EmptyVariant)?;
        Ok((self.def.kind(tag)?, self.payload()))
    }

    pub fn get_scalar<T: Scalar>(&self) -> Result<T> {
        let (kind, payload) = self.active()?;
        kind.expect_scalar::<T>()?;
        scalar::load::<T>(payload, 0)
    }

    pub fn get_enum<E: FastbinEnum>(&self) -> Result<E> {
        let (kind, payload) = self.active()?;
        match kind {
            FieldKind::Enum(def) if def.name == E::NAME => {
                E::from_repr(scalar::load::<E::Repr>(payload, 0)?)
            }
            other => Err(FastbinError::mismatch(
                format!("enum:{}", E::NAME),
                other.to_string(),
            )),
        }
    }

    pub fn get_str(&self) -> Result<&str> {
        let (kind, payload) = self.active()?;
        if *kind != FieldKind::String {
            return Err(FastbinError::mismatch("string", kind.to_string()));
        }
        std::str::from_utf8(payload).map_err(|_| FastbinError::InvalidUtf8 {
            offset: VARIANT_HEADER_SIZE,
        })
    }

    pub fn get_vector<T: Scalar>(&self) -> Result<ScalarSlice<'_, T>> {
        let (kind, payload) = self.active()?;
        kind.expect_vector::<T>()?;
        ScalarSlice::new(payload)
    }

    pub fn get_object(&self) -> Result<Object<'s, &[u8]>> {
        self.as_view().into_object()
    }

    pub fn get_array(&self) -> Result<StructArray<'s, &[u8]>> {
        self.as_view().into_array()
    }

    pub fn get_variant(&self) -> Result<Variant<'s, &[u8]>> {
        self.as_view().into_variant()
    }

    /// Decode the active value whatever its kind.
    pub fn get(&self) -> Result<VariantValue<'_, 's>> {
        let (kind, payload) = self.active()?;
        let value = match kind {
            FieldKind::Scalar(kind) => {
                let bits = scalar::load_bits(payload, 0, kind.width())?;
                VariantValue::Scalar(ScalarValue::from_bits(*kind, bits))
            }
            FieldKind::Enum(def) => {
                let bits = scalar::load_bits(payload, 0, def.repr.width())?;
                let raw = ScalarValue::from_bits(def.repr, bits)
                    .as_i64()
                    .ok_or_else(|| FastbinError::mismatch("integer enum value", def.repr.name()))?;
                VariantValue::Enum {
                    raw,
                    name: def.name_of(raw)?,
                }
            }
            FieldKind::String => VariantValue::Str(self.get_str()?),
            FieldKind::Vector(element) => VariantValue::Vector(VectorRef::new(*element, payload)?),
            FieldKind::EnumVector(def) => VariantValue::Vector(VectorRef::new(def.repr, payload)?),
            FieldKind::Object(schema) => VariantValue::Object(Object::open(schema, payload)),
            FieldKind::Array(element) => {
                VariantValue::Array(StructArray::open(element, payload)?)
            }
            FieldKind::Variant(def) => VariantValue::Variant(Variant::open(def, payload)?),
        };
        Ok(value)
    }

    /// Independent owned duplicate of exactly `binary_size()` bytes.
    pub fn copy(&self) -> Variant<'s, OwnedBuf> {
        Variant {
            def: self.def,
            buf: buffer::copy_owned(self.as_bytes()),
        }
    }

    /// Duplicate into `dest`; spare room stays available for larger values.
    pub fn copy_into<'d>(&self, dest: &'d mut [u8]) -> Result<Variant<'s, &'d mut [u8]>> {
        let buf = buffer::copy_to(self.as_bytes(), dest)?;
        Ok(Variant { def: self.def, buf })
    }

    /// Variants are sealed by every set; returns the binary size.
    pub fn finalize(&self) -> usize {
        self.binary_size()
    }
}

/// Accessors on a borrowed view that keep the lifetime of the underlying
/// bytes, so nested containers can be chained without a named binding.
impl<'a, 's> Variant<'s, &'a [u8]> {
    fn into_active(self) -> Result<(&'s FieldKind, &'a [u8])> {
        let tag = self.index().ok_or(FastbinError::EmptyVariant)?;
        let size = self.binary_size();
        let buf: &'a [u8] = self.buf;
        Ok((self.def.kind(tag)?, &buf[VARIANT_HEADER_SIZE..size]))
    }

    pub fn into_object(self) -> Result<Object<'s, &'a [u8]>> {
        match self.into_active()? {
            (FieldKind::Object(schema), payload) => Ok(Object::open(schema, payload)),
            (other, _) => Err(FastbinError::mismatch("struct", other.to_string())),
        }
    }

    pub fn into_array(self) -> Result<StructArray<'s, &'a [u8]>> {
        match self.into_active()? {
            (FieldKind::Array(element), payload) => StructArray::open(element, payload),
            (other, _) => Err(FastbinError::mismatch("struct array", other.to_string())),
        }
    }

    pub fn into_variant(self) -> Result<Variant<'s, &'a [u8]>> {
        match self.into_active()? {
            (FieldKind::Variant(def), payload) => Variant::open(def, payload),
            (other, _) => Err(FastbinError::mismatch("variant", other.to_string())),
        }
    }
}

impl Variant<'_, OwnedBuf> {
    /// Bytes a variant holding a `payload_len` byte value occupies.
    pub fn calc_binary_size(payload_len: usize) -> usize {
        VARIANT_HEADER_SIZE + payload_len
    }
}

impl<'s, B: AsRef<[u8]> + AsMut<[u8]>> Variant<'s, B> {
    /// Zero the buffer and write the empty header (size 8).
    pub fn create(def: &'s VariantDef, mut buf: B) -> Result<Self> {
        buffer::zero_fill(buf.as_mut(), VARIANT_HEADER_SIZE)?;
        let mut variant = Self { def, buf };
        variant.store_header(0, VARIANT_HEADER_SIZE);
        Ok(variant)
    }

    fn store_header(&mut self, tag: u8, size: usize) {
        let word = ((size as u64) << VARIANT_TAG_BITS) | u64::from(tag);
        self.buf.as_mut()[..VARIANT_HEADER_SIZE].copy_from_slice(&word.to_le_bytes());
    }

    /// Replace the active value: check capacity, fill the payload, then
    /// write the header.
    fn store<F>(&mut self, tag: u8, len: usize, fill: F) -> Result<()>
    where
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        let needed = VARIANT_HEADER_SIZE + len;
        if needed > self.capacity() {
            log::debug!(
                "[variant] tag {} needs {} bytes, capacity {}",
                tag,
                needed,
                self.capacity()
            );
            return Err(FastbinError::CapacityExceeded {
                needed,
                available: self.capacity(),
            });
        }
        fill(&mut self.buf.as_mut()[VARIANT_HEADER_SIZE..needed])?;
        self.store_header(tag, needed);
        log::trace!("[variant] set tag={} size={}", tag, needed);
        Ok(())
    }

    /// Store a scalar (or an enum's integer representation) under `tag`.
    pub fn set_scalar<T: Scalar>(&mut self, tag: u8, value: T) -> Result<()> {
        self.def.kind(tag)?.expect_scalar::<T>()?;
        self.store(tag, T::WIDTH, |dst| scalar::store(dst, 0, value))
    }

    pub fn set_enum<E: FastbinEnum>(&mut self, tag: u8, value: E) -> Result<()> {
        match self.def.kind(tag)? {
            FieldKind::Enum(def) if def.name == E::NAME => {}
            other => {
                return Err(FastbinError::mismatch(
                    other.to_string(),
                    format!("enum:{}", E::NAME),
                ))
            }
        }
        self.set_scalar(tag, value.to_repr())
    }

    pub fn set_str(&mut self, tag: u8, value: &str) -> Result<()> {
        let kind = self.def.kind(tag)?;
        if *kind != FieldKind::String {
            return Err(FastbinError::mismatch(kind.to_string(), "string"));
        }
        self.store(tag, value.len(), |dst| {
            dst.copy_from_slice(value.as_bytes());
            Ok(())
        })
    }

    pub fn set_vector<T: Scalar>(&mut self, tag: u8, values: &[T]) -> Result<()> {
        self.def.kind(tag)?.expect_vector::<T>()?;
        self.store(tag, values.len() * T::WIDTH, |dst| {
            scalar::pack_into(values, dst)
        })
    }

    /// Store a copy of a finalized object.
    pub fn set_object<V: AsRef<[u8]>>(&mut self, tag: u8, value: &Object<'_, V>) -> Result<()> {
        let FieldKind::Object(schema) = self.def.kind(tag)? else {
            return Err(FastbinError::mismatch(
                self.def.kind(tag)?.to_string(),
                "struct",
            ));
        };
        expect_schema(schema, value.schema())?;
        self.store_bytes(tag, value.as_bytes()?)
    }

    pub fn set_array<V: AsRef<[u8]>>(&mut self, tag: u8, value: &StructArray<'_, V>) -> Result<()> {
        let FieldKind::Array(element) = self.def.kind(tag)? else {
            return Err(FastbinError::mismatch(
                self.def.kind(tag)?.to_string(),
                "struct array",
            ));
        };
        expect_schema(element, value.element())?;
        self.store_bytes(tag, value.as_bytes())
    }

    pub fn set_variant<V: AsRef<[u8]>>(&mut self, tag: u8, value: &Variant<'_, V>) -> Result<()> {
        match self.def.kind(tag)? {
            FieldKind::Variant(def) if **def == *value.def() => {}
            other => return Err(FastbinError::mismatch(other.to_string(), value.def().to_string())),
        }
        self.store_bytes(tag, value.as_bytes())
    }

    fn store_bytes(&mut self, tag: u8, bytes: &[u8]) -> Result<()> {
        self.store(tag, bytes.len(), |dst| {
            dst.copy_from_slice(bytes);
            Ok(())
        })
    }
}

impl<B: AsRef<[u8]>> Encoded for Variant<'_, B> {
    fn binary_size(&self) -> Result<usize> {
        Ok(Variant::binary_size(self))
    }

    fn encoded_bytes(&self) -> Result<&[u8]> {
        Ok(self.as_bytes())
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for Variant<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("def", &self.def.to_string())
            .field("index", &self.index())
            .field("kind", &self.active_kind().map(|kind| kind.to_string()))
            .field("binary_size", &self.binary_size())
            .finish()
    }
}
