// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Staged object writer.
//!
//! [`Object`] setters locate every field by walking the headers in front of
//! it, and a field behind an unwritten variable field cannot be located at
//! all. [`ObjectWriter`] enforces the write order instead: each `put_*` call
//! names the next field in declaration order, the kind is checked against
//! the schema, and the bytes go at a running cursor without re-walking.
//!
//! ```text
//! new() --put field 0--> ... --put field n-1--> finish() -> Object
//! ```
//!
//! A rejected call (wrong field, wrong kind, out of capacity) leaves the
//! writer where it was.

use crate::array::StructArray;
use crate::buffer;
use crate::codec::{cursor, FastbinEnum, Scalar};
use crate::error::{FastbinError, Result};
use crate::layout::{FieldDef, FieldKind, Schema};
use crate::object::{self, Object};
use crate::variant::Variant;

/// Writes the fields of one object in declaration order.
pub struct ObjectWriter<'s, B> {
    schema: &'s Schema,
    buf: B,
    next: usize,
    cursor: usize,
}

impl<'s, B: AsRef<[u8]> + AsMut<[u8]>> ObjectWriter<'s, B> {
    /// Zero the buffer and position the cursor on the first field.
    pub fn new(schema: &'s Schema, mut buf: B) -> Result<Self> {
        buffer::zero_fill(buf.as_mut(), schema.min_size())?;
        Ok(Self {
            schema,
            buf,
            next: 0,
            cursor: schema.header_size(),
        })
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Field the next `put_*` call must name, `None` once all are written.
    pub fn next_field(&self) -> Option<&'s FieldDef> {
        self.schema.fields().get(self.next)
    }

    /// Bytes written so far, header included.
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn expect_next(&self, name: &str) -> Result<&'s FieldDef> {
        match self.next_field() {
            Some(def) if def.name == name => Ok(def),
            next => {
                let expected = next.map_or("<end of struct>", |def| def.name.as_str());
                log::debug!(
                    "[writer] {}: got '{}' while expecting '{}'",
                    self.schema.name(),
                    name,
                    expected
                );
                Err(FastbinError::OutOfOrder {
                    expected: expected.to_string(),
                    found: name.to_string(),
                })
            }
        }
    }

    fn advance(&mut self, written: usize) -> &mut Self {
        self.cursor += written;
        self.next += 1;
        self
    }

    pub fn put<T: Scalar>(&mut self, name: &str, value: T) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_scalar(self.buf.as_mut(), def, self.cursor, value)?;
        Ok(self.advance(written))
    }

    pub fn put_enum<E: FastbinEnum>(&mut self, name: &str, value: E) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        object::expect_enum::<E>(def)?;
        let written = object::write_scalar(self.buf.as_mut(), def, self.cursor, value.to_repr())?;
        Ok(self.advance(written))
    }

    pub fn put_str(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_str(self.buf.as_mut(), def, self.cursor, value)?;
        Ok(self.advance(written))
    }

    pub fn put_vector<T: Scalar>(&mut self, name: &str, values: &[T]) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_vector(self.buf.as_mut(), def, self.cursor, values)?;
        Ok(self.advance(written))
    }

    /// Copy a finalized object into the next field.
    pub fn put_object<V: AsRef<[u8]>>(
        &mut self,
        name: &str,
        value: &Object<'_, V>,
    ) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_object(self.buf.as_mut(), def, self.cursor, value)?;
        Ok(self.advance(written))
    }

    /// Write a nested object in place with its own staged writer.
    pub fn put_object_with<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut ObjectWriter<'s, &mut [u8]>) -> Result<()>,
    {
        let def = self.expect_next(name)?;
        let FieldKind::Object(schema) = &def.kind else {
            return Err(FastbinError::mismatch(def.kind.to_string(), "struct"));
        };
        let region = match schema.fixed_size() {
            Some(size) => cursor::bytes_mut(self.buf.as_mut(), self.cursor, size)?,
            None => cursor::tail_mut(self.buf.as_mut(), self.cursor)?,
        };
        let mut nested = ObjectWriter::new(schema, region)?;
        build(&mut nested)?;
        let written = nested.finish()?.binary_size()?;
        Ok(self.advance(written))
    }

    pub fn put_array<V: AsRef<[u8]>>(
        &mut self,
        name: &str,
        value: &StructArray<'_, V>,
    ) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_array(self.buf.as_mut(), def, self.cursor, value)?;
        Ok(self.advance(written))
    }

    /// Build a struct array in place; `build` appends the elements.
    pub fn put_array_with<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut StructArray<'s, &mut [u8]>) -> Result<()>,
    {
        let def = self.expect_next(name)?;
        let FieldKind::Array(element) = &def.kind else {
            return Err(FastbinError::mismatch(def.kind.to_string(), "struct array"));
        };
        let region = cursor::tail_mut(self.buf.as_mut(), self.cursor)?;
        let mut array = StructArray::create(element, region)?;
        build(&mut array)?;
        let written = array.binary_size();
        Ok(self.advance(written))
    }

    pub fn put_variant<V: AsRef<[u8]>>(
        &mut self,
        name: &str,
        value: &Variant<'_, V>,
    ) -> Result<&mut Self> {
        let def = self.expect_next(name)?;
        let written = object::write_variant(self.buf.as_mut(), def, self.cursor, value)?;
        Ok(self.advance(written))
    }

    /// Check every field was written, record the self-size and hand back the
    /// finalized object.
    pub fn finish(mut self) -> Result<Object<'s, B>> {
        let total = self.schema.len();
        if self.next < total {
            return Err(FastbinError::Incomplete {
                written: self.next,
                total,
            });
        }
        if !self.schema.is_fixed() {
            cursor::store_u64(self.buf.as_mut(), 0, self.cursor as u64)?;
        }
        log::trace!(
            "[writer] finish {} size={}",
            self.schema.name(),
            self.cursor
        );
        Ok(Object::open(self.schema, self.buf))
    }
}
