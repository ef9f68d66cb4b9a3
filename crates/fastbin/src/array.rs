// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct array: a packed sequence of objects of one schema.
//!
//! ```text
//! [u64 total_size][u64 count][element 0][element 1]...
//! ```
//!
//! `total_size` includes the 16-byte header. Elements are finalized objects
//! copied back to back. Capacity is the buffer length and never grows; an
//! append that does not fit is a `CapacityExceeded` error.
//!
//! Indexing is O(1) for fixed-size elements and O(n) for variable-size
//! elements, which have to be walked through their self-size words.

use crate::buffer::{self, Encoded, OwnedBuf};
use crate::codec::cursor;
use crate::config::{ARRAY_HEADER_SIZE, WORD_SIZE};
use crate::error::{FastbinError, Result};
use crate::layout::Schema;
use crate::object::{expect_schema, Object};
use std::fmt;

/// View of a struct array.
pub struct StructArray<'s, B> {
    element: &'s Schema,
    buf: B,
}

impl<'s, B: AsRef<[u8]>> StructArray<'s, B> {
    /// Wrap existing bytes, validating the header.
    pub fn open(element: &'s Schema, buf: B) -> Result<Self> {
        let array = Self { element, buf };
        array.validate()?;
        Ok(array)
    }

    fn validate(&self) -> Result<()> {
        let bytes = self.buf.as_ref();
        let word = cursor::load_u64(bytes, 0)?;
        let count = cursor::load_u64(bytes, WORD_SIZE)?;
        let size = usize::try_from(word)
            .ok()
            .filter(|size| *size >= ARRAY_HEADER_SIZE && size % WORD_SIZE == 0)
            .ok_or(FastbinError::InvalidHeader { offset: 0, word })?;
        cursor::check(bytes.len(), 0, size)?;

        let payload = (size - ARRAY_HEADER_SIZE) as u64;
        let consistent = match self.element.fixed_size() {
            Some(fixed) => count.checked_mul(fixed as u64) == Some(payload),
            None => count <= payload / WORD_SIZE as u64,
        };
        if !consistent {
            return Err(FastbinError::InvalidHeader {
                offset: WORD_SIZE,
                word: count,
            });
        }
        Ok(())
    }

    pub fn element(&self) -> &'s Schema {
        self.element
    }

    pub fn capacity(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    pub fn as_view(&self) -> StructArray<'s, &[u8]> {
        StructArray {
            element: self.element,
            buf: self.buf.as_ref(),
        }
    }

    fn word(&self, offset: usize) -> usize {
        let mut raw = [0u8; WORD_SIZE];
        raw.copy_from_slice(&self.buf.as_ref()[offset..offset + WORD_SIZE]);
        u64::from_le_bytes(raw) as usize
    }

    /// Total bytes used, header included.
    pub fn binary_size(&self) -> usize {
        self.word(0)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.word(WORD_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes still available for appends.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.binary_size()
    }

    /// The used bytes: header plus elements.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[..self.binary_size()]
    }

    /// Element `index`.
    pub fn get(&self, index: usize) -> Result<Object<'s, &[u8]>> {
        let len = self.len();
        if index >= len {
            return Err(FastbinError::IndexOutOfBounds { index, len });
        }
        let used = self.as_bytes();
        match self.element.fixed_size() {
            Some(fixed) => {
                let offset = ARRAY_HEADER_SIZE + index * fixed;
                let bytes = cursor::bytes(used, offset, fixed)?;
                Ok(Object::open(self.element, bytes))
            }
            None => {
                let mut offset = ARRAY_HEADER_SIZE;
                for _ in 0..index {
                    offset += element_size(used, offset)?;
                }
                let size = element_size(used, offset)?;
                Ok(Object::open(self.element, &used[offset..offset + size]))
            }
        }
    }

    /// Forward iterator over the elements. Restart by calling `iter()` again.
    pub fn iter(&self) -> Iter<'_, 's> {
        Iter {
            element: self.element,
            bytes: self.as_bytes(),
            offset: ARRAY_HEADER_SIZE,
            remaining: self.len(),
        }
    }

    /// Independent owned duplicate of exactly `binary_size()` bytes.
    pub fn copy(&self) -> StructArray<'s, OwnedBuf> {
        StructArray {
            element: self.element,
            buf: buffer::copy_owned(self.as_bytes()),
        }
    }

    /// Duplicate into `dest`; spare room stays available for appends.
    pub fn copy_into<'d>(&self, dest: &'d mut [u8]) -> Result<StructArray<'s, &'d mut [u8]>> {
        let buf = buffer::copy_to(self.as_bytes(), dest)?;
        Ok(StructArray {
            element: self.element,
            buf,
        })
    }

    /// Arrays are sealed by every append; returns the binary size.
    pub fn finalize(&self) -> usize {
        self.binary_size()
    }
}

impl StructArray<'_, OwnedBuf> {
    /// Bytes an array holding `elements` occupies: 16 + sum of their sizes.
    pub fn calc_binary_size<'a, E>(elements: impl IntoIterator<Item = &'a E>) -> Result<usize>
    where
        E: Encoded + 'a,
    {
        elements
            .into_iter()
            .try_fold(ARRAY_HEADER_SIZE, |total, e| -> Result<usize> {
                total
                    .checked_add(e.binary_size()?)
                    .ok_or(FastbinError::SizeOverflow)
            })
    }

    /// Bytes an array of `count` fixed-size elements occupies. `None` for
    /// variable elements or when the size overflows.
    pub fn size_for(element: &Schema, count: usize) -> Option<usize> {
        element
            .fixed_size()
            .and_then(|fixed| count.checked_mul(fixed))
            .and_then(|elements| elements.checked_add(ARRAY_HEADER_SIZE))
    }
}

impl<'s, B: AsRef<[u8]> + AsMut<[u8]>> StructArray<'s, B> {
    /// Zero the buffer and write an empty header (size 16, count 0).
    pub fn create(element: &'s Schema, mut buf: B) -> Result<Self> {
        buffer::zero_fill(buf.as_mut(), ARRAY_HEADER_SIZE)?;
        let mut array = Self { element, buf };
        array.set_header(ARRAY_HEADER_SIZE, 0);
        log::trace!(
            "[array] create {} capacity={}",
            element.name(),
            array.capacity()
        );
        Ok(array)
    }

    fn set_header(&mut self, size: usize, count: usize) {
        let bytes = self.buf.as_mut();
        bytes[..WORD_SIZE].copy_from_slice(&(size as u64).to_le_bytes());
        bytes[WORD_SIZE..ARRAY_HEADER_SIZE].copy_from_slice(&(count as u64).to_le_bytes());
    }

    fn reserve(&self, len: usize) -> Result<usize> {
        let start = self.binary_size();
        let needed = start + len;
        if needed > self.capacity() {
            log::debug!(
                "[array] {} append needs {} bytes, capacity {}",
                self.element.name(),
                needed,
                self.capacity()
            );
            return Err(FastbinError::CapacityExceeded {
                needed,
                available: self.capacity(),
            });
        }
        Ok(start)
    }

    /// Copy a finalized element to the end of the array.
    pub fn append<V: AsRef<[u8]>>(&mut self, value: &Object<'_, V>) -> Result<()> {
        expect_schema(self.element, value.schema())?;
        let bytes = value.as_bytes()?;
        let start = self.reserve(bytes.len())?;
        cursor::store_bytes(self.buf.as_mut(), start, bytes)?;
        self.commit(start + bytes.len());
        Ok(())
    }

    /// Build the next element in place, then finalize and append it.
    pub fn append_with<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Object<'s, &mut [u8]>) -> Result<()>,
    {
        let start = self.reserve(self.element.min_size())?;
        let element = self.element;
        let region = match element.fixed_size() {
            Some(fixed) => cursor::bytes_mut(self.buf.as_mut(), start, fixed)?,
            None => cursor::tail_mut(self.buf.as_mut(), start)?,
        };
        let mut object = Object::create(element, region)?;
        build(&mut object)?;
        let size = object.finalize()?;
        self.commit(start + size);
        Ok(())
    }

    fn commit(&mut self, new_size: usize) {
        let count = self.len() + 1;
        self.set_header(new_size, count);
        log::trace!(
            "[array] {} append count={} size={}",
            self.element.name(),
            count,
            new_size
        );
    }
}

impl<B: AsRef<[u8]>> Encoded for StructArray<'_, B> {
    fn binary_size(&self) -> Result<usize> {
        Ok(StructArray::binary_size(self))
    }

    fn encoded_bytes(&self) -> Result<&[u8]> {
        Ok(self.as_bytes())
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for StructArray<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructArray")
            .field("element", &self.element.name())
            .field("len", &self.len())
            .field("binary_size", &self.binary_size())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Self-size of the variable element at `offset`, checked against the array.
fn element_size(used: &[u8], offset: usize) -> Result<usize> {
    let word = cursor::load_u64(used, offset)?;
    let size = usize::try_from(word)
        .ok()
        .filter(|size| *size >= WORD_SIZE && size % WORD_SIZE == 0)
        .ok_or(FastbinError::InvalidHeader { offset, word })?;
    cursor::check(used.len(), offset, size)?;
    Ok(size)
}

/// Iterator over struct array elements.
pub struct Iter<'a, 's> {
    element: &'s Schema,
    bytes: &'a [u8],
    offset: usize,
    remaining: usize,
}

impl<'a, 's> Iterator for Iter<'a, 's> {
    type Item = Result<Object<'s, &'a [u8]>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let size = match self.element.fixed_size() {
            Some(fixed) => cursor::check(self.bytes.len(), self.offset, fixed).map(|_| fixed),
            None => element_size(self.bytes, self.offset),
        };
        match size {
            Ok(size) => {
                let start = self.offset;
                self.offset += size;
                self.remaining -= 1;
                Some(Ok(Object::open(self.element, &self.bytes[start..start + size])))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}
