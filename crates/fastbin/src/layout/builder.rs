// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for Schema.

use crate::codec::{EnumDef, ScalarKind};
use crate::error::Result;
use crate::layout::{FieldDef, FieldKind, Schema, VariantDef};
use std::sync::Arc;

/// Builder for creating Schema instances.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    doc: Vec<String>,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a field of any kind.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Add a primitive field.
    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field(name, FieldKind::Scalar(kind))
    }

    /// Add an enum field.
    pub fn enumeration(self, name: impl Into<String>, def: Arc<EnumDef>) -> Self {
        self.field(name, FieldKind::Enum(def))
    }

    /// Add a string field.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::String)
    }

    /// Add a primitive vector field.
    pub fn vector(self, name: impl Into<String>, element: ScalarKind) -> Self {
        self.field(name, FieldKind::Vector(element))
    }

    pub fn enum_vector(self, name: impl Into<String>, def: Arc<EnumDef>) -> Self {
        self.field(name, FieldKind::EnumVector(def))
    }

    /// Add a nested struct field.
    pub fn object(self, name: impl Into<String>, schema: Arc<Schema>) -> Self {
        self.field(name, FieldKind::Object(schema))
    }

    /// Add a struct array field.
    pub fn array(self, name: impl Into<String>, element: Arc<Schema>) -> Self {
        self.field(name, FieldKind::Array(element))
    }

    /// Add a variant field.
    pub fn variant(self, name: impl Into<String>, def: Arc<VariantDef>) -> Self {
        self.field(name, FieldKind::Variant(def))
    }

    /// Attach a documentation line to the struct.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    /// Build the Schema.
    pub fn build(self) -> Result<Schema> {
        Schema::new(self.name, self.fields).map(|schema| schema.with_doc(self.doc))
    }
}
