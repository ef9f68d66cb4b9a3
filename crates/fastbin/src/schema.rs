// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON schema documents.
//!
//! Loads the schema document consumed by the code generators and resolves it
//! into runtime [`Schema`]s:
//!
//! ```json
//! {
//!   "namespace": "market",
//!   "enums": {
//!     "TradeSide": {
//!       "type": "uint8",
//!       "members": { "Sell": { "value": 0 }, "Buy": { "value": 1, "map": ["B", "buy"] } },
//!       "generate_parse": true
//!     }
//!   },
//!   "structs": {
//!     "Trade": {
//!       "docstring": "Public trade",
//!       "members": { "price": "float64", "side": "enum:TradeSide", "ids": "vector<uint64>" }
//!     }
//!   }
//! }
//! ```
//!
//! Member order in the document is field order. Structs may reference
//! structs declared later in the document; reference cycles are rejected.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec::{EnumDef, EnumMember, ScalarKind};
use crate::error::FastbinError;
use crate::layout::{FieldDef, FieldKind, Schema, VariantDef};

// ---------------------------------------------------------------------------
// SchemaError
// ---------------------------------------------------------------------------

/// Errors produced while loading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] FastbinError),
}

fn invalid(reason: impl Into<String>) -> SchemaError {
    SchemaError::Invalid(FastbinError::InvalidSchema {
        reason: reason.into(),
    })
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// A docstring or map entry given as one string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lines {
    One(String),
    Many(Vec<String>),
}

impl Lines {
    fn collect(lines: Option<&Lines>) -> Vec<String> {
        match lines {
            None => Vec::new(),
            Some(Lines::One(line)) if line.is_empty() => Vec::new(),
            Some(Lines::One(line)) => vec![line.clone()],
            Some(Lines::Many(lines)) => lines.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDoc {
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    enums: Map<String, Value>,
    #[serde(default)]
    structs: Map<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct EnumDoc {
    #[serde(rename = "type")]
    repr: String,
    #[serde(default)]
    members: Map<String, Value>,
    #[serde(default)]
    generate_parse: bool,
    docstring: Option<Lines>,
}

#[derive(Debug, Deserialize)]
struct EnumMemberDoc {
    value: i64,
    map: Option<Lines>,
    docstring: Option<Lines>,
}

#[derive(Debug, Deserialize)]
struct StructDoc {
    #[serde(default)]
    members: Map<String, Value>,
    docstring: Option<Lines>,
}

// ---------------------------------------------------------------------------
// SchemaSet
// ---------------------------------------------------------------------------

/// Every enum and struct declared by one schema document, in declaration
/// order.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    namespace: String,
    enums: Vec<Arc<EnumDef>>,
    structs: Vec<Arc<Schema>>,
}

impl SchemaSet {
    /// Parse and resolve a JSON schema document.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let doc: SchemaDoc = serde_json::from_str(text)?;
        Self::from_doc(doc)
    }

    /// Read and resolve a JSON schema file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let set = Self::from_json(&text)?;
        log::debug!(
            "[schema] loaded {} ({} enums, {} structs)",
            path.display(),
            set.enums.len(),
            set.structs.len()
        );
        Ok(set)
    }

    fn from_doc(doc: SchemaDoc) -> Result<Self, SchemaError> {
        if doc.namespace.is_empty() {
            return Err(invalid("no namespace defined in schema"));
        }
        for key in doc.extra.keys() {
            log::warn!("[schema] ignoring unknown top-level key '{}'", key);
        }

        let mut enums = Vec::with_capacity(doc.enums.len());
        for (name, content) in doc.enums {
            enums.push(Arc::new(parse_enum(&name, content)?));
        }

        let mut pending = Vec::with_capacity(doc.structs.len());
        for (name, content) in doc.structs {
            let parsed: StructDoc = serde_json::from_value(content)?;
            pending.push((name, parsed));
        }

        let mut resolver = Resolver {
            enums: enums.iter().map(|e| (e.name.clone(), e.clone())).collect(),
            pending: &pending,
            done: HashMap::new(),
            visiting: Vec::new(),
        };
        let structs = pending
            .iter()
            .map(|(name, _)| resolver.resolve_struct(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            namespace: doc.namespace,
            enums,
            structs,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn enums(&self) -> &[Arc<EnumDef>] {
        &self.enums
    }

    pub fn structs(&self) -> &[Arc<Schema>] {
        &self.structs
    }

    /// Enum declared as `name`.
    pub fn enum_def(&self, name: &str) -> Option<&Arc<EnumDef>> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Struct declared as `name`.
    pub fn schema(&self, name: &str) -> Option<&Arc<Schema>> {
        self.structs.iter().find(|s| s.name() == name)
    }
}

impl FromStr for SchemaSet {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_json(text)
    }
}

fn parse_enum(name: &str, content: Value) -> Result<EnumDef, SchemaError> {
    let doc: EnumDoc = serde_json::from_value(content)?;
    let repr = ScalarKind::from_name(&doc.repr)
        .ok_or_else(|| invalid(format!("enum '{}' has unknown type '{}'", name, doc.repr)))?;

    let mut def = EnumDef::new(name, repr).with_parse(doc.generate_parse);
    def.doc = Lines::collect(doc.docstring.as_ref());
    for (member_name, member_content) in doc.members {
        let member: EnumMemberDoc = serde_json::from_value(member_content)?;
        let mut parsed = EnumMember::new(member_name, member.value);
        if let Some(map) = &member.map {
            parsed.map = Lines::collect(Some(map));
        }
        parsed.doc = Lines::collect(member.docstring.as_ref());
        def = def.with_member(parsed);
    }
    def.validate()?;
    Ok(def)
}

// ---------------------------------------------------------------------------
// Type resolution
// ---------------------------------------------------------------------------

struct Resolver<'d> {
    enums: HashMap<String, Arc<EnumDef>>,
    pending: &'d [(String, StructDoc)],
    done: HashMap<String, Arc<Schema>>,
    visiting: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_struct(&mut self, name: &str) -> Result<Arc<Schema>, SchemaError> {
        if let Some(schema) = self.done.get(name) {
            return Ok(schema.clone());
        }
        if self.visiting.iter().any(|v| v == name) {
            return Err(invalid(format!(
                "struct '{}' references itself ({} -> {})",
                name,
                self.visiting.join(" -> "),
                name
            )));
        }
        let pending = self.pending;
        let (_, doc) = pending
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| invalid(format!("struct '{}' not found", name)))?;

        self.visiting.push(name.to_string());
        let mut fields = Vec::with_capacity(doc.members.len());
        for (field, ty) in &doc.members {
            let ty = ty.as_str().ok_or_else(|| {
                invalid(format!("member '{}.{}' type must be a string", name, field))
            })?;
            fields.push(FieldDef::new(field.as_str(), self.resolve_type(ty)?));
        }
        self.visiting.pop();

        let lines = Lines::collect(doc.docstring.as_ref());
        let schema = Arc::new(Schema::new(name, fields)?.with_doc(lines));
        self.done.insert(name.to_string(), schema.clone());
        Ok(schema)
    }

    fn resolve_type(&mut self, ty: &str) -> Result<FieldKind, SchemaError> {
        let ty = ty.trim();
        if let Some(kind) = ScalarKind::from_name(ty) {
            return Ok(FieldKind::Scalar(kind));
        }
        if ty == "string" {
            return Ok(FieldKind::String);
        }
        if let Some(name) = ty.strip_prefix("enum:") {
            let def = self
                .enums
                .get(name.trim())
                .ok_or_else(|| invalid(format!("enum '{}' not found", name)))?;
            return Ok(FieldKind::Enum(def.clone()));
        }
        if let Some(name) = ty.strip_prefix("struct:") {
            return Ok(FieldKind::Object(self.resolve_struct(name.trim())?));
        }
        if let Some(inner) = generic_args(ty, "vector") {
            return match self.resolve_type(inner)? {
                FieldKind::Scalar(kind) => Ok(FieldKind::Vector(kind)),
                FieldKind::Enum(def) => Ok(FieldKind::EnumVector(def)),
                FieldKind::Object(schema) => Ok(FieldKind::Array(schema)),
                other => Err(invalid(format!(
                    "vector of '{}' is not supported",
                    other
                ))),
            };
        }
        if let Some(inner) = generic_args(ty, "Variant") {
            let kinds = split_top_level(inner)
                .into_iter()
                .map(|arg| self.resolve_type(arg))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(FieldKind::Variant(Arc::new(VariantDef::new(kinds)?)));
        }
        Err(invalid(format!("unknown type '{}'", ty)))
    }
}

/// `name<args>` -> `args`.
fn generic_args<'t>(ty: &'t str, name: &str) -> Option<&'t str> {
    ty.strip_prefix(name)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Split on commas that are not nested inside `<...>`.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}
