// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use fastbin::{FieldKind, ScalarKind, SchemaBuilder, Variant, VariantDef};
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

fn def() -> &'static VariantDef {
    static DEF: OnceLock<VariantDef> = OnceLock::new();
    DEF.get_or_init(|| {
        let child = SchemaBuilder::new("Child")
            .scalar("field1", ScalarKind::I32)
            .string("field2")
            .build()
            .unwrap_or_else(|e| panic!("fuzz schema: {e}"));
        VariantDef::new(vec![
            FieldKind::Scalar(ScalarKind::I64),
            FieldKind::String,
            FieldKind::Vector(ScalarKind::U16),
            FieldKind::Object(Arc::new(child)),
        ])
        .unwrap_or_else(|e| panic!("fuzz variant: {e}"))
    })
}

fuzz_target!(|data: &[u8]| {
    // Decode whatever kind the tag selects; errors are fine, panics are not
    if let Ok(variant) = Variant::open(def(), data) {
        let _ = variant.index();
        if let Ok(fastbin::VariantValue::Object(child)) = variant.get() {
            let _ = child.str(1);
        }
        let _ = variant.copy();
    }
});
