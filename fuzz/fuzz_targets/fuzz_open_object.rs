// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use fastbin::{Object, ScalarKind, Schema, SchemaBuilder};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new("Fuzzed")
            .scalar("id", ScalarKind::U32)
            .string("name")
            .vector("values", ScalarKind::F64)
            .scalar("flag", ScalarKind::Bool)
            .build()
            .unwrap_or_else(|e| panic!("fuzz schema: {e}"))
    })
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic, only report errors
    let obj = Object::open(schema(), data);
    let _ = obj.binary_size();
    let _ = obj.get::<u32>(0);
    let _ = obj.str(1);
    if let Ok(values) = obj.vector::<f64>(2) {
        let _ = values.iter().count();
    }
    let _ = obj.get::<bool>(3);
    let _ = obj.compute_binary_size();
});
