// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use fastbin::{ScalarKind, Schema, SchemaBuilder, StructArray};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn element() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new("Element")
            .scalar("field1", ScalarKind::I32)
            .string("field2")
            .build()
            .unwrap_or_else(|e| panic!("fuzz schema: {e}"))
    })
}

fuzz_target!(|data: &[u8]| {
    // Header validation, then every element walk must stay in bounds
    if let Ok(array) = StructArray::open(element(), data) {
        for element in array.iter() {
            match element {
                Ok(element) => {
                    let _ = element.get::<i32>(0);
                    let _ = element.str(1);
                }
                Err(_) => break,
            }
        }
        let _ = array.get(array.len());
    }
});
