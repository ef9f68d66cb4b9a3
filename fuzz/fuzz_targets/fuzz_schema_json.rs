// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use fastbin::SchemaSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the schema document loader (type parsing, reference resolution)
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = SchemaSet::from_json(text);
    }
});
