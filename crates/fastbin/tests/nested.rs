// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Nested object tests
//!
//! `Parent` embeds a fixed child, a variable child and a trailing string:
//! the offset of everything behind `child2` depends on the child's own
//! finalized size.

mod common;

use common::{child_fixed, child_var, models};
use fastbin::{alloc_zeroed, FastbinError, Object, ScalarKind, SchemaBuilder, VarSize};
use std::sync::Arc;

#[test]
fn test_parent_from_copied_children() {
    let m = models();
    let fixed = child_fixed(4, 5);
    let var = child_var(6, "hello");
    assert_eq!(var.binary_size().expect("child size"), 32);

    let mut parent = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    parent.set(0, 3i32).expect("field1");
    parent.set_object(1, &fixed).expect("child1");
    parent.set_object(2, &var).expect("child2");
    parent.set_str(3, "parent").expect("str");
    assert_eq!(parent.finalize().expect("finalize"), 8 + 8 + 16 + 32 + 16);

    assert_eq!(parent.field_offset(1).expect("child1 offset"), 16);
    assert_eq!(parent.field_offset(2).expect("child2 offset"), 32);
    assert_eq!(parent.field_offset(3).expect("str offset"), 64);

    let view = Object::open(&m.parent, parent.as_bytes().expect("bytes"));
    assert_eq!(view.get::<i32>(0).expect("field1"), 3);
    let child1 = view.object(1).expect("child1");
    assert_eq!(child1.get::<i32>(0).expect("child1.field1"), 4);
    assert_eq!(child1.get::<i32>(1).expect("child1.field2"), 5);
    let child2 = view.object(2).expect("child2");
    assert_eq!(child2.get::<i32>(0).expect("child2.field1"), 6);
    assert_eq!(child2.str(1).expect("child2.field2"), "hello");
    assert_eq!(view.str(3).expect("str"), "parent");
}

#[test]
fn test_parent_built_in_place_matches_copy() {
    let m = models();

    let mut in_place = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    in_place.set(0, 3i32).expect("field1");
    {
        let mut child1 = in_place.init_object(1).expect("init child1");
        child1.set(0, 4i32).expect("child1.field1");
        child1.set(1, 5i32).expect("child1.field2");
    }
    {
        let mut child2 = in_place.init_object(2).expect("init child2");
        child2.set(0, 6i32).expect("child2.field1");
        child2.set_str(1, "hello").expect("child2.field2");
        child2.finalize().expect("finalize child2");
    }
    in_place.set_str(3, "parent").expect("str");
    in_place.finalize().expect("finalize");

    let mut copied = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    copied.set(0, 3i32).expect("field1");
    copied.set_object(1, &child_fixed(4, 5)).expect("child1");
    copied.set_object(2, &child_var(6, "hello")).expect("child2");
    copied.set_str(3, "parent").expect("str");
    copied.finalize().expect("finalize");

    assert_eq!(
        in_place.as_bytes().expect("in place bytes"),
        copied.as_bytes().expect("copied bytes")
    );
}

#[test]
fn test_field_behind_unwritten_child_is_unreachable() {
    let m = models();
    let mut parent = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    parent.set(0, 1i32).expect("field1");

    // Fixed fields in front of the first variable field are always reachable.
    assert_eq!(parent.field_offset(2).expect("child2 offset"), 32);
    assert!(matches!(
        parent.set_str(3, "too early"),
        Err(FastbinError::NotFinalized { .. }) | Err(FastbinError::FieldNotWritten { .. })
    ));
    assert!(!parent.is_finalized());
    assert!(matches!(
        parent.as_bytes(),
        Err(FastbinError::NotFinalized { .. })
    ));
}

#[test]
fn test_nested_schema_mismatch_rejected() {
    let m = models();
    let mut parent = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    let wrong = child_var(1, "x");
    assert_eq!(
        parent.set_object(1, &wrong).err(),
        Some(FastbinError::SchemaMismatch {
            expected: "ChildFixed".into(),
            found: "ChildVar".into()
        })
    );
}

#[test]
fn test_copy_is_independent() {
    let m = models();
    let mut parent = Object::create(&m.parent, alloc_zeroed(256)).expect("create Parent");
    parent.set(0, 9i32).expect("field1");
    parent.set_object(1, &child_fixed(1, 2)).expect("child1");
    parent.set_object(2, &child_var(3, "abc")).expect("child2");
    parent.set_str(3, "xyz").expect("str");
    let size = parent.finalize().expect("finalize");

    let copy = parent.copy().expect("copy");
    assert_eq!(copy.capacity(), size);
    parent.set(0, -9i32).expect("overwrite field1");

    assert_eq!(copy.get::<i32>(0).expect("copy field1"), 9);
    assert_eq!(parent.get::<i32>(0).expect("field1"), -9);
    assert_eq!(copy.object(2).expect("child2").str(1).expect("text"), "abc");

    let mut dest = [0u8; 16];
    assert!(matches!(
        parent.copy_into(&mut dest),
        Err(FastbinError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_fixed_child_behind_string() {
    let nested_fixed = Arc::new(
        SchemaBuilder::new("NestedFixed")
            .scalar("a", ScalarKind::I32)
            .scalar("b", ScalarKind::I32)
            .build()
            .expect("NestedFixed"),
    );
    let nested_var = Arc::new(
        SchemaBuilder::new("NestedVar")
            .string("field1")
            .scalar("field2", ScalarKind::I32)
            .build()
            .expect("NestedVar"),
    );
    let composite = SchemaBuilder::new("Composite")
        .scalar("field1", ScalarKind::I32)
        .string("field2")
        .object("child1", nested_fixed.clone())
        .object("child2", nested_var.clone())
        .build()
        .expect("Composite");

    let mut child1 = Object::create(&nested_fixed, alloc_zeroed(16)).expect("create child1");
    child1.set(0, 1i32).expect("a");
    child1.set(1, 2i32).expect("b");
    let mut child2 = Object::create(&nested_var, alloc_zeroed(64)).expect("create child2");
    child2.set_str(0, "x").expect("child2.field1");
    child2.set(1, 9i32).expect("child2.field2");
    assert_eq!(child2.finalize().expect("finalize child2"), 32);

    let size = composite
        .calc_binary_size(&[VarSize::str("hello"), VarSize::Embedded(32)])
        .expect("size");
    assert_eq!(size, 8 + 8 + 16 + 16 + 32);

    let mut obj = Object::create(&composite, alloc_zeroed(size)).expect("create Composite");
    obj.set(0, 123i32).expect("field1");
    obj.set_str(1, "hello").expect("field2");
    obj.set_object(2, &child1).expect("child1");
    obj.set_object(3, &child2).expect("child2");
    assert_eq!(obj.finalize().expect("finalize"), 80);

    assert_eq!(obj.field_offset(2).expect("child1 offset"), 32);
    assert_eq!(obj.field_offset(3).expect("child2 offset"), 48);
    assert_eq!(obj.field_size(2).expect("child1 size"), 16);

    let view = Object::open(&composite, obj.as_bytes().expect("bytes"));
    assert_eq!(view.get::<i32>(0).expect("field1"), 123);
    assert_eq!(view.str(1).expect("field2"), "hello");
    let read1 = view.object(2).expect("child1");
    assert_eq!(read1.get::<i32>(0).expect("child1.a"), 1);
    assert_eq!(read1.get::<i32>(1).expect("child1.b"), 2);
    let read2 = view.object(3).expect("child2");
    assert_eq!(read2.str(0).expect("child2.field1"), "x");
    assert_eq!(read2.get::<i32>(1).expect("child2.field2"), 9);
}
