// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! JSON schema loading tests
//!
//! Documents are written to a temporary file and loaded the way a service
//! loads its message definitions at startup.

mod common;

use common::{models, TickDirection, TradeSide};
use fastbin::{alloc_zeroed, FieldKind, Object, ScalarKind, SchemaError, SchemaSet};
use std::io::Write;

const MARKET_SCHEMA: &str = r#"{
    "namespace": "market",
    "enums": {
        "TradeSide": {
            "type": "uint8",
            "docstring": "Aggressor side of a trade",
            "members": {
                "Sell": { "value": 0, "map": ["S", "sell"] },
                "Buy": { "value": 1, "map": ["B", "buy"] }
            },
            "generate_parse": true
        },
        "TickDirection": {
            "type": "uint8",
            "members": {
                "Unknown": { "value": 0 },
                "PlusTick": { "value": 1 },
                "ZeroPlusTick": { "value": 2 },
                "MinusTick": { "value": 3 },
                "ZeroMinusTick": { "value": 4 }
            }
        }
    },
    "structs": {
        "StreamTrade": {
            "docstring": ["Public trade print", "Times are exchange milliseconds"],
            "members": {
                "server_time": "int64",
                "recv_time": "int64",
                "symbol": "string",
                "fill_time": "int64",
                "side": "enum:TradeSide",
                "price": "float64",
                "price_chg_dir": "enum:TickDirection",
                "size": "float64",
                "trade_id": "string",
                "block_trade": "bool"
            }
        },
        "TradeBatch": {
            "members": {
                "trades": "vector<struct:StreamTrade>",
                "sides": "vector<enum:TradeSide>",
                "last": "Variant<struct:StreamTrade, string, vector<float64>>"
            }
        }
    },
    "generator": "ignored"
}"#;

fn write_schema(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write schema");
    file.flush().expect("flush schema");
    file
}

#[test]
fn test_load_market_schema_from_file() {
    let file = write_schema(MARKET_SCHEMA);
    let set = SchemaSet::from_path(file.path()).expect("load schema");

    assert_eq!(set.namespace(), "market");
    assert_eq!(set.enums().len(), 2);
    assert_eq!(set.structs().len(), 2);

    let side = set.enum_def("TradeSide").expect("TradeSide");
    assert_eq!(side.repr, ScalarKind::U8);
    assert!(side.generate_parse);
    assert_eq!(side.doc, ["Aggressor side of a trade"]);
    assert_eq!(side.parse("B").expect("alias"), 1);
    assert_eq!(side.parse("sell").expect("alias"), 0);
    assert!(side.parse("Buy").is_err(), "map replaces the member name");

    let trade = set.schema("StreamTrade").expect("StreamTrade");
    assert_eq!(trade.doc().len(), 2);
    let names: Vec<&str> = trade.fields().iter().map(|f| f.name.as_str()).collect();
    let expected: Vec<&str> = models()
        .stream_trade
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, expected, "member order is field order");

    let batch = set.schema("TradeBatch").expect("TradeBatch");
    assert!(matches!(&batch.fields()[0].kind, FieldKind::Array(s) if s.name() == "StreamTrade"));
    assert!(matches!(&batch.fields()[1].kind, FieldKind::EnumVector(e) if e.name == "TradeSide"));
    match &batch.fields()[2].kind {
        FieldKind::Variant(def) => assert_eq!(def.types_count(), 3),
        other => panic!("unexpected kind {}", other),
    }
}

#[test]
fn test_loaded_schema_is_wire_compatible() {
    let set: SchemaSet = MARKET_SCHEMA.parse().expect("parse schema");
    let loaded = set.schema("StreamTrade").expect("StreamTrade");

    let mut trade = Object::create(loaded, alloc_zeroed(256)).expect("create");
    trade.set(0, 10i64).expect("server_time");
    trade.set(1, 11i64).expect("recv_time");
    trade.set_str(2, "ETHUSDT").expect("symbol");
    trade.set(3, 12i64).expect("fill_time");
    trade.set_enum(4, TradeSide::Sell).expect("side");
    trade.set(5, 3_456.25f64).expect("price");
    trade.set_enum(6, TickDirection::PlusTick).expect("price_chg_dir");
    trade.set(7, 1.5f64).expect("size");
    trade.set_str(8, "t-42").expect("trade_id");
    trade.set(9, false).expect("block_trade");
    trade.finalize().expect("finalize");

    // Read back through the hand-built schema of the same message.
    let read = common::StreamTrade::open(trade.as_bytes().expect("bytes"));
    assert_eq!(read.symbol().expect("symbol"), "ETHUSDT");
    assert_eq!(read.side().expect("side"), TradeSide::Sell);
    assert_eq!(
        read.price_chg_dir().expect("price_chg_dir"),
        TickDirection::PlusTick
    );
    assert_eq!(read.price().expect("price"), 3_456.25);
    assert_eq!(read.trade_id().expect("trade_id"), "t-42");
}

#[test]
fn test_invalid_documents() {
    let missing = SchemaSet::from_path("/nonexistent/fastbin/schema.json");
    assert!(matches!(missing, Err(SchemaError::Io(_))));

    let file = write_schema(r#"{ "namespace": "n", "structs": { "S": { "members": [] } } }"#);
    assert!(matches!(
        SchemaSet::from_path(file.path()),
        Err(SchemaError::Json(_))
    ));

    let duplicate = r#"{
        "namespace": "n",
        "enums": { "E": { "type": "uint8", "members": { "A": { "value": 1 }, "B": { "value": 1 } } } }
    }"#;
    let err = SchemaSet::from_json(duplicate).expect_err("duplicate value");
    assert_eq!(err.to_string(), "invalid schema: enum 'E' has duplicate value 1");

    let float_enum = r#"{
        "namespace": "n",
        "enums": { "E": { "type": "float32", "members": { "A": { "value": 1 } } } }
    }"#;
    assert!(SchemaSet::from_json(float_enum).is_err());

    let missing_ref = r#"{
        "namespace": "n",
        "structs": { "S": { "members": { "x": "struct:Nope" } } }
    }"#;
    assert_eq!(
        SchemaSet::from_json(missing_ref)
            .expect_err("missing struct")
            .to_string(),
        "invalid schema: struct 'Nope' not found"
    );
}
