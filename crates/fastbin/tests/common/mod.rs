// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared test models.
//!
//! Message structs covering every field kind, built with `SchemaBuilder` so
//! the tests do not depend on the JSON loader.

#![allow(dead_code)]

use fastbin::{
    FastbinEnum, FieldKind, Object, Result, ScalarKind, Schema, SchemaBuilder, VariantDef,
};
use std::sync::{Arc, OnceLock};

fastbin::fastbin_enum! {
    /// Aggressor side of a trade.
    pub enum TradeSide: u8 {
        Sell = 0,
        Buy = 1,
    }
}

fastbin::fastbin_enum! {
    pub enum TickDirection: u8 {
        Unknown = 0,
        PlusTick = 1,
        ZeroPlusTick = 2,
        MinusTick = 3,
        ZeroMinusTick = 4,
    }
}

fastbin::fastbin_enum! {
    pub enum OrderbookType: u8 {
        Snapshot = 1,
        Delta = 2,
    }
}

pub struct Models {
    pub child_fixed: Arc<Schema>,
    pub child_var: Arc<Schema>,
    pub parent: Arc<Schema>,
    pub uint32_vector: Arc<Schema>,
    pub vector_of_uint32: Arc<Schema>,
    pub vector_of_fixed: Arc<Schema>,
    pub vector_of_var: Arc<Schema>,
    pub primitives: Arc<VariantDef>,
    pub primitives_and_string: Arc<VariantDef>,
    pub structs: Arc<VariantDef>,
    pub variants: Arc<Schema>,
    pub stream_trade: Arc<Schema>,
    pub stream_orderbook: Arc<Schema>,
}

pub fn models() -> &'static Models {
    static MODELS: OnceLock<Models> = OnceLock::new();
    MODELS.get_or_init(|| build_models().expect("test models are valid"))
}

fn build_models() -> Result<Models> {
    let child_fixed = Arc::new(
        SchemaBuilder::new("ChildFixed")
            .scalar("field1", ScalarKind::I32)
            .scalar("field2", ScalarKind::I32)
            .build()?,
    );
    let child_var = Arc::new(
        SchemaBuilder::new("ChildVar")
            .scalar("field1", ScalarKind::I32)
            .string("field2")
            .build()?,
    );
    let parent = Arc::new(
        SchemaBuilder::new("Parent")
            .scalar("field1", ScalarKind::I32)
            .object("child1", child_fixed.clone())
            .object("child2", child_var.clone())
            .string("str")
            .build()?,
    );
    let uint32_vector = Arc::new(
        SchemaBuilder::new("UInt32Vector")
            .vector("values", ScalarKind::U32)
            .scalar("count", ScalarKind::U32)
            .build()?,
    );
    let vector_of_uint32 = Arc::new(
        SchemaBuilder::new("VectorOfUInt32")
            .vector("values", ScalarKind::U32)
            .string("str")
            .build()?,
    );
    let vector_of_fixed = Arc::new(
        SchemaBuilder::new("VectorOfFixedSizedStructs")
            .array("values", child_fixed.clone())
            .string("str")
            .build()?,
    );
    let vector_of_var = Arc::new(
        SchemaBuilder::new("VectorOfVariableSizedStructs")
            .array("values", child_var.clone())
            .string("str")
            .build()?,
    );

    let primitives = Arc::new(VariantDef::new(vec![
        FieldKind::Scalar(ScalarKind::I32),
        FieldKind::Scalar(ScalarKind::I64),
        FieldKind::Scalar(ScalarKind::U8),
    ])?);
    let primitives_and_string = Arc::new(VariantDef::new(vec![
        FieldKind::String,
        FieldKind::Scalar(ScalarKind::F64),
        FieldKind::Scalar(ScalarKind::Bool),
    ])?);
    let structs = Arc::new(VariantDef::new(vec![
        FieldKind::Object(child_fixed.clone()),
        FieldKind::Object(child_var.clone()),
    ])?);
    let variants = Arc::new(
        SchemaBuilder::new("Variants")
            .variant("primitives", primitives.clone())
            .variant("primitives_and_string", primitives_and_string.clone())
            .variant("structs", structs.clone())
            .build()?,
    );

    let stream_trade = Arc::new(
        SchemaBuilder::new("StreamTrade")
            .scalar("server_time", ScalarKind::I64)
            .scalar("recv_time", ScalarKind::I64)
            .string("symbol")
            .scalar("fill_time", ScalarKind::I64)
            .enumeration("side", Arc::new(TradeSide::def()))
            .scalar("price", ScalarKind::F64)
            .enumeration("price_chg_dir", Arc::new(TickDirection::def()))
            .scalar("size", ScalarKind::F64)
            .string("trade_id")
            .scalar("block_trade", ScalarKind::Bool)
            .build()?,
    );
    let stream_orderbook = Arc::new(
        SchemaBuilder::new("StreamOrderbook")
            .scalar("server_time", ScalarKind::I64)
            .scalar("recv_time", ScalarKind::I64)
            .scalar("cts", ScalarKind::I64)
            .enumeration("type", Arc::new(OrderbookType::def()))
            .scalar("depth", ScalarKind::U16)
            .string("symbol")
            .scalar("update_id", ScalarKind::U64)
            .scalar("seq_num", ScalarKind::U64)
            .vector("bid_prices", ScalarKind::F64)
            .vector("bid_quantities", ScalarKind::F64)
            .vector("ask_prices", ScalarKind::F64)
            .vector("ask_quantities", ScalarKind::F64)
            .build()?,
    );

    Ok(Models {
        child_fixed,
        child_var,
        parent,
        uint32_vector,
        vector_of_uint32,
        vector_of_fixed,
        vector_of_var,
        primitives,
        primitives_and_string,
        structs,
        variants,
        stream_trade,
        stream_orderbook,
    })
}

/// Build a finalized `ChildVar` in its own buffer.
pub fn child_var(field1: i32, field2: &str) -> Object<'static, fastbin::OwnedBuf> {
    let m = models();
    let mut child = Object::create(&m.child_var, fastbin::alloc_zeroed(64 + field2.len()))
        .expect("create ChildVar");
    child.set(0, field1).expect("field1");
    child.set_str(1, field2).expect("field2");
    child.finalize().expect("finalize ChildVar");
    child
}

/// Build a `ChildFixed` in its own buffer.
pub fn child_fixed(field1: i32, field2: i32) -> Object<'static, fastbin::OwnedBuf> {
    let m = models();
    let mut child =
        Object::create(&m.child_fixed, fastbin::alloc_zeroed(16)).expect("create ChildFixed");
    child.set(0, field1).expect("field1");
    child.set(1, field2).expect("field2");
    child
}

pub const BID_PRICES: [f64; 22] = [
    123.45, 123.40, 123.35, 123.30, 123.25, 123.20, 123.15, 123.10, 123.05, 123.00, 122.95,
    122.90, 122.85, 122.80, 122.75, 122.70, 122.65, 122.60, 122.55, 122.50, 122.45, 122.40,
];

pub const QUANTITIES: [f64; 30] = [
    1.5, 2.0, 0.25, 3.75, 10.0, 0.5, 7.25, 1.0, 4.5, 2.25, 6.0, 0.75, 8.5, 3.0, 5.25, 9.0,
    0.125, 2.5, 11.0, 1.75, 4.0, 6.5, 0.375, 12.0, 3.5, 7.0, 0.625, 5.0, 8.0, 2.75,
];

/// Hand-written typed accessors over the dynamic `Object`, the way generated
/// bindings wrap it.
pub struct StreamTrade<B>(pub Object<'static, B>);

impl<B: AsRef<[u8]>> StreamTrade<B> {
    pub fn open(buf: B) -> Self {
        Self(Object::open(&models().stream_trade, buf))
    }

    pub fn server_time(&self) -> Result<i64> {
        self.0.get(0)
    }

    pub fn recv_time(&self) -> Result<i64> {
        self.0.get(1)
    }

    pub fn symbol(&self) -> Result<&str> {
        self.0.str(2)
    }

    pub fn fill_time(&self) -> Result<i64> {
        self.0.get(3)
    }

    pub fn side(&self) -> Result<TradeSide> {
        self.0.get_enum(4)
    }

    pub fn price(&self) -> Result<f64> {
        self.0.get(5)
    }

    pub fn price_chg_dir(&self) -> Result<TickDirection> {
        self.0.get_enum(6)
    }

    pub fn size(&self) -> Result<f64> {
        self.0.get(7)
    }

    pub fn trade_id(&self) -> Result<&str> {
        self.0.str(8)
    }

    pub fn block_trade(&self) -> Result<bool> {
        self.0.get(9)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> StreamTrade<B> {
    pub fn create(buf: B) -> Result<Self> {
        Ok(Self(Object::create(&models().stream_trade, buf)?))
    }

    pub fn set_server_time(&mut self, value: i64) -> Result<()> {
        self.0.set(0, value)
    }

    pub fn set_recv_time(&mut self, value: i64) -> Result<()> {
        self.0.set(1, value)
    }

    pub fn set_symbol(&mut self, value: &str) -> Result<()> {
        self.0.set_str(2, value)
    }

    pub fn set_fill_time(&mut self, value: i64) -> Result<()> {
        self.0.set(3, value)
    }

    pub fn set_side(&mut self, value: TradeSide) -> Result<()> {
        self.0.set_enum(4, value)
    }

    pub fn set_price(&mut self, value: f64) -> Result<()> {
        self.0.set(5, value)
    }

    pub fn set_price_chg_dir(&mut self, value: TickDirection) -> Result<()> {
        self.0.set_enum(6, value)
    }

    pub fn set_size(&mut self, value: f64) -> Result<()> {
        self.0.set(7, value)
    }

    pub fn set_trade_id(&mut self, value: &str) -> Result<()> {
        self.0.set_str(8, value)
    }

    pub fn set_block_trade(&mut self, value: bool) -> Result<()> {
        self.0.set(9, value)
    }

    pub fn finalize(&mut self) -> Result<usize> {
        self.0.finalize()
    }
}
