// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field codecs: bounds-checked word access, fixed scalars and enums, and the
//! variable-length header scheme.

pub mod cursor;
pub mod enums;
pub mod scalar;
pub mod varfield;

pub use enums::{EnumDef, EnumMember, FastbinEnum};
pub use scalar::{Scalar, ScalarKind, ScalarSlice, ScalarValue, VectorRef};
pub use varfield::VarHeader;
