// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum descriptors and typed enum support.
//!
//! On the wire an enum is its integer representation, stored like any other
//! scalar. [`EnumDef`] carries the member table used to name and parse values;
//! [`fastbin_enum!`](crate::fastbin_enum) generates typed Rust enums over it.

use crate::codec::scalar::{Scalar, ScalarKind};
use crate::error::{FastbinError, Result};

/// One enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    /// Strings accepted by [`EnumDef::parse`]. Defaults to the member name.
    pub map: Vec<String>,
    pub doc: Vec<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        Self {
            map: vec![name.clone()],
            name,
            value,
            doc: Vec::new(),
        }
    }

    /// Replace the parse strings.
    pub fn with_map<I, S>(mut self, map: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map = map.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc.push(doc.into());
        self
    }
}

/// Runtime enum descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub repr: ScalarKind,
    pub members: Vec<EnumMember>,
    pub generate_parse: bool,
    pub doc: Vec<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, repr: ScalarKind) -> Self {
        Self {
            name: name.into(),
            repr,
            members: Vec::new(),
            generate_parse: false,
            doc: Vec::new(),
        }
    }

    /// Add a member named after itself.
    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember::new(name, value));
        self
    }

    pub fn with_member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_parse(mut self, generate_parse: bool) -> Self {
        self.generate_parse = generate_parse;
        self
    }

    /// Check the representation, value ranges and uniqueness of members.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.repr.integer_range().ok_or_else(|| {
            FastbinError::schema(format!(
                "enum '{}' must use an integer type, not {}",
                self.name, self.repr
            ))
        })?;
        if self.members.is_empty() {
            return Err(FastbinError::schema(format!(
                "enum '{}' has no members",
                self.name
            )));
        }
        for (i, member) in self.members.iter().enumerate() {
            let value = i128::from(member.value);
            if value < min || value > max {
                return Err(FastbinError::schema(format!(
                    "enum '{}' member '{}' value {} does not fit {}",
                    self.name, member.name, member.value, self.repr
                )));
            }
            let earlier = &self.members[..i];
            if earlier.iter().any(|m| m.name == member.name) {
                return Err(FastbinError::schema(format!(
                    "enum '{}' has duplicate member '{}'",
                    self.name, member.name
                )));
            }
            if earlier.iter().any(|m| m.value == member.value) {
                return Err(FastbinError::schema(format!(
                    "enum '{}' has duplicate value {}",
                    self.name, member.value
                )));
            }
            for alias in &member.map {
                if earlier.iter().any(|m| m.map.contains(alias))
                    || member.map.iter().filter(|a| *a == alias).count() > 1
                {
                    return Err(FastbinError::schema(format!(
                        "enum '{}' has duplicate map entry '{}'",
                        self.name, alias
                    )));
                }
            }
        }
        Ok(())
    }

    /// Member name for a raw value.
    pub fn name_of(&self, value: i64) -> Result<&str> {
        self.members
            .iter()
            .find(|m| m.value == value)
            .map(|m| m.name.as_str())
            .ok_or_else(|| FastbinError::InvalidEnum {
                name: self.name.clone(),
                value,
            })
    }

    /// Resolve a map string to a raw value. Only enums declared with
    /// `generate_parse` accept text input.
    pub fn parse(&self, text: &str) -> Result<i64> {
        if !self.generate_parse {
            return Err(FastbinError::schema(format!(
                "enum '{}' does not support parsing",
                self.name
            )));
        }
        self.members
            .iter()
            .find(|m| m.map.iter().any(|s| s == text))
            .map(|m| m.value)
            .ok_or_else(|| {
                FastbinError::schema(format!("'{}' is not a valid {}", text, self.name))
            })
    }
}

/// A Rust enum stored as its integer representation.
pub trait FastbinEnum: Copy + Sized + 'static {
    type Repr: Scalar;
    const NAME: &'static str;

    fn to_repr(self) -> Self::Repr;
    fn from_repr(repr: Self::Repr) -> Result<Self>;
    fn as_str(&self) -> &'static str;
    fn def() -> EnumDef;
}

/// Declare a typed enum usable in fixed fields, vectors and variants.
///
/// ```rust
/// fastbin::fastbin_enum! {
///     /// Aggressor side of a trade.
///     pub enum TradeSide: u8 {
///         Sell = 0,
///         Buy = 1,
///     }
/// }
///
/// use fastbin::FastbinEnum;
/// assert_eq!(TradeSide::Buy.to_repr(), 1);
/// assert_eq!("Sell".parse::<TradeSide>().unwrap(), TradeSide::Sell);
/// ```
#[macro_export]
macro_rules! fastbin_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $crate::FastbinEnum for $name {
            type Repr = $repr;
            const NAME: &'static str = stringify!($name);

            fn to_repr(self) -> $repr {
                self as $repr
            }

            fn from_repr(repr: $repr) -> $crate::Result<Self> {
                match repr {
                    $( $value => Ok(Self::$variant), )+
                    other => Err($crate::FastbinError::InvalidEnum {
                        name: stringify!($name).to_string(),
                        value: other as i64,
                    }),
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )+
                }
            }

            fn def() -> $crate::EnumDef {
                $crate::EnumDef::new(stringify!($name), <$repr as $crate::Scalar>::KIND)
                    $( .member(stringify!($variant), $value as i64) )+
                    .with_parse(true)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::FastbinEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::FastbinError;

            fn from_str(s: &str) -> $crate::Result<Self> {
                match s {
                    $( stringify!($variant) => Ok(Self::$variant), )+
                    other => Err($crate::FastbinError::InvalidSchema {
                        reason: format!("'{}' is not a valid {}", other, stringify!($name)),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::fastbin_enum! {
        enum TickDirection: u8 {
            Unknown = 0,
            PlusTick = 1,
            ZeroPlusTick = 2,
            MinusTick = 3,
            ZeroMinusTick = 4,
        }
    }

    crate::fastbin_enum! {
        enum Signed: i16 {
            Low = -300,
            High = 300,
        }
    }

    #[test]
    fn test_generated_enum_round_trips_repr() {
        assert_eq!(TickDirection::MinusTick.to_repr(), 3);
        assert_eq!(
            TickDirection::from_repr(4).expect("valid discriminant"),
            TickDirection::ZeroMinusTick
        );
        assert_eq!(
            TickDirection::from_repr(9),
            Err(FastbinError::InvalidEnum {
                name: "TickDirection".into(),
                value: 9
            })
        );
        assert_eq!(Signed::from_repr(-300).expect("valid"), Signed::Low);
    }

    #[test]
    fn test_generated_enum_strings() {
        assert_eq!(TickDirection::PlusTick.to_string(), "PlusTick");
        assert_eq!(
            "ZeroPlusTick".parse::<TickDirection>().expect("parse"),
            TickDirection::ZeroPlusTick
        );
        assert!("Sideways".parse::<TickDirection>().is_err());
    }

    #[test]
    fn test_generated_def_matches_enum() {
        let def = TickDirection::def();
        def.validate().expect("generated def is valid");
        assert_eq!(def.repr, ScalarKind::U8);
        assert_eq!(def.members.len(), 5);
        assert_eq!(def.name_of(2).expect("member"), "ZeroPlusTick");
        assert_eq!(Signed::def().name_of(300).expect("member"), "High");
    }

    #[test]
    fn test_parse_uses_map_strings() {
        let def = EnumDef::new("OrderbookType", ScalarKind::U8)
            .with_member(EnumMember::new("Snapshot", 0).with_map(["snapshot", "S"]))
            .with_member(EnumMember::new("Delta", 1).with_map(["delta"]))
            .with_parse(true);
        def.validate().expect("valid def");
        assert_eq!(def.parse("S").expect("alias"), 0);
        assert_eq!(def.parse("delta").expect("alias"), 1);
        assert!(def.parse("Delta").is_err(), "name is not a map entry here");
    }

    #[test]
    fn test_parse_requires_generate_parse() {
        let def = EnumDef::new("OrderbookType", ScalarKind::U8)
            .with_member(EnumMember::new("Snapshot", 0).with_map(["snapshot"]));
        assert!(!def.generate_parse);
        assert!(matches!(
            def.parse("snapshot"),
            Err(FastbinError::InvalidSchema { .. })
        ));
        assert_eq!(def.with_parse(true).parse("snapshot").expect("alias"), 0);
    }

    #[test]
    fn test_validate_rejects_bad_defs() {
        let float = EnumDef::new("Bad", ScalarKind::F64).member("A", 0);
        assert!(float.validate().is_err());

        let overflow = EnumDef::new("Bad", ScalarKind::U8).member("A", 256);
        assert!(overflow.validate().is_err());

        let dup_map = EnumDef::new("Bad", ScalarKind::U8)
            .with_member(EnumMember::new("A", 0).with_map(["x"]))
            .with_member(EnumMember::new("B", 1).with_map(["x"]));
        assert!(dup_map.validate().is_err());

        let dup_value = EnumDef::new("Bad", ScalarKind::U8).member("A", 1).member("B", 1);
        assert!(dup_value.validate().is_err());

        assert!(EnumDef::new("Empty", ScalarKind::U8).validate().is_err());
    }
}
