//! Enums viewed as bitfields: storage width and set semantics.
//!
//! Bits are addressed by the value's ordinal (declaration position), never by its
//! declared numeric value. The unknown sentinel has no ordinal and is never set.
//!
//! Width rules: the public declaration of a bitfield helper uses 32 bits for enums with
//! at most 31 values, while the helper bodies assume 32 bits up to 32 values. The two
//! disagree at exactly 32 values; [`widths_disagree`] reports that case so the lint
//! pass can flag it. The emitter renders each side with its own rule.

use crate::schema::{Enum, EnumValue, IntType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitfieldWidth {
    W32,
    W64,
}

impl BitfieldWidth {
    pub fn bits(self) -> u32 {
        match self {
            BitfieldWidth::W32 => 32,
            BitfieldWidth::W64 => 64,
        }
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            BitfieldWidth::W32 => "u32",
            BitfieldWidth::W64 => "u64",
        }
    }

    /// Width used by the helper declaration: 32 bits for at most 31 values.
    pub fn declared(value_count: usize) -> Self {
        if value_count <= 31 {
            BitfieldWidth::W32
        } else {
            BitfieldWidth::W64
        }
    }

    /// Width assumed by the helper implementation: 32 bits for at most 32 values.
    pub fn implemented(value_count: usize) -> Self {
        if value_count <= 32 {
            BitfieldWidth::W32
        } else {
            BitfieldWidth::W64
        }
    }

    /// Public width of a bitfield argument stored on the wire as `storage`.
    pub fn for_storage(storage: IntType) -> Self {
        if storage.bits() == 64 {
            BitfieldWidth::W64
        } else {
            BitfieldWidth::W32
        }
    }
}

/// True when the declared and implemented helper widths differ for this many values.
pub fn widths_disagree(value_count: usize) -> bool {
    BitfieldWidth::declared(value_count) != BitfieldWidth::implemented(value_count)
}

/// Largest number of values a bitfield helper can address.
pub const MAX_BITFIELD_VALUES: usize = 64;

/// Bit `ordinal` is set in `bitfield`.
pub fn is_set(ordinal: usize, bitfield: u64) -> bool {
    ordinal < MAX_BITFIELD_VALUES && bitfield & (1u64 << ordinal) != 0
}

/// Calls `f` with every set ordinal below `cardinality`, ascending.
pub fn for_all_set_in(bitfield: u64, cardinality: usize, mut f: impl FnMut(usize)) {
    for ordinal in 0..cardinality.min(MAX_BITFIELD_VALUES) {
        if is_set(ordinal, bitfield) {
            f(ordinal);
        }
    }
}

/// The enum value with numeric value `raw` is set in `bitfield`.
pub fn enum_is_set(e: &Enum, raw: i32, bitfield: u64) -> bool {
    e.ordinal_of(raw).is_some_and(|ordinal| is_set(ordinal, bitfield))
}

/// Calls `f` with every enum value set in `bitfield`, in declaration order.
pub fn enum_for_all_set_in<'a>(e: &'a Enum, bitfield: u64, mut f: impl FnMut(&'a EnumValue)) {
    for_all_set_in(bitfield, e.values.len(), |ordinal| f(&e.values[ordinal]));
}

/// Numeric values of every enum value set in `bitfield`.
pub fn set_values(e: &Enum, bitfield: u64) -> Vec<i32> {
    let mut out = Vec::new();
    enum_for_all_set_in(e, bitfield, |v| out.push(v.value));
    out
}
