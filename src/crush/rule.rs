//! Placement rule decoding
//!
//! A rule slot starts with a u32 presence flag (0 = empty slot). A
//! present rule continues with u32 len, u32 mask and len steps of
//! { u32 op, i32 arg1, i32 arg2 }. Step shape never depends on op.

use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;

/// Rule step operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOp {
    Noop,
    /// arg1 = item to start from
    Take,
    /// arg1 = number of items to pick, arg2 = node type
    ChooseFirstN,
    ChooseIndep,
    Emit,
    ChooseLeafFirstN,
    ChooseLeafIndep,
    Unknown(u32),
}

impl RuleOp {
    pub fn from_u32(v: u32) -> Self {
        match v {
            0 => Self::Noop,
            1 => Self::Take,
            2 => Self::ChooseFirstN,
            3 => Self::ChooseIndep,
            4 => Self::Emit,
            6 => Self::ChooseLeafFirstN,
            7 => Self::ChooseLeafIndep,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Noop => 0,
            Self::Take => 1,
            Self::ChooseFirstN => 2,
            Self::ChooseIndep => 3,
            Self::Emit => 4,
            Self::ChooseLeafFirstN => 6,
            Self::ChooseLeafIndep => 7,
            Self::Unknown(v) => v,
        }
    }

    /// Keyword used in the text dump, `None` for unknown codes.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Noop => Some("noop"),
            Self::Take => Some("take"),
            Self::ChooseFirstN => Some("choose firstn"),
            Self::ChooseIndep => Some("choose indep"),
            Self::Emit => Some("emit"),
            Self::ChooseLeafFirstN => Some("chooseleaf firstn"),
            Self::ChooseLeafIndep => Some("chooseleaf indep"),
            Self::Unknown(_) => None,
        }
    }
}

impl Serialize for RuleOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleStep {
    pub op: RuleOp,
    pub arg1: i32,
    pub arg2: i32,
}

impl RuleStep {
    pub fn decode(reader: &mut BinaryReader) -> Result<Self> {
        Ok(Self {
            op: RuleOp::from_u32(reader.read_u32()?),
            arg1: reader.read_i32()?,
            arg2: reader.read_i32()?,
        })
    }
}

/// Rule mask word, one byte per field from the low end:
/// ruleset, pg type, min size, max size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMask {
    pub ruleset: u8,
    pub pg_type: u8,
    pub min_size: u8,
    pub max_size: u8,
}

impl RuleMask {
    pub fn from_word(mask: u32) -> Self {
        Self {
            ruleset: (mask & 0xFF) as u8,
            pg_type: ((mask >> 8) & 0xFF) as u8,
            min_size: ((mask >> 16) & 0xFF) as u8,
            max_size: ((mask >> 24) & 0xFF) as u8,
        }
    }
}

/// Placement group type names known to the dump
pub fn pg_type_name(pg_type: u8) -> Option<&'static str> {
    match pg_type {
        0 => Some("null"),
        1 => Some("replicated"),
        2 => Some("raid4"),
        3 => Some("erasure"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub len: u32,
    pub mask: u32,
    pub steps: Vec<RuleStep>,
}

impl Rule {
    /// Decode one rule slot, returning `None` for an empty slot.
    pub fn decode(reader: &mut BinaryReader) -> Result<Option<Self>> {
        if reader.read_u32()? == 0 {
            return Ok(None);
        }
        let len = reader.read_u32()?;
        let mask = reader.read_u32()?;
        let mut steps = Vec::with_capacity(reader.capacity_hint(len, 12));
        for _ in 0..len {
            steps.push(RuleStep::decode(reader)?);
        }
        Ok(Some(Self { len, mask, steps }))
    }

    pub fn mask(&self) -> RuleMask {
        RuleMask::from_word(self.mask)
    }
}
