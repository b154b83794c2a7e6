//! Bucket decoding
//!
//! # Bucket Slot Format
//!
//! ## Tag (4 bytes):
//!   u32 alg tag. 0 means the slot is empty and nothing else follows.
//!
//! ## Common header:
//!   i32 id (negative), u16 type, u8 alg (must repeat the tag),
//!   u8 hash, u32 weight (16.16), u32 size
//!
//! ## Items:
//!   size x i32 item id (>= 0 device, < 0 bucket)
//!
//! ## Payload by alg:
//!   1 uniform: u32 item weight
//!   2 list:    size x { u32 item weight, u32 sum weight }
//!   3 tree:    u8 num_nodes, num_nodes x u32 node weight
//!   4 straw:   size x { u32 item weight, u32 straw }

use serde::Serialize;

use super::types::Weight;
use crate::codec::BinaryReader;
use crate::error::{Error, Result};

/// Bucket selection algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketAlg {
    Uniform,
    List,
    Tree,
    Straw,
}

impl BucketAlg {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(Self::Uniform),
            2 => Some(Self::List),
            3 => Some(Self::Tree),
            4 => Some(Self::Straw),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::List => "list",
            Self::Tree => "tree",
            Self::Straw => "straw",
        }
    }
}

/// Algorithm specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "alg", rename_all = "lowercase")]
pub enum BucketKind {
    Uniform {
        item_weight: Weight,
    },
    List {
        item_weights: Vec<Weight>,
        sum_weights: Vec<Weight>,
    },
    Tree {
        num_nodes: u8,
        node_weights: Vec<Weight>,
    },
    Straw {
        item_weights: Vec<Weight>,
        straws: Vec<Weight>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub id: i32,
    #[serde(rename = "type")]
    pub bucket_type: u16,
    pub hash: u8,
    pub weight: Weight,
    pub items: Vec<i32>,
    #[serde(flatten)]
    pub kind: BucketKind,
}

impl Bucket {
    /// Decode one bucket slot, returning `None` for an empty slot.
    pub fn decode(reader: &mut BinaryReader) -> Result<Option<Self>> {
        let tag = reader.read_u32()?;
        if tag == 0 {
            return Ok(None);
        }
        let alg = BucketAlg::from_u32(tag).ok_or(Error::UnknownAlgorithm { alg: tag })?;

        let id = reader.read_i32()?;
        let bucket_type = reader.read_u16()?;
        let on_wire = reader.read_u8()?;
        if u32::from(on_wire) != tag {
            return Err(Error::CorruptBucket { tag, on_wire });
        }
        let hash = reader.read_u8()?;
        let weight = Weight::from(reader.read_i32()?);
        let size = reader.read_u32()?;

        let mut items = Vec::with_capacity(reader.capacity_hint(size, 4));
        for _ in 0..size {
            items.push(reader.read_i32()?);
        }

        let kind = match alg {
            BucketAlg::Uniform => BucketKind::Uniform {
                item_weight: Weight(reader.read_u32()?),
            },
            BucketAlg::List => {
                let (item_weights, sum_weights) = read_weight_pairs(reader, size)?;
                BucketKind::List { item_weights, sum_weights }
            }
            BucketAlg::Tree => {
                let num_nodes = reader.read_u8()?;
                let mut node_weights = Vec::with_capacity(usize::from(num_nodes));
                for _ in 0..num_nodes {
                    node_weights.push(Weight(reader.read_u32()?));
                }
                BucketKind::Tree { num_nodes, node_weights }
            }
            BucketAlg::Straw => {
                let (item_weights, straws) = read_weight_pairs(reader, size)?;
                BucketKind::Straw { item_weights, straws }
            }
        };

        Ok(Some(Self { id, bucket_type, hash, weight, items, kind }))
    }

    pub fn alg(&self) -> BucketAlg {
        match self.kind {
            BucketKind::Uniform { .. } => BucketAlg::Uniform,
            BucketKind::List { .. } => BucketAlg::List,
            BucketKind::Tree { .. } => BucketAlg::Tree,
            BucketKind::Straw { .. } => BucketAlg::Straw,
        }
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Weight of the item at `index`.
    ///
    /// Tree buckets keep weights per node of an implicit binary tree;
    /// item `i` sits at leaf node `2 * (i + 1) - 1`.
    pub fn item_weight(&self, index: usize) -> Weight {
        match &self.kind {
            BucketKind::Uniform { item_weight } => *item_weight,
            BucketKind::List { item_weights, .. } | BucketKind::Straw { item_weights, .. } => {
                item_weights.get(index).copied().unwrap_or_default()
            }
            BucketKind::Tree { node_weights, .. } => {
                let node = ((index + 1) << 1) - 1;
                node_weights.get(node).copied().unwrap_or_default()
            }
        }
    }
}

fn read_weight_pairs(reader: &mut BinaryReader, size: u32) -> Result<(Vec<Weight>, Vec<Weight>)> {
    let cap = reader.capacity_hint(size, 8);
    let mut first = Vec::with_capacity(cap);
    let mut second = Vec::with_capacity(cap);
    for _ in 0..size {
        first.push(Weight(reader.read_u32()?));
        second.push(Weight(reader.read_u32()?));
    }
    Ok((first, second))
}
