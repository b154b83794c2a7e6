use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::bucket::Bucket;
use super::names::NameTable;
use super::rule::Rule;
use super::CRUSH_MAGIC;
use crate::codec::BinaryReader;
use crate::error::{Error, Result, Stage, StageExt};

/// Retry tunables stored after the name tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tunables {
    pub choose_local_tries: u32,
    pub choose_local_fallback_tries: u32,
    pub choose_total_tries: u32,
    pub chooseleaf_descend_once: u32,
}

impl Tunables {
    pub fn decode(reader: &mut BinaryReader) -> Result<Self> {
        Ok(Self {
            choose_local_tries: reader.read_u32()?,
            choose_local_fallback_tries: reader.read_u32()?,
            choose_total_tries: reader.read_u32()?,
            chooseleaf_descend_once: reader.read_u32()?,
        })
    }
}

/// A fully decoded CRUSH map.
///
/// Bucket and rule slots keep their on-disk index; empty slots are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrushMap {
    pub max_buckets: u32,
    pub max_rule_count: u32,
    pub max_devices: u32,
    pub buckets: Vec<Option<Bucket>>,
    pub rules: Vec<Option<Rule>>,
    pub type_names: NameTable,
    pub device_names: NameTable,
    pub rule_names: NameTable,
    pub tunables: Tunables,
}

impl CrushMap {
    /// Decode a complete map. Any failure aborts the whole decode.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let (max_buckets, max_rule_count, max_devices) =
            decode_header(&mut reader).in_stage(Stage::Header)?;
        debug!(max_buckets, max_rule_count, max_devices, "decoded header");

        let mut buckets = Vec::with_capacity(reader.capacity_hint(max_buckets, 4));
        for index in 0..max_buckets as usize {
            let bucket = Bucket::decode(&mut reader).in_stage(Stage::Bucket(index))?;
            if let Some(b) = &bucket {
                trace!(index, id = b.id, alg = b.alg().name(), size = b.size(), "bucket");
            }
            buckets.push(bucket);
        }
        debug!(
            present = buckets.iter().flatten().count(),
            "decoded buckets"
        );

        let mut rules = Vec::with_capacity(reader.capacity_hint(max_rule_count, 4));
        for index in 0..max_rule_count as usize {
            let rule = Rule::decode(&mut reader).in_stage(Stage::Rule(index))?;
            if let Some(r) = &rule {
                trace!(index, steps = r.steps.len(), mask = r.mask, "rule");
            }
            rules.push(rule);
        }
        debug!(present = rules.iter().flatten().count(), "decoded rules");

        let type_names = NameTable::decode(&mut reader).in_stage(Stage::NameTable("types"))?;
        let device_names = NameTable::decode(&mut reader).in_stage(Stage::NameTable("devices"))?;
        let rule_names = NameTable::decode(&mut reader).in_stage(Stage::NameTable("rule"))?;
        debug!(
            types = type_names.len(),
            devices = device_names.len(),
            rules = rule_names.len(),
            "decoded name tables"
        );

        let tunables = Tunables::decode(&mut reader).in_stage(Stage::Tail)?;
        if !reader.is_empty() {
            warn!(trailing = reader.remaining(), "ignoring bytes after tunables");
        }

        Ok(Self {
            max_buckets,
            max_rule_count,
            max_devices,
            buckets,
            rules,
            type_names,
            device_names,
            rule_names,
            tunables,
        })
    }

    /// Read and decode the map at `path`.
    pub fn decode_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        }
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), len = data.len(), "read map");
        Self::decode(&data)
    }

    pub fn bucket(&self, id: i32) -> Option<&Bucket> {
        if id >= 0 {
            return None;
        }
        let index = usize::try_from(-1 - i64::from(id)).ok()?;
        self.buckets.get(index)?.as_ref()
    }
}

/// Magic word followed by the bucket, rule and device capacities.
fn decode_header(reader: &mut BinaryReader) -> Result<(u32, u32, u32)> {
    let magic = reader.read_u32()?;
    if magic != CRUSH_MAGIC {
        return Err(Error::BadMagic { found: magic });
    }
    Ok((reader.read_u32()?, reader.read_u32()?, reader.read_u32()?))
}
