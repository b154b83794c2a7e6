//! Count-prefixed id -> name tables.
//!
//! Three of these trail the rules: node types, devices (which also names
//! buckets, by their negative id) and rule sets (keyed by rule index).
//!
//! ## Layout
//!   u32 count
//!   count x { i32 key, u32 len, len raw bytes }

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;

/// Integer keyed names, iterated in ascending key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameTable {
    entries: BTreeMap<i32, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one table. Later duplicates of a key replace earlier ones.
    pub fn decode(reader: &mut BinaryReader) -> Result<Self> {
        let count = reader.read_u32()?;
        let mut table = Self::new();
        for _ in 0..count {
            let key = reader.read_i32()?;
            let len = reader.read_u32()? as usize;
            let name = reader.read_chars(len)?;
            table.insert(key, name);
        }
        Ok(table)
    }

    pub fn insert(&mut self, key: i32, name: impl Into<String>) {
        self.entries.insert(key, name.into());
    }

    pub fn get(&self, key: i32) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: i32) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Name of a device (`id >= 0`) or bucket (`id < 0`), synthesized
    /// as `device<id>` / `bucket<-1-id>` when the table has no entry.
    pub fn item_name(&self, id: i32) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None if id >= 0 => format!("device{id}"),
            None => format!("bucket{}", -1 - i64::from(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BinaryWriter;
    use crate::error::Error;

    #[test]
    fn test_decode_table() {
        let mut w = BinaryWriter::new();
        w.write_name_table(&[(3, "rack"), (1, "host"), (-1, "root")]);
        let data = w.into_vec();

        let mut reader = BinaryReader::new(&data);
        let table = NameTable::decode(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(table.len(), 3);
        let keys: Vec<i32> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![-1, 1, 3]);
        assert_eq!(table.get(1), Some("host"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let mut w = BinaryWriter::new();
        w.write_name_table(&[(0, "osd"), (0, "disk")]);
        let data = w.into_vec();

        let table = NameTable::decode(&mut BinaryReader::new(&data)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some("disk"));
    }

    #[test]
    fn test_empty_table() {
        let data = 0u32.to_le_bytes();
        let table = NameTable::decode(&mut BinaryReader::new(&data)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_truncated_value() {
        let mut w = BinaryWriter::new();
        w.write_u32(1).write_i32(0).write_u32(10).write_bytes(b"short");
        let data = w.into_vec();

        let err = NameTable::decode(&mut BinaryReader::new(&data)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEndOfStream { need: 10, have: 5, .. }));
    }

    #[test]
    fn test_item_name_fallback() {
        let mut table = NameTable::new();
        table.insert(0, "osd.0");
        table.insert(-1, "default");

        assert_eq!(table.item_name(0), "osd.0");
        assert_eq!(table.item_name(-1), "default");
        assert_eq!(table.item_name(5), "device5");
        assert_eq!(table.item_name(-3), "bucket2");
        assert_eq!(table.item_name(i32::MIN), "bucket2147483647");
    }
}
