//! CRUSH map binary layout
//!
//! File order:
//!   header (magic, max_buckets, max_rules, max_devices)
//!   max_buckets bucket slots
//!   max_rules rule slots
//!   type, device and rule-set name tables
//!   tunables (four u32)

pub mod bucket;
pub mod map;
pub mod names;
pub mod rule;
pub mod types;

pub const CRUSH_MAGIC: u32 = 0x0001_0000;

pub use bucket::{Bucket, BucketAlg, BucketKind};
pub use map::{CrushMap, Tunables};
pub use names::NameTable;
pub use rule::{pg_type_name, Rule, RuleMask, RuleOp, RuleStep};
pub use types::Weight;
