//! CRUSH map decompiler
//!
//! Decodes the binary serialization of a CRUSH placement map into a
//! typed [`CrushMap`] and renders it as the familiar text listing.

pub mod codec;
pub mod crush;
pub mod error;
pub mod render;

pub use error::{Error, Result, Stage};
pub use crush::{
    Bucket, BucketAlg, BucketKind, CrushMap, NameTable,
    Rule, RuleMask, RuleOp, RuleStep, Tunables, Weight,
    CRUSH_MAGIC,
};
pub use render::{render, Dump};

/// Decode the map at `path` and render it.
pub fn decompile_file(path: impl AsRef<std::path::Path>) -> Result<Dump> {
    let map = CrushMap::decode_file(path)?;
    Ok(render(&map))
}
