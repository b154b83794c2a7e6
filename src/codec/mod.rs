pub mod reader;
#[cfg(test)]
pub mod writer;

pub use reader::BinaryReader;
#[cfg(test)]
pub use writer::BinaryWriter;
