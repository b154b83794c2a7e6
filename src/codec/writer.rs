/// Little-endian byte builder used to assemble map fixtures in tests
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.data.push(v);
        self
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i32(&mut self, v: i32) -> &mut Self {
        self.write_u32(v as u32)
    }

    /// Count-prefixed name table in the on-disk layout.
    pub fn write_name_table(&mut self, entries: &[(i32, &str)]) -> &mut Self {
        self.write_u32(entries.len() as u32);
        for (key, name) in entries {
            self.write_i32(*key);
            self.write_u32(name.len() as u32);
            self.write_bytes(name.as_bytes());
        }
        self
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_little_endian() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0x01).write_u16(0x0302).write_i32(-1);
        assert_eq!(writer.len(), 7);
        assert_eq!(writer.into_vec(), vec![0x01, 0x02, 0x03, 0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
