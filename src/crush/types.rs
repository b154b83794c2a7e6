use serde::Serialize;

/// 16.16 fixed-point weight as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Weight(pub u32);

impl Weight {
    /// Integral part, treating the word as unsigned.
    pub fn whole(self) -> u32 {
        self.0 >> 16
    }

    /// Integral part of the two's complement value.
    pub fn signed_whole(self) -> i32 {
        (self.0 as i32) >> 16
    }
}

impl From<u32> for Weight {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<i32> for Weight {
    fn from(v: i32) -> Self {
        Self(v as u32)
    }
}
