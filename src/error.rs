use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(String),

    #[error("bad magic: expected {expected:#010x}, got {found:#010x}", expected = crate::crush::CRUSH_MAGIC)]
    BadMagic { found: u32 },

    #[error("unexpected end of stream at offset {offset}: need {need} bytes, have {have}")]
    UnexpectedEndOfStream { offset: usize, need: usize, have: usize },

    #[error("unknown bucket algorithm: {alg}")]
    UnknownAlgorithm { alg: u32 },

    #[error("corrupt bucket: tag {tag} selected the layout but on-wire alg byte is {on_wire}")]
    CorruptBucket { tag: u32, on_wire: u8 },

    #[error("while decoding {stage}: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The underlying condition with every stage wrapper removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Decode { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Pipeline position used to annotate decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Header,
    Bucket(usize),
    Rule(usize),
    NameTable(&'static str),
    Tail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Header => f.write_str("header"),
            Stage::Bucket(i) => write!(f, "bucket {i}"),
            Stage::Rule(i) => write!(f, "rule {i}"),
            Stage::NameTable(table) => write!(f, "{table} name table"),
            Stage::Tail => f.write_str("tail"),
        }
    }
}

pub(crate) trait StageExt<T> {
    fn in_stage(self, stage: Stage) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn in_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|source| Error::Decode { stage, source: Box::new(source) })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
