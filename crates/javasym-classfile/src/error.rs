use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a class file could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input ends `needed` bytes short of a value starting at `offset`.
    Truncated { offset: usize, needed: usize },
    /// A length-prefixed structure holds bytes its contents do not account for.
    TrailingBytes { within: String, count: usize },
    InvalidMagic(u32),
    InvalidConstantPoolIndex(u16),
    InvalidConstantPoolTag(u8),
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    InvalidModifiedUtf8,
    InvalidDescriptor(String),
    InvalidSignature(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated { offset, needed } => {
                write!(f, "class file truncated: {needed} more bytes needed at offset {offset}")
            }
            Error::TrailingBytes { within, count } => write!(f, "{count} unread bytes at the end of {within}"),
            Error::InvalidMagic(magic) => write!(f, "not a class file (magic 0x{magic:08x})"),
            Error::InvalidConstantPoolIndex(index) => write!(f, "no usable constant at pool index {index}"),
            Error::InvalidConstantPoolTag(tag) => write!(f, "unknown constant pool tag {tag}"),
            Error::ConstantPoolTypeMismatch {
                index,
                expected,
                found,
            } => write!(f, "pool index {index} holds a {found} constant where a {expected} was expected"),
            Error::InvalidModifiedUtf8 => write!(f, "malformed modified UTF-8 constant"),
            Error::InvalidDescriptor(desc) => write!(f, "malformed descriptor `{desc}`"),
            Error::InvalidSignature(sig) => write!(f, "malformed generic signature `{sig}`"),
        }
    }
}

impl std::error::Error for Error {}
