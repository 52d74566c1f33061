use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone)]
enum Entry {
    /// Slot 0 and the second slot of `long`/`double` constants.
    Unusable,
    Utf8(String),
    Class { name_index: u16 },
    /// Any constant kind the resolver never reads back.
    Other(&'static str),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Unusable => "unusable",
            Entry::Utf8(_) => "Utf8",
            Entry::Class { .. } => "Class",
            Entry::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<Entry>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Entry::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    entries.push(Entry::Utf8(decode_modified_utf8(bytes)?));
                }
                3 | 4 => {
                    reader.read_u4()?;
                    entries.push(Entry::Other(if tag == 3 { "Integer" } else { "Float" }));
                }
                5 | 6 => {
                    reader.read_u4()?;
                    reader.read_u4()?;
                    entries.push(Entry::Other(if tag == 5 { "Long" } else { "Double" }));
                    entries.push(Entry::Unusable);
                }
                7 => {
                    let name_index = reader.read_u2()?;
                    entries.push(Entry::Class { name_index });
                }
                8 | 16 | 19 | 20 => {
                    reader.read_u2()?;
                    entries.push(Entry::Other(match tag {
                        8 => "String",
                        16 => "MethodType",
                        19 => "Module",
                        _ => "Package",
                    }));
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.read_u2()?;
                    reader.read_u2()?;
                    entries.push(Entry::Other(match tag {
                        9 => "Fieldref",
                        10 => "Methodref",
                        11 => "InterfaceMethodref",
                        12 => "NameAndType",
                        17 => "Dynamic",
                        _ => "InvokeDynamic",
                    }));
                }
                15 => {
                    reader.read_u1()?;
                    reader.read_u2()?;
                    entries.push(Entry::Other("MethodHandle"));
                }
                other => return Err(Error::InvalidConstantPoolTag(other)),
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Entry> {
        match self.entries.get(index as usize) {
            Some(Entry::Unusable) | None => Err(Error::InvalidConstantPoolIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Entry::Utf8(value) => Ok(value),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    /// Internal name of a `CONSTANT_Class` entry, e.g. `java/lang/String`.
    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            Entry::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

/// Decodes the JVM's "modified UTF-8": `NUL` is encoded as `C0 80` and
/// supplementary characters as surrogate pairs of three bytes each.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i] as u16;
        if b0 & 0x80 == 0 {
            units.push(b0);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            units.push(((b0 & 0x1F) << 6) | (b1 & 0x3F));
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            let b2 = *bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)? as u16;
            units.push(((b0 & 0x0F) << 12) | ((b1 & 0x3F) << 6) | (b2 & 0x3F));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8)
}
