use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

const MAGIC: u32 = 0xCAFE_BABE;
const CLASS_INITIALIZER: &str = "<clinit>";

/// The parts of a class file that declarations are built from.
///
/// Class initialisers are dropped while parsing; every other method,
/// constructors included, is kept in file order.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

/// One row of the `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

/// Attributes resolution reads. Code, annotations and debug tables are
/// skipped unread.
enum Attribute {
    Signature(String),
    InnerClasses(Vec<InnerClassInfo>),
    Skipped,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let pool = ConstantPool::parse(&mut reader)?;
        let mut parser = Parser { reader, pool };

        let access_flags = parser.reader.read_u2()?;
        let this_class = parser.class_name()?;
        let super_class = parser.optional_class_name()?;
        let interfaces = parser.counted(Parser::class_name)?;
        let fields = parser.counted(Parser::member)?;
        let mut methods = parser.counted(Parser::member)?;
        methods.retain(|method| method.name != CLASS_INITIALIZER);

        let mut class = ClassFile {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: None,
            inner_classes: Vec::new(),
        };
        for attribute in parser.attributes()? {
            match attribute {
                Attribute::Signature(signature) => class.signature = Some(signature),
                Attribute::InnerClasses(rows) => class.inner_classes.extend(rows),
                Attribute::Skipped => {}
            }
        }
        parser.reader.finish("class file")?;
        Ok(class)
    }
}

struct Parser<'a> {
    reader: Reader<'a>,
    pool: ConstantPool,
}

impl<'a> Parser<'a> {
    /// A `u2` count followed by that many items.
    fn counted<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let count = self.reader.read_u2()? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn class_name(&mut self) -> Result<String> {
        let index = self.reader.read_u2()?;
        self.pool.get_class_name(index)
    }

    fn optional_class_name(&mut self) -> Result<Option<String>> {
        let index = self.reader.read_u2()?;
        optional(index, |index| self.pool.get_class_name(index))
    }

    fn utf8(&mut self) -> Result<String> {
        let index = self.reader.read_u2()?;
        Ok(self.pool.get_utf8(index)?.to_string())
    }

    fn member(&mut self) -> Result<ClassMember> {
        let access_flags = self.reader.read_u2()?;
        let name = self.utf8()?;
        let descriptor = self.utf8()?;
        let signature = self.attributes()?.into_iter().find_map(|attribute| match attribute {
            Attribute::Signature(signature) => Some(signature),
            _ => None,
        });
        Ok(ClassMember {
            access_flags,
            name,
            descriptor,
            signature,
        })
    }

    fn attributes(&mut self) -> Result<Vec<Attribute>> {
        self.counted(|parser| {
            let name_index = parser.reader.read_u2()?;
            let length = parser.reader.read_u4()? as usize;
            let body = parser.reader.read_bytes(length)?;
            decode_attribute(&parser.pool, parser.pool.get_utf8(name_index)?, body)
        })
    }
}

fn decode_attribute(pool: &ConstantPool, name: &str, body: &[u8]) -> Result<Attribute> {
    let mut reader = Reader::new(body);
    let attribute = match name {
        "Signature" => Attribute::Signature(pool.get_utf8(reader.read_u2()?)?.to_string()),
        "InnerClasses" => {
            let count = reader.read_u2()? as usize;
            let mut rows = Vec::with_capacity(count);
            for _ in 0..count {
                let inner_class = pool.get_class_name(reader.read_u2()?)?;
                let outer_class = optional(reader.read_u2()?, |index| pool.get_class_name(index))?;
                let inner_name = optional(reader.read_u2()?, |index| pool.get_utf8(index).map(str::to_string))?;
                let access_flags = reader.read_u2()?;
                rows.push(InnerClassInfo {
                    inner_class,
                    outer_class,
                    inner_name,
                    access_flags,
                });
            }
            Attribute::InnerClasses(rows)
        }
        _ => return Ok(Attribute::Skipped),
    };
    reader.finish(name)?;
    Ok(attribute)
}

/// Pool index 0 marks an absent reference.
fn optional<T>(index: u16, get: impl FnOnce(u16) -> Result<T>) -> Result<Option<T>> {
    match index {
        0 => Ok(None),
        index => get(index).map(Some),
    }
}
