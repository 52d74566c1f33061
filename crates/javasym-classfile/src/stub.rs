use crate::classfile::{ClassFile, InnerClassInfo};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    FieldTypeSignature, MethodSignature,
};
use crate::{internal_to_qualified, ACC_ABSTRACT, ACC_STATIC, ACC_VARARGS};

/// A class file with descriptors and signatures already decoded.
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<ClassSignature>,
    pub inner_classes: Vec<InnerClassInfo>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: FieldType,
    pub signature: Option<FieldTypeSignature>,
}

#[derive(Debug, Clone)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: MethodDescriptor,
    pub signature: Option<MethodSignature>,
}

impl ClassStub {
    pub fn from_classfile(class: &ClassFile) -> Result<Self> {
        let signature = match class.signature.as_deref() {
            Some(sig) => Some(parse_class_signature(sig)?),
            None => None,
        };

        let fields = class
            .fields
            .iter()
            .map(|f| {
                Ok(FieldStub {
                    access_flags: f.access_flags,
                    name: f.name.clone(),
                    descriptor: parse_field_descriptor(&f.descriptor)?,
                    signature: f.signature.as_deref().map(parse_field_signature).transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let methods = class
            .methods
            .iter()
            .map(|m| {
                Ok(MethodStub {
                    access_flags: m.access_flags,
                    name: m.name.clone(),
                    descriptor: parse_method_descriptor(&m.descriptor)?,
                    signature: m.signature.as_deref().map(parse_method_signature).transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassStub {
            internal_name: class.this_class.clone(),
            access_flags: class.access_flags,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            signature,
            inner_classes: class.inner_classes.clone(),
            fields,
            methods,
        })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::from_classfile(&ClassFile::parse(bytes)?)
    }

    /// Dotted name with nested separators normalised, e.g. `java.util.Map.Entry`.
    pub fn qualified_name(&self) -> String {
        internal_to_qualified(&self.internal_name)
    }

    /// Internal names of the classes declared directly inside this one.
    pub fn member_classes(&self) -> impl Iterator<Item = &InnerClassInfo> + '_ {
        self.inner_classes.iter().filter(|info| {
            info.outer_class.as_deref() == Some(self.internal_name.as_str()) && info.inner_name.is_some()
        })
    }
}

impl FieldStub {
    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }
}

impl MethodStub {
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    pub fn is_varargs(&self) -> bool {
        self.access_flags & ACC_VARARGS != 0
    }
}

impl ClassFile {
    pub fn stub(&self) -> Result<ClassStub> {
        ClassStub::from_classfile(self)
    }
}
