use std::collections::HashMap;

const MAJOR_JAVA_8: u16 = 52;

/// A field or method to emit.
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

impl MemberSpec {
    pub fn new(access_flags: u16, name: &str, descriptor: &str) -> Self {
        Self {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }
}

/// Hand-assembles a class file. Names are internal (`java/lang/Object`).
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    fields: Vec<MemberSpec>,
    methods: Vec<MemberSpec>,
    inner_classes: Vec<(String, String, String, u16)>,
}

impl ClassFileBuilder {
    pub fn new(this_class: &str) -> Self {
        Self {
            access_flags: 0x0021,
            this_class: this_class.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn super_class(mut self, super_class: Option<&str>) -> Self {
        self.super_class = super_class.map(str::to_string);
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn field(mut self, field: MemberSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MemberSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Records `inner` as a member class of `outer` named `simple_name`.
    pub fn inner_class(mut self, inner: &str, outer: &str, simple_name: &str, flags: u16) -> Self {
        self.inner_classes
            .push((inner.to_string(), outer.to_string(), simple_name.to_string(), flags));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();

        let this_index = pool.class(&self.this_class);
        let super_index = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let fields: Vec<Vec<u8>> = self.fields.iter().map(|f| member_bytes(&mut pool, f)).collect();
        let methods: Vec<Vec<u8>> = self.methods.iter().map(|m| member_bytes(&mut pool, m)).collect();

        let mut class_attrs = Vec::new();
        let mut class_attr_count = 0u16;
        if let Some(sig) = &self.signature {
            let name = pool.utf8("Signature");
            let value = pool.utf8(sig);
            push_u16(&mut class_attrs, name);
            push_u32(&mut class_attrs, 2);
            push_u16(&mut class_attrs, value);
            class_attr_count += 1;
        }
        if !self.inner_classes.is_empty() {
            let name = pool.utf8("InnerClasses");
            let mut body = Vec::new();
            push_u16(&mut body, self.inner_classes.len() as u16);
            for (inner, outer, simple, flags) in &self.inner_classes {
                let inner = pool.class(inner);
                let outer = pool.class(outer);
                let simple = pool.utf8(simple);
                push_u16(&mut body, inner);
                push_u16(&mut body, outer);
                push_u16(&mut body, simple);
                push_u16(&mut body, *flags);
            }
            push_u16(&mut class_attrs, name);
            push_u32(&mut class_attrs, body.len() as u32);
            class_attrs.extend_from_slice(&body);
            class_attr_count += 1;
        }

        let mut bytes = Vec::new();
        push_u32(&mut bytes, 0xCAFEBABE);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, MAJOR_JAVA_8);
        push_u16(&mut bytes, pool.entries.len() as u16 + 1);
        for entry in &pool.entries {
            bytes.extend_from_slice(entry);
        }
        push_u16(&mut bytes, self.access_flags);
        push_u16(&mut bytes, this_index);
        push_u16(&mut bytes, super_index);
        push_u16(&mut bytes, interface_indices.len() as u16);
        for index in interface_indices {
            push_u16(&mut bytes, index);
        }
        push_u16(&mut bytes, fields.len() as u16);
        for field in fields {
            bytes.extend_from_slice(&field);
        }
        push_u16(&mut bytes, methods.len() as u16);
        for method in methods {
            bytes.extend_from_slice(&method);
        }
        push_u16(&mut bytes, class_attr_count);
        bytes.extend_from_slice(&class_attrs);
        bytes
    }
}

#[derive(Default)]
struct Pool {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Pool {
    fn utf8(&mut self, s: &str) -> u16 {
        if let Some(index) = self.utf8.get(s) {
            return *index;
        }
        let mut entry = vec![1]; // CONSTANT_Utf8
        push_u16(&mut entry, s.len() as u16);
        entry.extend_from_slice(s.as_bytes());
        self.entries.push(entry);
        let index = self.entries.len() as u16;
        self.utf8.insert(s.to_string(), index);
        index
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(index) = self.classes.get(internal_name) {
            return *index;
        }
        let name_index = self.utf8(internal_name);
        let mut entry = vec![7]; // CONSTANT_Class
        push_u16(&mut entry, name_index);
        self.entries.push(entry);
        let index = self.entries.len() as u16;
        self.classes.insert(internal_name.to_string(), index);
        index
    }
}

fn member_bytes(pool: &mut Pool, member: &MemberSpec) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, member.access_flags);
    push_u16(&mut out, pool.utf8(&member.name));
    push_u16(&mut out, pool.utf8(&member.descriptor));
    match &member.signature {
        Some(sig) => {
            push_u16(&mut out, 1);
            push_u16(&mut out, pool.utf8("Signature"));
            push_u32(&mut out, 2);
            push_u16(&mut out, pool.utf8(sig));
        }
        None => push_u16(&mut out, 0),
    }
    out
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
