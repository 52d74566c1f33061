use javasym_classfile::{
    ClassFile, ClassStub, Error, FieldType, ReturnType, TypeSignature, ACC_INTERFACE, ACC_PUBLIC,
    ACC_STATIC, ACC_VARARGS,
};
use javasym_test_utils::{ClassFileBuilder, MemberSpec};
use pretty_assertions::assert_eq;

#[test]
fn stub_decodes_members_and_signatures() {
    let bytes = ClassFileBuilder::new("com/example/Box")
        .interface("java/lang/Comparable")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Comparable<Lcom/example/Box<TT;>;>;")
        .field(MemberSpec::new(ACC_PUBLIC, "value", "Ljava/lang/Object;").with_signature("TT;"))
        .field(MemberSpec::new(ACC_PUBLIC | ACC_STATIC, "COUNT", "I"))
        .method(MemberSpec::new(ACC_PUBLIC, "<init>", "()V"))
        .method(MemberSpec::new(ACC_STATIC, "<clinit>", "()V"))
        .method(MemberSpec::new(ACC_PUBLIC | ACC_VARARGS, "join", "([Ljava/lang/String;)Ljava/lang/String;"))
        .build();

    let stub = ClassStub::parse(&bytes).unwrap();
    assert_eq!(stub.qualified_name(), "com.example.Box");
    assert_eq!(stub.super_class.as_deref(), Some("java/lang/Object"));
    assert_eq!(stub.interfaces, vec!["java/lang/Comparable".to_string()]);

    let sig = stub.signature.as_ref().unwrap();
    assert_eq!(sig.type_parameters[0].name, "T");

    assert_eq!(stub.fields.len(), 2);
    assert_eq!(stub.fields[0].signature, Some(TypeSignature::TypeVariable("T".to_string())));
    assert!(stub.fields[1].is_static());

    // `<clinit>` is dropped, `<init>` is kept as a constructor.
    let names: Vec<_> = stub.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["<init>", "join"]);
    assert!(stub.methods[0].is_constructor());

    let join = &stub.methods[1];
    assert!(join.is_varargs());
    assert_eq!(
        join.descriptor.params,
        vec![FieldType::Array(Box::new(FieldType::Object("java/lang/String".to_string())))]
    );
    assert_eq!(
        join.descriptor.return_type,
        ReturnType::Type(FieldType::Object("java/lang/String".to_string()))
    );
}

#[test]
fn interface_without_super_and_member_classes() {
    let bytes = ClassFileBuilder::new("java/util/Map")
        .access_flags(ACC_PUBLIC | ACC_INTERFACE | 0x0400)
        .inner_class("java/util/Map$Entry", "java/util/Map", "Entry", ACC_PUBLIC | ACC_STATIC | ACC_INTERFACE)
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.major_version, 52);
    assert_eq!(class.access_flags & ACC_INTERFACE, ACC_INTERFACE);

    let stub = class.stub().unwrap();
    let members: Vec<_> = stub.member_classes().map(|i| i.inner_class.as_str()).collect();
    assert_eq!(members, vec!["java/util/Map$Entry"]);
}

#[test]
fn rejects_bad_magic_and_truncation() {
    let mut bytes = ClassFileBuilder::new("A").build();
    assert!(ClassFile::parse(&bytes[..bytes.len() - 1]).is_err());

    bytes[0] = 0;
    assert!(matches!(ClassFile::parse(&bytes), Err(Error::InvalidMagic(_))));
}

#[test]
fn bytes_after_the_last_attribute_are_rejected() {
    let mut bytes = ClassFileBuilder::new("com/example/Padded")
        .method(MemberSpec::new(ACC_STATIC, "<clinit>", "()V"))
        .build();
    let class = ClassFile::parse(&bytes).unwrap();
    assert!(class.methods.is_empty());

    bytes.push(0);
    assert_eq!(
        ClassFile::parse(&bytes).unwrap_err(),
        Error::TrailingBytes {
            within: "class file".into(),
            count: 1
        }
    );
}
