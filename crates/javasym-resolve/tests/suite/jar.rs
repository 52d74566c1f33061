use std::path::{Path, PathBuf};
use std::sync::Arc;

use javasym_classfile::{ACC_BRIDGE, ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC};
use javasym_resolve::{entry_to_internal_name, JarError, JarTypeSolver};
use javasym_test_utils::{write_jar, write_sources, ClassFileBuilder, MemberSpec};
use javasym_types::{Origin, ReferenceType, TypeSolver};
use pretty_assertions::assert_eq;

use super::{class_type, session, source_solver};

fn acme_jar(dir: &Path) -> PathBuf {
    let lid_entry = ("com/acme/Box$Lid", "com/acme/Box", "Lid", ACC_PUBLIC | ACC_STATIC);
    let box_class = ClassFileBuilder::new("com/acme/Box")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .field(MemberSpec::new(ACC_PUBLIC, "value", "Ljava/lang/Object;").with_signature("TT;"))
        .method(MemberSpec::new(ACC_PUBLIC, "<init>", "()V"))
        .method(MemberSpec::new(ACC_PUBLIC, "get", "()Ljava/lang/Object;").with_signature("()TT;"))
        .method(MemberSpec::new(ACC_PUBLIC, "put", "(Ljava/lang/Object;)V").with_signature("(TT;)V"))
        .method(MemberSpec::new(ACC_STATIC | ACC_SYNTHETIC, "access$000", "()V"))
        .method(MemberSpec::new(ACC_PUBLIC | ACC_BRIDGE | ACC_SYNTHETIC, "get", "()Ljava/lang/Object;"))
        .inner_class(lid_entry.0, lid_entry.1, lid_entry.2, lid_entry.3)
        .build();
    let lid_class = ClassFileBuilder::new("com/acme/Box$Lid")
        .method(MemberSpec::new(ACC_PUBLIC | ACC_STATIC, "seal", "([Ljava/lang/String;)I"))
        .inner_class(lid_entry.0, lid_entry.1, lid_entry.2, lid_entry.3)
        .build();
    let crate_class = ClassFileBuilder::new("com/acme/Crate")
        .super_class(Some("com/acme/Box"))
        .signature("Lcom/acme/Box<Ljava/lang/String;>;")
        .build();

    let path = dir.join("acme.jar");
    write_jar(
        &path,
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
            ("com/acme/Box.class", box_class),
            ("com/acme/Box$Lid.class", lid_class),
            ("com/acme/Crate.class", crate_class),
            ("com/acme/Broken.class", b"not a class file".to_vec()),
        ],
    );
    path
}

#[test]
fn entry_names_map_to_internal_names() {
    assert_eq!(entry_to_internal_name("java/util/Map$Entry.class"), Some("java/util/Map$Entry"));
    assert_eq!(entry_to_internal_name("/com/acme/Box.class"), Some("com/acme/Box"));
    assert_eq!(entry_to_internal_name("META-INF/versions/9/module-info.class"), None);
    assert_eq!(entry_to_internal_name("com/acme/package-info.class"), None);
    assert_eq!(entry_to_internal_name("com/acme/readme.txt"), None);
}

#[test]
fn archive_is_indexed_by_qualified_name() {
    let dir = tempfile::tempdir().unwrap();
    let jar = JarTypeSolver::new(acme_jar(dir.path())).unwrap();
    assert_eq!(
        jar.class_names(),
        vec![
            "com.acme.Box".to_string(),
            "com.acme.Box.Lid".to_string(),
            "com.acme.Broken".to_string(),
            "com.acme.Crate".to_string(),
        ]
    );
    assert!(jar.contains("com.acme.Box.Lid"));
    assert!(!jar.contains("com.acme.Box$Lid"));
}

#[test]
fn missing_archive_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JarTypeSolver::new(dir.path().join("missing.jar")).unwrap_err();
    assert!(matches!(err, JarError::Io(_)), "{err:?}");
}

#[test]
fn unreadable_entries_are_unsolved() {
    let dir = tempfile::tempdir().unwrap();
    let jar: Arc<dyn TypeSolver> = JarTypeSolver::new(acme_jar(dir.path())).unwrap();
    assert!(!jar.try_to_solve_type("com.acme.Broken").is_solved());
    assert!(!jar.try_to_solve_type("com.acme.Missing").is_solved());
}

#[test]
fn declarations_are_materialized_once() {
    let dir = tempfile::tempdir().unwrap();
    let jar: Arc<dyn TypeSolver> = JarTypeSolver::new(acme_jar(dir.path())).unwrap();
    let first = jar.solve_type("com.acme.Box").unwrap();
    let second = jar.solve_type("com.acme.Box").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.origin(), Origin::Binary);
}

#[test]
fn generic_members_come_from_signatures() {
    let dir = tempfile::tempdir().unwrap();
    let root = session(vec![JarTypeSolver::new(acme_jar(dir.path())).unwrap()]);
    let boxed = root.solve_type("com.acme.Box").unwrap();

    let params: Vec<String> = boxed.type_parameters().iter().map(|tp| tp.name().to_string()).collect();
    assert_eq!(params, vec!["T".to_string()]);

    let value = boxed.field("value").unwrap();
    let ty = value.ty().unwrap();
    assert!(ty.is_type_variable());
    assert_eq!(ty.describe(), "T");

    let mut methods: Vec<String> = boxed.declared_methods().iter().map(|m| m.signature().unwrap()).collect();
    methods.sort();
    assert_eq!(methods, vec!["get()".to_string(), "put(T)".to_string()]);

    let constructors = boxed.constructors();
    assert_eq!(constructors.len(), 1);
    assert_eq!(constructors[0].name(), "Box");
}

#[test]
fn supertype_arguments_propagate() {
    let dir = tempfile::tempdir().unwrap();
    let root = session(vec![JarTypeSolver::new(acme_jar(dir.path())).unwrap()]);
    let crate_decl = root.solve_type("com.acme.Crate").unwrap();

    let ancestors: Vec<String> = crate_decl.all_ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    assert_eq!(ancestors, vec!["com.acme.Box<java.lang.String>".to_string(), "java.lang.Object".to_string()]);

    let crate_type = ReferenceType::raw(crate_decl.clone());
    let boxed = &crate_type.ancestors().unwrap()[0];
    let value = boxed.field_type("value").unwrap().unwrap();
    assert_eq!(value.describe(), "java.lang.String");

    let string = class_type(&root, "java.lang.String");
    let put = crate_decl.solve_method("put", &[string], false).unwrap();
    let put = put.corresponding_declaration().unwrap();
    assert_eq!(put.declaring_type().qualified_name(), "com.acme.Box");
}

#[test]
fn member_classes_resolve_by_dotted_name() {
    let dir = tempfile::tempdir().unwrap();
    let root = session(vec![JarTypeSolver::new(acme_jar(dir.path())).unwrap()]);

    let lid = root.solve_type("com.acme.Box.Lid").unwrap();
    assert_eq!(lid.name(), "Lid");
    assert_eq!(lid.containing_type().unwrap().unwrap().qualified_name(), "com.acme.Box");

    let boxed = root.solve_type("com.acme.Box").unwrap();
    let inner: Vec<String> = boxed.internal_types().iter().map(|t| t.qualified_name().to_string()).collect();
    assert_eq!(inner, vec!["com.acme.Box.Lid".to_string()]);
}

#[test]
fn array_parameters_without_varargs_flag_are_not_variadic() {
    let dir = tempfile::tempdir().unwrap();
    let root = session(vec![JarTypeSolver::new(acme_jar(dir.path())).unwrap()]);
    let lid = root.solve_type("com.acme.Box.Lid").unwrap();

    let seal = &lid.declared_methods()[0];
    assert!(!seal.is_variadic());
    assert_eq!(seal.signature().unwrap(), "seal(java.lang.String[])");

    let string = class_type(&root, "java.lang.String");
    assert!(!lid.solve_method("seal", &[string], true).unwrap().is_solved());
}

#[test]
fn binary_supertypes_resolve_through_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let widget = ClassFileBuilder::new("com/acme/Widget")
        .super_class(Some("app/Base"))
        .build();
    let jar_path = dir.path().join("widget.jar");
    write_jar(&jar_path, &[("com/acme/Widget.class", widget)]);
    let sources = dir.path().join("src");
    write_sources(&sources, &[("app/Base.java", "package app;\n\npublic class Base {\n}\n")]);

    let standalone: Arc<dyn TypeSolver> = JarTypeSolver::new(&jar_path).unwrap();
    let alone = standalone.solve_type("com.acme.Widget").unwrap();
    assert!(alone.all_ancestors().is_err());

    let root = session(vec![JarTypeSolver::new(&jar_path).unwrap(), source_solver(&sources)]);
    let widget = root.solve_type("com.acme.Widget").unwrap();
    let ancestors: Vec<String> = widget.all_ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    assert_eq!(ancestors, vec!["app.Base".to_string(), "java.lang.Object".to_string()]);
}
