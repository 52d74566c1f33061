use std::sync::Arc;

use javasym_types::synthetic::{MethodBuilder, TypeDeclarationBuilder};
use javasym_types::{type_from_syntax, MemoryTypeSolver, ReferenceType, Type, TypeDeclaration};

mod assignability;
mod declarations;
mod overloads;
mod substitution;

/// A memory solver holding a small slice of the JDK.
pub fn jdk() -> Arc<MemoryTypeSolver> {
    let solver = MemoryTypeSolver::new();
    define_jdk(&solver);
    solver
}

pub fn define_jdk(solver: &MemoryTypeSolver) {
    let builders = vec![
        TypeDeclarationBuilder::class("java.lang.Object")
            .method(MethodBuilder::new("equals").param("other", "java.lang.Object").returns("boolean"))
            .method(MethodBuilder::new("hashCode").returns("int"))
            .method(MethodBuilder::new("toString").returns("java.lang.String")),
        TypeDeclarationBuilder::interface("java.io.Serializable"),
        TypeDeclarationBuilder::interface("java.lang.CharSequence")
            .method(MethodBuilder::new("length").returns("int")),
        TypeDeclarationBuilder::interface("java.lang.Comparable")
            .type_param("T", &[])
            .method(MethodBuilder::new("compareTo").param("o", "T").returns("int")),
        TypeDeclarationBuilder::class("java.lang.String")
            .implements("java.io.Serializable")
            .implements("java.lang.CharSequence")
            .implements("java.lang.Comparable<java.lang.String>")
            .method(MethodBuilder::new("length").returns("int"))
            .method(MethodBuilder::new("charAt").param("index", "int").returns("char"))
            .method(
                MethodBuilder::new("format")
                    .param("format", "java.lang.String")
                    .varargs("args", "java.lang.Object")
                    .returns("java.lang.String")
                    .static_(),
            ),
        TypeDeclarationBuilder::class("java.lang.Number").implements("java.io.Serializable"),
        TypeDeclarationBuilder::class("java.lang.Boolean")
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable<java.lang.Boolean>"),
        TypeDeclarationBuilder::class("java.lang.Character")
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable<java.lang.Character>"),
        TypeDeclarationBuilder::interface("java.lang.Iterable").type_param("T", &[]),
        TypeDeclarationBuilder::interface("java.util.Collection")
            .type_param("E", &[])
            .extends("java.lang.Iterable<E>")
            .method(MethodBuilder::new("size").returns("int"))
            .method(MethodBuilder::new("add").param("e", "E").returns("boolean")),
        TypeDeclarationBuilder::interface("java.util.List")
            .type_param("E", &[])
            .extends("java.util.Collection<E>")
            .method(MethodBuilder::new("get").param("index", "int").returns("E")),
        TypeDeclarationBuilder::class("java.util.ArrayList")
            .type_param("E", &[])
            .implements("java.util.List<E>")
            .constructor(MethodBuilder::new("ArrayList"))
            .constructor(MethodBuilder::new("ArrayList").param("initialCapacity", "int"))
            .constructor(MethodBuilder::new("ArrayList").param("c", "java.util.Collection<? extends E>")),
        TypeDeclarationBuilder::interface("java.util.Map")
            .type_param("K", &[])
            .type_param("V", &[])
            .method(MethodBuilder::new("get").param("key", "java.lang.Object").returns("V"))
            .method(MethodBuilder::new("put").param("key", "K").param("value", "V").returns("V")),
        TypeDeclarationBuilder::class("java.util.HashMap")
            .type_param("K", &[])
            .type_param("V", &[])
            .implements("java.util.Map<K, V>"),
        TypeDeclarationBuilder::class("java.lang.Enum")
            .type_param("E", &["java.lang.Enum<E>"])
            .implements("java.lang.Comparable<E>")
            .implements("java.io.Serializable")
            .method(MethodBuilder::new("name").returns("java.lang.String")),
    ];
    for builder in builders {
        solver.define(builder).unwrap();
    }
    for boxed in ["Byte", "Short", "Integer", "Long", "Float", "Double"] {
        solver
            .define(
                TypeDeclarationBuilder::class(format!("java.lang.{boxed}"))
                    .extends("java.lang.Number")
                    .implements(format!("java.lang.Comparable<java.lang.{boxed}>")),
            )
            .unwrap();
    }
}

/// Parses `text` and resolves its class names through `solver`.
///
/// `null` is the null type.
pub fn ty(solver: &MemoryTypeSolver, text: &str) -> Type {
    if text == "null" {
        return Type::Null;
    }
    let syntax = javasym_syntax::parse_type_ref(text).unwrap_or_else(|| panic!("bad type `{text}`"));
    let handle = solver.handle();
    let resolve = |name: &str| handle.solve_type(name).map(TypeDeclaration::Reference);
    type_from_syntax(&syntax, &resolve).unwrap()
}

pub fn reference(solver: &MemoryTypeSolver, text: &str) -> ReferenceType {
    match ty(solver, text) {
        Type::Reference(r) => (*r).clone(),
        other => panic!("`{text}` is not a reference type: {other}"),
    }
}

pub fn types(solver: &MemoryTypeSolver, texts: &[&str]) -> Vec<Type> {
    texts.iter().map(|t| ty(solver, t)).collect()
}
