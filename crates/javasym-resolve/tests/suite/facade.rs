use std::sync::Arc;

use javasym_resolve::{Context, SourceFile, SymbolSolver};
use javasym_types::{PrimitiveType, ResolveError, Type, TypeSolver};
use pretty_assertions::assert_eq;

use super::{class_type, session, source_tree};

const SERVICE: &str = r#"package app;

import java.util.List;

public class Service {
    static int total;
    List<String> names;

    public <R> R convert(String input, R fallback) {
        return fallback;
    }

    void pick(Object first, String second) {
    }

    void pick(String first, Object second) {
    }

    void exact(int value) {
    }

    void exact(long value) {
    }
}
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    root: Arc<dyn TypeSolver>,
    facade: SymbolSolver,
    file: Arc<SourceFile>,
}

impl Fixture {
    /// The facade is built over the source solver alone and reaches the
    /// runtime classes through the session root.
    fn new() -> Self {
        let (dir, src) = source_tree(&[("app/Service.java", SERVICE)]);
        let root = session(vec![src.clone()]);
        let file = src.source_file("app/Service.java").unwrap();
        Self {
            _dir: dir,
            root,
            facade: SymbolSolver::new(src),
            file,
        }
    }

    fn body(&self) -> Arc<dyn Context> {
        self.file.type_context("Service").unwrap()
    }

    fn string(&self) -> Type {
        class_type(&self.root, "java.lang.String")
    }
}

#[test]
fn solves_symbols_and_values() {
    let fx = Fixture::new();
    let body = fx.body();

    let names = fx.facade.solve_symbol("names", body.as_ref()).unwrap();
    assert!(names.is_solved());

    let total = fx.facade.solve_symbol_as_value("total", body.as_ref()).unwrap().unwrap();
    assert_eq!(total.ty(), &Type::Primitive(PrimitiveType::Int));
    assert_eq!(fx.facade.solve_symbol_as_value("nope", body.as_ref()).unwrap(), None);
}

#[test]
fn solves_types_in_context() {
    let fx = Fixture::new();
    let found = fx.facade.solve_type("List", fx.body().as_ref()).unwrap();
    assert_eq!(found.into_declaration().unwrap().qualified_name(), "java.util.List");
}

#[test]
fn method_usage_carries_declared_types() {
    let fx = Fixture::new();
    let integer = class_type(&fx.root, "java.lang.Integer");
    let usage = fx
        .facade
        .solve_method("convert", &[fx.string(), integer], fx.body().as_ref())
        .unwrap();
    assert_eq!(usage.name(), "convert");
    assert_eq!(usage.declaring_type().qualified_name(), "app.Service");
    assert_eq!(usage.signature(), "convert(java.lang.String, R)");
    assert_eq!(usage.return_type().describe(), "R");
}

#[test]
fn overloads_prefer_the_narrower_primitive() {
    let fx = Fixture::new();
    let usage = fx
        .facade
        .solve_method("exact", &[Type::Primitive(PrimitiveType::Short)], fx.body().as_ref())
        .unwrap();
    assert_eq!(usage.signature(), "exact(int)");
}

#[test]
fn missing_method_is_an_error() {
    let fx = Fixture::new();
    let err = fx.facade.solve_method("nothing", &[], fx.body().as_ref()).unwrap_err();
    match err {
        ResolveError::Unsolved { name, context } => {
            assert_eq!(name, "nothing");
            assert!(context.is_some_and(|c| c.contains("app.Service")));
        }
        other => panic!("expected an unsolved error, got {other:?}"),
    }
}

#[test]
fn equally_specific_overloads_are_ambiguous() {
    let fx = Fixture::new();
    let err = fx
        .facade
        .solve_method("pick", &[fx.string(), fx.string()], fx.body().as_ref())
        .unwrap_err();
    assert!(matches!(err, ResolveError::Ambiguity { .. }), "{err:?}");

    let object = class_type(&fx.root, "java.lang.Object");
    let usage = fx
        .facade
        .solve_method("pick", &[object, fx.string()], fx.body().as_ref())
        .unwrap();
    assert_eq!(usage.signature(), "pick(java.lang.Object, java.lang.String)");
}

#[test]
fn type_usage_prefers_type_variables() {
    let fx = Fixture::new();
    let convert = fx.file.method_context("Service", "convert").unwrap();

    let variable = fx.facade.solve_type_usage("R", convert.as_ref()).unwrap();
    assert!(variable.is_type_variable());

    let list = fx.facade.solve_type_usage("java.util.List", convert.as_ref()).unwrap();
    assert_eq!(list.describe(), "java.util.List<E>");
}

#[test]
fn symbols_in_a_type() {
    let fx = Fixture::new();
    let integer = fx.root.solve_type("java.lang.Integer").unwrap();
    assert!(fx.facade.solve_symbol_in_type(integer.as_ref(), "MAX_VALUE").unwrap().is_solved());
    assert!(!fx.facade.solve_symbol_in_type(integer.as_ref(), "nope").unwrap().is_solved());

    let service = fx.root.solve_type("app.Service").unwrap();
    assert_eq!(service.declared_fields().len(), 2);
    assert!(fx.facade.solve_symbol_in_type(service.as_ref(), "names").unwrap().is_solved());
}
