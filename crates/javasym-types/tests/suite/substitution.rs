use javasym_types::synthetic::{MethodBuilder, TypeDeclarationBuilder};
use javasym_types::{MethodUsage, ReferenceType, ResolveError, Type, TypeParametersMap};
use pretty_assertions::assert_eq;

use super::{jdk, reference, ty};

#[test]
fn substituting_an_absent_parameter_returns_the_same_instance() {
    let solver = jdk();
    let map = solver.handle().solve_type("java.util.Map").unwrap();
    let absent = map.type_parameters().remove(0);

    for text in [
        "java.util.List<java.lang.String>",
        "java.lang.String[][]",
        "int",
        "java.util.List<? extends java.lang.Number>",
    ] {
        let original = ty(&solver, text);
        let replaced = original.substitute(absent.as_ref(), &ty(&solver, "java.lang.Long"));
        assert!(replaced.same_instance(&original), "{text}");
    }
}

#[test]
fn substitution_rebuilds_only_what_changed() {
    let solver = jdk();
    let list = solver.handle().solve_type("java.util.List").unwrap();
    let e = list.type_parameters().remove(0);
    let generic = Type::reference(ReferenceType::undetermined(list.clone()));
    let nested = Type::array(generic.clone());

    let mut inferred = TypeParametersMap::new();
    let string = ty(&solver, "java.lang.String");
    let replaced = nested.replace_type_variables(e.as_ref(), &string, &mut inferred);

    assert_eq!(replaced.describe(), "java.util.List<java.lang.String>[]");
    assert_eq!(inferred.get(e.as_ref()), Some(&string));
    assert!(!replaced.same_instance(&nested));
    // The original tree is untouched.
    assert_eq!(generic.describe(), "java.util.List<E>");
}

#[test]
fn ancestors_carry_type_arguments() {
    let solver = jdk();
    let strings = reference(&solver, "java.util.ArrayList<java.lang.String>");
    let described: Vec<String> = strings
        .all_ancestors()
        .unwrap()
        .iter()
        .map(ReferenceType::describe)
        .collect();
    assert_eq!(
        described,
        vec![
            "java.util.List<java.lang.String>",
            "java.util.Collection<java.lang.String>",
            "java.lang.Iterable<java.lang.String>",
            "java.lang.Object",
        ]
    );

    let direct: Vec<String> = strings.ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    assert_eq!(direct, vec!["java.lang.Object", "java.util.List<java.lang.String>"]);

    let object = reference(&solver, "java.lang.Object");
    assert!(object.all_ancestors().unwrap().is_empty());
}

#[test]
fn field_types_see_the_parameterization() {
    let solver = jdk();
    solver
        .define(
            TypeDeclarationBuilder::class("com.example.Box")
                .type_param("T", &[])
                .field("value", "T")
                .field("all", "java.util.List<T>"),
        )
        .unwrap();
    solver
        .define(TypeDeclarationBuilder::class("com.example.StringBox").extends("com.example.Box<java.lang.String>"))
        .unwrap();

    let boxed = reference(&solver, "com.example.Box<java.lang.Integer>");
    assert_eq!(boxed.field_type("value").unwrap(), Some(ty(&solver, "java.lang.Integer")));
    assert_eq!(
        boxed.field_type("all").unwrap(),
        Some(ty(&solver, "java.util.List<java.lang.Integer>"))
    );
    assert_eq!(boxed.field_type("missing").unwrap(), None);

    let inherited = reference(&solver, "com.example.StringBox");
    assert_eq!(inherited.field_type("value").unwrap(), Some(ty(&solver, "java.lang.String")));
}

#[test]
fn raw_and_undetermined_references() {
    let solver = jdk();
    let list = solver.handle().solve_type("java.util.List").unwrap();
    assert!(ReferenceType::raw(list.clone()).is_raw());
    assert!(ReferenceType::undetermined(list.clone()).is_raw());
    assert!(!reference(&solver, "java.util.List<java.lang.String>").is_raw());
    assert!(!reference(&solver, "java.lang.String").is_raw());

    let err = ReferenceType::new(list, vec![ty(&solver, "int"), ty(&solver, "int")]).unwrap_err();
    assert!(matches!(err, ResolveError::InvariantViolation(_)));
}

#[test]
fn method_usage_substitutes_parameters_and_return_type() {
    let solver = jdk();
    let map = solver.handle().solve_type("java.util.Map").unwrap();
    let put = map
        .declared_methods()
        .into_iter()
        .find(|m| m.name() == "put")
        .unwrap();
    let params = map.type_parameters();

    let usage = MethodUsage::new(put).unwrap();
    assert_eq!(usage.signature(), "put(K, V)");

    let usage = usage
        .replace_type_parameter(params[0].clone(), ty(&solver, "java.lang.String"))
        .replace_type_parameter(params[1].clone(), ty(&solver, "java.lang.Integer"));
    assert_eq!(usage.signature(), "put(java.lang.String, java.lang.Integer)");
    assert_eq!(usage.return_type(), &ty(&solver, "java.lang.Integer"));
    assert_eq!(usage.no_params(), 2);
    assert_eq!(usage.type_parameters_map().len(), 2);
    assert_eq!(usage.declaring_type().qualified_name(), "java.util.Map");
}

#[test]
fn generic_methods_keep_their_own_variables() {
    let solver = jdk();
    let util = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Util").method(
                MethodBuilder::new("first")
                    .type_param("T", &[])
                    .param("items", "java.util.List<T>")
                    .returns("T")
                    .static_(),
            ),
        )
        .unwrap();
    let first = util.declared_methods().remove(0);
    let t = first.type_parameters().remove(0);
    assert!(t.declared_on_method());
    assert_eq!(first.return_type().unwrap(), Type::TypeVariable(t.clone()));

    let usage = MethodUsage::new(first)
        .unwrap()
        .replace_type_parameter(t, ty(&solver, "java.lang.String"));
    assert_eq!(usage.param_type(0), Some(&ty(&solver, "java.util.List<java.lang.String>")));
}
