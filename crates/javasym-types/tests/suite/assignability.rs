use javasym_types::synthetic::TypeDeclarationBuilder;
use javasym_types::{PrimitiveType, Type, Wildcard};

use super::{jdk, ty};

#[test]
fn widening_table() {
    use PrimitiveType::*;
    let int = Type::from(Int);
    assert!(int.is_assignable_by(&Byte.into()));
    assert!(int.is_assignable_by(&Short.into()));
    assert!(int.is_assignable_by(&Char.into()));
    assert!(!Type::from(Byte).is_assignable_by(&int));
    assert!(Type::from(Double).is_assignable_by(&Float.into()));
    assert!(!Type::from(Float).is_assignable_by(&Double.into()));
}

#[test]
fn arrays_are_covariant_only_for_references() {
    let solver = jdk();
    let ints = ty(&solver, "int[]");
    assert!(ints.is_assignable_by(&ty(&solver, "int[]")));
    assert!(!ints.is_assignable_by(&ty(&solver, "long[]")));
    assert!(ty(&solver, "java.lang.Object[]").is_assignable_by(&ty(&solver, "java.lang.String[]")));
    assert!(!ty(&solver, "java.lang.String[]").is_assignable_by(&ty(&solver, "java.lang.Object[]")));
    assert!(ty(&solver, "java.lang.Object").is_assignable_by(&ints));
}

#[test]
fn null_is_assignable_to_every_reference_and_array() {
    let solver = jdk();
    for target in [
        "java.lang.String",
        "java.util.List<java.lang.String>",
        "java.lang.Comparable",
        "int[]",
        "java.lang.Object[][]",
    ] {
        assert!(ty(&solver, target).is_assignable_by(&Type::Null), "{target}");
    }
    assert!(!ty(&solver, "int").is_assignable_by(&Type::Null));
}

#[test]
fn references_follow_ancestors() {
    let solver = jdk();
    let string = ty(&solver, "java.lang.String");
    assert!(ty(&solver, "java.lang.Object").is_assignable_by(&string));
    assert!(ty(&solver, "java.lang.CharSequence").is_assignable_by(&string));
    assert!(ty(&solver, "java.lang.Comparable<java.lang.String>").is_assignable_by(&string));
    assert!(!ty(&solver, "java.lang.Comparable<java.lang.Integer>").is_assignable_by(&string));
    assert!(!string.is_assignable_by(&ty(&solver, "java.lang.CharSequence")));
}

#[test]
fn generic_arguments_propagate_through_the_hierarchy() {
    let solver = jdk();
    let strings = ty(&solver, "java.util.ArrayList<java.lang.String>");
    assert!(ty(&solver, "java.util.List<java.lang.String>").is_assignable_by(&strings));
    assert!(ty(&solver, "java.lang.Iterable<java.lang.String>").is_assignable_by(&strings));
    assert!(!ty(&solver, "java.util.List<java.lang.Integer>").is_assignable_by(&strings));
    // Raw targets accept any parameterization.
    assert!(ty(&solver, "java.util.List").is_assignable_by(&strings));
}

#[test]
fn wildcard_arguments_respect_their_bounds() {
    let solver = jdk();
    let numbers = ty(&solver, "java.util.List<? extends java.lang.Number>");
    assert!(numbers.is_assignable_by(&ty(&solver, "java.util.ArrayList<java.lang.Integer>")));
    assert!(!numbers.is_assignable_by(&ty(&solver, "java.util.List<java.lang.String>")));

    let sink = ty(&solver, "java.util.List<? super java.lang.Integer>");
    assert!(sink.is_assignable_by(&ty(&solver, "java.util.List<java.lang.Number>")));
    assert!(!sink.is_assignable_by(&ty(&solver, "java.util.List<java.lang.String>")));

    assert!(ty(&solver, "java.util.List<?>").is_assignable_by(&ty(&solver, "java.util.List<java.lang.String>")));
}

#[test]
fn boxing_and_unboxing() {
    let solver = jdk();
    let int = ty(&solver, "int");
    assert!(ty(&solver, "java.lang.Integer").is_assignable_by(&int));
    assert!(ty(&solver, "java.lang.Number").is_assignable_by(&int));
    assert!(ty(&solver, "java.lang.Comparable<java.lang.Integer>").is_assignable_by(&int));
    assert!(ty(&solver, "java.lang.Object").is_assignable_by(&int));
    assert!(!ty(&solver, "java.lang.Long").is_assignable_by(&int));
    assert!(!ty(&solver, "java.lang.String").is_assignable_by(&int));

    assert!(int.is_assignable_by(&ty(&solver, "java.lang.Integer")));
    assert!(ty(&solver, "long").is_assignable_by(&ty(&solver, "java.lang.Integer")));
    assert!(!int.is_assignable_by(&ty(&solver, "java.lang.Long")));
}

#[test]
fn type_variables_and_wildcards_as_sources() {
    let solver = jdk();
    let decl = solver
        .define(TypeDeclarationBuilder::class("com.example.Holder").type_param("N", &["java.lang.Number"]))
        .unwrap();
    let n = Type::TypeVariable(decl.type_parameters().remove(0));

    assert!(ty(&solver, "java.lang.Number").is_assignable_by(&n));
    assert!(!ty(&solver, "java.lang.String").is_assignable_by(&n));
    // An uninferred variable accepts anything.
    assert!(n.is_assignable_by(&ty(&solver, "java.lang.String")));

    let extends = Type::wildcard(Wildcard::Extends(ty(&solver, "java.lang.Integer")));
    assert!(ty(&solver, "java.lang.Number").is_assignable_by(&extends));
    assert!(ty(&solver, "java.lang.Object").is_assignable_by(&Type::wildcard(Wildcard::Unbounded)));
    assert!(!ty(&solver, "java.lang.Number").is_assignable_by(&Type::wildcard(Wildcard::Unbounded)));
}

#[test]
fn lambda_constraints_delegate_to_their_bound() {
    let solver = jdk();
    let constraint = Type::lambda_constraint(ty(&solver, "java.lang.String"));
    assert!(ty(&solver, "java.lang.CharSequence").is_assignable_by(&constraint));
    assert!(constraint.is_assignable_by(&ty(&solver, "java.lang.String")));
    assert!(!constraint.is_assignable_by(&ty(&solver, "java.lang.Object")));
}
