use javasym_types::synthetic::{MethodBuilder, TypeDeclarationBuilder};
use javasym_types::{
    Origin, ResolveError, SymbolReference, Type, TypeKind, TypeParameterContainer, Value,
};
use pretty_assertions::assert_eq;

use super::{jdk, ty};

#[test]
fn fields_include_inherited_non_private_ones() {
    let solver = jdk();
    solver
        .define(
            TypeDeclarationBuilder::class("com.example.Base")
                .field("visible", "int")
                .private_field("hidden", "int")
                .static_field("COUNT", "long"),
        )
        .unwrap();
    let derived = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Derived")
                .extends("com.example.Base")
                .private_field("own", "java.lang.String"),
        )
        .unwrap();

    let names: Vec<String> = derived
        .all_fields()
        .unwrap()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, vec!["own", "visible", "COUNT"]);

    let count = derived.field("COUNT").unwrap();
    assert!(count.is_static());
    assert_eq!(count.declaring_type().qualified_name(), "com.example.Base");
    assert_eq!(count.ty().unwrap(), ty(&solver, "long"));

    assert!(!derived.has_field("hidden"));
    assert_eq!(
        derived.field("hidden").unwrap_err(),
        ResolveError::unsolved_in("hidden", "com.example.Derived")
    );
}

#[test]
fn declaration_identity() {
    let solver = jdk();
    let entry = solver.handle().solve_type("java.util.Map").unwrap();
    assert_eq!(entry.name(), "Map");
    assert_eq!(entry.package_name(), "java.util");
    assert_eq!(entry.kind(), TypeKind::Interface);
    assert_eq!(entry.origin(), Origin::Synthetic);
    assert!(entry.is_interface());
    assert!(entry.containing_type().unwrap().is_none());

    let params: Vec<String> = entry.type_parameters().iter().map(|tp| tp.qualified_name()).collect();
    assert_eq!(params, vec!["java.util.Map.K", "java.util.Map.V"]);
}

#[test]
fn declaration_level_assignability_ignores_arguments() {
    let solver = jdk();
    let handle = solver.handle();
    let list = handle.solve_type("java.util.List").unwrap();
    let iterable = handle.solve_type("java.lang.Iterable").unwrap();
    let string = handle.solve_type("java.lang.String").unwrap();
    let object = handle.solve_type("java.lang.Object").unwrap();

    assert!(list.can_be_assigned_to(iterable.as_ref()));
    assert!(!iterable.can_be_assigned_to(list.as_ref()));
    assert!(string.can_be_assigned_to(object.as_ref()));

    assert!(iterable.is_assignable_by_type(&ty(&solver, "java.util.ArrayList<java.lang.Integer>")));
    assert!(object.is_assignable_by_type(&ty(&solver, "int[]")));
    assert!(handle
        .solve_type("java.lang.Number")
        .unwrap()
        .is_assignable_by_type(&ty(&solver, "double")));
    assert!(!string.is_assignable_by_type(&ty(&solver, "int")));
    assert!(string.is_assignable_by_type(&Type::Null));
}

#[test]
fn type_parameter_bounds() {
    let solver = jdk();
    let decl = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Sorted")
                .type_param("T", &["java.lang.Comparable<T>", "java.io.Serializable"])
                .type_param("U", &[]),
        )
        .unwrap();
    let params = decl.type_parameters();
    let t = &params[0];
    assert_eq!(t.container(), TypeParameterContainer::Type("com.example.Sorted".to_string()));
    assert!(t.declared_on_type());
    assert!(!t.has_lower_bound().unwrap());
    assert_eq!(t.lower_bound().unwrap(), None);
    let upper: Vec<String> = t.upper_bounds().unwrap().iter().map(Type::describe).collect();
    assert_eq!(upper, vec!["java.lang.Comparable<T>", "java.io.Serializable"]);
    assert!(params[1].bounds().unwrap().is_empty());

    let found = decl.find_type_parameter("U").unwrap().unwrap();
    assert_eq!(found.qualified_name(), "com.example.Sorted.U");
    assert!(decl.find_type_parameter("X").unwrap().is_none());
}

#[test]
fn method_type_parameters_shadow_the_declaring_type() {
    let solver = jdk();
    let decl = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Holder")
                .type_param("T", &[])
                .type_param("U", &[])
                .method(
                    MethodBuilder::new("swap")
                        .type_param("T", &["java.lang.Number"])
                        .param("value", "T")
                        .returns("T"),
                )
                .method(MethodBuilder::new("get").returns("T")),
        )
        .unwrap();
    let methods = decl.declared_methods();
    let (swap, get) = (&methods[0], &methods[1]);

    let own = swap.find_type_parameter("T").unwrap().unwrap();
    assert_eq!(own.container(), TypeParameterContainer::Method("com.example.Holder.swap".to_string()));
    assert_eq!(own.qualified_name(), "com.example.Holder.swap.T");
    let outer = swap.find_type_parameter("U").unwrap().unwrap();
    assert_eq!(outer.qualified_name(), "com.example.Holder.U");
    assert!(swap.find_type_parameter("V").unwrap().is_none());

    let Type::TypeVariable(param) = swap.param_type(0).unwrap() else {
        panic!("expected a type variable");
    };
    assert!(param.declared_on_method());
    let Type::TypeVariable(returned) = get.return_type().unwrap() else {
        panic!("expected a type variable");
    };
    assert_eq!(returned.qualified_name(), "com.example.Holder.T");
    assert_eq!(
        get.find_type_parameter("T").unwrap().unwrap().qualified_name(),
        "com.example.Holder.T"
    );
}

#[test]
fn method_signatures() {
    let solver = jdk();
    let decl = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Api")
                .method(MethodBuilder::new("none"))
                .method(
                    MethodBuilder::new("join")
                        .param("sep", "char")
                        .varargs("parts", "java.lang.String")
                        .returns("java.lang.String")
                        .static_(),
                )
                .method(MethodBuilder::new("run").abstract_())
                .constructor(MethodBuilder::new("ignored").param("seed", "long")),
        )
        .unwrap();
    let methods = decl.declared_methods();

    let none = &methods[0];
    assert_eq!(none.signature().unwrap(), "none()");
    assert_eq!(none.return_type().unwrap(), Type::Void);
    assert!(matches!(none.last_param(), Err(ResolveError::InvariantViolation(_))));
    assert!(matches!(none.param(0), Err(ResolveError::InvariantViolation(_))));

    let join = &methods[1];
    assert_eq!(join.qualified_signature().unwrap(), "com.example.Api.join(char, java.lang.String[])");
    assert!(join.is_variadic());
    assert!(join.is_static());
    assert!(join.last_param().unwrap().is_variadic());
    assert_eq!(join.param_type(0).unwrap(), ty(&solver, "char"));

    assert!(methods[2].is_abstract());

    let constructors = decl.constructors();
    assert_eq!(constructors[0].signature().unwrap(), "Api(long)");
}

#[test]
fn symbol_references_and_values() {
    let solver = jdk();
    let unsolved: SymbolReference<String> = SymbolReference::unsolved();
    assert!(!unsolved.is_solved());
    assert!(matches!(
        unsolved.corresponding_declaration(),
        Err(ResolveError::InvariantViolation(_))
    ));

    let solved = SymbolReference::solved(3).map(|n| n * 2);
    assert_eq!(solved.corresponding_declaration().unwrap(), &6);

    let decl = solver
        .define(TypeDeclarationBuilder::class("com.example.Point").field("x", "int"))
        .unwrap();
    let value = Value::from_declaration(decl.field("x").unwrap().as_ref()).unwrap();
    assert_eq!(value, Value::new("x", ty(&solver, "int")));
}
