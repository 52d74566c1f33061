use std::fmt;
use std::sync::Arc;

use crate::decl::TypeParameterDeclaration;
use crate::reference::ReferenceType;
use crate::type_params::TypeParametersMap;

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Byte,
    Short,
    Char,
    Int,
    Long,
    Boolean,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Boolean,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    pub fn box_type_qualified_name(self) -> &'static str {
        match self {
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    /// Primitive types whose values widen into `self`.
    pub fn promotion_types(self) -> &'static [PrimitiveType] {
        use PrimitiveType::*;
        match self {
            Byte | Char | Boolean => &[],
            Short => &[Byte],
            Int => &[Byte, Short, Char],
            Long => &[Byte, Short, Int, Char],
            Float => &[Long, Int, Short, Byte, Char],
            Double => &[Float, Long, Int, Short, Byte, Char],
        }
    }

    fn is_assignable_by(self, other: &Type) -> bool {
        match other {
            Type::Primitive(other) => self == *other || self.promotion_types().contains(other),
            Type::Reference(reference) => {
                let name = reference.qualified_name();
                name == self.box_type_qualified_name()
                    || self
                        .promotion_types()
                        .iter()
                        .any(|p| p.box_type_qualified_name() == name)
            }
            Type::LambdaConstraint(constraint) => self.is_assignable_by(&constraint.bound),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    component: Type,
}

impl ArrayType {
    pub fn component(&self) -> &Type {
        &self.component
    }

    fn is_assignable_by(&self, other: &Type) -> bool {
        match other {
            Type::Array(other) => {
                if self.component.is_primitive() && other.component.is_primitive() {
                    self.component == other.component
                } else {
                    self.component.is_assignable_by(&other.component)
                }
            }
            Type::Null => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wildcard {
    Unbounded,
    Extends(Type),
    Super(Type),
}

impl Wildcard {
    pub fn bound(&self) -> Option<&Type> {
        match self {
            Wildcard::Unbounded => None,
            Wildcard::Extends(bound) | Wildcard::Super(bound) => Some(bound),
        }
    }

    pub fn is_extends(&self) -> bool {
        matches!(self, Wildcard::Extends(_))
    }

    pub fn is_super(&self) -> bool {
        matches!(self, Wildcard::Super(_))
    }

    fn with_bound(&self, bound: Type) -> Wildcard {
        match self {
            Wildcard::Unbounded => Wildcard::Unbounded,
            Wildcard::Extends(_) => Wildcard::Extends(bound),
            Wildcard::Super(_) => Wildcard::Super(bound),
        }
    }
}

/// Placeholder for a lambda parameter whose type is only known by its bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaConstraintType {
    pub bound: Type,
}

/// A usage of a type.
///
/// Values are immutable. Substitution returns the same instance (see
/// [`Type::same_instance`]) when nothing was replaced.
#[derive(Clone)]
pub enum Type {
    Primitive(PrimitiveType),
    Reference(Arc<ReferenceType>),
    Array(Arc<ArrayType>),
    TypeVariable(Arc<dyn TypeParameterDeclaration>),
    Wildcard(Arc<Wildcard>),
    Null,
    Void,
    LambdaConstraint(Arc<LambdaConstraintType>),
}

impl Type {
    pub fn reference(reference: ReferenceType) -> Type {
        Type::Reference(Arc::new(reference))
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Arc::new(ArrayType { component }))
    }

    pub fn wildcard(wildcard: Wildcard) -> Type {
        Type::Wildcard(Arc::new(wildcard))
    }

    pub fn lambda_constraint(bound: Type) -> Type {
        Type::LambdaConstraint(Arc::new(LambdaConstraintType { bound }))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(self, Type::Reference(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, Type::TypeVariable(_))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_reference_type(&self) -> Option<&ReferenceType> {
        match self {
            Type::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array_component(&self) -> Option<&Type> {
        match self {
            Type::Array(a) => Some(&a.component),
            _ => None,
        }
    }

    pub fn as_type_variable(&self) -> Option<&Arc<dyn TypeParameterDeclaration>> {
        match self {
            Type::TypeVariable(tp) => Some(tp),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&Wildcard> {
        match self {
            Type::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    pub fn array_level(&self) -> usize {
        match self {
            Type::Array(a) => 1 + a.component.array_level(),
            _ => 0,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Type::Primitive(p) => p.keyword().to_string(),
            Type::Reference(r) => r.describe(),
            Type::Array(a) => format!("{}[]", a.component.describe()),
            Type::TypeVariable(tp) => tp.name().to_string(),
            Type::Wildcard(w) => match &**w {
                Wildcard::Unbounded => "?".to_string(),
                Wildcard::Extends(bound) => format!("? extends {}", bound.describe()),
                Wildcard::Super(bound) => format!("? super {}", bound.describe()),
            },
            Type::Null => "null".to_string(),
            Type::Void => "void".to_string(),
            Type::LambdaConstraint(c) => format!("LambdaConstraintType{{bound={}}}", c.bound.describe()),
        }
    }

    /// Whether a value of type `other` can be stored where `self` is expected.
    pub fn is_assignable_by(&self, other: &Type) -> bool {
        match self {
            Type::Primitive(p) => p.is_assignable_by(other),
            Type::Reference(r) => r.is_assignable_by(other),
            Type::Array(a) => a.is_assignable_by(other),
            // Uninferred positions accept anything.
            Type::TypeVariable(tp) => match other {
                Type::TypeVariable(other) => tp.name() == other.name(),
                _ => true,
            },
            Type::Wildcard(w) => match &**w {
                Wildcard::Super(bound) => bound.is_assignable_by(other),
                Wildcard::Unbounded | Wildcard::Extends(_) => false,
            },
            Type::LambdaConstraint(c) => match other {
                Type::LambdaConstraint(other) => c.bound.is_assignable_by(&other.bound),
                _ => c.bound.is_assignable_by(other),
            },
            Type::Null | Type::Void => false,
        }
    }

    /// Replaces every type variable named like `tp` with `replacement`.
    ///
    /// Each replaced variable is recorded in `inferred`. Unchanged subtrees are
    /// shared with `self`.
    pub fn replace_type_variables(
        &self,
        tp: &dyn TypeParameterDeclaration,
        replacement: &Type,
        inferred: &mut TypeParametersMap,
    ) -> Type {
        match self {
            Type::TypeVariable(var) if var.name() == tp.name() => {
                inferred.insert(var.clone(), replacement.clone());
                replacement.clone()
            }
            Type::Array(array) => {
                let component = array.component.replace_type_variables(tp, replacement, inferred);
                if component.same_instance(&array.component) {
                    self.clone()
                } else {
                    Type::array(component)
                }
            }
            Type::Wildcard(wildcard) => match wildcard.bound() {
                None => self.clone(),
                Some(bound) => {
                    let replaced = bound.replace_type_variables(tp, replacement, inferred);
                    if replaced.same_instance(bound) {
                        self.clone()
                    } else {
                        Type::wildcard(wildcard.with_bound(replaced))
                    }
                }
            },
            Type::Reference(reference) => {
                match reference.replace_type_variables(tp, replacement, inferred) {
                    Some(rebuilt) => Type::reference(rebuilt),
                    None => self.clone(),
                }
            }
            _ => self.clone(),
        }
    }

    /// Convenience over [`Type::replace_type_variables`] that discards the
    /// inferred bindings.
    pub fn substitute(&self, tp: &dyn TypeParameterDeclaration, replacement: &Type) -> Type {
        self.replace_type_variables(tp, replacement, &mut TypeParametersMap::new())
    }

    /// Identity comparison: the same allocation for shared variants, equal
    /// values for the unit-like ones.
    pub fn same_instance(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Reference(a), Type::Reference(b)) => Arc::ptr_eq(a, b),
            (Type::Array(a), Type::Array(b)) => Arc::ptr_eq(a, b),
            (Type::TypeVariable(a), Type::TypeVariable(b)) => Arc::ptr_eq(a, b),
            (Type::Wildcard(a), Type::Wildcard(b)) => Arc::ptr_eq(a, b),
            (Type::LambdaConstraint(a), Type::LambdaConstraint(b)) => Arc::ptr_eq(a, b),
            (Type::Null, Type::Null) | (Type::Void, Type::Void) => true,
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Reference(a), Type::Reference(b)) => a == b,
            (Type::Array(a), Type::Array(b)) => a == b,
            (Type::TypeVariable(a), Type::TypeVariable(b)) => a.qualified_name() == b.qualified_name(),
            (Type::Wildcard(a), Type::Wildcard(b)) => a == b,
            (Type::LambdaConstraint(a), Type::LambdaConstraint(b)) => a == b,
            (Type::Null, Type::Null) | (Type::Void, Type::Void) => true,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}
