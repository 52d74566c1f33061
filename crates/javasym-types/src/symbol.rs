use std::sync::Arc;

use crate::decl::{MethodDeclaration, ReferenceTypeDeclaration, TypeParameterDeclaration, ValueDeclaration};
use crate::error::{ResolveError, Result};
use crate::ty::Type;
use crate::type_params::TypeParametersMap;

/// Outcome of a lookup: either a declaration or nothing.
#[derive(Debug, Clone)]
pub struct SymbolReference<S> {
    declaration: Option<S>,
}

impl<S> SymbolReference<S> {
    pub fn solved(declaration: S) -> Self {
        Self {
            declaration: Some(declaration),
        }
    }

    pub fn unsolved() -> Self {
        Self { declaration: None }
    }

    pub fn is_solved(&self) -> bool {
        self.declaration.is_some()
    }

    pub fn corresponding_declaration(&self) -> Result<&S> {
        self.declaration.as_ref().ok_or_else(|| {
            ResolveError::InvariantViolation("corresponding declaration of an unsolved symbol".to_string())
        })
    }

    pub fn into_declaration(self) -> Option<S> {
        self.declaration
    }

    pub fn as_option(&self) -> Option<&S> {
        self.declaration.as_ref()
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> SymbolReference<T> {
        SymbolReference {
            declaration: self.declaration.map(f),
        }
    }
}

impl<S> From<Option<S>> for SymbolReference<S> {
    fn from(declaration: Option<S>) -> Self {
        Self { declaration }
    }
}

/// A resolved name paired with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    name: String,
    ty: Type,
}

impl Value {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }

    pub fn from_declaration(declaration: &dyn ValueDeclaration) -> Result<Self> {
        Ok(Self::new(declaration.name(), declaration.ty()?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

/// A method as seen at a call site, with type parameters progressively
/// replaced by inferred types.
#[derive(Debug, Clone)]
pub struct MethodUsage {
    declaration: Arc<dyn MethodDeclaration>,
    param_types: Vec<Type>,
    return_type: Type,
    type_parameters_map: TypeParametersMap,
}

impl MethodUsage {
    pub fn new(declaration: Arc<dyn MethodDeclaration>) -> Result<Self> {
        let param_types = (0..declaration.param_count())
            .map(|i| declaration.param_type(i))
            .collect::<Result<Vec<_>>>()?;
        let return_type = declaration.return_type()?;
        Ok(Self {
            declaration,
            param_types,
            return_type,
            type_parameters_map: TypeParametersMap::new(),
        })
    }

    pub fn declaration(&self) -> &Arc<dyn MethodDeclaration> {
        &self.declaration
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    pub fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.declaration.declaring_type()
    }

    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }

    pub fn param_type(&self, index: usize) -> Option<&Type> {
        self.param_types.get(index)
    }

    pub fn no_params(&self) -> usize {
        self.param_types.len()
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn type_parameters_map(&self) -> &TypeParametersMap {
        &self.type_parameters_map
    }

    /// `name(T1, T2)` over the current, possibly substituted, parameter types.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.param_types.iter().map(Type::describe).collect();
        format!("{}({})", self.name(), params.join(", "))
    }

    /// Binds `tp` to `ty` and substitutes it into parameters and return type.
    pub fn replace_type_parameter(mut self, tp: Arc<dyn TypeParameterDeclaration>, ty: Type) -> Self {
        let mut inferred = TypeParametersMap::new();
        self.param_types = self
            .param_types
            .iter()
            .map(|p| p.replace_type_variables(tp.as_ref(), &ty, &mut inferred))
            .collect();
        self.return_type = self.return_type.replace_type_variables(tp.as_ref(), &ty, &mut inferred);
        self.type_parameters_map.insert(tp, ty);
        self
    }
}
