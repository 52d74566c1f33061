use std::fmt;
use std::sync::Arc;

use crate::decl::TypeParameterDeclaration;
use crate::ty::Type;

/// Ordered binding of type parameters to type arguments.
///
/// Keys are compared by qualified name; insertion order is declaration order.
#[derive(Clone, Default)]
pub struct TypeParametersMap {
    entries: Vec<(Arc<dyn TypeParameterDeclaration>, Type)>,
}

impl TypeParametersMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Builder-style [`TypeParametersMap::insert`].
    pub fn with(mut self, tp: Arc<dyn TypeParameterDeclaration>, value: Type) -> Self {
        self.insert(tp, value);
        self
    }

    /// Binds `tp`, replacing an existing binding with the same qualified name.
    pub fn insert(&mut self, tp: Arc<dyn TypeParameterDeclaration>, value: Type) {
        let qualified = tp.qualified_name();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.qualified_name() == qualified)
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((tp, value)),
        }
    }

    pub fn get(&self, tp: &dyn TypeParameterDeclaration) -> Option<&Type> {
        let qualified = tp.qualified_name();
        self.entries
            .iter()
            .find(|(key, _)| key.qualified_name() == qualified)
            .map(|(_, value)| value)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Type> {
        self.entries
            .iter()
            .find(|(key, _)| key.name() == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<dyn TypeParameterDeclaration>> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Type> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<dyn TypeParameterDeclaration>, &Type)> + '_ {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Applies every binding to `ty`, in order.
    pub fn replace_all(&self, ty: &Type) -> Type {
        let mut inferred = TypeParametersMap::new();
        let mut result = ty.clone();
        for (tp, value) in &self.entries {
            result = result.replace_type_variables(tp.as_ref(), value, &mut inferred);
        }
        result
    }
}

impl PartialEq for TypeParametersMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((ka, va), (kb, vb))| ka.qualified_name() == kb.qualified_name() && va == vb)
    }
}

impl Eq for TypeParametersMap {}

impl fmt::Debug for TypeParametersMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key.qualified_name(), value)))
            .finish()
    }
}
