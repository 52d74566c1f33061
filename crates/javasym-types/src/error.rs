use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A demand lookup found nothing.
    #[error("unsolved symbol `{name}`{}", context_suffix(.context))]
    Unsolved {
        name: String,
        context: Option<String>,
    },
    #[error("ambiguous call: cannot choose between {first} and {second}")]
    Ambiguity { first: String, second: String },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("cyclic inheritance involving {0}")]
    AncestorCycle(String),
}

impl ResolveError {
    pub fn unsolved(name: impl Into<String>) -> Self {
        ResolveError::Unsolved {
            name: name.into(),
            context: None,
        }
    }

    pub fn unsolved_in(name: impl Into<String>, context: impl Into<String>) -> Self {
        ResolveError::Unsolved {
            name: name.into(),
            context: Some(context.into()),
        }
    }
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" in {context}"),
        None => String::new(),
    }
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
