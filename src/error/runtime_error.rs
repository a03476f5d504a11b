use crate::ast::Span;

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation.
///
/// Errors are ordinary values of the language: when one is produced it
/// travels outward as [`crate::interpreter::value::core::Value::Error`] until
/// a statement or loop iteration records it. Every variant carries the span of
/// the node that produced it so a renderer can show the message inline.
pub enum RuntimeError {
    /// Read or assigned a variable that no scope declares.
    UndeclaredVariable {
        /// The name of the variable.
        name: String,
        /// The offending node.
        span: Span,
    },
    /// Called a name that is neither a builtin nor bound to anything.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The offending node.
        span: Span,
    },
    /// Called a name bound to something other than a function.
    NotCallable {
        /// The name that was called.
        name: String,
        /// The offending node.
        span: Span,
    },
    /// Declared a name twice in the same scope.
    RedeclaredVariable {
        /// The name of the variable.
        name:     String,
        /// Display form of the value already bound to it.
        existing: String,
        /// The offending node.
        span:     Span,
    },
    /// An operator or builtin received a value of the wrong type.
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// Two tensors could not be combined because of their shapes.
    ShapeMismatch {
        /// Details including both shapes.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// An index selected a position outside of a tensor or list.
    IndexOutOfBounds {
        /// Details naming the index and the indexed expression.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// A user function was called with the wrong number of arguments.
    ArityMismatch {
        /// Details naming the function and both counts.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// The left-hand side of an assignment cannot be assigned to.
    InvalidLValue {
        /// Details about the target.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// A builtin received an argument of the right type but an unusable value.
    InvalidArgument {
        /// Details about the argument.
        details: String,
        /// The offending node.
        span:    Span,
    },
    /// A for-loop ran for more iterations than allowed.
    IterationLimitExceeded {
        /// The iteration ceiling that was hit.
        limit: usize,
        /// The loop.
        span:  Span,
    },
    /// User functions nested deeper than allowed.
    RecursionLimitExceeded {
        /// The depth ceiling that was hit.
        limit: usize,
        /// The call that went over.
        span:  Span,
    },
    /// The program could not be parsed past this point.
    Syntax {
        /// The parse error text.
        message: String,
        /// Where parsing stopped.
        span:    Span,
    },
}

impl RuntimeError {
    /// Returns the span of the node that caused the error.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::UndeclaredVariable { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::NotCallable { span, .. }
            | Self::RedeclaredVariable { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::ShapeMismatch { span, .. }
            | Self::IndexOutOfBounds { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::InvalidLValue { span, .. }
            | Self::InvalidArgument { span, .. }
            | Self::IterationLimitExceeded { span, .. }
            | Self::RecursionLimitExceeded { span, .. }
            | Self::Syntax { span, .. } => *span,
        }
    }

    /// Shorthand for a [`RuntimeError::TypeMismatch`].
    pub fn type_mismatch(details: impl Into<String>, span: Span) -> Self {
        Self::TypeMismatch { details: details.into(),
                             span }
    }

    /// Shorthand for a [`RuntimeError::ShapeMismatch`].
    pub fn shape_mismatch(details: impl Into<String>, span: Span) -> Self {
        Self::ShapeMismatch { details: details.into(),
                              span }
    }

    /// Shorthand for a [`RuntimeError::IndexOutOfBounds`].
    pub fn out_of_bounds(details: impl Into<String>, span: Span) -> Self {
        Self::IndexOutOfBounds { details: details.into(),
                                 span }
    }

    /// Shorthand for a [`RuntimeError::InvalidArgument`].
    pub fn invalid_argument(details: impl Into<String>, span: Span) -> Self {
        Self::InvalidArgument { details: details.into(),
                                span }
    }

    /// Shorthand for a [`RuntimeError::InvalidLValue`].
    pub fn invalid_lvalue(details: impl Into<String>, span: Span) -> Self {
        Self::InvalidLValue { details: details.into(),
                              span }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndeclaredVariable { name, .. } => write!(f,
                                                            "the variable {name} hasn't been declared yet. You can do something like {name} := 2; to declare it."),
            Self::UnknownFunction { name, .. } => write!(f, "function '{name}' not found"),
            Self::NotCallable { name, .. } => {
                write!(f, "'{name}' is not a function that can be called")
            },
            Self::RedeclaredVariable { name, existing, .. } => {
                write!(f, "variable {name} already defined, with value: {existing}")
            },
            Self::TypeMismatch { details, .. }
            | Self::ShapeMismatch { details, .. }
            | Self::IndexOutOfBounds { details, .. }
            | Self::ArityMismatch { details, .. }
            | Self::InvalidLValue { details, .. }
            | Self::InvalidArgument { details, .. } => write!(f, "{details}"),
            Self::IterationLimitExceeded { limit, .. } => {
                write!(f, "possible infinite loop: exceeded {limit} iterations")
            },
            Self::RecursionLimitExceeded { limit, .. } => {
                write!(f, "possible infinite recursion: exceeded a call depth of {limit}")
            },
            Self::Syntax { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
