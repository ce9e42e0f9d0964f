use crate::location::Location;
use crate::semantic::type_checker::TypeCheckError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticErrorKind {
    #[error("undefined identifier '{0}'")]
    UndefinedIdentifier(String),
    #[error("'{0}' is already declared in this scope")]
    DuplicateDeclaration(String),
    #[error("function '{0}' is not defined")]
    UndefinedFunction(String),
    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("cannot assign to immutable variable '{0}'")]
    AssignToImmutable(String),
    #[error("assignment target must be an identifier")]
    InvalidAssignmentTarget,
    #[error("function '{0}' must return a value of type '{1}' on every path")]
    MissingReturn(String, String),
    #[error("unknown standard library module '{0}'")]
    UnknownStdlibModule(String),
    #[error("function '{0}' is already declared")]
    DuplicateFunction(String),
    #[error("could not read imported module '{0}': {1}")]
    ModuleNotFound(String, String),
    #[error(transparent)]
    TypeCheck(#[from] TypeCheckError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub location: Location,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, location: Location) -> Self {
        SemanticError { kind, location }
    }
}

impl From<TypeCheckError> for SemanticError {
    fn from(err: TypeCheckError) -> Self {
        let location = err.location.clone();
        SemanticError::new(SemanticErrorKind::TypeCheck(err), location)
    }
}
