use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A bare type variable was passed where a class or parameterized type is required.
    #[error("cannot resolve members of type variable `{0}`: expected a class or parameterized type")]
    InvalidInput(String),
    #[error("`{class}` has no field `{name}` in its hierarchy")]
    UnknownField { class: String, name: String },
    #[error("`{class}` has no method `{name}` in its hierarchy")]
    UnknownMethod { class: String, name: String },
}
