//! Resolution of generic type parameters for a concrete instantiation.
//!
//! Given a class such as `class StringIntegerType extends GenericType<String, Integer>`, a
//! [`GenericTypeResolver`] answers what the type variables used by members declared anywhere in
//! its hierarchy stand for: `GenericType.left` (declared `L`) resolves to `[String]`,
//! `GenericType.reverse` (declared `Pair<R, L>`) to `[Integer, String]`.
//!
//! Construction walks the hierarchy once and records a [`SubstitutionMap`]. Member resolution is
//! then a handful of map lookups.

mod error;
mod members;
mod resolved;
mod resolver;
mod substitution;

pub use error::ResolveError;
pub use members::{find_field, find_method, Member};
pub use resolved::{ResolvedMethodSignature, ResolvedType, ResolvedTypeDisplay};
pub use resolver::{resolve_type, GenericTypeResolver};
pub use substitution::SubstitutionMap;
