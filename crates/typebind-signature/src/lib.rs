#![forbid(unsafe_code)]

//! Loading generic metadata into a [`typebind_types::TypeStore`].
//!
//! Declarations are described with JVM `Signature` attribute strings (JVMS 4.7.9.1), e.g.
//! `<L:Ljava/lang/Object;R:Ljava/lang/Object;>Ljava/lang/Object;` for `class Pair<L, R>`.
//! A [`TypeTable`] bundles such signatures per class in TOML, and [`TypeStoreLoader`] turns the
//! table into store entries.

mod error;
mod loader;
mod signature;
mod stub;
mod translate;
mod type_ref;

pub use crate::error::{Error, Result};
pub use crate::loader::TypeStoreLoader;
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, BaseType,
    ClassSignature, ClassTypeSegment, ClassTypeSignature, MethodSignature, TypeParameter,
    TypeSignature,
};
pub use crate::stub::{ClassStub, FieldStub, MethodStub, TypeTable};
pub use crate::translate::{SignatureTranslator, TypeVarScope};
pub use crate::type_ref::parse_type_ref;
