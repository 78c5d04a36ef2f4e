//! Java-like rendering of [`Type`]s for diagnostics and CLI output.

use std::fmt;

use crate::{ClassId, ClassType, Type, TypeEnv, TypeVarId};

/// `java.lang.String` -> `String`, `com.example.Outer$Inner` -> `Outer$Inner`.
pub fn simple_name(binary_name: &str) -> &str {
    binary_name.rsplit('.').next().unwrap_or(binary_name)
}

pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

/// [`fmt::Display`] adapter for a [`Type`] in the context of a [`TypeEnv`].
///
/// Classes print by simple name unless [`TypeDisplay::qualified`] is set. Ids the environment
/// does not know print as `<class#N>` / `<tv#N>` rather than failing.
#[derive(Clone, Copy)]
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
    qualified: bool,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self {
            env,
            ty,
            qualified: false,
        }
    }

    pub fn qualified(mut self, qualified: bool) -> Self {
        self.qualified = qualified;
        self
    }

    fn write_class(&self, f: &mut fmt::Formatter<'_>, id: ClassId) -> fmt::Result {
        match self.env.class_name(id) {
            Some(name) if self.qualified => f.write_str(&name.replace('$', ".")),
            Some(name) => f.write_str(&simple_name(name).replace('$', ".")),
            None => write!(f, "<class#{}>", id.to_raw()),
        }
    }

    fn write_type_var(&self, f: &mut fmt::Formatter<'_>, id: TypeVarId) -> fmt::Result {
        match self.env.type_param(id) {
            Some(def) => f.write_str(&def.name),
            None => write!(f, "<tv#{}>", id.to_raw()),
        }
    }

    fn write_type(&self, f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
        match ty {
            Type::Concrete(id) => self.write_class(f, *id),
            Type::TypeVar(id) => self.write_type_var(f, *id),
            Type::Parameterized(ClassType { def, args }) => {
                self.write_class(f, *def)?;
                f.write_str("<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_type(f, arg)?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_type(f, self.ty)
    }
}

impl fmt::Debug for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
