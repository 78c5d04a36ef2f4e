use std::path::Path;

use serde::{Deserialize, Serialize};
use typebind_types::ClassKind;

use crate::error::{Error, Result};

/// A TOML document of class declarations.
///
/// ```toml
/// [[class]]
/// name = "com.example.Pair"
/// signature = "<L:Ljava/lang/Object;R:Ljava/lang/Object;>Ljava/lang/Object;"
///
/// [[class.field]]
/// name = "left"
/// signature = "TL;"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeTable {
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassStub>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassStub {
    /// Binary name (`com.example.Outer$Inner`).
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Class signature. When present it supplies type parameters, superclass and interfaces.
    #[serde(default)]
    pub signature: Option<String>,
    /// Superclass binary name for declarations without a signature.
    #[serde(default)]
    pub super_class: Option<String>,
    /// Interface binary names for declarations without a signature.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldStub>,
    #[serde(default, rename = "method")]
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldStub {
    pub name: String,
    /// Field signature or plain descriptor.
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodStub {
    pub name: String,
    pub signature: String,
}

impl TypeTable {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Append the classes of `other`. Later entries win when both tables define a name.
    pub fn extend(&mut self, other: TypeTable) {
        self.classes.extend(other.classes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_classes_with_members() {
        let table = TypeTable::from_toml_str(
            r#"
            [[class]]
            name = "com.example.GenericInterface"
            kind = "interface"
            signature = "<L:Ljava/lang/Object;R:Ljava/lang/Object;>Ljava/lang/Object;"

            [[class.method]]
            name = "mirror"
            signature = "(TL;)TR;"

            [[class]]
            name = "com.example.NonGenericType"
            super_class = "java.lang.Object"

            [[class.field]]
            name = "string"
            signature = "Ljava/lang/String;"
            "#,
        )
        .unwrap();

        assert_eq!(table.classes.len(), 2);
        assert_eq!(table.classes[0].kind, ClassKind::Interface);
        assert_eq!(table.classes[0].methods[0].signature, "(TL;)TR;");
        assert_eq!(table.classes[1].kind, ClassKind::Class);
        assert_eq!(
            table.classes[1].super_class.as_deref(),
            Some("java.lang.Object")
        );
        assert_eq!(table.classes[1].fields[0].name, "string");
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = TypeTable::from_toml_str(
            r#"
            [[class]]
            name = "com.example.Foo"
            superclass = "java.lang.Object"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
