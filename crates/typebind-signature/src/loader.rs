use typebind_types::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeStore, TypeVarId,
};

use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
};
use crate::stub::{ClassStub, TypeTable};
use crate::translate::{SignatureTranslator, TypeVarScope};

/// Populates a [`TypeStore`] from a [`TypeTable`].
///
/// Loading runs in two passes: every class of the table is interned together with its
/// class-level type parameters first, then supertypes and members are translated. A signature
/// may therefore mention any class of the same table regardless of declaration order.
pub struct TypeStoreLoader<'a> {
    store: &'a mut TypeStore,
    allow_unknown: bool,
}

impl<'a> TypeStoreLoader<'a> {
    pub fn new(store: &'a mut TypeStore) -> Self {
        Self {
            store,
            allow_unknown: false,
        }
    }

    /// Intern classes referenced by signatures but defined nowhere as opaque placeholders.
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Load every class of `table`, returning their ids in table order.
    ///
    /// Either the whole table is loaded or the store is left untouched.
    pub fn load_table(&mut self, table: &TypeTable) -> Result<Vec<ClassId>> {
        let mut staged = self.store.clone();
        let ids = TypeStoreLoader {
            store: &mut staged,
            allow_unknown: self.allow_unknown,
        }
        .load_staged(table)?;
        *self.store = staged;
        Ok(ids)
    }

    fn load_staged(&mut self, table: &TypeTable) -> Result<Vec<ClassId>> {
        let mut declared = Vec::with_capacity(table.classes.len());
        for stub in &table.classes {
            let signature = stub
                .signature
                .as_deref()
                .map(parse_class_signature)
                .transpose()
                .map_err(|err| err.in_member("class", &stub.name))?;
            let (id, scope) = self.declare(stub, signature.as_ref());
            declared.push((id, stub, signature, scope));
        }

        for (id, stub, signature, scope) in &declared {
            self.define(*id, stub, signature.as_ref(), scope)?;
        }

        Ok(declared.into_iter().map(|(id, ..)| id).collect())
    }

    fn declare(
        &mut self,
        stub: &ClassStub,
        signature: Option<&ClassSignature>,
    ) -> (ClassId, TypeVarScope) {
        let id = self.store.intern_class_id(&stub.name);
        if self.store.is_defined(id) {
            tracing::debug!(class = %stub.name, "redefining class");
        }

        let params = signature.map(|sig| sig.type_params.as_slice()).unwrap_or(&[]);
        let (type_params, scope) = SignatureTranslator::new(self.store).declare_type_params(
            id,
            &TypeVarScope::new(),
            params,
        );

        let mut def = ClassDef::empty(stub.name.clone(), stub.kind);
        def.type_params = type_params;
        self.store.define_class(id, def);
        (id, scope)
    }

    fn define(
        &mut self,
        id: ClassId,
        stub: &ClassStub,
        signature: Option<&ClassSignature>,
        scope: &TypeVarScope,
    ) -> Result<()> {
        let default_super = self.default_super_class(stub);
        let mut tr = SignatureTranslator::new(self.store).allow_unknown(self.allow_unknown);

        let (super_class, interfaces) = match signature {
            Some(sig) => {
                // Interfaces have no superclass even though their signature names `Object`.
                let super_class = match stub.kind {
                    ClassKind::Class => Some(
                        tr.class_type(scope, &sig.super_class)
                            .map_err(|err| err.in_member("class", &stub.name))?,
                    ),
                    ClassKind::Interface | ClassKind::Primitive => None,
                };
                let interfaces = sig
                    .interfaces
                    .iter()
                    .map(|iface| tr.class_type(scope, iface))
                    .collect::<Result<Vec<_>>>()
                    .map_err(|err| err.in_member("class", &stub.name))?;
                (super_class, interfaces)
            }
            None => {
                let super_class = match (&stub.super_class, stub.kind) {
                    (Some(name), ClassKind::Class) => Some(Type::Concrete(
                        tr.class_id(name)
                            .map_err(|err| err.in_member("class", &stub.name))?,
                    )),
                    (None, ClassKind::Class) => default_super,
                    (_, ClassKind::Interface | ClassKind::Primitive) => None,
                };
                let interfaces = stub
                    .interfaces
                    .iter()
                    .map(|name| tr.class_id(name).map(Type::Concrete))
                    .collect::<Result<Vec<_>>>()
                    .map_err(|err| err.in_member("class", &stub.name))?;
                (super_class, interfaces)
            }
        };

        let fields = stub
            .fields
            .iter()
            .map(|field| {
                let owner = || format!("{}.{}", stub.name, field.name);
                let sig = parse_field_signature(&field.signature)
                    .map_err(|err| err.in_member("field", owner()))?;
                let ty = tr
                    .ty(scope, &sig)
                    .map_err(|err| err.in_member("field", owner()))?;
                Ok(FieldDef {
                    name: field.name.clone(),
                    ty,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let methods = stub
            .methods
            .iter()
            .map(|method| {
                let owner = || format!("{}.{}", stub.name, method.name);
                let sig = parse_method_signature(&method.signature)
                    .map_err(|err| err.in_member("method", owner()))?;
                let (type_params, scope) = tr.declare_type_params(id, scope, &sig.type_params);
                let params = sig
                    .params
                    .iter()
                    .map(|param| tr.ty(&scope, param))
                    .collect::<Result<Vec<_>>>()
                    .map_err(|err| err.in_member("method", owner()))?;
                let return_type = sig
                    .return_type
                    .as_ref()
                    .map(|ret| tr.ty(&scope, ret))
                    .transpose()
                    .map_err(|err| err.in_member("method", owner()))?;
                Ok(MethodDef {
                    name: method.name.clone(),
                    type_params,
                    params,
                    return_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let type_params: Vec<TypeVarId> = self.store.type_params(id).to_vec();
        tracing::debug!(
            class = %stub.name,
            type_params = type_params.len(),
            fields = fields.len(),
            methods = methods.len(),
            "loaded class"
        );
        self.store.define_class(
            id,
            ClassDef {
                name: stub.name.clone(),
                kind: stub.kind,
                type_params,
                super_class,
                interfaces,
                fields,
                methods,
            },
        );
        Ok(())
    }

    fn default_super_class(&self, stub: &ClassStub) -> Option<Type> {
        const OBJECT: &str = "java.lang.Object";
        if stub.kind != ClassKind::Class || stub.name == OBJECT {
            return None;
        }
        self.store.class_id(OBJECT).map(Type::Concrete)
    }
}
