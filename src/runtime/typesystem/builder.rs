//! Builder for mirrored runtime types.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for
//! mirroring types into a [`TypeRegistry`]: classes, value types and interfaces with
//! their fields, methods, constructors and properties. Host adapters use it to project
//! the embedded runtime's reflection data into the registry; the test suites use it to
//! stand up hierarchies without a live host.
//!
//! Property accessors are synthesized the way the runtime compiler does it: a
//! `get_X`/`set_X` method pair marked special-name, linked to the property and also
//! present in the declaring type's method list.
//!
//! # Example
//!
//! ```rust
//! use monoscope::runtime::typesystem::{TypeBuilder, TypeRegistry, TypeFlavor};
//! use monoscope::runtime::member::FieldAttributes;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let int32 = registry.get_primitive(TypeFlavor::I4)?;
//! let string = registry.get_primitive(TypeFlavor::String)?;
//!
//! let entity = TypeBuilder::new(&registry)
//!     .namespace("Game")
//!     .class("Entity")
//!     .field("health", &int32, FieldAttributes::PUBLIC)
//!     .property("Name", &string, |p| p)
//!     .method("Update", |m| m)
//!     .constructor(|c| c)
//!     .build()?;
//!
//! assert_eq!(entity.fullname(), "Game.Entity");
//! # Ok::<(), monoscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    runtime::{
        member::{
            Field, Method, MethodAccessFlags, MethodModifiers, Param, Property, CTOR_NAME,
            GETTER_PREFIX, SETTER_PREFIX,
        },
        token::{TABLE_FIELD, TABLE_METHODDEF, TABLE_PROPERTY},
        typesystem::{RuntimeType, TypeAttributes, TypeFlavor, TypeRc, TypeRef, TypeRegistry},
    },
    Error::Error as GenericError,
    Result,
};

/// Specification of a single field, consumed by [`TypeBuilder::field`].
pub struct FieldSpec {
    name: String,
    ty: TypeRc,
    flags: u32,
}

/// Specification of a single method or constructor with fluent modifiers.
pub struct MethodSpec {
    name: String,
    access: u32,
    modifiers: u32,
    returns: Option<TypeRc>,
    params: Vec<(String, TypeRc)>,
}

impl MethodSpec {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: MethodAccessFlags::PUBLIC.bits(),
            modifiers: MethodModifiers::HIDE_BY_SIG.bits(),
            returns: None,
            params: Vec::new(),
        }
    }

    /// Make the method public (the default)
    #[must_use]
    pub fn public(mut self) -> Self {
        self.access = MethodAccessFlags::PUBLIC.bits();
        self
    }

    /// Make the method private
    #[must_use]
    pub fn private(mut self) -> Self {
        self.access = MethodAccessFlags::PRIVATE.bits();
        self
    }

    /// Make the method static
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.modifiers |= MethodModifiers::STATIC.bits();
        self
    }

    /// Make the method virtual
    #[must_use]
    pub fn virtual_(mut self) -> Self {
        self.modifiers |= MethodModifiers::VIRTUAL.bits();
        self
    }

    /// Set the return type; defaults to `System.Void`
    #[must_use]
    pub fn returns(mut self, ty: &TypeRc) -> Self {
        self.returns = Some(ty.clone());
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, ty: &TypeRc) -> Self {
        self.params.push((name.into(), ty.clone()));
        self
    }

    fn flags(&self) -> u32 {
        self.access | self.modifiers
    }
}

/// Specification of a single property with fluent modifiers.
///
/// Defaults to a readable and writable public instance property.
pub struct PropertySpec {
    name: String,
    ty: TypeRc,
    readable: bool,
    writable: bool,
    access: u32,
    modifiers: u32,
}

impl PropertySpec {
    fn new(name: impl Into<String>, ty: &TypeRc) -> Self {
        Self {
            name: name.into(),
            ty: ty.clone(),
            readable: true,
            writable: true,
            access: MethodAccessFlags::PUBLIC.bits(),
            modifiers: MethodModifiers::HIDE_BY_SIG.bits() | MethodModifiers::SPECIAL_NAME.bits(),
        }
    }

    /// Drop the setter accessor
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.readable = true;
        self.writable = false;
        self
    }

    /// Drop the getter accessor
    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self.writable = true;
        self
    }

    /// Make the accessors public (the default)
    #[must_use]
    pub fn public(mut self) -> Self {
        self.access = MethodAccessFlags::PUBLIC.bits();
        self
    }

    /// Make the accessors private
    #[must_use]
    pub fn private(mut self) -> Self {
        self.access = MethodAccessFlags::PRIVATE.bits();
        self
    }

    /// Make the property static
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.modifiers |= MethodModifiers::STATIC.bits();
        self
    }
}

/// Provides a fluent API for mirroring a type into a [`TypeRegistry`].
pub struct TypeBuilder {
    /// Type registry for storing the types
    registry: Arc<TypeRegistry>,
    namespace: String,
    name: Option<String>,
    flavor: TypeFlavor,
    flags: u32,
    base: Option<TypeRc>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
    constructors: Vec<MethodSpec>,
    properties: Vec<PropertySpec>,
}

impl TypeBuilder {
    /// Create a new builder with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to mirror into
    pub fn new(registry: &Arc<TypeRegistry>) -> Self {
        TypeBuilder {
            registry: registry.clone(),
            namespace: String::new(),
            name: None,
            flavor: TypeFlavor::Class,
            flags: TypeAttributes::PUBLIC,
            base: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Set the namespace of the type being mirrored
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Start a class; bases off `System.Object` unless [`TypeBuilder::base`] is used
    #[must_use]
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.flavor = TypeFlavor::Class;
        self
    }

    /// Start a value type; bases off `System.ValueType` unless overridden
    #[must_use]
    pub fn value_type(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.flavor = TypeFlavor::ValueType;
        self
    }

    /// Start an interface; interfaces have no base type
    #[must_use]
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.flavor = TypeFlavor::Interface;
        self.flags |= TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;
        self
    }

    /// Mark the type abstract
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.flags |= TypeAttributes::ABSTRACT;
        self
    }

    /// Set the base type explicitly
    #[must_use]
    pub fn base(mut self, base: &TypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add a field with raw `FieldAttributes` flags
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: &TypeRc, flags: u32) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: ty.clone(),
            flags,
        });
        self
    }

    /// Add a method, configured through the provided closure
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(MethodSpec) -> MethodSpec,
    ) -> Self {
        self.methods.push(configure(MethodSpec::new(name)));
        self
    }

    /// Add an instance constructor, configured through the provided closure
    #[must_use]
    pub fn constructor(mut self, configure: impl FnOnce(MethodSpec) -> MethodSpec) -> Self {
        let spec = configure(MethodSpec::new(CTOR_NAME));
        self.constructors.push(spec);
        self
    }

    /// Add a property, configured through the provided closure
    #[must_use]
    pub fn property(
        mut self,
        name: impl Into<String>,
        ty: &TypeRc,
        configure: impl FnOnce(PropertySpec) -> PropertySpec,
    ) -> Self {
        self.properties.push(configure(PropertySpec::new(name, ty)));
        self
    }

    /// Mirror the configured type into the registry.
    ///
    /// # Errors
    /// Returns an error if no type name was set, if the token collides with an
    /// already mirrored type, or if a default base type is missing from the registry.
    pub fn build(self) -> Result<TypeRc> {
        let name = self
            .name
            .ok_or_else(|| GenericError("type name not set".to_string()))?;

        let base = match (&self.base, self.flavor) {
            (Some(base), _) => Some(base.clone()),
            (None, TypeFlavor::Class) => Some(self.registry.get_primitive(TypeFlavor::Object)?),
            (None, TypeFlavor::ValueType) => {
                Some(self.registry.get_primitive(TypeFlavor::ValueType)?)
            }
            (None, _) => None,
        };

        let ty = Arc::new(RuntimeType::new(
            self.registry.next_token(),
            self.flavor,
            self.namespace,
            name,
            base,
            self.flags,
        ));

        for spec in &self.fields {
            let field = Arc::new(Field::new(
                self.registry.alloc_member_token(TABLE_FIELD),
                spec.name.clone(),
                spec.flags,
                TypeRef::new(&spec.ty),
            ));
            field.set_declaring(&ty);
            ty.fields.push(field);
        }

        let void = self.registry.get_primitive(TypeFlavor::Void)?;

        for spec in self.constructors.iter().chain(self.methods.iter()) {
            let returns = spec.returns.as_ref().unwrap_or(&void);
            let params = spec
                .params
                .iter()
                .map(|(name, ty)| Param::new(name.clone(), ty))
                .collect();

            let mut flags = spec.flags();
            if spec.name == CTOR_NAME {
                flags |= MethodModifiers::SPECIAL_NAME.bits() | MethodModifiers::RTSPECIAL_NAME.bits();
            }

            let method = Arc::new(Method::new(
                self.registry.alloc_member_token(TABLE_METHODDEF),
                spec.name.clone(),
                flags,
                TypeRef::new(returns),
                params,
            ));
            method.set_declaring(&ty);
            ty.methods.push(method);
        }

        for spec in &self.properties {
            let property = Arc::new(Property::new(
                self.registry.alloc_member_token(TABLE_PROPERTY),
                spec.name.clone(),
                0,
                TypeRef::new(&spec.ty),
            ));
            property.set_declaring(&ty);

            let accessor_flags = spec.access | spec.modifiers;

            if spec.readable {
                let getter = Arc::new(Method::new(
                    self.registry.alloc_member_token(TABLE_METHODDEF),
                    format!("{GETTER_PREFIX}{}", spec.name),
                    accessor_flags,
                    TypeRef::new(&spec.ty),
                    Vec::new(),
                ));
                getter.set_declaring(&ty);
                property.set_getter(getter.clone());
                ty.methods.push(getter);
            }

            if spec.writable {
                let setter = Arc::new(Method::new(
                    self.registry.alloc_member_token(TABLE_METHODDEF),
                    format!("{SETTER_PREFIX}{}", spec.name),
                    accessor_flags,
                    TypeRef::new(&void),
                    vec![Param::new("value", &spec.ty)],
                ));
                setter.set_declaring(&ty);
                property.set_setter(setter.clone());
                ty.methods.push(setter);
            }

            ty.properties.push(property);
        }

        self.registry.insert(&ty)?;
        Ok(ty)
    }
}
