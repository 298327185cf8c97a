//! Mirrored type system for live runtime inspection.
//!
//! This module provides the in-memory image of the embedded runtime's type system that
//! the enumeration core walks. It bridges the gap between the host runtime's reflection
//! surface and a usable, reference-counted type graph.
//!
//! # Key Components
//!
//! - [`RuntimeType`]: Core type representation with base link and member lists
//! - [`TypeRegistry`]: Central registry keeping all mirrored types alive
//! - [`TypeBuilder`]: Builder pattern for mirroring types into the registry
//! - [`TypeRef`]: Weak type reference used for every member-to-type link
//!
//! # Type System Features
//!
//! - **Weak linkage**: members and cache entries never extend a type's lifetime
//! - **Reflection-shaped queries**: scope-filtered member queries include inherited
//!   (promoted) members the way the live runtime's reflection surface does, each
//!   candidate still knowing its true declaring type
//! - **Primitive seeding**: `System.Object`, `System.ValueType` and the primitive
//!   types are pre-registered so host adapters can root their hierarchies
//!
//! # Examples
//!
//! ```rust
//! use monoscope::runtime::typesystem::{TypeBuilder, TypeRegistry, TypeFlavor};
//! use monoscope::runtime::member::FieldAttributes;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let int32 = registry.get_primitive(TypeFlavor::I4)?;
//!
//! let entity = TypeBuilder::new(&registry)
//!     .namespace("Game")
//!     .class("Entity")
//!     .field("health", &int32, FieldAttributes::PUBLIC)
//!     .build()?;
//!
//! assert_eq!(entity.fullname(), "Game.Entity");
//! # Ok::<(), monoscope::Error>(())
//! ```

mod base;
mod builder;
mod registry;

use std::sync::{Arc, OnceLock};

pub use base::{TypeAttributes, TypeFlavor, TypeRef};
pub use builder::{FieldSpec, MethodSpec, PropertySpec, TypeBuilder};
pub use registry::TypeRegistry;

use crate::runtime::{
    member::{BindingScope, FieldList, FieldRc, MethodList, MethodRc, PropertyList, PropertyRc},
    token::Token,
};

/// Reference to a `RuntimeType`
pub type TypeRc = Arc<RuntimeType>;

/// Upper bound on base-chain walks; a chain deeper than this is treated as ending.
pub(crate) const MAX_TYPE_DEPTH: usize = 64;

/// Represents a 'Type' mirrored from the host runtime, containing the declared member
/// lists and the base-type link the enumeration core traverses. The `Token` matches the
/// host runtime's metadata token when the adapter knows it, or an artificial token
/// allocated by the [`TypeRegistry`].
pub struct RuntimeType {
    /// Token
    pub token: Token,
    /// The kind of this type
    pub flavor: TypeFlavor,
    /// `TypeNamespace` (can be empty, e.g. for global types)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// This types base aka 'extends', unset for `System.Object` and interfaces
    base: OnceLock<TypeRef>,
    /// Flags (a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15)
    pub flags: u32,
    /// All fields this type declares directly
    pub fields: FieldList,
    /// All methods this type declares directly (constructors and accessors included)
    pub methods: MethodList,
    /// All properties this type declares directly
    pub properties: PropertyList,
}

impl RuntimeType {
    /// Create a new instance of a `RuntimeType` with empty member lists
    pub fn new(
        token: Token,
        flavor: TypeFlavor,
        namespace: String,
        name: String,
        base: Option<TypeRc>,
        flags: u32,
    ) -> Self {
        let base_lock = OnceLock::new();
        if let Some(base_value) = base {
            base_lock.set(base_value.into()).ok();
        }

        RuntimeType {
            token,
            flavor,
            namespace,
            name,
            base: base_lock,
            flags,
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the base type of this type, if it exists and is still alive
    pub fn base(&self) -> Option<TypeRc> {
        if let Some(base) = self.base.get() {
            base.upgrade()
        } else {
            None
        }
    }

    /// Attach the base type; ignored if already attached.
    pub fn set_base(&self, base: &TypeRc) {
        self.base.set(TypeRef::new(base)).ok();
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Check if this type is abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags & TypeAttributes::ABSTRACT != 0
    }

    /// Check if this type is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.flavor.is_value_type()
    }

    /// Check if this type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flavor == TypeFlavor::Interface || self.flags & TypeAttributes::INTERFACE != 0
    }

    /// Check if this type is `token` or derives from it.
    ///
    /// The walk is bounded by [`MAX_TYPE_DEPTH`] so a cyclic base graph in a hostile
    /// image terminates.
    #[must_use]
    pub fn derives_from(&self, token: Token) -> bool {
        if self.token == token {
            return true;
        }

        let mut depth = 1;
        let mut current = self.base();
        while let Some(level) = current {
            if level.token == token {
                return true;
            }
            depth += 1;
            if depth > MAX_TYPE_DEPTH {
                break;
            }
            current = level.base();
        }
        false
    }

    /// Visit this type and its live ancestors, most-derived first, with their depth.
    fn for_each_level<F: FnMut(&RuntimeType, usize)>(&self, mut visit: F) {
        visit(self, 0);

        let mut depth = 1;
        let mut current = self.base();
        while let Some(level) = current {
            if depth >= MAX_TYPE_DEPTH {
                break;
            }
            visit(&level, depth);
            depth += 1;
            current = level.base();
        }
    }

    /// Constructors declared directly on this type that pass the given scope.
    ///
    /// Never includes the synthetic class constructor and never promotes constructors
    /// from ancestor types.
    pub fn declared_constructors(&self, scope: BindingScope) -> Vec<MethodRc> {
        self.methods
            .iter()
            .filter(|(_, m)| m.is_constructor() && scope.admits_method(m))
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Properties visible on this type under the given scope, declared and inherited.
    ///
    /// Mirrors the live runtime's reflection surface: ancestor members are promoted
    /// into the view unless private, and every returned descriptor still knows its
    /// true declaring type.
    pub fn properties_in_scope(&self, scope: BindingScope) -> Vec<PropertyRc> {
        let mut out = Vec::new();
        self.for_each_level(|level, depth| {
            for (_, prop) in level.properties.iter() {
                if !scope.admits_property(prop) {
                    continue;
                }
                if depth > 0 && prop.is_private() {
                    continue;
                }
                out.push(prop.clone());
            }
        });
        out
    }

    /// Fields visible on this type under the given scope, declared and inherited.
    pub fn fields_in_scope(&self, scope: BindingScope) -> Vec<FieldRc> {
        let mut out = Vec::new();
        self.for_each_level(|level, depth| {
            for (_, field) in level.fields.iter() {
                if !scope.admits_field(field) {
                    continue;
                }
                if depth > 0 && field.is_private() {
                    continue;
                }
                out.push(field.clone());
            }
        });
        out
    }

    /// Methods visible on this type under the given scope, declared and inherited.
    ///
    /// Constructors are excluded; they are only reachable through
    /// [`RuntimeType::declared_constructors`].
    pub fn methods_in_scope(&self, scope: BindingScope) -> Vec<MethodRc> {
        let mut out = Vec::new();
        self.for_each_level(|level, depth| {
            for (_, method) in level.methods.iter() {
                if method.is_constructor() || method.is_class_constructor() {
                    continue;
                }
                if !scope.admits_method(method) {
                    continue;
                }
                if depth > 0 && method.is_private() {
                    continue;
                }
                out.push(method.clone());
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::member::{Field, FieldAttributes, Method, MethodAccessFlags, CTOR_NAME};

    fn class(token: u32, name: &str, base: Option<TypeRc>) -> TypeRc {
        Arc::new(RuntimeType::new(
            Token::new(token),
            TypeFlavor::Class,
            "Game".to_string(),
            name.to_string(),
            base,
            TypeAttributes::PUBLIC,
        ))
    }

    fn public_field(token: u32, name: &str, ty: &TypeRc) -> FieldRc {
        Arc::new(Field::new(
            Token::new(token),
            name,
            FieldAttributes::PUBLIC,
            TypeRef::new(ty),
        ))
    }

    #[test]
    fn test_fullname_handles_empty_namespace() {
        let global = Arc::new(RuntimeType::new(
            Token::new(0x02000001),
            TypeFlavor::Class,
            String::new(),
            "<Module>".to_string(),
            None,
            0,
        ));
        assert_eq!(global.fullname(), "<Module>");
        assert_eq!(class(0x02000002, "Entity", None).fullname(), "Game.Entity");
    }

    #[test]
    fn test_derives_from_walks_the_base_chain() {
        let object = class(0x02000001, "Object", None);
        let entity = class(0x02000002, "Entity", Some(object.clone()));
        let player = class(0x02000003, "Player", Some(entity.clone()));

        assert!(player.derives_from(player.token));
        assert!(player.derives_from(entity.token));
        assert!(player.derives_from(object.token));
        assert!(!entity.derives_from(player.token));
    }

    #[test]
    fn test_fields_in_scope_promotes_non_private_ancestors() {
        let entity = class(0x02000001, "Entity", None);
        let player = class(0x02000002, "Player", Some(entity.clone()));

        let visible = public_field(0x04000001, "health", &entity);
        visible.set_declaring(&entity);
        entity.fields.push(visible);

        let hidden = Arc::new(Field::new(
            Token::new(0x04000002),
            "seed",
            FieldAttributes::PRIVATE,
            TypeRef::new(&entity),
        ));
        hidden.set_declaring(&entity);
        entity.fields.push(hidden);

        let own = public_field(0x04000003, "score", &player);
        own.set_declaring(&player);
        player.fields.push(own);

        let scope = BindingScope::all();
        let names: Vec<_> = player
            .fields_in_scope(scope)
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["score", "health"]);

        // the private ancestor field is still visible when scanning its own level
        let entity_names: Vec<_> = entity
            .fields_in_scope(scope)
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(entity_names, vec!["health", "seed"]);
    }

    #[test]
    fn test_declared_constructors_skips_class_constructor() {
        let entity = class(0x02000001, "Entity", None);

        let ctor = Arc::new(Method::new(
            Token::new(0x06000001),
            CTOR_NAME,
            MethodAccessFlags::PUBLIC.bits(),
            TypeRef::new(&entity),
            Vec::new(),
        ));
        ctor.set_declaring(&entity);
        entity.methods.push(ctor);

        let cctor = Arc::new(Method::new(
            Token::new(0x06000002),
            ".cctor",
            MethodAccessFlags::PRIVATE.bits(),
            TypeRef::new(&entity),
            Vec::new(),
        ));
        cctor.set_declaring(&entity);
        entity.methods.push(cctor);

        let ctors = entity.declared_constructors(BindingScope::all());
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].name, CTOR_NAME);
    }
}
