use std::sync::{Arc, Weak};

use crate::runtime::{
    token::Token,
    typesystem::{RuntimeType, TypeRc},
};

/// A smart reference to a [`RuntimeType`] that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API.
///
/// Every member-to-type link in the mirrored image (field type, return type, base type,
/// declaring type) is a `TypeRef`: members never keep a type alive, the registry does.
#[derive(Clone, Debug)]
pub struct TypeRef {
    weak_ref: Weak<RuntimeType>,
}

impl TypeRef {
    /// Create a new `TypeRef` from a strong reference
    pub fn new(strong_ref: &TypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the name of the referenced type (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }

    /// Get the full name (Namespace.Name) of the referenced type (if still alive)
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        self.upgrade().map(|t| t.fullname())
    }
}

impl From<TypeRc> for TypeRef {
    fn from(strong_ref: TypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

#[allow(non_snake_case)]
/// All possible flags for `TypeAttributes`
pub mod TypeAttributes {
    /// These 3 bits contain visibility information
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Class has no public scope
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Class has public scope
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Class is interface semantics, otherwise class semantics
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Class is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Class cannot be extended
    pub const SEALED: u32 = 0x0000_0100;
    /// Class name is special
    pub const SPECIAL_NAME: u32 = 0x0000_0400;
    /// CLI provides 'special' behavior, depending upon the name of the type
    pub const RTSPECIAL_NAME: u32 = 0x0000_0800;
    /// Class is serializable
    pub const SERIALIZABLE: u32 = 0x0000_2000;
    /// Initialize the class before first static field access
    pub const BEFORE_FIELD_INIT: u32 = 0x0010_0000;
}

/// Represents the kind of a mirrored runtime type.
///
/// Primitive variants map to the built-in runtime types the registry seeds; `Class`,
/// `ValueType` and `Interface` cover everything a host adapter mirrors from the
/// embedded runtime.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    // Base primitive types
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    I,
    U,
    Object,
    String,

    // Type categories
    Class,
    ValueType,
    Interface,

    // Fallback
    Unknown,
}

impl TypeFlavor {
    /// Check if this is a primitive type
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeFlavor::Void
                | TypeFlavor::Boolean
                | TypeFlavor::Char
                | TypeFlavor::I1
                | TypeFlavor::U1
                | TypeFlavor::I2
                | TypeFlavor::U2
                | TypeFlavor::I4
                | TypeFlavor::U4
                | TypeFlavor::I8
                | TypeFlavor::U8
                | TypeFlavor::R4
                | TypeFlavor::R8
                | TypeFlavor::I
                | TypeFlavor::U
                | TypeFlavor::Object
                | TypeFlavor::String
        )
    }

    /// Check if this is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            TypeFlavor::Boolean
                | TypeFlavor::Char
                | TypeFlavor::I1
                | TypeFlavor::U1
                | TypeFlavor::I2
                | TypeFlavor::U2
                | TypeFlavor::I4
                | TypeFlavor::U4
                | TypeFlavor::I8
                | TypeFlavor::U8
                | TypeFlavor::R4
                | TypeFlavor::R8
                | TypeFlavor::I
                | TypeFlavor::U
                | TypeFlavor::ValueType
        )
    }

    /// Check if this is a reference type
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self,
            TypeFlavor::Object | TypeFlavor::String | TypeFlavor::Class | TypeFlavor::Interface
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::runtime::typesystem::RuntimeType;

    fn sample_type(name: &str) -> TypeRc {
        Arc::new(RuntimeType::new(
            Token::new(0x02000001),
            TypeFlavor::Class,
            "Game".to_string(),
            name.to_string(),
            None,
            TypeAttributes::PUBLIC,
        ))
    }

    #[test]
    fn test_type_flavor_is_primitive() {
        assert!(TypeFlavor::Void.is_primitive());
        assert!(TypeFlavor::I4.is_primitive());
        assert!(TypeFlavor::String.is_primitive());
        assert!(TypeFlavor::Object.is_primitive());

        assert!(!TypeFlavor::Class.is_primitive());
        assert!(!TypeFlavor::ValueType.is_primitive());
        assert!(!TypeFlavor::Interface.is_primitive());
        assert!(!TypeFlavor::Unknown.is_primitive());
    }

    #[test]
    fn test_type_flavor_is_value_type() {
        assert!(TypeFlavor::Boolean.is_value_type());
        assert!(TypeFlavor::I4.is_value_type());
        assert!(TypeFlavor::R8.is_value_type());
        assert!(TypeFlavor::ValueType.is_value_type());

        assert!(!TypeFlavor::Void.is_value_type());
        assert!(!TypeFlavor::Object.is_value_type());
        assert!(!TypeFlavor::String.is_value_type());
        assert!(!TypeFlavor::Class.is_value_type());
    }

    #[test]
    fn test_type_flavor_is_reference_type() {
        assert!(TypeFlavor::Object.is_reference_type());
        assert!(TypeFlavor::String.is_reference_type());
        assert!(TypeFlavor::Class.is_reference_type());
        assert!(TypeFlavor::Interface.is_reference_type());

        assert!(!TypeFlavor::Boolean.is_reference_type());
        assert!(!TypeFlavor::I4.is_reference_type());
        assert!(!TypeFlavor::ValueType.is_reference_type());
    }

    #[test]
    fn test_type_ref_upgrade_and_accessors() {
        let entity = sample_type("Entity");
        let type_ref = TypeRef::new(&entity);

        assert!(type_ref.is_valid());
        assert_eq!(type_ref.token(), Some(Token::new(0x02000001)));
        assert_eq!(type_ref.name(), Some("Entity".to_string()));
        assert_eq!(type_ref.fullname(), Some("Game.Entity".to_string()));
    }

    #[test]
    fn test_type_ref_dead_after_drop() {
        let type_ref = {
            let ghost = sample_type("Ghost");
            TypeRef::new(&ghost)
        };

        assert!(!type_ref.is_valid());
        assert!(type_ref.upgrade().is_none());
        assert_eq!(type_ref.name(), None);
    }
}
