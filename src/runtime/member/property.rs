use std::sync::OnceLock;

use crate::{
    runtime::{
        member::MethodRc,
        token::Token,
        typesystem::{TypeRc, TypeRef},
    },
    Result,
};

#[allow(non_snake_case)]
/// All possible flags for `PropertyAttributes`
pub mod PropertyAttributes {
    /// Property is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime(metadata internal APIs) should check name encoding
    pub const RTSPECIAL_NAME: u32 = 0x0400;
    /// Property has default
    pub const HAS_DEFAULT: u32 = 0x1000;
}

/// A property mirrored from the host runtime.
///
/// Properties carry no binding information of their own; staticness and visibility are
/// derived from whichever accessor methods exist. The accessor links are attached once
/// at mirror time, after the accessor methods themselves have been mirrored.
pub struct Property {
    /// Token
    pub token: Token,
    /// The name of this property
    pub name: String,
    /// a 2-byte bitmask of type `PropertyAttributes`, §II.23.1.14
    pub flags: u32,
    /// The type of the value this property yields
    pub property_type: TypeRef,
    /// The method that retrieves this property
    fn_getter: OnceLock<MethodRc>,
    /// The method that sets this property
    fn_setter: OnceLock<MethodRc>,
    /// The type this property is declared on, attached once at mirror time
    declaring: OnceLock<TypeRef>,
}

impl Property {
    /// Create a new property descriptor
    ///
    /// # Arguments
    /// * `token` - Token identifying this property
    /// * `name` - Property name as surfaced by the runtime
    /// * `flags` - Raw `PropertyAttributes` bitmask
    /// * `property_type` - Weak reference to the property's value type
    pub fn new(token: Token, name: impl Into<String>, flags: u32, property_type: TypeRef) -> Self {
        Self {
            token,
            name: name.into(),
            flags,
            property_type,
            fn_getter: OnceLock::new(),
            fn_setter: OnceLock::new(),
            declaring: OnceLock::new(),
        }
    }

    /// Attach the getter method; ignored if already attached.
    pub fn set_getter(&self, getter: MethodRc) {
        self.fn_getter.set(getter).ok();
    }

    /// Attach the setter method; ignored if already attached.
    pub fn set_setter(&self, setter: MethodRc) {
        self.fn_setter.set(setter).ok();
    }

    /// The getter method, if this property has one
    #[must_use]
    pub fn getter(&self) -> Option<MethodRc> {
        self.fn_getter.get().cloned()
    }

    /// The setter method, if this property has one
    #[must_use]
    pub fn setter(&self) -> Option<MethodRc> {
        self.fn_setter.get().cloned()
    }

    /// Check if this property can be read
    #[must_use]
    pub fn can_read(&self) -> bool {
        self.fn_getter.get().is_some()
    }

    /// Check if this property can be written
    #[must_use]
    pub fn can_write(&self) -> bool {
        self.fn_setter.get().is_some()
    }

    /// Attach the declaring type; ignored if already attached.
    pub fn set_declaring(&self, declaring: &TypeRc) {
        self.declaring.set(TypeRef::new(declaring)).ok();
    }

    /// Resolve the declaring type of this property.
    ///
    /// # Errors
    /// Returns an error if the backlink was never attached or the type was dropped.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        let declaring = self.declaring.get().ok_or_else(|| {
            member_error!("declaring type not attached for property '{}'", self.name)
        })?;
        declaring
            .upgrade()
            .ok_or_else(|| crate::Error::TypeDropped(self.name.clone()))
    }

    /// Token of the declaring type, if attached and still alive
    #[must_use]
    pub fn declaring_token(&self) -> Option<Token> {
        self.declaring.get().and_then(|declaring| declaring.token())
    }

    /// Check if this property is static, derived from its accessors
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.accessors().any(|m| m.is_static())
    }

    /// Check if this property is public, derived from its most visible accessor
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessors().any(|m| m.is_public())
    }

    /// Check if this property is private, derived from its accessors
    #[must_use]
    pub fn is_private(&self) -> bool {
        let mut accessors = self.accessors().peekable();
        accessors.peek().is_some() && self.accessors().all(|m| m.is_private())
    }

    fn accessors(&self) -> impl Iterator<Item = &MethodRc> {
        self.fn_getter.get().into_iter().chain(self.fn_setter.get())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::runtime::{
        member::{Method, MethodAccessFlags, MethodModifiers},
        typesystem::{RuntimeType, TypeAttributes, TypeFlavor},
    };

    fn sample_type() -> TypeRc {
        Arc::new(RuntimeType::new(
            Token::new(0x02000001),
            TypeFlavor::Class,
            "Game".to_string(),
            "Entity".to_string(),
            None,
            TypeAttributes::PUBLIC,
        ))
    }

    fn accessor(name: &str, flags: u32, ret: &TypeRc) -> MethodRc {
        Arc::new(Method::new(
            Token::new(0x06000001),
            name,
            flags | MethodModifiers::SPECIAL_NAME.bits(),
            TypeRef::new(ret),
            Vec::new(),
        ))
    }

    #[test]
    fn test_property_read_write_capability() {
        let ty = sample_type();
        let prop = Property::new(
            Token::new(0x17000001),
            "Health",
            0,
            TypeRef::new(&ty),
        );
        assert!(!prop.can_read());
        assert!(!prop.can_write());

        prop.set_getter(accessor("get_Health", MethodAccessFlags::PUBLIC.bits(), &ty));
        assert!(prop.can_read());
        assert!(!prop.can_write());

        prop.set_setter(accessor("set_Health", MethodAccessFlags::PUBLIC.bits(), &ty));
        assert!(prop.can_write());
    }

    #[test]
    fn test_property_binding_derived_from_accessors() {
        let ty = sample_type();
        let prop = Property::new(Token::new(0x17000001), "Count", 0, TypeRef::new(&ty));
        prop.set_getter(accessor(
            "get_Count",
            MethodAccessFlags::PUBLIC.bits() | MethodModifiers::STATIC.bits(),
            &ty,
        ));

        assert!(prop.is_static());
        assert!(prop.is_public());
        assert!(!prop.is_private());
    }

    #[test]
    fn test_property_private_requires_all_accessors_private() {
        let ty = sample_type();
        let prop = Property::new(Token::new(0x17000001), "Seed", 0, TypeRef::new(&ty));
        prop.set_getter(accessor("get_Seed", MethodAccessFlags::PRIVATE.bits(), &ty));
        prop.set_setter(accessor("set_Seed", MethodAccessFlags::PUBLIC.bits(), &ty));

        assert!(!prop.is_private());
        assert!(prop.is_public());
    }
}
