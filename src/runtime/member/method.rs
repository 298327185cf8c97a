//! Method descriptors and attribute flags for mirrored runtime methods.
//!
//! This module defines the raw [`Method`] descriptor the enumeration core classifies,
//! together with the bitflag groups used to extract access and modifier information
//! from the 2-byte `MethodAttributes` bitmask the host runtime exposes.
//!
//! # Key Types
//! - [`Method`], [`Param`]: Raw method descriptor and its parameters
//! - [`MethodAccessFlags`], [`MethodModifiers`]: Attribute flag groups

use std::sync::OnceLock;

use bitflags::bitflags;

use crate::{
    runtime::{
        token::Token,
        typesystem::{TypeRc, TypeRef},
    },
    Result,
};

/// Name of instance constructors as surfaced by the runtime.
pub const CTOR_NAME: &str = ".ctor";
/// Name of the synthetic class constructor; never enumerated.
pub const CCTOR_NAME: &str = ".cctor";
/// Prefix of compiler-synthesized property getter methods.
pub const GETTER_PREFIX: &str = "get_";
/// Prefix of compiler-synthesized property setter methods.
pub const SETTER_PREFIX: &str = "set_";

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for `VTABLE_LAYOUT` information extraction
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;

// Method attributes split into logical groups
bitflags! {
    #[derive(Debug, PartialEq)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let access = flags & METHOD_ACCESS_MASK;
        Self::from_bits_truncate(access)
    }
}

bitflags! {
    #[derive(PartialEq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let modifiers = flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK;
        Self::from_bits_truncate(modifiers)
    }
}

/// A single parameter of a mirrored method.
#[derive(Clone, Debug)]
pub struct Param {
    /// The name of the parameter
    pub name: String,
    /// The type of the parameter
    pub ty: TypeRef,
}

impl Param {
    /// Create a new parameter descriptor
    pub fn new(name: impl Into<String>, ty: &TypeRc) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::new(ty),
        }
    }
}

/// A method mirrored from the host runtime. Constructors are methods named
/// [`CTOR_NAME`]; the synthetic class constructor is named [`CCTOR_NAME`].
///
/// The declaring-type backlink is attached when the method is added to its type and
/// set exactly once.
pub struct Method {
    /// Token
    pub token: Token,
    /// The name of this method
    pub name: String,
    /// a 2-byte bitmask of type `MethodAttributes`, §II.23.1.10
    pub flags: u32,
    /// The return type of this method
    pub return_type: TypeRef,
    /// The parameters of this method
    pub params: Vec<Param>,
    /// The type this method is declared on, attached once at mirror time
    declaring: OnceLock<TypeRef>,
}

impl Method {
    /// Create a new method descriptor
    ///
    /// # Arguments
    /// * `token` - Token identifying this method
    /// * `name` - Method name as surfaced by the runtime
    /// * `flags` - Raw `MethodAttributes` bitmask
    /// * `return_type` - Weak reference to the return type
    /// * `params` - Parameter descriptors, in declaration order
    pub fn new(
        token: Token,
        name: impl Into<String>,
        flags: u32,
        return_type: TypeRef,
        params: Vec<Param>,
    ) -> Self {
        Self {
            token,
            name: name.into(),
            flags,
            return_type,
            params,
            declaring: OnceLock::new(),
        }
    }

    /// Attach the declaring type; ignored if already attached.
    pub fn set_declaring(&self, declaring: &TypeRc) {
        self.declaring.set(TypeRef::new(declaring)).ok();
    }

    /// Resolve the declaring type of this method.
    ///
    /// # Errors
    /// Returns an error if the backlink was never attached or the type was dropped.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        let declaring = self
            .declaring
            .get()
            .ok_or_else(|| member_error!("declaring type not attached for method '{}'", self.name))?;
        declaring
            .upgrade()
            .ok_or_else(|| crate::Error::TypeDropped(self.name.clone()))
    }

    /// Token of the declaring type, if attached and still alive
    #[must_use]
    pub fn declaring_token(&self) -> Option<Token> {
        self.declaring.get().and_then(|declaring| declaring.token())
    }

    /// Check if this method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        MethodModifiers::from_method_flags(self.flags).contains(MethodModifiers::STATIC)
    }

    /// Check if this method is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        MethodAccessFlags::from_method_flags(self.flags) == MethodAccessFlags::PUBLIC
    }

    /// Check if this method is private
    #[must_use]
    pub fn is_private(&self) -> bool {
        MethodAccessFlags::from_method_flags(self.flags) == MethodAccessFlags::PRIVATE
    }

    /// Check if this method is an instance constructor
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CTOR_NAME
    }

    /// Check if this method is the synthetic class constructor
    #[must_use]
    pub fn is_class_constructor(&self) -> bool {
        self.name == CCTOR_NAME
    }

    /// Check if this method is a compiler-synthesized property accessor
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        self.name.starts_with(GETTER_PREFIX) || self.name.starts_with(SETTER_PREFIX)
    }
}
