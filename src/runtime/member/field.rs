use std::sync::OnceLock;

use crate::{
    runtime::{
        token::Token,
        typesystem::{TypeRc, TypeRef},
    },
    Result,
};

#[allow(non_snake_case)]
/// All possible flags for `FieldAttributes`
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u32 = 0x0040;
    /// Field is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the field
    pub const RTSPECIAL_NAME: u32 = 0x0400;
}

/// A field mirrored from the host runtime, with a weak reference to its value type
/// and a declaring-type backlink attached once at mirror time.
pub struct Field {
    /// Token
    pub token: Token,
    /// The name of this field
    pub name: String,
    /// a 2-byte bitmask of type `FieldAttributes`, §II.23.1.5
    pub flags: u32,
    /// The type of the value this field holds
    pub field_type: TypeRef,
    /// The type this field is declared on, attached once at mirror time
    declaring: OnceLock<TypeRef>,
}

impl Field {
    /// Create a new field descriptor
    ///
    /// # Arguments
    /// * `token` - Token identifying this field
    /// * `name` - Field name as surfaced by the runtime
    /// * `flags` - Raw `FieldAttributes` bitmask
    /// * `field_type` - Weak reference to the field's value type
    pub fn new(token: Token, name: impl Into<String>, flags: u32, field_type: TypeRef) -> Self {
        Self {
            token,
            name: name.into(),
            flags,
            field_type,
            declaring: OnceLock::new(),
        }
    }

    /// Attach the declaring type; ignored if already attached.
    pub fn set_declaring(&self, declaring: &TypeRc) {
        self.declaring.set(TypeRef::new(declaring)).ok();
    }

    /// Resolve the declaring type of this field.
    ///
    /// # Errors
    /// Returns an error if the backlink was never attached or the type was dropped.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        let declaring = self
            .declaring
            .get()
            .ok_or_else(|| member_error!("declaring type not attached for field '{}'", self.name))?;
        declaring
            .upgrade()
            .ok_or_else(|| crate::Error::TypeDropped(self.name.clone()))
    }

    /// Token of the declaring type, if attached and still alive
    #[must_use]
    pub fn declaring_token(&self) -> Option<Token> {
        self.declaring.get().and_then(|declaring| declaring.token())
    }

    /// Check if this field is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags & FieldAttributes::STATIC != 0
    }

    /// Check if this field is public
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PUBLIC
    }

    /// Check if this field is private
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PRIVATE
    }
}
