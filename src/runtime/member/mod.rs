//! Raw member descriptors mirrored from the host runtime.
//!
//! The enumeration core never talks to the embedded runtime directly; host adapters
//! mirror the runtime's reflection data into the descriptor types of this module, and
//! the core classifies those. Three descriptor kinds exist: [`Method`] (constructors
//! are methods named `.ctor`), [`Field`] and [`Property`], plus [`MemberHandle`], the
//! closed union the classification pipeline and the policy gate operate on.
//!
//! # Binding Scope
//!
//! [`BindingScope`] is the visibility/staticness filter composed per enumeration call:
//! public and non-public members are always included, static members are always
//! included, instance members only when the inspection session is not static-only.

mod field;
mod method;
mod property;

use std::sync::Arc;

use bitflags::bitflags;
use strum::Display;

pub use field::{Field, FieldAttributes};
pub use method::{
    Method, MethodAccessFlags, MethodModifiers, Param, CCTOR_NAME, CTOR_NAME, GETTER_PREFIX,
    METHOD_ACCESS_MASK, METHOD_VTABLE_LAYOUT_MASK, SETTER_PREFIX,
};
pub use property::{Property, PropertyAttributes};

use crate::{
    runtime::{token::Token, typesystem::TypeRc},
    Result,
};

/// A reference to a method descriptor
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;
/// A reference to a field descriptor
pub type FieldRc = Arc<Field>;
/// A vector that holds a list of `Field`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// A reference to a property descriptor
pub type PropertyRc = Arc<Property>;
/// A vector that holds a list of `Property`
pub type PropertyList = Arc<boxcar::Vec<PropertyRc>>;

bitflags! {
    #[derive(Clone, Copy, PartialEq)]
    /// Visibility and staticness filter for raw member queries
    pub struct BindingScope: u32 {
        /// Include public members
        const PUBLIC = 0x0001;
        /// Include non-public members
        const NON_PUBLIC = 0x0002;
        /// Include static members
        const STATIC = 0x0004;
        /// Include instance members
        const INSTANCE = 0x0008;
    }
}

impl BindingScope {
    /// Check if a member with the given visibility and staticness passes this scope
    #[must_use]
    pub fn admits(&self, is_public: bool, is_static: bool) -> bool {
        let visibility = if is_public {
            self.contains(BindingScope::PUBLIC)
        } else {
            self.contains(BindingScope::NON_PUBLIC)
        };
        let staticness = if is_static {
            self.contains(BindingScope::STATIC)
        } else {
            self.contains(BindingScope::INSTANCE)
        };
        visibility && staticness
    }

    /// Check if the given method passes this scope
    #[must_use]
    pub fn admits_method(&self, method: &Method) -> bool {
        self.admits(method.is_public(), method.is_static())
    }

    /// Check if the given field passes this scope
    #[must_use]
    pub fn admits_field(&self, field: &Field) -> bool {
        self.admits(field.is_public(), field.is_static())
    }

    /// Check if the given property passes this scope, based on its accessors
    #[must_use]
    pub fn admits_property(&self, property: &Property) -> bool {
        self.admits(property.is_public(), property.is_static())
    }
}

/// The kind of a raw member candidate, as seen by the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MemberKind {
    /// An instance constructor
    Constructor,
    /// A regular method
    Method,
    /// A property
    Property,
    /// A field
    Field,
}

/// A handle to any raw member descriptor.
///
/// This is the closed union the classification pipeline and the policy gate consume;
/// there is no other member kind a candidate can have, which keeps kind handling
/// exhaustive at compile time.
#[derive(Clone)]
pub enum MemberHandle {
    /// A method descriptor (constructors included)
    Method(MethodRc),
    /// A field descriptor
    Field(FieldRc),
    /// A property descriptor
    Property(PropertyRc),
}

impl MemberHandle {
    /// The name of the underlying member
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MemberHandle::Method(m) => &m.name,
            MemberHandle::Field(f) => &f.name,
            MemberHandle::Property(p) => &p.name,
        }
    }

    /// The token of the underlying member
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            MemberHandle::Method(m) => m.token,
            MemberHandle::Field(f) => f.token,
            MemberHandle::Property(p) => p.token,
        }
    }

    /// The kind of the underlying member; constructors are distinguished from methods
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberHandle::Method(m) if m.is_constructor() => MemberKind::Constructor,
            MemberHandle::Method(_) => MemberKind::Method,
            MemberHandle::Field(_) => MemberKind::Field,
            MemberHandle::Property(_) => MemberKind::Property,
        }
    }

    /// Resolve the declaring type of the underlying member.
    ///
    /// # Errors
    /// Returns an error if the backlink was never attached or the type was dropped.
    pub fn declaring_type(&self) -> Result<TypeRc> {
        match self {
            MemberHandle::Method(m) => m.declaring_type(),
            MemberHandle::Field(f) => f.declaring_type(),
            MemberHandle::Property(p) => p.declaring_type(),
        }
    }
}
