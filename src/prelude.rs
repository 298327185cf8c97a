//! # monoscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the monoscope library. Import this module to get quick access to the
//! essential types for live member enumeration.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all monoscope operations
pub use crate::Error;

/// The result type used throughout monoscope
pub use crate::Result;

// ================================================================================================
// Main Entry Point
// ================================================================================================

/// The member enumeration entry point
pub use crate::inspect::cache::enumerate_members;

/// Cached member wrappers produced by enumeration
pub use crate::inspect::cache::{CacheKind, CacheMember, CacheMemberList, CacheMemberRc};

// ================================================================================================
// Inspection Collaborators
// ================================================================================================

/// Sessions and the per-call collaborator context
pub use crate::inspect::session::{InspectContext, InspectionSession, SessionRc, SessionRef};

/// Policy gate implementations
pub use crate::inspect::policy::{AllowAll, MemberPolicy, SignatureBlocklist};

/// Hierarchy walking helpers
pub use crate::inspect::hierarchy::{ancestor_chain, rank_of};

/// Signature derivation
pub use crate::inspect::signature::{member_signature, method_description};

// ================================================================================================
// Mirrored Runtime Image
// ================================================================================================

/// Metadata token type for referencing mirrored types and members
pub use crate::runtime::token::Token;

/// Core type system components
pub use crate::runtime::typesystem::{
    RuntimeType, TypeAttributes, TypeBuilder, TypeFlavor, TypeRc, TypeRef, TypeRegistry,
};

/// Raw member descriptors and binding scope
pub use crate::runtime::member::{
    BindingScope, Field, FieldAttributes, FieldRc, MemberHandle, MemberKind, Method,
    MethodAccessFlags, MethodModifiers, MethodRc, Param, Property, PropertyAttributes, PropertyRc,
};

/// Live object handles
pub use crate::runtime::object::ObjectHandle;

/// Diagnostics sink and entry types
pub use crate::runtime::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};
