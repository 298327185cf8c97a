//! The mirrored image of the embedded runtime.
//!
//! Everything the enumeration core knows about the host process lives here: the type
//! graph ([`typesystem`]), the raw member descriptors ([`member`]), handles to live
//! objects ([`object`]), the token scheme ([`token`]) and the diagnostics sink
//! ([`diagnostics`]). Host adapters fill this image from the embedded runtime's
//! reflection surface; the inspection side only ever reads it.

/// Diagnostics collection, the injected logging sink of the enumeration core.
pub mod diagnostics;

/// Raw member descriptors (methods, fields, properties) and binding scope.
pub mod member;

/// Handles to live objects in the host process, with safe ancestor narrowing.
pub mod object;

/// Metadata tokens identifying mirrored types and members.
pub mod token;

/// The mirrored type graph: types, registry, builder and weak references.
pub mod typesystem;
