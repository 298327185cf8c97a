//! The member enumeration core.
//!
//! Given a live object or a static type, this module produces the ordered, filtered,
//! deduplicated member list an inspector panel drills into. The pieces:
//!
//! - [`hierarchy`] - ancestor chain walking and declaring-type ranks
//! - [`signature`] - dedup signature derivation
//! - [`policy`] - the injected allow/deny gate
//! - [`session`] - inspection sessions and per-call collaborator bundling
//! - [`cache`] - the cache member data model and the enumeration factory
//!
//! The single entry point is [`cache::enumerate_members`].

/// The cache member data model and the enumeration factory.
pub mod cache;

/// Type hierarchy walking for member enumeration.
pub mod hierarchy;

/// Policy gate deciding which raw members are eligible for caching.
pub mod policy;

/// Inspection sessions and the per-call collaborator context.
pub mod session;

/// Signature derivation for member deduplication.
pub mod signature;
