//! Policy gate deciding which raw members are eligible for caching.
//!
//! Hosts hide members that are unsafe to touch from inside the process (teardown
//! entry points, native handle mutators) by injecting a [`MemberPolicy`] into the
//! enumeration call. The criteria are opaque to the enumeration core; it only
//! consults the boolean gate and silently skips denied candidates.

use dashmap::DashSet;

use crate::{inspect::signature::member_signature, runtime::member::MemberHandle};

/// Allow/deny gate consulted once per raw member candidate.
pub trait MemberPolicy {
    /// Return true to exclude the member from enumeration
    fn is_blacklisted(&self, member: &MemberHandle) -> bool;
}

/// The default policy: nothing is blacklisted.
pub struct AllowAll;

impl MemberPolicy for AllowAll {
    fn is_blacklisted(&self, _member: &MemberHandle) -> bool {
        false
    }
}

/// A deny-list keyed on member signatures.
///
/// Holds the same signature strings the dedup step derives, so a denied entry matches
/// exactly one logical member. Thread-safe; hosts typically fill it once at startup
/// from their configuration and share it across sessions.
#[derive(Default)]
pub struct SignatureBlocklist {
    denied: DashSet<String>,
}

impl SignatureBlocklist {
    /// Create an empty blocklist
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny a member by its signature string
    pub fn deny(&self, signature: impl Into<String>) {
        self.denied.insert(signature.into());
    }

    /// Number of denied signatures
    #[must_use]
    pub fn len(&self) -> usize {
        self.denied.len()
    }

    /// Check if the blocklist is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.denied.is_empty()
    }
}

impl MemberPolicy for SignatureBlocklist {
    fn is_blacklisted(&self, member: &MemberHandle) -> bool {
        // an unresolvable signature is dealt with by classification, not policy
        match member_signature(member) {
            Ok(signature) => self.denied.contains(&signature),
            Err(_) => false,
        }
    }
}
