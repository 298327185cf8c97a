use std::sync::{Arc, Weak};

use crate::{
    inspect::policy::MemberPolicy,
    runtime::diagnostics::Diagnostics,
};

/// Reference to an `InspectionSession`
pub type SessionRc = Arc<InspectionSession>;

/// One open inspection of a target object or type.
///
/// The session is the owner of every cache member produced for it; members hold a weak
/// [`SessionRef`] back to it and never extend its lifetime. Beyond the static-only
/// flag the engine treats the session as opaque.
pub struct InspectionSession {
    /// Inspecting a type rather than a live instance; instance members are excluded
    pub static_only: bool,
}

impl InspectionSession {
    /// Open a session for inspecting a live instance or a type with instance members
    #[must_use]
    pub fn new() -> SessionRc {
        Arc::new(Self { static_only: false })
    }

    /// Open a session for inspecting only the static side of a type
    #[must_use]
    pub fn new_static() -> SessionRc {
        Arc::new(Self { static_only: true })
    }
}

/// A weak reference to the owning [`InspectionSession`], stored on every cache member.
#[derive(Clone)]
pub struct SessionRef {
    weak_ref: Weak<InspectionSession>,
}

impl SessionRef {
    /// Create a new `SessionRef` from a strong reference
    pub fn new(strong_ref: &SessionRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the session, returning None if it has been closed
    #[must_use]
    pub fn upgrade(&self) -> Option<SessionRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced session is still open
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }
}

impl From<SessionRc> for SessionRef {
    fn from(strong_ref: SessionRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// The collaborators injected into one enumeration call.
///
/// Bundles the owning session with the policy gate and the diagnostics sink so the
/// factory depends on interfaces, not on process-wide state.
pub struct InspectContext<'a> {
    /// The owning session, attached to every produced cache member
    pub session: &'a SessionRc,
    /// Policy gate consulted per raw candidate
    pub policy: &'a dyn MemberPolicy,
    /// Sink receiving per-member classification failures
    pub diagnostics: &'a Diagnostics,
}

impl<'a> InspectContext<'a> {
    /// Bundle a session with its collaborators for one enumeration call
    pub fn new(
        session: &'a SessionRc,
        policy: &'a dyn MemberPolicy,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            session,
            policy,
            diagnostics,
        }
    }
}
