//! Cached member wrappers produced by enumeration.
//!
//! A [`CacheMember`] is one row of an inspector panel: a classified member with enough
//! resolved metadata to later read, write or invoke it against a bound target. The
//! four kinds are a closed set, [`CacheKind`], so downstream handling stays
//! exhaustive at compile time.
//!
//! Cache members are created fresh on every enumeration and owned exclusively by the
//! caller. Everything they point back to (declaring type, fallback type, owning
//! session) is held weakly and bound exactly once; a member can never extend the
//! lifetime of the session or the mirrored image that produced it.
//!
//! # Key Components
//!
//! - [`CacheMember`] - The wrapper record with set-once bindings
//! - [`CacheKind`] - Closed tagged union over the four member kinds
//! - [`enumerate_members`] - The factory producing ordered member lists

mod factory;

use std::sync::{Arc, OnceLock};

pub use factory::enumerate_members;

use crate::{
    inspect::session::{SessionRc, SessionRef},
    runtime::{
        member::{FieldRc, MemberKind, MethodRc, PropertyRc},
        object::ObjectHandle,
        token::Token,
        typesystem::{TypeRc, TypeRef},
    },
    Error::AlreadyBound,
    Result,
};

/// A reference to a cached member
pub type CacheMemberRc = Arc<CacheMember>;
/// The ordered result of one enumeration call
pub type CacheMemberList = Vec<CacheMemberRc>;

/// The classified payload of a cached member.
///
/// The constructor variant's raw handle is optional: value types carry an implicit
/// parameterless constructor the runtime declares nowhere, represented here with no
/// handle at all.
pub enum CacheKind {
    /// An instance constructor; `None` marks the synthetic value-type default
    Constructor {
        /// The wrapped constructor method, absent for the synthetic default
        ctor: Option<MethodRc>,
    },
    /// A regular (non-accessor) method
    Method {
        /// The wrapped method
        method: MethodRc,
    },
    /// A readable property
    Property {
        /// The wrapped property
        property: PropertyRc,
    },
    /// A field
    Field {
        /// The wrapped field
        field: FieldRc,
    },
}

impl CacheKind {
    /// The kind tag of this payload
    #[must_use]
    pub fn member_kind(&self) -> MemberKind {
        match self {
            CacheKind::Constructor { .. } => MemberKind::Constructor,
            CacheKind::Method { .. } => MemberKind::Method,
            CacheKind::Property { .. } => MemberKind::Property,
            CacheKind::Field { .. } => MemberKind::Field,
        }
    }

    /// Whether a raw metadata handle is present
    #[must_use]
    pub fn has_raw_handle(&self) -> bool {
        !matches!(self, CacheKind::Constructor { ctor: None })
    }
}

/// One classified, cacheable member of an inspected type.
///
/// The fallback type is the static type shown when no live value can be obtained: the
/// property's declared type, the field's type, the method's return type, or the
/// constructor's declaring type. The bound target, when present, is the live instance
/// narrowed to this member's declaring level.
pub struct CacheMember {
    /// The type this member is declared on
    declaring_type: TypeRef,
    /// The member's own name
    name: String,
    /// `DeclaringName.MemberName`, the key the UI filters and sorts on
    filter_name: String,
    /// Classified payload
    kind: CacheKind,
    /// The static type used when a live value cannot be obtained, bound once
    fallback_type: OnceLock<TypeRef>,
    /// The owning inspection session, bound once
    owner: OnceLock<SessionRef>,
    /// The live instance narrowed to the declaring level, bound once if narrowing succeeded
    target: OnceLock<ObjectHandle>,
}

impl CacheMember {
    /// Create a new unbound cache member
    pub fn new(declaring_type: &TypeRc, name: impl Into<String>, kind: CacheKind) -> Self {
        let name = name.into();
        Self {
            filter_name: format!("{}.{}", declaring_type.name, name),
            declaring_type: TypeRef::new(declaring_type),
            name,
            kind,
            fallback_type: OnceLock::new(),
            owner: OnceLock::new(),
            target: OnceLock::new(),
        }
    }

    /// The member's own name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `DeclaringName.MemberName`, used for filtering and as the sort tiebreaker
    #[must_use]
    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    /// The classified payload
    #[must_use]
    pub fn kind(&self) -> &CacheKind {
        &self.kind
    }

    /// The kind tag of this member
    #[must_use]
    pub fn member_kind(&self) -> MemberKind {
        self.kind.member_kind()
    }

    /// The declaring type, if still alive
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        self.declaring_type.upgrade()
    }

    /// Token of the declaring type, if still alive
    #[must_use]
    pub fn declaring_token(&self) -> Option<Token> {
        self.declaring_type.token()
    }

    /// Bind the fallback type.
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyBound`] on a second bind.
    pub fn set_fallback_type(&self, ty: &TypeRc) -> Result<()> {
        self.fallback_type
            .set(TypeRef::new(ty))
            .map_err(|_| AlreadyBound("fallback type"))
    }

    /// The bound fallback type, if bound and still alive
    #[must_use]
    pub fn fallback_type(&self) -> Option<TypeRc> {
        self.fallback_type.get().and_then(TypeRef::upgrade)
    }

    /// Bind the owning session.
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyBound`] on a second bind.
    pub fn set_owner(&self, session: &SessionRc) -> Result<()> {
        self.owner
            .set(SessionRef::new(session))
            .map_err(|_| AlreadyBound("owner session"))
    }

    /// The owning session, if bound and still open
    #[must_use]
    pub fn owner(&self) -> Option<SessionRc> {
        self.owner.get().and_then(SessionRef::upgrade)
    }

    /// Bind the narrowed live target.
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyBound`] on a second bind.
    pub fn set_target(&self, target: ObjectHandle) -> Result<()> {
        self.target
            .set(target)
            .map_err(|_| AlreadyBound("bound target"))
    }

    /// The narrowed live target, when per-level narrowing succeeded
    #[must_use]
    pub fn target(&self) -> Option<&ObjectHandle> {
        self.target.get()
    }

    /// Whether this member wraps a raw metadata handle
    #[must_use]
    pub fn has_raw_handle(&self) -> bool {
        self.kind.has_raw_handle()
    }
}
