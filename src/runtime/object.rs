//! Handles to live objects in the host process.
//!
//! An [`ObjectHandle`] pairs the address of a live object with a weak reference to its
//! concrete runtime type. Handles are views, not owners: dropping a handle does
//! nothing to the object, and a handle whose type has been unloaded simply stops
//! resolving.

use crate::runtime::typesystem::{TypeRc, TypeRef};

/// A view of one live object in the host process.
///
/// `try_cast` produces narrowed views of the same object for ancestor levels during
/// enumeration; the address never changes, only the static type of the view.
#[derive(Clone, Debug)]
pub struct ObjectHandle {
    /// The static type of this view of the object
    runtime_type: TypeRef,
    /// Address of the object in the host process
    address: u64,
}

impl ObjectHandle {
    /// Create a handle for a live object of the given concrete type
    pub fn new(runtime_type: &TypeRc, address: u64) -> Self {
        Self {
            runtime_type: TypeRef::new(runtime_type),
            address,
        }
    }

    /// The static type of this view, if still alive
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeRc> {
        self.runtime_type.upgrade()
    }

    /// Address of the object in the host process
    #[must_use]
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Attempt to narrow this view to an ancestor type.
    ///
    /// Succeeds when `target` appears in the view type's ancestor chain; fails safely
    /// with `None` when it does not, or when the view type is no longer alive. Callers
    /// that receive `None` fall back to the member's static fallback type.
    #[must_use]
    pub fn try_cast(&self, target: &TypeRc) -> Option<ObjectHandle> {
        let own_type = self.runtime_type.upgrade()?;

        own_type.derives_from(target.token).then(|| ObjectHandle {
            runtime_type: TypeRef::new(target),
            address: self.address,
        })
    }
}
