use thiserror::Error;

use crate::runtime::token::Token;

macro_rules! member_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::MissingMetadata {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MissingMetadata {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while mirroring a runtime
/// image, classifying members, and binding cache entries. Each variant provides specific
/// context about the failure mode to enable appropriate error handling.
///
/// Note that member enumeration itself never surfaces these errors to the caller: a candidate
/// that fails classification is reported to the injected [`crate::runtime::diagnostics::Diagnostics`]
/// sink and dropped, and enumeration continues (see
/// [`crate::inspect::cache::enumerate_members`]). The variants below are what those internal
/// classification steps produce, and what the registry/builder surface directly.
///
/// # Error Categories
///
/// ## Member Classification Errors
/// - [`Error::MissingMetadata`] - A metadata link that must be present was never attached
/// - [`Error::TypeDropped`] - A weak type reference no longer upgrades
/// - [`Error::AlreadyBound`] - A set-once cache member binding was set twice
///
/// ## Type Registry Errors
/// - [`Error::TypeInsert`] - Failed to register new type in the registry
/// - [`Error::TypeNotFound`] - Requested type not found in the registry
///
/// # Examples
///
/// ```rust
/// use monoscope::{Error, runtime::typesystem::{TypeRegistry, TypeFlavor}};
///
/// let registry = TypeRegistry::new();
/// match registry.get_primitive(TypeFlavor::I4) {
///     Ok(int32) => println!("Int32 is {}", int32.fullname()),
///     Err(Error::TypeNotFound(token)) => eprintln!("missing primitive: {token}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A metadata link that must be present was never attached.
    ///
    /// Raw member descriptors are created first and attached to their declaring type
    /// afterwards; a descriptor that reaches classification without that backlink (or
    /// with another set-once link still unset) produces this error. The error includes
    /// the source location where the gap was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of which link was missing
    /// * `file` - Source file in which the gap was detected
    /// * `line` - Source line in which the gap was detected
    #[error("Missing metadata - {file}:{line}: {message}")]
    MissingMetadata {
        /// The message to be printed for the missing link
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A weak type reference no longer upgrades.
    ///
    /// The runtime image holds member-to-type links as weak references so cache entries
    /// can never extend a type's lifetime. When the host unloads a type mid-inspection,
    /// resolving such a link fails with this error. The associated value names what was
    /// being resolved.
    #[error("Type reference for '{0}' is no longer alive")]
    TypeDropped(String),

    /// A set-once binding on a cache member was set a second time.
    ///
    /// Fallback type, owner session, and narrowed target are bound exactly once per
    /// enumeration. The associated value names the binding that was already set.
    #[error("{0} is already bound for this cache member")]
    AlreadyBound(&'static str),

    /// Failed to insert new type into the `TypeRegistry`.
    ///
    /// This error occurs when attempting to register a type whose token is already
    /// present in the registry.
    ///
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// Failed to find type in the `TypeRegistry`.
    ///
    /// This error occurs when looking up a type by token that doesn't exist in the
    /// mirrored runtime image.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(Token),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for wrapping host
    /// adapter failures with additional context.
    #[error("{0}")]
    Error(String),
}
