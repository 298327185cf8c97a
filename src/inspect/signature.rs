//! Signature derivation for member deduplication.
//!
//! A signature is the string key that identifies a logical member across hierarchy
//! levels: two members with equal signatures are the same member and must not both
//! appear in one enumeration result. Invocable members use their full qualified
//! description including return, declaring and parameter types; fields and properties
//! use declaring fullname plus member name.
//!
//! Signatures are derived, never stored; every enumeration call recomputes them into
//! its local dedup set.

use crate::{
    runtime::member::{MemberHandle, Method},
    Error::TypeDropped,
    Result,
};

/// Derive the dedup signature for any raw member candidate.
///
/// # Errors
/// Fails when the declaring type or one of the involved type references can no longer
/// be resolved; callers treat that as a classification failure for this candidate.
pub fn member_signature(member: &MemberHandle) -> Result<String> {
    match member {
        MemberHandle::Method(method) => method_description(method),
        MemberHandle::Field(field) => {
            let declaring = field.declaring_type()?;
            Ok(format!("{}.{}", declaring.fullname(), field.name))
        }
        MemberHandle::Property(property) => {
            let declaring = property.declaring_type()?;
            Ok(format!("{}.{}", declaring.fullname(), property.name))
        }
    }
}

/// The full qualified description of a method or constructor:
/// `Return Declaring::Name(Param1, Param2)`.
///
/// # Errors
/// Fails when the declaring, return or a parameter type can no longer be resolved.
pub fn method_description(method: &Method) -> Result<String> {
    let declaring = method.declaring_type()?;
    let return_type = method
        .return_type
        .fullname()
        .ok_or_else(|| TypeDropped(format!("return type of '{}'", method.name)))?;

    let mut params = Vec::with_capacity(method.params.len());
    for param in &method.params {
        params.push(param.ty.fullname().ok_or_else(|| {
            TypeDropped(format!("parameter '{}' of '{}'", param.name, method.name))
        })?);
    }

    Ok(format!(
        "{return_type} {}::{}({})",
        declaring.fullname(),
        method.name,
        params.join(", ")
    ))
}
