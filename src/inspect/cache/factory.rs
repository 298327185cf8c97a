//! The member cache factory, the single entry point of the enumeration core.
//!
//! [`enumerate_members`] walks the declared type's ancestor chain, queries the raw
//! members declared at each level, pushes every candidate through the
//! filter/classify pipeline and returns one deterministically ordered list:
//!
//! 1. binding scope is composed from the session (public and non-public always,
//!    static always, instance unless the session is static-only);
//! 2. constructors are collected from the declared type only, and value types gain
//!    the synthetic implicit default constructor;
//! 3. each hierarchy level contributes the properties, fields and methods whose own
//!    declaring type is that level; promoted members are skipped by declaring-type
//!    identity, never by name;
//! 4. per candidate: policy gate, signature dedup, kind classification with accessor
//!    suppression and the write-only-property setter fallback;
//! 5. the four kind buckets are sorted by (declaring rank, filter name) and
//!    concatenated: properties, fields, constructors, methods.
//!
//! A candidate that fails anywhere in the pipeline is reported to the diagnostics
//! sink and dropped; the call itself always returns a valid, possibly partial, list.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    inspect::{
        cache::{CacheKind, CacheMember, CacheMemberList, CacheMemberRc},
        hierarchy::ancestor_chain,
        session::InspectContext,
        signature::member_signature,
    },
    runtime::{
        diagnostics::DiagnosticCategory,
        member::{BindingScope, MemberHandle, CTOR_NAME},
        object::ObjectHandle,
        token::Token,
        typesystem::TypeRc,
    },
    Error::TypeDropped,
    Result,
};

/// Enumerate the accessible members of `declared_type` for one inspection session.
///
/// `target` is the live instance when inspecting an object, absent when inspecting a
/// type; it is narrowed per hierarchy level and bound to each produced member when
/// narrowing succeeds. The returned list is exclusively owned by the caller, contains
/// no duplicate signatures, and is deterministic for fixed inputs. The call itself
/// never fails; dropped candidates are reported through `ctx.diagnostics`.
pub fn enumerate_members(
    target: Option<&ObjectHandle>,
    declared_type: &TypeRc,
    ctx: &InspectContext<'_>,
) -> CacheMemberList {
    let mut cached_sigs: HashSet<String> = HashSet::new();
    let mut props: Vec<CacheMemberRc> = Vec::new();
    let mut fields: Vec<CacheMemberRc> = Vec::new();
    let mut ctors: Vec<CacheMemberRc> = Vec::new();
    let mut methods: Vec<CacheMemberRc> = Vec::new();

    let chain = ancestor_chain(declared_type);

    let mut scope = BindingScope::NON_PUBLIC | BindingScope::PUBLIC | BindingScope::STATIC;
    if !ctx.session.static_only {
        scope |= BindingScope::INSTANCE;
    }

    if !declared_type.is_abstract() {
        // Constructors of the declared type only; a base type's constructors cannot
        // construct the derived type. The class constructor runs when the type is
        // first touched and is never listed.
        let ctor_scope = BindingScope::PUBLIC | BindingScope::NON_PUBLIC | BindingScope::INSTANCE;
        for ctor in declared_type.declared_constructors(ctor_scope) {
            try_cache_member(
                MemberHandle::Method(ctor),
                &mut ctors,
                &mut cached_sigs,
                None,
                ctx,
                true,
            );
        }

        // structs always have a parameterless constructor
        if declared_type.is_value_type() {
            let cached = CacheMember::new(
                declared_type,
                CTOR_NAME,
                CacheKind::Constructor { ctor: None },
            );
            cached.set_fallback_type(declared_type).ok();
            cached.set_owner(ctx.session).ok();
            ctors.push(Arc::new(cached));
        }
    }

    for level in &chain {
        let bound = if ctx.session.static_only {
            None
        } else {
            target.and_then(|handle| handle.try_cast(level))
        };

        for prop in level.properties_in_scope(scope) {
            if prop.declaring_token() == Some(level.token) {
                try_cache_member(
                    MemberHandle::Property(prop),
                    &mut props,
                    &mut cached_sigs,
                    bound.as_ref(),
                    ctx,
                    true,
                );
            }
        }

        for field in level.fields_in_scope(scope) {
            if field.declaring_token() == Some(level.token) {
                try_cache_member(
                    MemberHandle::Field(field),
                    &mut fields,
                    &mut cached_sigs,
                    bound.as_ref(),
                    ctx,
                    true,
                );
            }
        }

        for method in level.methods_in_scope(scope) {
            if method.declaring_token() == Some(level.token) {
                try_cache_member(
                    MemberHandle::Method(method),
                    &mut methods,
                    &mut cached_sigs,
                    bound.as_ref(),
                    ctx,
                    true,
                );
            }
        }
    }

    let ranks: HashMap<Token, usize> = chain
        .iter()
        .enumerate()
        .map(|(index, level)| (level.token, index))
        .collect();
    let unranked = chain.len();
    let rank = |member: &CacheMemberRc| {
        member
            .declaring_token()
            .and_then(|token| ranks.get(&token).copied())
            .unwrap_or(unranked)
    };

    let mut sorted: CacheMemberList =
        Vec::with_capacity(props.len() + fields.len() + ctors.len() + methods.len());
    for mut bucket in [props, fields, ctors, methods] {
        bucket.sort_by(|a, b| {
            rank(a)
                .cmp(&rank(b))
                .then_with(|| a.filter_name().cmp(b.filter_name()))
        });
        sorted.extend(bucket);
    }
    sorted
}

/// Run one candidate through the pipeline; a failure is logged and the candidate
/// dropped, never propagated.
fn try_cache_member(
    member: MemberHandle,
    bucket: &mut Vec<CacheMemberRc>,
    cached_sigs: &mut HashSet<String>,
    bound: Option<&ObjectHandle>,
    ctx: &InspectContext<'_>,
    ignore_accessors: bool,
) {
    let declaring = member
        .declaring_type()
        .map(|ty| ty.fullname())
        .unwrap_or_else(|_| "<unknown>".to_string());
    let name = member.name().to_string();

    if let Err(error) = cache_candidate(member, bucket, cached_sigs, bound, ctx, ignore_accessors) {
        ctx.diagnostics.warning(
            DiagnosticCategory::Member,
            format!("exception caching member {declaring}.{name}: {error}"),
        );
    }
}

fn cache_candidate(
    member: MemberHandle,
    bucket: &mut Vec<CacheMemberRc>,
    cached_sigs: &mut HashSet<String>,
    bound: Option<&ObjectHandle>,
    ctx: &InspectContext<'_>,
    ignore_accessors: bool,
) -> Result<()> {
    if ctx.policy.is_blacklisted(&member) {
        return Ok(());
    }

    let signature = member_signature(&member)?;
    if cached_sigs.contains(&signature) {
        return Ok(());
    }

    let declaring = member.declaring_type()?;

    let (kind, fallback) = match &member {
        MemberHandle::Method(method) if method.is_constructor() => (
            CacheKind::Constructor {
                ctor: Some(method.clone()),
            },
            declaring.clone(),
        ),

        MemberHandle::Method(method) => {
            if ignore_accessors && method.is_accessor() {
                return Ok(());
            }

            let returns = method
                .return_type
                .upgrade()
                .ok_or_else(|| TypeDropped(format!("return type of '{}'", method.name)))?;
            (
                CacheKind::Method {
                    method: method.clone(),
                },
                returns,
            )
        }

        MemberHandle::Property(property) => {
            if !property.can_read() && property.can_write() {
                // write-only property, cache the set method instead
                if let Some(setter) = property.setter() {
                    cache_candidate(
                        MemberHandle::Method(setter),
                        bucket,
                        cached_sigs,
                        bound,
                        ctx,
                        false,
                    )?;
                }
                return Ok(());
            }
            if !property.can_read() {
                return Err(member_error!(
                    "property '{}' has no accessors",
                    property.name
                ));
            }

            let property_type = property
                .property_type
                .upgrade()
                .ok_or_else(|| TypeDropped(format!("type of property '{}'", property.name)))?;
            (
                CacheKind::Property {
                    property: property.clone(),
                },
                property_type,
            )
        }

        MemberHandle::Field(field) => {
            let field_type = field
                .field_type
                .upgrade()
                .ok_or_else(|| TypeDropped(format!("type of field '{}'", field.name)))?;
            (
                CacheKind::Field {
                    field: field.clone(),
                },
                field_type,
            )
        }
    };

    cached_sigs.insert(signature);

    let cached = CacheMember::new(&declaring, member.name(), kind);
    cached.set_fallback_type(&fallback)?;
    cached.set_owner(ctx.session)?;
    if let Some(bound) = bound {
        cached.set_target(bound.clone())?;
    }

    bucket.push(Arc::new(cached));
    Ok(())
}
