//! Integration tests for the member enumeration core.
//!
//! These tests mirror small game-like hierarchies the way a host adapter would and
//! verify the observable contract of `enumerate_members`: signature uniqueness,
//! deterministic ordering, rank partitioning, accessor suppression, the write-only
//! setter fallback, per-member fault isolation and static-only binding.

use std::sync::Arc;

use monoscope::prelude::*;

/// Mirror the standard two-level hierarchy used by most tests:
/// `Game.Entity : System.Object` and `Game.Player : Game.Entity`.
fn mirror_world(registry: &Arc<TypeRegistry>) -> (TypeRc, TypeRc) {
    let int32 = registry.get_primitive(TypeFlavor::I4).unwrap();
    let string = registry.get_primitive(TypeFlavor::String).unwrap();

    let entity = TypeBuilder::new(registry)
        .namespace("Game")
        .class("Entity")
        .field("health", &int32, FieldAttributes::PUBLIC)
        .field("seed", &int32, FieldAttributes::PRIVATE)
        .field(
            "instanceCount",
            &int32,
            FieldAttributes::PUBLIC | FieldAttributes::STATIC,
        )
        .property("Name", &string, |p| p)
        .method("Update", |m| m)
        .method("Greet", |m| m.parameter("count", &int32).returns(&string))
        .method("Version", |m| m.static_().returns(&int32))
        .constructor(|c| c.parameter("id", &int32))
        .build()
        .unwrap();

    let player = TypeBuilder::new(registry)
        .namespace("Game")
        .class("Player")
        .base(&entity)
        .field("score", &int32, FieldAttributes::PUBLIC)
        .property("Health", &int32, |p| p)
        .method("Greet", |m| {
            m.parameter("count", &int32)
                .parameter("greeting", &string)
                .returns(&string)
        })
        .constructor(|c| c)
        .build()
        .unwrap();

    (entity, player)
}

/// Reconstruct the dedup signature of a cached member from its raw handle.
fn signature_of(member: &CacheMemberRc) -> String {
    match member.kind() {
        CacheKind::Constructor { ctor: Some(ctor) } => method_description(ctor).unwrap(),
        CacheKind::Constructor { ctor: None } => {
            format!("<default> {}", member.filter_name())
        }
        CacheKind::Method { method } => method_description(method).unwrap(),
        CacheKind::Property { property } => member_signature(&MemberHandle::Property(
            property.clone(),
        ))
        .unwrap(),
        CacheKind::Field { field } => {
            member_signature(&MemberHandle::Field(field.clone())).unwrap()
        }
    }
}

fn raw_is_static(member: &CacheMemberRc) -> Option<bool> {
    match member.kind() {
        CacheKind::Constructor { .. } => None,
        CacheKind::Method { method } => Some(method.is_static()),
        CacheKind::Property { property } => Some(property.is_static()),
        CacheKind::Field { field } => Some(field.is_static()),
    }
}

#[test]
fn no_two_entries_share_a_signature() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);
    assert!(!members.is_empty());

    let mut seen = std::collections::HashSet::new();
    for member in &members {
        assert!(
            seen.insert(signature_of(member)),
            "duplicate signature for {}",
            member.filter_name()
        );
    }
}

#[test]
fn repeated_calls_return_identical_order() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let first: Vec<_> = enumerate_members(None, &player, &ctx)
        .iter()
        .map(|m| (m.filter_name().to_string(), m.member_kind()))
        .collect();
    let second: Vec<_> = enumerate_members(None, &player, &ctx)
        .iter()
        .map(|m| (m.filter_name().to_string(), m.member_kind()))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn buckets_are_ordered_and_rank_partitioned() {
    let registry = Arc::new(TypeRegistry::new());
    let (entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);
    let chain = ancestor_chain(&player);

    // fixed bucket order: properties, fields, constructors, methods
    let bucket_index = |kind: MemberKind| match kind {
        MemberKind::Property => 0,
        MemberKind::Field => 1,
        MemberKind::Constructor => 2,
        MemberKind::Method => 3,
    };
    let mut previous_bucket = 0;
    let mut previous_rank = 0;
    for member in &members {
        let bucket = bucket_index(member.member_kind());
        assert!(bucket >= previous_bucket, "bucket order violated");
        let rank = rank_of(&chain, member.declaring_token().unwrap());
        if bucket == previous_bucket {
            assert!(rank >= previous_rank, "rank order violated within bucket");
        }
        previous_bucket = bucket;
        previous_rank = rank;
    }

    // members declared on Player strictly precede Entity's within each bucket
    let field_names: Vec<_> = members
        .iter()
        .filter(|m| m.member_kind() == MemberKind::Field)
        .map(|m| m.filter_name().to_string())
        .collect();
    assert_eq!(
        field_names,
        vec![
            "Player.score",
            "Entity.health",
            "Entity.instanceCount",
            "Entity.seed"
        ]
    );

    let method_names: Vec<_> = members
        .iter()
        .filter(|m| m.member_kind() == MemberKind::Method)
        .map(|m| m.filter_name().to_string())
        .collect();
    assert_eq!(
        method_names,
        vec![
            "Player.Greet",
            "Entity.Greet",
            "Entity.Update",
            "Entity.Version"
        ]
    );

    assert!(members
        .iter()
        .all(|m| m.declaring_token() != Some(entity.token)
            || m.member_kind() != MemberKind::Constructor));
}

#[test]
fn value_type_gains_exactly_one_synthetic_default_constructor() {
    let registry = Arc::new(TypeRegistry::new());
    let r4 = registry.get_primitive(TypeFlavor::R4).unwrap();

    let vec2 = TypeBuilder::new(&registry)
        .namespace("Game")
        .value_type("Vec2")
        .field("x", &r4, FieldAttributes::PUBLIC)
        .field("y", &r4, FieldAttributes::PUBLIC)
        .build()
        .unwrap();

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &vec2, &ctx);
    let ctors: Vec<_> = members
        .iter()
        .filter(|m| m.member_kind() == MemberKind::Constructor)
        .collect();

    assert_eq!(ctors.len(), 1);
    assert!(!ctors[0].has_raw_handle());
    assert_eq!(ctors[0].fallback_type().unwrap().token, vec2.token);
}

#[test]
fn value_type_keeps_synthetic_constructor_next_to_explicit_ones() {
    let registry = Arc::new(TypeRegistry::new());
    let r4 = registry.get_primitive(TypeFlavor::R4).unwrap();

    let vec3 = TypeBuilder::new(&registry)
        .namespace("Game")
        .value_type("Vec3")
        .constructor(|c| c.parameter("x", &r4).parameter("y", &r4).parameter("z", &r4))
        .build()
        .unwrap();

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &vec3, &ctx);
    let ctors: Vec<_> = members
        .iter()
        .filter(|m| m.member_kind() == MemberKind::Constructor)
        .collect();

    assert_eq!(ctors.len(), 2);
    assert_eq!(ctors.iter().filter(|m| !m.has_raw_handle()).count(), 1);
}

#[test]
fn write_only_property_surfaces_its_setter_instead() {
    let registry = Arc::new(TypeRegistry::new());
    let string = registry.get_primitive(TypeFlavor::String).unwrap();

    let config = TypeBuilder::new(&registry)
        .namespace("Game")
        .class("Config")
        .property("Password", &string, |p| p.write_only())
        .build()
        .unwrap();

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &config, &ctx);

    assert!(members
        .iter()
        .all(|m| m.member_kind() != MemberKind::Property));

    let setters: Vec<_> = members
        .iter()
        .filter(|m| m.name() == "set_Password")
        .collect();
    assert_eq!(setters.len(), 1);
    assert_eq!(setters[0].member_kind(), MemberKind::Method);
    assert!(!diagnostics.has_any());
}

#[test]
fn readable_property_suppresses_its_accessor_pair() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);

    assert!(members
        .iter()
        .all(|m| !m.name().starts_with("get_") && !m.name().starts_with("set_")));
    assert_eq!(
        members
            .iter()
            .filter(|m| m.member_kind() == MemberKind::Property && m.name() == "Name")
            .count(),
        1
    );
}

#[test]
fn broken_member_drops_alone_and_is_logged() {
    let registry = Arc::new(TypeRegistry::new());
    let int32 = registry.get_primitive(TypeFlavor::I4).unwrap();

    let probe = TypeBuilder::new(&registry)
        .namespace("Game")
        .class("Probe")
        .field("a", &int32, FieldAttributes::PUBLIC)
        .field("b", &int32, FieldAttributes::PUBLIC)
        .field("c", &int32, FieldAttributes::PUBLIC)
        .method("Run", |m| m)
        .property("State", &int32, |p| p)
        .build()
        .unwrap();

    // a field whose value type was unloaded from under it
    let broken = {
        let ghost = Arc::new(RuntimeType::new(
            Token::new(0x0200FF00),
            TypeFlavor::Class,
            "Game".to_string(),
            "Ghost".to_string(),
            None,
            TypeAttributes::PUBLIC,
        ));
        Arc::new(Field::new(
            Token::new(0x0400FF00),
            "broken",
            FieldAttributes::PUBLIC,
            TypeRef::new(&ghost),
        ))
    };
    broken.set_declaring(&probe);
    probe.fields.push(broken);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &probe, &ctx);

    // 3 fields + 1 method + 1 property survive; the broken field is gone
    assert_eq!(members.len(), 5);
    assert!(members.iter().all(|m| m.name() != "broken"));

    assert!(diagnostics.has_warnings());
    assert!(diagnostics
        .iter()
        .any(|d| d.message.contains("Game.Probe.broken")));
}

#[test]
fn static_only_excludes_instance_members_across_the_chain() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let session = InspectionSession::new_static();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);

    for member in &members {
        if let Some(is_static) = raw_is_static(member) {
            assert!(is_static, "instance member {} leaked", member.filter_name());
        }
    }

    // ancestor statics are included
    assert!(members.iter().any(|m| m.name() == "instanceCount"));
    assert!(members.iter().any(|m| m.name() == "Version"));
    assert!(members.iter().all(|m| m.name() != "health"));
}

#[test]
fn shadowing_with_distinct_parameter_lists_keeps_both_derived_first() {
    let registry = Arc::new(TypeRegistry::new());
    let (entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);

    assert_eq!(members.iter().filter(|m| m.name() == "Greet").count(), 2);

    let player_index = members
        .iter()
        .position(|m| m.name() == "Greet" && m.declaring_token() == Some(player.token))
        .unwrap();
    let entity_index = members
        .iter()
        .position(|m| m.name() == "Greet" && m.declaring_token() == Some(entity.token))
        .unwrap();

    assert!(player_index < entity_index);
    if let CacheKind::Method { method } = members[player_index].kind() {
        assert_eq!(method.params.len(), 2);
    } else {
        panic!("expected a method entry");
    }
}

#[test]
fn live_target_is_narrowed_per_declaring_level() {
    let registry = Arc::new(TypeRegistry::new());
    let (entity, player) = mirror_world(&registry);

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let handle = ObjectHandle::new(&player, 0xAB00);
    let members = enumerate_members(Some(&handle), &player, &ctx);

    for member in &members {
        if member.member_kind() == MemberKind::Constructor {
            assert!(member.target().is_none());
            continue;
        }
        let target = member.target().expect("instance member lost its target");
        assert_eq!(target.address(), 0xAB00);
        assert_eq!(
            target.runtime_type().unwrap().token,
            member.declaring_token().unwrap()
        );
    }

    assert!(members
        .iter()
        .any(|m| m.declaring_token() == Some(entity.token) && m.target().is_some()));
}

#[test]
fn static_only_never_binds_a_target() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let session = InspectionSession::new_static();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let handle = ObjectHandle::new(&player, 0xAB00);
    let members = enumerate_members(Some(&handle), &player, &ctx);

    assert!(!members.is_empty());
    assert!(members.iter().all(|m| m.target().is_none()));
}

#[test]
fn blacklisted_members_are_silently_skipped() {
    let registry = Arc::new(TypeRegistry::new());
    let (_entity, player) = mirror_world(&registry);

    let blocklist = SignatureBlocklist::new();
    blocklist.deny("Game.Entity.health");

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &blocklist, &diagnostics);

    let members = enumerate_members(None, &player, &ctx);

    assert!(members.iter().all(|m| m.name() != "health"));
    assert!(members.iter().any(|m| m.name() == "score"));
    assert!(!diagnostics.has_any());
}

#[test]
fn duplicated_raw_descriptor_is_deduplicated() {
    let registry = Arc::new(TypeRegistry::new());
    let int32 = registry.get_primitive(TypeFlavor::I4).unwrap();

    let glitch = TypeBuilder::new(&registry)
        .namespace("Game")
        .class("Glitch")
        .field("twice", &int32, FieldAttributes::PUBLIC)
        .build()
        .unwrap();

    // a hostile image can surface the same descriptor more than once
    let (_, original) = glitch.fields.iter().next().unwrap();
    glitch.fields.push(original.clone());

    let session = InspectionSession::new();
    let diagnostics = Diagnostics::new();
    let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);

    let members = enumerate_members(None, &glitch, &ctx);
    assert_eq!(
        members.iter().filter(|m| m.name() == "twice").count(),
        1
    );
}
