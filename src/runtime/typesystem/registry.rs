//! Central type registry for mirrored runtime images.
//!
//! This module provides the `TypeRegistry`, the strong owner of every [`RuntimeType`]
//! in a mirrored image. All other references to types (base links, member value
//! types, declaring-type backlinks, cache entries) are weak; when a registry is
//! dropped, the whole image goes with it and any surviving cache members start
//! reporting dead references instead of leaking the image.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: primary index using metadata tokens (`SkipMap`)
//! - **Name-based lookup**: secondary indices for full names and simple names (`DashMap`)
//! - **Token allocation**: atomic counters for artificial type and member tokens
//!
//! # Primitive Types
//!
//! A fresh registry comes seeded with the runtime's root types (`System.Object`,
//! `System.ValueType`) and the primitive types (`System.Int32`, `System.String`, ...),
//! so host adapters can parent their mirrored hierarchies without mirroring the
//! core library itself.
//!
//! # Examples
//!
//! ```rust
//! use monoscope::runtime::typesystem::{TypeRegistry, TypeFlavor};
//!
//! let registry = TypeRegistry::new();
//!
//! let int32 = registry.get_primitive(TypeFlavor::I4)?;
//! assert_eq!(int32.fullname(), "System.Int32");
//!
//! let object = registry.get_by_fullname("System.Object").unwrap();
//! assert!(object.base().is_none());
//! # Ok::<(), monoscope::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    runtime::{
        token::Token,
        typesystem::{RuntimeType, TypeAttributes, TypeFlavor, TypeRc},
    },
    Error::{TypeInsert, TypeNotFound},
    Result,
};

/// First artificial token handed out for mirrored types; the range below is
/// reserved for the seeded primitives.
const FIRST_ARTIFICIAL_TOKEN: u32 = 0xF000_0020;

/// The seeded primitive set: flavor, namespace-local name, and whether the
/// type parents off `System.ValueType` (otherwise `System.Object`).
const PRIMITIVES: &[(TypeFlavor, &str, bool)] = &[
    (TypeFlavor::Void, "Void", true),
    (TypeFlavor::Boolean, "Boolean", true),
    (TypeFlavor::Char, "Char", true),
    (TypeFlavor::I1, "SByte", true),
    (TypeFlavor::U1, "Byte", true),
    (TypeFlavor::I2, "Int16", true),
    (TypeFlavor::U2, "UInt16", true),
    (TypeFlavor::I4, "Int32", true),
    (TypeFlavor::U4, "UInt32", true),
    (TypeFlavor::I8, "Int64", true),
    (TypeFlavor::U8, "UInt64", true),
    (TypeFlavor::R4, "Single", true),
    (TypeFlavor::R8, "Double", true),
    (TypeFlavor::I, "IntPtr", true),
    (TypeFlavor::U, "UIntPtr", true),
    (TypeFlavor::String, "String", false),
];

/// Central registry managing all types of one mirrored runtime image.
///
/// The registry is the only strong owner of [`RuntimeType`] instances. It is safe to
/// share across threads; all indices use lock-free structures.
pub struct TypeRegistry {
    /// Primary type storage indexed by metadata tokens
    types: SkipMap<Token, TypeRc>,
    /// Atomic counter for generating unique artificial tokens for new types
    next_token: AtomicU32,
    /// Atomic row counter for member token allocation, shared across member tables
    next_member_row: AtomicU32,
    /// Secondary index: types indexed by full name (namespace.name)
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Secondary index: types indexed by simple name (may have duplicates)
    types_by_name: DashMap<String, Vec<Token>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new type registry with initialized primitive types.
    #[must_use]
    pub fn new() -> Self {
        let registry = TypeRegistry {
            types: SkipMap::new(),
            next_token: AtomicU32::new(FIRST_ARTIFICIAL_TOKEN),
            next_member_row: AtomicU32::new(1),
            types_by_fullname: DashMap::new(),
            types_by_name: DashMap::new(),
        };
        registry.seed_primitives();
        registry
    }

    fn seed_primitives(&self) {
        let mut reserved = 1_u32;
        let mut seed = |flavor: TypeFlavor, name: &str, base: Option<TypeRc>| -> TypeRc {
            let ty = Arc::new(RuntimeType::new(
                Token::new(0xF000_0000 | reserved),
                flavor,
                "System".to_string(),
                name.to_string(),
                base,
                TypeAttributes::PUBLIC,
            ));
            reserved += 1;
            // seeding into a fresh registry cannot collide
            self.insert(&ty).ok();
            ty
        };

        let object = seed(TypeFlavor::Object, "Object", None);
        let value_type = seed(TypeFlavor::ValueType, "ValueType", Some(object.clone()));

        for (flavor, name, is_value) in PRIMITIVES {
            let base = if *is_value {
                value_type.clone()
            } else {
                object.clone()
            };
            seed(*flavor, name, Some(base));
        }
    }

    /// Allocate the next artificial token for a mirrored type.
    pub fn next_token(&self) -> Token {
        Token::new(self.next_token.fetch_add(1, Ordering::Relaxed))
    }

    /// Allocate an artificial member token in the given table.
    ///
    /// The row space is shared across member tables; rows are unique, not dense.
    pub fn alloc_member_token(&self, table: u8) -> Token {
        let row = self.next_member_row.fetch_add(1, Ordering::Relaxed);
        Token::new((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Register a new type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a type with the same token is already
    /// registered.
    pub fn insert(&self, new_type: &TypeRc) -> Result<()> {
        if self.types.contains_key(&new_type.token) {
            return Err(TypeInsert(new_type.token));
        }

        self.types.insert(new_type.token, new_type.clone());
        self.types_by_fullname
            .entry(new_type.fullname())
            .or_default()
            .push(new_type.token);
        self.types_by_name
            .entry(new_type.name.clone())
            .or_default()
            .push(new_type.token);
        Ok(())
    }

    /// Look up a type by token.
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by its full name (Namespace.Name).
    ///
    /// When several mirrored types share a full name, the first registered wins.
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeRc> {
        self.types_by_fullname
            .get(fullname)
            .and_then(|tokens| tokens.first().copied())
            .and_then(|token| self.get(&token))
    }

    /// Look up all types sharing a simple name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Vec<TypeRc> {
        self.types_by_name
            .get(name)
            .map(|tokens| tokens.iter().filter_map(|t| self.get(t)).collect())
            .unwrap_or_default()
    }

    /// Look up a seeded primitive type by flavor.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the flavor has no seeded primitive
    /// (e.g. [`TypeFlavor::Class`]).
    pub fn get_primitive(&self, flavor: TypeFlavor) -> Result<TypeRc> {
        let fullname = match flavor {
            TypeFlavor::Object => "System.Object".to_string(),
            TypeFlavor::ValueType => "System.ValueType".to_string(),
            _ => {
                let simple = PRIMITIVES
                    .iter()
                    .find(|(f, _, _)| *f == flavor)
                    .map(|(_, n, _)| *n)
                    .ok_or(TypeNotFound(Token::new(0)))?;
                format!("System.{simple}")
            }
        };

        self.get_by_fullname(&fullname)
            .ok_or(TypeNotFound(Token::new(0)))
    }

    /// Number of registered types, seeded primitives included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.types.len()
    }
}
