// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # monoscope
//!
//! A fault-tolerant member reflection and caching engine for inspecting live objects
//! inside embedded Mono/.NET runtimes. Built in pure Rust, `monoscope` provides the
//! enumeration core of an in-process object inspector: given any live object or
//! static type, it walks the inheritance chain, deduplicates overridden and inherited
//! signatures, classifies every member into a cacheable wrapper and returns a stable,
//! deterministically ordered list ready for interactive drill-down.
//!
//! ## Features
//!
//! - **🔍 Complete member enumeration** - Fields, properties, methods and constructors
//!   across the whole ancestor chain, most-derived first
//! - **🧬 Signature-based dedup** - Overridden and promoted members appear exactly once
//! - **🛡️ Per-member fault isolation** - One broken member never aborts enumeration;
//!   failures land in an injected diagnostics sink
//! - **🪞 Mirrored runtime image** - Weak-referenced type graph the host adapter fills
//!   from the embedded runtime's reflection surface
//! - **🧩 Injected collaborators** - Policy gate, logging sink and session context are
//!   interfaces, keeping the core testable without a host process
//!
//! ## Quick Start
//!
//! ```rust
//! use monoscope::prelude::*;
//! use std::sync::Arc;
//!
//! // Mirror a small hierarchy the way a host adapter would
//! let registry = Arc::new(TypeRegistry::new());
//! let int32 = registry.get_primitive(TypeFlavor::I4)?;
//!
//! let entity = TypeBuilder::new(&registry)
//!     .namespace("Game")
//!     .class("Entity")
//!     .field("health", &int32, FieldAttributes::PUBLIC)
//!     .property("Health", &int32, |p| p)
//!     .build()?;
//!
//! // Enumerate members for one inspection session
//! let session = InspectionSession::new();
//! let diagnostics = Diagnostics::new();
//! let ctx = InspectContext::new(&session, &AllowAll, &diagnostics);
//!
//! let members = enumerate_members(None, &entity, &ctx);
//! for member in &members {
//!     println!("{} ({})", member.filter_name(), member.member_kind());
//! }
//! # Ok::<(), monoscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `monoscope` is organized into two module trees:
//!
//! - [`runtime`] - the mirrored image of the embedded runtime: type graph, raw member
//!   descriptors, live object handles, tokens and the diagnostics sink
//! - [`inspect`] - the enumeration core: hierarchy walker, signature derivation,
//!   policy gate, sessions and the member cache factory
//! - [`prelude`] - convenient re-exports of the most commonly used types
//! - [`Error`] and [`Result`] - comprehensive error handling
//!
//! ### Enumeration pipeline
//!
//! The single entry point is [`inspect::cache::enumerate_members`]. Each raw candidate
//! passes the injected policy gate, the signature dedup set and kind classification
//! before it is bound to its fallback type and owning session. Compiler-synthesized
//! property accessors are suppressed, except that a write-only property contributes
//! its setter method in place of itself. Classification failures are logged with
//! declaring-type and member context and the candidate is dropped; the caller always
//! receives a valid ordered list.
//!
//! ### Host integration
//!
//! This crate contains no windowing, hooking or loader code. A host adapter mirrors
//! the runtime's reflection data through [`runtime::typesystem::TypeBuilder`], wraps
//! live instances in [`runtime::object::ObjectHandle`] values, and renders the
//! returned [`inspect::cache::CacheMember`] list however it likes.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the monoscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use monoscope::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let string = registry.get_primitive(TypeFlavor::String)?;
/// assert_eq!(string.fullname(), "System.String");
/// # Ok::<(), monoscope::Error>(())
/// ```
pub mod prelude;

/// The member enumeration core
///
/// This module implements the inspection side of the engine: walking a type's
/// ancestor chain, deduplicating signatures, consulting the policy gate and
/// producing ordered [`inspect::cache::CacheMember`] lists.
///
/// # Key Components
///
/// - [`inspect::cache::enumerate_members`] - The single enumeration entry point
/// - [`inspect::cache::CacheMember`] - The classified member wrapper
/// - [`inspect::hierarchy::ancestor_chain`] - Most-derived-first hierarchy walk
/// - [`inspect::policy::MemberPolicy`] - Injected allow/deny gate
/// - [`inspect::session::InspectionSession`] - The owning session context
pub mod inspect;

/// The mirrored image of the embedded runtime
///
/// This module holds everything the core knows about the host process: the weakly
/// linked type graph, raw member descriptors, live object handles, the token scheme
/// and the diagnostics sink.
///
/// # Key Components
///
/// - [`runtime::typesystem::TypeRegistry`] - Strong owner of all mirrored types
/// - [`runtime::typesystem::TypeBuilder`] - Fluent mirroring API for host adapters
/// - [`runtime::member::MemberHandle`] - Closed union over raw member descriptors
/// - [`runtime::object::ObjectHandle`] - Live object views with safe narrowing
/// - [`runtime::diagnostics::Diagnostics`] - Injected append-only logging sink
pub mod runtime;

/// Represents the result type used throughout the library, wrapping the custom `Error` type
pub type Result<T> = std::result::Result<T, Error>;

/// The common Error type for all operations of this library
pub use error::Error;
