// Copyright 2026 classweave contributors
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

#![deny(missing_docs)]

//! # classweave
//!
//! A declarative patch engine for compiled methods of managed bytecode class
//! files. `classweave` lets a host loader apply named, stateless patch rules
//! to an in-memory class model immediately before the class reaches the
//! runtime that will execute it: injecting fields, splicing instruction
//! fragments around located instructions or call sites, redirecting call
//! sites to external entry points, and rewriting constant operands.
//!
//! ## Features
//!
//! - **Symbolic naming** - Rules are written against stable method/field
//!   names and resolved through a [`symbols::SymbolMap`], so the same rule
//!   applies whether or not the target class has been obfuscated
//! - **Positional splicing** - Five atomic edit primitives over an ordered
//!   instruction stream with precise index semantics
//! - **Resilient dispatch** - A missing hook point is an expected, logged
//!   outcome; one rule's miss or defect never blocks the rest of the pass
//! - **No verification** - Stack-map frames and type checking remain the
//!   loading runtime's responsibility, by design
//!
//! ## Quick Start
//!
//! ```rust
//! use classweave::prelude::*;
//!
//! let mut registry = Registry::new();
//! registry.register_fn(
//!     "beta:redirect-critical-check",
//!     |class| class == "Beta",
//!     |class, symbols| {
//!         let tick = symbols.resolve(SymbolKind::Method, "Beta", "tick").to_string();
//!         let check = symbols.resolve(SymbolKind::Method, "Beta", "isCritical");
//!         let call = MethodRef::new("Beta", check, "()Z");
//!         let Some(method) = class.method_mut(&tick) else {
//!             return Ok(RuleOutcome::skipped(format!("no method `{tick}`")));
//!         };
//!         let Some(at) = find(method.body(), &InsnPredicate::CallSite(call), 0) else {
//!             return Ok(RuleOutcome::skipped("call site not found"));
//!         };
//!         let frag = Fragment::new().invoke_static(MethodRef::new(
//!             "Handler",
//!             "showCritical",
//!             "(LBeta;)Z",
//!         ));
//!         method.body_mut().replace_call(at, frag)?;
//!         Ok(RuleOutcome::Applied)
//!     },
//! );
//!
//! let symbols = SymbolMap::new();
//! let mut class = Class::new("Beta");
//! let report = registry.transform(&mut class, &symbols);
//! assert_eq!(report.soft_failures(), 1); // `tick` absent on the empty class
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Re-exports of the commonly used types
//! - [`symbols`] - Stable-name to resolved-name mapping
//! - [`model`] - Class, field, method, descriptor and instruction model
//! - [`matcher`] - Predicate scanning over instruction streams
//! - [`splice`] - Fragment construction and the five splice primitives
//! - [`rules`] - Rule trait, registry and per-pass dispatch
//!
//! ## Error Handling
//!
//! Expected misses (a renamed or removed hook point) are *soft* failures:
//! they surface as [`rules::RuleOutcome::Skipped`], are logged at WARN and
//! never abort a pass. Rule-authoring defects (field collisions, invalid
//! indices, splicing a non-call) are *hard* failures reported as [`Error`];
//! the dispatcher logs them at ERROR and continues with the remaining rules.

pub mod matcher;
pub mod model;
pub mod prelude;
pub mod rules;
pub mod splice;
pub mod symbols;

mod error;

/// The result type used throughout classweave.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;
pub use matcher::{find, InsnPredicate};
pub use model::{Class, Field, FieldAccess, Method};
pub use rules::{PassReport, Registry, Rule, RuleOutcome};
pub use splice::Fragment;
pub use symbols::{SymbolKind, SymbolMap};
