//! # classweave Prelude
//!
//! This module provides a convenient prelude for the most commonly used
//! types from the classweave library. Import this module to get quick
//! access to everything a patch rule needs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classweave operations
pub use crate::Error;

/// The result type used throughout classweave
pub use crate::Result;

// ================================================================================================
// Rule Registration and Dispatch
// ================================================================================================

/// Rule registry and per-class dispatcher
pub use crate::rules::Registry;

/// The rule trait implemented by named patch rules
pub use crate::rules::Rule;

/// Per-rule application outcome (applied or soft-skipped)
pub use crate::rules::RuleOutcome;

/// Per-pass summary of applied, skipped and failed rules
pub use crate::rules::PassReport;

// ================================================================================================
// Class Model
// ================================================================================================

/// The class container being patched
pub use crate::model::Class;

/// Field declarations and their access flags
pub use crate::model::{Field, FieldAccess};

/// Methods and their parsed descriptors
pub use crate::model::{Method, MethodDesc, TypeDesc};

// ================================================================================================
// Instructions and Splicing
// ================================================================================================

/// The instruction model
pub use crate::model::{ArithOp, Const, Insn, InsnList, Opcode};

/// Value categories and dispatch flavors
pub use crate::model::{InvokeKind, LocalKind, ValueKind};

/// Symbolic member references carried as instruction operands
pub use crate::model::{FieldRef, MethodRef};

/// Jump-target-free instruction fragments for splicing
pub use crate::splice::Fragment;

// ================================================================================================
// Matching and Symbol Resolution
// ================================================================================================

/// First-match predicate scan over an instruction stream
pub use crate::matcher::{find, InsnPredicate};

/// Stable-name to resolved-name mapping
pub use crate::symbols::{SymbolKind, SymbolMap};
