//! Predicate scanning over instruction streams.
//!
//! Rules locate their insertion points by scanning a method body for the
//! first instruction satisfying a predicate. Three predicate forms cover
//! every rule this engine serves:
//!
//! - **Opcode-only** — "the first float return", "the first `PutField`"
//! - **Push-literal** — "the push whose constant equals 8"
//! - **Call-site** — "the invocation of `Beta.isCritical()Z`", matched by
//!   owner, name and descriptor regardless of dispatch flavor
//!
//! Scanning is strictly forward from the given start index and returns the
//! first match; for a fixed stream and predicate the result is stable and
//! reproducible. "Not found" is an [`Option::None`], not an error — an
//! unmatched predicate is an expected outcome on drifted targets, reported
//! as a soft failure by the rule that observes it.

use std::fmt;

use crate::model::{Const, Insn, InsnList, MethodRef, Opcode};

/// A predicate over a single instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum InsnPredicate {
    /// Matches any instruction with the given opcode, ignoring operands.
    Opcode(Opcode),
    /// Matches a constant push whose literal equals the given constant.
    Push(Const),
    /// Matches an invocation of the given owner/name/descriptor, whatever
    /// its dispatch flavor.
    CallSite(MethodRef),
}

impl InsnPredicate {
    /// Whether `insn` satisfies this predicate.
    #[must_use]
    pub fn matches(&self, insn: &Insn) -> bool {
        match self {
            InsnPredicate::Opcode(opcode) => insn.opcode() == *opcode,
            InsnPredicate::Push(literal) => {
                matches!(insn, Insn::Push(c) if c == literal)
            }
            InsnPredicate::CallSite(target) => {
                matches!(insn, Insn::Invoke(_, r) if r == target)
            }
        }
    }
}

impl fmt::Display for InsnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsnPredicate::Opcode(opcode) => write!(f, "opcode {opcode}"),
            InsnPredicate::Push(literal) => write!(f, "push of {literal}"),
            InsnPredicate::CallSite(target) => write!(f, "call to {target}"),
        }
    }
}

/// Finds the first instruction at or after `from` satisfying `predicate`.
///
/// Returns the absolute index of the first match, or `None` when no
/// instruction from `from` to the end of the stream matches. A `from` past
/// the end of the stream is simply an empty scan, not an error.
#[must_use]
pub fn find(insns: &InsnList, predicate: &InsnPredicate, from: usize) -> Option<usize> {
    insns
        .as_slice()
        .get(from..)
        .and_then(|tail| tail.iter().position(|insn| predicate.matches(insn)))
        .map(|offset| from + offset)
}
