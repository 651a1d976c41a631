//! Fragment construction and the five splice primitives.
//!
//! A [`Fragment`] is a flat, ordered instruction list prepared by a rule for
//! insertion into a method body. Fragments carry no internal jump targets —
//! structurally guaranteed, since [`crate::model::Insn`] has no branch
//! variants — so splicing never requires target fix-up. What the engine does
//! *not* check is operand-stack balance: a fragment must leave the stack the
//! way the surrounding code expects it, and that remains a rule-author
//! precondition verified by the runtime that later loads the result.
//!
//! The five primitives are total over (stream, position, fragment) given a
//! valid position, atomic (all-or-nothing per edit) and in-place: an edit
//! made by one primitive is visible to the next primitive in the same rule
//! and to later rules in the same pass.
//!
//! # Index laws
//!
//! For a stream of length `n` and a fragment of length `k`:
//!
//! - `insert_at_entry` / `insert_before(i)` / `insert_after(i)` grow the
//!   stream to `n + k`; after `insert_after(i)` the first fragment
//!   instruction sits at `i + 1` and the instruction formerly at `i + 1`
//!   sits at `i + 1 + k`
//! - `replace_one(i)` keeps the length at `n`
//! - `replace_call(i)` yields length `n + k - 1` (the original call is
//!   removed)

use crate::model::{
    ArithOp, Const, FieldRef, Insn, InsnList, InvokeKind, LocalKind, MethodRef, ValueKind,
};
use crate::{Error, Result};

/// A flat, jump-target-free instruction sequence prepared for insertion.
///
/// Built fluently; the builder methods mirror the instruction categories of
/// [`crate::model::Insn`]:
///
/// ```rust
/// use classweave::prelude::*;
///
/// let frag = Fragment::new()
///     .load(LocalKind::Ref, 0)
///     .invoke_static(MethodRef::new("Handler", "showCritical", "(LBeta;)Z"));
/// assert_eq!(frag.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    insns: Vec<Insn>,
}

impl Fragment {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Fragment::default()
    }

    /// Appends an arbitrary instruction.
    #[must_use]
    pub fn insn(mut self, insn: Insn) -> Self {
        self.insns.push(insn);
        self
    }

    /// Appends a local-variable load.
    #[must_use]
    pub fn load(self, kind: LocalKind, slot: u16) -> Self {
        self.insn(Insn::Load(kind, slot))
    }

    /// Appends a local-variable store.
    #[must_use]
    pub fn store(self, kind: LocalKind, slot: u16) -> Self {
        self.insn(Insn::Store(kind, slot))
    }

    /// Appends a constant push.
    #[must_use]
    pub fn push(self, literal: Const) -> Self {
        self.insn(Insn::Push(literal))
    }

    /// Appends an instance-field read.
    #[must_use]
    pub fn get_field(self, field: FieldRef) -> Self {
        self.insn(Insn::GetField(field))
    }

    /// Appends an instance-field write.
    #[must_use]
    pub fn put_field(self, field: FieldRef) -> Self {
        self.insn(Insn::PutField(field))
    }

    /// Appends a static-field read.
    #[must_use]
    pub fn get_static(self, field: FieldRef) -> Self {
        self.insn(Insn::GetStatic(field))
    }

    /// Appends a static-field write.
    #[must_use]
    pub fn put_static(self, field: FieldRef) -> Self {
        self.insn(Insn::PutStatic(field))
    }

    /// Appends an invocation with the given dispatch flavor.
    #[must_use]
    pub fn invoke(self, kind: InvokeKind, target: MethodRef) -> Self {
        self.insn(Insn::Invoke(kind, target))
    }

    /// Appends a static invocation.
    #[must_use]
    pub fn invoke_static(self, target: MethodRef) -> Self {
        self.invoke(InvokeKind::Static, target)
    }

    /// Appends a virtual invocation.
    #[must_use]
    pub fn invoke_virtual(self, target: MethodRef) -> Self {
        self.invoke(InvokeKind::Virtual, target)
    }

    /// Appends an integer arithmetic instruction.
    #[must_use]
    pub fn arith(self, op: ArithOp) -> Self {
        self.insn(Insn::Arith(op))
    }

    /// Appends a return of the given value kind.
    #[must_use]
    pub fn ret(self, kind: ValueKind) -> Self {
        self.insn(Insn::Return(kind))
    }

    /// Number of instructions in the fragment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// Returns `true` when the fragment holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// The instructions as a slice, in splice order.
    #[must_use]
    pub fn as_slice(&self) -> &[Insn] {
        &self.insns
    }

    fn into_insns(self) -> Vec<Insn> {
        self.insns
    }
}

impl InsnList {
    /// Splices `fragment` in as the new first instructions of the stream.
    ///
    /// Always succeeds; an entry splice has no position to invalidate.
    pub fn insert_at_entry(&mut self, fragment: Fragment) {
        self.insns.splice(0..0, fragment.into_insns());
    }

    /// Splices `fragment` in immediately following the instruction at
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] when `index` does not address an
    /// instruction; the stream is left untouched.
    pub fn insert_after(&mut self, index: usize, fragment: Fragment) -> Result<()> {
        self.check_index(index)?;
        self.insns.splice(index + 1..index + 1, fragment.into_insns());
        Ok(())
    }

    /// Splices `fragment` in immediately preceding the instruction at
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] when `index` does not address an
    /// instruction; the stream is left untouched.
    pub fn insert_before(&mut self, index: usize, fragment: Fragment) -> Result<()> {
        self.check_index(index)?;
        self.insns.splice(index..index, fragment.into_insns());
        Ok(())
    }

    /// Swaps the single instruction at `index` for `new_insn`.
    ///
    /// The stream length is preserved exactly; this is the primitive behind
    /// constant-operand patches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] when `index` does not address an
    /// instruction.
    pub fn replace_one(&mut self, index: usize, new_insn: Insn) -> Result<()> {
        self.check_index(index)?;
        self.insns[index] = new_insn;
        Ok(())
    }

    /// Deletes the call instruction at `index` and substitutes `fragment`
    /// in its place.
    ///
    /// Used when a call's result or side effect is fully superseded by an
    /// external callout rather than augmented — the original callee is never
    /// invoked afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] when `index` does not address an
    /// instruction, or [`Error::NotACallSite`] when the instruction there is
    /// not an invocation. The stream is left untouched in both cases.
    pub fn replace_call(&mut self, index: usize, fragment: Fragment) -> Result<()> {
        self.check_index(index)?;
        if !self.insns[index].is_call() {
            return Err(Error::NotACallSite {
                index,
                found: self.insns[index].opcode().into(),
            });
        }
        self.insns.splice(index..=index, fragment.into_insns());
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.insns.len() {
            return Err(Error::InvalidIndex {
                index,
                len: self.insns.len(),
            });
        }
        Ok(())
    }
}
