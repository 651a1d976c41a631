//! The instruction model: tagged variants over the elementary bytecode
//! operation categories the patch engine edits.
//!
//! Instructions are deliberately *not* a full bytecode instruction set. Only
//! the categories patch rules produce or match against are modelled: local
//! loads/stores, field access, method invocation, constant pushes, integer
//! arithmetic and returns. In particular there are **no branch variants**,
//! which makes every rule-authored fragment jump-target-free by construction
//! — the engine never has to renumber jump targets because the type system
//! prevents fragments from containing any.
//!
//! [`Insn::opcode`] projects each instruction onto a fieldless [`Opcode`]
//! discriminant, the currency of opcode-only matching in
//! [`crate::matcher`].

use std::fmt;

use strum::{Display, IntoStaticStr};

/// A symbolic reference to a method: owner class, name and descriptor.
///
/// This is the operand of every invocation instruction and the key used for
/// call-site matching. The engine only requires the reference to be
/// well-formed; whether the callee actually exists is the concern of the
/// runtime that later loads the patched class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    /// Fully qualified name of the class declaring the method
    pub owner: String,
    /// Method name as it appears in the target class
    pub name: String,
    /// Method descriptor, e.g. `(LBeta;)Z`
    pub desc: String,
}

impl MethodRef {
    /// Creates a method reference from its three parts.
    pub fn new(owner: &str, name: &str, desc: &str) -> Self {
        MethodRef {
            owner: owner.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.desc)
    }
}

/// A symbolic reference to a field: owner class, name and type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Fully qualified name of the class declaring the field
    pub owner: String,
    /// Field name as it appears in the target class
    pub name: String,
    /// Field type descriptor, e.g. `I` or `LBeta;`
    pub desc: String,
}

impl FieldRef {
    /// Creates a field reference from its three parts.
    pub fn new(owner: &str, name: &str, desc: &str) -> Self {
        FieldRef {
            owner: owner.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.desc)
    }
}

/// The value category of a local variable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    /// 32-bit integer (also booleans, bytes, chars, shorts)
    Int,
    /// 64-bit integer, occupies two slots
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float, occupies two slots
    Double,
    /// Object reference
    Ref,
}

/// The value category of a return instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `return` with no value
    Void,
    /// Integer-category return (includes booleans)
    Int,
    /// Long return
    Long,
    /// Float return
    Float,
    /// Double return
    Double,
    /// Reference return
    Ref,
}

/// Dispatch flavor of an invocation instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    /// Static dispatch, no receiver on the stack
    Static,
    /// Virtual dispatch through the receiver's class
    Virtual,
    /// Direct dispatch (constructors, private and super calls)
    Special,
    /// Virtual dispatch through an interface
    Interface,
}

/// Integer arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// Integer addition
    Add,
    /// Integer subtraction
    Sub,
    /// Integer multiplication
    Mul,
    /// Integer division
    Div,
    /// Integer remainder
    Rem,
    /// Integer negation
    Neg,
}

/// A constant operand of a push instruction.
///
/// Equality over `Const` is what the push-literal predicate form in
/// [`crate::matcher::InsnPredicate::Push`] compares with.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    /// 32-bit integer literal
    Int(i32),
    /// 64-bit integer literal
    Long(i64),
    /// 32-bit float literal
    Float(f32),
    /// 64-bit float literal
    Double(f64),
    /// String literal
    Str(String),
    /// The null reference
    Null,
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Int(v) => write!(f, "{v}"),
            Const::Long(v) => write!(f, "{v}L"),
            Const::Float(v) => write!(f, "{v}F"),
            Const::Double(v) => write!(f, "{v}D"),
            Const::Str(v) => write!(f, "{v:?}"),
            Const::Null => write!(f, "null"),
        }
    }
}

/// One instruction of a method body.
///
/// Each variant carries exactly the operand data its category needs. The
/// set is closed over the edits this engine performs; decoding a full
/// instruction set from persisted bytes is the host loader's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum Insn {
    /// Load a local variable slot onto the operand stack
    Load(LocalKind, u16),
    /// Store the top of the operand stack into a local variable slot
    Store(LocalKind, u16),
    /// Read an instance field of the object on top of the stack
    GetField(FieldRef),
    /// Write the top of the stack into an instance field
    PutField(FieldRef),
    /// Read a static field
    GetStatic(FieldRef),
    /// Write a static field
    PutStatic(FieldRef),
    /// Invoke a method
    Invoke(InvokeKind, MethodRef),
    /// Push a constant
    Push(Const),
    /// Integer arithmetic on the operand stack
    Arith(ArithOp),
    /// Return from the method
    Return(ValueKind),
}

/// Fieldless opcode discriminants for opcode-only matching.
///
/// The granularity mirrors classic stack-machine mnemonics: value kinds are
/// folded into the opcode (an `FReturn` is distinguishable from an
/// `IReturn`), while operand *data* — which slot, which literal, which
/// callee — is not part of the opcode and is matched by the richer predicate
/// forms instead.
#[derive(Debug, Display, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // mnemonic names, one per stack-machine opcode
pub enum Opcode {
    ILoad,
    LLoad,
    FLoad,
    DLoad,
    ALoad,
    IStore,
    LStore,
    FStore,
    DStore,
    AStore,
    GetField,
    PutField,
    GetStatic,
    PutStatic,
    InvokeStatic,
    InvokeVirtual,
    InvokeSpecial,
    InvokeInterface,
    Push,
    IAdd,
    ISub,
    IMul,
    IDiv,
    IRem,
    INeg,
    Return,
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
}

impl Insn {
    /// The opcode discriminant of this instruction.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            Insn::Load(kind, _) => match kind {
                LocalKind::Int => Opcode::ILoad,
                LocalKind::Long => Opcode::LLoad,
                LocalKind::Float => Opcode::FLoad,
                LocalKind::Double => Opcode::DLoad,
                LocalKind::Ref => Opcode::ALoad,
            },
            Insn::Store(kind, _) => match kind {
                LocalKind::Int => Opcode::IStore,
                LocalKind::Long => Opcode::LStore,
                LocalKind::Float => Opcode::FStore,
                LocalKind::Double => Opcode::DStore,
                LocalKind::Ref => Opcode::AStore,
            },
            Insn::GetField(_) => Opcode::GetField,
            Insn::PutField(_) => Opcode::PutField,
            Insn::GetStatic(_) => Opcode::GetStatic,
            Insn::PutStatic(_) => Opcode::PutStatic,
            Insn::Invoke(kind, _) => match kind {
                InvokeKind::Static => Opcode::InvokeStatic,
                InvokeKind::Virtual => Opcode::InvokeVirtual,
                InvokeKind::Special => Opcode::InvokeSpecial,
                InvokeKind::Interface => Opcode::InvokeInterface,
            },
            Insn::Push(_) => Opcode::Push,
            Insn::Arith(op) => match op {
                ArithOp::Add => Opcode::IAdd,
                ArithOp::Sub => Opcode::ISub,
                ArithOp::Mul => Opcode::IMul,
                ArithOp::Div => Opcode::IDiv,
                ArithOp::Rem => Opcode::IRem,
                ArithOp::Neg => Opcode::INeg,
            },
            Insn::Return(kind) => match kind {
                ValueKind::Void => Opcode::Return,
                ValueKind::Int => Opcode::IReturn,
                ValueKind::Long => Opcode::LReturn,
                ValueKind::Float => Opcode::FReturn,
                ValueKind::Double => Opcode::DReturn,
                ValueKind::Ref => Opcode::AReturn,
            },
        }
    }

    /// Returns `true` when this instruction is a method invocation of any
    /// dispatch flavor.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Insn::Invoke(_, _))
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insn::Load(_, slot) | Insn::Store(_, slot) => {
                write!(f, "{} {}", self.opcode(), slot)
            }
            Insn::GetField(r) | Insn::PutField(r) | Insn::GetStatic(r) | Insn::PutStatic(r) => {
                write!(f, "{} {}", self.opcode(), r)
            }
            Insn::Invoke(_, r) => write!(f, "{} {}", self.opcode(), r),
            Insn::Push(c) => write!(f, "{} {}", self.opcode(), c),
            Insn::Arith(_) | Insn::Return(_) => write!(f, "{}", self.opcode()),
        }
    }
}

/// An ordered, index-addressable instruction sequence — one method body.
///
/// The list is mutable only through the splice primitives defined in
/// [`crate::splice`]; this module provides read access and construction.
/// Every edit keeps the sequence a syntactically valid stream for its
/// method's descriptor, and edits made by one rule are visible to the next
/// rule in the same pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsnList {
    pub(crate) insns: Vec<Insn>,
}

impl InsnList {
    /// Creates an empty instruction list.
    #[must_use]
    pub fn new() -> Self {
        InsnList::default()
    }

    /// Number of instructions in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// Returns `true` when the list holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// The instruction at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Insn> {
        self.insns.get(index)
    }

    /// Iterates the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Insn> {
        self.insns.iter()
    }

    /// The instructions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Insn] {
        &self.insns
    }
}

impl From<Vec<Insn>> for InsnList {
    fn from(insns: Vec<Insn>) -> Self {
        InsnList { insns }
    }
}

impl<'a> IntoIterator for &'a InsnList {
    type Item = &'a Insn;
    type IntoIter = std::slice::Iter<'a, Insn>;

    fn into_iter(self) -> Self::IntoIter {
        self.insns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_folds_value_kind() {
        assert_eq!(Insn::Load(LocalKind::Ref, 0).opcode(), Opcode::ALoad);
        assert_eq!(Insn::Load(LocalKind::Float, 2).opcode(), Opcode::FLoad);
        assert_eq!(Insn::Return(ValueKind::Void).opcode(), Opcode::Return);
        assert_eq!(Insn::Return(ValueKind::Float).opcode(), Opcode::FReturn);
        assert_eq!(Insn::Arith(ArithOp::Mul).opcode(), Opcode::IMul);
    }

    #[test]
    fn test_opcode_ignores_operand_data() {
        let a = Insn::Push(Const::Int(8));
        let b = Insn::Push(Const::Str("eight".into()));
        assert_eq!(a.opcode(), b.opcode());
    }

    #[test]
    fn test_is_call() {
        let call = Insn::Invoke(
            InvokeKind::Virtual,
            MethodRef::new("Beta", "isCritical", "()Z"),
        );
        assert!(call.is_call());
        assert!(!Insn::Return(ValueKind::Int).is_call());
        assert!(!Insn::GetField(FieldRef::new("Beta", "ticks", "I")).is_call());
    }

    #[test]
    fn test_display_forms() {
        let call = Insn::Invoke(
            InvokeKind::Static,
            MethodRef::new("Handler", "showCritical", "(LBeta;)Z"),
        );
        assert_eq!(
            call.to_string(),
            "InvokeStatic Handler.showCritical(LBeta;)Z"
        );
        assert_eq!(Insn::Push(Const::Int(8)).to_string(), "Push 8");
        assert_eq!(Insn::Load(LocalKind::Ref, 0).to_string(), "ALoad 0");
    }

    #[test]
    fn test_insn_list_from_vec() {
        let list = InsnList::from(vec![
            Insn::Load(LocalKind::Ref, 0),
            Insn::Return(ValueKind::Ref),
        ]);
        assert_eq!(list.len(), 2);
        assert!(matches!(list.get(1), Some(Insn::Return(ValueKind::Ref))));
        assert!(list.get(2).is_none());
    }
}
