//! In-memory model of one class container: its fields and methods.
//!
//! A [`Class`] is constructed by the host loader from persisted binary form
//! immediately before a transform pass, handed to the
//! [`crate::rules::Registry`], mutated in place by zero or more rules, and
//! handed back for serialization. No class state survives across passes
//! inside this engine.
//!
//! The model is intentionally narrow: fields unique by name, methods looked
//! up by their resolved name, and each method holding an ordered, mutable
//! [`InsnList`]. Constant pools, attributes and the binary encoding are the
//! loader's concern.

mod descriptor;
mod insn;

pub use descriptor::{MethodDesc, TypeDesc};
pub use insn::{
    ArithOp, Const, FieldRef, Insn, InsnList, InvokeKind, LocalKind, MethodRef, Opcode, ValueKind,
};

use bitflags::bitflags;

use crate::{Error, Result};

bitflags! {
    /// Access and property flags of a field declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAccess: u16 {
        /// Accessible from anywhere
        const PUBLIC = 0x0001;
        /// Accessible only within the declaring class
        const PRIVATE = 0x0002;
        /// Accessible within subclasses
        const PROTECTED = 0x0004;
        /// Class-level rather than instance-level
        const STATIC = 0x0008;
        /// Never written after initialization
        const FINAL = 0x0010;
        /// Never cached by threads
        const VOLATILE = 0x0040;
        /// Not written by default serialization
        const TRANSIENT = 0x0080;
        /// Not present in source; emitted by a compiler or injected
        const SYNTHETIC = 0x1000;
    }
}

/// A field declaration: name, type descriptor and access flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    desc: String,
    access: FieldAccess,
}

impl Field {
    /// Creates a field declaration.
    ///
    /// ## Arguments
    /// * 'name'   - Field name, unique within its class
    /// * 'desc'   - Type descriptor, e.g. `I` or `LBeta;`
    /// * 'access' - Access flags
    pub fn new(name: &str, desc: &str, access: FieldAccess) -> Self {
        Field {
            name: name.to_string(),
            desc: desc.to_string(),
            access,
        }
    }

    /// The field's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's type descriptor.
    #[must_use]
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// The field's access flags.
    #[must_use]
    pub fn access(&self) -> FieldAccess {
        self.access
    }
}

/// A method: resolved name, parsed descriptor, staticness and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    name: String,
    desc: MethodDesc,
    is_static: bool,
    body: InsnList,
}

impl Method {
    /// Creates a method from its identity and body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDescriptor`] when `desc` is not a valid
    /// method descriptor.
    pub fn new(name: &str, desc: &str, is_static: bool, body: InsnList) -> Result<Self> {
        Ok(Method {
            name: name.to_string(),
            desc: MethodDesc::parse(desc)?,
            is_static,
            body,
        })
    }

    /// The method's resolved name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method's parsed descriptor.
    #[must_use]
    pub fn desc(&self) -> &MethodDesc {
        &self.desc
    }

    /// Whether the method is static (no receiver slot).
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The local-variable slot bound to each declared parameter.
    ///
    /// Convenience over [`MethodDesc::param_slots`] using this method's
    /// staticness; rules use this instead of literal slot numbers.
    #[must_use]
    pub fn param_slots(&self) -> Vec<u16> {
        self.desc.param_slots(self.is_static)
    }

    /// Read access to the instruction stream.
    #[must_use]
    pub fn body(&self) -> &InsnList {
        &self.body
    }

    /// Mutable access to the instruction stream, for splicing.
    pub fn body_mut(&mut self) -> &mut InsnList {
        &mut self.body
    }
}

/// One class container: identity, fields and methods.
///
/// Methods are addressed by resolved name alone; the classes this engine
/// patches only ever carry one overload worth patching per name, so the
/// descriptor disambiguation a general-purpose model would need is not
/// carried here.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    name: String,
    fields: Vec<Field>,
    methods: Vec<Method>,
}

impl Class {
    /// Creates an empty class with the given fully qualified name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Class {
            name: name.to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// The class's fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field declaration to the class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCollision`] when a field of that name already
    /// exists. The existing field is left untouched — injecting the same
    /// field twice yields exactly one field, never two.
    pub fn add_field(&mut self, field: Field) -> Result<()> {
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(Error::FieldCollision {
                class: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// The field with the given name, if declared.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// All field declarations, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Adds a method to the class. Later additions shadow earlier ones of
    /// the same name for lookup purposes; the loader supplies unique names.
    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    /// Exact-resolved-name method lookup.
    ///
    /// A missing method is an expected outcome on drifted runtime versions,
    /// hence `Option` rather than an error.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Mutable exact-resolved-name method lookup.
    #[must_use]
    pub fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.name() == name)
    }

    /// All methods, in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}
