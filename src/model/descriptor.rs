//! Method descriptor parsing and descriptor-derived local slot binding.
//!
//! Descriptors use the compact class-file form: a parenthesised parameter
//! list followed by the return type, e.g. `(IF LBeta;)Z` for a method taking
//! an int, a float and a `Beta` reference and returning a boolean. Primitive
//! codes are the classic single letters; object types are `L<name>;` and
//! arrays prefix `[` to their element type.
//!
//! Parsing a descriptor gives rules two things they must never hard-code:
//! the value kinds of parameters (for building loads and returns of the
//! right category) and the local-variable slot each parameter occupies.
//! Wide primitives (`J`, `D`) occupy two slots and instance methods bind the
//! receiver at slot 0, so a literal slot number written into a rule breaks
//! the moment a signature drifts; [`MethodDesc::param_slots`] makes the
//! binding explicit and testable instead.

use std::fmt;
use std::str::Chars;

use crate::model::insn::{LocalKind, ValueKind};
use crate::{Error, Result};

/// One parsed type of a descriptor — a parameter, a return type or a field
/// type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// `Z`
    Boolean,
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `S`
    Short,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `F`
    Float,
    /// `D`
    Double,
    /// `L<name>;`
    Object(String),
    /// `[<element>`
    Array(Box<TypeDesc>),
    /// `V`, only valid as a return type
    Void,
}

impl TypeDesc {
    /// Number of local-variable slots a value of this type occupies.
    #[must_use]
    pub fn slot_width(&self) -> u16 {
        match self {
            TypeDesc::Long | TypeDesc::Double => 2,
            _ => 1,
        }
    }

    /// The operand-stack value category of this type.
    ///
    /// Booleans, bytes, chars and shorts are all integer-category values on
    /// the operand stack.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        match self {
            TypeDesc::Void => ValueKind::Void,
            TypeDesc::Long => ValueKind::Long,
            TypeDesc::Float => ValueKind::Float,
            TypeDesc::Double => ValueKind::Double,
            TypeDesc::Object(_) | TypeDesc::Array(_) => ValueKind::Ref,
            _ => ValueKind::Int,
        }
    }

    /// The local-variable category of this type.
    ///
    /// Void has no local category; a parameter list never contains `V`, so
    /// this is only called on parameter types.
    #[must_use]
    pub fn local_kind(&self) -> LocalKind {
        match self {
            TypeDesc::Long => LocalKind::Long,
            TypeDesc::Float => LocalKind::Float,
            TypeDesc::Double => LocalKind::Double,
            TypeDesc::Object(_) | TypeDesc::Array(_) => LocalKind::Ref,
            _ => LocalKind::Int,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Boolean => write!(f, "Z"),
            TypeDesc::Byte => write!(f, "B"),
            TypeDesc::Char => write!(f, "C"),
            TypeDesc::Short => write!(f, "S"),
            TypeDesc::Int => write!(f, "I"),
            TypeDesc::Long => write!(f, "J"),
            TypeDesc::Float => write!(f, "F"),
            TypeDesc::Double => write!(f, "D"),
            TypeDesc::Object(name) => write!(f, "L{name};"),
            TypeDesc::Array(elem) => write!(f, "[{elem}"),
            TypeDesc::Void => write!(f, "V"),
        }
    }
}

/// A parsed method descriptor: parameter types and return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDesc {
    raw: String,
    params: Vec<TypeDesc>,
    ret: TypeDesc,
}

impl MethodDesc {
    /// Parses a descriptor string of the form `(<params>)<return>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDescriptor`] when the text is not a valid
    /// descriptor: missing parentheses, an unknown type code, an unclosed
    /// object type, a void parameter, or trailing garbage.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |message: &str| Error::MalformedDescriptor {
            descriptor: raw.to_string(),
            message: message.to_string(),
        };

        let mut chars = raw.chars();
        if chars.next() != Some('(') {
            return Err(malformed("expected `(`"));
        }

        let mut params = Vec::new();
        loop {
            match parse_type(&mut chars, raw)? {
                Some(TypeDesc::Void) => return Err(malformed("void parameter")),
                Some(ty) => params.push(ty),
                None => break, // hit `)`
            }
        }

        let ret = match parse_type(&mut chars, raw)? {
            Some(ty) => ty,
            None => return Err(malformed("missing return type")),
        };
        if chars.next().is_some() {
            return Err(malformed("trailing characters after return type"));
        }

        Ok(MethodDesc {
            raw: raw.to_string(),
            params,
            ret,
        })
    }

    /// The descriptor text this was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parameter types, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }

    /// The return type.
    #[must_use]
    pub fn ret(&self) -> &TypeDesc {
        &self.ret
    }

    /// The local-variable slot index bound to each parameter.
    ///
    /// For instance methods the receiver occupies slot 0 and the first
    /// parameter starts at slot 1; wide primitives advance the running slot
    /// index by two. The result has one entry per parameter, aligned with
    /// [`MethodDesc::params`].
    #[must_use]
    pub fn param_slots(&self, is_static: bool) -> Vec<u16> {
        let mut slots = Vec::with_capacity(self.params.len());
        let mut next = u16::from(!is_static);
        for param in &self.params {
            slots.push(next);
            next += param.slot_width();
        }
        slots
    }
}

impl fmt::Display for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses one type from the character stream.
///
/// Returns `Ok(None)` on the parameter-list terminator `)`; spaces between
/// parameter types are tolerated.
fn parse_type(chars: &mut Chars<'_>, raw: &str) -> Result<Option<TypeDesc>> {
    let malformed = |message: String| Error::MalformedDescriptor {
        descriptor: raw.to_string(),
        message,
    };

    let code = loop {
        match chars.next() {
            Some(' ') => continue,
            Some(c) => break c,
            None => return Err(malformed("unexpected end of descriptor".to_string())),
        }
    };

    let ty = match code {
        ')' => return Ok(None),
        'Z' => TypeDesc::Boolean,
        'B' => TypeDesc::Byte,
        'C' => TypeDesc::Char,
        'S' => TypeDesc::Short,
        'I' => TypeDesc::Int,
        'J' => TypeDesc::Long,
        'F' => TypeDesc::Float,
        'D' => TypeDesc::Double,
        'V' => TypeDesc::Void,
        'L' => {
            let name: String = chars.take_while(|&c| c != ';').collect();
            if name.is_empty() {
                return Err(malformed("empty object type name".to_string()));
            }
            // take_while consumed the `;` when present; an unclosed name
            // would have swallowed the rest of the descriptor instead.
            if name.contains(')') {
                return Err(malformed("unterminated object type".to_string()));
            }
            TypeDesc::Object(name)
        }
        '[' => match parse_type(chars, raw)? {
            Some(TypeDesc::Void) => return Err(malformed("array of void".to_string())),
            Some(elem) => TypeDesc::Array(Box::new(elem)),
            None => return Err(malformed("array without element type".to_string())),
        },
        other => return Err(malformed(format!("unknown type code `{other}`"))),
    };
    Ok(Some(ty))
}
