use thiserror::Error;

/// The generic Error type covering every *hard* failure this library can
/// return.
///
/// Hard failures are rule-authoring defects: they indicate a bug in a patch
/// rule, not an expected condition of the class being transformed. Expected
/// misses (an absent method, an unmatched predicate) are deliberately *not*
/// errors — they are reported as [`crate::rules::RuleOutcome::Skipped`] so a
/// pass can degrade gracefully against drifted targets.
#[derive(Error, Debug)]
pub enum Error {
    /// A field injection named a field that already exists on the class.
    ///
    /// Injected fields must be unique by name. A collision means the rule
    /// ran twice against the same class or two rules claim the same field,
    /// either way a defect in the rule set. The existing field is kept and
    /// never duplicated.
    #[error("field `{field}` already exists on class `{class}`")]
    FieldCollision {
        /// Fully qualified name of the class being patched
        class: String,
        /// Name of the colliding field
        field: String,
    },

    /// An edit primitive was handed an index outside the instruction stream.
    ///
    /// Positions come from [`crate::matcher::find`], which only produces
    /// in-range indices, so this usually means a rule cached an index across
    /// an edit that moved it.
    #[error("instruction index {index} out of range for method of length {len}")]
    InvalidIndex {
        /// The offending index
        index: usize,
        /// Length of the instruction stream at the time of the edit
        len: usize,
    },

    /// `replace_call` was pointed at an instruction that is not a method
    /// invocation.
    ///
    /// The call-replacement primitive removes the original invocation; doing
    /// that to any other instruction would silently change stack behavior,
    /// so the mismatch is rejected instead.
    #[error("instruction at index {index} is `{found}`, not a call site")]
    NotACallSite {
        /// Index the rule supplied
        index: usize,
        /// Opcode actually found at that index
        found: &'static str,
    },

    /// A method descriptor string could not be parsed.
    ///
    /// Descriptors follow the compact class-file form, e.g. `(IF LBeta;)Z`.
    #[error("malformed descriptor `{descriptor}`: {message}")]
    MalformedDescriptor {
        /// The descriptor text that failed to parse
        descriptor: String,
        /// What was wrong with it
        message: String,
    },
}
