//! Rule registration and per-class dispatch.
//!
//! A [`Rule`] is a named, stateless transform over one [`Class`]. The host
//! loader registers rules once, then hands each class to
//! [`Registry::transform`] as it is loaded; every rule whose target
//! predicate matches the class identity runs, strictly in registration
//! order, each seeing the edits of the rules before it. Ordering matters:
//! a field-injection rule for a class must be registered before any rule
//! that reads or writes that field.
//!
//! # Failure policy
//!
//! One policy, applied uniformly:
//!
//! - A rule that cannot find its expected method, field or instruction
//!   returns [`RuleOutcome::Skipped`]; the dispatcher logs it at WARN with
//!   the unresolved name and continues. The class is unmodified by that
//!   rule. This is an expected outcome against drifted runtime versions,
//!   not a defect.
//! - A rule that trips a hard invariant ([`crate::Error`]) is logged at
//!   ERROR and abandoned; remaining rules still run. One rule's defect
//!   never corrupts or blocks another rule's edits.
//!
//! The [`PassReport`] returned by `transform` carries the same information
//! for programmatic inspection, so tests and loaders need not scrape logs.

use tracing::{error, info, warn};

use crate::model::Class;
use crate::symbols::SymbolMap;
use crate::Result;

/// The outcome of one rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule found its targets and applied its edits.
    Applied,
    /// The rule's target was absent; the class was left unmodified by this
    /// rule. Carries an operator-facing explanation of what was missing and
    /// the capability lost.
    Skipped(String),
}

impl RuleOutcome {
    /// Convenience constructor for [`RuleOutcome::Skipped`].
    pub fn skipped(reason: impl Into<String>) -> Self {
        RuleOutcome::Skipped(reason.into())
    }
}

/// A named, stateless patch rule.
///
/// Rules are idempotent across independent invocations on distinct classes;
/// re-application to an already-patched class is the loader's to prevent.
/// `Send + Sync` so one registry can serve concurrent passes on *different*
/// classes — each pass owns its class exclusively, so the engine itself
/// needs no synchronization.
pub trait Rule: Send + Sync {
    /// The rule's name, used in logs and reports.
    fn name(&self) -> &'static str;

    /// Whether this rule targets the class with the given identity.
    fn targets(&self, class_name: &str) -> bool;

    /// Applies the rule's edits to `class`, resolving symbolic names
    /// through `symbols`.
    ///
    /// # Errors
    ///
    /// Hard rule-authoring defects only; expected misses are
    /// [`RuleOutcome::Skipped`], not errors.
    fn apply(&self, class: &mut Class, symbols: &SymbolMap) -> Result<RuleOutcome>;
}

/// A rule built from closures, for rule sets that don't warrant a type each.
struct FnRule<P, T> {
    name: &'static str,
    predicate: P,
    transform: T,
}

impl<P, T> Rule for FnRule<P, T>
where
    P: Fn(&str) -> bool + Send + Sync,
    T: Fn(&mut Class, &SymbolMap) -> Result<RuleOutcome> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn targets(&self, class_name: &str) -> bool {
        (self.predicate)(class_name)
    }

    fn apply(&self, class: &mut Class, symbols: &SymbolMap) -> Result<RuleOutcome> {
        (self.transform)(class, symbols)
    }
}

/// What happened during one pass over one class.
///
/// Rules whose target predicate did not match the class are not recorded;
/// the report covers only rules that ran.
#[derive(Debug, Default)]
pub struct PassReport {
    applied: Vec<&'static str>,
    skipped: Vec<(&'static str, String)>,
    failed: Vec<(&'static str, String)>,
}

impl PassReport {
    /// Names of the rules that applied their edits, in run order.
    #[must_use]
    pub fn applied(&self) -> &[&'static str] {
        &self.applied
    }

    /// Rules that soft-failed, with the reason each reported.
    #[must_use]
    pub fn skipped(&self) -> &[(&'static str, String)] {
        &self.skipped
    }

    /// Rules abandoned on a hard defect, with the error rendered.
    #[must_use]
    pub fn failed(&self) -> &[(&'static str, String)] {
        &self.failed
    }

    /// Number of soft failures in the pass.
    #[must_use]
    pub fn soft_failures(&self) -> usize {
        self.skipped.len()
    }

    /// `true` when every rule that ran applied cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Associates class identities with the rules to run against them.
#[derive(Default)]
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers a rule. Rules run in registration order.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Registers a closure-backed rule.
    ///
    /// ## Arguments
    /// * 'name'      - Rule name for logs and reports
    /// * 'predicate' - Target predicate over the class identity
    /// * 'transform' - The transform itself; returns the rule outcome or a
    ///   hard defect
    pub fn register_fn<P, T>(&mut self, name: &'static str, predicate: P, transform: T)
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
        T: Fn(&mut Class, &SymbolMap) -> Result<RuleOutcome> + Send + Sync + 'static,
    {
        self.register(Box::new(FnRule {
            name,
            predicate,
            transform,
        }));
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every matching rule against `class`, in registration order.
    ///
    /// The class is edited in place; the returned report says which rules
    /// applied, which soft-failed and which were abandoned on a defect.
    /// This never fails as a whole — a pass completes for every class, with
    /// reduced functionality when targets have drifted.
    pub fn transform(&self, class: &mut Class, symbols: &SymbolMap) -> PassReport {
        let mut report = PassReport::default();

        for rule in &self.rules {
            if !rule.targets(class.name()) {
                continue;
            }

            match rule.apply(class, symbols) {
                Ok(RuleOutcome::Applied) => {
                    info!(rule = rule.name(), class = class.name(), "hook applied");
                    report.applied.push(rule.name());
                }
                Ok(RuleOutcome::Skipped(reason)) => {
                    warn!(
                        rule = rule.name(),
                        class = class.name(),
                        %reason,
                        "hook target missing, patch skipped"
                    );
                    report.skipped.push((rule.name(), reason));
                }
                Err(defect) => {
                    error!(
                        rule = rule.name(),
                        class = class.name(),
                        %defect,
                        "rule defect, edit abandoned"
                    );
                    report.failed.push((rule.name(), defect.to_string()));
                }
            }
        }

        report
    }
}
