//! Integration tests for full transform passes.
//!
//! These exercise the engine the way a host loader drives it: a registry of
//! named rules, a symbol map for the current run, and one pass per class —
//! including the degraded pass against a class whose hook points are absent.

use classweave::prelude::*;

/// Builds the `Beta` class with a `tick()Z` method whose body invokes
/// `Beta.isCritical()Z` on `this` and returns the result.
fn beta_class() -> Class {
    let mut class = Class::new("Beta");
    let body = InsnList::from(vec![
        Insn::Load(LocalKind::Ref, 0),
        Insn::Invoke(
            InvokeKind::Virtual,
            MethodRef::new("Beta", "isCritical", "()Z"),
        ),
        Insn::Return(ValueKind::Int),
    ]);
    class.add_method(Method::new("tick", "()Z", false, body).unwrap());
    class
}

/// The redirect rule from the Beta example: replace the virtual
/// `isCritical` check inside `tick` with a static callout that recomputes
/// the same boolean, never invoking the original.
fn register_critical_redirect(registry: &mut Registry) {
    registry.register_fn(
        "beta:redirect-critical-check",
        |class| class == "Beta",
        |class, symbols| {
            let tick = symbols
                .resolve(SymbolKind::Method, "Beta", "tick")
                .to_string();
            let check = symbols.resolve(SymbolKind::Method, "Beta", "isCritical");
            let call = MethodRef::new("Beta", check, "()Z");

            let Some(method) = class.method_mut(&tick) else {
                return Ok(RuleOutcome::skipped(format!(
                    "method `{tick}` not found; critical-state callout disabled"
                )));
            };
            let Some(at) = find(method.body(), &InsnPredicate::CallSite(call), 0) else {
                return Ok(RuleOutcome::skipped(format!(
                    "no call to `{check}` inside `{tick}`"
                )));
            };

            // The receiver ALoad already on the stack becomes the callout's
            // argument; only the call itself is swapped.
            let frag = Fragment::new().invoke_static(MethodRef::new(
                "Handler",
                "showCritical",
                "(LBeta;)Z",
            ));
            method.body_mut().replace_call(at, frag)?;
            Ok(RuleOutcome::Applied)
        },
    );
}

/// A field-injection rule plus a follow-up rule that wires the field into
/// `tick`'s entry, in the order the pass guarantees.
fn register_tick_counter(registry: &mut Registry) {
    registry.register_fn(
        "beta:inject-tick-counter",
        |class| class == "Beta",
        |class, symbols| {
            let name = symbols.resolve(SymbolKind::Field, "Beta", "cw_tickCount");
            class.add_field(Field::new(
                name,
                "I",
                FieldAccess::PRIVATE | FieldAccess::SYNTHETIC,
            ))?;
            Ok(RuleOutcome::Applied)
        },
    );
    registry.register_fn(
        "beta:count-ticks",
        |class| class == "Beta",
        |class, symbols| {
            let tick = symbols
                .resolve(SymbolKind::Method, "Beta", "tick")
                .to_string();
            let counter = symbols
                .resolve(SymbolKind::Field, "Beta", "cw_tickCount")
                .to_string();
            if class.field(&counter).is_none() {
                return Ok(RuleOutcome::skipped(format!(
                    "field `{counter}` not present; tick counting disabled"
                )));
            }
            let Some(method) = class.method_mut(&tick) else {
                return Ok(RuleOutcome::skipped(format!(
                    "method `{tick}` not found; tick counting disabled"
                )));
            };

            // this.cw_tickCount = this.cw_tickCount + 1
            let field = FieldRef::new("Beta", &counter, "I");
            method.body_mut().insert_at_entry(
                Fragment::new()
                    .load(LocalKind::Ref, 0)
                    .load(LocalKind::Ref, 0)
                    .get_field(field.clone())
                    .push(Const::Int(1))
                    .arith(ArithOp::Add)
                    .put_field(field),
            );
            Ok(RuleOutcome::Applied)
        },
    );
}

#[test]
fn redirect_swaps_call_in_place() {
    let mut registry = Registry::new();
    register_critical_redirect(&mut registry);

    let mut class = beta_class();
    let report = registry.transform(&mut class, &SymbolMap::new());

    assert_eq!(report.applied(), &["beta:redirect-critical-check"]);
    assert!(report.is_clean());

    let body = class.method("tick").unwrap().body();
    // Same length, call instruction swapped, final return untouched.
    assert_eq!(body.len(), 3);
    assert_eq!(*body.get(0).unwrap(), Insn::Load(LocalKind::Ref, 0));
    assert_eq!(
        *body.get(1).unwrap(),
        Insn::Invoke(
            InvokeKind::Static,
            MethodRef::new("Handler", "showCritical", "(LBeta;)Z")
        )
    );
    assert_eq!(*body.get(2).unwrap(), Insn::Return(ValueKind::Int));
}

#[test]
fn redirect_resolves_obfuscated_names() {
    let mut registry = Registry::new();
    register_critical_redirect(&mut registry);

    // An obfuscated build: tick -> a, isCritical -> b.
    let mut symbols = SymbolMap::new();
    symbols.map_method("Beta", "tick", "a");
    symbols.map_method("Beta", "isCritical", "b");

    let mut class = Class::new("Beta");
    let body = InsnList::from(vec![
        Insn::Load(LocalKind::Ref, 0),
        Insn::Invoke(InvokeKind::Virtual, MethodRef::new("Beta", "b", "()Z")),
        Insn::Return(ValueKind::Int),
    ]);
    class.add_method(Method::new("a", "()Z", false, body).unwrap());

    let report = registry.transform(&mut class, &symbols);
    assert!(report.is_clean());
    assert_eq!(
        class.method("a").unwrap().body().get(1).unwrap().opcode(),
        Opcode::InvokeStatic
    );
}

#[test]
fn missing_method_degrades_to_one_soft_failure() {
    let mut registry = Registry::new();
    register_critical_redirect(&mut registry);

    // A Beta from some other runtime version, with no tick() at all.
    let mut class = Class::new("Beta");
    class.add_method(Method::new("render", "()V", false, InsnList::new()).unwrap());
    let before = class.clone();

    let report = registry.transform(&mut class, &SymbolMap::new());

    assert_eq!(class, before);
    assert_eq!(report.soft_failures(), 1);
    let (rule, reason) = &report.skipped()[0];
    assert_eq!(*rule, "beta:redirect-critical-check");
    assert!(reason.contains("tick"));
}

#[test]
fn full_rule_set_with_all_targets_is_clean() {
    let mut registry = Registry::new();
    register_tick_counter(&mut registry);
    register_critical_redirect(&mut registry);

    let mut class = beta_class();
    let report = registry.transform(&mut class, &SymbolMap::new());

    assert_eq!(report.soft_failures(), 0);
    assert!(report.is_clean());
    assert_eq!(
        report.applied(),
        &[
            "beta:inject-tick-counter",
            "beta:count-ticks",
            "beta:redirect-critical-check"
        ]
    );

    // Field injected once, counter preamble spliced at entry, call
    // redirected after it.
    assert!(class.field("cw_tickCount").is_some());
    let body = class.method("tick").unwrap().body();
    assert_eq!(body.len(), 9);
    assert_eq!(body.get(0).unwrap().opcode(), Opcode::ALoad);
    assert_eq!(body.get(5).unwrap().opcode(), Opcode::PutField);
    let redirected = MethodRef::new("Handler", "showCritical", "(LBeta;)Z");
    assert!(find(body, &InsnPredicate::CallSite(redirected), 0).is_some());
}

#[test]
fn later_edits_see_earlier_edits_in_same_pass() {
    let mut registry = Registry::new();
    register_tick_counter(&mut registry);

    let mut class = beta_class();
    let report = registry.transform(&mut class, &SymbolMap::new());

    // `beta:count-ticks` only applies because `beta:inject-tick-counter`
    // ran first in the same pass.
    assert!(report.is_clean());
    assert_eq!(report.applied().len(), 2);
}

#[test]
fn constant_operand_rewrite_preserves_shape() {
    let mut registry = Registry::new();
    registry.register_fn(
        "beta:widen-burst",
        |class| class == "Beta",
        |class, _| {
            let Some(method) = class.method_mut("burst") else {
                return Ok(RuleOutcome::skipped("no method `burst`"));
            };
            let Some(at) = find(method.body(), &InsnPredicate::Push(Const::Int(8)), 0) else {
                return Ok(RuleOutcome::skipped("no push of 8 in `burst`"));
            };
            method.body_mut().replace_one(at, Insn::Push(Const::Int(32)))?;
            Ok(RuleOutcome::Applied)
        },
    );

    let mut class = Class::new("Beta");
    let body = InsnList::from(vec![
        Insn::Push(Const::Int(8)),
        Insn::Return(ValueKind::Int),
    ]);
    class.add_method(Method::new("burst", "()I", true, body).unwrap());

    let report = registry.transform(&mut class, &SymbolMap::new());
    assert!(report.is_clean());

    let body = class.method("burst").unwrap().body();
    assert_eq!(body.len(), 2);
    assert_eq!(*body.get(0).unwrap(), Insn::Push(Const::Int(32)));
}

#[test]
fn reinjection_is_a_defect_but_not_a_duplicate() {
    let mut registry = Registry::new();
    register_tick_counter(&mut registry);

    let mut class = beta_class();
    registry.transform(&mut class, &SymbolMap::new());

    // A second pass over the same class is the loader's mistake; the
    // engine still refuses to duplicate the field.
    let report = registry.transform(&mut class, &SymbolMap::new());
    assert_eq!(report.failed().len(), 1);
    assert_eq!(report.failed()[0].0, "beta:inject-tick-counter");
    assert_eq!(
        class
            .fields()
            .iter()
            .filter(|f| f.name() == "cw_tickCount")
            .count(),
        1
    );
}

#[test]
fn descriptor_derived_slots_replace_literal_slot_numbers() {
    // A rule wiring a callout that forwards a parameter must derive the
    // slot from the descriptor, not hard-code it: the float lives at slot 3
    // here because the preceding long is wide.
    let mut registry = Registry::new();
    registry.register_fn(
        "beta:observe-damage",
        |class| class == "Beta",
        |class, _| {
            let Some(method) = class.method_mut("hit") else {
                return Ok(RuleOutcome::skipped("no method `hit`"));
            };
            let slots = method.param_slots();
            let amount_slot = slots[1]; // second declared parameter
            method.body_mut().insert_at_entry(
                Fragment::new()
                    .load(LocalKind::Float, amount_slot)
                    .invoke_static(MethodRef::new("Handler", "onDamage", "(F)V")),
            );
            Ok(RuleOutcome::Applied)
        },
    );

    let mut class = Class::new("Beta");
    let body = InsnList::from(vec![Insn::Return(ValueKind::Void)]);
    class.add_method(Method::new("hit", "(JF)V", false, body).unwrap());

    let report = registry.transform(&mut class, &SymbolMap::new());
    assert!(report.is_clean());
    assert_eq!(
        *class.method("hit").unwrap().body().get(0).unwrap(),
        Insn::Load(LocalKind::Float, 3)
    );
}
