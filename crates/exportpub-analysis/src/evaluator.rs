//! Recursive exportability rules.
//!
//! The [`Evaluator`] answers "can this be exposed to JavaScript?" for types,
//! classes, functions, constructors and properties. Class and type answers
//! are memoized for the lifetime of the evaluator, which is one pass.
//!
//! # Cycles
//!
//! Before a class or class type is examined its memo entry is set to in
//! flight. Any recursive question about the same entry while it is being
//! examined answers `true`, so a class whose members mention the class itself
//! does not disqualify itself. The entry is overwritten with the real answer
//! once the examination finishes. Answers that relied on such a provisional
//! `true` from an enclosing examination are not kept, so a class rejected
//! later in its own examination is never seen as exportable through a
//! dependant's stale entry.

use std::collections::HashMap;

use exportpub_model::{
    ClassDecl, ClassIndex, ConstructorDecl, FunctionDecl, Modifiers, ModuleGraph, PropertyDecl,
    Type, ValueParameter, Visibility,
};

use crate::builtin;
use crate::cache::{ExportMemo, MemoKey, MemoStats};
use crate::error::Result;
use crate::verdict::{PlatformFlag, Rejection, Verdict};

/// Evaluator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Validate a property's own value type, not just its getter receivers.
    pub check_property_types: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            check_property_types: true,
        }
    }
}

/// Exportability evaluator for one pass over one module graph.
pub struct Evaluator<'g> {
    index: ClassIndex<'g>,
    memo: ExportMemo,
    /// Full verdicts of classes examined so far, keyed by qualified name.
    verdicts: HashMap<String, Verdict>,
    options: EvaluatorOptions,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g ModuleGraph, options: EvaluatorOptions) -> Self {
        Self {
            index: graph.class_index(),
            memo: ExportMemo::new(),
            verdicts: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> EvaluatorOptions {
        self.options
    }

    pub fn memo_stats(&self) -> MemoStats {
        self.memo.statistics()
    }

    /// Forget every memoized answer.
    pub fn reset(&mut self) {
        self.memo.clear();
        self.verdicts.clear();
    }

    /// Whether `ty` can cross the boundary.
    ///
    /// In order: a star projection anywhere vetoes; built-in types are
    /// accepted (arrays recurse into their element type); `dynamic` is
    /// accepted; a type parameter needs all its bounds exportable; a class
    /// type is exportable when its class is already exported or passes the
    /// class rule. Classes absent from the graph are not exportable.
    pub fn type_exportable(&mut self, ty: &Type) -> Result<bool> {
        if ty.has_star_projection() {
            return Ok(false);
        }
        match ty {
            Type::Dynamic => Ok(true),
            Type::Parameter { bounds, .. } => {
                for bound in bounds {
                    if !self.type_exportable(bound)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Type::Class { .. } => {
                let key = MemoKey::Type(ty.key());
                if let Some(answer) = self.memo.lookup(&key) {
                    return Ok(answer);
                }
                self.memo.begin(key.clone());
                let answer = self.class_type_exportable(ty);
                self.memo.resolve(key, matches!(answer, Ok(true)));
                answer
            }
        }
    }

    fn class_type_exportable(&mut self, ty: &Type) -> Result<bool> {
        if builtin::classify(ty).is_some() {
            return builtin::is_builtin_exportable(ty, |element| self.type_exportable(element));
        }
        let Some(name) = ty.class_name() else {
            return Ok(false);
        };
        match self.index.get(name) {
            Some(class) if class.is_exported() => Ok(true),
            Some(class) => self.class_exportable(class),
            None => {
                tracing::debug!(class = %name, "class not in graph, treating as not exportable");
                Ok(false)
            }
        }
    }

    /// Memoized class rule.
    pub fn class_exportable(&mut self, class: &ClassDecl) -> Result<bool> {
        let key = MemoKey::Class(class.fq_name.to_string());
        if let Some(answer) = self.memo.lookup(&key) {
            return Ok(answer);
        }
        self.memo.begin(key.clone());
        let verdict = match self.evaluate_class(class) {
            Ok(verdict) => verdict,
            Err(e) => {
                self.memo.resolve(key, false);
                return Err(e);
            }
        };
        let exportable = verdict.is_exportable();
        if self.memo.resolve(key, exportable) {
            tracing::debug!(class = %class.fq_name, exportable, "class evaluated");
            self.verdicts.insert(class.fq_name.to_string(), verdict);
        } else {
            tracing::trace!(class = %class.fq_name, "provisional answer, not kept");
        }
        Ok(exportable)
    }

    /// The class rule with the reason for a rejection.
    ///
    /// Reuses the memoized answer when there is one, so asking again later in
    /// the same pass is cheap and consistent with earlier answers. A class
    /// still under examination reads as exportable.
    pub fn class_verdict(&mut self, class: &ClassDecl) -> Result<Verdict> {
        self.class_exportable(class)?;
        Ok(self
            .verdicts
            .get(class.fq_name.as_str())
            .cloned()
            .unwrap_or(Verdict::Exportable))
    }

    fn evaluate_class(&mut self, class: &ClassDecl) -> Result<Verdict> {
        if class.is_exported() {
            return Ok(Verdict::Exportable);
        }
        if !class.is_enum() {
            if let Some(flag) = class_platform_flag(class) {
                return Ok(Rejection::Platform(flag).into());
            }
        }
        if class.visibility != Visibility::Public {
            return Ok(Rejection::NotPublic(class.visibility).into());
        }

        let mut offending = Vec::new();
        for supertype in &class.supertypes {
            if !self.type_exportable(supertype)? {
                offending.push(supertype.to_string());
            }
        }
        if !offending.is_empty() {
            return Ok(Rejection::Supertypes(offending).into());
        }

        for ctor in class.constructors().filter(|c| c.visibility == Visibility::Public) {
            if !self.constructor_verdict(ctor)?.is_exportable() {
                offending.push(ctor.signature(&class.fq_name));
            }
        }
        if !offending.is_empty() {
            return Ok(Rejection::Constructors(offending).into());
        }

        for property in class.properties() {
            if property.visibility != Visibility::Public
                || self.inherited_from_builtin(property.inherited_from.as_ref())?
            {
                continue;
            }
            if !self.property_verdict(property)?.is_exportable() {
                offending.push(property.signature());
            }
        }
        if !offending.is_empty() {
            return Ok(Rejection::Properties(offending).into());
        }

        let mut own_methods = Vec::new();
        for method in class.methods() {
            if method.visibility != Visibility::Public
                || self.inherited_from_builtin(method.inherited_from.as_ref())?
            {
                continue;
            }
            if !self.function_verdict(method)?.is_exportable() {
                offending.push(method.signature());
            }
            own_methods.push(method);
        }
        if !offending.is_empty() {
            return Ok(Rejection::Methods(offending).into());
        }

        let overloaded = overloaded_names(&own_methods);
        if !overloaded.is_empty() {
            return Ok(Rejection::OverloadedMethods(overloaded).into());
        }

        Ok(Verdict::Exportable)
    }

    /// Members inherited from a built-in ancestor are exempt from the member
    /// checks.
    fn inherited_from_builtin(&mut self, ancestor: Option<&Type>) -> Result<bool> {
        match ancestor {
            Some(ty) if builtin::classify(ty).is_some() => {
                builtin::is_builtin_exportable(ty, |element| self.type_exportable(element))
            }
            _ => Ok(false),
        }
    }

    /// Function rule: public, not expect/external/inline, and every type on
    /// its signature exportable. Suspension is gated by the annotator.
    pub fn function_verdict(&mut self, function: &FunctionDecl) -> Result<Verdict> {
        if let Some(rejection) = callable_gate(function.visibility, &function.modifiers) {
            return Ok(rejection.into());
        }
        if !self.type_exportable(&function.return_type)? {
            return Ok(Rejection::ReturnType(function.return_type.to_string()).into());
        }
        self.receivers_and_parameters(
            function.dispatch_receiver.as_ref(),
            function.extension_receiver.as_ref(),
            &function.parameters,
        )
    }

    /// Constructor rule: the function rule without a return type.
    pub fn constructor_verdict(&mut self, ctor: &ConstructorDecl) -> Result<Verdict> {
        if let Some(rejection) = callable_gate(ctor.visibility, &ctor.modifiers) {
            return Ok(rejection.into());
        }
        self.receivers_and_parameters(ctor.dispatch_receiver.as_ref(), None, &ctor.parameters)
    }

    /// Property rule: not expect/external, getter receivers exportable and,
    /// unless disabled, the value type exportable.
    ///
    /// Fails when the property has neither a getter nor a backing field.
    pub fn property_verdict(&mut self, property: &PropertyDecl) -> Result<Verdict> {
        if property.modifiers.expect {
            return Ok(Rejection::Platform(PlatformFlag::Expect).into());
        }
        if property.modifiers.external {
            return Ok(Rejection::Platform(PlatformFlag::External).into());
        }
        if let Some(getter) = &property.getter {
            if let Some(receiver) = &getter.dispatch_receiver {
                if !self.type_exportable(receiver)? {
                    return Ok(Rejection::DispatchReceiver(receiver.to_string()).into());
                }
            }
            if let Some(receiver) = &getter.extension_receiver {
                if !self.type_exportable(receiver)? {
                    return Ok(Rejection::ExtensionReceiver(receiver.to_string()).into());
                }
            }
        }
        let ty = property.resolved_type()?;
        if self.options.check_property_types && !self.type_exportable(ty)? {
            return Ok(Rejection::PropertyType(ty.to_string()).into());
        }
        Ok(Verdict::Exportable)
    }

    fn receivers_and_parameters(
        &mut self,
        dispatch: Option<&Type>,
        extension: Option<&Type>,
        parameters: &[ValueParameter],
    ) -> Result<Verdict> {
        if let Some(receiver) = dispatch {
            if !self.type_exportable(receiver)? {
                return Ok(Rejection::DispatchReceiver(receiver.to_string()).into());
            }
        }
        if let Some(receiver) = extension {
            if !self.type_exportable(receiver)? {
                return Ok(Rejection::ExtensionReceiver(receiver.to_string()).into());
            }
        }
        let mut offending = Vec::new();
        for param in parameters {
            if !self.type_exportable(&param.ty)? {
                offending.push(format!("{}: {}", param.name, param.ty));
            }
        }
        if offending.is_empty() {
            Ok(Verdict::Exportable)
        } else {
            Ok(Rejection::Parameters(offending).into())
        }
    }
}

fn class_platform_flag(class: &ClassDecl) -> Option<PlatformFlag> {
    let m = &class.modifiers;
    if m.expect {
        Some(PlatformFlag::Expect)
    } else if m.external {
        Some(PlatformFlag::External)
    } else if m.value || m.inline {
        Some(PlatformFlag::Value)
    } else if class.is_annotation_class() {
        Some(PlatformFlag::Annotation)
    } else if m.anonymous {
        Some(PlatformFlag::Anonymous)
    } else {
        None
    }
}

fn callable_gate(visibility: Visibility, modifiers: &Modifiers) -> Option<Rejection> {
    if visibility != Visibility::Public {
        Some(Rejection::NotPublic(visibility))
    } else if modifiers.expect {
        Some(Rejection::Platform(PlatformFlag::Expect))
    } else if modifiers.external {
        Some(Rejection::Platform(PlatformFlag::External))
    } else if modifiers.inline {
        Some(Rejection::Platform(PlatformFlag::Inline))
    } else {
        None
    }
}

/// Names bound to more than one method, in order of first appearance.
fn overloaded_names(methods: &[&FunctionDecl]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for method in methods {
        match counts.iter_mut().find(|(name, _)| *name == method.name()) {
            Some((_, count)) => *count += 1,
            None => counts.push((method.name(), 1)),
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
