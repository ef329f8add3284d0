//! The export pass.
//!
//! Walks a module graph, applies the top-level gates to every class and to
//! top-level functions and properties, asks the [`Evaluator`] for a verdict on
//! the rest, and attaches the export marker to the accepted ones.
//!
//! Decisions are made against the graph as it was when the pass started; the
//! markers are attached only after every decision is in.

use exportpub_glob::ExportFilter;
use exportpub_model::{
    ClassDecl, DeclPath, Declaration, FunctionDecl, Modifiers, ModuleGraph, PropertyDecl,
    QualifiedName, Visibility,
};

use crate::builtin;
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::error::Result;
use crate::evaluator::{Evaluator, EvaluatorOptions};
use crate::report::{PassReport, RejectedDeclaration, SkipReason, SkippedDeclaration};
use crate::verdict::{PlatformFlag, Rejection, Verdict};

/// Outcome for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Decision {
    Export,
    AlreadyExported,
    Skip(SkipReason),
    Reject(Rejection),
}

/// A declaration that can carry the export marker itself: any class, or a
/// top-level function or property. Members are covered by their class.
#[derive(Debug, Clone, Copy)]
enum Markable<'d> {
    Class(&'d ClassDecl),
    Function(&'d FunctionDecl),
    Property(&'d PropertyDecl),
}

impl<'d> Markable<'d> {
    fn of(path: &DeclPath, decl: &'d Declaration) -> Option<Self> {
        match decl {
            Declaration::Class(class) => Some(Markable::Class(class)),
            Declaration::Function(function) if path.is_top_level() => {
                Some(Markable::Function(function))
            }
            Declaration::Property(property) if path.is_top_level() => {
                Some(Markable::Property(property))
            }
            _ => None,
        }
    }

    fn fq_name(&self) -> &'d QualifiedName {
        match self {
            Markable::Class(class) => &class.fq_name,
            Markable::Function(function) => &function.fq_name,
            Markable::Property(property) => &property.fq_name,
        }
    }

    fn is_exported(&self) -> bool {
        match self {
            Markable::Class(class) => class.is_exported(),
            Markable::Function(function) => function.is_exported(),
            Markable::Property(property) => property.is_exported(),
        }
    }

    fn visibility(&self) -> Visibility {
        match self {
            Markable::Class(class) => class.visibility,
            Markable::Function(function) => function.visibility,
            Markable::Property(property) => property.visibility,
        }
    }

    fn modifiers(&self) -> &'d Modifiers {
        match self {
            Markable::Class(class) => &class.modifiers,
            Markable::Function(function) => &function.modifiers,
            Markable::Property(property) => &property.modifiers,
        }
    }
}

/// Annotates exportable declarations with the export marker.
#[derive(Debug, Clone, Default)]
pub struct ExportPass {
    filter: ExportFilter,
    options: EvaluatorOptions,
}

impl ExportPass {
    pub fn new(filter: ExportFilter, options: EvaluatorOptions) -> Self {
        Self { filter, options }
    }

    /// Compile `patterns` into the pass filter.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S], separator: char) -> Result<Self> {
        Ok(Self::new(
            ExportFilter::new(patterns, separator)?,
            EvaluatorOptions::default(),
        ))
    }

    pub fn options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn filter(&self) -> &ExportFilter {
        &self.filter
    }

    /// Run the pass over `graph`, marking every declaration that can be
    /// exported.
    ///
    /// Fails, after reporting at error severity, when the graph is malformed.
    /// Nothing is marked in that case.
    pub fn run(
        &self,
        graph: &mut ModuleGraph,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PassReport> {
        let span = tracing::info_span!("export_pass", module = %graph.name);
        let _enter = span.enter();

        sink.report(Severity::Info, &self.banner());

        let (plan, report) = self.plan(graph, sink)?;
        for path in &plan {
            graph.declaration_mut(path)?.mark_exported();
        }

        tracing::debug!(
            exported = report.exported.len(),
            rejected = report.rejected.len(),
            skipped = report.skipped.len(),
            "export pass finished"
        );
        Ok(report)
    }

    fn banner(&self) -> String {
        if self.filter.is_empty() {
            return "Exporting all public declarations".to_string();
        }
        let patterns: Vec<String> = self.filter.patterns().map(|p| format!("'{p}'")).collect();
        format!(
            "Exporting declarations that match one of: [{}]",
            patterns.join(", ")
        )
    }

    fn plan(
        &self,
        graph: &ModuleGraph,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(Vec<DeclPath>, PassReport)> {
        let mut evaluator = Evaluator::new(graph, self.options);
        let mut report = PassReport::new(graph.name.clone());
        let mut plan = Vec::new();

        for (path, decl) in graph.walk() {
            let Some(target) = Markable::of(&path, decl) else {
                continue;
            };
            let name = target.fq_name().to_string();
            let kind = decl.kind_label();

            let decision = match self.decide(&mut evaluator, target) {
                Ok(decision) => decision,
                Err(e) => {
                    sink.report(
                        Severity::Error,
                        &format!("Cannot decide whether to export {name}: {e}"),
                    );
                    return Err(e);
                }
            };

            match decision {
                Decision::Export => {
                    sink.report(Severity::Info, &format!("Exporting {name}"));
                    for site in conversion_sites(target) {
                        sink.report(
                            Severity::Trace,
                            &format!("{site} needs a runtime collection conversion"),
                        );
                        report.needs_conversion.push(site);
                    }
                    report.exported.push(name);
                    plan.push(path);
                }
                Decision::AlreadyExported => {
                    sink.report(Severity::Trace, &format!("{name} is already exported"));
                    report.already_exported.push(name);
                }
                Decision::Skip(reason) => {
                    let (severity, message) = match &reason {
                        SkipReason::Filtered => (
                            Severity::Info,
                            format!("Skipping {name}: no export pattern matches"),
                        ),
                        SkipReason::NotPublic(_) => {
                            (Severity::Trace, format!("Not exporting {name}: {reason}"))
                        }
                        SkipReason::Platform(flag) => {
                            (skip_severity(*flag), format!("Not exporting {name}: {reason}"))
                        }
                    };
                    sink.report(severity, &message);
                    report.skipped.push(SkippedDeclaration { name, kind, reason });
                }
                Decision::Reject(reason) => {
                    sink.report(
                        Severity::Warning,
                        &format!("Will not export {name} due to {reason}"),
                    );
                    report.rejected.push(RejectedDeclaration { name, kind, reason });
                }
            }
        }

        report.memo = evaluator.memo_stats();
        Ok((plan, report))
    }

    fn decide(&self, evaluator: &mut Evaluator<'_>, target: Markable<'_>) -> Result<Decision> {
        if target.is_exported() {
            return Ok(Decision::AlreadyExported);
        }
        if !self.filter.matches(target.fq_name().as_str()) {
            return Ok(Decision::Skip(SkipReason::Filtered));
        }
        if let Some(reason) = gate(target) {
            return Ok(Decision::Skip(reason));
        }

        let verdict = match target {
            Markable::Class(class) => evaluator.class_verdict(class)?,
            Markable::Function(function) => evaluator.function_verdict(function)?,
            Markable::Property(property) => evaluator.property_verdict(property)?,
        };
        Ok(match verdict {
            Verdict::Exportable => Decision::Export,
            Verdict::Rejected(rejection) => Decision::Reject(rejection),
        })
    }
}

/// The cheap checks that keep a declaration away from the evaluator.
fn gate(target: Markable<'_>) -> Option<SkipReason> {
    let visibility = target.visibility();
    if visibility != Visibility::Public {
        return Some(SkipReason::NotPublic(visibility));
    }
    let modifiers = target.modifiers();
    let is_class = matches!(target, Markable::Class(_));
    let flag = if modifiers.expect {
        PlatformFlag::Expect
    } else if modifiers.external {
        PlatformFlag::External
    } else if modifiers.inline && matches!(target, Markable::Function(_)) {
        PlatformFlag::Inline
    } else if modifiers.suspend {
        PlatformFlag::Suspend
    } else if modifiers.value || (modifiers.inline && is_class) {
        PlatformFlag::Value
    } else if matches!(target, Markable::Class(c) if c.is_annotation_class()) {
        PlatformFlag::Annotation
    } else if modifiers.anonymous {
        PlatformFlag::Anonymous
    } else {
        return None;
    };
    Some(SkipReason::Platform(flag))
}

/// Public signatures of an exported declaration that carry a collection
/// type, which the JavaScript side only sees through a conversion shim.
fn conversion_sites(target: Markable<'_>) -> Vec<String> {
    let mut sites = Vec::new();
    let function_site = |function: &FunctionDecl| {
        std::iter::once(&function.return_type)
            .chain(function.parameters.iter().map(|p| &p.ty))
            .any(builtin::needs_conversion)
    };
    let property_site = |property: &PropertyDecl| {
        property
            .resolved_type()
            .is_ok_and(builtin::needs_conversion)
    };

    match target {
        Markable::Class(class) => {
            for ctor in class.constructors().filter(|c| c.visibility == Visibility::Public) {
                if ctor.parameters.iter().any(|p| builtin::needs_conversion(&p.ty)) {
                    sites.push(ctor.signature(&class.fq_name));
                }
            }
            for property in class.properties().filter(|p| p.visibility == Visibility::Public) {
                if property_site(property) {
                    sites.push(property.signature());
                }
            }
            for method in class.methods().filter(|m| m.visibility == Visibility::Public) {
                if function_site(method) {
                    sites.push(method.signature());
                }
            }
        }
        Markable::Function(function) => {
            if function_site(function) {
                sites.push(function.signature());
            }
        }
        Markable::Property(property) => {
            if property_site(property) {
                sites.push(property.signature());
            }
        }
    }
    sites
}

/// Value classes and suspend functions are likely to surprise the author, so
/// they are reported louder than the rest.
fn skip_severity(flag: PlatformFlag) -> Severity {
    match flag {
        PlatformFlag::Value | PlatformFlag::Suspend => Severity::Warning,
        _ => Severity::Trace,
    }
}
