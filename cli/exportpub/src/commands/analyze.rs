//! `exportpub analyze` — run the export pass over a declaration graph.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use exportpub_analysis::{EvaluatorOptions, ExportPass, PassReport, TracingSink};
use exportpub_glob::ExportFilter;
use exportpub_model::ModuleGraph;

use crate::manifest::{split_pattern_option, ExportpubManifest};

/// Report formats understood by `--report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
}

impl ReportFormat {
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name {
            Some("human") | None => Ok(ReportFormat::Human),
            Some("json") => Ok(ReportFormat::Json),
            Some(other) => bail!("unknown report format: '{other}'. Choose: human, json"),
        }
    }
}

/// Patterns in effect: command-line patterns when any are given, otherwise
/// the manifest's.
pub fn resolve_patterns(
    cli_patterns: &[String],
    export_patterns: Option<&str>,
    manifest: Option<&ExportpubManifest>,
) -> Vec<String> {
    let mut patterns = cli_patterns.to_vec();
    if let Some(joined) = export_patterns {
        patterns.extend(split_pattern_option(joined));
    }
    if patterns.is_empty() {
        if let Some(m) = manifest {
            patterns = m.export.patterns.clone();
        }
    }
    patterns
}

/// Load `input`, run the pass and return the annotated graph with its report.
pub fn analyze(
    input: &Path,
    patterns: &[String],
    separator: char,
    options: EvaluatorOptions,
) -> Result<(ModuleGraph, PassReport)> {
    if !input.exists() {
        bail!("graph file not found: {}", input.display());
    }
    let mut graph =
        ModuleGraph::load(input).with_context(|| format!("loading {}", input.display()))?;
    let filter = ExportFilter::new(patterns, separator).context("compiling export patterns")?;

    let pass = ExportPass::new(filter, options);
    let report = pass
        .run(&mut graph, &mut TracingSink)
        .with_context(|| format!("export pass over {}", input.display()))?;
    Ok((graph, report))
}

/// Run the export pass and print its report.
pub fn run(
    manifest: Option<&ExportpubManifest>,
    input: &Path,
    cli_patterns: &[String],
    export_patterns: Option<&str>,
    report_format: Option<&str>,
    output: Option<&Path>,
    lenient_properties: bool,
) -> Result<()> {
    let format = ReportFormat::parse(report_format)?;
    let defaults = manifest.map(|m| m.export.clone()).unwrap_or_default();

    let patterns = resolve_patterns(cli_patterns, export_patterns, manifest);
    let options = EvaluatorOptions {
        check_property_types: defaults.check_property_types && !lenient_properties,
    };

    let (graph, report) = analyze(input, &patterns, defaults.separator, options)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Human => print!("{report}"),
    }

    if let Some(path) = output {
        let json = graph.to_json_pretty()?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("annotated graph written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exportpub_model::builder::ClassBuilder;
    use exportpub_model::{Declaration, SourceFile, Type};

    fn write_graph(dir: &Path) -> std::path::PathBuf {
        let graph = ModuleGraph::new("sample").with_file(
            SourceFile::new("code.kt", "com.example")
                .with(Declaration::Class(
                    ClassBuilder::new("com.example.api.Client")
                        .property("url", Type::class("kotlin.String"))
                        .build(),
                ))
                .with(Declaration::Class(
                    ClassBuilder::new("com.example.internal.Cache")
                        .property("size", Type::class("kotlin.Long"))
                        .build(),
                )),
        );
        let path = dir.join("graph.json");
        fs::write(&path, graph.to_json_pretty().unwrap()).unwrap();
        path
    }

    fn names(graph: &ModuleGraph) -> Vec<String> {
        graph
            .exported_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn analyze_marks_matching_classes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_graph(dir.path());

        let (graph, report) = analyze(
            &input,
            &["com.example.api.**".to_string()],
            '.',
            EvaluatorOptions::default(),
        )
        .unwrap();
        assert_eq!(names(&graph), vec!["com.example.api.Client"]);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn analyze_without_patterns_reports_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_graph(dir.path());

        let (_, report) = analyze(&input, &[], '.', EvaluatorOptions::default()).unwrap();
        assert!(report.is_exported("com.example.api.Client"));
        assert!(report.rejection_of("com.example.internal.Cache").is_some());

        let (_, lenient) = analyze(
            &input,
            &[],
            '.',
            EvaluatorOptions {
                check_property_types: false,
            },
        )
        .unwrap();
        assert!(lenient.is_exported("com.example.internal.Cache"));
    }

    #[test]
    fn run_writes_annotated_graph() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_graph(dir.path());
        let output = dir.path().join("out.json");

        run(
            None,
            &input,
            &["com.example.api.*".to_string()],
            None,
            Some("json"),
            Some(&output),
            false,
        )
        .unwrap();

        let written = ModuleGraph::load(&output).unwrap();
        assert_eq!(names(&written), vec!["com.example.api.Client"]);
    }

    #[test]
    fn missing_graph_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze(
            &dir.path().join("nope.json"),
            &[],
            '.',
            EvaluatorOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("graph file not found"));
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_graph(dir.path());
        let err = analyze(&input, &["com.[".to_string()], '.', EvaluatorOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("compiling export patterns"));
    }

    #[test]
    fn cli_patterns_override_manifest() {
        let manifest = ExportpubManifest::parse("[export]\npatterns = [\"from.manifest\"]").unwrap();
        assert_eq!(
            resolve_patterns(&[], None, Some(&manifest)),
            vec!["from.manifest"]
        );
        assert_eq!(
            resolve_patterns(&["from.cli".to_string()], None, Some(&manifest)),
            vec!["from.cli"]
        );
        let sep = if cfg!(windows) { ";" } else { ":" };
        assert_eq!(
            resolve_patterns(&[], Some(&format!("a.*{sep}b.*")), Some(&manifest)),
            vec!["a.*", "b.*"]
        );
    }

    #[test]
    fn unknown_report_format() {
        assert!(ReportFormat::parse(Some("xml")).is_err());
        assert_eq!(ReportFormat::parse(None).unwrap(), ReportFormat::Human);
    }
}
