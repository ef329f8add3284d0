//! exportpub CLI — mark the declarations of a module graph that can be
//! exported to JavaScript.

mod commands;
mod logger;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use manifest::ExportpubManifest;

#[derive(Parser)]
#[command(
    name = "exportpub",
    version,
    about = "Export public declarations to JavaScript"
)]
struct Cli {
    /// Show debug and trace output
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Only show errors
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the export pass over a declaration graph
    Analyze {
        /// Declaration graph (JSON)
        input: PathBuf,
        /// Export pattern, repeatable (overrides exportpub.toml)
        #[arg(long = "pattern", short = 'p')]
        patterns: Vec<String>,
        /// Export patterns joined by the platform path separator
        #[arg(long)]
        export_patterns: Option<String>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
        /// Write the annotated graph to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Check only getter receivers of properties, not their value types
        #[arg(long)]
        lenient_properties: bool,
    },
    /// Show how an export pattern compiles and which names it selects
    Glob {
        /// Glob pattern
        pattern: String,
        /// Qualified names to test
        names: Vec<String>,
        /// Segment separator
        #[arg(long, default_value_t = '.')]
        separator: char,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let manifest = load_manifest_optional(&cwd)?;

    logger::init_logger(
        cli.verbose,
        cli.quiet,
        cli.no_color,
        manifest.as_ref().and_then(|m| m.log.level.as_deref()),
    );

    match cli.command {
        Commands::Analyze {
            input,
            patterns,
            export_patterns,
            report,
            output,
            lenient_properties,
        } => commands::analyze::run(
            manifest.as_ref(),
            &input,
            &patterns,
            export_patterns.as_deref(),
            report.as_deref(),
            output.as_deref(),
            lenient_properties,
        ),

        Commands::Glob {
            pattern,
            names,
            separator,
        } => commands::glob::run(&pattern, &names, separator),
    }
}

/// Try to load a manifest from the current directory upward.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<Option<ExportpubManifest>> {
    let found = ExportpubManifest::find_and_load(cwd)?;
    if let Some((_, dir)) = &found {
        tracing::debug!("using {}", dir.join(manifest::MANIFEST_FILE).display());
    }
    Ok(found.map(|(manifest, _)| manifest))
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "exportpub",
            "analyze",
            "graph.json",
            "-p",
            "com.a.**",
            "--pattern",
            "com.b.*",
            "--report",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                input,
                patterns,
                report,
                ..
            } => {
                assert_eq!(input, PathBuf::from("graph.json"));
                assert_eq!(patterns, vec!["com.a.**", "com.b.*"]);
                assert_eq!(report.as_deref(), Some("json"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn cli_parses_glob_with_separator() {
        let cli = Cli::try_parse_from(["exportpub", "glob", "a/*", "a/b", "--separator", "/"])
            .unwrap();
        match cli.command {
            Commands::Glob {
                pattern,
                names,
                separator,
            } => {
                assert_eq!(pattern, "a/*");
                assert_eq!(names, vec!["a/b"]);
                assert_eq!(separator, '/');
            }
            _ => panic!("expected glob"),
        }
    }

    /// Manifest patterns apply when the command line gives none.
    #[test]
    fn manifest_drives_analyze() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(manifest::MANIFEST_FILE),
            "[export]\npatterns = [\"demo.Keep*\"]\n",
        )
        .unwrap();
        let graph = r#"{
            "name": "demo",
            "files": [{
                "path": "demo.kt",
                "package": "demo",
                "declarations": [
                    { "decl": "class", "fq-name": "demo.KeepMe" },
                    { "decl": "class", "fq-name": "demo.DropMe" }
                ]
            }]
        }"#;
        let input = dir.path().join("graph.json");
        let output = dir.path().join("annotated.json");
        std::fs::write(&input, graph).unwrap();

        let manifest = load_manifest_optional(dir.path()).unwrap();
        commands::analyze::run(
            manifest.as_ref(),
            &input,
            &[],
            None,
            None,
            Some(&output),
            false,
        )
        .unwrap();

        let annotated = exportpub_model::ModuleGraph::load(&output).unwrap();
        let names: Vec<String> = annotated
            .exported_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["demo.KeepMe"]);
    }
}
