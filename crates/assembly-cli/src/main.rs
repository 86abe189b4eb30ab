// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Assembly CLI entrypoint.
//!
//! Developer-facing commands for scene documents: inspect and convert files,
//! dry-run a reload against the headless mock viewer, and manage documents
//! in the local scene store.
//!
//! # Usage
//! ```text
//! assembly [-v] [--settings FILE] <command> [options]
//! ```
//!
//! Documents go to stdout; logs go to stderr (`RUST_LOG` overrides the level).
//! The CLI exits with code `0` on success and non-zero on error.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use assembly_codec::{
    deserialize_scene, AssemblySettings, LoadReport, MockViewer, PartOutcome, SceneDocument,
};
use assembly_port::CadViewer;
use assembly_store::{FsSceneStore, SceneRepository};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assembly scene document tool")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Codec settings (JSON). Defaults apply when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a document and list structural issues.
    Inspect {
        /// Scene document (full or compact JSON).
        file: PathBuf,
    },
    /// Print the compact one-part-per-line form.
    Compact {
        /// Scene document (full or compact JSON).
        file: PathBuf,
    },
    /// Print the full pretty-printed form.
    Expand {
        /// Scene document (full or compact JSON).
        file: PathBuf,
        /// Override the document's scene id.
        #[arg(long)]
        scene_id: Option<String>,
    },
    /// Print the canonical file name for each display name.
    Normalize {
        /// Display names or paths.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Dry-run a reload against the mock viewer.
    Replay {
        /// Scene document (full or compact JSON).
        file: PathBuf,
        /// Make loads from this URL fail (repeatable).
        #[arg(long, value_name = "URL")]
        fail: Vec<String>,
    },
    /// Store a document under a scene id.
    Save {
        /// Scene id.
        scene_id: String,
        /// Scene document (full or compact JSON).
        file: PathBuf,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print the stored document of a scene.
    Load {
        /// Scene id.
        scene_id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Remove the stored document of a scene.
    Delete {
        /// Scene id.
        scene_id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Store root. Defaults to the platform data directory.
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,
}

impl StoreArgs {
    fn open(&self, settings: AssemblySettings) -> Result<SceneRepository<FsSceneStore>> {
        let store = match &self.store {
            Some(dir) => FsSceneStore::at(dir)
                .with_context(|| format!("opening store at {}", dir.display()))?,
            None => FsSceneStore::new().context("opening default store")?,
        };
        debug!(root = %store.base().display(), "scene store opened");
        Ok(SceneRepository::with_settings(store, settings))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let settings = read_settings(cli.settings.as_deref())?;
    run(cli.command, settings).await
}

async fn run(command: Command, settings: AssemblySettings) -> Result<()> {
    match command {
        Command::Inspect { file } => {
            let document = read_document(&file, &settings)?;
            println!("{}", inspect(&document, &settings));
        }
        Command::Compact { file } => {
            let document = read_document(&file, &settings)?;
            println!("{}", document.to_compact_json(&settings.suffix)?);
        }
        Command::Expand { file, scene_id } => {
            let mut document = read_document(&file, &settings)?;
            if let Some(scene_id) = scene_id {
                document.metadata.scene_id = scene_id;
            }
            println!("{}", document.to_json_pretty()?);
        }
        Command::Normalize { names } => {
            for name in names {
                println!("{}", settings.file_name_for(&name));
            }
        }
        Command::Replay { file, fail } => {
            let document = read_document(&file, &settings)?;
            let report = replay(&document, fail, &settings).await?;
            println!("{}", describe_report(&report));
        }
        Command::Save {
            scene_id,
            file,
            store,
        } => {
            let document = read_document(&file, &settings)?;
            store.open(settings)?.save(&scene_id, &document)?;
            info!(%scene_id, "scene saved");
        }
        Command::Load { scene_id, store } => match store.open(settings)?.load(&scene_id)? {
            Some(document) => println!("{}", document.to_json_pretty()?),
            None => bail!("no saved scene {scene_id:?}"),
        },
        Command::Delete { scene_id, store } => {
            store.open(settings)?.delete(&scene_id)?;
            info!(%scene_id, "scene deleted");
        }
    }
    Ok(())
}

/// `RUST_LOG` when set, else `debug` with `-v` and `info` without.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn read_settings(path: Option<&Path>) -> Result<AssemblySettings> {
    let Some(path) = path else {
        return Ok(AssemblySettings::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
}

fn read_document(path: &Path, settings: &AssemblySettings) -> Result<SceneDocument> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    SceneDocument::parse_slice(&bytes, settings)
        .with_context(|| format!("parsing scene document {}", path.display()))
}

fn inspect(document: &SceneDocument, settings: &AssemblySettings) -> String {
    let issues = document.validate(&settings.suffix);
    let mut table = Table::new();
    table.set_header(vec!["#", "nodeId", "fileName", "visible", "preset", "cadUrl", "issue"]);
    for (index, part) in document.parts.iter().enumerate() {
        let issue = issues
            .iter()
            .find(|(at, _)| *at == index)
            .map_or_else(String::new, |(_, err)| err.to_string());
        let preset = part.is_preset.map_or_else(|| "?".to_owned(), |p| p.to_string());
        table.add_row(vec![
            index.to_string(),
            part.node_id.to_string(),
            part.label().to_owned(),
            part.visible.to_string(),
            preset,
            part.cad_url.clone().unwrap_or_default(),
            issue,
        ]);
    }

    let version = if document.is_current_version() {
        document.version.clone()
    } else {
        format!("{:?} (unrecognized)", document.version)
    };
    format!(
        "scene: {}\nsaved: {}\nversion: {version}\nparts: {} ({} with issues)\n{table}",
        document.metadata.scene_id,
        document.metadata.saved_at,
        document.parts.len(),
        issues.len(),
    )
}

async fn replay(
    document: &SceneDocument,
    fail: Vec<String>,
    settings: &AssemblySettings,
) -> Result<LoadReport> {
    let mut viewer = MockViewer::accepting_any();
    if let Some(model) = viewer.model_mut() {
        for url in fail {
            model.reject_url(url);
        }
    }
    let loaded = deserialize_scene(&mut viewer, document, settings).await?;
    Ok(loaded.report)
}

fn describe_report(report: &LoadReport) -> String {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            PartOutcome::Loaded {
                index,
                previous_node_id,
                node_id,
                cad_url,
                extra_nodes,
            } => {
                let extra = if extra_nodes.is_empty() {
                    String::new()
                } else {
                    format!(" (+{} untracked)", extra_nodes.len())
                };
                format!("#{index} loaded {previous_node_id} -> {node_id} from {cad_url}{extra}")
            }
            PartOutcome::Skipped {
                index,
                file_name,
                reason,
                created_nodes,
                ..
            } => {
                let left = if created_nodes.is_empty() {
                    String::new()
                } else {
                    format!(" ({} node(s) left in the engine)", created_nodes.len())
                };
                format!("#{index} skipped {file_name}: {reason}{left}")
            }
        })
        .collect();
    if let Some(warning) = &report.version_warning {
        lines.push(format!("warning: {warning}"));
    }
    lines.push(report.status_message());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_codec::{PartRecord, PresetCatalog};
    use assembly_port::NodeMatrix;
    use clap::CommandFactory;

    fn record(name: &str, matrix: Vec<f64>) -> PartRecord {
        PartRecord {
            node_id: 12,
            name: name.into(),
            file_name: String::new(),
            matrix,
            visible: true,
            cad_url: None,
            is_preset: None,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = ["assembly", "replay", "s.json", "--fail", "u1", "--fail", "u2", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Replay { fail, .. } => assert_eq!(fail, vec!["u1", "u2"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn normalize_requires_a_name() {
        assert!(Cli::try_parse_from(["assembly", "normalize"]).is_err());
    }

    #[test]
    fn inspect_lists_issues_per_row() {
        let doc = SceneDocument::new(
            "s",
            "2025-01-01T00:00:00Z",
            vec![record("axe", NodeMatrix::IDENTITY.values().to_vec()), record("short", vec![1.0])],
        );
        let text = inspect(&doc, &AssemblySettings::default());
        assert!(text.contains("parts: 2 (1 with issues)"));
        assert!(text.contains("16"));
        assert!(text.contains("version: 1.0"));
    }

    #[tokio::test]
    async fn replay_reports_failures_and_status() {
        let settings =
            AssemblySettings::with_presets(PresetCatalog::new("/preset_parts/", ["axe"]));
        let matrix = NodeMatrix::IDENTITY.values().to_vec();
        let doc = SceneDocument::new(
            "s",
            "2025-01-01T00:00:00Z",
            vec![record("axe", matrix.clone()), record("gear", matrix)],
        );
        let report = replay(&doc, vec!["/preset_parts/gear.scs".into()], &settings)
            .await
            .unwrap();
        let text = describe_report(&report);
        assert!(text.contains("#0 loaded 12 -> "));
        assert!(text.contains("/preset_parts/axe.scs"));
        assert!(text.contains("#1 skipped gear: "));
        assert!(text.ends_with("Loaded 1 of 2 parts"));
    }
}
