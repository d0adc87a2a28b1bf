use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::assemble::build_working_document;
use crate::config::load_column_config;
use crate::grouping::build_groups;
use crate::input::{expand_user, load_conversations, load_patterns, load_used_links};
use crate::models::{BuildMode, BuildOptions, MAX_CONTEXT, MIN_CONTEXT, RenderContext};
use crate::render::render_raw;
use crate::utils::safe_slug;

#[derive(Parser)]
#[command(name = "chat-dossier")]
#[command(version = "0.1.0")]
#[command(about = "Assemble chat-export conversations into a dossier document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Full,
    Excerpts,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => BuildMode::Full,
            ModeArg::Excerpts => BuildMode::Excerpts,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a dossier from a normalized conversation export
    Build {
        /// Normalized conversation records (JSON array)
        #[arg(long)]
        input: PathBuf,
        /// Topic term; repeat for multiple topics
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Full transcripts or topic excerpts
        #[arg(long, value_enum, default_value_t = ModeArg::Full)]
        mode: ModeArg,
        /// Messages of context around each excerpt hit
        #[arg(long, default_value_t = 2)]
        context: usize,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Named subfolder for the output instead of the flat file name
        #[arg(long)]
        name: Option<String>,
        /// Also write the cleaned working variant
        #[arg(long)]
        split: bool,
        /// Disable paragraph-level deduplication in the working variant
        #[arg(long)]
        no_dedup: bool,
        /// Keep only deliverable sections, using the built-in header patterns
        #[arg(long, conflicts_with = "patterns_file")]
        deliverables_only: bool,
        /// Keep only deliverable sections, using patterns from this file
        #[arg(long)]
        patterns_file: Option<String>,
        /// File of URLs already used in drafts (one per line, # comments)
        #[arg(long)]
        used_links: Option<String>,
        /// Column config JSON file
        #[arg(long)]
        config: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build {
            input,
            topics,
            mode,
            context,
            out,
            name,
            split,
            no_dedup,
            deliverables_only,
            patterns_file,
            used_links,
            config,
        }) => build(BuildArgs {
            input,
            topics,
            mode,
            context,
            out,
            name,
            split,
            no_dedup,
            deliverables_only,
            patterns_file,
            used_links,
            config,
        }),
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

struct BuildArgs {
    input: PathBuf,
    topics: Vec<String>,
    mode: ModeArg,
    context: usize,
    out: PathBuf,
    name: Option<String>,
    split: bool,
    no_dedup: bool,
    deliverables_only: bool,
    patterns_file: Option<String>,
    used_links: Option<String>,
    config: Option<String>,
}

fn build(args: BuildArgs) -> Result<()> {
    if args.context < MIN_CONTEXT || args.context > MAX_CONTEXT {
        bail!("--context must be between {} and {}", MIN_CONTEXT, MAX_CONTEXT);
    }

    let config = match &args.config {
        Some(path) => Some(load_column_config(path)?),
        None => None,
    };

    let patterns = if let Some(path) = &args.patterns_file {
        Some(load_patterns(&expand_user(path))?)
    } else if args.deliverables_only {
        Some(Vec::new())
    } else {
        None
    };

    let used_links = match &args.used_links {
        Some(path) => Some(load_used_links(&expand_user(path))?),
        None => None,
    };

    let conversations = load_conversations(&args.input)?;
    if conversations.is_empty() {
        bail!("No conversations found in {}", args.input.display());
    }

    // Config search terms extend the topic list for excerpting and scoring
    let mut topics = args.topics.clone();
    if let Some(config) = &config {
        topics.extend(config.search_terms.iter().cloned());
    }

    let opts = BuildOptions {
        mode: args.mode.into(),
        context: args.context,
        dedup: !args.no_dedup,
        split: args.split,
        patterns,
        used_links,
        config,
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    let ctx = RenderContext::new(now, args.input.clone());

    let groups = build_groups(conversations.clone());
    let raw_txt = render_raw(&groups, &topics, &opts, &ctx)?;

    let txt_path = output_path(&args, now)?;
    if let Some(parent) = txt_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut created_primary: Option<PathBuf> = None;
    match fs::write(&txt_path, &raw_txt) {
        Ok(()) => created_primary = Some(txt_path.clone()),
        Err(e) => eprintln!("WARNING: TXT generation failed: {}", e),
    }

    if opts.split {
        match build_working_document(&raw_txt, &conversations, &topics, &opts, &ctx) {
            Ok(working_txt) => {
                let working_path = working_variant_path(&txt_path);
                match fs::write(&working_path, &working_txt) {
                    Ok(()) => {
                        if created_primary.is_none() {
                            created_primary = Some(working_path);
                        }
                    }
                    Err(e) => eprintln!("WARNING: Working TXT generation failed: {}", e),
                }
            }
            Err(e) => eprintln!("WARNING: Working TXT processing failed: {}", e),
        }
    }

    let Some(primary) = created_primary else {
        bail!("No dossier output files were created. Check the output directory.");
    };
    println!("Wrote dossier: {}", primary.display());
    Ok(())
}

fn output_path(args: &BuildArgs, now: f64) -> Result<PathBuf> {
    let timestamp = DateTime::<Utc>::from_timestamp(now as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d_%H%M%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let Some(name) = &args.name {
        let normalized = safe_slug(name, 80);
        if normalized.is_empty() || normalized == "." || normalized == ".." {
            bail!("--name must contain at least one safe alphanumeric character");
        }
        return Ok(args.out.join(normalized).join(format!("{}.txt", timestamp)));
    }

    let topic_label = args.topics.join(", ");
    let slug = if topic_label.is_empty() {
        "dossier".to_string()
    } else {
        safe_slug(&topic_label, 80)
    };
    Ok(args.out.join(format!("dossier__{}__{}.txt", slug, timestamp.replace('-', ""))))
}

fn working_variant_path(txt_path: &Path) -> PathBuf {
    let stem = txt_path.file_stem().and_then(|s| s.to_str()).unwrap_or("dossier");
    txt_path.with_file_name(format!("{}__working.txt", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildArgs {
        BuildArgs {
            input: PathBuf::from("export.json"),
            topics: vec!["tariff".to_string()],
            mode: ModeArg::Full,
            context: 2,
            out: PathBuf::from("/tmp/dossiers"),
            name: None,
            split: false,
            no_dedup: false,
            deliverables_only: false,
            patterns_file: None,
            used_links: None,
            config: None,
        }
    }

    #[test]
    fn test_output_path_flat_naming() {
        let path = output_path(&args(), 1_700_000_000.0).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("dossier__tariff__"));
        assert!(name.ends_with(".txt"));
        // Date dashes are squeezed out of the timestamp part
        assert_eq!(name.matches('-').count(), 0);
    }

    #[test]
    fn test_output_path_named_subfolder() {
        let mut a = args();
        a.name = Some("trade watch!".to_string());
        let path = output_path(&a, 1_700_000_000.0).unwrap();
        assert!(path.starts_with("/tmp/dossiers/trade_watch"));
        assert!(path.to_str().unwrap().ends_with(".txt"));
    }

    #[test]
    fn test_output_path_name_rejects_unsafe() {
        let mut a = args();
        a.name = Some("!!!".to_string());
        assert!(output_path(&a, 1_700_000_000.0).is_err());
    }

    #[test]
    fn test_working_variant_path() {
        let path = PathBuf::from("/tmp/dossier__x__20231114.txt");
        assert_eq!(
            working_variant_path(&path),
            PathBuf::from("/tmp/dossier__x__20231114__working.txt")
        );
    }
}
