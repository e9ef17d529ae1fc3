use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use schemars::schema_for;
use serde::Serialize;
use storyboard_assets::{AssetCatalog, CatalogEntry};
use storyboard_engine::{
    format_duration, synthesize, FileStore, GenerationOutcome, HydrationOutcome,
    PersistedStoryboard, ResolvedConfig, Scene, StateStore, StoryboardAction, StoryboardConfig,
    StoryboardSession,
};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about = "Storyboard scene synthesis CLI")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Command {
    /// Print the scenes synthesized from a script file (`-` reads stdin).
    Synthesize {
        script: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print validation warnings for a script file.
    Warnings {
        script: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print suggested illustrations for keywords.
    Suggest {
        keywords: Vec<String>,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Generate a storyboard from a script and persist it.
    Generate {
        script: PathBuf,
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        illustrate: bool,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Apply a JSON array of storyboard actions to the persisted storyboard.
    Replay {
        actions: PathBuf,
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Summarise the persisted storyboard.
    Show {
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build a catalog JSON from a directory of SVG files.
    Catalog {
        svgs: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "Illustration")]
        category: String,
    },
    /// Print the JSON schema of the persisted storyboard.
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Synthesize { script, format } => print_synthesis(&script, format),
        Command::Warnings { script, config } => print_warnings(&script, config.as_deref()),
        Command::Suggest { keywords, catalog } => print_suggestions(&keywords, catalog.as_deref()),
        Command::Generate {
            script,
            state,
            illustrate,
            catalog,
            config,
        } => generate(
            &script,
            state,
            illustrate,
            catalog.as_deref(),
            config.as_deref(),
        ),
        Command::Replay {
            actions,
            state,
            config,
        } => replay(&actions, state, config.as_deref()),
        Command::Show { state, config } => show(state, config.as_deref()),
        Command::Catalog {
            svgs,
            output,
            category,
        } => write_catalog(&svgs, &output, &category),
        Command::Schema => print_schema(),
    }
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut script = String::new();
        std::io::stdin()
            .read_to_string(&mut script)
            .context("read script from stdin")?;
        return Ok(script);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn resolve_config(path: Option<&Path>, state: Option<PathBuf>) -> Result<ResolvedConfig> {
    let mut config = match path {
        Some(path) => StoryboardConfig::load_from(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => StoryboardConfig::default(),
    };
    if state.is_some() {
        config.storage_path = state;
    }
    Ok(config.resolve())
}

fn load_catalog(path: Option<&Path>) -> Result<AssetCatalog> {
    match path {
        Some(path) => AssetCatalog::load_from(path)
            .with_context(|| format!("load catalog {}", path.display())),
        None => AssetCatalog::builtin().context("load builtin catalog"),
    }
}

fn print_synthesis(path: &Path, format: Format) -> Result<()> {
    let script = read_script(path)?;
    let scenes = synthesize(&script);
    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&scenes)?,
        Format::Yaml => serde_yaml::to_string(&scenes)?,
    };
    println!("{rendered}");
    Ok(())
}

fn print_warnings(path: &Path, config: Option<&Path>) -> Result<()> {
    let script = read_script(path)?;
    let config = resolve_config(config, None)?;
    let warnings = config.warning_policy().warnings(&script);
    if warnings.is_empty() {
        println!("no warnings");
    }
    for warning in warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

fn print_suggestions(keywords: &[String], catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    for entry in catalog.suggest_entries(keywords) {
        println!("{}\t{}\t{}", entry.id, entry.library, entry.name);
    }
    Ok(())
}

fn generate(
    script_path: &Path,
    state: Option<PathBuf>,
    illustrate: bool,
    catalog: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let script = read_script(script_path)?;
    let config = resolve_config(config, state)?;
    let store = FileStore::new(&config.storage_path);
    let mut session = StoryboardSession::open(store, config);
    if let HydrationOutcome::Corrupt(reason) = session.hydration() {
        warn!(%reason, "ignoring unreadable stored storyboard");
    }

    session.set_script(script);
    match session.generate() {
        GenerationOutcome::Committed { scenes } => info!(scenes, "storyboard generated"),
        GenerationOutcome::Failed { reason } => warn!(%reason, "generation failed"),
    }
    if illustrate {
        let catalog = load_catalog(catalog)?;
        let assigned = session.auto_illustrate(&catalog, None);
        info!(assigned, "scenes illustrated");
    }

    let path = session.config().storage_path.clone();
    let bytes = session
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    for warning in &session.state().warnings {
        println!("warning: {warning}");
    }
    print_scenes(&session.state().scenes);
    println!("saved {bytes} bytes to {}", path.display());
    Ok(())
}

fn replay(actions_path: &Path, state: Option<PathBuf>, config: Option<&Path>) -> Result<()> {
    let input = read_script(actions_path)?;
    let actions = StoryboardAction::parse_log(&input)
        .map_err(|err| anyhow::anyhow!("{:?}", miette::Report::new(err)))
        .with_context(|| format!("parse {}", actions_path.display()))?;
    let config = resolve_config(config, state)?;
    let store = FileStore::new(&config.storage_path);
    let mut session = StoryboardSession::open(store, config);
    let applied = actions.len();
    for action in actions {
        session.apply(action);
    }
    let path = session.config().storage_path.clone();
    session
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    info!(applied, path = %path.display(), "action log replayed");
    print_scenes(&session.state().scenes);
    Ok(())
}

fn show(state: Option<PathBuf>, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config, state)?;
    let store = FileStore::new(&config.storage_path);
    let Some(state) = store
        .load()
        .with_context(|| format!("read {}", config.storage_path.display()))?
    else {
        println!("no storyboard stored at {}", config.storage_path.display());
        return Ok(());
    };
    println!(
        "{} scenes, {} total",
        state.scenes.len(),
        format_duration(state.total_duration())
    );
    if let Some(active) = state.active_scene() {
        println!("active: {}", active.title);
    }
    print_scenes(&state.scenes);
    Ok(())
}

fn print_scenes(scenes: &[Scene]) {
    for (index, scene) in scenes.iter().enumerate() {
        let asset = scene
            .asset
            .as_ref()
            .map(|asset| asset.id.as_str())
            .unwrap_or("-");
        println!(
            "{:>2}. {:<28} {:>6} {:<8} {:<7} {:<6} {} [{}]",
            index + 1,
            scene.title,
            format_duration(scene.duration),
            scene.layout.as_str(),
            scene.text_placement.as_str(),
            scene.animation.as_str(),
            asset,
            scene.keywords.join(", ")
        );
    }
}

fn write_catalog(root: &Path, output: &Path, category: &str) -> Result<()> {
    let catalog = build_catalog(root, category)?;
    let json = catalog.to_json()?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, json).with_context(|| format!("write {}", output.display()))?;
    info!(assets = catalog.len(), output = %output.display(), "catalog written");
    Ok(())
}

fn build_catalog(root: &Path, category: &str) -> Result<AssetCatalog> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        })
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let svg = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("asset");
        let library = path
            .parent()
            .filter(|parent| *parent != root)
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("Custom")
            .to_string();
        let id = format!("{}-{}", library.to_lowercase(), stem.to_lowercase());
        let mut entry = CatalogEntry::from_svg(id, display_name(stem), library, category, svg);
        entry.keywords = stem
            .split(|ch: char| !ch.is_ascii_alphanumeric())
            .filter(|word| word.len() > 2)
            .map(str::to_lowercase)
            .collect();
        entries.push(entry);
    }
    AssetCatalog::from_entries(entries).context("validate catalog")
}

fn display_name(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Serialize)]
struct SchemaEnvelope {
    storyboard_format_version: u16,
    schema: schemars::schema::RootSchema,
}

fn print_schema() -> Result<()> {
    let envelope = SchemaEnvelope {
        storyboard_format_version: storyboard_engine::STORYBOARD_FORMAT_VERSION,
        schema: schema_for!(PersistedStoryboard),
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
