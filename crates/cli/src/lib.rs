use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use doc_model::{
    apply_library_action, AnnotationId, AnnotationSet, AnnotatorConfig, Color, FileId, FolderId,
    LibraryAction, LibraryOutcome, LibraryTree, PageNumber, Point, SortOrder,
};
use inkleaf_core::{hit_test, AnnotationStore, DocumentSession, GestureMode, PageProjection};
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::{AnnotationRecord, AnnotationRepository, DocumentKey, Storage};

#[derive(Debug, Parser)]
#[command(name = "inkleaf-cli")]
#[command(about = "Inkleaf annotation CLI")]
pub struct Cli {
    /// Storage directory; defaults to the platform data directory.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Log more to stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a document's stored annotations as JSON.
    Show {
        #[arg(value_name = "DOC")]
        document: String,
    },
    /// Print annotation counts per page.
    Stats {
        #[arg(value_name = "DOC")]
        document: String,
    },
    /// Apply a JSON gesture script to a document.
    Replay {
        #[arg(value_name = "DOC")]
        document: String,
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// Override the configured hit threshold.
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Remove the most recently created annotation.
    Undo {
        #[arg(value_name = "DOC")]
        document: String,
    },
    /// Delete every annotation of a document.
    Clear {
        #[arg(value_name = "DOC")]
        document: String,
    },
    /// Print one path string per stroke.
    ExportPaths {
        #[arg(value_name = "DOC")]
        document: String,
        #[arg(long)]
        page: Option<PageNumber>,
    },
    /// Organize documents into folders.
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
enum LibraryCommand {
    /// Print the folder tree.
    Tree,
    /// Create a folder.
    Mkdir {
        name: String,
        #[arg(long, default_value_t = 0)]
        parent: u64,
    },
    /// Add a document to a folder.
    Add {
        uri: String,
        #[arg(long, default_value_t = 0)]
        folder: u64,
        #[arg(long)]
        name: Option<String>,
    },
    /// Move a document to another folder.
    MvFile { file: u64, folder: u64 },
    /// Remove a document from the library.
    RmFile { file: u64 },
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    document: String,
    strokes: usize,
    notes: usize,
    history: usize,
    pages: Vec<PageStats>,
}

#[derive(Debug, Serialize)]
struct PageStats {
    page: PageNumber,
    strokes: usize,
    notes: usize,
}

/// One step of a replay script, tagged by `op`
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum ScriptOp {
    Begin {
        x: f32,
        y: f32,
        #[serde(default)]
        mode: GestureMode,
        #[serde(default)]
        color: Color,
    },
    Update {
        x: f32,
        y: f32,
    },
    End,
    Tap {
        x: f32,
        y: f32,
        #[serde(default)]
        mode: Option<GestureMode>,
    },
    Text {
        content: String,
    },
    /// Open the note under the point for editing
    Edit {
        x: f32,
        y: f32,
    },
    /// Delete the note under the point
    Delete {
        x: f32,
        y: f32,
    },
    Undo,
    Page {
        page: PageNumber,
    },
    Cancel,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose)?;

    if let Commands::Version = cli.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let storage = match &cli.data_dir {
        Some(dir) => Storage::with_root(dir),
        None => Storage::from_default_project().context("failed to locate data directory")?,
    };
    log::debug!("using storage at {}", storage.root().display());

    match cli.command {
        Commands::Show { document } => run_show(storage, &document),
        Commands::Stats { document } => run_stats(storage, &document),
        Commands::Replay { document, script, threshold } => {
            run_replay(storage, &document, &script, threshold)
        }
        Commands::Undo { document } => run_undo(storage, &document),
        Commands::Clear { document } => run_clear(storage, &document),
        Commands::ExportPaths { document, page } => run_export_paths(storage, &document, page),
        Commands::Library { command } => run_library(&storage, command),
        Commands::Version => Ok(()),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Never)
        .context("failed to initialize logging")
}

fn load_config(storage: &Storage) -> Result<AnnotatorConfig> {
    storage.load_config().context("failed to read config.json")
}

fn repository(storage: Storage) -> Result<AnnotationRepository<Storage>> {
    let config = load_config(&storage)?;
    Ok(AnnotationRepository::new(storage, &config))
}

fn run_show(storage: Storage, document: &str) -> Result<()> {
    let repository = repository(storage)?;
    let set = repository.load(&DocumentKey::from_uri(document));
    print_json(&AnnotationRecord::from_set(&set))
}

fn run_stats(storage: Storage, document: &str) -> Result<()> {
    let key = DocumentKey::from_uri(document);
    let set = repository(storage)?.load(&key);
    print_json(&stats_for(&key, &set))
}

fn stats_for(key: &DocumentKey, set: &AnnotationSet) -> StatsOutput {
    let pages = set
        .pages()
        .into_iter()
        .map(|page| PageStats {
            page,
            strokes: set.strokes_on(page).count(),
            notes: set.notes_on(page).count(),
        })
        .collect();

    StatsOutput {
        document: key.to_string(),
        strokes: set.strokes().len(),
        notes: set.notes().len(),
        history: set.history().len(),
        pages,
    }
}

fn run_replay(
    storage: Storage,
    document: &str,
    script: &Path,
    threshold: Option<f32>,
) -> Result<()> {
    let source = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let ops: Vec<ScriptOp> = serde_json::from_str(&source)
        .with_context(|| format!("invalid script {}", script.display()))?;

    let mut config = load_config(&storage)?;
    if let Some(threshold) = threshold {
        config = config.with_hit_threshold(threshold);
    }

    let key = DocumentKey::from_uri(document);
    let repository = Arc::new(AnnotationRepository::new(storage, &config));
    let mut session = DocumentSession::open(Arc::clone(&repository), key.clone(), config)?;

    for (index, op) in ops.into_iter().enumerate() {
        log::debug!("step {index}: {op:?}");
        apply_op(&mut session, op);
    }

    let stats = session.flush();
    if stats.failed > 0 {
        anyhow::bail!("failed to save annotations for {key}");
    }
    print_json(&stats_for(&key, session.store().set()))
}

fn apply_op(session: &mut DocumentSession, op: ScriptOp) {
    match op {
        ScriptOp::Begin { x, y, mode, color } => {
            session.gesture_begin(Point::new(x, y), mode, color)
        }
        ScriptOp::Update { x, y } => session.gesture_update(Point::new(x, y)),
        ScriptOp::End => {
            let outcome = session.gesture_end();
            log::info!("gesture ended: {outcome:?}");
        }
        ScriptOp::Tap { x, y, mode } => {
            if let Some(mode) = mode {
                session.set_mode(mode);
            }
            let outcome = session.tap(Point::new(x, y));
            log::info!("tap: {outcome:?}");
        }
        ScriptOp::Text { content } => {
            if session.confirm_text(&content).is_none() {
                log::info!("text {content:?} was not committed");
            }
        }
        ScriptOp::Edit { x, y } => {
            if let Some(id) = note_under(session, Point::new(x, y)) {
                session.edit_request(&id);
            }
        }
        ScriptOp::Delete { x, y } => {
            if let Some(id) = note_under(session, Point::new(x, y)) {
                session.delete_request(&id);
            }
        }
        ScriptOp::Undo => {
            session.undo();
        }
        ScriptOp::Page { page } => session.set_page(page),
        ScriptOp::Cancel => session.cancel(),
    }
}

fn note_under(session: &DocumentSession, point: Point) -> Option<AnnotationId> {
    let store = session.store();
    let note = hit_test::note_at(store.set(), session.page(), point, store.config().hit_threshold);
    if note.is_none() {
        log::info!("no note at ({}, {}) on page {}", point.x, point.y, session.page());
    }
    note.map(|note| note.id.clone())
}

fn run_undo(storage: Storage, document: &str) -> Result<()> {
    let config = load_config(&storage)?;
    let repository = AnnotationRepository::new(storage, &config);
    let key = DocumentKey::from_uri(document);

    let mut store = AnnotationStore::with_set(repository.load(&key), config);
    match store.undo() {
        Some(entry) => {
            repository
                .save(&key, store.set())
                .with_context(|| format!("failed to save annotations for {key}"))?;
            println!("undid {:?} {}", entry.kind, entry.target);
        }
        None => println!("nothing to undo"),
    }
    Ok(())
}

fn run_clear(storage: Storage, document: &str) -> Result<()> {
    let key = DocumentKey::from_uri(document);
    repository(storage)?
        .clear(&key)
        .with_context(|| format!("failed to clear annotations for {key}"))?;
    println!("cleared {key}");
    Ok(())
}

fn run_export_paths(storage: Storage, document: &str, page: Option<PageNumber>) -> Result<()> {
    let config = load_config(&storage)?;
    let repository = AnnotationRepository::new(storage, &config);
    let set = repository.load(&DocumentKey::from_uri(document));
    let store = AnnotationStore::with_set(set, config);

    let pages = match page {
        Some(page) => vec![page],
        None => store.set().pages(),
    };
    for page in pages {
        for stroke in PageProjection::build(&store, page).strokes {
            println!("{}", stroke.path_data());
        }
    }
    Ok(())
}

/// Last path segment of a URI, as shown in the library tree
fn file_name_of(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or(uri).trim_end_matches(['/', '\\']);
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "untitled".to_string(),
    }
}

fn run_library(storage: &Storage, command: LibraryCommand) -> Result<()> {
    let mut library = storage.load_library().context("failed to read library.json")?;

    let action = match command {
        LibraryCommand::Tree => {
            print_folder(&library, FolderId::ROOT, 0);
            return Ok(());
        }
        LibraryCommand::Mkdir { name, parent } => {
            LibraryAction::CreateFolder { parent: FolderId(parent), name }
        }
        LibraryCommand::Add { uri, folder, name } => {
            let name = name.unwrap_or_else(|| file_name_of(&uri));
            LibraryAction::AddFile { folder: FolderId(folder), name, uri }
        }
        LibraryCommand::MvFile { file, folder } => {
            LibraryAction::MoveFile { file: FileId(file), to: FolderId(folder) }
        }
        LibraryCommand::RmFile { file } => LibraryAction::RemoveFile { file: FileId(file) },
    };

    let outcome = apply_library_action(&mut library, action)?;
    storage.save_library(&library).context("failed to write library.json")?;

    match outcome {
        LibraryOutcome::FolderCreated(id) => println!("created folder #{}", id.0),
        LibraryOutcome::FileAdded(id) => println!("added file #{}", id.0),
        LibraryOutcome::Removed { folders, files } => {
            println!("removed {folders} folder(s) and {files} file(s)")
        }
        LibraryOutcome::Updated => println!("updated"),
    }
    Ok(())
}

fn print_folder(library: &LibraryTree, folder: FolderId, depth: usize) {
    let Some(current) = library.folder(folder) else {
        return;
    };
    let indent = "  ".repeat(depth);
    println!("{indent}{}/ #{}", current.name, current.id.0);

    for child in library.children(folder) {
        print_folder(library, child.id, depth + 1);
    }
    for file in library.files_in(folder, SortOrder::NameAsc) {
        println!("{indent}  {} #{}", file.name, file.id.0);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
