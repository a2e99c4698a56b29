use super::{file_stem, read_schema, write_schema};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{
    Change, DocumentKey, EditorDocument, FileCache, Mutation, Patch, RandomIds,
};
use rand::rngs::StdRng;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Which cached page a command works on
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Schema file, rewritten in place
    pub schema: PathBuf,

    /// Document id (defaults to the schema file stem)
    #[arg(long)]
    pub doc: Option<String>,

    /// Page id
    #[arg(long, default_value = "home")]
    pub page: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// JSON file holding an array of mutations
    #[arg(long)]
    pub ops: PathBuf,
}

// Ids must not repeat across invocations, so they come from entropy
type CliDocument = EditorDocument<RandomIds<StdRng>>;

struct Session {
    path: PathBuf,
    cache: FileCache,
    document: CliDocument,
}

impl Session {
    fn open(args: &SessionArgs, cwd: &Path) -> Result<Self> {
        let config = Config::load(cwd)?;
        let path = cwd.join(&args.schema);
        let schema = read_schema(&path)?;

        let document_id = args.doc.clone().unwrap_or_else(|| file_stem(&path));
        let key = DocumentKey::new(document_id, args.page.clone());
        let mut document =
            EditorDocument::open(key, schema, &config.editor, RandomIds::from_entropy())
                .with_context(|| format!("Cannot open {}", path.display()))?;

        let cache = FileCache::new(config.cache_dir(cwd));
        document.restore_history(&cache)?;

        Ok(Self {
            path,
            cache,
            document,
        })
    }

    /// Write the schema back, persist history and print the change
    fn finish(self, change: Option<Change>) -> Result<()> {
        let Some(change) = change else {
            eprintln!("{}", "No changes".yellow());
            println!("{}", serde_json::to_string_pretty(&Patch::new())?);
            return Ok(());
        };

        write_schema(&self.path, self.document.schema())?;
        self.document.save_history(&self.cache)?;

        let output = match change {
            Change::Patch(patch) => serde_json::to_value(&patch)?,
            Change::Document(schema) => json!({ "document": schema }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

pub fn edit(args: EditArgs, cwd: &Path) -> Result<()> {
    let ops_path = cwd.join(&args.ops);
    let content = std::fs::read_to_string(&ops_path)
        .with_context(|| format!("Cannot read {}", ops_path.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid mutations in {}", ops_path.display()))?;

    let mut session = Session::open(&args.session, cwd)?;

    // One history step per mutation; rejected ones are reported and skipped
    let mut merged: Option<Patch> = None;
    for mutation in &mutations {
        let reason = mutation.validate(session.document.schema()).err();
        match session.document.apply(mutation) {
            Some(patch) => match merged.as_mut() {
                Some(merged) => merged.merge_from(&patch),
                None => merged = Some(patch),
            },
            None => {
                let reason = reason.map_or_else(|| "no change".to_string(), |r| r.to_string());
                eprintln!("  {} {} skipped: {}", "⚠️".yellow(), mutation.name(), reason);
            }
        }
    }

    let change = merged.map(Change::Patch);
    session.finish(change)
}

pub fn undo(args: SessionArgs, cwd: &Path) -> Result<()> {
    let mut session = Session::open(&args, cwd)?;
    let change = session.document.undo();
    if change.is_none() {
        eprintln!("{}", "Nothing to undo".yellow());
    }
    session.finish(change)
}

pub fn redo(args: SessionArgs, cwd: &Path) -> Result<()> {
    let mut session = Session::open(&args, cwd)?;
    let change = session.document.redo();
    if change.is_none() {
        eprintln!("{}", "Nothing to redo".yellow());
    }
    session.finish(change)
}
