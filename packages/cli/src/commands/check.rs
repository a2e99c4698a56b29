use super::read_schema;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_schema::{collect_descendants, NodeGraph};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema file
    pub schema: PathBuf,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.schema);
    let schema = read_schema(&path)?;
    schema.validate()?;

    let reachable = collect_descendants(&schema, schema.root_id()).len();
    println!(
        "{} {} ({} nodes, root {})",
        "✓".green(),
        args.schema.display(),
        reachable,
        schema.root_id.bright_white()
    );
    Ok(())
}
