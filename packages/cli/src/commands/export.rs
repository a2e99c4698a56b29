use super::{file_stem, read_schema};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_html::{compile_to_html, CompileOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Schema file
    pub schema: PathBuf,

    /// Output file (defaults to <outDir>/<schema stem>.html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = cwd.join(&args.schema);
    let schema = read_schema(&path)?;
    let theme = config.theme(cwd)?;
    let stem = file_stem(&path);

    let options = CompileOptions {
        title: config.export.title.clone().unwrap_or_else(|| stem.clone()),
        pretty: config.export.pretty,
        ..CompileOptions::default()
    };
    let html = compile_to_html(&schema, &theme, options)
        .with_context(|| format!("Cannot export {}", args.schema.display()))?;

    if args.stdout {
        print!("{}", html);
        return Ok(());
    }

    let output = match args.output {
        Some(output) => cwd.join(output),
        None => config.out_dir(cwd).join(format!("{}.html", stem)),
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, html).with_context(|| format!("Cannot write {}", output.display()))?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.schema.display(),
        output.display()
    );
    Ok(())
}
