use super::read_schema;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use pagecraft_styles::{node_selector, resolve_style, rule_css};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct StylesArgs {
    /// Schema file
    pub schema: PathBuf,

    /// Node id
    pub node: String,
}

pub fn styles(args: StylesArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let schema = read_schema(&cwd.join(&args.schema))?;
    let theme = config.theme(cwd)?;

    let node = schema
        .nodes
        .get(&args.node)
        .ok_or_else(|| anyhow!("Node not found: {}", args.node))?;
    let Some(style) = node.style() else {
        println!("/* {} has no style */", args.node);
        return Ok(());
    };

    let selector = node_selector(&node.id);
    let resolved = resolve_style(style, &theme, &selector);
    if !resolved.base.is_empty() {
        print!("{}", rule_css(&selector, &resolved.base));
    }
    print!("{}", resolved.media_css);
    Ok(())
}
