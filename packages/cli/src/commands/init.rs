use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_styles::Theme;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write a theme.json with the built-in tokens
    #[arg(long)]
    pub theme: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

const EXAMPLE_PAGE: &str = r#"{
  "rootId": "page",
  "nodes": {
    "page": { "id": "page", "type": "page", "childrenOrder": ["hero"] },
    "hero": {
      "id": "hero",
      "type": "section",
      "childrenOrder": ["title", "lead", "cta"],
      "props": {
        "style": {
          "base": { "padding": "$spacing.xl", "gap": "$spacing.md", "bg": "$colors.surface" },
          "sm": { "padding": "$spacing.md" }
        }
      }
    },
    "title": {
      "id": "title",
      "type": "heading",
      "props": { "text": "Hello, Pagecraft", "level": 1, "style": { "base": { "typography": "$typography.heading" } } }
    },
    "lead": { "id": "lead", "type": "paragraph", "props": { "text": "Edit page.json, then run pagecraft export." } },
    "cta": {
      "id": "cta",
      "type": "button",
      "props": { "text": "Say hi", "action": { "type": "toast", "message": "Hi!" } }
    }
  }
}
"#;

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft project...".bright_blue().bold());

    let page_path = cwd.join("page.json");
    if !page_path.exists() {
        fs::write(&page_path, EXAMPLE_PAGE)?;
        println!("  {} Created page.json", "✓".green());
    }

    let mut config = Config::default();
    if args.theme {
        let theme_json = serde_json::to_string_pretty(&Theme::default())?;
        fs::write(cwd.join("theme.json"), theme_json)?;
        config.theme_path = Some("theme.json".to_string());
        println!("  {} Created theme.json", "✓".green());
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft check page.json");
    println!("  2. Run: pagecraft export page.json");
    println!("  3. Open {}/page.html", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::read_schema;

    #[test]
    fn test_example_page_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        init(
            InitArgs {
                theme: true,
                force: false,
            },
            dir.path(),
        )
        .unwrap();

        let schema = read_schema(&dir.path().join("page.json")).unwrap();
        assert_eq!(schema.validate(), Ok(()));

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.theme_path.as_deref(), Some("theme.json"));
        assert!(config.theme(dir.path()).is_ok());
    }
}
