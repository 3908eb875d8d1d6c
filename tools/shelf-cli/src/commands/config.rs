//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let mut shown = ctx.config.clone();
    shown.backend.anon_key = shown.backend.anon_key.as_deref().map(mask);
    shown.backend.access_token = shown.backend.access_token.as_deref().map(mask);

    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.line("");
    ctx.output.line("[backend]");
    ctx.output
        .kv("url", shown.backend.url.as_deref().unwrap_or("(offline)"));
    if let Some(key) = &shown.backend.anon_key {
        ctx.output.kv("anon_key", key);
    }
    if let Some(token) = &shown.backend.access_token {
        ctx.output.kv("access_token", token);
    }
    ctx.output.kv("storage_bucket", &shown.backend.storage_bucket);
    ctx.output
        .kv("offline", &shown.backend.is_offline().to_string());

    ctx.output.line("");
    ctx.output.line("[storage]");
    ctx.output.kv(
        "dir",
        shown.storage.dir.as_deref().unwrap_or("~/.local/share/shelf"),
    );
    ctx.output.kv("profile", &shown.storage.profile);

    ctx.output.line("");
    ctx.output.line("[logging]");
    ctx.output.kv("level", shown.logging.level.as_str());
    ctx.output
        .kv("format", &format!("{:?}", shown.logging.format).to_lowercase());

    ctx.output.line("");
    ctx.output.line("[sections]");
    ctx.output.kv("series", &shown.sections.series.join(", "));
    ctx.output.kv("authors", &shown.sections.authors.join(", "));
    ctx.output.kv("limit", &shown.sections.limit.to_string());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shelf.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let errors = ctx.config.problems();
    let mut warnings: Vec<String> = Vec::new();

    if ctx.config.backend.offline && ctx.config.backend.url.is_some() {
        warnings.push("backend.offline is set, so backend.url is ignored".to_string());
    }
    if ctx.config.sections.series.is_empty() {
        warnings.push("sections.series is empty; Popular Series will never show".to_string());
    }
    if ctx.config.sections.authors.is_empty() {
        warnings.push("sections.authors is empty; Top Authors will never show".to_string());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Keep the first four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("eyJhbGciOi"), "eyJh…");
        assert_eq!(mask("ab"), "ab…");
    }
}
