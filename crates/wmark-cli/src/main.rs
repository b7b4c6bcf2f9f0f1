//! wmark CLI - batch text watermarks from the command line

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use wmark::batch::{
    default_settings_path, default_templates_path, BatchConfig, BatchReport, BatchRunner,
    LastSettings, StyleDescriptor, Template, TemplateStore,
};
use wmark::export::NamingRule;
use wmark::fontdb::FontChain;
use wmark::render::WatermarkEngine;
use wmark::types::Point;

use cli::Cli;

/// Suffix used when no naming flag is given
const CLI_SUFFIX: &str = "_watermark";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(report) => {
            if !cli.quiet {
                println!("{}", report);
            }
            if report.all_failed() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        },
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        },
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<BatchReport> {
    let settings_path = cli.settings.clone().or_else(default_settings_path);
    let templates_path = cli.templates.clone().or_else(default_templates_path);

    let descriptor = effective_style(cli, settings_path.as_deref(), templates_path.as_deref())?;

    if let Some(name) = &cli.save_template {
        let path = templates_path
            .as_deref()
            .context("No config directory for templates; pass --templates")?;
        let mut store = TemplateStore::load(path)?;
        store.upsert(Template::new(name.as_str(), descriptor.clone()));
        store
            .save()
            .with_context(|| format!("Saving template {:?}", name))?;
        log::info!("Saved template {:?} to {}", name, path.display());
    }
    if cli.remember {
        let path = settings_path
            .as_deref()
            .context("No config directory for settings; pass --settings")?;
        LastSettings::save(path, &descriptor).context("Saving last settings")?;
    }

    let inputs = wmark::input::discover_images(&cli.path)
        .with_context(|| format!("Reading {}", cli.path.display()))?;
    if inputs.is_empty() {
        log::warn!("No images found in {}", cli.path.display());
        return Ok(BatchReport::default());
    }

    let engine = match &cli.font_file {
        Some(file) => WatermarkEngine::new(FontChain::platform_default().with_preferred_file(file)),
        None => WatermarkEngine::default(),
    };
    let config = BatchConfig {
        output_dir: Some(output_dir(cli)),
        naming: naming_rule(cli),
        format: cli.format,
    };

    let report = BatchRunner::new(&engine, descriptor, config).run(&inputs)?;
    Ok(report)
}

/// Flags over template over last settings over defaults
fn effective_style(
    cli: &Cli,
    settings_path: Option<&Path>,
    templates_path: Option<&Path>,
) -> Result<StyleDescriptor> {
    let mut style = match &cli.template {
        Some(name) => {
            let path = templates_path.context("No config directory for templates; pass --templates")?;
            let store = TemplateStore::load(path)?;
            store.require(name)?.style.clone()
        },
        None => settings_path
            .and_then(LastSettings::load)
            .unwrap_or_default(),
    };

    if let Some(text) = &cli.text {
        style.text = text.clone();
        style.use_date = false;
    }
    if cli.use_date {
        style.use_date = true;
    }
    if let Some(size) = cli.font_size {
        style.font_size = size;
    }
    if let Some(color) = &cli.color {
        style.color = color.clone();
    }
    if let Some(opacity) = cli.opacity {
        style.opacity = opacity;
    }
    if let Some(rotation) = cli.rotation {
        style.rotation = rotation;
    }
    if let Some(anchor) = cli.position {
        style.set_position(anchor);
    }
    if let (Some(x), Some(y)) = (cli.x, cli.y) {
        style.manual_position = Some(Point::new(x, y));
    }

    log::debug!("Effective style: {:?}", style);
    Ok(style)
}

/// `--output-dir`, or a sibling named after the input
fn output_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.output_dir {
        return dir.clone();
    }

    let path = cli.path.as_path();
    let base = if path.is_file() {
        path.with_extension("")
    } else {
        path.components().collect::<PathBuf>()
    };
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());
    base.with_file_name(format!("{}{}", name, CLI_SUFFIX))
}

fn naming_rule(cli: &Cli) -> NamingRule {
    if cli.keep_name {
        NamingRule::KeepOriginal
    } else if let Some(prefix) = &cli.prefix {
        NamingRule::Prefix(prefix.clone())
    } else {
        NamingRule::Suffix(cli.suffix.clone().unwrap_or_else(|| CLI_SUFFIX.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wmark").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_output_dir_for_directory() {
        let cli = parse(&["/definitely/missing/photos/"]);
        assert_eq!(output_dir(&cli), PathBuf::from("/definitely/missing/photos_watermark"));
    }

    #[test]
    fn test_naming_rule_flags() {
        assert_eq!(naming_rule(&parse(&["p"])), NamingRule::Suffix("_watermark".into()));
        assert_eq!(naming_rule(&parse(&["p", "--prefix", "x_"])), NamingRule::Prefix("x_".into()));
        assert_eq!(naming_rule(&parse(&["p", "--keep-name"])), NamingRule::KeepOriginal);
    }

    #[test]
    fn test_flags_override_saved_settings() {
        let path = std::env::temp_dir().join(format!("wmark-cli-settings-{}.json", std::process::id()));
        let saved = StyleDescriptor {
            text: "saved".into(),
            font_size: 50,
            color: "red".into(),
            ..StyleDescriptor::default()
        };
        LastSettings::save(&path, &saved).unwrap();

        let cli = parse(&["p", "--color", "blue", "--position", "center"]);
        let style = effective_style(&cli, Some(&path), None).unwrap();
        assert_eq!(style.text, "saved");
        assert_eq!(style.font_size, 50);
        assert_eq!(style.color, "blue");
        assert_eq!(style.position, wmark::Anchor::Center);
    }

    #[test]
    fn test_run_returns_the_batch_report() {
        let root = std::env::temp_dir().join(format!("wmark-cli-run-{}", std::process::id()));
        let photos = root.join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        image::RgbImage::new(40, 30).save(photos.join("a.png")).unwrap();
        let out = root.join("out");

        let cli = parse(&[
            photos.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--settings",
            root.join("settings.json").to_str().unwrap(),
            "--templates",
            root.join("templates.json").to_str().unwrap(),
        ]);
        let report = run(&cli).unwrap();

        assert_eq!(report.succeeded, 1);
        assert!(out.join("a_watermark.png").exists());
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let path = std::env::temp_dir().join(format!("wmark-cli-templates-{}.json", std::process::id()));
        let cli = parse(&["p", "--template", "nope"]);
        assert!(effective_style(&cli, None, Some(&path)).is_err());
    }
}
