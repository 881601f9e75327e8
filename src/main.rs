use anyhow::Context;
use clap::Parser;
use pq_outline::Outliner;
use pq_outline::ast::RECOGNIZED_KINDS;
use pq_outline::cli::{Args, Command, OutlineArgs};
use pq_outline::config;
use pq_outline::report::{FileReport, OutputFormat};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    pq_outline::telemetry::init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Some(Command::Kinds) => {
            list_kinds();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Outline(outline)) => outline_command(outline),
        None => outline_command(args.outline),
    }
}

fn list_kinds() {
    for (kind, rendering) in RECOGNIZED_KINDS {
        println!("{kind}\t{rendering}");
    }
}

/// Settings after merging CLI flags over the config file.
struct Settings {
    format: OutputFormat,
    indent_width: usize,
    deny_unhandled: bool,
}

fn resolve_settings(args: &OutlineArgs) -> anyhow::Result<Settings> {
    let start_dir = infer_start_dir(args)?;
    let loaded_cfg = config::load_config(args.config.as_deref(), &start_dir)?;

    let output = loaded_cfg.map(|(_path, cfg)| cfg.output).unwrap_or_default();

    // CLI flags take precedence over config
    let indent_width = match args.indent {
        Some(width) => config::validate_indent_width(width)?,
        None => output.indent_width,
    };

    Ok(Settings {
        format: args.format.unwrap_or(output.format),
        indent_width,
        deny_unhandled: args.deny_unhandled || output.deny_unhandled,
    })
}

fn outline_command(args: OutlineArgs) -> anyhow::Result<ExitCode> {
    let settings = resolve_settings(&args)?;

    let mut inputs: Vec<(String, String)> = Vec::new();
    if args.paths.is_empty() {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        inputs.push(("stdin".to_string(), source));
    } else {
        for path in collect_json_files(&args.paths)? {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            inputs.push((path.display().to_string(), source));
        }
    }

    let mut reports = Vec::with_capacity(inputs.len());
    for (file, source) in &inputs {
        let outliner = Outliner::from_source(source)
            .with_context(|| format!("failed to load AST from {file}"))?
            .with_indent_width(settings.indent_width)?;
        reports.push((outliner.format_query_steps(), FileReport {
            file: file.clone(),
            steps: outliner.step_reports(),
            unhandled_kinds: outliner.unhandled_kinds(),
        }));
    }

    match settings.format {
        OutputFormat::Json => {
            let out: Vec<&FileReport> = reports.iter().map(|(_, r)| r).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let many = reports.len() > 1;
            for (text, report) in &reports {
                if many {
                    println!("# {}", report.file);
                }
                println!("{text}");
            }
        }
    }

    let mut has_unhandled = false;
    for (_, report) in &reports {
        for kind in &report.unhandled_kinds {
            has_unhandled = true;
            if settings.deny_unhandled {
                eprintln!("{}: unhandled node kind: {kind}", report.file);
            }
        }
    }

    if settings.deny_unhandled && has_unhandled {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn collect_json_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        collect_from_path(path, &mut out)?;
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn collect_from_path(path: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?;
    if meta.is_dir() {
        collect_from_dir(path, out)
    } else {
        out.push(path.to_path_buf());
        Ok(())
    }
}

fn collect_from_dir(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if should_skip_dir(&path) {
                continue;
            }
            collect_from_dir(&path, out)?;
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }

    Ok(())
}

fn should_skip_dir(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|n| n.to_str()),
        Some(".git" | "node_modules" | "target")
    )
}

fn infer_start_dir(args: &OutlineArgs) -> anyhow::Result<PathBuf> {
    let base = match args.paths.first() {
        Some(p) => p.clone(),
        None => std::env::current_dir()?,
    };

    let base = if base.is_file() {
        base.parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        base
    };

    Ok(base)
}
