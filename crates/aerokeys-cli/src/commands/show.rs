use std::path::PathBuf;

use aerokeys_core::classify::Classifier;
use aerokeys_core::config::{expand_tilde, Settings};
use aerokeys_core::loader::load_modes;
use aerokeys_core::model::Mode;
use aerokeys_core::parse::meaningful_fragments;
use aerokeys_core::paths::PathNamer;
use aerokeys_core::source::{ConfigFileSource, ModeSource};

#[derive(Debug, Default, PartialEq)]
struct ShowOptions {
    mode: Option<String>,
    file: Option<PathBuf>,
    json: bool,
    explain: bool,
}

fn parse_args(args: &[String]) -> Result<ShowOptions, String> {
    let mut opts = ShowOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                let path = args.get(i + 1).ok_or("--file requires a path argument")?;
                opts.file = Some(expand_tilde(path));
                i += 2;
                continue;
            }
            "--json" => opts.json = true,
            "--explain" => opts.explain = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {flag}")),
            mode if opts.mode.is_none() => opts.mode = Some(mode.to_string()),
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
        i += 1;
    }
    Ok(opts)
}

/// Load bindings directly (no daemon) and print them.
pub fn cmd_show(args: &[String]) -> i32 {
    let opts = match parse_args(args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: aerokeys-cli show [mode] [--file <aerospace.toml>] [--json] [--explain]");
            return 1;
        }
    };

    let source: Box<dyn ModeSource> = match &opts.file {
        Some(path) => Box::new(ConfigFileSource::new(path.clone())),
        None => Settings::load().mode_source(),
    };
    let classifier = Classifier::new(PathNamer::from_env());

    if opts.explain {
        let mode = opts.mode.as_deref().unwrap_or("main");
        return explain(source.as_ref(), &classifier, mode);
    }

    let mut modes = load_modes(source.as_ref(), &classifier);
    if let Some(id) = &opts.mode {
        modes.retain(|m| &m.id == id);
        if modes.is_empty() {
            eprintln!("Unknown mode: {id}");
            return 1;
        }
    }

    if opts.json {
        return match serde_json::to_string_pretty(&modes) {
            Ok(json) => {
                println!("{json}");
                0
            }
            Err(e) => {
                eprintln!("Serialize error: {e}");
                1
            }
        };
    }

    let sheets: Vec<String> = modes.iter().map(format_sheet).collect();
    print!("{}", sheets.join("\n"));
    0
}

/// Render one mode as indented text, grouped by category.
pub fn format_sheet(mode: &Mode) -> String {
    let width = mode
        .bindings
        .iter()
        .map(|b| b.display_key.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("[{}]\n", mode.name);
    if mode.bindings.is_empty() {
        out.push_str("  (no bindings)\n");
        return out;
    }
    for (category, bindings) in mode.grouped() {
        out.push_str(&format!("  {category}\n"));
        for b in bindings {
            out.push_str(&format!("    {:<width$}  {}\n", b.display_key, b.display_label));
        }
    }
    out
}

/// Show which classifier rule decided each raw binding of a mode.
fn explain(source: &dyn ModeSource, classifier: &Classifier, mode: &str) -> i32 {
    let raw = match source.bindings(mode) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to load bindings for {mode}: {e}");
            return 1;
        }
    };
    println!("{:<24} {:<20} FRAGMENT", "KEY", "RULE");
    println!("{}", "-".repeat(70));
    for (key, command) in &raw {
        let fragments = meaningful_fragments(command);
        match fragments.first() {
            Some(first) => {
                let rule = classifier.matching_rule(first).map(|r| r.name).unwrap_or("-");
                println!("{key:<24} {rule:<20} {first}");
            }
            None => println!("{key:<24} {:<20} {command}", "(noise only)"),
        }
    }
    0
}
