// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nexusmap CLI entrypoint.
//!
//! Parses, exports, verifies and edits outline documents on disk. Logs go to stderr; see
//! [`nexusmap::log`] for the environment variables that control them.

use std::error::Error;
use std::fmt::{self, Write as _};
use std::fs;

use rayon::prelude::*;

use nexusmap::format::outline::{export_outline, parse_document};
use nexusmap::model::{NodeId, NodeView, OutlineTree};
use nexusmap::ops::{mark_common, toggle_common, unmark_common, SyncOutcome};
use nexusmap::store::{Snapshot, TextFile, WriteDurability};
use nexusmap::verify::verify_document;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} parse <file> [--json] [--flat]\n  {program} export <file>\n  {program} mark-common <file> <line> [--durable-writes]\n  {program} unmark-common <file> <line> [--durable-writes]\n  {program} toggle-common <file> <line> [--durable-writes]\n  {program} verify <file>...\n\n<line> is the 1-based line number of the node.\n--flat lists every node in line order instead of the grouped tree.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nLogging: NEXUSMAP_LOG=<level|filter> or RUST_LOG=<filter> (stderr)."
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Parse,
    Export,
    MarkCommon,
    UnmarkCommon,
    ToggleCommon,
    Verify,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        Some(match arg {
            "parse" => Self::Parse,
            "export" => Self::Export,
            "mark-common" => Self::MarkCommon,
            "unmark-common" => Self::UnmarkCommon,
            "toggle-common" => Self::ToggleCommon,
            "verify" => Self::Verify,
            _ => return None,
        })
    }

    fn edits_buffer(self) -> bool {
        matches!(self, Self::MarkCommon | Self::UnmarkCommon | Self::ToggleCommon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    files: Vec<String>,
    line_number: Option<usize>,
    json: bool,
    flat: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let command = args.next().as_deref().and_then(Command::from_arg).ok_or(())?;
    let mut options = CliOptions {
        command,
        files: Vec::new(),
        line_number: None,
        json: false,
        flat: false,
        durable_writes: false,
    };
    let mut positionals = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--json" if command == Command::Parse => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--flat" if command == Command::Parse => {
                if options.flat {
                    return Err(());
                }
                options.flat = true;
            }
            "--durable-writes" if command.edits_buffer() => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => positionals.push(arg),
        }
    }

    match command {
        Command::Parse | Command::Export => {
            if positionals.len() != 1 {
                return Err(());
            }
            options.files = positionals;
        }
        Command::MarkCommon | Command::UnmarkCommon | Command::ToggleCommon => {
            let [file, line] = <[String; 2]>::try_from(positionals).map_err(|_| ())?;
            let line_number: usize = line.parse().map_err(|_| ())?;
            if line_number == 0 {
                return Err(());
            }
            options.files = vec![file];
            options.line_number = Some(line_number);
        }
        Command::Verify => {
            if positionals.is_empty() {
                return Err(());
            }
            options.files = positionals;
        }
    }

    Ok(options)
}

fn write_view(out: &mut String, view: &NodeView<'_>, depth: usize) -> fmt::Result {
    let node = view.node();
    write!(out, "{:indent$}{}", "", node.content().replace('\n', "\\n"), indent = depth * 2)?;
    if !node.conditions().is_empty() {
        let conditions: Vec<String> = node
            .conditions()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        write!(out, " ({})", conditions.join(", "))?;
    }
    for marker in node.markers().iter() {
        write!(out, " {marker}")?;
    }
    write!(out, "  [{}]", node.id())?;

    if view.variant_nodes().is_empty() {
        writeln!(out)?;
        for child in view.child_nodes() {
            write_view(out, child, depth + 1)?;
        }
        return Ok(());
    }

    writeln!(out, " hub of {}", view.variant_nodes().len())?;
    for variant in view.variant_nodes() {
        write_view(out, variant, depth + 1)?;
    }
    Ok(())
}

fn render_tree(tree: &OutlineTree, flat: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if flat {
        for node in tree.iter() {
            writeln!(
                out,
                "{}\t{}\t{}",
                node.id(),
                node.level(),
                node.content().replace('\n', "\\n")
            )?;
        }
        return Ok(out);
    }
    for view in tree.view() {
        write_view(&mut out, &view, 0)?;
    }
    Ok(out)
}

fn run_parse(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&options.files[0])?;
    let tree = parse_document(&text);
    if options.json {
        let json = if options.flat {
            serde_json::to_string_pretty(&tree.iter().collect::<Vec<_>>())?
        } else {
            serde_json::to_string_pretty(&tree.view())?
        };
        println!("{json}");
    } else {
        print!("{}", render_tree(&tree, options.flat)?);
    }
    Ok(())
}

fn run_sync(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let durability = if options.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    let mut file = TextFile::new(&options.files[0]).with_durability(durability);
    let target = NodeId::from_line_number(options.line_number.unwrap_or_default())?;

    let snapshot = Snapshot::capture(&mut file)?;
    if snapshot.node(target).is_none() {
        return Err(format!("no node on line {}", target.line_index() + 1).into());
    }

    let outcome = match options.command {
        Command::MarkCommon => mark_common(&mut file, snapshot, target)?,
        Command::UnmarkCommon => unmark_common(&mut file, snapshot, target)?,
        _ => toggle_common(&mut file, snapshot, target)?,
    };
    match outcome {
        SyncOutcome::Unchanged => println!("unchanged"),
        SyncOutcome::Committed { edits, .. } => {
            println!("updated {} ({} line edits)", file.path().display(), edits.len())
        }
    }
    Ok(())
}

/// Verifies every file in parallel; returns whether all of them are free of errors.
fn run_verify(options: &CliOptions) -> bool {
    let results: Vec<_> = options
        .files
        .par_iter()
        .map(|path| (path, fs::read_to_string(path).map(|text| verify_document(&text))))
        .collect();

    let many = results.len() > 1;
    let mut ok = true;
    for (path, result) in results {
        if many {
            println!("== {path}");
        }
        match result {
            Ok(report) => {
                for issue in report.sorted() {
                    println!("{issue}");
                }
                println!(
                    "\nSummary: errors={}, warnings={}",
                    report.error_count(),
                    report.warning_count()
                );
                ok &= !report.has_errors();
            }
            Err(err) => {
                println!("FAIL: cannot read {path}: {err}");
                ok = false;
            }
        }
    }
    ok
}

fn main() {
    let result = (|| -> Result<bool, Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "nexusmap".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Err(err) = nexusmap::log::init() {
            eprintln!("nexusmap: logging disabled: {err}");
        }
        tracing::debug!(?options, "starting");

        match options.command {
            Command::Parse => run_parse(&options)?,
            Command::Export => {
                let text = fs::read_to_string(&options.files[0])?;
                print!("{}", export_outline(&parse_document(&text)));
            }
            Command::MarkCommon | Command::UnmarkCommon | Command::ToggleCommon => {
                run_sync(&options)?
            }
            Command::Verify => return Ok(run_verify(&options)),
        }
        Ok(true)
    })();

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("nexusmap: {err}");
            std::process::exit(1);
        }
    }
}
