//! CLI tool for tablesync - resolves a table description and outputs its layout as JSON
//!
//! Usage:
//!   tablesync_cli <table.json>              # Output JSON to stdout
//!   tablesync_cli <table.json> -o out.json  # Output JSON to file
//!   tablesync_cli <table.json> -v           # Debug logging (-vv for trace)
//!
//! The input holds `columns`, `data` and `config` in the camelCase JSON shape,
//! plus optional `scrollLeft`, `viewportWidth` and measured `rowHeights`.

#![allow(clippy::exit)]

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Deserialize;
use serde_json::{json, Value};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use tablesync::host::{MemoryMeasureRoot, MemoryPane};
use tablesync::layout::{PaneKind, EXPANDED_ROW_SUFFIX};
use tablesync::render::JsonRenderer;
use tablesync::scroll::{PaneId, ScrollEvent};
use tablesync::{Column, Table, TableConfig};

const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 400.0;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    columns: Vec<Column>,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    config: TableConfig,
    #[serde(default)]
    scroll_left: Option<f64>,
    #[serde(default)]
    viewport_width: Option<f64>,
    /// Header height followed by measured body rows, keyed by `data-row-key`
    #[serde(default)]
    header_height: Option<f64>,
    #[serde(default)]
    row_heights: BTreeMap<String, f64>,
}

struct Args {
    input: String,
    output: Option<String>,
    verbosity: usize,
}

fn parse_args() -> Option<Args> {
    let mut input = None;
    let mut output = None;
    let mut verbosity = 0;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => output = Some(args.next()?),
            "-v" => verbosity += 1,
            "-vv" => verbosity += 2,
            _ if input.is_none() => input = Some(arg),
            _ => return None,
        }
    }
    Some(Args {
        input: input?,
        output,
        verbosity,
    })
}

fn report(input: Input) -> Value {
    let viewport = input.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    let mut table = Table::new(input.columns, input.data, input.config);

    let content_width = table.widths().total_width(table.tree().leaves()).max(viewport);
    let body = MemoryPane::new(content_width, viewport).with_height(0.0, DEFAULT_VIEWPORT_HEIGHT);
    let header = MemoryPane::new(content_width, viewport);
    table.attach_pane(PaneId::Header, Box::new(header.clone()));
    table.attach_pane(PaneId::Body, Box::new(body.clone()));
    table.on_full_table_resize(viewport);

    let layout = table.pane_layout();
    for pane in layout.panes() {
        if pane != PaneKind::Main {
            table.attach_pane(pane.body_pane(), Box::new(MemoryPane::new(0.0, 0.0)));
        }
    }

    let mut root = MemoryMeasureRoot::new();
    if let Some(h) = input.header_height {
        root = root.header(h);
    }
    for (key, h) in &input.row_heights {
        root = root.row(key.as_str(), *h);
    }
    let heights_published = table.after_layout(&root);

    let scroll = input.scroll_left.map(|left| {
        body.user_scroll_left(left);
        table.on_scroll(ScrollEvent::native(PaneId::Body))
    });

    let mut panes = serde_json::Map::new();
    for pane in layout.panes() {
        let rendered = table.render_pane(pane, &mut JsonRenderer::new());
        let rows = table.body_rows(pane);
        panes.insert(
            format!("{pane:?}"),
            json!({
                "header": table.header_rows(pane),
                "headerRowHeight": table.header_row_height(pane),
                "rows": rows.rows,
                "rendered": { "header": rendered.header, "body": rendered.body },
            }),
        );
    }

    let extra_rows = table
        .body_rows(PaneKind::Main)
        .rows
        .iter()
        .filter(|r| r.measure_key.ends_with(EXPANDED_ROW_SUFFIX))
        .count();

    json!({
        "leaves": table.tree().leaves(),
        "layout": layout,
        "panes": panes,
        "expandableType": table.expandable_type(),
        "expandedKeys": table.expanded_keys(),
        "expandedRows": extra_rows,
        "heightsPublished": heights_published,
        "componentWidth": table.component_width(),
        "horizonScroll": table.is_horizon_scroll(),
        "scroll": scroll,
        "scrollLeft": { "header": header.scroll_left(), "body": body.scroll_left() },
        "ping": table.ping(),
        "stickyOffsets": table.sticky_offsets(),
        "sticky": table.sticky_scroll_bar().map(|bar| bar.state()),
        "warnings": table.warnings().emitted().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn run(args: &Args) -> tablesync::Result<String> {
    let text = fs::read_to_string(&args.input)?;
    let input: Input = serde_json::from_str(&text)?;
    let out = report(input);
    Ok(serde_json::to_string_pretty(&out)?)
}

fn main() {
    let Some(args) = parse_args() else {
        eprintln!("Usage: tablesync_cli <table.json> [-o output.json] [-v]");
        std::process::exit(1);
    };

    let level = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    let json = match run(&args) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error processing {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            if stdout.write_all(json.as_bytes()).is_err() {
                std::process::exit(1);
            }
            println!();
        }
    }
}
