//! CLI tool for pivotgrid - paints a view headlessly and outputs JSON
//!
//! Usage:
//!   pivotgrid_cli <view.json>                          # Interactive bounds to stdout
//!   pivotgrid_cli <view.json> --options opts.json      # With render options
//!   pivotgrid_cli <view.json> --theme theme.json       # With a theme
//!   pivotgrid_cli <view.json> --tablix                 # Tablix cell policy
//!   pivotgrid_cli <view.json> --hit 120,30             # Also resolve a hit test
//!
//! Set `RUST_LOG=debug` to see the paint summary.

use std::env;
use std::fs;
use std::io::{self, Write};

use log::info;
use serde::Serialize;

use pivotgrid::render::{InteractiveBounds, PolicyKind, RecordingSurface};
use pivotgrid::{GridError, GridSession, HitTarget, RenderOptions, Theme};

const USAGE: &str =
    "Usage: pivotgrid_cli <view.json> [--options FILE] [--theme FILE] [--tablix] [--hit X,Y]";

#[derive(Default)]
struct Args {
    view: String,
    options: Option<String>,
    theme: Option<String>,
    tablix: bool,
    hit: Option<(f32, f32)>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    cells_painted: usize,
    interactive_bounds: &'a InteractiveBounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    hit: Option<HitTarget>,
}

fn parse_point(s: &str) -> Result<(f32, f32), GridError> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| GridError::Other(format!("expected X,Y, got {s:?}")))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| GridError::Other(format!("bad coordinate {v:?}: {e}")))
    };
    Ok((parse(x)?, parse(y)?))
}

fn usage() -> GridError {
    GridError::Other(USAGE.to_string())
}

fn parse_args() -> Result<Args, GridError> {
    let mut args = Args::default();
    let mut view = None;
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--options" => args.options = iter.next(),
            "--theme" => args.theme = iter.next(),
            "--tablix" => args.tablix = true,
            "--hit" => {
                let point = iter.next().ok_or_else(usage)?;
                args.hit = Some(parse_point(&point)?);
            }
            _ if view.is_none() => view = Some(arg),
            _ => return Err(GridError::Other(format!("unexpected argument {arg:?}\n{USAGE}"))),
        }
    }
    args.view = view.ok_or_else(usage)?;
    Ok(args)
}

fn main() -> Result<(), GridError> {
    env_logger::init();
    let args = parse_args()?;

    let policy = if args.tablix {
        PolicyKind::Tablix
    } else {
        PolicyKind::Pivot
    };
    let mut session = GridSession::new(RecordingSurface::new(), policy);
    session.load_view_json(&fs::read_to_string(&args.view)?)?;
    if let Some(path) = &args.options {
        session.set_options(RenderOptions::from_json(&fs::read_to_string(path)?)?);
    }
    if let Some(path) = &args.theme {
        session.set_theme(Theme::from_json(&fs::read_to_string(path)?)?);
    }

    let cells_painted = session.render().cells_painted;
    info!(
        "{}: {} cells, {} draw commands",
        args.view,
        cells_painted,
        session.surface().commands().len()
    );
    let hit = args.hit.map(|(x, y)| session.hit_test(x, y));
    let Some(result) = session.last_result() else {
        return Err(GridError::Render("paint produced no result".to_string()));
    };

    let output = Output {
        cells_painted,
        interactive_bounds: &result.interactive_bounds,
        hit,
    };
    let json = serde_json::to_string_pretty(&output)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    writeln!(stdout)?;
    Ok(())
}
