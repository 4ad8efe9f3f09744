//! CLI tool for paneview - computes overlay geometry for a settings file
//!
//! Usage:
//!   paneview_cli <settings.json>                          # JSON snapshot to stdout
//!   paneview_cli <settings.json> --size 1024x768          # Visible size (default 800x600)
//!   paneview_cli <settings.json> --scroll 200,460         # Native scroll offsets
//!   paneview_cli <settings.json> -o out.json              # Write to file
//!
//! Set `RUST_LOG=paneview=debug` to see refresh logs on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use paneview::{compute_snapshot, GridSettings, NativeScroll};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: paneview_cli <settings.json> [--size WxH] [--scroll X,Y] [-o output.json]";

fn parse_pair(value: &str, separator: char) -> Option<(f64, f64)> {
    let (a, b) = value.split_once(separator)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        fail(USAGE);
    }

    let input_path = &args[1];
    let mut size = (800.0, 600.0);
    let mut scroll = NativeScroll::default();
    let mut output_path = None;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let value = rest.next().unwrap_or_else(|| fail(USAGE));
        match flag.as_str() {
            "--size" => size = parse_pair(value, 'x').unwrap_or_else(|| fail(USAGE)),
            "--scroll" => {
                let (left, top) = parse_pair(value, ',').unwrap_or_else(|| fail(USAGE));
                scroll = NativeScroll { left, top };
            }
            "-o" => output_path = Some(value.clone()),
            _ => fail(USAGE),
        }
    }

    // Read settings
    let settings = match GridSettings::from_path(input_path) {
        Ok(s) => s,
        Err(e) => fail(&format!("Error reading {input_path}: {e}")),
    };

    // Compute
    let snapshot = match compute_snapshot(settings, size.0, size.1, scroll) {
        Ok(s) => s,
        Err(e) => fail(&format!("Error computing overlays: {e}")),
    };
    let output = match snapshot.to_json() {
        Ok(o) => o,
        Err(e) => fail(&format!("Error serializing JSON: {e}")),
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &output) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            io::stdout().write_all(output.as_bytes()).unwrap();
            println!();
        }
    }
}
