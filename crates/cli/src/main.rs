use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eulerian::prelude::*;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

mod provenance;

#[derive(Parser)]
#[command(name = "eulerian")]
#[command(about = "Count Eulerian orientations of the d-dimensional hypercube")]
struct Cmd {
    /// Write records to this file (plus a provenance sidecar) instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Serialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
enum Action {
    /// Canonical balanced colorings of the d-cube: "<subset> <distinct images>"
    Canon {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=5))]
        d: u32,
    },
    /// Orientation counts per coloring pair of the d-cube: "<a> <b> <count>"
    Sat {
        #[arg(value_parser = parse_sat_dim)]
        d: u32,
        /// Scan on the calling thread only
        #[arg(long)]
        serial: bool,
        /// Outer colorings per parallel batch
        #[arg(long, default_value_t = 64)]
        batch: usize,
        /// Disable forced-edge propagation (plain two-way branching)
        #[arg(long)]
        no_propagate: bool,
    },
    /// Combine sat results for d-2 and canon results for d-1 into the count for d
    Total {
        #[arg(value_parser = parse_total_dim)]
        d: u32,
        sat: PathBuf,
        canon: PathBuf,
    },
    /// Run all three stages in-process for d
    Pipeline {
        #[arg(value_parser = parse_total_dim)]
        d: u32,
    },
}

fn parse_sat_dim(s: &str) -> std::result::Result<u32, String> {
    let d: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if eulerian::api::SAT_DIMS.contains(&d) {
        Ok(d)
    } else {
        Err("d must be one of 0, 2, 4".to_string())
    }
}

fn parse_total_dim(s: &str) -> std::result::Result<u32, String> {
    let d: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if eulerian::api::TOTAL_DIMS.contains(&d) {
        Ok(d)
    } else {
        Err("d must be even, one of 2, 4, 6".to_string())
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout carries the records; logs go to stderr
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cmd.out {
        Some(out) => {
            write_atomically(out, |w| execute(&cmd.action, w))?;
            let params = serde_json::to_value(&cmd.action)?;
            let sidecar = provenance::write_sidecar(out, provenance::Payload::new(params))?;
            tracing::info!(out = %out.display(), provenance = %sidecar.display(), "wrote");
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            execute(&cmd.action, &mut w)?;
            w.flush()?;
        }
    }
    Ok(())
}

fn execute<W: Write>(action: &Action, w: &mut W) -> Result<()> {
    match *action {
        Action::Canon { d } => {
            tracing::info!(d, "canon");
            Canonicalizer::new(d)?.scan(|r| writeln!(w, "{r}"))?;
        }
        Action::Sat {
            d,
            serial,
            batch,
            no_propagate,
        } => {
            tracing::info!(d, serial, batch, no_propagate, "sat");
            let cfg = SatScanCfg {
                search: SearchCfg {
                    propagate_forced: !no_propagate,
                },
                parallel: !serial,
                batch,
            };
            sat_scan(d, cfg, |r| writeln!(w, "{r}"))?;
        }
        Action::Total {
            d,
            ref sat,
            ref canon,
        } => {
            tracing::info!(d, sat = %sat.display(), canon = %canon.display(), "total");
            let total = total_from_files(d, sat, canon)?;
            writeln!(w, "{total}")?;
        }
        Action::Pipeline { d } => {
            tracing::info!(d, "pipeline");
            let canon = canonical_records(d - 1)?;
            let sat = sat_records(d - 2, SatScanCfg::default())?;
            // round-trip through the persisted format like separate runs would
            let canon = read_canonical(lines(&canon).as_bytes())?;
            let sat = read_sat(lines(&sat).as_bytes())?;
            writeln!(w, "{}", total_orientations(d, sat, canon)?)?;
        }
    }
    Ok(())
}

fn lines<T: std::fmt::Display>(records: &[T]) -> String {
    records.iter().map(|r| format!("{r}\n")).collect()
}

fn total_from_files(d: u32, sat: &Path, canon: &Path) -> Result<BigUint> {
    let sat_file = File::open(sat)
        .with_context(|| format!("could not open sat results {}", sat.display()))?;
    let canon_file = File::open(canon)
        .with_context(|| format!("could not open canon results {}", canon.display()))?;
    let sat = read_sat(BufReader::new(sat_file))
        .with_context(|| format!("reading {}", sat.display()))?;
    let canon = read_canonical(BufReader::new(canon_file))
        .with_context(|| format!("reading {}", canon.display()))?;
    Ok(total_orientations(d, sat, canon)?)
}

/// Write through a `.partial` sibling and rename on success, so a failed run
/// leaves nothing at `out`.
fn write_atomically<F>(out: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut name = out
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("out"));
    name.push(".partial");
    let tmp = out.with_file_name(name);
    let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    let mut w = BufWriter::new(file);
    let res = body(&mut w).and_then(|()| w.flush().map_err(Into::into));
    drop(w);
    if let Err(e) = res {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, out).with_context(|| format!("renaming to {}", out.display()))?;
    Ok(())
}
