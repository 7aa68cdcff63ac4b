//! # Steelgrid CLI Application
//!
//! Command-line front end for the takeoff engine. Reads a params file (or
//! uses the defaults), applies per-member overrides and braces given on the
//! command line, and prints quantities, member lists or STAAD text.
//!
//! Logs go to stderr so stdout can be piped straight into a spreadsheet.
//!
//! ```text
//! steelgrid init > frame.json
//! steelgrid --params frame.json takeoff
//! steelgrid --params frame.json --override C_0_0=KS/H/200x200x8x12 takeoff
//! steelgrid --params frame.json --brace FX_4200_0_0:X staad --out frame.std
//! steelgrid weight KS/H/200x200x8x12@6 KS/C/100x50x5x7.5@12
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use takeoff_core::braces::{BraceKind, FaceKey};
use takeoff_core::catalog::{shape_option_label, standard_label, ProfileCatalog, ProfileSelection};
use takeoff_core::export::{write_export, write_export_bytes};
use takeoff_core::members::MemberId;
use takeoff_core::report::render_takeoff_pdf;
use takeoff_core::tally::Tally;
use takeoff_core::{builtin_catalog, load_params, FrameParams, TakeoffSession};

/// Structural steel quantity takeoff
#[derive(Parser)]
#[command(name = "steelgrid")]
#[command(about = "Quantity takeoff for regular steel frames", long_about = None)]
#[command(version)]
struct Cli {
    /// Frame params file (JSON); defaults are used when omitted
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Profile catalog file (JSON); the built-in KS / JIS tables when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Per-member profile, as MEMBER_ID=STANDARD/SHAPE/SIZE (repeatable)
    #[arg(long = "override", value_name = "ID=PROFILE", global = true)]
    overrides: Vec<String>,

    /// Brace on a face, as FACE:KIND[:STANDARD/SHAPE/SIZE] (repeatable)
    #[arg(long = "brace", value_name = "FACE:KIND", global = true)]
    braces: Vec<String>,

    /// Write output to this file instead of stdout
    #[arg(long, short, global = true)]
    out: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a params template with the default frame
    Init,

    /// Bill of quantities
    Takeoff {
        #[arg(long, value_enum, default_value_t = TableFormat::Tsv)]
        format: TableFormat,
    },

    /// One row per member with endpoints
    Members {
        #[arg(long, value_enum, default_value_t = MemberFormat::Csv)]
        format: MemberFormat,
    },

    /// STAAD-style joint and member geometry
    Staad,

    /// Render envelope (JSON) for a 3D viewer
    Scene,

    /// Browse the profile catalog
    Catalog {
        /// Standard key (e.g. KS); lists standards when omitted
        standard: Option<String>,

        /// Shape key (e.g. H); lists shapes when omitted
        shape: Option<String>,
    },

    /// Weigh profiles, as STANDARD/SHAPE/SIZE@LENGTH_M[@KG_PER_M]
    Weight {
        #[arg(required = true, value_name = "ITEM")]
        items: Vec<String>,
    },

    /// PDF takeoff report (requires --out)
    Report {
        /// Name printed in the report footer
        #[arg(long, default_value = "")]
        prepared_by: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableFormat {
    Tsv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum MemberFormat {
    Csv,
    Json,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Arc<ProfileCatalog>> {
    match path {
        Some(path) => {
            let catalog = ProfileCatalog::load(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => Ok(builtin_catalog()),
    }
}

fn load_frame(path: Option<&Path>) -> Result<FrameParams> {
    match path {
        Some(path) => load_params(path).with_context(|| format!("loading params {}", path.display())),
        None => Ok(FrameParams::default()),
    }
}

fn parse_override(arg: &str) -> Result<(MemberId, ProfileSelection)> {
    let Some((id, profile)) = arg.split_once('=') else {
        bail!("override '{}' must look like ID=STANDARD/SHAPE/SIZE", arg);
    };
    Ok((id.parse()?, profile.parse()?))
}

fn parse_brace(arg: &str) -> Result<(FaceKey, BraceKind, Option<ProfileSelection>)> {
    let mut parts = arg.splitn(3, ':');
    let (Some(face), Some(kind)) = (parts.next(), parts.next()) else {
        bail!("brace '{}' must look like FACE:KIND[:PROFILE]", arg);
    };
    let profile = parts.next().map(str::parse::<ProfileSelection>).transpose()?;
    Ok((face.parse()?, kind.parse()?, profile))
}

/// `KS/H/200x200x8x12@6[@49.9]`
fn parse_weight_item(arg: &str) -> Result<(ProfileSelection, f64, Option<f64>)> {
    let mut parts = arg.split('@');
    let profile = parts.next().unwrap_or_default();
    let Some(length) = parts.next() else {
        bail!("item '{}' must look like PROFILE@LENGTH_M[@KG_PER_M]", arg);
    };
    let length: f64 = length
        .trim()
        .parse()
        .with_context(|| format!("length in '{}'", arg))?;
    let kgm = parts
        .next()
        .map(|k| k.trim().parse::<f64>())
        .transpose()
        .with_context(|| format!("kg/m in '{}'", arg))?;
    Ok((profile.parse()?, length, kgm))
}

fn build_session(cli: &Cli) -> Result<TakeoffSession> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let params = load_frame(cli.params.as_deref())?;
    let mut session = TakeoffSession::new(catalog, params);

    for arg in &cli.overrides {
        let (id, selection) = parse_override(arg).with_context(|| format!("--override {}", arg))?;
        session.set_override(id, selection);
    }
    for arg in &cli.braces {
        let (face, kind, profile) = parse_brace(arg).with_context(|| format!("--brace {}", arg))?;
        if !session.toggle_brace(face, kind, profile) {
            // the same face given twice cancels out
            debug!(face = %face, "Brace listed twice, removed");
        }
    }
    Ok(session)
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => write_export(path, text)?,
        None => println!("{}", text),
    }
    Ok(())
}

fn catalog_listing(catalog: &ProfileCatalog, standard: Option<&str>, shape: Option<&str>) -> Result<String> {
    let lines: Vec<String> = match (standard, shape) {
        (None, _) => catalog
            .standards()
            .into_iter()
            .map(|s| format!("{}\t{}", s, standard_label(s)))
            .collect(),
        (Some(std), None) => {
            let shapes = catalog.shapes(std);
            if shapes.is_empty() {
                bail!("unknown standard '{}'", std);
            }
            shapes
                .into_iter()
                .map(|s| format!("{}\t{}", s, shape_option_label(s)))
                .collect()
        }
        (Some(std), Some(shape)) => {
            let items = catalog.items(std, shape);
            if items.is_empty() {
                bail!("no items for {}/{}", std, shape);
            }
            items
                .iter()
                .map(|it| format!("{}\t{}", it.key, it.option_label()))
                .collect()
        }
    };
    Ok(lines.join("\n"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let out = cli.out.as_deref();

    match &cli.command {
        Commands::Init => emit(out, &FrameParams::default().to_json()?),
        Commands::Takeoff { format } => {
            let takeoff = build_session(&cli)?.compute();
            info!(rows = takeoff.table.rows.len(), "Takeoff ready");
            let text = match format {
                TableFormat::Tsv => takeoff.to_tsv(),
                TableFormat::Json => serde_json::to_string_pretty(&takeoff.table)?,
            };
            emit(out, &text)
        }
        Commands::Members { format } => {
            let takeoff = build_session(&cli)?.compute();
            let text = match format {
                MemberFormat::Csv => takeoff.to_csv(),
                MemberFormat::Json => serde_json::to_string_pretty(&takeoff.members)?,
            };
            emit(out, &text)
        }
        Commands::Staad => emit(out, &build_session(&cli)?.compute().to_staad()),
        Commands::Scene => emit(out, &serde_json::to_string_pretty(&build_session(&cli)?.scene())?),
        Commands::Catalog { standard, shape } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            emit(out, &catalog_listing(&catalog, standard.as_deref(), shape.as_deref())?)
        }
        Commands::Weight { items } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let mut tally = Tally::new();
            for arg in items {
                let (selection, length, kgm) = parse_weight_item(arg)?;
                tally
                    .add(&catalog, &selection, length, kgm)
                    .with_context(|| format!("weighing {}", arg))?;
            }
            emit(out, &tally.to_tsv())
        }
        Commands::Report { prepared_by } => {
            let Some(path) = out else {
                bail!("report needs --out <file.pdf>");
            };
            let session = build_session(&cli)?;
            let takeoff = session.compute();
            let pdf = render_takeoff_pdf(session.params(), &takeoff, prepared_by)?;
            write_export_bytes(path, &pdf).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = pdf.len(), "Wrote report");
            Ok(())
        }
    }
}
