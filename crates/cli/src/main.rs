use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polyshape::api::{
    from_spec, Polyhedron, Shape, ShapeProperties, ShapeSpec, MERGE_ATOL, MERGE_RTOL,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "polyshape")]
#[command(about = "Geometric properties of particle shapes from JSON descriptors")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the property report of a shape descriptor as JSON
    Props {
        #[arg(long)]
        input: PathBuf,
        /// Dimension to interpret the descriptor in
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=3))]
        ndim: u8,
    },
    /// Merge coplanar facets of a polyhedral descriptor and write a Mesh descriptor
    Merge {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = MERGE_ATOL)]
        atol: f64,
        #[arg(long, default_value_t = MERGE_RTOL)]
        rtol: f64,
    },
    /// Print version information as JSON
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Props { input, ndim } => {
            let props = props(&input, ndim as usize)?;
            println!("{}", serde_json::to_string_pretty(&props)?);
            Ok(())
        }
        Action::Merge {
            input,
            out,
            atol,
            rtol,
        } => merge(&input, &out, atol, rtol),
        Action::Report => report(),
    }
}

fn read_spec(path: &Path) -> Result<ShapeSpec> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing descriptor {}", path.display()))
}

fn props(input: &Path, ndim: usize) -> Result<ShapeProperties> {
    let spec = read_spec(input)?;
    let shape = from_spec(&spec, ndim)
        .with_context(|| format!("building shape from {}", input.display()))?;
    tracing::info!(input = %input.display(), kind = shape.kind(), ndim, "props");
    Ok(shape.properties()?)
}

fn merge(input: &Path, out: &Path, atol: f64, rtol: f64) -> Result<()> {
    let spec = read_spec(input)?;
    let mut poly: Polyhedron = match from_spec(&spec, 3)? {
        Shape::Polyhedron(p) => p,
        Shape::ConvexPolyhedron(c) => c.into_polyhedron(),
        Shape::ConvexSpheropolyhedron(sp) => sp.core().polyhedron().clone(),
        other => bail!("merge needs a polyhedral descriptor, got {}", other.kind()),
    };
    let before = poly.num_facets();
    poly.merge_facets(atol, rtol)
        .with_context(|| format!("merging facets of {}", input.display()))?;
    let after = poly.num_facets();
    tracing::info!(input = %input.display(), before, after, atol, rtol, "merge");

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&poly.to_spec())?)
        .with_context(|| format!("writing {}", out.display()))?;
    provenance::write_sidecar(
        out,
        "merge",
        serde_json::json!({
            "input": input.to_string_lossy(),
            "atol": atol,
            "rtol": rtol,
            "facets_before": before,
            "facets_after": after,
        }),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "name": "polyshape",
        "version": polyshape::VERSION,
        "code_rev": provenance::current_git_rev(),
        "defaults": {
            "merge_atol": MERGE_ATOL,
            "merge_rtol": MERGE_RTOL,
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
