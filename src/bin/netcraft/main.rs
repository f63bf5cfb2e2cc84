//! Netcraft CLI - papercraft unfolding from the command line.
//!
//! Usage: netcraft <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `netcraft --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use netcraft::algo::unfold::{merge_faces, unfold_with_progress, ArrangeOptions, MergeOptions, UnfoldOptions};
use netcraft::algo::Progress;
use netcraft::io::{self, svg::SvgOptions, Format};
use netcraft::mesh::TriangleMesh;

#[derive(Parser)]
#[command(name = "netcraft")]
#[command(author, version, about = "Unfold triangle meshes into papercraft nets", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Coplanarity tolerance in radians used to count merged faces
        #[arg(short, long, default_value = "0.001")]
        angle_tolerance: f64,
    },

    /// Unfold a mesh into a flat net
    Unfold {
        /// Input mesh file (.stl, .ply, .gltf, .glb)
        input: PathBuf,

        /// Output file (.svg or .json)
        output: PathBuf,

        /// Coplanarity tolerance in radians
        #[arg(short, long, default_value = "0.001")]
        angle_tolerance: f64,

        /// Gap between fragments
        #[arg(short, long, default_value = "0.1")]
        spacing: f64,

        /// Row width for fragment arrangement (default: roughly square sheet)
        #[arg(short = 'w', long)]
        max_row_width: Option<f64>,

        /// Keep every fragment at its unfolding origin
        #[arg(long)]
        no_arrange: bool,

        /// SVG stroke width
        #[arg(long, default_value = "0.02")]
        stroke_width: f64,

        /// SVG margin around the drawing
        #[arg(long, default_value = "0.0")]
        margin: f64,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "netcraft=warn",
        1 => "netcraft=debug",
        _ => "netcraft=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            angle_tolerance,
        } => {
            cmd_info(&input, angle_tolerance)?;
        }
        Commands::Unfold {
            input,
            output,
            angle_tolerance,
            spacing,
            max_row_width,
            no_arrange,
            stroke_width,
            margin,
            sequential,
        } => {
            let arrange = (!no_arrange).then(|| ArrangeOptions {
                spacing,
                max_row_width,
            });
            let svg = SvgOptions::default()
                .with_stroke_width(stroke_width)
                .with_margin(margin);
            let options = UnfoldOptions::default()
                .with_angle_tolerance(angle_tolerance)
                .with_parallel(!sequential);
            cmd_unfold(&input, &output, &options, arrange.as_ref(), &svg)?;
        }
    }
    Ok(())
}

/// Create a progress reporter that prints one line per stage.
fn create_progress() -> Progress {
    Progress::new(|current, total, message| {
        if total == 0 {
            return;
        }
        let percent = (current * 100) / total;
        eprint!("\r[{:3}%] {:<32}", percent, message);
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path, angle_tolerance: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriangleMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Points: {}", mesh.num_points());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let adjacency = mesh.edge_adjacency();
    let boundary = adjacency.boundary_edges().count();
    let non_manifold = adjacency.non_manifold_edges().count();
    if adjacency.is_watertight() {
        println!("Topology: Closed ({} edges)", adjacency.edge_count());
    } else {
        println!(
            "Topology: Open ({} edges, {} boundary, {} non-manifold)",
            adjacency.edge_count(),
            boundary,
            non_manifold
        );
    }
    println!("Components: {}", mesh.connected_components().len());

    if non_manifold > 0 {
        println!("Faces: not available (mesh is non-manifold)");
        return Ok(());
    }
    let merged = merge_faces(&mesh, &MergeOptions::default().with_angle_tolerance(angle_tolerance))?;
    let degenerate = merged.faces.iter().filter(|f| f.is_degenerate()).count();
    println!("Faces: {} ({} degenerate)", merged.faces.len(), degenerate);

    Ok(())
}

fn cmd_unfold(
    input: &Path,
    output: &Path,
    options: &UnfoldOptions,
    arrange: Option<&ArrangeOptions>,
    svg: &SvgOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    // Fail on the output format before doing any work
    match Format::from_path(output) {
        Some(Format::Svg | Format::Json) => {}
        _ => {
            return Err(format!(
                "unsupported output file {} (expected .svg or .json)",
                output.display()
            )
            .into())
        }
    }

    let mesh: TriangleMesh = io::load(input)?;
    println!("Loaded: {} points, {} triangles", mesh.num_points(), mesh.num_triangles());

    let mode = if options.flatten.parallel { "parallel" } else { "sequential" };
    println!(
        "Unfolding (angle tolerance {} rad, {})...",
        options.merge.angle_tolerance, mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let mut unfolding = unfold_with_progress(&mesh, options, &progress)?;
    if let Some(arrange) = arrange {
        unfolding.unfolded.arrange(arrange)?;
    }
    let elapsed = start.elapsed();

    let unfolded = &unfolding.unfolded;
    println!(
        "Result: {} faces in {} fragments",
        unfolded.num_polygons(),
        unfolded.len()
    );
    for fragment in &unfolded.fragments {
        for (face, error) in fragment.failures() {
            eprintln!("warning: face {}: {}", face.index(), error);
        }
    }
    if let Some((min, max)) = unfolded.bounding_box() {
        println!("Sheet: {:.3} x {:.3}", max.x - min.x, max.y - min.y);
    }

    io::save(unfolded, output, svg)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
