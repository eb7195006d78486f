//! Clers CLI - Edgebreaker mesh compression command-line tool.
//!
//! Usage: clers [-v] <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `clers --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use clers::algo::{border_loops, connected_components};
use clers::codec::{decode, encode, ClersStats, CompressedMesh, EncodeOptions};
use clers::io;
use clers::mesh::{
    build_from_triangles_with_options, to_face_vertex, valences, BuildOptions, BuildStrategy,
    CornerMesh, NonManifoldPolicy,
};

#[derive(Parser)]
#[command(name = "clers")]
#[command(author, version, about = "Edgebreaker mesh compression CLI", long_about = None)]
struct Cli {
    /// Log progress to stderr (set RUST_LOG for finer control)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Compress a mesh into a .clers container
    Encode {
        /// Input mesh file (OBJ or PLY)
        input: PathBuf,

        /// Output container file
        output: PathBuf,

        /// Seed corner of the traversal
        #[arg(short, long, default_value = "0")]
        seed: usize,

        /// Reject meshes with borders instead of filling their holes
        #[arg(long)]
        no_fill: bool,
    },

    /// Decompress a .clers container into a mesh
    Decode {
        /// Input container file
        input: PathBuf,

        /// Output mesh file (OBJ or PLY)
        output: PathBuf,
    },

    /// Print CLERS symbol statistics
    Stats {
        /// Input mesh file or .clers container
        input: PathBuf,

        /// Seed corner of the traversal (meshes only)
        #[arg(short, long, default_value = "0")]
        seed: usize,

        /// Print the symbol string
        #[arg(long)]
        symbols: bool,
    },

    /// Verify that a mesh survives an encode/decode round trip
    Check {
        /// Input mesh file
        input: PathBuf,

        /// Seed corner of the traversal
        #[arg(short, long, default_value = "0")]
        seed: usize,

        /// Opposite table construction
        #[arg(long, value_enum, default_value = "bucketed")]
        strategy: Strategy,

        /// Keep the first pairing of a non-manifold edge instead of failing
        #[arg(long)]
        first_wins: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Compare every pair of triangles
    Naive,
    /// Bucket corners by vertex
    Bucketed,
}

impl From<Strategy> for BuildStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Naive => BuildStrategy::Naive,
            Strategy::Bucketed => BuildStrategy::Bucketed,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Encode {
            input,
            output,
            seed,
            no_fill,
        } => {
            cmd_encode(&input, &output, seed, no_fill)?;
        }

        Commands::Decode { input, output } => {
            cmd_decode(&input, &output)?;
        }

        Commands::Stats {
            input,
            seed,
            symbols,
        } => {
            cmd_stats(&input, seed, symbols)?;
        }

        Commands::Check {
            input,
            seed,
            strategy,
            first_wins,
        } => {
            cmd_check(&input, seed, strategy, first_wins)?;
        }
    }

    Ok(())
}

fn is_container(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("clers"))
}

fn read_container(path: &Path) -> Result<CompressedMesh, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    Ok(CompressedMesh::from_bytes(&bytes)?)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: CornerMesh = io::load(input)?;
    let table = mesh.table();

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Edges: {}", mesh.num_edges());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let valence = valences(table, mesh.num_vertices());
    let used: Vec<usize> = valence.iter().copied().filter(|&n| n > 0).collect();
    if !used.is_empty() {
        let avg = used.iter().sum::<usize>() as f64 / used.len() as f64;
        let max = used.iter().copied().max().unwrap_or(0);
        println!("Valence: avg {:.2}, max {}", avg, max);
    }

    let loops = border_loops(table)?;
    if loops.is_empty() {
        println!("Topology: Closed (no border)");
    } else {
        let edges: usize = loops.iter().map(|l| l.len()).sum();
        println!("Topology: Open ({} border loops, {} border edges)", loops.len(), edges);
    }

    let components = connected_components(table);
    println!("Components: {}", components.count());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    Ok(())
}

fn cmd_encode(
    input: &Path,
    output: &Path,
    seed: usize,
    no_fill: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: CornerMesh = io::load(input)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        input.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    let options = EncodeOptions::default()
        .with_seed(seed)
        .with_fill_holes(!no_fill);

    let start = Instant::now();
    let encoding = encode(&mesh, &options)?;
    let bytes = encoding.compressed.to_bytes()?;
    let elapsed = start.elapsed();

    std::fs::write(output, &bytes)?;

    let stats = encoding.compressed.stats();
    println!(
        "Encoded {} triangles into {} symbols ({} holes filled)",
        mesh.num_triangles(),
        encoding.compressed.num_symbols(),
        encoding.holes_filled
    );
    println!(
        "Connectivity: {} bits ({:.3} bits/triangle)",
        stats.prefix_code_bits(),
        stats.bits_per_triangle()
    );
    println!("Saved: {} ({} bytes, {:.2?})", output.display(), bytes.len(), elapsed);

    Ok(())
}

fn cmd_decode(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let compressed = read_container(input)?;

    let start = Instant::now();
    let mesh: CornerMesh = decode(&compressed)?;
    let elapsed = start.elapsed();
    log::info!("decoded {} symbols", compressed.num_symbols());

    io::save(&mesh, output)?;
    println!(
        "Decoded {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_stats(input: &Path, seed: usize, show_symbols: bool) -> Result<(), Box<dyn std::error::Error>> {
    let compressed = if is_container(input) {
        read_container(input)?
    } else {
        let mesh: CornerMesh = io::load(input)?;
        encode(&mesh, &EncodeOptions::default().with_seed(seed))?.compressed
    };

    if show_symbols {
        println!("{}", compressed.symbol_string());
    }
    let stats = ClersStats::from_symbols(&compressed.symbols);
    println!("{}", stats);
    println!(
        "Entropy bound after leading C run: {:.1} bits",
        stats.entropy_bits_with_leading_run()
    );

    Ok(())
}

/// Rotate each triangle to start at its smallest vertex and sort the list.
fn canonical(mut triangles: Vec<[usize; 3]>) -> Vec<[usize; 3]> {
    for t in &mut triangles {
        let k = (0..3).min_by_key(|&k| t[k]).unwrap_or(0);
        t.rotate_left(k);
    }
    triangles.sort_unstable();
    triangles
}

fn cmd_check(
    input: &Path,
    seed: usize,
    strategy: Strategy,
    first_wins: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded: CornerMesh = io::load(input)?;
    let (positions, triangles) = to_face_vertex(&loaded);

    let policy = if first_wins {
        NonManifoldPolicy::FirstWins
    } else {
        NonManifoldPolicy::Reject
    };
    let build_options = BuildOptions::default()
        .with_strategy(strategy.into())
        .with_non_manifold(policy);

    let start = Instant::now();
    let mesh: CornerMesh = build_from_triangles_with_options(&positions, &triangles, &build_options)?;
    let build_time = start.elapsed();

    let start = Instant::now();
    let encoding = encode(&mesh, &EncodeOptions::default().with_seed(seed))?;
    let bytes = encoding.compressed.to_bytes()?;
    let encode_time = start.elapsed();

    let start = Instant::now();
    let decoded: CornerMesh = decode(&CompressedMesh::from_bytes(&bytes)?)?;
    let decode_time = start.elapsed();

    let relabelled = to_face_vertex(&decoded)
        .1
        .into_iter()
        .map(|t| {
            [
                encoding.vertex_order[t[0]].index(),
                encoding.vertex_order[t[1]].index(),
                encoding.vertex_order[t[2]].index(),
            ]
        })
        .collect();

    println!("Build:  {:.2?}", build_time);
    println!("Encode: {:.2?} ({} bytes)", encode_time, bytes.len());
    println!("Decode: {:.2?}", decode_time);

    if canonical(relabelled) != canonical(triangles) {
        return Err("decoded connectivity differs from the input".into());
    }
    let moved = encoding
        .vertex_order
        .iter()
        .enumerate()
        .filter(|&(k, &v)| decoded.geometry().positions()[k] != *mesh.position(v))
        .count();
    if moved > 0 {
        return Err(format!("{} decoded positions differ from the input", moved).into());
    }

    println!("Round trip OK: {} triangles, {} vertices", decoded.num_triangles(), decoded.num_vertices());
    Ok(())
}
