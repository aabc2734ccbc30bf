use clap::{Args, Parser, Subcommand, ValueEnum};
use partlab::graph_generation::{grid_2d, navigable_small_world, powerlaw_cluster};
use partlab::io::metis::{MetisReader, MetisWriter, MissingLines, write_graph_file};
use partlab::io::{GraphReader, partition_file_path, read_partition_file};
use partlab::layout::{LayoutConfig, LayoutMethod, base_layout, cluster_layout};
use partlab::partitioning::evaluate;
use partlab::render::{Renderer, Scene, SvgRenderer};
use partlab::sweep::{CancelToken, FailurePolicy, ParameterAxis, SweepConfig, run_sweep};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic graph in METIS format
    Generate {
        #[command(subcommand)]
        kind: GraphKind,
    },
    /// Draw a graph coloured by the partition file `<graph>.parts.<k>`
    Visualize(VisualizeArgs),
    /// Run the partitioner over a grid of balance parameters
    Sweep(SweepArgs),
}

#[derive(Subcommand, Debug)]
enum GraphKind {
    /// size × size lattice
    Grid {
        output: PathBuf,
        #[arg(default_value_t = 10)]
        size: usize,
    },
    /// Holme–Kim power-law graph
    Powerlaw {
        output: PathBuf,
        #[arg(default_value_t = 100)]
        n: usize,
        #[arg(default_value_t = 3)]
        m: usize,
        #[arg(default_value_t = 0.05)]
        p: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Kleinberg navigable small world
    Smallworld {
        output: PathBuf,
        #[arg(default_value_t = 10)]
        n: usize,
        #[arg(default_value_t = 1)]
        p: usize,
        #[arg(default_value_t = 2)]
        q: usize,
        #[arg(default_value_t = 2.0)]
        r: f64,
        #[arg(default_value_t = 2)]
        dim: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Spring,
    Stress,
}

#[derive(Args, Debug)]
struct VisualizeArgs {
    /// Path of the METIS graph file
    graph_file: PathBuf,

    /// Number of partitions (selects `<graph>.parts.<k>`)
    num_parts: usize,

    /// Suffix appended to the output file name
    note: Option<String>,

    /// Base embedding
    #[arg(long, value_enum, default_value_t = LayoutArg::Spring)]
    layout: LayoutArg,

    /// Keep the base embedding, without pulling partitions apart
    #[arg(long)]
    plain: bool,

    /// Layout seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Layout iterations
    #[arg(short, long, default_value_t = 50)]
    iterations: usize,

    /// Read missing trailing adjacency lines as empty
    #[arg(long)]
    tolerant: bool,

    /// Hide vertex labels
    #[arg(long)]
    no_labels: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// JSON sweep configuration; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Partitioner executable
    #[arg(long)]
    partitioner: Option<PathBuf>,

    /// METIS graph file handed to the partitioner
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Number of partitions
    #[arg(long)]
    parts: Option<usize>,

    /// Vertex balance values passed with `-v`
    #[arg(short = 'v', long, value_delimiter = ',')]
    vertex_balance: Option<Vec<f64>>,

    /// Edge balance values passed with `-e`
    #[arg(short = 'e', long, value_delimiter = ',')]
    edge_balance: Option<Vec<f64>>,

    /// Results table path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the records as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Concurrent partitioner runs
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-run timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Record failed runs with absent metrics instead of stopping
    #[arg(long)]
    keep_going: bool,
}

fn set_axis(cfg: &mut SweepConfig, flag: &str, name: &str, values: Vec<f64>) {
    match cfg.axes.iter_mut().find(|a| a.flag == flag) {
        Some(axis) => axis.values = values,
        None => cfg.axes.push(ParameterAxis::new(name, flag, values)),
    }
}

fn sweep(args: SweepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => SweepConfig::from_path(path)?,
        None => SweepConfig::default(),
    };
    if let Some(p) = args.partitioner {
        cfg.partitioner = p;
    }
    if let Some(g) = args.graph {
        cfg.graph_file = g;
    }
    if let Some(k) = args.parts {
        cfg.parts = k;
    }
    if let Some(values) = args.vertex_balance {
        set_axis(&mut cfg, "-v", "Vertex Balance (v)", values);
    }
    if let Some(values) = args.edge_balance {
        set_axis(&mut cfg, "-e", "Edge Balance (e)", values);
    }
    if let Some(o) = args.output {
        cfg.output = o;
    }
    if args.json.is_some() {
        cfg.json_output = args.json;
    }
    if let Some(w) = args.workers {
        cfg.workers = w;
    }
    if args.timeout.is_some() {
        cfg.timeout_secs = args.timeout;
    }
    if args.keep_going {
        cfg.on_failure = FailurePolicy::RecordAbsent;
    }

    let records = run_sweep(&cfg, &CancelToken::new())?;
    for r in &records {
        println!(
            "{} -> Edge Cut: {:?}, Max Cut: {:?}",
            r.point
                .params
                .iter()
                .map(|p| format!("{}={}", p.flag.trim_start_matches('-'), p.value))
                .collect::<Vec<_>>()
                .join(", "),
            r.edge_cut,
            r.max_cut
        );
    }
    Ok(())
}

fn output_name(graph_file: &Path, num_parts: usize, note: Option<&str>) -> PathBuf {
    let mut name = graph_file.as_os_str().to_os_string();
    name.push(format!("_partition_{num_parts}"));
    if let Some(note) = note {
        name.push(format!("_{note}"));
    }
    name.push(".svg");
    PathBuf::from(name)
}

fn visualize(args: VisualizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let missing = if args.tolerant {
        MissingLines::TreatAsEmpty
    } else {
        MissingLines::Reject
    };
    let doc = MetisReader::named(args.graph_file.display().to_string())
        .with_missing_lines(missing)
        .read(File::open(&args.graph_file)?)?;
    let graph = doc.graph;
    let parts_path = partition_file_path(&args.graph_file, args.num_parts);
    let assignment = read_partition_file(&parts_path, graph.vertex_count())?;

    let quality = evaluate(&graph, &assignment)?;
    log::info!(
        "edge cut {}, max cut {}, imbalance {:.3}",
        quality.edge_cut,
        quality.max_cut,
        quality.imbalance
    );

    let cfg = LayoutConfig {
        method: match args.layout {
            LayoutArg::Spring => LayoutMethod::Spring,
            LayoutArg::Stress => LayoutMethod::Stress,
        },
        seed: args.seed,
        iterations: args.iterations,
        ..LayoutConfig::default()
    };
    let base = base_layout(&graph, &cfg);
    let positions = if args.plain {
        base
    } else {
        cluster_layout(&base, &assignment, cfg.offset_range)?
    };

    let scene = Scene::build(
        format!("Graph Partition Visualization ({} Parts)", args.num_parts),
        &graph,
        &assignment,
        positions,
    )?;
    let renderer = SvgRenderer {
        show_labels: !args.no_labels,
        ..SvgRenderer::default()
    };
    let out = output_name(&args.graph_file, args.num_parts, args.note.as_deref());
    renderer.render(&scene, &out)?;
    Ok(())
}

fn generate(kind: GraphKind) -> Result<(), Box<dyn std::error::Error>> {
    let writer = MetisWriter::default();
    match kind {
        GraphKind::Grid { output, size } => {
            write_graph_file(&output, &grid_2d(size), &writer)?;
        }
        GraphKind::Powerlaw { output, n, m, p, seed } => {
            write_graph_file(&output, &powerlaw_cluster(n, m, p, seed)?, &writer)?;
        }
        GraphKind::Smallworld {
            output,
            n,
            p,
            q,
            r,
            dim,
            seed,
        } => {
            write_graph_file(&output, &navigable_small_world(n, p, q, r, dim, seed)?, &writer)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { kind } => generate(kind),
        Command::Visualize(args) => visualize(args),
        Command::Sweep(args) => sweep(args),
    }
}
