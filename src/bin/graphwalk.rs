//! graphwalk CLI: query a dependency graph snapshot.
//!
//! Usage:
//!   graphwalk --graph scene.json traverse <node> [--direction up|down|both] [--max-depth N]
//!   graphwalk --graph scene.yaml tree <node>
//!   graphwalk --graph scene.json native <node> [--type file]

use clap::{Parser, Subcommand, ValueEnum};
use graphwalk::{
    classify, connections, find_by_type, mesh_shaders, node_info, render_tree, DgIterator,
    Direction, MemoryGraph, NodeId, NodeType, TraverseQuery,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "graphwalk",
    version,
    about = "Dependency graph traversal and typed queries"
)]
struct Cli {
    /// Graph snapshot to load (.json, .yaml or .yml)
    #[arg(long, short = 'g', global = true)]
    graph: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Both,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Upstream,
            DirectionArg::Down => Direction::Downstream,
            DirectionArg::Both => Direction::Both,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Breadth-first walk from a node
    Traverse {
        /// Start node
        node: String,
        #[arg(long, short, value_enum, default_value = "up")]
        direction: DirectionArg,
        /// Maximum depth; negative means unlimited
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        max_depth: i64,
        /// Only produce (and walk through) nodes of these types
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
    /// Reachable nodes of one type
    Find {
        /// Start node
        node: String,
        /// Node type to look for
        node_type: String,
        #[arg(long, short, value_enum, default_value = "up")]
        direction: DirectionArg,
    },
    /// Reachable nodes bucketed by type
    Classify {
        /// Start node
        node: String,
        #[arg(long, short, value_enum, default_value = "up")]
        direction: DirectionArg,
        /// Maximum depth; negative means unlimited
        #[arg(long, default_value_t = graphwalk::query::DEPENDENCY_NETWORK_DEPTH as i64, allow_negative_numbers = true)]
        max_depth: i64,
    },
    /// Indented tree of a walk
    Tree {
        /// Start node
        node: String,
        #[arg(long, short, value_enum, default_value = "up")]
        direction: DirectionArg,
        /// Maximum depth; negative means unlimited
        #[arg(long, default_value_t = graphwalk::query::DEFAULT_TREE_DEPTH as i64, allow_negative_numbers = true)]
        max_depth: i64,
    },
    /// Port-level connections of a node
    Connections {
        node: String,
    },
    /// Type, namespace and neighbors of a node
    Info {
        node: String,
    },
    /// Surface shaders assigned to a mesh shape
    Shaders {
        mesh: String,
    },
    /// Walk with the host's native iterator
    Native {
        /// Start node (full path or unique short name)
        node: String,
        #[arg(long, short, value_enum, default_value = "up")]
        direction: DirectionArg,
        /// Only report nodes of this type (upstream only)
        #[arg(long = "type")]
        node_type: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn depth_option(max_depth: i64) -> Option<usize> {
    usize::try_from(max_depth).ok()
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_lines(lines: &[impl std::fmt::Display]) {
    for line in lines {
        println!("{}", line);
    }
}

fn cmd_traverse(
    graph: &MemoryGraph,
    node: &str,
    direction: Direction,
    max_depth: i64,
    types: Vec<String>,
    json: bool,
) -> i32 {
    let mut query = TraverseQuery::from(node)
        .direction(direction)
        .depth_limit(max_depth);
    if !types.is_empty() {
        query = query.with_types(types);
    }
    let records = match query.collect(graph) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        return print_json(&records);
    }
    for record in records {
        println!("{:>3}  {}", record.depth, record.node);
    }
    0
}

fn cmd_find(graph: &MemoryGraph, node: &str, node_type: &str, direction: Direction, json: bool) -> i32 {
    match find_by_type(graph, &NodeId::from(node), &NodeType::from(node_type), direction) {
        Ok(found) if json => print_json(&found),
        Ok(found) => {
            print_lines(&found);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_classify(graph: &MemoryGraph, node: &str, direction: Direction, max_depth: i64, json: bool) -> i32 {
    let network = match classify(graph, &NodeId::from(node), direction, depth_option(max_depth)) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        return print_json(&network);
    }
    for (node_type, nodes) in network.iter() {
        println!("{} ({})", node_type, nodes.len());
        for node in nodes {
            println!("  {}", node);
        }
    }
    0
}

fn cmd_tree(graph: &MemoryGraph, node: &str, direction: Direction, max_depth: i64) -> i32 {
    match render_tree(graph, &NodeId::from(node), direction, depth_option(max_depth)) {
        Ok(tree) => {
            print!("{}", tree);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_connections(graph: &MemoryGraph, node: &str, json: bool) -> i32 {
    match connections(graph, &NodeId::from(node)) {
        Ok(edges) if json => print_json(&edges),
        Ok(edges) => {
            print_lines(&edges);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_info(graph: &MemoryGraph, node: &str, json: bool) -> i32 {
    let info = match node_info(graph, &NodeId::from(node)) {
        Ok(Some(info)) => info,
        Ok(None) => {
            eprintln!("Error: node '{}' not found", node);
            return 1;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        return print_json(&info);
    }
    println!("name:       {}", info.name);
    println!("type:       {}", info.node_type);
    println!("referenced: {}", info.is_referenced);
    println!("namespace:  {}", info.namespace);
    println!("inputs:     {}", info.connections_in.len());
    print_lines(&info.connections_in.iter().map(|n| format!("  {}", n)).collect::<Vec<_>>());
    println!("outputs:    {}", info.connections_out.len());
    print_lines(&info.connections_out.iter().map(|n| format!("  {}", n)).collect::<Vec<_>>());
    0
}

fn cmd_shaders(graph: &MemoryGraph, mesh: &str, json: bool) -> i32 {
    match mesh_shaders(graph, &NodeId::from(mesh)) {
        Ok(shaders) if json => print_json(&shaders),
        Ok(shaders) => {
            print_lines(&shaders);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_native(
    graph: &MemoryGraph,
    node: &str,
    direction: Direction,
    node_type: Option<&str>,
    json: bool,
) -> i32 {
    let iter = match DgIterator::new(graph, node) {
        Ok(iter) => iter,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let names = match node_type {
        Some(node_type) => match graph.native_type_id(&NodeType::from(node_type)) {
            Some(type_id) => iter.nodes_of_native_type(type_id),
            None => Vec::new(),
        },
        None => iter.nodes(direction),
    };
    if json {
        return print_json(&names);
    }
    print_lines(&names);
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(path) = cli.graph else {
        eprintln!("Error: --graph <PATH> is required");
        std::process::exit(2);
    };
    let graph = match MemoryGraph::load(&path) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: failed to load '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        nodes = graph.node_count(),
        connections = graph.edge_count(),
        "loaded graph snapshot"
    );

    let json = cli.json;
    let code = match cli.command {
        Commands::Traverse { node, direction, max_depth, types } => {
            cmd_traverse(&graph, &node, direction.into(), max_depth, types, json)
        }
        Commands::Find { node, node_type, direction } => {
            cmd_find(&graph, &node, &node_type, direction.into(), json)
        }
        Commands::Classify { node, direction, max_depth } => {
            cmd_classify(&graph, &node, direction.into(), max_depth, json)
        }
        Commands::Tree { node, direction, max_depth } => {
            cmd_tree(&graph, &node, direction.into(), max_depth)
        }
        Commands::Connections { node } => cmd_connections(&graph, &node, json),
        Commands::Info { node } => cmd_info(&graph, &node, json),
        Commands::Shaders { mesh } => cmd_shaders(&graph, &mesh, json),
        Commands::Native { node, direction, node_type } => {
            cmd_native(&graph, &node, direction.into(), node_type.as_deref(), json)
        }
    };
    std::process::exit(code);
}
