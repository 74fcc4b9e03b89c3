//! Citegraph - Citation Graph Reducer
//!
//! Reads extracted citation records, builds the graph, merges its leaves and
//! writes the resulting snapshot as JSON.

use std::time::Instant;

use anyhow::{Context, Result};
use citegraph::config::Config;
use citegraph::graph::Graph;
use citegraph::records::load_graph;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let start = Instant::now();

    info!(input = %config.input.display(), kind = %config.kind, "Loading citation records");
    let mut graph = load_graph(&config.input, config.kind)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    log_counts("Initial graph", &graph);

    if config.combine_leaves {
        graph.combine_leaves();
        log_counts("Graph after combining leaves", &graph);
    }

    if config.report_components {
        report_components(&graph);
    }

    graph
        .write_to_file(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    info!(
        output = %config.output.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Graph written"
    );

    Ok(())
}

fn log_counts(label: &str, graph: &Graph) {
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        leaves = graph.leaves().len(),
        "{label}"
    );
}

fn report_components(graph: &Graph) {
    let mut sizes: Vec<usize> = graph.components().iter().map(Graph::node_count).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    info!(
        components = sizes.len(),
        largest = sizes.first().copied().unwrap_or(0),
        singletons = sizes.iter().filter(|&&s| s == 1).count(),
        "Connected components"
    );
}
