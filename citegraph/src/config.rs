// Configuration for the citegraph binary, read from the environment
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::graph::GraphKind;

pub const DEFAULT_OUTPUT: &str = "graph_data.json";

/// Runtime settings for one pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// Extracted records to read
    pub input: PathBuf,
    /// Snapshot destination
    pub output: PathBuf,
    pub kind: GraphKind,
    /// Merge leaves into their neighbors before writing
    pub combine_leaves: bool,
    /// Log component count and sizes
    pub report_components: bool,
}

impl Config {
    /// Load configuration, reading `.env` first when present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            input: get_input()?,
            output: get_output(),
            kind: get_graph_kind()?,
            combine_leaves: get_flag("CITEGRAPH_COMBINE_LEAVES", true)?,
            report_components: get_flag("CITEGRAPH_REPORT_COMPONENTS", false)?,
        })
    }
}

/// Get CITEGRAPH_INPUT from environment
pub fn get_input() -> Result<PathBuf> {
    std::env::var("CITEGRAPH_INPUT")
        .map(PathBuf::from)
        .context("CITEGRAPH_INPUT must be set")
}

/// Get CITEGRAPH_OUTPUT from environment, falling back to the default path
pub fn get_output() -> PathBuf {
    std::env::var("CITEGRAPH_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT))
}

/// Get CITEGRAPH_GRAPH_KIND from environment (default: undirected)
pub fn get_graph_kind() -> Result<GraphKind> {
    match std::env::var("CITEGRAPH_GRAPH_KIND") {
        Ok(value) => parse_kind(&value),
        Err(_) => Ok(GraphKind::default()),
    }
}

fn get_flag(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value).with_context(|| format!("{name} must be a boolean")),
        Err(_) => Ok(default),
    }
}

fn parse_kind(value: &str) -> Result<GraphKind> {
    value
        .parse()
        .map_err(|e: String| anyhow!(e))
        .context("CITEGRAPH_GRAPH_KIND must be undirected, directed or multi")
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("unrecognized value {other:?}")),
    }
}
