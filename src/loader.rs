use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::error::SortError;

// ======================================================
// TYPES
// ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    Json,
    Yaml,
}

/// Adjacency list exactly as written in the file. `None` is a `null` document.
pub type RawGraph = Option<Vec<Vec<i128>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGraph {
    /// `None` when the document was `null`.
    pub graph: Option<Vec<Vec<usize>>>,
    /// SHA-256 of the canonical JSON form of the document.
    pub digest: String,
}

impl LoadedGraph {
    pub fn as_deref(&self) -> Option<&[Vec<usize>]> {
        self.graph.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON graph")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML graph")]
    Yaml(#[from] serde_yaml::Error),

    #[error(
        "cannot tell the format of {}; pass --format json or --format yaml",
        .path.display()
    )]
    UnknownFormat { path: PathBuf },

    #[error(transparent)]
    Graph(#[from] SortError),
}

// ======================================================
// LOADING
// ======================================================

/// Reads a graph from `path`, or from stdin when `path` is `-`.
///
/// Without an explicit `format` the extension decides; stdin defaults to JSON.
pub fn load_graph(path: &Path, format: Option<GraphFormat>) -> Result<LoadedGraph, LoadError> {
    let from_stdin = path == Path::new("-");

    let format = match format {
        Some(format) => format,
        None if from_stdin => GraphFormat::Json,
        None => detect_format(path).ok_or_else(|| LoadError::UnknownFormat {
            path: path.to_path_buf(),
        })?,
    };

    let text = if from_stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    debug!(path = %path.display(), ?format, bytes = text.len(), "loaded graph file");
    parse_graph(&text, format)
}

pub fn detect_format(path: &Path) -> Option<GraphFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(GraphFormat::Json),
        "yaml" | "yml" => Some(GraphFormat::Yaml),
        _ => None,
    }
}

/// Parses a graph document and checks every edge target.
///
/// Targets are read as wide signed integers so that a negative or oversized
/// identifier is reported as [`SortError::InvalidNode`] instead of a parse
/// failure. Integers beyond `u64` that JSON only carries as floats still fail
/// to parse.
pub fn parse_graph(text: &str, format: GraphFormat) -> Result<LoadedGraph, LoadError> {
    let raw: RawGraph = match format {
        GraphFormat::Json => serde_json::from_str(text)?,
        GraphFormat::Yaml => serde_yaml::from_str(text)?,
    };

    let digest = graph_digest(&raw)?;

    let graph = match raw {
        Some(raw) => Some(convert(raw)?),
        None => None,
    };

    Ok(LoadedGraph { graph, digest })
}

// ======================================================
// HELPERS
// ======================================================

fn convert(raw: Vec<Vec<i128>>) -> Result<Vec<Vec<usize>>, SortError> {
    let len = raw.len();

    raw.into_iter()
        .enumerate()
        .map(|(node, targets)| {
            targets
                .into_iter()
                .map(|target| match usize::try_from(target) {
                    Ok(id) if id < len => Ok(id),
                    _ => Err(SortError::invalid_node(node, target, len)),
                })
                .collect::<Result<Vec<usize>, SortError>>()
        })
        .collect()
}

fn graph_digest(raw: &RawGraph) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(raw)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_json_adjacency_list() {
        let loaded = parse_graph("[[1, 2], [3], [3], []]", GraphFormat::Json).unwrap();
        assert_eq!(
            loaded.graph,
            Some(vec![vec![1, 2], vec![3], vec![3], vec![]])
        );
        assert_eq!(loaded.digest.len(), 64);
    }

    #[test]
    fn parses_yaml_adjacency_list() {
        let yaml = "- [1]\n- []\n- [0, 1]\n";
        let loaded = parse_graph(yaml, GraphFormat::Yaml).unwrap();
        assert_eq!(loaded.graph, Some(vec![vec![1], vec![], vec![0, 1]]));
    }

    #[test]
    fn same_graph_same_digest_across_formats() {
        let json = parse_graph("[[1],[]]", GraphFormat::Json).unwrap();
        let yaml = parse_graph("- [1]\n- []\n", GraphFormat::Yaml).unwrap();
        assert_eq!(json.digest, yaml.digest);
    }

    #[test]
    fn null_document_is_an_absent_graph() {
        let loaded = parse_graph("null", GraphFormat::Json).unwrap();
        assert_eq!(loaded.graph, None);
        assert_eq!(loaded.as_deref(), None);

        let loaded = parse_graph("~", GraphFormat::Yaml).unwrap();
        assert_eq!(loaded.graph, None);
    }

    #[test]
    fn empty_list_is_an_empty_graph() {
        let loaded = parse_graph("[]", GraphFormat::Json).unwrap();
        assert_eq!(loaded.graph, Some(vec![]));
    }

    #[test]
    fn negative_target_is_an_invalid_node() {
        let err = parse_graph("[[1], [-1]]", GraphFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph(SortError::InvalidNode { node: 1, target: -1, len: 2 })
        ));
    }

    #[test]
    fn target_beyond_i64_is_an_invalid_node() {
        let err = parse_graph("[[18446744073709551615], []]", GraphFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph(SortError::InvalidNode {
                node: 0,
                target: 18446744073709551615,
                len: 2
            })
        ));

        let err = parse_graph("- []\n- [18446744073709551615]\n", GraphFormat::Yaml).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph(SortError::InvalidNode { node: 1, len: 2, .. })
        ));
    }

    #[test]
    fn out_of_range_target_is_reported_in_scan_order() {
        let err = parse_graph("[[5], [-1]]", GraphFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph(SortError::InvalidNode { node: 0, target: 5, len: 2 })
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            parse_graph("[[1], [", GraphFormat::Json),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            parse_graph("nodes: 3", GraphFormat::Yaml),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(detect_format(Path::new("g.json")), Some(GraphFormat::Json));
        assert_eq!(detect_format(Path::new("g.YML")), Some(GraphFormat::Yaml));
        assert_eq!(detect_format(Path::new("g.yaml")), Some(GraphFormat::Yaml));
        assert_eq!(detect_format(Path::new("g.txt")), None);
        assert_eq!(detect_format(Path::new("graph")), None);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- [1]\n- []").unwrap();

        let loaded = load_graph(file.path(), None).unwrap();
        assert_eq!(loaded.graph, Some(vec![vec![1], vec![]]));
    }

    #[test]
    fn unknown_extension_needs_explicit_format() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "[[1], []]").unwrap();

        assert!(matches!(
            load_graph(file.path(), None),
            Err(LoadError::UnknownFormat { .. })
        ));
        let loaded = load_graph(file.path(), Some(GraphFormat::Json)).unwrap();
        assert_eq!(loaded.graph, Some(vec![vec![1], vec![]]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_graph(&path, None), Err(LoadError::Io { .. })));
    }
}
