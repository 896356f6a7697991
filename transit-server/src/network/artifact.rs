//! On-disk network artifacts.
//!
//! The offline builder writes the network as one JSON file next to the stop
//! lists it was built from. The server reads it once at startup. The network
//! file is a derived cache: it can always be rebuilt from the stop lists.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Edge, GraphError};
use crate::domain::Node;

/// File name of the bus stop list.
pub const BUS_STOPS_FILE: &str = "bus_stops.json";

/// File name of the metro station list.
pub const METRO_STATIONS_FILE: &str = "metro_stations.json";

/// File name of the persisted network.
pub const NETWORK_FILE: &str = "network.json";

/// Errors reading or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File contents are not the expected JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Contents parsed but do not form a valid network
    #[error("invalid network: {0}")]
    Graph(#[from] GraphError),
}

/// Persisted node and edge lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkArtifact {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl NetworkArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        read_json(path)
    }

    /// Write the artifact, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        write_json(path, self)
    }
}

/// Locations of the artifacts inside a data directory.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bus_stops(&self) -> PathBuf {
        self.root.join(BUS_STOPS_FILE)
    }

    pub fn metro_stations(&self) -> PathBuf {
        self.root.join(METRO_STATIONS_FILE)
    }

    pub fn network(&self) -> PathBuf {
        self.root.join(NETWORK_FILE)
    }
}

/// Read a stop list (a JSON array of nodes).
pub fn load_stops(path: &Path) -> Result<Vec<Node>, ArtifactError> {
    read_json(path)
}

/// Write a stop list.
pub fn save_stops(path: &Path, stops: &[Node]) -> Result<(), ArtifactError> {
    write_json(path, &stops)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(io_err)
}
