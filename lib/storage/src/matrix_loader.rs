//! Similarity matrix persistence
//!
//! Supported on-disk forms:
//!
//! - `.json`: split layout `{"index", "columns", "data"}` or nested
//!   `{"row_id": {"col_id": score}}`, `null` cells are missing
//! - `.json.gz` / `.gz`: gzip-compressed JSON of either layout
//! - `.bin`: bincode-encoded split layout
//!
//! Files may be verified against a SHA-256 hex digest before parsing.

use crate::error::{LoadError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use simrec_core::{DenseMatrix, ProductId, SimilarityMatrix};
use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Json,
    GzipJson,
    Bincode,
}

impl MatrixFormat {
    /// Infer the format from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".json.gz") || name.ends_with(".gz") {
            Some(MatrixFormat::GzipJson)
        } else if name.ends_with(".json") {
            Some(MatrixFormat::Json)
        } else if name.ends_with(".bin") || name.ends_with(".bincode") {
            Some(MatrixFormat::Bincode)
        } else {
            None
        }
    }
}

impl std::str::FromStr for MatrixFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(MatrixFormat::Json),
            "gzip" | "gz" | "json.gz" => Ok(MatrixFormat::GzipJson),
            "bin" | "bincode" => Ok(MatrixFormat::Bincode),
            other => Err(format!("unknown matrix format '{}'", other)),
        }
    }
}

/// Nested layout, document order preserved
type NestedMatrix = IndexMap<ProductId, IndexMap<ProductId, Option<f64>>>;

/// Split layout with plain string ids; bincode cannot drive the flexible
/// id deserializer used for JSON.
#[derive(Debug, Serialize, Deserialize)]
struct BinaryMatrix {
    index: Vec<String>,
    columns: Vec<String>,
    data: Vec<Vec<Option<f64>>>,
}

impl From<BinaryMatrix> for DenseMatrix {
    fn from(bin: BinaryMatrix) -> Self {
        DenseMatrix {
            index: bin.index.into_iter().map(ProductId::from).collect(),
            columns: bin.columns.into_iter().map(ProductId::from).collect(),
            data: bin.data,
        }
    }
}

impl From<DenseMatrix> for BinaryMatrix {
    fn from(dense: DenseMatrix) -> Self {
        BinaryMatrix {
            index: dense.index.into_iter().map(String::from).collect(),
            columns: dense.columns.into_iter().map(String::from).collect(),
            data: dense.data,
        }
    }
}

/// Hex SHA-256 of a byte buffer
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[derive(Debug, Clone, Default)]
pub struct MatrixLoader {
    format: Option<MatrixFormat>,
    checksum: Option<String>,
}

impl MatrixLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a format instead of inferring it from the extension
    #[must_use]
    pub fn with_format(mut self, format: MatrixFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Require the file to hash to `expected` (hex SHA-256)
    #[must_use]
    pub fn with_checksum(mut self, expected: impl Into<String>) -> Self {
        self.checksum = Some(expected.into().to_ascii_lowercase());
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SimilarityMatrix> {
        let path = path.as_ref();
        let started = Instant::now();

        let format = match self.format {
            Some(format) => format,
            None => MatrixFormat::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?,
        };
        let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let matrix = self.load_bytes(&bytes, format)?;

        info!(
            path = %path.display(),
            ?format,
            rows = matrix.len(),
            columns = matrix.num_columns(),
            cells = matrix.stored_cells(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "similarity matrix loaded"
        );
        Ok(matrix)
    }

    pub fn load_bytes(&self, bytes: &[u8], format: MatrixFormat) -> Result<SimilarityMatrix> {
        if let Some(expected) = &self.checksum {
            let actual = checksum(bytes);
            if actual != *expected {
                return Err(LoadError::ChecksumMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        match format {
            MatrixFormat::Json => parse_json(bytes),
            MatrixFormat::GzipJson => {
                let mut decoder = GzDecoder::new(bytes);
                let mut json = Vec::new();
                decoder
                    .read_to_end(&mut json)
                    .map_err(|e| LoadError::Json(format!("gzip decode failed: {e}")))?;
                parse_json(&json)
            }
            MatrixFormat::Bincode => {
                let bin: BinaryMatrix =
                    bincode::deserialize(bytes).map_err(|e| LoadError::Bincode(e.to_string()))?;
                Ok(SimilarityMatrix::from_dense(bin.into())?)
            }
        }
    }
}

fn parse_json(bytes: &[u8]) -> Result<SimilarityMatrix> {
    let split_err = match serde_json::from_slice::<DenseMatrix>(bytes) {
        Ok(dense) => {
            debug!("matrix uses split layout");
            return Ok(SimilarityMatrix::from_dense(dense)?);
        }
        Err(e) => e,
    };

    match serde_json::from_slice::<NestedMatrix>(bytes) {
        Ok(nested) => {
            debug!("matrix uses nested layout");
            let rows = nested.into_iter().map(|(row_id, cells)| {
                let cells = cells
                    .into_iter()
                    .filter_map(|(col_id, score)| score.map(|s| (col_id, s)));
                (row_id, cells)
            });
            Ok(SimilarityMatrix::from_rows(rows)?)
        }
        Err(nested_err) => Err(LoadError::Json(format!(
            "not a split matrix ({split_err}) nor a nested matrix ({nested_err})"
        ))),
    }
}

/// Write `matrix` to `path` in `format`. Writes to a temporary sibling first
/// and renames it into place.
pub fn save_matrix<P: AsRef<Path>>(matrix: &SimilarityMatrix, path: P, format: MatrixFormat) -> Result<String> {
    let path = path.as_ref();
    let bytes = encode_matrix(matrix, format)?;

    let temp_file = temp_path(path);
    fs::write(&temp_file, &bytes).map_err(|e| LoadError::io(&temp_file, e))?;
    fs::rename(&temp_file, path).map_err(|e| LoadError::io(path, e))?;

    Ok(checksum(&bytes))
}

/// `sim.json` -> `sim.json.tmp`, so each target gets its own temporary file
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn encode_matrix(matrix: &SimilarityMatrix, format: MatrixFormat) -> Result<Vec<u8>> {
    let dense = matrix.to_dense();
    match format {
        MatrixFormat::Json => serde_json::to_vec(&dense).map_err(|e| LoadError::Json(e.to_string())),
        MatrixFormat::GzipJson => {
            let json = serde_json::to_vec(&dense).map_err(|e| LoadError::Json(e.to_string()))?;
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&json)
                .and_then(|_| encoder.finish())
                .map_err(|e| LoadError::Json(format!("gzip encode failed: {e}")))
        }
        MatrixFormat::Bincode => {
            bincode::serialize(&BinaryMatrix::from(dense)).map_err(|e| LoadError::Bincode(e.to_string()))
        }
    }
}
