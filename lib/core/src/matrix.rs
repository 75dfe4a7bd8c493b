//! Similarity Matrix
//!
//! Row-indexed table of precomputed pairwise scores. Rows are stored sparsely
//! in persisted column order; missing cells (null or NaN) are dropped at
//! construction and are never candidates.

use crate::{Error, ProductId, Result};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Dense row/column layout, the shape an offline job writes
/// (`{"index": [...], "columns": [...], "data": [[...], ...]}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenseMatrix {
    pub index: Vec<ProductId>,
    pub columns: Vec<ProductId>,
    pub data: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    column: u32,
    score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    row_ids: Vec<ProductId>,
    row_index: AHashMap<ProductId, usize>,
    columns: Vec<ProductId>,
    rows: Vec<Vec<Cell>>,
}

impl SimilarityMatrix {
    /// Build from a dense layout. Fails on ragged rows, a row count that does
    /// not match the index, or repeated row or column ids.
    pub fn from_dense(dense: DenseMatrix) -> Result<Self> {
        let DenseMatrix { index, columns, data } = dense;

        if data.len() != index.len() {
            return Err(Error::InvalidMatrix(format!(
                "index has {} entries but data has {} rows",
                index.len(),
                data.len()
            )));
        }
        if columns.len() > u32::MAX as usize {
            return Err(Error::InvalidMatrix(format!("too many columns: {}", columns.len())));
        }
        Self::build_id_index(&columns, "column")?;

        let mut rows = Vec::with_capacity(data.len());
        for (row_id, values) in index.iter().zip(data) {
            if values.len() != columns.len() {
                return Err(Error::InvalidMatrix(format!(
                    "row '{}' has {} cells, expected {}",
                    row_id,
                    values.len(),
                    columns.len()
                )));
            }
            let cells = values
                .into_iter()
                .enumerate()
                .filter_map(|(column, score)| match score {
                    Some(score) if !score.is_nan() => Some(Cell { column: column as u32, score }),
                    _ => None,
                })
                .collect();
            rows.push(cells);
        }

        let row_index = Self::build_id_index(&index, "row")?;
        Ok(Self { row_ids: index, row_index, columns, rows })
    }

    /// Build from per-row `(column id, score)` lists, keeping the given order.
    /// Column ids are interned by first appearance; a column listed twice in
    /// one row is rejected.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ProductId, R)>,
        R: IntoIterator<Item = (ProductId, f64)>,
    {
        let mut row_ids = Vec::new();
        let mut columns = Vec::new();
        let mut column_index: AHashMap<ProductId, u32> = AHashMap::new();
        let mut stored = Vec::new();

        for (row_id, entries) in rows {
            let mut cells: Vec<Cell> = Vec::new();
            let mut seen = AHashSet::new();
            for (column_id, score) in entries {
                if score.is_nan() {
                    continue;
                }
                let column = match column_index.get(&column_id) {
                    Some(&c) => c,
                    None => {
                        let c = u32::try_from(columns.len()).map_err(|_| {
                            Error::InvalidMatrix("too many distinct column ids".to_string())
                        })?;
                        column_index.insert(column_id.clone(), c);
                        columns.push(column_id);
                        c
                    }
                };
                if !seen.insert(column) {
                    return Err(Error::InvalidMatrix(format!(
                        "row '{}' lists column '{}' more than once",
                        row_id, columns[column as usize]
                    )));
                }
                cells.push(Cell { column, score });
            }
            row_ids.push(row_id);
            stored.push(cells);
        }

        let row_index = Self::build_id_index(&row_ids, "row")?;
        Ok(Self { row_ids, row_index, columns, rows: stored })
    }

    fn build_id_index(ids: &[ProductId], axis: &str) -> Result<AHashMap<ProductId, usize>> {
        let mut index = AHashMap::with_capacity(ids.len());
        for (pos, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), pos).is_some() {
                return Err(Error::InvalidMatrix(format!("duplicate {} id '{}'", axis, id)));
            }
        }
        Ok(index)
    }

    /// Number of rows (products with a known similarity row)
    #[inline]
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn row_ids(&self) -> &[ProductId] {
        &self.row_ids
    }

    pub fn columns(&self) -> &[ProductId] {
        &self.columns
    }

    #[inline]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.row_index.contains_key(id)
    }

    /// Known cells of `id`'s row in persisted column order
    pub fn row(&self, id: &ProductId) -> Option<impl Iterator<Item = (&ProductId, f64)> + '_> {
        let pos = *self.row_index.get(id)?;
        Some(
            self.rows[pos]
                .iter()
                .map(move |cell| (&self.columns[cell.column as usize], cell.score)),
        )
    }

    /// Score of cell (`row`, `column`), if known
    pub fn score(&self, row: &ProductId, column: &ProductId) -> Option<f64> {
        self.row(row)?.find(|(id, _)| *id == column).map(|(_, score)| score)
    }

    /// Known cell count across all rows
    pub fn stored_cells(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Back to a dense layout; unknown cells become `None`
    pub fn to_dense(&self) -> DenseMatrix {
        let data = self
            .rows
            .iter()
            .map(|cells| {
                let mut values = vec![None; self.columns.len()];
                for cell in cells {
                    values[cell.column as usize] = Some(cell.score);
                }
                values
            })
            .collect();

        DenseMatrix {
            index: self.row_ids.clone(),
            columns: self.columns.clone(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ProductId> {
        raw.iter().map(|s| ProductId::from(*s)).collect()
    }

    #[test]
    fn test_from_dense_drops_missing_cells() {
        let matrix = SimilarityMatrix::from_dense(DenseMatrix {
            index: ids(&["a", "b"]),
            columns: ids(&["a", "b", "c"]),
            data: vec![
                vec![Some(1.0), None, Some(0.4)],
                vec![Some(0.2), Some(1.0), Some(f64::NAN)],
            ],
        })
        .unwrap();

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.num_columns(), 3);
        assert_eq!(matrix.stored_cells(), 4);

        let row: Vec<(String, f64)> = matrix
            .row(&"a".into())
            .unwrap()
            .map(|(id, s)| (id.to_string(), s))
            .collect();
        assert_eq!(row, vec![("a".to_string(), 1.0), ("c".to_string(), 0.4)]);
        assert_eq!(matrix.score(&"b".into(), &"c".into()), None);
        assert_eq!(matrix.score(&"b".into(), &"a".into()), Some(0.2));
    }

    #[test]
    fn test_column_only_id_has_no_row() {
        let matrix = SimilarityMatrix::from_dense(DenseMatrix {
            index: ids(&["a"]),
            columns: ids(&["a", "z"]),
            data: vec![vec![Some(1.0), Some(0.5)]],
        })
        .unwrap();

        assert!(matrix.contains(&"a".into()));
        assert!(!matrix.contains(&"z".into()));
        assert!(matrix.row(&"z".into()).is_none());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = SimilarityMatrix::from_dense(DenseMatrix {
            index: ids(&["a", "b"]),
            columns: ids(&["a", "b"]),
            data: vec![vec![Some(1.0), Some(0.5)], vec![Some(0.5)]],
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let err = SimilarityMatrix::from_dense(DenseMatrix {
            index: ids(&["a", "b"]),
            columns: ids(&["a", "b"]),
            data: vec![vec![Some(1.0), Some(0.5)]],
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let err = SimilarityMatrix::from_rows(vec![
            (ProductId::from("a"), vec![(ProductId::from("a"), 1.0)]),
            (ProductId::from("a"), vec![(ProductId::from("b"), 0.3)]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    #[test]
    fn test_from_rows_preserves_order_and_dense_roundtrip() {
        let matrix = SimilarityMatrix::from_rows(vec![
            (
                ProductId::from("a"),
                vec![(ProductId::from("c"), 0.3), (ProductId::from("a"), 1.0)],
            ),
            (ProductId::from("b"), vec![(ProductId::from("b"), 1.0)]),
        ])
        .unwrap();

        assert_eq!(matrix.columns(), ids(&["c", "a", "b"]).as_slice());
        let dense = matrix.to_dense();
        assert_eq!(dense.data[0], vec![Some(0.3), Some(1.0), None]);
        assert_eq!(dense.data[1], vec![None, None, Some(1.0)]);

        let rebuilt = SimilarityMatrix::from_dense(dense).unwrap();
        assert_eq!(rebuilt.score(&"a".into(), &"c".into()), Some(0.3));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = SimilarityMatrix::from_dense(DenseMatrix {
            index: ids(&["a"]),
            columns: ids(&["a", "b", "b", "c"]),
            data: vec![vec![Some(1.0), Some(0.9), Some(0.8), Some(0.5)]],
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid similarity matrix: duplicate column id 'b'");

        let err = SimilarityMatrix::from_rows(vec![(
            ProductId::from("a"),
            vec![(ProductId::from("b"), 0.9), (ProductId::from("b"), 0.8)],
        )])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }
}
