//! Dense numeric matrices and the projection of keyed relations into them.
//!
//! A [`Matrix`] is a row-major block of `f64` cells with at least one row
//! and one column. Row and column counts always equal the sizes of the
//! [`VectorNetwork`]s it was projected through, so metric functions can
//! walk it without bounds checks of their own.

use serde::Serialize;
use tracing::warn;

use orgnet_types::{EntityId, NetworkKind};

use crate::error::{NetworkError, Result};
use crate::vector::VectorNetwork;

/// A dense row-major matrix of `f64` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    cells: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    ///
    /// Returns `None` for a degenerate shape (no rows or no columns) or if
    /// the cell count overflows.
    pub fn zeros(rows: usize, columns: usize) -> Option<Self> {
        if rows == 0 || columns == 0 {
            return None;
        }
        let len = rows.checked_mul(columns)?;
        Some(Self {
            rows,
            columns,
            cells: vec![0.0; len],
        })
    }

    /// Return the number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns.
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Return the cell at `(row, column)`, if in range.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.offset(row, column)
            .and_then(|offset| self.cells.get(offset).copied())
    }

    /// Overwrite the cell at `(row, column)`.
    ///
    /// Returns `false` if the position is out of range.
    pub fn set(&mut self, row: usize, column: usize, value: f64) -> bool {
        match self
            .offset(row, column)
            .and_then(|offset| self.cells.get_mut(offset))
        {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Return one row as a slice, if in range.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.cells.chunks_exact(self.columns).nth(row)
    }

    /// Iterate over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.columns)
    }

    /// Return one column as a vector, if in range.
    pub fn column(&self, column: usize) -> Option<Vec<f64>> {
        if column >= self.columns {
            return None;
        }
        Some(
            self.iter_rows()
                .filter_map(|row| row.get(column).copied())
                .collect(),
        )
    }

    /// Return `true` if the matrix has as many rows as columns.
    pub const fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        row.checked_mul(self.columns)?.checked_add(column)
    }
}

/// Project `(row id, column id, value)` cells through a pair of indices.
///
/// Returns `Ok(None)` when either index is empty or there are no cells. Any
/// id missing from a non-empty index is an [`NetworkError::Inconsistent`]
/// fault. An empty index short-circuits before any lookup, so cells pointing
/// at unregistered ids go unreported there; callers that need the check must
/// keep the index non-empty. When several cells land on the same position
/// the last one wins.
pub(crate) fn project(
    network: NetworkKind,
    rows: &VectorNetwork,
    columns: &VectorNetwork,
    cells: impl IntoIterator<Item = (EntityId, EntityId, f64)>,
) -> Result<Option<Matrix>> {
    let mut cells = cells.into_iter().peekable();
    if cells.peek().is_none() {
        return Ok(None);
    }
    let Some(mut matrix) = Matrix::zeros(rows.len(), columns.len()) else {
        return Ok(None);
    };

    for (row_id, column_id, value) in cells {
        let row = lookup(network, rows, row_id)?;
        let column = lookup(network, columns, column_id)?;
        matrix.set(row, column, value);
    }
    Ok(Some(matrix))
}

fn lookup(network: NetworkKind, vector: &VectorNetwork, id: EntityId) -> Result<usize> {
    vector.index_of(id).ok_or_else(|| {
        warn!(%network, %id, "Matrix projection met an id missing from its index");
        NetworkError::Inconsistent { network, id }
    })
}
