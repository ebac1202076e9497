//! Network metrics computed from projected matrices.
//!
//! Pure functions over a [`Matrix`]. A matrix coming out of
//! [`MetaNetwork::to_matrix`](crate::MetaNetwork::to_matrix) always has at
//! least one row and one column and every row has the same width, so none of
//! these functions needs to guard against ragged input.
//!
//! Degree centralities are normalized to `[0, 1]` by the largest cell value
//! times the number of possible ties, which makes them comparable between
//! binary networks (roles) and weighted ones (interactions).

use crate::matrix::Matrix;

/// Share of cells holding a positive value.
///
/// Treats the matrix as two-mode: every cell is a possible tie.
pub fn density(matrix: &Matrix) -> f64 {
    let cells = matrix.iter_rows().flatten();
    let (ties, possible) = cells.fold((0_usize, 0_usize), |(ties, possible), value| {
        (
            if *value > 0.0 { ties.saturating_add(1) } else { ties },
            possible.saturating_add(1),
        )
    });
    ratio(ties, possible)
}

/// Share of off-diagonal cells holding a positive value.
///
/// Treats the matrix as one-mode (an agent x agent network, say), so
/// self-ties are ignored. Returns `None` if the matrix is not square.
pub fn one_mode_density(matrix: &Matrix) -> Option<f64> {
    if !matrix.is_square() {
        return None;
    }
    let mut ties = 0_usize;
    for (row, values) in matrix.iter_rows().enumerate() {
        ties = values
            .iter()
            .enumerate()
            .filter(|(column, value)| *column != row && **value > 0.0)
            .fold(ties, |total, _| total.saturating_add(1));
    }
    let rows = matrix.rows();
    Some(ratio(ties, rows.saturating_mul(rows.saturating_sub(1))))
}

/// Normalized degree of every row.
///
/// Each entry is the row sum divided by the number of columns times the
/// largest cell value. An all-zero matrix yields all zeros.
pub fn row_degree(matrix: &Matrix) -> Vec<f64> {
    let scale = max_value(matrix) * count(matrix.columns());
    matrix
        .iter_rows()
        .map(|row| normalize(row.iter().sum(), scale))
        .collect()
}

/// Normalized degree of every column.
///
/// Each entry is the column sum divided by the number of rows times the
/// largest cell value. An all-zero matrix yields all zeros.
pub fn column_degree(matrix: &Matrix) -> Vec<f64> {
    let scale = max_value(matrix) * count(matrix.rows());
    let mut sums = vec![0.0_f64; matrix.columns()];
    for row in matrix.iter_rows() {
        for (sum, value) in sums.iter_mut().zip(row) {
            *sum += value;
        }
    }
    sums.into_iter().map(|sum| normalize(sum, scale)).collect()
}

/// Freeman degree centralization over the rows.
///
/// Sums how far each row's degree falls short of the most central row and
/// divides by the largest possible shortfall (a star). `0.0` means every row
/// is equally central, `1.0` a perfect star. Returns `None` for a single row.
pub fn degree_centralization(matrix: &Matrix) -> Option<f64> {
    let rows = matrix.rows();
    if rows < 2 {
        return None;
    }
    let degrees = row_degree(matrix);
    let highest = degrees.iter().copied().fold(0.0_f64, f64::max);
    let shortfall: f64 = degrees.iter().map(|degree| highest - degree).sum();
    Some(normalize(shortfall, count(rows.saturating_sub(1))))
}

fn max_value(matrix: &Matrix) -> f64 {
    matrix
        .iter_rows()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
}

#[allow(clippy::cast_precision_loss)]
const fn count(n: usize) -> f64 {
    n as f64
}

const fn ratio(part: usize, whole: usize) -> f64 {
    normalize(count(part), count(whole))
}

const fn normalize(value: f64, scale: f64) -> f64 {
    if scale > 0.0 { value / scale } else { 0.0 }
}
