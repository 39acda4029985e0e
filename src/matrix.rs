//! Matrix values and the providers that generate them.
//!
//! The coordinator treats a [`Matrix`] as an opaque owned value: it only asks
//! for its dimensions (to decide whether two matrices can be multiplied) and
//! its element sum. Generation lives behind the [`MatrixProvider`] trait so a
//! run can be driven by random matrices or by a fixed script.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use thiserror::Error;

/// Smallest row/column count produced in random mode.
pub const MIN_DIMENSION: usize = 1;
/// Largest row/column count produced in random mode.
pub const MAX_DIMENSION: usize = 4;
/// Smallest generated element value.
pub const MIN_ELEMENT: i64 = 1;
/// Largest generated element value.
pub const MAX_ELEMENT: i64 = 10;

/// Error returned when two matrices cannot be multiplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix dimension mismatch: A is {a_rows}x{a_cols}, B is {b_rows}x{b_cols}")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },

    #[error("matrix data has {len} elements, expected {rows}x{cols}")]
    Shape { rows: usize, cols: usize, len: usize },
}

/// A dense, row-major integer matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Builds a matrix from row-major data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pcmatrix::matrix::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!((m.rows(), m.columns()), (2, 3));
    /// assert_eq!(m.element_sum(), 21);
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<i64>) -> Result<Self, MatrixError> {
        if rows * cols != data.len() {
            return Err(MatrixError::Shape {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from a list of rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let m = rows.len();
        let n = rows.first().map_or(0, |row| row.len());
        let data: Vec<i64> = rows.into_iter().flatten().collect();
        Self::from_vec(m, n, data)
    }

    /// Builds a `rows x cols` matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: i64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Generates a `rows x cols` matrix with elements drawn uniformly from
    /// `MIN_ELEMENT..=MAX_ELEMENT`.
    pub fn random<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Self {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(MIN_ELEMENT..=MAX_ELEMENT))
            .collect();
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.cols
    }

    /// Returns the element at `(row, col)`, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Returns `true` if `self × other` is defined, i.e. the column count of
    /// `self` equals the row count of `other`.
    #[inline]
    pub fn can_multiply(&self, other: &Matrix) -> bool {
        self.cols == other.rows
    }

    /// Computes `self × other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pcmatrix::matrix::Matrix;
    ///
    /// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
    /// let c = a.multiply(&b).unwrap();
    /// assert_eq!(c, Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap());
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if !self.can_multiply(other) {
            return Err(MatrixError::DimensionMismatch {
                a_rows: self.rows,
                a_cols: self.cols,
                b_rows: other.rows,
                b_cols: other.cols,
            });
        }

        let (m, n, p) = (self.rows, self.cols, other.cols);
        let mut data = vec![0; m * p];
        for i in 0..m {
            for k in 0..n {
                let a = self.data[i * n + k];
                let b_row = &other.data[k * p..(k + 1) * p];
                let c_row = &mut data[i * p..(i + 1) * p];
                for (c, b) in c_row.iter_mut().zip(b_row) {
                    *c += a * b;
                }
            }
        }

        Ok(Matrix {
            rows: m,
            cols: p,
            data,
        })
    }

    /// Returns the sum of all elements.
    pub fn element_sum(&self) -> i64 {
        self.data.iter().sum()
    }
}

impl Display for Matrix {
    /// Prints one row per line, each element right-aligned in a width of 5.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.max(1)) {
            write!(f, "|")?;
            for value in row {
                write!(f, "{:>5}", value)?;
            }
            writeln!(f, " |")?;
        }
        Ok(())
    }
}

/// How a [`RandomProvider`] chooses matrix dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Rows and columns independently uniform in `MIN_DIMENSION..=MAX_DIMENSION`.
    #[default]
    Random,
    /// Every matrix is `n x n`.
    Square(usize),
}

impl GenerationMode {
    /// Maps the numeric command-line mode: `0` is random, `n` is `n x n`.
    pub fn from_code(code: usize) -> Self {
        match code {
            0 => GenerationMode::Random,
            n => GenerationMode::Square(n),
        }
    }

    /// Inverse of [`GenerationMode::from_code`].
    pub fn code(&self) -> usize {
        match self {
            GenerationMode::Random => 0,
            GenerationMode::Square(n) => *n,
        }
    }
}

impl Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Random => write!(f, "random"),
            GenerationMode::Square(n) => write!(f, "{n}x{n}"),
        }
    }
}

/// Source of matrices for producer threads.
///
/// `generate` is called outside the coordinator's lock and may run
/// concurrently from several producers.
pub trait MatrixProvider: Send + Sync {
    fn generate(&self) -> Matrix;
}

/// Generates random matrices according to a [`GenerationMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomProvider {
    mode: GenerationMode,
}

impl RandomProvider {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }
}

impl MatrixProvider for RandomProvider {
    fn generate(&self) -> Matrix {
        let mut rng = rand::thread_rng();
        let (rows, cols) = match self.mode {
            GenerationMode::Random => (
                rng.gen_range(MIN_DIMENSION..=MAX_DIMENSION),
                rng.gen_range(MIN_DIMENSION..=MAX_DIMENSION),
            ),
            GenerationMode::Square(n) => (n, n),
        };
        Matrix::random(&mut rng, rows, cols)
    }
}

/// Hands out a fixed sequence of matrices, then falls back to a default.
///
/// Useful to script a run: with one producer, matrices enter the buffer in
/// exactly the scripted order.
#[derive(Debug)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Matrix>>,
    fallback: Matrix,
}

impl ScriptedProvider {
    /// Creates a provider yielding `script` in order, then `1x1` zero matrices.
    pub fn new(script: impl IntoIterator<Item = Matrix>) -> Self {
        Self {
            queue: Mutex::new(script.into_iter().collect()),
            fallback: Matrix::filled(1, 1, 0),
        }
    }

    /// Number of scripted matrices not yet handed out.
    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl MatrixProvider for ScriptedProvider {
    fn generate(&self) -> Matrix {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
