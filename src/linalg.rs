//! Dense LU factorization with partial pivoting.
//!
//! Backs the Newton step and the adjoint transpose solve. Matrices are
//! handed in as row slices and stored flat (row-major) inside the factors.

use crate::Float;

/// LU factors of a square matrix, with row pivoting.
///
/// `L` (unit diagonal, implicit) sits below the diagonal, `U` on and above
/// it, in one flat row-major buffer.
pub struct LuFactors<F> {
    lu: Vec<F>,
    /// `perm[i]` is the original row index of factored row `i`.
    perm: Vec<usize>,
    n: usize,
}

/// Factorize an `n × n` matrix given as rows.
///
/// Returns `None` if a pivot falls below the singularity threshold.
pub fn lu_factor<F: Float>(rows: &[Vec<F>]) -> Option<LuFactors<F>> {
    let n = rows.len();
    debug_assert!(rows.iter().all(|r| r.len() == n));

    let mut lu: Vec<F> = Vec::with_capacity(n * n);
    for row in rows {
        lu.extend_from_slice(row);
    }
    let mut perm: Vec<usize> = (0..n).collect();

    let eps = F::from(1e-12).unwrap_or_else(F::epsilon);

    for col in 0..n {
        // Partial pivoting: largest magnitude in the remaining column.
        let mut max_val = lu[col * n + col].abs();
        let mut max_row = col;
        for row in (col + 1)..n {
            let v = lu[row * n + col].abs();
            if v > max_val {
                max_val = v;
                max_row = row;
            }
        }

        if max_val < eps {
            return None;
        }

        if max_row != col {
            for j in 0..n {
                lu.swap(col * n + j, max_row * n + j);
            }
            perm.swap(col, max_row);
        }

        let pivot = lu[col * n + col];
        for row in (col + 1)..n {
            let factor = lu[row * n + col] / pivot;
            lu[row * n + col] = factor;
            for j in (col + 1)..n {
                let u = lu[col * n + j];
                lu[row * n + j] = lu[row * n + j] - factor * u;
            }
        }
    }

    Some(LuFactors { lu, perm, n })
}

impl<F: Float> LuFactors<F> {
    /// Solve `A · x = b`.
    pub fn solve(&self, b: &[F]) -> Vec<F> {
        let n = self.n;
        debug_assert_eq!(b.len(), n);

        // Permute, then forward-substitute through L (unit diagonal).
        let mut y: Vec<F> = (0..n).map(|i| b[self.perm[i]]).collect();
        for i in 1..n {
            for j in 0..i {
                let l = self.lu[i * n + j];
                let yj = y[j];
                y[i] = y[i] - l * yj;
            }
        }

        // Back-substitute through U.
        let mut x = vec![F::zero(); n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum = sum - self.lu[i * n + j] * x[j];
            }
            x[i] = sum / self.lu[i * n + i];
        }
        x
    }

    /// Solve `Aᵀ · x = b` from the same factorization.
    ///
    /// With `P·A = L·U` this is `Uᵀ·w = b`, then `Lᵀ·v = w`, then `x = Pᵀ·v`.
    pub fn solve_transpose(&self, b: &[F]) -> Vec<F> {
        let n = self.n;
        debug_assert_eq!(b.len(), n);

        // Uᵀ is lower triangular with U's diagonal.
        let mut w = vec![F::zero(); n];
        for i in 0..n {
            let mut sum = b[i];
            for j in 0..i {
                sum = sum - self.lu[j * n + i] * w[j];
            }
            w[i] = sum / self.lu[i * n + i];
        }

        // Lᵀ is upper triangular with unit diagonal.
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let l = self.lu[j * n + i];
                let wj = w[j];
                w[i] = w[i] - l * wj;
            }
        }

        // Undo the row permutation.
        let mut x = vec![F::zero(); n];
        for i in 0..n {
            x[self.perm[i]] = w[i];
        }
        x
    }
}

/// One-shot solve of `A · x = b`. Returns `None` if `A` is singular.
pub fn lu_solve<F: Float>(rows: &[Vec<F>], b: &[F]) -> Option<Vec<F>> {
    let factors = lu_factor(rows)?;
    Some(factors.solve(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_identity() {
        let a: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let x = lu_solve(&a, &[3.0, 7.0]).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn solve_2x2() {
        // [2 1] x = [5]  =>  x = [1.6, 1.8]
        // [1 3]       [7]
        let a: Vec<Vec<f64>> = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = lu_solve(&a, &[5.0, 7.0]).unwrap();
        assert!((x[0] - 1.6).abs() < 1e-12);
        assert!((x[1] - 1.8).abs() < 1e-12);
    }

    #[test]
    fn solve_needs_pivoting() {
        let a: Vec<Vec<f64>> = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let x = lu_solve(&a, &[3.0, 7.0]).unwrap();
        assert!((x[0] - 7.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_matrix_rejected() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(lu_factor(&a).is_none());
    }

    #[test]
    fn factor_once_solve_many() {
        let a: Vec<Vec<f64>> = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let factors = lu_factor(&a).unwrap();

        let x1 = factors.solve(&[5.0, 7.0]);
        let x2 = factors.solve(&[1.0, 0.0]);
        let r1 = lu_solve(&a, &[5.0, 7.0]).unwrap();
        let r2 = lu_solve(&a, &[1.0, 0.0]).unwrap();

        for i in 0..2 {
            assert!((x1[i] - r1[i]).abs() < 1e-12);
            assert!((x2[i] - r2[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn transpose_solve_matches_explicit_transpose() {
        let a: Vec<Vec<f64>> = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 0.0],
        ];
        let at = vec![
            vec![1.0, 4.0, 7.0],
            vec![2.0, 5.0, 8.0],
            vec![3.0, 6.0, 0.0],
        ];
        let b = [14.0, 32.0, 23.0];

        let via_factors = lu_factor(&a).unwrap().solve_transpose(&b);
        let reference = lu_solve(&at, &b).unwrap();

        for i in 0..3 {
            assert!(
                (via_factors[i] - reference[i]).abs() < 1e-10,
                "x[{}] = {}, expected {}",
                i,
                via_factors[i],
                reference[i]
            );
        }
    }

    #[test]
    fn solve_3x3_residual_check() {
        let a = vec![
            vec![4.0, -2.0, 1.0],
            vec![-2.0, 4.0, -2.0],
            vec![1.0, -2.0, 4.0],
        ];
        let b = [11.0, -16.0, 17.0];
        let x = lu_solve(&a, &b).unwrap();
        for i in 0..3 {
            let ax: f64 = (0..3).map(|j| a[i][j] * x[j]).sum();
            assert!((ax - b[i]).abs() < 1e-10, "row {} residual {}", i, ax - b[i]);
        }
    }
}
