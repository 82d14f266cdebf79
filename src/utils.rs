use linfa::Float;
use ndarray::{Array1, Array2, ArrayView1};

/// Computes the difference matrix `X = [x - x_0, x - x_1, ..., x - x_n]^T`
/// of shape (n_samples, dim).
pub(crate) fn difference_matrix<F: Float>(
    x: &ArrayView1<F>,
    samples: &[Array1<F>],
) -> Array2<F> {
    let mut diff = Array2::zeros((samples.len(), x.len()));
    for (mut row, sample) in diff.rows_mut().into_iter().zip(samples.iter()) {
        row.assign(&(&x.to_owned() - sample));
    }
    diff
}

/// Stacks vectors as the columns of a (dim, n) matrix, the persisted layout
/// of sample and label vectors.
pub(crate) fn stack_columns<F: Float>(vectors: &[Array1<F>]) -> Array2<F> {
    let dim = vectors.first().map_or(0, |v| v.len());
    let mut stacked = Array2::zeros((dim, vectors.len()));
    for (mut column, vector) in stacked.columns_mut().into_iter().zip(vectors.iter()) {
        column.assign(vector);
    }
    stacked
}

/// Splits a (dim, n) matrix back into its n column vectors.
pub(crate) fn unstack_columns<F: Float>(matrix: &Array2<F>) -> Vec<Array1<F>> {
    matrix.columns().into_iter().map(|c| c.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_difference_matrix() {
        let x = array![1., 2.];
        let samples = vec![array![0., 0.], array![1., 1.], array![2., 3.]];
        let diff = difference_matrix(&x.view(), &samples);
        assert_eq!(diff, array![[1., 2.], [0., 1.], [-1., -1.]]);
    }

    #[test]
    fn test_stack_unstack_columns() {
        let vectors = vec![array![1., 2.], array![3., 4.], array![5., 6.]];
        let stacked = stack_columns(&vectors);
        assert_eq!(stacked, array![[1., 3., 5.], [2., 4., 6.]]);
        assert_eq!(unstack_columns(&stacked), vectors);
    }
}
