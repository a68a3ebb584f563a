use nalgebra::{DMatrix, DVector};

/// 2-D linear convolution returning the central part with the same shape as `input`.
///
/// Samples outside `input` are treated as zero. `kernel` must have odd dimensions so that its
/// center sample is aligned with the output sample.
#[must_use]
pub fn convolve_same(input: &DMatrix<f64>, kernel: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = input.shape();
    let (kr, kc) = kernel.shape();
    let (hr, hc) = (kr / 2, kc / 2);
    DMatrix::from_fn(rows, cols, |i, j| {
        let mut acc = 0.0;
        (0..kr).for_each(|a| {
            let Some(ii) = (i + hr).checked_sub(a).filter(|&ii| ii < rows) else {
                return;
            };
            (0..kc).for_each(|b| {
                if let Some(jj) = (j + hc).checked_sub(b).filter(|&jj| jj < cols) {
                    acc += input[(ii, jj)] * kernel[(a, b)];
                }
            });
        });
        acc
    })
}

fn convolve_1d(input: &[f64], kernel: &[f64], out: &mut [f64]) {
    let n = input.len();
    let h = kernel.len() / 2;
    out.iter_mut().enumerate().for_each(|(i, o)| {
        *o = kernel
            .iter()
            .enumerate()
            .filter_map(|(t, k)| {
                (i + h)
                    .checked_sub(t)
                    .filter(|&ii| ii < n)
                    .map(|ii| input[ii] * k)
            })
            .sum();
    });
}

/// Same-shape convolution with the rank-one kernel `axial * lateral^T`.
///
/// Equivalent to [`convolve_same`] with the outer-product kernel, at the cost of two 1-D passes.
#[must_use]
pub fn convolve_separable_same(
    input: &DMatrix<f64>,
    axial: &DVector<f64>,
    lateral: &DVector<f64>,
) -> DMatrix<f64> {
    let (rows, cols) = input.shape();

    let mut tmp = DMatrix::zeros(rows, cols);
    let mut row_in = vec![0.0; cols];
    let mut row_out = vec![0.0; cols];
    (0..rows).for_each(|i| {
        row_in
            .iter_mut()
            .zip(input.row(i).iter())
            .for_each(|(d, s)| *d = *s);
        convolve_1d(&row_in, lateral.as_slice(), &mut row_out);
        tmp.row_mut(i)
            .iter_mut()
            .zip(row_out.iter())
            .for_each(|(d, s)| *d = *s);
    });

    let mut out = DMatrix::zeros(rows, cols);
    (0..cols).for_each(|j| {
        convolve_1d(
            tmp.column(j).as_slice(),
            axial.as_slice(),
            out.column_mut(j).as_mut_slice(),
        );
    });
    out
}
