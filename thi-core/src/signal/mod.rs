mod compress;
mod convolve;
mod half_max;

pub use compress::{db_to_linear, log_compress, LOG_EPSILON};
pub use convolve::{convolve_same, convolve_separable_same};
pub use half_max::{argmax, HalfMaxWidth};
