//! Parallel batch evaluation using Rayon
//!
//! Enable with the `parallel` feature:
//! ```toml
//! expr_algebra = { version = "0.1", features = ["parallel"] }
//! ```

use crate::error::ExprError;
use crate::evaluator::CompiledFunction;
use crate::linalg::Quantity;
use rayon::prelude::*;

impl CompiledFunction {
    /// [`eval_batch`](CompiledFunction::eval_batch) spread over the rayon
    /// thread pool. Results keep the order of `points`.
    pub fn eval_batch_parallel<P>(&self, points: &[P]) -> Result<Vec<Quantity>, ExprError>
    where
        P: AsRef<[f64]> + Sync,
    {
        points.par_iter().map(|p| self.call(p.as_ref())).collect()
    }
}
