//! Seeded k-means over document feature rows

use std::collections::HashSet;

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::config::{KMEANS_MAX_ITER, KMEANS_RESTARTS, KMEANS_TOLERANCE};
use crate::error::PipelineError;
use crate::ui;

#[derive(Debug, Clone)]
pub struct KMeansFit {
	pub labels: Vec<usize>,
	pub centroids: Array2<f64>,
	/// Sum of squared distances to the assigned centroid
	pub inertia: f64,
}

/// k-means++ seeding with `KMEANS_RESTARTS` runs from one seeded generator.
/// The lowest-inertia run wins.
///
/// `k` is clamped to the number of distinct rows, so seeding always has a
/// point left to pick.
pub fn fit(data: &Array2<f64>, k: usize, seed: u64) -> Result<KMeansFit, PipelineError> {
	let n = data.nrows();
	if n == 0 {
		return Ok(KMeansFit {
			labels: Vec::new(),
			centroids: Array2::zeros((0, data.ncols())),
			inertia: 0.0,
		});
	}

	let k = k.clamp(1, distinct_rows(data));
	let dataset = DatasetBase::from(data.clone());
	let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(seed))
		.n_runs(KMEANS_RESTARTS)
		.max_n_iterations(KMEANS_MAX_ITER)
		.tolerance(KMEANS_TOLERANCE)
		.fit(&dataset)
		.map_err(|e| PipelineError::ClusteringFailure(format!("k-means fit failed: {}", e)))?;

	let predictions = model.predict(&dataset);
	let labels: Vec<usize> = predictions.as_targets().iter().copied().collect();
	ui::debug(&format!("k-means k={} inertia {:.4}", k, model.inertia()));

	Ok(KMeansFit {
		labels,
		centroids: model.centroids().clone(),
		inertia: model.inertia(),
	})
}

fn distinct_rows(data: &Array2<f64>) -> usize {
	data.rows()
		.into_iter()
		.map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
		.collect::<HashSet<_>>()
		.len()
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;

	#[test]
	fn separates_two_obvious_groups() {
		let data = array![[0.0, 0.0], [0.1, 0.0], [0.0, 0.1], [5.0, 5.0], [5.1, 5.0], [5.0, 5.1]];
		let fit = fit(&data, 2, 42).unwrap();
		assert_eq!(fit.labels[0], fit.labels[1]);
		assert_eq!(fit.labels[1], fit.labels[2]);
		assert_eq!(fit.labels[3], fit.labels[4]);
		assert_ne!(fit.labels[0], fit.labels[3]);
	}

	#[test]
	fn k_is_clamped_to_distinct_rows() {
		let data = array![[1.0, 0.0], [1.0, 0.0]];
		let fit = fit(&data, 3, 7).unwrap();
		assert_eq!(fit.labels, vec![0, 0]);
		assert_eq!(fit.centroids.nrows(), 1);
	}

	#[test]
	fn same_seed_same_labels() {
		let data = array![[0.0, 1.0], [0.2, 0.9], [1.0, 0.0], [0.9, 0.1], [0.5, 0.5]];
		assert_eq!(fit(&data, 2, 3).unwrap().labels, fit(&data, 2, 3).unwrap().labels);
	}
}
