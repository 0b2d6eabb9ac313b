//! Pairwise cosine distances between paragraph embeddings
//!
//! This is O(n² · d) in time and O(n²) in memory, and it is where large
//! topic groups spend most of their clustering time. Rows are computed in
//! parallel; only the upper triangle is evaluated and then mirrored.

use ndarray::Array2;
use rayon::prelude::*;

use crate::core::Embedding;

/// Square, symmetric, zero-diagonal distance matrix
#[derive(Debug, Clone)]
pub struct DistanceMatrix(Array2<f32>);

impl DistanceMatrix {
	pub fn cosine(embeddings: &[Embedding]) -> Self {
		let n = embeddings.len();

		let upper: Vec<Vec<f32>> = (0..n)
			.into_par_iter()
			.map(|i| {
				((i + 1)..n)
					.map(|j| embeddings[i].cosine_distance(&embeddings[j]))
					.collect()
			})
			.collect();

		let mut matrix = Array2::<f32>::zeros((n, n));
		for (i, row) in upper.into_iter().enumerate() {
			for (offset, d) in row.into_iter().enumerate() {
				let j = i + 1 + offset;
				matrix[[i, j]] = d;
				matrix[[j, i]] = d;
			}
		}

		Self(matrix)
	}

	pub fn len(&self) -> usize {
		self.0.nrows()
	}

	pub fn is_empty(&self) -> bool {
		self.0.nrows() == 0
	}

	pub fn get(&self, i: usize, j: usize) -> f32 {
		self.0[[i, j]]
	}

	/// Row-major copy, the layout the density clusterer consumes
	pub fn to_rows(&self) -> Vec<Vec<f32>> {
		self.0.rows().into_iter().map(|r| r.to_vec()).collect()
	}
}
