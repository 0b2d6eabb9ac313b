//! Normalized embedding vectors for semantic similarity

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|x| *x == 0.0)
	}

	/// Cosine similarity, assuming both sides are normalized
	pub fn similarity(&self, other: &Self) -> f32 {
		self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
	}

	/// One minus cosine similarity, clamped to [0, 2]. Zero vectors are at distance 1.
	pub fn cosine_distance(&self, other: &Self) -> f32 {
		if self.is_zero() || other.is_zero() {
			return 1.0;
		}
		(1.0 - self.similarity(other)).clamp(0.0, 2.0)
	}
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}
