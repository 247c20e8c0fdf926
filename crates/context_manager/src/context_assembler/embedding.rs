use rand::Rng;

pub const EMBEDDING_DIMENSION: usize = 1536;

/// Source of query vectors for similarity search.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// **Stub.** Returns uniformly random values in `[-1, 1)` and ignores the
/// text entirely, so rankings it produces carry no meaning. Swap in a real
/// embedding model through [`Embedder`].
#[derive(Debug, Clone, Copy)]
pub struct RandomEmbedder {
    dimension: usize,
}

impl RandomEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for RandomEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIMENSION)
    }
}

impl Embedder for RandomEmbedder {
    fn embed(&self, _text: &str) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..self.dimension).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }
}

/// Cosine similarity of two vectors. Zero when either magnitude is zero or
/// the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::debug!(left = a.len(), right = b.len(), "Embedding dimension mismatch");
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
