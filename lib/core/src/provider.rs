use rayon::prelude::*;
use crate::{Result, Vector};

/// Maps text to a fixed-dimension embedding.
///
/// Implementations must be deterministic for identical input and always return
/// vectors of [`dimensions`](EmbeddingProvider::dimensions) components. A failed call
/// aborts the enclosing query; nothing here retries.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Embed several texts. The output is addressed by input position, so the
    /// order in which individual calls complete never matters.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.par_iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<P> {
    fn embed(&self, text: &str) -> Result<Vector> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        (**self).embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
