//! Configuration for indexing, retrieval and generation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the study pipeline.
///
/// The defaults are tuned for long-form notebooks and a large embedding model:
/// big chunks, a small overlap, and enough sampled context for a summary or
/// quiz to cover the opening of the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Maximum number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks embedded and appended per request.
    pub embed_batch_size: usize,
    /// Number of leading chunks used as summary context.
    pub summary_sample_size: usize,
    /// Number of leading chunks used as quiz context.
    pub quiz_sample_size: usize,
    /// Number of retrieved chunks used to answer a question.
    pub answer_top_k: usize,
    /// Sampling temperature for summaries.
    pub summary_temperature: f32,
    /// Sampling temperature for answers.
    pub answer_temperature: f32,
    /// Sampling temperature for quizzes.
    pub quiz_temperature: f32,
    /// Directory under which per-workspace stores are created.
    pub store_root: PathBuf,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 100,
            embed_batch_size: 50,
            summary_sample_size: 15,
            quiz_sample_size: 20,
            answer_top_k: 10,
            summary_temperature: 0.2,
            answer_temperature: 0.1,
            quiz_temperature: 0.2,
            store_root: PathBuf::from("studynote_stores"),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set how many chunks are embedded per request.
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.config.embed_batch_size = size;
        self
    }

    /// Set how many leading chunks feed the summary prompt.
    pub fn summary_sample_size(mut self, n: usize) -> Self {
        self.config.summary_sample_size = n;
        self
    }

    /// Set how many leading chunks feed the quiz prompt.
    pub fn quiz_sample_size(mut self, n: usize) -> Self {
        self.config.quiz_sample_size = n;
        self
    }

    /// Set how many chunks are retrieved to answer a question.
    pub fn answer_top_k(mut self, k: usize) -> Self {
        self.config.answer_top_k = k;
        self
    }

    /// Set the summary sampling temperature.
    pub fn summary_temperature(mut self, temperature: f32) -> Self {
        self.config.summary_temperature = temperature;
        self
    }

    /// Set the answer sampling temperature.
    pub fn answer_temperature(mut self, temperature: f32) -> Self {
        self.config.answer_temperature = temperature;
        self
    }

    /// Set the quiz sampling temperature.
    pub fn quiz_temperature(mut self, temperature: f32) -> Self {
        self.config.quiz_temperature = temperature;
        self
    }

    /// Set the directory under which workspace stores are created.
    pub fn store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.store_root = root.into();
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - any batch, sample or top-k size is zero
    /// - any temperature is outside `0.0..=2.0`
    pub fn build(self) -> Result<RagConfig> {
        let c = &self.config;
        if c.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if c.chunk_overlap >= c.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            )));
        }
        for (name, value) in [
            ("embed_batch_size", c.embed_batch_size),
            ("summary_sample_size", c.summary_sample_size),
            ("quiz_sample_size", c.quiz_sample_size),
            ("answer_top_k", c.answer_top_k),
        ] {
            if value == 0 {
                return Err(RagError::Config(format!("{name} must be greater than zero")));
            }
        }
        for (name, value) in [
            ("summary_temperature", c.summary_temperature),
            ("answer_temperature", c.answer_temperature),
            ("quiz_temperature", c.quiz_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(RagError::Config(format!("{name} ({value}) must be within 0.0..=2.0")));
            }
        }
        Ok(self.config)
    }
}
