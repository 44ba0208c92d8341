use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

/// Normalize a free-text token for comparison
///
/// Trims, collapses internal whitespace and lowercases, so
/// `"  Machine   Learning "` and `"machine learning"` compare equal.
#[inline]
pub fn normalize_token(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Normalized, de-duplicated set of tokens; blank entries are dropped
pub fn token_set<S: AsRef<str>>(tokens: &[S]) -> BTreeSet<String> {
    tokens
        .iter()
        .map(|t| normalize_token(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Cosine similarity of two vectors, clamped to [0, 1]
///
/// Returns 0.0 for zero-length, mismatched or all-zero vectors.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Soft similarity between two normalized skill tokens
///
/// Implementations must return a value in [0, 1], 1.0 for identical tokens
/// and 0.0 for skills with no known relation.
pub trait SkillSimilarity: Send + Sync + Debug {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Skill taxonomy backed by one embedding vector per skill
#[derive(Debug, Clone, Default)]
pub struct SkillEmbeddings {
    vectors: HashMap<String, Vec<f64>>,
}

impl SkillEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the vector for a skill; the name is normalized
    pub fn insert(&mut self, skill: &str, vector: Vec<f64>) {
        self.vectors.insert(normalize_token(skill), vector);
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl FromIterator<(String, Vec<f64>)> for SkillEmbeddings {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        let mut embeddings = Self::new();
        for (skill, vector) in iter {
            embeddings.insert(&skill, vector);
        }
        embeddings
    }
}

impl SkillSimilarity for SkillEmbeddings {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => cosine_similarity(va, vb),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  Machine   Learning "), "machine learning");
        assert_eq!(normalize_token("PYTHON"), "python");
        assert_eq!(normalize_token("   "), "");
    }

    #[test]
    fn test_token_set_dedups_and_drops_blanks() {
        let set = token_set(&["Python", "python ", "", "  SQL"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("python"));
        assert!(set.contains("sql"));
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        // Opposite vectors clamp to zero instead of going negative
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_embeddings_similarity() {
        let embeddings: SkillEmbeddings = vec![
            ("TensorFlow".to_string(), vec![0.9, 0.1, 0.0]),
            ("pytorch".to_string(), vec![0.8, 0.2, 0.0]),
            ("accounting".to_string(), vec![0.0, 0.0, 1.0]),
        ]
        .into_iter()
        .collect();

        assert_eq!(embeddings.len(), 3);
        assert!(embeddings.similarity("tensorflow", "pytorch") > 0.9);
        assert_eq!(embeddings.similarity("tensorflow", "accounting"), 0.0);
        assert_eq!(embeddings.similarity("rust", "rust"), 1.0);
        assert_eq!(embeddings.similarity("rust", "go"), 0.0);
    }
}
