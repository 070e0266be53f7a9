//! Note category classifier
//!
//! TF-IDF vectorization feeding a multinomial naive Bayes model, fitted once
//! at startup over a fixed three-document corpus and read-only afterwards.
//!
//! # Vectorizer
//! - Tokens: runs of 2+ word characters (alphanumeric or `_`), lowercased
//! - IDF: `ln((1 + n) / (1 + df)) + 1` (smoothed)
//! - Document vector: term count × IDF, L2-normalised
//!
//! # Model
//! - Classes sorted lexicographically; argmax ties go to the first class
//! - Additive smoothing `alpha = 1.0`, priors from label frequencies
//!
//! Out-of-vocabulary text produces an all-zero vector. The model still
//! answers (priors decide), which is accepted behavior rather than an error.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Fixed training corpus: (text, label)
pub const TRAINING_CORPUS: [(&str, &str); 3] = [
    ("kubernetes docker orchestration", "DevOps"),
    ("neural networks deep learning", "AI/ML"),
    ("digital sovereignty privacy", "Security"),
];

/// Laplace smoothing for the naive Bayes feature estimates
const SMOOTHING_ALPHA: f64 = 1.0;

/// Classifier construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Training corpus is empty")]
    EmptyCorpus,

    #[error("Training corpus produced an empty vocabulary")]
    EmptyVocabulary,
}

/// Predicted category with its posterior probability
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    /// Max class probability (0.0-1.0)
    pub confidence: f64,
}

/// Split text into lowercase tokens of two or more word characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// TF-IDF vectorizer over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// term -> column index (columns in sorted term order)
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit(documents: &[&str]) -> Result<Self, ClassifierError> {
        if documents.is_empty() {
            return Err(ClassifierError::EmptyCorpus);
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = tokenize(doc).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Ok(Self { vocabulary, idf })
    }

    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                row[idx] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }

        row
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Multinomial naive Bayes over dense feature rows
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// [class][feature]
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn fit(rows: &[Vec<f64>], labels: &[&str], alpha: f64) -> Result<Self, ClassifierError> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(ClassifierError::EmptyCorpus);
        }
        let n_features = rows[0].len();
        if n_features == 0 {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let classes: Vec<String> = labels
            .iter()
            .map(|l| l.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0; n_features]; classes.len()];
        for (row, label) in rows.iter().zip(labels) {
            // classes was built from labels, so the lookup always succeeds
            let Ok(c) = classes.binary_search_by(|probe| probe.as_str().cmp(*label)) else {
                continue;
            };
            class_count[c] += 1;
            for (acc, value) in feature_count[c].iter_mut().zip(row) {
                *acc += value;
            }
        }

        let total = rows.len() as f64;
        let class_log_prior: Vec<f64> = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob: Vec<Vec<f64>> = feature_count
            .iter()
            .map(|counts| {
                let smoothed_total = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .iter()
                    .map(|count| ((count + alpha) / smoothed_total).ln())
                    .collect::<Vec<f64>>()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn joint_log_likelihood(&self, row: &[f64]) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(log_probs, prior)| {
                prior + log_probs.iter().zip(row).map(|(lp, x)| lp * x).sum::<f64>()
            })
            .collect()
    }

    /// Index of the most likely class; ties resolve to the lowest index
    pub fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.joint_log_likelihood(row))
    }

    /// Posterior probability per class, in [`Self::classes`] order
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let jll = self.joint_log_likelihood(row);
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        exp.into_iter().map(|v| v / sum).collect()
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

/// Fitted vectorizer + model, shared read-only across requests
#[derive(Debug, Clone)]
pub struct NoteClassifier {
    vectorizer: TfidfVectorizer,
    model: MultinomialNb,
}

impl NoteClassifier {
    /// Fit on an arbitrary (text, label) corpus
    pub fn train(corpus: &[(&str, &str)]) -> Result<Self, ClassifierError> {
        let texts: Vec<&str> = corpus.iter().map(|(text, _)| *text).collect();
        let labels: Vec<&str> = corpus.iter().map(|(_, label)| *label).collect();

        let vectorizer = TfidfVectorizer::fit(&texts)?;
        let rows: Vec<Vec<f64>> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let model = MultinomialNb::fit(&rows, &labels, SMOOTHING_ALPHA)?;

        tracing::debug!(
            documents = corpus.len(),
            vocabulary = vectorizer.vocabulary_size(),
            classes = ?model.classes(),
            "Note classifier fitted"
        );

        Ok(Self { vectorizer, model })
    }

    /// Fit on [`TRAINING_CORPUS`]
    pub fn with_default_corpus() -> Result<Self, ClassifierError> {
        Self::train(&TRAINING_CORPUS)
    }

    pub fn labels(&self) -> &[String] {
        self.model.classes()
    }

    pub fn classify(&self, text: &str) -> Classification {
        let row = self.vectorizer.transform(text);
        let idx = self.model.predict(&row);
        let confidence = self
            .model
            .predict_proba(&row)
            .get(idx)
            .copied()
            .unwrap_or_default();

        Classification {
            category: self.model.classes()[idx].clone(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> NoteClassifier {
        NoteClassifier::with_default_corpus().unwrap()
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(
            tokenize("A Kubernetes-cluster, v2 & I/O_bound x"),
            vec!["kubernetes", "cluster", "v2", "o_bound"]
        );
    }

    #[test]
    fn test_vocabulary_built_from_corpus() {
        let vectorizer =
            TfidfVectorizer::fit(&TRAINING_CORPUS.map(|(text, _)| text)).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 10);
    }

    #[test]
    fn test_transform_is_l2_normalised() {
        let vectorizer = TfidfVectorizer::fit(&["alpha beta", "beta gamma"]).unwrap();
        let row = vectorizer.transform("alpha beta beta");
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_vocabulary_is_all_zero() {
        let vectorizer = TfidfVectorizer::fit(&["alpha beta"]).unwrap();
        assert!(vectorizer.transform("zeta eta").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_labels_sorted() {
        assert_eq!(classifier().labels(), ["AI/ML", "DevOps", "Security"]);
    }

    #[test]
    fn test_classifies_each_training_domain() {
        let c = classifier();
        assert_eq!(c.classify("kubernetes docker orchestration basics").category, "DevOps");
        assert_eq!(c.classify("Deep neural networks").category, "AI/ML");
        assert_eq!(c.classify("privacy and digital sovereignty").category, "Security");
    }

    #[test]
    fn test_out_of_vocabulary_falls_back_to_first_class() {
        let result = classifier().classify("random text");
        assert_eq!(result.category, "AI/ML");
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_is_max_probability() {
        let result = classifier().classify("docker docker docker");
        assert_eq!(result.category, "DevOps");
        assert!(result.confidence > 1.0 / 3.0);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let c = classifier();
        let row = c.vectorizer.transform("neural privacy");
        let sum: f64 = c.model.predict_proba(&row).iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus_rejected() {
        assert_eq!(NoteClassifier::train(&[]).unwrap_err(), ClassifierError::EmptyCorpus);
    }

    #[test]
    fn test_corpus_without_tokens_rejected() {
        assert_eq!(
            NoteClassifier::train(&[("a b c", "X")]).unwrap_err(),
            ClassifierError::EmptyVocabulary
        );
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), 1);
    }
}
