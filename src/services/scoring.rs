use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::AppResult;
use crate::models::{ScoredVideo, VideoCandidate};
use crate::services::embedding::{cosine_similarity, TextEmbedder};

/// Maximum number of ranked videos returned
pub const MAX_RESULTS: usize = 10;

const LEXICAL_WEIGHT: f64 = 0.5;
const SEMANTIC_WEIGHT: f64 = 0.3;
const POPULARITY_WEIGHT: f64 = 0.2;

/// Views are scaled down by a flat million to form the popularity term
const POPULARITY_SCALE: f64 = 1_000_000.0;

/// Ranks candidates against the user's interest keywords.
///
/// Blends three signals per candidate:
/// - lexical: TF-IDF cosine similarity between the joined keywords and the
///   candidate's title + description, in [0, 1]
/// - semantic: sentence-embedding cosine similarity over the same texts,
///   in [-1, 1] and blended as-is, so the total is not a true [0, 1]
///   composite (known scale inconsistency, kept rather than renormalized)
/// - popularity: view count / 1,000,000, unbounded above
///
/// `total = 0.5 * lexical + 0.3 * semantic + 0.2 * popularity`, sorted
/// descending with ties keeping candidate order, truncated to 10.
pub fn rank_candidates(
    candidates: &[VideoCandidate],
    keywords: &[String],
    embedder: &dyn TextEmbedder,
) -> AppResult<Vec<ScoredVideo>> {
    // Vectorization requires a non-empty corpus
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let documents: Vec<String> = candidates
        .iter()
        .map(|c| format!("{} {}", c.title, c.description))
        .collect();
    let query = keywords.join(" ");

    let lexical = lexical_similarities(&documents, &query);
    let semantic = semantic_similarities(&documents, &query, embedder)?;

    let mut scored: Vec<ScoredVideo> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let popularity = candidate.view_count as f64 / POPULARITY_SCALE;
            let total = LEXICAL_WEIGHT * lexical[i]
                + SEMANTIC_WEIGHT * semantic[i]
                + POPULARITY_WEIGHT * popularity;
            ScoredVideo::new(candidate, total)
        })
        .collect();

    // Vec::sort_by is stable; ties keep the original candidate order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(MAX_RESULTS);

    tracing::debug!(
        candidates = candidates.len(),
        returned = scored.len(),
        "Ranked candidates"
    );

    Ok(scored)
}

/// TF-IDF cosine similarity between the query pseudo-document and each
/// document, fit over all documents plus the query.
fn lexical_similarities(documents: &[String], query: &str) -> Vec<f64> {
    let doc_tokens: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();
    let query_tokens = tokenize(query);

    // Document frequency over the full corpus (documents + query doc)
    let corpus_size = doc_tokens.len() + 1;
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for tokens in doc_tokens.iter().chain(std::iter::once(&query_tokens)) {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for token in unique {
            *doc_freq.entry(token).or_insert(0) += 1;
        }
    }

    let idf = |term: &str| -> f64 {
        let df = doc_freq.get(term).copied().unwrap_or(0);
        ((corpus_size + 1) as f64 / (df + 1) as f64).ln() + 1.0
    };

    let query_vec = tfidf_vector(&query_tokens, &idf);

    doc_tokens
        .iter()
        .map(|tokens| {
            let doc_vec = tfidf_vector(tokens, &idf);
            sparse_cosine(&query_vec, &doc_vec)
        })
        .collect()
}

/// L2-normalized TF-IDF vector for one token list
fn tfidf_vector(tokens: &[String], idf: &dyn Fn(&str) -> f64) -> HashMap<String, f64> {
    let mut tf: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *tf.entry(token).or_insert(0) += 1;
    }

    let mut vector: HashMap<String, f64> = tf
        .into_iter()
        .map(|(term, count)| (term.to_string(), count as f64 * idf(term)))
        .collect();

    let norm: f64 = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

fn sparse_cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    // Both vectors are already L2-normalized; the dot product is the cosine
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

/// Lowercase alphanumeric runs of length >= 2
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Embedding cosine similarity between the query and each document,
/// computed in one embed call with the query first.
fn semantic_similarities(
    documents: &[String],
    query: &str,
    embedder: &dyn TextEmbedder,
) -> AppResult<Vec<f64>> {
    let mut texts = Vec::with_capacity(documents.len() + 1);
    texts.push(query.to_string());
    texts.extend(documents.iter().cloned());

    let embeddings = embedder.embed(&texts)?;
    let (query_embedding, doc_embeddings) = embeddings.split_first().ok_or_else(|| {
        crate::error::AppError::Embedding("Embedder returned no vectors".to_string())
    })?;

    Ok(doc_embeddings
        .iter()
        .map(|doc| cosine_similarity(query_embedding, doc))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding::MockTextEmbedder;

    fn candidate(id: &str, title: &str, description: &str, views: u64) -> VideoCandidate {
        VideoCandidate {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            thumbnail: String::new(),
            view_count: views,
            duration_seconds: 60.0,
        }
    }

    fn flat_embedder() -> MockTextEmbedder {
        let mut embedder = MockTextEmbedder::new();
        embedder
            .expect_embed()
            .returning(|texts| Ok(vec![vec![1.0, 0.0]; texts.len()]));
        embedder
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_candidates_short_circuit() {
        let mut embedder = MockTextEmbedder::new();
        embedder.expect_embed().times(0);

        let result = rank_candidates(&[], &keywords(&["cooking"]), &embedder).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_keywords_do_not_error() {
        let candidates = vec![candidate("a", "cooking pasta", "easy recipe", 1000)];
        let result = rank_candidates(&candidates, &[], &flat_embedder()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].video_id, "a");
    }

    #[test]
    fn test_single_candidate_does_not_crash_lexical_step() {
        let candidates = vec![candidate("a", "cooking pasta", "easy recipe", 0)];
        let result =
            rank_candidates(&candidates, &keywords(&["cooking"]), &flat_embedder()).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_lexical_and_popularity_overlap_ranks_first() {
        // The worked example: keyword/text overlap plus higher views
        let candidates = vec![
            candidate("b", "guitar tutorial", "beginner chords", 500_000),
            candidate("a", "cooking pasta", "easy recipe", 1_000_000),
        ];

        let result = rank_candidates(&candidates, &keywords(&["cooking", "recipe"]), &flat_embedder())
            .unwrap();

        assert_eq!(result[0].video_id, "a");
        assert_eq!(result[1].video_id, "b");
        assert!(result[0].score > result[1].score);
    }

    #[test]
    fn test_sorted_non_increasing_and_truncated() {
        let candidates: Vec<VideoCandidate> = (0..15)
            .map(|i| {
                candidate(
                    &format!("v{}", i),
                    "cooking video",
                    "recipe",
                    (i as u64) * 100_000,
                )
            })
            .collect();

        let result =
            rank_candidates(&candidates, &keywords(&["cooking"]), &flat_embedder()).unwrap();

        assert_eq!(result.len(), MAX_RESULTS);
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Highest view count wins when text is identical
        assert_eq!(result[0].video_id, "v14");
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let candidates = vec![
            candidate("first", "same title", "same text", 1000),
            candidate("second", "same title", "same text", 1000),
            candidate("third", "same title", "same text", 1000),
        ];

        let result =
            rank_candidates(&candidates, &keywords(&["same"]), &flat_embedder()).unwrap();

        let ids: Vec<&str> = result.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_semantic_signal_breaks_text_tie() {
        // Give the second document an embedding aligned with the query
        let mut embedder = MockTextEmbedder::new();
        embedder.expect_embed().returning(|texts| {
            let mut out = vec![vec![1.0, 0.0]; texts.len()];
            out[1] = vec![0.0, 1.0]; // first document, orthogonal to query
            Ok(out)
        });

        let candidates = vec![
            candidate("far", "gardening", "soil and seeds", 0),
            candidate("near", "gardening", "soil and seeds", 0),
        ];

        let result = rank_candidates(&candidates, &keywords(&["cooking"]), &embedder).unwrap();
        assert_eq!(result[0].video_id, "near");
    }

    #[test]
    fn test_popularity_is_unbounded() {
        let candidates = vec![
            candidate("modest", "cooking pasta recipe", "cooking pasta recipe", 0),
            candidate("viral", "unrelated clip", "nothing in common", 50_000_000),
        ];

        let result =
            rank_candidates(&candidates, &keywords(&["cooking", "pasta"]), &flat_embedder())
                .unwrap();

        // 50M views => popularity term 10.0, dominating any lexical gap
        assert_eq!(result[0].video_id, "viral");
        assert!(result[0].score > 2.0);
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(
            tokenize("A Cooking-Pasta recipe! x"),
            vec!["cooking", "pasta", "recipe"]
        );
    }
}
