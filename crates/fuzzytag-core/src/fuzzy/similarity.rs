//! Windowed Jaro similarity
//!
//! Three-term Jaro score with greedy leftmost-unused alignment and
//! transposition counting only (no Winkler prefix bonus, no edit distance).
//! Comparison is byte-wise.

/// Reusable alignment marks for one keyword.
///
/// The keyword side is sized once at construction; the candidate side grows
/// to the longest candidate seen and is then reused. Owned by exactly one
/// node, never shared between concurrent evaluations.
#[derive(Debug, Clone)]
pub struct MarkerBuffer {
    keyword: Vec<bool>,
    candidate: Vec<bool>,
}

impl MarkerBuffer {
    /// Create a buffer for a keyword of `keyword_len` bytes
    pub fn new(keyword_len: usize) -> Self {
        Self {
            keyword: vec![false; keyword_len],
            candidate: Vec::new(),
        }
    }

    /// Keyword length this buffer was sized for
    pub fn keyword_len(&self) -> usize {
        self.keyword.len()
    }

    fn reset(&mut self, candidate_len: usize) {
        self.keyword.iter_mut().for_each(|m| *m = false);
        self.candidate.clear();
        self.candidate.resize(candidate_len, false);
    }

    #[cfg(test)]
    fn keyword_marks(&self) -> &[bool] {
        &self.keyword
    }
}

/// Jaro similarity of `candidate` against `keyword`, in [0, 1].
///
/// `marks` must have been created for `keyword.len()`; it is reset before use.
pub fn jaro_similarity(candidate: &[u8], keyword: &[u8], marks: &mut MarkerBuffer) -> f64 {
    let n = candidate.len();
    let m = keyword.len();
    if n == 0 || m == 0 {
        return 0.0;
    }
    debug_assert_eq!(marks.keyword_len(), m, "marker buffer sized for another keyword");

    marks.reset(n);

    // Window radius; negative for very short strings, clamp to 0
    let window = (n.max(m) / 2).saturating_sub(1);

    let mut matches = 0usize;
    for (i, &c) in candidate.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = m.min(i + window + 1);
        for j in lo..hi {
            if !marks.keyword[j] && keyword[j] == c {
                marks.keyword[j] = true;
                marks.candidate[i] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut mismatched = 0usize;
    let mut k = 0usize;
    for (i, &c) in candidate.iter().enumerate() {
        if !marks.candidate[i] {
            continue;
        }
        while !marks.keyword[k] {
            k += 1;
        }
        if c != keyword[k] {
            mismatched += 1;
        }
        k += 1;
    }
    let transpositions = mismatched as f64 / 2.0;

    let matches = matches as f64;
    (matches / n as f64 + matches / m as f64 + (matches - transpositions) / matches) / 3.0
}
