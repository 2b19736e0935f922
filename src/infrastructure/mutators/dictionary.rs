//! Offline mutator drifting through a word list.
//!
//! Each call swaps one word of the sentence for a dictionary word within a small
//! letter edit distance, the way a misheard word turns into a similar-sounding one.
//! Words are compared upper-cased; replacements are emitted in dictionary form.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::application::prompt::source_sentence;
use crate::infrastructure::error::{InfraError, InfraResult, MutatorError};
use crate::infrastructure::traits::Mutator;

pub struct DictionaryMutator {
    words: Vec<String>,
    max_edits_per_word: usize,
    rng: Mutex<StdRng>,
}

impl DictionaryMutator {
    /// Build from an in-memory word list. Duplicates are dropped.
    ///
    /// With a `seed` the sequence of mutations is reproducible.
    pub fn new<I, S>(words: I, max_edits_per_word: usize, seed: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            words: words.into_iter().collect(),
            max_edits_per_word: max_edits_per_word.max(1),
            rng: Mutex::new(rng),
        }
    }

    /// Load a whitespace-separated word list.
    pub fn from_file(path: &Path, max_edits_per_word: usize, seed: Option<u64>) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read dictionary {}", path.display()), e))?;
        let mutator = Self::new(content.split_whitespace(), max_edits_per_word, seed);
        if mutator.is_empty() {
            return Err(InfraError::Dictionary {
                path: path.to_path_buf(),
                message: "no words found".to_string(),
            });
        }
        debug!("from_file: loaded {} words from {}", mutator.len(), path.display());
        Ok(mutator)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Dictionary words at edit distance `1..=max_edits_per_word` from `word`.
    pub fn neighbors(&self, word: &str) -> Vec<&str> {
        let word = word.to_uppercase();
        let word_len = word.chars().count();
        self.words
            .iter()
            .filter(|candidate| {
                word_len.abs_diff(candidate.chars().count()) <= self.max_edits_per_word
            })
            .filter(|candidate| {
                let distance = levenshtein(&word, candidate);
                distance >= 1 && distance <= self.max_edits_per_word
            })
            .map(String::as_str)
            .collect()
    }

    /// Replace one word of `sentence`, or `None` when no word has a neighbour.
    fn mutate_sentence(&self, sentence: &str) -> Option<String> {
        let mut tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        let candidates: Vec<(usize, Vec<&str>)> = tokens
            .iter()
            .enumerate()
            .map(|(pos, token)| (pos, self.neighbors(token)))
            .filter(|(_, nbrs)| !nbrs.is_empty())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let (pos, nbrs) = &candidates[rng.gen_range(0..candidates.len())];
        let replacement = nbrs[rng.gen_range(0..nbrs.len())];
        trace!("mutate_sentence: {} -> {}", tokens[*pos], replacement);
        tokens[*pos] = replacement.to_string();
        Some(tokens.iter().join(" "))
    }
}

impl Mutator for DictionaryMutator {
    /// Pass-through options have no meaning offline and are ignored.
    fn invoke(&self, prompt: &str, _options: &[String]) -> Result<String, MutatorError> {
        let sentence = source_sentence(prompt).ok_or(MutatorError::EmptyOutput)?;
        self.mutate_sentence(sentence).ok_or_else(|| {
            MutatorError::CallFailed(format!("stuck: no dictionary neighbours for '{}'", sentence))
        })
    }
}

/// Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
