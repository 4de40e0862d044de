use crate::libs::error::{parse_field, AnchainError};
use anyhow::Context;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;

/// Decides which (query, subject) anchor pairs may be chained at all.
pub trait Pairing {
    fn accepts(&self, query: &str, subject: &str) -> bool;
}

impl<T: Pairing + ?Sized> Pairing for &T {
    fn accepts(&self, query: &str, subject: &str) -> bool {
        (**self).accepts(query, subject)
    }
}

/// Accepts every pair, optionally except a query against itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPair {
    pub exclude_self: bool,
}

impl Pairing for AnyPair {
    fn accepts(&self, query: &str, subject: &str) -> bool {
        !(self.exclude_self && query == subject)
    }
}

/// An orthology hypothesis between two anchors, to be validated by chaining.
///
/// Genomes are stored in canonical order: `genome_a < genome_b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub run_id: u64,
    pub genome_a: String,
    pub anchor_a: String,
    pub genome_b: String,
    pub anchor_b: String,
}

impl CandidatePair {
    /// Builds a pair, swapping sides so the smaller genome name comes first.
    ///
    /// ```
    /// # use anchain::libs::pairing::CandidatePair;
    /// let pair = CandidatePair::new(3, "rat", "17", "mouse", "42");
    /// assert_eq!(pair.genome_a, "mouse");
    /// assert_eq!(pair.anchor_a, "42");
    /// assert_eq!(pair.genome_b, "rat");
    /// assert_eq!(pair.anchor_b, "17");
    /// ```
    pub fn new(run_id: u64, genome1: &str, anchor1: &str, genome2: &str, anchor2: &str) -> Self {
        let (genome_a, anchor_a, genome_b, anchor_b) = if genome1 > genome2 {
            (genome2, anchor2, genome1, anchor1)
        } else {
            (genome1, anchor1, genome2, anchor2)
        };
        Self {
            run_id,
            genome_a: genome_a.to_string(),
            anchor_a: anchor_a.to_string(),
            genome_b: genome_b.to_string(),
            anchor_b: anchor_b.to_string(),
        }
    }
}

impl FromStr for CandidatePair {
    type Err = AnchainError;

    /// `runId genomeA anchorA genomeB anchorB`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(AnchainError::malformed(
                "candidate pair",
                format!("expected 5 fields, found {}", fields.len()),
                s,
            ));
        }
        let run_id: u64 = parse_field("candidate pair", "run id", fields[0], s)?;
        Ok(CandidatePair::new(run_id, fields[1], fields[2], fields[3], fields[4]))
    }
}

/// Candidate pairs of one genome pair, keyed by the anchor of `genome_a`.
#[derive(Debug, Clone)]
pub struct PairBucket {
    pub genome_a: String,
    pub genome_b: String,
    pairs: IndexMap<String, CandidatePair>,
}

impl PairBucket {
    pub fn new(genome_a: &str, genome_b: &str) -> Self {
        Self {
            genome_a: genome_a.to_string(),
            genome_b: genome_b.to_string(),
            pairs: IndexMap::new(),
        }
    }

    /// Adds a pair; a second pair for the same anchor of `genome_a` is an error.
    pub fn insert(&mut self, pair: CandidatePair) -> Result<(), AnchainError> {
        if self.pairs.contains_key(&pair.anchor_a) {
            return Err(AnchainError::DuplicatePair {
                genome: pair.genome_a,
                anchor: pair.anchor_a,
            });
        }
        self.pairs.insert(pair.anchor_a.clone(), pair);
        Ok(())
    }

    pub fn get(&self, anchor_a: &str) -> Option<&CandidatePair> {
        self.pairs.get(anchor_a)
    }

    /// Pairs in the order they were declared
    pub fn pairs(&self) -> impl Iterator<Item = &CandidatePair> {
        self.pairs.values()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Name of the hit file holding alignments of this genome pair
    pub fn hit_file_name(&self) -> String {
        format!("{}-{}.blat", self.genome_a, self.genome_b)
    }
}

impl Pairing for PairBucket {
    fn accepts(&self, query: &str, subject: &str) -> bool {
        self.pairs
            .get(query)
            .map_or(false, |pair| pair.anchor_b == subject)
    }
}

/// All candidate pairs of a run, bucketed by genome pair.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    buckets: BTreeMap<(String, String), PairBucket>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, pair: CandidatePair) -> Result<(), AnchainError> {
        let key = (pair.genome_a.clone(), pair.genome_b.clone());
        self.buckets
            .entry(key)
            .or_insert_with(|| PairBucket::new(&pair.genome_a, &pair.genome_b))
            .insert(pair)
    }

    pub fn bucket(&self, genome_a: &str, genome_b: &str) -> Option<&PairBucket> {
        self.buckets
            .get(&(genome_a.to_string(), genome_b.to_string()))
    }

    /// Buckets in canonical genome-pair order
    pub fn buckets(&self) -> impl Iterator<Item = &PairBucket> {
        self.buckets.values()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut index = CandidateIndex::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let pair: CandidatePair = line.parse().with_context(|| format!("line {}", i + 1))?;
            index.insert(pair).with_context(|| format!("line {}", i + 1))?;
        }
        Ok(index)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(path)?;
        Self::from_reader(reader).with_context(|| format!("reading candidate pairs from {}", path))
    }
}
