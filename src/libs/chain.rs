//! Greedy chaining of alignment hits between two anchors.
//!
//! Hits are taken in arrival order. A hit joins the chain of its
//! (query, subject) pair only if it overlaps none of the hits already in the
//! chain, on either anchor, and keeps the same relative order on both anchors
//! as every one of them. Scores of a chain add up, e-values multiply.

use crate::libs::hit::{format_e_value, HitRecord};
use crate::libs::interval::Span;
use crate::libs::pairing::Pairing;
use indexmap::IndexMap;
use std::fmt;

/// Aggregated e-values below this are written as zero.
pub const E_VALUE_FLOOR: f64 = 1e-50;

/// What happened to a hit offered to a [`ChainBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// The pairing does not allow this (query, subject) pair
    Unpaired,
    /// Overlaps an accepted hit on the query or on the subject
    Overlapping,
    /// Would cross an accepted hit
    OutOfOrder,
}

/// Accepted hits of one (query, subject) pair.
#[derive(Debug, Clone)]
pub struct Chain {
    q_spans: Vec<Span>,
    s_spans: Vec<Span>,
    score: i64,
    e_value: f64,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            q_spans: vec![],
            s_spans: vec![],
            score: 0,
            e_value: 1.0,
        }
    }
}

impl Chain {
    pub fn new() -> Self {
        Default::default()
    }

    /// Tests a hit against the chain without changing it.
    ///
    /// ```
    /// # use anchain::libs::chain::{Chain, Verdict};
    /// # use anchain::libs::interval::Span;
    /// let mut chain = Chain::new();
    /// chain.push(Span::new(11, 20), Span::new(11, 20), 4, 1e-7);
    ///
    /// assert_eq!(chain.check(Span::new(1, 10), Span::new(1, 10)), Verdict::Accepted);
    /// assert_eq!(chain.check(Span::new(15, 30), Span::new(25, 30)), Verdict::Overlapping);
    /// assert_eq!(chain.check(Span::new(1, 10), Span::new(31, 40)), Verdict::OutOfOrder);
    /// ```
    pub fn check(&self, q: Span, s: Span) -> Verdict {
        if q.overlaps_any(&self.q_spans) || s.overlaps_any(&self.s_spans) {
            Verdict::Overlapping
        } else if !self.is_collinear(q, s) {
            Verdict::OutOfOrder
        } else {
            Verdict::Accepted
        }
    }

    /// Query and subject must advance in the same direction relative to
    /// every accepted hit.
    pub fn is_collinear(&self, q: Span, s: Span) -> bool {
        self.q_spans
            .iter()
            .zip(self.s_spans.iter())
            .all(|(q2, s2)| (q.start < q2.start) == (s.start < s2.start))
    }

    /// Appends a hit unconditionally; callers check first.
    pub fn push(&mut self, q: Span, s: Span, score: i64, e_value: f64) {
        self.q_spans.push(q);
        self.s_spans.push(s);
        self.score += score;
        self.e_value *= e_value;
    }

    pub fn len(&self) -> usize {
        self.q_spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_spans.is_empty()
    }

    /// Accepted (query, subject) spans, in acceptance order
    pub fn spans(&self) -> impl Iterator<Item = (&Span, &Span)> {
        self.q_spans.iter().zip(self.s_spans.iter())
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn e_value(&self) -> f64 {
        self.e_value
    }
}

/// The aggregate of one finished chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSummary {
    pub query: String,
    pub subject: String,
    pub score: i64,
    pub e_value: f64,
}

impl ChainSummary {
    /// The e-value as written, with underflow noise flushed to zero
    pub fn clamped_e_value(&self) -> f64 {
        if self.e_value < E_VALUE_FLOOR {
            0.0
        } else {
            self.e_value
        }
    }
}

/// `query subject score e_value`
impl fmt::Display for ChainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.query,
            self.subject,
            self.score,
            format_e_value(self.clamped_e_value())
        )
    }
}

/// Counts of verdicts over a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    pub accepted: usize,
    pub unpaired: usize,
    pub overlapping: usize,
    pub out_of_order: usize,
}

impl ChainStats {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accepted => self.accepted += 1,
            Verdict::Unpaired => self.unpaired += 1,
            Verdict::Overlapping => self.overlapping += 1,
            Verdict::OutOfOrder => self.out_of_order += 1,
        }
    }
}

impl fmt::Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} unpaired, {} overlapping, {} out of order",
            self.accepted, self.unpaired, self.overlapping, self.out_of_order
        )
    }
}

/// Builds chains for all (query, subject) pairs of one hit stream.
pub struct ChainBuilder<P> {
    pairing: P,
    // query -> subject -> chain, both in order of creation
    chains: IndexMap<String, IndexMap<String, Chain>>,
    stats: ChainStats,
}

impl<P: Pairing> ChainBuilder<P> {
    pub fn new(pairing: P) -> Self {
        Self {
            pairing,
            chains: IndexMap::new(),
            stats: ChainStats::default(),
        }
    }

    /// Offers a hit; it is added to its chain when accepted.
    pub fn push(&mut self, hit: &HitRecord) -> Verdict {
        let verdict = if !self.pairing.accepts(&hit.query, &hit.subject) {
            Verdict::Unpaired
        } else {
            let (q, s) = (hit.q_span(), hit.s_span());
            let verdict = match self.chain(&hit.query, &hit.subject) {
                Some(chain) => chain.check(q, s),
                None => Verdict::Accepted,
            };
            if verdict == Verdict::Accepted {
                self.chains
                    .entry(hit.query.clone())
                    .or_default()
                    .entry(hit.subject.clone())
                    .or_default()
                    .push(q, s, hit.score, hit.e_value);
            }
            verdict
        };

        self.stats.record(verdict);
        verdict
    }

    pub fn chain(&self, query: &str, subject: &str) -> Option<&Chain> {
        self.chains.get(query).and_then(|m| m.get(subject))
    }

    /// Removes and summarizes every chain of `query`.
    pub fn finalize_query(&mut self, query: &str) -> Vec<ChainSummary> {
        match self.chains.shift_remove(query) {
            Some(subjects) => summarize(query, subjects),
            None => vec![],
        }
    }

    /// Summarizes all remaining chains, grouped by query.
    pub fn finish(self) -> Vec<ChainSummary> {
        self.chains
            .into_iter()
            .flat_map(|(query, subjects)| summarize(&query, subjects))
            .collect()
    }

    pub fn stats(&self) -> ChainStats {
        self.stats
    }
}

fn summarize(query: &str, subjects: IndexMap<String, Chain>) -> Vec<ChainSummary> {
    subjects
        .into_iter()
        .filter(|(_, chain)| !chain.is_empty())
        .map(|(subject, chain)| ChainSummary {
            query: query.to_string(),
            subject,
            score: chain.score(),
            e_value: chain.e_value(),
        })
        .collect()
}

/// Chains a hit stream that is grouped by query.
///
/// Chains of a query are summarized and handed to `emit` as soon as the
/// stream moves on to the next query.
pub fn combine_hits<I, P, F>(hits: I, pairing: P, mut emit: F) -> anyhow::Result<ChainStats>
where
    I: IntoIterator<Item = anyhow::Result<HitRecord>>,
    P: Pairing,
    F: FnMut(&ChainSummary) -> anyhow::Result<()>,
{
    let mut builder = ChainBuilder::new(pairing);
    let mut last_query: Option<String> = None;

    for hit in hits {
        let hit = hit?;
        if last_query.as_deref() != Some(hit.query.as_str()) {
            if let Some(query) = last_query.take() {
                for summary in builder.finalize_query(&query) {
                    emit(&summary)?;
                }
            }
            last_query = Some(hit.query.clone());
        }
        builder.push(&hit);
    }

    let stats = builder.stats();
    for summary in builder.finish() {
        emit(&summary)?;
    }

    Ok(stats)
}
