use crate::libs::anchor::GenomeAnchors;
use crate::libs::chain::{ChainBuilder, ChainStats, Verdict};
use crate::libs::hit::HitRecord;
use crate::libs::interval::Interval;
use crate::libs::pairing::PairBucket;
use crate::libs::project::project;
use anyhow::Context;
use std::fmt;

/// A pair of genomic intervals held to be homologous, tagged with the run of
/// the orthology map it supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub run_id: u64,
    pub is_coding: bool,
    pub genome_a: String,
    pub a: Interval,
    pub genome_b: String,
    pub b: Interval,
}

/// `runId isCoding genomeA chromA startA endA strandA genomeB chromB startB endB strandB`
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.run_id,
            if self.is_coding { 1 } else { 0 },
            self.genome_a,
            self.a,
            self.genome_b,
            self.b
        )
    }
}

/// Chains the hits of one genome pair against its candidate pairs and
/// projects every accepted hit onto both genomes.
///
/// Queries of the hit stream are anchors of `bucket.genome_a`, subjects are
/// anchors of `bucket.genome_b`.
pub fn coding_constraints<I>(
    hits: I,
    bucket: &PairBucket,
    anchors: &GenomeAnchors,
) -> anyhow::Result<(Vec<Constraint>, ChainStats)>
where
    I: IntoIterator<Item = anyhow::Result<HitRecord>>,
{
    let mut builder = ChainBuilder::new(bucket);
    let mut constraints = vec![];

    for hit in hits {
        let hit = hit?;
        if builder.push(&hit) != Verdict::Accepted {
            continue;
        }

        let pair = bucket
            .get(&hit.query)
            .with_context(|| format!("no candidate pair for anchor {}", hit.query))?;
        let query = anchors.anchor(&bucket.genome_a, &hit.query)?;
        let subject = anchors.anchor(&bucket.genome_b, &hit.subject)?;

        constraints.push(Constraint {
            run_id: pair.run_id,
            is_coding: true,
            genome_a: bucket.genome_a.clone(),
            a: project(hit.q_span(), query),
            genome_b: bucket.genome_b.clone(),
            b: project(hit.s_span(), subject),
        });
    }

    Ok((constraints, builder.stats()))
}

/// Whole-anchor constraints for candidate pairs whose anchors are both
/// non-coding, in declaration order.
pub fn noncoding_constraints(
    bucket: &PairBucket,
    anchors: &GenomeAnchors,
) -> anyhow::Result<Vec<Constraint>> {
    let mut constraints = vec![];
    for pair in bucket.pairs() {
        let a = anchors.anchor(&pair.genome_a, &pair.anchor_a)?;
        let b = anchors.anchor(&pair.genome_b, &pair.anchor_b)?;
        if a.is_coding || b.is_coding {
            continue;
        }
        constraints.push(Constraint {
            run_id: pair.run_id,
            is_coding: false,
            genome_a: pair.genome_a.clone(),
            a: a.interval(),
            genome_b: pair.genome_b.clone(),
            b: b.interval(),
        });
    }
    Ok(constraints)
}
