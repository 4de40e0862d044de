use crate::libs::anchor::Anchor;
use crate::libs::interval::{Interval, Span, Strand};

/// Nucleotides per residue of a protein anchor
pub const NT_PER_RESIDUE: i64 = 3;

/// Projects a residue span (1-based, closed) of an anchor onto its genome.
///
/// The result is 0-based half-open, lies on the anchor's chromosome and
/// carries the anchor's strand. On a minus-strand anchor residue 1 is at the
/// anchor's genomic end.
///
/// ```
/// # use anchain::libs::anchor::Anchor;
/// # use anchain::libs::interval::{Span, Strand};
/// # use anchain::libs::project::project;
/// let mut anchor = Anchor {
///     id: "1".to_string(),
///     chrom: "chr1".to_string(),
///     strand: Strand::Plus,
///     start: 1000,
///     end: 2000,
///     is_coding: true,
/// };
/// let i = project(Span::new(1, 10), &anchor);
/// assert_eq!((i.start, i.end), (1000, 1030));
///
/// anchor.strand = Strand::Minus;
/// let i = project(Span::new(1, 10), &anchor);
/// assert_eq!((i.start, i.end), (1970, 2000));
/// ```
pub fn project(span: Span, anchor: &Anchor) -> Interval {
    let (start, end) = match anchor.strand {
        Strand::Plus => (
            (span.start - 1) * NT_PER_RESIDUE + anchor.start,
            span.end * NT_PER_RESIDUE + anchor.start,
        ),
        Strand::Minus => (
            anchor.end - span.end * NT_PER_RESIDUE,
            anchor.end - (span.start - 1) * NT_PER_RESIDUE,
        ),
    };

    Interval::new(&anchor.chrom, start, end, anchor.strand)
}
