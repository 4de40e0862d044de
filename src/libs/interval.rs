use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    pub fn is_minus(&self) -> bool {
        *self == Strand::Minus
    }

    /// `+` when both strands agree, `-` otherwise
    ///
    /// ```
    /// # use anchain::libs::interval::Strand;
    /// assert_eq!(Strand::Minus.relative_to(Strand::Minus), Strand::Plus);
    /// assert_eq!(Strand::Plus.relative_to(Strand::Minus), Strand::Minus);
    /// ```
    pub fn relative_to(&self, other: Strand) -> Strand {
        if *self == other {
            Strand::Plus
        } else {
            Strand::Minus
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            _ => Err(format!("invalid strand: {}", s)),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A closed range on an anchor, in residues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Closed-interval overlap, so touching ends count.
    ///
    /// ```
    /// # use anchain::libs::interval::Span;
    /// assert!(Span::new(1, 10).overlaps(&Span::new(10, 20)));
    /// assert!(!Span::new(1, 10).overlaps(&Span::new(11, 20)));
    /// ```
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn overlaps_any<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a Span>,
    {
        others.into_iter().any(|o| self.overlaps(o))
    }
}

/// A genomic interval with sequence and strand identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub seq: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

impl Interval {
    pub fn new(seq: &str, start: i64, end: i64, strand: Strand) -> Self {
        Self {
            seq: seq.to_string(),
            start,
            end,
            strand,
        }
    }

    /// Intervals on different sequences never overlap.
    ///
    /// ```
    /// # use anchain::libs::interval::{Interval, Strand};
    /// let a = Interval::new("chr1", 100, 200, Strand::Plus);
    /// let b = Interval::new("chr1", 200, 300, Strand::Minus);
    /// let c = Interval::new("chr2", 100, 200, Strand::Plus);
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.seq == other.seq && self.start <= other.end && self.end >= other.start
    }
}

/// Tab separated `seq start end strand`
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.seq, self.start, self.end, self.strand
        )
    }
}
