//! AGP placement tables of draft assemblies.
//!
//! An AGP file lays out each assembled sequence (the `chrom` column) as an
//! ordered run of components and gaps. Both axes are 1-based and closed.

use crate::libs::error::{parse_field, AnchainError};
use crate::libs::interval::{Interval, Strand};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgpPart {
    Gap {
        length: i64,
        kind: String,
        bridged: bool,
    },
    Component {
        accession: String,
        start: i64,
        end: i64,
        orientation: Strand,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgpRecord {
    pub chrom: String,
    pub contig_start: i64,
    pub contig_end: i64,
    pub rec_num: u64,
    /// Component type, e.g. `W`, `D`, or `N`/`U` for gaps
    pub kind: String,
    pub part: AgpPart,
}

impl AgpRecord {
    pub fn is_gap(&self) -> bool {
        matches!(self.part, AgpPart::Gap { .. })
    }

    pub fn contig_len(&self) -> i64 {
        self.contig_end - self.contig_start + 1
    }
}

// `?`, `0` and `na` mean unknown orientation, placed as forward
fn parse_orientation(s: &str) -> Option<Strand> {
    match s {
        "+" | "?" | "0" | "na" => Some(Strand::Plus),
        "-" => Some(Strand::Minus),
        _ => None,
    }
}

impl FromStr for AgpRecord {
    type Err = AnchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = match s.find('#') {
            Some(pos) => &s[..pos],
            None => s,
        };
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 8 {
            return Err(AnchainError::malformed(
                "AGP",
                format!("expected at least 8 fields, found {}", fields.len()),
                s,
            ));
        }

        let kind = fields[4].to_string();
        let part = if kind == "N" || kind == "U" {
            AgpPart::Gap {
                length: parse_field("AGP", "gap length", fields[5], s)?,
                kind: fields[6].to_string(),
                bridged: fields[7] == "yes",
            }
        } else {
            if fields.len() < 9 {
                return Err(AnchainError::malformed(
                    "AGP",
                    "component without orientation",
                    s,
                ));
            }
            let orientation = parse_orientation(fields[8]).ok_or_else(|| {
                AnchainError::malformed("AGP", format!("invalid orientation: {}", fields[8]), s)
            })?;
            AgpPart::Component {
                accession: fields[5].to_string(),
                start: parse_field("AGP", "source start", fields[6], s)?,
                end: parse_field("AGP", "source end", fields[7], s)?,
                orientation,
            }
        };

        Ok(AgpRecord {
            chrom: fields[0].to_string(),
            contig_start: parse_field("AGP", "contig start", fields[1], s)?,
            contig_end: parse_field("AGP", "contig end", fields[2], s)?,
            rec_num: parse_field("AGP", "record number", fields[3], s)?,
            kind,
            part,
        })
    }
}

impl fmt::Display for AgpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t",
            self.chrom, self.contig_start, self.contig_end, self.rec_num, self.kind
        )?;
        match &self.part {
            AgpPart::Gap {
                length,
                kind,
                bridged,
            } => write!(
                f,
                "{}\t{}\t{}",
                length,
                kind,
                if *bridged { "yes" } else { "no" }
            ),
            AgpPart::Component {
                accession,
                start,
                end,
                orientation,
            } => write!(f, "{}\t{}\t{}\t{}", accession, start, end, orientation),
        }
    }
}

/// The records of one assembled sequence, sorted and known to partition it.
#[derive(Debug, Clone)]
pub struct PlacementTable {
    chrom: String,
    records: Vec<AgpRecord>,
}

impl PlacementTable {
    /// Sorts `records` by contig start and checks that they tile the
    /// sequence from position 1 without gaps or overlaps.
    pub fn new(chrom: &str, mut records: Vec<AgpRecord>) -> Result<Self, AnchainError> {
        records.sort_by_key(|r| r.contig_start);

        let invalid = |message: &str, rec: &AgpRecord| AnchainError::InvalidPlacement {
            message: message.to_string(),
            record: rec.to_string(),
        };

        let mut last_end = 0;
        for rec in &records {
            if rec.contig_start > rec.contig_end {
                return Err(invalid("Contig start is greater than contig end", rec));
            }
            match &rec.part {
                AgpPart::Gap { length, .. } => {
                    if *length != rec.contig_len() {
                        return Err(invalid("Gap length is not equal to contig length", rec));
                    }
                }
                AgpPart::Component { start, end, .. } => {
                    if start > end {
                        return Err(invalid("Source start is greater than source end", rec));
                    }
                    if end - start + 1 != rec.contig_len() {
                        return Err(invalid("Source length is not equal to contig length", rec));
                    }
                }
            }
            if rec.contig_start != last_end + 1 {
                return Err(invalid("Gap or overlap in contig", rec));
            }
            last_end = rec.contig_end;
        }

        Ok(Self {
            chrom: chrom.to_string(),
            records,
        })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn records(&self) -> &[AgpRecord] {
        &self.records
    }

    /// Total length of the assembled sequence
    pub fn len(&self) -> i64 {
        self.records.last().map_or(0, |r| r.contig_end)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maps `[start, end)` (0-based) of the assembled sequence onto its
    /// components.
    ///
    /// One interval is produced per component the range touches, clipped to
    /// it; gaps produce nothing. Each result is `+` when its component lies
    /// in the same orientation as `strand`. For a `-` range the results are
    /// listed from the range's 5' end, i.e. in reverse table order.
    ///
    /// ```
    /// # use anchain::libs::agp::PlacementTable;
    /// # use anchain::libs::interval::Strand;
    /// let recs = vec![
    ///     "s1\t1\t100\t1\tW\tctgA\t1\t100\t+".parse().unwrap(),
    ///     "s1\t101\t200\t2\tW\tctgB\t1\t100\t-".parse().unwrap(),
    /// ];
    /// let table = PlacementTable::new("s1", recs).unwrap();
    ///
    /// let parts = table.remap(90, 110, Strand::Plus);
    /// assert_eq!(parts.len(), 2);
    /// assert_eq!(parts[0].to_string(), "ctgA\t90\t100\t+");
    /// assert_eq!(parts[1].to_string(), "ctgB\t90\t100\t-");
    /// ```
    pub fn remap(&self, start: i64, end: i64, strand: Strand) -> Vec<Interval> {
        let mut parts = vec![];

        for rec in &self.records {
            if rec.contig_end <= start {
                continue;
            }
            if rec.contig_start > end {
                break;
            }
            let AgpPart::Component {
                accession,
                start: src_start,
                end: src_end,
                orientation,
            } = &rec.part
            else {
                continue;
            };

            let offset = rec.contig_start - 1;
            let start_offset = (start - offset).max(0);
            let end_offset = (end - offset).min(rec.contig_len());

            let (s, e) = match orientation {
                Strand::Plus => (src_start - 1 + start_offset, src_start - 1 + end_offset),
                Strand::Minus => (src_end - end_offset, src_end - start_offset),
            };
            parts.push(Interval::new(accession, s, e, orientation.relative_to(strand)));
        }

        if strand.is_minus() {
            parts.reverse();
        }
        parts
    }
}

/// Placement tables of a draft assembly, keyed by assembled sequence name.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    tables: BTreeMap<String, PlacementTable>,
}

impl Assembly {
    pub fn get(&self, chrom: &str) -> Option<&PlacementTable> {
        self.tables.get(chrom)
    }

    /// Tables in name order
    pub fn tables(&self) -> impl Iterator<Item = &PlacementTable> {
        self.tables.values()
    }

    /// Remaps an interval of an assembled sequence; `None` when the sequence
    /// is not placed in this assembly.
    pub fn remap(&self, interval: &Interval) -> Option<Vec<Interval>> {
        self.get(&interval.seq)
            .map(|t| t.remap(interval.start, interval.end, interval.strand))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut recs_of: BTreeMap<String, Vec<AgpRecord>> = BTreeMap::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let rec: AgpRecord = line.parse().with_context(|| format!("line {}", i + 1))?;
            recs_of.entry(rec.chrom.clone()).or_default().push(rec);
        }

        let mut tables = BTreeMap::new();
        for (chrom, recs) in recs_of {
            let table = PlacementTable::new(&chrom, recs)?;
            tables.insert(chrom, table);
        }
        Ok(Self { tables })
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(path)?;
        Self::from_reader(reader).with_context(|| format!("reading AGP from {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGP: &str = "\
# draft
scaffold_1\t1\t100\t1\tD\tcontig_1\t1\t100\t+
scaffold_1\t101\t150\t2\tN\t50\tcontig\tyes
scaffold_1\t151\t250\t3\tD\tcontig_2\t1\t100\t-
";

    fn table() -> PlacementTable {
        let assembly = Assembly::from_reader(AGP.as_bytes()).unwrap();
        assembly.get("scaffold_1").unwrap().clone()
    }

    #[test]
    fn test_parse_records() {
        let gap: AgpRecord = "scaffold_1\t101\t150\t2\tN\t50\tcontig\tyes".parse().unwrap();
        assert!(gap.is_gap());
        assert_eq!(gap.contig_len(), 50);
        assert_eq!(gap.to_string(), "scaffold_1\t101\t150\t2\tN\t50\tcontig\tyes");

        let comp: AgpRecord = "scaffold_1\t1\t100\t1\tW\tctg\t11\t110\t-\t# note"
            .parse()
            .unwrap();
        assert!(!comp.is_gap());
        assert_eq!(comp.to_string(), "scaffold_1\t1\t100\t1\tW\tctg\t11\t110\t-");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("scaffold_1\t1\t100\t1\tW\tctg\t1\t100"
            .parse::<AgpRecord>()
            .is_err());
        assert!("scaffold_1\t1\t100\t1\tW\tctg\t1\t100\tx"
            .parse::<AgpRecord>()
            .is_err());
        assert!("scaffold_1\tone\t100\t1\tN\t100\tcontig\tno"
            .parse::<AgpRecord>()
            .is_err());
    }

    #[test]
    fn test_table_sorted_and_sized() {
        let reversed: String = AGP.lines().rev().map(|l| format!("{}\n", l)).collect();
        let assembly = Assembly::from_reader(reversed.as_bytes()).unwrap();
        let table = assembly.get("scaffold_1").unwrap();
        let starts: Vec<i64> = table.records().iter().map(|r| r.contig_start).collect();
        assert_eq!(starts, vec![1, 101, 151]);
        assert_eq!(table.len(), 250);
    }

    #[test]
    fn test_table_invalid() {
        let overlap = "\
s1\t1\t100\t1\tW\tctgA\t1\t100\t+
s1\t100\t199\t2\tW\tctgB\t1\t100\t+
";
        let err = Assembly::from_reader(overlap.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Gap or overlap in contig"));

        let short_source = "s1\t1\t100\t1\tW\tctgA\t1\t90\t+\n";
        let err = Assembly::from_reader(short_source.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Source length"));

        let bad_gap = "s1\t1\t100\t1\tN\t90\tcontig\tno\n";
        let err = Assembly::from_reader(bad_gap.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Gap length"));

        let late_start = "s1\t5\t104\t1\tW\tctgA\t1\t100\t+\n";
        assert!(Assembly::from_reader(late_start.as_bytes()).is_err());
    }

    #[test]
    fn test_remap_inside_one_component() {
        let parts = table().remap(10, 20, Strand::Plus);
        assert_eq!(parts, vec![Interval::new("contig_1", 10, 20, Strand::Plus)]);

        let parts = table().remap(160, 170, Strand::Plus);
        assert_eq!(parts, vec![Interval::new("contig_2", 80, 90, Strand::Minus)]);

        let parts = table().remap(160, 170, Strand::Minus);
        assert_eq!(parts, vec![Interval::new("contig_2", 80, 90, Strand::Plus)]);
    }

    #[test]
    fn test_remap_split_across_gap() {
        let parts = table().remap(90, 170, Strand::Plus);
        assert_eq!(
            parts,
            vec![
                Interval::new("contig_1", 90, 100, Strand::Plus),
                Interval::new("contig_2", 80, 100, Strand::Minus),
            ]
        );

        let parts = table().remap(90, 170, Strand::Minus);
        assert_eq!(
            parts,
            vec![
                Interval::new("contig_2", 80, 100, Strand::Plus),
                Interval::new("contig_1", 90, 100, Strand::Minus),
            ]
        );
    }

    #[test]
    fn test_remap_boundaries() {
        // last base of contig_1 only
        let parts = table().remap(99, 100, Strand::Plus);
        assert_eq!(parts, vec![Interval::new("contig_1", 99, 100, Strand::Plus)]);

        // inside the gap
        assert!(table().remap(100, 150, Strand::Plus).is_empty());

        // first base of contig_2, which is reversed
        let parts = table().remap(150, 151, Strand::Plus);
        assert_eq!(parts, vec![Interval::new("contig_2", 99, 100, Strand::Minus)]);
    }

    #[test]
    fn test_assembly_passthrough() {
        let assembly = Assembly::from_reader(AGP.as_bytes()).unwrap();
        let unplaced = Interval::new("chr9", 1, 2, Strand::Plus);
        assert!(assembly.remap(&unplaced).is_none());

        let placed = Interval::new("scaffold_1", 10, 20, Strand::Plus);
        assert_eq!(assembly.remap(&placed).unwrap().len(), 1);
    }
}
