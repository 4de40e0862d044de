use crate::libs::error::{parse_field, AnchainError};
use crate::libs::interval::{Interval, Strand};
use anyhow::Context;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

/// A gene-sized comparison unit placed on its genome.
///
/// `start..end` is 0-based half-open, in nucleotides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: String,
    pub chrom: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub is_coding: bool,
}

impl Anchor {
    /// The whole anchor as a genomic interval
    pub fn interval(&self) -> Interval {
        Interval::new(&self.chrom, self.start, self.end, self.strand)
    }
}

impl FromStr for Anchor {
    type Err = AnchainError;

    /// `id chrom strand start end isCoding`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(AnchainError::malformed(
                "anchor",
                format!("expected 6 fields, found {}", fields.len()),
                s,
            ));
        }

        let strand = fields[2]
            .parse::<Strand>()
            .map_err(|e| AnchainError::malformed("anchor", e, s))?;
        let coding: i64 = parse_field("anchor", "coding flag", fields[5], s)?;
        let start: i64 = parse_field("anchor", "start", fields[3], s)?;
        let end: i64 = parse_field("anchor", "end", fields[4], s)?;
        if start >= end {
            return Err(AnchainError::malformed(
                "anchor",
                format!("start {} is not less than end {}", start, end),
                s,
            ));
        }

        Ok(Anchor {
            id: fields[0].to_string(),
            chrom: fields[1].to_string(),
            strand,
            start,
            end,
            is_coding: coding != 0,
        })
    }
}

/// Anchors of one genome, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    anchors: HashMap<String, Anchor>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, anchor: Anchor) {
        if let Some(old) = self.anchors.insert(anchor.id.clone(), anchor) {
            log::warn!("Anchor {} is defined more than once; keeping the last", old.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut table = AnchorTable::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let anchor: Anchor = line.parse().with_context(|| format!("line {}", i + 1))?;
            table.insert(anchor);
        }
        Ok(table)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(path)?;
        Self::from_reader(reader).with_context(|| format!("reading anchors from {}", path))
    }
}

/// Anchor tables of every genome of a run, keyed by genome name.
#[derive(Debug, Clone, Default)]
pub struct GenomeAnchors {
    tables: HashMap<String, AnchorTable>,
}

impl GenomeAnchors {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, genome: &str, table: AnchorTable) {
        self.tables.insert(genome.to_string(), table);
    }

    pub fn table(&self, genome: &str) -> Option<&AnchorTable> {
        self.tables.get(genome)
    }

    /// Looks up an anchor, failing when either the genome or the id is unknown.
    pub fn anchor(&self, genome: &str, id: &str) -> anyhow::Result<&Anchor> {
        self.tables
            .get(genome)
            .with_context(|| format!("no anchors loaded for genome {}", genome))?
            .get(id)
            .with_context(|| format!("anchor {} not found in genome {}", id, genome))
    }

    /// Loads `<genome>.anchors` for each genome.
    ///
    /// Draft genomes have their anchors rewritten into the map directory, so a
    /// file there takes precedence over the one in the input directory.
    pub fn load(genomes: &[String], input_dir: &Path, map_dir: &Path) -> anyhow::Result<Self> {
        let mut all = GenomeAnchors::new();
        for genome in genomes {
            let file_name = format!("{}.anchors", genome);
            let draft = map_dir.join(&file_name);
            let path = if draft.is_file() {
                draft
            } else {
                input_dir.join(&file_name)
            };
            log::info!("Reading anchors of {} from {}", genome, path.display());

            let table = AnchorTable::from_file(&path.to_string_lossy())?;
            all.insert(genome, table);
        }
        Ok(all)
    }
}
