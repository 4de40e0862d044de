use anchain::libs::agp::Assembly;
use anchain::libs::interval::{Interval, Strand};
use anyhow::{bail, Context};
use clap::*;
use itertools::Itertools;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("lift")
        .about("Lift orthology map intervals of draft genomes onto AGP components")
        .after_help(
            r###"
Input is an orthology map, one row per line:

    num  chrom start end strand  chrom start end strand  ...

with one group of four fields per genome, in the order of <map-dir>/genomes.
A group whose chrom is NA is absent. Coordinates are 0-based, half-open.

Genomes with <map-dir>/<genome>.agp are draft assemblies. Their intervals are
split at component boundaries and written in component coordinates, several
groups on one line. Gaps are dropped. For a '-' interval the groups are
listed from the interval's 5' end. Intervals of other genomes, or of
sequences absent from the AGP file, pass through unchanged.

Output, one line per present interval:

    num genome chrom start end strand [chrom start end strand ...]

Examples:
1. anchain agp lift map -m map/ -o map.coordinates

"###,
        )
        .arg(
            Arg::new("infile")
                .num_args(1)
                .index(1)
                .default_value("stdin")
                .help("Input map. [stdin] for standard input"),
        )
        .arg(
            Arg::new("map_dir")
                .long("map-dir")
                .short('m')
                .num_args(1)
                .default_value(".")
                .help("Directory containing map output files"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let map_dir = Path::new(args.get_one::<String>("map_dir").unwrap());

    let reader = anchain::reader(infile)?;
    let mut writer = anchain::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Loading
    //----------------------------
    let genomes = anchain::read_words(&map_dir.join("genomes").to_string_lossy())?;

    let mut draft_of: HashMap<String, Assembly> = HashMap::new();
    for g in &genomes {
        let agp_file = map_dir.join(format!("{}.agp", g));
        if agp_file.is_file() {
            log::info!("Draft genome {}: {}", g, agp_file.display());
            draft_of.insert(g.clone(), Assembly::from_file(&agp_file.to_string_lossy())?);
        }
    }

    //----------------------------
    // Output
    //----------------------------
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let num = fields[0];
        let groups = parse_groups(&fields[1..])
            .with_context(|| format!("line {} of {}", i + 1, infile))?;

        for (g, interval) in genomes.iter().zip(groups) {
            let interval = match interval {
                Some(interval) => interval,
                None => continue,
            };

            let lifted = draft_of.get(g).and_then(|assembly| assembly.remap(&interval));
            match lifted {
                Some(parts) => {
                    let mut out = format!("{}\t{}", num, g);
                    if !parts.is_empty() {
                        out.push('\t');
                        out.push_str(&parts.iter().join("\t"));
                    }
                    writeln!(writer, "{}", out)?;
                }
                None => writeln!(writer, "{}\t{}\t{}", num, g, interval)?,
            }
        }
    }
    writer.flush()?;

    Ok(())
}

/// Splits map fields into per-genome intervals, `None` for absent ones.
fn parse_groups(fields: &[&str]) -> anyhow::Result<Vec<Option<Interval>>> {
    if fields.len() % 4 != 0 {
        bail!(
            "expected four fields per genome, found {} fields",
            fields.len()
        );
    }

    let mut groups = vec![];
    for chunk in fields.chunks(4) {
        if chunk[0] == "NA" {
            groups.push(None);
            continue;
        }
        let start: i64 = chunk[1]
            .parse()
            .with_context(|| format!("invalid start: {}", chunk[1]))?;
        let end: i64 = chunk[2]
            .parse()
            .with_context(|| format!("invalid end: {}", chunk[2]))?;
        let strand: Strand = chunk[3].parse().map_err(anyhow::Error::msg)?;
        groups.push(Some(Interval::new(chunk[0], start, end, strand)));
    }
    Ok(groups)
}
