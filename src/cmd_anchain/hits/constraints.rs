use anchain::libs::anchor::GenomeAnchors;
use anchain::libs::constraint::{coding_constraints, noncoding_constraints, Constraint};
use anchain::libs::hit::HitReader;
use anchain::libs::pairing::{CandidateIndex, PairBucket};
use anyhow::Context;
use clap::*;
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("constraints")
        .about("Make alignment constraints from chained anchor hits")
        .after_help(
            r###"
For each genome pair of the candidate pairs, chains the hits of that pair and
projects every accepted hit from residues of the protein anchors onto both
genomes.

Input files:
* <map-dir>/genomes        - genome names
* <map-dir>/pairwisehits   - candidate pairs: runId genomeA anchorA genomeB anchorB
* <genome>.anchors         - id chrom strand start end isCoding
                             read from <map-dir> for draft genomes, else <input-dir>
* <input-dir>/<A>-<B>.blat - hits with anchors of A as queries, A < B

Output, one line per accepted hit:
    runId 1 genomeA chromA startA endA strandA genomeB chromB startB endB strandB

With --noncoding, candidate pairs of two non-coding anchors are added as
whole-anchor constraints with isCoding = 0.

Examples:
1. anchain hits constraints -i hits/ -m map/ -o constraints

2. Four genome pairs at a time:
   anchain hits constraints -i hits/ -m map/ --parallel 4

"###,
        )
        .arg(
            Arg::new("input_dir")
                .long("input-dir")
                .short('i')
                .num_args(1)
                .default_value(".")
                .help("Directory containing hit and anchor files"),
        )
        .arg(
            Arg::new("map_dir")
                .long("map-dir")
                .short('m')
                .num_args(1)
                .default_value(".")
                .help("Directory containing map related files"),
        )
        .arg(
            Arg::new("noncoding")
                .long("noncoding")
                .action(ArgAction::SetTrue)
                .help("Output constraints for non-coding candidate pairs"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for parallel processing"),
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
    let input_dir = Path::new(args.get_one::<String>("input_dir").unwrap());
    let map_dir = Path::new(args.get_one::<String>("map_dir").unwrap());
    let is_noncoding = args.get_flag("noncoding");
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();

    let mut writer = anchain::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Loading
    //----------------------------
    let genomes = anchain::read_words(&map_dir.join("genomes").to_string_lossy())?;

    log::info!("Reading pairwise hit file...");
    let index = CandidateIndex::from_file(&map_dir.join("pairwisehits").to_string_lossy())?;
    log::info!("{} candidate pairs", index.len());

    let anchors = GenomeAnchors::load(&genomes, input_dir, map_dir)?;

    //----------------------------
    // Chaining
    //----------------------------
    let buckets: Vec<&PairBucket> = index.buckets().collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build()?;

    // one worker per genome pair; results keep the order of the buckets
    let results: Vec<anyhow::Result<Vec<Constraint>>> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| process_bucket(bucket, &anchors, input_dir, is_noncoding))
            .collect()
    });

    for result in results {
        for constraint in result? {
            writeln!(writer, "{}", constraint)?;
        }
    }
    writer.flush()?;

    Ok(())
}

fn process_bucket(
    bucket: &PairBucket,
    anchors: &GenomeAnchors,
    input_dir: &Path,
    is_noncoding: bool,
) -> anyhow::Result<Vec<Constraint>> {
    let hit_file = input_dir.join(bucket.hit_file_name());
    log::info!("{}", hit_file.display());

    let label = || {
        format!(
            "genome pair {}-{} ({})",
            bucket.genome_a,
            bucket.genome_b,
            hit_file.display()
        )
    };

    let reader = anchain::reader(&hit_file.to_string_lossy()).with_context(label)?;
    let (mut constraints, stats) =
        coding_constraints(HitReader::new(reader), bucket, anchors).with_context(label)?;
    log::debug!("{}-{}: {}", bucket.genome_a, bucket.genome_b, stats);

    if is_noncoding {
        constraints.extend(noncoding_constraints(bucket, anchors).with_context(label)?);
    }

    Ok(constraints)
}
