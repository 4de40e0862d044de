use anchain::libs::chain::combine_hits;
use anchain::libs::hit::HitReader;
use anchain::libs::pairing::AnyPair;
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("combine")
        .about("Combine hits between the same query and subject into one score")
        .after_help(
            r###"
Chains the hits of each (query, subject) pair and writes one line per pair:

    query <TAB> subject <TAB> score <TAB> e-value

Processing:
* Hits are taken in input order. A hit joins its pair's chain only if it
  overlaps no hit of the chain, on the query or on the subject, and keeps the
  same relative order on both anchors as every hit of the chain.
* Scores of a chain are summed and e-values multiplied. E-values below 1e-50
  are written as 0e+00.
* Input must be grouped by query; a pair's line is written when the input
  moves on to the next query.

Examples:
1. Combine BLAT hits:
   anchain hits combine human-mouse.blast8 -o human-mouse.hits

2. All-vs-all of one genome, dropping hits of an anchor to itself:
   anchain hits combine human-human.blast8 --identity

3. One line per hit:
   anchain hits combine human-mouse.blast8 --no-combine

"###,
        )
        .arg(
            Arg::new("infile")
                .num_args(1)
                .index(1)
                .default_value("stdin")
                .help("Input hits. [stdin] for standard input"),
        )
        .arg(
            Arg::new("identity")
                .long("identity")
                .short('i')
                .action(ArgAction::SetTrue)
                .help("Remove hits with identical subject and query"),
        )
        .arg(
            Arg::new("no_combine")
                .long("no-combine")
                .action(ArgAction::SetTrue)
                .help("Do not combine multiple hits between the same subject and query"),
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
    let mut writer = anchain::writer(args.get_one::<String>("outfile").unwrap())?;

    let pairing = AnyPair {
        exclude_self: args.get_flag("identity"),
    };
    let hits = HitReader::new(anchain::reader(infile)?);

    //----------------------------
    // Output
    //----------------------------
    if args.get_flag("no_combine") {
        for hit in hits {
            let hit = hit.map_err(|e| e.context(format!("reading hits from {}", infile)))?;
            if pairing.exclude_self && hit.is_self_hit() {
                continue;
            }
            writeln!(writer, "{}", hit.score_line())?;
        }
    } else {
        let stats = combine_hits(
            hits.map(|hit| hit.map_err(|e| e.context(format!("reading hits from {}", infile)))),
            pairing,
            |summary| {
                writeln!(writer, "{}", summary)?;
                Ok(())
            },
        )?;
        log::debug!("{}: {}", infile, stats);
    }

    writer.flush()?;

    Ok(())
}
