use anchain::libs::agp::Assembly;
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("check")
        .about("Validate AGP placement tables")
        .after_help(
            r###"
Checks, for every assembled sequence:
* contig start is not greater than contig end
* gap length equals the gap's span, and component source length equals its span
* records tile the sequence from position 1 with no gap or overlap

On success prints the length of each sequence:
    chrom <TAB> length

Examples:
1. anchain agp check rat.agp

"###,
        )
        .arg(
            Arg::new("infile")
                .num_args(1)
                .index(1)
                .default_value("stdin")
                .help("Input AGP file. [stdin] for standard input"),
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
    let infile = args.get_one::<String>("infile").unwrap();
    let mut writer = anchain::writer(args.get_one::<String>("outfile").unwrap())?;

    let assembly = Assembly::from_file(infile)?;
    for table in assembly.tables() {
        writeln!(writer, "{}\t{}", table.chrom(), table.len())?;
    }
    writer.flush()?;

    Ok(())
}
