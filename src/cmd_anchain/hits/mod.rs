pub mod combine;
pub mod constraints;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("hits")
        .about("Anchor hit tools")
        .after_help(
            r###"Note:
Hits are tabular aligner output (blast8 / BLAT -out=blast8), 12 columns per line.
"###,
        )
        .subcommand(combine::make_subcommand())
        .subcommand(constraints::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("combine", sub_matches)) => combine::execute(sub_matches),
        Some(("constraints", sub_matches)) => constraints::execute(sub_matches),
        _ => Ok(()),
    }
}
