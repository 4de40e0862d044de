pub mod check;
pub mod lift;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("agp")
        .about("Placement table (AGP) tools")
        .subcommand(check::make_subcommand())
        .subcommand(lift::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("check", sub_matches)) => check::execute(sub_matches),
        Some(("lift", sub_matches)) => lift::execute(sub_matches),
        _ => Ok(()),
    }
}
