extern crate clap;
use clap::*;

mod cmd_anchain;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let app = Command::new("anchain")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`anchain` - Anchor hit chaining for orthology maps")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_anchain::hits::make_subcommand())
        .subcommand(cmd_anchain::agp::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Anchor hits:
    * hits combine     - Chain hits between anchor pairs into one score
    * hits constraints - Project chained hits onto both genomes

* Draft assemblies:
    * agp check - Validate placement tables
    * agp lift  - Lift map intervals from assembled sequences to components

Set RUST_LOG=debug to see per-pair chaining statistics.

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("hits", sub_matches)) => cmd_anchain::hits::execute(sub_matches),
        Some(("agp", sub_matches)) => cmd_anchain::agp::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
