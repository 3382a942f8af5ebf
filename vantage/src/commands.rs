use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("vantage")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("vantage")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("view")
                .about(
                    "Reduce a scan snapshot to the visible graph handed to the rendering \
                layer.",
                )
                .arg(
                    arg!(-s --"snapshot" <PATH>)
                        .required(true)
                        .help("Path to the scan snapshot JSON")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-p --"perspective" <PERSPECTIVE>)
                        .required(false)
                        .help("Perspective to build: sitemap or attack")
                        .default_value("sitemap"),
                )
                .arg(
                    arg!(-l --"max-level" <LEVEL>)
                        .required(false)
                        .help("Depth cap for the sitemap perspective")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("2"),
                )
                .arg(
                    arg!(--"tree" "Pure expansion-driven tree mode, no depth cap")
                        .required(false)
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("max-level"),
                )
                .arg(
                    arg!(-t --"threshold" <N>)
                        .required(false)
                        .help("Cluster threshold for directory and URL buckets")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"page-size" <N>)
                        .required(false)
                        .help("Items revealed per cluster activation")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"focus" <NODE_ID>)
                        .required(false)
                        .help("Keep this node visible and expanded, whatever its score"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text or json")
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the report to a file instead of stdout")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("rank")
                .about("Print the most attacker-relevant nodes in a snapshot")
                .arg(
                    arg!(-s --"snapshot" <PATH>)
                        .required(true)
                        .help("Path to the scan snapshot JSON")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-n --"limit" <N>)
                        .required(false)
                        .help("How many nodes to list")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("25"),
                ),
        )
        .subcommand(
            command!("search")
                .about(
                    "Search nodes by label. Two terms find the shortest visible path \
                between the best matches of each.",
                )
                .arg(
                    arg!(-s --"snapshot" <PATH>)
                        .required(true)
                        .help("Path to the scan snapshot JSON")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(<QUERY>)
                        .required(true)
                        .help("One search term, or two separated by whitespace"),
                )
                .arg(
                    arg!(-p --"perspective" <PERSPECTIVE>)
                        .required(false)
                        .help("Perspective the path search runs against")
                        .default_value("sitemap"),
                ),
        )
}
