use commands::command_argument_builder;
use vantage::handlers::{handle_rank, handle_search, handle_view, print_banner};

mod commands;

pub(crate) const CLAP_STYLING: clap::builder::styling::Styles = clap_cargo::style::CLAP_STYLING;

fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("view", primary_command)) => handle_view(primary_command),
        Some(("rank", primary_command)) => handle_rank(primary_command),
        Some(("search", primary_command)) => handle_search(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
