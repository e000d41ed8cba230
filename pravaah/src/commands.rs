use clap::{arg, command};
use pravaah_api::DEFAULT_BASE_URL;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pravaah")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pravaah")
        .about("Station admin console: tool launcher and amenity visibility manager")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"api-base" <URL>)
                .required(false)
                .help("Base URL of the stations API")
                .env("PRAVAAH_API_BASE")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (default: none)")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            arg!(--"tools-file" <PATH>)
                .required(false)
                .help("JSON file replacing the built-in tool catalog")
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(command!("ui").about("Launch the terminal dashboard (default)"))
        .subcommand(command!("tools").about("List the tools on the dashboard"))
        .subcommand(
            command!("open")
                .about("Open a dashboard tool by title")
                .arg(arg!(<TITLE>).help("Title of the tool, e.g. \"SVG Mapper\"")),
        )
        .subcommand(
            command!("search")
                .about("Look up a station and list its amenities")
                .arg(arg!(<STATION>).help("Station name")),
        )
        .subcommand(
            command!("toggle")
                .about("Flip the visibility of one amenity of a station")
                .arg(arg!(<STATION>).help("Station name"))
                .arg(arg!(<VERTEX_ID>).help("Vertex id of the amenity")),
        )
}
