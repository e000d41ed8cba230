use pravaah::commands::command_argument_builder;
use pravaah::handlers::{
    build_config, handle_open, handle_search, handle_toggle, handle_tools, handle_ui,
    prints_banner,
};
use pravaah_core::{Route, print_banner};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");
    let config = build_config(&chosen_command);

    if prints_banner(&chosen_command) {
        print_banner();
    }

    match chosen_command.subcommand() {
        None | Some(("ui", _)) => handle_ui(&config, Route::Dashboard, verbose),
        Some(("tools", _)) => handle_tools(&config),
        Some(("open", primary_command)) => {
            let title = primary_command
                .get_one::<String>("TITLE")
                .map(String::as_str)
                .unwrap_or_default();
            handle_open(&config, title, quiet, verbose)
        }
        Some(("search", primary_command)) => {
            let station = primary_command
                .get_one::<String>("STATION")
                .map(String::as_str)
                .unwrap_or_default();
            handle_search(&config, station, verbose).await
        }
        Some(("toggle", primary_command)) => {
            let station = primary_command
                .get_one::<String>("STATION")
                .map(String::as_str)
                .unwrap_or_default();
            let vertex_id = primary_command
                .get_one::<String>("VERTEX_ID")
                .map(String::as_str)
                .unwrap_or_default();
            handle_toggle(&config, station, vertex_id, verbose).await
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
