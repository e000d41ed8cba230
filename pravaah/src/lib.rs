pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{build_config, format_amenity_report, format_tool_listing, init_logging};
