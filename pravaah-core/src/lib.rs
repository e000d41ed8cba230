pub mod amenities;
pub mod catalog;
pub mod config;
pub mod dispatch;

pub use amenities::{AmenityEvent, AmenityRow, AmenityState, StatusKind, UpdateStatus};
pub use catalog::{Route, ToolAction, ToolDescriptor};
pub use config::Config;

const BANNER: &str = r#"
   ___                                 _
  / _ \_ __ __ ___   ____ _  __ _| |__
 / /_)/ '__/ _` \ \ / / _` |/ _` | '_ \
/ ___/| | | (_| |\ V / (_| | (_| | | | |
\/    |_|  \__,_| \_/ \__,_|\__,_|_| |_|
        station admin console
"#;

pub fn print_banner() {
    println!("{}", BANNER);
}
