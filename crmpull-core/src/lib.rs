pub mod config;
pub mod export;
pub mod fetch;

use colored::Colorize;

pub use config::{ConfigError, Settings};

pub fn print_banner() {
    println!(
        "{} {}",
        "crmpull".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "CRM company export service".bright_white());
    println!();
}
