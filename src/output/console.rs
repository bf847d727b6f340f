//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Reddit Saver                                      ║
║     Saved-posts media archiver                        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    username: &str,
    download_dir: &str,
    skip_limit: u32,
    poll_interval_seconds: u64,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  User: {}", username);
    println!("  Directory: {}", download_dir);
    if skip_limit > 0 {
        println!("  Skip limit: {} consecutive", skip_limit);
    } else {
        println!("  Skip limit: disabled");
    }
    println!("  Interval: {}s", poll_interval_seconds);
    println!();
}
