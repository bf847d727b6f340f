//! Statistics reporting.

use console::style;

use crate::download::SessionCounters;

/// Print statistics for one session run.
pub fn print_session_stats(counters: &SessionCounters) {
    println!();
    println!("{}", style("Session statistics:").bold());
    println!("  Downloaded: {}", style(counters.downloaded).green());
    println!("  Skipped:    {} (already on disk)", counters.skipped);
    if counters.failed > 0 {
        println!("  Failed:     {}", style(counters.failed).red());
    }
    if counters.upstream_deleted > 0 {
        println!(
            "  Deleted upstream: {}",
            style(counters.upstream_deleted).yellow()
        );
    }
    if counters.ignored > 0 {
        println!("  Ignored:    {} (unsupported post types)", counters.ignored);
    }
}
