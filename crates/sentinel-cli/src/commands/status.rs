//! `sentinel status` — a snapshot of the agent's counters.

use sentinel_core::Agent;

use crate::style::{print_info_table, print_mini_banner, print_spacer};

pub fn run(agent: &Agent) {
    print_mini_banner();
    print_spacer();

    let stats = agent.stats();
    println!("Interceptions");
    print_info_table(&[
        ("total", &stats.total_intercepts.to_string()),
        ("clean", &stats.clean_count.to_string()),
        ("quarantined", &stats.quarantined_count.to_string()),
        ("ignored", &stats.ignored_count.to_string()),
        ("rate_limited", &stats.rate_limited_count.to_string()),
        ("payload_too_large", &stats.payload_too_large_count.to_string()),
        ("errors", &stats.error_count.to_string()),
    ]);
    print_spacer();

    let q = agent.quarantine_stats();
    println!("Quarantine");
    print_info_table(&[
        ("count", &q.count.to_string()),
        ("bytes", &q.bytes.to_string()),
        ("critical", &q.by_severity.critical.to_string()),
        ("high", &q.by_severity.high.to_string()),
        ("medium", &q.by_severity.medium.to_string()),
        ("low", &q.by_severity.low.to_string()),
        ("evictions", &q.evictions.to_string()),
        ("deduplicated", &q.deduplicated.to_string()),
    ]);
    print_spacer();

    let r = agent.rate_limiter_stats();
    println!("Rate limiter");
    print_info_table(&[("active_sources", &r.active.to_string()), ("blocked_sources", &r.blocked.to_string())]);
}
