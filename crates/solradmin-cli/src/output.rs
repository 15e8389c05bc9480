//! Human-readable rendering of notices, overviews and queue listings.

use solradmin_core::{Notice, QueueItem, Severity, Site, SiteOverview};

/// Prefixes a notice with its severity marker.
pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.severity {
        Severity::Ok => "[ok]",
        Severity::Warning => "[warning]",
        Severity::Error => "[error]",
    };
    format!("{} {}", marker, notice.text)
}

/// Multi-line summary of a site's cores and queue.
pub fn format_overview(overview: &SiteOverview) -> String {
    let mut out = format!(
        "Site: {} ({})\n  Site hash:    {}\n  Queue items:  {}\n  Cores:",
        overview.site.label, overview.site.id, overview.site.site_hash, overview.queue_items
    );
    if overview.cores.is_empty() {
        out.push_str("        none");
    }
    for core in &overview.cores {
        let state = if core.reachable { "reachable" } else { "unreachable" };
        out.push_str(&format!("\n    - {} ({})", core.core_name, state));
    }
    out
}

/// One line per queue item.
pub fn format_queue_items(items: &[QueueItem]) -> String {
    items
        .iter()
        .map(|item| {
            let state = if item.has_failed() {
                "failed"
            } else if item.indexed_at.is_some() {
                "indexed"
            } else {
                "pending"
            };
            format!(
                "{:>8}  {:<20} {:>10}  {:<8} {}",
                item.id,
                item.item_type,
                item.item_uid,
                state,
                item.changed_at.format("%Y-%m-%dT%H:%M:%SZ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per configured site.
pub fn format_sites(sites: &[Site]) -> String {
    sites
        .iter()
        .map(|s| format!("{:<20} {}", s.id, s.label))
        .collect::<Vec<_>>()
        .join("\n")
}
