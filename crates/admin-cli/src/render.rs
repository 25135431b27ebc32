//! Plain-text rendering for tables, the pager strip and the stat line

use chrono::{DateTime, Utc};

use keyrack_core::key::Key;
use keyrack_core::package::Package;
use keyrack_core::view::{KeyStats, PageMark};

/// Key rows as a fixed-width table
pub fn key_table(rows: &[&Key], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<28} {:<20} {:>8} {:<17}\n",
        "KEY", "PACKAGE", "DEVICES", "EXPIRES"
    ));
    for key in rows {
        let package = key
            .package
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("-");
        let usage = format!("{}/{}", key.activated_devices.len(), key.max_activations);
        out.push_str(&format!(
            "{:<28} {:<20} {:>8} {:<17}\n",
            key.key,
            package,
            usage,
            key.expiry_label(now)
        ));
    }
    out
}

/// Package rows as a fixed-width table
pub fn package_table(packages: &[Package]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<26} {:<30}\n", "ID", "NAME"));
    for package in packages {
        out.push_str(&format!("{:<26} {:<30}\n", package.id, package.name));
    }
    out
}

/// The pagination strip, with the current page bracketed:
/// `1 ... 4 [5] 6 ... 10`
pub fn pager_strip(marks: &[PageMark], current: usize) -> String {
    marks
        .iter()
        .map(|mark| match mark {
            PageMark::Page(page) if *page == current => format!("[{page}]"),
            PageMark::Page(page) => page.to_string(),
            PageMark::Gap => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line aggregate summary
pub fn stat_line(stats: &KeyStats) -> String {
    format!(
        "{} keys: {} active, {} expired, {} in use, {} devices activated",
        stats.total, stats.active, stats.expired, stats.used, stats.total_devices
    )
}
