//! Built-in crawl targets and safety limits
//!
//! These are used whenever no configuration file overrides them.

use crate::config::types::SectionEntry;

/// Page visits allowed per seed before its traversal is cut off
pub const MAX_PAGES_PER_SEED: u32 = 50;

/// Per-page render bound
pub const RENDER_TIMEOUT_MS: u64 = 20_000;

/// Pause for client-side rendering to finish mutating the DOM
pub const SETTLE_DELAY_MS: u64 = 1_500;

pub const NEXT_LINK_MARKER: &str = "/api-reference/";

pub const TITLE_SEPARATOR: &str = " - ";

pub const MAX_LINK_TEXT_LEN: usize = 100;

const DOCS_ROOT: &str = "https://docs.bunny.net/api-reference";

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "core",
        &[
            "core/pull-zones/list-pull-zones",
            "core/storage-zones/list-storage-zones",
            "core/dns/list-dns-zones",
            "core/stream-video-library/list-video-libraries",
            "core/statistics/get-statistics",
            "core/purge/purge-url",
            "core/api-keys/list-api-keys",
            "core/countries/country-list",
            "core/region/region-list",
            "core/user-operations/close-account",
            "core/search/global-search-endpoint",
        ],
    ),
    (
        "storage",
        &[
            "storage/browse-files/list-files",
            "storage/manage-files/download-file",
        ],
    ),
    (
        "stream",
        &[
            "stream/manage-collections/get-collection",
            "stream/manage-videos/list-videos",
        ],
    ),
    (
        "shield",
        &[
            "shield/waf/get-shieldwafcustom-rules",
            "shield/accesslists/get-shieldshield-zone-access-lists",
        ],
    ),
    ("scripting", &["scripting/edge-script/list-edge-scripts"]),
    (
        "magic-containers",
        &["magic-containers/applications/list-applications"],
    ),
];

const LINK_PAGES: &[&str] = &[
    "core",
    "storage",
    "stream",
    "shield",
    "scripting",
    "magic-containers/overview",
];

/// The built-in documentation sections with their seed pages
pub fn sections() -> Vec<SectionEntry> {
    SECTIONS
        .iter()
        .map(|(name, paths)| SectionEntry {
            name: name.to_string(),
            seeds: paths
                .iter()
                .map(|path| format!("{}/{}", DOCS_ROOT, path))
                .collect(),
        })
        .collect()
}

/// Section landing pages scanned by the link inventory
pub fn link_pages() -> Vec<String> {
    LINK_PAGES
        .iter()
        .map(|path| format!("{}/{}", DOCS_ROOT, path))
        .collect()
}
