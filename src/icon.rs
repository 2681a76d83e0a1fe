//! Icon resolution for feed homepages.

/// Resolves an icon URL for a feed, keyed on its homepage host.
///
/// Kept behind a trait so hosts can substitute their own lookup (a cache, a
/// different favicon service) without touching the mappers.
pub trait IconResolver {
    fn resolve_icon(&self, host: &str) -> String;
}

/// Default resolver: the icon.horse favicon service.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaviconResolver;

impl IconResolver for FaviconResolver {
    fn resolve_icon(&self, host: &str) -> String {
        format!("https://icon.horse/icon/{host}")
    }
}
