//! Cleanup of raw title/subtitle strings from feed XML.

/// Normalizes a raw feed-sourced string, preserving absence.
///
/// The mappers depend on this capability, not on the concrete cleaner, so a
/// host that wants different normalization swaps the implementation in at
/// [`AtomMapper`](crate::atom::AtomMapper) construction.
pub trait TextCleaner {
    fn clean_text(&self, raw: Option<&str>) -> Option<String>;
}

/// Default cleaner: strips markup and entities the way feed titles need.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTextCleaner;

impl TextCleaner for HtmlTextCleaner {
    fn clean_text(&self, raw: Option<&str>) -> Option<String> {
        raw.map(clean_text)
    }
}

/// Strips HTML tags, decodes common entities, drops control characters, and
/// collapses whitespace runs to single spaces.
///
/// Tags are stripped before entities are decoded so that escaped markup in a
/// title (`&lt;b&gt;`) survives as visible text instead of being eaten.
pub fn clean_text(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let decoded = decode_entities(&stripped);
    collapse_whitespace(&decoded)
}

/// Drops everything between `<` and `>` in a single pass. Good enough for
/// title-sized strings; content fragments go through the event-driven reducer
/// instead.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decodes the handful of entities that actually show up in feed titles.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
fn decode_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
}

/// Collapses whitespace runs to single spaces, drops non-whitespace control
/// characters (terminal escape bytes in feed text are an attack surface, not
/// data), and trims the ends.
fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if !ch.is_control() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}
