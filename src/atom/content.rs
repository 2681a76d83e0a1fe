//! Reduction of Atom content fragments to a text summary and an image URL.
//!
//! Feed `content`/`summary` elements carry loosely-structured HTML. We do not
//! render or validate it; we fold its tokenizer events into the best-effort
//! [`AtomContent`] a reader can show in an entry list.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

/// Tags whose text children contribute to the reduced summary. Text under any
/// other tag (or under no tag at all) is discarded.
const SUMMARY_TAGS: [&str; 4] = ["p", "a", "span", "em"];

/// What a single content fragment reduces to.
///
/// Created once per fragment, consumed immediately by the post mapper.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomContent {
    /// `src` of the first `img` tag seen in the fragment, if any.
    pub image_url: Option<String>,
    /// Concatenated text of summary-bearing tags, trimmed. Possibly empty.
    pub content: String,
}

/// Folds tag/text events over one content fragment into an [`AtomContent`].
///
/// The reducer keeps two pieces of state between events: the accumulating
/// content buffer and the most-recently-opened tag. [`finish`](Self::finish)
/// resets both, so one instance can be reused across fragments, though the
/// intended pattern is a fresh reducer per fragment, which is what
/// [`reduce_fragment`] does.
///
/// Malformed markup never fails the reducer; a fragment with no recognized
/// tags reduces to empty content and an absent image.
#[derive(Debug, Default)]
pub struct ContentReducer {
    current_tag: Option<String>,
    image_url: Option<String>,
    buffer: String,
}

impl ContentReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes an opening tag.
    ///
    /// The first `img` carrying a `src` attribute wins the image slot; later
    /// `img` tags are ignored for the image but still observed as tags.
    /// A self-closing tag (`self_closing`) is open for no span of text at
    /// all, so it does not displace the enclosing tag: text following
    /// `<img src=…/>` inside a `<p>` is still under `p`.
    pub fn open_tag(
        &mut self,
        name: &str,
        attributes: &HashMap<String, String>,
        self_closing: bool,
    ) {
        if self.image_url.is_none() && name == "img" {
            if let Some(src) = attributes.get("src") {
                self.image_url = Some(src.clone());
            }
        }

        if !self_closing {
            self.current_tag = Some(name.to_owned());
        }
    }

    /// Appends `chars` verbatim to the summary if the current tag carries
    /// summary text. No separator is injected; inter-tag whitespace from the
    /// source is all the spacing the summary gets.
    pub fn text(&mut self, chars: &str) {
        let keep = self
            .current_tag
            .as_deref()
            .is_some_and(|tag| SUMMARY_TAGS.contains(&tag));
        if keep {
            self.buffer.push_str(chars);
        }
    }

    /// Emits the reduced fragment and resets the reducer for the next one.
    pub fn finish(&mut self) -> AtomContent {
        let reduced = AtomContent {
            image_url: self.image_url.take(),
            content: self.buffer.trim().to_owned(),
        };
        self.buffer.clear();
        self.current_tag = None;
        reduced
    }
}

/// Runs a [`ContentReducer`] over one HTML fragment.
///
/// Tokenization errors are not surfaced: feed HTML is routinely unclosed or
/// mis-nested, and a partial summary beats none. On a tokenizer error the
/// event loop stops and whatever was reduced so far is returned.
pub fn reduce_fragment(fragment: &str) -> AtomContent {
    let mut reducer = ContentReducer::new();
    let mut reader = Reader::from_str(fragment);

    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                let attributes = decode_attributes(&reader, &tag);
                reducer.open_tag(&name, &attributes, false);
            }
            Ok(Event::Empty(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                let attributes = decode_attributes(&reader, &tag);
                reducer.open_tag(&name, &attributes, true);
            }
            Ok(Event::Text(text)) => {
                // Unknown entities (&nbsp; and friends) are common in feed
                // HTML; keep the literal text rather than dropping the node.
                let chars = match text.unescape() {
                    Ok(unescaped) => unescaped.into_owned(),
                    Err(_) => String::from_utf8_lossy(&text).into_owned(),
                };
                reducer.text(&chars);
            }
            Ok(Event::CData(data)) => {
                reducer.text(&String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => {
                tracing::debug!(%error, "stopping fragment reduction on malformed markup");
                break;
            }
        }
    }

    reducer.finish()
}

/// Decodes a tag's attributes into owned key/value pairs, skipping any that
/// are malformed.
fn decode_attributes(
    reader: &Reader<&[u8]>,
    tag: &quick_xml::events::BytesStart<'_>,
) -> HashMap<String, String> {
    let decoder = reader.decoder();
    let mut attributes = HashMap::new();

    for attr_result in tag.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(error) => {
                tracing::debug!(%error, "skipping malformed attribute in content fragment");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.decode_and_unescape_value(decoder) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.insert(key, value);
    }

    attributes
}
