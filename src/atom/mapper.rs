//! Mapping of raw Atom field maps into normalized payloads.

use url::Url;

use crate::atom::content::reduce_fragment;
use crate::atom::date::{AtomDateParser, DateDiagnostics, TracingDiagnostics};
use crate::icon::{FaviconResolver, IconResolver};
use crate::model::{FeedPayload, MappingError, PostPayload, RawFieldMap};
use crate::util::{HtmlTextCleaner, TextCleaner};

/// Maps raw field maps to [`PostPayload`] / [`FeedPayload`] records.
///
/// The mapper owns its outward capabilities (text cleaning, icon resolution,
/// date diagnostics) as values handed in at construction. It holds no other
/// state, so construct one per worker task and map away.
#[derive(Debug, Clone)]
pub struct AtomMapper<C = HtmlTextCleaner, I = FaviconResolver, D = TracingDiagnostics> {
    cleaner: C,
    icons: I,
    dates: AtomDateParser<D>,
}

impl AtomMapper {
    /// A mapper with the stock capabilities: HTML-stripping text cleaner,
    /// favicon-service icon resolver, tracing date diagnostics.
    pub fn new() -> Self {
        Self {
            cleaner: HtmlTextCleaner,
            icons: FaviconResolver,
            dates: AtomDateParser::new(),
        }
    }
}

impl Default for AtomMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, I, D> AtomMapper<C, I, D>
where
    C: TextCleaner,
    I: IconResolver,
    D: DateDiagnostics,
{
    pub fn with_capabilities(cleaner: C, icons: I, dates: AtomDateParser<D>) -> Self {
        Self {
            cleaner,
            icons,
            dates,
        }
    }

    /// Builds a normalized post from one entry's field map.
    ///
    /// The entry's `content` fragment is reduced for the description and a
    /// fallback image; a pre-supplied non-blank `imageUrl` field always
    /// overrides whatever the fragment yields. Feeds depend on both rules, so
    /// they are load-bearing, not incidental.
    ///
    /// # Errors
    ///
    /// [`MappingError::MissingField`] if `title` (after cleaning) or `link`
    /// (after trimming) comes out absent or empty.
    pub fn map_post(&self, fields: &RawFieldMap) -> Result<PostPayload, MappingError> {
        let link = fields.required("link")?.to_owned();

        let reduced = reduce_fragment(fields.get("content").unwrap_or_default());

        let supplied_image = fields
            .get("imageUrl")
            .filter(|value| !value.trim().is_empty());
        let image_url = supplied_image.map(str::to_owned).or(reduced.image_url);

        let title = self
            .cleaner
            .clean_text(fields.get("title"))
            .filter(|title| !title.is_empty())
            .ok_or(MappingError::MissingField("title"))?;

        Ok(PostPayload {
            title,
            link,
            description: reduced.content,
            image_url,
            date: self.dates.parse(fields.get("published")),
        })
    }

    /// Maps a batch of entry field maps, skipping entries that fail.
    ///
    /// The skip is logged; source order is preserved for the survivors.
    pub fn map_posts(&self, items: &[RawFieldMap]) -> Vec<PostPayload> {
        items
            .iter()
            .filter_map(|fields| match self.map_post(fields) {
                Ok(post) => Some(post),
                Err(error) => {
                    tracing::warn!(%error, "skipping entry that failed normalization");
                    None
                }
            })
            .collect()
    }

    /// Builds a normalized feed from its field map and already-mapped posts.
    ///
    /// `feed_url` is the URL the feed XML was fetched from and becomes the
    /// payload's `link`; the feed's own `link` field is its homepage. The
    /// given posts pass through untouched, order preserved.
    ///
    /// # Errors
    ///
    /// [`MappingError::MissingField`] if the homepage `link` or cleaned
    /// `title` is absent or empty; [`MappingError::InvalidHomepage`] if the
    /// homepage does not parse as a URL.
    pub fn map_feed(
        &self,
        feed_url: &str,
        fields: &RawFieldMap,
        posts: Vec<PostPayload>,
    ) -> Result<FeedPayload, MappingError> {
        let homepage = fields.required("link")?;
        let icon = self.icons.resolve_icon(&icon_host(homepage)?);

        let name = self
            .cleaner
            .clean_text(fields.get("title"))
            .filter(|name| !name.is_empty())
            .ok_or(MappingError::MissingField("title"))?;
        let description = self
            .cleaner
            .clean_text(fields.get("subtitle"))
            .unwrap_or_default();

        Ok(FeedPayload {
            name,
            homepage_link: homepage.to_owned(),
            link: feed_url.to_owned(),
            description,
            icon,
            posts,
        })
    }
}

/// Derives the host to key icon lookups on.
///
/// Test and self-hosted feeds often advertise a `localhost` homepage whose
/// host is useless for icon lookup; the first space-delimited token of the
/// first path segment stands in for it. The segment is percent-decoded first
/// because the URL parser encodes the spaces we split on.
fn icon_host(homepage: &str) -> Result<String, MappingError> {
    let parsed = Url::parse(homepage)?;
    let host = parsed.host_str().unwrap_or_default();
    if host != "localhost" {
        return Ok(host.to_owned());
    }

    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .unwrap_or_default();
    let decoded = percent_encoding::percent_decode_str(first_segment).decode_utf8_lossy();

    Ok(decoded
        .split(' ')
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post_fields() -> RawFieldMap {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "T");
        fields.insert("link", "http://l");
        fields.insert("published", "2023-05-01T12:00:00+0000");
        fields.insert("content", "<p>Hello <img src='http://x/i.png'/> world</p>");
        fields
    }

    #[test]
    fn test_map_post_round_trip() {
        let post = AtomMapper::new().map_post(&post_fields()).unwrap();

        assert_eq!(
            post,
            PostPayload {
                title: "T".to_owned(),
                link: "http://l".to_owned(),
                description: "Hello  world".to_owned(),
                image_url: Some("http://x/i.png".to_owned()),
                date: 1_682_942_400_000,
            }
        );
    }

    #[test]
    fn test_map_post_trims_link() {
        let mut fields = post_fields();
        fields.insert("link", "  http://l  ");
        let post = AtomMapper::new().map_post(&fields).unwrap();
        assert_eq!(post.link, "http://l");
    }

    #[test]
    fn test_map_post_missing_title_fails() {
        let mut fields = RawFieldMap::new();
        fields.insert("link", "http://l");
        let err = AtomMapper::new().map_post(&fields).unwrap_err();
        assert!(matches!(err, MappingError::MissingField("title")));
    }

    #[test]
    fn test_map_post_missing_link_fails() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "T");
        let err = AtomMapper::new().map_post(&fields).unwrap_err();
        assert!(matches!(err, MappingError::MissingField("link")));
    }

    #[test]
    fn test_map_post_title_empty_after_cleaning_fails() {
        let mut fields = post_fields();
        fields.insert("title", "<b></b>");
        let err = AtomMapper::new().map_post(&fields).unwrap_err();
        assert!(matches!(err, MappingError::MissingField("title")));
    }

    #[test]
    fn test_supplied_image_overrides_fragment_capture() {
        let mut fields = post_fields();
        fields.insert("imageUrl", "http://cdn/override.png");
        let post = AtomMapper::new().map_post(&fields).unwrap();
        assert_eq!(post.image_url.as_deref(), Some("http://cdn/override.png"));
    }

    #[test]
    fn test_blank_supplied_image_falls_back_to_fragment() {
        let mut fields = post_fields();
        fields.insert("imageUrl", "   ");
        let post = AtomMapper::new().map_post(&fields).unwrap();
        assert_eq!(post.image_url.as_deref(), Some("http://x/i.png"));
    }

    #[test]
    fn test_map_post_without_content_or_image() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "T");
        fields.insert("link", "http://l");
        let post = AtomMapper::new().map_post(&fields).unwrap();
        assert_eq!(post.description, "");
        assert_eq!(post.image_url, None);
        assert_eq!(post.date, 0);
    }

    #[test]
    fn test_description_never_falls_back_to_supplied_fields() {
        // Only the reduced fragment feeds the description.
        let mut fields = RawFieldMap::new();
        fields.insert("title", "T");
        fields.insert("link", "http://l");
        fields.insert("content", "<div>not summary material</div>");
        let post = AtomMapper::new().map_post(&fields).unwrap();
        assert_eq!(post.description, "");
    }

    #[test]
    fn test_map_posts_skips_failures_and_keeps_order() {
        let good_one = post_fields();
        let mut bad = RawFieldMap::new();
        bad.insert("title", "no link");
        let mut good_two = post_fields();
        good_two.insert("title", "Second");

        let posts = AtomMapper::new().map_posts(&[good_one, bad, good_two]);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "T");
        assert_eq!(posts[1].title, "Second");
    }

    fn feed_fields() -> RawFieldMap {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "Example Blog");
        fields.insert("link", "https://example.com/blog");
        fields.insert("subtitle", "Things &amp; stuff");
        fields
    }

    #[test]
    fn test_map_feed_assembles_payload() {
        let posts = vec![AtomMapper::new().map_post(&post_fields()).unwrap()];
        let feed = AtomMapper::new()
            .map_feed("https://example.com/feed.xml", &feed_fields(), posts.clone())
            .unwrap();

        assert_eq!(
            feed,
            FeedPayload {
                name: "Example Blog".to_owned(),
                homepage_link: "https://example.com/blog".to_owned(),
                link: "https://example.com/feed.xml".to_owned(),
                description: "Things & stuff".to_owned(),
                icon: "https://icon.horse/icon/example.com".to_owned(),
                posts,
            }
        );
    }

    #[test]
    fn test_map_feed_preserves_post_order_and_count() {
        let mapper = AtomMapper::new();
        let mut posts = Vec::new();
        for i in 0..5 {
            let mut fields = post_fields();
            fields.insert("title", format!("Post {i}"));
            posts.push(mapper.map_post(&fields).unwrap());
        }

        let feed = mapper
            .map_feed("https://example.com/feed.xml", &feed_fields(), posts.clone())
            .unwrap();
        assert_eq!(feed.posts, posts);
    }

    #[test]
    fn test_map_feed_missing_link_fails() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "Example Blog");
        let err = AtomMapper::new()
            .map_feed("https://example.com/feed.xml", &fields, Vec::new())
            .unwrap_err();
        assert!(matches!(err, MappingError::MissingField("link")));
    }

    #[test]
    fn test_map_feed_missing_title_fails() {
        let mut fields = RawFieldMap::new();
        fields.insert("link", "https://example.com");
        let err = AtomMapper::new()
            .map_feed("https://example.com/feed.xml", &fields, Vec::new())
            .unwrap_err();
        assert!(matches!(err, MappingError::MissingField("title")));
    }

    #[test]
    fn test_map_feed_unparseable_homepage_fails() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "Example Blog");
        fields.insert("link", "not a url");
        let err = AtomMapper::new()
            .map_feed("https://example.com/feed.xml", &fields, Vec::new())
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidHomepage(_)));
    }

    #[test]
    fn test_map_feed_missing_subtitle_yields_empty_description() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "Example Blog");
        fields.insert("link", "https://example.com");
        let feed = AtomMapper::new()
            .map_feed("https://example.com/feed.xml", &fields, Vec::new())
            .unwrap();
        assert_eq!(feed.description, "");
    }

    #[test]
    fn test_icon_host_is_the_homepage_host() {
        assert_eq!(icon_host("https://blog.example.com/p").unwrap(), "blog.example.com");
    }

    #[test]
    fn test_icon_host_localhost_uses_first_path_token() {
        assert_eq!(icon_host("http://localhost/My Feed Name").unwrap(), "My");
    }

    #[test]
    fn test_icon_host_localhost_with_single_segment() {
        assert_eq!(icon_host("http://localhost/myfeed").unwrap(), "myfeed");
    }

    #[test]
    fn test_icon_host_localhost_without_path_is_empty() {
        assert_eq!(icon_host("http://localhost").unwrap(), "");
    }
}
