//! Main-content extraction from fetched HTML
//!
//! The page is reduced to a plain-text document: title, main body text,
//! table data and meaningful image captions. Main-content selection walks a
//! fixed priority chain and stops at the first strategy that yields a block.

use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::fetch::PageFetcher;
use dom_query::{Document, NodeRef, Selection};
use tracing::{debug, info, warn};

/// Class/id substrings marking non-content regions
pub const BOILERPLATE_PATTERNS: &[&str] = &[
    "sidebar", "widget", "recent", "related", "footer", "nav", "menu",
    "advertisement", "ad-", "ads-", "advert", "sponsor", "promo",
    "comment", "share", "social", "newsletter", "subscribe",
    "breadcrumb", "pagination", "author-bio", "meta", "tags",
    "popular", "trending", "recommended", "also-read", "more-from",
];

/// Class/id substrings marking likely main-content regions
pub const CONTENT_PATTERNS: &[&str] = &[
    "content", "article", "post", "entry", "story", "body",
    "main", "text", "blog", "news", "prose",
];

/// Node kinds dropped before any text is read
const REMOVED_TAGS: &str = "script, style, noscript, iframe, embed, object";

/// Alt text mentioning these is decoration, not data
const CAPTION_SKIP_WORDS: &[&str] = &["logo", "icon", "avatar", "thumbnail", "profile"];

const TRUNCATION_MARKER: &str = "\n[Content truncated...]";

/// Which strategy produced the main text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// First `<article>` element
    ArticleTag,
    /// First `<main>` element
    MainTag,
    /// First div/section whose class/id looks like content
    ContentPattern,
    /// Largest remaining text block
    LargestTextBlock,
    /// Whole `<body>`
    BodyFallback,
    /// Whole document (no body)
    RawText,
    /// Concatenated long paragraphs
    ParagraphFallback,
}

impl ExtractionMethod {
    /// Human-readable name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::ArticleTag => "article tag",
            ExtractionMethod::MainTag => "main tag",
            ExtractionMethod::ContentPattern => "content class/id",
            ExtractionMethod::LargestTextBlock => "largest text block",
            ExtractionMethod::BodyFallback => "body fallback",
            ExtractionMethod::RawText => "raw text",
            ExtractionMethod::ParagraphFallback => "paragraph fallback",
        }
    }
}

/// Plain-text rendition of a page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    /// Page title, if one was found
    pub title: Option<String>,
    /// Main body text, one line per text run
    pub text: String,
    /// Rendered tables (without section header)
    pub tables: Vec<String>,
    /// Image captions as `[Image: ...]` lines
    pub image_captions: Vec<String>,
    /// Strategy that produced `text`
    pub method: ExtractionMethod,
}

impl ExtractedPage {
    /// Render the bounded document handed to the fact extractor
    pub fn render(&self, max_chars: usize) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("TITLE: {}\n\n", title));
        }
        out.push_str("MAIN CONTENT:\n");
        out.push_str(&self.text);

        if !self.tables.is_empty() {
            out.push_str("\n\n[TABLE DATA]\n");
            out.push_str(&self.tables.join("\n\n"));
        }
        if !self.image_captions.is_empty() {
            out.push_str("\n\n[IMAGE DESCRIPTIONS]\n");
            out.push_str(&self.image_captions.join("\n"));
        }

        truncate_chars(out, max_chars)
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}

/// Fetches pages and reduces them to bounded plain text
pub struct ContentExtractor {
    fetcher: PageFetcher,
    config: ResearchConfig,
}

impl ContentExtractor {
    /// Create an extractor from configuration
    pub fn new(config: ResearchConfig) -> Result<Self, ResearchError> {
        config.validate().map_err(ResearchError::Config)?;
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self { fetcher, config })
    }

    /// Create an extractor with a pre-built fetcher
    pub fn with_fetcher(fetcher: PageFetcher, config: ResearchConfig) -> Self {
        Self { fetcher, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Fetch `url` and return its rendered plain-text document
    pub async fn fetch_content(&self, url: &str) -> Result<String, ResearchError> {
        let html = self.fetcher.fetch(url).await?;
        let page = extract_page(&html, &self.config);
        let rendered = page.render(self.config.max_content_chars);
        info!(
            "Extracted {} characters from {} using {}",
            rendered.chars().count(),
            url,
            page.method.as_str()
        );
        Ok(rendered)
    }
}

/// Run the extraction heuristics over an HTML string
pub fn extract_page(html: &str, config: &ResearchConfig) -> ExtractedPage {
    let doc = Document::from(html);

    // Title, tables and captions are read before anything is removed
    let title = page_title(&doc);
    let tables = extract_tables(&doc);
    let image_captions = extract_image_captions(&doc, config);
    debug!(
        "Title: {:?}, {} tables, {} captions",
        title,
        tables.len(),
        image_captions.len()
    );

    doc.select(REMOVED_TAGS).remove();
    remove_boilerplate(&doc);

    let (mut text, mut method) = match select_main_content(&doc) {
        Some((node, method)) => (text_lines(&node).join("\n"), method),
        None => (String::new(), ExtractionMethod::RawText),
    };
    debug!("Extraction method: {}", method.as_str());

    if text.chars().count() < config.min_content_chars {
        warn!(
            "Extracted content too short ({} chars), trying paragraph fallback",
            text.chars().count()
        );
        let paragraphs = paragraph_text(&doc, config.min_paragraph_chars);
        if paragraphs.chars().count() > text.chars().count() {
            text = paragraphs;
            method = ExtractionMethod::ParagraphFallback;
        }
    }

    ExtractedPage {
        title,
        text,
        tables,
        image_captions,
        method,
    }
}

/// Walk the main-content priority chain
fn select_main_content<'a>(doc: &'a Document) -> Option<(NodeRef<'a>, ExtractionMethod)> {
    if let Some(node) = doc.select("article").nodes().first() {
        return Some((*node, ExtractionMethod::ArticleTag));
    }
    if let Some(node) = doc.select("main").nodes().first() {
        return Some((*node, ExtractionMethod::MainTag));
    }

    let content_block = doc
        .select("div, section")
        .nodes()
        .iter()
        .find(|node| is_content_like(node) && text_density(node).0 > 200)
        .copied();
    if let Some(node) = content_block {
        return Some((node, ExtractionMethod::ContentPattern));
    }

    if let Some(node) = largest_text_block(doc) {
        return Some((node, ExtractionMethod::LargestTextBlock));
    }

    if let Some(node) = doc.select("body").nodes().first() {
        return Some((*node, ExtractionMethod::BodyFallback));
    }
    doc.select("html")
        .nodes()
        .first()
        .map(|node| (*node, ExtractionMethod::RawText))
}

/// Candidate with the most text, ties broken by text per descendant tag
fn largest_text_block<'a>(doc: &'a Document) -> Option<NodeRef<'a>> {
    let mut best: Option<(NodeRef<'a>, usize, f64)> = None;

    for node in doc.select("div, section, article, main").nodes() {
        if is_boilerplate(node) {
            continue;
        }
        let (text_len, tag_count) = text_density(node);
        if text_len < 200 {
            continue;
        }
        let density = text_len as f64 / tag_count.max(1) as f64;

        let better = match &best {
            None => true,
            Some((_, best_len, best_density)) => {
                text_len > *best_len || (text_len == *best_len && density > *best_density)
            }
        };
        if better {
            best = Some((*node, text_len, density));
        }
    }

    best.map(|(node, _, _)| node)
}

fn identifiers(node: &NodeRef) -> String {
    let sel = Selection::from(*node);
    let class = sel.attr("class").map(|c| c.to_lowercase()).unwrap_or_default();
    let id = sel.attr("id").map(|i| i.to_lowercase()).unwrap_or_default();
    format!("{} {}", class, id)
}

fn is_boilerplate(node: &NodeRef) -> bool {
    let ids = identifiers(node);
    BOILERPLATE_PATTERNS.iter().any(|p| ids.contains(p))
}

fn is_content_like(node: &NodeRef) -> bool {
    let ids = identifiers(node);
    CONTENT_PATTERNS.iter().any(|p| ids.contains(p))
}

/// Remove every boilerplate-marked element except the document skeleton
fn remove_boilerplate(doc: &Document) {
    let doomed: Vec<NodeRef> = doc
        .select("*")
        .nodes()
        .iter()
        .filter(|node| {
            let skeleton = node
                .node_name()
                .is_some_and(|name| matches!(&*name, "html" | "head" | "body"));
            !skeleton && is_boilerplate(node)
        })
        .copied()
        .collect();

    debug!("Removing {} boilerplate elements", doomed.len());
    for node in doomed {
        Selection::from(node).remove();
    }
}

/// (stripped text length, descendant element count)
fn text_density(node: &NodeRef) -> (usize, usize) {
    let mut text_len = 0;
    let mut tags = 0;
    for child in node.descendants() {
        if child.is_text() {
            text_len += child.text().trim().chars().count();
        } else if child.is_element() {
            tags += 1;
        }
    }
    (text_len, tags)
}

/// Trimmed, non-empty text lines under a node in document order
fn text_lines(node: &NodeRef) -> Vec<String> {
    let mut lines = Vec::new();
    for child in node.descendants() {
        if !child.is_text() {
            continue;
        }
        let text = child.text();
        lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }
    lines
}

/// Whitespace-collapsed text of a selection
fn compact_text(sel: &Selection) -> String {
    sel.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn paragraph_text(doc: &Document, min_chars: usize) -> String {
    doc.select("p")
        .nodes()
        .iter()
        .map(|node| compact_text(&Selection::from(*node)))
        .filter(|text| text.chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<title>` up to its first site-name separator, else the first `<h1>`
fn page_title(doc: &Document) -> Option<String> {
    if let Some(node) = doc.select("title").nodes().first() {
        let raw = compact_text(&Selection::from(*node));
        let title = strip_title_suffix(&raw);
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }
    doc.select("h1")
        .nodes()
        .first()
        .map(|node| compact_text(&Selection::from(*node)))
        .filter(|h1| !h1.is_empty())
}

/// Cut a title at `|`, `–`, `—`, or a hyphen preceded by whitespace
fn strip_title_suffix(title: &str) -> &str {
    let mut prev_space = false;
    for (idx, ch) in title.char_indices() {
        let separator = match ch {
            '|' | '–' | '—' => true,
            '-' => prev_space,
            _ => false,
        };
        if separator {
            return title[..idx].trim();
        }
        prev_space = ch.is_whitespace();
    }
    title.trim()
}

fn extract_tables(doc: &Document) -> Vec<String> {
    let mut tables = Vec::new();

    for table in doc.select("table").nodes() {
        if is_boilerplate(table) {
            continue;
        }
        let table_sel = Selection::from(*table);
        let mut lines = Vec::new();

        let headers: Vec<String> = table_sel
            .select("th")
            .nodes()
            .iter()
            .map(|th| compact_text(&Selection::from(*th)))
            .collect();
        if !headers.is_empty() {
            lines.push(headers.join(" | "));
            lines.push("-".repeat(40));
        }

        for row in table_sel.select("tr").nodes() {
            let cells: Vec<String> = Selection::from(*row)
                .select("td, th")
                .nodes()
                .iter()
                .map(|cell| compact_text(&Selection::from(*cell)))
                .collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            lines.push(cells.join(" | "));
        }

        if !lines.is_empty() {
            tables.push(lines.join("\n"));
        }
    }

    tables
}

fn extract_image_captions(doc: &Document, config: &ResearchConfig) -> Vec<String> {
    doc.select("img")
        .nodes()
        .iter()
        .filter_map(|img| Selection::from(*img).attr("alt").map(|alt| alt.trim().to_string()))
        .filter(|alt| alt.chars().count() > config.min_caption_chars)
        .filter(|alt| {
            let lower = alt.to_lowercase();
            !CAPTION_SKIP_WORDS.iter().any(|skip| lower.contains(skip))
        })
        .take(config.max_image_captions)
        .map(|alt| format!("[Image: {}]", alt))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &str = "Retailers that invested in demand sensing cut forecast error by a third \
        while holding inventory flat, according to survey respondents across grocery, apparel \
        and general merchandise. Most expect the gains to compound as planners retire manual \
        overrides and let models drive replenishment decisions.";

    fn config() -> ResearchConfig {
        ResearchConfig::default()
    }

    #[test]
    fn test_article_wins_and_sidebar_is_ignored() {
        let html = format!(
            r#"<html><head><title>Demand Sensing Study | Example News</title></head>
            <body>
              <nav class="site-nav">Home About Contact</nav>
              <div class="sidebar">Trending now: celebrity gossip</div>
              <article><h2>Findings</h2><p>{}</p></article>
              <footer>Copyright</footer>
            </body></html>"#,
            LOREM
        );
        let page = extract_page(&html, &config());
        assert_eq!(page.method, ExtractionMethod::ArticleTag);
        assert_eq!(page.title.as_deref(), Some("Demand Sensing Study"));
        assert!(page.text.starts_with("Findings\nRetailers that invested"));
        assert!(!page.text.contains("Trending"));
        assert!(!page.text.contains("Home About"));
    }

    #[test]
    fn test_boilerplate_inside_article_is_removed() {
        let html = format!(
            r#"<body><article><p>{}</p><div class="share-buttons">Share on LinkedIn</div></article></body>"#,
            LOREM
        );
        let page = extract_page(&html, &config());
        assert!(!page.text.contains("Share on LinkedIn"));
    }

    #[test]
    fn test_main_then_content_pattern() {
        let html = format!(r#"<body><main><p>{}</p></main></body>"#, LOREM);
        assert_eq!(extract_page(&html, &config()).method, ExtractionMethod::MainTag);

        let html = format!(
            r#"<body><div class="wrapper"><div class="entry-content"><p>{}</p></div></div></body>"#,
            LOREM
        );
        assert_eq!(extract_page(&html, &config()).method, ExtractionMethod::ContentPattern);
    }

    #[test]
    fn test_largest_text_block() {
        let html = format!(
            r#"<body><div id="a"><p>short</p></div><div id="b"><p>{}</p><p>{}</p></div></body>"#,
            LOREM, LOREM
        );
        let page = extract_page(&html, &config());
        assert_eq!(page.method, ExtractionMethod::LargestTextBlock);
        assert!(!page.text.contains("short"));
    }

    #[test]
    fn test_body_then_paragraph_fallback() {
        let html = "<body><span>tiny page</span></body>";
        let page = extract_page(html, &config());
        assert_eq!(page.method, ExtractionMethod::BodyFallback);
        assert_eq!(page.text, "tiny page");

        // Body text is short and split into many runs; long paragraphs are preferred
        let html = "<body><p>This paragraph is comfortably longer than fifty characters in total.</p>\
                    <p>too short</p></body>";
        let page = extract_page(html, &config());
        assert_eq!(page.method, ExtractionMethod::BodyFallback);
    }

    #[test]
    fn test_paragraph_fallback_when_longer() {
        let long_p = "A paragraph with <b>inline</b> markup that runs well beyond fifty characters.";
        let html = format!(
            r#"<body><article><p>tiny</p></article><p>{}</p></body>"#,
            long_p
        );
        let page = extract_page(&html, &config());
        assert_eq!(page.method, ExtractionMethod::ParagraphFallback);
        assert_eq!(
            page.text,
            "A paragraph with inline markup that runs well beyond fifty characters."
        );
    }

    #[test]
    fn test_scripts_are_dropped() {
        let html = format!(
            r#"<body><article><script>var tracking = 1;</script><style>p {{}}</style><p>{}</p></article></body>"#,
            LOREM
        );
        let page = extract_page(&html, &config());
        assert!(!page.text.contains("tracking"));
        assert!(!page.text.contains("p {}"));
    }

    #[test]
    fn test_title_separators() {
        assert_eq!(strip_title_suffix("Report - Gartner"), "Report");
        assert_eq!(strip_title_suffix("Report — Gartner"), "Report");
        assert_eq!(strip_title_suffix("Wal-Mart results | Reuters"), "Wal-Mart results");
        assert_eq!(strip_title_suffix("  Plain title "), "Plain title");

        let doc = Document::from("<html><head><title>| Site</title></head><body><h1>Heading</h1></body></html>");
        assert_eq!(page_title(&doc).as_deref(), Some("Heading"));
    }

    #[test]
    fn test_tables_and_captions() {
        let html = format!(
            r#"<body>
              <article><p>{}</p></article>
              <table>
                <tr><th>Region</th><th>Growth</th></tr>
                <tr><td>North</td><td>12%</td></tr>
                <tr><td></td><td></td></tr>
              </table>
              <table class="related-links"><tr><td>skip</td></tr></table>
              <img alt="Company logo for the publisher site">
              <img alt="Bar chart of on-shelf availability by quarter">
              <img alt="short">
            </body>"#,
            LOREM
        );
        let page = extract_page(&html, &config());
        // the header row repeats under the rule
        assert_eq!(
            page.tables,
            vec![format!("Region | Growth\n{}\nRegion | Growth\nNorth | 12%", "-".repeat(40))]
        );
        assert_eq!(
            page.image_captions,
            vec!["[Image: Bar chart of on-shelf availability by quarter]".to_string()]
        );

        let rendered = page.render(8_000);
        assert!(rendered.starts_with("MAIN CONTENT:\n"));
        assert!(rendered.contains("\n\n[TABLE DATA]\nRegion | Growth"));
        assert!(rendered.contains("\n\n[IMAGE DESCRIPTIONS]\n[Image: Bar chart"));
    }

    #[test]
    fn test_caption_limit() {
        let imgs: String = (0..15)
            .map(|i| format!(r#"<img alt="Chart number {} showing freight volumes">"#, i))
            .collect();
        let html = format!("<body>{}</body>", imgs);
        let page = extract_page(&html, &config());
        assert_eq!(page.image_captions.len(), 10);
    }

    #[test]
    fn test_render_truncates() {
        let page = ExtractedPage {
            title: Some("T".to_string()),
            text: "x".repeat(9_000),
            tables: Vec::new(),
            image_captions: Vec::new(),
            method: ExtractionMethod::BodyFallback,
        };
        let rendered = page.render(8_000);
        assert!(rendered.ends_with("\n[Content truncated...]"));
        assert_eq!(rendered.chars().count(), 8_000 + TRUNCATION_MARKER.chars().count());
        assert!(rendered.starts_with("TITLE: T\n\nMAIN CONTENT:\nxxx"));
    }
}
