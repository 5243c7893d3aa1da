//! Raw HTML -> plain text plus link and image references.
//!
//! Pattern based, not a parser: malformed markup degrades to best-effort
//! text. Entities are left as-is.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href=['"]?([^'" >]+)"#).unwrap());
static SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src=['"]?([^'" >]+)"#).unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    /// `href=` targets in document order, duplicates kept.
    pub links: Vec<String>,
    /// `src=` values in document order, duplicates kept.
    pub images: Vec<String>,
}

pub fn normalize(html: &str) -> Normalized {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let cleaned = STYLE_RE.replace_all(&without_scripts, "");

    let links = capture_all(&HREF_RE, &cleaned);
    let images = capture_all(&SRC_RE, &cleaned);

    let spaced = TAG_RE.replace_all(&cleaned, " ");
    let text = WS_RE.replace_all(&spaced, " ").trim().to_string();

    Normalized {
        text,
        links,
        images,
    }
}

fn capture_all(re: &Regex, haystack: &str) -> Vec<String> {
    re.captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
