use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::error::FetchError;
use crate::models::{LinkTarget, OgpMetadata};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:image"]"#));
static OG_SITE_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:site_name"]"#));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));

/// Parse Open Graph tags from `html` fetched from `target`.
///
/// Falls back to `<title>` for the title, `<meta name="description">` for the
/// description and the hostname for site_name. A page without any usable
/// title yields `MissingMetadata`.
pub fn extract_og_data(html: &str, target: &LinkTarget) -> Result<OgpMetadata, FetchError> {
    let document = Html::parse_document(html);
    let content = |sel: &Selector| meta_content(&document, sel);

    let title = content(&OG_TITLE)
        .or_else(|| title_text(&document))
        .ok_or_else(|| FetchError::MissingMetadata(target.to_string()))?;
    let description = content(&OG_DESCRIPTION)
        .or_else(|| content(&DESCRIPTION))
        .unwrap_or_default();
    let site_name = content(&OG_SITE_NAME).unwrap_or_else(|| target.host().to_string());

    let mut metadata = OgpMetadata::new(title, description).with_site_name(site_name);
    if let Some(image) =
        content(&OG_IMAGE).and_then(|raw| resolve_image_url(raw.trim(), target.as_url()))
    {
        metadata = metadata.with_image_url(image);
    }
    Ok(metadata)
}

/// Keep an absolute http(s) image URL exactly as written; resolve a relative
/// one against the page it came from.
pub(crate) fn resolve_image_url(raw: &str, page: &Url) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw.to_string()),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => page.join(raw).ok().map(String::from),
        Err(_) => None,
    }
}

/// `content` of the first tag matching `sel`, as written. Blank counts as
/// absent.
fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .filter_map(|el| el.value().attr("content"))
        .find(|content| !content.trim().is_empty())
        .map(str::to_string)
}

fn title_text(doc: &Html) -> Option<String> {
    let text: String = doc.select(&TITLE).next()?.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
