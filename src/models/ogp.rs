use serde::{Deserialize, Serialize};

/// Open Graph metadata for one link, produced by a successful fetch.
///
/// Fields are private so a value cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgpMetadata {
    title: String,
    description: String,
    image_url: Option<String>,
    site_name: Option<String>,
}

impl OgpMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: None,
            site_name: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Empty when the page carries no description.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn site_name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }
}

/// JSON body returned by a metadata provider endpoint.
///
/// All fields are optional; a page may have no OG tags. Providers name the
/// image either `image` or `image_url`/`imageUrl`, and some send both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderPreview {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(alias = "siteName")]
    pub site_name: Option<String>,
}

impl ProviderPreview {
    /// The first non-blank image, `image` winning over `image_url`.
    pub fn image(&self) -> Option<&str> {
        [&self.image, &self.image_url]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|url| !url.is_empty())
    }
}
