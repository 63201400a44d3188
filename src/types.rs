use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    CarouselAlbum,
    Video,
    Other(String),
}

impl MediaType {
    /// Only these three can be shown as a card.
    pub fn is_displayable(&self) -> bool {
        !matches!(self, MediaType::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::CarouselAlbum => "CAROUSEL_ALBUM",
            MediaType::Video => "VIDEO",
            MediaType::Other(s) => s,
        }
    }
}

impl Default for MediaType {
    fn default() -> Self { MediaType::Other(String::new()) }
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IMAGE" => MediaType::Image,
            "CAROUSEL_ALBUM" => MediaType::CarouselAlbum,
            "VIDEO" => MediaType::Video,
            _ => MediaType::Other(s),
        }
    }
}

impl From<MediaType> for String {
    fn from(mt: MediaType) -> Self {
        mt.as_str().to_string()
    }
}

/// One record from the media listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Absent for some videos; the thumbnail stands in.
    #[serde(default)]
    pub media_url: String,
    pub permalink: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MediaItem {
    /// Videos prefer their thumbnail; everything else shows the media itself.
    pub fn display_image_url(&self) -> &str {
        match (&self.media_type, self.thumbnail_url.as_deref()) {
            (MediaType::Video, Some(thumb)) if !thumb.is_empty() => thumb,
            _ => &self.media_url,
        }
    }
}

/// Items in the order one fetch returned them.
pub type MediaBatch = Vec<MediaItem>;

/// Display projection of a selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub permalink: String,
    pub image_url: String,
    pub caption: Option<String>,
}
