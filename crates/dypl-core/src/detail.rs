//! Typed view over the intercepted "aweme detail" payload.
//!
//! Only the handful of fields the pipeline needs are modelled; everything else
//! in the (large) payload is ignored. Every level defaults, so a payload with
//! missing branches still yields usable metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

#[derive(Debug, Default, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    aweme_detail: Option<AwemeDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct AwemeDetail {
    #[serde(default)]
    aweme_id: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    music: Option<Music>,
    #[serde(default)]
    video: Option<Video>,
    #[serde(default)]
    cover: Option<UrlList>,
}

#[derive(Debug, Default, Deserialize)]
struct Author {
    #[serde(default)]
    nickname: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Music {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Video {
    #[serde(default)]
    play_addr: Option<PlayAddr>,
    #[serde(default)]
    cover: Option<UrlList>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayAddr {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UrlList {
    /// The API sends `null` for the list and for single entries at times.
    #[serde(default)]
    url_list: Option<Vec<Option<String>>>,
}

impl UrlList {
    fn first(self) -> Option<String> {
        self.url_list
            .into_iter()
            .flatten()
            .flatten()
            .find(|u| !u.trim().is_empty())
    }
}

/// Metadata for one media item, ready for the download step.
///
/// Serializable so a parse result can be saved and downloaded later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub author: String,
    /// Default title: description, or the music title when the description is empty.
    pub title: String,
    /// Raw description; used as playlist lyrics.
    pub description: String,
    /// Opaque content locator for the play endpoint.
    pub video_uri: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub aweme_id: Option<String>,
    /// Page URL after redirects, when navigation settled.
    #[serde(default)]
    pub page_url: Option<String>,
}

impl VideoDetails {
    /// Builds metadata from a captured detail payload.
    ///
    /// Fails only when `detail` is not JSON-object-shaped at the fields we read
    /// (e.g. `aweme_detail` is a string); absent fields fall back to defaults.
    pub fn from_detail(detail: &Value, page_url: Option<String>) -> serde_json::Result<Self> {
        let parsed: DetailResponse = if detail.is_object() {
            serde_json::from_value(detail.clone())?
        } else {
            DetailResponse::default()
        };
        let d = parsed.aweme_detail.unwrap_or_default();

        let author = non_empty(d.author.and_then(|a| a.nickname))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let description = d.desc.unwrap_or_default();
        let title = non_empty(Some(description.clone()))
            .or_else(|| non_empty(d.music.and_then(|m| m.title)))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let (video_uri, video_cover) = match d.video {
            Some(v) => (
                non_empty(v.play_addr.and_then(|p| p.uri)),
                v.cover.and_then(|c| c.first()),
            ),
            None => (None, None),
        };
        let cover_url = video_cover.or_else(|| d.cover.and_then(|c| c.first()));

        Ok(Self {
            author,
            title,
            description,
            video_uri,
            cover_url,
            aweme_id: non_empty(d.aweme_id),
            page_url,
        })
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
