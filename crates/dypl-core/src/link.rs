//! Share-link extraction from pasted promotional text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PipelineError, Result};

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern must compile"));

/// Returns the first `http://` or `https://` run of non-whitespace in `text`.
///
/// No normalization is applied: trailing punctuation glued to the URL is kept,
/// exactly as pasted.
pub fn extract_link(text: &str) -> Result<&str> {
    URL_REGEX
        .find(text)
        .map(|m| m.as_str())
        .ok_or(PipelineError::NoLinkFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_link_inside_share_text() {
        assert_eq!(
            extract_link("look: https://v.example.com/abc123/").unwrap(),
            "https://v.example.com/abc123/"
        );
        let promo = "7.43 复制打开抖音，看看【作者的作品】 https://v.douyin.com/iRNBho6u/ a@b.cn 08/21";
        assert_eq!(extract_link(promo).unwrap(), "https://v.douyin.com/iRNBho6u/");
    }

    #[test]
    fn first_of_several_wins() {
        assert_eq!(
            extract_link("http://a.example/1 https://b.example/2").unwrap(),
            "http://a.example/1"
        );
    }

    #[test]
    fn no_link_is_an_error() {
        assert!(matches!(
            extract_link("nothing to see here, ftp://x.example"),
            Err(PipelineError::NoLinkFound)
        ));
        assert!(matches!(extract_link(""), Err(PipelineError::NoLinkFound)));
    }

    #[test]
    fn scheme_alone_is_not_a_link() {
        assert!(extract_link("https:// spaced").is_err());
    }
}
