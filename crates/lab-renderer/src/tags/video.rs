//! `{% video "URL" %}` tag.
//!
//! Recognized URL shapes:
//! - `https://www.youtube.com/watch?v=ID`
//! - `https://youtu.be/ID`
//! - `https://www.youtube.com/embed/ID`
//! - `https://www.youtube.com/v/ID`
//! - `https://www.youtube.com/user/NAME#p/u/1/ID`
//!
//! A `list=PLAYLIST` query parameter is carried over to the player.

use std::fmt::Write;
use std::sync::LazyLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use super::RenderContext;

/// Length of a YouTube video id.
const VIDEO_ID_LEN: usize = 11;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|/v/|/u/\w+/|/embed/|[?&]v=)([A-Za-z0-9_-]+)")
        .expect("invalid video id regex")
});

static PLAYLIST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").expect("invalid playlist regex"));

const IFRAME_SANDBOX: &str = "allow-forms allow-scripts allow-pointer-lock allow-same-origin allow-top-navigation allow-presentation";
const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Video reference extracted from a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VideoRef {
    pub id: String,
    pub playlist: Option<String>,
}

/// Extract the video id and optional playlist id from a YouTube URL.
///
/// Returns `None` if no 11-character id is found.
pub(crate) fn parse_video_url(url: &str) -> Option<VideoRef> {
    let id = VIDEO_ID
        .captures_iter(url)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|id| id.len() == VIDEO_ID_LEN)?;

    let playlist = PLAYLIST_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned());

    Some(VideoRef {
        id: id.to_owned(),
        playlist,
    })
}

/// Render a video tag.
///
/// Returns `false` when the URL could not be resolved and a plain link was
/// emitted instead.
pub(crate) fn render(args: &str, ctx: &RenderContext, out: &mut String) -> bool {
    let url = super::args::unquote(args);

    let Some(video) = parse_video_url(&url) else {
        write!(
            out,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            encode_double_quoted_attribute(&url),
            encode_text(&url)
        )
        .unwrap();
        return false;
    };

    if ctx.hosted {
        render_embed(&video, out);
    } else {
        render_thumbnail(&video, out);
    }
    true
}

fn render_embed(video: &VideoRef, out: &mut String) {
    let mut src = format!("https://www.youtube.com/embed/{}", video.id);
    if let Some(list) = &video.playlist {
        write!(src, "?list={list}").unwrap();
    }

    write!(
        out,
        r#"<div class="ratio ratio-16x9"><iframe sandbox="{IFRAME_SANDBOX}" width="560" height="315" src="{src}" title="YouTube video player" frameborder="0" allow="{IFRAME_ALLOW}" allowfullscreen></iframe></div>"#
    )
    .unwrap();
}

fn render_thumbnail(video: &VideoRef, out: &mut String) {
    let mut href = format!("https://www.youtube.com/watch?v={}", video.id);
    if let Some(list) = &video.playlist {
        write!(href, "&amp;list={list}").unwrap();
    }

    write!(
        out,
        r#"<div class="ratio ratio-16x9 video-thumbnail"><a href="{href}" target="_blank" rel="noopener noreferrer"><img src="https://img.youtube.com/vi/{id}/hqdefault.jpg" alt="YouTube video player"></a></div>"#,
        id = video.id
    )
    .unwrap();
}
