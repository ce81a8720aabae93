//! External link targeting.
//!
//! Anchors with a non-empty `href` and `rel="external"` open in a new
//! browsing context (`target="_blank"`). The rule applies either to anchor
//! values or to `<a>` start tags inside an HTML string.

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const EXTERNAL_REL: &str = "external";
const BLANK_TARGET: &str = "_blank";

static ANCHOR_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<a\b[^>]*>").expect("valid anchor tag regex"));
static TAG_ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid tag attribute regex")
});

/// Link attributes relevant to targeting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub target: Option<String>,
}

impl Anchor {
    fn is_external(&self) -> bool {
        is_external(self.href.as_deref(), self.rel.as_deref())
    }
}

/// Sets `target="_blank"` on external anchors; returns how many qualified.
pub fn open_external_links(anchors: &mut [Anchor]) -> usize {
    let mut changed = 0;
    for anchor in anchors.iter_mut().filter(|anchor| anchor.is_external()) {
        anchor.target = Some(BLANK_TARGET.to_string());
        changed += 1;
    }
    changed
}

/// Applies [`open_external_links`] to every `<a>` start tag in `html`.
///
/// An existing `target` is overwritten; otherwise one is inserted after the
/// last attribute. Text outside qualifying tags is untouched.
pub fn rewrite_external_links(html: &str) -> String {
    let mut changed = 0usize;
    let rewritten = ANCHOR_TAG_RE.replace_all(html, |caps: &Captures<'_>| {
        let tag = &caps[0];
        match rewrite_anchor_tag(tag) {
            Some(updated) => {
                changed += 1;
                updated
            }
            None => tag.to_string(),
        }
    });
    debug!(
        "event=external_links module=links status=ok rewritten={}",
        changed
    );
    rewritten.into_owned()
}

fn rewrite_anchor_tag(tag: &str) -> Option<String> {
    // `<a` prefix and `>` suffix are guaranteed by ANCHOR_TAG_RE.
    let body_start = 2;
    let body = &tag[body_start..tag.len() - 1];

    let mut href = None;
    let mut rel = None;
    let mut target_span = None;
    let mut last_attr_end = body_start;
    for caps in TAG_ATTRIBUTE_RE.captures_iter(body) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        last_attr_end = body_start + whole.end();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        match caps[1].to_ascii_lowercase().as_str() {
            "href" if href.is_none() => href = Some(value),
            "rel" if rel.is_none() => rel = Some(value),
            "target" if target_span.is_none() => {
                target_span = Some((body_start + whole.start(), body_start + whole.end()))
            }
            _ => {}
        }
    }

    if !is_external(href, rel) {
        return None;
    }

    let replacement = format!("target=\"{BLANK_TARGET}\"");
    let updated = match target_span {
        Some((start, end)) => format!("{}{}{}", &tag[..start], replacement, &tag[end..]),
        // After the last attribute, so a `/` ending an unquoted value stays put.
        None => format!(
            "{} {}{}",
            &tag[..last_attr_end],
            replacement,
            &tag[last_attr_end..]
        ),
    };
    Some(updated)
}

fn is_external(href: Option<&str>, rel: Option<&str>) -> bool {
    href.is_some_and(|href| !href.is_empty()) && rel == Some(EXTERNAL_REL)
}
