//! Content extraction: frontmatter, title, tags and outbound links.
//!
//! Links are returned as authored (wikilink targets untouched apart from
//! alias/heading removal). Only markdown-style links are rewritten into
//! vault-relative paths, because their meaning depends on the source note's
//! directory.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

use super::types::NoteMeta;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```.*?```|~~~.*?~~~").expect("valid regex");
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]*`").expect("valid regex");
    static ref WIKILINK: Regex = Regex::new(r"\[\[([^\[\]]+?)\]\]").expect("valid regex");
    static ref MD_LINK: Regex = Regex::new(r"\[[^\[\]]*\]\(([^()]*)\)").expect("valid regex");
    static ref INLINE_TAG: Regex =
        Regex::new(r"(?:^|[\s(,])#(\p{L}[\p{L}\p{N}_/-]*)").expect("valid regex");
    static ref H1: Regex = Regex::new(r"(?m)^#[ \t]+(.+?)[ \t#]*$").expect("valid regex");
}

/// Everything the extractor pulls out of one note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub meta: NoteMeta,
    pub title: String,
    pub tags: BTreeSet<String>,
    pub outlinks: Vec<String>,
}

/// Run the full extractor over a note's raw text.
pub fn extract(id: &str, text: &str, extension: &str) -> Extracted {
    let (yaml, body) = split_frontmatter(text);
    let meta = yaml.map(|y| parse_meta(id, y)).unwrap_or_default();

    // Links, tags and headings inside code are not structure.
    let without_fences = CODE_FENCE.replace_all(body, " ");
    let prose = INLINE_CODE.replace_all(&without_fences, " ");

    let title = meta
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| H1.captures(&prose).map(|c| c[1].trim().to_string()))
        .unwrap_or_else(|| base_name(id, extension).to_string());

    let mut tags: BTreeSet<String> = meta.tags.iter().filter_map(|t| normalize_tag(t)).collect();
    tags.extend(
        INLINE_TAG
            .captures_iter(&prose)
            .filter_map(|c| normalize_tag(&c[1])),
    );

    let outlinks = extract_outlinks(id, &prose);

    Extracted {
        meta,
        title,
        tags,
        outlinks,
    }
}

/// Split a leading `---` YAML block from the body.
///
/// Returns `(None, text)` when there is no well-formed frontmatter.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(after_open) = trimmed
        .strip_prefix("---\n")
        .or_else(|| trimmed.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    // Closing delimiter may directly follow the opening one (empty block).
    let (yaml, rest) = if let Some(rest) = after_open.strip_prefix("---") {
        ("", rest)
    } else {
        match after_open.find("\n---") {
            Some(end) => (&after_open[..end], &after_open[end + 4..]),
            None => return (None, text),
        }
    };

    let body = match rest.find('\n') {
        Some(nl) if rest[..nl].trim().is_empty() => &rest[nl + 1..],
        Some(_) => return (None, text),
        None if rest.trim().is_empty() => "",
        None => return (None, text),
    };
    (Some(yaml), body)
}

fn parse_meta(id: &str, yaml: &str) -> NoteMeta {
    if yaml.trim().is_empty() {
        return NoteMeta::default();
    }
    serde_yaml::from_str(yaml).unwrap_or_else(|e| {
        debug!(id, error = %e, "ignoring unparseable frontmatter");
        NoteMeta::default()
    })
}

/// Lowercase a tag and strip its leading `#`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Last path segment of an id with the note extension removed.
///
/// `notes/Rust Ownership.md` -> `Rust Ownership`
pub fn base_name<'a>(id: &'a str, extension: &str) -> &'a str {
    let file = id.rsplit('/').next().unwrap_or(id);
    file.strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
        .unwrap_or(file)
}

fn extract_outlinks(id: &str, prose: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for caps in WIKILINK.captures_iter(prose) {
        if let (Some(whole), Some(target)) = (caps.get(0), wikilink_target(&caps[1])) {
            found.push((whole.start(), target));
        }
    }
    for caps in MD_LINK.captures_iter(prose) {
        if let (Some(whole), Some(target)) = (caps.get(0), markdown_target(id, &caps[1])) {
            found.push((whole.start(), target));
        }
    }
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen = BTreeSet::new();
    found
        .into_iter()
        .filter_map(|(_, target)| seen.insert(target.clone()).then_some(target))
        .collect()
}

fn wikilink_target(inner: &str) -> Option<String> {
    let target = inner.split('|').next().unwrap_or_default();
    let target = target.split('#').next().unwrap_or_default().trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// Resolve a markdown link destination against the source note's directory.
///
/// External URLs and same-page anchors yield `None`.
fn markdown_target(source_id: &str, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unwrapped = if let Some(inner) = trimmed.strip_prefix('<') {
        &inner[..inner.find('>')?]
    } else {
        trimmed.split_whitespace().next()?
    };

    let lower = unwrapped.to_lowercase();
    if unwrapped.is_empty()
        || lower.starts_with('#')
        || lower.contains("://")
        || ["mailto:", "tel:", "data:", "javascript:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let path = unwrapped
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .replace("%20", " ")
        .replace('\\', "/");
    if path.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = if path.starts_with('/') {
        Vec::new()
    } else {
        let mut dirs: Vec<&str> = source_id.split('/').collect();
        dirs.pop();
        dirs
    };
    for segment in path.split('/') {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_split() {
        let (yaml, body) = split_frontmatter("---\ntitle: X\n---\n# Body\n");
        assert_eq!(yaml, Some("title: X"));
        assert_eq!(body, "# Body\n");

        let (yaml, body) = split_frontmatter("# No frontmatter");
        assert!(yaml.is_none());
        assert_eq!(body, "# No frontmatter");

        let (yaml, _) = split_frontmatter("---\nnever closed\n");
        assert!(yaml.is_none());
    }

    #[test]
    fn test_title_precedence() {
        let from_meta = extract("a.md", "---\ntitle: Meta Title\n---\n# Heading\n", "md");
        assert_eq!(from_meta.title, "Meta Title");

        let from_heading = extract("a.md", "intro\n\n# Heading Title\n", "md");
        assert_eq!(from_heading.title, "Heading Title");

        let fallback = extract("dir/My Note.md", "## only h2\n", "md");
        assert_eq!(fallback.title, "My Note");
    }

    #[test]
    fn test_tags_from_frontmatter_and_inline() {
        let text = "---\ntags: [Rust, '#Graphs']\n---\nSee #ideas/later and #Rust.\n# Heading is not a tag\n";
        let extracted = extract("a.md", text, "md");
        let tags: Vec<&str> = extracted.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["graphs", "ideas/later", "rust"]);
    }

    #[test]
    fn test_wikilinks_keep_raw_target() {
        let text = "Links: [[Other Note]], [[folder/deep|alias]], [[Topic#Section]], [[Other Note]]";
        let extracted = extract("a.md", text, "md");
        assert_eq!(
            extracted.outlinks,
            vec!["Other Note", "folder/deep", "Topic"]
        );
    }

    #[test]
    fn test_markdown_links_are_made_vault_relative() {
        let text = "[sib](sibling.md) [up](../top.md#x) [abs](/root/note.md) [web](https://x.io) [anchor](#here) [sp](<with space.md>)";
        let extracted = extract("notes/sub/a.md", text, "md");
        assert_eq!(
            extracted.outlinks,
            vec![
                "notes/sub/sibling.md",
                "notes/top.md",
                "root/note.md",
                "notes/sub/with space.md"
            ]
        );
    }

    #[test]
    fn test_links_in_code_are_ignored() {
        let text = "```\n[[in fence]]\n```\nand `[[inline]]` but [[real]]";
        let extracted = extract("a.md", text, "md");
        assert_eq!(extracted.outlinks, vec!["real"]);
    }

    #[test]
    fn test_links_keep_document_order() {
        let text = "[md](b.md) then [[c]] then [md2](d.md)";
        let extracted = extract("a.md", text, "md");
        assert_eq!(extracted.outlinks, vec!["b.md", "c", "d.md"]);
    }

    #[test]
    fn test_bad_frontmatter_is_ignored() {
        let extracted = extract("a.md", "---\ntags: [unclosed\n---\n[[b]]", "md");
        assert!(extracted.tags.is_empty());
        assert_eq!(extracted.outlinks, vec!["b"]);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("notes/Rust.md", "md"), "Rust");
        assert_eq!(base_name("Rust", "md"), "Rust");
        assert_eq!(base_name("a/b/c.txt", "md"), "c.txt");
    }
}
