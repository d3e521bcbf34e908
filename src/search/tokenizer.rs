//! Markdown-aware tokenizer with a small rule-based suffix stripper.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashSet;

use crate::note::split_frontmatter;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```.*?```|~~~.*?~~~").expect("valid regex");
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]*`").expect("valid regex");
    static ref WIKILINK: Regex =
        Regex::new(r"!?\[\[([^\[\]|]*)(?:\|([^\[\]]*))?\]\]").expect("valid regex");
    static ref MD_LINK: Regex = Regex::new(r"!?\[([^\[\]]*)\]\(([^()]*)\)").expect("valid regex");
    static ref HEADING: Regex = Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").expect("valid regex");
    static ref BLOCKQUOTE: Regex = Regex::new(r"(?m)^[ \t]*(?:>[ \t]?)+").expect("valid regex");
    static ref TABLE_RULE: Regex =
        Regex::new(r"(?m)^[ \t]*\|?(?:[ \t]*:?-+:?[ \t]*\|)+[ \t]*(?::?-+:?)?[ \t]*$")
            .expect("valid regex");
    static ref EMPHASIS: Regex = Regex::new(r"[*_~|]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","could","did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself","just",
            "me","more","most","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Ordered suffix rules: (suffix, word must be longer than, replacement).
/// The first rule that applies wins.
const SUFFIX_RULES: &[(&str, usize, &str)] = &[
    ("ation", 0, ""),
    ("tion", 0, ""),
    ("ness", 0, ""),
    ("ment", 0, ""),
    ("able", 0, ""),
    ("ible", 0, ""),
    ("ing", 5, ""),
    ("ies", 4, "y"),
    ("ed", 4, ""),
    ("ly", 4, ""),
    ("es", 4, ""),
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Tokenize markdown into stemmed, lowercased terms.
///
/// Frontmatter, code and link destinations are dropped; link display text
/// (or the target, when there is no display text) is kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let (_, body) = split_frontmatter(text);
    let lowered = body.to_lowercase();

    let text = CODE_FENCE.replace_all(&lowered, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = WIKILINK.replace_all(&text, |caps: &Captures| {
        let shown = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        if shown.is_empty() {
            format!(" {} ", &caps[1])
        } else {
            format!(" {} ", shown)
        }
    });
    let text = MD_LINK.replace_all(&text, |caps: &Captures| {
        let shown = caps[1].trim();
        if shown.is_empty() {
            format!(" {} ", &caps[2])
        } else {
            format!(" {} ", shown)
        }
    });
    let text = HEADING.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, " ");
    let text = TABLE_RULE.replace_all(&text, " ");
    let text = EMPHASIS.replace_all(&text, " ");

    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stopword(token))
        .map(stem)
        .collect()
}

/// Strip one common English suffix. Intentionally crude: words of three
/// characters or fewer are returned untouched.
pub fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 {
        return word.to_string();
    }

    let stemmed = SUFFIX_RULES
        .iter()
        .find_map(|&(suffix, longer_than, replacement)| {
            if len > longer_than {
                word.strip_suffix(suffix)
                    .map(|root| format!("{root}{replacement}"))
            } else {
                None
            }
        })
        .or_else(|| {
            if !word.ends_with("ss") {
                word.strip_suffix('s').map(str::to_string)
            } else {
                None
            }
        });

    match stemmed {
        Some(root) if !root.is_empty() => root,
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_decoration_is_stripped() {
        let tokens = tokenize("# Heading\n**bold** [[wikilink]] [link](url)");
        assert!(tokens.contains(&"head".to_string()));
        assert!(tokens.contains(&"bold".to_string()));
        assert!(tokens.contains(&"wikilink".to_string()));
        assert!(tokens.contains(&"link".to_string()));
        assert!(!tokens.iter().any(|t| t == "url"));
    }

    #[test]
    fn test_code_and_frontmatter_are_dropped() {
        let text = "---\ntitle: secret\n---\nplain `hidden` words\n```rust\nfn concealed() {}\n```\n";
        let tokens = tokenize(text);
        assert_eq!(tokens, vec!["plain", "word"]);
    }

    #[test]
    fn test_wikilink_alias_wins_over_target() {
        let tokens = tokenize("see [[target page|shown text]]");
        assert!(tokens.contains(&"shown".to_string()));
        assert!(!tokens.contains(&"target".to_string()));
    }

    #[test]
    fn test_quotes_and_tables() {
        let tokens = tokenize("> quoted wisdom\n\n| col | other |\n|-----|:-----:|\n| cell | data |");
        assert_eq!(tokens, vec!["quot", "wisdom", "col", "cell", "data"]);
    }

    #[test]
    fn test_stopwords_and_short_tokens() {
        assert!(tokenize("the a of x y").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(stem("development"), "develop");
        assert_eq!(stem("kindness"), "kind");
        assert_eq!(stem("readable"), "read");
        assert_eq!(stem("visible"), "vis");
        assert_eq!(stem("learning"), "learn");
        assert_eq!(stem("stories"), "story");
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("quickly"), "quick");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("notes"), "not");
        assert_eq!(stem("cats"), "cat");
    }

    #[test]
    fn test_suffix_guards() {
        assert_eq!(stem("class"), "class");
        assert_eq!(stem("king"), "king");
        assert_eq!(stem("ties"), "tie");
        assert_eq!(stem("bed"), "bed");
        assert_eq!(stem("gas"), "gas");
    }
}
