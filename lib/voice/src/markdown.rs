use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

// code blocks and comments go first, nothing inside them is spoken
const BLOCK_RULES: &[(&str, &str)] = &[
    (r"\r\n?", "\n"),
    (r"(?ms)^[ \t]*```.*?^[ \t]*```[^\n]*$", ""),
    (r"(?ms)^[ \t]*~~~.*?^[ \t]*~~~[^\n]*$", ""),
    (r"(?ms)^[ \t]*(?:```|~~~).*\z", ""),
    (r"(?s)<!--.*?-->", ""),
];

// applied in order, each rule sees the output of the previous one
const INLINE_RULES: &[(&str, &str)] = &[
    // images
    (r"!\[[^\]]*\]\((?:[^()]|\([^()]*\))*\)", ""),
    (r"!\[[^\]]*\]\[[^\]]*\]", ""),
    // links keep the label, destinations may hold one level of parentheses
    (r"\[([^\]]*)\]\((?:[^()]|\([^()]*\))*\)", "${1}"),
    (r"\[([^\]]+)\]\[[^\]]*\]", "${1}"),
    (r"(?m)^[ \t]{0,3}\[[^\]]+\]:[ \t]*\S+.*$", ""),
    (r"<((?:https?|mailto):[^>\s]+)>", "${1}"),
    (r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>", ""),
    // headings
    (r"(?m)^[ \t]{0,3}#{1,6}[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$", "${1}"),
    (r"(?m)^[ \t]{0,3}#{1,6}[ \t]*$", ""),
    (r"(?m)^[ \t]{0,3}=+[ \t]*$", ""),
    // horizontal rules, before list markers so "* * *" is not a list item
    (r"(?m)^[ \t]{0,3}(?:[-*_][ \t]*){3,}$", ""),
    (r"(?m)^[ \t]{0,3}(?:>[ \t]?)+", ""),
    (r"(?m)^[ \t]*(?:[-*+]|\d{1,9}[.)])[ \t]+(?:\[[ xX]\][ \t]+)?", ""),
    (r"`+", ""),
];

// repeated until nothing changes, the underscore rule consumes the boundary next to a span
const EMPHASIS_RULES: &[(&str, &str)] = &[
    (r"\*{1,3}([^*\s](?:[^*\n]*?[^*\s])?)\*{1,3}", "${1}"),
    (r"(?m)(^|[^\w])_{1,3}([^_\s](?:[^_\n]*?[^_\s])?)_{1,3}([^\w]|$)", "${1}${2}${3}"),
    (r"~~([^~\s](?:[^~\n]*?[^~\s])?)~~", "${1}"),
];

const CLEANUP_RULES: &[(&str, &str)] = &[
    (r"\*{2,}|~~", ""),
    (r"(?m)[ \t]+$", ""),
    (r"\n{3,}", "\n\n"),
];

// code span text and escaped characters are shielded from the inline rules
static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| compile(r"(^|[^\\])`([^`\n]*)`"));
static ESCAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"\\([\\`*_{}\[\]()#+\-.!<>~|])"));

// supplementary private use area, not expected in prose
const SHIELD_BASE: u32 = 0xF0000;

static COMPILED_BLOCK_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| compile_rules(BLOCK_RULES));
static COMPILED_INLINE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| compile_rules(INLINE_RULES));
static COMPILED_EMPHASIS_RULES: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| compile_rules(EMPHASIS_RULES));
static COMPILED_CLEANUP_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| compile_rules(CLEANUP_RULES));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid pattern, pattern={pattern}, error={err}"))
}

fn compile_rules(rules: &[(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules.iter().map(|(pattern, replacement)| (compile(pattern), *replacement)).collect()
}

/// Converts markdown into text suitable for speech.
///
/// Markup is removed, paragraph breaks are kept as blank lines so the voice pauses between them.
/// Code spans and backslash escapes are spoken literally. Blank input gives an empty string.
pub fn normalize(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let mut text = apply(&COMPILED_BLOCK_RULES, markdown.to_string());
    text = CODE_SPAN
        .replace_all(&text, |captures: &Captures| format!("{}{}", &captures[1], shield(&captures[2])))
        .into_owned();
    text = ESCAPE
        .replace_all(&text, |captures: &Captures| shield(&captures[1]))
        .into_owned();
    text = apply(&COMPILED_INLINE_RULES, text);
    for (regex, replacement) in COMPILED_EMPHASIS_RULES.iter() {
        loop {
            let next = regex.replace_all(&text, *replacement).into_owned();
            if next == text {
                break;
            }
            text = next;
        }
    }
    text = apply(&COMPILED_CLEANUP_RULES, text);
    unshield(&text).trim().to_string()
}

fn apply(rules: &[(Regex, &'static str)], mut text: String) -> String {
    for (regex, replacement) in rules {
        text = regex.replace_all(&text, *replacement).into_owned();
    }
    text
}

fn shield(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii_punctuation() => char::from_u32(SHIELD_BASE + c as u32).unwrap_or(c),
            c => c,
        })
        .collect()
}

fn unshield(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            code @ SHIELD_BASE..0xF0080 => char::from_u32(code - SHIELD_BASE).unwrap_or(c),
            _ => c,
        })
        .collect()
}
