//! Arabic-aware text normalization and markup cleaning
//!
//! [`normalize`] is the single canonical form used for every title
//! comparison and keyword lookup. The classifier and the deduplicator must
//! both go through it.

/// Punctuation removed during normalization
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '،', ':', ';', '؛', '\'', '"', '!', '؟', '?', '(', ')', '[', ']', '{', '}', '«', '»',
];

/// Canonicalize text for comparison.
///
/// Steps, in order: lowercase, drop Arabic combining marks, fold alef
/// variants to `ا`, fold `ى` to `ي`, fold `ة` to `ه`, drop punctuation,
/// collapse whitespace runs and trim. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !is_arabic_mark(*c) && !STRIPPED_PUNCTUATION.contains(c))
        .map(fold_letter)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Combining marks of the Arabic block (harakat, Quranic annotation signs)
fn is_arabic_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E4}'
            | '\u{06E7}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}'
    )
}

fn fold_letter(c: char) -> char {
    match c {
        'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
        'ى' => 'ي',
        'ة' => 'ه',
        other => other,
    }
}

/// Number of characters in the normalized form
pub fn normalized_len(text: &str) -> usize {
    normalize(text).chars().count()
}

/// Strip HTML tags, decode the common entities and collapse whitespace
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    decode_entities(&result)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode named and numeric HTML entities that show up in feed payloads
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        "hellip" => Some('…'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_letters() {
        assert_eq!(normalize("  أحمد إلى آخر   مدرسة "), "احمد الي اخر مدرسه");
    }

    #[test]
    fn test_normalize_strips_marks_and_punctuation() {
        assert_eq!(normalize("عَاجِلٌ: «زلزال» يضرب!"), "عاجل زلزال يضرب");
        assert_eq!(normalize("Breaking, NEWS?"), "breaking news");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "عاجل: زلزال يضرب المنطقة .",
            "الأُمَم المتّحدة تدعو إلى وقف إطلاق النار",
            "Mixed  CASE\tand\nlines ؟",
            "ٱلرَّحْمَٰن",
            "x ( y ) z",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalized_len_counts_chars() {
        assert_eq!(normalized_len("غزة"), 3);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b>!</p>"), "Hello world !");
        assert_eq!(strip_html("<p>خبر&nbsp;عاجل &amp; مهم</p>"), "خبر عاجل & مهم");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("&#1593;&#x627;"), "عا");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }
}
