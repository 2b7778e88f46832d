// crates/cnpost-core/src/text.rs

//! # Text Normalization
//!
//! Helpers that clean up free-text administrative names before they are used
//! as lookup keys, and that reduce a name to its "core" by removing a single
//! administrative-unit suffix.

/// Administrative-unit suffixes recognized by [`core_name`], in priority order.
///
/// The first suffix in this list that matches the end of a name wins, so
/// longer and more specific suffixes are listed before the short ones.
pub const DEFAULT_AREA_SUFFIXES: &[&str] = &[
    "自治州",
    "自治县",
    "市辖区",
    "矿区",
    "林区",
    "新区",
    "地区",
    "特区",
    "经济开发区",
    "开发区",
    "区",
    "县",
    "市",
    "旗",
    "自治旗",
];

/// Characters dropped anywhere in a string: full-width space, NBSP, BOM/ZWNBSP.
const INCIDENTAL_CHARS: [char; 3] = ['\u{3000}', '\u{00A0}', '\u{FEFF}'];

/// Normalizes a free-text name for use as a lookup key.
///
/// - trims surrounding whitespace
/// - removes full-width spaces, non-breaking spaces and byte order marks
/// - removes every `(...)` / `（...）` annotation (shortest span first)
///
/// # Examples
///
/// ```rust
/// use cnpost_core::text::normalize;
///
/// assert_eq!(normalize("  朝阳区\u{3000}"), "朝阳区");
/// assert_eq!(normalize("越秀区（原东山区）"), "越秀区");
/// assert_eq!(normalize("\u{FEFF}Gulou(north)(old)"), "Gulou");
/// ```
pub fn normalize(s: &str) -> String {
    let mut out: String = s
        .trim()
        .chars()
        .filter(|c| !INCIDENTAL_CHARS.contains(c))
        .collect();

    while let Some(stripped) = strip_first_annotation(&out) {
        out = stripped;
    }

    // Space left in front of a removed annotation is trimmed too.
    out.trim().to_string()
}

/// Removes the left-most bracketed annotation, if any.
///
/// An opening bracket only pairs with the closing bracket of the same width.
fn strip_first_annotation(s: &str) -> Option<String> {
    for (start, open) in s.char_indices() {
        let close = match open {
            '(' => ')',
            '（' => '）',
            _ => continue,
        };
        let body = start + open.len_utf8();
        if let Some(rel) = s[body..].find(close) {
            let end = body + rel + close.len_utf8();
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..start]);
            out.push_str(&s[end..]);
            return Some(out);
        }
    }
    None
}

/// Returns the "core" of an administrative name: the name with the first
/// matching suffix from `suffixes` removed.
///
/// Exactly one suffix is stripped, even when the remainder still ends in a
/// listed suffix. Names without a known suffix come back unchanged (trimmed).
///
/// # Examples
///
/// ```rust
/// use cnpost_core::text::{core_name, DEFAULT_AREA_SUFFIXES};
///
/// assert_eq!(core_name("延边朝鲜族自治州", DEFAULT_AREA_SUFFIXES), "延边朝鲜族");
/// assert_eq!(core_name("天河区", DEFAULT_AREA_SUFFIXES), "天河");
/// assert_eq!(core_name("浦东", DEFAULT_AREA_SUFFIXES), "浦东");
/// ```
pub fn core_name<'a, S: AsRef<str>>(name: &'a str, suffixes: &[S]) -> &'a str {
    let name = name.trim();
    suffixes
        .iter()
        .map(AsRef::as_ref)
        .find(|suf| !suf.is_empty() && name.ends_with(*suf))
        .map(|suf| &name[..name.len() - suf.len()])
        .unwrap_or(name)
}

/// `true` when `s` is exactly six ASCII digits.
pub fn is_postcode(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts a postcode from a raw input line.
///
/// All non-digit characters are dropped; the line is accepted only when exactly
/// six digits remain.
///
/// ```rust
/// use cnpost_core::text::extract_postcode;
///
/// assert_eq!(extract_postcode(" 510-030 ").as_deref(), Some("510030"));
/// assert_eq!(extract_postcode("51003"), None);
/// ```
pub fn extract_postcode(line: &str) -> Option<String> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    is_postcode(&digits).then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_removes_incidental_characters() {
        assert_eq!(normalize("\u{00A0}海淀\u{3000}区 "), "海淀区");
        assert_eq!(normalize("\u{FEFF}广东省"), "广东省");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_removes_every_annotation() {
        assert_eq!(normalize("鼓楼区(福州)（旧）"), "鼓楼区");
        assert_eq!(normalize("a(b)c(d)e"), "ace");
    }

    #[test]
    fn normalize_trims_space_left_by_an_annotation() {
        assert_eq!(normalize("越秀区 （旧）"), "越秀区");
        assert_eq!(normalize("越秀区 （旧）"), normalize("越秀区"));
    }

    #[test]
    fn normalize_does_not_pair_mixed_width_brackets() {
        assert_eq!(normalize("城关（旧)"), "城关（旧)");
        assert_eq!(normalize("城关(未闭合"), "城关(未闭合");
    }

    #[test]
    fn normalize_is_non_greedy() {
        assert_eq!(normalize("a(b)c)d"), "ac)d");
    }

    #[test]
    fn core_name_uses_priority_order() {
        // "自治县" is listed before "县".
        assert_eq!(core_name("长阳土家族自治县", DEFAULT_AREA_SUFFIXES), "长阳土家族");
        // "经济开发区" is checked before "开发区" and "区".
        assert_eq!(core_name("金州经济开发区", DEFAULT_AREA_SUFFIXES), "金州");
        assert_eq!(core_name("浦东新区", DEFAULT_AREA_SUFFIXES), "浦东");
    }

    #[test]
    fn core_name_strips_a_single_suffix() {
        // "旗" precedes "自治旗", so only the last character goes.
        assert_eq!(core_name("鄂温克族自治旗", DEFAULT_AREA_SUFFIXES), "鄂温克族自治");
        assert_eq!(core_name("市辖区", DEFAULT_AREA_SUFFIXES), "");
        assert_eq!(core_name("某某市区", DEFAULT_AREA_SUFFIXES), "某某市");
    }

    #[test]
    fn core_name_accepts_custom_suffixes() {
        let suffixes = vec!["镇".to_string()];
        assert_eq!(core_name("石岩镇", &suffixes), "石岩");
        assert_eq!(core_name("宝安区", &suffixes), "宝安区");
    }

    #[test]
    fn postcode_extraction() {
        assert_eq!(extract_postcode("100006").as_deref(), Some("100006"));
        assert_eq!(extract_postcode("PC:100 006\r").as_deref(), Some("100006"));
        assert_eq!(extract_postcode("1000061"), None);
        assert_eq!(extract_postcode(""), None);
        assert!(!is_postcode("10000a"));
        assert!(!is_postcode("１００００６"));
    }
}
