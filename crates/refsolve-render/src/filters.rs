//! Field-level conversion filters used by the output formats.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAME: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_lookup(table: &'static [&'static str; 12], month: &str) -> &'static str {
    match month.trim().parse::<usize>() {
        Ok(n) if (1..=12).contains(&n) => table[n - 1],
        _ => "",
    }
}

/// Three-letter English month abbreviation for a numeric month string.
/// Anything outside `1..=12` becomes `""`.
pub fn month_abbr(month: &str) -> &'static str {
    month_lookup(&MONTH_ABBR, month)
}

/// Full English month name for a numeric month string.
pub fn month_name(month: &str) -> &'static str {
    month_lookup(&MONTH_NAME, month)
}

/// Words kept lowercase in title position unless first or last.
static SMALL_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or",
        "the", "to", "v", "via", "vs",
    ])
});

/// English title case. Words carrying a period or interior capitals
/// ("U.S.", "eBay", "DNA") are preserved as-is.
pub fn titlecase(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last = words.len().saturating_sub(1);
    let mut out = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        if word.contains('.') || word.chars().skip(1).any(|c| c.is_uppercase()) {
            out.push((*word).to_string());
            continue;
        }
        let lower = word.to_lowercase();
        if i != 0 && i != last && SMALL_WORDS.contains(lower.as_str()) {
            out.push(lower);
        } else {
            out.push(capitalize(&lower));
        }
    }
    out.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// LaTeX-reserved ASCII characters.
static ASCII_ESCAPES: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('#', "\\#"),
        ('$', "\\$"),
        ('%', "\\%"),
        ('&', "\\&"),
        ('_', "\\_"),
        ('{', "\\{"),
        ('}', "\\}"),
        ('~', "\\textasciitilde{}"),
        ('^', "\\textasciicircum{}"),
        ('\\', "\\textbackslash{}"),
    ])
});

/// Non-ASCII characters with dedicated LaTeX spellings.
static SYMBOLS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('ß', "\\ss{}"),
        ('æ', "\\ae{}"),
        ('Æ', "\\AE{}"),
        ('ø', "\\o{}"),
        ('Ø', "\\O{}"),
        ('œ', "\\oe{}"),
        ('Œ', "\\OE{}"),
        ('å', "\\aa{}"),
        ('Å', "\\AA{}"),
        ('ł', "\\l{}"),
        ('Ł', "\\L{}"),
        ('ð', "\\dh{}"),
        ('þ', "\\th{}"),
        ('ı', "\\i{}"),
        ('–', "--"),
        ('—', "---"),
        ('\u{2018}', "`"),
        ('\u{2019}', "'"),
        ('\u{201C}', "``"),
        ('\u{201D}', "''"),
        ('…', "\\dots{}"),
        ('°', "\\textdegree{}"),
        ('±', "\\textpm{}"),
        ('×', "\\texttimes{}"),
        ('µ', "\\textmu{}"),
        ('μ', "\\textmu{}"),
        ('\u{00A0}', "~"),
    ])
});

/// Combining marks to LaTeX accent commands.
static ACCENTS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('\u{0300}', "`"),
        ('\u{0301}', "'"),
        ('\u{0302}', "^"),
        ('\u{0303}', "~"),
        ('\u{0304}', "="),
        ('\u{0306}', "u"),
        ('\u{0307}', "."),
        ('\u{0308}', "\""),
        ('\u{030A}', "r"),
        ('\u{030B}', "H"),
        ('\u{030C}', "v"),
        ('\u{0327}', "c"),
        ('\u{0328}', "k"),
    ])
});

/// Rewrite text as LaTeX: reserved characters escaped, special letters and
/// punctuation spelled with their commands, accented letters decomposed
/// into accent macros. Characters with no mapping pass through.
pub fn unicode_to_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(esc) = ASCII_ESCAPES.get(&ch) {
            out.push_str(esc);
        } else if let Some(sym) = SYMBOLS.get(&ch) {
            out.push_str(sym);
        } else if ch.is_ascii() {
            out.push(ch);
        } else if let Some(accented) = latex_accent(ch) {
            out.push_str(&accented);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Decompose a precomposed letter into `\<accent>{<base>}`. Letters that
/// do not decompose to exactly base-plus-one-known-mark return `None`.
fn latex_accent(ch: char) -> Option<String> {
    let mut parts = ch.nfd();
    let base = parts.next()?;
    let mark = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let cmd = ACCENTS.get(&mark)?;
    // i and j lose their dot under an accent placed above.
    let above = ('\u{0300}'..='\u{030C}').contains(&mark);
    let body = match base {
        'i' if above => "\\i{}".to_string(),
        'j' if above => "\\j{}".to_string(),
        _ => base.to_string(),
    };
    Some(format!("\\{cmd}{{{body}}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_abbr_handles_padded_and_bare_numbers() {
        assert_eq!(month_abbr("01"), "Jan");
        assert_eq!(month_abbr("1"), "Jan");
        assert_eq!(month_abbr("07"), "Jul");
        assert_eq!(month_abbr("12"), "Dec");
    }

    #[test]
    fn month_abbr_rejects_out_of_range_input() {
        assert_eq!(month_abbr(""), "");
        assert_eq!(month_abbr("0"), "");
        assert_eq!(month_abbr("13"), "");
        assert_eq!(month_abbr("jul"), "");
    }

    #[test]
    fn month_name_spells_out() {
        assert_eq!(month_name("01"), "January");
        assert_eq!(month_name("9"), "September");
    }

    #[test]
    fn titlecase_capitalizes_except_small_words() {
        assert_eq!(
            titlecase("an analysis of the pricing"),
            "An Analysis of the Pricing"
        );
    }

    #[test]
    fn titlecase_preserves_acronyms_and_dotted_words() {
        assert_eq!(titlecase("the DNA of eBay"), "The DNA of eBay");
        assert_eq!(titlecase("traits in the U.S. corn"), "Traits in the U.S. Corn");
    }

    #[test]
    fn latex_escapes_reserved_ascii() {
        assert_eq!(unicode_to_latex("50% of $x_1$"), "50\\% of \\$x\\_1\\$");
        assert_eq!(unicode_to_latex("A & B #2"), "A \\& B \\#2");
    }

    #[test]
    fn latex_decomposes_accented_letters() {
        assert_eq!(unicode_to_latex("Schrödinger"), "Schr\\\"{o}dinger");
        assert_eq!(unicode_to_latex("naïve"), "na\\\"{\\i{}}ve");
        assert_eq!(unicode_to_latex("Müller–Straße"), "M\\\"{u}ller--Stra\\ss{}e");
        assert_eq!(unicode_to_latex("Çelik"), "\\c{C}elik");
    }

    #[test]
    fn latex_passes_plain_text_through() {
        assert_eq!(unicode_to_latex("Shi, Guanming"), "Shi, Guanming");
    }
}
