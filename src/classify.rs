//! Coarse typing of single cell values.
//!
//! Everything here is a pure function of the cell text: no hidden state, no locale
//! lookups. Several decimal and currency conventions are accepted at once because supplier
//! price lists mix them freely.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Coarse type of a trimmed cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellKind {
    Empty,
    Number,
    Date,
    Money,
    SkuLike,
    Text,
}

impl CellKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Number => "number",
            Self::Date => "date",
            Self::Money => "money",
            Self::SkuLike => "sku-like",
            Self::Text => "text",
        }
    }

    /// Number or date: the kinds that make a row look like data rather than a header
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Date)
    }
}

// Optional sign, thousands grouped by `.`, `,`, space or NBSP, optional decimal part.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d{1,3}(?:[.,\x20\u{00A0}]\d{3})+|\d+)(?:[.,]\d+)?$").unwrap()
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{1,2}[./-]\d{1,2}[./-]\d{2,4}|\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2})?)?)$")
        .unwrap()
});

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:[$€£¥₽₸₩₴%]|\b(?:usd|eur|gbp|rub|rur|kzt|uah|cny|chf|byn|vat|mwst|руб|рублей|тенге|тг|грн|ндс)\b)",
    )
    .unwrap()
});

static HEADER_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:sku|code|article|art|item|name|description|desc|product|model|brand|manufacturer|vendor|price|cost|qty|quantity|stock|unit|uom|amount|total|discount|category|barcode|ean|weight|size|colou?r|currency|артикул|код|наименование|название|описание|товар|модель|бренд|производитель|цена|стоимость|кол-во|количество|остаток|ед|сумма|скидка|категория|штрихкод|вес|размер|цвет|валюта)\b",
    )
    .unwrap()
});

const UNIT_MARKERS: &[&str] = &[
    "usd", "eur", "gbp", "rub", "rur", "kzt", "uah", "cny", "chf", "byn", "$", "€", "£", "¥",
    "₽", "₸", "₴", "%", "vat", "mwst", "ндс", "руб", "тг", "тенге", "грн", "pcs", "pc", "шт",
    "kg", "кг", "g", "г", "l", "л", "ml", "мл", "m", "м", "mm", "мм", "cm", "см", "ед", "unit",
];

/// Classify a trimmed cell value. Rules apply in priority order:
/// empty, number, date, money, sku-like, text.
pub fn classify(value: &str) -> CellKind {
    let value = value.trim();
    if value.is_empty() {
        return CellKind::Empty;
    }
    if NUMBER_RE.is_match(value) {
        return CellKind::Number;
    }
    if DATE_RE.is_match(value) {
        return CellKind::Date;
    }
    if MONEY_RE.is_match(value) {
        return CellKind::Money;
    }
    if looks_like_sku(value) {
        return CellKind::SkuLike;
    }
    CellKind::Text
}

fn looks_like_sku(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let total = value.chars().count();
    if total < 5 {
        return false;
    }
    let codeish = value
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '/'))
        .count();
    codeish * 5 >= total * 4
}

/// Non-empty and not a lone punctuation/symbol character such as `-` or `*`
pub fn is_signal(value: &str) -> bool {
    let value = value.trim();
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(ch), None) => ch.is_alphanumeric(),
        _ => true,
    }
}

/// Cell text contains a typical column-name keyword (`Price`, `Артикул`, `Qty`...)
pub fn is_header_keyword(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    value == "№" || value == "#" || value.starts_with("№") || HEADER_KEYWORD_RE.is_match(value)
}

/// Cell is nothing but a unit, currency or VAT marker, e.g. `USD`, `(%)`, `шт.`
pub fn is_unit_marker(value: &str) -> bool {
    let trimmed = value
        .trim()
        .trim_matches(|ch: char| matches!(ch, '(' | ')' | '[' | ']' | ','))
        .trim_end_matches('.')
        .trim()
        .to_lowercase();
    !trimmed.is_empty() && UNIT_MARKERS.contains(&trimmed.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_accept_several_conventions() {
        for value in ["42", "-7", "+3.5", "9.99", "14,50", "1,234", "1.234,56", "1 234 567", "1\u{00A0}234"] {
            assert_eq!(classify(value), CellKind::Number, "{value}");
        }
    }

    #[test]
    fn dates_are_recognized_before_money() {
        for value in ["1.2.24", "31/12/2024", "05-06-99", "2024-03-01", "2024-03-01T10:15:00"] {
            assert_eq!(classify(value), CellKind::Date, "{value}");
        }
    }

    #[test]
    fn currency_and_vat_markers_are_money() {
        for value in ["$12", "12 €", "100 руб.", "USD", "20%", "incl. VAT", "с НДС", "5 000 тг"] {
            assert_eq!(classify(value), CellKind::Money, "{value}");
        }
    }

    #[test]
    fn codes_without_spaces_are_sku_like() {
        assert_eq!(classify("AB-1234"), CellKind::SkuLike);
        assert_eq!(classify("X/200_B"), CellKind::SkuLike);
        assert_eq!(classify("A1"), CellKind::Text);
        assert_eq!(classify("Red widget"), CellKind::Text);
        assert_eq!(classify(""), CellKind::Empty);
        assert_eq!(classify("   "), CellKind::Empty);
    }

    #[test]
    fn lone_symbols_are_not_signal() {
        assert!(!is_signal(""));
        assert!(!is_signal("-"));
        assert!(!is_signal(" * "));
        assert!(is_signal("x"));
        assert!(is_signal("7"));
        assert!(is_signal("--"));
    }

    #[test]
    fn header_dictionary_matches_words_not_fragments() {
        assert!(is_header_keyword("Price, USD"));
        assert!(is_header_keyword("Наименование товара"));
        assert!(is_header_keyword("№"));
        assert!(!is_header_keyword("Pricey gadget"));
        assert!(is_unit_marker("USD"));
        assert!(is_unit_marker("(%)"));
        assert!(is_unit_marker("шт."));
        assert!(!is_unit_marker("Price"));
    }
}
