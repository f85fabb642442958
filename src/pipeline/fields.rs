//! Field extraction: one classified product line → one [`ProductRecord`].
//!
//! ## Anatomy of a product line
//!
//! ```text
//! LD1234 Domaine Test Rouge 2021 (12) (12/750ml) $180.00/cs
//! └code┘ └────────────── name ─────────────────┘ └─price──┘
//! ```
//!
//! The code is always the first token and the case price is the first
//! token carrying the `/cs` suffix; every token in between is the name.
//! Vintage and pack size are recovered from the name afterwards because
//! the document embeds them there with no delimiter. Names keep whatever
//! fragments the recovery passes do not consume.
//!
//! Everything here is a pure function of the line plus the producer string
//! handed in by the segmenter. A line that fails the token-count, price
//! marker, or price-parse requirements yields `None`; the caller logs the
//! skip and the document continues.

use crate::config::ConversionConfig;
use crate::output::{Category, ProductRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Trailing `(12) (12/750ml)` annotation some lists repeat after the name.
/// Deliberately milliliter-only: a liter annotation like `(6) (6/1.5L)` is
/// the only in-name source of pack data for large formats and must survive
/// for the pack-size search.
static RE_PACK_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\(\d+\)\s+\(\d+/\d+ml\)$").unwrap());

/// Vintage year 2000–2099, or the literal non-vintage marker.
static RE_VINTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2}|NV)\b").unwrap());

/// `count/volume` with a unit, e.g. `12/750ml` or `6/1.5L`.
static RE_PACK_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)/(\d+(?:\.\d+)?)(ml|L)").unwrap());

/// Ordered keyword sets for category inference. Evaluated top-down, first
/// matching set wins; order is part of the contract (a `Sparkling Rosé`
/// is sparkling).
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Sparkling,
        &["sparkling", "frizzante", "brut", "mousseaux", "metodo", "pétillant"],
    ),
    (Category::Rose, &["rosé", "rosato", "rose", "pink"]),
    (Category::White, &["blanc", "bianco", "white", "branco"]),
    (Category::Red, &["rouge", "rosso", "tinto", "red"]),
    (Category::Fortified, &["porto", "port", "tawny"]),
    (Category::Cider, &["cidre", "cider"]),
];

/// Decompose one product line into a record.
///
/// Returns `None` when the line cannot be minimally parsed: fewer than 3
/// tokens, no token carrying the price suffix, or a price that is not a
/// positive finite number.
pub fn extract_record(
    line: &str,
    producer: &str,
    config: &ConversionConfig,
) -> Option<ProductRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        debug!("Dropping short product line ({} tokens): {}", tokens.len(), line);
        return None;
    }

    let code = tokens[0];

    // First token after the code that carries the price suffix.
    let price_idx = match tokens
        .iter()
        .skip(1)
        .position(|t| t.contains(config.price_suffix.as_str()))
    {
        Some(i) => i + 1,
        None => {
            debug!("No case-price token: {}", line);
            return None;
        }
    };

    let case_price = match parse_case_price(tokens[price_idx], config) {
        Some(p) => p,
        None => {
            debug!("Unparseable case price '{}': {}", tokens[price_idx], line);
            return None;
        }
    };

    let raw_name = tokens[1..price_idx].join(" ");
    let name = strip_pack_annotation(&raw_name);

    let vintage = find_vintage(&name).unwrap_or_else(|| config.non_vintage_label.clone());
    let (pack_size, bottle_size_ml) = find_pack_size(&name)
        .unwrap_or((config.default_pack_size, config.default_bottle_size_ml));
    let category = infer_category(&name);

    let producer = if producer.is_empty() {
        config.default_producer.as_str()
    } else {
        producer
    };

    Some(ProductRecord {
        code: code.to_string(),
        producer: producer.to_string(),
        name,
        vintage,
        pack_size,
        bottle_size_ml,
        category,
        case_price,
    })
}

/// Strip the currency symbol and price suffix, then parse.
/// Anything not a positive finite number disqualifies the line.
fn parse_case_price(token: &str, config: &ConversionConfig) -> Option<f64> {
    let cleaned = token
        .replace(config.currency_symbol, "")
        .replace(config.price_suffix.as_str(), "");
    let price: f64 = cleaned.parse().ok()?;
    if price.is_finite() && price > 0.0 {
        Some(price)
    } else {
        None
    }
}

/// Remove the trailing duplicate pack annotation, if present.
fn strip_pack_annotation(name: &str) -> String {
    RE_PACK_ANNOTATION.replace(name, "").to_string()
}

/// First vintage-like token in the name, if any.
fn find_vintage(name: &str) -> Option<String> {
    RE_VINTAGE.captures(name).map(|caps| caps[1].to_string())
}

/// First `count/volume+unit` pattern in the name, normalised to
/// (bottles per case, milliliters). A match whose count or rounded volume
/// is zero (or beyond `u32`) is treated as no match, so the defaults apply.
fn find_pack_size(name: &str) -> Option<(u32, u32)> {
    let caps = RE_PACK_SIZE.captures(name)?;
    let pack: u32 = caps[1].parse().ok()?;
    let volume: f64 = caps[2].parse().ok()?;

    let ml = if &caps[3] == "L" {
        volume * 1000.0
    } else {
        volume
    };
    let ml = ml.round();

    if pack == 0 || ml < 1.0 || ml > f64::from(u32::MAX) {
        return None;
    }
    Some((pack, ml as u32))
}

/// Infer the wine category from keywords in the (lower-cased) name.
/// Deterministic and total: falls back to [`Category::Unclassified`].
pub fn infer_category(name: &str) -> Category {
    let lower = name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *category;
        }
    }
    Category::Unclassified
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ConversionConfig {
        ConversionConfig::default()
    }

    #[test]
    fn test_full_product_line() {
        let rec = extract_record(
            "LD1234 Domaine Test Rouge 2021 (12) (12/750ml) $180.00/cs",
            "Test Estate, Loire",
            &cfg(),
        )
        .expect("line should parse");

        assert_eq!(rec.code, "LD1234");
        assert_eq!(rec.producer, "Test Estate, Loire");
        assert_eq!(rec.name, "Domaine Test Rouge 2021");
        assert_eq!(rec.vintage, "2021");
        assert_eq!(rec.pack_size, 12);
        assert_eq!(rec.bottle_size_ml, 750);
        assert_eq!(rec.category, Category::Red);
        assert_eq!(rec.case_price, 180.0);
    }

    #[test]
    fn test_magnum_line_with_liter_volume() {
        let rec = extract_record("LD5678 Cuvée Blanc NV 6/1.5L $210.00/cs", "X, Y", &cfg())
            .expect("line should parse");

        assert_eq!(rec.pack_size, 6);
        assert_eq!(rec.bottle_size_ml, 1500);
        assert_eq!(rec.vintage, "NV");
        assert_eq!(rec.category, Category::White);
        assert_eq!(rec.case_price, 210.0);
    }

    #[test]
    fn test_missing_price_token_drops_line() {
        assert!(extract_record("LD1 Domaine Sans Prix 2020", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_malformed_price_drops_line() {
        assert!(extract_record("LD1 Cuvée X $abc/cs", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_negative_price_drops_line() {
        assert!(extract_record("LD1 Cuvée X $-180.00/cs", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_zero_price_drops_line() {
        assert!(extract_record("LD1 Cuvée X $0.00/cs", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_thousands_separator_drops_line() {
        // Only the currency symbol and suffix are stripped; a comma makes
        // the remainder unparseable and the line is skipped.
        assert!(extract_record("LD1 Grand Format $1,250.00/cs", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_price_without_currency_symbol() {
        let rec = extract_record("LD1 Cuvée X 180/cs", "P, R", &cfg()).unwrap();
        assert_eq!(rec.case_price, 180.0);
    }

    #[test]
    fn test_two_tokens_drop_line() {
        assert!(extract_record("LD1 $100.00/cs", "P, R", &cfg()).is_none());
    }

    #[test]
    fn test_price_directly_after_code_gives_empty_name() {
        let rec = extract_record("LD1 $100.00/cs (12)", "P, R", &cfg()).unwrap();
        assert_eq!(rec.code, "LD1");
        assert_eq!(rec.name, "");
        assert_eq!(rec.vintage, "NV");
        assert_eq!(rec.category, Category::Unclassified);
        assert_eq!(rec.case_price, 100.0);
    }

    #[test]
    fn test_pack_annotation_stripped_from_name() {
        let rec = extract_record(
            "LD2 Gamay Sans Soufre 2022 (12) (12/750ml) $155.00/cs",
            "P, R",
            &cfg(),
        )
        .unwrap();
        assert_eq!(rec.name, "Gamay Sans Soufre 2022");
        // The stripped annotation no longer feeds the pack search; defaults apply.
        assert_eq!(rec.pack_size, 12);
        assert_eq!(rec.bottle_size_ml, 750);
    }

    #[test]
    fn test_liter_annotation_survives_and_feeds_pack_search() {
        let rec = extract_record("LD3 Magnum Cuvée (6) (6/1.5L) $200.00/cs", "P, R", &cfg())
            .unwrap();
        assert!(rec.name.contains("(6/1.5L)"), "name: {}", rec.name);
        assert_eq!(rec.pack_size, 6);
        assert_eq!(rec.bottle_size_ml, 1500);
    }

    #[test]
    fn test_tokens_after_price_are_not_part_of_the_name() {
        let rec = extract_record("LD4 Côt Vieilles Vignes $160.00/cs 2019", "P, R", &cfg())
            .unwrap();
        assert_eq!(rec.name, "Côt Vieilles Vignes");
        assert_eq!(rec.vintage, "NV");
    }

    #[test]
    fn test_pack_size_patterns() {
        assert_eq!(find_pack_size("x 12/750ml y"), Some((12, 750)));
        assert_eq!(find_pack_size("x 3/375ml y"), Some((3, 375)));
        assert_eq!(find_pack_size("x 1/5L y"), Some((1, 5000)));
        assert_eq!(find_pack_size("x 6/0.75L y"), Some((6, 750)));
        assert_eq!(find_pack_size("no sizes here"), None);
    }

    #[test]
    fn test_liter_volume_rounds_to_nearest_ml() {
        assert_eq!(find_pack_size("6/0.7549L"), Some((6, 755)));
        assert_eq!(find_pack_size("6/1.3334L"), Some((6, 1333)));
    }

    #[test]
    fn test_zero_counts_fall_back_to_defaults() {
        assert_eq!(find_pack_size("0/750ml"), None);
        assert_eq!(find_pack_size("6/0L"), None);

        let rec = extract_record("LD5 Cuvée Zéro 0/750ml $90.00/cs", "P, R", &cfg()).unwrap();
        assert_eq!(rec.pack_size, 12);
        assert_eq!(rec.bottle_size_ml, 750);
    }

    #[test]
    fn test_vintage_detection() {
        assert_eq!(find_vintage("Cuvée 2021"), Some("2021".to_string()));
        assert_eq!(find_vintage("Cuvée 2000"), Some("2000".to_string()));
        assert_eq!(find_vintage("Cuvée 2099"), Some("2099".to_string()));
        assert_eq!(find_vintage("Cuvée NV"), Some("NV".to_string()));
        assert_eq!(find_vintage("Cuvée 1999"), None);
        assert_eq!(find_vintage("Cuvée 2150"), None);
    }

    #[test]
    fn test_vintage_first_match_wins() {
        assert_eq!(find_vintage("2020 NV"), Some("2020".to_string()));
        assert_eq!(find_vintage("NV 2020"), Some("NV".to_string()));
    }

    #[test]
    fn test_vintage_needs_word_boundaries() {
        assert_eq!(find_vintage("Lot X2021"), None);
        assert_eq!(find_vintage("Lot 20211"), None);
    }

    #[test]
    fn test_category_inference() {
        assert_eq!(infer_category("Pétillant Naturel"), Category::Sparkling);
        assert_eq!(infer_category("Vino Frizzante"), Category::Sparkling);
        assert_eq!(infer_category("Rosato di Toscana"), Category::Rose);
        assert_eq!(infer_category("Vinho Branco"), Category::White);
        assert_eq!(infer_category("Rosso di Montalcino"), Category::Red);
        assert_eq!(infer_category("Tawny 10 Anos"), Category::Fortified);
        assert_eq!(infer_category("Cidre Bouché"), Category::Cider);
        assert_eq!(infer_category("Cuvée Tradition"), Category::Unclassified);
    }

    #[test]
    fn test_category_order_breaks_ties() {
        // Sparkling outranks rosé, rosé outranks red.
        assert_eq!(infer_category("Sparkling Rosé"), Category::Sparkling);
        assert_eq!(infer_category("Rosé Rouge"), Category::Rose);
        // Red keywords are checked before fortified ones.
        assert_eq!(infer_category("Porto Tinto"), Category::Red);
    }

    #[test]
    fn test_category_matches_substrings() {
        // Keyword matching is substring containment, not word matching.
        assert_eq!(infer_category("Rosenthal Vineyard"), Category::Rose);
    }

    #[test]
    fn test_category_is_case_insensitive() {
        assert_eq!(infer_category("GAMAY ROUGE"), Category::Red);
    }

    #[test]
    fn test_empty_producer_gets_placeholder() {
        let rec = extract_record("LD6 Cuvée X 2020 $80.00/cs", "", &cfg()).unwrap();
        assert_eq!(rec.producer, "Unknown Producer");
    }

    #[test]
    fn test_code_taken_verbatim() {
        let rec = extract_record("LD123-A Cuvée X 2020 $80.00/cs", "P, R", &cfg()).unwrap();
        assert_eq!(rec.code, "LD123-A");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let line = "LD1234 Domaine Test Rouge 2021 (12) (12/750ml) $180.00/cs";
        let a = extract_record(line, "P, R", &cfg());
        let b = extract_record(line, "P, R", &cfg());
        assert_eq!(a, b);
    }
}
