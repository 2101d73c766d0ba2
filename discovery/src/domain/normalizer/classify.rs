//! Heuristic category classification for provider listings.
//!
//! Classification walks [`CLASSIFICATION_RULES`] in order and the first
//! matching rule wins. The order encodes precedence: brand keywords beat
//! generic type tags, so "Savers Thrift Superstore" tagged `clothing_store`
//! is a thrift store rather than a consignment shop. Do not reorder the
//! table, and do not turn it into a map.

use crate::domain::category::SaleCategory;

const THRIFT_BRANDS: &[&str] = &[
    "thrift",
    "goodwill",
    "salvation army",
    "savers",
    "value village",
    "community thrift",
];
const CONSIGNMENT_BRANDS: &[&str] = &["consignment", "crossroads", "buffalo exchange", "platos closet"];
const SECOND_HAND: &[&str] = &["second hand", "used"];
const ANTIQUE: &[&str] = &["antique", "vintage", "collectible"];
const MARKETS: &[&str] = &["flea market", "farmers market", "swap meet"];

const CLOTHING_STORE: &str = "clothing_store";
const FURNITURE_STORE: &str = "furniture_store";
const HOME_GOODS_STORE: &str = "home_goods_store";

/// Lowercased text view of a listing used by the rule predicates.
pub struct ListingText<'a> {
    haystack: String,
    types: &'a [String],
}

impl<'a> ListingText<'a> {
    /// Build the view from a listing name and its provider type tags.
    pub fn new(name: &str, types: &'a [String]) -> Self {
        let mut haystack = types.join(" ");
        if !haystack.is_empty() {
            haystack.push(' ');
        }
        haystack.push_str(name);
        Self {
            haystack: haystack.to_lowercase(),
            types,
        }
    }

    fn mentions_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.haystack.contains(needle))
    }

    fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|candidate| candidate == tag)
    }
}

/// One `(predicate, category)` entry of the rule table.
pub struct ClassificationRule {
    /// Short label for logs and tests.
    pub label: &'static str,
    /// Predicate over the listing text.
    pub matches: fn(&ListingText<'_>) -> bool,
    /// Category assigned when the predicate holds.
    pub category: SaleCategory,
}

fn thrift_brand(text: &ListingText<'_>) -> bool {
    text.mentions_any(THRIFT_BRANDS)
}

fn consignment_brand_or_used_clothing(text: &ListingText<'_>) -> bool {
    text.mentions_any(CONSIGNMENT_BRANDS)
        || (text.has_type(CLOTHING_STORE) && text.mentions_any(SECOND_HAND))
}

fn antique_or_vintage(text: &ListingText<'_>) -> bool {
    text.mentions_any(ANTIQUE)
}

fn market(text: &ListingText<'_>) -> bool {
    text.mentions_any(MARKETS)
}

fn used_furniture(text: &ListingText<'_>) -> bool {
    text.has_type(FURNITURE_STORE) && text.mentions_any(SECOND_HAND)
}

fn clothing_store(text: &ListingText<'_>) -> bool {
    text.has_type(CLOTHING_STORE)
}

fn home_goods_or_furniture(text: &ListingText<'_>) -> bool {
    text.has_type(HOME_GOODS_STORE) || text.has_type(FURNITURE_STORE)
}

/// Ordered, first-match-wins classification rules.
pub const CLASSIFICATION_RULES: [ClassificationRule; 7] = [
    ClassificationRule {
        label: "thrift-brand",
        matches: thrift_brand,
        category: SaleCategory::ThriftStore,
    },
    ClassificationRule {
        label: "consignment-brand",
        matches: consignment_brand_or_used_clothing,
        category: SaleCategory::ConsignmentShop,
    },
    ClassificationRule {
        label: "antique-vintage",
        matches: antique_or_vintage,
        category: SaleCategory::Other,
    },
    ClassificationRule {
        label: "market",
        matches: market,
        category: SaleCategory::FleaMarket,
    },
    ClassificationRule {
        label: "used-furniture",
        matches: used_furniture,
        category: SaleCategory::ThriftStore,
    },
    ClassificationRule {
        label: "clothing-store",
        matches: clothing_store,
        category: SaleCategory::ConsignmentShop,
    },
    ClassificationRule {
        label: "home-goods",
        matches: home_goods_or_furniture,
        category: SaleCategory::ThriftStore,
    },
];

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: SaleCategory = SaleCategory::ThriftStore;

/// Classify a listing from its name and provider type tags.
///
/// # Examples
/// ```
/// use thriftures::domain::SaleCategory;
/// use thriftures::domain::normalizer::classify;
///
/// let types = vec!["clothing_store".to_owned()];
/// assert_eq!(classify("Savers Thrift Superstore", &types), SaleCategory::ThriftStore);
/// assert_eq!(classify("Jane's Closet", &types), SaleCategory::ConsignmentShop);
/// ```
pub fn classify(name: &str, types: &[String]) -> SaleCategory {
    let text = ListingText::new(name, types);
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map_or(DEFAULT_CATEGORY, |rule| rule.category)
}
