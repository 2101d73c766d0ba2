//! Deterministic layout for the non-interactive placeholder map.

use serde::Serialize;

use crate::domain::sale::Sale;

/// Most sales drawn on the placeholder.
pub const PLACEHOLDER_LIMIT: usize = 15;

const STORE_GLYPH: &str = "🏪";
const USER_POST_GLYPH: &str = "📍";

/// One positioned glyph on the placeholder map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderMarker {
    /// Sale shown by the glyph.
    pub sale_id: String,
    /// Horizontal offset in percent.
    pub left_percent: u32,
    /// Vertical offset in percent.
    pub top_percent: u32,
    /// Category colour.
    pub color: &'static str,
    /// Store or pin glyph.
    pub glyph: &'static str,
}

/// Lay out the first [`PLACEHOLDER_LIMIT`] sales on a diagonal.
pub fn placeholder_layout(sales: &[Sale]) -> Vec<PlaceholderMarker> {
    sales
        .iter()
        .take(PLACEHOLDER_LIMIT)
        .zip(0_u32..)
        .map(|(sale, index)| PlaceholderMarker {
            sale_id: sale.id.clone(),
            left_percent: 15 + 6 * index,
            top_percent: 25 + 4 * index,
            color: sale.category.color(),
            glyph: if sale.is_user_posted {
                USER_POST_GLYPH
            } else {
                STORE_GLYPH
            },
        })
        .collect()
}
