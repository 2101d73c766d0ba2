//! Marker glyph styles.

use crate::domain::category::SaleCategory;
use crate::domain::geo::Coordinates;
use crate::domain::ports::{MarkerSpec, MarkerStyle};
use crate::domain::sale::Sale;

const STROKE_WHITE: &str = "#FFFFFF";
const SALE_STROKE_WEIGHT: u8 = 2;
const LOCATION_STROKE_WEIGHT: u8 = 3;
const LOCATION_Z_INDEX: u16 = 1000;

/// Which location marker to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMarkerKind {
    /// A real device or manual position.
    Live,
    /// The default centre, shown when the position is unknown.
    Default,
}

impl LocationMarkerKind {
    /// Hover title for the marker.
    pub fn title(self) -> &'static str {
        match self {
            Self::Live => "Your Current Location",
            Self::Default => "Default Location (Click location button to find you)",
        }
    }

    /// Glyph style for the marker.
    pub fn style(self) -> MarkerStyle {
        let (fill_color, scale) = match self {
            Self::Live => ("#4285F4", 10),
            Self::Default => ("#FF6B6B", 8),
        };
        MarkerStyle {
            fill_color,
            scale,
            stroke_color: STROKE_WHITE,
            stroke_weight: LOCATION_STROKE_WEIGHT,
            z_index: LOCATION_Z_INDEX,
        }
    }
}

/// Marker spec for a location marker at `position`.
pub fn location_marker_spec(kind: LocationMarkerKind, position: Coordinates) -> MarkerSpec {
    MarkerSpec {
        position,
        title: kind.title().to_owned(),
        style: kind.style(),
        on_click: None,
    }
}

/// Style for a sale marker, keyed by category and origin.
///
/// User posts draw larger and above store listings.
pub fn sale_marker_style(category: SaleCategory, is_user_posted: bool) -> MarkerStyle {
    let (scale, z_index) = if is_user_posted { (12, 100) } else { (10, 50) };
    MarkerStyle {
        fill_color: category.color(),
        scale,
        stroke_color: STROKE_WHITE,
        stroke_weight: SALE_STROKE_WEIGHT,
        z_index,
    }
}

/// Style for `sale`.
pub fn style_for(sale: &Sale) -> MarkerStyle {
    sale_marker_style(sale.category, sale.is_user_posted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SaleCategory::GarageSale, true, "#14B8A6", 12, 100)]
    #[case(SaleCategory::EstateSale, true, "#8B5CF6", 12, 100)]
    #[case(SaleCategory::ThriftStore, false, "#F97316", 10, 50)]
    #[case(SaleCategory::ConsignmentShop, false, "#3B82F6", 10, 50)]
    fn sale_styles_follow_category_and_origin(
        #[case] category: SaleCategory,
        #[case] user_posted: bool,
        #[case] color: &str,
        #[case] scale: u8,
        #[case] z_index: u16,
    ) {
        let style = sale_marker_style(category, user_posted);
        assert_eq!(style.fill_color, color);
        assert_eq!(style.scale, scale);
        assert_eq!(style.z_index, z_index);
        assert_eq!(style.stroke_color, "#FFFFFF");
    }

    #[test]
    fn location_markers_are_distinguishable() {
        let live = LocationMarkerKind::Live.style();
        let fallback = LocationMarkerKind::Default.style();
        assert_ne!(live.fill_color, fallback.fill_color);
        assert_eq!((live.scale, fallback.scale), (10, 8));
        assert_eq!(live.z_index, 1000);
    }
}
