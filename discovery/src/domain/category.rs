//! Sale categories, their shared colour palette, and the category filter.
//!
//! The palette is the single source of marker and list colours; map markers,
//! placeholder markers, and list badges all read it through
//! [`SaleCategory::color`].

use serde::{Deserialize, Serialize};

/// Closed set of sale categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaleCategory {
    /// Self-hosted garage or yard sale.
    GarageSale,
    /// Estate liquidation sale.
    EstateSale,
    /// Thrift or charity retail store.
    ThriftStore,
    /// Flea market, swap meet, or farmers market.
    FleaMarket,
    /// Consignment or resale clothing shop.
    ConsignmentShop,
    /// Anything else, including antique and vintage shops.
    Other,
}

impl SaleCategory {
    /// Every category in display order.
    pub const ALL: [Self; 6] = [
        Self::GarageSale,
        Self::EstateSale,
        Self::ThriftStore,
        Self::FleaMarket,
        Self::ConsignmentShop,
        Self::Other,
    ];

    /// Hex colour shared by map markers and list rendering.
    pub fn color(self) -> &'static str {
        match self {
            Self::GarageSale => "#14B8A6",
            Self::EstateSale => "#8B5CF6",
            Self::ThriftStore => "#F97316",
            Self::FleaMarket => "#EF4444",
            Self::ConsignmentShop => "#3B82F6",
            Self::Other => "#6B7280",
        }
    }

    /// Plural label used by filter toggles.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::GarageSale => "Garage Sales",
            Self::EstateSale => "Estate Sales",
            Self::ThriftStore => "Thrift Stores",
            Self::FleaMarket => "Flea Markets",
            Self::ConsignmentShop => "Consignment Shops",
            Self::Other => "Other Sales",
        }
    }

    /// Stable kebab-case key used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Self::GarageSale => "garage-sale",
            Self::EstateSale => "estate-sale",
            Self::ThriftStore => "thrift-store",
            Self::FleaMarket => "flea-market",
            Self::ConsignmentShop => "consignment-shop",
            Self::Other => "other",
        }
    }

    /// Parse a category from its [`slug`](Self::slug).
    ///
    /// # Examples
    /// ```
    /// use thriftures::domain::SaleCategory;
    ///
    /// assert_eq!(SaleCategory::from_slug("flea-market"), Some(SaleCategory::FleaMarket));
    /// assert_eq!(SaleCategory::from_slug("boutique"), None);
    /// ```
    pub fn from_slug(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(needle))
    }
}

/// Category toggle state.
///
/// ## Invariants
/// - Every category has an explicit flag; there is no "unset" state, so
///   [`CategoryFilter::is_enabled`] is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    garage_sales: bool,
    estate_sales: bool,
    thrift_stores: bool,
    flea_markets: bool,
    consignment_shops: bool,
    other: bool,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl CategoryFilter {
    /// Filter with every category enabled.
    pub fn all() -> Self {
        Self::uniform(true)
    }

    /// Filter with every category disabled.
    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            garage_sales: enabled,
            estate_sales: enabled,
            thrift_stores: enabled,
            flea_markets: enabled,
            consignment_shops: enabled,
            other: enabled,
        }
    }

    /// Build a filter with all categories enabled except `excluded`.
    pub fn excluding(excluded: impl IntoIterator<Item = SaleCategory>) -> Self {
        let mut filter = Self::all();
        for category in excluded {
            filter.set(category, false);
        }
        filter
    }

    /// Whether sales in `category` are shown.
    pub fn is_enabled(&self, category: SaleCategory) -> bool {
        *self.flag(category)
    }

    /// Set the flag for one category.
    pub fn set(&mut self, category: SaleCategory, enabled: bool) {
        *self.flag_mut(category) = enabled;
    }

    /// Invert the flag for one category.
    pub fn toggle(&mut self, category: SaleCategory) {
        let flag = self.flag_mut(category);
        *flag = !*flag;
    }

    /// Enable every category.
    pub fn select_all(&mut self) {
        *self = Self::all();
    }

    /// Disable every category.
    pub fn clear_all(&mut self) {
        *self = Self::none();
    }

    /// Iterate `(category, enabled)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SaleCategory, bool)> + '_ {
        SaleCategory::ALL
            .into_iter()
            .map(|category| (category, self.is_enabled(category)))
    }

    fn flag(&self, category: SaleCategory) -> &bool {
        match category {
            SaleCategory::GarageSale => &self.garage_sales,
            SaleCategory::EstateSale => &self.estate_sales,
            SaleCategory::ThriftStore => &self.thrift_stores,
            SaleCategory::FleaMarket => &self.flea_markets,
            SaleCategory::ConsignmentShop => &self.consignment_shops,
            SaleCategory::Other => &self.other,
        }
    }

    fn flag_mut(&mut self, category: SaleCategory) -> &mut bool {
        match category {
            SaleCategory::GarageSale => &mut self.garage_sales,
            SaleCategory::EstateSale => &mut self.estate_sales,
            SaleCategory::ThriftStore => &mut self.thrift_stores,
            SaleCategory::FleaMarket => &mut self.flea_markets,
            SaleCategory::ConsignmentShop => &mut self.consignment_shops,
            SaleCategory::Other => &mut self.other,
        }
    }
}
