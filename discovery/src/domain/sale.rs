//! Canonical `Sale` entity.
//!
//! A sale is either a self-service post (garage sale, estate sale) or a
//! business listing normalised from the places provider. Both field groups
//! are always present so renderers never branch on shape; `is_user_posted`
//! decides which group is authoritative:
//!
//! - user-posted: `posted_by`, `likes`, `comments`, neighbourhood fields;
//! - provider-sourced: `store_hours`, `phone`, `website`, `rating`.
//!
//! Sales are immutable once built. Provider sales are produced by
//! [`crate::domain::normalizer`]; user posts go through
//! [`Sale::user_posted`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::SaleCategory;
use super::geo::Coordinates;

/// Prefix applied to every provider-sourced sale id.
pub const PROVIDER_ID_PREFIX: &str = "provider_";

/// Maximum number of images kept on a user post.
pub const USER_POST_IMAGE_LIMIT: usize = 5;

/// Marketplace sale or store listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique id; provider ids start with [`PROVIDER_ID_PREFIX`].
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Sale category.
    pub category: SaleCategory,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Best-available human-readable address.
    pub address: String,
    /// First day of the sale window.
    pub start_date: NaiveDate,
    /// Last day of the sale window.
    pub end_date: NaiveDate,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Poster display name (store name for provider listings).
    pub posted_by: String,
    /// Post creation instant.
    pub posted_at: DateTime<Utc>,
    /// Like counter.
    pub likes: u32,
    /// Comment counter.
    pub comments: u32,
    /// Discriminates user posts from provider listings.
    pub is_user_posted: bool,
    /// Joined weekly opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_hours: Option<String>,
    /// Store phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Store website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Provider rating, only meaningful for store listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Part of a coordinated neighbourhood sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_neighborhood_sale: Option<bool>,
    /// Neighbourhood sale name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood_sale_name: Option<String>,
}

/// Fields a user supplies when posting a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSaleDraft {
    /// Unique id chosen by the posting flow.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Sale category.
    pub category: SaleCategory,
    /// Sale location.
    pub location: Coordinates,
    /// Street address.
    pub address: String,
    /// First day of the sale.
    pub start_date: NaiveDate,
    /// Last day of the sale.
    pub end_date: NaiveDate,
    /// Image URLs in upload order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Poster display name.
    pub posted_by: String,
    /// Post creation instant.
    pub posted_at: DateTime<Utc>,
    /// Like counter.
    #[serde(default)]
    pub likes: u32,
    /// Comment counter.
    #[serde(default)]
    pub comments: u32,
    /// Neighbourhood sale name, if coordinated with neighbours.
    #[serde(default)]
    pub neighborhood_sale_name: Option<String>,
}

impl Sale {
    /// Build a user-posted sale.
    ///
    /// Images beyond [`USER_POST_IMAGE_LIMIT`] are dropped and neighbourhood
    /// metadata is kept only for garage sales.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use thriftures::domain::{Coordinates, Sale, SaleCategory, UserSaleDraft};
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 5, 2).expect("valid date");
    /// let sale = Sale::user_posted(UserSaleDraft {
    ///     id: "user_1".to_owned(),
    ///     title: "Moving sale".to_owned(),
    ///     description: "Everything must go".to_owned(),
    ///     category: SaleCategory::EstateSale,
    ///     location: Coordinates::new(37.77, -122.42),
    ///     address: "12 Oak St".to_owned(),
    ///     start_date: day,
    ///     end_date: day,
    ///     images: vec!["https://img.example/1.jpg".to_owned(); 7],
    ///     posted_by: "Sam".to_owned(),
    ///     posted_at: Utc.with_ymd_and_hms(2026, 4, 30, 9, 0, 0).single().expect("valid"),
    ///     likes: 3,
    ///     comments: 1,
    ///     neighborhood_sale_name: Some("Oak Street Days".to_owned()),
    /// });
    /// assert!(sale.is_user_posted);
    /// assert_eq!(sale.images.len(), 5);
    /// assert!(sale.neighborhood_sale_name.is_none());
    /// ```
    pub fn user_posted(draft: UserSaleDraft) -> Self {
        let UserSaleDraft {
            id,
            title,
            description,
            category,
            location,
            address,
            start_date,
            end_date,
            mut images,
            posted_by,
            posted_at,
            likes,
            comments,
            neighborhood_sale_name,
        } = draft;
        images.truncate(USER_POST_IMAGE_LIMIT);

        let neighborhood_sale_name = neighborhood_sale_name
            .filter(|name| category == SaleCategory::GarageSale && !name.trim().is_empty());
        let is_neighborhood_sale =
            (category == SaleCategory::GarageSale).then_some(neighborhood_sale_name.is_some());

        Self {
            id,
            title,
            description,
            category,
            latitude: location.latitude,
            longitude: location.longitude,
            address,
            start_date,
            end_date,
            images,
            posted_by,
            posted_at,
            likes,
            comments,
            is_user_posted: true,
            store_hours: None,
            phone: None,
            website: None,
            rating: None,
            is_neighborhood_sale,
            neighborhood_sale_name,
        }
    }

    /// Sale position.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Turn-by-turn directions link for the sale.
    pub fn navigation_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.latitude, self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(category: SaleCategory) -> UserSaleDraft {
        let day = NaiveDate::from_ymd_opt(2026, 6, 6).expect("valid date");
        UserSaleDraft {
            id: "user_garage_1".to_owned(),
            title: "Block party garage sale".to_owned(),
            description: "Tools and toys".to_owned(),
            category,
            location: Coordinates::new(37.76, -122.43),
            address: "400 Castro St".to_owned(),
            start_date: day,
            end_date: day,
            images: Vec::new(),
            posted_by: "Riley".to_owned(),
            posted_at: Utc
                .with_ymd_and_hms(2026, 6, 1, 8, 0, 0)
                .single()
                .expect("valid time"),
            likes: 12,
            comments: 4,
            neighborhood_sale_name: Some("Castro Neighborhood Sale".to_owned()),
        }
    }

    #[test]
    fn garage_sales_keep_neighbourhood_metadata() {
        let sale = Sale::user_posted(draft(SaleCategory::GarageSale));
        assert_eq!(sale.is_neighborhood_sale, Some(true));
        assert_eq!(
            sale.neighborhood_sale_name.as_deref(),
            Some("Castro Neighborhood Sale")
        );
        assert!(sale.rating.is_none());
        assert!(sale.store_hours.is_none());
    }

    #[test]
    fn non_garage_sales_drop_neighbourhood_metadata() {
        let sale = Sale::user_posted(draft(SaleCategory::EstateSale));
        assert!(sale.is_neighborhood_sale.is_none());
        assert!(sale.neighborhood_sale_name.is_none());
    }

    #[test]
    fn navigation_url_targets_the_sale_position() {
        let sale = Sale::user_posted(draft(SaleCategory::GarageSale));
        assert_eq!(
            sale.navigation_url(),
            "https://www.google.com/maps/dir/?api=1&destination=37.76,-122.43"
        );
    }
}
