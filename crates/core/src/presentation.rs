//! Display-ready views of committed content for the public pages.

use serde::Serialize;

use crate::content::popup::RotationSchedule;
use crate::content::price::{currency_prefix, format_rupees, parse_price};
use crate::content::product::pinned_first;
use crate::content::{
    HeroContent, MenuCatalog, MenuEntry, PopupTheme, Product, PromotionalPopup, Service,
    TrendingItem,
};

pub const DEFAULT_HERO_IMAGE: &str =
    "https://res.cloudinary.com/dfgtpvpoh/image/upload/v1750432016/hero-bg_l5fqrz.png";
pub const DEFAULT_HERO_TEXT: &str = "From Fresh produce to daily essentials, shop smarter";
pub const DEFAULT_INSTA_LINK: &str = "https://www.instagram.com/mona_s_kitchen07/";
pub const DEFAULT_SERVICE_IMAGE: &str = "/default-service.jpg";
pub const TRENDING_IMAGE_PLACEHOLDER: &str = "/placeholder.svg?height=300&width=300";

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuLine {
    pub name: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// e.g. `"Naan — ₹40"`.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub category: String,
    pub items: Vec<MenuLine>,
}

pub fn menu_line(entry: &MenuEntry) -> MenuLine {
    let price = format_rupees(&entry.price);
    let display = if price.is_empty() {
        entry.name.clone()
    } else {
        format!("{} — {}", entry.name, price)
    };
    MenuLine {
        name: entry.name.clone(),
        price,
        description: entry.description.clone().filter(|d| !d.is_empty()),
        display,
    }
}

/// One section per category, in catalog order.
pub fn menu_sections(catalog: &MenuCatalog) -> Vec<MenuSection> {
    catalog
        .categories()
        .map(|(category, items)| MenuSection {
            category: category.to_string(),
            items: items.iter().map(menu_line).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trending
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCard {
    pub id: String,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub image: String,
    pub category: String,
    pub rating: f64,
    pub description: String,
    pub features: Vec<String>,
    pub trending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_badge: Option<String>,
}

impl From<TrendingItem> for TrendingCard {
    fn from(item: TrendingItem) -> Self {
        let discount_badge = (item.discount > 0.0).then(|| format!("{}% OFF", item.discount));
        Self {
            id: item.id,
            name: item.name,
            price: format_rupees(&item.price),
            unit: item.unit,
            image: if item.image.trim().is_empty() {
                TRENDING_IMAGE_PLACEHOLDER.to_string()
            } else {
                item.image
            },
            category: item.category,
            rating: item.rating,
            description: item.description,
            features: item.features,
            trending: item.trending,
            discount_badge,
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Products matching any of `terms` (all products when `terms` is empty),
/// pinned first.
pub fn product_listing(products: Vec<Product>, terms: &[String]) -> Vec<Product> {
    let matching = if terms.is_empty() {
        products
    } else {
        products
            .into_iter()
            .filter(|p| terms.iter().any(|t| p.matches(t)))
            .collect()
    };
    pinned_first(matching)
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    pub img: String,
    pub theme: PopupTheme,
    /// Price before the discount, shown struck through. Omitted when the
    /// price is not a number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
}

/// `price * 1.3` with two decimals, keeping the currency symbol (`$` when
/// the price has none, like the offer defaults).
pub fn original_price(price: &str) -> Option<String> {
    let value = parse_price(price)?;
    let symbol = match currency_prefix(price) {
        "" => "$",
        symbol => symbol,
    };
    Some(format!("{symbol}{:.2}", value * 1.3))
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl From<PromotionalPopup> for OfferView {
    fn from(popup: PromotionalPopup) -> Self {
        let price = or_default(popup.price, "$0.00");
        Self {
            original_price: original_price(&price),
            id: popup.id,
            title: or_default(popup.title, "Special Offer"),
            desc: popup.desc,
            price,
            discount: popup.discount,
            img: or_default(popup.img, "🛒"),
            theme: popup.theme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupFeed {
    pub offers: Vec<OfferView>,
    pub schedule: RotationSchedule,
    /// Only more than one offer rotates.
    pub rotates: bool,
}

impl PopupFeed {
    pub fn new(popups: Vec<PromotionalPopup>) -> Self {
        let offers: Vec<OfferView> = popups.into_iter().map(OfferView::from).collect();
        Self {
            rotates: offers.len() > 1,
            offers,
            schedule: RotationSchedule::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroView {
    pub image_url: String,
    pub text: String,
    pub insta_link: String,
}

impl From<Option<HeroContent>> for HeroView {
    fn from(hero: Option<HeroContent>) -> Self {
        let hero = hero.unwrap_or_default();
        Self {
            image_url: or_default(hero.image_url, DEFAULT_HERO_IMAGE),
            text: or_default(hero.text, DEFAULT_HERO_TEXT),
            insta_link: or_default(hero.insta_link, DEFAULT_INSTA_LINK),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl From<Service> for ServiceCard {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            title: service.title,
            description: service.description,
            image_url: or_default(service.image_url, DEFAULT_SERVICE_IMAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Pinned;

    #[test]
    fn menu_line_formats_name_and_price() {
        let line = menu_line(&MenuEntry::new("Naan", "40"));
        assert_eq!(line.display, "Naan — ₹40");
        let line = menu_line(&MenuEntry::new("Naan", "₹40"));
        assert_eq!(line.display, "Naan — ₹40");
    }

    #[test]
    fn sections_follow_catalog() {
        let mut catalog = MenuCatalog::new();
        catalog.add_item("Breads", MenuEntry::new("Naan", "40"));
        catalog.add_category("Rice");
        let sections = menu_sections(&catalog);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].category, "Breads");
        assert_eq!(sections[0].items[0].display, "Naan — ₹40");
        assert!(sections[1].items.is_empty());
    }

    #[test]
    fn trending_card_badge_and_placeholder() {
        let card = TrendingCard::from(TrendingItem {
            name: "Modak".into(),
            price: "25".into(),
            discount: 10.0,
            ..TrendingItem::default()
        });
        assert_eq!(card.price, "₹25");
        assert_eq!(card.discount_badge.as_deref(), Some("10% OFF"));
        assert_eq!(card.image, TRENDING_IMAGE_PLACEHOLDER);

        let card = TrendingCard::from(TrendingItem::default());
        assert!(card.discount_badge.is_none());
    }

    #[test]
    fn offer_defaults_and_original_price() {
        let offer = OfferView::from(PromotionalPopup::default());
        assert_eq!(offer.title, "Special Offer");
        assert_eq!(offer.price, "$0.00");
        assert_eq!(offer.img, "🛒");
        assert_eq!(offer.theme, PopupTheme::Orange);

        assert_eq!(original_price("$10").as_deref(), Some("$13.00"));
        assert_eq!(original_price("4.99").as_deref(), Some("$6.49"));
        assert_eq!(original_price("₹40").as_deref(), Some("₹52.00"));
        assert_eq!(original_price("free"), None);
    }

    #[test]
    fn popup_feed_rotates_only_with_several_offers() {
        assert!(!PopupFeed::new(vec![PromotionalPopup::default()]).rotates);
        assert!(PopupFeed::new(vec![PromotionalPopup::default(); 2]).rotates);
    }

    #[test]
    fn hero_falls_back_per_key() {
        let view = HeroView::from(Some(HeroContent {
            text: "Ghar ka khana".into(),
            ..HeroContent::default()
        }));
        assert_eq!(view.text, "Ghar ka khana");
        assert_eq!(view.image_url, DEFAULT_HERO_IMAGE);
        assert_eq!(HeroView::from(None).insta_link, DEFAULT_INSTA_LINK);
    }

    #[test]
    fn product_listing_filters_then_pins() {
        let product = |id: &str, title: &str, pinned| Product {
            id: id.into(),
            title: title.into(),
            photolink: "p".into(),
            pinned: Some(pinned),
            ..Product::default()
        };
        let products = vec![
            product("a", "Puran Poli", Pinned::No),
            product("b", "Besan Ladoo", Pinned::No),
            product("c", "Rava Ladoo", Pinned::Yes),
        ];
        let listed = product_listing(products.clone(), &["ladoo".to_string()]);
        let ids: Vec<_> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(product_listing(products, &[]).len(), 3);
    }
}
