//! Manual item catalog for visitors who skip the photo path.

use std::collections::BTreeMap;

use crate::models::DetectedItem;

pub struct CatalogCategory {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

/// Fixed catalog shown on the manual-entry screen.
pub const CATALOG: &[CatalogCategory] = &[
    CatalogCategory {
        name: "Furniture",
        items: &[
            "Sofa",
            "Loveseat",
            "Recliner",
            "Mattress",
            "Box Spring",
            "Bed Frame",
            "Dresser",
            "Desk",
            "Dining Table",
            "Chair",
            "Bookshelf",
        ],
    },
    CatalogCategory {
        name: "Appliances",
        items: &[
            "Refrigerator",
            "Freezer",
            "Washer",
            "Dryer",
            "Dishwasher",
            "Stove",
            "Microwave",
            "Water Heater",
        ],
    },
    CatalogCategory {
        name: "Electronics",
        items: &["Television", "Computer Monitor", "Printer", "Stereo Equipment"],
    },
    CatalogCategory {
        name: "Outdoor",
        items: &[
            "Grill",
            "Patio Furniture",
            "Lawn Mower",
            "Hot Tub",
            "Swing Set",
            "Fence Panels",
        ],
    },
    CatalogCategory {
        name: "Exercise",
        items: &["Treadmill", "Elliptical", "Weight Bench", "Exercise Bike"],
    },
    CatalogCategory {
        name: "Miscellaneous",
        items: &[
            "Piano",
            "Carpet",
            "Tires",
            "Boxes of Junk",
            "Yard Waste Bags",
            "Construction Debris",
        ],
    },
];

/// Look up a catalog item name, case-insensitively.
pub fn catalog_contains(name: &str) -> bool {
    CATALOG.iter().any(|category| {
        category
            .items
            .iter()
            .any(|item| item.eq_ignore_ascii_case(name))
    })
}

/// Items picked from the catalog screen, keyed by display name.
///
/// Selection order is not meaningful; names sort alphabetically when the
/// selection becomes an item list.
#[derive(Debug, Default)]
pub struct ManualSelection {
    quantities: BTreeMap<String, u32>,
}

impl ManualSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.quantities.contains_key(name)
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.quantities.get(name).copied().unwrap_or(0)
    }

    /// Select an unselected item at quantity 1, or deselect it entirely.
    pub fn toggle(&mut self, name: &str) {
        if self.quantities.remove(name).is_none() {
            self.quantities.insert(name.to_string(), 1);
        }
    }

    /// Free-text item not in the catalog. Blank names are ignored.
    pub fn add_custom(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        *self.quantities.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn increment(&mut self, name: &str) {
        if let Some(qty) = self.quantities.get_mut(name) {
            *qty += 1;
        }
    }

    /// Decrement a selected item's quantity, never below 1.
    pub fn decrement(&mut self, name: &str) {
        if let Some(qty) = self.quantities.get_mut(name) {
            if *qty > 1 {
                *qty -= 1;
            }
        }
    }

    /// Convert into the same item shape the photo path produces.
    pub fn into_items(self) -> Vec<DetectedItem> {
        self.quantities
            .into_iter()
            .map(|(name, quantity)| {
                let mut item = DetectedItem::new(name);
                item.quantity = quantity;
                item
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_item_lines;

    #[test]
    fn catalog_covers_common_bulky_items() {
        assert!(catalog_contains("Mattress"));
        assert!(catalog_contains("refrigerator"));
        assert!(catalog_contains("Hot Tub"));
        assert!(!catalog_contains("Spaceship"));
    }

    #[test]
    fn toggle_selects_then_deselects() {
        let mut selection = ManualSelection::new();
        selection.toggle("Sofa");
        assert!(selection.is_selected("Sofa"));
        assert_eq!(selection.quantity("Sofa"), 1);

        selection.toggle("Sofa");
        assert!(!selection.is_selected("Sofa"));
        assert!(selection.is_empty());
    }

    #[test]
    fn decrement_floors_at_one() {
        let mut selection = ManualSelection::new();
        selection.toggle("Tires");
        selection.increment("Tires");
        assert_eq!(selection.quantity("Tires"), 2);

        selection.decrement("Tires");
        selection.decrement("Tires");
        assert_eq!(selection.quantity("Tires"), 1);
    }

    #[test]
    fn custom_items_accumulate() {
        let mut selection = ManualSelection::new();
        selection.add_custom("Broken Kiln");
        selection.add_custom("Broken Kiln");
        selection.add_custom("   ");
        assert_eq!(selection.quantity("Broken Kiln"), 2);
        assert!(!selection.is_selected("   "));
    }

    #[test]
    fn catalog_selection_reaches_the_same_handoff_shape() {
        use crate::models::{PriceEstimate, PriceRange};
        use crate::pipeline::corrector::enforce_span;
        use crate::quote::QuoteSession;

        let mut selection = ManualSelection::new();
        selection.toggle("Mattress");
        selection.toggle("Box Spring");

        let mut session = QuoteSession::new();
        session.begin_review(selection.into_items()).unwrap();
        assert!(session.can_price());

        // a raw 60-dollar span from the estimator gets normalized on the way in
        let estimate = enforce_span(PriceEstimate {
            estimated_volume: "Minimum load".into(),
            price_range: PriceRange { min: 99.0, max: 159.0 },
            summary: String::new(),
        });
        session.price(estimate).unwrap();

        let quote = session.hand_off().unwrap();
        assert_eq!(quote.items_detected, vec!["1x Box Spring", "1x Mattress"]);
        assert_eq!(quote.price_max - quote.price_min, 80.0);
    }

    #[test]
    fn into_items_matches_photo_path_shape() {
        let mut selection = ManualSelection::new();
        selection.toggle("Mattress");
        selection.toggle("Sofa");
        selection.increment("Sofa");

        let items = selection.into_items();
        let lines = format_item_lines(&items);
        assert_eq!(lines, vec!["1x Mattress", "2x Sofa"]);
        assert!(items.iter().all(|item| item.quantity >= 1));
    }
}
