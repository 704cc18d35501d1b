use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, quantified junk item — recognized by the photo detector or
/// entered manually. Scoped to one quote session, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedItem {
    /// Opaque per-instance token, unique within a session.
    pub id: Uuid,
    /// Free-text item name ("Sofa", "Mini fridge", ...).
    pub name: String,
    /// Always >= 1. Decrements are floor-clamped, never reach 0.
    pub quantity: u32,
}

impl DetectedItem {
    /// New item with quantity defaulted to 1 and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity: 1,
        }
    }

    /// `"2x Sofa"`-style line used in pricing prompts and quote handoff.
    pub fn format_line(&self) -> String {
        format!("{}x {}", self.quantity, self.name)
    }
}

/// Format a whole item list as `"2x Sofa"`-style lines.
pub fn format_item_lines(items: &[DetectedItem]) -> Vec<String> {
    items.iter().map(DetectedItem::format_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_defaults_quantity_to_one() {
        let item = DetectedItem::new("Sofa");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.name, "Sofa");
    }

    #[test]
    fn new_items_get_unique_ids() {
        let a = DetectedItem::new("Sofa");
        let b = DetectedItem::new("Sofa");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn format_line_includes_quantity() {
        let mut item = DetectedItem::new("Sofa");
        item.quantity = 2;
        assert_eq!(item.format_line(), "2x Sofa");
    }

    #[test]
    fn format_item_lines_preserves_order() {
        let mut sofa = DetectedItem::new("Sofa");
        sofa.quantity = 2;
        let table = DetectedItem::new("Coffee Table");
        let lines = format_item_lines(&[sofa, table]);
        assert_eq!(lines, vec!["2x Sofa", "1x Coffee Table"]);
    }
}
