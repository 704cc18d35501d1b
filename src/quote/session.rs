//! Quote session state machine.
//!
//! A session walks one direction through the funnel: photo upload (or
//! manual catalog entry), item review, pricing, hand-off into a booking
//! form. Items are only editable during review; going back from a priced
//! state discards the stale estimate.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DetectedItem, PriceEstimate, QuoteEstimate};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Action \"{action}\" is not allowed in the {state} state")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("Cannot price an empty item list")]
    EmptyItemList,
    #[error("No item with id {0} in this session")]
    UnknownItem(Uuid),
}

/// One visitor's pass through the quote funnel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum QuoteSession {
    /// Waiting for a photo or a manual-entry choice.
    Upload,
    /// Items confirmed or being edited by the visitor.
    ItemsReview { items: Vec<DetectedItem> },
    /// An estimate is on screen; items are frozen.
    Priced {
        items: Vec<DetectedItem>,
        estimate: PriceEstimate,
    },
    /// The quote was carried into a booking form.
    HandedOff { quote: QuoteEstimate },
}

impl QuoteSession {
    pub fn new() -> Self {
        QuoteSession::Upload
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            QuoteSession::Upload => "upload",
            QuoteSession::ItemsReview { .. } => "itemsReview",
            QuoteSession::Priced { .. } => "priced",
            QuoteSession::HandedOff { .. } => "handedOff",
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state_name(),
            action,
        }
    }

    /// Items visible in the current state, if any.
    pub fn items(&self) -> Option<&[DetectedItem]> {
        match self {
            QuoteSession::ItemsReview { items } | QuoteSession::Priced { items, .. } => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Enter review with detected items. Only valid from the upload state.
    pub fn begin_review(&mut self, items: Vec<DetectedItem>) -> Result<(), SessionError> {
        match self {
            QuoteSession::Upload => {
                *self = QuoteSession::ItemsReview { items };
                Ok(())
            }
            _ => Err(self.invalid("beginReview")),
        }
    }

    /// Enter review with an empty list for manual catalog entry.
    pub fn begin_manual(&mut self) -> Result<(), SessionError> {
        self.begin_review(Vec::new()).map_err(|_| SessionError::InvalidTransition {
            state: self.state_name(),
            action: "beginManual",
        })
    }

    fn review_items(&mut self, action: &'static str) -> Result<&mut Vec<DetectedItem>, SessionError> {
        match self {
            QuoteSession::ItemsReview { items } => Ok(items),
            _ => Err(self.invalid(action)),
        }
    }

    pub fn add_item(&mut self, name: impl Into<String>) -> Result<Uuid, SessionError> {
        let items = self.review_items("addItem")?;
        let item = DetectedItem::new(name);
        let id = item.id;
        items.push(item);
        Ok(id)
    }

    pub fn remove_item(&mut self, id: Uuid) -> Result<(), SessionError> {
        let items = self.review_items("removeItem")?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(SessionError::UnknownItem(id));
        }
        Ok(())
    }

    pub fn increment_quantity(&mut self, id: Uuid) -> Result<u32, SessionError> {
        let items = self.review_items("incrementQuantity")?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))?;
        item.quantity += 1;
        Ok(item.quantity)
    }

    /// Decrement an item's quantity, never below 1.
    pub fn decrement_quantity(&mut self, id: Uuid) -> Result<u32, SessionError> {
        let items = self.review_items("decrementQuantity")?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))?;
        if item.quantity > 1 {
            item.quantity -= 1;
        }
        Ok(item.quantity)
    }

    /// Whether pricing can be requested from the current state.
    pub fn can_price(&self) -> bool {
        matches!(self, QuoteSession::ItemsReview { items } if !items.is_empty())
    }

    /// Attach an estimate, freezing the item list.
    pub fn price(&mut self, estimate: PriceEstimate) -> Result<(), SessionError> {
        match self {
            QuoteSession::ItemsReview { items } if items.is_empty() => {
                Err(SessionError::EmptyItemList)
            }
            QuoteSession::ItemsReview { items } => {
                let items = std::mem::take(items);
                *self = QuoteSession::Priced { items, estimate };
                Ok(())
            }
            _ => Err(self.invalid("price")),
        }
    }

    /// Return to review from a priced state, discarding the estimate.
    pub fn back_to_review(&mut self) -> Result<(), SessionError> {
        match self {
            QuoteSession::Priced { items, .. } => {
                let items = std::mem::take(items);
                *self = QuoteSession::ItemsReview { items };
                Ok(())
            }
            _ => Err(self.invalid("backToReview")),
        }
    }

    /// Carry the priced quote into a booking form.
    pub fn hand_off(&mut self) -> Result<QuoteEstimate, SessionError> {
        match self {
            QuoteSession::Priced { items, estimate } => {
                let quote = QuoteEstimate::from_parts(items, estimate);
                *self = QuoteSession::HandedOff {
                    quote: quote.clone(),
                };
                Ok(quote)
            }
            _ => Err(self.invalid("handOff")),
        }
    }
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRange;

    fn estimate() -> PriceEstimate {
        PriceEstimate {
            estimated_volume: "About 1/4 truck load".into(),
            price_range: PriceRange {
                min: 199.0,
                max: 279.0,
            },
            summary: "Mixed load".into(),
        }
    }

    #[test]
    fn happy_path_through_all_states() {
        let mut session = QuoteSession::new();
        assert_eq!(session.state_name(), "upload");

        session
            .begin_review(vec![DetectedItem::new("Sofa")])
            .unwrap();
        assert_eq!(session.state_name(), "itemsReview");
        assert!(session.can_price());

        session.price(estimate()).unwrap();
        assert_eq!(session.state_name(), "priced");

        let quote = session.hand_off().unwrap();
        assert_eq!(session.state_name(), "handedOff");
        assert_eq!(quote.items_detected, vec!["1x Sofa"]);
        assert_eq!(quote.price_min, 199.0);
    }

    #[test]
    fn manual_path_starts_empty() {
        let mut session = QuoteSession::new();
        session.begin_manual().unwrap();
        assert_eq!(session.items().unwrap().len(), 0);
        assert!(!session.can_price());

        session.add_item("Mattress").unwrap();
        assert!(session.can_price());
    }

    #[test]
    fn pricing_empty_list_is_rejected() {
        let mut session = QuoteSession::new();
        session.begin_manual().unwrap();
        assert_eq!(session.price(estimate()), Err(SessionError::EmptyItemList));
        assert_eq!(session.state_name(), "itemsReview");
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let mut session = QuoteSession::new();
        session.begin_manual().unwrap();
        let id = session.add_item("Tire").unwrap();

        assert_eq!(session.increment_quantity(id).unwrap(), 2);
        assert_eq!(session.decrement_quantity(id).unwrap(), 1);
        assert_eq!(session.decrement_quantity(id).unwrap(), 1);
    }

    #[test]
    fn remove_shrinks_list_by_one() {
        let mut session = QuoteSession::new();
        session.begin_manual().unwrap();
        let sofa = session.add_item("Sofa").unwrap();
        session.add_item("Desk").unwrap();

        session.remove_item(sofa).unwrap();
        let items = session.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Desk");
        // removal is final; the id is gone from the session
        assert_eq!(
            session.increment_quantity(sofa),
            Err(SessionError::UnknownItem(sofa))
        );
    }

    #[test]
    fn remove_unknown_item_errors() {
        let mut session = QuoteSession::new();
        session.begin_manual().unwrap();
        session.add_item("Sofa").unwrap();

        let stranger = Uuid::new_v4();
        assert_eq!(
            session.remove_item(stranger),
            Err(SessionError::UnknownItem(stranger))
        );
        assert_eq!(session.items().unwrap().len(), 1);
    }

    #[test]
    fn back_to_review_discards_estimate_keeps_items() {
        let mut session = QuoteSession::new();
        session
            .begin_review(vec![DetectedItem::new("Sofa"), DetectedItem::new("Desk")])
            .unwrap();
        session.price(estimate()).unwrap();

        session.back_to_review().unwrap();
        assert_eq!(session.state_name(), "itemsReview");
        assert_eq!(session.items().unwrap().len(), 2);
    }

    #[test]
    fn editing_while_priced_is_rejected() {
        let mut session = QuoteSession::new();
        session.begin_review(vec![DetectedItem::new("Sofa")]).unwrap();
        session.price(estimate()).unwrap();

        let err = session.add_item("Chair").unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                state: "priced",
                action: "addItem"
            }
        );
    }

    #[test]
    fn double_review_is_rejected() {
        let mut session = QuoteSession::new();
        session.begin_review(vec![]).unwrap();
        let err = session.begin_review(vec![]).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn hand_off_before_pricing_is_rejected() {
        let mut session = QuoteSession::new();
        session.begin_review(vec![DetectedItem::new("Sofa")]).unwrap();
        assert!(matches!(
            session.hand_off(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn serializes_with_state_tag() {
        let mut session = QuoteSession::new();
        session.begin_review(vec![DetectedItem::new("Sofa")]).unwrap();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["state"], "itemsReview");
        assert_eq!(json["items"][0]["name"], "Sofa");
    }
}
