//! # Shopping List
//!
//! A note-style shopping list whose lines carry an optionally recognized
//! price. Totals only add up prices that were actually recognized; an item
//! without one is unknown, not free.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::price_recognition::{Price, PriceExtractor};

/// One line of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: u64,
    pub text: String,
    pub recognized_price: Option<Price>,
    pub is_checked: bool,
}

impl ShoppingItem {
    /// Formatted price, or an empty string when none was recognized
    pub fn display_price(&self) -> String {
        self.recognized_price
            .map(|price| price.to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ShoppingList {
    pub title: String,
    items: Vec<ShoppingItem>,
    next_id: u64,
    extractor: PriceExtractor,
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::with_extractor(PriceExtractor::new())
    }

    pub fn with_extractor(extractor: PriceExtractor) -> Self {
        Self {
            title: "Shopping List".to_string(),
            items: Vec::new(),
            next_id: 1,
            extractor,
        }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&ShoppingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a line, recognizing its price. Blank text is ignored.
    pub fn add_item(&mut self, text: &str) -> Option<u64> {
        if text.trim().is_empty() {
            debug!("Ignoring blank shopping list entry");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let recognized_price = self.extractor.extract(text);
        self.items.push(ShoppingItem {
            id,
            text: text.to_string(),
            recognized_price,
            is_checked: false,
        });

        info!(
            item_id = id,
            has_price = recognized_price.is_some(),
            "Added shopping list item"
        );
        crate::observability::record_shopping_list_metrics("add", self.items.len());
        Some(id)
    }

    /// Replace the text at `index` and recognize its price again
    pub fn update_item(&mut self, index: usize, text: &str) {
        let Some(item) = self.items.get_mut(index) else {
            debug!(index, "Ignoring update for missing shopping list index");
            return;
        };
        item.text = text.to_string();
        item.recognized_price = self.extractor.extract(text);
        crate::observability::record_shopping_list_metrics("update", self.items.len());
    }

    /// Recognize the price of item `id` from other text, keeping the item text
    pub fn update_price(&mut self, id: u64, text: &str) {
        let price = self.extractor.extract(text);
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.recognized_price = price;
        }
        crate::observability::record_shopping_list_metrics("update_price", self.items.len());
    }

    pub fn toggle_check(&mut self, id: u64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.is_checked = !item.is_checked;
        }
        crate::observability::record_shopping_list_metrics("toggle", self.items.len());
    }

    pub fn delete_item(&mut self, id: u64) {
        self.items.retain(|item| item.id != id);
        crate::observability::record_shopping_list_metrics("delete", self.items.len());
    }

    /// Delete the items at the given positions; out-of-range positions are ignored
    pub fn delete_items(&mut self, indices: &[usize]) {
        let mut position = 0;
        self.items.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        crate::observability::record_shopping_list_metrics("delete", self.items.len());
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn checked_items(&self) -> usize {
        self.items.iter().filter(|item| item.is_checked).count()
    }

    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .filter_map(|item| item.recognized_price)
            .sum()
    }

    pub fn formatted_total_price(&self) -> String {
        self.total_price().to_string()
    }
}
