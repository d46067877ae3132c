//! File-backed shadow copy of the cart.
//!
//! Mirrors the server's merge semantics on last-seen catalog data so the UI
//! can keep rendering a cart while the server is down. Best-effort only: the
//! shadow is overwritten by the next successful server response and is never
//! pushed back.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{dto::cart::CartSummary, models::ClothingItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowLine {
    pub clothes_id: Uuid,
    pub name: String,
    /// Last price seen from the server; stale once offline.
    pub price: i64,
    pub quantity: i32,
}

/// Locally computed cart state, shaped like the server summary but built
/// entirely from shadow data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowSummary {
    pub lines: Vec<ShadowLine>,
    pub total_price: i64,
    pub total_items: i64,
}

#[derive(Debug, Default)]
pub struct ShadowCart {
    lines: Vec<ShadowLine>,
    path: Option<PathBuf>,
}

impl ShadowCart {
    /// A shadow with no backing file; [`save`](Self::save) becomes a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`, treating a missing file as an empty cart.
    pub fn load(path: PathBuf) -> io::Result<Self> {
        let lines = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };
        Ok(Self {
            lines,
            path: Some(path),
        })
    }

    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = serde_json::to_string(&self.lines)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, contents)
    }

    pub fn merge_add(&mut self, item: &ClothingItem, quantity: i32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.clothes_id == item.id) {
            line.quantity += quantity;
            line.price = item.price;
        } else {
            self.lines.push(ShadowLine {
                clothes_id: item.id,
                name: item.name.clone(),
                price: item.price,
                quantity,
            });
        }
    }

    /// Overwrite a line's quantity. Returns false when the line is absent.
    pub fn set_quantity(&mut self, clothes_id: Uuid, quantity: i32) -> bool {
        match self.lines.iter_mut().find(|l| l.clothes_id == clothes_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, clothes_id: Uuid) {
        self.lines.retain(|l| l.clothes_id != clothes_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the shadow with authoritative server state. Dangling lines
    /// come back with no resolved item; they keep a zero price locally too.
    pub fn replace_from(&mut self, summary: &CartSummary) {
        self.lines = summary
            .cart
            .items
            .iter()
            .map(|line| ShadowLine {
                clothes_id: line.clothes_id,
                name: line
                    .clothes
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                price: line.clothes.as_ref().map(|c| c.price).unwrap_or(0),
                quantity: line.quantity,
            })
            .collect();
    }

    pub fn summary(&self) -> ShadowSummary {
        let total_items = self.lines.iter().map(|l| i64::from(l.quantity)).sum();
        let total_price = self
            .lines
            .iter()
            .map(|l| i64::from(l.quantity) * l.price)
            .sum();
        ShadowSummary {
            lines: self.lines.clone(),
            total_price,
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(price: i64) -> ClothingItem {
        ClothingItem {
            id: Uuid::new_v4(),
            name: "Canvas Cap".into(),
            brand: None,
            price,
            description: None,
            image_url: None,
            category: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn merge_add_matches_server_semantics() {
        let first = item(1000);
        let second = item(500);
        let mut cart = ShadowCart::in_memory();

        cart.merge_add(&first, 1);
        cart.merge_add(&second, 2);
        cart.merge_add(&first, 2);

        let summary = cart.summary();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.total_price, 4000);
    }

    #[test]
    fn set_quantity_overwrites_and_reports_missing_lines() {
        let tee = item(1900);
        let mut cart = ShadowCart::in_memory();
        cart.merge_add(&tee, 1);

        assert!(cart.set_quantity(tee.id, 3));
        assert_eq!(cart.summary().total_items, 3);
        assert!(!cart.set_quantity(Uuid::new_v4(), 2));
    }

    #[test]
    fn remove_and_clear_are_idempotent() {
        let jacket = item(8900);
        let mut cart = ShadowCart::in_memory();
        cart.merge_add(&jacket, 1);

        cart.remove(Uuid::new_v4());
        assert_eq!(cart.summary().total_items, 1);

        cart.remove(jacket.id);
        cart.remove(jacket.id);
        cart.clear();
        assert_eq!(cart.summary().total_items, 0);
        assert_eq!(cart.summary().total_price, 0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("shadow-cart-{}.json", std::process::id()));
        let scarf = item(2500);

        let mut cart = ShadowCart::load(path.clone()).unwrap();
        cart.merge_add(&scarf, 2);
        cart.save().unwrap();

        let reloaded = ShadowCart::load(path.clone()).unwrap();
        assert_eq!(reloaded.summary().total_price, 5000);
        assert_eq!(reloaded.summary().total_items, 2);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_as_empty_cart() {
        let path = std::env::temp_dir().join(format!(
            "shadow-cart-missing-{}.json",
            std::process::id()
        ));
        let cart = ShadowCart::load(path).unwrap();
        assert_eq!(cart.summary().total_items, 0);
    }
}
