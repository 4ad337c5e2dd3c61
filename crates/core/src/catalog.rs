//! Item catalog text parsing.
//!
//! Operators paste the catalog as plain text, one item per line:
//! `id,l,w,h[,qty]`, quantity defaulting to 1. Blank lines are skipped.

use crate::error::{Error, Result};
use crate::tree::{Dims3, ItemKey};
use serde::Serialize;

/// One catalog entry: an item type and how many of it are requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    /// Canonical item id.
    pub id: ItemKey,
    /// Declared length.
    pub length: f64,
    /// Declared width.
    pub width: f64,
    /// Declared height.
    pub height: f64,
    /// Requested quantity.
    pub quantity: usize,
}

impl CatalogItem {
    /// Declared volume of one piece.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Declared extents as a dimension triple.
    pub fn dims(&self) -> Dims3 {
        Dims3::new(self.length, self.width, self.height)
    }
}

/// Parses catalog text. Fails on the first malformed line with its
/// 1-based line number.
pub fn parse_catalog(input: &str) -> Result<Vec<CatalogItem>> {
    let mut items = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        items.push(parse_line(line).map_err(|reason| Error::Catalog {
            line: idx + 1,
            reason,
        })?);
    }

    Ok(items)
}

fn parse_line(line: &str) -> std::result::Result<CatalogItem, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 4 || fields.len() > 5 {
        return Err(format!(
            "expected `id,l,w,h[,qty]`, found {} fields",
            fields.len()
        ));
    }

    let dim = |idx: usize, name: &str| -> std::result::Result<f64, String> {
        fields[idx]
            .parse::<f64>()
            .map_err(|_| format!("{} is not a number: {:?}", name, fields[idx]))
    };

    let quantity = match fields.get(4) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("qty is not a positive integer: {:?}", raw))?,
        None => 1,
    };

    Ok(CatalogItem {
        id: ItemKey::new(fields[0]),
        length: dim(1, "l")?,
        width: dim(2, "w")?,
        height: dim(3, "h")?,
        quantity,
    })
}

/// Looks up a catalog entry by canonical id.
pub fn find_item<'a>(catalog: &'a [CatalogItem], id: &ItemKey) -> Option<&'a CatalogItem> {
    catalog.iter().find(|item| &item.id == id)
}
