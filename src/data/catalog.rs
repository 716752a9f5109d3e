//! Clean catalog loader. Reads the CSV written by the `normalize_catalog` binary
//! (Name, Slot, Weight, Special, DLC, stat columns..., Poise, Power).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::data::item::{Item, Origin, Slot};
use crate::error::CatalogError;

pub const DEFAULT_CATALOG_PATH: &str = "data/armor.clean.csv";

/// Immutable, in-memory item table. Row order is preserved and drives
/// enumeration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn in_slot(&self, slot: Slot) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |item| item.slot == slot)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Slot")]
    slot: String,
    #[serde(rename = "Weight", default)]
    weight: Option<f64>,
    #[serde(rename = "Poise", default)]
    poise: Option<f64>,
    #[serde(rename = "Power", default)]
    power: Option<f64>,
    #[serde(rename = "DLC", default)]
    dlc: Option<f64>,
    #[serde(rename = "Special", default)]
    special: Option<String>,
}

impl CatalogRow {
    fn into_item(self, row: usize) -> Result<Item, CatalogError> {
        let slot: Slot = self.slot.parse().map_err(|err| CatalogError::InvalidRow {
            row,
            reason: format!("{err}"),
        })?;
        Ok(Item {
            name: self.name.trim().to_string(),
            slot,
            cost: self.weight.unwrap_or(0.0),
            threshold: self.poise.unwrap_or(0.0),
            score: self.power.unwrap_or(0.0),
            origin: Origin::from_flag(self.dlc.unwrap_or(0.0) != 0.0),
            special: self.special.filter(|s| !s.trim().is_empty()),
        })
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = read_catalog(file)?;
    debug!(path = %path.display(), items = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut items = Vec::new();
    for (index, record) in reader.deserialize::<CatalogRow>().enumerate() {
        // Header is line 1.
        items.push(record?.into_item(index + 2)?);
    }
    Ok(Catalog::from_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name,Slot,Weight,Special,DLC,Physical,Poise,Power
Iron Helmet,Helm,4.8,,0.0,60.5,6.0,1800.25
Verdigris Armor,Chest,17.2,,1.0,95.1,30.0,4200.5
Leather Gloves,Gauntlets,1.1,Boosts stamina,0,10.0,0,310.0
";

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let catalog = read_catalog(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        let helm = &catalog.items()[0];
        assert_eq!(helm.name, "Iron Helmet");
        assert_eq!(helm.slot, Slot::Helm);
        assert_eq!(helm.cost, 4.8);
        assert_eq!(helm.threshold, 6.0);
        assert_eq!(helm.score, 1800.25);
        assert_eq!(helm.origin, Origin::Base);
        assert_eq!(helm.special, None);
        assert_eq!(catalog.items()[1].origin, Origin::Expansion);
        assert_eq!(
            catalog.items()[2].special.as_deref(),
            Some("Boosts stamina")
        );
    }

    #[test]
    fn unknown_slot_reports_row_number() {
        let raw = "Name,Slot,Weight,Poise,Power\nCape,Back,1.0,0,0\n";
        match read_catalog(raw.as_bytes()) {
            Err(CatalogError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_catalog("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
