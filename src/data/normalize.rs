//! Raw armor table -> clean catalog.
//!
//! Parses the per-row negation/resistance cells into canonical stat columns,
//! rescales every stat except poise to 0-100 of its column maximum, drops
//! unobtainable rows and derives the composite power score.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::item::{round2, Slot};
use crate::error::NormalizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Physical,
    Strike,
    Slash,
    Pierce,
    Magic,
    Fire,
    Lightning,
    Holy,
    Immunity,
    Robustness,
    Focus,
    Vitality,
    Poise,
}

impl Stat {
    pub const ALL: [Stat; 13] = [
        Stat::Physical,
        Stat::Strike,
        Stat::Slash,
        Stat::Pierce,
        Stat::Magic,
        Stat::Fire,
        Stat::Lightning,
        Stat::Holy,
        Stat::Immunity,
        Stat::Robustness,
        Stat::Focus,
        Stat::Vitality,
        Stat::Poise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Strike => "Strike",
            Self::Slash => "Slash",
            Self::Pierce => "Pierce",
            Self::Magic => "Magic",
            Self::Fire => "Fire",
            Self::Lightning => "Lightning",
            Self::Holy => "Holy",
            Self::Immunity => "Immunity",
            Self::Robustness => "Robustness",
            Self::Focus => "Focus",
            Self::Vitality => "Vitality",
            Self::Poise => "Poise",
        }
    }

    /// Poise keeps its raw scale; it is the constrained quantity.
    pub fn is_rescaled(&self) -> bool {
        !matches!(self, Self::Poise)
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Map the abbreviated keys used in the source cells.
    pub fn from_abbreviation(key: &str) -> Option<Self> {
        match key.trim() {
            "Phy" => Some(Self::Physical),
            "VS Str." | "VS Str" => Some(Self::Strike),
            "VS Sla." | "VS Sla" => Some(Self::Slash),
            "VS Pie." | "VS Pie" => Some(Self::Pierce),
            "Mag" => Some(Self::Magic),
            "Fir" => Some(Self::Fire),
            "Lit" => Some(Self::Lightning),
            "Hol" => Some(Self::Holy),
            "Imm." | "Imm" => Some(Self::Immunity),
            "Rob." | "Robu." | "Rob" => Some(Self::Robustness),
            "Foc." | "Foc" => Some(Self::Focus),
            "Vit." | "Vita." | "Vit" => Some(Self::Vitality),
            "Poi." | "Poi" => Some(Self::Poise),
            _ => None,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Power coefficients per stat. Stats missing from a loaded map weigh zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreWeights(pub BTreeMap<Stat, f64>);

impl Default for ScoreWeights {
    /// Weighted by how common each damage type is among major bosses.
    fn default() -> Self {
        Self(BTreeMap::from([
            (Stat::Physical, 26.0),
            (Stat::Fire, 10.0),
            (Stat::Magic, 10.0),
            (Stat::Pierce, 8.0),
            (Stat::Strike, 8.0),
            (Stat::Holy, 7.0),
            (Stat::Slash, 7.0),
            (Stat::Robustness, 6.0),
            (Stat::Lightning, 5.0),
            (Stat::Immunity, 3.0),
            (Stat::Focus, 1.0),
            (Stat::Vitality, 1.0),
        ]))
    }
}

impl ScoreWeights {
    pub fn from_yaml(raw: &str) -> Result<Self, NormalizeError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn weight(&self, stat: Stat) -> f64 {
        self.0.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn score(&self, stats: &[f64; 13]) -> f64 {
        round2(
            Stat::ALL
                .iter()
                .map(|stat| self.weight(*stat) * stats[stat.index()])
                .sum(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub slot: String,
    pub weight: f64,
    pub special: String,
    pub dlc: f64,
    /// `Some(0)` marks an unobtainable item.
    pub in_game_section: Option<f64>,
    pub stats: [f64; 13],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub name: String,
    pub slot: Slot,
    pub weight: f64,
    pub special: String,
    pub dlc: f64,
    pub stats: [f64; 13],
    pub power: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub read: usize,
    pub unavailable: usize,
    pub unknown_slot: usize,
    pub written: usize,
}

/// Parse a cell like `[{'Phy': '5.2', 'VS Str.': '4.1'}]` into `stats`.
/// Unknown keys are ignored; unparseable values count as zero. A cell that
/// is not a list of one mapping leaves `stats` untouched.
pub fn parse_stat_cell(cell: &str, stats: &mut [f64; 13]) {
    let cell = cell.trim();
    let Some(inner) = cell
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
        .and_then(|rest| rest.strip_prefix('{'))
        .and_then(|rest| rest.split('}').next())
    else {
        return;
    };

    for entry in inner.split(',') {
        let Some((key, value)) = entry.split_once(':') else {
            continue;
        };
        let Some(stat) = Stat::from_abbreviation(unquote(key)) else {
            continue;
        };
        stats[stat.index()] = unquote(value).parse().unwrap_or(0.0);
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '\'' || c == '"').trim()
}

/// Rescale, filter and score. Column maxima are taken over every row,
/// including the unobtainable ones that are dropped afterwards.
pub fn normalize_rows(rows: Vec<RawRow>, weights: &ScoreWeights) -> (Vec<CleanRow>, NormalizeSummary) {
    let mut summary = NormalizeSummary {
        read: rows.len(),
        ..NormalizeSummary::default()
    };

    let mut maxima = [0.0_f64; 13];
    for row in &rows {
        for (max, value) in maxima.iter_mut().zip(row.stats) {
            *max = max.max(value);
        }
    }

    let mut clean = Vec::with_capacity(rows.len());
    for row in rows {
        if row.in_game_section == Some(0.0) {
            summary.unavailable += 1;
            continue;
        }
        let slot = match row.slot.parse::<Slot>() {
            Ok(slot) => slot,
            Err(_) => {
                warn!(name = %row.name, slot = %row.slot, "skipping row with unknown slot");
                summary.unknown_slot += 1;
                continue;
            }
        };

        let mut stats = row.stats;
        for stat in Stat::ALL.iter().filter(|stat| stat.is_rescaled()) {
            let i = stat.index();
            stats[i] = if maxima[i] > 0.0 {
                round2(stats[i] / maxima[i] * 100.0)
            } else {
                0.0
            };
        }

        clean.push(CleanRow {
            name: row.name,
            slot,
            weight: row.weight,
            special: row.special,
            dlc: row.dlc,
            power: weights.score(&stats),
            stats,
        });
    }

    summary.written = clean.len();
    debug!(?summary, "rows normalized");
    (clean, summary)
}

const COL_NAME: &str = "name";
const COL_SLOT: &str = "type";
const COL_WEIGHT: &str = "weight";
const COL_NEGATION: &str = "damage negation";
const COL_RESISTANCE: &str = "resistance";
const COL_SPECIAL: &str = "special effect";
const COL_SECTION: &str = "in-game section";
const COL_DLC: &str = "dlc";

pub fn read_raw_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, NormalizeError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };
    let name_col = column(COL_NAME).ok_or(NormalizeError::MissingColumn(COL_NAME))?;
    let slot_col = column(COL_SLOT).ok_or(NormalizeError::MissingColumn(COL_SLOT))?;
    let weight_col = column(COL_WEIGHT).ok_or(NormalizeError::MissingColumn(COL_WEIGHT))?;
    let negation_col = column(COL_NEGATION);
    let resistance_col = column(COL_RESISTANCE);
    let special_col = column(COL_SPECIAL);
    let section_col = column(COL_SECTION);
    let dlc_col = column(COL_DLC);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |col: Option<usize>| col.and_then(|i| record.get(i)).unwrap_or("").trim();
        let number = |col: Option<usize>| field(col).parse::<f64>().ok();

        let mut stats = [0.0; 13];
        parse_stat_cell(field(negation_col), &mut stats);
        parse_stat_cell(field(resistance_col), &mut stats);

        rows.push(RawRow {
            name: field(Some(name_col)).to_string(),
            slot: field(Some(slot_col)).to_string(),
            weight: number(Some(weight_col)).unwrap_or(0.0),
            special: field(special_col).to_string(),
            dlc: number(dlc_col).unwrap_or(0.0),
            in_game_section: number(section_col),
            stats,
        });
    }
    Ok(rows)
}

pub fn write_clean_rows<W: Write>(writer: W, rows: &[CleanRow]) -> Result<(), NormalizeError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header = vec!["Name", "Slot", "Weight", "Special", "DLC"];
    header.extend(Stat::ALL.iter().map(Stat::name));
    header.push("Power");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.name.clone(),
            row.slot.to_string(),
            row.weight.to_string(),
            row.special.clone(),
            row.dlc.to_string(),
        ];
        record.extend(row.stats.iter().map(f64::to_string));
        record.push(row.power.to_string());
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|source| NormalizeError::Io {
        path: "<output>".into(),
        source,
    })?;
    Ok(())
}

/// Read a raw table from `reader` and write the clean catalog to `writer`.
pub fn normalize_csv<R: Read, W: Write>(
    reader: R,
    writer: W,
    weights: &ScoreWeights,
) -> Result<NormalizeSummary, NormalizeError> {
    let rows = read_raw_rows(reader)?;
    let (clean, summary) = normalize_rows(rows, weights);
    write_clean_rows(writer, &clean)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::read_catalog;

    const RAW: &str = r#"id,name,image,description,type,damage negation,resistance,weight,special effect,how to acquire,in-game section,dlc
1,Iron Helmet,x,d,helm,"[{'Phy': '5', 'VS Str.': '4', 'Fir': '2'}]","[{'Imm.': '10', 'Poi.': '6'}]",4.8,,shop,1,
2,Tree Armor,x,d,chest armor,"[{'Phy': '10', 'VS Str': '8', 'Fir': '4'}]","[{'Imm': '20', 'Poi': '30'}]",12.0,Regen,boss,1,1
3,Ghost Greaves,x,d,leg armor,"[{'Phy': '20', 'Fir': 'n/a'}]","[{'Poi.': '3'}]",2.0,,cut,0,0
4,Cape,x,d,cloak,"[{'Phy': '1'}]",,1.0,,none,1,0
"#;

    #[test]
    fn parses_abbreviated_cells() {
        let mut stats = [0.0; 13];
        parse_stat_cell("[{'Phy': '5.2', 'VS Pie.': '4.1', 'Bogus': '9'}]", &mut stats);
        assert_eq!(stats[Stat::Physical.index()], 5.2);
        assert_eq!(stats[Stat::Pierce.index()], 4.1);
        parse_stat_cell("not a list", &mut stats);
        assert_eq!(stats[Stat::Physical.index()], 5.2);
        parse_stat_cell("[{'Mag': 'x'}]", &mut stats);
        assert_eq!(stats[Stat::Magic.index()], 0.0);
    }

    #[test]
    fn rescales_against_all_rows_and_drops_unavailable() {
        let rows = read_raw_rows(RAW.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        let (clean, summary) = normalize_rows(rows, &ScoreWeights::default());
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.unknown_slot, 1);
        assert_eq!(clean.len(), 2);

        // Physical max is 20 (from the dropped greaves).
        let helm = &clean[0];
        assert_eq!(helm.slot, Slot::Helm);
        assert_eq!(helm.stats[Stat::Physical.index()], 25.0);
        assert_eq!(helm.stats[Stat::Strike.index()], 50.0);
        assert_eq!(helm.stats[Stat::Fire.index()], 50.0);
        assert_eq!(helm.stats[Stat::Immunity.index()], 50.0);
        // Poise is not rescaled.
        assert_eq!(helm.stats[Stat::Poise.index()], 6.0);
        // 26*25 + 8*50 + 10*50 + 3*50
        assert_eq!(helm.power, 1700.0);

        let chest = &clean[1];
        assert_eq!(chest.dlc, 1.0);
        assert_eq!(chest.special, "Regen");
        assert_eq!(chest.stats[Stat::Physical.index()], 50.0);
    }

    #[test]
    fn clean_output_loads_as_catalog() {
        let mut out = Vec::new();
        let summary = normalize_csv(RAW.as_bytes(), &mut out, &ScoreWeights::default()).unwrap();
        assert_eq!(summary.written, 2);
        let catalog = read_catalog(out.as_slice()).unwrap();
        assert_eq!(catalog.len(), 2);
        let chest = &catalog.items()[1];
        assert_eq!(chest.name, "Tree Armor");
        assert_eq!(chest.threshold, 30.0);
        assert!(chest.origin.is_expansion());
    }

    #[test]
    fn weights_load_from_yaml() {
        let weights = ScoreWeights::from_yaml("physical: 1\npoise: 2\n").unwrap();
        assert_eq!(weights.weight(Stat::Physical), 1.0);
        assert_eq!(weights.weight(Stat::Fire), 0.0);
        let mut stats = [0.0; 13];
        stats[Stat::Physical.index()] = 3.0;
        stats[Stat::Poise.index()] = 4.0;
        assert_eq!(weights.score(&stats), 11.0);
    }
}
