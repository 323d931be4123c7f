use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tabled::Tabled;

/// Genre tag given to records that were created by hand.
pub const CUSTOM_GENRE: &str = "Custom";

/// Used-goods quality tiers Discogs prices releases by, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    Mint,
    NearMint,
    VeryGoodPlus,
    VeryGood,
    GoodPlus,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::Mint,
        Condition::NearMint,
        Condition::VeryGoodPlus,
        Condition::VeryGood,
        Condition::GoodPlus,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    /// The grade name exactly as Discogs uses it as price table key.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Mint => "Mint (M)",
            Condition::NearMint => "Near Mint (NM or M-)",
            Condition::VeryGoodPlus => "Very Good Plus (VG+)",
            Condition::VeryGood => "Very Good (VG)",
            Condition::GoodPlus => "Good Plus (G+)",
            Condition::Good => "Good (G)",
            Condition::Fair => "Fair (F)",
            Condition::Poor => "Poor (P)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A number that older collection files may carry as free text.
///
/// The stored representation is kept as-is so rewriting a file never changes
/// values a user typed in by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(Number),
    Text(String),
}

impl LooseNumber {
    /// Parses user input, falling back to keeping the raw text.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
        {
            Some(n) => LooseNumber::Number(n),
            None => LooseNumber::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => n.as_f64(),
            LooseNumber::Text(t) => t.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseNumber::Number(n) => write!(f, "{}", n),
            LooseNumber::Text(t) => f.write_str(t),
        }
    }
}

impl From<i64> for LooseNumber {
    fn from(value: i64) -> Self {
        LooseNumber::Number(Number::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub currency: String,
    pub value: LooseNumber,
}

/// Condition grade label to suggested price.
pub type PriceTable = BTreeMap<String, Price>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Release metadata as returned by a Discogs search, plus merged details.
///
/// Fields this crate does not interpret are kept in `extra` so they survive a
/// rewrite of the collection file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<LooseNumber>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub genre: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub style: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub format: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub label: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One cataloged release or custom entry, keyed by its original lookup string.
///
/// Older files named the key `barcode` or `name`, the release `result` and the
/// price table `price`; those names are still accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(alias = "barcode", alias = "name")]
    pub key: String,
    #[serde(default, alias = "result", skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracklist: Option<Vec<Track>>,
    #[serde(
        default,
        alias = "price",
        deserialize_with = "lenient_price_table",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_table: Option<PriceTable>,
}

impl Record {
    /// Builds a hand-made record for something the database does not know.
    ///
    /// Condition is not collected for custom entries, so every grade carries
    /// the same price.
    pub fn custom(key: impl Into<String>, title: &str, price: &str, currency: &str) -> Self {
        let value = LooseNumber::parse(price);
        let price_table = Condition::ALL
            .iter()
            .map(|c| {
                (
                    c.label().to_string(),
                    Price {
                        currency: currency.to_string(),
                        value: value.clone(),
                    },
                )
            })
            .collect();

        Record {
            key: key.into(),
            release: Some(Release {
                title: Some(title.trim().to_string()),
                genre: vec![CUSTOM_GENRE.to_string()],
                ..Default::default()
            }),
            tracklist: None,
            price_table: Some(price_table),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.release.as_ref().and_then(|r| r.title.as_deref())
    }

    pub fn release_id(&self) -> Option<u64> {
        self.release.as_ref().and_then(|r| r.id)
    }

    pub fn first_genre(&self) -> Option<&str> {
        self.release
            .as_ref()
            .and_then(|r| r.genre.first())
            .map(String::as_str)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.release
            .as_ref()
            .and_then(|r| r.cover_image.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Numeric price for a grade; missing or non-numeric prices count as 0.
    pub fn price_for(&self, condition: &str) -> f64 {
        self.price_table
            .as_ref()
            .and_then(|t| t.get(condition))
            .and_then(|p| p.value.as_f64())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Release>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDetail {
    #[serde(default)]
    pub tracklist: Vec<Track>,
}

/// Turns a price suggestion payload into a table, dropping anything that is
/// not a `{currency, value}` pair.
pub fn price_table_from_value(value: Value) -> PriceTable {
    match value {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(grade, price)| {
                serde_json::from_value::<Price>(price)
                    .ok()
                    .map(|p| (grade, p))
            })
            .collect(),
        _ => PriceTable::new(),
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_price_table<'de, D>(deserializer: D) -> Result<Option<PriceTable>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(|v| !v.is_null())
        .map(price_table_from_value))
}

#[derive(Tabled)]
pub struct RecordTableRow {
    pub key: String,
    pub title: String,
    pub year: String,
    pub country: String,
    pub genre: String,
    pub label: String,
    pub tracks: String,
}

#[derive(Tabled)]
pub struct PriceTableRow {
    pub condition: String,
    pub price: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub position: String,
    pub title: String,
}

#[derive(Tabled)]
pub struct FailureTableRow {
    pub key: String,
    pub reason: String,
}
