use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Funding program as delivered by the external catalog. Never mutated by the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", alias = "program_type", default, deserialize_with = "lenient_text")]
    pub program_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(alias = "funding_amount", alias = "amount", default, deserialize_with = "lenient_bounds")]
    pub funding_amount: Option<FundingBounds>,
    #[serde(alias = "funding_types", default, deserialize_with = "lenient_strings")]
    pub funding_types: Vec<String>,
    #[serde(alias = "program_focus", default, deserialize_with = "lenient_strings")]
    pub program_focus: Vec<String>,
    #[serde(alias = "categorized_requirements", default, deserialize_with = "lenient_requirements")]
    pub categorized_requirements: BTreeMap<RequirementCategory, Vec<RequirementItem>>,
}

impl Program {
    pub fn requirements(&self, category: &RequirementCategory) -> &[RequirementItem] {
        self.categorized_requirements
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Advertised funding range; either bound may be missing in scraped data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingBounds {
    #[serde(default, deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
}

/// Requirement buckets produced by the extraction pipeline. Unknown keys are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementCategory {
    Geographic,
    Eligibility,
    Financial,
    Team,
    Project,
    Impact,
    Timeline,
    UseOfFunds,
    Consortium,
    Technical,
    CoFinancing,
    Other(String),
}

impl RequirementCategory {
    pub fn as_str(&self) -> &str {
        match self {
            RequirementCategory::Geographic => "geographic",
            RequirementCategory::Eligibility => "eligibility",
            RequirementCategory::Financial => "financial",
            RequirementCategory::Team => "team",
            RequirementCategory::Project => "project",
            RequirementCategory::Impact => "impact",
            RequirementCategory::Timeline => "timeline",
            RequirementCategory::UseOfFunds => "use_of_funds",
            RequirementCategory::Consortium => "consortium",
            RequirementCategory::Technical => "technical",
            RequirementCategory::CoFinancing => "co_financing",
            RequirementCategory::Other(name) => name,
        }
    }
}

impl From<String> for RequirementCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "geographic" | "geography" | "location" => Self::Geographic,
            "eligibility" => Self::Eligibility,
            "financial" | "funding_details" => Self::Financial,
            "team" => Self::Team,
            "project" => Self::Project,
            "impact" => Self::Impact,
            "timeline" => Self::Timeline,
            "use_of_funds" => Self::UseOfFunds,
            "consortium" => Self::Consortium,
            "technical" | "trl_level" => Self::Technical,
            "co_financing" | "cofinancing" => Self::CoFinancing,
            _ => Self::Other(value),
        }
    }
}

impl From<RequirementCategory> for String {
    fn from(value: RequirementCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single extracted requirement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementItem {
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: String,
    #[serde(default)]
    pub value: RequirementValue,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: Option<f32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_decisiveness")]
    pub decisiveness: Option<Decisiveness>,
}

impl RequirementItem {
    pub fn is_kind(&self, kinds: &[&str]) -> bool {
        kinds
            .iter()
            .any(|kind| self.kind.eq_ignore_ascii_case(kind))
    }

    /// Explicit decisiveness wins; otherwise derived from extraction confidence.
    pub fn decisiveness(&self) -> Decisiveness {
        if let Some(decisiveness) = self.decisiveness {
            return decisiveness;
        }

        match self.confidence {
            Some(confidence) if confidence >= 0.8 => Decisiveness::Hard,
            Some(confidence) if confidence >= 0.5 => Decisiveness::Soft,
            _ => Decisiveness::Uncertain,
        }
    }
}

/// How strongly a requirement gates eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decisiveness {
    Uncertain,
    Soft,
    Hard,
}

/// Heterogeneous requirement payload. `Unstructured` keeps whatever the pipeline emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Range(ValueRange),
    Unstructured(serde_json::Value),
}

impl Default for RequirementValue {
    fn default() -> Self {
        Self::Unstructured(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RequirementValue {
    /// Text view consumed by the normalizers. `None` marks data no normalizer can read.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        let text: Cow<'_, str> = match self {
            RequirementValue::Flag(true) => Cow::Borrowed("yes"),
            RequirementValue::Flag(false) => Cow::Borrowed("no"),
            RequirementValue::Number(number) => Cow::Owned(number.to_string()),
            RequirementValue::Text(text) => Cow::Borrowed(text.as_str()),
            RequirementValue::List(items) => Cow::Owned(items.join("; ")),
            RequirementValue::Range(ValueRange { min, max }) => match (min, max) {
                (Some(min), Some(max)) => Cow::Owned(format!("{min} - {max}")),
                (Some(min), None) => Cow::Owned(format!("at least {min}")),
                (None, Some(max)) => Cow::Owned(format!("up to {max}")),
                (None, None) => return None,
            },
            RequirementValue::Unstructured(_) => return None,
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// Scraped catalogs carry nulls, strings where numbers belong and similar noise. The
// readers below map such shapes to "absent" so one bad field never drops a program.

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let confidence = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "high" => Some(0.9),
            "medium" => Some(0.6),
            "low" => Some(0.3),
            other => other.parse().ok(),
        },
        _ => None,
    };

    Ok(confidence
        .filter(|value| (0.0..=1.0).contains(value))
        .map(|value| value as f32))
}

fn lenient_decisiveness<'de, D>(deserializer: D) -> Result<Option<Decisiveness>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn lenient_bounds<'de, D>(deserializer: D) -> Result<Option<FundingBounds>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => vec![text],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) if !text.trim().is_empty() => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Keeps every readable requirement item; unreadable items and non-list categories are
/// dropped one by one with a warning.
fn lenient_requirements<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<RequirementCategory, Vec<RequirementItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(categories) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    let mut requirements: BTreeMap<RequirementCategory, Vec<RequirementItem>> = BTreeMap::new();
    for (key, entries) in categories {
        let category = RequirementCategory::from(key);
        let entries = match entries {
            Value::Array(entries) => entries,
            Value::Null => continue,
            other @ Value::Object(_) => vec![other],
            _ => {
                warn!(%category, "skipping requirement category that is not a list");
                continue;
            }
        };

        let items = requirements.entry(category.clone()).or_default();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<RequirementItem>(entry) {
                Ok(item) => items.push(item),
                Err(err) => warn!(%category, index, error = %err, "skipping malformed requirement item"),
            }
        }
    }

    Ok(requirements)
}
