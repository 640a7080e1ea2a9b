//! Suburb suggestion types

use serde::{Deserialize, Deserializer, Serialize};

/// A candidate location returned by the suggestion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Servers send postcodes as strings or numbers
    #[serde(
        default,
        deserialize_with = "postcode_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub postcode: Option<String>,
}

impl Suggestion {
    /// Display label: `address, name, state postcode` with empty segments skipped
    ///
    /// Blank fields count as empty; fields with text are used as sent.
    pub fn label(&self) -> String {
        let region = [self.state.as_deref(), self.postcode.as_deref()]
            .into_iter()
            .filter_map(non_empty)
            .collect::<Vec<_>>()
            .join(" ");

        [self.address.as_deref(), self.name.as_deref(), Some(region.as_str())]
            .into_iter()
            .filter_map(non_empty)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn postcode_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Postcode {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Postcode>::deserialize(deserializer)?.map(|p| match p {
        Postcode::Text(s) => s,
        Postcode::Unsigned(n) => n.to_string(),
        Postcode::Signed(n) => n.to_string(),
    }))
}

/// The last suggestion a user explicitly picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSelection {
    pub label: String,
    pub option: Suggestion,
}

impl StoredSelection {
    pub fn from_suggestion(option: &Suggestion) -> Self {
        Self {
            label: option.label(),
            option: option.clone(),
        }
    }
}
