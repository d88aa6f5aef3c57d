use serde::{Deserialize, Serialize};

/// Sender identity handed over by the form layer.
///
/// Fields are free text; blank ones are skipped when header lines are built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Applicant {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

impl Applicant {
    /// `"city, region, country"` over the non-empty parts.
    pub fn home_location(&self) -> String {
        [&self.city, &self.region, &self.country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The posting a letter is written for. Only used to name exported files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTarget {
    pub company: String,
    pub position: String,
}
