//! Food-log types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MealType {
    #[serde(alias = "breakfast")]
    Breakfast,
    #[serde(alias = "lunch")]
    Lunch,
    #[serde(alias = "dinner")]
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::Lunch => "LUNCH",
            MealType::Dinner => "DINNER",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BREAKFAST" => Ok(MealType::Breakfast),
            "LUNCH" => Ok(MealType::Lunch),
            "DINNER" => Ok(MealType::Dinner),
            other => Err(format!(
                "unknown meal '{other}' (expected breakfast, lunch or dinner)"
            )),
        }
    }
}

/// A meal recorded for a resident. `date` is `YYYY-MM-DD`, `time` is `HH:mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    #[serde(default, deserialize_with = "super::string_id")]
    pub id: String,
    pub meal: MealType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Display name of whoever recorded the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by_id: Option<String>,
    /// Family member the entry is addressed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
}

/// Body for `POST /food-entries`; also the input of a local log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntryDraft {
    pub meal: MealType,
    pub description: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
}

impl FoodEntryDraft {
    pub fn into_entry(self, id: String, created_at: String) -> FoodEntry {
        FoodEntry {
            id,
            meal: self.meal,
            description: self.description,
            date: self.date,
            time: self.time,
            created_at: Some(created_at),
            added_by: self.added_by,
            added_by_id: self.added_by_id,
            target_id: self.target_id,
            resident_id: self.resident_id,
        }
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
}

impl FoodEntryUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, entry: &mut FoodEntry) {
        if let Some(meal) = self.meal {
            entry.meal = meal;
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        if let Some(date) = &self.date {
            entry.date = date.clone();
        }
        if let Some(time) = &self.time {
            entry.time = time.clone();
        }
        if let Some(target_id) = &self.target_id {
            entry.target_id = Some(target_id.clone());
        }
        if let Some(resident_id) = self.resident_id {
            entry.resident_id = Some(resident_id);
        }
    }
}
