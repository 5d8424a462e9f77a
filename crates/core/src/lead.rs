//! Lead data model: what we know about one prospect.
//!
//! A [`LeadProfile`] is filled in incrementally while the conversation runs.
//! The runtime sends partial updates as [`LeadPatch`]es; once the call ends the
//! profile is snapshotted into a [`LeadRecord`] and appended to the store.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything learned about one prospect during one conversation.
///
/// All fields start unset. A field only changes when a patch supplies a
/// non-empty replacement, so nothing is ever cleared once captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// Prospect's name
    #[serde(default)]
    pub name: Option<String>,

    /// Cycling club, team, or current bike brand
    #[serde(default)]
    pub company: Option<String>,

    /// Contact address
    #[serde(default)]
    pub email: Option<String>,

    /// Riding category (e.g. "Amateur Racer", "Weekend Rider")
    #[serde(default)]
    pub role: Option<String>,

    /// Product or service of interest (e.g. "Custom Road Bike", "Gravel Setup")
    #[serde(default)]
    pub use_case: Option<String>,

    /// Individual or size of the team
    #[serde(default)]
    pub team_size: Option<String>,

    /// When they plan to buy (e.g. "Spring 2026", "within 6 months")
    #[serde(default)]
    pub timeline: Option<String>,
}

/// Names of the profile fields, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Company,
    Email,
    Role,
    UseCase,
    TeamSize,
    Timeline,
}

impl LeadField {
    pub const ALL: [LeadField; 7] = [
        LeadField::Name,
        LeadField::Company,
        LeadField::Email,
        LeadField::Role,
        LeadField::UseCase,
        LeadField::TeamSize,
        LeadField::Timeline,
    ];

    /// The fields a lead must have to count as qualified.
    pub const REQUIRED: [LeadField; 3] = [LeadField::Name, LeadField::Email, LeadField::UseCase];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Company => "company",
            LeadField::Email => "email",
            LeadField::Role => "role",
            LeadField::UseCase => "use_case",
            LeadField::TeamSize => "team_size",
            LeadField::Timeline => "timeline",
        }
    }
}

impl std::fmt::Display for LeadField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LeadProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value of a field, if set to something non-empty.
    pub fn get(&self, field: LeadField) -> Option<&str> {
        let slot = match field {
            LeadField::Name => &self.name,
            LeadField::Company => &self.company,
            LeadField::Email => &self.email,
            LeadField::Role => &self.role,
            LeadField::UseCase => &self.use_case,
            LeadField::TeamSize => &self.team_size,
            LeadField::Timeline => &self.timeline,
        };
        slot.as_deref().filter(|v| !v.is_empty())
    }

    fn slot_mut(&mut self, field: LeadField) -> &mut Option<String> {
        match field {
            LeadField::Name => &mut self.name,
            LeadField::Company => &mut self.company,
            LeadField::Email => &mut self.email,
            LeadField::Role => &mut self.role,
            LeadField::UseCase => &mut self.use_case,
            LeadField::TeamSize => &mut self.team_size,
            LeadField::Timeline => &mut self.timeline,
        }
    }

    /// See [`is_qualified`].
    pub fn is_qualified(&self) -> bool {
        is_qualified(self)
    }

    /// Required fields that are still unset, in [`LeadField::REQUIRED`] order.
    pub fn missing_required(&self) -> Vec<LeadField> {
        LeadField::REQUIRED
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// Number of fields with a value.
    pub fn filled_count(&self) -> usize {
        LeadField::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }

    /// The closing remark spoken back to the prospect once the lead is saved.
    pub fn closing_summary(&self) -> String {
        let greeting = match self.get(LeadField::Name) {
            Some(name) => format!("Thanks {name}"),
            None => "Thanks for calling".to_string(),
        };
        let interest = match self.get(LeadField::UseCase) {
            Some(use_case) => format!("I have your info regarding a {use_case} build."),
            None => "I have your info.".to_string(),
        };
        let follow_up = match self.get(LeadField::Email) {
            Some(email) => format!("We will send the consultation schedule to {email}."),
            None => "We will be in touch about a consultation.".to_string(),
        };
        format!("{greeting}, {interest} {follow_up} Happy cycling, goodbye!")
    }
}

/// A partial update to a [`LeadProfile`]: one optional slot per field.
///
/// This is the shape of the `update_lead_profile` tool arguments. Missing keys
/// and `null` both mean "not provided"; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

impl LeadPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and callers assembling patches by hand.
    pub fn with(mut self, field: LeadField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            LeadField::Name => self.name = value,
            LeadField::Company => self.company = value,
            LeadField::Email => self.email = value,
            LeadField::Role => self.role = value,
            LeadField::UseCase => self.use_case = value,
            LeadField::TeamSize => self.team_size = value,
            LeadField::Timeline => self.timeline = value,
        }
        self
    }

    fn value(&self, field: LeadField) -> Option<&str> {
        let slot = match field {
            LeadField::Name => &self.name,
            LeadField::Company => &self.company,
            LeadField::Email => &self.email,
            LeadField::Role => &self.role,
            LeadField::UseCase => &self.use_case,
            LeadField::TeamSize => &self.team_size,
            LeadField::Timeline => &self.timeline,
        };
        slot.as_deref().filter(|v| !v.is_empty())
    }

    /// True when the patch would not change any profile.
    pub fn is_empty(&self) -> bool {
        LeadField::ALL.iter().all(|f| self.value(*f).is_none())
    }
}

/// Merge a patch into a profile, field by field.
///
/// Every non-empty value in the patch overwrites the matching profile field;
/// everything else is left alone. No validation is done on the content.
/// Applying the same patch twice gives the same profile as applying it once.
///
/// Returns the number of fields written.
pub fn apply_update(profile: &mut LeadProfile, patch: &LeadPatch) -> usize {
    let mut written = 0;
    for field in LeadField::ALL {
        if let Some(value) = patch.value(field) {
            *profile.slot_mut(field) = Some(value.to_string());
            written += 1;
        }
    }
    debug!(fields_written = written, profile = ?profile, "Lead profile updated");
    written
}

/// A lead is qualified once name, email, and use case are all known.
///
/// The other four fields do not matter. This is fixed policy.
pub fn is_qualified(profile: &LeadProfile) -> bool {
    LeadField::REQUIRED.iter().all(|f| profile.get(*f).is_some())
}

/// The persisted form of a finalized lead.
///
/// All seven profile fields are always written, `null` when unset, followed by
/// the time the lead was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(flatten)]
    pub profile: LeadProfile,

    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl LeadRecord {
    /// Snapshot a profile as of now, at the microsecond precision it is stored with.
    pub fn snapshot(profile: &LeadProfile) -> Self {
        Self {
            profile: profile.clone(),
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}

/// RFC 3339 on write. On read, also accepts offset-less ISO-8601 timestamps
/// (older stores were written that way) and treats them as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(pairs: &[(LeadField, &str)]) -> LeadPatch {
        pairs
            .iter()
            .fold(LeadPatch::new(), |p, (field, value)| p.with(*field, *value))
    }

    #[test]
    fn new_profile_is_empty() {
        let profile = LeadProfile::new();
        assert_eq!(profile.filled_count(), 0);
        assert!(!profile.is_qualified());
        assert_eq!(profile.missing_required().len(), 3);
    }

    #[test]
    fn company_only_update_sets_only_company() {
        let mut profile = LeadProfile::new();
        let written = apply_update(&mut profile, &patch(&[(LeadField::Company, "Acme Club")]));

        assert_eq!(written, 1);
        assert_eq!(profile.company.as_deref(), Some("Acme Club"));
        assert_eq!(profile.filled_count(), 1);
        assert!(!is_qualified(&profile));
    }

    #[test]
    fn last_non_empty_value_wins() {
        let mut profile = LeadProfile::new();
        let updates = [
            patch(&[(LeadField::Name, "Alex"), (LeadField::Timeline, "Spring")]),
            patch(&[(LeadField::Name, "Alexandra")]),
            patch(&[(LeadField::Name, ""), (LeadField::Email, "a@x.com")]),
            patch(&[(LeadField::Timeline, "Now")]),
        ];
        for update in &updates {
            apply_update(&mut profile, update);
        }

        assert_eq!(profile.name.as_deref(), Some("Alexandra"));
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(profile.timeline.as_deref(), Some("Now"));
        assert!(profile.company.is_none());
        assert!(profile.role.is_none());
        assert!(profile.use_case.is_none());
        assert!(profile.team_size.is_none());
    }

    #[test]
    fn empty_values_never_clear_a_field() {
        let mut profile = LeadProfile::new();
        apply_update(&mut profile, &patch(&[(LeadField::Email, "a@x.com")]));
        let written = apply_update(&mut profile, &patch(&[(LeadField::Email, "")]));

        assert_eq!(written, 0);
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn update_is_idempotent() {
        let update = patch(&[
            (LeadField::Name, "Alex"),
            (LeadField::Role, "Weekend Rider"),
            (LeadField::TeamSize, "Individual"),
        ]);
        let mut once = LeadProfile::new();
        apply_update(&mut once, &update);
        let mut twice = once.clone();
        apply_update(&mut twice, &update);

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_patch_is_a_noop() {
        let mut profile = LeadProfile::new();
        apply_update(&mut profile, &patch(&[(LeadField::Name, "Alex")]));
        let before = profile.clone();

        assert!(LeadPatch::new().is_empty());
        assert_eq!(apply_update(&mut profile, &LeadPatch::new()), 0);
        assert_eq!(profile, before);
    }

    #[test]
    fn qualification_over_all_required_combinations() {
        for mask in 0u8..8 {
            let mut profile = LeadProfile {
                company: Some("Acme Club".into()),
                role: Some("Racer".into()),
                team_size: Some("Small Racing Team".into()),
                timeline: Some("Now".into()),
                ..LeadProfile::default()
            };
            if mask & 1 != 0 {
                profile.name = Some("Alex".into());
            }
            if mask & 2 != 0 {
                profile.email = Some("a@x.com".into());
            }
            if mask & 4 != 0 {
                profile.use_case = Some("Gravel Setup".into());
            }

            assert_eq!(is_qualified(&profile), mask == 7, "mask {mask:03b}");
            assert_eq!(profile.missing_required().len(), 3 - mask.count_ones() as usize);
        }
    }

    #[test]
    fn empty_strings_do_not_qualify() {
        let profile = LeadProfile {
            name: Some("Alex".into()),
            email: Some(String::new()),
            use_case: Some("Gravel Setup".into()),
            ..LeadProfile::default()
        };
        assert!(!is_qualified(&profile));
        assert_eq!(profile.missing_required(), vec![LeadField::Email]);
    }

    #[test]
    fn patch_from_tool_arguments_ignores_nulls_and_unknown_keys() {
        let patch: LeadPatch = serde_json::from_value(serde_json::json!({
            "name": "Alex",
            "email": null,
            "favourite_colour": "red"
        }))
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Alex"));
        assert!(patch.email.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn record_writes_every_field() {
        let profile = LeadProfile {
            name: Some("Alex".into()),
            email: Some("a@x.com".into()),
            use_case: Some("Gravel Setup".into()),
            ..LeadProfile::default()
        };
        let record = LeadRecord::snapshot(&profile);
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 8);
        assert_eq!(obj["name"], "Alex");
        assert!(obj["company"].is_null());
        assert!(obj["role"].is_null());
        assert!(obj["team_size"].is_null());
        assert!(obj["timeline"].is_null());
        assert!(obj["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn record_reads_offsetless_timestamps() {
        let record: LeadRecord = serde_json::from_str(
            r#"{"name":"Sam","company":null,"email":null,"role":null,"use_case":null,
                "team_size":null,"timeline":null,"timestamp":"2025-11-27T18:04:05.123456"}"#,
        )
        .unwrap();
        assert_eq!(record.profile.name.as_deref(), Some("Sam"));
        assert_eq!(record.timestamp.to_rfc3339(), "2025-11-27T18:04:05.123456+00:00");
    }

    #[test]
    fn closing_summary_mentions_captured_details() {
        let profile = LeadProfile {
            name: Some("Alex".into()),
            email: Some("a@x.com".into()),
            use_case: Some("Gravel Setup".into()),
            ..LeadProfile::default()
        };
        let summary = profile.closing_summary();
        assert!(summary.starts_with("Thanks Alex"));
        assert!(summary.contains("Gravel Setup"));
        assert!(summary.contains("a@x.com"));
    }

    #[test]
    fn closing_summary_without_details_still_reads() {
        let summary = LeadProfile::new().closing_summary();
        assert!(summary.starts_with("Thanks for calling"));
        assert!(!summary.contains("None"));
    }
}
