//! Resume content as supplied by the editor at render time.
//!
//! The shape follows the JSON Resume schema (camelCase keys) with an extra `id` on every
//! item and free-form custom groups.  All fields are optional; missing values deserialize
//! as empty strings or lists and are treated as "no data" by the section renderers.

use serde::{Deserialize, Serialize};

/// Top-level resume record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeRecord {
    pub basics: Basics,
    pub work: Vec<WorkItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillItem>,
    pub projects: Vec<ProjectItem>,
    pub certificates: Vec<CertificateItem>,
    pub languages: Vec<LanguageItem>,
    pub interests: Vec<InterestItem>,
    pub publications: Vec<PublicationItem>,
    pub awards: Vec<AwardItem>,
    pub references: Vec<ReferenceItem>,
    pub custom: Vec<CustomGroup>,
}

impl ResumeRecord {
    /// Finds a custom group by its id.
    pub fn custom_group(&self, id: &str) -> Option<&CustomGroup> {
        self.custom.iter().find(|group| group.id == id)
    }
}

/// Personal details shown in the header and the summary section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Basics {
    pub name: String,
    pub label: String,
    /// Photo location: a file path readable by the renderer.
    pub image: String,
    pub email: String,
    pub phone: String,
    pub url: String,
    pub summary: String,
    pub location: Location,
    pub profiles: Vec<Profile>,
}

/// Postal location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub region: String,
    pub country_code: String,
}

impl Location {
    /// `City, Region, Country` with empty parts skipped.
    pub fn display(&self) -> String {
        join_non_empty([&self.city, &self.region, &self.country_code], ", ")
    }
}

/// Social or professional profile link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub network: String,
    pub username: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub name: String,
    pub position: String,
    pub location: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationItem {
    pub id: String,
    pub institution: String,
    pub url: String,
    pub area: String,
    pub study_type: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub score: String,
    pub summary: String,
    pub courses: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillItem {
    pub id: String,
    pub name: String,
    pub level: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub roles: Vec<String>,
    pub highlights: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateItem {
    pub id: String,
    pub name: String,
    pub date: String,
    pub issuer: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageItem {
    pub id: String,
    pub language: String,
    pub fluency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterestItem {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicationItem {
    pub id: String,
    pub name: String,
    pub publisher: String,
    pub release_date: String,
    pub url: String,
    pub summary: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AwardItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub awarder: String,
    pub summary: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceItem {
    pub id: String,
    pub name: String,
    pub reference: String,
}

/// A user-defined section such as "Volunteering" or "Talks".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomGroup {
    /// Section id used in order and column lists.
    pub id: String,
    /// Heading text.
    pub name: String,
    pub items: Vec<CustomItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub location: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

pub(crate) fn join_non_empty<'a, I>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    parts
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_json_resume() {
        let record: ResumeRecord = serde_json::from_str(
            r#"{
                "basics": {"name": "Ada", "location": {"city": "London", "countryCode": "UK"}},
                "work": [{"id": "w1", "name": "Engines Ltd", "startDate": "1843-01"}],
                "custom": [{"id": "talks", "name": "Talks", "items": [{"title": "Notes"}]}]
            }"#,
        )
        .expect("parse resume");

        assert_eq!(record.basics.location.display(), "London, UK");
        assert_eq!(record.work[0].start_date, "1843-01");
        assert!(record.education.is_empty());
        assert_eq!(record.custom_group("talks").map(|g| g.items.len()), Some(1));
    }
}
