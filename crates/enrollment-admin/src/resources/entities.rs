//! Entities managed from the admin dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::request::Resource;
use crate::workflows::scheduling::{ExamLocation, LocationId};

pub struct Users;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Resource for Users {
    const COLLECTION: &'static str = "/users";
    const LABEL: &'static str = "user";

    type Id = u64;
    type Record = User;
    type Draft = UserDraft;

    fn id(record: &User) -> u64 {
        record.id
    }
}

pub struct Cities;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    /// Two-letter state code (UF).
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDraft {
    pub name: String,
    pub state: String,
}

impl Resource for Cities {
    const COLLECTION: &'static str = "/cities";
    const LABEL: &'static str = "city";

    type Id = u64;
    type Record = City;
    type Draft = CityDraft;

    fn id(record: &City) -> u64 {
        record.id
    }
}

pub struct TenantCities;

/// Link between a tenant (municipal network) and a city it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCity {
    pub id: u64,
    pub tenant_id: u64,
    pub city_id: u64,
    #[serde(default)]
    pub city_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCityDraft {
    pub tenant_id: u64,
    pub city_id: u64,
}

impl Resource for TenantCities {
    const COLLECTION: &'static str = "/tenant-cities";
    const LABEL: &'static str = "tenant city";

    type Id = u64;
    type Record = TenantCity;
    type Draft = TenantCityDraft;

    fn id(record: &TenantCity) -> u64 {
        record.id
    }
}

pub struct Faqs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: u64,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
}

impl Resource for Faqs {
    const COLLECTION: &'static str = "/faqs";
    const LABEL: &'static str = "FAQ";

    type Id = u64;
    type Record = Faq;
    type Draft = FaqDraft;

    fn id(record: &Faq) -> u64 {
        record.id
    }
}

pub struct Exams;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub local_id: Option<LocationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocationId>,
}

impl Resource for Exams {
    const COLLECTION: &'static str = "/exams";
    const LABEL: &'static str = "exam";

    type Id = u64;
    type Record = Exam;
    type Draft = ExamDraft;

    fn id(record: &Exam) -> u64 {
        record.id
    }
}

pub struct ExamLocations;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamLocationDraft {
    pub name: String,
    pub full_address: String,
}

impl Resource for ExamLocations {
    const COLLECTION: &'static str = "/exam-locations";
    const LABEL: &'static str = "exam location";

    type Id = LocationId;
    type Record = ExamLocation;
    type Draft = ExamLocationDraft;

    fn id(record: &ExamLocation) -> LocationId {
        record.id.clone()
    }
}

pub struct CandidateDocuments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: u64,
    pub candidate_name: String,
    pub document_type: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_note: Option<String>,
}

/// Approval decision sent when an operator reviews a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReview {
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
}

impl Resource for CandidateDocuments {
    const COLLECTION: &'static str = "/candidate-documents";
    const LABEL: &'static str = "document";

    type Id = u64;
    type Record = CandidateDocument;
    type Draft = DocumentReview;

    fn id(record: &CandidateDocument) -> u64 {
        record.id
    }
}
