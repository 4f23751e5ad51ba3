use serde::{Deserialize, Deserializer, Serialize};

/// Structured requirements of a single job posting, as seen by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(rename = "jobId")]
    pub job_id: u64,
    #[serde(rename = "minExperience")]
    pub min_experience: f64,
    #[serde(rename = "minNoticePeriod")]
    pub min_notice_period: u64,
    #[serde(rename = "locationIds", default)]
    pub location_ids: Vec<u64>,
    #[serde(rename = "skillIds", default)]
    pub skill_ids: Vec<u64>,
    #[serde(rename = "workModeIds", default)]
    pub work_mode_ids: Vec<u64>,
    #[serde(rename = "jobTypeIds", default)]
    pub job_type_ids: Vec<u64>,
    #[serde(rename = "qualificationIds", default)]
    pub qualification_ids: Vec<u64>,
    #[serde(rename = "shiftIds", default)]
    pub shift_ids: Vec<u64>,
}

/// A candidate's application against one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: String,
    #[serde(rename = "jid")]
    pub job_id: u64,
    #[serde(rename = "job_application")]
    pub profile: RequestProfile,
}

/// What the candidate offers: experience, notice period and the IDs per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestProfile {
    #[serde(rename = "noticePeriod")]
    pub notice_period: u64,
    #[serde(rename = "location", default)]
    pub location_ids: Vec<u64>,
    #[serde(rename = "technologyStack", default)]
    pub skill_ids: Vec<u64>,
    pub experience: f64,
    #[serde(rename = "qualifications", default)]
    pub qualification_ids: Vec<u64>,
    #[serde(rename = "shifts", default)]
    pub shift_ids: Vec<u64>,
    #[serde(rename = "workmode", default)]
    pub work_mode_ids: Vec<u64>,
    #[serde(rename = "jobtype", default)]
    pub job_type_ids: Vec<u64>,
}

/// Clients send the age either as a string or as a bare number
fn deserialize_age<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Text(String),
        Number(u64),
    }

    Ok(match Age::deserialize(deserializer)? {
        Age::Text(text) => text,
        Age::Number(number) => number.to_string(),
    })
}

/// A registered user
///
/// The password hash never leaves the service in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "name")]
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A company that posts jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "companyAddress", alias = "companyAdress")]
    pub address: String,
    pub domain: String,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A job posting with its full set of attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(rename = "cid")]
    pub company_id: u64,
    pub job_title: String,
    #[serde(rename = "sal")]
    pub salary: String,
    #[serde(rename = "min_np")]
    pub min_notice_period: u64,
    #[serde(rename = "max_np")]
    pub max_notice_period: u64,
    pub budget: f64,
    #[serde(rename = "job_desc")]
    pub job_description: String,
    #[serde(rename = "min_exp")]
    pub min_experience: f64,
    #[serde(rename = "max_exp")]
    pub max_experience: f64,
    #[serde(rename = "locations", default)]
    pub location_ids: Vec<u64>,
    #[serde(rename = "skills", default)]
    pub skill_ids: Vec<u64>,
    #[serde(rename = "workModes", default)]
    pub work_mode_ids: Vec<u64>,
    #[serde(rename = "qualifications", default)]
    pub qualification_ids: Vec<u64>,
    #[serde(rename = "shifts", default)]
    pub shift_ids: Vec<u64>,
    #[serde(rename = "jobTypes", default)]
    pub job_type_ids: Vec<u64>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Job {
    /// Project the posting onto the attributes the matcher compares against
    pub fn requirements(&self) -> JobRequirements {
        JobRequirements {
            job_id: self.id,
            min_experience: self.min_experience,
            min_notice_period: self.min_notice_period,
            location_ids: self.location_ids.clone(),
            skill_ids: self.skill_ids.clone(),
            work_mode_ids: self.work_mode_ids.clone(),
            job_type_ids: self.job_type_ids.clone(),
            qualification_ids: self.qualification_ids.clone(),
            shift_ids: self.shift_ids.clone(),
        }
    }
}
