use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to create a company
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCompanyRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "companyAddress", alias = "companyAdress")]
    pub address: String,
    #[validate(length(min = 1))]
    pub domain: String,
}

/// Request to post a job for a company
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_job_ranges"))]
pub struct NewJobRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    #[validate(length(min = 1))]
    #[serde(rename = "sal")]
    pub salary: String,
    #[serde(rename = "minNp")]
    pub min_notice_period: u64,
    #[serde(rename = "maxNp")]
    pub max_notice_period: u64,
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[validate(length(min = 1))]
    #[serde(rename = "jobDesc")]
    pub job_description: String,
    #[validate(range(min = 0.0))]
    #[serde(rename = "minExp")]
    pub min_experience: f64,
    #[validate(range(min = 0.0))]
    #[serde(rename = "maxExp")]
    pub max_experience: f64,
    #[serde(rename = "locationIds", alias = "LocationIDs", default)]
    pub location_ids: Vec<u64>,
    #[serde(rename = "skillIds", alias = "SkillIDs", default)]
    pub skill_ids: Vec<u64>,
    #[serde(rename = "workModeIds", alias = "WorkModeIDs", default)]
    pub work_mode_ids: Vec<u64>,
    #[serde(rename = "qualificationIds", alias = "QualificationIDs", default)]
    pub qualification_ids: Vec<u64>,
    #[serde(rename = "shiftIds", alias = "ShiftIDs", default)]
    pub shift_ids: Vec<u64>,
    #[serde(rename = "jobTypeIds", alias = "JobTypeIDs", default)]
    pub job_type_ids: Vec<u64>,
}

/// Request to register a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserSignup {
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "name")]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

/// Request to log a user in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

fn validate_job_ranges(req: &NewJobRequest) -> Result<(), ValidationError> {
    if req.max_experience < req.min_experience {
        return Err(ValidationError::new("max_experience_below_min"));
    }
    if req.max_notice_period < req.min_notice_period {
        return Err(ValidationError::new("max_notice_period_below_min"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_request() -> NewJobRequest {
        NewJobRequest {
            job_title: "Backend Engineer".to_string(),
            salary: "20 LPA".to_string(),
            min_notice_period: 15,
            max_notice_period: 60,
            budget: 2_000_000.0,
            job_description: "Rust services".to_string(),
            min_experience: 2.0,
            max_experience: 6.0,
            location_ids: vec![1],
            skill_ids: vec![4, 5],
            work_mode_ids: vec![],
            qualification_ids: vec![],
            shift_ids: vec![],
            job_type_ids: vec![],
        }
    }

    #[test]
    fn test_valid_job_request() {
        assert!(job_request().validate().is_ok());
    }

    #[test]
    fn test_inverted_experience_range_rejected() {
        let mut req = job_request();
        req.max_experience = 1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_company_name_rejected() {
        let req = NewCompanyRequest {
            company_name: String::new(),
            address: "BENGALURU".to_string(),
            domain: "IT".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_validation() {
        let signup = UserSignup {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "correct-horse".to_string(),
        };
        assert!(signup.validate().is_ok());

        let bad_email = UserSignup {
            email: "not-an-email".to_string(),
            ..signup.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = UserSignup {
            password: "short".to_string(),
            ..signup
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_legacy_id_list_keys() {
        let json = r#"{"jobTitle":"t","sal":"s","minNp":1,"maxNp":2,"budget":1.0,"jobDesc":"d","minExp":1.0,"maxExp":2.0,"LocationIDs":[3],"SkillIDs":[9]}"#;
        let req: NewJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.location_ids, vec![3]);
        assert_eq!(req.skill_ids, vec![9]);
    }
}
