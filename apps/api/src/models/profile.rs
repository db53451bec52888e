use serde::Serialize;

pub const FIELD_RESUME: &str = "resume";
pub const FIELD_JOB_DESCRIPTION: &str = "job_description";
pub const FIELD_COMPANY: &str = "company";

/// Résumé, job posting and company for one session. Replaced wholesale on every
/// load; never edited field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub resume: String,
    pub job_description: String,
    pub company: String,
}

impl CandidateProfile {
    pub fn new(
        resume: impl Into<String>,
        job_description: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            resume: resume.into().trim().to_string(),
            job_description: job_description.into().trim().to_string(),
            company: company.into().trim().to_string(),
        }
    }

    /// Names of the fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (FIELD_COMPANY, &self.company),
            (FIELD_RESUME, &self.resume),
            (FIELD_JOB_DESCRIPTION, &self.job_description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
