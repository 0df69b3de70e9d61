use serde::Deserialize;

/// Parameters for starting an upload session
///
/// `patient_id`, `user_id` and `patient_name` are required; the rest fall back
/// to defaults when the session is created.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub patient_id: Option<String>,
    pub user_id: Option<String>,
    pub patient_name: Option<String>,

    /// Initial status (default: "recording"); not validated
    pub status: Option<String>,

    /// Client-supplied start time (default: now)
    pub start_time: Option<String>,

    pub template_id: Option<String>,
}

impl NewSession {
    pub fn new(
        patient_id: impl Into<String>,
        user_id: impl Into<String>,
        patient_name: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            user_id: Some(user_id.into()),
            patient_name: Some(patient_name.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}
