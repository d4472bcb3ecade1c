use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TrialSynthesisRequest<'a> {
    pub model: String,
    pub locale: &'a str,
    #[serde(rename = "scriptOrder")]
    pub script_order: u32,
    #[serde(rename = "baseModelName")]
    pub base_model_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "innererror")]
    pub inner_error: Option<InnerError>,
}

#[derive(Debug, Deserialize)]
pub struct InnerError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PersonalVoice {
    pub id: String,
    #[serde(rename = "speakerProfileId")]
    pub speaker_profile_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrialProfile {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub locale: Option<String>,
    pub status: Option<String>,
}
