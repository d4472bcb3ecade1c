use std::collections::HashSet;

use framework::http_client::HTTP_CLIENT;
use framework::http_client::ResponseExt;
use framework::json;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::azure::api::ErrorResponse;
use crate::azure::api::PagedResponse;
use crate::azure::api::PersonalVoice;
use crate::azure::api::TrialProfile;
use crate::azure::api::TrialSynthesisRequest;
use crate::exception::Exception;
use crate::exception::Result;
use crate::pathway::ProfileRegistry;
use crate::pathway::VoicePathway;
use crate::request::OutputFormat;
use crate::synthesize::SpeechBackend;
use crate::synthesize::SynthesisResult;
use crate::synthesize::TrialSynthesis;

mod api;

const TRIAL_API_VERSION: &str = "2023-07-01-preview";
const PERSONAL_VOICE_API_VERSION: &str = "2024-02-01-preview";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const ERROR_BODY_LIMIT: usize = 300;
const USER_AGENT: &str = concat!("narrate/", env!("CARGO_PKG_VERSION"));

pub struct AzureSpeech {
    pub tts_endpoint: String,
    pub custom_voice_endpoint: String,
    api_key: String,
}

#[derive(Debug)]
pub struct ProfileSummary {
    pub pathway: VoicePathway,
    pub id: String,
    pub speaker_profile_id: String,
    pub name: String,
    pub status: String,
}

impl AzureSpeech {
    pub fn new(region: &str, api_key: String) -> Self {
        AzureSpeech {
            tts_endpoint: format!("https://{region}.tts.speech.microsoft.com/cognitiveservices/v1"),
            custom_voice_endpoint: format!("https://{region}.api.cognitive.microsoft.com/customvoice"),
            api_key,
        }
    }

    pub async fn list_trial_profiles(&self) -> Result<Vec<ProfileSummary>> {
        let url = self.custom_voice_url(&["trial", "zeroshots"], TRIAL_API_VERSION)?;
        let profiles: Vec<TrialProfile> = self.list(url).await?;
        Ok(profiles
            .into_iter()
            .map(|profile| ProfileSummary {
                pathway: VoicePathway::Trial,
                speaker_profile_id: profile.id.to_string(),
                id: profile.id,
                name: profile.display_name.or(profile.locale).unwrap_or_default(),
                status: profile.status.unwrap_or_default(),
            })
            .collect())
    }

    pub async fn list_personal_voices(&self) -> Result<Vec<ProfileSummary>> {
        let url = self.custom_voice_url(&["personalvoices"], PERSONAL_VOICE_API_VERSION)?;
        let voices: Vec<PersonalVoice> = self.list(url).await?;
        Ok(voices
            .into_iter()
            .map(|voice| ProfileSummary {
                pathway: VoicePathway::Full,
                speaker_profile_id: voice.speaker_profile_id.unwrap_or_default(),
                id: voice.id,
                name: voice.display_name.unwrap_or_default(),
                status: voice.status.unwrap_or_default(),
            })
            .collect())
    }

    // follows nextLink until the collection is exhausted
    async fn list<T>(&self, url: Url) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = vec![];
        let mut visited = HashSet::new();
        let mut next = Some(url);
        while let Some(url) = next {
            info!("call azure api, url={url}");
            let response = HTTP_CLIENT
                .get(url.as_str())
                .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                .send()
                .await?;
            if response.status() != StatusCode::OK {
                return Err(failure(response).await);
            }
            let body = response.text().await?;
            let page: PagedResponse<T> = json::from_json(&body)?;
            items.extend(page.value);
            visited.insert(url.to_string());
            next = next_page(&url, page.next_link.as_deref(), &mut visited)?;
        }
        Ok(items)
    }

    fn custom_voice_url(&self, segments: &[&str], api_version: &str) -> Result<Url> {
        let mut url = Url::parse(&self.custom_voice_endpoint).map_err(|err| {
            Exception::InvalidRequest(format!("invalid endpoint, endpoint={}, error={err}", self.custom_voice_endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Exception::InvalidRequest(format!("endpoint can not have path, endpoint={}", self.custom_voice_endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }
}

impl SpeechBackend for AzureSpeech {
    async fn synthesize_ssml(&self, ssml: &str, format: OutputFormat) -> Result<SynthesisResult> {
        info!("call azure tts api, url={}, output_format={}", self.tts_endpoint, format.azure_output_format());
        let response = HTTP_CLIENT
            .post(&self.tts_endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("User-Agent", USER_AGENT)
            .header("X-Microsoft-OutputFormat", format.azure_output_format())
            .header("Content-Type", "application/ssml+xml")
            .body(ssml.to_string())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(failure(response).await);
        }

        let format = OutputFormat::from_content_type(response.content_type()).unwrap_or(format);
        let audio = response.bytes().await?.to_vec();
        Ok(SynthesisResult { audio, format })
    }

    async fn synthesize_trial(&self, request: &TrialSynthesis<'_>, format: OutputFormat) -> Result<SynthesisResult> {
        let url = self.custom_voice_url(&["trial", "synthesis"], TRIAL_API_VERSION)?;
        let model = self.custom_voice_url(&["trial", "zeroshots", request.speaker_profile_id], TRIAL_API_VERSION)?;
        let body = json::to_json(&TrialSynthesisRequest {
            model: model.to_string(),
            locale: request.locale,
            script_order: request.script_order,
            base_model_name: request.base_model_name,
        })?;

        info!("call azure trial synthesis api, url={url}");
        debug!("request={body}");
        let response = HTTP_CLIENT
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let content_type = response.content_type().to_string();
        if response.status() != StatusCode::OK || !content_type.contains("audio") {
            return Err(failure(response).await);
        }

        let format = OutputFormat::from_content_type(&content_type).unwrap_or(format);
        let audio = response.bytes().await?.to_vec();
        Ok(SynthesisResult { audio, format })
    }
}

impl ProfileRegistry for AzureSpeech {
    async fn contains_trial_profile(&self, speaker_profile_id: &str) -> Result<bool> {
        let url = self.custom_voice_url(&["trial", "zeroshots", speaker_profile_id], TRIAL_API_VERSION)?;
        info!("call azure api, url={url}");
        let response = HTTP_CLIENT
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(failure(response).await),
        }
    }

    async fn contains_personal_voice(&self, speaker_profile_id: &str) -> Result<bool> {
        let voices = self.list_personal_voices().await?;
        Ok(voices.iter().any(|voice| voice.speaker_profile_id == speaker_profile_id))
    }
}

// the subscription key is only ever sent to the origin of the first page
fn next_page(current: &Url, next_link: Option<&str>, visited: &mut HashSet<String>) -> Result<Option<Url>> {
    let Some(link) = next_link.filter(|link| !link.is_empty()) else {
        return Ok(None);
    };
    let url = current
        .join(link)
        .map_err(|err| Exception::synthesis(format!("invalid next link, link={link}, error={err}")))?;
    if url.origin() != current.origin() {
        return Err(Exception::synthesis(format!(
            "next link points to another host, link={url}, expected={}",
            current.origin().ascii_serialization()
        )));
    }
    if visited.contains(url.as_str()) {
        warn!("stop paging, next link repeats, link={url}");
        return Ok(None);
    }
    Ok(Some(url))
}

async fn failure(response: Response) -> Exception {
    let status = response.status();
    match response.text().await {
        Ok(body) => parse_failure(status, &body),
        Err(err) => err.into(),
    }
}

fn parse_failure(status: StatusCode, body: &str) -> Exception {
    if let Ok(ErrorResponse { error }) = json::from_json::<ErrorResponse>(body) {
        let mut message = format!("failed to call azure api, status={status}");
        if let Some(code) = error.code {
            message.push_str(&format!(", code={code}"));
        }
        if let Some(text) = error.message {
            message.push_str(&format!(", message={text}"));
        }
        let detail = error.inner_error.and_then(|inner| match (inner.code, inner.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message),
            (code, None) => code,
        });
        return Exception::Synthesis { message, detail };
    }

    let body = body.trim();
    Exception::Synthesis {
        message: format!("failed to call azure api, status={status}"),
        detail: (!body.is_empty()).then(|| body.chars().take(ERROR_BODY_LIMIT).collect()),
    }
}
