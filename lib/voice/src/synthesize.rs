use tracing::info;

use crate::exception::Exception;
use crate::exception::Result;
use crate::pathway::VoicePathway;
use crate::request::OutputFormat;
use crate::ssml::MarkupContent;
use crate::ssml::MarkupDocument;

#[derive(Debug)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub format: OutputFormat,
}

/// Trial voices take a script reference, never text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSynthesis<'a> {
    pub speaker_profile_id: &'a str,
    pub locale: &'a str,
    pub script_order: u32,
    pub base_model_name: &'a str,
}

#[allow(async_fn_in_trait)]
pub trait SpeechBackend {
    async fn synthesize_ssml(&self, ssml: &str, format: OutputFormat) -> Result<SynthesisResult>;

    async fn synthesize_trial(&self, request: &TrialSynthesis<'_>, format: OutputFormat) -> Result<SynthesisResult>;
}

pub async fn dispatch<B>(
    backend: &B,
    document: &MarkupDocument,
    pathway: VoicePathway,
    format: OutputFormat,
) -> Result<SynthesisResult>
where
    B: SpeechBackend,
{
    if document.pathway() != pathway {
        return Err(Exception::InvalidRequest(format!(
            "document was built for {} pathway, dispatched as {pathway}",
            document.pathway()
        )));
    }

    let result = match document.content() {
        MarkupContent::Text { .. } => {
            info!("synthesize personal voice, profile={}", document.speaker_profile_id());
            backend.synthesize_ssml(document.ssml(), format).await?
        }
        MarkupContent::Script { order } => {
            info!(
                "synthesize trial voice, profile={}, script_order={order}",
                document.speaker_profile_id()
            );
            let request = TrialSynthesis {
                speaker_profile_id: document.speaker_profile_id(),
                locale: document.language(),
                script_order: *order,
                base_model_name: document.voice_name(),
            };
            backend.synthesize_trial(&request, format).await?
        }
    };

    if result.audio.is_empty() {
        return Err(Exception::synthesis("service returned no audio"));
    }
    info!("received audio, format={}, bytes={}", result.format, result.audio.len());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::request::SpeechRequest;
    use crate::ssml::MarkupBuilder;
    use crate::style::Style;

    #[derive(Debug, PartialEq)]
    enum Call {
        Ssml(String),
        Trial { profile: String, locale: String, order: u32 },
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: RefCell<Vec<Call>>,
        failure: Option<String>,
        audio: Vec<u8>,
    }

    impl RecordingBackend {
        fn respond(&self, format: OutputFormat) -> Result<SynthesisResult> {
            if let Some(message) = &self.failure {
                return Err(Exception::Synthesis {
                    message: "status=401".to_string(),
                    detail: Some(message.to_string()),
                });
            }
            Ok(SynthesisResult {
                audio: self.audio.clone(),
                format,
            })
        }
    }

    impl SpeechBackend for RecordingBackend {
        async fn synthesize_ssml(&self, ssml: &str, format: OutputFormat) -> Result<SynthesisResult> {
            self.calls.borrow_mut().push(Call::Ssml(ssml.to_string()));
            self.respond(format)
        }

        async fn synthesize_trial(&self, request: &TrialSynthesis<'_>, format: OutputFormat) -> Result<SynthesisResult> {
            self.calls.borrow_mut().push(Call::Trial {
                profile: request.speaker_profile_id.to_string(),
                locale: request.locale.to_string(),
                order: request.script_order,
            });
            self.respond(format)
        }
    }

    fn document(pathway: VoicePathway) -> MarkupDocument {
        let request = SpeechRequest {
            plain_text: "Hello there.".to_string(),
            language: "es-ES".to_string(),
            style: Style::Friendly,
            speaker_profile_id: "profile-1".to_string(),
            output_format: OutputFormat::Mp3,
        };
        MarkupBuilder::default()
            .build(&request, pathway, &request.style.prosody())
            .unwrap()
    }

    fn backend() -> RecordingBackend {
        RecordingBackend {
            audio: vec![1, 2, 3],
            ..RecordingBackend::default()
        }
    }

    #[tokio::test]
    async fn full_goes_to_ssml_call() {
        let backend = backend();
        let document = document(VoicePathway::Full);
        let result = dispatch(&backend, &document, VoicePathway::Full, OutputFormat::Mp3)
            .await
            .unwrap();
        assert_eq!(result.audio, vec![1, 2, 3]);
        assert_eq!(result.format, OutputFormat::Mp3);
        assert_eq!(*backend.calls.borrow(), vec![Call::Ssml(document.ssml().to_string())]);
    }

    #[tokio::test]
    async fn trial_goes_to_trial_call() {
        let backend = backend();
        let document = document(VoicePathway::Trial);
        dispatch(&backend, &document, VoicePathway::Trial, OutputFormat::Wav)
            .await
            .unwrap();
        assert_eq!(
            *backend.calls.borrow(),
            vec![Call::Trial {
                profile: "profile-1".to_string(),
                locale: "es-ES".to_string(),
                order: 13,
            }]
        );
    }

    #[tokio::test]
    async fn pathway_mismatch_is_rejected_before_calling() {
        let backend = backend();
        let document = document(VoicePathway::Full);
        let error = dispatch(&backend, &document, VoicePathway::Trial, OutputFormat::Wav)
            .await
            .unwrap_err();
        assert!(matches!(error, Exception::InvalidRequest(_)));
        assert!(backend.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_keeps_diagnostic() {
        let backend = RecordingBackend {
            failure: Some("invalid subscription key".to_string()),
            ..backend()
        };
        let document = document(VoicePathway::Full);
        let error = dispatch(&backend, &document, VoicePathway::Full, OutputFormat::Wav)
            .await
            .unwrap_err();
        assert!(matches!(error, Exception::Synthesis { detail: Some(detail), .. } if detail == "invalid subscription key"));
        assert_eq!(backend.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn empty_audio_is_a_failure() {
        let backend = RecordingBackend::default();
        let document = document(VoicePathway::Full);
        let error = dispatch(&backend, &document, VoicePathway::Full, OutputFormat::Wav)
            .await
            .unwrap_err();
        assert!(matches!(error, Exception::Synthesis { .. }));
    }
}
