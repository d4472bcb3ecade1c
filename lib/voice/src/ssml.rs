use tracing::debug;

use crate::exception::Result;
use crate::pathway::VoicePathway;
use crate::request::SpeechRequest;
use crate::style::ProsodyAdjustment;
use crate::style::Style;

pub const DEFAULT_VOICE_NAME: &str = "DragonLatestNeural";

const SYNTHESIS_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";
const MSTTS_NAMESPACE: &str = "http://www.w3.org/2001/mstts";

/// Which predefined trial script gets synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptSelection {
    #[default]
    ByLocale,
    Fixed(u32),
}

impl ScriptSelection {
    pub fn script_order(&self, locale: &str) -> u32 {
        match self {
            ScriptSelection::Fixed(order) => *order,
            ScriptSelection::ByLocale => match locale {
                "es-ES" | "es-MX" | "pt-BR" => 13,
                "fr-FR" | "de-DE" | "it-IT" => 12,
                "ja-JP" | "ko-KR" | "zh-CN" => 14,
                _ => 11,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupContent {
    Text {
        style: Style,
        prosody: ProsodyAdjustment,
        escaped_text: String,
    },
    Script {
        order: u32,
    },
}

#[derive(Debug, Clone)]
pub struct MarkupDocument {
    voice_name: String,
    language: String,
    speaker_profile_id: String,
    content: MarkupContent,
    ssml: String,
}

impl MarkupDocument {
    pub fn ssml(&self) -> &str {
        &self.ssml
    }

    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn speaker_profile_id(&self) -> &str {
        &self.speaker_profile_id
    }

    pub fn content(&self) -> &MarkupContent {
        &self.content
    }

    pub fn pathway(&self) -> VoicePathway {
        match self.content {
            MarkupContent::Text { .. } => VoicePathway::Full,
            MarkupContent::Script { .. } => VoicePathway::Trial,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkupBuilder {
    pub voice_name: String,
    pub script: ScriptSelection,
}

impl Default for MarkupBuilder {
    fn default() -> Self {
        MarkupBuilder {
            voice_name: DEFAULT_VOICE_NAME.to_string(),
            script: ScriptSelection::ByLocale,
        }
    }
}

impl MarkupBuilder {
    pub fn build(
        &self,
        request: &SpeechRequest,
        pathway: VoicePathway,
        prosody: &ProsodyAdjustment,
    ) -> Result<MarkupDocument> {
        request.validate()?;

        let language = request.language.trim();
        let speaker_profile_id = request.speaker_profile_id.trim();

        let content = match pathway {
            VoicePathway::Full => MarkupContent::Text {
                style: request.style,
                prosody: *prosody,
                escaped_text: escape_xml(&request.plain_text),
            },
            VoicePathway::Trial => MarkupContent::Script {
                order: self.script.script_order(language),
            },
        };

        let body = match &content {
            MarkupContent::Text {
                style,
                prosody,
                escaped_text,
            } => {
                let text = format!("<lang xml:lang='{}'>{escaped_text}</lang>", escape_xml(language));
                let text = match prosody_element(prosody) {
                    Some(element) => format!("{element}{text}</prosody>"),
                    None => text,
                };
                format!("<mstts:express-as style='{}'>{text}</mstts:express-as>", escape_xml(style.name()))
            }
            MarkupContent::Script { order } => format!("<mstts:script order='{order}'/>"),
        };

        let ssml = format!(
            "<speak version='1.0' xml:lang='{language}' xmlns='{SYNTHESIS_NAMESPACE}' xmlns:mstts='{MSTTS_NAMESPACE}'><voice name='{voice}'><mstts:ttsembedding speakerProfileId='{profile}'/>{body}</voice></speak>",
            language = escape_xml(language),
            voice = escape_xml(&self.voice_name),
            profile = escape_xml(speaker_profile_id),
        );
        debug!("build ssml, pathway={pathway}, length={}", ssml.len());

        Ok(MarkupDocument {
            voice_name: self.voice_name.to_string(),
            language: language.to_string(),
            speaker_profile_id: speaker_profile_id.to_string(),
            content,
            ssml,
        })
    }
}

// zero is a valid adjustment, only absent values are skipped
fn prosody_element(prosody: &ProsodyAdjustment) -> Option<String> {
    if prosody.is_absent() {
        return None;
    }
    let mut element = String::from("<prosody");
    if let Some(rate) = prosody.rate_percent {
        element.push_str(&format!(" rate='{rate:+}%'"));
    }
    if let Some(pitch) = prosody.pitch_percent {
        element.push_str(&format!(" pitch='{pitch:+}%'"));
    }
    element.push('>');
    Some(element)
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
