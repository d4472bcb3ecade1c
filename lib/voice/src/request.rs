use std::fmt;
use std::str::FromStr;

use crate::exception::Exception;
use crate::exception::Result;
use crate::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    Mp3,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        }
    }

    // value of X-Microsoft-OutputFormat
    pub fn azure_output_format(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "riff-24khz-16bit-mono-pcm",
            OutputFormat::Mp3 => "audio-24khz-160kbitrate-mono-mp3",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<OutputFormat> {
        let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match mime.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(OutputFormat::Wav),
            "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => Some(OutputFormat::Mp3),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Exception;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "mp3" => Ok(OutputFormat::Mp3),
            _ => Err(Exception::InvalidRequest(format!(
                "unsupported output format, format={value}, expected wav or mp3"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub plain_text: String,
    pub language: String,
    pub style: Style,
    pub speaker_profile_id: String,
    pub output_format: OutputFormat,
}

impl SpeechRequest {
    pub fn validate(&self) -> Result<()> {
        if self.speaker_profile_id.trim().is_empty() {
            return Err(Exception::InvalidRequest("speaker profile id must not be empty".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(Exception::InvalidRequest("language must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_format() {
        assert_eq!("WAV".parse::<OutputFormat>().unwrap(), OutputFormat::Wav);
        assert_eq!("mp3".parse::<OutputFormat>().unwrap(), OutputFormat::Mp3);
        assert!(matches!("ogg".parse::<OutputFormat>(), Err(Exception::InvalidRequest(_))));
    }

    #[test]
    fn format_from_content_type() {
        assert_eq!(OutputFormat::from_content_type("audio/mpeg"), Some(OutputFormat::Mp3));
        assert_eq!(OutputFormat::from_content_type("audio/x-wav; codec=audio/pcm"), Some(OutputFormat::Wav));
        assert_eq!(OutputFormat::from_content_type("application/json"), None);
    }

    #[test]
    fn blank_profile_is_invalid() {
        let request = SpeechRequest {
            plain_text: "hello".to_string(),
            language: "en-US".to_string(),
            style: Style::Prompt,
            speaker_profile_id: "  ".to_string(),
            output_format: OutputFormat::Wav,
        };
        assert!(matches!(request.validate(), Err(Exception::InvalidRequest(_))));
    }
}
