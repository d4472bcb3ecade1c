use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tokio::fs;
use tracing::info;
use tracing::warn;
use voice::azure::AzureSpeech;
use voice::exception::Exception;
use voice::markdown;
use voice::output;
use voice::pathway;
use voice::request::SpeechRequest;
use voice::ssml::MarkupBuilder;
use voice::synthesize;

use crate::config;
use crate::config::Overrides;

const PREVIEW_LENGTH: usize = 500;

#[derive(Args)]
pub struct Synthesize {
    #[arg(help = "markdown file path", default_value = "input.md")]
    input: PathBuf,

    #[arg(short, long, help = "output file name without extension")]
    output: Option<String>,

    #[arg(long, help = "conf path")]
    conf: Option<PathBuf>,

    #[arg(long, help = "speaker profile id")]
    profile: Option<String>,

    #[arg(long, help = "language, e.g. en-US")]
    language: Option<String>,

    #[arg(long, help = "Cheerful, Excited, Enthusiastic, Friendly or Prompt")]
    style: Option<String>,

    #[arg(long, help = "wav or mp3")]
    format: Option<String>,

    #[arg(long, help = "auto, trial or full")]
    pathway: Option<String>,

    #[arg(long, help = "print ssml without synthesizing", default_value_t = false)]
    dry_run: bool,
}

impl Synthesize {
    pub async fn execute(&self) -> Result<()> {
        info!("read markdown, path={}", self.input.to_string_lossy());
        let markdown = fs::read_to_string(&self.input).await.map_err(|err| {
            Exception::Io(format!("failed to read input, path={}, error={err}", self.input.to_string_lossy()))
        })?;
        let text = markdown::normalize(&markdown);
        if text.is_empty() {
            warn!("no text found in input, path={}", self.input.to_string_lossy());
        }
        println!("--- Text to synthesize ---\n{}\n--------------------------", preview(&text));

        let settings = config::load(self.conf.as_deref(), &self.overrides())?;
        let request = SpeechRequest {
            plain_text: text,
            language: settings.language.to_string(),
            style: settings.style,
            speaker_profile_id: settings.speaker_profile_id.to_string(),
            output_format: settings.output_format,
        };
        let prosody = request.style.prosody();

        let speech = AzureSpeech::new(&settings.service.region, settings.service.api_key.to_string());
        let pathway = pathway::classify(&request.speaker_profile_id, settings.pathway, &speech).await?;
        println!("voice pathway: {pathway}, style: {}, language: {}", request.style, request.language);

        let builder = MarkupBuilder {
            voice_name: settings.voice_name.to_string(),
            script: settings.script,
        };
        let document = builder.build(&request, pathway, &prosody)?;
        if self.dry_run {
            println!("{}", document.ssml());
            return Ok(());
        }

        let result = synthesize::dispatch(&speech, &document, pathway, request.output_format).await?;
        let path = output::write(&result, &settings.output_filename, request.output_format).await?;
        println!(
            "audio saved, path={}, size={:.1}KB",
            path.to_string_lossy(),
            result.audio.len() as f64 / 1024.0
        );
        Ok(())
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            speaker_profile_id: self.profile.clone(),
            language: self.language.clone(),
            style: self.style.clone(),
            output_format: self.format.clone(),
            output_filename: self.output.clone(),
            pathway: self.pathway.clone(),
        }
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_LENGTH).collect();
    if text.chars().nth(PREVIEW_LENGTH).is_some() {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_truncated_by_characters() {
        assert_eq!(preview("short"), "short");

        let long = "é".repeat(PREVIEW_LENGTH + 1);
        let preview = preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_LENGTH + 3);
        assert!(preview.ends_with("..."));
    }
}
