use std::env;
use std::path::Path;
use std::path::PathBuf;

use framework::json;
use serde::Deserialize;
use tracing::debug;
use tracing::info;
use voice::exception::Exception;
use voice::exception::Result;
use voice::pathway::PathwayHint;
use voice::request::OutputFormat;
use voice::ssml::DEFAULT_VOICE_NAME;
use voice::ssml::ScriptSelection;
use voice::style::Style;

const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_STYLE: &str = "Cheerful";
const DEFAULT_OUTPUT_FILENAME: &str = "output";

/// Raw values as written in the settings file or environment.
#[derive(Deserialize, Default)]
pub struct SettingsFile {
    pub region: Option<String>,
    pub api_key: Option<String>,
    pub speaker_profile_id: Option<String>,
    pub language: Option<String>,
    pub style: Option<String>,
    pub output_format: Option<String>,
    pub output_filename: Option<String>,
    pub pathway: Option<String>,
    pub voice_name: Option<String>,
    pub script_order: Option<u32>,
}

/// Values given on the command line, they win over the settings file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub speaker_profile_id: Option<String>,
    pub language: Option<String>,
    pub style: Option<String>,
    pub output_format: Option<String>,
    pub output_filename: Option<String>,
    pub pathway: Option<String>,
}

pub struct ServiceSettings {
    pub region: String,
    pub api_key: String,
}

pub struct Settings {
    pub service: ServiceSettings,
    pub speaker_profile_id: String,
    pub language: String,
    pub style: Style,
    pub output_format: OutputFormat,
    pub output_filename: PathBuf,
    pub pathway: PathwayHint,
    pub voice_name: String,
    pub script: ScriptSelection,
}

impl SettingsFile {
    pub fn from_env<F>(lookup: &F) -> Result<SettingsFile>
    where
        F: Fn(&str) -> Option<String>,
    {
        let script_order = lookup("TRIAL_SCRIPT_ORDER")
            .map(|value| {
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|err| Exception::InvalidRequest(format!("invalid TRIAL_SCRIPT_ORDER, value={value}, error={err}")))
            })
            .transpose()?;

        Ok(SettingsFile {
            region: lookup("SPEECH_REGION"),
            api_key: lookup("SPEECH_KEY"),
            speaker_profile_id: lookup("SPEAKER_PROFILE_ID"),
            language: lookup("SPEECH_LANGUAGE"),
            style: lookup("SPEECH_STYLE"),
            output_format: lookup("OUTPUT_FORMAT"),
            output_filename: lookup("OUTPUT_FILENAME"),
            pathway: lookup("VOICE_PATHWAY"),
            voice_name: lookup("VOICE_NAME"),
            script_order,
        })
    }
}

pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let file = load_file(path)?;
    resolve(file, overrides, &|name: &str| env::var(name).ok())
}

pub fn load_service(path: Option<&Path>) -> Result<ServiceSettings> {
    let file = load_file(path)?;
    resolve_service(&file, &|name: &str| env::var(name).ok())
}

fn load_file(path: Option<&Path>) -> Result<SettingsFile> {
    match dotenvy::dotenv() {
        Ok(path) => info!("load env file, path={}", path.to_string_lossy()),
        Err(err) => debug!("skip env file, error={err}"),
    }

    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_path().filter(|path| path.exists()),
    };

    match path {
        Some(path) => {
            info!("load config, path={}", path.to_string_lossy());
            json::load_file(&path).map_err(|err| Exception::InvalidRequest(format!("{err:#}")))
        }
        None => {
            info!("load config from environment");
            SettingsFile::from_env(&|name: &str| env::var(name).ok())
        }
    }
}

fn default_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/narrate/speech.json"))
}

pub fn resolve<F>(file: SettingsFile, overrides: &Overrides, lookup: &F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let service = resolve_service(&file, lookup)?;

    let speaker_profile_id = required(
        "speaker_profile_id",
        overrides.speaker_profile_id.as_deref().or(file.speaker_profile_id.as_deref()),
    )?;
    let language = optional(overrides.language.as_deref(), file.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE);
    let style = optional(overrides.style.as_deref(), file.style.as_deref()).unwrap_or(DEFAULT_STYLE);
    let output_format = optional(overrides.output_format.as_deref(), file.output_format.as_deref()).unwrap_or("wav");
    let output_filename = optional(overrides.output_filename.as_deref(), file.output_filename.as_deref())
        .unwrap_or(DEFAULT_OUTPUT_FILENAME);
    let pathway = optional(overrides.pathway.as_deref(), file.pathway.as_deref()).unwrap_or("auto");
    let voice_name = optional(None, file.voice_name.as_deref()).unwrap_or(DEFAULT_VOICE_NAME);

    Ok(Settings {
        service,
        speaker_profile_id,
        language: language.to_string(),
        style: style.parse()?,
        output_format: output_format.parse()?,
        output_filename: PathBuf::from(output_filename),
        pathway: pathway.parse()?,
        voice_name: voice_name.to_string(),
        script: file.script_order.map_or(ScriptSelection::ByLocale, ScriptSelection::Fixed),
    })
}

pub fn resolve_service<F>(file: &SettingsFile, lookup: &F) -> Result<ServiceSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let region = required("region", file.region.as_deref())?;
    let api_key = required("api_key", file.api_key.as_deref())?;
    let api_key = match api_key.strip_prefix("env:") {
        Some(name) => {
            let value = lookup(name);
            required(name, value.as_deref())?
        }
        None => api_key,
    };
    Ok(ServiceSettings { region, api_key })
}

fn required(name: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() && !value.starts_with("your_") => Ok(value.to_string()),
        _ => Err(Exception::InvalidRequest(format!("{name} is not set, please fill in the actual value"))),
    }
}

fn optional<'a>(first: Option<&'a str>, second: Option<&'a str>) -> Option<&'a str> {
    [first, second]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}
