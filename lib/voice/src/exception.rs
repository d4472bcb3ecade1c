use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Exception>;

pub enum Exception {
    UnknownProfile(String),
    UnknownStyle(String),
    InvalidRequest(String),
    Synthesis { message: String, detail: Option<String> },
    Io(String),
    Unexpected { message: String, trace: String },
}

impl Exception {
    pub fn synthesis<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self::Synthesis {
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn unexpected<T>(error: T) -> Self
    where
        T: ToString,
    {
        Self::Unexpected {
            message: error.to_string(),
            trace: Backtrace::force_capture().to_string(),
        }
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Exception::UnknownProfile(id) => {
                write!(f, "speaker profile is neither a trial nor a personal voice, id={id}")
            }
            Exception::UnknownStyle(style) => write!(
                f,
                "unknown style, style={style}, expected one of Cheerful, Excited, Enthusiastic, Friendly, Prompt"
            ),
            Exception::InvalidRequest(message) => write!(f, "invalid request, {message}"),
            Exception::Synthesis { message, detail: None } => write!(f, "synthesis failed, {message}"),
            Exception::Synthesis {
                message,
                detail: Some(detail),
            } => write!(f, "synthesis failed, {message}, detail={detail}"),
            Exception::Io(message) => write!(f, "io error, {message}"),
            Exception::Unexpected { message, trace } => write!(f, "{message}\ntrace:\n{trace}"),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Error for Exception {}

impl From<io::Error> for Exception {
    fn from(err: io::Error) -> Self {
        Exception::Io(err.to_string())
    }
}

impl From<reqwest::Error> for Exception {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map_or("", |url| url.as_str()).to_string();
        Exception::Synthesis {
            message: format!("failed to call azure api, url={url}"),
            detail: Some(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for Exception {
    fn from(err: anyhow::Error) -> Self {
        Exception::unexpected(format!("{err:#}"))
    }
}
