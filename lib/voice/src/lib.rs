pub mod azure;
pub mod exception;
pub mod markdown;
pub mod output;
pub mod pathway;
pub mod request;
pub mod ssml;
pub mod style;
pub mod synthesize;
