use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .connection_verbose(false)
        .build()
        .expect("failed to build http client")
});

pub trait ResponseExt {
    fn content_type(&self) -> &str;
}

impl ResponseExt for reqwest::Response {
    fn content_type(&self) -> &str {
        self.headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }
}
