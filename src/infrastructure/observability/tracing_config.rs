/// Output options for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool) -> Self {
        Self {
            environment: environment.into(),
            json_format,
        }
    }

    /// `LOG_FORMAT=json` switches to JSON output even when the settings do not.
    pub fn with_env_override(mut self) -> Self {
        let log_format = std::env::var("LOG_FORMAT").ok();
        self.json_format = self.json_format || is_json_format(log_format.as_deref());
        self
    }
}

pub fn is_json_format(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
