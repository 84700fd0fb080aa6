pub mod advisor;
pub mod domain;
pub mod llm;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
    pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub gemini_base_url: String,
        pub gemini_model: String,
        pub gemini_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                gemini_base_url: non_empty_var("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                gemini_model: non_empty_var("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gemini_timeout_secs: parse_var("GEMINI_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port: parse_var("PORT")?.unwrap_or(DEFAULT_PORT),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                gemini_api_key: None,
                gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
                gemini_timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
                sentry_dsn: None,
                port: DEFAULT_PORT,
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        non_empty_var(key)
            .map(|v| v.parse::<T>().with_context(|| format!("invalid {key}: {v}")))
            .transpose()
    }

}
