use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub jwt: JwtSettings,
    pub tmdb: TmdbSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct JwtSettings {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "JwtSettings::default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "JwtSettings::default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
}

impl JwtSettings {
    const fn default_access_ttl() -> i64 {
        3_600
    }

    const fn default_refresh_ttl() -> i64 {
        7 * 86_400
    }
}

/// TMDB connection and media settings.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TmdbSettings {
    /// When disabled every remote call answers "unavailable"
    #[serde(default = "TmdbSettings::default_enabled")]
    pub enabled: bool,
    #[serde(default = "TmdbSettings::default_base_url")]
    pub base_url: String,
    /// v4 read access token, sent as a bearer token (env: TMDB_ACCESS_TOKEN)
    #[serde(default)]
    pub access_token: String,
    /// v3 api key, sent as the `api_key` query parameter (env: TMDB_API_KEY)
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "TmdbSettings::default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub image_sizes: ImageSizes,
    #[serde(default = "TmdbSettings::default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "TmdbSettings::default_language")]
    pub language: String,
}

impl TmdbSettings {
    const fn default_enabled() -> bool {
        true
    }

    fn default_base_url() -> String {
        "https://api.themoviedb.org/3".to_string()
    }

    fn default_image_base_url() -> String {
        "https://image.tmdb.org/t/p".to_string()
    }

    const fn default_timeout() -> u64 {
        10
    }

    fn default_language() -> String {
        "en-US".to_string()
    }
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            base_url: Self::default_base_url(),
            access_token: String::new(),
            api_key: String::new(),
            image_base_url: Self::default_image_base_url(),
            image_sizes: ImageSizes::default(),
            timeout_secs: Self::default_timeout(),
            language: Self::default_language(),
        }
    }
}

/// Size token per image class, e.g. `w500` for posters.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ImageSizes {
    pub poster: String,
    pub backdrop: String,
    pub profile: String,
}

impl Default for ImageSizes {
    fn default() -> Self {
        Self {
            poster: "w500".to_string(),
            backdrop: "w1280".to_string(),
            profile: "w185".to_string(),
        }
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    // Secrets come from the environment when present
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        config.jwt.secret = secret;
    }
    if let Ok(token) = std::env::var("TMDB_ACCESS_TOKEN") {
        config.tmdb.access_token = token;
    }
    if let Ok(key) = std::env::var("TMDB_API_KEY") {
        config.tmdb.api_key = key;
    }

    if config.jwt.secret.is_empty() {
        return Err(config::ConfigError::NotFound("JWT_SECRET".to_string()));
    }

    Ok(config)
}
