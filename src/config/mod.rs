use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub secret_key: String,
    pub access_token_expire_mins: u64,
    pub refresh_token_expire_mins: u64,
    pub otp_expire_mins: u64,
    pub google_client_id: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub cache_default_ttl_secs: u64,
    pub default_from_email: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(8000),
            secret_key: env::var("SECRET_KEY")?,
            access_token_expire_mins: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")?
                .parse()
                .unwrap_or(60),
            refresh_token_expire_mins: env::var("REFRESH_TOKEN_EXPIRE_MINUTES")?
                .parse()
                .unwrap_or(24 * 60),
            otp_expire_mins: env::var("OTP_EXPIRE_MINUTES")?.parse().unwrap_or(15),
            google_client_id: env::var("GOOGLE_CLIENT_ID")?,
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")?.parse().unwrap_or(60),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")?.parse().unwrap_or(100),
            cache_default_ttl_secs: env::var("CACHE_DEFAULT_TTL")?.parse().unwrap_or(300),
            default_from_email: env::var("DEFAULT_FROM_EMAIL")?,
        })
    }

    pub fn access_token_expiration(&self) -> Duration {
        Duration::from_secs(self.access_token_expire_mins * 60)
    }

    pub fn refresh_token_expiration(&self) -> Duration {
        Duration::from_secs(self.refresh_token_expire_mins * 60)
    }

    pub fn otp_expiration(&self) -> Duration {
        Duration::from_secs(self.otp_expire_mins * 60)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}
