use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub default_locale: String,
    pub session_ttl_minutes: i64,
    pub two_factor_required: bool,
    pub two_factor_ttl_seconds: i64,
    pub schedule_start_hour: u32,
    pub schedule_end_hour: u32,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: String::new(),
            default_locale: "en".to_string(),
            session_ttl_minutes: 60,
            two_factor_required: false,
            two_factor_ttl_seconds: 300,
            schedule_start_hour: 8,
            schedule_end_hour: 18,
            server_port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            default_locale: env::var("DEFAULT_LOCALE")
                .unwrap_or_else(|_| defaults.default_locale.clone()),
            session_ttl_minutes: parse_var("SESSION_TTL_MINUTES", defaults.session_ttl_minutes),
            two_factor_required: parse_var("TWO_FACTOR_REQUIRED", defaults.two_factor_required),
            two_factor_ttl_seconds: parse_var("TWO_FACTOR_TTL_SECONDS", defaults.two_factor_ttl_seconds),
            schedule_start_hour: parse_var("SCHEDULE_START_HOUR", defaults.schedule_start_hour),
            schedule_end_hour: parse_var("SCHEDULE_END_HOUR", defaults.schedule_end_hour),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
