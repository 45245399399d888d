use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub cors: CorsOrigins,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL");

        let db_max_connections: u32 = get_or("SUSTAIN_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid SUSTAIN_DB_MAX_CONNECTIONS: {e}"))?;

        let host: IpAddr = get_or("SUSTAIN_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SUSTAIN_HOST: {e}"))?;

        let port: u16 = get_or("SUSTAIN_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid SUSTAIN_PORT: {e}"))?;

        let max_body_size: usize = get_or("SUSTAIN_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid SUSTAIN_MAX_BODY_SIZE: {e}"))?;

        let cors = parse_cors(&get_or("SUSTAIN_CORS_ORIGINS", "http://localhost:5173"))?;

        let log_level = get_or("SUSTAIN_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            cors,
            log_level,
        })
    }
}

fn parse_cors(raw: &str) -> Result<CorsOrigins, String> {
    if raw.trim() == "*" {
        return Ok(CorsOrigins::Any);
    }

    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with("http://") || s.starts_with("https://") {
                Ok(s.trim_end_matches('/').to_string())
            } else {
                Err(format!("Invalid SUSTAIN_CORS_ORIGINS entry '{s}': expected an http(s) origin"))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsOrigins::List(origins))
}
