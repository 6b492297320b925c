// Application configuration, loaded from environment variables and CLI flags.

/// Default Challonge API host. Overridable so tests can point the client at
/// a local mock server.
pub const CHALLONGE_API_URL: &str = "https://api.challonge.com/v1";

/// Application configuration. Constructed once at startup and passed
/// explicitly into whatever needs it; nothing reads the environment after
/// this.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Challonge API credential. The mirror endpoint fails with a
    /// configuration error when this is absent.
    pub challonge_api_key: Option<String>,
    /// Base URL of the Challonge API.
    pub challonge_base_url: String,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:bracket.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `CHALLONGE_API_KEY` - bearer credential for the Challonge API
    /// - `CHALLONGE_API_URL` - Challonge API base URL override
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:bracket.db?mode=rwc".to_string());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(3000);

        let challonge_api_key = std::env::var("CHALLONGE_API_KEY")
            .ok()
            .filter(|v| !v.is_empty());

        let challonge_base_url = std::env::var("CHALLONGE_API_URL")
            .unwrap_or_else(|_| CHALLONGE_API_URL.to_string());

        Config {
            database_url,
            port,
            challonge_api_key,
            challonge_base_url,
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_value() {
        let args: Vec<String> = ["bracket-backend", "--port", "8080"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(Config::parse_cli_value(&args, "--port").as_deref(), Some("8080"));
        assert_eq!(Config::parse_cli_value(&args, "--host"), None);
    }
}
