use config::{Config, ConfigError};
use serde::Deserialize;
use std::{env, fmt};

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub secret: String,
    pub session_cookie: String,
    pub session_hours: i64,
    pub password_cost: u32,
    // Registrations with an email under this domain are granted the Admin role.
    pub admin_domain: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mailer {
    // Bare address, the display name is kept apart in `from_name`.
    pub from: String,
    pub from_name: String,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOAuth {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuth {
    pub google: Option<GoogleOAuth>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: String,
    pub base_url: String,
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    pub auth: Auth,
    pub mailer: Mailer,
    #[serde(default)]
    pub oauth: OAuth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings = Config::new();
        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        settings.merge(config::File::with_name("config/default"))?;
        settings.merge(config::File::with_name(&format!("config/{}", env)).required(false))?;
        settings.merge(config::File::with_name("config/local").required(false))?;

        // Merge config from the environment variables. Keys use a double
        // underscore separator because field names contain single ones.
        // Eg: `AUTH__ADMIN_DOMAIN=example.com ./target/rucksack` would set the
        // `auth.admin_domain` value.
        settings.merge(config::Environment::new().separator("__"))?;

        // Some cloud services like Heroku expose a randomly assigned port in
        // the PORT env var and there is no way to change the env var name.
        if let Ok(port) = env::var("PORT") {
            settings.set("server.port", port)?;
        }

        settings.try_into()
    }

    pub fn external_callback_url(&self) -> String {
        format!(
            "{}/Account/ExternalLoginCallback",
            self.base_url.trim_end_matches('/')
        )
    }

    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    pub fn is_memory_database(&self) -> bool {
        self.database.uri.starts_with("memory://")
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "http://localhost:{}", &self.port)
    }
}
