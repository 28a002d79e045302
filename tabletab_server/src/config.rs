use std::env;

use log::*;

const DEFAULT_TTB_HOST: &str = "127.0.0.1";
const DEFAULT_TTB_PORT: u16 = 8360;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 50;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Buffer size for the internal event queues and the SSE broadcast channel. Slow SSE
    /// subscribers that fall more than this many messages behind start dropping messages.
    pub event_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TTB_HOST.to_string(),
            port: DEFAULT_TTB_PORT,
            database_url: String::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TTB_HOST").ok().unwrap_or_else(|| DEFAULT_TTB_HOST.into());
        let port = env::var("TTB_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TTB_PORT. {e} Using the default, {DEFAULT_TTB_PORT}, instead."
                    );
                    DEFAULT_TTB_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TTB_PORT);
        let database_url = env::var("TTB_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ TTB_DATABASE_URL is not set. Please set it to the URL for the TableTab database.");
            String::default()
        });
        let event_buffer_size = env::var("TTB_EVENT_BUFFER_SIZE")
            .map(|s| {
                s.parse::<usize>().unwrap_or_else(|e| {
                    warn!("🪛️ Invalid configuration value for TTB_EVENT_BUFFER_SIZE. {e}");
                    DEFAULT_EVENT_BUFFER_SIZE
                })
            })
            .ok()
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        Self { host, port, database_url, event_buffer_size }
    }
}
