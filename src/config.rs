//! Command-line and environment configuration.

use clap::Parser;

use crate::middleware::Redirect;
use crate::server::DEFAULT_BODY_LIMIT;

/// Runtime settings. Each flag can also come from its environment variable.
#[derive(Clone, Debug, Parser)]
#[command(name = "tsu-todos", version, about = "In-memory todo CRUD service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "TODOS_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Path prefix that is redirected.
    #[arg(long, env = "TODOS_REDIRECT_FROM", default_value = "/tasks/")]
    pub redirect_from: String,

    /// Prefix the redirected path is moved under.
    #[arg(long, env = "TODOS_REDIRECT_TO", default_value = "/todos/")]
    pub redirect_to: String,

    /// Largest request body accepted, in bytes.
    #[arg(long, env = "TODOS_MAX_BODY_BYTES", default_value_t = DEFAULT_BODY_LIMIT)]
    pub max_body_bytes: usize,
}

impl Config {
    pub fn redirect(&self) -> Redirect {
        Redirect::found(self.redirect_from.clone(), self.redirect_to.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["tsu-todos"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000");
        assert_eq!(config.redirect_from, "/tasks/");
        assert_eq!(config.redirect_to, "/todos/");
        assert_eq!(config.max_body_bytes, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "tsu-todos",
            "--addr",
            "127.0.0.1:8080",
            "--redirect-from",
            "/jobs/",
            "--max-body-bytes",
            "4096",
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.redirect_from, "/jobs/");
        assert_eq!(config.max_body_bytes, 4096);
    }
}
