use std::path::PathBuf;

use crate::error::ConfigError;
use crate::quiz::generator::DEFAULT_QUESTIONS;

/// Runtime configuration, read from the environment (after `.env` is loaded).
///
/// | Env var             | Default    |
/// |---------------------|------------|
/// | `HOST`              | `0.0.0.0`  |
/// | `PORT`              | `5000`     |
/// | `DEFAULT_QUESTIONS` | `5`        |
/// | `MAX_UPLOAD_BYTES`  | `20971520` |
/// | `LEXICON_PATH`      | unset      |
/// | `TELOXIDE_TOKEN`    | unset      |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Question count used when a request does not name one.
    pub default_questions: usize,
    /// Upper bound for a whole upload request, and for a single bot document.
    pub max_upload_bytes: usize,
    /// Optional CoNLL-U treebank used to build the tagger lexicon.
    pub lexicon_path: Option<PathBuf>,
    /// The bot only starts when a token is present.
    pub telegram_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            default_questions: DEFAULT_QUESTIONS,
            max_upload_bytes: 20 * 1024 * 1024,
            lexicon_path: None,
            telegram_enabled: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;

        let default_questions = parse_var(&lookup, "DEFAULT_QUESTIONS", defaults.default_questions)?;
        if default_questions == 0 {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_QUESTIONS",
                value: "0".to_string(),
            });
        }

        let max_upload_bytes = parse_var(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;

        let lexicon_path = lookup("LEXICON_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let telegram_enabled = lookup("TELOXIDE_TOKEN")
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            default_questions,
            max_upload_bytes,
            lexicon_path,
            telegram_enabled,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_questions, 5);
        assert!(config.lexicon_path.is_none());
        assert!(!config.telegram_enabled);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DEFAULT_QUESTIONS", "10"),
            ("LEXICON_PATH", "/data/en_ewt.conllu"),
            ("TELOXIDE_TOKEN", "123:abc"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_questions, 10);
        assert_eq!(
            config.lexicon_path,
            Some(PathBuf::from("/data/en_ewt.conllu"))
        );
        assert!(config.telegram_enabled);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = Config::from_lookup(lookup_from(&[("DEFAULT_QUESTIONS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "DEFAULT_QUESTIONS",
                ..
            }
        ));
    }
}
