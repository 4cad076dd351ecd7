//! Command-line and environment configuration.
//!
//! Each binary flattens the argument groups it needs. Every option falls back
//! to an environment variable, and `.env` is loaded before parsing, so the
//! same settings work from a shell, a container, or a local `.env` file.
//! Parsed configuration is never mutated afterwards.

use clap::{builder::FalseyValueParser, error::ErrorKind, ArgAction, Args, Parser};
use thiserror::Error;
use tracing::warn;

use github::{GitHubClient, GitHubClientError, GitHubConfig};
use listener::{SignatureVerification, DEFAULT_MAX_AGE_SECS};
use llm::{ChatCompletionClient, LlmClientError, LlmConfig};
use notion::{NotionClient, NotionClientError, NotionConfig};
use workflow::{DatabaseId, UserLogin};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SLACK_SIGNING_SECRET is required unless SLACK_SKIP_VERIFICATION is set")]
    MissingSigningSecret,

    #[error("DATABASE_ID is required")]
    MissingDatabaseId,

    #[error(transparent)]
    Notion(#[from] NotionClientError),

    #[error(transparent)]
    GitHub(#[from] GitHubClientError),

    #[error(transparent)]
    Llm(#[from] LlmClientError),
}

/// Loads `.env` from the working directory if present.
///
/// A missing file is fine. A file that exists but cannot be read or parsed
/// is returned so the caller can report it.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome<T>(result: Result<T, dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Parses arguments, exiting with status 1 on any usage error.
///
/// `--help` and `--version` still exit 0. A `.env` failure from
/// [`load_dotenv`] is printed alongside usage errors, since missing settings
/// are usually its consequence.
pub fn parse_or_exit<T: Parser>(dotenv: &Result<(), dotenvy::Error>) -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                if let Err(e) = dotenv {
                    eprintln!("note: .env was not loaded: {e}");
                }
                std::process::exit(1);
            }
        },
    }
}

/// Logs a `.env` failure once the subscriber is installed.
pub fn report_dotenv(dotenv: &Result<(), dotenvy::Error>) {
    if let Err(e) = dotenv {
        warn!(error = %e, ".env file was not loaded");
    }
}

// ---------------------------------------------------------------------------
// Notion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct NotionArgs {
    /// Notion integration token
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub notion_api_key: String,

    /// Task database to search, and the fallback owner for pages
    #[arg(long, env = "DATABASE_ID")]
    pub database_id: Option<String>,

    #[arg(long, env = "NOTION_API_URL", default_value = notion::DEFAULT_API_URL)]
    pub notion_api_url: String,

    #[arg(long, env = "NOTION_VERSION", default_value = notion::DEFAULT_NOTION_VERSION)]
    pub notion_version: String,
}

impl NotionArgs {
    pub fn database_id(&self) -> Option<DatabaseId> {
        self.database_id
            .as_deref()
            .and_then(|id| DatabaseId::new(id.trim()))
    }

    pub fn require_database_id(&self) -> Result<DatabaseId, ConfigError> {
        self.database_id().ok_or(ConfigError::MissingDatabaseId)
    }

    pub fn client(&self) -> Result<NotionClient, ConfigError> {
        let config = NotionConfig {
            base_url: self.notion_api_url.clone(),
            notion_version: self.notion_version.clone(),
            ..NotionConfig::new(self.notion_api_key.clone())
        };
        Ok(NotionClient::new(config)?)
    }
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct GitHubArgs {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    #[arg(long, env = "REPO_OWNER")]
    pub repo_owner: String,

    #[arg(long, env = "REPO_NAME")]
    pub repo_name: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Logins asked to review every new pull request (comma-separated)
    #[arg(long, env = "PR_REVIEWERS", value_delimiter = ',')]
    pub reviewers: Vec<String>,

    /// Logins assigned to every new pull request (comma-separated)
    #[arg(long, env = "PR_ASSIGNEES", value_delimiter = ',')]
    pub assignees: Vec<String>,
}

impl GitHubArgs {
    pub fn client(&self) -> Result<GitHubClient, ConfigError> {
        let config = GitHubConfig {
            base_url: self.github_api_url.clone(),
            ..GitHubConfig::new(
                self.github_token.clone(),
                self.repo_owner.clone(),
                self.repo_name.clone(),
            )
        };
        Ok(GitHubClient::new(config)?)
    }

    pub fn reviewer_logins(&self) -> Vec<UserLogin> {
        logins(&self.reviewers)
    }

    pub fn assignee_logins(&self) -> Vec<UserLogin> {
        logins(&self.assignees)
    }
}

fn logins(values: &[String]) -> Vec<UserLogin> {
    values
        .iter()
        .filter_map(|v| UserLogin::new(v.trim()))
        .collect()
}

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct LlmArgs {
    /// Completion API key. Without it PR bodies use the fallback template.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(long, env = "LLM_BASE_URL", default_value = llm::DEFAULT_BASE_URL)]
    pub llm_base_url: String,

    #[arg(long, env = "LLM_MODEL", default_value = llm::DEFAULT_MODEL)]
    pub llm_model: String,
}

impl LlmArgs {
    pub fn client(&self) -> Result<ChatCompletionClient, ConfigError> {
        Ok(ChatCompletionClient::new(LlmConfig {
            api_key: self
                .openrouter_api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            base_url: self.llm_base_url.clone(),
            model: self.llm_model.clone(),
        })?)
    }
}

// ---------------------------------------------------------------------------
// Webhook listener
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct WebhookArgs {
    #[arg(long, env = "WEBHOOK_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "WEBHOOK_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Shared secret used to verify request signatures
    #[arg(long, env = "SLACK_SIGNING_SECRET", hide_env_values = true)]
    pub slack_signing_secret: Option<String>,

    /// Accept unsigned requests. Only for local development.
    #[arg(
        long,
        env = "SLACK_SKIP_VERIFICATION",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub skip_verification: bool,

    /// Maximum request timestamp skew in seconds; 0 disables the check
    #[arg(long, env = "SLACK_MAX_TIMESTAMP_AGE_SECS", default_value_t = DEFAULT_MAX_AGE_SECS)]
    pub max_timestamp_age_secs: u64,
}

impl WebhookArgs {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Resolves the verification mode. Skipping must be requested
    /// explicitly; a missing secret alone is an error.
    pub fn verification(&self) -> Result<SignatureVerification, ConfigError> {
        if self.skip_verification {
            return Ok(SignatureVerification::Disabled);
        }
        let secret = self
            .slack_signing_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSigningSecret)?;
        Ok(SignatureVerification::Enforced {
            secret: secret.to_string(),
            max_age_secs: (self.max_timestamp_age_secs > 0).then_some(self.max_timestamp_age_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(secret: Option<&str>, skip: bool, max_age: u64) -> WebhookArgs {
        WebhookArgs {
            bind: "127.0.0.1".to_string(),
            port: 9000,
            slack_signing_secret: secret.map(str::to_string),
            skip_verification: skip,
            max_timestamp_age_secs: max_age,
        }
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let missing = dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no .env",
        ));
        assert!(dotenv_outcome::<()>(Err(missing)).is_ok());
        assert!(dotenv_outcome(Ok(())).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let malformed = dotenvy::Error::LineParse("NOTION_API_KEY = 'x".to_string(), 17);
        assert!(matches!(
            dotenv_outcome::<()>(Err(malformed)),
            Err(dotenvy::Error::LineParse(_, 17))
        ));

        let unreadable = dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(dotenv_outcome::<()>(Err(unreadable)).is_err());
    }

    #[test]
    fn test_secret_enables_verification() {
        let mode = webhook(Some("s3cret"), false, 300).verification().unwrap();
        match mode {
            SignatureVerification::Enforced {
                secret,
                max_age_secs,
            } => {
                assert_eq!(secret, "s3cret");
                assert_eq!(max_age_secs, Some(300));
            }
            SignatureVerification::Disabled => panic!("expected enforced verification"),
        }
    }

    #[test]
    fn test_missing_secret_without_skip_is_an_error() {
        assert!(matches!(
            webhook(None, false, 300).verification(),
            Err(ConfigError::MissingSigningSecret)
        ));
        assert!(matches!(
            webhook(Some("  "), false, 300).verification(),
            Err(ConfigError::MissingSigningSecret)
        ));
    }

    #[test]
    fn test_skip_flag_disables_verification() {
        let mode = webhook(None, true, 300).verification().unwrap();
        assert!(!mode.is_enforced());
    }

    #[test]
    fn test_zero_max_age_disables_freshness_check() {
        let mode = webhook(Some("s3cret"), false, 0).verification().unwrap();
        assert!(matches!(
            mode,
            SignatureVerification::Enforced {
                max_age_secs: None,
                ..
            }
        ));
    }

    #[test]
    fn test_address_joins_bind_and_port() {
        assert_eq!(webhook(None, true, 0).address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_logins_drop_blank_entries() {
        let values = vec!["alice".to_string(), " ".to_string(), " bob ".to_string()];
        let parsed = logins(&values);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].as_str(), "alice");
        assert_eq!(parsed[1].as_str(), "bob");
    }

    #[test]
    fn test_database_id_ignores_blank_value() {
        let args = NotionArgs {
            notion_api_key: "secret_x".to_string(),
            database_id: Some("   ".to_string()),
            notion_api_url: notion::DEFAULT_API_URL.to_string(),
            notion_version: notion::DEFAULT_NOTION_VERSION.to_string(),
        };
        assert!(args.database_id().is_none());
        assert!(matches!(
            args.require_database_id(),
            Err(ConfigError::MissingDatabaseId)
        ));
    }

    #[test]
    fn test_reviewers_split_on_commas() {
        #[derive(Debug, Parser)]
        struct Cli {
            #[command(flatten)]
            github: GitHubArgs,
        }

        let cli = Cli::try_parse_from([
            "draft-pr",
            "--github-token",
            "ghp_x",
            "--repo-owner",
            "acme",
            "--repo-name",
            "widgets",
            "--reviewers",
            "alice,bob",
        ])
        .unwrap();
        let reviewers: Vec<_> = cli
            .github
            .reviewer_logins()
            .iter()
            .map(|l| l.as_str().to_string())
            .collect();
        assert_eq!(reviewers, vec!["alice", "bob"]);
    }
}
