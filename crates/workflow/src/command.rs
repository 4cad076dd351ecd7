//! Chat command grammar.
//!
//! ```text
//! update status for <task> to <status> [<url>]
//! ```
//!
//! Tokens are whitespace-separated. The fourth token is the task identifier,
//! the sixth the status, and the optional seventh a URL. The fifth token is
//! not checked. Tokens after the seventh are ignored.

use thiserror::Error;

use crate::PageId;

/// Literal prefix every status command starts with.
pub const COMMAND_PREFIX: &str = "update status for";

const MIN_TOKENS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Invalid message format")]
    InvalidFormat,

    #[error("Message missing required parts")]
    MissingParts,
}

/// A parsed `update status for ...` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCommand {
    pub page_id: PageId,
    pub new_status: String,
    pub github_url: Option<String>,
}

/// Parses a status command out of free chat text.
pub fn parse_status_command(text: &str) -> Result<StatusCommand, CommandError> {
    if !text.starts_with(COMMAND_PREFIX) {
        return Err(CommandError::InvalidFormat);
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < MIN_TOKENS {
        return Err(CommandError::MissingParts);
    }

    // parts[3] is never blank after split_whitespace.
    let page_id = PageId::new(parts[3]).ok_or(CommandError::MissingParts)?;
    Ok(StatusCommand {
        page_id,
        new_status: parts[5].to_string(),
        github_url: parts.get(6).map(|s| (*s).to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command() {
        let cmd =
            parse_status_command("update status for abc123 to Done https://github.com/a/b/pull/1")
                .unwrap();
        assert_eq!(cmd.page_id.as_str(), "abc123");
        assert_eq!(cmd.new_status, "Done");
        assert_eq!(cmd.github_url.as_deref(), Some("https://github.com/a/b/pull/1"));
    }

    #[test]
    fn test_parse_without_url() {
        let cmd = parse_status_command("update status for abc123 to Done").unwrap();
        assert!(cmd.github_url.is_none());
    }

    #[test]
    fn test_parse_rejects_other_prefixes() {
        for text in [
            "",
            "please update status for abc to Done",
            "Update status for abc to Done",
            "update task abc to Done",
            " update status for abc to Done",
        ] {
            assert_eq!(
                parse_status_command(text),
                Err(CommandError::InvalidFormat),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_short_commands() {
        assert_eq!(
            parse_status_command("update status for abc to"),
            Err(CommandError::MissingParts)
        );
        assert_eq!(
            parse_status_command("update status for"),
            Err(CommandError::MissingParts)
        );
    }

    #[test]
    fn test_parse_tolerates_repeated_whitespace() {
        let cmd = parse_status_command("update status for   abc\tto  Done").unwrap();
        assert_eq!(cmd.page_id.as_str(), "abc");
        assert_eq!(cmd.new_status, "Done");
    }
}
