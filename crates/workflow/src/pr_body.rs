//! Pull request description generation.
//!
//! [`generate_pr_body`] asks the completion provider for a Markdown
//! description and degrades to [`fallback_body`] on any failure. It never
//! returns an error.

use tracing::{instrument, warn};

use crate::{ChangeRecord, CompletionProvider};

/// One `- <path> (<kind>)` line per change, in input order.
pub fn change_bullets(changes: &[ChangeRecord]) -> String {
    changes
        .iter()
        .map(|c| format!("- {} ({})", c.file_path, c.change_type))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(bullets: &str) -> String {
    format!(
        "Please generate a professional pull request description based on the following changes:

{bullets}

The PR description should include:
1. A brief summary of the changes
2. The purpose/motivation for these changes
3. Any important implementation details
4. Any testing that was done
5. Any breaking changes or dependencies

Please format the response in markdown."
    )
}

/// Deterministic body used whenever generation fails.
pub fn fallback_body(bullets: &str) -> String {
    format!(
        "# Pull Request

## Changes
{bullets}

## Description
This PR includes the following changes:
{bullets}

Please review the changes and provide feedback."
    )
}

#[instrument(skip_all, fields(changes = changes.len()))]
pub async fn generate_pr_body(provider: &dyn CompletionProvider, changes: &[ChangeRecord]) -> String {
    let bullets = change_bullets(changes);
    match provider.complete(&build_prompt(&bullets)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Completion service returned an empty response; using fallback body");
            fallback_body(&bullets)
        }
        Err(e) => {
            warn!(error = %e, "Error generating PR body; using fallback body");
            fallback_body(&bullets)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCompletion;
    use crate::{ChangeKind, RemoteError};

    fn changes() -> Vec<ChangeRecord> {
        vec![
            ChangeRecord {
                file_path: "crates/listener/src/lib.rs".to_string(),
                change_type: ChangeKind::Added,
                diff: "+pub fn serve()".to_string(),
            },
            ChangeRecord {
                file_path: "README.md".to_string(),
                change_type: ChangeKind::Deleted,
                diff: String::new(),
            },
        ]
    }

    #[test]
    fn test_change_bullets_format() {
        assert_eq!(
            change_bullets(&changes()),
            "- crates/listener/src/lib.rs (added)\n- README.md (deleted)"
        );
    }

    #[tokio::test]
    async fn test_generated_text_is_returned() {
        let provider = FakeCompletion::replying("## Summary\nAdds a listener.");
        let body = generate_pr_body(&provider, &changes()).await;

        assert_eq!(body, "## Summary\nAdds a listener.");
        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("- README.md (deleted)"));
    }

    #[tokio::test]
    async fn test_outage_falls_back_to_template() {
        let provider = FakeCompletion::failing(RemoteError::Transport("connection refused".into()));
        let body = generate_pr_body(&provider, &changes()).await;

        assert!(body.starts_with("# Pull Request"));
        assert!(body.contains("- crates/listener/src/lib.rs (added)"));
    }

    #[tokio::test]
    async fn test_empty_change_list_still_yields_text() {
        let provider = FakeCompletion::failing(RemoteError::NotConfigured("api key".into()));
        let body = generate_pr_body(&provider, &[]).await;

        assert!(!body.is_empty());
        assert!(body.contains("## Changes"));
    }

    #[tokio::test]
    async fn test_blank_completion_falls_back() {
        let provider = FakeCompletion::replying("   \n");
        let body = generate_pr_body(&provider, &changes()).await;
        assert!(body.starts_with("# Pull Request"));
    }
}
