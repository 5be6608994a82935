//! Seed script for development: creates sample issues through the HTTP API.
//!
//! Usage: `cargo run --bin seed` (with the `issuedesk` server running)
//!
//! Reads `API_BASE_URL` (and .env).

use issuedesk::client::{HttpIssueClient, IssueApi};
use issuedesk::config::AppConfig;
use issuedesk::models::issue::{CreateIssue, IssueStatus, UpdateIssue};
use issuedesk::models::query::ListQuery;

const SAMPLE_ISSUES: &[(&str, &str, IssueStatus)] = &[
    (
        "Login button unresponsive on Safari",
        "Clicking the login button on Safari 17 does nothing. No console errors.",
        IssueStatus::Open,
    ),
    (
        "Dashboard loads slowly with many projects",
        "Accounts with over 200 projects take more than 10 seconds to render the dashboard.",
        IssueStatus::Open,
    ),
    (
        "Typo in password reset email",
        "The reset email says 'pasword' in the subject line.",
        IssueStatus::Closed,
    ),
    (
        "Export to CSV drops unicode characters",
        "Names with accents are replaced by question marks in exported files.",
        IssueStatus::Open,
    ),
    (
        "Session expires during long form edits",
        "Users editing for more than 30 minutes lose their changes on submit.",
        IssueStatus::Open,
    ),
    (
        "Broken link in footer",
        "The 'Privacy' link in the footer points to a 404 page.",
        IssueStatus::Closed,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let client = HttpIssueClient::from_config(&config)?;

    println!("=== Issue Seed Script ({}) ===", client.base_url());

    for (title, description, status) in SAMPLE_ISSUES {
        let issue = client
            .create_issue(&CreateIssue {
                title: (*title).to_string(),
                description: (*description).to_string(),
                status: IssueStatus::Open,
            })
            .await?;

        // Closed samples go through a status update, like a user closing them.
        if *status != IssueStatus::Open {
            client
                .update_issue(
                    issue.id,
                    &UpdateIssue {
                        status: Some(*status),
                        ..UpdateIssue::default()
                    },
                )
                .await?;
        }
        println!("[done] #{} {title} ({status})", issue.id);
    }

    println!("\n=== Summary ===");
    for status in IssueStatus::ALL {
        let query = ListQuery {
            status_filter: status.as_str().to_string(),
            ..ListQuery::default()
        };
        let page = client.list_issues(&query).await?;
        println!("{}: {}", status.display_name(), page.total);
    }

    Ok(())
}
