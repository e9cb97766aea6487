//! Repository snapshot fetching via the GitHub REST API.
//!
//! The agent cannot clone repositories itself, so we hand it a bounded
//! snapshot: the repository tree is listed once, then up to
//! [`MAX_FILES`] file snippets are fetched raw and truncated to
//! [`SNIPPET_CHARS`] characters each. Files above [`MAX_FILE_BYTES`] are
//! skipped as likely binaries.

use serde::Deserialize;

/// Maximum number of files included in a snapshot.
pub const MAX_FILES: usize = 50;

/// Files larger than this are skipped.
pub const MAX_FILE_BYTES: u64 = 200_000;

/// Maximum characters kept per file.
pub const SNIPPET_CHARS: usize = 2000;

const GITHUB_API: &str = "https://api.github.com";

/// One file excerpt from a repository snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileSnippet {
    pub path: String,
    pub snippet: String,
}

/// Errors from the snapshot layer.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The repository URL does not look like `https://host/owner/repo`.
    #[error("Invalid GitHub repository URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request itself failed.
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GitHub returned a non-2xx status code.
    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
struct TreeNode {
    path: String,
    #[serde(rename = "type")]
    node_type: String,
    size: Option<u64>,
}

/// Extract `(owner, repo)` from a GitHub repository URL. A trailing `.git`
/// suffix and extra path segments are tolerated.
pub fn parse_repo_url(url: &str) -> Result<(String, String), SnapshotError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| SnapshotError::InvalidUrl(url.to_string()))?;
    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| SnapshotError::InvalidUrl(url.to_string()))?
        .filter(|s| !s.is_empty());
    let owner = segments
        .next()
        .ok_or_else(|| SnapshotError::InvalidUrl(url.to_string()))?;
    let repo = segments
        .next()
        .ok_or_else(|| SnapshotError::InvalidUrl(url.to_string()))?;
    Ok((
        owner.to_string(),
        repo.trim_end_matches(".git").to_string(),
    ))
}

/// Fetches bounded file snapshots of GitHub repositories.
pub struct SnapshotFetcher {
    client: reqwest::Client,
    token: Option<String>,
}

impl SnapshotFetcher {
    /// Create a fetcher, optionally authenticated with a GitHub token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Fetch up to [`MAX_FILES`] file snippets for the repository at `url`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FileSnippet>, SnapshotError> {
        let (owner, repo) = parse_repo_url(url)?;

        let tree_url = format!("{GITHUB_API}/repos/{owner}/{repo}/git/trees/HEAD?recursive=1");
        let tree: TreeResponse = self
            .parse(self.request(&tree_url, "application/vnd.github+json").await?)
            .await?
            .json()
            .await?;

        let mut snippets = Vec::new();
        for node in tree.tree {
            if snippets.len() >= MAX_FILES {
                break;
            }
            if node.node_type != "blob" || node.size.unwrap_or(0) > MAX_FILE_BYTES {
                continue;
            }
            let content_url =
                format!("{GITHUB_API}/repos/{owner}/{repo}/contents/{}", node.path);
            let response = self
                .parse(self.request(&content_url, "application/vnd.github.raw").await?)
                .await?;
            let content = response.text().await?;
            snippets.push(FileSnippet {
                snippet: truncate_chars(&content, SNIPPET_CHARS).to_string(),
                path: node.path,
            });
        }

        tracing::debug!(owner, repo, files = snippets.len(), "Fetched repository snapshot");
        Ok(snippets)
    }

    async fn request(&self, url: &str, accept: &str) -> Result<reqwest::Response, SnapshotError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", "codejudge");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        Ok(request.send().await?)
    }

    async fn parse(&self, response: reqwest::Response) -> Result<reqwest::Response, SnapshotError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SnapshotError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn truncate_chars(content: &str, limit: usize) -> &str {
    match content.char_indices().nth(limit) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_url_extracts_owner_and_repo() {
        let (owner, repo) = parse_repo_url("https://github.com/acme/widgets").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn parse_repo_url_strips_git_suffix_and_extra_segments() {
        let (_, repo) = parse_repo_url("https://github.com/acme/widgets.git").unwrap();
        assert_eq!(repo, "widgets");
        let (owner, repo) =
            parse_repo_url("https://github.com/acme/widgets/tree/main/src").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn parse_repo_url_rejects_short_paths() {
        assert!(parse_repo_url("https://github.com/acme").is_err());
        assert!(parse_repo_url("not a url").is_err());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
