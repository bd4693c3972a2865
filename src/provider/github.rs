use crate::domain::{Commit, Tag, Version};
use crate::error::{Result, TaggerError};
use crate::provider::Provider;
use reqwest::blocking::Client;
use reqwest::Method;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Provider backed by the GitHub REST API.
///
/// Reads tags and commit comparisons, and on push creates a tag object, its
/// ref, a release, and uploads the configured assets to the release.
pub struct GithubProvider {
    client: Client,
    host: String,
    owner: String,
    repo: String,
    token: String,
    assets: Vec<String>,
}

/// Request/response log for one provider call, flushed to stderr only when
/// the call fails.
#[derive(Default)]
struct Trace(Vec<String>);

impl Trace {
    fn record(&mut self, line: String) {
        self.0.push(line);
    }

    fn flush(&self) {
        if self.0.is_empty() {
            return;
        }
        eprintln!("DEBUG info:");
        for line in &self.0 {
            eprintln!("{}", line);
        }
    }
}

struct ApiRequest<'a> {
    method: Method,
    name: &'a str,
    url: String,
    body: Option<serde_json::Value>,
}

impl<'a> ApiRequest<'a> {
    fn get(name: &'a str, url: String) -> Self {
        ApiRequest {
            method: Method::GET,
            name,
            url,
            body: None,
        }
    }

    fn post(name: &'a str, url: String, body: serde_json::Value) -> Self {
        ApiRequest {
            method: Method::POST,
            name,
            url,
            body: Some(body),
        }
    }
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitData,
}

#[derive(Deserialize)]
struct CommitData {
    message: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    commits: Vec<CommitEntry>,
}

#[derive(Deserialize)]
struct TagObjectResponse {
    sha: String,
}

#[derive(Deserialize)]
struct ReleaseResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

impl GithubProvider {
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        assets: Vec<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GithubProvider {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            assets,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.host, self.owner, self.repo, path)
    }

    /// Run a provider call with an explicit trace, dumping it on failure
    fn traced<T>(&self, f: impl FnOnce(&mut Trace) -> Result<T>) -> Result<T> {
        let mut trace = Trace::default();
        let result = f(&mut trace);
        if result.is_err() {
            trace.flush();
        }
        result
    }

    /// Send a request and decode the 2xx response body. Non-2xx responses
    /// become provider errors carrying the API's error message.
    fn send<T: serde::de::DeserializeOwned>(
        &self,
        trace: &mut Trace,
        request: ApiRequest<'_>,
    ) -> Result<T> {
        let raw = self.send_raw(trace, request)?;
        Ok(serde_json::from_str(&raw)
            .map_err(|e| TaggerError::provider("decode", e.to_string()))?)
    }

    fn send_raw(&self, trace: &mut Trace, request: ApiRequest<'_>) -> Result<String> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token);

        let body_text = match &request.body {
            Some(body) => {
                let text = body.to_string();
                builder = builder
                    .header("Content-Type", "application/json")
                    .body(text.clone());
                text
            }
            None => String::new(),
        };

        trace.record(format!(
            "{} request: {} {}, {}",
            request.name, request.method, request.url, body_text
        ));

        let response = builder.send()?;
        let status = response.status();
        let raw = response.text()?;

        trace.record(format!("{} response: {}, {}", request.name, status, raw));

        if !status.is_success() {
            let parsed: ErrorResponse =
                serde_json::from_str(&raw).unwrap_or_else(|_| ErrorResponse {
                    message: raw.clone(),
                });
            return Err(TaggerError::provider(request.name, parsed.message));
        }

        Ok(raw)
    }

    /// Expand the configured glob patterns into concrete asset files
    fn asset_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for pattern in &self.assets {
            let paths = glob::glob(pattern)
                .map_err(|e| TaggerError::config(format!("bad asset pattern '{}': {}", pattern, e)))?;

            for path in paths {
                let path = path
                    .map_err(|e| TaggerError::provider("upload", e.to_string()))?;
                if path.is_dir() {
                    return Err(TaggerError::provider(
                        "upload",
                        format!("asset '{}' is a directory", path.display()),
                    ));
                }
                files.push(path);
            }
        }

        Ok(files)
    }

    fn create_tag_ref(&self, trace: &mut Trace, sha: &str, name: &str) -> Result<()> {
        let tag_object: TagObjectResponse = self.send(
            trace,
            ApiRequest::post(
                "tags",
                self.url("git/tags"),
                serde_json::json!({
                    "tag": name,
                    "message": name,
                    "object": sha,
                    "type": "commit",
                }),
            ),
        )?;

        self.send_raw(
            trace,
            ApiRequest::post(
                "refs",
                self.url("git/refs"),
                serde_json::json!({
                    "ref": format!("refs/tags/{}", name),
                    "sha": tag_object.sha,
                }),
            ),
        )?;

        Ok(())
    }

    fn create_release(&self, trace: &mut Trace, name: &str) -> Result<String> {
        let release: ReleaseResponse = self.send(
            trace,
            ApiRequest::post(
                "releases",
                self.url("releases"),
                serde_json::json!({
                    "tag_name": name,
                    "name": name,
                    "generate_release_notes": true,
                }),
            ),
        )?;

        Ok(release.upload_url)
    }

    fn upload_asset(&self, trace: &mut Trace, upload_url: &str, path: &std::path::Path) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TaggerError::provider("upload", format!("bad asset name '{}'", path.display()))
            })?;

        let url = format!(
            "{}?name={}",
            upload_url.replace("{?name,label}", ""),
            file_name
        );
        let data = std::fs::read(path)?;

        trace.record(format!("upload request: POST {}, <binary>", url));

        let response = self
            .client
            .post(url.as_str())
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("Content-Type", "application/octet-stream")
            .bearer_auth(&self.token)
            .body(data)
            .send()?;

        let status = response.status();
        let raw = response.text()?;
        trace.record(format!("upload response: {}, {}", status, raw));

        if !status.is_success() {
            let parsed: ErrorResponse =
                serde_json::from_str(&raw).unwrap_or_else(|_| ErrorResponse {
                    message: raw.clone(),
                });
            return Err(TaggerError::provider("upload", parsed.message));
        }

        Ok(())
    }
}

impl Provider for GithubProvider {
    fn latest_tag(&self) -> Result<Tag> {
        self.traced(|trace| {
            let tags: Vec<TagEntry> =
                self.send(trace, ApiRequest::get("tags", self.url("tags")))?;

            for entry in tags {
                let tag = Tag::new(entry.name);
                if tag.is_valid() {
                    return Ok(tag);
                }
            }

            Ok(Tag::empty())
        })
    }

    fn commits_since(&self, tag: &Tag) -> Result<Vec<Commit>> {
        self.traced(|trace| {
            let entries = if tag.is_empty() {
                // No tags yet: the whole default-branch history. The list
                // endpoint paginates and returns newest first, so follow the
                // pages until one comes back empty, then reverse.
                let mut entries: Vec<CommitEntry> = Vec::new();
                let mut page = 1;
                loop {
                    let batch: Vec<CommitEntry> = self.send(
                        trace,
                        ApiRequest::get(
                            "commits",
                            self.url(&format!("commits?per_page=100&page={}", page)),
                        ),
                    )?;
                    if batch.is_empty() {
                        break;
                    }
                    entries.extend(batch);
                    page += 1;
                }
                entries.reverse();
                entries
            } else {
                // The comparison endpoint returns commits oldest first, so
                // the last element is the tip
                let compare: CompareResponse = self.send(
                    trace,
                    ApiRequest::get(
                        "compare",
                        self.url(&format!("compare/{}...HEAD", tag)),
                    ),
                )?;
                compare.commits
            };

            Ok(entries
                .into_iter()
                .map(|entry| Commit::new(entry.sha, entry.commit.message))
                .collect())
        })
    }

    fn push(&self, reference: &Commit, version: &Version) -> Result<()> {
        self.traced(|trace| {
            // Resolve assets before touching the remote, so a bad pattern
            // fails without leaving a half-created release behind
            let files = self.asset_files()?;

            let name = version.to_string();
            self.create_tag_ref(trace, reference.sha(), &name)?;
            let upload_url = self.create_release(trace, &name)?;

            for path in &files {
                self.upload_asset(trace, &upload_url, path)?;
            }

            Ok(())
        })
    }
}
