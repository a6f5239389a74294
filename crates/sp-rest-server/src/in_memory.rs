// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory backend serving every collaborator of the core
//!
//! Holds repositories and their code files for the lifetime of the process.
//! It can be seeded from a TOML fixture and is what the server runs on when
//! no external services are wired in.

use anyhow::Result;
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use sp_core::{
    AnalysisControl, CodeFileDetails, CodeFileLookup, CodeFileVisibility, DeleteRepositoryRequest,
    EntityStorage, PatternPropagation, ProviderRefresh, RepositoryLookup, RepositoryRemoval,
};
use sp_domain_types::{Branch, CodeFile, Repository, RepositoryUrlKey};
use sp_rest_api_contract::{CodeFileDetail, CodeLinesResponse, RefreshProviderResponse};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Repository '{0}' does not exist")]
    UnknownRepository(String),

    #[error("User '{user}' does not own repository '{repository}'")]
    NotOwner { repository: String, user: String },
}

/// Fixture file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub repositories: Vec<SeedRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRepository {
    pub owner: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub external_id: String,
    /// User keys allowed to delete the repository
    #[serde(default)]
    pub user_keys: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub branches: Vec<SeedBranch>,
    #[serde(default)]
    pub files: Vec<SeedFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBranch {
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub analyzed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub branch: String,
    pub path: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl Seed {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

struct StoredRepository {
    owner: String,
    repository: Repository,
}

struct StoredFile {
    file: CodeFile,
    lines: Vec<String>,
}

type FileKey = (String, String, String);

fn file_key(repository_key: &str, branch: &str, path: &str) -> FileKey {
    (repository_key.to_string(), branch.to_string(), path.to_string())
}

#[derive(Default)]
struct Inner {
    repositories: BTreeMap<String, StoredRepository>,
    files: BTreeMap<FileKey, StoredFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    pub repositories: usize,
    pub code_files: usize,
    pub hidden_files: usize,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for entry in seed.repositories {
            let mut repository = Repository::new(entry.key, entry.name);
            repository.external_id = entry.external_id;
            repository.user_keys = entry.user_keys.into_iter().collect();
            repository.exclude_patterns = entry.exclude_patterns.into_iter().collect();
            for branch in entry.branches {
                let mut seeded = Branch::new(&repository.key, branch.name);
                seeded.is_default = branch.default;
                seeded.is_analyzed = branch.analyzed;
                repository = repository.with_branch(seeded);
            }

            let key = repository.key.clone();
            store.insert_repository(entry.owner, repository).await;
            for file in entry.files {
                let mut code_file = CodeFile::new(&key, file.branch, file.path);
                code_file.is_hidden = file.hidden;
                store.insert_file(code_file, file.lines).await;
            }

            if let Err(err) = store.reevaluate(&key).await {
                tracing::warn!(repository = %key, error = %err, "Seeded exclude patterns not applied");
            }
        }
        store
    }

    pub async fn insert_repository(&self, owner: impl Into<String>, repository: Repository) {
        let mut inner = self.inner.write().await;
        inner.repositories.insert(
            repository.key.clone(),
            StoredRepository {
                owner: owner.into(),
                repository,
            },
        );
    }

    pub async fn insert_file(&self, file: CodeFile, lines: Vec<String>) {
        let mut inner = self.inner.write().await;
        let key = file_key(&file.repository_key, &file.branch, &file.path);
        inner.files.insert(key, StoredFile { file, lines });
    }

    /// Counts reported by the readiness endpoint
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        StoreStats {
            repositories: inner.repositories.len(),
            code_files: inner.files.len(),
            hidden_files: inner.files.values().filter(|stored| stored.file.is_hidden).count(),
        }
    }

    pub async fn repository(&self, repository_key: &str) -> Option<Repository> {
        let inner = self.inner.read().await;
        inner
            .repositories
            .get(repository_key)
            .map(|stored| stored.repository.clone())
    }

    pub async fn code_file(&self, repository_key: &str, branch: &str, path: &str) -> Option<CodeFile> {
        let inner = self.inner.read().await;
        inner
            .files
            .get(&file_key(repository_key, branch, path))
            .map(|stored| stored.file.clone())
    }

    /// Recompute `is_ignored` of every file of a repository from its stored patterns
    async fn reevaluate(&self, repository_key: &str) -> Result<usize> {
        let patterns = match self.repository(repository_key).await {
            Some(repository) => repository.exclude_patterns.to_vec(),
            None => return Err(StoreError::UnknownRepository(repository_key.to_string()).into()),
        };
        self.apply_patterns(repository_key, &patterns).await
    }

    async fn apply_patterns(&self, repository_key: &str, patterns: &[String]) -> Result<usize> {
        let matcher = ExcludeMatcher::new(patterns)?;
        let mut inner = self.inner.write().await;

        let mut ignored = 0;
        for stored in inner
            .files
            .values_mut()
            .filter(|stored| stored.file.repository_key == repository_key)
        {
            stored.file.is_ignored = matcher.is_match(&stored.file.path);
            if stored.file.is_ignored {
                ignored += 1;
            }
        }
        Ok(ignored)
    }

    async fn set_analyzed(&self, repository_key: &str, branch: &str, analyzed: bool) -> Result<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .repositories
            .get_mut(repository_key)
            .ok_or_else(|| StoreError::UnknownRepository(repository_key.to_string()))?;
        if let Some(branch) = stored
            .repository
            .branches
            .iter_mut()
            .find(|candidate| candidate.name == branch)
        {
            branch.is_analyzed = analyzed;
        }
        Ok(())
    }
}

/// Exclude patterns compiled for path matching.
///
/// Patterns that are not valid globs still match the identical path.
struct ExcludeMatcher {
    globs: GlobSet,
    literals: HashSet<String>,
}

impl ExcludeMatcher {
    fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "Exclude pattern is not a valid glob");
                }
            }
        }

        Ok(Self {
            globs: builder.build()?,
            literals: patterns.iter().cloned().collect(),
        })
    }

    fn is_match(&self, path: &str) -> bool {
        self.literals.contains(path) || self.globs.is_match(path)
    }
}

#[async_trait]
impl EntityStorage for InMemoryStore {
    async fn set(&self, repository: &Repository) -> Result<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .repositories
            .get_mut(&repository.key)
            .ok_or_else(|| StoreError::UnknownRepository(repository.key.clone()))?;
        stored.repository = repository.clone();
        tracing::debug!(repository = %repository.key, "Repository stored");
        Ok(())
    }
}

#[async_trait]
impl RepositoryLookup for InMemoryStore {
    async fn get_by_url_key(&self, key: &RepositoryUrlKey) -> Result<Option<Repository>> {
        let inner = self.inner.read().await;
        Ok(inner
            .repositories
            .values()
            .find(|stored| stored.owner == key.owner && stored.repository.name == key.name)
            .map(|stored| stored.repository.clone()))
    }
}

#[async_trait]
impl CodeFileLookup for InMemoryStore {
    async fn get_code_file(&self, branch: &Branch, path: &str) -> Result<Option<CodeFile>> {
        Ok(self.code_file(&branch.repository_key, &branch.name, path).await)
    }
}

#[async_trait]
impl AnalysisControl for InMemoryStore {
    async fn start_analysis(&self, repository: &Repository, branch: &Branch) -> Result<()> {
        tracing::info!(repository = %repository.key, branch = %branch.name, "Analysis started");
        self.set_analyzed(&repository.key, &branch.name, true).await
    }

    async fn stop_analysis(&self, repository: &Repository, branch: &Branch) -> Result<()> {
        tracing::info!(repository = %repository.key, branch = %branch.name, "Analysis stopped");
        self.set_analyzed(&repository.key, &branch.name, false).await
    }
}

#[async_trait]
impl PatternPropagation for InMemoryStore {
    async fn ignore_patterns(&self, repository: &Repository, patterns: &[String]) -> Result<()> {
        let ignored = self.apply_patterns(&repository.key, patterns).await?;
        tracing::info!(repository = %repository.key, patterns = patterns.len(), ignored, "Exclude patterns applied");
        Ok(())
    }
}

#[async_trait]
impl CodeFileVisibility for InMemoryStore {
    async fn hide_code_file(&self, code_file: &CodeFile) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = file_key(&code_file.repository_key, &code_file.branch, &code_file.path);
        if let Some(stored) = inner.files.get_mut(&key) {
            stored.file.is_hidden = true;
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryRemoval for InMemoryStore {
    async fn delete(&self, request: &DeleteRepositoryRequest) -> Result<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .repositories
            .get(&request.repository_key)
            .ok_or_else(|| StoreError::UnknownRepository(request.repository_key.clone()))?;
        if !stored.repository.is_owned_by(&request.user_key) {
            return Err(StoreError::NotOwner {
                repository: request.repository_key.clone(),
                user: request.user_key.clone(),
            }
            .into());
        }

        inner.repositories.remove(&request.repository_key);
        inner
            .files
            .retain(|(repository_key, _, _), _| repository_key != &request.repository_key);
        Ok(())
    }
}

#[async_trait]
impl ProviderRefresh for InMemoryStore {
    /// Only repositories linked to a hosting provider can be refreshed
    async fn can_refresh(&self, repository: &Repository) -> Result<bool> {
        Ok(!repository.external_id.is_empty())
    }

    async fn refresh(&self, repository: &Repository, user_key: &str) -> Result<RefreshProviderResponse> {
        let stored = self
            .repository(&repository.key)
            .await
            .ok_or_else(|| StoreError::UnknownRepository(repository.key.clone()))?;
        tracing::info!(repository = %repository.key, user = user_key, "Provider metadata refreshed");
        Ok(RefreshProviderResponse {
            message: format!("Refreshed {} from its provider", stored.name),
            branches: stored.branches.len(),
        })
    }
}

#[async_trait]
impl CodeFileDetails for InMemoryStore {
    async fn get_file_detail(
        &self,
        repository: &Repository,
        branch: &Branch,
        path: &str,
    ) -> Result<Option<CodeFileDetail>> {
        let inner = self.inner.read().await;
        Ok(inner
            .files
            .get(&file_key(&repository.key, &branch.name, path))
            .map(|stored| CodeFileDetail {
                path: stored.file.path.clone(),
                is_hidden: stored.file.is_hidden,
                is_ignored: stored.file.is_ignored,
                line_count: u32::try_from(stored.lines.len()).unwrap_or(u32::MAX),
            }))
    }

    /// Lines are 1-based and inclusive; a range past the end is truncated
    async fn read_lines(
        &self,
        code_file: &CodeFile,
        start_line: u32,
        end_line: u32,
    ) -> Result<CodeLinesResponse> {
        let inner = self.inner.read().await;
        let key = file_key(&code_file.repository_key, &code_file.branch, &code_file.path);
        let lines = inner
            .files
            .get(&key)
            .map(|stored| stored.lines.as_slice())
            .unwrap_or_default();

        let start = start_line.max(1) as usize;
        let end = (end_line as usize).min(lines.len());
        let selected = if start <= end {
            lines[start - 1..end].to_vec()
        } else {
            Vec::new()
        };

        let last_line = if selected.is_empty() {
            end_line
        } else {
            u32::try_from(start - 1 + selected.len()).unwrap_or(end_line)
        };

        Ok(CodeLinesResponse {
            path: code_file.path.clone(),
            start_line,
            end_line: last_line,
            lines: selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[[repositories]]
owner = "acme"
key = "repo-1"
name = "sapphire"
external_id = "gh-42"
user_keys = ["user-1"]
exclude_patterns = ["vendor/**"]

[[repositories.branches]]
name = "main"
default = true
analyzed = true

[[repositories.branches]]
name = "develop"

[[repositories.files]]
branch = "main"
path = "src/lib.rs"
lines = ["pub mod a;", "pub mod b;", "pub mod c;"]

[[repositories.files]]
branch = "main"
path = "vendor/dep/lib.rs"

[[repositories.files]]
branch = "main"
path = "dist/app.min.js"
"#;

    async fn store() -> InMemoryStore {
        InMemoryStore::from_seed(toml::from_str(SEED).unwrap()).await
    }

    #[tokio::test]
    async fn test_seed_applies_patterns() {
        let store = store().await;

        let repository = store.repository("repo-1").await.unwrap();
        assert_eq!(repository.branches.len(), 2);
        assert!(repository.branch("main").unwrap().is_default);
        assert_eq!(repository.branch("develop").unwrap().repository_key, "repo-1");

        assert!(store.code_file("repo-1", "main", "vendor/dep/lib.rs").await.unwrap().is_ignored);
        assert!(!store.code_file("repo-1", "main", "src/lib.rs").await.unwrap().is_ignored);
    }

    #[tokio::test]
    async fn test_stats_follow_hidden_files_and_deletion() {
        let store = store().await;
        assert_eq!(
            store.stats().await,
            StoreStats {
                repositories: 1,
                code_files: 3,
                hidden_files: 0,
            }
        );

        let file = store.code_file("repo-1", "main", "src/lib.rs").await.unwrap();
        store.hide_code_file(&file).await.unwrap();
        assert_eq!(store.stats().await.hidden_files, 1);

        store
            .delete(&DeleteRepositoryRequest {
                repository_key: "repo-1".to_string(),
                user_key: "user-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(store.stats().await, StoreStats::default());
    }

    #[tokio::test]
    async fn test_propagation_recomputes_ignored_flags() {
        let store = store().await;
        let repository = store.repository("repo-1").await.unwrap();

        store
            .ignore_patterns(&repository, &["*.min.js".to_string(), "src/lib.rs".to_string()])
            .await
            .unwrap();

        assert!(store.code_file("repo-1", "main", "dist/app.min.js").await.unwrap().is_ignored);
        assert!(store.code_file("repo-1", "main", "src/lib.rs").await.unwrap().is_ignored);
        assert!(!store.code_file("repo-1", "main", "vendor/dep/lib.rs").await.unwrap().is_ignored);
    }

    #[tokio::test]
    async fn test_invalid_glob_matches_literally() {
        let matcher = ExcludeMatcher::new(&["src/[broken".to_string()]).unwrap();
        assert!(matcher.is_match("src/[broken"));
        assert!(!matcher.is_match("src/broken"));
    }

    #[tokio::test]
    async fn test_lookup_by_url_key_is_owner_scoped() {
        let store = store().await;

        let found = store
            .get_by_url_key(&RepositoryUrlKey::new("acme", "sapphire"))
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.key), Some("repo-1".to_string()));

        let other_owner = store
            .get_by_url_key(&RepositoryUrlKey::new("globex", "sapphire"))
            .await
            .unwrap();
        assert!(other_owner.is_none());
    }

    #[tokio::test]
    async fn test_analysis_flags_follow_commands() {
        let store = store().await;
        let repository = store.repository("repo-1").await.unwrap();
        let develop = repository.branch("develop").unwrap().clone();

        store.start_analysis(&repository, &develop).await.unwrap();
        assert!(store.repository("repo-1").await.unwrap().branch("develop").unwrap().is_analyzed);

        store.stop_analysis(&repository, &develop).await.unwrap();
        assert!(!store.repository("repo-1").await.unwrap().branch("develop").unwrap().is_analyzed);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let store = store().await;

        let denied = store
            .delete(&DeleteRepositoryRequest {
                repository_key: "repo-1".to_string(),
                user_key: "user-2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            denied.downcast_ref::<StoreError>(),
            Some(StoreError::NotOwner { .. })
        ));

        store
            .delete(&DeleteRepositoryRequest {
                repository_key: "repo-1".to_string(),
                user_key: "user-1".to_string(),
            })
            .await
            .unwrap();
        assert!(store.repository("repo-1").await.is_none());
        assert!(store.code_file("repo-1", "main", "src/lib.rs").await.is_none());
    }

    #[tokio::test]
    async fn test_read_lines_truncates_range() {
        let store = store().await;
        let file = store.code_file("repo-1", "main", "src/lib.rs").await.unwrap();

        let lines = store.read_lines(&file, 2, 10).await.unwrap();
        assert_eq!(lines.lines, vec!["pub mod b;", "pub mod c;"]);
        assert_eq!(lines.start_line, 2);
        assert_eq!(lines.end_line, 3);

        let past_end = store.read_lines(&file, 7, 9).await.unwrap();
        assert!(past_end.lines.is_empty());
    }

    #[tokio::test]
    async fn test_hide_and_detail() {
        let store = store().await;
        let repository = store.repository("repo-1").await.unwrap();
        let main = repository.branch("main").unwrap().clone();
        let file = store.code_file("repo-1", "main", "src/lib.rs").await.unwrap();

        store.hide_code_file(&file).await.unwrap();

        let detail = store
            .get_file_detail(&repository, &main, "src/lib.rs")
            .await
            .unwrap()
            .unwrap();
        assert!(detail.is_hidden);
        assert_eq!(detail.line_count, 3);
    }

    #[tokio::test]
    async fn test_refresh_needs_provider_link() {
        let store = store().await;
        let mut repository = store.repository("repo-1").await.unwrap();

        assert!(store.can_refresh(&repository).await.unwrap());
        let response = store.refresh(&repository, "user-1").await.unwrap();
        assert_eq!(response.branches, 2);

        repository.external_id.clear();
        assert!(!store.can_refresh(&repository).await.unwrap());
    }
}
