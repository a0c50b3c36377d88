//! Vault writer: mirrors processed notes into an Obsidian vault.
//!
//! Each note becomes one markdown file with YAML frontmatter at
//! `{root}/{folder}/{category}/{YYYY-MM-DD}-{slug}.md`.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::SecondsFormat;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use ideaforge_core::{defaults, Error, ProcessedNote, Result, VaultSink};

static DISALLOWED_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Turn a title into a filename-safe slug.
///
/// `"Set up Home Lab!!"` becomes `"set-up-home-lab"`. Titles with nothing
/// usable in them become `"untitled"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace(' ', "-");
    let kept = DISALLOWED_SLUG_CHARS.replace_all(&lowered, "");
    let collapsed = HYPHEN_RUNS.replace_all(&kept, "-");

    // Only ASCII survives the filter, so byte truncation is char-safe.
    let mut slug = collapsed.trim_matches('-').to_string();
    if slug.len() > defaults::SLUG_MAX_LEN {
        slug.truncate(defaults::SLUG_MAX_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Filename for a note: creation date (UTC) plus the title slug.
pub fn note_filename(note: &ProcessedNote) -> String {
    format!(
        "{}-{}.md",
        note.created_at.format("%Y-%m-%d"),
        slugify(&note.title)
    )
}

/// Render the full file content: frontmatter, body, optional resources.
pub fn render_content(note: &ProcessedNote) -> String {
    let mut out = String::with_capacity(note.markdown.len() + 256);

    out.push_str("---\n");
    let _ = writeln!(
        out,
        "created: {}",
        note.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "category: {}", note.category);
    let _ = writeln!(out, "source: {}", defaults::VAULT_SOURCE_TAG);
    let _ = writeln!(out, "id: {}", note.id);
    out.push_str("---\n\n");

    out.push_str(&note.markdown);

    if !note.links.is_empty() {
        out.push_str("\n\n## Resources\n");
        for link in &note.links {
            if link.description.is_empty() {
                let _ = writeln!(out, "- [{}]({})", link.title, link.url);
            } else {
                let _ = writeln!(
                    out,
                    "- [{}]({}) - {}",
                    link.title, link.url, link.description
                );
            }
        }
    }

    out
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Vault location settings.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault root directory; must already exist.
    pub root: PathBuf,
    /// Folder inside the vault that holds idea-forge notes.
    pub folder: String,
}

impl VaultConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            folder: defaults::VAULT_FOLDER.to_string(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Read `OBSIDIAN_VAULT_PATH` and `OBSIDIAN_FOLDER`.
    ///
    /// Returns `None` when no vault path is configured.
    pub fn from_env() -> Option<Self> {
        let root = std::env::var("OBSIDIAN_VAULT_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let folder = std::env::var("OBSIDIAN_FOLDER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::VAULT_FOLDER.to_string());
        Some(Self::new(root).with_folder(folder))
    }
}

/// Writes notes into the vault atomically.
#[derive(Debug, Clone)]
pub struct VaultWriter {
    root: PathBuf,
    folder: String,
}

impl VaultWriter {
    /// Create a writer for an existing vault root.
    pub fn new(config: VaultConfig) -> Result<Self> {
        let root = std::fs::canonicalize(&config.root).map_err(|e| {
            Error::Config(format!(
                "Obsidian vault path {} is not accessible: {}",
                config.root.display(),
                e
            ))
        })?;
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "Obsidian vault path {} is not a directory",
                root.display()
            )));
        }

        info!(
            subsystem = "vault",
            component = "writer",
            op = "init",
            root = %root.display(),
            folder = %config.folder,
            "Vault writer initialized"
        );

        Ok(Self {
            root,
            folder: config.folder,
        })
    }

    /// Construct from environment; `Ok(None)` when no vault is configured.
    pub fn from_env() -> Result<Option<Self>> {
        VaultConfig::from_env().map(Self::new).transpose()
    }

    /// Canonical vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the note relative to the vault root.
    pub fn relative_path(&self, note: &ProcessedNote) -> PathBuf {
        Path::new(&self.folder)
            .join(note.category.as_str())
            .join(note_filename(note))
    }

    /// Absolute path of the note; fails if it would land outside the root.
    pub fn note_path(&self, note: &ProcessedNote) -> Result<PathBuf> {
        let relative = self.relative_path(note);
        let full = normalize_lexically(&self.root.join(&relative));
        if !full.starts_with(&self.root) || full == self.root {
            warn!(
                subsystem = "vault",
                component = "writer",
                note_id = %note.id,
                path = %relative.display(),
                "Rejected vault path outside root"
            );
            return Err(Error::PathTraversal(relative.display().to_string()));
        }
        Ok(full)
    }

    /// Resolve symlinks in the nearest existing ancestor of `dir` and require
    /// it to stay under the root.
    async fn check_resolved(&self, dir: &Path, note: &ProcessedNote) -> Result<()> {
        let mut existing = dir;
        let resolved = loop {
            match fs::canonicalize(existing).await {
                Ok(resolved) => break resolved,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    existing = existing.parent().ok_or(e)?;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if !resolved.starts_with(&self.root) {
            warn!(
                subsystem = "vault",
                component = "writer",
                note_id = %note.id,
                path = %dir.display(),
                resolved = %resolved.display(),
                "Rejected vault directory resolving outside root"
            );
            return Err(Error::PathTraversal(dir.display().to_string()));
        }
        Ok(())
    }
}

/// Hidden per-note temp name next to the final file.
fn temp_file_name(full_path: &Path, note: &ProcessedNote) -> String {
    let file_name = full_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{}.{}.tmp", file_name, note.id)
}

async fn write_and_sync(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o644))
            .await?;
    }
    file.sync_all().await
}

#[async_trait]
impl VaultSink for VaultWriter {
    async fn write_note(&self, note: &ProcessedNote) -> Result<PathBuf> {
        let full_path = self.note_path(note)?;
        let content = render_content(note);

        let parent = full_path
            .parent()
            .ok_or_else(|| Error::PathTraversal(full_path.display().to_string()))?;
        self.check_resolved(parent, note).await?;
        fs::create_dir_all(parent).await.map_err(|e| {
            warn!(parent = %parent.display(), error = %e, "vault: create_dir_all failed");
            e
        })?;
        // Re-check once the directories exist.
        self.check_resolved(parent, note).await?;

        // Atomic write: temp file + rename. The temp name carries the note id
        // because same-titled notes share a final path.
        let temp_path = parent.join(temp_file_name(&full_path, note));
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "vault: File::create failed");
            e
        })?;
        if let Err(e) = write_and_sync(&mut file, content.as_bytes()).await {
            drop(file);
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "vault: rename failed");
            e
        })?;

        debug!(
            subsystem = "vault",
            component = "writer",
            op = "write",
            note_id = %note.id,
            path = %full_path.display(),
            size = content.len(),
            "Note written to vault"
        );
        Ok(full_path)
    }

    async fn delete_note(&self, note: &ProcessedNote) -> Result<()> {
        let full_path = self.note_path(note)?;
        if let Some(parent) = full_path.parent() {
            self.check_resolved(parent, note).await?;
        }
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(
                    subsystem = "vault",
                    component = "writer",
                    op = "delete",
                    note_id = %note.id,
                    path = %full_path.display(),
                    "Note removed from vault"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
