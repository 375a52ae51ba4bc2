//! Core [`RuleLoader`] struct.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::AlertRule;

use super::error::{LoadResult, LoadStatus, Result};

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files and keeps
/// the parsed [`AlertRule`]s ordered by rule ID. A later file with the same
/// ID replaces the earlier one.
pub struct RuleLoader {
    rules_dir: PathBuf,
    rules: BTreeMap<String, AlertRule>,
}

impl RuleLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            rules: BTreeMap::new(),
        }
    }

    /// Create a loader for `dir` and scan it immediately.
    pub fn load_dir(dir: &Path) -> Result<(Self, Vec<LoadResult>)> {
        let mut loader = Self::new(dir.to_path_buf());
        let results = loader.load_all()?;
        Ok((loader, results))
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are skipped.
    /// Parse errors are reported per-file but do not abort the scan. Only a
    /// missing or unreadable root directory is an error.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        fs::read_dir(&self.rules_dir)?;
        let mut results = Vec::new();
        let root = self.rules_dir.clone();
        self.scan_dir_recursive(&root, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        // read_dir order is platform dependent; sort so duplicate IDs resolve
        // the same way everywhere.
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            if !is_yaml(&path) {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            match Self::load_file(&path) {
                Ok(rule) => {
                    let rule_id = rule.id().to_string();
                    info!(rule_id = %rule_id, kind = %rule.kind, path = %path.display(), "loaded rule");
                    self.insert(rule);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { rule_id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Parse a single YAML file into an [`AlertRule`].
    pub fn load_file(path: &Path) -> Result<AlertRule> {
        let contents = fs::read_to_string(path)?;
        AlertRule::from_yaml(&contents)
    }

    /// Add a rule, replacing any rule with the same ID.
    pub fn insert(&mut self, rule: AlertRule) {
        let id = rule.id().to_string();
        if self.rules.insert(id.clone(), rule).is_some() {
            warn!(rule_id = %id, "duplicate rule id, keeping the later file");
        }
    }

    /// All loaded rules, ordered by ID.
    pub fn rules(&self) -> impl Iterator<Item = &AlertRule> {
        self.rules.values()
    }

    pub fn get(&self, id: &str) -> Option<&AlertRule> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}
