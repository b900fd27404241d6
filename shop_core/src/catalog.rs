use crate::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use unit_core::UnitTemplate;

const BUILTIN_UNITS: &str = include_str!("../data/units.toml");

/// Catalog of every unit template the shop can offer, loaded from TOML files.
///
/// Templates keep their load order so that seeded shop sampling is
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    templates: Vec<UnitTemplate>,
    by_name: HashMap<String, usize>,
}

impl UnitCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference roster shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        catalog.load_str(BUILTIN_UNITS, Path::new("<builtin>"))?;
        Ok(catalog)
    }

    /// Load all unit files from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        catalog.load_dir(dir)?;
        Ok(catalog)
    }

    /// Build a catalog from already constructed templates
    pub fn from_templates(
        templates: impl IntoIterator<Item = UnitTemplate>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for template in templates {
            catalog.insert(template, Path::new("<memory>"))?;
        }
        Ok(catalog)
    }

    /// Load unit files from a directory recursively, in path order
    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single unit file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        self.load_str(&content, path)
    }

    fn load_str(&mut self, content: &str, origin: &Path) -> Result<(), ConfigError> {
        let templates = unit_core::parse_units(content).map_err(|e| ConfigError::Units {
            error: e,
            path: origin.to_path_buf(),
        })?;

        let count = templates.len();
        for template in templates {
            self.insert(template, origin)?;
        }
        tracing::debug!(path = %origin.display(), count, "loaded unit definitions");
        Ok(())
    }

    fn insert(&mut self, template: UnitTemplate, origin: &Path) -> Result<(), ConfigError> {
        if self.by_name.contains_key(&template.name) {
            return Err(ConfigError::Validation {
                message: format!("duplicate unit name '{}'", template.name),
                path: origin.to_path_buf(),
            });
        }
        self.by_name
            .insert(template.name.clone(), self.templates.len());
        self.templates.push(template);
        Ok(())
    }

    /// Get a template by unit name
    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.by_name.get(name).map(|&i| &self.templates[i])
    }

    /// Check if a unit exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All templates in load order
    pub fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    /// List all unit names in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
