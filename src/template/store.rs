//! Read-only template tree with filename resolution

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::substitution::substitute;
use super::types::{
    CategoryMap, CategoryNode, TemplateDocument, TemplateEntry, TemplateError, TemplateFile,
    TemplateListing, TemplateResult, VariableBindings,
};
use crate::metrics::TemplateMetrics;

/// Template categories loaded once at startup, searched in configured order.
pub struct TemplateStore {
    categories: Vec<CategoryNode>,
}

impl TemplateStore {
    /// Build a store from already-assembled categories (first = highest priority)
    pub fn from_categories(categories: Vec<CategoryNode>) -> Self {
        Self { categories }
    }

    /// Load `<root>/<category>/**/*.json` for every category, in order.
    ///
    /// A missing category directory loads as an empty category.
    pub fn load(root: impl AsRef<Path>, categories: &[String]) -> TemplateResult<Self> {
        let root = root.as_ref();
        let mut nodes = Vec::with_capacity(categories.len());

        for name in categories {
            let dir = root.join(name);
            let node = if dir.is_dir() {
                load_category(&dir, name)?
            } else {
                tracing::warn!(category = %name, path = %dir.display(), "Template category directory missing");
                CategoryNode::new(name.clone())
            };
            nodes.push(node);
        }

        let store = Self::from_categories(nodes);
        tracing::info!(
            root = %root.display(),
            categories = store.categories.len(),
            templates = store.count(),
            "Templates loaded"
        );
        Ok(store)
    }

    /// Find the first template file named `filename`.
    ///
    /// Categories are searched in priority order, each depth-first in listing order.
    pub fn resolve(&self, filename: &str) -> TemplateResult<&TemplateFile> {
        if let Err(e) = validate_name(filename) {
            TemplateMetrics::record_invalid();
            return Err(e);
        }

        match self.categories.iter().find_map(|c| c.find(filename)) {
            Some(file) => {
                TemplateMetrics::record_found();
                Ok(file)
            }
            None => {
                TemplateMetrics::record_not_found();
                Err(TemplateError::NotFound(filename.to_string()))
            }
        }
    }

    /// Stored file contents, byte for byte
    pub fn raw(&self, filename: &str) -> TemplateResult<&str> {
        self.resolve(filename).map(|file| file.raw.as_str())
    }

    /// Typed view of a stored template
    pub fn document(&self, filename: &str) -> TemplateResult<TemplateDocument> {
        let file = self.resolve(filename)?;
        parse_document(filename, file.content.clone())
    }

    /// Resolve a template and substitute `bindings` into every string field
    pub fn render(
        &self,
        filename: &str,
        bindings: &VariableBindings,
    ) -> TemplateResult<TemplateDocument> {
        let file = self.resolve(filename)?;
        let rendered = substitute(&file.content, bindings);
        parse_document(filename, rendered)
    }

    /// Hierarchical listing of every category
    pub fn list(&self) -> TemplateListing {
        TemplateListing {
            templates: CategoryMap(
                self.categories
                    .iter()
                    .map(|c| (c.name.clone(), c.listing(false)))
                    .collect(),
            ),
        }
    }

    /// Total number of template files
    pub fn count(&self) -> usize {
        self.categories.iter().map(CategoryNode::file_count).sum()
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store(
    root: impl AsRef<Path>,
    categories: &[String],
) -> TemplateResult<Arc<TemplateStore>> {
    TemplateStore::load(root, categories).map(Arc::new)
}

/// A template name is a bare filename; anything that could walk the tree is refused.
fn validate_name(filename: &str) -> TemplateResult<()> {
    let suspicious = filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0');

    if suspicious {
        return Err(TemplateError::InvalidName(filename.to_string()));
    }
    Ok(())
}

fn parse_document(filename: &str, value: serde_json::Value) -> TemplateResult<TemplateDocument> {
    serde_json::from_value(value).map_err(|e| TemplateError::Malformed {
        name: filename.to_string(),
        reason: e.to_string(),
    })
}

fn load_category(dir: &Path, name: &str) -> TemplateResult<CategoryNode> {
    let mut items: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    items.sort_by_key(|item| item.file_name());

    let mut node = CategoryNode::new(name);
    for item in items {
        let file_type = item.file_type()?;
        let item_name = item.file_name().to_string_lossy().into_owned();
        let path = item.path();

        if file_type.is_dir() {
            node.entries
                .push(TemplateEntry::Category(load_category(&path, &item_name)?));
        } else if file_type.is_file() && item_name.ends_with(".json") {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(content) => node.entries.push(TemplateEntry::File(TemplateFile {
                    filename: item_name,
                    raw,
                    content,
                })),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unparsable template");
                }
            }
        }
    }

    Ok(node)
}
