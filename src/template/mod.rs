//! Email template system.
//!
//! This module provides:
//! - A read-only tree of JSON templates grouped into categories
//! - Filename resolution across categories in a fixed priority order
//! - Variable substitution engine for rendering templates
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::load("templates", &["Follow-up".into(), "Networking".into()])?;
//!
//! let mut variables = VariableBindings::new();
//! variables.insert("first_name", "John");
//! variables.insert("event_name", "Tech Summit");
//!
//! let rendered = store.render("event_followup.json", &variables)?;
//! println!("{}\n\n{}", rendered.subject, rendered.message);
//! ```

mod store;
mod substitution;
mod types;

pub use store::{create_template_store, TemplateStore};
pub use substitution::{placeholders, substitute, substitute_str};
pub use types::{
    CategoryListing, CategoryMap, CategoryNode, TemplateDocument, TemplateEntry, TemplateError,
    TemplateFile, TemplateListing, TemplateResult, VariableBindings,
};
