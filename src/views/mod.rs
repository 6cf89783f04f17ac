//! View engine
//!
//! Server-side HTML rendering with Tera. Templates are embedded in the
//! binary with rust-embed so deployment stays a single file.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use tera::Tera;

pub use tera::Context as ViewContext;

/// Embedded page templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct TemplateAssets;

/// Tera-backed view engine over the embedded templates
pub struct ViewEngine {
    tera: Tera,
}

impl ViewEngine {
    /// Load all embedded templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        let mut templates = Vec::new();
        for name in TemplateAssets::iter() {
            let file = TemplateAssets::get(&name)
                .ok_or_else(|| anyhow::anyhow!("Missing embedded template: {}", name))?;
            let source = std::str::from_utf8(file.data.as_ref())
                .with_context(|| format!("Template {} is not valid UTF-8", name))?
                .to_string();
            templates.push((name.to_string(), source));
        }

        tera.add_raw_templates(templates)
            .context("Failed to compile templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given context.
    pub fn render(&self, name: &str, context: &ViewContext) -> Result<String> {
        self.tera
            .render(name, context)
            .with_context(|| format!("Failed to render template: {}", name))
    }
}
