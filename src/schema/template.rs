//! Template generation for new products

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::entities::product::Product;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const PRODUCT_TEMPLATE: &str = "product.yaml.tera";

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Quote a string as a YAML double-quoted scalar
fn quoted(s: &str) -> String {
    // A JSON string literal is a valid YAML double-quoted scalar
    serde_json::Value::String(s.to_string()).to_string()
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the YAML file of a newly created product
    pub fn generate_product(&self, product: &Product) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == PRODUCT_TEMPLATE) {
            return Err(TemplateError::NotFound(PRODUCT_TEMPLATE.to_string()));
        }

        let opt = |v: &Option<String>| v.as_deref().map(quoted);

        let mut context = tera::Context::new();
        context.insert("id", &product.id.to_string());
        context.insert("title", &product.name.replace(['\n', '\r'], " "));
        context.insert("name", &quoted(&product.name));
        context.insert("sku", &quoted(&product.sku));
        context.insert("description", &opt(&product.description));
        context.insert("category", product.category.dir_name());
        context.insert("current_stock", &product.current_stock);
        context.insert("min_stock_level", &product.min_stock_level);
        context.insert("unit_price", &product.unit_price);
        context.insert("weight_kg", &product.weight_kg);
        context.insert(
            "expiration_date",
            &product.expiration_date.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        context.insert("batch_number", &opt(&product.batch_number));
        context.insert("storage_location", &opt(&product.storage_location));
        context.insert("supplier", &opt(&product.supplier));
        context.insert("image", &opt(&product.image));
        context.insert("created", &product.created.to_rfc3339());
        context.insert("author", &quoted(&product.author));

        self.tera
            .render(PRODUCT_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}
