use handlebars::Handlebars;
use serde_json::json;

use crate::error::AppError;
use crate::table::Table;

const INDEX_TEMPLATE: &str = include_str!("./templates/index.html");
const DISPLAY_TEMPLATE: &str = include_str!("./templates/display.html");

/// Shown on the display page before anything has been uploaded
pub const NO_DATA_MESSAGE: &str = "No CSV file has been uploaded yet. Please upload a file first.";

/// Compiled page templates
///
/// Both pages are baked into the binary and registered once at startup.
/// Values are HTML-escaped by handlebars, so cell contents and status
/// messages can never inject markup.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Register the index and display templates
    ///
    /// # Returns
    /// * `Result<Templates, AppError>` - Ready-to-use templates or the template that failed to compile
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.register_template_string("index", INDEX_TEMPLATE)?;
        registry.register_template_string("display", DISPLAY_TEMPLATE)?;
        Ok(Templates { registry })
    }

    /// Render the upload form, with an optional status message above it
    pub fn render_index(&self, message: Option<&str>) -> Result<String, AppError> {
        Ok(self
            .registry
            .render("index", &json!({ "message": message }))?)
    }

    /// Render the stored table, or the no-data notice when there is none
    pub fn render_display(&self, table: Option<&Table>) -> Result<String, AppError> {
        let context = match table {
            Some(table) => json!({ "table": table, "message": null }),
            None => json!({ "table": null, "message": NO_DATA_MESSAGE }),
        };
        Ok(self.registry.render("display", &context)?)
    }
}
