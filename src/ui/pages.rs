//! HTML pages rendered from embedded templates

use axum::response::Html;
use minijinja::{Environment, Value};
use rust_embed::RustEmbed;

use crate::error::Result;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// Template environment backed by the templates compiled into the binary
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(|name| {
            Ok(Templates::get(name)
                .map(|file| String::from_utf8_lossy(&file.data).into_owned()))
        });
        Self { env }
    }

    /// Render `name` with `ctx`
    pub fn render(&self, name: &str, ctx: Value) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

impl Default for Pages {
    fn default() -> Self {
        Self::new()
    }
}
