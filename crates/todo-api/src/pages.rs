use handlebars::Handlebars;
use serde_json::json;

use crate::error::ApiError;

const HOME_TEMPLATE: &str = "home";

/// 起動時に一度だけテンプレートを登録し、AppState 経由で共有するレンダラ
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(HOME_TEMPLATE, include_str!("../templates/home.hbs"))?;
        Ok(Self { registry })
    }

    pub fn home(&self) -> Result<String, ApiError> {
        self.registry
            .render(
                HOME_TEMPLATE,
                &json!({ "title": "Todo", "api_base": "/todo" }),
            )
            .map_err(|e| ApiError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_renders_title_and_api_base() {
        let pages = Pages::new().unwrap();
        let html = pages.home().unwrap();

        assert!(html.contains("<title>Todo</title>"));
        assert!(html.contains(r#"const api = "/todo";"#));
    }
}
