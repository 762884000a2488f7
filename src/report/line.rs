//! One markdown line per new item: `**date**: [name](image url)`.
//!
//! Missing fields render as `N/A`; the image link is still built around the
//! placeholder hash.

use crate::store::diff::{self, NewAddition};

pub const PLACEHOLDER: &str = "N/A";
pub const HASH_TOKEN: &str = "{hash}";
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://services.staticwars.com/gw2/img/content/{hash}_splash.jpg";

#[derive(Debug, Clone)]
pub struct Renderer {
    image_url_template: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(DEFAULT_IMAGE_URL_TEMPLATE)
    }
}

impl Renderer {
    /// `template` has every `{hash}` replaced by the item's image hash
    pub fn new(template: impl Into<String>) -> Self {
        Renderer {
            image_url_template: template.into(),
        }
    }

    pub fn image_url(&self, hash: &str) -> String {
        self.image_url_template.replace(HASH_TOKEN, hash)
    }

    pub fn render(&self, addition: &NewAddition<'_>) -> String {
        let record = &addition.record;
        let name = record.name().unwrap_or(PLACEHOLDER);
        let image_url = self.image_url(record.image_hash().unwrap_or(PLACEHOLDER));
        let date = diff::first_available(record)
            .map(|(raw, _)| raw)
            .unwrap_or(PLACEHOLDER);

        format!("**{date}**: [{name}]({image_url})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemRecord;
    use serde_json::json;

    fn render(raw: &serde_json::Value) -> String {
        let addition = NewAddition {
            id: "1",
            record: ItemRecord::new(raw),
        };
        Renderer::default().render(&addition)
    }

    #[test]
    fn full_record() {
        let raw = json!({
            "name": "Cloak",
            "imageHash": "abc",
            "categoryLifespans": {"catA": [{"start": "2024-05-01T00:00:00"}]}
        });
        assert_eq!(
            render(&raw),
            "**2024-05-01**: [Cloak](https://services.staticwars.com/gw2/img/content/abc_splash.jpg)"
        );
    }

    #[test]
    fn missing_fields_use_placeholder() {
        assert_eq!(
            render(&json!({})),
            "**N/A**: [N/A](https://services.staticwars.com/gw2/img/content/N/A_splash.jpg)"
        );
    }

    #[test]
    fn malformed_start_displays_placeholder() {
        let raw = json!({"name": "Hat", "categoryLifespans": {"c": [{"start": "not-a-date"}]}});
        assert!(render(&raw).starts_with("**N/A**: [Hat]("));
    }

    #[test]
    fn custom_template() {
        let renderer = Renderer::new("https://cdn.example/{hash}.png");
        assert_eq!(renderer.image_url("ff00"), "https://cdn.example/ff00.png");
    }
}
