use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::OnceLock;

use super::{RawRecipe, RecipeSource, ScraperError};
use crate::recipe_parser::parse_iso_duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; menu_planner/0.1; +https://schema.org/Recipe)";

fn json_ld_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
            .expect("json-ld regex is valid")
    })
}

/// Reads recipes from the schema.org `Recipe` JSON-LD most recipe sites embed.
#[derive(Debug, Clone, Default)]
pub struct SchemaOrgScraper {
    client: Client,
}

impl SchemaOrgScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecipeSource for SchemaOrgScraper {
    async fn fetch(&self, url: &str) -> Result<RawRecipe, ScraperError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ScraperError::Malformed(format!("not an http(s) URL: {}", url)));
        }

        tracing::debug!(%url, "fetching recipe page");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(%url, %status, "recipe page request failed");
            return Err(ScraperError::Http {
                status,
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        let raw = extract_recipe_from_html(&html, url)?;
        tracing::debug!(
            %url,
            title = %raw.title,
            ingredients = raw.ingredients.len(),
            "extracted recipe"
        );
        Ok(raw)
    }
}

/// Finds the first schema.org `Recipe` in the page's JSON-LD blocks.
pub fn extract_recipe_from_html(html: &str, url: &str) -> Result<RawRecipe, ScraperError> {
    let node = json_ld_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|block| serde_json::from_str::<Value>(block.as_str().trim()).ok())
        .find_map(|doc| find_recipe_node(&doc).cloned())
        .ok_or_else(|| ScraperError::NotFound(url.to_string()))?;

    let ingredients: Vec<String> = node
        .get("recipeIngredient")
        .or_else(|| node.get("ingredients"))
        .map(string_list)
        .unwrap_or_default()
        .into_iter()
        .map(|s| decode_entities(&s))
        .collect();

    let instructions: Vec<String> = node
        .get("recipeInstructions")
        .map(instruction_texts)
        .unwrap_or_default();

    if ingredients.is_empty() && instructions.is_empty() {
        return Err(ScraperError::Malformed(format!(
            "recipe at {} has neither ingredients nor instructions",
            url
        )));
    }

    let total_time_minutes = node
        .get("totalTime")
        .and_then(Value::as_str)
        .and_then(parse_iso_duration)
        .or_else(|| {
            let prep = node.get("prepTime").and_then(Value::as_str).and_then(parse_iso_duration);
            let cook = node.get("cookTime").and_then(Value::as_str).and_then(parse_iso_duration);
            match (prep, cook) {
                (None, None) => None,
                (p, c) => Some(p.unwrap_or(0).saturating_add(c.unwrap_or(0))),
            }
        });

    Ok(RawRecipe {
        title: node
            .get("name")
            .and_then(Value::as_str)
            .map(|s| decode_entities(s.trim()))
            .unwrap_or_default(),
        yields: node.get("recipeYield").and_then(first_scalar),
        total_time_minutes,
        ingredients,
        instructions: instructions
            .iter()
            .map(|s| decode_entities(s))
            .collect::<Vec<_>>()
            .join("\n"),
        image_url: node.get("image").and_then(image_url),
        url: url.to_string(),
    })
}

fn is_recipe(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn find_recipe_node(doc: &Value) -> Option<&Value> {
    match doc {
        Value::Object(map) => {
            if is_recipe(doc) {
                return Some(doc);
            }
            map.get("@graph").and_then(find_recipe_node)
        }
        Value::Array(items) => items.iter().find_map(find_recipe_node),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

// recipeInstructions may be text, a list of text, HowToStep objects or HowToSections
// wrapping more steps.
fn instruction_texts(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(instruction_texts).collect(),
        Value::Object(map) => {
            if let Some(inner) = map.get("itemListElement") {
                return instruction_texts(inner);
            }
            map.get("text")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .map(|s| vec![s.to_string()])
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

fn first_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(first_scalar),
        _ => None,
    }
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.iter().find_map(image_url),
        _ => None,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.bbcgoodfood.com/recipes/chicken-stir-fry";

    fn page(json_ld: &str) -> String {
        format!(
            "<html><head><title>x</title>\
             <script type=\"application/ld+json\">{}</script>\
             </head><body><h1>Recipe</h1></body></html>",
            json_ld
        )
    }

    #[test]
    fn test_plain_recipe_object() {
        let html = page(
            r#"{"@context": "https://schema.org", "@type": "Recipe",
                "name": "Chicken stir-fry",
                "recipeIngredient": ["2 chicken breasts", "1 tbsp soy sauce"],
                "recipeInstructions": "Slice the chicken.\nStir-fry everything.",
                "totalTime": "PT20M",
                "recipeYield": "Serves 2",
                "image": "https://example.com/stir-fry.jpg"}"#,
        );
        let raw = extract_recipe_from_html(&html, URL).unwrap();
        assert_eq!(raw.title, "Chicken stir-fry");
        assert_eq!(raw.ingredients.len(), 2);
        assert_eq!(raw.instructions, "Slice the chicken.\nStir-fry everything.");
        assert_eq!(raw.total_time_minutes, Some(20));
        assert_eq!(raw.yields.as_deref(), Some("Serves 2"));
        assert_eq!(raw.image_url.as_deref(), Some("https://example.com/stir-fry.jpg"));
        assert_eq!(raw.url, URL);
    }

    #[test]
    fn test_graph_with_how_to_steps_and_sections() {
        let html = page(
            r#"{"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": ["Recipe", "NewsArticle"],
                 "name": "Mac &amp; cheese",
                 "recipeIngredient": ["300g macaroni", "200g cheddar"],
                 "recipeInstructions": [
                    {"@type": "HowToSection", "name": "Pasta", "itemListElement": [
                        {"@type": "HowToStep", "text": "Boil the macaroni."}
                    ]},
                    {"@type": "HowToStep", "text": "Stir in the cheese."}
                 ],
                 "prepTime": "PT10M", "cookTime": "PT25M",
                 "recipeYield": [4, "4 servings"],
                 "image": {"@type": "ImageObject", "url": "https://example.com/mac.jpg"}}
            ]}"#,
        );
        let raw = extract_recipe_from_html(&html, URL).unwrap();
        assert_eq!(raw.title, "Mac & cheese");
        assert_eq!(raw.instructions, "Boil the macaroni.\nStir in the cheese.");
        assert_eq!(raw.total_time_minutes, Some(35));
        assert_eq!(raw.yields.as_deref(), Some("4"));
        assert_eq!(raw.image_url.as_deref(), Some("https://example.com/mac.jpg"));
    }

    #[test]
    fn test_absurd_durations_saturate() {
        let html = page(
            r#"{"@type": "Recipe", "name": "Forever stew",
                "recipeIngredient": ["1 kg beef"],
                "recipeInstructions": "Simmer.",
                "prepTime": "PT99999999H", "cookTime": "P3000000D"}"#,
        );
        let raw = extract_recipe_from_html(&html, URL).unwrap();
        assert_eq!(raw.total_time_minutes, Some(u32::MAX));

        let html = page(
            r#"{"@type": "Recipe", "name": "Forever stew",
                "recipeIngredient": ["1 kg beef"],
                "recipeInstructions": "Simmer.",
                "totalTime": "PT99999999H"}"#,
        );
        let raw = extract_recipe_from_html(&html, URL).unwrap();
        assert_eq!(raw.total_time_minutes, Some(u32::MAX));
    }

    #[test]
    fn test_skips_broken_blocks_and_other_types() {
        let html = format!(
            "{}{}",
            "<script type='application/ld+json'>{ not json</script>\
             <script type=\"application/ld+json\">{\"@type\": \"Organization\"}</script>",
            page(r#"[{"@type": "Recipe", "name": "Soup", "recipeIngredient": ["1 l stock"]}]"#)
        );
        let raw = extract_recipe_from_html(&html, URL).unwrap();
        assert_eq!(raw.title, "Soup");
        assert!(raw.instructions.is_empty());
        assert_eq!(raw.total_time_minutes, None);
    }

    #[test]
    fn test_page_without_recipe() {
        let html = "<html><body><p>No structured data here</p></body></html>";
        assert!(matches!(
            extract_recipe_from_html(html, URL),
            Err(ScraperError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_recipe_is_malformed() {
        let html = page(r#"{"@type": "Recipe", "name": "Nothing"}"#);
        assert!(matches!(
            extract_recipe_from_html(&html, URL),
            Err(ScraperError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let scraper = SchemaOrgScraper::new();
        assert!(matches!(
            scraper.fetch("ftp://example.com/recipe").await,
            Err(ScraperError::Malformed(_))
        ));
    }
}
