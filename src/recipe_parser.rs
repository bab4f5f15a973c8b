use regex::Regex;
use std::sync::OnceLock;

use crate::recipe::{round_amount, CookingTime, Ingredient, Recipe};
use crate::scraper::RawRecipe;

pub const DEFAULT_SERVINGS: u32 = 4;
pub const FALLBACK_UNIT: &str = "item";
pub const DEFAULT_RECIPE_NAME: &str = "Imported Recipe";
pub const NO_INSTRUCTIONS_STEP: &str = "No cooking instructions provided";

// Single paragraphs longer than this are broken into sentences.
const LONG_STEP_CHARS: usize = 200;

const KNOWN_UNITS: &[&str] = &[
    "g", "gram", "grams", "kg", "kilogram", "kilograms", "mg",
    "ml", "millilitre", "millilitres", "milliliter", "milliliters",
    "l", "litre", "litres", "liter", "liters", "dl", "cl",
    "cup", "cups", "tbsp", "tbs", "tablespoon", "tablespoons",
    "tsp", "teaspoon", "teaspoons", "oz", "ounce", "ounces", "fl oz",
    "lb", "lbs", "pound", "pounds", "pint", "pints", "quart", "quarts",
    "pinch", "pinches", "dash", "clove", "cloves", "can", "cans", "tin", "tins",
    "slice", "slices", "bunch", "bunches", "handful", "handfuls", "sprig", "sprigs",
    "stick", "sticks", "sheet", "sheets", "piece", "pieces", "pcs", "packet", "packets",
    "pack", "packs", "jar", "jars", "knob", "head", "heads", "stalk", "stalks",
];

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // mixed fraction | fraction | number, optionally the start of a range
        Regex::new(
            r"^(?P<qty>\d+\s+\d+/\d+|\d+/\d+|\d*\.\d+|\d+)(?:\s*(?:-|–|to)\s*(?:\d+/\d+|\d*\.\d+|\d+))?\s*(?P<rest>.*)$",
        )
        .expect("quantity regex is valid")
    })
}

fn step_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:step\s*)?(?P<n>\d{1,2})[.):]\s*").expect("step marker regex is valid"))
}

fn inline_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:step\s*)?(?P<n>\d{1,2})[.)]\s+").expect("inline marker regex is valid"))
}

fn iso_duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // M before T is months, after T minutes
        Regex::new(
            r"(?i)^P(?:(?P<y>\d+)Y)?(?:(?P<mo>\d+)M)?(?:(?P<w>\d+)W)?(?:(?P<d>\d+)D)?(?:T(?:(?P<h>\d+)H)?(?:(?P<m>\d+)M)?(?:\d+(?:\.\d+)?S)?)?",
        )
        .expect("duration regex is valid")
    })
}

/// Turns scraped fields into a recipe with the given id.
pub fn normalize_recipe(raw: &RawRecipe, id: u32) -> Recipe {
    let name = raw.title.trim();
    Recipe {
        id,
        name: if name.is_empty() { DEFAULT_RECIPE_NAME.to_string() } else { name.to_string() },
        cooking_time: CookingTime::from_minutes(raw.total_time_minutes.unwrap_or(0)),
        servings: raw.yields.as_deref().map_or(DEFAULT_SERVINGS, parse_servings),
        ingredients: parse_ingredients(&raw.ingredients),
        steps: parse_instructions_to_steps(&raw.instructions),
        source_url: Some(raw.url.clone()).filter(|u| !u.is_empty()),
        image_url: raw.image_url.clone().filter(|u| !u.is_empty()),
    }
}

/// Splits instruction text into steps, handling numbered lists and plain lines.
pub fn parse_instructions_to_steps(instructions: &str) -> Vec<String> {
    let mut steps = Vec::new();

    for line in instructions.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(marker) = step_marker_regex().captures(line) {
            let first = marker["n"].parse::<u32>().unwrap_or(0);
            steps.extend(split_numbered_line(line, marker.get(0).map_or(0, |m| m.end()), first));
        } else {
            steps.push(line.to_string());
        }
    }

    if steps.len() == 1 && steps[0].chars().count() > LONG_STEP_CHARS {
        let sentences = split_sentences(&steps[0]);
        if sentences.len() > 1 {
            steps = sentences;
        }
    }

    if steps.is_empty() {
        steps.push(NO_INSTRUCTIONS_STEP.to_string());
    }
    steps
}

// Inline markers only count when they continue the sequence, so the "4." in
// "gas mark 4. Bake" stays part of the step.
fn split_numbered_line(line: &str, body_start: usize, first: u32) -> Vec<String> {
    let body = &line[body_start..];
    let mut parts = Vec::new();
    let mut expected = first + 1;
    let mut segment_start = 0;

    for caps in inline_marker_regex().captures_iter(body) {
        if caps["n"].parse::<u32>().ok() != Some(expected) {
            continue;
        }
        let Some(marker) = caps.get(0) else { continue };
        parts.push(body[segment_start..marker.start()].trim().to_string());
        segment_start = marker.end();
        expected += 1;
    }
    parts.push(body[segment_start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|next| next.is_whitespace()) {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}

pub fn parse_ingredients(lines: &[String]) -> Vec<Ingredient> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(parse_ingredient)
        .collect()
}

/// Best-effort `{name, amount, unit}` from a line such as `"2 cups plain flour"`.
///
/// Lines without a leading quantity become one `item` named after the whole line.
pub fn parse_ingredient(line: &str) -> Ingredient {
    let original = line.trim();
    let fallback = || Ingredient::new(original, 1.0, FALLBACK_UNIT);

    let expanded = expand_unicode_fractions(original);
    let Some(caps) = quantity_regex().captures(&expanded) else {
        return fallback();
    };
    let Some(amount) = caps.name("qty").and_then(|m| parse_amount(m.as_str())) else {
        return fallback();
    };
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();

    let (unit, name) = split_unit(rest);
    let name = name
        .strip_prefix("of ")
        .unwrap_or(name)
        .trim_start_matches([',', ' '])
        .trim();
    if name.is_empty() {
        return fallback();
    }

    Ingredient::new(name, round_amount(amount), unit.unwrap_or(FALLBACK_UNIT))
}

fn split_unit(rest: &str) -> (Option<&'static str>, &str) {
    let lower = rest.to_ascii_lowercase();
    // longest first, so "tbsp" is tried before "tbs"
    let mut candidates: Vec<&'static str> = KNOWN_UNITS.to_vec();
    candidates.sort_by_key(|u| std::cmp::Reverse(u.len()));

    for unit in candidates {
        if let Some(after) = lower.strip_prefix(unit) {
            let after = after.strip_prefix('.').unwrap_or(after);
            if after.is_empty() || after.starts_with(|c: char| c.is_whitespace() || c == ',') {
                let consumed = rest.len() - after.len();
                return (Some(unit), rest[consumed..].trim());
            }
        }
    }
    (None, rest)
}

fn expand_unicode_fractions(text: &str) -> String {
    const FRACTIONS: &[(char, &str)] = &[
        ('½', "1/2"), ('⅓', "1/3"), ('⅔', "2/3"), ('¼', "1/4"), ('¾', "3/4"),
        ('⅕', "1/5"), ('⅛', "1/8"), ('⅜', "3/8"), ('⅝', "5/8"), ('⅞', "7/8"),
    ];
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match FRACTIONS.iter().find(|(f, _)| *f == c) {
            Some((_, ascii)) => {
                if out.ends_with(|p: char| p.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }
    out
}

/// Parses `"2"`, `"1.5"`, `"1/2"` and `"2 1/2"`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    let mut total = 0.0;
    let mut parts = 0;
    for part in text.split_whitespace() {
        parts += 1;
        total += match part.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.parse().ok()?;
                let den: f64 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => part.parse::<f64>().ok()?,
        };
    }
    (parts > 0 && total.is_finite()).then_some(total)
}

/// First whole number in a yield text such as `"Serves 6"`, falling back to 4.
pub fn parse_servings(yields: &str) -> u32 {
    yields
        .split(|c: char| !c.is_ascii_digit())
        .find(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|servings| *servings > 0)
        .unwrap_or(DEFAULT_SERVINGS)
}

/// Minutes in an ISO 8601 duration like `PT1H15M`. Unparseable input yields `None`.
///
/// Months count as 30 days and years as 365. Totals saturate at `u32::MAX`.
pub fn parse_iso_duration(duration: &str) -> Option<u32> {
    const MINUTES_PER_DAY: u32 = 24 * 60;
    let caps = iso_duration_regex().captures(duration.trim())?;

    let parts = [
        ("y", 365 * MINUTES_PER_DAY),
        ("mo", 30 * MINUTES_PER_DAY),
        ("w", 7 * MINUTES_PER_DAY),
        ("d", MINUTES_PER_DAY),
        ("h", 60),
        ("m", 1),
    ];
    let mut found = false;
    let mut total: u32 = 0;
    for (name, scale) in parts {
        let Some(digits) = caps.name(name) else { continue };
        found = true;
        // only digits are captured, so a failed parse means the value overflowed
        let value = digits.as_str().parse::<u32>().unwrap_or(u32::MAX);
        total = total.saturating_add(value.saturating_mul(scale));
    }
    found.then_some(total)
}
