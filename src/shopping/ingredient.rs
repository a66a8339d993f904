//! Ingredient line parsing: `"1 1/2 cups flour, sifted"` becomes
//! quantity 1.5, unit cup, name "flour".

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub name: String,
    pub dimension: Dimension,
    /// Multiplier into the dimension base (grams, millilitres). 1 for counts.
    pub factor: f64,
}

struct UnitDef {
    name: &'static str,
    dimension: Dimension,
    factor: f64,
    aliases: &'static [&'static str],
}

const fn def(
    name: &'static str,
    dimension: Dimension,
    factor: f64,
    aliases: &'static [&'static str],
) -> UnitDef {
    UnitDef {
        name,
        dimension,
        factor,
        aliases,
    }
}

use Dimension::{Count, Mass, Volume};

static UNITS: &[UnitDef] = &[
    def("g", Mass, 1.0, &["g", "gs", "gr", "gram", "grams", "gramme", "grammes"]),
    def("kg", Mass, 1000.0, &["kg", "kgs", "kilo", "kilos", "kilogram", "kilograms"]),
    def("mg", Mass, 0.001, &["mg", "milligram", "milligrams"]),
    def("oz", Mass, 28.349523125, &["oz", "ozs", "ounce", "ounces"]),
    def("lb", Mass, 453.59237, &["lb", "lbs", "pound", "pounds"]),
    def(
        "ml",
        Volume,
        1.0,
        &["ml", "mls", "milliliter", "milliliters", "millilitre", "millilitres"],
    ),
    def("l", Volume, 1000.0, &["l", "liter", "liters", "litre", "litres"]),
    def("tsp", Volume, 4.92892159375, &["tsp", "tsps", "teaspoon", "teaspoons"]),
    def(
        "tbsp",
        Volume,
        14.78676478125,
        &["tbsp", "tbsps", "tbs", "tbl", "tablespoon", "tablespoons"],
    ),
    def("fl oz", Volume, 29.5735295625, &["fl oz", "floz", "fluid ounce", "fluid ounces"]),
    def("cup", Volume, 236.5882365, &["cup", "cups", "c"]),
    def("pint", Volume, 473.176473, &["pint", "pints", "pt", "pts"]),
    def("quart", Volume, 946.352946, &["quart", "quarts", "qt", "qts"]),
    def("gallon", Volume, 3785.411784, &["gallon", "gallons", "gal", "gals"]),
    def("pinch", Count, 1.0, &["pinch", "pinches"]),
    def("dash", Count, 1.0, &["dash", "dashes"]),
    def("clove", Count, 1.0, &["clove", "cloves"]),
    def("can", Count, 1.0, &["can", "cans", "tin", "tins"]),
    def("slice", Count, 1.0, &["slice", "slices"]),
    def("bunch", Count, 1.0, &["bunch", "bunches"]),
    def("package", Count, 1.0, &["package", "packages", "pkg", "pkgs", "packet", "packets"]),
    def("stick", Count, 1.0, &["stick", "sticks"]),
    def("sprig", Count, 1.0, &["sprig", "sprigs"]),
    def("handful", Count, 1.0, &["handful", "handfuls"]),
    def("head", Count, 1.0, &["head", "heads"]),
    def("serving", Count, 1.0, &["serving", "servings"]),
];

impl Unit {
    /// Recognise a unit word. `T` and `t` are the only case-sensitive spellings.
    pub fn lookup(word: &str) -> Option<Unit> {
        let word = word.trim().trim_end_matches('.');
        let key = match word {
            "T" => "tbsp".to_string(),
            "t" => "tsp".to_string(),
            other => SPACES_RE
                .replace_all(&other.to_lowercase().replace('.', ""), " ")
                .into_owned(),
        };
        UNITS
            .iter()
            .find(|u| u.aliases.contains(&key.as_str()))
            .map(|u| Unit {
                name: u.name.to_string(),
                dimension: u.dimension,
                factor: u.factor,
            })
    }

    /// Unit from a free-form label such as the upstream `unit` field.
    /// Unrecognised labels become their own count unit; blank labels mean no unit.
    pub fn from_label(label: &str) -> Option<Unit> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Unit::lookup(trimmed).unwrap_or_else(|| Unit {
            name: trimmed.to_lowercase(),
            dimension: Count,
            factor: 1.0,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub quantity: f64,
    pub unit: Option<Unit>,
    pub name: String,
}

lazy_static! {
    static ref PARENS_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").unwrap();
    static ref FRACTION_RE: Regex = Regex::new(r"^(\d+)/(\d+)$").unwrap();
    static ref RANGE_RE: Regex = Regex::new(r"^([\d./]+)[-–]([\d./]+)$").unwrap();
    static ref GLUED_RE: Regex = Regex::new(r"^(\d+(?:\.\d+)?)([A-Za-z]+\.?)$").unwrap();
}

fn vulgar_fraction(c: char) -> Option<&'static str> {
    Some(match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅕' => "1/5",
        '⅖' => "2/5",
        '⅗' => "3/5",
        '⅘' => "4/5",
        '⅙' => "1/6",
        '⅚' => "5/6",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    })
}

/// Integer, decimal or `a/b`.
fn parse_number(token: &str) -> Option<f64> {
    if DECIMAL_RE.is_match(token) {
        return token.parse().ok();
    }
    let caps = FRACTION_RE.captures(token)?;
    let num: f64 = caps[1].parse().ok()?;
    let den: f64 = caps[2].parse().ok()?;
    (den != 0.0).then(|| num / den)
}

fn tokenize(text: &str) -> Vec<String> {
    let mut expanded = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match vulgar_fraction(c) {
            Some(frac) => {
                expanded.push(' ');
                expanded.push_str(frac);
                // "½-1" stays one range token.
                if !matches!(chars.peek(), Some('-' | '–')) {
                    expanded.push(' ');
                }
            }
            None => expanded.push(c),
        }
    }
    let without_notes = PARENS_RE.replace_all(&expanded, " ");

    let mut tokens = Vec::new();
    for raw in without_notes.split_whitespace() {
        // "200g" -> "200", "g"; only when the suffix really is a unit.
        if let Some(caps) = GLUED_RE.captures(raw) {
            if Unit::lookup(&caps[2]).is_some() {
                tokens.push(caps[1].to_string());
                tokens.push(caps[2].to_string());
                continue;
            }
        }
        tokens.push(raw.to_string());
    }
    tokens
}

fn read_quantity(tokens: &[String], pos: &mut usize) -> Option<f64> {
    let first = tokens.get(*pos)?;
    if first.eq_ignore_ascii_case("a") || first.eq_ignore_ascii_case("an") {
        *pos += 1;
        return Some(1.0);
    }
    if let Some(caps) = RANGE_RE.captures(first) {
        if let (Some(lo), Some(hi)) = (parse_number(&caps[1]), parse_number(&caps[2])) {
            *pos += 1;
            return Some(lo.max(hi));
        }
    }

    let mut qty = parse_number(first)?;
    *pos += 1;

    let whole = !first.contains('/') && !first.contains('.');
    if whole {
        if let Some(next) = tokens.get(*pos) {
            if FRACTION_RE.is_match(next) {
                if let Some(frac) = parse_number(next) {
                    qty += frac;
                    *pos += 1;
                }
            } else if let Some(caps) = RANGE_RE.captures(next) {
                // Mixed-number range such as "1 1/2-2".
                if caps[1].contains('/') {
                    let lo = parse_number(&caps[1]);
                    let hi = parse_number(&caps[2]);
                    if let (Some(lo), Some(hi)) = (lo, hi) {
                        qty = (qty + lo).max(hi);
                        *pos += 1;
                        return Some(qty);
                    }
                }
            }
        }
    }

    if let (Some(sep), Some(upper)) = (tokens.get(*pos), tokens.get(*pos + 1)) {
        if sep == "-" || sep == "–" || sep.eq_ignore_ascii_case("to") {
            if let Some(hi) = parse_number(upper) {
                qty = qty.max(hi);
                *pos += 2;
            }
        }
    }
    Some(qty)
}

fn read_unit(tokens: &[String], pos: &mut usize) -> Option<Unit> {
    if let (Some(a), Some(b)) = (tokens.get(*pos), tokens.get(*pos + 1)) {
        if let Some(unit) = Unit::lookup(&format!("{a} {b}")) {
            *pos += 2;
            return Some(unit);
        }
    }
    let unit = Unit::lookup(tokens.get(*pos)?)?;
    *pos += 1;
    Some(unit)
}

/// Lower-case name with trailing preparation notes ("…, chopped") removed.
pub fn normalize_name(raw: &str) -> String {
    let without_notes = PARENS_RE.replace_all(raw, " ");
    let head = without_notes.split(',').next().unwrap_or_default();
    SPACES_RE
        .replace_all(head.trim(), " ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase()
}

/// Split an ingredient line into quantity, unit and name.
/// Lines without a leading amount count as one; an unknown unit word stays in the name.
pub fn parse_ingredient(text: &str) -> ParsedIngredient {
    let tokens = tokenize(text);
    let mut pos = 0;

    let quantity = read_quantity(&tokens, &mut pos).unwrap_or(1.0);
    let unit_start = pos;
    let mut unit = read_unit(&tokens, &mut pos);
    if unit.is_some() && tokens.get(pos).is_some_and(|t| t.eq_ignore_ascii_case("of")) {
        pos += 1;
    }

    let mut name = normalize_name(&tokens[pos..].join(" "));
    if name.is_empty() && unit.is_some() {
        // "3 cloves" alone: the unit word is all the name there is.
        unit = None;
        name = normalize_name(&tokens[unit_start..].join(" "));
    }

    ParsedIngredient {
        quantity,
        unit,
        name,
    }
}
