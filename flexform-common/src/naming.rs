//! Machine names derived from human labels

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("Failed to compile disallowed-character regex"));

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("Failed to compile separator regex"));

/// Prefix for names that would not parse as an expression identifier
pub const NAME_PREFIX: &str = "field_";

/// Words the expression language reserves; none can name a value.
const RESERVED_WORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "false", "for", "function", "if", "import",
    "in", "let", "loop", "namespace", "null", "package", "return", "true", "var", "void",
    "while",
];

/// Convert a human label into a machine name usable as a field or form key.
///
/// The label is lowercased, stripped of anything that is not a word
/// character, whitespace or hyphen, and runs of whitespace and hyphens
/// collapse into a single underscore. Non-ASCII characters are dropped.
///
/// Names are referenced from modifier expressions, so a name that starts
/// with a digit or is a reserved word gets [`NAME_PREFIX`].
///
/// ```rust
/// use flexform_common::machine_name;
///
/// assert_eq!(machine_name("Favorite Pizza Topping?"), "favorite_pizza_topping");
/// assert_eq!(machine_name("  Age -- in years "), "age_in_years");
/// assert_eq!(machine_name("2nd choice"), "field_2nd_choice");
/// ```
pub fn machine_name(label: &str) -> String {
    let ascii: String = label.chars().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let slug = SEPARATORS.replace_all(&cleaned, "-");
    let name = slug.trim_matches(|c| c == '-' || c == '_').replace('-', "_");

    if name.is_empty() || is_identifier(&name) {
        name
    } else {
        format!("{NAME_PREFIX}{name}")
    }
}

/// Whether `name` can be referenced as-is from an expression
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic());
    starts_well
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !RESERVED_WORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("First Name", "first_name")]
    #[case("Do you like pizza?", "do_you_like_pizza")]
    #[case("already_snake", "already_snake")]
    #[case("Crème brûlée", "crme_brle")]
    #[case("--Lead & trail--", "lead_trail")]
    #[case("", "")]
    #[case("2nd choice", "field_2nd_choice")]
    #[case("42", "field_42")]
    #[case("In", "field_in")]
    #[case("null", "field_null")]
    #[case("Inches", "inches")]
    #[case("Return address", "return_address")]
    fn test_machine_name(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(machine_name(label), expected);
    }

    #[rstest]
    #[case("crust", true)]
    #[case("_private", true)]
    #[case("field_2nd", true)]
    #[case("2nd", false)]
    #[case("in", false)]
    #[case("true", false)]
    #[case("a-b", false)]
    #[case("", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }
}
