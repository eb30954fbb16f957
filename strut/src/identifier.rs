//! Identifier generation from Swagger document strings.
//!
//! Path segments and definition names become namespace/model identifiers in
//! PascalCase; `operationId`s become callable identifiers in snake_case.
//!
//! ## Rules
//!
//! Both transforms first drop every character that is not ASCII
//! alphanumeric, `-`, `_` or a space, then spell out a leading run of
//! digits (`"3d"` -> `"Threed"`), since identifiers cannot start with one.
//!
//! - Constant identifiers split on `-`, `_` and spaces and capitalize the
//!   first character of each chunk without touching the rest.
//! - Callable identifiers split camel case, keeping acronyms together
//!   (`"XMLHttpRequest"` -> `"xml_http_request"`), and lowercase everything.
//!
//! ## Examples
//!
//! ```
//! use strut::identifier::{callable_identifier, constant_identifier};
//!
//! assert_eq!(constant_identifier("find-by-status"), "FindByStatus");
//! assert_eq!(constant_identifier("1v2"), "Onev2");
//! assert_eq!(callable_identifier("getPetById"), "get_pet_by_id");
//! assert_eq!(callable_identifier("3DSCode"), "three_ds_code");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9_\- ]").expect("valid regex");
    static ref LEADING_DIGITS: Regex = Regex::new(r"^[0-9]+").expect("valid regex");
    static ref CHUNK_SEPARATOR: Regex = Regex::new(r"[-_ ]").expect("valid regex");
    /// An acronym closing the string: `fromXML` -> `from_XML`.
    static ref TRAILING_ACRONYM: Regex = Regex::new(r"([a-z])([A-Z]+)\z").expect("valid regex");
    /// An acronym followed by a word: `XMLTransformed` -> `XML_Transformed`.
    static ref ACRONYM_THEN_WORD: Regex =
        Regex::new(r"([A-Z]+)([A-Z])([^A-Z_])").expect("valid regex");
    static ref LOWER_THEN_OTHER: Regex = Regex::new(r"([a-z])([^a-z_])").expect("valid regex");
    static ref REPEATED_UNDERSCORE: Regex = Regex::new(r"_{2,}").expect("valid regex");
}

/// Builds a PascalCase identifier for namespaces and model types.
///
/// ## Examples
///
/// ```
/// use strut::identifier::constant_identifier;
///
/// assert_eq!(constant_identifier("3d"), "Threed");
/// assert_eq!(constant_identifier("v1"), "V1");
/// assert_eq!(constant_identifier("AnotherTest"), "AnotherTest");
/// ```
pub fn constant_identifier(input: &str) -> String {
    let spelled = spell_leading_digits(&strip_disallowed(input));
    CHUNK_SEPARATOR
        .split(&spelled)
        .map(capitalize_first)
        .collect()
}

/// Builds a snake_case identifier for generated callables.
///
/// ## Examples
///
/// ```
/// use strut::identifier::callable_identifier;
///
/// assert_eq!(
///     callable_identifier("XMLTransformedToCamelCase"),
///     "xml_transformed_to_camel_case"
/// );
/// assert_eq!(callable_identifier("thisIs3DSCode"), "this_is_3ds_code");
/// ```
pub fn callable_identifier(input: &str) -> String {
    let spelled = spell_leading_digits(&strip_disallowed(input));
    let normalized = spelled.replace(['-', ' '], "_");

    let snaked = TRAILING_ACRONYM.replace(&normalized, "${1}_${2}");
    let snaked = ACRONYM_THEN_WORD.replace_all(&snaked, "${1}_${2}${3}");
    let snaked = LOWER_THEN_OTHER.replace_all(&snaked, "${1}_${2}");

    REPEATED_UNDERSCORE
        .replace_all(&snaked.to_lowercase(), "_")
        .into_owned()
}

fn strip_disallowed(input: &str) -> String {
    DISALLOWED.replace_all(input, "").into_owned()
}

/// Replaces a leading run of digits with their English names.
fn spell_leading_digits(input: &str) -> String {
    let Some(found) = LEADING_DIGITS.find(input) else {
        return input.to_string();
    };

    let mut spelled: String = found.as_str().chars().map(digit_name).collect();
    spelled.push_str(&input[found.end()..]);
    spelled
}

fn digit_name(digit: char) -> &'static str {
    match digit {
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        _ => "Nine",
    }
}

fn capitalize_first(chunk: &str) -> String {
    let mut chars = chunk.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
