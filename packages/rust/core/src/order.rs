//! Order resolution: frontmatter hints first, filename prefix second.

use std::sync::LazyLock;

use regex::Regex;

use gradiomd_markdown::FrontmatterData;

/// Resolve a file's order value.
///
/// The first configured key whose value parses as a finite number wins;
/// otherwise a numeric filename prefix (`01_intro.md`, `2-setup.md`) is used.
/// `None` means the file has no ordering signal at all.
pub fn resolve_order(frontmatter: &FrontmatterData, path: &str, order_keys: &[String]) -> Option<f64> {
    order_from_metadata(frontmatter, order_keys).or_else(|| order_from_filename(path))
}

/// First usable numeric value among `order_keys`, in priority order.
///
/// Values are coerced the way a loose numeric field is: surrounding
/// whitespace is ignored, an empty value counts as `0`, and `0x`/`0o`/`0b`
/// integer literals are accepted. Non-numeric values (and `inf`/`NaN`) fall
/// through to the next key.
pub fn order_from_metadata(frontmatter: &FrontmatterData, order_keys: &[String]) -> Option<f64> {
    order_keys
        .iter()
        .filter_map(|key| frontmatter.get(key))
        .find_map(|value| coerce_number(value))
}

/// Leading digit run of the base name, when followed by `-`, `_`, space or `.`.
pub fn order_from_filename(path: &str) -> Option<f64> {
    static PREFIX_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^([0-9]+)[-_ .]").expect("valid regex"));

    let base = path.rsplit('/').next().unwrap_or(path);
    PREFIX_RE
        .captures(base)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn coerce_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let prefixed = trimmed.get(..2).and_then(|prefix| match prefix {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    });

    let number = match prefixed {
        Some(radix) => parse_radix(&trimmed[2..], radix)?,
        None => trimmed.parse::<f64>().ok()?,
    };
    Some(number).filter(|n| n.is_finite())
}

/// Unsigned integer literal in `radix`, accumulated as `f64` so long literals
/// saturate to infinity instead of failing.
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        ["order", "weight", "sidebar_position", "position"]
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    fn fm(pairs: &[(&str, &str)]) -> FrontmatterData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn higher_priority_key_wins() {
        let data = fm(&[("position", "9"), ("weight", "4"), ("order", "2")]);
        assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(2.0));

        let data = fm(&[("position", "9"), ("sidebar_position", "5")]);
        assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(5.0));
    }

    #[test]
    fn unusable_values_fall_through() {
        let data = fm(&[("order", "first"), ("weight", "0x"), ("sidebar_position", "inf"), ("position", "3.5")]);
        assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(3.5));

        let data = fm(&[("order", "1e400"), ("weight", "NaN"), ("position", "-0x10")]);
        assert_eq!(resolve_order(&data, "guides/05_x.md", &keys()), Some(5.0));
    }

    #[test]
    fn empty_value_counts_as_zero() {
        let data = fm(&[("order", ""), ("weight", "4")]);
        assert_eq!(resolve_order(&data, "guides/09_x.md", &keys()), Some(0.0));

        let data = fm(&[("sidebar_position", "   ")]);
        assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(0.0));
    }

    #[test]
    fn prefixed_integer_literals() {
        for (value, expected) in [("0x10", 16.0), ("0XfF", 255.0), ("0o17", 15.0), ("0b101", 5.0)] {
            let data = fm(&[("order", value)]);
            assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(expected), "{value}");
        }
        assert_eq!(resolve_order(&fm(&[("order", "0b102")]), "guides/x.md", &keys()), None);
    }

    #[test]
    fn decimal_forms() {
        for (value, expected) in [(" 12 ", 12.0), ("+5", 5.0), (".5", 0.5), ("5.", 5.0), ("1e3", 1000.0)] {
            let data = fm(&[("order", value)]);
            assert_eq!(resolve_order(&data, "guides/x.md", &keys()), Some(expected), "{value}");
        }
    }

    #[test]
    fn metadata_beats_filename_prefix() {
        let data = fm(&[("weight", "-1")]);
        assert_eq!(resolve_order(&data, "guides/07_intro.md", &keys()), Some(-1.0));
    }

    #[test]
    fn unrecognised_keys_are_ignored() {
        let data = fm(&[("Order", "1"), ("rank", "2")]);
        assert_eq!(resolve_order(&data, "guides/intro.md", &keys()), None);
    }

    #[test]
    fn filename_prefix_with_each_separator() {
        for (path, expected) in [
            ("guides/01_getting-started/03_sharing.md", 3.0),
            ("guides/12-theming.md", 12.0),
            ("guides/4 custom css.md", 4.0),
            ("guides/10.advanced.md", 10.0),
        ] {
            assert_eq!(resolve_order(&FrontmatterData::new(), path, &keys()), Some(expected), "{path}");
        }
    }

    #[test]
    fn prefix_only_applies_to_base_name() {
        // Directory prefixes do not count.
        assert_eq!(order_from_filename("guides/01_getting-started/intro.md"), None);
    }

    #[test]
    fn digits_without_separator_are_not_a_prefix() {
        assert_eq!(order_from_filename("guides/2023recap.md"), None);
        assert_eq!(order_from_filename("guides/v2_intro.md"), None);
        assert_eq!(order_from_filename("guides/42"), None);
    }

    #[test]
    fn long_prefix_still_resolves() {
        assert_eq!(order_from_filename("00000000000000000000123_x.md"), Some(123.0));
    }

    #[test]
    fn custom_key_list() {
        let data = fm(&[("order", "1"), ("nav_order", "8")]);
        let keys = vec!["nav_order".to_string()];
        assert_eq!(resolve_order(&data, "guides/x.md", &keys), Some(8.0));
    }
}
