//! Natural, case-insensitive string ordering for guide paths.
//!
//! Digit runs compare by numeric value (`2` < `10`). Other characters fall in
//! three classes, in this order: whitespace and ASCII punctuation (ranked as a
//! Unicode collator ranks them, so `_` < `-` < `.` < `/`), digits, then
//! everything else compared after lowercasing. Accents are not folded.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Natural comparison. Strings that differ only by case or by leading zeros
/// compare equal; see [`path_cmp`] for a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                let ord = cmp_digit_runs(&l, &r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = compare_chars(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Natural order, with a byte-wise comparison deciding natural ties so
/// distinct paths never compare equal.
pub fn path_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b).then_with(|| a.cmp(b))
}

/// Whitespace and ASCII punctuation in collation order.
const PUNCTUATION_ORDER: &str = " \t\n\r_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Collation class of a character: punctuation, digit, or other.
fn char_class(c: char) -> (u8, usize) {
    if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (0, rank)
    } else if c.is_ascii_digit() {
        (1, 0)
    } else {
        (2, 0)
    }
}

fn compare_chars(x: char, y: char) -> Ordering {
    char_class(x)
        .cmp(&char_class(y))
        .then_with(|| Iterator::cmp(x.to_lowercase(), y.to_lowercase()))
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn cmp_digit_runs(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(natural_cmp("2", "10"), Ordering::Less);
        assert_eq!(natural_cmp("guide10.md", "guide2.md"), Ordering::Greater);
        assert_eq!(
            natural_cmp("guides/9_a/01_x.md", "guides/10_a/01_x.md"),
            Ordering::Less
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(natural_cmp("Apple.md", "apple.md"), Ordering::Equal);
        assert_eq!(natural_cmp("apple.md", "Banana.md"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("a", "a.md"), Ordering::Less);
        assert_eq!(natural_cmp("a.md", "a2.md"), Ordering::Less);
    }

    #[test]
    fn punctuation_follows_collation_order() {
        assert_eq!(natural_cmp("a_b", "a-b"), Ordering::Less);
        assert_eq!(natural_cmp("a-b", "a.b"), Ordering::Less);
        assert_eq!(natural_cmp("a.b", "a/b"), Ordering::Less);
        assert_eq!(natural_cmp("guides/a_b.md", "guides/a/x.md"), Ordering::Less);
        assert_eq!(natural_cmp("a b", "a_b"), Ordering::Less);
    }

    #[test]
    fn punctuation_before_digits_before_letters() {
        assert_eq!(natural_cmp("a_", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("a9", "aa"), Ordering::Less);
        assert_eq!(natural_cmp("a~", "a0"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_tie_naturally() {
        assert_eq!(natural_cmp("01_x", "1_x"), Ordering::Equal);
        assert_ne!(path_cmp("01_x", "1_x"), Ordering::Equal);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let a = format!("v{}", "9".repeat(40));
        let b = format!("v1{}", "0".repeat(40));
        assert_eq!(natural_cmp(&a, &b), Ordering::Less);
    }

    #[test]
    fn path_cmp_is_total_for_distinct_paths() {
        let mut paths = vec!["B.md", "b.md", "a10.md", "a2.md", "A2.md", "a02.md"];
        paths.sort_by(|a, b| path_cmp(a, b));
        assert_eq!(paths, vec!["A2.md", "a02.md", "a2.md", "a10.md", "B.md", "b.md"]);
    }
}
