//! Locale-aware text ordering for Spanish sheet content.
//!
//! Primary comparison ignores case and Latin diacritics, so "Álvarez" sorts
//! next to "alvarez" rather than after "Zúñiga". `ñ` stays a letter of its own
//! between `n` and `o`. Ties fall back to a plain code-point comparison to keep
//! the order total.

use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| a.cmp(b))
}

fn primary_key(value: &str) -> impl Iterator<Item = u32> + '_ {
    value.chars().flat_map(char::to_lowercase).map(weight)
}

/// Base letters weigh twice their code point; `ñ` takes the odd slot after `n`.
fn weight(ch: char) -> u32 {
    match ch {
        'ñ' => 'n' as u32 * 2 + 1,
        other => strip_diacritic(other) as u32 * 2,
    }
}

fn strip_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}
