//! Cocktail content generation
//!
//! Turns the participant's answers into a nonsense cocktail name and a
//! "recommended" ingredient list. All randomness comes from the caller's
//! [`Rng`] so a seeded generator reproduces a session exactly.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Counts are reduced into `0..SYLLABLE_MODULUS`
pub const SYLLABLE_MODULUS: u8 = 20;

/// Appended to every synthesized name
pub const NAME_SUFFIX: &str = "the drink";

/// Upper bound (exclusive) on how many shuffled ingredients get dropped
pub const MAX_DROPPED: usize = 4;

const NEGATIONS: [&str; 3] = ["no", "n", "nope"];

/// How many of each syllable token go into the cocktail name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyllableCounts {
    pub an: u8,
    pub a: u8,
    pub um: u8,
}

impl SyllableCounts {
    /// The token multiset: `an` copies of "an", then "a", then "um"
    pub fn tokens(self) -> Vec<&'static str> {
        std::iter::repeat("an")
            .take(usize::from(self.an))
            .chain(std::iter::repeat("a").take(usize::from(self.a)))
            .chain(std::iter::repeat("um").take(usize::from(self.um)))
            .collect()
    }
}

/// `|n| mod 20`
#[allow(clippy::cast_possible_truncation)] // remainder is < 20
pub fn reduce_count(n: i64) -> u8 {
    (n.unsigned_abs() % u64::from(SYLLABLE_MODULUS)) as u8
}

/// Parse the leading integer of `line` and reduce it with [`reduce_count`].
///
/// Leading whitespace and a single sign are accepted and anything after the
/// digits is ignored, so `"12 please"` counts as 12 and `"3.7"` as 3. A `0x`
/// prefix reads hexadecimal digits instead (`"0x1A"` is 26). Returns `None`
/// when no digit follows. The reduction runs digit by digit, so a digit
/// string of any length is fine.
pub fn parse_count(line: &str) -> Option<u8> {
    let trimmed = line.trim_start();
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);

    let (radix, body) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };

    let mut digits = body.chars().map_while(|c| c.to_digit(radix)).peekable();
    digits.peek()?;

    let modulus = u32::from(SYLLABLE_MODULUS);
    let remainder = digits.fold(0, |acc, digit| (acc * radix + digit) % modulus);
    u8::try_from(remainder).ok()
}

/// Shuffle the token multiset and join it into a name ending in "the drink".
///
/// With no tokens at all the name is just "the drink".
pub fn compose_cocktail_name<R: Rng + ?Sized>(counts: SyllableCounts, rng: &mut R) -> String {
    let mut tokens = counts.tokens();
    tokens.shuffle(rng);

    if tokens.is_empty() {
        NAME_SUFFIX.to_string()
    } else {
        format!("{} {NAME_SUFFIX}", tokens.join(" "))
    }
}

/// Split on commas, trim each part and drop the empty ones
pub fn parse_ingredients(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Whether an answer to "any more ingredients?" means no
pub fn is_negation(line: &str) -> bool {
    let normalized = line.trim().to_lowercase();
    normalized.is_empty() || NEGATIONS.contains(&normalized.as_str())
}

/// Pick the ingredients to recommend.
///
/// Shuffles the full list, draws `quantity` uniformly from
/// `0..min(MAX_DROPPED, len)` and drops that many items from the front of the
/// shuffled list. The result keeps at least one item whenever the input is
/// non-empty; an empty input yields an empty selection.
pub fn select_ingredients<R: Rng + ?Sized>(ingredients: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = ingredients.to_vec();
    shuffled.shuffle(rng);

    let upper = MAX_DROPPED.min(shuffled.len());
    let quantity = if upper == 0 { 0 } else { rng.gen_range(0..upper) };
    shuffled.split_off(quantity)
}
