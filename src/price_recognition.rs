//! # Price Recognition Module
//!
//! This module recognizes a single monetary amount inside a free-form shopping
//! list line such as `"Milk 3.99"`, `"2 x $3.50"` or `"cheese, costs $4"`.
//!
//! ## Features
//!
//! - Ordered cascade of six heuristic patterns, first successful pattern wins
//! - Exact amounts: prices are held as integer cents, never floating point
//! - **Quantity support**: `"2 x $3.50"` yields the line total (7.00)
//! - Configurable vocabulary (currency symbols, currency words, cost keywords)
//!   loaded from `config/price_vocabulary.json` or an environment override
//!
//! Absence of a price is a normal outcome (`None`), never an error.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::iter::Sum;
use std::ops::Range;
use tracing::{debug, info, trace, warn};

use crate::errors::{error_logging, AppError, AppResult};

/// Numeral shape shared by every pattern: digits with up to two decimals
const AMOUNT_PATTERN: &str = r"\d+(?:\.\d{1,2})?";

/// A non-negative monetary amount held as whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Price {
    cents: u64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Lossy conversion for display and charting consumers
    pub fn as_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Parse a plain decimal numeral (`"3"`, `"3.5"`, `"3.50"`) into cents.
    ///
    /// Only ASCII digits and at most two fractional digits are accepted.
    /// Anything else, including values that overflow, yields `None`.
    ///
    /// ```rust
    /// use pocket_tally::price_recognition::Price;
    ///
    /// assert_eq!(Price::parse_decimal("3.5"), Some(Price::from_cents(350)));
    /// assert_eq!(Price::parse_decimal("12"), Some(Price::from_cents(1200)));
    /// assert_eq!(Price::parse_decimal("1.234"), None);
    /// ```
    pub fn parse_decimal(numeral: &str) -> Option<Self> {
        let (whole, fraction) = match numeral.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (numeral, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if numeral.contains('.') && fraction.is_empty() {
            return None;
        }

        let whole_cents = whole.parse::<u64>().ok()?.checked_mul(100)?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().ok()? * 10,
            _ => fraction.parse::<u64>().ok()?,
        };

        whole_cents.checked_add(fraction_cents).map(Self::from_cents)
    }

    pub fn checked_mul(self, quantity: u64) -> Option<Self> {
        self.cents.checked_mul(quantity).map(Self::from_cents)
    }

    pub fn saturating_add(self, other: Price) -> Self {
        Self::from_cents(self.cents.saturating_add(other.cents))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Price::saturating_add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// The cascade steps, in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricePattern {
    /// `"$5.99"`, `"$ 5"`
    CurrencyPrefixed,
    /// `"5 dollars"`, `"3 bucks"`
    CurrencyWord,
    /// `"costs $3"`, `"@ 2.50"`, `"priced 4"`
    CostKeyword,
    /// `"Milk 3.99"`: two decimals at the very end of the line
    TrailingDecimal,
    /// `"2 x $3.50"`: quantity times unit price
    QuantityTimesUnit,
    /// `"for $10"`
    BundleFor,
}

impl PricePattern {
    /// Cascade order
    pub const ALL: [PricePattern; 6] = [
        PricePattern::CurrencyPrefixed,
        PricePattern::CurrencyWord,
        PricePattern::CostKeyword,
        PricePattern::TrailingDecimal,
        PricePattern::QuantityTimesUnit,
        PricePattern::BundleFor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PricePattern::CurrencyPrefixed => "currency_prefixed",
            PricePattern::CurrencyWord => "currency_word",
            PricePattern::CostKeyword => "cost_keyword",
            PricePattern::TrailingDecimal => "trailing_decimal",
            PricePattern::QuantityTimesUnit => "quantity_times_unit",
            PricePattern::BundleFor => "bundle_for",
        }
    }
}

impl fmt::Display for PricePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized price along with how and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    pub price: Price,
    pub pattern: PricePattern,
    /// Byte range of the whole pattern match within the input
    pub span: Range<usize>,
}

/// Words and symbols the cascade patterns are built from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceVocabulary {
    /// Symbols that may precede an amount (`$`)
    pub currency_symbols: Vec<String>,
    /// Words that may follow an amount (`dollars`, `bucks`)
    pub currency_words: Vec<String>,
    /// Keywords that announce a price (`costs`, `price`, `@`, `at`)
    pub cost_keywords: Vec<String>,
    /// Operators between quantity and unit price (`x`, `×`)
    pub multiplier_symbols: Vec<String>,
    /// Words that announce a bundle price (`for`)
    pub bundle_keywords: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for PriceVocabulary {
    fn default() -> Self {
        Self {
            currency_symbols: strings(&["$"]),
            currency_words: strings(&["dollars", "dollar", "bucks", "buck"]),
            cost_keywords: strings(&["costs", "cost", "priced", "price", "@", "at"]),
            multiplier_symbols: strings(&["x", "X", "×"]),
            bundle_keywords: strings(&["for"]),
        }
    }
}

impl PriceVocabulary {
    /// Validate vocabulary entries
    pub fn validate(&self) -> AppResult<()> {
        let validate_entries = |entries: &[String], category: &str| -> AppResult<()> {
            if entries.is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", category)));
            }
            for (i, entry) in entries.iter().enumerate() {
                if entry.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "{}[{}] cannot be empty",
                        category, i
                    )));
                }
                if entry.chars().any(|c| c.is_control()) {
                    return Err(AppError::Config(format!(
                        "{}[{}] '{}' contains control characters",
                        category, i, entry
                    )));
                }
            }
            Ok(())
        };

        validate_entries(&self.currency_symbols, "currency_symbols")?;
        validate_entries(&self.currency_words, "currency_words")?;
        validate_entries(&self.cost_keywords, "cost_keywords")?;
        validate_entries(&self.multiplier_symbols, "multiplier_symbols")?;
        validate_entries(&self.bundle_keywords, "bundle_keywords")?;

        Ok(())
    }
}

fn read_vocabulary_file(path: &str) -> AppResult<PriceVocabulary> {
    let content = fs::read_to_string(path)?;
    let vocabulary: PriceVocabulary = serde_json::from_str(&content)?;
    vocabulary.validate()?;
    Ok(vocabulary)
}

/// Load the price vocabulary from a specific path, without fallbacks
pub fn load_price_vocabulary_from(path: &str) -> AppResult<PriceVocabulary> {
    read_vocabulary_file(path)
}

/// Load the price vocabulary.
///
/// Tries `PRICE_VOCABULARY_CONFIG_PATH` first, then the well-known config
/// locations, and finally falls back to the built-in default vocabulary.
pub fn load_price_vocabulary() -> PriceVocabulary {
    if let Ok(config_path) = std::env::var("PRICE_VOCABULARY_CONFIG_PATH") {
        info!(
            "Loading price vocabulary from environment variable: {}",
            config_path
        );
        match read_vocabulary_file(&config_path) {
            Ok(vocabulary) => return vocabulary,
            Err(e) => warn!(
                "Failed to load price vocabulary from '{}': {}. Falling back to default paths.",
                config_path, e
            ),
        }
    }

    let possible_paths = [
        "/app/config/price_vocabulary.json", // Docker path
        "config/price_vocabulary.json",      // Local development path
        "../config/price_vocabulary.json",   // Test path
    ];

    for config_path in &possible_paths {
        if !std::path::Path::new(config_path).exists() {
            continue;
        }
        match read_vocabulary_file(config_path) {
            Ok(vocabulary) => {
                info!(
                    "Successfully loaded price vocabulary from fallback path: {}",
                    config_path
                );
                return vocabulary;
            }
            Err(e) => {
                warn!(
                    "Failed to load price vocabulary at '{}': {}. Trying next path.",
                    config_path, e
                );
            }
        }
    }

    debug!("No price vocabulary file found, using built-in vocabulary");
    PriceVocabulary::default()
}

/// Build a regex alternation from vocabulary entries.
///
/// Entries are deduplicated, sorted longest first so `"costs"` wins over
/// `"cost"`, and escaped.
fn alternation(entries: &[String]) -> String {
    let mut unique: Vec<&str> = entries.iter().map(|e| e.trim()).collect();
    unique.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    unique.dedup();

    unique
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// The compiled cascade, one regex per `PricePattern`
#[derive(Debug, Clone)]
struct CompiledPatterns {
    currency_prefixed: Regex,
    currency_word: Regex,
    cost_keyword: Regex,
    trailing_decimal: Regex,
    quantity_times_unit: Regex,
    bundle_for: Regex,
    /// Matches text that ends in `<digits> x [$]`, i.e. a multiplication
    /// waiting for its unit price
    multiplier_prefix: Regex,
}

impl CompiledPatterns {
    fn build(vocabulary: &PriceVocabulary) -> Result<Self, regex::Error> {
        let symbols = alternation(&vocabulary.currency_symbols);
        let words = alternation(&vocabulary.currency_words);
        let keywords = alternation(&vocabulary.cost_keywords);
        let multipliers = alternation(&vocabulary.multiplier_symbols);
        let bundles = alternation(&vocabulary.bundle_keywords);

        Ok(Self {
            currency_prefixed: Regex::new(&format!(
                r"(?:{})\s*(?P<amount>{})",
                symbols, AMOUNT_PATTERN
            ))?,
            currency_word: Regex::new(&format!(
                r"(?i)(?P<amount>{})\s*(?:{})",
                AMOUNT_PATTERN, words
            ))?,
            cost_keyword: Regex::new(&format!(
                r"(?i)(?:{})\s*(?:{})?\s*(?P<amount>{})",
                keywords, symbols, AMOUNT_PATTERN
            ))?,
            trailing_decimal: Regex::new(r"(?P<amount>\d+\.\d{2})\s*$")?,
            quantity_times_unit: Regex::new(&format!(
                r"(?P<quantity>\d+)\s*(?:{})\s*(?:{})?\s*(?P<amount>{})",
                multipliers, symbols, AMOUNT_PATTERN
            ))?,
            bundle_for: Regex::new(&format!(
                r"(?i)(?:{})\s+(?:{})?\s*(?P<amount>{})",
                bundles, symbols, AMOUNT_PATTERN
            ))?,
            multiplier_prefix: Regex::new(&format!(
                r"\d\s*(?:{})\s*(?:{})?\s*$",
                multipliers, symbols
            ))?,
        })
    }

    fn regex_for(&self, pattern: PricePattern) -> &Regex {
        match pattern {
            PricePattern::CurrencyPrefixed => &self.currency_prefixed,
            PricePattern::CurrencyWord => &self.currency_word,
            PricePattern::CostKeyword => &self.cost_keyword,
            PricePattern::TrailingDecimal => &self.trailing_decimal,
            PricePattern::QuantityTimesUnit => &self.quantity_times_unit,
            PricePattern::BundleFor => &self.bundle_for,
        }
    }
}

lazy_static! {
    static ref DEFAULT_PATTERNS: CompiledPatterns =
        CompiledPatterns::build(&PriceVocabulary::default())
            .expect("Default price patterns should be valid");
}

/// Price extractor running the heuristic cascade over a line of text
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    patterns: CompiledPatterns,
    vocabulary: PriceVocabulary,
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceExtractor {
    /// Create an extractor with the built-in vocabulary
    ///
    /// ```rust
    /// use pocket_tally::price_recognition::{Price, PriceExtractor};
    ///
    /// let extractor = PriceExtractor::new();
    /// assert_eq!(extractor.extract("Milk 3.99"), Some(Price::from_cents(399)));
    /// assert_eq!(extractor.extract("Bread"), None);
    /// ```
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
            vocabulary: PriceVocabulary::default(),
        }
    }

    /// Create an extractor from a custom vocabulary
    pub fn with_vocabulary(vocabulary: PriceVocabulary) -> AppResult<Self> {
        vocabulary.validate().inspect_err(|e| {
            error_logging::log_validation_error(e, "create_extractor", "price_vocabulary", None)
        })?;
        let patterns = CompiledPatterns::build(&vocabulary)?;
        info!(
            currency_symbols = vocabulary.currency_symbols.len(),
            currency_words = vocabulary.currency_words.len(),
            cost_keywords = vocabulary.cost_keywords.len(),
            "Creating PriceExtractor with custom vocabulary"
        );
        Ok(Self {
            patterns,
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &PriceVocabulary {
        &self.vocabulary
    }

    /// Extract a price from `text`, or `None` if no pattern recognizes one
    pub fn extract(&self, text: &str) -> Option<Price> {
        self.extract_detailed(text).map(|m| m.price)
    }

    /// Extract a price and report which cascade step produced it.
    ///
    /// Patterns are tried in `PricePattern::ALL` order. Within a pattern the
    /// first candidate decides: if its numeral does not convert, the pattern
    /// counts as a miss and the cascade moves on. A single-amount pattern
    /// whose first candidate is the unit price of a `<qty> x <price>`
    /// expression also misses, leaving the line to the multiplication step.
    /// That step misses when the product overflows, and falls back to the
    /// unit price when the quantity itself is out of range.
    pub fn extract_detailed(&self, text: &str) -> Option<PriceMatch> {
        let start_time = std::time::Instant::now();

        let result = if text.trim().is_empty() {
            None
        } else {
            PricePattern::ALL
                .iter()
                .find_map(|&pattern| self.try_pattern(pattern, text))
        };

        match &result {
            Some(found) => debug!(
                pattern = %found.pattern,
                price = %found.price,
                "Recognized price in text"
            ),
            None => trace!(text_length = text.len(), "No price recognized"),
        }

        crate::observability::record_price_recognition_metrics(
            result.as_ref().map(|m| m.pattern),
            start_time.elapsed(),
        );

        result
    }

    fn try_pattern(&self, pattern: PricePattern, text: &str) -> Option<PriceMatch> {
        let capture = self.patterns.regex_for(pattern).captures(text)?;
        let full = capture.get(0)?;

        let price = match pattern {
            PricePattern::QuantityTimesUnit => {
                let unit_price = Price::parse_decimal(capture.name("amount")?.as_str());
                match capture.name("quantity")?.as_str().parse::<u64>() {
                    Ok(quantity) => unit_price.and_then(|p| p.checked_mul(quantity)),
                    Err(_) => {
                        trace!(
                            candidate = full.as_str(),
                            "Quantity out of range, using the unit price"
                        );
                        unit_price
                    }
                }
            }
            _ if self.is_unit_price(text, &capture) => {
                trace!(
                    pattern = %pattern,
                    candidate = full.as_str(),
                    "Amount is a unit price, deferring to multiplication"
                );
                return None;
            }
            _ => Price::parse_decimal(capture.name("amount")?.as_str()),
        };

        match price {
            Some(price) => Some(PriceMatch {
                price,
                pattern,
                span: full.range(),
            }),
            None => {
                trace!(
                    pattern = %pattern,
                    candidate = full.as_str(),
                    "Candidate did not convert to a price"
                );
                None
            }
        }
    }

    /// Whether the amount in `capture` is the right-hand operand of a
    /// quantity multiplication
    fn is_unit_price(&self, text: &str, capture: &Captures<'_>) -> bool {
        capture.name("amount").is_some_and(|amount| {
            self.patterns
                .multiplier_prefix
                .is_match(&text[..amount.start()])
        })
    }
}

/// Recognize a price with the default extractor
pub fn recognize_price(text: &str) -> Option<Price> {
    lazy_static! {
        static ref DEFAULT_EXTRACTOR: PriceExtractor = PriceExtractor::new();
    }
    DEFAULT_EXTRACTOR.extract(text)
}
