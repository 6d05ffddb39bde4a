//! Volume-discount pricing calculator.
//!
//! A single per-user, per-term price is multiplied by the number of users
//! and terms, then discounted according to the band the combined user count
//! falls into. The calculator is a pure function: no rounding happens here,
//! presentation code formats the numbers with [`format_money`].

use serde::Serialize;

/// Price per user per term in the reference deployment, in KES.
pub const DEFAULT_PRICE_PER_USER_PER_TERM: f64 = 999.0;

/// Currency code of the reference deployment.
pub const DEFAULT_CURRENCY: &str = "KES";

/// One band of the volume-discount table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscountTier {
    /// Smallest user count in the band (inclusive).
    pub min_users: u64,
    /// Largest user count in the band (inclusive), `None` for unbounded.
    pub max_users: Option<u64>,
    /// Discount applied to the subtotal, in percent.
    pub discount_percent: u8,
    /// Human-readable band name.
    pub label: &'static str,
}

impl DiscountTier {
    /// Whether `users` falls inside this band.
    #[must_use]
    pub fn contains(&self, users: u64) -> bool {
        users >= self.min_users && self.max_users.is_none_or(|max| users <= max)
    }
}

/// The discount table, ascending by `min_users`, contiguous from zero.
pub const DISCOUNT_TIERS: [DiscountTier; 5] = [
    DiscountTier {
        min_users: 0,
        max_users: Some(99),
        discount_percent: 0,
        label: "Small school",
    },
    DiscountTier {
        min_users: 100,
        max_users: Some(499),
        discount_percent: 5,
        label: "Medium school",
    },
    DiscountTier {
        min_users: 500,
        max_users: Some(999),
        discount_percent: 10,
        label: "Large school",
    },
    DiscountTier {
        min_users: 1000,
        max_users: Some(4999),
        discount_percent: 15,
        label: "School group",
    },
    DiscountTier {
        min_users: 5000,
        max_users: None,
        discount_percent: 20,
        label: "Enterprise",
    },
];

/// Select the discount band for a combined user count.
///
/// Falls back to the lowest band if no band matches, so this never fails.
#[must_use]
pub fn discount_tier(users: u64) -> &'static DiscountTier {
    DISCOUNT_TIERS
        .iter()
        .find(|tier| tier.contains(users))
        .unwrap_or(&DISCOUNT_TIERS[0])
}

/// Price basis for the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingConfig {
    /// Price charged per user for one term.
    pub price_per_user_per_term: f64,
    /// ISO currency code used when formatting amounts.
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_user_per_term: DEFAULT_PRICE_PER_USER_PER_TERM,
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }
}

/// Calculator inputs after coercion.
///
/// Construction clamps: negative counts become zero and a term count below
/// one becomes one, so a `PricingInputs` value is always usable as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingInputs {
    pub student_count: u64,
    pub staff_count: u64,
    pub terms_per_year: u64,
}

impl PricingInputs {
    /// Build inputs from signed counts, clamping out-of-range values.
    #[must_use]
    pub fn new(student_count: i64, staff_count: i64, terms_per_year: i64) -> Self {
        Self {
            student_count: student_count.max(0).unsigned_abs(),
            staff_count: staff_count.max(0).unsigned_abs(),
            terms_per_year: terms_per_year.max(1).unsigned_abs(),
        }
    }

    /// Build inputs from raw form text.
    ///
    /// Text that does not parse as a finite number counts as zero users, and
    /// as one term for `terms`. Fractions are truncated toward zero.
    #[must_use]
    pub fn from_raw(students: &str, staff: &str, terms: &str) -> Self {
        Self::new(
            parse_count(students).unwrap_or(0),
            parse_count(staff).unwrap_or(0),
            parse_count(terms).filter(|t| *t != 0).unwrap_or(1),
        )
    }

    /// Combined user count the discount band is chosen from.
    #[must_use]
    pub fn total_users(&self) -> u64 {
        self.student_count.saturating_add(self.staff_count)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // `as` saturates at the i64 bounds.
    Some(value.trunc() as i64)
}

/// Outcome of a pricing calculation. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    pub total_users: u64,
    pub terms_per_year: u64,
    pub tier: DiscountTier,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
}

/// Compute the price for `inputs` under `config`.
///
/// Terms per year below 1 count as 1. A negative or non-finite price counts
/// as 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate(inputs: &PricingInputs, config: &PricingConfig) -> PricingResult {
    let total_users = inputs.total_users();
    let terms_per_year = inputs.terms_per_year.max(1);
    let tier = *discount_tier(total_users);
    let price = if config.price_per_user_per_term.is_finite() {
        config.price_per_user_per_term.max(0.0)
    } else {
        0.0
    };

    let subtotal = total_users as f64 * price * terms_per_year as f64;
    let discount_amount = subtotal * f64::from(tier.discount_percent) / 100.0;
    let total = subtotal - discount_amount;

    PricingResult {
        total_users,
        terms_per_year,
        tier,
        subtotal,
        discount_amount,
        total,
    }
}

/// Format an amount as whole currency units with thousands separators,
/// e.g. `KES 1,456,542`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_money(amount: f64, currency: &str) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let digits = (rounded.abs() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{currency} {grouped}")
    } else {
        format!("{currency} {grouped}")
    }
}
