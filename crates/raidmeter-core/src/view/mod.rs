//! Presentation view-models.
//!
//! Plain data the front ends render: no I/O, no terminal or markup
//! concerns. Number formatting lives here so every front end agrees.

mod card;
mod dashboard;
mod form;
mod name;
mod summary;

pub use card::{MetricsCard, Tier};
pub use dashboard::{Dashboard, INSTRUCTIONS};
pub use form::{DamageForm, FormError};
pub use name::NameGate;
pub use summary::PopulationView;

/// Placeholder shown where a value does not exist yet.
pub const PLACEHOLDER: &str = "-";

/// Round to a whole number and group thousands: `1234567.6` → `1,234,568`.
#[must_use]
pub fn format_whole(value: f64) -> String {
    group_thousands(&format!("{:.0}", value.round()))
}

/// Two decimals with grouped thousands: `12345.678` → `12,345.68`.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");

    match fixed.split_once('.') {
        Some((whole, frac)) => format!("{}.{frac}", group_thousands(whole)),
        None => group_thousands(&fixed),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    format!("{sign}{out}")
}

///
/// TESTS
///
