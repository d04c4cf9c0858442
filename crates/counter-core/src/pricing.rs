//! # Pricing
//!
//! Total = Σ(quantity × unit price) over all rows, blanks counted as zero.
//! Pure and order-independent, so recomputing is always safe.

use crate::line_items::LineItem;
use crate::money::Money;

/// Computes the sale total from the given rows.
///
/// ## Example
/// ```rust
/// use counter_core::line_items::LineItem;
/// use counter_core::money::Money;
/// use counter_core::pricing::compute_total;
///
/// let mut a = LineItem::new();
/// a.quantity = Some(2);
/// a.unit_price = Some(Money::from_cents(1000));
///
/// let mut b = LineItem::new();
/// b.quantity = Some(1);
/// b.unit_price = Some(Money::from_cents(500));
///
/// assert_eq!(compute_total([&a, &b]).cents(), 2500);
/// ```
pub fn compute_total<'a, I>(items: I) -> Money
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().map(LineItem::line_total).sum()
}
