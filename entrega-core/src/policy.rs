use rust_decimal::Decimal;

use crate::orders::SHIPPING_SURCHARGE;

/// Tunable order-lifecycle behavior.
///
/// The defaults reproduce the behavior existing clients depend on: any
/// non-empty status string is accepted, and tracking reads work for any
/// order with a live courier. The stricter checks are opt-in so enabling
/// them is a deliberate, visible change.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPolicy {
    /// Require status updates to parse into [`entrega_model::OrderStatus`]
    /// and follow the legal transition table.
    pub strict_transitions: bool,
    /// Only serve tracking reads for orders currently `en camino`.
    pub require_in_transit: bool,
    /// Flat fee added to the sum of line-item subtotals.
    pub shipping_surcharge: Decimal,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            require_in_transit: false,
            shipping_surcharge: SHIPPING_SURCHARGE,
        }
    }
}
