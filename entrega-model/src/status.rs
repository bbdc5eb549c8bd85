use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Closed set of order states recognized by the platform.
///
/// Storage keeps the status as free text for compatibility with existing
/// clients; this enum is the typed view used for transition checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    /// Created, waiting for a courier to pick it up.
    Pendiente,
    /// Courier is on the way to the customer.
    EnCamino,
    /// Delivered to the customer. Terminal.
    Entregado,
    /// Cancelled before delivery. Terminal.
    Cancelado,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EnCamino => "en camino",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Entregado | OrderStatus::Cancelado)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// pendiente → en camino → entregado; cancelado is reachable from
    /// pendiente or en camino only. Terminal states admit nothing.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pendiente, OrderStatus::EnCamino) => true,
            (OrderStatus::EnCamino, OrderStatus::Entregado) => true,
            (OrderStatus::Pendiente, OrderStatus::Cancelado) => true,
            (OrderStatus::EnCamino, OrderStatus::Cancelado) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pendiente" => Ok(OrderStatus::Pendiente),
            "en camino" => Ok(OrderStatus::EnCamino),
            "entregado" => Ok(OrderStatus::Entregado),
            "cancelado" => Ok(OrderStatus::Cancelado),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Status string that does not map to any recognized state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}
