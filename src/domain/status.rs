use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order.
///
/// The five workflow states form a strict progress order by rank:
/// `Pendente(1) < Recebido(2) < EmPreparacao(3) < Pronto(4) < Finalizado(5)`.
/// `Cancelado(6)` is an absorbing terminal state reachable from any
/// non-terminal state; its rank is never used as "maximum progress".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pendente,
    Recebido,
    EmPreparacao,
    Pronto,
    Finalizado,
    Cancelado,
}

impl OrderStatus {
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pendente => 1,
            OrderStatus::Recebido => 2,
            OrderStatus::EmPreparacao => 3,
            OrderStatus::Pronto => 4,
            OrderStatus::Finalizado => 5,
            OrderStatus::Cancelado => 6,
        }
    }

    /// Terminal orders accept no further workflow transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Finalizado | OrderStatus::Cancelado)
    }

    /// Progress comparison over the kitchen workflow.
    ///
    /// `Cancelado` is a terminal tag, not a workflow stage, so it never
    /// participates: the comparison is false whenever either side is
    /// `Cancelado`.
    pub fn has_progressed_past(&self, other: OrderStatus) -> bool {
        if *self == OrderStatus::Cancelado || other == OrderStatus::Cancelado {
            return false;
        }
        self.rank() > other.rank()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pendente => "Pendente",
            OrderStatus::Recebido => "Recebido",
            OrderStatus::EmPreparacao => "EmPreparacao",
            OrderStatus::Pronto => "Pronto",
            OrderStatus::Finalizado => "Finalizado",
            OrderStatus::Cancelado => "Cancelado",
        };
        f.write_str(name)
    }
}
