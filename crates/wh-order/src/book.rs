//! `OrderBook` — the append-only order ledger.

use wh_core::{OrderId, Tick};

use crate::{Order, OrderError, OrderRequest, OrderResult, OrderStatus};

/// Every order ever accepted in a run, indexed by `OrderId`.
///
/// Ids are dense and assigned in submission order, so `OrderId(n)` is the
/// `n`-th accepted order.  Records are never removed.
#[derive(Debug, Default, Clone)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new Pending order and return its id.
    pub fn insert(&mut self, request: OrderRequest, created_at: Tick) -> OrderId {
        let id = OrderId::from_index(self.orders.len());
        self.orders.push(Order::new(id, request, created_at));
        id
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: OrderId) -> OrderResult<&mut Order> {
        self.orders.get_mut(id.index()).ok_or(OrderError::UnknownOrder(id))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All orders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }

    /// `true` once every order has reached Completed or Failed.
    pub fn all_terminal(&self) -> bool {
        self.orders.iter().all(|o| o.status.is_terminal())
    }
}
