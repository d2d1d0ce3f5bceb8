//! Pure decision functions over the order status table.
//!
//! Nothing here mutates state; callers authorize first and only then touch
//! stock or status.

use super::OrderStatus;
use crate::error::{DomainError, Result};

/// Authorizes a move from `current` to `requested` against the table.
pub fn authorize(current: OrderStatus, requested: OrderStatus) -> Result<()> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(DomainError::InvalidTransition {
            from: current,
            to: requested,
        })
    }
}

/// Authorizes a customer-initiated cancellation.
pub fn authorize_customer_cancel(current: OrderStatus) -> Result<()> {
    if current.can_customer_cancel() {
        Ok(())
    } else {
        Err(DomainError::InvalidTransition {
            from: current,
            to: OrderStatus::Cancelled,
        })
    }
}

/// Authorizes an admin-initiated status change.
///
/// Cancelling a shipped or delivered order is a conflict, checked ahead of
/// the table so callers can tell it apart from an ordinary illegal move.
pub fn authorize_admin(current: OrderStatus, requested: OrderStatus) -> Result<()> {
    if requested == OrderStatus::Cancelled && current.is_shipped() {
        return Err(DomainError::CancelAfterShipment { status: current });
    }
    authorize(current, requested)
}
