//! Stateless order state rules.

use crate::order::{Order, OrderError, OrderState};
use crate::validation::ValidationErrors;

/// Pure decisions about order state changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderStateService;

impl OrderStateService {
    pub fn new() -> Self {
        Self
    }

    /// Returns `InvalidTransition` unless `order` may move to `new_state`.
    pub fn validate_transition(&self, order: &Order, new_state: OrderState) -> Result<(), OrderError> {
        if order.can_transition_to(new_state) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition {
                from: order.state(),
                to: new_state,
            })
        }
    }

    /// States reachable from the order's current state, cancellation included.
    pub fn next_valid_states(&self, order: &Order) -> Vec<OrderState> {
        let mut states = order.state().allowed_targets().to_vec();
        if self.can_cancel(order) {
            states.push(OrderState::Cancelled);
        }
        states
    }

    pub fn can_cancel(&self, order: &Order) -> bool {
        order.state().can_cancel()
    }

    /// Cancels the order if it is still new or preparing.
    pub fn cancel_order(&self, order: &mut Order) -> Result<(), OrderError> {
        order.transition_to(OrderState::Cancelled)
    }

    /// Validates an incoming `state` field.
    ///
    /// Rejects unknown names and, when `current` is given, states that the
    /// order cannot reach.
    pub fn parse_state_field(
        &self,
        value: &str,
        current: Option<&Order>,
    ) -> Result<OrderState, ValidationErrors> {
        let state = value.parse::<OrderState>().map_err(|_| {
            ValidationErrors::single("state", format!("must be one of: {}", join(&OrderState::ALL)))
        })?;

        let Some(order) = current else {
            return Ok(state);
        };
        if !order.can_transition_to(state) {
            let valid = self.next_valid_states(order);
            let valid = if valid.is_empty() {
                "none".to_string()
            } else {
                join(&valid)
            };
            return Err(ValidationErrors::single(
                "state",
                format!(
                    "cannot move from {} to {}; valid next states: {}",
                    order.state(),
                    state,
                    valid
                ),
            ));
        }

        Ok(state)
    }
}

fn join(states: &[OrderState]) -> String {
    states
        .iter()
        .map(OrderState::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::order::Money;

    fn order_in(state: OrderState) -> Order {
        let mut order = Order::new(None, 2, Money::zero(), Money::zero(), Utc::now());
        match state {
            OrderState::New => {}
            OrderState::Preparing => order.transition_to(OrderState::Preparing).unwrap(),
            OrderState::Ready => {
                order.transition_to(OrderState::Preparing).unwrap();
                order.transition_to(OrderState::Ready).unwrap();
            }
            OrderState::Served => order.transition_to(OrderState::Served).unwrap(),
            OrderState::Cancelled => order.transition_to(OrderState::Cancelled).unwrap(),
        }
        order
    }

    #[test]
    fn next_valid_states_include_cancel_when_allowed() {
        let service = OrderStateService::new();
        assert_eq!(
            service.next_valid_states(&order_in(OrderState::New)),
            vec![OrderState::Preparing, OrderState::Served, OrderState::Cancelled]
        );
        assert_eq!(
            service.next_valid_states(&order_in(OrderState::Ready)),
            vec![OrderState::Ready]
        );
        assert!(service.next_valid_states(&order_in(OrderState::Served)).is_empty());
    }

    #[test]
    fn cancel_only_from_new_or_preparing() {
        let service = OrderStateService::new();

        let mut preparing = order_in(OrderState::Preparing);
        service.cancel_order(&mut preparing).unwrap();
        assert_eq!(preparing.state(), OrderState::Cancelled);

        let mut ready = order_in(OrderState::Ready);
        assert!(!service.can_cancel(&ready));
        assert!(service.cancel_order(&mut ready).is_err());
        assert_eq!(ready.state(), OrderState::Ready);
    }

    #[test]
    fn validate_transition_reports_states() {
        let service = OrderStateService::new();
        let order = order_in(OrderState::Preparing);
        assert!(service.validate_transition(&order, OrderState::Ready).is_ok());
        assert_eq!(
            service.validate_transition(&order, OrderState::Served),
            Err(OrderError::InvalidTransition {
                from: OrderState::Preparing,
                to: OrderState::Served
            })
        );
    }

    #[test]
    fn parse_state_field_rejects_unknown_names() {
        let service = OrderStateService::new();
        let errors = service.parse_state_field("eaten", None).unwrap_err();
        assert_eq!(
            errors.errors()[0].message,
            "must be one of: new, preparing, ready, served, cancelled"
        );
        assert_eq!(
            service.parse_state_field("READY", None).unwrap(),
            OrderState::Ready
        );
    }

    #[test]
    fn parse_state_field_rejects_unreachable_states() {
        let service = OrderStateService::new();
        let order = order_in(OrderState::Ready);

        let errors = service
            .parse_state_field("served", Some(&order))
            .unwrap_err();
        assert_eq!(
            errors.errors()[0].message,
            "cannot move from ready to served; valid next states: ready"
        );

        let served = order_in(OrderState::Served);
        let errors = service.parse_state_field("new", Some(&served)).unwrap_err();
        assert!(errors.errors()[0].message.ends_with("valid next states: none"));
    }
}
