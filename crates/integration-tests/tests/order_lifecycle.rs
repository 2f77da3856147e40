//! Integration tests for the order status lifecycle.
//!
//! The state machine is a straight line with an early exit:
//! pending → processing → delivering → completed, with cancellation
//! allowed from pending or processing only.

use prato_core::OrderStatus;

// =============================================================================
// Forward Transitions
// =============================================================================

#[test]
fn test_happy_path_transitions() {
    let path = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
    ];

    for window in path.windows(2) {
        let [from, to] = window else {
            panic!("windows(2) yields pairs");
        };
        assert!(
            from.can_transition_to(*to),
            "{from} should transition to {to}"
        );
    }
}

#[test]
fn test_no_skipping_ahead() {
    assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivering));
    assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
    assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
}

#[test]
fn test_no_going_back() {
    assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
    assert!(!OrderStatus::Delivering.can_transition_to(OrderStatus::Processing));
    assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Delivering));
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancellation_only_before_delivery() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Canceled));
    assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Canceled));

    assert!(!OrderStatus::Delivering.can_transition_to(OrderStatus::Canceled));
    assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Canceled));
    assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::Canceled));
}

// =============================================================================
// Terminal States
// =============================================================================

#[test]
fn test_terminal_states_allow_nothing() {
    let all = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Canceled,
    ];

    for terminal in [OrderStatus::Completed, OrderStatus::Canceled] {
        assert!(terminal.is_terminal());
        for next in all {
            assert!(
                !terminal.can_transition_to(next),
                "{terminal} should not transition to {next}"
            );
        }
    }
}

#[test]
fn test_non_terminal_states() {
    assert!(!OrderStatus::Pending.is_terminal());
    assert!(!OrderStatus::Processing.is_terminal());
    assert!(!OrderStatus::Delivering.is_terminal());
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_status_serializes_lowercase() {
    let json = serde_json::to_string(&OrderStatus::Delivering).expect("serialize");
    assert_eq!(json, "\"delivering\"");

    let back: OrderStatus = serde_json::from_str("\"canceled\"").expect("deserialize");
    assert_eq!(back, OrderStatus::Canceled);
}

#[test]
fn test_default_status_is_pending() {
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
}
