//! Merge semantics: append-only messages, last-writer-wins scalars, purity.

use proptest::prelude::*;

use imagineer::message::{Message, Role};
use imagineer::state::{MessageCategory, StateUpdate, StepStatus, WorkflowState};

#[test]
fn merge_does_not_mutate_base() {
    let base = WorkflowState::new_with_user_message("draw a cat");
    let snapshot = base.clone();

    let _ = base.merge(
        StateUpdate::new()
            .with_message(Message::assistant("done"))
            .with_status(StepStatus::Completed)
            .with_error("boom"),
    );

    assert_eq!(base, snapshot);
}

#[test]
fn merge_applies_full_update() {
    let base = WorkflowState::new_with_user_message("draw a cat");
    let merged = base.merge(
        StateUpdate::new()
            .with_category(MessageCategory::Image)
            .with_refined_prompt("a cat, golden hour lighting, highly detailed")
            .with_image_urls(vec!["https://img.example/0.png".into()])
            .with_status(StepStatus::Completed)
            .with_message(Message::assistant("Generated 1 image(s) from your prompt.")),
    );

    assert_eq!(merged.category, Some(MessageCategory::Image));
    assert_eq!(
        merged.refined_prompt.as_deref(),
        Some("a cat, golden hour lighting, highly detailed")
    );
    assert_eq!(merged.image_urls.len(), 1);
    assert_eq!(merged.status, StepStatus::Completed);
    assert_eq!(merged.messages.len(), 2);
}

#[test]
fn later_writers_win_per_field() {
    let state = WorkflowState::new_with_user_message("x")
        .merge(StateUpdate::new().with_refined_prompt("first"))
        .merge(StateUpdate::new().with_refined_prompt("second"));
    assert_eq!(state.refined_prompt.as_deref(), Some("second"));
}

#[test]
fn error_capture_then_clear_round_trip() {
    let failed = WorkflowState::new_with_user_message("x")
        .merge(StateUpdate::new().with_status(StepStatus::Error).with_error("boom"));
    assert_eq!(failed.error.as_deref(), Some("boom"));
    assert_eq!(failed.status, StepStatus::Error);

    let recovered = failed.merge(
        StateUpdate::new()
            .with_status(StepStatus::Completed)
            .clear_error(),
    );
    assert!(recovered.error.is_none());
    assert_eq!(recovered.status, StepStatus::Completed);
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), "[a-zA-Z0-9 ]{0,24}").prop_map(|(role, content)| Message::new(role, content))
}

fn arb_category() -> impl Strategy<Value = Option<MessageCategory>> {
    prop_oneof![
        Just(None),
        Just(Some(MessageCategory::Image)),
        Just(Some(MessageCategory::Chat)),
    ]
}

fn arb_status() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Pending),
        Just(StepStatus::InProgress),
        Just(StepStatus::Completed),
        Just(StepStatus::Error),
    ]
}

prop_compose! {
    fn arb_state()(
        messages in proptest::collection::vec(arb_message(), 0..4),
        category in arb_category(),
        refined_prompt in proptest::option::of("[a-z ,]{0,32}"),
        image_urls in proptest::collection::vec("[a-z./:]{0,16}", 0..3),
        status in arb_status(),
        error in proptest::option::of("[a-z ]{0,16}"),
    ) -> WorkflowState {
        WorkflowState { messages, category, refined_prompt, image_urls, status, error }
    }
}

proptest! {
    #[test]
    fn empty_update_is_identity_for_any_state(state in arb_state()) {
        let merged = state.merge(StateUpdate::default());
        prop_assert_eq!(merged, state);
    }

    #[test]
    fn merge_never_drops_existing_messages(state in arb_state(), appended in proptest::collection::vec(arb_message(), 0..3)) {
        let before = state.messages.len();
        let merged = state.merge(StateUpdate::new().with_messages(appended.clone()));
        prop_assert_eq!(merged.messages.len(), before + appended.len());
        prop_assert_eq!(&merged.messages[..before], &state.messages[..]);
    }
}
