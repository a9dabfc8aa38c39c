//! Unit tests for deferred action replay.

use rstest::rstest;

use super::{ActionScope, DeferredAction, DeferredQueue, ReplayTarget};
use crate::{MergeError, MergeResult};

#[derive(Default)]
struct Recorder {
    components: Vec<String>,
    applied: Vec<String>,
    fail_on: Option<String>,
}

impl ReplayTarget for Recorder {
    fn registered_components(&self) -> Vec<String> {
        self.components.clone()
    }

    fn apply(&mut self, action: &DeferredAction, component: Option<&str>) -> MergeResult<()> {
        let label = match action {
            DeferredAction::MapFilterAllServlets { filter, .. } => {
                format!("{filter}->{}", component.unwrap_or("?"))
            }
            DeferredAction::AddListener { class } => {
                self.components.push(format!("{class}Servlet"));
                format!("listener {class}")
            }
            other => format!("{other:?}"),
        };
        if self.fail_on.as_deref() == Some(label.as_str()) {
            return Err(MergeError::invariant_arc(label));
        }
        self.applied.push(label);
        Ok(())
    }
}

fn wildcard(filter: &str) -> DeferredAction {
    DeferredAction::MapFilterAllServlets {
        filter: filter.to_owned(),
        dispatchers: Vec::new(),
    }
}

fn listener(class: &str) -> DeferredAction {
    DeferredAction::AddListener {
        class: class.to_owned(),
    }
}

#[rstest]
#[case::wildcard(wildcard("audit"), ActionScope::AllComponents)]
#[case::listener(listener("Boot"), ActionScope::Single)]
fn actions_report_their_scope(#[case] action: DeferredAction, #[case] expected: ActionScope) {
    assert_eq!(action.scope(), expected);
}

#[test]
fn all_component_actions_fan_out_in_registration_order() {
    let mut queue = DeferredQueue::default();
    queue.enqueue(wildcard("audit"));
    let mut target = Recorder {
        components: vec!["b".to_owned(), "a".to_owned(), "c".to_owned()],
        ..Recorder::default()
    };
    assert!(queue.replay(&mut target).is_ok());
    assert_eq!(target.applied, ["audit->b", "audit->a", "audit->c"]);
}

#[test]
fn later_actions_see_components_registered_by_earlier_ones() {
    let mut queue = DeferredQueue::default();
    queue.enqueue(wildcard("first"));
    queue.enqueue(listener("Boot"));
    queue.enqueue(wildcard("second"));
    let mut target = Recorder {
        components: vec!["a".to_owned()],
        ..Recorder::default()
    };
    assert!(queue.replay(&mut target).is_ok());
    assert_eq!(
        target.applied,
        ["first->a", "listener Boot", "second->a", "second->BootServlet"]
    );
}

#[test]
fn replay_stops_at_first_failure() {
    let mut queue = DeferredQueue::default();
    queue.enqueue(listener("One"));
    queue.enqueue(listener("Two"));
    queue.enqueue(listener("Three"));
    let mut target = Recorder {
        fail_on: Some("listener Two".to_owned()),
        ..Recorder::default()
    };
    assert!(queue.replay(&mut target).is_err());
    assert_eq!(target.applied, ["listener One"]);
}
