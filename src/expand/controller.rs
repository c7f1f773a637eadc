use tokio::sync::watch;
use tracing::debug;

use super::notify::{Outbox, Route};
use super::steps::{StepId, WizardStep, WizardSteps};

/// Outcome of the "next" button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(WizardStep),
    /// Already on the last step: the caller runs the submission
    Submit,
}

/// Outcome of the "back" button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retreat {
    Moved(WizardStep),
    /// Already on the first step: navigated away from the wizard
    Left(Route),
}

/// Wizard navigation on top of an injected step tracker.
///
/// Holds a subscription to the tracker for its own view of the current step;
/// the subscription is released when the controller is dropped.
pub struct WizardController {
    steps: WizardSteps,
    current: watch::Receiver<WizardStep>,
    outbox: Outbox,
}

impl WizardController {
    pub fn new(steps: WizardSteps, outbox: Outbox) -> Self {
        let current = steps.subscribe();
        Self {
            steps,
            current,
            outbox,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current.borrow().clone()
    }

    pub fn current_step_id(&self) -> Option<StepId> {
        StepId::from_index(self.current.borrow().index)
    }

    pub fn steps(&self) -> &WizardSteps {
        &self.steps
    }

    pub fn is_first_step(&self) -> bool {
        self.steps.is_first_step()
    }

    pub fn is_last_step(&self) -> bool {
        self.steps.is_last_step()
    }

    pub fn advance_step(&mut self) -> Advance {
        if self.steps.is_last_step() {
            debug!("Last step reached, submitting");
            return Advance::Submit;
        }
        self.steps.move_to_next_step();
        Advance::Moved(self.current.borrow_and_update().clone())
    }

    pub fn retreat_step(&mut self) -> Retreat {
        if self.steps.is_first_step() {
            self.outbox.navigate(Route::Dashboard);
            return Retreat::Left(Route::Dashboard);
        }
        self.steps.move_to_previous_step();
        Retreat::Moved(self.current.borrow_and_update().clone())
    }

    pub fn submit_button_label(&self) -> &'static str {
        if self.steps.is_last_step() {
            "Expand Cluster"
        } else {
            "Next"
        }
    }

    pub fn cancel_button_label(&self) -> &'static str {
        if self.steps.is_first_step() {
            "Cancel"
        } else {
            "Back"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::ExpandMessage;

    fn controller() -> (WizardController, tokio::sync::mpsc::UnboundedReceiver<ExpandMessage>) {
        let (outbox, rx) = Outbox::channel();
        (WizardController::new(WizardSteps::expansion(), outbox), rx)
    }

    #[test]
    fn test_labels_follow_position() {
        let (mut ctl, _rx) = controller();
        assert_eq!(ctl.submit_button_label(), "Next");
        assert_eq!(ctl.cancel_button_label(), "Cancel");

        ctl.advance_step();
        assert_eq!(ctl.cancel_button_label(), "Back");

        ctl.advance_step();
        ctl.advance_step();
        assert_eq!(ctl.current_step_id(), Some(StepId::Review));
        assert_eq!(ctl.submit_button_label(), "Expand Cluster");
    }

    #[test]
    fn test_advance_from_last_step_submits() {
        let (mut ctl, mut rx) = controller();
        for _ in 0..3 {
            assert!(matches!(ctl.advance_step(), Advance::Moved(_)));
        }
        assert_eq!(ctl.advance_step(), Advance::Submit);
        assert_eq!(ctl.current_step().index, 4);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_retreat_from_first_step_navigates_to_dashboard() {
        let (mut ctl, mut rx) = controller();
        assert_eq!(ctl.retreat_step(), Retreat::Left(Route::Dashboard));
        assert!(matches!(
            rx.try_recv(),
            Ok(ExpandMessage::Navigate(Route::Dashboard))
        ));
        assert_eq!(ctl.current_step().index, 1);
    }

    #[test]
    fn test_retreat_moves_back() {
        let (mut ctl, mut rx) = controller();
        ctl.advance_step();
        match ctl.retreat_step() {
            Retreat::Moved(step) => assert_eq!(step.title, "Add Hosts"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}
