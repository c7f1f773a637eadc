use tokio::sync::watch;

/// Unique identifier for each wizard step, in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Hosts,
    Osds,
    Services,
    Review,
}

impl StepId {
    pub const ALL: [StepId; 4] = [StepId::Hosts, StepId::Osds, StepId::Services, StepId::Review];

    pub fn title(&self) -> &'static str {
        match self {
            StepId::Hosts => "Add Hosts",
            StepId::Osds => "Create OSDs",
            StepId::Services => "Create Services",
            StepId::Review => "Review",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            StepId::Hosts => "Hosts",
            StepId::Osds => "OSDs",
            StepId::Services => "Services",
            StepId::Review => "Review",
        }
    }

    /// Step for a 1-based wizard index
    pub fn from_index(index: usize) -> Option<StepId> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Result of completing a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepResult {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Position in the wizard. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub index: usize,
    pub title: String,
}

/// Step-tracking service.
///
/// Owns the ordered step list and publishes the current step to subscribers.
pub struct WizardSteps {
    titles: Vec<String>,
    current: watch::Sender<WizardStep>,
}

impl WizardSteps {
    /// An empty title list yields a single untitled step.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        if titles.is_empty() {
            titles.push(String::new());
        }
        let (current, _) = watch::channel(WizardStep {
            index: 1,
            title: titles[0].clone(),
        });
        Self { titles, current }
    }

    /// The four cluster expansion steps
    pub fn expansion() -> Self {
        Self::new(StepId::ALL.iter().map(StepId::title))
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardStep> {
        self.current.subscribe()
    }

    pub fn current(&self) -> WizardStep {
        self.current.borrow().clone()
    }

    pub fn total_steps(&self) -> usize {
        self.titles.len()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn is_first_step(&self) -> bool {
        self.current.borrow().index == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current.borrow().index == self.titles.len()
    }

    pub fn move_to_next_step(&self) {
        let index = self.current.borrow().index;
        if index < self.titles.len() {
            self.move_to(index + 1);
        }
    }

    pub fn move_to_previous_step(&self) {
        let index = self.current.borrow().index;
        if index > 1 {
            self.move_to(index - 1);
        }
    }

    fn move_to(&self, index: usize) {
        self.current.send_replace(WizardStep {
            index,
            title: self.titles[index - 1].clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_steps() {
        let steps = WizardSteps::expansion();
        assert_eq!(steps.total_steps(), 4);
        assert_eq!(steps.current().title, "Add Hosts");
        assert!(steps.is_first_step());
        assert!(!steps.is_last_step());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let steps = WizardSteps::new(["a", "b"]);
        steps.move_to_previous_step();
        assert_eq!(steps.current().index, 1);
        steps.move_to_next_step();
        steps.move_to_next_step();
        assert_eq!(steps.current(), WizardStep { index: 2, title: "b".to_string() });
        assert!(steps.is_last_step());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let steps = WizardSteps::expansion();
        let mut rx = steps.subscribe();
        assert!(!rx.has_changed().unwrap());
        steps.move_to_next_step();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().title, "Create OSDs");
    }

    #[test]
    fn test_step_from_index() {
        assert_eq!(StepId::from_index(0), None);
        assert_eq!(StepId::from_index(1), Some(StepId::Hosts));
        assert_eq!(StepId::from_index(4), Some(StepId::Review));
        assert_eq!(StepId::from_index(5), None);
    }
}
