/// Dynamic status bar state that can be updated by content panels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "i: insert  Tab: fields")
    pub left_hint: String,
    /// Right side hint text (e.g., "n: Next  p: Back")
    pub right_hint: String,
}

impl StatusBarState {
    pub fn login_normal() -> Self {
        Self {
            left_hint: "j/k: fields  i: edit".to_string(),
            right_hint: "Enter: log in  :quit".to_string(),
        }
    }

    pub fn form_insert() -> Self {
        Self {
            left_hint: "Type to enter text".to_string(),
            right_hint: "Esc: normal  Tab: next field".to_string(),
        }
    }

    pub fn welcome() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter: Expand Cluster  s: Skip".to_string(),
        }
    }

    /// Wizard hints, with the controller's button labels on the right
    pub fn wizard(left_hint: &str, submit_label: &str, cancel_label: &str) -> Self {
        Self {
            left_hint: left_hint.to_string(),
            right_hint: format!("n: {submit_label}  p: {cancel_label}"),
        }
    }

    pub fn command_mode() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter: run  Esc: cancel".to_string(),
        }
    }

    pub fn confirm() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "y: continue  n: cancel".to_string(),
        }
    }

    pub fn finished() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Any key: exit".to_string(),
        }
    }

    pub fn executing() -> Self {
        Self {
            left_hint: "Please wait...".to_string(),
            right_hint: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wizard_hints_carry_button_labels() {
        let bar = StatusBarState::wizard("", "Expand Cluster", "Back");
        assert_eq!(bar.right_hint, "n: Expand Cluster  p: Back");
    }
}
