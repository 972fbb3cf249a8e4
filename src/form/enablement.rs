//! Enable/disable toggles for scalar fields

use tracing::debug;

use super::control::{Control, ControlKind};
use super::options::FormOptions;

/// Checkbox deciding whether a field is sent.
///
/// Unchecking disables every physical control of the field; a disabled
/// control keeps its state but its getter reports absence.
#[derive(Clone, Debug)]
pub struct EnableToggle {
    control: Control,
    title: String,
    required: bool,
    targets: Vec<Control>,
}

impl EnableToggle {
    pub(crate) fn new(field_id: &str, required: bool, options: &FormOptions, targets: Vec<Control>) -> Self {
        let control = Control::new(format!("{}#enabled", field_id), ControlKind::Checkbox)
            .with_required(required);
        control.set_checked(true);
        if required {
            // Fixed on: the checkbox itself cannot be interacted with
            control.set_disabled(true);
        }

        let title = if required {
            options.required_tips.clone()
        } else {
            options.disable_tips.clone()
        };

        Self {
            control,
            title,
            required,
            targets,
        }
    }

    pub fn set_checked(&self, checked: bool) {
        if self.required {
            debug!("Ignoring toggle on required field '{}'", self.control.id());
            return;
        }
        self.control.set_checked(checked);
        for target in &self.targets {
            target.set_disabled(!checked);
        }
    }

    pub fn is_checked(&self) -> bool {
        self.control.is_checked()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn control(&self) -> &Control {
        &self.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio(id: &str) -> Control {
        Control::new(id, ControlKind::Radio).with_group("op-status")
    }

    #[test]
    fn test_unchecking_disables_every_target() {
        let targets = vec![radio("op-status:a"), radio("op-status:b")];
        let toggle = EnableToggle::new("op-status", false, &FormOptions::default(), targets.clone());

        assert!(toggle.is_checked());
        assert_eq!(toggle.title(), "Uncheck to not send the parameter");

        toggle.set_checked(false);
        assert!(targets.iter().all(Control::is_disabled));

        toggle.set_checked(true);
        assert!(targets.iter().all(|c| !c.is_disabled()));
    }

    #[test]
    fn test_required_toggle_stays_enabled() {
        let target = Control::new("op-name", ControlKind::Text);
        let toggle = EnableToggle::new("op-name", true, &FormOptions::default(), vec![target.clone()]);

        toggle.set_checked(false);
        assert!(toggle.is_checked());
        assert!(!target.is_disabled());
        assert!(toggle.control().is_disabled());
        assert_eq!(toggle.title(), "This parameter is Required");
        assert_eq!(toggle.control().id(), "op-name#enabled");
    }
}
