use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Start,
    Stop,
    Reset,
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PowerAction::Start => write!(f, "start"),
            PowerAction::Stop => write!(f, "stop"),
            PowerAction::Reset => write!(f, "reset"),
        }
    }
}

/// Requested state of an HA registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaState {
    Started,
    Disabled,
}

impl fmt::Display for HaState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            HaState::Started => write!(f, "started"),
            HaState::Disabled => write!(f, "disabled"),
        }
    }
}

#[test]
fn test_power_action_enum_display_trait() {
    assert_eq!("reset".to_string(), PowerAction::Reset.to_string())
}

#[test]
fn test_ha_state_enum_display_trait() {
    assert_eq!("disabled".to_string(), HaState::Disabled.to_string())
}
