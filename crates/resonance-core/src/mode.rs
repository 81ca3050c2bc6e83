use serde::{Deserialize, Serialize};

/// Which conversation the strategist is having with the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Open questions about life and business.
    #[default]
    Chat,
    /// The user describes themselves and gets a synergy score back.
    Match,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Match => "match",
        }
    }

    /// The other mode; used by the toggle key.
    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Chat => Mode::Match,
            Mode::Match => Mode::Chat,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Chat => "Oracle Mode",
            Mode::Match => "Synergy Check",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Mode::Chat => "Ask the Silver Soul Strategist",
            Mode::Match => "Test your fit as the Integrator",
        }
    }

    /// Heading shown above a response produced in this mode.
    pub fn response_label(&self) -> &'static str {
        match self {
            Mode::Chat => "Strategist Response",
            Mode::Match => "Compatibility Report",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Mode::Chat => "Ask me anything (Life, Business, Universe)...",
            Mode::Match => "Describe your skills, work style, and personality...",
        }
    }

    /// Shown in the response area while there is nothing to display.
    pub fn idle_hint(&self) -> &'static str {
        match self {
            Mode::Chat => "Waiting for your signal...",
            Mode::Match => "Ready to analyze your profile...",
        }
    }
}
