//! ## larm-core::alert
//! **Concrete alert records and their field presets**
//!
//! An [`Alert`] is an immutable value. Timing fields are forwarded to the
//! rendering side untouched; the engine itself only reads `priority` and
//! `min_dwell`.

use std::borrow::Cow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::events::EventId;

/// Alert priority, higher wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Priority {
    Lowest = 0,
    Lower = 1,
    Low = 2,
    Mid = 3,
    High = 4,
    Highest = 5,
}

impl Priority {
    pub const fn level(self) -> u8 {
        self as u8
    }

    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Priority::Lowest),
            1 => Some(Priority::Lower),
            2 => Some(Priority::Low),
            3 => Some(Priority::Mid),
            4 => Some(Priority::High),
            5 => Some(Priority::Highest),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertStatus {
    #[default]
    Normal,
    UserPrompt,
    Critical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertSize {
    #[default]
    None,
    Small,
    Mid,
    Full,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualAlert {
    #[default]
    None,
    Fcw,
    SteerRequired,
    BrakePressed,
    WrongGear,
    SeatbeltUnbuckled,
    SpeedTooHigh,
    Ldw,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudibleAlert {
    #[default]
    None,
    ChimeEngage,
    ChimeDisengage,
    ChimeError,
    ChimeWarning1,
    ChimeWarning2,
    ChimeWarningRepeat,
    ChimePrompt,
    ChimeWarning2Repeat,
    ChimeSlowingDownSpeed,
    ChimeAutoHoldOn,
}

/// Which event and category produced a resolved alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertOrigin {
    pub event: EventId,
    pub category: Category,
}

/// A concrete, displayable alert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub text1: Cow<'static, str>,
    pub text2: Cow<'static, str>,
    pub status: AlertStatus,
    pub size: AlertSize,
    pub priority: Priority,
    pub visual: VisualAlert,
    pub audible: AudibleAlert,
    pub duration_sound: Duration,
    pub duration_hud: Duration,
    pub duration_text: Duration,
    /// Repeat cadence owned by the renderer; 0 means one-shot.
    pub rate: f32,
    /// How long the owning event must stay active before the alert may surface.
    pub min_dwell: Duration,
    /// Set by the arbiter when the alert is resolved.
    pub origin: Option<AlertOrigin>,
}

/// Shorthand for millisecond durations in alert definitions.
#[inline]
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

impl Alert {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        text1: impl Into<Cow<'static, str>>,
        text2: impl Into<Cow<'static, str>>,
        status: AlertStatus,
        size: AlertSize,
        priority: Priority,
        visual: VisualAlert,
        audible: AudibleAlert,
        duration_sound: Duration,
        duration_hud: Duration,
        duration_text: Duration,
    ) -> Self {
        Self {
            text1: text1.into(),
            text2: text2.into(),
            status,
            size,
            priority,
            visual,
            audible,
            duration_sound,
            duration_hud,
            duration_text,
            rate: 0.0,
            min_dwell: Duration::ZERO,
            origin: None,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_min_dwell(mut self, min_dwell: Duration) -> Self {
        self.min_dwell = min_dwell;
        self
    }

    pub fn with_text1(mut self, text1: impl Into<Cow<'static, str>>) -> Self {
        self.text1 = text1.into();
        self
    }

    pub fn with_audible(mut self, audible: AudibleAlert) -> Self {
        self.audible = audible;
        self
    }

    pub fn with_visual(mut self, visual: VisualAlert) -> Self {
        self.visual = visual;
        self
    }

    pub fn with_hud_duration(mut self, duration: Duration) -> Self {
        self.duration_hud = duration;
        self
    }

    pub fn with_text_duration(mut self, duration: Duration) -> Self {
        self.duration_text = duration;
        self
    }

    pub(crate) fn stamped(mut self, origin: AlertOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Engagement refused.
    pub fn no_entry(text2: impl Into<Cow<'static, str>>) -> Self {
        Alert::new(
            "Assist Unavailable",
            text2,
            AlertStatus::Normal,
            AlertSize::Mid,
            Priority::Low,
            VisualAlert::None,
            AudibleAlert::ChimeError,
            ms(400),
            ms(2000),
            ms(3000),
        )
    }

    /// Assist will disengage shortly; driver must take over.
    pub fn soft_disable(text2: impl Into<Cow<'static, str>>) -> Self {
        Alert::new(
            "TAKE CONTROL IMMEDIATELY",
            text2,
            AlertStatus::Critical,
            AlertSize::Full,
            Priority::Mid,
            VisualAlert::SteerRequired,
            AudibleAlert::ChimeWarningRepeat,
            ms(100),
            ms(2000),
            ms(2000),
        )
    }

    /// Soft disable caused by something the driver did.
    pub fn user_soft_disable(text2: impl Into<Cow<'static, str>>) -> Self {
        Alert::soft_disable(text2).with_text1("Assist will disengage")
    }

    pub fn immediate_disable(text2: impl Into<Cow<'static, str>>) -> Self {
        Alert::new(
            "TAKE CONTROL IMMEDIATELY",
            text2,
            AlertStatus::Critical,
            AlertSize::Full,
            Priority::Highest,
            VisualAlert::SteerRequired,
            AudibleAlert::ChimeWarningRepeat,
            ms(2200),
            ms(3000),
            ms(4000),
        )
    }

    /// Chime-only alert for engage/disengage transitions.
    pub fn engagement(audible: AudibleAlert) -> Self {
        Alert::new(
            "",
            "",
            AlertStatus::Normal,
            AlertSize::None,
            Priority::Mid,
            VisualAlert::None,
            audible,
            ms(200),
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    /// Background banner shown in every state.
    pub fn normal_permanent(
        text1: impl Into<Cow<'static, str>>,
        text2: impl Into<Cow<'static, str>>,
    ) -> Self {
        let text2 = text2.into();
        let size = if text2.is_empty() {
            AlertSize::Small
        } else {
            AlertSize::Mid
        };
        Alert::new(
            text1,
            text2,
            AlertStatus::Normal,
            size,
            Priority::Lower,
            VisualAlert::None,
            AudibleAlert::None,
            Duration::ZERO,
            Duration::ZERO,
            ms(200),
        )
    }
}
