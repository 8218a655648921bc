//! Static parameters and live snapshot read by the stock generators.
//!
//! Both are plain data filled in by the caller once per tick (snapshot) or
//! once per drive (parameters). Optional fields model signals that may not
//! have arrived yet; a generator that needs one reports
//! `TemplateError::MissingField`.

use serde::{Deserialize, Serialize};

/// Vehicle parameters fixed for the drive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarParams {
    /// Brand family, e.g. `honda`.
    pub car_name: String,
    /// Fingerprinted model, e.g. `HONDA CIVIC 2016`.
    pub car_fingerprint: String,
    /// Minimum speed for lateral control (m/s).
    pub min_steer_speed: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PandaType {
    #[default]
    Unknown,
    WhitePanda,
    GreyPanda,
    BlackPanda,
    Pedal,
    Uno,
    Dos,
    RedPanda,
}

impl PandaType {
    /// Boards with an on-board GPS receiver.
    pub fn has_integrated_gps(self) -> bool {
        matches!(self, PandaType::Uno | PandaType::Dos)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneChangeDirection {
    #[default]
    None,
    Left,
    Right,
}

impl LaneChangeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LaneChangeDirection::Left => "left",
            _ => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneChangeAlert {
    #[default]
    None,
    NudgelessBlockedNoLane,
    NudgelessCountdown,
    NudgelessBlockedOncoming,
    NudgelessBlockedTimeout,
    NudgelessBlockedMinSpeed,
    NudgelessBlockedOnePedal,
    NudgeWarningNoLane,
    NudgeWarningOncoming,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneChange {
    pub direction: LaneChangeDirection,
    pub alert: LaneChangeAlert,
    /// Seconds until an automatic lane change starts.
    pub countdown: f32,
}

/// Read-only view of the vehicle state for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSnapshot {
    pub calibration_percent: Option<u8>,
    pub panda_type: Option<PandaType>,
    /// Services publishing invalid data.
    pub invalid_services: Vec<String>,
    /// Services that stopped publishing.
    pub dead_services: Vec<String>,
    pub radar_errors: Option<Vec<String>>,
    pub lane_change: Option<LaneChange>,
    /// `-2` unknown, negative otherwise unavailable.
    pub seconds_stopped: Option<i64>,
    pub joystick_axes: Option<Vec<f32>>,
}
