//! Parametric alerts of the stock catalog.
//!
//! Every function here is pure: it reads the parameters and snapshot and
//! builds a fresh alert.

use larm_core::alert::{ms, Alert, AlertSize, AlertStatus, AudibleAlert, Priority, VisualAlert};
use larm_core::{TemplateError, UnitSystem};

use crate::context::{CarParams, LaneChangeAlert, LiveSnapshot};

pub const MS_TO_KPH: f32 = 3.6;
pub const MS_TO_MPH: f32 = 2.236936;
pub const MPH_TO_MS: f32 = 0.44704;
/// Calibration only learns above this speed (m/s).
pub const MIN_SPEED_FILTER: f32 = 15.0 * MPH_TO_MS;

fn speed_in(units: UnitSystem, ms: f32) -> (f32, &'static str) {
    if units.is_metric() {
        (ms * MS_TO_KPH, "km/h")
    } else {
        (ms * MS_TO_MPH, "mph")
    }
}

/// `mm:ss`, or `hh:mm:ss` past an hour; `?` for -2 and `N/A` for other negatives.
pub fn format_stopped(seconds: i64) -> String {
    if seconds == -2 {
        return "?".into();
    }
    if seconds < 0 {
        return "N/A".into();
    }
    let (h, rest) = (seconds / 3600, seconds % 3600);
    let (m, s) = (rest / 60, rest % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

pub fn below_steer_speed(
    cp: &CarParams,
    _: &LiveSnapshot,
    units: UnitSystem,
) -> Result<Alert, TemplateError> {
    let (speed, unit) = speed_in(units, cp.min_steer_speed);
    let speed = speed.round() as i64;
    Ok(Alert::new(
        format!("TAKE CONTROL: No autosteer Below {speed} {unit}"),
        format!("Steer Unavailable Below {speed} {unit}"),
        AlertStatus::UserPrompt,
        AlertSize::Small,
        Priority::Mid,
        VisualAlert::SteerRequired,
        AudibleAlert::ChimePrompt,
        ms(0),
        ms(400),
        ms(300),
    ))
}

pub fn calibration_incomplete(
    _: &CarParams,
    live: &LiveSnapshot,
    units: UnitSystem,
) -> Result<Alert, TemplateError> {
    let percent = live
        .calibration_percent
        .ok_or(TemplateError::MissingField("calibration_percent"))?;
    let (speed, unit) = speed_in(units, MIN_SPEED_FILTER);
    Ok(Alert::new(
        format!("Calibration in Progress: {percent}%"),
        format!("Drive Above {} {unit}", speed.round() as i64),
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::Lowest,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(0),
        ms(200),
    ))
}

pub fn no_gps(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    let integrated = live
        .panda_type
        .ok_or(TemplateError::MissingField("panda_type"))?
        .has_integrated_gps();
    let (text1, text2) = if integrated {
        (
            "Poor GPS signal: see sky? Contact support",
            "If sky is visible, contact support",
        )
    } else {
        (
            "Poor GPS signal: check antenna",
            "Check GPS antenna placement",
        )
    };
    Ok(Alert::new(
        text1,
        text2,
        AlertStatus::Normal,
        AlertSize::Small,
        Priority::Lower,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(0),
        ms(200),
    ))
}

pub fn wrong_car_mode(cp: &CarParams, _: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    let text = if cp.car_name == "honda" {
        "Main Switch Off"
    } else {
        "Cruise Mode Disabled"
    };
    Ok(Alert::no_entry(text).with_hud_duration(ms(0)))
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

fn fingerprint_label(cp: &CarParams) -> String {
    title_case(&cp.car_fingerprint).chars().take(40).collect()
}

pub fn startup_fuzzy_fingerprint(
    cp: &CarParams,
    _: &LiveSnapshot,
    _: UnitSystem,
) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "WARNING: No Exact Match on Car Model",
        format!("Closest Match: {}", fingerprint_label(cp)),
        AlertStatus::UserPrompt,
        AlertSize::Mid,
        Priority::Lower,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(0),
        ms(10_000),
    ))
}

pub fn startup_untested(
    cp: &CarParams,
    _: &LiveSnapshot,
    _: UnitSystem,
) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "Hands on wheel | Eyes on road",
        format!("UNTESTED BRANCH on {}", fingerprint_label(cp)),
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::Lower,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(0),
        ms(10_000),
    ))
}

fn failing_services(live: &LiveSnapshot) -> String {
    live.invalid_services
        .iter()
        .chain(live.dead_services.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn comm_issue(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "Communication Issue between Processes",
        failing_services(live),
        AlertStatus::Critical,
        AlertSize::Mid,
        Priority::Mid,
        VisualAlert::SteerRequired,
        AudibleAlert::ChimeWarningRepeat,
        ms(100),
        ms(2000),
        ms(2000),
    ))
}

pub fn comm_issue_no_entry(
    _: &CarParams,
    live: &LiveSnapshot,
    _: UnitSystem,
) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "Communication Issue between Processes",
        failing_services(live),
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::Low,
        VisualAlert::None,
        AudibleAlert::ChimeDisengage,
        ms(400),
        ms(2000),
        ms(3000),
    ))
}

fn radar_errors(live: &LiveSnapshot) -> Result<String, TemplateError> {
    live.radar_errors
        .as_ref()
        .map(|errors| errors.join(", "))
        .ok_or(TemplateError::MissingField("radar_errors"))
}

pub fn radar_fault(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "Radar Error: Restart the Car",
        radar_errors(live)?,
        AlertStatus::Critical,
        AlertSize::Full,
        Priority::Mid,
        VisualAlert::SteerRequired,
        AudibleAlert::ChimeWarningRepeat,
        ms(100),
        ms(2000),
        ms(2000),
    ))
}

pub fn radar_fault_no_entry(
    _: &CarParams,
    live: &LiveSnapshot,
    _: UnitSystem,
) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        "Radar Error: Restart the Car",
        radar_errors(live)?,
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::Low,
        VisualAlert::None,
        AudibleAlert::ChimeError,
        ms(400),
        ms(2000),
        ms(3000),
    ))
}

pub fn pre_lane_change(
    _: &CarParams,
    live: &LiveSnapshot,
    units: UnitSystem,
) -> Result<Alert, TemplateError> {
    let lc = live
        .lane_change
        .ok_or(TemplateError::MissingField("lane_change"))?;
    let dir = lc.direction.as_str();
    let mut text1 = format!("Steer {dir} to Start Lane Change Once Safe");
    let text2 = match lc.alert {
        LaneChangeAlert::NudgelessBlockedNoLane => {
            format!("(auto lane change blocked: no {dir} lane)")
        }
        LaneChangeAlert::NudgelessCountdown => {
            text1 = format!("Steer or wait for {dir} lane change in {:.1}s", lc.countdown);
            String::new()
        }
        LaneChangeAlert::NudgelessBlockedOncoming => {
            format!("(auto lane change blocked: oncoming traffic in {dir} lane)")
        }
        LaneChangeAlert::NudgelessBlockedTimeout => "(auto lane change timed out)".into(),
        LaneChangeAlert::NudgelessBlockedMinSpeed => format!(
            "(no auto lane change below {})",
            if units.is_metric() { "65kph" } else { "40mph" }
        ),
        LaneChangeAlert::NudgelessBlockedOnePedal => {
            "(no auto lane change in one-pedal mode)".into()
        }
        _ => String::new(),
    };

    let alert = if text2.is_empty() {
        Alert::new(
            text1,
            text2,
            AlertStatus::Normal,
            AlertSize::Small,
            Priority::Low,
            VisualAlert::None,
            AudibleAlert::None,
            ms(0),
            ms(100),
            ms(100),
        )
        .with_rate(0.75)
    } else {
        Alert::new(
            text1,
            text2,
            AlertStatus::UserPrompt,
            AlertSize::Mid,
            Priority::Low,
            VisualAlert::None,
            AudibleAlert::None,
            ms(0),
            ms(100),
            ms(100),
        )
    };
    Ok(alert)
}

pub fn lane_change(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    let lc = live
        .lane_change
        .ok_or(TemplateError::MissingField("lane_change"))?;
    let dir = lc.direction.as_str();
    let text2 = match lc.alert {
        LaneChangeAlert::NudgeWarningNoLane => format!("(Warning: no {dir} lane)"),
        LaneChangeAlert::NudgeWarningOncoming => {
            format!("(Warning: oncoming traffic in {dir} lane)")
        }
        _ => String::new(),
    };
    let (status, size) = if text2.is_empty() {
        (AlertStatus::Normal, AlertSize::Small)
    } else {
        (AlertStatus::UserPrompt, AlertSize::Mid)
    };
    Ok(Alert::new(
        "Changing Lanes",
        text2,
        status,
        size,
        Priority::Low,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(100),
        ms(100),
    ))
}

fn seconds_stopped(live: &LiveSnapshot) -> Result<String, TemplateError> {
    live.seconds_stopped
        .map(format_stopped)
        .ok_or(TemplateError::MissingField("seconds_stopped"))
}

pub fn auto_hold(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        format!("AutoHolding for {} | Gas to resume", seconds_stopped(live)?),
        "You can rest your foot now.",
        AlertStatus::Normal,
        AlertSize::Small,
        Priority::Lower,
        VisualAlert::None,
        AudibleAlert::ChimeAutoHoldOn,
        ms(3000),
        ms(0),
        ms(0),
    ))
}

pub fn stopped(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    Ok(Alert::new(
        format!("Stopped for {} | Gas to resume", seconds_stopped(live)?),
        "You can rest your foot now.",
        AlertStatus::Normal,
        AlertSize::Small,
        Priority::Lower,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(400),
        ms(300),
    ))
}

pub fn joystick(_: &CarParams, live: &LiveSnapshot, _: UnitSystem) -> Result<Alert, TemplateError> {
    let axes = live
        .joystick_axes
        .as_deref()
        .ok_or(TemplateError::MissingField("joystick_axes"))?;
    let (gas, steer) = match axes {
        [gas, steer, ..] => (*gas, *steer),
        _ => (0.0, 0.0),
    };
    Ok(Alert::new(
        "Joystick Mode",
        format!(
            "Gas: {}%, Steer: {}%",
            (gas * 100.0).round() as i64,
            (steer * 100.0).round() as i64
        ),
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::Low,
        VisualAlert::None,
        AudibleAlert::None,
        ms(0),
        ms(0),
        ms(100),
    ))
}
