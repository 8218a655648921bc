//! ## larm-catalog::stock
//! **The stock event table**
//!
//! Event ids follow definition order below. Overlays append after the last
//! stock event, so stock ids never move.

use std::time::Duration;

use larm_core::alert::{ms, Alert, AlertSize, AlertStatus, AudibleAlert, Priority, VisualAlert};
use larm_core::{AlertTemplate, Catalog, CatalogBuilder, CatalogError, TemplateError, UnitSystem};
use larm_core::Category::*;

use crate::context::{CarParams, LiveSnapshot};
use crate::generators as gen;

pub type StockCatalog = Catalog<CarParams, LiveSnapshot>;
pub type StockBuilder = CatalogBuilder<CarParams, LiveSnapshot>;
pub type StockTemplate = AlertTemplate<CarParams, LiveSnapshot>;

type StockGenerator = fn(&CarParams, &LiveSnapshot, UnitSystem) -> Result<Alert, TemplateError>;

fn generated(min_dwell: Duration, generator: StockGenerator) -> StockTemplate {
    AlertTemplate::generated(min_dwell, generator)
}

fn dynamic(generator: StockGenerator) -> StockTemplate {
    generated(Duration::ZERO, generator)
}

#[allow(clippy::too_many_arguments)]
fn alert(
    text1: &'static str,
    text2: &'static str,
    status: AlertStatus,
    size: AlertSize,
    priority: Priority,
    visual: VisualAlert,
    audible: AudibleAlert,
    sound: u64,
    hud: u64,
    text: u64,
) -> Alert {
    Alert::new(
        text1,
        text2,
        status,
        size,
        priority,
        visual,
        audible,
        ms(sound),
        ms(hud),
        ms(text),
    )
}

fn small_banner(text1: &'static str, priority: Priority) -> Alert {
    alert(
        text1,
        "",
        AlertStatus::Normal,
        AlertSize::Small,
        priority,
        VisualAlert::None,
        AudibleAlert::None,
        0,
        0,
        200,
    )
}

fn cancelled(text2: &'static str) -> Alert {
    alert(
        "Assist Canceled",
        text2,
        AlertStatus::Normal,
        AlertSize::Mid,
        Priority::High,
        VisualAlert::None,
        AudibleAlert::ChimeDisengage,
        400,
        2000,
        3000,
    )
}

fn disengage() -> Alert {
    Alert::engagement(AudibleAlert::ChimeDisengage)
}

/// Builder pre-loaded with every stock event, ready for overlays.
pub fn stock_builder() -> StockBuilder {
    use AlertSize as Size;
    use AlertStatus as Status;
    use AudibleAlert as Sound;
    use VisualAlert as Visual;

    let mut b = StockBuilder::new();

    // log-only
    b.define("stockFcw");

    // shown in every state
    b.define("joystickDebug")
        .on(Warning, dynamic(gen::joystick))
        .on(
            Permanent,
            alert("Joystick Mode", "", Status::Normal, Size::Small, Priority::Lower, Visual::None, Sound::None, 0, 0, 100),
        );
    b.define("controlsInitializing")
        .on(NoEntry, Alert::no_entry("System Initializing"));
    b.define("startup").on(
        Permanent,
        alert(
            "Be ready to take over at any time",
            "Always keep hands on wheel and eyes on road",
            Status::Normal,
            Size::Mid,
            Priority::Lower,
            Visual::None,
            Sound::None,
            0,
            0,
            5000,
        ),
    );
    b.define("startupMaster")
        .on(Permanent, dynamic(gen::startup_untested));
    b.define("startupNoControl").on(
        Permanent,
        alert(
            "Dashcam mode",
            "Always keep hands on wheel and eyes on road",
            Status::Normal,
            Size::Mid,
            Priority::Lower,
            Visual::None,
            Sound::None,
            0,
            0,
            10_000,
        ),
    );
    b.define("startupNoCar").on(
        Permanent,
        alert(
            "Dashcam mode for unsupported car",
            "Always keep hands on wheel and eyes on road",
            Status::Normal,
            Size::Mid,
            Priority::Lower,
            Visual::None,
            Sound::None,
            0,
            0,
            10_000,
        ),
    );
    b.define("startupFuzzyFingerprint")
        .on(Permanent, dynamic(gen::startup_fuzzy_fingerprint));
    b.define("startupNoFw").on(
        Permanent,
        alert("Car Unrecognized", "Check All Connections", Status::UserPrompt, Size::Mid, Priority::Lower, Visual::None, Sound::None, 0, 0, 10_000),
    );
    b.define("dashcamMode")
        .on(Permanent, small_banner("Dashcam Mode", Priority::Lowest));
    b.define("invalidLkasSetting").on(
        Permanent,
        alert("Stock LKAS is on", "Turn off stock LKAS to engage", Status::Normal, Size::Mid, Priority::Lower, Visual::None, Sound::None, 0, 0, 200),
    );
    b.define("communityFeatureDisallowed").on(
        Permanent,
        alert(
            "Assist Unavailable",
            "Enable Community Features in Settings",
            Status::Normal,
            Size::Mid,
            Priority::Low,
            Visual::None,
            Sound::None,
            0,
            0,
            200,
        ),
    );
    b.define("carUnrecognized").on(
        Permanent,
        alert("Dashcam Mode", "Car Unrecognized", Status::Normal, Size::Mid, Priority::Lowest, Visual::None, Sound::None, 0, 0, 200),
    );
    b.define("stockAeb")
        .on(
            Permanent,
            alert("BRAKE!", "Stock AEB: Risk of Collision", Status::Critical, Size::Full, Priority::Highest, Visual::Fcw, Sound::None, 1000, 2000, 2000),
        )
        .on(NoEntry, Alert::no_entry("Stock AEB: Risk of Collision"));
    b.define("fcw").on(
        Permanent,
        alert("BRAKE!", "Risk of Collision", Status::Critical, Size::Full, Priority::Highest, Visual::Fcw, Sound::ChimeWarningRepeat, 1000, 2000, 2000),
    );
    b.define("ldw").on(
        Permanent,
        alert("Lane Departure Detected", "", Status::Normal, Size::Mid, Priority::Low, Visual::Ldw, Sound::ChimePrompt, 1000, 2000, 3000),
    );

    // shown while engaged
    b.define("gasPressed").on(
        PreEnable,
        alert("Release Gas Pedal to Engage", "", Status::Normal, Size::Small, Priority::Lowest, Visual::None, Sound::None, 0, 0, 100)
            .with_min_dwell(ms(1000)),
    );
    b.define("vehicleModelInvalid")
        .on(NoEntry, Alert::no_entry("Vehicle Parameter Identification Failed"))
        .on(SoftDisable, Alert::soft_disable("Vehicle Parameter Identification Failed"))
        .on(
            Warning,
            alert(
                "Vehicle Parameter Identification Failed",
                "",
                Status::Normal,
                Size::Small,
                Priority::Lowest,
                Visual::SteerRequired,
                Sound::None,
                0,
                0,
                100,
            ),
        );
    b.define("steerTempUnavailableSilent").on(
        Warning,
        alert("Steering Temporarily Unavailable", "", Status::UserPrompt, Size::Small, Priority::Low, Visual::SteerRequired, Sound::ChimePrompt, 1000, 1000, 1000),
    );
    b.define("preDriverDistracted").on(
        Warning,
        alert("Pay Attention", "", Status::Normal, Size::Small, Priority::Low, Visual::None, Sound::None, 0, 100, 100),
    );
    b.define("promptDriverDistracted").on(
        Warning,
        alert("Pay Attention", "Driver Distracted", Status::UserPrompt, Size::Mid, Priority::Mid, Visual::SteerRequired, Sound::ChimeWarning2Repeat, 100, 100, 100),
    );
    b.define("driverDistracted").on(
        Warning,
        alert("DISENGAGE IMMEDIATELY", "Driver Distracted", Status::Critical, Size::Full, Priority::High, Visual::SteerRequired, Sound::ChimeWarningRepeat, 100, 100, 100),
    );
    b.define("preDriverUnresponsive").on(
        Warning,
        alert("Touch Steering Wheel: No Face Detected", "", Status::Normal, Size::Small, Priority::Low, Visual::SteerRequired, Sound::None, 0, 100, 100)
            .with_rate(0.75),
    );
    b.define("promptDriverUnresponsive").on(
        Warning,
        alert("Touch Steering Wheel", "Driver Unresponsive", Status::UserPrompt, Size::Mid, Priority::Mid, Visual::SteerRequired, Sound::ChimeWarning2Repeat, 100, 100, 100),
    );
    b.define("driverUnresponsive").on(
        Warning,
        alert("DISENGAGE IMMEDIATELY", "Driver Unresponsive", Status::Critical, Size::Full, Priority::High, Visual::SteerRequired, Sound::ChimeWarningRepeat, 100, 100, 100),
    );
    b.define("preKeepHandsOnWheel").on(
        Warning,
        alert("No hands on steering wheel detected", "", Status::UserPrompt, Size::Small, Priority::Mid, Visual::SteerRequired, Sound::None, 0, 100, 100)
            .with_rate(0.75),
    );
    b.define("promptKeepHandsOnWheel").on(
        Warning,
        alert(
            "HANDS OFF STEERING WHEEL",
            "Place hands on steering wheel",
            Status::Critical,
            Size::Mid,
            Priority::Mid,
            Visual::SteerRequired,
            Sound::ChimeWarning2Repeat,
            100,
            100,
            100,
        )
        .with_rate(0.75),
    );
    b.define("keepHandsOnWheel").on(
        ImmediateDisable,
        Alert::immediate_disable("Driver kept hands off steering wheel"),
    );
    b.define("manualRestart").on(
        Warning,
        alert("TAKE CONTROL", "Resume Driving Manually", Status::UserPrompt, Size::Mid, Priority::Low, Visual::None, Sound::None, 0, 0, 200),
    );
    b.define("belowSteerSpeed")
        .on(Warning, dynamic(gen::below_steer_speed));
    b.define("preLaneChangeLeft")
        .on(Warning, dynamic(gen::pre_lane_change));
    b.define("preLaneChangeRight")
        .on(Warning, dynamic(gen::pre_lane_change));
    b.define("laneChangeBlocked").on(
        Warning,
        alert("Car Detected in Blindspot", "", Status::UserPrompt, Size::Small, Priority::Low, Visual::None, Sound::ChimePrompt, 100, 100, 100),
    );
    b.define("laneChange").on(Warning, dynamic(gen::lane_change));
    b.define("steerSaturated").on(
        Warning,
        alert("Take Control", "Turn Exceeds Steering Limit", Status::UserPrompt, Size::Mid, Priority::Low, Visual::SteerRequired, Sound::ChimePrompt, 1000, 1000, 1000),
    );
    b.define("signalLost").on(
        Warning,
        alert(
            "Data signal lost",
            "No map-based curve braking or auto speed limits",
            Status::UserPrompt,
            Size::Mid,
            Priority::Low,
            Visual::SteerRequired,
            Sound::ChimePrompt,
            1000,
            1000,
            5000,
        ),
    );
    b.define("signalRestored").on(
        Warning,
        alert("Data signal restored", "", Status::Normal, Size::Small, Priority::Low, Visual::SteerRequired, Sound::None, 1000, 1000, 5000),
    );
    b.define("resumeRequired").on(
        Warning,
        alert("Go time!", "Tap gas or press resume", Status::UserPrompt, Size::Mid, Priority::Low, Visual::SteerRequired, Sound::ChimeWarning1, 1000, 1000, 3000),
    );
    b.define("fanMalfunction")
        .on(Permanent, Alert::normal_permanent("Fan Malfunction", "Contact Support"));
    b.define("cameraMalfunction")
        .on(Permanent, Alert::normal_permanent("Camera Malfunction", "Contact Support"));
    b.define("gpsMalfunction")
        .on(Permanent, Alert::normal_permanent("GPS Malfunction", "Contact Support"));
    b.define("localizerMalfunction")
        .on(Permanent, Alert::normal_permanent("Sensor Malfunction", "Contact Support"));
    b.define("speedLimitActive").on(
        Warning,
        alert("Cruise set to speed limit", "", Status::Normal, Size::Small, Priority::Low, Visual::None, Sound::None, 1000, 0, 2000),
    );
    b.define("speedLimitValueChange").on(
        Warning,
        alert("Adjusting speed to match new speed limit", "", Status::Normal, Size::Small, Priority::Low, Visual::None, Sound::None, 1000, 0, 2000),
    );

    // state transitions
    b.define("pcmEnable")
        .on(Enable, Alert::engagement(Sound::ChimeEngage));
    b.define("buttonEnable")
        .on(Enable, Alert::engagement(Sound::ChimeEngage));
    b.define("pcmDisable").on(UserDisable, disengage());
    b.define("buttonCancel").on(UserDisable, disengage());
    b.define("buttonMainCancel")
        .on(UserDisable, disengage())
        .on(ResetCruiseSetpoint, Alert::engagement(Sound::None));
    b.define("brakeHold")
        .on(UserDisable, disengage())
        .on(NoEntry, Alert::no_entry("Brake Hold Active"));
    b.define("parkBrake")
        .on(UserDisable, disengage())
        .on(NoEntry, Alert::no_entry("Parking Brake Engaged"));
    b.define("pedalPressed")
        .on(UserDisable, disengage())
        .on(NoEntry, Alert::no_entry("Pedal Pressed").with_visual(Visual::BrakePressed));
    b.define("wrongCarMode")
        .on(UserDisable, disengage())
        .on(NoEntry, dynamic(gen::wrong_car_mode));
    b.define("wrongCruiseMode")
        .on(UserDisable, disengage())
        .on(NoEntry, Alert::no_entry("Adaptive Cruise Disabled"));
    b.define("steerTempUnavailable")
        .on(SoftDisable, Alert::soft_disable("Steering Temporarily Unavailable"))
        .on(
            NoEntry,
            Alert::no_entry("Steering Temporarily Unavailable").with_hud_duration(Duration::ZERO),
        );
    b.define("outOfSpace")
        .on(Permanent, small_banner("Out of Storage", Priority::Lower))
        .on(
            NoEntry,
            Alert::no_entry("Out of Storage Space").with_hud_duration(Duration::ZERO),
        );
    b.define("belowEngageSpeed")
        .on(NoEntry, Alert::no_entry("Speed Too Low"));
    b.define("sensorDataInvalid")
        .on(
            Permanent,
            alert("No Data from Device Sensors", "Reboot your Device", Status::Normal, Size::Mid, Priority::Lower, Visual::None, Sound::None, 0, 0, 200)
                .with_min_dwell(ms(1000)),
        )
        .on(NoEntry, Alert::no_entry("No Data from Device Sensors"));
    b.define("noGps")
        .on(Permanent, generated(Duration::from_secs(300), gen::no_gps));
    b.define("soundsUnavailable")
        .on(Permanent, Alert::normal_permanent("Speaker not found", "Reboot your Device"))
        .on(NoEntry, Alert::no_entry("Speaker not found"));
    b.define("tooDistracted")
        .on(NoEntry, Alert::no_entry("Distraction Level Too High"));
    b.define("overheat")
        .on(Permanent, small_banner("System Overheated", Priority::Lower))
        .on(SoftDisable, Alert::soft_disable("System Overheated"))
        .on(NoEntry, Alert::no_entry("System Overheated"));
    b.define("wrongGear")
        .on(SoftDisable, Alert::user_soft_disable("Gear not D"))
        .on(NoEntry, Alert::no_entry("Gear not D"));
    b.define("calibrationInvalid")
        .on(
            Permanent,
            Alert::normal_permanent("Calibration Invalid", "Remount Device and Recalibrate"),
        )
        .on(
            SoftDisable,
            Alert::soft_disable("Calibration Invalid: Remount Device & Recalibrate"),
        )
        .on(
            NoEntry,
            Alert::no_entry("Calibration Invalid: Remount Device & Recalibrate"),
        );
    b.define("calibrationIncomplete")
        .on(Permanent, dynamic(gen::calibration_incomplete))
        .on(SoftDisable, Alert::soft_disable("Calibration in Progress"))
        .on(NoEntry, Alert::no_entry("Calibration in Progress"));
    b.define("doorOpen")
        .on(SoftDisable, Alert::user_soft_disable("Door Open"))
        .on(NoEntry, Alert::no_entry("Door Open"));
    b.define("seatbeltNotLatched")
        .on(SoftDisable, Alert::user_soft_disable("Seatbelt Unlatched"))
        .on(NoEntry, Alert::no_entry("Seatbelt Unlatched"));
    b.define("espDisabled")
        .on(SoftDisable, Alert::soft_disable("ESP Off"))
        .on(NoEntry, Alert::no_entry("ESP Off"));
    b.define("lowBattery")
        .on(SoftDisable, Alert::soft_disable("Low Battery"))
        .on(NoEntry, Alert::no_entry("Low Battery"));
    b.define("commIssue")
        .on(SoftDisable, dynamic(gen::comm_issue))
        .on(NoEntry, dynamic(gen::comm_issue_no_entry));
    b.define("processNotRunning").on(
        NoEntry,
        Alert::no_entry("System Malfunction: Reboot Your Device").with_audible(Sound::ChimeDisengage),
    );
    b.define("radarFault")
        .on(SoftDisable, dynamic(gen::radar_fault))
        .on(NoEntry, dynamic(gen::radar_fault_no_entry));
    b.define("modeldLagging")
        .on(SoftDisable, Alert::soft_disable("Driving model lagging"))
        .on(NoEntry, Alert::no_entry("Driving model lagging"));
    b.define("posenetInvalid")
        .on(SoftDisable, Alert::soft_disable("Model Output Uncertain"))
        .on(NoEntry, Alert::no_entry("Model Output Uncertain"));
    b.define("deviceFalling")
        .on(SoftDisable, Alert::soft_disable("Device Fell Off Mount"))
        .on(NoEntry, Alert::no_entry("Device Fell Off Mount"));
    b.define("lowMemory")
        .on(SoftDisable, Alert::soft_disable("Low Memory: Reboot Your Device"))
        .on(Permanent, Alert::normal_permanent("Low Memory", "Reboot your Device"))
        .on(
            NoEntry,
            Alert::no_entry("Low Memory: Reboot Your Device").with_audible(Sound::ChimeDisengage),
        );
    b.define("highCpuUsage").on(
        NoEntry,
        Alert::no_entry("System Malfunction: Reboot Your Device").with_audible(Sound::ChimeDisengage),
    );
    b.define("accFaulted")
        .on(ImmediateDisable, Alert::immediate_disable("Cruise Faulted"))
        .on(Permanent, Alert::normal_permanent("Cruise Faulted", ""))
        .on(NoEntry, Alert::no_entry("Cruise Faulted"));
    b.define("controlsMismatch")
        .on(ImmediateDisable, Alert::immediate_disable("Controls Mismatch"));
    for (name, text) in [
        ("roadCameraError", "Road Camera Error"),
        ("driverCameraError", "Driver Camera Error"),
        ("wideRoadCameraError", "Wide Road Camera Error"),
    ] {
        b.define(name).on(
            Permanent,
            Alert::normal_permanent(text, "").with_text_duration(ms(10_000)),
        );
    }
    b.define("usbError")
        .on(SoftDisable, Alert::soft_disable("USB Error: Reboot Your Device"))
        .on(Permanent, Alert::normal_permanent("USB Error: Reboot Your Device", ""))
        .on(NoEntry, Alert::no_entry("USB Error: Reboot Your Device"));
    b.define("canError")
        .on(ImmediateDisable, Alert::immediate_disable("CAN Error: Check Connections"))
        .on(
            Permanent,
            small_banner("CAN Error: Check Connections", Priority::Low).with_min_dwell(ms(1000)),
        )
        .on(NoEntry, Alert::no_entry("CAN Error: Check Connections"));
    b.define("steerUnavailable")
        .on(ImmediateDisable, Alert::immediate_disable("LKAS Fault: Restart the Car"))
        .on(
            Permanent,
            small_banner("LKAS Fault: Restart the car to engage", Priority::Lower),
        )
        .on(NoEntry, Alert::no_entry("LKAS Fault: Restart the Car"));
    b.define("brakeUnavailable")
        .on(ImmediateDisable, Alert::immediate_disable("Cruise Fault: Restart the Car"))
        .on(
            Permanent,
            small_banner("Cruise Fault: Restart the car to engage", Priority::Lower),
        )
        .on(NoEntry, Alert::no_entry("Cruise Fault: Restart the Car"));
    b.define("reverseGear")
        .on(
            Permanent,
            alert("Reverse gear", "", Status::Normal, Size::Mid, Priority::Lowest, Visual::None, Sound::None, 0, 0, 200)
                .with_min_dwell(ms(500)),
        )
        .on(ImmediateDisable, Alert::immediate_disable("Reverse Gear"))
        .on(NoEntry, Alert::no_entry("Reverse Gear"));
    b.define("cruiseDisabled")
        .on(ImmediateDisable, Alert::immediate_disable("Cruise Is Off"));
    b.define("plannerError")
        .on(ImmediateDisable, Alert::immediate_disable("Planner Solution Error"))
        .on(NoEntry, Alert::no_entry("Planner Solution Error"));
    b.define("relayMalfunction")
        .on(ImmediateDisable, Alert::immediate_disable("Harness Malfunction"))
        .on(Permanent, Alert::normal_permanent("Harness Malfunction", "Check Hardware"))
        .on(NoEntry, Alert::no_entry("Harness Malfunction"));
    b.define("noTarget")
        .on(ImmediateDisable, cancelled("No close lead car"))
        .on(NoEntry, Alert::no_entry("No Close Lead Car"));
    b.define("speedTooLow")
        .on(ImmediateDisable, cancelled("Speed too low"));
    b.define("speedTooHigh")
        .on(
            Warning,
            alert(
                "Speed Too High",
                "Model uncertain at this speed",
                Status::UserPrompt,
                Size::Mid,
                Priority::High,
                Visual::SteerRequired,
                Sound::ChimeWarning2Repeat,
                2200,
                3000,
                4000,
            ),
        )
        .on(
            NoEntry,
            alert("Speed Too High", "Slow down to engage", Status::Normal, Size::Mid, Priority::Low, Visual::None, Sound::ChimeError, 400, 2000, 3000),
        );
    b.define("lowSpeedLockout")
        .on(
            Permanent,
            small_banner("Cruise Fault: Restart the car to engage", Priority::Lower),
        )
        .on(NoEntry, Alert::no_entry("Cruise Fault: Restart the Car"));
    b.define("autoHoldActivated")
        .on(Permanent, dynamic(gen::auto_hold));
    b.define("stoppedWaitForGas")
        .on(Permanent, dynamic(gen::stopped));
    b.define("blinkerSteeringPaused").on(
        Warning,
        alert(
            "Autosteer paused for low-speed blinker",
            "Low-speed blinker",
            Status::UserPrompt,
            Size::Small,
            Priority::Low,
            Visual::SteerRequired,
            Sound::None,
            0,
            400,
            300,
        )
        .with_min_dwell(ms(500)),
    );
    b.define("pauseLongOnGasPress").on(
        Permanent,
        alert("Manual gas control", "", Status::Normal, Size::Small, Priority::Low, Visual::None, Sound::None, 0, 3000, 300),
    );
    b.define("slowingDownSpeed").on(
        Permanent,
        alert("Slowing down", "", Status::Normal, Size::Small, Priority::Mid, Visual::None, Sound::None, 100, 0, 0),
    );
    b.define("slowingDownSpeedSound").on(
        Permanent,
        alert("Slowing down", "", Status::Normal, Size::Small, Priority::Mid, Visual::None, Sound::ChimeSlowingDownSpeed, 3000, 0, 0),
    );

    b
}

/// The stock catalog with no overlays applied.
pub fn stock_catalog() -> Result<StockCatalog, CatalogError> {
    stock_builder().build()
}
