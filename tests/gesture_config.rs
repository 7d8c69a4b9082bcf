use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use gesture_kernel::config::GestureConfig;
use gesture_kernel::{GestureId, GestureSet};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "GESTURE_CONFIG",
        "GESTURE_MAX_PLAYERS",
        "GESTURE_COOLDOWN_MS",
        "GESTURE_BYPASS_FORBIDDEN",
        "GESTURE_DEBUG",
        "GESTURE_GESTURES",
        "GESTURE_SOURCE",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = GestureConfig::load().expect("load config");
    assert_eq!(cfg.settings.max_players, 1);
    assert_eq!(cfg.settings.cooldown, Duration::ZERO);
    assert!(!cfg.settings.bypass_forbidden);
    assert!(!cfg.settings.debug);
    assert_eq!(cfg.settings.gestures, GestureSet::all());
    assert_eq!(cfg.source.uri, "stub://wave_right_hand");
    assert_eq!(cfg.source.target_fps, 30);
    assert_eq!(cfg.source.seed, None);
}

#[test]
fn loads_json_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".json",
        r#"{
            "max_players": 4,
            "cooldown_ms": 250,
            "bypass_forbidden": true,
            "gestures": ["wave_right_hand", "swipe_down_right_hand"],
            "source": {
                "uri": "recordings/session.jsonl",
                "target_fps": 15,
                "jitter": 0.005,
                "seed": 42
            }
        }"#,
    );

    std::env::set_var("GESTURE_CONFIG", file.path());
    std::env::set_var("GESTURE_COOLDOWN_MS", "400");
    std::env::set_var("GESTURE_DEBUG", "true");
    std::env::set_var("GESTURE_SOURCE", "stub://zoom_in");

    let cfg = GestureConfig::load().expect("load config");

    assert_eq!(cfg.settings.max_players, 4);
    assert_eq!(cfg.settings.cooldown, Duration::from_millis(400));
    assert!(cfg.settings.bypass_forbidden);
    assert!(cfg.settings.debug);
    assert_eq!(
        cfg.settings.gestures,
        GestureSet::from([GestureId::WaveRightHand, GestureId::SwipeDownRightHand])
    );
    assert_eq!(cfg.source.uri, "stub://zoom_in");
    assert_eq!(cfg.source.target_fps, 15);
    assert_eq!(cfg.source.jitter, 0.005);
    assert_eq!(cfg.source.seed, Some(42));

    clear_env();
}

#[test]
fn loads_toml_file_by_extension() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".toml",
        r#"
max_players = 2
gestures = ["zoom_in", "zoom_out"]

[source]
uri = "stub://joined_hands"
target_fps = 60
"#,
    );
    std::env::set_var("GESTURE_CONFIG", file.path());
    std::env::set_var("GESTURE_GESTURES", "joined_hands, ZoomIn");

    let cfg = GestureConfig::load().expect("load config");
    assert_eq!(cfg.settings.max_players, 2);
    assert_eq!(
        cfg.settings.gestures,
        GestureSet::from([GestureId::JoinedHands, GestureId::ZoomIn])
    );
    assert_eq!(cfg.source.uri, "stub://joined_hands");
    assert_eq!(cfg.source.target_fps, 60);

    clear_env();
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("GESTURE_MAX_PLAYERS", "7");
    assert!(GestureConfig::load().is_err());

    std::env::set_var("GESTURE_MAX_PLAYERS", "two");
    assert!(GestureConfig::load().is_err());
    clear_env();

    std::env::set_var("GESTURE_BYPASS_FORBIDDEN", "sometimes");
    assert!(GestureConfig::load().is_err());
    clear_env();

    std::env::set_var("GESTURE_GESTURES", "wave_right_hand,moonwalk");
    let err = GestureConfig::load().expect_err("unknown gesture");
    assert!(format!("{:#}", err).contains("moonwalk"));
    clear_env();

    let file = write_config(".json", r#"{"source": {"target_fps": 0}}"#);
    std::env::set_var("GESTURE_CONFIG", file.path());
    assert!(GestureConfig::load().is_err());
    clear_env();

    let file = write_config(".json", r#"{"max_players": 2, "colour": "blue"}"#);
    std::env::set_var("GESTURE_CONFIG", file.path());
    let err = GestureConfig::load().expect_err("unknown field");
    assert!(err.to_string().contains("invalid config file"));

    clear_env();
}

#[test]
fn missing_config_file_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("GESTURE_CONFIG", "/nonexistent/gesture.json");
    let err = GestureConfig::load().expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));

    clear_env();
}
