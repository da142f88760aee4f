use std::env;
use std::fs;

use pidctl::{BigRational, Duration, Settings};

fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(numer.into(), denom.into())
}

// Environment and working directory are process-wide, so this file holds a
// single test.
#[test]
fn test_layered_settings() {
    let root = env::temp_dir().join(format!("pidctl_settings_{}", std::process::id()));
    let configs = root.join("configs");
    fs::create_dir_all(&configs).unwrap();

    fs::write(
        configs.join("default.toml"),
        r#"
        [logger]
        level = "info"

        [controller]
        p = 4
        d = "1/4"
        setpoint = 1
        min = -10
        max = 10
        "#,
    )
    .unwrap();
    fs::write(
        configs.join("staging.toml"),
        r#"
        [logger]
        level = "debug"

        [controller]
        setpoint = "5/2"
        "#,
    )
    .unwrap();

    unsafe {
        env::set_var("RUN_MODE", "staging");
        env::set_var("PIDCTL__CONTROLLER__P", "1/3");
        env::set_var("PIDCTL__CONTROLLER__MAX", "0.5");
        env::set_var("PIDCTL__CONTROLLER__CYCLE_SECS", "2");
    }
    env::set_current_dir(&root).unwrap();

    let settings = Settings::new().unwrap();
    assert_eq!(settings.logger.level, "debug");

    let controller = settings.controller.build();
    // Environment beats both files, the overlay beats the default file.
    assert_eq!(controller.p(), Some(&ratio(1, 3)));
    assert_eq!(controller.max(), Some(&ratio(1, 2)));
    assert_eq!(controller.cycle(), Duration::seconds(2));
    assert_eq!(controller.setpoint(), Some(&ratio(5, 2)));
    assert_eq!(controller.d(), Some(&ratio(1, 4)));
    assert_eq!(controller.min(), Some(&ratio(-10, 1)));
    assert!(controller.i().is_none());

    // Without the overlay only the default file and the environment apply.
    let settings = Settings::from_dir(&configs, "production").unwrap();
    assert_eq!(settings.logger.level, "info");

    let controller = settings.controller.build();
    assert_eq!(controller.p(), Some(&ratio(1, 3)));
    assert_eq!(controller.setpoint(), Some(&ratio(1, 1)));

    unsafe {
        env::set_var("PIDCTL__CONTROLLER__MAX", "1/0");
    }
    assert!(Settings::from_dir(&configs, "production").is_err());

    fs::remove_dir_all(&root).unwrap();
}
