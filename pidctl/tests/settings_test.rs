use pidctl::{BigRational, Duration, Settings};

#[test]
fn test_default_config_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/default.toml");
    let settings = Settings::from_path(path).unwrap();

    assert_eq!(settings.logger.level, "info");

    let controller = settings.controller.build();
    assert_eq!(controller.p(), Some(&BigRational::from_integer(1.into())));
    assert_eq!(controller.i(), Some(&BigRational::new(1.into(), 10.into())));
    assert_eq!(controller.d(), Some(&BigRational::new(1.into(), 4.into())));
    assert_eq!(controller.min(), Some(&BigRational::from_integer((-100).into())));
    assert_eq!(controller.max(), Some(&BigRational::from_integer(100.into())));
    assert_eq!(controller.cycle(), Duration::SECOND);
}

#[test]
fn test_missing_config_file() {
    let result = Settings::from_path("configs/does-not-exist.toml");
    assert!(matches!(result, Err(pidctl::Error::Config(_))));
}
