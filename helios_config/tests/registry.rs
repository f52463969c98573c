use std::fs;

use helios_config::{load_profile, load_toml};
use helios_core::{ExtrapolationPolicy, RegistryError};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn builds_tables_and_bindings_from_profile() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("tables")).unwrap();
    fs::write(
        dir.path().join("tables/rotor.csv"),
        "input,output\n88.0,287.0\n99.0,312.0\n",
    )
    .unwrap();
    let profile_path = dir.path().join("profile.toml");
    fs::write(
        &profile_path,
        r#"
[[table]]
name = "rotor"
min = [0.0, 0.0]
max = [110.0, 346.5]
points = [[33.0, 110.0], [55.0, 182.0]]
csv = "tables/rotor.csv"

[[table]]
name = "trim"
builtin = "trim_indicator"

[[table]]
name = "oil"
min = [0.0, 0.0]
max = [100.0, 270.0]
extrapolation = "clamp"

[[gauge]]
id = "rotor_main"
table = "rotor"
device = "Rotor"
element = "RPM"

[[gauge]]
id = "rotor_repeater"
table = "rotor"
device = "Rotor"
element = "RPM"

[[gauge]]
id = "trim"
table = "trim"
device = "Controls"
element = "Trim"
"#,
    )
    .unwrap();

    let profile = load_profile(&profile_path).unwrap();
    let (registry, bindings) = profile.build_registry(dir.path()).unwrap();

    assert_eq!(registry.len(), 3);
    let rotor = registry.get("rotor").unwrap();
    assert_eq!(rotor.len(), 6);
    assert_eq!(rotor.interpolate(44.0), 146.0);
    assert_eq!(rotor.interpolate(99.0), 312.0);
    assert_eq!(registry.interpolate("trim", -7.0), Ok(0.0));
    let oil = registry.get("oil").unwrap();
    assert_eq!(oil.extrapolation(), ExtrapolationPolicy::Clamp);
    assert_eq!(oil.interpolate(150.0), 270.0);

    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings.lookup("Rotor", "RPM").len(), 2);
    assert_eq!(bindings.lookup("Controls", "Trim")[0].table, "trim");
}

#[rstest]
#[case("clamp", 0.0)]
#[case("extend", -14.4)]
fn builtin_table_honours_extrapolation(#[case] policy: &str, #[case] expected: f64) {
    let p = load_toml(&format!(
        "[[table]]\nname = \"asi\"\nbuiltin = \"airspeed_indicator\"\nextrapolation = \"{policy}\"\n"
    ))
    .unwrap();
    p.validate().unwrap();
    let (registry, _) = p.build_registry(std::path::Path::new(".")).unwrap();
    let asi = registry.get("asi").unwrap();
    assert!((asi.interpolate(-10.0) - expected).abs() < 1e-9);
    assert_eq!(asi.interpolate(125.0), 180.0);
}

#[rstest]
fn duplicate_breakpoint_reports_table_name() {
    let p = load_toml(
        "[[table]]\nname = \"bad\"\nmin = [0.0, 0.0]\nmax = [10.0, 1.0]\npoints = [[5.0, 0.4], [5.0, 0.6]]\n",
    )
    .unwrap();
    let err = p.build_registry(std::path::Path::new(".")).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("building table 'bad'"), "{chain}");
    assert!(chain.contains("duplicate calibration input 5"), "{chain}");
}

#[rstest]
fn missing_csv_reports_path() {
    let dir = tempdir().unwrap();
    let p = load_toml(
        "[[table]]\nname = \"t\"\nmin = [0.0, 0.0]\nmax = [10.0, 1.0]\ncsv = \"absent.csv\"\n",
    )
    .unwrap();
    let err = p.build_registry(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("open calibration CSV"));
}

#[rstest]
fn duplicate_gauge_is_a_validation_error_before_registry() {
    let p = load_toml(
        "[[table]]\nname = \"t\"\nbuiltin = \"rotor_rpm\"\n[[gauge]]\nid = \"g\"\ntable = \"t\"\ndevice = \"d\"\nelement = \"e\"\n[[gauge]]\nid = \"g\"\ntable = \"t\"\ndevice = \"d\"\nelement = \"e\"\n",
    )
    .unwrap();
    let err = p.build_registry(std::path::Path::new(".")).unwrap_err();
    assert!(err.downcast_ref::<RegistryError>().is_none());
    assert!(format!("{err}").contains("defined more than once"));
}

#[rstest]
fn load_profile_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[[table]\nname = 1").unwrap();
    let err = load_profile(&path).unwrap_err();
    assert!(format!("{err}").contains("invalid profile TOML"));
}
