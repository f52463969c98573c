#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing, validation and table construction must reject bad input without panicking.
    let Ok(profile) = helios_config::load_toml(data) else {
        return;
    };
    if profile.validate().is_err() {
        return;
    }
    if let Ok((registry, _)) = profile.build_registry(std::path::Path::new("/nonexistent")) {
        for (_, table) in registry.iter() {
            let _ = table.interpolate(table.min_input() - 1.0);
            let _ = table.interpolate(table.max_input() + 1.0);
        }
    }
});
