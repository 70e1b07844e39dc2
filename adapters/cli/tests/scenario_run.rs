use std::process::Command;

#[test]
fn builtin_scenario_prints_a_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_sinking-hotel"))
        .args(["--duration", "30", "--tick-ms", "100", "--seed", "7"])
        .output()
        .expect("failed to run the sinking-hotel binary");

    assert!(output.status.success(), "run should succeed: {output:?}");
    let stdout = String::from_utf8(output.stdout).expect("summary is utf-8");
    assert!(stdout.starts_with("simulated 30.0s over 300 ticks"));
    assert!(stdout.contains("money $"));
    assert!(stdout.contains("guests:"));
}

#[test]
fn missing_scenario_file_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_sinking-hotel"))
        .args(["--scenario", "does-not-exist.toml"])
        .output()
        .expect("failed to run the sinking-hotel binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"));
}

#[test]
fn zero_tick_length_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_sinking-hotel"))
        .args(["--tick-ms", "0"])
        .output()
        .expect("failed to run the sinking-hotel binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--tick-ms must be positive"));
}
