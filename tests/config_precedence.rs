#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

fn flrt2html_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_flrt2html"));
    cmd.env("HOME", home);
    cmd.env_remove("FLRT2HTML_CONFIG");
    cmd.env_remove("FLRT2HTML_APAR_URL");
    cmd.env_remove("FLRT2HTML_APAR_MAX_AGE_DAYS");
    cmd.env_remove("FLRT2HTML_FLRTVC");
    cmd.env_remove("FLRT2HTML_UI_COLOR");
    cmd
}

fn make_temp_dir(tag: &str) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "flrt2html-config-test-{tag}-{}-{seq}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").expect("touch");
}

fn write_stub_analyzer(dir: &Path, name: &str, score: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    let body = format!(
        "#!/bin/sh\nprintf 'c0|c1|c2|c3|c4|c5|c6|c7|c8|c9\\n'\nprintf 'a|b|c|d|e|f|IV1|g|h|{score}\\n'\n"
    );
    std::fs::write(&path, body).expect("write stub analyzer");
    let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

#[test]
fn analyzer_command_from_home_config_is_used() {
    let home = make_temp_dir("home");
    let work = make_temp_dir("work");
    touch(&work, "hostA_lslpp.info");
    touch(&work, "hostA_emgr.info");
    let stub = write_stub_analyzer(&work, "from_config.sh", "1.0");

    let config_dir = home.join(".config/flrt2html");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[analyzer]\ncommand = \"{}\"\n", stub.display()),
    )
    .expect("write config");

    let out = flrt2html_cmd(&home)
        .args(["-s", "-d"])
        .arg(&work)
        .arg("--quiet")
        .output()
        .expect("run flrt2html");
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report = std::fs::read_to_string(work.join("hostA.html")).expect("report exists");
    assert!(report.contains("<td class=\"bg-active\">1.0</td>"));

    let _ = std::fs::remove_dir_all(&home);
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn env_override_beats_config_file() {
    let home = make_temp_dir("home");
    let work = make_temp_dir("work");
    touch(&work, "hostA_lslpp.info");
    touch(&work, "hostA_emgr.info");
    let config_stub = write_stub_analyzer(&work, "from_config.sh", "1.0");
    let env_stub = write_stub_analyzer(&work, "from_env.sh", "9.3");

    let config_dir = home.join(".config/flrt2html");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[analyzer]\ncommand = \"{}\"\n", config_stub.display()),
    )
    .expect("write config");

    let out = flrt2html_cmd(&home)
        .env("FLRT2HTML_FLRTVC", &env_stub)
        .args(["-s", "-d"])
        .arg(&work)
        .arg("--quiet")
        .output()
        .expect("run flrt2html");
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report = std::fs::read_to_string(work.join("hostA.html")).expect("report exists");
    assert!(report.contains("<td class=\"bg-danger\">9.3</td>"));

    let _ = std::fs::remove_dir_all(&home);
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn explicit_config_path_via_env_is_honored() {
    let home = make_temp_dir("home");
    let work = make_temp_dir("work");
    touch(&work, "hostA_lslpp.info");
    touch(&work, "hostA_emgr.info");
    let stub = write_stub_analyzer(&work, "explicit.sh", "6.0");

    let config_path = work.join("custom.toml");
    std::fs::write(
        &config_path,
        format!("[analyzer]\ncommand = \"{}\"\n", stub.display()),
    )
    .expect("write config");

    let out = flrt2html_cmd(&home)
        .env("FLRT2HTML_CONFIG", &config_path)
        .args(["-s", "-d"])
        .arg(&work)
        .arg("--quiet")
        .output()
        .expect("run flrt2html");
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report = std::fs::read_to_string(work.join("hostA.html")).expect("report exists");
    assert!(report.contains("<td class=\"bg-warning\">6.0</td>"));

    let _ = std::fs::remove_dir_all(&home);
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn broken_config_file_exits_2() {
    let home = make_temp_dir("home");
    let work = make_temp_dir("work");
    let config_path = work.join("broken.toml");
    std::fs::write(&config_path, "[analyzer\n").expect("write config");

    let out = flrt2html_cmd(&home)
        .env("FLRT2HTML_CONFIG", &config_path)
        .args(["-s", "-d"])
        .arg(&work)
        .output()
        .expect("run flrt2html");
    assert_eq!(out.status.code(), Some(2));

    let _ = std::fs::remove_dir_all(&home);
    let _ = std::fs::remove_dir_all(&work);
}
