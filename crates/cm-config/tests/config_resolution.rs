//! Configuration resolution order tests (CLI > env > XDG > defaults).

use cm_config::resolve::ENV_CONFIG_PATH;
use cm_config::{load_config, resolve_config_path, ConfigSource};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.keys.iter().zip(self.saved.iter()) {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

fn write_config(path: &Path, base_url: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        format!(r#"{{"schema_version":"1.0.0","api":{{"base_url":"{}"}}}}"#, base_url),
    )
    .unwrap();
}

#[test]
fn env_path_beats_xdg() {
    let _lock = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, "XDG_CONFIG_HOME"]);

    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("explicit.json");
    write_config(&env_file, "http://from-env:1");
    let xdg = dir.path().join("xdg");
    write_config(&xdg.join("contact-manager").join("config.json"), "http://from-xdg:1");

    env::set_var(ENV_CONFIG_PATH, &env_file);
    env::set_var("XDG_CONFIG_HOME", &xdg);

    let loaded = load_config(None).unwrap();
    assert_eq!(loaded.source, ConfigSource::Environment);
    assert_eq!(loaded.config.api.base_url, "http://from-env:1");
}

#[test]
fn xdg_used_when_env_unset() {
    let _lock = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, "XDG_CONFIG_HOME"]);

    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("contact-manager").join("config.json"),
        "http://from-xdg:2",
    );
    env::remove_var(ENV_CONFIG_PATH);
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let loaded = load_config(None).unwrap();
    assert_eq!(loaded.source, ConfigSource::XdgConfig);
    assert_eq!(loaded.config.api.base_url, "http://from-xdg:2");
}

#[test]
fn cli_path_beats_env() {
    let _lock = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH]);

    let dir = TempDir::new().unwrap();
    let cli_file = dir.path().join("cli.json");
    let env_file = dir.path().join("env.json");
    write_config(&cli_file, "http://from-cli:3");
    write_config(&env_file, "http://from-env:3");
    env::set_var(ENV_CONFIG_PATH, &env_file);

    let loaded = load_config(Some(&cli_file)).unwrap();
    assert_eq!(loaded.source, ConfigSource::CliArgument);
    assert_eq!(loaded.config.api.base_url, "http://from-cli:3");
}

#[test]
fn defaults_when_nothing_found() {
    let _lock = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, "XDG_CONFIG_HOME"]);

    let dir = TempDir::new().unwrap();
    env::set_var(ENV_CONFIG_PATH, dir.path().join("missing.json"));
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let (path, source) = resolve_config_path(None);
    assert!(path.is_none());
    assert_eq!(source, ConfigSource::BuiltinDefault);

    let loaded = load_config(None).unwrap();
    assert!(loaded.hash.is_none());
    assert_eq!(loaded.config.api.contacts_path, "/api/contacts");
}
