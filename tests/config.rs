// ABOUTME: Integration tests for settings parsing and discovery.
// ABOUTME: Tests YAML parsing, wait validation, and manifest path resolution.

use deploylog::config::*;
use deploylog::error::Error;
use std::fs;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn empty_settings_use_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings.namespace.as_str(), "default");
        assert_eq!(settings.wait.timeout, Duration::from_secs(60));
        assert_eq!(settings.wait.interval, Duration::from_secs(1));
        assert!(settings.runtime.socket.is_none());
    }

    #[test]
    fn parse_full_settings() {
        let yaml = r#"
namespace: staging
manifests: /srv/manifests
wait:
  timeout: 2m
  interval: 500ms
runtime:
  socket: /run/podman/podman.sock
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.namespace.as_str(), "staging");
        assert_eq!(settings.manifests.to_str(), Some("/srv/manifests"));
        assert_eq!(settings.wait.timeout, Duration::from_secs(120));
        assert_eq!(settings.wait.interval, Duration::from_millis(500));
        assert_eq!(
            settings.runtime.socket.as_deref(),
            Some("/run/podman/podman.sock")
        );
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        let err = Settings::from_yaml("namespace: Not_Valid\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn interval_longer_than_timeout_is_rejected() {
        let yaml = "wait:\n  timeout: 1s\n  interval: 5s\n";
        let err = Settings::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let yaml = "wait:\n  interval: 0s\n";
        let err = Settings::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn discovers_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "namespace: prod\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.namespace.as_str(), "prod");
    }

    #[test]
    fn discovers_alternate_filename() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "namespace: qa\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.namespace.as_str(), "qa");
    }

    #[test]
    fn relative_manifests_resolve_against_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "manifests: cluster\n").unwrap();

        let settings = Settings::discover(dir.path()).unwrap();
        assert_eq!(settings.manifests, dir.path().join("cluster"));
    }

    #[test]
    fn missing_settings_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::discover_or_default(dir.path()).unwrap();
        assert_eq!(settings.manifests, dir.path().join("manifests"));
        assert_eq!(settings.wait, WaitSettings::default());
    }
}
