//! Tests for TOML configuration parsing.

use std::path::PathBuf;

use super::SettingsError;
use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [adapter]
            name = "MyVirtualAdapter"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.adapter.name.as_deref(), Some("MyVirtualAdapter"));
        assert!(config.adapter.tunnel_type.is_none());
        assert!(config.interface.mtu.is_none());
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.adapter.name.is_none());
        assert!(!config.adapter.hold);
        assert!(!config.output.json);
        assert!(config.driver.library.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [adapter]
            name = "tun0"
            tunnel_type = "{5A1F6A3C-8E2B-4F1D-9C07-3B6D2E4A5F10}"
            guid = "{11223344-5566-7788-99AA-BBCCDDEEFF00}"
            hold = true

            [interface]
            family = "ipv6"
            mtu = 1400
            metric = 25

            [driver]
            library = 'wintun\bin\amd64\wintun.dll'

            [output]
            json = true
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.adapter.name.as_deref(), Some("tun0"));
        assert_eq!(
            config.adapter.guid.as_deref(),
            Some("{11223344-5566-7788-99AA-BBCCDDEEFF00}")
        );
        assert!(config.adapter.hold);
        assert_eq!(config.interface.family.as_deref(), Some("ipv6"));
        assert_eq!(config.interface.mtu, Some(1400));
        assert_eq!(config.interface.metric, Some(25));
        assert_eq!(
            config.driver.library,
            Some(PathBuf::from(r"wintun\bin\amd64\wintun.dll"))
        );
        assert!(config.output.json);
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[webhook]\nurl = \"https://example.com\"");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = TomlConfig::parse("[interface]\nnl_mtu = 1500");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = TomlConfig::parse("[interface]\nmtu = \"1500\"");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn negative_mtu_is_rejected() {
        let result = TomlConfig::parse("[interface]\nmtu = -1");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }
}

mod template {
    use super::*;

    #[test]
    fn template_is_valid_toml() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.interface.mtu, Some(1500));
        assert!(config.adapter.name.is_none());
    }

    #[test]
    fn template_documents_every_section() {
        let template = default_config_template();

        assert!(template.contains("[adapter]"));
        assert!(template.contains("[interface]"));
        assert!(template.contains("[driver]"));
        assert!(template.contains("[output]"));
    }
}
