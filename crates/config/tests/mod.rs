//! Wallet configuration test suite
//!
//! Covers network/chain parsing, defaults and TOML loading.

mod network_type_tests {
    use neo_config::{ChainType, NetworkType, LEGACY_ADDRESS_VERSION, N3_ADDRESS_VERSION};

    #[test]
    fn test_network_type_parse_aliases() {
        assert_eq!("MainNet".parse::<NetworkType>().unwrap(), NetworkType::MainNet);
        assert_eq!("main".parse::<NetworkType>().unwrap(), NetworkType::MainNet);
        assert_eq!("test".parse::<NetworkType>().unwrap(), NetworkType::TestNet);
        assert_eq!("privnet".parse::<NetworkType>().unwrap(), NetworkType::Private);
        assert!("devnet".parse::<NetworkType>().is_err());
    }

    #[test]
    fn test_network_type_display_round_trips() {
        for network in [NetworkType::MainNet, NetworkType::TestNet, NetworkType::Private] {
            let parsed: NetworkType = network.to_string().parse().unwrap();
            assert_eq!(parsed, network);
        }
    }

    #[test]
    fn test_network_magic_values() {
        assert_eq!(NetworkType::MainNet.magic(), 0x334f454e);
        assert_eq!(NetworkType::TestNet.magic(), 0x3254334e);
        assert_eq!(NetworkType::Private.magic(), 0);
    }

    #[test]
    fn test_chain_type_address_versions() {
        assert_eq!(ChainType::N3.address_version(), N3_ADDRESS_VERSION);
        assert_eq!(ChainType::Legacy.address_version(), LEGACY_ADDRESS_VERSION);
        assert_eq!(ChainType::default(), ChainType::N3);
    }

    #[test]
    fn test_chain_type_parse() {
        assert_eq!("neo2".parse::<ChainType>().unwrap(), ChainType::Legacy);
        assert_eq!("N3".parse::<ChainType>().unwrap(), ChainType::N3);
        assert!("neo4".parse::<ChainType>().is_err());
    }
}

mod wallet_config_tests {
    use neo_config::{ChainType, ConfigError, NetworkType, WalletConfig};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = WalletConfig::default();
        assert_eq!(config.network, NetworkType::TestNet);
        assert_eq!(config.chain, ChainType::N3);
        assert_eq!(config.send.fee_timeout(), Duration::from_secs(30));
        assert_eq!(config.send.submit_timeout(), Duration::from_secs(30));
        assert!(!config.migration.enabled);
        assert!(config.migration.covers_asset("NEO"));
        assert!(config.migration.covers_asset("GAS"));
        assert!(!config.migration.covers_asset("FLM"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = WalletConfig::from_toml_str("").unwrap();
        assert_eq!(config, WalletConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_sections() {
        let config = WalletConfig::from_toml_str(
            r#"
            network = "MainNet"
            chain = "Legacy"

            [send]
            submit_timeout_ms = 5000

            [migration]
            enabled = true
            swap_address = "AJ36ZCpMhiHYMdMAUaP7i1i9pJz4jMdm7N"
            assets = ["NEO"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, NetworkType::MainNet);
        assert_eq!(config.chain, ChainType::Legacy);
        assert_eq!(config.send.submit_timeout_ms, 5000);
        assert_eq!(config.send.fee_timeout_ms, 30_000);
        assert!(config.migration.enabled);
        assert!(!config.migration.covers_asset("GAS"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = WalletConfig::from_toml_str("[send]\nfee_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                field: "send.fee_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_enabled_migration_requires_swap_address() {
        let err = WalletConfig::from_toml_str("[migration]\nenabled = true\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                field: "migration.swap_address",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = WalletConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    }

    #[test]
    fn test_toml_accepts_display_names() {
        let config =
            WalletConfig::from_toml_str("network = \"mainnet\"\nchain = \"neo2\"\n").unwrap();
        assert_eq!(config.network, NetworkType::MainNet);
        assert_eq!(config.chain, ChainType::Legacy);

        for network in [NetworkType::MainNet, NetworkType::TestNet, NetworkType::Private] {
            let toml = format!("network = \"{}\"\n", network);
            assert_eq!(WalletConfig::from_toml_str(&toml).unwrap().network, network);
        }
        for chain in [ChainType::Legacy, ChainType::N3] {
            let toml = format!("chain = \"{}\"\n", chain);
            assert_eq!(WalletConfig::from_toml_str(&toml).unwrap().chain, chain);
        }
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = WalletConfig::from_toml_str("network = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "network = \"Private\"").unwrap();

        let config = WalletConfig::load(file.path()).unwrap();
        assert_eq!(config.network, NetworkType::Private);
    }

    #[test]
    fn test_load_missing_file() {
        let err = WalletConfig::load("/nonexistent/neo-wallet.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = WalletConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: WalletConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
