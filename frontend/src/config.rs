use shared::NavbarConfig;

const EMBEDDED_NAVBAR_CONFIG: &str = include_str!("../navbar.toml");

/// Parse the embedded `navbar.toml`, falling back to defaults if it is broken.
pub fn load_navbar_config() -> NavbarConfig {
    match NavbarConfig::from_toml_str(EMBEDDED_NAVBAR_CONFIG) {
        Ok(config) => config,
        Err(error) => {
            zoon::eprintln!("⚠️ {error} - using default navbar config");
            NavbarConfig::default()
        }
    }
}
