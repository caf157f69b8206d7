//! Integration test for loading settings from a `.env` file.
//!
//! Lives in its own test binary because it changes the working directory
//! and the process environment.

use std::time::Duration;

use questline_api::config::{self, AppConfig};

#[test]
fn test_dotenv_file_supplies_server_settings() {
    // Arrange
    let dir = std::env::temp_dir().join(format!("questline-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(".env"),
        "AZURE_OPENAI_ENDPOINT=https://dotenv.openai.azure.com\n\
         AZURE_OPENAI_API_KEY=from-file\n\
         AZURE_OPENAI_DEPLOYMENT_NAME=file-model\n\
         QUESTLINE_TURN_BUDGET=120\n\
         QUESTLINE_SWEEP_INTERVAL_SECS=45\n",
    )
    .unwrap();
    std::env::set_current_dir(&dir).unwrap();

    // Act
    let loaded = config::load_dotenv().unwrap();
    let config = AppConfig::from_env().unwrap();

    // Assert
    assert_eq!(loaded.unwrap().file_name().unwrap(), ".env");
    assert_eq!(config.engine.turn_budget(), 120);
    assert_eq!(config.engine.sweep_interval, Duration::from_secs(45));
    assert!(!config.openai.api_key.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}
