use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedShop {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDrink {
    /// Lowercase lookup key, e.g. `"cold brew"`.
    #[serde(rename = "type")]
    pub drink_type: String,
    pub display: String,
}

/// Development catalog loaded from `config/seed.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub shops: Vec<SeedShop>,
    pub drinks: Vec<SeedDrink>,
    /// Canned review comments; `null` entries produce rating-only reviews.
    #[serde(default)]
    pub comments: Vec<Option<String>>,
}

/// Load and validate the seed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_file(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed_file(&content)
}

/// Parse and validate seed YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_seed_file(content: &str) -> Result<SeedFile, ConfigError> {
    let mut seed: SeedFile = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;
    for drink in &mut seed.drinks {
        drink.drink_type = drink.drink_type.trim().to_lowercase();
    }
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    for shop in &seed.shops {
        if shop.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "shop name must be non-empty".to_string(),
            ));
        }
        if let Some(lat) = shop.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::Validation(format!(
                    "shop '{}' has latitude {lat} outside [-90, 90]",
                    shop.name
                )));
            }
        }
        if let Some(lng) = shop.lng {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(ConfigError::Validation(format!(
                    "shop '{}' has longitude {lng} outside [-180, 180]",
                    shop.name
                )));
            }
        }
    }

    let mut seen_types = HashSet::new();
    for drink in &seed.drinks {
        if drink.drink_type.is_empty() || drink.display.trim().is_empty() {
            return Err(ConfigError::Validation(
                "drink type and display name must be non-empty".to_string(),
            ));
        }
        if !seen_types.insert(drink.drink_type.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate drink type: '{}'",
                drink.drink_type
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r"
shops:
  - name: Merit Coffee
    address: 1200 S Lamar Blvd, Austin, TX 78704
    city: Austin
    lat: 30.2522
    lng: -97.7645
drinks:
  - type: Cold Brew
    display: Cold Brew
  - type: latte
    display: Latte
comments:
  - Smooth and rich.
  - null
";

    #[test]
    fn parses_valid_seed_and_lowercases_types() {
        let seed = parse_seed_file(VALID).expect("valid seed");
        assert_eq!(seed.shops.len(), 1);
        assert_eq!(seed.drinks[0].drink_type, "cold brew");
        assert_eq!(seed.comments.len(), 2);
        assert!(seed.comments[1].is_none());
    }

    #[test]
    fn rejects_duplicate_drink_types() {
        let yaml = r"
shops: []
drinks:
  - type: latte
    display: Latte
  - type: LATTE
    display: Big Latte
";
        let err = parse_seed_file(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("latte")));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let yaml = r"
shops:
  - name: Nowhere
    lat: 123.0
    lng: 0.0
drinks: []
";
        assert!(matches!(
            parse_seed_file(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_seed_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::SeedFileIo { ref path, .. } if path.contains("not/here")));
    }
}
