use anyhow::Context;
use folio_core::domain::portfolio::StockFeature;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureFile {
    List(Vec<StockFeature>),
    Request { features: Vec<StockFeature> },
}

pub fn load(path: &Path) -> anyhow::Result<Vec<StockFeature>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid features file {}", path.display()))
}

fn parse(text: &str) -> anyhow::Result<Vec<StockFeature>> {
    let file = serde_json::from_str::<FeatureFile>(text)
        .context("expected a JSON array of {returns, risk, sharpeRatio} or {\"features\": [...]}")?;
    Ok(match file {
        FeatureFile::List(features) => features,
        FeatureFile::Request { features } => features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let features =
            parse(r#"[{"returns":0.1,"risk":0.2,"sharpeRatio":0.5}]"#).unwrap();
        assert_eq!(features, vec![StockFeature::new(0.1, 0.2, 0.5)]);
    }

    #[test]
    fn parses_request_shape() {
        let features = parse(
            r#"{"features":[{"returns":0.1,"risk":0.2,"sharpeRatio":0.5},{"returns":0.2,"risk":0.4,"sharpeRatio":0.5}]}"#,
        )
        .unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].risk, 0.4);
    }

    #[test]
    fn rejects_snake_case_keys() {
        assert!(parse(r#"[{"returns":0.1,"risk":0.2,"sharpe_ratio":0.5}]"#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/features.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/features.json"));
    }
}
