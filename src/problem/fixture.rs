//! JSON fixture form of a problem
//!
//! `{"budget": 80, "layers": [{"options": [{"cost": 0, "improvement": 0}, ...]}, ...]}`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::Result;
use crate::problem::types::{Layer, Problem, UpdateOption};

/// Serialized problem, unvalidated until `into_problem`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub budget: f64,
    pub layers: Vec<LayerSpec>,
}

/// Serialized layer menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub options: Vec<UpdateOption>,
}

impl ProblemSpec {
    /// Validate into a `Problem`
    pub fn into_problem(self) -> Result<Problem> {
        let layers = self
            .layers
            .into_iter()
            .map(|l| Layer::new(l.options))
            .collect();
        Problem::new(layers, self.budget)
    }
}

impl Problem {
    /// Parse and validate a JSON fixture
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: ProblemSpec = serde_json::from_str(json)?;
        spec.into_problem()
    }

    /// Read, parse and validate a JSON fixture file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_spec(&self) -> ProblemSpec {
        ProblemSpec {
            budget: self.budget(),
            layers: self
                .layers()
                .iter()
                .map(|l| LayerSpec {
                    options: l.options().to_vec(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AllocatorError;
    use crate::problem::ProblemDefect;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "budget": 10,
        "layers": [
            {"options": [{"cost": 0, "improvement": 0}, {"cost": 5, "improvement": 1}]},
            {"options": [{"cost": 0, "improvement": 0}, {"cost": 2.5, "improvement": 0.75}]}
        ]
    }"#;

    #[test]
    fn test_parse_fixture() {
        let problem = Problem::from_json_str(FIXTURE).unwrap();
        assert_eq!(problem.layer_count(), 2);
        assert_eq!(problem.budget(), 10.0);
        assert_eq!(problem.layers()[1].options()[1].improvement, 0.75);
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = Problem::from_json_str("{\"budget\": 1, \"layers\": [").unwrap_err();
        assert!(matches!(err, AllocatorError::Serialization(_)));
    }

    #[test]
    fn test_fixture_is_validated() {
        let err = Problem::from_json_str(r#"{"budget": 5, "layers": []}"#).unwrap_err();
        assert!(matches!(
            err,
            AllocatorError::InvalidProblem {
                defect: ProblemDefect::NoLayers
            }
        ));
    }

    #[test]
    fn test_spec_preserves_problem() {
        let problem = Problem::from_json_str(FIXTURE).unwrap();
        let json = problem.to_json_pretty().unwrap();
        assert_eq!(Problem::from_json_str(&json).unwrap(), problem);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let problem = Problem::load(file.path()).unwrap();
        assert_eq!(problem.configuration_count(), 4);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Problem::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AllocatorError::Io(_)));
    }
}
