use super::category::LifeCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const PLACEHOLDER_MEAN: f64 = 50.0;
const PLACEHOLDER_OVERALL_STDDEV: f64 = 15.0;
const PLACEHOLDER_CATEGORY_STDDEV: f64 = 20.0;

/// Rejections raised when cohort statistics cannot describe a normal distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CohortError {
    #[error("cohort mean must be finite (found {0})")]
    NonFiniteMean(f64),
    #[error("cohort stddev must be finite and greater than zero (found {0})")]
    NonPositiveStddev(f64),
}

/// Assumed normal distribution of one scope's score within a cohort.
///
/// Construction guarantees a finite mean and a strictly positive stddev, so percentile
/// mapping never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution")]
pub struct CohortDistribution {
    mean: f64,
    stddev: f64,
}

#[derive(Deserialize)]
struct RawDistribution {
    mean: f64,
    stddev: f64,
}

impl TryFrom<RawDistribution> for CohortDistribution {
    type Error = CohortError;

    fn try_from(raw: RawDistribution) -> Result<Self, Self::Error> {
        Self::new(raw.mean, raw.stddev)
    }
}

impl CohortDistribution {
    pub fn new(mean: f64, stddev: f64) -> Result<Self, CohortError> {
        if !mean.is_finite() {
            return Err(CohortError::NonFiniteMean(mean));
        }
        if !(stddev.is_finite() && stddev > 0.0) {
            return Err(CohortError::NonPositiveStddev(stddev));
        }
        Ok(Self { mean, stddev })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    pub fn z_score(&self, score: f64) -> f64 {
        (score - self.mean) / self.stddev
    }

    const fn placeholder(stddev: f64) -> Self {
        Self {
            mean: PLACEHOLDER_MEAN,
            stddev,
        }
    }
}

/// Distribution parameters for the overall score and each category of one cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortParameters {
    pub overall: CohortDistribution,
    pub financial: CohortDistribution,
    #[serde(alias = "health_fitness")]
    pub health: CohortDistribution,
    pub social: CohortDistribution,
    pub romantic: CohortDistribution,
}

impl CohortParameters {
    /// Static statistics used until measured cohort data is available.
    pub const fn placeholder() -> Self {
        let category = CohortDistribution::placeholder(PLACEHOLDER_CATEGORY_STDDEV);
        Self {
            overall: CohortDistribution::placeholder(PLACEHOLDER_OVERALL_STDDEV),
            financial: category,
            health: category,
            social: category,
            romantic: category,
        }
    }

    pub fn uniform(distribution: CohortDistribution) -> Self {
        Self {
            overall: distribution,
            financial: distribution,
            health: distribution,
            social: distribution,
            romantic: distribution,
        }
    }

    pub fn for_category(&self, category: LifeCategory) -> &CohortDistribution {
        match category {
            LifeCategory::Financial => &self.financial,
            LifeCategory::HealthFitness => &self.health,
            LifeCategory::Social => &self.social,
            LifeCategory::Romantic => &self.romantic,
        }
    }
}

impl Default for CohortParameters {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Age buckets used to partition cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "18-24")]
    Under25,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65+")]
    Over64,
}

impl AgeBand {
    /// Respondents younger than the first band are pooled into it.
    pub const fn from_age(age: u8) -> Self {
        match age {
            0..=24 => Self::Under25,
            25..=34 => Self::From25To34,
            35..=44 => Self::From35To44,
            45..=54 => Self::From45To54,
            55..=64 => Self::From55To64,
            _ => Self::Over64,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under25 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::Over64 => "65+",
        }
    }
}

/// Demographic bucket (age band, gender, region) a respondent is ranked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    pub age_band: AgeBand,
    pub gender: String,
    pub region: String,
}

impl CohortKey {
    pub fn new(age_band: AgeBand, gender: &str, region: &str) -> Self {
        Self {
            age_band,
            gender: normalize(gender),
            region: normalize(region),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Errors raised while loading a cohort statistics asset.
#[derive(Debug, thiserror::Error)]
pub enum CohortCatalogError {
    #[error("failed to read cohort statistics: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid cohort statistics: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lookup of cohort parameters by demographic key with a fallback entry.
#[derive(Debug, Clone, Default)]
pub struct CohortCatalog {
    entries: HashMap<CohortKey, CohortParameters>,
    fallback: CohortParameters,
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    fallback: CohortParameters,
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    key: CohortKey,
    parameters: CohortParameters,
}

impl CohortCatalog {
    pub fn new(fallback: CohortParameters) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CohortCatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CohortCatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        let mut catalog = Self::new(document.fallback);
        for entry in document.entries {
            let key = CohortKey::new(entry.key.age_band, &entry.key.gender, &entry.key.region);
            catalog.insert(key, entry.parameters);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, key: CohortKey, parameters: CohortParameters) {
        self.entries.insert(key, parameters);
    }

    pub fn fallback(&self) -> &CohortParameters {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameters for the key, or the fallback when the key is absent or unknown.
    pub fn resolve(&self, key: Option<&CohortKey>) -> &CohortParameters {
        let Some(key) = key else {
            return &self.fallback;
        };

        match self.entries.get(key) {
            Some(parameters) => parameters,
            None => {
                debug!(
                    age_band = key.age_band.label(),
                    gender = %key.gender,
                    region = %key.region,
                    "no cohort statistics for key; using fallback"
                );
                &self.fallback
            }
        }
    }
}
