//! The structured, multi-axis evaluation embedded in an interview.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Inclusive upper bound for sub-ratings and requirement scores.
pub const MAX_SCORE: i32 = 10;
/// Inclusive upper bound for the overall rating.
pub const MAX_RATING: f64 = 5.0;

/// The four named axes, each an integer in `0..=10`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubRatings {
  pub role_fit:      i32,
  pub cultural_fit:  i32,
  pub communication: i32,
  pub potential:     i32,
}

impl SubRatings {
  fn named(&self) -> [(&'static str, i32); 4] {
    [
      ("role_fit", self.role_fit),
      ("cultural_fit", self.cultural_fit),
      ("communication", self.communication),
      ("potential", self.potential),
    ]
  }

  /// Mean of the four axes, for display only.
  pub fn average(&self) -> f64 {
    self.named().iter().map(|(_, v)| f64::from(*v)).sum::<f64>() / 4.0
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
  pub note:            String,
  /// Overall rating in `0.0..=5.0`, half-point steps.
  pub rating:          f64,
  pub sub_ratings:     SubRatings,
  /// Requirement text → fit score. Keys normally mirror the job's
  /// `candidate_requirements`; keys that no longer appear there are kept.
  pub requirement_fit: BTreeMap<String, i32>,
  pub tags:            BTreeSet<String>,
}

impl Evaluation {
  /// Range checks performed before anything is persisted.
  pub fn validate(&self) -> Result<()> {
    if !self.rating.is_finite()
      || !(0.0..=MAX_RATING).contains(&self.rating)
      || (self.rating * 2.0).fract() != 0.0
    {
      return Err(Error::InvalidArgument(format!(
        "rating must be between 0 and {MAX_RATING} in steps of 0.5, got {}",
        self.rating
      )));
    }

    for (axis, value) in self.sub_ratings.named() {
      check_score(axis, value)?;
    }
    for (requirement, value) in &self.requirement_fit {
      check_score(requirement, *value)?;
    }
    Ok(())
  }

  /// Trim tags and drop blank ones.
  pub fn normalized(mut self) -> Self {
    self.tags = self
      .tags
      .into_iter()
      .map(|t| t.trim().to_owned())
      .filter(|t| !t.is_empty())
      .collect();
    self
  }

  /// Add every requirement missing from the fit map at score 0. Existing
  /// scores, including orphaned keys, are left alone.
  pub fn with_requirements(mut self, requirements: &[String]) -> Self {
    for requirement in requirements {
      self.requirement_fit.entry(requirement.clone()).or_insert(0);
    }
    self
  }
}

fn check_score(label: &str, value: i32) -> Result<()> {
  if (0..=MAX_SCORE).contains(&value) {
    Ok(())
  } else {
    Err(Error::InvalidArgument(format!(
      "{label} must be between 0 and {MAX_SCORE}, got {value}"
    )))
  }
}
