//! Split an observation population into labelled segments

use crate::survival::SurvivalObservation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label of the single segment produced when nothing is selected
pub const BASELINE_LABEL: &str = "Portfolio Baseline";

/// Separator between dimension values in a composite label
const LABEL_SEPARATOR: &str = ", ";

/// A categorical attribute a population can be split on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    RatePeriod,
    ScoreTier,
    RateTier,
    AmountTier,
}

impl Dimension {
    /// The observation's value on this dimension, if it has one
    pub fn value_of(&self, observation: &SurvivalObservation) -> Option<&'static str> {
        match self {
            Dimension::RatePeriod => Some(observation.rate_period.as_str()),
            Dimension::ScoreTier => observation.score_tier.map(|t| t.as_str()),
            Dimension::RateTier => observation.rate_tier.map(|t| t.as_str()),
            Dimension::AmountTier => observation.amount_tier.map(|t| t.as_str()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::RatePeriod => "Rate Period",
            Dimension::ScoreTier => "Score Tier",
            Dimension::RateTier => "Rate Tier",
            Dimension::AmountTier => "Amount Tier",
        }
    }
}

/// The values selected on one dimension, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSelection {
    pub dimension: Dimension,
    pub values: Vec<String>,
}

impl DimensionSelection {
    pub fn new<S: Into<String>>(dimension: Dimension, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            dimension,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Selected values with later duplicates removed
    fn distinct_values(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.values.len());
        for value in &self.values {
            if !seen.contains(&value.as_str()) {
                seen.push(value.as_str());
            }
        }
        seen
    }
}

/// Dimensions to partition by, outermost first
///
/// Selections with no values are ignored, so zero, one or two (or more)
/// active dimensions all go through the same routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionRequest {
    pub selections: Vec<DimensionSelection>,
}

impl PartitionRequest {
    /// No partition: the whole population as one segment
    pub fn whole_population() -> Self {
        Self::default()
    }

    /// Rate period as the outer dimension, score tier as the inner one.
    /// Labels come out as `"{score tier}, {rate period}"`.
    pub fn rate_and_score<S: Into<String>>(
        rate_periods: impl IntoIterator<Item = S>,
        score_tiers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            selections: vec![
                DimensionSelection::new(Dimension::RatePeriod, rate_periods),
                DimensionSelection::new(Dimension::ScoreTier, score_tiers),
            ],
        }
    }

    pub fn with(mut self, selection: DimensionSelection) -> Self {
        self.selections.push(selection);
        self
    }

    fn active(&self) -> Vec<(Dimension, Vec<&str>)> {
        self.selections
            .iter()
            .filter(|s| !s.values.is_empty())
            .map(|s| (s.dimension, s.distinct_values()))
            .collect()
    }

    /// Number of segments `partition` will emit
    pub fn segment_count(&self) -> usize {
        self.active().iter().map(|(_, values)| values.len()).product()
    }
}

/// A labelled, possibly empty, subset of the population
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    pub label: String,
    pub members: Vec<&'a SurvivalObservation>,
}

impl<'a> Segment<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.members.iter().filter(|o| o.event).count()
    }

    /// (duration, event) pairs for fitting
    pub fn pairs(&self) -> impl Iterator<Item = (f64, bool)> + '_ {
        self.members.iter().map(|o| o.as_pair())
    }
}

/// Partition `population` per `request`.
///
/// Segments come out in nested order with the first active dimension
/// outermost; each label lists values innermost first. Every combination is
/// emitted even when no observation matches it. An observation lands in at
/// most one segment.
pub fn partition<'a>(population: &'a [SurvivalObservation], request: &PartitionRequest) -> Vec<Segment<'a>> {
    let active = request.active();

    if active.is_empty() {
        return vec![Segment {
            label: BASELINE_LABEL.to_string(),
            members: population.iter().collect(),
        }];
    }

    let mut combinations: Vec<Vec<&str>> = vec![Vec::new()];
    for (_, values) in &active {
        combinations = combinations
            .iter()
            .flat_map(|prefix| {
                values.iter().map(move |value| {
                    let mut combo = prefix.clone();
                    combo.push(*value);
                    combo
                })
            })
            .collect();
    }

    let index: HashMap<&[&str], usize> = combinations
        .iter()
        .enumerate()
        .map(|(i, combo)| (combo.as_slice(), i))
        .collect();

    let mut members: Vec<Vec<&'a SurvivalObservation>> = vec![Vec::new(); combinations.len()];
    let mut key: Vec<&str> = Vec::with_capacity(active.len());

    for observation in population {
        key.clear();
        for (dimension, _) in &active {
            match dimension.value_of(observation) {
                Some(value) => key.push(value),
                None => break,
            }
        }
        if key.len() != active.len() {
            continue;
        }
        if let Some(&i) = index.get(key.as_slice()) {
            members[i].push(observation);
        }
    }

    combinations
        .iter()
        .zip(members)
        .map(|(combo, members)| {
            let label = combo.iter().rev().copied().collect::<Vec<_>>().join(LABEL_SEPARATOR);
            Segment { label, members }
        })
        .collect()
}
