//! Tenant-scoped configuration store for source mappings and quadrant labels.

use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{
    Axis, QuadrantLabel, RawSourceKind, SignalCategory, SourceKind, SourceMapping, TenantId,
    ValidationError,
};

/// Default minimum confidence required before a behavioral signal is trusted.
const DEFAULT_SIGNAL_CONFIDENCE_FLOOR: f64 = 0.6;

#[derive(Debug, Default)]
struct RegistryState {
    mappings: HashMap<TenantId, Vec<SourceMapping>>,
    quadrants: HashMap<(TenantId, u8, u8), QuadrantLabel>,
}

/// Per-tenant registry of axis source mappings and grid display labels.
///
/// Mappings are read-only to the scorer; edits go through the upsert
/// operations which validate ranges before accepting a row.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    inner: Mutex<RegistryState>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the mapping for (tenant, axis, source).
    pub fn upsert_mapping(&self, mapping: SourceMapping) -> Result<(), ValidationError> {
        mapping.validate()?;
        let mut state = self.inner.lock().expect("mapping registry poisoned");
        let rows = state.mappings.entry(mapping.tenant.clone()).or_default();
        match rows
            .iter_mut()
            .find(|row| row.axis == mapping.axis && row.source == mapping.source)
        {
            Some(existing) => *existing = mapping,
            None => rows.push(mapping),
        }
        Ok(())
    }

    /// Active mappings for one axis, ordered by priority.
    pub fn active_mappings(&self, tenant: &TenantId, axis: Axis) -> Vec<SourceMapping> {
        let state = self.inner.lock().expect("mapping registry poisoned");
        let mut rows: Vec<SourceMapping> = state
            .mappings
            .get(tenant)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.axis == axis && row.active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|row| row.priority);
        rows
    }

    /// Insert or replace the label configuration for one grid cell. Exactly
    /// one configuration exists per (tenant, performance, potential) pair.
    pub fn upsert_quadrant_label(
        &self,
        tenant: &TenantId,
        label: QuadrantLabel,
    ) -> Result<(), ValidationError> {
        for level in [label.performance_level, label.potential_level] {
            if !(1..=3).contains(&level) {
                return Err(ValidationError::QuadrantLevelOutOfRange { found: level });
            }
        }
        let mut state = self.inner.lock().expect("mapping registry poisoned");
        state.quadrants.insert(
            (
                tenant.clone(),
                label.performance_level,
                label.potential_level,
            ),
            label,
        );
        Ok(())
    }

    pub fn quadrant_label(
        &self,
        tenant: &TenantId,
        performance_level: u8,
        potential_level: u8,
    ) -> Option<QuadrantLabel> {
        let state = self.inner.lock().expect("mapping registry poisoned");
        state
            .quadrants
            .get(&(tenant.clone(), performance_level, potential_level))
            .cloned()
    }

    /// Seed the industry-standard mapping set and the nine default grid
    /// labels for a tenant in one call.
    pub fn initialize_defaults(&self, tenant: &TenantId) -> Result<(), ValidationError> {
        for mapping in default_mappings(tenant) {
            self.upsert_mapping(mapping)?;
        }
        for label in default_quadrant_labels() {
            self.upsert_quadrant_label(tenant, label)?;
        }
        Ok(())
    }
}

fn default_mappings(tenant: &TenantId) -> Vec<SourceMapping> {
    vec![
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Performance,
            source: SourceKind::Raw(RawSourceKind::Appraisal),
            weight: 0.5,
            priority: 1,
            active: true,
            minimum_confidence: None,
        },
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Performance,
            source: SourceKind::Raw(RawSourceKind::GoalProgress),
            weight: 0.3,
            priority: 2,
            active: true,
            minimum_confidence: None,
        },
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Performance,
            source: SourceKind::Signal(SignalCategory::new("collaboration")),
            weight: 0.2,
            priority: 3,
            active: true,
            minimum_confidence: Some(DEFAULT_SIGNAL_CONFIDENCE_FLOOR),
        },
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Potential,
            source: SourceKind::Raw(RawSourceKind::AssessmentRating),
            weight: 0.4,
            priority: 1,
            active: true,
            minimum_confidence: None,
        },
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Potential,
            source: SourceKind::Signal(SignalCategory::new("leadership")),
            weight: 0.4,
            priority: 2,
            active: true,
            minimum_confidence: Some(DEFAULT_SIGNAL_CONFIDENCE_FLOOR),
        },
        SourceMapping {
            tenant: tenant.clone(),
            axis: Axis::Potential,
            source: SourceKind::Signal(SignalCategory::new("learning_agility")),
            weight: 0.2,
            priority: 3,
            active: true,
            minimum_confidence: Some(0.5),
        },
    ]
}

fn default_quadrant_labels() -> Vec<QuadrantLabel> {
    fn label(
        performance: u8,
        potential: u8,
        name: &str,
        description: &str,
        actions: &[&str],
        color: &str,
    ) -> QuadrantLabel {
        QuadrantLabel {
            performance_level: performance,
            potential_level: potential,
            default_label: name.to_string(),
            custom_label: None,
            use_custom: false,
            description: description.to_string(),
            suggested_actions: actions.iter().map(|action| action.to_string()).collect(),
            color: color.to_string(),
        }
    }

    vec![
        label(
            3,
            3,
            "Star",
            "Consistently exceeds expectations and ready for bigger scope.",
            &["Fast-track succession planning", "Stretch assignments"],
            "#2e7d32",
        ),
        label(
            3,
            2,
            "High Performer",
            "Excellent results with room to grow leadership range.",
            &["Broaden exposure", "Leadership coaching"],
            "#558b2f",
        ),
        label(
            3,
            1,
            "Trusted Professional",
            "Deep expertise and reliable delivery in the current role.",
            &["Recognize and retain", "Mentor others"],
            "#9e9d24",
        ),
        label(
            2,
            3,
            "Growth Employee",
            "Strong upward trajectory; results still maturing.",
            &["Targeted development plan", "Rotation opportunities"],
            "#0288d1",
        ),
        label(
            2,
            2,
            "Core Player",
            "Solid results and steady growth; the backbone of the team.",
            &["Keep engaged", "Incremental stretch goals"],
            "#7b1fa2",
        ),
        label(
            2,
            1,
            "Effective Specialist",
            "Meets expectations within a well-defined scope.",
            &["Skill deepening", "Clarify growth interest"],
            "#5d4037",
        ),
        label(
            1,
            3,
            "Rough Diamond",
            "High potential not yet reflected in delivery.",
            &["Diagnose blockers", "Close skill gaps quickly"],
            "#f9a825",
        ),
        label(
            1,
            2,
            "Inconsistent Player",
            "Capable but uneven; needs focus to stabilize output.",
            &["Performance coaching", "Short-cycle goals"],
            "#ef6c00",
        ),
        label(
            1,
            1,
            "Underperformer",
            "Below expectations on both axes.",
            &["Structured improvement plan", "Reassess role fit"],
            "#c62828",
        ),
    ]
}
