//! Planar 2D model: corners, lines and surfaces, with model boundaries
//! grouping lines.

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::mesh::EdgedCurve;
use crate::mesh_error::MeshModelError;
use crate::model::builder::ModelBuilder;
use crate::model::component::Line;
use crate::model::core::{ModelCopyMapping, ModelCore};
use crate::model::model_trait::ComponentModel;
use crate::topology::component::{ComponentId, ComponentType};
use crate::topology::relation::RelationKind;
use crate::topology::relationships::Relationships;

/// A 2D model made of corners, lines and surfaces, with collections and
/// model boundaries grouping lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    core: ModelCore,
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

impl Section {
    pub fn new() -> Self {
        Self {
            core: ModelCore::new(2),
        }
    }

    pub fn builder(&mut self) -> SectionBuilder<'_> {
        SectionBuilder::new(self)
    }

    /// Lines of the model boundary `boundary`.
    pub fn model_boundary_items(
        &self,
        boundary: ComponentId,
    ) -> Result<impl Iterator<Item = &Line> + Clone + '_, MeshModelError> {
        let range = self.core.typed_range(
            boundary,
            ComponentType::ModelBoundary,
            Relationships::items,
        )?;
        Ok(self.core.related::<EdgedCurve>(range))
    }

    pub fn is_model_boundary_item(
        &self,
        line: ComponentId,
        boundary: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.core.expect_type(boundary, ComponentType::ModelBoundary)?;
        self.core.relationships().is_item(line, boundary)
    }
}

impl ComponentModel for Section {
    fn core(&self) -> &ModelCore {
        &self.core
    }
}

impl DebugInvariants for Section {
    fn validate_invariants(&self) -> Result<(), MeshModelError> {
        if self.core.dimension() != 2 {
            return Err(MeshModelError::InvariantViolation(format!(
                "Section of dimension {}",
                self.core.dimension()
            )));
        }
        if !self.core.store::<crate::mesh::SolidMesh>().is_empty() {
            return Err(MeshModelError::InvariantViolation(
                "Section holds blocks".into(),
            ));
        }
        self.core.validate_invariants()
    }
}

/// Builder editing a [`Section`] in place.
pub struct SectionBuilder<'a> {
    section: &'a mut Section,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(section: &'a mut Section) -> Self {
        Self { section }
    }

    /// Put `line` in the model boundary `boundary`.
    pub fn add_line_in_model_boundary(
        &mut self,
        line: ComponentId,
        boundary: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.section.core.relate(
            RelationKind::Item,
            (line, ComponentType::Line),
            (boundary, ComponentType::ModelBoundary),
        )
    }

    pub fn copy_components(&mut self, other: &Section) -> Result<ModelCopyMapping, MeshModelError> {
        self.section.core.copy_components(&other.core)
    }

    pub fn copy_relationships(
        &mut self,
        mapping: &ModelCopyMapping,
        other: &Section,
    ) -> Result<(), MeshModelError> {
        self.section.core.copy_relationships(mapping, &other.core)?;
        crate::debug_invariants!(
            self.section.validate_invariants(),
            "SectionBuilder::copy_relationships"
        );
        Ok(())
    }

    /// Replace the whole model with a copy of `other`. Ids are preserved.
    pub fn copy(&mut self, other: &Section) {
        self.section.core = other.core.clone();
    }
}

impl ModelBuilder for SectionBuilder<'_> {
    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.section.core
    }
}
