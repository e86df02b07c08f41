//! Recipe-driven data migrations.
//!
//! Recipes themselves are executed by an external [`RecipeMigrator`]. A
//! [`RecipeMigration`] declares which recipe runs for a fresh install and
//! which recipe upgrades each recorded version, and walks those steps until
//! the schema is current.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FieldsError, Result};

/// Identifies the feature a migration runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationContext {
    pub feature: String,
}

/// Executes a named recipe. Implementations report failures as
/// [`FieldsError::RecipeFailed`].
#[async_trait]
pub trait RecipeMigrator: Send + Sync {
    async fn execute(&self, recipe: &str, context: &MigrationContext) -> Result<()>;
}

/// A recipe and the schema version it lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeStep {
    pub recipe: String,
    pub version: u32,
}

/// Declarative migration schedule for one feature.
#[derive(Debug, Clone)]
pub struct RecipeMigration {
    context: MigrationContext,
    create: RecipeStep,
    updates: BTreeMap<u32, RecipeStep>,
}

impl RecipeMigration {
    /// `recipe` creates the feature's schema from scratch and lands on
    /// `version`, which may skip update steps written for older installs.
    pub fn new(feature: impl Into<String>, recipe: impl Into<String>, version: u32) -> Self {
        Self {
            context: MigrationContext {
                feature: feature.into(),
            },
            create: RecipeStep {
                recipe: recipe.into(),
                version,
            },
            updates: BTreeMap::new(),
        }
    }

    /// Upgrade an install recorded at `from` by running `recipe`, landing on `to`.
    pub fn update_from(mut self, from: u32, recipe: impl Into<String>, to: u32) -> Self {
        self.updates.insert(
            from,
            RecipeStep {
                recipe: recipe.into(),
                version: to,
            },
        );
        self
    }

    pub fn context(&self) -> &MigrationContext {
        &self.context
    }

    /// Run the create step when `current` is `None`, then every update step
    /// that applies. Returns the version reached.
    pub async fn run(&self, migrator: &dyn RecipeMigrator, current: Option<u32>) -> Result<u32> {
        let mut version = match current {
            Some(version) => version,
            None => {
                migrator.execute(&self.create.recipe, &self.context).await?;
                debug!(
                    feature = %self.context.feature,
                    recipe = %self.create.recipe,
                    version = self.create.version,
                    "created feature schema"
                );
                self.create.version
            }
        };

        while let Some(step) = self.updates.get(&version) {
            if step.version <= version {
                return Err(FieldsError::MigrationStalled { from: version });
            }
            migrator.execute(&step.recipe, &self.context).await?;
            debug!(
                feature = %self.context.feature,
                recipe = %step.recipe,
                from = version,
                to = step.version,
                "applied migration step"
            );
            version = step.version;
        }

        Ok(version)
    }
}
