//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{Project, ProjectId, ProjectKind, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ProjectRow;
use super::pool::DbPool;
use super::schema::projects;

/// Diesel-backed implementation of the `ProjectRepository` port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectRepositoryError> {
    let kind = row.project_type.parse::<ProjectKind>().map_err(|err| {
        warn!(project_id = %row.id, value = %err.0, "unrecognised project_type value");
        ProjectRepositoryError::query("unrecognised project type")
    })?;
    let price = u64::try_from(row.price)
        .map_err(|_| ProjectRepositoryError::query("negative price in projects row"))?;

    Ok(Project {
        id: ProjectId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.user_id),
        title: row.title,
        kind,
        price,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ProjectRepositoryError::connection))?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::id.eq(id.as_uuid()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    ProjectRepositoryError::query,
                    ProjectRepositoryError::connection,
                )
            })?;

        row.map(row_to_project).transpose()
    }
}
