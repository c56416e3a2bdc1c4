//! Port for project lookups during purchase creation.

use async_trait::async_trait;

use crate::domain::{Project, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        Connection { message: String } => "project repository connection failed: {message}",
        Query { message: String } => "project repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;
}

/// Fixture repository with no projects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectRepository;

#[async_trait]
impl ProjectRepository for FixtureProjectRepository {
    async fn find_by_id(&self, _id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }
}
