//! Officer directory service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::officer::{Officer, OfficerQuery},
    repository::OfficerDirectory,
};

#[derive(Clone)]
pub struct OfficersService {
    directory: Arc<dyn OfficerDirectory>,
}

impl OfficersService {
    pub fn new(directory: Arc<dyn OfficerDirectory>) -> Self {
        Self { directory }
    }

    /// Officers offered for crew assignment
    pub async fn list(&self, query: &OfficerQuery) -> AppResult<Vec<Officer>> {
        self.directory.list_officers(&query.roles()).await
    }
}
