use crate::JobId;

/// The two pages a front end can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    JobList,
    /// `/job/:id`
    JobDetail { id: JobId },
}

impl Route {
    /// Matches a path against the route table. One trailing slash is ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Some(Route::JobList);
        }
        let id = trimmed.strip_prefix("/job/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Route::JobDetail { id: id.to_string() })
    }

    pub fn path(&self) -> String {
        match self {
            Route::JobList => "/".to_string(),
            Route::JobDetail { id } => format!("/job/{id}"),
        }
    }
}
