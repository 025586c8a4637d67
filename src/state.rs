use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::repository::{
    CodeRepository, ProjectRepository, ScheduleRepository, TaskRepository, UserRepository,
};
use crate::mail::Mailer;

/// Shared application state, constructed once at startup and handed to every
/// handler via `State<AppState>`. Cheaply cloneable: the pool is reference
/// counted and the repositories only hold a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<Mailer>,
    pub users: UserRepository,
    pub projects: ProjectRepository,
    pub tasks: TaskRepository,
    pub schedules: ScheduleRepository,
    pub codes: CodeRepository,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, mailer: Mailer) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            codes: CodeRepository::new(pool.clone()),
            pool,
            config: Arc::new(config),
            mailer: Arc::new(mailer),
        }
    }
}
