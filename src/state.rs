use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use medbay_auth::{RoleRegistry, TokenStore};
use medbay_config::{CorsConfig, EmailConfig, JwtConfig};

use crate::modules::auth::service::ActorDirectory;
use crate::modules::chief_doctors::store::{ChiefDoctorStore, PgChiefDoctorStore};
use crate::modules::doctors::store::{DoctorStore, PgDoctorStore};
use crate::modules::hospitals::store::{HospitalStore, PgHospitalStore};
use crate::modules::tokens::store::PgTokenStore;

/// State shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub hospitals: Arc<dyn HospitalStore>,
    pub doctors: Arc<dyn DoctorStore>,
    pub chief_doctors: Arc<dyn ChiefDoctorStore>,
    pub tokens: Arc<dyn TokenStore>,
    /// Role-to-rights table. Immutable once the server is up.
    pub registry: Arc<RoleRegistry>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Directory that resolves actor ids across every account collection.
    pub fn actors(&self) -> ActorDirectory {
        ActorDirectory::new(
            self.hospitals.clone(),
            self.doctors.clone(),
            self.chief_doctors.clone(),
        )
    }
}

/// Connects to Postgres, runs migrations and assembles the production state.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset, the database is unreachable,
/// migrations fail, or the role registry does not cover every role. All of
/// these are fatal configuration errors.
pub async fn init_app_state() -> AppState {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    let registry = RoleRegistry::with_defaults().expect("role registry must cover every role");

    AppState {
        hospitals: Arc::new(PgHospitalStore::new(db.clone())),
        doctors: Arc::new(PgDoctorStore::new(db.clone())),
        chief_doctors: Arc::new(PgChiefDoctorStore::new(db.clone())),
        tokens: Arc::new(PgTokenStore::new(db)),
        registry: Arc::new(registry),
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    }
}
