//! Engine context - dependency injection container

use std::sync::Arc;

use slotline_core::{
    AppointmentRepository as AppointmentRepositoryPort,
    AppointmentService,
    AppointmentTypeCatalog as AppointmentTypeCatalogPort,
    ContractBookingService,
    ContractRepository as ContractRepositoryPort,
    HistoryRecorder,
    SlotProvisioner,
    SlotRepository as SlotRepositoryPort,
    SlotService,
};
use slotline_domain::{Config, Result};
use slotline_infra::database::{
    DbManager, SqliteAppointmentRepository, SqliteCatalogRepository, SqliteContractRepository,
    SqliteEditHistoryRepository, SqliteRescheduleHistoryRepository, SqliteSlotRepository,
};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Type alias for slot repository port trait object
type DynSlotRepositoryPort = dyn SlotRepositoryPort;

/// Type alias for appointment repository port trait object
type DynAppointmentRepositoryPort = dyn AppointmentRepositoryPort;

/// Type alias for contract repository port trait object
type DynContractRepositoryPort = dyn ContractRepositoryPort;

/// Type alias for appointment type catalog port trait object
type DynAppointmentTypeCatalogPort = dyn AppointmentTypeCatalogPort;

/// Engine context - holds all services and dependencies
pub struct EngineContext {
    // Core services
    pub config: Config,
    pub db: Arc<DbManager>,
    pub slots: Arc<DynSlotRepositoryPort>,
    pub appointments: Arc<DynAppointmentRepositoryPort>,
    pub contracts: Arc<DynContractRepositoryPort>,
    /// Concrete catalog type so hosts can reach the admin surface
    /// (`upsert_type`, `list_types`) next to the port methods.
    pub catalog: Arc<SqliteCatalogRepository>,
    pub history: Arc<HistoryRecorder>,

    // Use cases
    pub slot_service: Arc<SlotService>,
    pub appointment_service: Arc<AppointmentService>,
    pub booking_service: Arc<ContractBookingService>,
    pub provisioner: Arc<SlotProvisioner>,
}

impl EngineContext {
    /// Create a new engine context from environment or file configuration.
    pub async fn new() -> Result<Self> {
        let config = slotline_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Create a new engine context with custom configuration.
    ///
    /// This method is primarily for testing and embedding, allowing callers
    /// to point the engine at a dedicated database file.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        // Initialize database and apply schema
        let db = Arc::new(DbManager::new(&config.database)?);
        db.run_migrations()?;

        // Storage adapters
        let slots: Arc<DynSlotRepositoryPort> =
            Arc::new(SqliteSlotRepository::new(Arc::clone(&db)));
        let appointments: Arc<DynAppointmentRepositoryPort> =
            Arc::new(SqliteAppointmentRepository::new(Arc::clone(&db)));
        let contracts: Arc<DynContractRepositoryPort> =
            Arc::new(SqliteContractRepository::new(Arc::clone(&db)));
        let catalog = Arc::new(SqliteCatalogRepository::new(Arc::clone(&db)));
        let edit_history = Arc::new(SqliteEditHistoryRepository::new(Arc::clone(&db)));
        let reschedule_history = Arc::new(SqliteRescheduleHistoryRepository::new(Arc::clone(&db)));

        // Audit recorder sits under every mutating service
        let history = Arc::new(HistoryRecorder::new(edit_history, reschedule_history));

        let catalog_port: Arc<DynAppointmentTypeCatalogPort> = catalog.clone();

        // Use cases
        let slot_service = Arc::new(SlotService::new(Arc::clone(&slots)));
        let appointment_service = Arc::new(AppointmentService::new(
            Arc::clone(&appointments),
            Arc::clone(&slots),
            Arc::clone(&catalog_port),
            Arc::clone(&history),
        ));
        let booking_service = Arc::new(ContractBookingService::new(
            Arc::clone(&contracts),
            Arc::clone(&slots),
            Arc::clone(&catalog_port),
            Arc::clone(&history),
        ));
        let provisioner = Arc::new(SlotProvisioner::new(Arc::clone(&slots), &config.scheduling));

        tracing::info!(db_path = %config.database.path, "engine context initialised");

        Ok(Self {
            config,
            db,
            slots,
            appointments,
            contracts,
            catalog,
            history,
            slot_service,
            appointment_service,
            booking_service,
            provisioner,
        })
    }

    /// Check health of the engine components.
    ///
    /// Returns a `HealthStatus` with individual component checks and an
    /// overall score of healthy components over total components; the engine
    /// counts as healthy at a score of 0.8 or above.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new();

        // Probe the database connection off the async runtime
        status = status.add_component(self.check_database_health().await);

        // Services hold no connections of their own; healthy whenever the
        // context exists
        status = status.add_component(ComponentHealth::healthy("slot_service"));
        status = status.add_component(ComponentHealth::healthy("appointment_service"));
        status = status.add_component(ComponentHealth::healthy("booking_service"));
        status = status.add_component(ComponentHealth::healthy("history_recorder"));

        status.calculate_score();
        status
    }

    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "database health probe failed");
                ComponentHealth::unhealthy("database", err.to_string())
            }
            Err(err) => {
                tracing::warn!(error = %err, "database health probe panicked");
                ComponentHealth::unhealthy("database", format!("task join error: {err}"))
            }
        }
    }
}
