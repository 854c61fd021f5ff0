//! SQLite-backed implementation of the `ContractRepository` port.
//!
//! The contract-with-booking path writes contract, add-ons and appointment
//! first and claims the slot last, all inside one immediate transaction. A
//! lost slot race therefore rolls every row back and leaves no trace of the
//! attempt.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use slotline_core::ContractRepository;
use slotline_domain::{
    Appointment, Contract, ContractAddon, ContractWithAddons, Result as DomainResult, SlotStatus,
    SlotlineError,
};
use tokio::task;

use super::appointment_repository::insert_appointment;
use super::manager::DbManager;
use super::slot_repository::transition_slot;
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed contract repository.
pub struct SqliteContractRepository {
    db: Arc<DbManager>,
}

impl SqliteContractRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContractRepository for SqliteContractRepository {
    async fn create(&self, contract: &Contract, addons: &[ContractAddon]) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let contract = contract.clone();
        let addons = addons.to_vec();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sqlite_error)?;

            insert_contract_rows(&tx, &contract, &addons)?;

            tx.commit().map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create_with_booking(
        &self,
        contract: &Contract,
        addons: &[ContractAddon],
        appointment: &Appointment,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let contract = contract.clone();
        let addons = addons.to_vec();
        let appointment = appointment.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sqlite_error)?;

            insert_contract_rows(&tx, &contract, &addons)?;
            insert_appointment(&tx, &appointment)?;

            // Claim last: a lost race aborts here and takes the three
            // inserts above down with it.
            transition_slot(
                &tx,
                &appointment.tenant_id,
                appointment.date,
                appointment.slot_number,
                SlotStatus::Available,
                SlotStatus::Occupied,
                Some(&appointment.id),
            )?;

            tx.commit().map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_with_addons(&self, tenant_id: &str, id: &str) -> DomainResult<ContractWithAddons> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<ContractWithAddons> {
            let conn = db.get_connection()?;
            let contract = conn
                .query_row(CONTRACT_SELECT_SQL, params![tenant_id, id], map_contract_row)
                .optional()
                .map_err(map_sqlite_error)?
                .ok_or_else(|| SlotlineError::NotFound(format!("contract {id}")))?;

            let mut stmt = conn.prepare(ADDON_LIST_SQL).map_err(map_sqlite_error)?;
            let addons = stmt
                .query_map(params![tenant_id, id], map_addon_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;

            Ok(ContractWithAddons { contract, addons })
        })
        .await
        .map_err(map_join_error)?
    }
}

const CONTRACT_INSERT_SQL: &str = "INSERT INTO contracts
        (id, tenant_id, client_name, client_email, client_phone, plan_code, sales_rep, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const ADDON_INSERT_SQL: &str = "INSERT INTO contract_addons
        (id, tenant_id, contract_id, addon_code, quantity)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const CONTRACT_SELECT_SQL: &str = "SELECT
        id, tenant_id, client_name, client_email, client_phone, plan_code, sales_rep, created_at
    FROM contracts
    WHERE tenant_id = ?1 AND id = ?2";

const ADDON_LIST_SQL: &str = "SELECT
        id, tenant_id, contract_id, addon_code, quantity
    FROM contract_addons
    WHERE tenant_id = ?1 AND contract_id = ?2
    ORDER BY addon_code ASC";

fn insert_contract_rows(
    conn: &Connection,
    contract: &Contract,
    addons: &[ContractAddon],
) -> DomainResult<()> {
    conn.execute(
        CONTRACT_INSERT_SQL,
        params![
            contract.id,
            contract.tenant_id,
            contract.client_name,
            contract.client_email,
            contract.client_phone,
            contract.plan_code,
            contract.sales_rep,
            contract.created_at,
        ],
    )
    .map_err(map_sqlite_error)?;

    for addon in addons {
        conn.execute(
            ADDON_INSERT_SQL,
            params![addon.id, addon.tenant_id, addon.contract_id, addon.addon_code, addon.quantity],
        )
        .map_err(map_sqlite_error)?;
    }

    Ok(())
}

fn map_contract_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        client_name: row.get(2)?,
        client_email: row.get(3)?,
        client_phone: row.get(4)?,
        plan_code: row.get(5)?,
        sales_rep: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_addon_row(row: &Row<'_>) -> rusqlite::Result<ContractAddon> {
    Ok(ContractAddon {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        contract_id: row.get(2)?,
        addon_code: row.get(3)?,
        quantity: row.get(4)?,
    })
}
