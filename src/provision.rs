use std::io::Write;

use tracing::{info, warn};

use crate::names::{Identifier, ProvisionConfig, ResourceNames};
use crate::session::Session;
use crate::statements;

pub async fn create_warehouse<S: Session>(
    session: &mut S,
    warehouse: &Identifier,
) -> Result<String, S::Error> {
    session.execute(&statements::create_warehouse(warehouse)).await?;
    Ok(format!("Warehouse '{warehouse}' created or already present."))
}

pub async fn create_database<S: Session>(
    session: &mut S,
    database: &Identifier,
) -> Result<String, S::Error> {
    session.execute(&statements::create_database(database)).await?;
    Ok(format!("Database '{database}' created or already present."))
}

pub async fn create_schema<S: Session>(
    session: &mut S,
    database: &Identifier,
    schema: &Identifier,
) -> Result<String, S::Error> {
    session.execute(&statements::use_database(database)).await?;
    session.execute(&statements::create_schema(schema)).await?;
    Ok(format!(
        "Schema '{schema}' created or already present in database '{database}'."
    ))
}

/// Must run after [create_schema], the table is created in the schema selected here.
pub async fn create_table<S: Session>(
    session: &mut S,
    database: &Identifier,
    schema: &Identifier,
    table: &Identifier,
) -> Result<String, S::Error> {
    session.execute(&statements::use_schema(database, schema)).await?;
    session.execute(&statements::create_table(table)).await?;
    Ok(format!(
        "Table '{table}' created or already present in schema '{schema}'."
    ))
}

pub async fn insert_data<S: Session>(
    session: &mut S,
    database: &Identifier,
    schema: &Identifier,
    table: &Identifier,
    warehouse: &Identifier,
) -> Result<String, S::Error> {
    session.execute(&statements::use_warehouse(warehouse)).await?;
    session
        .execute(&statements::insert_sample_rows(database, schema, table))
        .await?;
    Ok(format!("Data inserted into '{table}'."))
}

/// Drops child to parent: table, schema, database, warehouse.
pub async fn cleanup_resources<S: Session>(
    session: &mut S,
    warehouse: &Identifier,
    database: &Identifier,
    schema: &Identifier,
    table: &Identifier,
) -> Result<String, S::Error> {
    session
        .execute(&statements::drop_table(database, schema, table))
        .await?;
    session.execute(&statements::drop_schema(database, schema)).await?;
    session.execute(&statements::drop_database(database)).await?;
    session.execute(&statements::drop_warehouse(warehouse)).await?;
    Ok(format!(
        "Clean-up completed: Table '{table}', Schema '{schema}', Database '{database}', Warehouse '{warehouse}' deleted (if present)."
    ))
}

/// Creates all four objects and inserts the sample rows, writing one line per step.
pub async fn initialize_resources<S: Session, W: Write>(
    session: &mut S,
    names: &ResourceNames,
    out: &mut W,
) -> Result<(), RunError<S::Error>> {
    let ResourceNames {
        warehouse,
        database,
        schema,
        table,
    } = names;
    report(out, create_warehouse(session, warehouse).await)?;
    report(out, create_database(session, database).await)?;
    report(out, create_schema(session, database, schema).await)?;
    report(out, create_table(session, database, schema, table).await)?;
    report(out, insert_data(session, database, schema, table, warehouse).await)?;
    Ok(())
}

/// One invocation: optional init, the unconditional insert, optional cleanup.
///
/// The session is closed exactly once, whether or not a statement failed. A
/// statement failure wins over a close failure.
pub async fn run<S: Session, W: Write>(
    mut session: S,
    config: &ProvisionConfig,
    out: &mut W,
) -> Result<(), RunError<S::Error>> {
    let result = run_steps(&mut session, config, out).await;
    let closed = session.close().await;
    match (result, closed) {
        (Err(error), Err(close_error)) => {
            warn!(error = %close_error, "failed to close session after an earlier failure");
            Err(error)
        }
        (Err(error), Ok(())) => Err(error),
        (Ok(()), Err(close_error)) => Err(RunError::Session(close_error)),
        (Ok(()), Ok(())) => {
            info!("session closed");
            Ok(())
        }
    }
}

async fn run_steps<S: Session, W: Write>(
    session: &mut S,
    config: &ProvisionConfig,
    out: &mut W,
) -> Result<(), RunError<S::Error>> {
    let names = &config.names;
    if config.init {
        info!("initializing resources");
        initialize_resources(session, names, out).await?;
    }

    if config.cleanup {
        warn!(
            table = %names.table,
            "inserting sample rows into a table that is dropped right after"
        );
    }
    report(
        out,
        insert_data(
            session,
            &names.database,
            &names.schema,
            &names.table,
            &names.warehouse,
        )
        .await,
    )?;

    if config.cleanup {
        info!("cleaning up resources");
        report(
            out,
            cleanup_resources(
                session,
                &names.warehouse,
                &names.database,
                &names.schema,
                &names.table,
            )
            .await,
        )?;
    }
    Ok(())
}

fn report<E, W: Write>(out: &mut W, step: Result<String, E>) -> Result<(), RunError<E>> {
    let confirmation = step.map_err(RunError::Session)?;
    writeln!(out, "{confirmation}").map_err(RunError::Output)
}

#[derive(thiserror::Error, Debug)]
pub enum RunError<SessionError> {
    #[error(transparent)]
    Session(SessionError),
    #[error("failed to write confirmation: {0}")]
    Output(#[source] std::io::Error),
}
