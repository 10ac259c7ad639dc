//! Create, fill and tear down a sample Snowflake warehouse, database, schema
//! and table.
//!
//! Every step is one or two plain SQL statements sent through a [Session].
//! [run] strings them together the way the `snowflake-provisioner` binary does:
//!
//! ```rust,no_run
//! use snowflake_provisioner::{ProvisionConfig, run};
//! use snowflake_session::{Authenticator, SnowflakeConnector};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = SnowflakeConnector::try_new("xy12345.us-east-1", "USER")?
//!     .connect(Authenticator::Password("PASSWORD".into()))
//!     .await?;
//! let config = ProvisionConfig {
//!     init: true,
//!     ..Default::default()
//! };
//! run(session, &config, &mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

pub use names::{Identifier, IdentifierError, ProvisionConfig, ResourceNames};
pub use provision::{
    RunError, cleanup_resources, create_database, create_schema, create_table, create_warehouse,
    initialize_resources, insert_data, run,
};
pub use session::{DriverError, Session};

pub mod cli;
mod names;
mod provision;
mod session;
pub mod statements;
#[cfg(test)]
mod testing;
