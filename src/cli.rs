use std::path::PathBuf;

use clap::Parser;
use snowflake_session::{
    Authenticator, KeyPairFromFileError, NewSnowflakeConnectorError, SnowflakeConnector,
};
use tracing::warn;

use crate::names::{Identifier, ProvisionConfig, ResourceNames};

#[derive(Parser, Debug)]
#[command(name = "snowflake-provisioner")]
#[command(
    about = "Creates a sample warehouse, database, schema and table in Snowflake, inserts two rows, and optionally drops everything again",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Snowflake account identifier, ex. `xy12345.us-east-1`
    #[arg(long, env = "SNOWFLAKE_ACCOUNT")]
    pub account: String,

    /// Snowflake user name
    #[arg(long, env = "SNOWFLAKE_USER")]
    pub user: String,

    /// Snowflake password
    #[arg(
        long,
        env = "SNOWFLAKE_PASSWORD",
        hide_env_values = true,
        required_unless_present = "private_key_path",
        conflicts_with = "private_key_path"
    )]
    pub password: Option<String>,

    /// PEM encoded private key for key pair authentication, instead of a password
    #[arg(long, env = "SNOWFLAKE_PRIVATE_KEY_PATH")]
    pub private_key_path: Option<PathBuf>,

    /// Host in front of `.snowflakecomputing.com`, defaults to the account identifier
    #[arg(long, env = "SNOWFLAKE_HOST")]
    pub host: Option<String>,

    /// Role to log in with, defaults to the user's default role
    #[arg(long, env = "SNOWFLAKE_ROLE")]
    pub role: Option<String>,

    /// Snowflake warehouse name
    #[arg(long, default_value = ResourceNames::DEFAULT_WAREHOUSE)]
    pub warehouse: Identifier,

    /// Snowflake database name
    #[arg(long, default_value = ResourceNames::DEFAULT_DATABASE)]
    pub database: Identifier,

    /// Snowflake schema name
    #[arg(long, default_value = ResourceNames::DEFAULT_SCHEMA)]
    pub schema: Identifier,

    /// Snowflake table name
    #[arg(long, default_value = ResourceNames::DEFAULT_TABLE)]
    pub table: Identifier,

    /// Initialize the resources (warehouse, database, schema, table)
    #[arg(long)]
    pub init: bool,

    /// Clean up the resources (delete warehouse, database, schema, table)
    #[arg(long)]
    pub cleanup: bool,
}

impl Cli {
    pub fn provision_config(&self) -> ProvisionConfig {
        let names = ResourceNames {
            warehouse: self.warehouse.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
        };
        for identifier in names.non_plain() {
            warn!(%identifier, "identifier is not a plain unquoted name, it is sent as is");
        }
        ProvisionConfig {
            names,
            init: self.init,
            cleanup: self.cleanup,
        }
    }

    pub fn connector(&self) -> Result<SnowflakeConnector, NewSnowflakeConnectorError> {
        let mut connector = SnowflakeConnector::try_new(&self.account, &self.user)?;
        if let Some(host) = &self.host {
            connector = connector.with_host(host);
        }
        if let Some(role) = &self.role {
            connector = connector.with_role(role);
        }
        Ok(connector)
    }

    pub fn authenticator(&self) -> Result<Authenticator, CredentialsError> {
        match (&self.private_key_path, &self.password) {
            (Some(path), _) => Ok(Authenticator::key_pair_from_file(path)?),
            (None, Some(password)) => Ok(Authenticator::Password(password.clone())),
            (None, None) => Err(CredentialsError::Missing),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CredentialsError {
    #[error("either a password or a private key path is required")]
    Missing,
    #[error(transparent)]
    KeyPair(#[from] KeyPairFromFileError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use clap::error::ErrorKind;

    const CREDENTIALS: [&str; 7] = [
        "snowflake-provisioner",
        "--account",
        "xy12345",
        "--user",
        "me",
        "--password",
        "secret",
    ];

    #[test]
    fn test_cli_parse_defaults() -> Result<()> {
        let cli = Cli::try_parse_from(CREDENTIALS)?;
        let config = cli.provision_config();
        assert_eq!(config.names, ResourceNames::default());
        assert!(!config.init);
        assert!(!config.cleanup);
        assert_eq!(cli.password.as_deref(), Some("secret"));
        Ok(())
    }

    #[test]
    fn test_cli_parse_names_and_flags() -> Result<()> {
        let args = CREDENTIALS.into_iter().chain([
            "--init",
            "--warehouse=wh1",
            "--database=db1",
            "--schema=sc1",
            "--table=tb1",
        ]);
        let config = Cli::try_parse_from(args)?.provision_config();
        assert_eq!(config.names, ResourceNames::new("wh1", "db1", "sc1", "tb1")?);
        assert!(config.init);
        assert!(!config.cleanup);
        Ok(())
    }

    #[test]
    fn test_cli_rejects_empty_identifier() {
        let args = CREDENTIALS.into_iter().chain(["--table", ""]);
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_password_and_key_conflict() {
        let args = CREDENTIALS
            .into_iter()
            .chain(["--private-key-path", "rsa_key.p8"]);
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_connector_uses_host_override() -> Result<()> {
        let args = CREDENTIALS
            .into_iter()
            .chain(["--host", "myorg-other", "--role", "SYSADMIN"]);
        let connector = Cli::try_parse_from(args)?.connector()?;
        assert_eq!(connector.host(), "https://myorg-other.snowflakecomputing.com/");
        Ok(())
    }

    #[test]
    fn test_cli_password_authenticator() -> Result<()> {
        let cli = Cli::try_parse_from(CREDENTIALS)?;
        assert!(matches!(
            cli.authenticator()?,
            Authenticator::Password(ref password) if password == "secret"
        ));
        Ok(())
    }

    #[test]
    fn test_cli_unreadable_private_key() -> Result<()> {
        let cli = Cli::try_parse_from([
            "snowflake-provisioner",
            "--account",
            "xy12345",
            "--user",
            "me",
            "--private-key-path",
            "./environment_variables/missing/rsa_key.p8",
        ])?;
        let err = cli.authenticator().unwrap_err();
        assert!(matches!(err, CredentialsError::KeyPair(_)));
        Ok(())
    }
}
