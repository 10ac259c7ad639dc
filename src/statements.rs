//! SQL text for every statement the provisioner sends.
//!
//! Identifiers are interpolated verbatim, nothing is quoted or escaped.

use crate::names::Identifier;

pub fn create_warehouse(warehouse: &Identifier) -> String {
    format!("CREATE WAREHOUSE IF NOT EXISTS {warehouse}")
}

pub fn create_database(database: &Identifier) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {database}")
}

pub fn use_database(database: &Identifier) -> String {
    format!("USE DATABASE {database}")
}

pub fn create_schema(schema: &Identifier) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {schema}")
}

pub fn use_schema(database: &Identifier, schema: &Identifier) -> String {
    format!("USE SCHEMA {database}.{schema}")
}

pub fn create_table(table: &Identifier) -> String {
    format!("CREATE OR REPLACE TABLE {table} (id INTEGER, data STRING)")
}

pub fn use_warehouse(warehouse: &Identifier) -> String {
    format!("USE WAREHOUSE {warehouse}")
}

pub fn insert_sample_rows(database: &Identifier, schema: &Identifier, table: &Identifier) -> String {
    format!(
        "INSERT INTO {database}.{schema}.{table} (id, data) VALUES (1, 'Sample Data 1'), (2, 'Sample Data 2')"
    )
}

pub fn drop_table(database: &Identifier, schema: &Identifier, table: &Identifier) -> String {
    format!("DROP TABLE IF EXISTS {database}.{schema}.{table}")
}

pub fn drop_schema(database: &Identifier, schema: &Identifier) -> String {
    format!("DROP SCHEMA IF EXISTS {database}.{schema}")
}

pub fn drop_database(database: &Identifier) -> String {
    format!("DROP DATABASE IF EXISTS {database}")
}

pub fn drop_warehouse(warehouse: &Identifier) -> String {
    format!("DROP WAREHOUSE IF EXISTS {warehouse}")
}
