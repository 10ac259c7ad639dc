use std::fmt;

/// A warehouse, database, schema or table name.
///
/// Only emptiness is checked. The value is placed into SQL text as is, so
/// anything that is not a plain unquoted identifier is the caller's problem;
/// see [is_plain](Self::is_plain).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Identifier(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Matches `[A-Za-z_][A-Za-z0-9_$]*`, the shape Snowflake accepts unquoted.
    pub fn is_plain(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::new(s)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
}

/// The four objects one run creates, fills or drops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceNames {
    pub warehouse: Identifier,
    pub database: Identifier,
    pub schema: Identifier,
    pub table: Identifier,
}

impl ResourceNames {
    pub const DEFAULT_WAREHOUSE: &'static str = "test_warehouse";
    pub const DEFAULT_DATABASE: &'static str = "test_db";
    pub const DEFAULT_SCHEMA: &'static str = "test_schema";
    pub const DEFAULT_TABLE: &'static str = "test_table";

    pub fn new(
        warehouse: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        Ok(ResourceNames {
            warehouse: Identifier::new(warehouse)?,
            database: Identifier::new(database)?,
            schema: Identifier::new(schema)?,
            table: Identifier::new(table)?,
        })
    }

    /// Every identifier that would need quoting to be safe.
    pub fn non_plain(&self) -> impl Iterator<Item = &Identifier> {
        [&self.warehouse, &self.database, &self.schema, &self.table]
            .into_iter()
            .filter(|identifier| !identifier.is_plain())
    }
}

impl Default for ResourceNames {
    fn default() -> Self {
        ResourceNames {
            warehouse: Identifier(Self::DEFAULT_WAREHOUSE.into()),
            database: Identifier(Self::DEFAULT_DATABASE.into()),
            schema: Identifier(Self::DEFAULT_SCHEMA.into()),
            table: Identifier(Self::DEFAULT_TABLE.into()),
        }
    }
}

/// Everything [run](crate::run) needs besides the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub names: ResourceNames,
    /// Create the objects before inserting
    pub init: bool,
    /// Drop the objects after inserting
    pub cleanup: bool,
}
