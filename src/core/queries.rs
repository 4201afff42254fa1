//! Diagnostic query set
//!
//! The three statements sent to every analysed database. The set is
//! versioned so a change to any SQL text is visible in logs and config.

use std::collections::BTreeMap;

/// Bumped whenever a statement below changes.
pub const QUERY_SET_VERSION: &str = "v1";

pub const OPTIMIZATION: &str = "optimization";
pub const PERFORMANCE: &str = "performance";
pub const SECURITY: &str = "security";

/// Columns of user tables in the `public` schema.
const OPTIMIZATION_SQL: &str = r#"
SELECT
    c.table_schema AS schema_name,
    c.table_name,
    c.column_name,
    c.data_type,
    c.is_nullable
FROM information_schema.columns c
WHERE c.table_schema = 'public'
  AND c.table_name IN (
      SELECT t.table_name
      FROM information_schema.tables t
      WHERE t.table_schema = 'public'
        AND t.table_type = 'BASE TABLE'
        AND t.table_name NOT LIKE 'pg_%'
        AND t.table_name NOT LIKE 'sql_%'
  )
ORDER BY c.table_name, c.ordinal_position
"#;

/// Top statements by total execution time. Needs `pg_stat_statements`.
const PERFORMANCE_SQL: &str = r#"
SELECT
    ss.queryid,
    ss.query,
    ss.calls,
    ss.total_exec_time AS total_time,
    ss.mean_exec_time AS mean_time,
    ss.max_exec_time AS max_time,
    ss.min_exec_time AS min_time,
    ss.rows,
    ss.shared_blks_hit,
    ss.shared_blks_read,
    ss.shared_blks_written,
    ss.local_blks_hit,
    ss.local_blks_read,
    ss.local_blks_written,
    ss.temp_blks_read,
    ss.temp_blks_written,
    sa.pid AS backend_pid,
    sa.state AS query_state,
    sa.wait_event AS current_wait_event,
    sa.wait_event_type AS current_wait_event_type,
    sa.query_start AS query_start_time,
    sa.state_change AS last_state_change,
    sa.xact_start AS transaction_start_time
FROM pg_stat_statements ss
LEFT JOIN pg_stat_activity sa ON ss.query = sa.query
ORDER BY ss.total_exec_time DESC
LIMIT 10
"#;

/// Superuser roles, public-schema grants, connection settings and active sessions.
const SECURITY_SQL: &str = r#"
WITH role_privileges AS (
    SELECT
        rolname AS role_name,
        rolsuper AS is_superuser,
        rolcreaterole AS can_create_roles,
        rolcreatedb AS can_create_db,
        rolcanlogin AS can_login,
        rolreplication AS can_replicate
    FROM pg_roles
),
table_privileges AS (
    SELECT grantee, table_schema, table_name, privilege_type
    FROM information_schema.role_table_grants
    WHERE table_schema = 'public'
),
connection_settings AS (
    SELECT name AS setting_name, setting AS value
    FROM pg_settings
    WHERE name IN ('max_connections', 'ssl', 'log_connections', 'log_disconnections')
),
active_connections AS (
    SELECT
        datname AS database_name,
        usename AS username,
        client_addr AS client_address,
        backend_start,
        state
    FROM pg_stat_activity
    WHERE state = 'active'
)
SELECT DISTINCT
    rp.role_name,
    rp.is_superuser,
    rp.can_create_roles,
    rp.can_create_db,
    rp.can_login,
    rp.can_replicate,
    tp.table_schema,
    tp.table_name,
    tp.privilege_type,
    cs.setting_name,
    cs.value AS setting_value,
    ac.database_name,
    ac.username,
    ac.client_address,
    ac.backend_start,
    ac.state
FROM role_privileges rp
LEFT JOIN table_privileges tp ON rp.role_name = tp.grantee
LEFT JOIN connection_settings cs ON true
LEFT JOIN active_connections ac ON rp.role_name = ac.username
WHERE rp.is_superuser = true
   OR tp.privilege_type IS NOT NULL
   OR cs.setting_name IS NOT NULL
   OR ac.username IS NOT NULL
ORDER BY rp.role_name, tp.table_name, cs.setting_name
"#;

/// Named SQL statements, iterated in lexical order of their names.
#[derive(Debug, Clone)]
pub struct QuerySet {
    version: String,
    queries: BTreeMap<String, String>,
}

impl QuerySet {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            queries: BTreeMap::new(),
        }
    }

    /// The diagnostics collected by `analyse`.
    pub fn diagnostics() -> Self {
        Self::new(QUERY_SET_VERSION)
            .with_query(OPTIMIZATION, OPTIMIZATION_SQL)
            .with_query(PERFORMANCE, PERFORMANCE_SQL)
            .with_query(SECURITY, SECURITY_SQL)
    }

    pub fn with_query(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.queries.insert(name.into(), sql.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.queries
            .iter()
            .map(|(name, sql)| (name.as_str(), sql.as_str()))
    }
}
