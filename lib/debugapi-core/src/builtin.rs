//! Built-in endpoint definitions.

use crate::endpoint::{EndpointDefinition, NodeKind};
use crate::error::CatalogError;
use crate::model::ParamModel;
use crate::param::Param;
use crate::transform::Transform;

fn db() -> Param {
    Param::new("db", ParamModel::db()).with_post_transform(Transform::escape_path_segment())
}

fn table() -> Param {
    Param::new("table", ParamModel::table()).with_post_transform(Transform::escape_path_segment())
}

fn tidb(id: &str, path: &str) -> Result<EndpointDefinition, CatalogError> {
    EndpointDefinition::builder(id, NodeKind::Tidb, path).build()
}

/// Debug endpoints exposed by SQL-layer (TiDB) nodes on their status port.
///
/// # Errors
///
/// Returns a [`CatalogError`] if a definition is inconsistent.
pub fn tidb_endpoints() -> Result<Vec<EndpointDefinition>, CatalogError> {
    let endpoints = vec![
        EndpointDefinition::builder("tidb_stats_dump", NodeKind::Tidb, "/stats/dump/{db}/{table}")
            .path_param(db())
            .path_param(table())
            .build()?,
        EndpointDefinition::builder(
            "tidb_stats_dump_timestamp",
            NodeKind::Tidb,
            "/stats/dump/{db}/{table}/{yyyyMMddHHmmss}",
        )
        .path_param(db())
        .path_param(table())
        .path_param(
            Param::new("yyyyMMddHHmmss", ParamModel::text())
                .with_post_transform(Transform::escape_path_segment()),
        )
        .build()?,
        tidb("tidb_config", "/settings")?,
        tidb("tidb_schema", "/schema")?,
        EndpointDefinition::builder("tidb_schema_db", NodeKind::Tidb, "/schema/{db}")
            .path_param(db())
            .build()?,
        EndpointDefinition::builder("tidb_schema_db_table", NodeKind::Tidb, "/schema/{db}/{table}")
            .path_param(db())
            .path_param(table())
            .build()?,
        EndpointDefinition::builder("tidb_schema_tableid", NodeKind::Tidb, "/db-table/{tableID}")
            .path_param(Param::new("tableID", ParamModel::table_id()))
            .build()?,
        tidb("tidb_ddl_history", "/ddl/history")?,
        tidb("tidb_info", "/info")?,
        tidb("tidb_info_all", "/info/all")?,
        tidb("tidb_regions_meta", "/regions/meta")?,
        EndpointDefinition::builder("tidb_pprof_profile", NodeKind::Tidb, "/debug/pprof/profile")
            .query_param(Param::required("seconds", ParamModel::int()))
            .build()?,
    ];
    Ok(endpoints)
}
