#![allow(missing_docs)]

use debugapi_core::{
    BuildError, CatalogConfig, CatalogError, ConfigError, EndpointCatalog, EndpointMethod, NodeKind,
};
use http::uri::Scheme;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

const PD_CATALOG: &str = r#"{
    "endpoints": [
        {
            "id": "pd_region_by_id",
            "component": "pd",
            "path": "/pd/api/v1/region/id/{id}",
            "path_params": [{ "name": "id", "model": "int" }]
        },
        {
            "id": "pd_scheduler_pause",
            "component": "pd",
            "method": "POST",
            "path": "/pd/api/v1/schedulers/{name}",
            "path_params": [{ "name": "name", "escape": true }],
            "query_params": [
                { "name": "delay", "model": "int", "required": true, "default": "60" }
            ]
        }
    ]
}"#;

#[test]
fn should_build_requests_from_configured_catalog() -> anyhow::Result<()> {
    init_tracing();

    let catalog = EndpointCatalog::try_from(CatalogConfig::from_json_str(PD_CATALOG)?)?;
    assert_eq!(catalog.by_component(NodeKind::Pd).count(), 2);

    let pause = catalog
        .get("pd_scheduler_pause")
        .ok_or_else(|| anyhow::anyhow!("missing endpoint"))?;
    let request = pause.build_request("pd-0", 2379, &[("name", "balance-leader-scheduler")])?;

    assert_eq!(request.method, EndpointMethod::Post);
    let url = request.url(&Scheme::HTTP)?;
    insta::assert_snapshot!(url, @"http://pd-0:2379/pd/api/v1/schedulers/balance-leader-scheduler?delay=60");

    let http_request = request.to_http(Scheme::HTTP)?;
    assert_eq!(http_request.method(), http::Method::POST);

    Ok(())
}

#[test]
fn should_reject_invalid_configured_value() -> anyhow::Result<()> {
    init_tracing();

    let catalog = EndpointCatalog::try_from(CatalogConfig::from_json_str(PD_CATALOG)?)?;
    let region = catalog
        .get("pd_region_by_id")
        .ok_or_else(|| anyhow::anyhow!("missing endpoint"))?;

    let error = region
        .build_request("pd-0", 2379, &[("id", "abc")])
        .expect_err("id must be an integer");

    assert!(matches!(error, BuildError::InvalidParam { .. }));
    Ok(())
}

#[test]
fn should_reject_template_param_mismatch() -> anyhow::Result<()> {
    let json = r#"{ "endpoints": [ {
        "id": "broken", "component": "tikv", "path": "/region/{region_id}",
        "path_params": [ { "name": "id", "model": "int" } ]
    } ] }"#;

    let error = EndpointCatalog::try_from(CatalogConfig::from_json_str(json)?)
        .expect_err("placeholder without parameter");

    assert!(matches!(
        error,
        ConfigError::Catalog(CatalogError::UndeclaredPlaceholder { ref name, .. }) if name == "region_id"
    ));
    insta::assert_snapshot!(error, @"Endpoint 'broken' uses placeholder 'region_id' without a matching path parameter");
    Ok(())
}

#[test]
fn should_reject_unknown_fields() {
    let json = r#"{ "endpoints": [ { "id": "x", "component": "tidb", "path": "/", "verb": "GET" } ] }"#;

    let error = CatalogConfig::from_json_str(json).expect_err("unknown field");

    assert!(matches!(error, ConfigError::Json { .. }));
}

#[test]
fn should_list_catalog_as_json() -> anyhow::Result<()> {
    let catalog = EndpointCatalog::builtin()?;

    let listing = serde_json::to_value(&catalog)?;
    let entries = listing
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("catalog listing is an array"))?;

    assert_eq!(entries.len(), catalog.len());
    let pprof = entries
        .iter()
        .find(|it| it["id"] == "tidb_pprof_profile")
        .ok_or_else(|| anyhow::anyhow!("pprof endpoint listed"))?;
    insta::assert_json_snapshot!(pprof, @r#"
    {
      "id": "tidb_pprof_profile",
      "component": "tidb",
      "path": "/debug/pprof/profile",
      "method": "GET",
      "path_params": [],
      "query_params": [
        {
          "name": "seconds",
          "required": true,
          "model": {
            "type": "int"
          }
        }
      ]
    }
    "#);
    Ok(())
}
