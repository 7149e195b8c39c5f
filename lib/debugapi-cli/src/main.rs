#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use debugapi_core::{CatalogConfig, EndpointCatalog};
use http::uri::Scheme;
use tracing::{Level, debug, warn};

const USAGE: &str = "\
Usage: debugapi [OPTIONS] <ENDPOINT_ID> [NAME=VALUE]...
       debugapi [OPTIONS] --list

Options:
  -c, --catalog <FILE>  Endpoint catalog (.json, .yaml or .yml), built-in catalog otherwise
  -H, --host <HOST>     Target host [default: 127.0.0.1]
  -p, --port <PORT>     Target port [default: 10080]
      --https           Use HTTPS in the printed URL
  -l, --list            Print the catalog as JSON
  -v, --verbose         Enable debug logs
  -h, --help            Print this help";

fn main() -> Result<()> {
    let args = match AppArgs::parse(pico_args::Arguments::from_env())? {
        Some(args) => args,
        None => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => EndpointCatalog::builtin().context("loading built-in catalog")?,
    };

    if args.list {
        let listing = serde_json::to_string_pretty(&catalog).context("serializing catalog")?;
        println!("{listing}");
        return Ok(());
    }

    let Some(id) = &args.endpoint else {
        bail!("missing endpoint id (use --list to show the catalog)\n\n{USAGE}");
    };
    let endpoint = catalog
        .get(id)
        .with_context(|| format!("unknown endpoint '{id}'"))?;

    let request = endpoint
        .build_request(args.host.as_str(), args.port, args.values.as_slice())
        .with_context(|| format!("building request for '{id}'"))?;

    let scheme = if args.https {
        Scheme::HTTPS
    } else {
        Scheme::HTTP
    };
    let url = request.url(&scheme).context("forming request URL")?;
    println!("{} {url}", request.method);

    Ok(())
}

fn load_catalog(path: &Path) -> Result<EndpointCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "yaml" | "yml"));
    let config = if is_yaml {
        CatalogConfig::from_yaml_str(&content)
    } else {
        CatalogConfig::from_json_str(&content)
    }
    .with_context(|| format!("parsing catalog {}", path.display()))?;

    let catalog = EndpointCatalog::try_from(config)
        .with_context(|| format!("checking catalog {}", path.display()))?;
    debug!(path = %path.display(), endpoints = catalog.len(), "catalog loaded");
    Ok(catalog)
}

#[derive(Debug)]
struct AppArgs {
    catalog: Option<PathBuf>,
    host: String,
    port: u16,
    https: bool,
    list: bool,
    verbose: bool,
    endpoint: Option<String>,
    values: Vec<(String, String)>,
}

impl AppArgs {
    /// Returns `None` when help was requested.
    fn parse(mut pargs: pico_args::Arguments) -> Result<Option<Self>> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let catalog = pargs
            .opt_value_from_str(["-c", "--catalog"])
            .context("parsing catalog argument")?;

        let host = pargs
            .opt_value_from_str(["-H", "--host"])
            .context("parsing host argument")?;

        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;

        let https = pargs.contains("--https");
        let list = pargs.contains(["-l", "--list"]);
        let verbose = pargs.contains(["-v", "--verbose"]);

        let endpoint = pargs
            .opt_free_from_str()
            .context("parsing endpoint id")?;

        let mut values = Vec::new();
        for raw in pargs.finish() {
            match parse_value(raw) {
                Some(pair) => values.push(pair),
                None => warn!("ignoring argument that is not NAME=VALUE"),
            }
        }

        Ok(Some(Self {
            catalog,
            host: host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: port.unwrap_or(10080),
            https,
            list,
            verbose,
            endpoint,
            values,
        }))
    }
}

fn parse_value(raw: OsString) -> Option<(String, String)> {
    let raw = raw.into_string().ok()?;
    let (name, value) = raw.split_once('=')?;
    Some((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<AppArgs> {
        let args = args.iter().map(OsString::from).collect();
        AppArgs::parse(pico_args::Arguments::from_vec(args)).expect("valid arguments")
    }

    #[test]
    fn should_parse_endpoint_and_values() {
        let args = parse(&["-H", "10.0.0.1", "tidb_schema_db_table", "db=test", "table=t1"])
            .expect("not help");

        assert_eq!(args.host, "10.0.0.1");
        assert_eq!(args.port, 10080);
        assert_eq!(args.endpoint.as_deref(), Some("tidb_schema_db_table"));
        assert_eq!(
            args.values,
            [
                ("db".to_string(), "test".to_string()),
                ("table".to_string(), "t1".to_string()),
            ]
        );
    }

    #[test]
    fn should_parse_flags() {
        let args = parse(&["--list", "--verbose", "--https", "-p", "4000", "--catalog", "pd.yaml"])
            .expect("not help");

        assert!(args.list && args.verbose && args.https);
        assert_eq!(args.port, 4000);
        assert_eq!(args.catalog, Some(PathBuf::from("pd.yaml")));
        assert!(args.endpoint.is_none());
    }

    #[test]
    fn should_keep_equal_signs_in_value() {
        assert_eq!(
            parse_value(OsString::from("q=a=b")),
            Some(("q".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_value(OsString::from("novalue")), None);
    }

    #[test]
    fn should_detect_help() {
        assert!(parse(&["--help"]).is_none());
        assert!(parse(&["-h", "tidb_info"]).is_none());
    }

    #[test]
    fn should_use_long_host_flag() {
        let args = parse(&["--host", "tidb-0", "tidb_info"]).expect("not help");

        assert_eq!(args.host, "tidb-0");
        assert_eq!(args.endpoint.as_deref(), Some("tidb_info"));
    }
}
