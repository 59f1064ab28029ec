//! cached-fetch — 通过离线缓存拦截器发起一次请求
//!
//! Usage:
//!   cached-fetch [--cache-dir <path>] [--post k=v ...] [--header name:value ...] <url>
//!
//! Run it once online to populate the cache, then again offline to see the
//! response come back from disk with the fallback message.

use anyhow::{bail, Context};
use response_cache::cache::CacheConfig;
use response_cache::interceptors::{CacheInterceptor, InterceptorPipeline};
use response_cache::transport::ReqwestTransport;
use response_cache::types::HttpRequest;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

struct Args {
    url: String,
    cache_dir: Option<PathBuf>,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

fn print_usage() {
    println!(
        r#"cached-fetch — fetch a URL through the offline response cache

USAGE:
    cached-fetch [OPTIONS] <url>

OPTIONS:
    --cache-dir <path>        Cache directory (default: platform cache dir/ResponseCache)
    --post <name=value>       Send a form POST; repeat for more fields
    --header <name:value>     Extra request header; repeat for more
    -h, --help                Show this help message

ENVIRONMENT:
    RESPONSE_CACHE_DIR                  Cache directory
    RESPONSE_CACHE_FALLBACK_MESSAGE     Message of responses served after a network failure
    RESPONSE_CACHE_STORE_FAILURE        fail | serve_live
    RESPONSE_CACHE_HTTP_TIMEOUT_SECS    Request timeout (default 30)
    RESPONSE_CACHE_PROXY_URL            Proxy for all outgoing requests
    RUST_LOG                            Log filter, e.g. response_cache=debug"#
    );
}

fn parse_args(raw: &[String]) -> anyhow::Result<Option<Args>> {
    let mut url = None;
    let mut cache_dir = None;
    let mut form = Vec::new();
    let mut headers = Vec::new();

    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--cache-dir" => {
                let dir = iter.next().context("--cache-dir needs a path")?;
                cache_dir = Some(PathBuf::from(dir));
            }
            "--post" => {
                let field = iter.next().context("--post needs name=value")?;
                let (name, value) = field
                    .split_once('=')
                    .with_context(|| format!("form field {field:?} is not name=value"))?;
                form.push((name.to_string(), value.to_string()));
            }
            "--header" => {
                let header = iter.next().context("--header needs name:value")?;
                let (name, value) = header
                    .split_once(':')
                    .with_context(|| format!("header {header:?} is not name:value"))?;
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => {
                if url.replace(other.to_string()).is_some() {
                    bail!("only one URL may be given");
                }
            }
        }
    }

    let url = url.context("missing <url>")?;
    Ok(Some(Args {
        url,
        cache_dir,
        form,
        headers,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        print_usage();
        return Ok(());
    };

    let mut config = CacheConfig::from_env()?;
    if let Some(dir) = args.cache_dir {
        config = config.with_cache_dir(dir);
    }

    let pipeline = InterceptorPipeline::new(Arc::new(ReqwestTransport::new()?))
        .with(CacheInterceptor::new(config));

    let mut request = if args.form.is_empty() {
        HttpRequest::get(&args.url)
    } else {
        HttpRequest::post(&args.url).with_form(args.form)
    };
    request = request.cached();
    for (name, value) in args.headers {
        request = request.with_header(name, value);
    }

    let resp = pipeline
        .execute(request)
        .await
        .with_context(|| format!("request to {} failed", args.url))?;

    println!("{} {} {}", resp.protocol, resp.status, resp.message);
    for (name, value) in resp.headers.iter() {
        println!("{name}: {value}");
    }
    println!();

    let mut body = resp.body;
    let mut out = std::io::stdout().lock();
    while let Some(chunk) = body.next_chunk().await {
        out.write_all(&chunk?)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_get() {
        let parsed = parse_args(&args(&["http://x/a"])).unwrap().unwrap();
        assert_eq!(parsed.url, "http://x/a");
        assert!(parsed.form.is_empty());
        assert!(parsed.cache_dir.is_none());
    }

    #[test]
    fn test_parse_post_and_options() {
        let parsed = parse_args(&args(&[
            "--cache-dir",
            "/tmp/rc",
            "--post",
            "a=1",
            "--post",
            "b=2",
            "--header",
            "Accept: text/plain",
            "http://x/b",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(parsed.cache_dir, Some(PathBuf::from("/tmp/rc")));
        assert_eq!(
            parsed.form,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(parsed.headers, vec![("Accept".to_string(), "text/plain".to_string())]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--post", "novalue", "http://x"])).is_err());
        assert!(parse_args(&args(&["--bogus", "http://x"])).is_err());
        assert!(parse_args(&args(&["http://x", "http://y"])).is_err());
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
    }
}
