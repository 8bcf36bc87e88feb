use std::{io, sync::OnceLock, time};

use application::{api, config, Args, Config, Service};
use axum::{extract::MatchedPath, Extension};
use axum_client_ip::InsecureClientIp;
use service::infra::{postgres, Dialect, Postgres, Sqlite, Storage};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations/postgres");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        server,
        service,
        storage,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let storage = connect(&storage).await?;
    log::info!("using `{}` storage", storage.dialect());

    let service = Service::new(service.into(), storage);

    let mut cors = CorsLayer::new()
        .allow_methods([http::Method::GET, http::Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE]);
    for origin in server.cors.origins {
        cors = cors.allow_origin(
            origin.parse::<http::header::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not current CORS origin: {e}");
            })?,
        );
    }

    let app = api::router()
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|r: &http::Request<_>| {
                    tracing::info_span!(
                        "HTTP request",
                        http.client_ip = InsecureClientIp::from(
                            r.headers(),
                            r.extensions()
                        )
                            .map(|ip| ip.0.to_string())
                            .ok(),
                        http.flavor = ?r.version(),
                        http.host = r.uri().host(),
                        http.method = r.method().as_str(),
                        http.route = r
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.scheme = r
                            .uri()
                            .scheme()
                            .map(http::uri::Scheme::as_str),
                        http.target = r
                            .uri()
                            .path_and_query()
                            .map(http::uri::PathAndQuery::as_str),
                        http.user_agent = r
                            .headers()
                            .get("User-Agent")
                            .and_then(|h| h.to_str().ok()),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |r: &http::Response<_>,
                     dur: time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(r.status().as_u16()),
                        );

                        if r.status().is_server_error()
                            || r.status().is_client_error()
                        {
                            tracing::error!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        } else {
                            tracing::info!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        }
                    },
                ),
        );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}

/// Creates the [`Storage`] of the configured [`Dialect`] and applies its
/// pending migrations.
async fn connect(conf: &config::Storage) -> Result<Storage, ()> {
    match conf.dialect {
        Dialect::Postgres => {
            let mut postgres = Postgres::new(&conf.into()).map_err(|e| {
                log::error!("failed to initialize `Postgres` client: {e}");
            })?;

            migrations::runner()
                .run_async(&mut postgres)
                .await
                .map_err(|e| {
                    log::error!("failed to run database migrations: {e}");
                })?;

            Ok(Storage::Postgres(postgres))
        }
        Dialect::Sqlite => {
            let sqlite = Sqlite::new(&conf.into());

            sqlite.migrate().await.map_err(|e| {
                log::error!("failed to run database migrations: {e}");
            })?;

            Ok(Storage::Sqlite(sqlite))
        }
    }
}
