//! # Atelier CMS binary
//!
//! The entry point that assembles the application based on compile-time
//! features: one repository, one media store, one credential hasher, and
//! the five resource route groups.

mod config;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use ac_api::handlers::{admins, news, painting, partners, shop};
use ac_api::middleware::cors_policy;
use ac_api::AppState;
use ac_core::traits::{CredentialHasher, MediaStore};
use config::AppConfig;

#[cfg(feature = "auth-simple")]
use ac_auth_simple::ArgonCredentialHasher;
#[cfg(feature = "db-sqlite")]
use ac_db_sqlite::SqliteCmsRepo;
#[cfg(feature = "media-local")]
use ac_media_local::LocalMediaStore;
#[cfg(feature = "media-s3")]
use ac_media_s3::S3MediaStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(
        SqliteCmsRepo::with_max_connections(&config.database_url, config.db_max_connections)
            .await?,
    );

    #[cfg(feature = "media-local")]
    let media: Arc<dyn MediaStore> = {
        tokio::fs::create_dir_all(&config.upload_dir).await?;
        Arc::new(LocalMediaStore::new(
            config.upload_dir.clone().into(),
            config.upload_url_prefix.clone(),
        ))
    };
    #[cfg(feature = "media-s3")]
    let media: Arc<dyn MediaStore> = {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Arc::new(S3MediaStore::new(
            aws_sdk_s3::Client::new(&sdk_config),
            config.s3.bucket.clone(),
            config.s3.key_prefix.clone(),
            config.s3.public_base_url.clone(),
        ))
    };

    #[cfg(feature = "auth-simple")]
    let hasher: Arc<dyn CredentialHasher> = Arc::new(ArgonCredentialHasher);

    let state = web::Data::new(AppState {
        repo: repo.clone(),
        media,
        hasher,
        default_author_id: config.default_author_id,
    });

    let allowed_origin = config.allowed_origin.clone();
    #[cfg(feature = "media-local")]
    let upload_dir = config.upload_dir.clone();
    #[cfg(feature = "media-local")]
    let upload_url_prefix = config.upload_url_prefix.clone();
    let bind_addr = config.bind_addr.clone();

    log::info!("atelier-cms listening on http://{bind_addr}");

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(cors_policy(&allowed_origin))
            .app_data(state.clone())
            .service(web::scope("/news").configure(news::configure_routes))
            .service(web::scope("/painting-news").configure(painting::configure_routes))
            .service(web::scope("/shop").configure(shop::configure_routes))
            .service(web::scope("/partners").configure(partners::configure_routes))
            .service(web::scope("/admin").configure(admins::configure_routes));

        #[cfg(feature = "media-local")]
        let app = app.service(actix_files::Files::new(&upload_url_prefix, &upload_dir));

        app
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    // Workers have drained; release the pool.
    #[cfg(feature = "db-sqlite")]
    repo.close().await;

    Ok(())
}
