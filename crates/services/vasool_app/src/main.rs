// File: services/vasool_app/src/main.rs
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use vasool_app::{
    app_state::AppState, build_router, service_factory::VasoolServiceFactory,
};
use vasool_common::{init_from_config, BackendClient, FileSessionStore, Session, SessionStore};
use vasool_config::load_config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Arc::new(load_config()?);
    // Dropping the guard would stop the file writer
    let _log_guard = init_from_config(config.logging.as_ref());

    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::from_config(&config.session));
    let session = Arc::new(Session::open(store)?);
    let backend = BackendClient::new(&config.backend)?;
    info!("Backend API at {}", backend.api_root());

    let service_factory = Arc::new(VasoolServiceFactory::new(config.clone(), backend.clone()));
    let state = Arc::new(AppState::new(
        config.clone(),
        session,
        backend,
        service_factory,
    ));

    #[allow(unused_mut)]
    let mut app = build_router(state);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /api/docs");
        let swagger_ui = SwaggerUi::new("/api/docs")
            .url("/api/docs/openapi.json", vasool_app::doc::merged_openapi());
        app = app.merge(swagger_ui);
    }

    // The OAuth redirect URI registered with Zoho must point at this address
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting Vasool client shell at http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
