//! Server module.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use actix_web_prom::PrometheusMetrics;
use revbot_config::Config;
use revbot_core::{
    random::{ReviewerPicker, SeededReviewerPicker},
    CoreContext, CoreModule,
};
use revbot_database_interface::DbService;
use sentry_actix::Sentry;
use tracing::info;

use crate::{
    handlers::configure_api_handlers, health::health_check_route, metrics::build_metrics_handler,
    Result, ServerError,
};

/// App context.
pub struct AppContext {
    /// Config.
    pub config: Config,
    /// Core module.
    pub core_module: CoreModule,
    /// Storage.
    pub db_service: Box<dyn DbService>,
    /// Reviewer picker.
    pub reviewer_picker: Box<dyn ReviewerPicker>,
}

impl AppContext {
    /// Create new app context, with a picker seeded from the configuration.
    pub fn new(config: Config, core_module: CoreModule, db_service: Box<dyn DbService>) -> Self {
        let reviewer_picker = Box::new(SeededReviewerPicker::from_config(&config));
        Self::new_with_adapters(config, core_module, db_service, reviewer_picker)
    }

    /// Create new app context using adapters.
    pub fn new_with_adapters(
        config: Config,
        core_module: CoreModule,
        db_service: Box<dyn DbService>,
        reviewer_picker: Box<dyn ReviewerPicker>,
    ) -> Self {
        Self {
            config,
            core_module,
            db_service,
            reviewer_picker,
        }
    }

    /// Convert the context for the core module.
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            db_service: self.db_service.as_ref(),
            reviewer_picker: self.reviewer_picker.as_ref(),
        }
    }
}

fn bad_request(message: String) -> actix_web::Error {
    ServerError::BadRequest { message }.into()
}

/// Build Actix app.
pub fn build_actix_app(
    context: Data<AppContext>,
    prometheus: PrometheusMetrics,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(context)
        .wrap(prometheus)
        .wrap(Sentry::new())
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check_route))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({"message": "Welcome on revbot!" }))
            }),
        )
        .configure(configure_api_handlers)
        .app_data(
            web::JsonConfig::default().error_handler(|err, _req| bad_request(err.to_string())),
        )
        .app_data(
            web::QueryConfig::default().error_handler(|err, _req| bad_request(err.to_string())),
        )
        .default_service(web::to(|| async {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": { "code": "NOT_FOUND", "message": "unknown route" }
            }))
        }))
}

/// Run bot server.
pub async fn run_bot_server(context: AppContext) -> Result<()> {
    let address = get_bind_address(&context.config);

    info!(
        version = context.config.version,
        address = %address,
        message = "Starting bot server",
    );

    run_bot_server_internal(address, context).await
}

fn get_bind_address(config: &Config) -> String {
    format!("{}:{}", config.server.bind_ip, config.server.bind_port)
}

async fn run_bot_server_internal(ip_with_port: String, context: AppContext) -> Result<()> {
    let workers_count = context.config.server.workers_count;
    let prometheus = build_metrics_handler()?;
    let context = Data::new(context);

    let mut server =
        HttpServer::new(move || build_actix_app(context.clone(), prometheus.clone()));

    if let Some(workers) = workers_count {
        server = server.workers(workers as usize);
    }

    server
        .bind(ip_with_port)
        .map_err(|e| ServerError::IoError { source: e })?
        .run()
        .await
        .map_err(|e| ServerError::IoError { source: e })
}
