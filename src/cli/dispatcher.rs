use crate::api::client::DblyserClient;
use crate::cli::command_handlers::{AnalyseHandler, AuthHandler};
use crate::cli::main_types::Commands;
use crate::core::services::analysis_service::AnalysisService;
use crate::core::services::auth_service::AuthService;
use crate::error::AppError;
use crate::storage::config::Settings;
use crate::storage::token_store::TokenStore;
use tracing::debug;

pub struct Dispatcher {
    settings: Settings,
}

impl Dispatcher {
    pub fn new(settings: Settings) -> Self {
        debug!(
            base_url = %settings.base_url,
            webhook_url = %settings.webhook_url,
            token_path = %settings.token_path.display(),
            "Resolved settings"
        );
        Self { settings }
    }

    fn create_client(&self) -> Result<DblyserClient, AppError> {
        Ok(DblyserClient::new(self.settings.base_url.clone())?)
    }

    fn token_store(&self) -> TokenStore {
        TokenStore::new(self.settings.token_path.clone())
    }

    fn create_auth_service(&self) -> Result<AuthService, AppError> {
        Ok(AuthService::new(self.create_client()?, self.token_store()))
    }

    fn create_analysis_service(&self) -> Result<AnalysisService, AppError> {
        Ok(AnalysisService::new(
            self.create_client()?,
            self.token_store(),
            self.settings.webhook_url.clone(),
        ))
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Login(args) => {
                debug!("Handling login command");
                let service = self.create_auth_service()?;
                AuthHandler::new().login(args, &service).await
            }
            Commands::Logout => {
                debug!("Handling logout command");
                let service = self.create_auth_service()?;
                AuthHandler::new().logout(&service)
            }
            Commands::Status => {
                debug!("Handling status command");
                let service = self.create_auth_service()?;
                AuthHandler::new().status(&service, &self.settings)
            }
            Commands::Analyse(args) => {
                debug!("Handling analyse command");
                let service = self.create_analysis_service()?;
                AnalyseHandler::new().handle(args, &service).await
            }
        }
    }
}
