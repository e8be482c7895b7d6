use crate::cli::ConfigAction;
use crate::context::CliContext;
use crate::output;
use checkit_core::{CheckitError, CheckitResult};
use checkit_persistence::PersistedConfig;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView<'a> {
    store_path: &'a Path,
    #[serde(flatten)]
    config: PersistedConfig,
}

pub async fn handle(ctx: &CliContext, action: ConfigAction) -> CheckitResult<()> {
    let config = match action {
        ConfigAction::Show => ctx.config().await?,
        ConfigAction::Set {
            deployment_id,
            name,
            selected_title,
        } => {
            if deployment_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
                return Err(CheckitError::Validation(
                    "Please enter a valid Deployment ID.".to_string(),
                ));
            }
            if deployment_id.is_none() && name.is_none() && selected_title.is_none() {
                return Err(CheckitError::Validation(
                    "Nothing to set. Pass --deployment-id, --name or --selected-title.".to_string(),
                ));
            }
            let patch = PersistedConfig {
                deployment_id: deployment_id.map(|id| id.trim().to_string()),
                user_name: name.map(|name| name.trim().to_string()),
                selected_title,
                custom_order: None,
            };
            let updated = ctx.update(patch).await?;
            tracing::info!("Updated settings in {}", ctx.store_path().display());
            updated
        }
    };

    output::output_success(ConfigView {
        store_path: ctx.store_path(),
        config,
    });
    Ok(())
}
