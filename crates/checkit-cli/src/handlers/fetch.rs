use crate::cli::FetchArgs;
use crate::context::CliContext;
use crate::output;
use checkit_core::CheckitResult;

pub async fn handle(ctx: &CliContext, args: FetchArgs) -> CheckitResult<()> {
    let config = ctx.config().await?;
    let model = ctx.load_model(&config, args.tab.as_deref()).await?;
    output::output_success(&model);
    Ok(())
}
