use crate::cli::ExportArgs;
use crate::context::CliContext;
use crate::output;
use checkit_core::{CheckitError, CheckitResult};
use checkit_domain::{ChecklistExporter, ExportMetadata, PanelView};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ExportResult {
    path: PathBuf,
    tab: String,
    items: usize,
    checked: usize,
}

pub async fn handle(ctx: &CliContext, args: ExportArgs) -> CheckitResult<()> {
    let config = ctx.config().await?;
    let metadata = ExportMetadata {
        name: config.user_name().unwrap_or_default().to_string(),
        title: args.title,
        notes: args.notes,
        link: args.link,
    };
    // reject bad metadata before touching the network
    metadata.validate()?;

    let model = ctx.load_model(&config, args.tab.as_deref()).await?;
    let today = chrono::Local::now().date_naive();
    let mut view = PanelView::render(&model, &config.custom_order(), today);

    let tab_index = view
        .active_index()
        .ok_or_else(|| CheckitError::Validation("The checklist has no tabs to export.".to_string()))?;

    for id in &args.checked {
        let position = view.tabs[tab_index]
            .categories
            .iter()
            .enumerate()
            .find_map(|(ci, category)| {
                category
                    .items
                    .iter()
                    .position(|item| item.id.as_str() == id)
                    .map(|ii| (ci, ii))
            });
        let Some((ci, ii)) = position else {
            return Err(CheckitError::Validation(format!("Unknown item id: {id}")));
        };
        if view.toggle(tab_index, ci, ii) == Some(false) {
            // listed twice; keep it checked
            view.toggle(tab_index, ci, ii);
        }
    }

    let entries = view.export_entries();
    let export = ChecklistExporter::export(&entries, &metadata)?;
    let dir = args
        .out
        .unwrap_or_else(|| ctx.settings.effective_export_dir());
    let path = ChecklistExporter::write_to_dir(&export, &dir)?;

    output::output_success(ExportResult {
        path,
        tab: view.tabs[tab_index].title.clone(),
        items: entries.len(),
        checked: entries.iter().filter(|entry| entry.checked).count(),
    });
    Ok(())
}
