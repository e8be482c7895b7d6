use crate::cli::OrderAction;
use crate::context::CliContext;
use crate::output;
use checkit_core::CheckitResult;
use checkit_domain::{order_key, ItemId};
use checkit_persistence::PersistedConfig;
use serde::Serialize;

#[derive(Serialize)]
struct OrderResult {
    key: String,
    ids: Vec<ItemId>,
}

/// Ids are stored as given; unknown ids are simply never matched when the
/// category is drawn.
pub async fn handle(ctx: &CliContext, action: OrderAction) -> CheckitResult<()> {
    let mut custom_order = ctx.config().await?.custom_order();

    let (tab, category) = match action {
        OrderAction::Set { tab, category, ids } => {
            let ids: Vec<ItemId> = ids.into_iter().map(ItemId::from).collect();
            custom_order.record(&tab, &category, ids);
            (tab, category)
        }
        OrderAction::Clear { tab, category } => {
            if !custom_order.clear(&tab, &category) {
                tracing::debug!("No saved order for {}", order_key(&tab, &category));
            }
            (tab, category)
        }
    };

    let ids = custom_order
        .get(&tab, &category)
        .map(<[ItemId]>::to_vec)
        .unwrap_or_default();
    ctx.update(PersistedConfig {
        custom_order: Some(custom_order),
        ..Default::default()
    })
    .await?;

    output::output_success(OrderResult {
        key: order_key(&tab, &category),
        ids,
    });
    Ok(())
}
