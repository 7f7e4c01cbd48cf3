//! Free-text message dispatch.
//!
//! One message in, one reply out. Slash commands are routed to
//! `commands`; everything else goes through the rule parser, optionally the
//! AI enricher, and then branches on intent. Product resolution happens
//! here (zero/one/many branching); the stock engine only ever sees a
//! resolved product id.

use chrono::Local;

use crate::state::AppState;
use sb_inventory::InventoryStore;
use sb_parser::{normalize, parse_message};
use sb_protocol::{Actor, Intent, MovementKind, MovementView, Product};

/// Normalized length above which the rule parser's heuristics get
/// unreliable and the enricher is consulted even on a rule hit.
const ENRICH_LENGTH_THRESHOLD: usize = 18;

pub(crate) const UNKNOWN_REPLY: &str = "❓ No te entendí del todo. Prueba con algo como:
• \"vendí 2 cera marca nativo por 32000\"
• \"agrega 5 shampoo\"
• \"ajusta crema a 12\"
• \"ventas de hoy\"

También puedes usar /help para ver todos los comandos.";

pub(crate) const STORE_FAILURE_REPLY: &str = "❌ Error procesando el mensaje";

/// Handle one inbound message and produce the reply text.
pub async fn dispatch(state: &AppState, text: &str, actor: Actor) -> String {
    let text = text.trim();
    if text.is_empty() {
        return UNKNOWN_REPLY.to_string();
    }
    if text.starts_with('/') {
        return crate::commands::handle_command(state, text, actor).await;
    }
    handle_free_text(state, text, actor).await
}

async fn handle_free_text(state: &AppState, text: &str, actor: Actor) -> String {
    let local = parse_message(text);

    let needs_fallback = local.intent == Intent::Unknown
        || (local.intent.is_mutation() && local.product_name.is_none());
    let long_message = normalize(text).chars().count() > ENRICH_LENGTH_THRESHOLD;

    let parsed = if needs_fallback || long_message {
        match state.enricher.enrich(text).await {
            Some(enriched) => {
                tracing::debug!(
                    enricher = state.enricher.name(),
                    intent = ?enriched.intent,
                    "parse enriched"
                );
                enriched
            }
            None => local,
        }
    } else {
        local
    };

    match parsed.intent {
        Intent::DailySales => daily_sales_reply(state).await,
        Intent::Inventory => inventory_reply(state, text.contains("todo")).await,

        Intent::Sale => {
            let Some(name) = parsed.product_name.as_deref() else {
                return "❌ No entiendo qué producto se vendió".to_string();
            };
            match resolve_single(state, name, parsed.brand.as_deref()).await {
                Ok(product) => {
                    state
                        .engine
                        .sell(product.id, parsed.quantity, parsed.price, actor, text)
                        .await
                        .message
                }
                Err(reply) => reply,
            }
        }

        Intent::Restock => {
            let Some(name) = parsed.product_name.as_deref() else {
                return "❌ No entiendo qué producto se agrega".to_string();
            };
            match state.store.find_or_create(name, parsed.brand.as_deref()).await {
                Ok(product) => {
                    state
                        .engine
                        .restock(product.id, parsed.quantity, actor, text)
                        .await
                        .message
                }
                Err(e) => {
                    tracing::error!(error = %e, name, "find_or_create failed");
                    STORE_FAILURE_REPLY.to_string()
                }
            }
        }

        Intent::Adjust => {
            let Some(name) = parsed.product_name.as_deref() else {
                return "❌ No entiendo qué producto ajustar".to_string();
            };
            match resolve_single(state, name, parsed.brand.as_deref()).await {
                Ok(product) => {
                    state
                        .engine
                        .adjust(product.id, parsed.quantity, actor, text)
                        .await
                        .message
                }
                Err(reply) => reply,
            }
        }

        Intent::Unknown => UNKNOWN_REPLY.to_string(),
    }
}

/// Resolve a product name to exactly one product, or produce the reply for
/// the zero/many/failure cases.
pub(crate) async fn resolve_single(
    state: &AppState,
    name: &str,
    brand: Option<&str>,
) -> Result<Product, String> {
    let mut products = match state.store.search(name, brand).await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, name, "product search failed");
            return Err(STORE_FAILURE_REPLY.to_string());
        }
    };
    match products.len() {
        0 => Err(format!("❌ Producto no encontrado: \"{name}\"")),
        1 => Ok(products.remove(0)),
        _ => Err(ambiguous_reply(&products)),
    }
}

// ── Reply rendering ──────────────────────────────────────────────

pub(crate) fn ambiguous_reply(products: &[Product]) -> String {
    let mut reply = String::from("⚠️ Múltiples coincidencias:\n\n");
    for (i, p) in products.iter().enumerate() {
        reply.push_str(&format!("{}. {}\n", i + 1, p.display_label()));
    }
    reply
}

pub(crate) async fn inventory_reply(state: &AppState, include_empty: bool) -> String {
    let products = match state.store.list_inventory(include_empty).await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "inventory listing failed");
            return "❌ Error al obtener el inventario".to_string();
        }
    };

    if products.is_empty() {
        return if include_empty {
            "📦 No hay productos registrados".to_string()
        } else {
            "📦 No hay productos con stock disponible".to_string()
        };
    }

    let mut reply = if include_empty {
        String::from("📦 INVENTARIO COMPLETO\n\n")
    } else {
        String::from("📦 INVENTARIO DISPONIBLE\n\n")
    };
    for p in &products {
        reply.push_str(&format!("• {}: {} unidades\n", p.display_label(), p.stock));
    }
    reply
}

pub(crate) async fn daily_sales_reply(state: &AppState) -> String {
    let daily = match state.store.daily_sales().await {
        Ok(daily) => daily,
        Err(e) => {
            tracing::error!(error = %e, "daily sales query failed");
            return "❌ Error al obtener ventas del día".to_string();
        }
    };

    if daily.sales.is_empty() {
        return "📊 No hay ventas registradas hoy.\n\n¿Quieres registrar una? Escribe /vender"
            .to_string();
    }

    let mut reply = String::from("📈 Resumen de Ventas del Día\n\n");
    for (i, sale) in daily.sales.iter().enumerate() {
        let time = sale.created_at.with_timezone(&Local).format("%H:%M");
        reply.push_str(&format!("{}. {}", i + 1, sale.product_name));
        if let Some(brand) = &sale.product_brand {
            reply.push_str(&format!(" ({brand})"));
        }
        reply.push_str(&format!("\n   📦 Qty: {}", sale.qty));
        if let Some(price) = sale.price {
            reply.push_str(&format!(
                " | 💵 ${} c/u | Total: ${}",
                sb_inventory::format_money(price),
                sb_inventory::format_money(sale.subtotal)
            ));
        }
        reply.push_str(&format!("\n   🕐 {time}\n\n"));
    }

    reply.push_str("━━━━━━━━━━━━━━━━━━━━\n");
    reply.push_str(&format!("📦 Total Unidades: {}\n", daily.total_quantity));
    reply.push_str(&format!(
        "💰 Total Ventas: ${}\n",
        sb_inventory::format_money(daily.total_revenue)
    ));
    reply
}

pub(crate) fn movement_line(m: &MovementView) -> String {
    let (icon, action) = match m.kind {
        MovementKind::Sale => ("📉", "Venta"),
        MovementKind::Restock => ("📈", "Restock"),
        MovementKind::Adjust => ("⚙️", "Ajuste"),
    };
    let brand = m
        .product_brand
        .as_deref()
        .map(|b| format!(" ({b})"))
        .unwrap_or_default();
    let price = m
        .price
        .map(|p| format!(" | Precio: ${}", sb_inventory::format_money(p)))
        .unwrap_or_default();
    let when = m.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M");
    format!(
        "{icon} {action}: {}{brand}\n  Qty: {}{price}\n  {when}\n",
        m.product_name, m.qty
    )
}
