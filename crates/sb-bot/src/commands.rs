//! Slash-command router.
//!
//! Commands mirror the free-text flows but with positional arguments
//! instead of heuristics: quantities and prices come from fixed argument
//! slots, and `/ajustar` accepts an explicit 0 that free text can't
//! express.

use chrono::Local;

use crate::dispatch::{daily_sales_reply, inventory_reply, movement_line, resolve_single};
use crate::state::AppState;
use sb_inventory::{InventoryStore, format_money};
use sb_parser::{extract_brand, extract_product_name};
use sb_protocol::{Actor, Product};

const MOVEMENTS_DEFAULT_LIMIT: usize = 10;
const MOVEMENTS_MAX_LIMIT: usize = 100;
const DETAIL_MOVEMENTS: usize = 5;

const START_REPLY: &str = "👋 ¡Hola! Soy tu asistente de inventario.

Puedo ayudarte a:
✅ Registrar ventas
📦 Registrar restock
📊 Consultar inventario
🔄 Ajustar stock
📋 Ver movimientos

Escribe /help para ver todos los comandos o simplemente escribe mensajes normales como:
• \"vendí 2 cera marca nativo por 32.000\"
• \"agrega 10 cera\"
• \"dame el inventario\"";

const HELP_REPLY: &str = "📚 COMANDOS DISPONIBLES

📋 Información
/start - Mensaje de bienvenida
/help - Muestra esta ayuda

📊 Inventario
/inventario - Muestra productos con stock > 0
/inventario_todo - Muestra todos los productos (incluso sin stock)
/stock - Alias rápido de /inventario
/ventas_hoy - Resumen de ventas del día

➕ Operaciones
/agregar <producto> [cantidad] [marca] - Agrega stock
/sumar <producto> [cantidad] [marca] - Alias de /agregar
/vender <producto> [cantidad] [precio] - Registra venta
/venta <producto> [cantidad] [precio] - Alias de /vender
/producto <nombre> - Muestra detalle del producto
/buscar <nombre> - Alias de /producto
/movimientos [n] - Últimos n movimientos (default 10)
/historial [n] - Alias de /movimientos
/ajustar <producto> <nuevo_stock> - Ajusta stock exacto

📝 Texto Libre
También puedes escribir mensajes normales:
• \"se vendió cera para el cabello marca nativo por 32.000\"
• \"vendí 2 cera nativo\"
• \"dame el inventario\"
• \"agrega 10 cera marca nativo\"

💡 EJEMPLOS
/inventario
/agregar cera para el cabello marca nativo 10
/vender cera nativo 1 32000
/movimientos 20
/producto cera nativo";

/// Route one slash command to its handler. `text` starts with '/'.
pub async fn handle_command(state: &AppState, text: &str, actor: Actor) -> String {
    let mut parts = text.split_whitespace();
    let command = parts.next().unwrap_or(text);
    let args: Vec<&str> = parts.collect();

    match command {
        "/start" => START_REPLY.to_string(),
        "/help" => HELP_REPLY.to_string(),
        "/inventario" | "/stock" => inventory_reply(state, false).await,
        "/inventario_todo" => inventory_reply(state, true).await,
        "/ventas_hoy" => daily_sales_reply(state).await,
        "/agregar" | "/sumar" => agregar(state, &args, actor, text).await,
        "/vender" | "/venta" => vender(state, &args, actor, text).await,
        "/producto" | "/buscar" => producto(state, &args).await,
        "/movimientos" | "/historial" => movimientos(state, &args).await,
        "/ajustar" => ajustar(state, &args, actor, text).await,
        _ => format!("❓ Comando desconocido: {command}\nEscribe /help para ver los disponibles."),
    }
}

/// Product name from command arguments: reuse the free-text extractor with
/// a synthetic verb prefix, then drop any trailing bare numbers left over
/// from the quantity/price slots.
fn arg_product_name(verb: &str, joined: &str) -> Option<String> {
    let name = extract_product_name(&format!("{verb} {joined}"))?;
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while words
        .last()
        .is_some_and(|w| w.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ','))
    {
        words.pop();
    }
    (!words.is_empty()).then(|| words.join(" "))
}

async fn agregar(state: &AppState, args: &[&str], actor: Actor, raw_text: &str) -> String {
    if args.is_empty() {
        return "❌ Uso: /agregar <producto> [cantidad] [marca]".to_string();
    }

    let joined = args.join(" ");
    let quantity = args
        .last()
        .and_then(|a| a.parse::<i64>().ok())
        .filter(|q| *q > 0)
        .unwrap_or(1);
    let brand = extract_brand(&joined);

    let Some(name) = arg_product_name("agrega", &joined) else {
        return "❌ No entiendo el nombre del producto".to_string();
    };

    match state.store.find_or_create(&name, brand.as_deref()).await {
        Ok(product) => {
            state
                .engine
                .restock(product.id, quantity, actor, raw_text)
                .await
                .message
        }
        Err(e) => {
            tracing::error!(error = %e, name, "find_or_create failed");
            "❌ Error al procesar el restock".to_string()
        }
    }
}

async fn vender(state: &AppState, args: &[&str], actor: Actor, raw_text: &str) -> String {
    if args.is_empty() {
        return "❌ Uso: /vender <producto> [cantidad] [precio]".to_string();
    }

    let joined = args.join(" ");
    let quantity = args
        .len()
        .checked_sub(2)
        .and_then(|i| args[i].parse::<i64>().ok())
        .filter(|q| *q > 0)
        .unwrap_or(1);
    let price = args
        .last()
        .and_then(|a| a.parse::<i64>().ok())
        .filter(|p| *p > 0);
    let brand = extract_brand(&joined);

    let Some(name) = arg_product_name("vendí", &joined) else {
        return "❌ No entiendo el nombre del producto".to_string();
    };

    match resolve_single(state, &name, brand.as_deref()).await {
        Ok(product) => {
            state
                .engine
                .sell(product.id, quantity, price, actor, raw_text)
                .await
                .message
        }
        Err(reply) => reply,
    }
}

async fn producto(state: &AppState, args: &[&str]) -> String {
    if args.is_empty() {
        return "❌ Uso: /producto <nombre>".to_string();
    }

    let name = args.join(" ");
    let product = match resolve_single(state, &name, None).await {
        Ok(product) => product,
        Err(reply) => return reply,
    };

    let movements = match state.store.product_movements(product.id, DETAIL_MOVEMENTS).await {
        Ok(movements) => movements,
        Err(e) => {
            tracing::error!(error = %e, product = %product.name, "movement query failed");
            return "❌ Error al obtener el detalle".to_string();
        }
    };

    let mut reply = product_card(&product);
    if !movements.is_empty() {
        reply.push_str("\n\n📋 Últimos movimientos:\n");
        for m in &movements {
            reply.push_str(&format!("• {}: {} unidades", m.kind.as_str(), m.qty));
            if let Some(price) = m.price {
                reply.push_str(&format!(" @ ${}", format_money(price)));
            }
            let when = m.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M");
            reply.push_str(&format!(" ({when})\n"));
        }
    }
    reply
}

fn product_card(product: &Product) -> String {
    let mut card = format!("📦 {}", product.name);
    if let Some(brand) = &product.brand {
        card.push_str(&format!("\n🏷️ Marca: {brand}"));
    }
    card.push_str(&format!("\n📊 Stock: {} unidades", product.stock));
    card.push_str(&format!("\n🔖 SKU: {}", product.sku));
    if let Some(at) = product.last_movement_at {
        let when = at.with_timezone(&Local).format("%d/%m/%Y %H:%M");
        card.push_str(&format!("\n⏰ Última actualización: {when}"));
    }
    card
}

async fn movimientos(state: &AppState, args: &[&str]) -> String {
    let limit = args
        .first()
        .and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(MOVEMENTS_DEFAULT_LIMIT)
        .min(MOVEMENTS_MAX_LIMIT);

    let movements = match state.store.recent_movements(limit).await {
        Ok(movements) => movements,
        Err(e) => {
            tracing::error!(error = %e, "movement query failed");
            return "❌ Error al obtener movimientos".to_string();
        }
    };

    if movements.is_empty() {
        return "📋 No hay movimientos registrados".to_string();
    }

    let mut reply = format!("📋 ÚLTIMOS {} MOVIMIENTOS\n\n", movements.len());
    for m in &movements {
        reply.push_str(&movement_line(m));
        reply.push('\n');
    }
    reply
}

async fn ajustar(state: &AppState, args: &[&str], actor: Actor, raw_text: &str) -> String {
    if args.len() < 2 {
        return "❌ Uso: /ajustar <producto> <nuevo_stock>".to_string();
    }

    let new_stock = match args[args.len() - 1].parse::<i64>() {
        Ok(n) if n >= 0 => n,
        _ => return "❌ El nuevo stock debe ser un número positivo".to_string(),
    };
    let name = args[..args.len() - 1].join(" ");

    match resolve_single(state, &name, None).await {
        Ok(product) => {
            state
                .engine
                .adjust(product.id, new_stock, actor, raw_text)
                .await
                .message
        }
        Err(reply) => reply,
    }
}
