//! E2E tests for slash-command flows over the HTTP surface.

mod helpers;

use helpers::TestHarness;

fn harness() -> TestHarness {
    TestHarness::with_catalog(&[
        ("cera para el cabello", Some("nativo"), 10),
        ("shampoo", None, 0),
    ])
}

#[tokio::test]
async fn e2e_help_lists_every_command() {
    let h = harness();
    let reply = h.reply("/help").await;
    for command in [
        "/start",
        "/help",
        "/inventario",
        "/inventario_todo",
        "/stock",
        "/ventas_hoy",
        "/agregar",
        "/sumar",
        "/vender",
        "/venta",
        "/producto",
        "/buscar",
        "/movimientos",
        "/historial",
        "/ajustar",
    ] {
        assert!(reply.contains(command), "missing {command} in help");
    }
}

#[tokio::test]
async fn e2e_vender_and_venta_alias() {
    let h = harness();

    let reply = h.reply("/vender cera 2 32000").await;
    assert!(reply.contains("Venta registrada"), "{reply}");
    assert!(reply.contains("Stock restante: 8"), "{reply}");

    let reply = h.reply("/venta cera 3 32000").await;
    assert!(reply.contains("Stock restante: 5"), "{reply}");
}

#[tokio::test]
async fn e2e_agregar_then_vender_roundtrip() {
    let h = harness();

    let reply = h.reply("/agregar crema hidratante marca nivea 12").await;
    assert!(reply.contains("Stock total: 12"), "{reply}");

    let reply = h.reply("/vender crema hidratante 4 18000").await;
    assert!(reply.contains("Stock restante: 8"), "{reply}");
    assert_eq!(h.stock_of("crema hidratante").await, 8);
}

#[tokio::test]
async fn e2e_ajustar_to_zero_then_restock() {
    let h = harness();

    let reply = h.reply("/ajustar cera 0").await;
    assert!(reply.contains("Antes: 10"), "{reply}");
    assert!(reply.contains("Ahora: 0"), "{reply}");

    let reply = h.reply("/inventario").await;
    assert!(reply.contains("No hay productos con stock disponible"), "{reply}");

    let reply = h.reply("/sumar cera 7").await;
    assert!(reply.contains("Stock total: 7"), "{reply}");
}

#[tokio::test]
async fn e2e_producto_detail_shows_movement_history() {
    let h = harness();

    h.reply("/vender cera 1 32000").await;
    h.reply("/ajustar cera 20").await;

    let reply = h.reply("/producto cera").await;
    assert!(reply.contains("cera para el cabello"), "{reply}");
    assert!(reply.contains("Marca: nativo"), "{reply}");
    assert!(reply.contains("Stock: 20 unidades"), "{reply}");
    assert!(reply.contains("SKU:"), "{reply}");
    assert!(reply.contains("Última actualización"), "{reply}");
    assert!(reply.contains("SALE: 1 unidades @ $32.000"), "{reply}");
    assert!(reply.contains("ADJUST: 11 unidades"), "{reply}");
}

#[tokio::test]
async fn e2e_ventas_hoy_matches_free_text_report() {
    let h = harness();

    h.reply("/vender cera 2 32000").await;

    let from_command = h.reply("/ventas_hoy").await;
    let from_text = h.reply("ventas de hoy").await;
    assert_eq!(from_command, from_text);
    assert!(from_command.contains("Total Ventas: $64.000"), "{from_command}");
}

#[tokio::test]
async fn e2e_movimientos_ordering_is_most_recent_first() {
    let h = harness();

    h.reply("/vender cera 1").await;
    h.reply("/sumar shampoo 5").await;

    let reply = h.reply("/movimientos").await;
    let sale_pos = reply.find("Venta").unwrap();
    let restock_pos = reply.find("Restock").unwrap();
    assert!(
        restock_pos < sale_pos,
        "restock happened last, must come first:\n{reply}"
    );
}

#[tokio::test]
async fn e2e_usage_errors_do_not_mutate() {
    let h = harness();

    for text in ["/vender", "/agregar", "/ajustar cera", "/producto"] {
        let reply = h.reply(text).await;
        assert!(reply.contains("Uso:"), "{text} → {reply}");
    }

    let (_, movements) = h.get_json("/api/v1/movements").await;
    assert!(movements.as_array().unwrap().is_empty());
}
