// src/services/reconciliation.rs

// Reconciliação: deriva o estado atual do estoque de cada obra fazendo um
// fold sobre o livro-razão imutável. É uma função pura (sem I/O, sem
// efeitos) e idempotente: rodar duas vezes sobre o mesmo log produz o
// mesmo resultado. É também o mecanismo de recuperação: perdeu o snapshot,
// recalcula do log.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::inventory::{CurrentInventoryItem, LedgerAction, LedgerRecord};

/// Fold do livro-razão em um snapshot por (obra, produto).
///
/// Regras por ação:
/// - checked_out: soma quantidade e valor (qty * sale_price); o reorder
///   point mais recente não-nulo de um checkout "gruda" no produto.
/// - returned:    subtrai quantidade e valor.
/// - adjusted:    subtrai só a quantidade; o valor já capitalizado no
///   checkout não é estornado por consumo.
///
/// Quantidade e valor nunca ficam negativos (trava em zero a cada passo).
pub fn reconcile(records: &[LedgerRecord]) -> Vec<CurrentInventoryItem> {
    // Agrupa por (obra, produto), preservando a ordem de primeira aparição
    // para a saída ser determinística.
    let mut order: Vec<(Uuid, Uuid)> = Vec::new();
    let mut groups: HashMap<(Uuid, Uuid), Vec<&LedgerRecord>> = HashMap::new();

    for record in records {
        let key = (record.project_id, record.product_id);
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    let mut items = Vec::with_capacity(order.len());

    for key in order {
        let mut group = groups.remove(&key).unwrap_or_default();

        // Ordena por created_at; o sort estável mantém a ordem de inserção
        // (seq) quando o timestamp empata.
        group.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        if let Some(item) = fold_group(&group) {
            items.push(item);
        }
    }

    items
}

fn fold_group(group: &[&LedgerRecord]) -> Option<CurrentInventoryItem> {
    let last = *group.last()?;

    let mut current_quantity = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    let mut total_transferred_in = Decimal::ZERO;
    let mut total_returned_out = Decimal::ZERO;
    let mut total_adjusted = Decimal::ZERO;
    let mut project_reorder_point: Option<Decimal> = None;

    for record in group {
        match record.action {
            LedgerAction::CheckedOut => {
                current_quantity += record.quantity;
                total_value += record.quantity * record.sale_price;
                total_transferred_in += record.quantity;

                // O último não-nulo vence; omissão não apaga o limite.
                if record.project_reorder_point.is_some() {
                    project_reorder_point = record.project_reorder_point;
                }
            }
            LedgerAction::Returned => {
                current_quantity -= record.quantity;
                total_value -= record.quantity * record.sale_price;
                total_returned_out += record.quantity;
            }
            LedgerAction::Adjusted => {
                current_quantity -= record.quantity;
                total_adjusted += record.quantity;
            }
        }

        if current_quantity < Decimal::ZERO {
            current_quantity = Decimal::ZERO;
        }
        if total_value < Decimal::ZERO {
            total_value = Decimal::ZERO;
        }
    }

    // Suprime produtos sem qualquer atividade de vida útil.
    let has_activity = current_quantity > Decimal::ZERO
        || total_transferred_in > Decimal::ZERO
        || total_returned_out > Decimal::ZERO
        || total_adjusted > Decimal::ZERO;
    if !has_activity {
        return None;
    }

    // Sem reorder point o item nunca é "low stock", mesmo zerado.
    let is_low_stock = match project_reorder_point {
        Some(threshold) => current_quantity <= threshold,
        None => false,
    };

    Some(CurrentInventoryItem {
        project_id: last.project_id,
        product_id: last.product_id,
        product_name: last.product_name.clone(),
        category: last.category.clone(),
        unit: last.unit.clone(),
        supplier: last.supplier.clone(),
        sale_price: last.sale_price,
        current_quantity,
        total_transferred_in,
        total_returned_out,
        total_adjusted,
        total_value,
        // Avaliação pontual do que resta, independente do total_value
        // acumulado por transação.
        total_cost: current_quantity * last.sale_price,
        project_reorder_point,
        is_low_stock,
    })
}

/// Saldo atual de um único produto dentro de uma obra (atalho usado pela
/// validação de devolução/consumo).
pub fn current_quantity_of(records: &[LedgerRecord], product_id: Uuid) -> Decimal {
    reconcile(records)
        .into_iter()
        .find(|item| item.product_id == product_id)
        .map(|item| item.current_quantity)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use crate::models::inventory::ActionBy;
    use chrono::{Duration, TimeZone, Utc};

    fn obra() -> Uuid {
        Uuid::from_u128(1)
    }

    fn produto() -> Uuid {
        Uuid::from_u128(2)
    }

    // Constrói um registro do livro com o minuto `seq` após a época base.
    fn registro(
        seq: i64,
        action: LedgerAction,
        qty: i64,
        price: i64,
        reorder: Option<i64>,
    ) -> LedgerRecord {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let quantity = Decimal::from(qty);
        let sale_price = Decimal::from(price);
        LedgerRecord {
            id: Uuid::new_v4(),
            seq,
            project_id: obra(),
            product_id: produto(),
            product_name: "Cimento Portland".to_string(),
            category: "Cimento".to_string(),
            action,
            quantity,
            unit: "saco".to_string(),
            supplier: Some("Fornecedora Norte".to_string()),
            sale_price,
            total_value: quantity * sale_price,
            project_reorder_point: reorder.map(Decimal::from),
            action_by: ActionBy {
                user_id: Uuid::from_u128(9),
                name: "Marina Lopes".to_string(),
                role: UserRole::Staff,
            },
            notes: None,
            created_at: base + Duration::minutes(seq),
        }
    }

    #[test]
    fn livro_vazio_produz_snapshot_vazio() {
        assert!(reconcile(&[]).is_empty());
    }

    #[test]
    fn reconciliacao_e_idempotente() {
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 50, Some(5)),
            registro(1, LedgerAction::Returned, 2, 50, None),
            registro(2, LedgerAction::Adjusted, 3, 50, None),
        ];

        let primeira = reconcile(&records);
        let segunda = reconcile(&records);
        assert_eq!(primeira, segunda);
    }

    #[test]
    fn quantidade_e_valor_nunca_ficam_negativos() {
        // Devolução maior que o saldo: trava em zero em vez de negativar.
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 3, 100, None),
            registro(1, LedgerAction::Returned, 10, 100, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].current_quantity, Decimal::ZERO);
        assert_eq!(snapshot[0].total_value, Decimal::ZERO);
    }

    #[test]
    fn reorder_point_persiste_quando_omitido_no_checkout_seguinte() {
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 5, 50, Some(10)),
            registro(1, LedgerAction::CheckedOut, 3, 50, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].project_reorder_point, Some(Decimal::from(10)));
    }

    #[test]
    fn reorder_point_mais_recente_vence() {
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 5, 50, Some(10)),
            registro(1, LedgerAction::CheckedOut, 5, 50, Some(2)),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].project_reorder_point, Some(Decimal::from(2)));
    }

    #[test]
    fn consumo_nao_estorna_valor_mas_devolucao_sim() {
        // checkout(10 @ 100) -> adjusted(4): quantidade cai, valor fica.
        let mut records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 100, None),
            registro(1, LedgerAction::Adjusted, 4, 100, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].current_quantity, Decimal::from(6));
        assert_eq!(snapshot[0].total_value, Decimal::from(1000));

        // returned(2): agora quantidade E valor caem.
        records.push(registro(2, LedgerAction::Returned, 2, 100, None));
        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].current_quantity, Decimal::from(4));
        assert_eq!(snapshot[0].total_value, Decimal::from(800));
    }

    #[test]
    fn limite_de_low_stock_e_inclusivo() {
        // currentQuantity == reorderPoint => low stock
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 50, Some(5)),
            registro(1, LedgerAction::Adjusted, 5, 50, None),
        ];
        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].current_quantity, Decimal::from(5));
        assert!(snapshot[0].is_low_stock);

        // currentQuantity == reorderPoint + 1 => ok
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 50, Some(5)),
            registro(1, LedgerAction::Adjusted, 4, 50, None),
        ];
        let snapshot = reconcile(&records);
        assert!(!snapshot[0].is_low_stock);
    }

    #[test]
    fn sem_reorder_point_nunca_e_low_stock() {
        // Zerado e sem limite configurado: "Out of Stock", não "Low Stock".
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 5, 50, None),
            registro(1, LedgerAction::Adjusted, 5, 50, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].current_quantity, Decimal::ZERO);
        assert!(!snapshot[0].is_low_stock);
        assert_eq!(snapshot[0].stock_status(), "Out of Stock");
    }

    #[test]
    fn cenario_completo_do_livro() {
        // [checkout(10 @ 50, reorder=5), returned(2), adjusted(3)]
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 50, Some(5)),
            registro(1, LedgerAction::Returned, 2, 50, None),
            registro(2, LedgerAction::Adjusted, 3, 50, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot.len(), 1);

        let item = &snapshot[0];
        assert_eq!(item.current_quantity, Decimal::from(5));
        assert_eq!(item.total_transferred_in, Decimal::from(10));
        assert_eq!(item.total_returned_out, Decimal::from(2));
        assert_eq!(item.total_adjusted, Decimal::from(3));
        // (10 - 2) * 50
        assert_eq!(item.total_value, Decimal::from(400));
        assert_eq!(item.total_cost, Decimal::from(250));
        assert!(item.is_low_stock); // 5 <= 5
    }

    #[test]
    fn fold_ordena_por_created_at_antes_de_acumular() {
        // Registros fora de ordem: a devolução "aconteceu" depois do
        // checkout, mesmo chegando primeiro no slice.
        let records = vec![
            registro(5, LedgerAction::Returned, 2, 50, None),
            registro(0, LedgerAction::CheckedOut, 10, 50, None),
        ];

        let snapshot = reconcile(&records);
        assert_eq!(snapshot[0].current_quantity, Decimal::from(8));
        assert_eq!(snapshot[0].total_value, Decimal::from(400));
    }

    #[test]
    fn produtos_distintos_geram_itens_distintos() {
        let mut a = registro(0, LedgerAction::CheckedOut, 4, 50, None);
        let mut b = registro(1, LedgerAction::CheckedOut, 7, 80, None);
        a.product_id = Uuid::from_u128(100);
        b.product_id = Uuid::from_u128(200);
        b.product_name = "Vergalhão 10mm".to_string();

        let snapshot = reconcile(&[a, b]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].current_quantity, Decimal::from(4));
        assert_eq!(snapshot[1].current_quantity, Decimal::from(7));
    }

    #[test]
    fn saldo_atual_de_um_produto() {
        let records = vec![
            registro(0, LedgerAction::CheckedOut, 10, 50, None),
            registro(1, LedgerAction::Adjusted, 3, 50, None),
        ];

        assert_eq!(current_quantity_of(&records, produto()), Decimal::from(7));
        assert_eq!(
            current_quantity_of(&records, Uuid::from_u128(999)),
            Decimal::ZERO
        );
    }
}
