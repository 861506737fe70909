// src/services/export_service.rs

// Adaptador de relatórios: transforma o livro-razão e o snapshot
// reconciliado em linhas tabulares e escreve CSV (separado por vírgula,
// campos escapados com aspas duplas, uma linha de cabeçalho).
//
// Transformação pura, sem I/O. Moeda e data saem de common::format, o
// mesmo caminho usado na exibição, para relatório e tela nunca divergirem.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        format::{format_currency, format_date, format_quantity},
    },
    models::inventory::{CurrentInventoryItem, LedgerAction, LedgerRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Transactions,
    Inventory,
    Summary,
}

impl ExportKind {
    /// Nome do arquivo sugerido no Content-Disposition.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Transactions => "transactions.csv",
            ExportKind::Inventory => "inventory.csv",
            ExportKind::Summary => "category-summary.csv",
        }
    }
}

impl LedgerAction {
    /// Rótulo de exibição, o mesmo da tela e do relatório.
    pub fn label(self) -> &'static str {
        match self {
            LedgerAction::CheckedOut => "Checked Out",
            LedgerAction::Returned => "Returned",
            LedgerAction::Adjusted => "Used",
        }
    }
}

/// Linhas tabulares (cabeçalho incluso) para o tipo de relatório pedido.
pub fn export_rows(
    kind: ExportKind,
    records: &[LedgerRecord],
    snapshot: &[CurrentInventoryItem],
) -> Vec<Vec<String>> {
    match kind {
        ExportKind::Transactions => transaction_rows(records),
        ExportKind::Inventory => inventory_rows(snapshot),
        ExportKind::Summary => summary_rows(snapshot),
    }
}

/// Serializa as linhas como texto CSV.
pub fn export_csv(
    kind: ExportKind,
    records: &[LedgerRecord],
    snapshot: &[CurrentInventoryItem],
) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in export_rows(kind, records, snapshot) {
        writer
            .write_record(&row)
            .map_err(|e| AppError::InternalServerError(e.into()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("{e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalServerError(e.into()))
}

fn transaction_rows(records: &[LedgerRecord]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Product".to_string(),
        "Category".to_string(),
        "Action".to_string(),
        "Quantity".to_string(),
        "Unit".to_string(),
        "Unit Price".to_string(),
        "Total Value".to_string(),
        "Performed By".to_string(),
        "Notes".to_string(),
    ]];

    for record in records {
        rows.push(vec![
            format_date(record.created_at),
            record.product_name.clone(),
            record.category.clone(),
            record.action.label().to_string(),
            format_quantity(record.quantity),
            record.unit.clone(),
            format_currency(record.sale_price),
            format_currency(record.total_value),
            record.action_by.name.clone(),
            record.notes.clone().unwrap_or_default(),
        ]);
    }

    rows
}

fn inventory_rows(snapshot: &[CurrentInventoryItem]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Product".to_string(),
        "Category".to_string(),
        "Unit".to_string(),
        "Supplier".to_string(),
        "Current Quantity".to_string(),
        "Transferred In".to_string(),
        "Returned".to_string(),
        "Used".to_string(),
        "Unit Price".to_string(),
        "Total Value".to_string(),
        "Total Cost".to_string(),
        "Reorder Point".to_string(),
        "Status".to_string(),
    ]];

    for item in snapshot {
        rows.push(vec![
            item.product_name.clone(),
            item.category.clone(),
            item.unit.clone(),
            item.supplier.clone().unwrap_or_default(),
            format_quantity(item.current_quantity),
            format_quantity(item.total_transferred_in),
            format_quantity(item.total_returned_out),
            format_quantity(item.total_adjusted),
            format_currency(item.sale_price),
            format_currency(item.total_value),
            format_currency(item.total_cost),
            item.project_reorder_point
                .map(format_quantity)
                .unwrap_or_default(),
            item.stock_status().to_string(),
        ]);
    }

    rows
}

fn summary_rows(snapshot: &[CurrentInventoryItem]) -> Vec<Vec<String>> {
    // BTreeMap deixa as categorias em ordem alfabética estável.
    let mut by_category: BTreeMap<&str, (usize, Decimal, Decimal)> = BTreeMap::new();

    for item in snapshot {
        let entry = by_category
            .entry(item.category.as_str())
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += item.current_quantity;
        entry.2 += item.total_value;
    }

    let mut rows = vec![vec![
        "Category".to_string(),
        "Items".to_string(),
        "Total Quantity".to_string(),
        "Total Value".to_string(),
    ]];

    for (category, (count, quantity, value)) in by_category {
        rows.push(vec![
            category.to_string(),
            count.to_string(),
            format_quantity(quantity),
            format_currency(value),
        ]);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use crate::models::inventory::ActionBy;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn registro(product_name: &str, notes: Option<&str>) -> LedgerRecord {
        LedgerRecord {
            id: Uuid::new_v4(),
            seq: 1,
            project_id: Uuid::from_u128(1),
            product_id: Uuid::from_u128(2),
            product_name: product_name.to_string(),
            category: "Cimento".to_string(),
            action: LedgerAction::CheckedOut,
            quantity: Decimal::from(10),
            unit: "saco".to_string(),
            supplier: None,
            sale_price: Decimal::from(50),
            total_value: Decimal::from(500),
            project_reorder_point: Some(Decimal::from(5)),
            action_by: ActionBy {
                user_id: Uuid::from_u128(9),
                name: "Marina Lopes".to_string(),
                role: UserRole::Staff,
            },
            notes: notes.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        }
    }

    fn item(category: &str, qty: i64, value: i64) -> CurrentInventoryItem {
        CurrentInventoryItem {
            project_id: Uuid::from_u128(1),
            product_id: Uuid::new_v4(),
            product_name: "Cimento Portland".to_string(),
            category: category.to_string(),
            unit: "saco".to_string(),
            supplier: Some("Fornecedora Norte".to_string()),
            sale_price: Decimal::from(50),
            current_quantity: Decimal::from(qty),
            total_transferred_in: Decimal::from(qty),
            total_returned_out: Decimal::ZERO,
            total_adjusted: Decimal::ZERO,
            total_value: Decimal::from(value),
            total_cost: Decimal::from(qty * 50),
            project_reorder_point: Some(Decimal::from(5)),
            is_low_stock: qty <= 5,
        }
    }

    #[test]
    fn relatorio_de_transacoes_tem_colunas_fixas() {
        let rows = export_rows(ExportKind::Transactions, &[registro("Cimento", None)], &[]);
        assert_eq!(rows[0][0], "Date");
        assert_eq!(rows[0].len(), 10);
        assert_eq!(rows.len(), 2);

        let linha = &rows[1];
        assert_eq!(linha[0], "01/06/2024");
        assert_eq!(linha[3], "Checked Out");
        assert_eq!(linha[6], "₱50.00");
        assert_eq!(linha[7], "₱500.00");
        assert_eq!(linha[8], "Marina Lopes");
    }

    #[test]
    fn relatorio_de_inventario_usa_o_mesmo_formato_da_tela() {
        let rows = export_rows(ExportKind::Inventory, &[], &[item("Cimento", 4, 200)]);
        assert_eq!(rows[0].len(), 13);

        let linha = &rows[1];
        assert_eq!(linha[4], "4");
        assert_eq!(linha[9], "₱200.00");
        assert_eq!(linha[12], "Low Stock"); // 4 <= 5
    }

    #[test]
    fn resumo_agrega_por_categoria_em_ordem_alfabetica() {
        let snapshot = vec![
            item("Madeira", 3, 150),
            item("Aço", 2, 400),
            item("Madeira", 7, 350),
        ];

        let rows = export_rows(ExportKind::Summary, &[], &snapshot);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Aço");
        assert_eq!(rows[2], vec!["Madeira", "2", "10", "₱500.00"]);
    }

    #[test]
    fn csv_escapa_virgulas_e_aspas() {
        let record = registro("Prego 17x27, caixa \"grande\"", Some("lote, urgente"));
        let csv = export_csv(ExportKind::Transactions, &[record], &[]).unwrap();

        let linha = csv.lines().nth(1).unwrap();
        assert!(linha.contains("\"Prego 17x27, caixa \"\"grande\"\"\""));
        assert!(linha.contains("\"lote, urgente\""));
    }

    #[test]
    fn csv_tem_uma_linha_de_cabecalho() {
        let csv = export_csv(ExportKind::Summary, &[], &[item("Cimento", 1, 50)]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Category,Items,Total Quantity,Total Value");
        assert_eq!(lines.next().unwrap(), "Cimento,1,1,₱50.00");
    }
}
