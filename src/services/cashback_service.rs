// ============================================================================
// SERVICE : SALDO E HISTÓRICO DE CASHBACK
// ============================================================================
//
// Leituras agregadas sobre as tabelas normalizadas do ledger:
//   - saldo do usuário somado entre todas as lojas
//   - saldo pendente derivado das transações 'pendente' a cada leitura
//   - histórico paginado com o nome da loja e o saldo usado (LEFT JOIN)
//
// Pontos de atenção:
//   - O cliente só enxerga valor_cliente; o valor_cashback bruto inclui a
//     parte da loja/plataforma e NUNCA sai na API
//   - O pendente só conta transações de lojas que já têm linha de saldo
//     para o usuário (escopo do JOIN legado, mantido por compatibilidade;
//     possível subcontagem - ver teste e DESIGN.md)
//
// ============================================================================

use rust_decimal::Decimal;
use sea_orm::*;
use std::collections::{HashMap, HashSet};

use crate::models::cashback_saldos::{self, Column as SaldoColumn, Entity as CashbackSaldos};
use crate::models::dto::{BalanceData, StoreItem, TransactionItem};
use crate::models::lojas::{self, Column as LojaColumn, Entity as Lojas};
use crate::models::transacoes_cashback::{
    self, Column as TransacaoColumn, Entity as TransacoesCashback,
};
use crate::models::transacoes_saldo_usado::{
    Column as SaldoUsadoColumn, Entity as TransacoesSaldoUsado,
};

pub struct CashbackService;

impl CashbackService {
    /// Saldo agregado do usuário: soma dos saldos por loja + pendente
    /// derivado. Sem linha nenhuma, devolve zeros (nunca null, nunca erro).
    pub async fn get_balance(
        db: &DatabaseConnection,
        usuario_id: i32,
    ) -> Result<BalanceData, DbErr> {
        // 1. Linhas de saldo por loja
        let saldos = CashbackSaldos::find()
            .filter(SaldoColumn::UsuarioId.eq(usuario_id))
            .all(db)
            .await?;

        // 2. Transações pendentes do usuário (o pendente nunca é gravado)
        let pendentes = TransacoesCashback::find()
            .filter(TransacaoColumn::UsuarioId.eq(usuario_id))
            .filter(TransacaoColumn::Status.eq("pendente"))
            .all(db)
            .await?;

        Ok(Self::compute_balance(&saldos, &pendentes))
    }

    /// Agregação pura sobre as linhas já carregadas.
    /// O pendente soma valor_cliente apenas das transações cuja loja já tem
    /// linha de saldo para o usuário (semântica do JOIN legado).
    pub fn compute_balance(
        saldos: &[cashback_saldos::Model],
        pendentes: &[transacoes_cashback::Model],
    ) -> BalanceData {
        let mut saldo_disponivel = Decimal::ZERO;
        let mut total_creditado = Decimal::ZERO;
        let mut total_usado = Decimal::ZERO;

        let mut lojas_com_saldo: HashSet<i32> = HashSet::new();

        for saldo in saldos {
            saldo_disponivel += saldo.saldo_disponivel;
            total_creditado += saldo.total_creditado;
            total_usado += saldo.total_usado;
            lojas_com_saldo.insert(saldo.loja_id);
        }

        let saldo_pendente: Decimal = pendentes
            .iter()
            .filter(|t| lojas_com_saldo.contains(&t.loja_id))
            .map(|t| t.valor_cliente)
            .sum();

        BalanceData {
            saldo_disponivel: decimal_to_f64(saldo_disponivel),
            total_creditado: decimal_to_f64(total_creditado),
            total_usado: decimal_to_f64(total_usado),
            saldo_pendente: decimal_to_f64(saldo_pendente),
        }
    }

    /// Histórico paginado de transações, da mais recente para a mais antiga,
    /// com o nome da loja e o saldo usado de cada transação (0 se nenhum).
    pub async fn list_transactions(
        db: &DatabaseConnection,
        usuario_id: i32,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TransactionItem>, DbErr> {
        // 1. Transações do usuário com a loja correspondente
        let rows = TransacoesCashback::find()
            .filter(TransacaoColumn::UsuarioId.eq(usuario_id))
            .find_also_related(Lojas)
            .order_by_desc(TransacaoColumn::DataTransacao)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await?;

        // 2. LEFT JOIN com o saldo usado: uma consulta para a página inteira
        let ids: Vec<i32> = rows.iter().map(|(t, _)| t.id).collect();

        let mut usados: HashMap<i32, Decimal> = HashMap::new();
        if !ids.is_empty() {
            let entries = TransacoesSaldoUsado::find()
                .filter(SaldoUsadoColumn::TransacaoId.is_in(ids))
                .all(db)
                .await?;

            for entry in entries {
                // No máximo uma entrada por transação; a primeira vence
                usados.entry(entry.transacao_id).or_insert(entry.valor_usado);
            }
        }

        // 3. Mapeamento explícito para a resposta
        Ok(Self::map_transactions(rows, &usados))
    }

    /// Mapeamento puro da página carregada. JOIN interno com lojas, como no
    /// esquema: transação com loja_id órfão (impossível com a FK íntegra)
    /// fica fora do histórico em vez de sair com nome de loja vazio.
    pub fn map_transactions(
        rows: Vec<(transacoes_cashback::Model, Option<lojas::Model>)>,
        usados: &HashMap<i32, Decimal>,
    ) -> Vec<TransactionItem> {
        rows.into_iter()
            .filter_map(|(transacao, loja)| {
                let loja = loja?;
                let valor_usado = usados.get(&transacao.id).copied();
                Some(Self::map_transaction(transacao, loja, valor_usado))
            })
            .collect()
    }

    /// Uma transação do histórico. O campo valor_cashback da resposta recebe
    /// o valor_cliente da transação: o cashback bruto não sai daqui.
    pub fn map_transaction(
        transacao: transacoes_cashback::Model,
        loja: lojas::Model,
        valor_usado: Option<Decimal>,
    ) -> TransactionItem {
        TransactionItem {
            id: transacao.id,
            valor_total: decimal_to_f64(transacao.valor_total),
            valor_cashback: decimal_to_f64(transacao.valor_cliente),
            valor_usado: decimal_to_f64(valor_usado.unwrap_or(Decimal::ZERO)),
            data_transacao: transacao.data_transacao,
            status: transacao.status,
            loja_nome: loja.nome_fantasia,
        }
    }

    /// Lojas parceiras aprovadas, da mais recente para a mais antiga
    pub async fn popular_stores(
        db: &DatabaseConnection,
        limit: u64,
    ) -> Result<Vec<StoreItem>, DbErr> {
        let stores = Lojas::find()
            .filter(LojaColumn::Status.eq("aprovado"))
            .order_by_desc(LojaColumn::DataCadastro)
            .limit(limit)
            .all(db)
            .await?;

        Ok(stores
            .into_iter()
            .map(|loja| StoreItem {
                id: loja.id,
                nome_fantasia: loja.nome_fantasia,
                porcentagem_cashback: decimal_to_f64(loja.porcentagem_cashback),
                logo: loja.logo,
            })
            .collect())
    }
}

// Helper para converter Decimal em f64 na borda da API
fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn saldo(loja_id: i32, disponivel: i64, creditado: i64, usado: i64) -> cashback_saldos::Model {
        cashback_saldos::Model {
            id: loja_id,
            usuario_id: 9,
            loja_id,
            saldo_disponivel: Decimal::from(disponivel),
            total_creditado: Decimal::from(creditado),
            total_usado: Decimal::from(usado),
        }
    }

    fn transacao(id: i32, loja_id: i32, status: &str, valor_cliente: i64) -> transacoes_cashback::Model {
        transacoes_cashback::Model {
            id,
            usuario_id: 9,
            loja_id,
            valor_total: Decimal::from(100),
            valor_cashback: Decimal::from(valor_cliente * 2), // bruto, parte da loja inclusa
            valor_cliente: Decimal::from(valor_cliente),
            status: status.to_string(),
            data_transacao: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_compute_balance_sums_across_stores() {
        // Loja A: 10/20/10, loja B: 5/5/0, uma pendente de 3 na loja A
        let saldos = vec![saldo(1, 10, 20, 10), saldo(2, 5, 5, 0)];
        let pendentes = vec![transacao(1, 1, "pendente", 3)];

        let balance = CashbackService::compute_balance(&saldos, &pendentes);

        assert_eq!(balance.saldo_disponivel, 15.0);
        assert_eq!(balance.total_creditado, 25.0);
        assert_eq!(balance.total_usado, 10.0);
        assert_eq!(balance.saldo_pendente, 3.0);
    }

    #[test]
    fn test_compute_balance_empty_is_all_zeros() {
        let balance = CashbackService::compute_balance(&[], &[]);

        assert_eq!(balance.saldo_disponivel, 0.0);
        assert_eq!(balance.total_creditado, 0.0);
        assert_eq!(balance.total_usado, 0.0);
        assert_eq!(balance.saldo_pendente, 0.0);
    }

    #[test]
    fn test_pending_ignores_store_without_balance_row() {
        // Comportamento legado mantido: a loja 7 tem transação pendente mas
        // nenhuma linha de saldo, então não entra no pendente (subcontagem)
        let saldos = vec![saldo(1, 10, 20, 10)];
        let pendentes = vec![
            transacao(1, 1, "pendente", 3),
            transacao(2, 7, "pendente", 50),
        ];

        let balance = CashbackService::compute_balance(&saldos, &pendentes);

        assert_eq!(balance.saldo_pendente, 3.0);
    }

    fn loja(id: i32) -> lojas::Model {
        lojas::Model {
            id,
            nome_fantasia: "Loja do Centro".to_string(),
            porcentagem_cashback: Decimal::from(5),
            logo: None,
            status: "aprovado".to_string(),
            data_cadastro: None,
        }
    }

    #[test]
    fn test_map_transaction_uses_client_value() {
        // valor_cliente = 5, bruto = 10: a resposta carrega os 5
        let t = transacao(1, 1, "aprovado", 5);

        let item = CashbackService::map_transaction(t, loja(1), None);

        assert_eq!(item.valor_cashback, 5.0);
        assert_eq!(item.valor_usado, 0.0);
        assert_eq!(item.loja_nome, "Loja do Centro");
    }

    #[test]
    fn test_map_transaction_with_used_balance() {
        let t = transacao(1, 1, "aprovado", 5);

        let item = CashbackService::map_transaction(t, loja(1), Some(Decimal::new(25, 1)));

        assert_eq!(item.valor_usado, 2.5);
    }

    #[test]
    fn test_transaction_without_store_row_is_excluded() {
        // JOIN interno: uma transação cuja loja não veio no join não entra
        // no histórico (só acontece com loja_id órfão, a FK impede)
        let rows = vec![
            (transacao(1, 1, "aprovado", 5), Some(loja(1))),
            (transacao(2, 7, "aprovado", 3), None),
        ];

        let items = CashbackService::map_transactions(rows, &HashMap::new());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }
}
