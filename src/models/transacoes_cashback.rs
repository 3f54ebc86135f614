// ============================================================================
// MODELO : TRANSAÇÕES DE CASHBACK
// ============================================================================
//
// Descrição:
//   Uma compra do usuário em uma loja parceira, com o cashback calculado.
//
// Pontos de atenção:
//   - valor_cashback é o cashback BRUTO da transação (repartido entre
//     cliente, loja e plataforma)
//   - valor_cliente é a parte que vai de fato para o cliente; é o ÚNICO
//     valor que pode aparecer nas respostas ao cliente
//   - status 'pendente' entra no saldo pendente derivado; 'aprovado' já
//     foi creditado em cashback_saldos
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transacoes_cashback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub usuario_id: i32,
    pub loja_id: i32,
    pub valor_total: Decimal,
    pub valor_cashback: Decimal,
    pub valor_cliente: Decimal,
    pub status: String, // 'pendente', 'aprovado', 'cancelado'
    pub data_transacao: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::UsuarioId",
        to = "super::usuarios::Column::Id"
    )]
    Usuario,

    #[sea_orm(
        belongs_to = "super::lojas::Entity",
        from = "Column::LojaId",
        to = "super::lojas::Column::Id"
    )]
    Loja,

    #[sea_orm(has_many = "super::transacoes_saldo_usado::Entity")]
    SaldoUsado,
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl Related<super::lojas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loja.def()
    }
}

impl Related<super::transacoes_saldo_usado::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaldoUsado.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
