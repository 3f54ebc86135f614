use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Saldo pré-existente consumido em uma transação. O histórico faz LEFT JOIN
// aqui e assume 0 quando a transação não usou saldo.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transacoes_saldo_usado")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub transacao_id: i32,
    pub valor_usado: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transacoes_cashback::Entity",
        from = "Column::TransacaoId",
        to = "super::transacoes_cashback::Column::Id"
    )]
    Transacao,
}

impl Related<super::transacoes_cashback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transacao.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
