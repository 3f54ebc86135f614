use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lojas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome_fantasia: String,
    pub porcentagem_cashback: Decimal,
    pub logo: Option<String>,
    pub status: String, // 'aprovado', 'pendente', 'reprovado'
    pub data_cadastro: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cashback_saldos::Entity")]
    CashbackSaldos,

    #[sea_orm(has_many = "super::transacoes_cashback::Entity")]
    TransacoesCashback,
}

impl Related<super::cashback_saldos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashbackSaldos.def()
    }
}

impl Related<super::transacoes_cashback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransacoesCashback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
